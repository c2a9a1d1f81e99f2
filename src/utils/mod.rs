use std::time::{SystemTime, UNIX_EPOCH};

/// Generate a unique request ID
pub fn generate_request_id() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let random = rand::random::<u32>();
    format!("req_{timestamp:x}_{random:x}")
}
