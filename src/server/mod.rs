pub mod http;
pub mod limit;
pub mod start;

pub use start::{ServerConfig, start_server};
