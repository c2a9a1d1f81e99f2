use anyhow::Context;
use axum::{
    Json, Router,
    extract::State,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use metrics::counter;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error};

use crate::clock::{Clock, WallTime};
use crate::reception::{AllReceptionTextsResponse, ReceptionStatus, ReceptionStatusTextResponse};

/// Shared state available to every handler
#[derive(Clone)]
pub struct AppState {
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Arc::new(clock),
        }
    }
}

/// Any failure while handling a request, rendered as a 500
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Output debugging information
        error!(error = %self.0, "Request handling failed");
        // Increment error metrics
        counter!("reception.total_errors").increment(1);
        // The cause stays in the logs
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal Server Error" })),
        )
            .into_response()
    }
}

/// Allow the status to be read from any browser origin
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(false)
}

/// Build the application routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/reception-status", get(reception_status))
        .route("/reception-texts", get(reception_texts))
        .route("/hello", get(hello))
        .route("/health", get(health))
        .with_state(state)
}

/// Health check endpoint for load balancer health status checking
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Fixed greeting, kept for liveness probes of the original deployment
pub async fn hello() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Go Serverless v4! Your function executed successfully!"
    }))
}

/// Current reception status together with the service categories
pub async fn reception_status(State(state): State<AppState>) -> Result<Response, ApiError> {
    counter!("reception.total_requests").increment(1);
    let WallTime { hour, minute } = state.clock.now();
    let status = ReceptionStatus::at(hour, minute);
    // Output debugging information
    debug!(hour, minute, status = status.as_str(), "Resolved reception status");
    counter!("reception.status_served", "status" => status.as_str()).increment(1);
    json_response(&ReceptionStatusTextResponse::assemble(status.info()))
}

/// Every status text, so clients can render them ahead of time
pub async fn reception_texts() -> Result<Response, ApiError> {
    counter!("reception.total_requests").increment(1);
    json_response(&AllReceptionTextsResponse::new())
}

fn json_response<T: Serialize>(body: &T) -> Result<Response, ApiError> {
    let body = serde_json::to_vec(body).context("Failed to serialize response body")?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    fn router(state: AppState) -> Router {
        routes(state).layer(cors_layer())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Response<Body>) {
        let request = Request::builder()
            .uri(uri)
            .header(header::ORIGIN, "https://example.com")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        (response.status(), response)
    }

    async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_reception_status_while_accepting() {
        let app = router(AppState::new(FixedClock::at(10, 30)));
        let (status, response) = get_json(app, "/reception-status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({
                "categories": {
                    "newPhoneAndDeviceChange": {
                        "items": ["新しい電話番号、機種変更", "SIM再発行・タイプ変更"],
                        "isAvailable": true
                    },
                    "carrierSwitch": {
                        "items": ["⚫︎⚫︎⚫︎⚫︎・△△△△△から乗り換え", "他社から乗り換え"],
                        "isAvailable": true
                    }
                },
                "receptionInfo": {
                    "status": "受付中",
                    "hours": "(4:00~23:15)",
                    "isAccepting": true
                }
            })
        );
    }

    #[tokio::test]
    async fn test_reception_status_while_closed() {
        let app = router(AppState::new(FixedClock::at(23, 20)));
        let (status, response) = get_json(app, "/reception-status").await;
        assert_eq!(status, StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["receptionInfo"]["status"], "受付時間外");
        assert_eq!(body["receptionInfo"]["isAccepting"], false);
        assert_eq!(
            body["categories"]["newPhoneAndDeviceChange"]["isAvailable"],
            false
        );
        assert_eq!(body["categories"]["carrierSwitch"]["isAvailable"], false);
    }

    #[tokio::test]
    async fn test_reception_texts() {
        let app = router(AppState::new(FixedClock::at(2, 0)));
        let (status, response) = get_json(app, "/reception-texts").await;
        assert_eq!(status, StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["receptionStatuses"]["accepting"]["status"], "受付中");
        assert_eq!(body["receptionStatuses"]["nearEnd"]["status"], "まもなく終了");
        assert_eq!(body["receptionStatuses"]["closed"]["status"], "受付時間外");
    }

    #[tokio::test]
    async fn test_hello() {
        let app = router(AppState::new(FixedClock::at(12, 0)));
        let (status, response) = get_json(app, "/hello").await;
        assert_eq!(status, StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body["message"],
            "Go Serverless v4! Your function executed successfully!"
        );
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(AppState::new(FixedClock::at(12, 0)));
        let (status, _) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = router(AppState::new(FixedClock::at(12, 0)));
        let (status, _) = get_json(app, "/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let response = ApiError::from(anyhow::anyhow!("serializer exploded")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body, json!({ "error": "Internal Server Error" }));
    }
}
