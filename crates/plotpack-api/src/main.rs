use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use plotpack_core::{
    LayoutError, LayoutRequest, LayoutResult, OrientationInfo, Packer, PaddingRequest, Paddings,
};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Plot Packer API");

    let addr = std::env::var("PLOTPACK_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on http://{}", addr);
    info!("Try: curl http://localhost:3000/api/health");

    axum::serve(listener, app()).await?;
    Ok(())
}

fn app() -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/layout", post(layout))
        .route("/api/padding", post(padding))
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "plotpack-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Main layout endpoint
async fn layout(Json(request): Json<LayoutRequest>) -> Result<Json<LayoutResult>, AppError> {
    info!(
        "Received layout request with {} boundary vertices and {} unit types",
        request.boundary.len(),
        request.unit_types.len()
    );

    // packing is CPU bound
    let result = tokio::task::spawn_blocking(move || Packer::new(request)?.pack()).await??;

    info!(
        "Layout complete: {} blocks placed, {:.2}% coverage",
        result.summary.total_blocks, result.summary.coverage_percentage
    );

    Ok(Json(result))
}

#[derive(Serialize)]
struct PaddingResponse {
    orientation: OrientationInfo,
    paddings: Paddings,
}

/// Orientation and lattice spacing without placing blocks
async fn padding(Json(request): Json<PaddingRequest>) -> Result<Json<PaddingResponse>, AppError> {
    let (orientation, paddings) =
        tokio::task::spawn_blocking(move || Packer::new(request.into())?.paddings()).await??;

    Ok(Json(PaddingResponse {
        orientation,
        paddings,
    }))
}

// Error handling
struct AppError(anyhow::Error);

impl From<LayoutError> for AppError {
    fn from(err: LayoutError) -> Self {
        AppError(err.into())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request error: {}", self.0);

        let status = if self.0.downcast_ref::<LayoutError>().is_some() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (
            status,
            Json(json!({
                "error": self.0.to_string(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;

    async fn post_json(uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn square_request() -> serde_json::Value {
        json!({
            "boundary": [[0, 0], [100, 0], [100, 100], [0, 100]],
            "unit_types": [{ "id": "ht1", "cost": 100000, "width": 25, "length": 30 }],
            "proportions": { "ht1": 1 },
            "seed": 7
        })
    }

    #[tokio::test]
    async fn health_reports_service() {
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn layout_returns_blocks() {
        let (status, body) = post_json("/api/layout", square_request()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["total_blocks"], 4);
        assert_eq!(body["paddings"]["block"], 30.0);
    }

    #[tokio::test]
    async fn padding_returns_spacing() {
        let (status, body) = post_json("/api/padding", square_request()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["paddings"]["row"], 40.0);
        assert_eq!(body["orientation"]["horizontal_has_longest"], true);
    }

    #[tokio::test]
    async fn padding_needs_no_proportions() {
        let request = json!({
            "boundary": [[0, 0], [100, 0], [100, 100], [0, 100]],
            "unit_types": [
                { "id": "ht1", "width": 25, "length": 30 },
                { "id": "ht2", "width": 50, "length": 50 }
            ]
        });
        let (status, body) = post_json("/api/padding", request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["paddings"]["block"], 60.0);
        assert_eq!(body["paddings"]["row"], 60.0);
    }

    #[tokio::test]
    async fn invalid_request_is_bad_request() {
        let mut request = square_request();
        request["proportions"] = json!({ "ht9": 1 });
        let (status, body) = post_json("/api/layout", request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Invalid input"));
    }

    #[tokio::test]
    async fn degenerate_boundary_is_bad_request() {
        let mut request = square_request();
        request["boundary"] = json!([[0, 0], [50, 0], [100, 0]]);
        let (status, _) = post_json("/api/padding", request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
