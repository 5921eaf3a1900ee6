use axum::Json;
use serde_json::{Value, json};

/// Names the service and points at its documentation
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information")
    ),
    tag = "Health"
)]
pub async fn root() -> Json<Value> {
    Json(json!({
        "service": "records",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/swagger-ui",
    }))
}
