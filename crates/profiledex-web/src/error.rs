use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use profiledex_core::CatalogError;

#[expect(
    clippy::needless_pass_by_value,
    reason = "handlers naturally own error values from `Result` and pass them through"
)]
pub fn catalog_error_response(err: CatalogError, operation: &str, id: Option<String>) -> Response {
    let status = status_for_catalog_error(&err);
    if status.is_server_error() {
        tracing::warn!(operation, error = %err, "request failed");
    }
    let mut payload = err.to_payload(operation, id);
    if let CatalogError::Upstream { status, .. } = &err {
        payload.details = Some(json!({ "upstream_status": status }));
    }
    (status, Json(payload)).into_response()
}

fn status_for_catalog_error(err: &CatalogError) -> StatusCode {
    match err {
        CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::ReadOnly(_) => StatusCode::METHOD_NOT_ALLOWED,
        CatalogError::Upstream { .. } | CatalogError::Http(_) => StatusCode::BAD_GATEWAY,
        CatalogError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
        CatalogError::Io(_) | CatalogError::Json(_) | CatalogError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
