//! REST API handlers for serve mode.

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use sqltrail_core::{extract_lineage, LineageGraph};

/// Request body of `POST /parse`.
#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub query: String,
}

/// Error body returned on non-success status.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /health - Health check with version
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /parse - Extract the lineage graph of one statement
pub async fn parse(
    Json(payload): Json<ParseRequest>,
) -> Result<Json<LineageGraph>, (StatusCode, Json<ErrorResponse>)> {
    match extract_lineage(&payload.query) {
        Ok(graph) => Ok(Json(graph)),
        Err(err) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                detail: format!("error parsing SQL: {err}"),
            }),
        )),
    }
}
