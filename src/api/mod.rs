use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::GriffinError;
use crate::models::{Answer, LOCATIONS, Location};
use crate::oracle::Oracle;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub code: u16,
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

impl From<GriffinError> for ApiError {
    fn from(err: GriffinError) -> Self {
        let status = match err {
            GriffinError::Validation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError(status, err.user_message())
    }
}

#[derive(Debug, Deserialize)]
pub struct AskParams {
    pub q: Option<String>,
}

pub fn router(oracle: Arc<Oracle>) -> Router {
    Router::new()
        .route("/ask", get(ask))
        .route("/locations", get(locations))
        .with_state(oracle)
}

async fn ask(
    State(oracle): State<Arc<Oracle>>,
    Query(params): Query<AskParams>,
) -> Result<Json<Answer>, ApiError> {
    let query = params.q.unwrap_or_default();
    let answer = oracle.ask(&query).await?;
    info!(query = %answer.query, panels = answer.panels.len(), "Served answer");
    Ok(Json(answer))
}

async fn locations() -> Json<&'static [Location]> {
    Json(LOCATIONS)
}
