//! Text processing endpoint: transcript + persona in, persona-styled answer out

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::gateway::ProcessError;
use crate::persona::{PersonaInfo, known_personas};

/// Content type stamped on every JSON response
pub const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Build the processing router
#[must_use]
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/process-text", post(process_text))
        .route("/personas", get(personas))
        .with_state(state)
}

/// Request body for `POST /api/process-text`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessTextRequest {
    #[serde(default)]
    pub user_text: Option<String>,
    #[serde(default)]
    pub persona: Option<String>,
}

/// Success body for `POST /api/process-text`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessTextResponse {
    pub response_text: String,
}

/// JSON body sent with an explicit UTF-8 charset
pub struct Utf8Json<T>(pub StatusCode, pub T);

impl<T: Serialize> IntoResponse for Utf8Json<T> {
    fn into_response(self) -> Response {
        (
            self.0,
            [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))],
            Json(self.1),
        )
            .into_response()
    }
}

/// Generate a reply for a transcript
async fn process_text(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<ProcessTextRequest>, JsonRejection>,
) -> Result<Utf8Json<ProcessTextResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "rejected malformed request body");
        ApiError::BadRequest("Request body must be JSON with a userText field.".to_string())
    })?;

    let persona = request.persona.as_deref();
    let response_text = state
        .service
        .process_text(request.user_text.as_deref(), persona)
        .await
        .map_err(|e| {
            if e.is_input_error() {
                tracing::warn!(error = %e, "rejected request");
            } else {
                tracing::error!(
                    error = %e,
                    cause = ?std::error::Error::source(&e).map(ToString::to_string),
                    persona = persona.unwrap_or_default(),
                    "AI error (Gemini)"
                );
            }
            ApiError::from(e)
        })?;

    Ok(Utf8Json(
        StatusCode::OK,
        ProcessTextResponse { response_text },
    ))
}

/// List the personas front ends can offer
async fn personas() -> Utf8Json<Vec<PersonaInfo>> {
    Utf8Json(StatusCode::OK, known_personas())
}

/// Processing API errors
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Upstream { message: String, details: String },
}

impl From<ProcessError> for ApiError {
    fn from(err: ProcessError) -> Self {
        let message = err.to_string();
        match err {
            ProcessError::Upstream(source) => Self::Upstream {
                message,
                details: source.to_string(),
            },
            _ => Self::BadRequest(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
        }

        let (status, body) = match self {
            Self::BadRequest(error) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error,
                    details: None,
                },
            ),
            Self::Upstream { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: message,
                    details: Some(details),
                },
            ),
        };

        Utf8Json(status, body).into_response()
    }
}
