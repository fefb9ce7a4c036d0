use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shelfscan::ExtractError;
use tracing::error;

/// A custom error type for the server application.
///
/// This enum encapsulates the different kinds of errors that can occur
/// while serving a request, allowing them to be converted into the
/// `{error, details}` JSON envelope the API exposes.
pub enum AppError {
    /// Errors originating from the extraction pipeline.
    Extract(ExtractError),
    /// Malformed client input (missing upload, oversized batch).
    Validation(String),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        AppError::Extract(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

/// Splits an `ExtractError` into the envelope's summary and details.
///
/// Parse failures carry the raw model text in the details so the caller
/// can see exactly what failed to parse.
pub fn describe_extract_error(err: &ExtractError) -> (&'static str, String) {
    match err {
        ExtractError::MissingImage => ("No image uploaded", err.to_string()),
        ExtractError::Parse { message, raw } => (
            "Error parsing the model response",
            format!("{message}; raw response: {raw}"),
        ),
        err if err.is_model_failure() => ("Error querying the generative model", err.to_string()),
        err => ("Error creating the product catalog", err.to_string()),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, summary, details) = match self {
            AppError::Extract(err) => {
                error!("ExtractError: {err:?}");
                let status = match err {
                    ExtractError::MissingImage => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let (summary, details) = describe_extract_error(&err);
                (status, summary.to_string(), details)
            }
            AppError::Validation(message) => {
                error!("Validation error: {message}");
                (StatusCode::BAD_REQUEST, "Invalid request".to_string(), message)
            }
            AppError::Internal(err) => {
                error!("Internal server error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                    err.to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": summary,
            "details": details,
        }));

        (status_code, body).into_response()
    }
}
