//! Response helpers shared by the atom HTTP handlers.

use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::Serialize;

use crate::error::PersistenceError;

pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(serde_json::to_string(value)?.into())
        .map_err(Box::new)?)
}

pub fn error(status: StatusCode, message: impl AsRef<str>) -> Result<Response<Body>, Error> {
    json(status, &serde_json::json!({ "error": message.as_ref() }))
}

pub fn no_content() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Body::Empty)
        .map_err(Box::new)?)
}

pub fn not_found() -> Result<Response<Body>, Error> {
    error(StatusCode::NOT_FOUND, "Not found")
}

/// Maps a persistence failure onto the status the admin UI expects.
pub fn persistence_error(context: &str, err: &PersistenceError) -> Result<Response<Body>, Error> {
    match err {
        PersistenceError::NotFound { .. } => error(StatusCode::NOT_FOUND, err.to_string()),
        PersistenceError::Conflict { .. } => error(StatusCode::CONFLICT, err.to_string()),
        PersistenceError::InvalidPayload(_) => error(StatusCode::BAD_REQUEST, err.to_string()),
        PersistenceError::Backend { .. } => {
            tracing::error!("❌ {} failed: {}", context, err);
            error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

/// Parses a JSON body, answering 400 instead of failing the whole invocation.
pub fn parse_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, Response<Body>> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!("Rejected request body: {}", e);
        Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .header("Content-Type", "application/json")
            .body(
                serde_json::json!({ "error": format!("Invalid request body: {}", e) })
                    .to_string()
                    .into(),
            )
            .unwrap_or_default()
    })
}
