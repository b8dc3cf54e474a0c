use serde::Deserialize;

use crate::error::Error;

/// Error body the service returns with non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

pub fn is_success(status: u16) -> bool { (200..300).contains(&status) }

/// Lossy text of a response body for diagnostics.
pub fn body_text(body: &[u8]) -> String { String::from_utf8_lossy(body).into_owned() }

/// Map a non-2xx API response to [`Error::Api`].
///
/// Falls back to the raw body when it is not the structured error shape.
pub fn api_error(status: u16, body: &[u8]) -> Error {
    match serde_json::from_slice::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.code.is_empty() => Error::Api {
            status: parsed.status.unwrap_or(status),
            code: parsed.code,
            message: parsed.message,
        },
        _ => Error::Api {
            status,
            code: String::new(),
            message: body_text(body),
        },
    }
}

/// Human-readable message of an error body.
pub fn error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.message.is_empty() => parsed.message,
        _ => body_text(body),
    }
}
