use serde_json::Value;
use thiserror::Error;

/// What a rejected request answered with.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiErrorBody {
    pub status: u16,
    /// Text of the `message` (or `error`) property, or the raw body.
    pub message: Option<String>,
    /// Response body as sent by the backend.
    pub payload: Value,
}

impl ApiErrorBody {
    pub fn from_text(status: u16, text: &str) -> Self {
        let text = text.trim();
        let payload = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
        };

        let message = match &payload {
            Value::String(raw) => Some(raw.clone()),
            other => ["message", "error"]
                .iter()
                .find_map(|key| other.get(key).and_then(Value::as_str))
                .map(str::to_string),
        }
        .filter(|message| !message.trim().is_empty());

        Self {
            status,
            message,
            payload,
        }
    }

    fn describe(&self) -> String {
        match &self.message {
            Some(message) => format!("{} ({message})", self.status),
            None => self.status.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Session expired or missing: {}", .0.describe())]
    Unauthorized(ApiErrorBody),

    #[error("Conflict: {}", .0.describe())]
    Conflict(ApiErrorBody),

    #[error("Not found: {}", .0.describe())]
    NotFound(ApiErrorBody),

    #[error("Bad request: {}", .0.describe())]
    BadRequest(ApiErrorBody),

    #[error("Backend error: {}", .0.describe())]
    Server(ApiErrorBody),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

impl BackendError {
    /// Classifies a non-2xx response.
    pub fn from_response(status: u16, text: &str) -> Self {
        let body = ApiErrorBody::from_text(status, text);
        match status {
            401 => BackendError::Unauthorized(body),
            409 => BackendError::Conflict(body),
            404 => BackendError::NotFound(body),
            400 | 422 => BackendError::BadRequest(body),
            _ => BackendError::Server(body),
        }
    }

    pub fn body(&self) -> Option<&ApiErrorBody> {
        match self {
            BackendError::Unauthorized(body)
            | BackendError::Conflict(body)
            | BackendError::NotFound(body)
            | BackendError::BadRequest(body)
            | BackendError::Server(body) => Some(body),
            _ => None,
        }
    }

    /// Message the backend gave for the rejection, if any.
    pub fn message(&self) -> Option<&str> {
        self.body().and_then(|body| body.message.as_deref())
    }

    pub fn status(&self) -> Option<u16> {
        self.body().map(|body| body.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BackendError::Unauthorized(_))
    }
}

/// Turns a status line and body text into the decoded body or an error.
pub fn decode_response(status: u16, text: &str) -> BackendResult<Value> {
    if !(200..300).contains(&status) {
        return Err(BackendError::from_response(status, text));
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|err| BackendError::Decode(err.to_string()))
}
