//! Wire envelopes exchanged with the REST backend.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Standard `{ data, message? }` wrapper around backend payloads.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Either the standard envelope or the bare payload some endpoints return.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped(ApiResponse<T>),
    Bare(T),
}

impl<T> From<Envelope<T>> for ApiResponse<T> {
    fn from(envelope: Envelope<T>) -> Self {
        match envelope {
            Envelope::Wrapped(response) => response,
            Envelope::Bare(data) => ApiResponse {
                data,
                message: None,
            },
        }
    }
}

/// Decodes a response body accepting both the envelope and the bare shape.
pub fn unwrap_envelope<T>(body: Value) -> Result<ApiResponse<T>, serde_json::Error>
where
    T: DeserializeOwned,
{
    serde_json::from_value::<Envelope<T>>(body).map(ApiResponse::from)
}

/// Acknowledgement returned by delete calls.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    #[serde(default)]
    pub message: Option<String>,
}

impl Confirmation {
    /// Reads the optional `message` from whatever the backend answered with,
    /// including an empty body.
    pub fn from_body(body: &Value) -> Self {
        Self {
            message: body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: i32,
        name: String,
    }

    #[test]
    fn unwraps_the_standard_envelope() {
        let response: ApiResponse<Vec<Item>> = unwrap_envelope(json!({
            "data": [{"id": 1, "name": "A"}],
            "message": "ok"
        }))
        .unwrap();

        assert_eq!(response.data.len(), 1);
        assert_eq!(response.message.as_deref(), Some("ok"));
    }

    #[test]
    fn accepts_bare_arrays_and_objects() {
        let list: ApiResponse<Vec<Item>> =
            unwrap_envelope(json!([{"id": 1, "name": "A"}, {"id": 2, "name": "B"}])).unwrap();
        assert_eq!(list.data.len(), 2);
        assert_eq!(list.message, None);

        let one: ApiResponse<Item> = unwrap_envelope(json!({"id": 3, "name": "C"})).unwrap();
        assert_eq!(
            one.data,
            Item {
                id: 3,
                name: "C".into()
            }
        );
    }

    #[test]
    fn rejects_shapes_matching_neither_form() {
        let result = unwrap_envelope::<Vec<Item>>(json!({"items": []}));
        assert!(result.is_err());
    }

    #[test]
    fn confirmation_tolerates_empty_body() {
        assert_eq!(Confirmation::from_body(&Value::Null), Confirmation::default());
        assert_eq!(
            Confirmation::from_body(&json!({"message": "deleted"}))
                .message
                .as_deref(),
            Some("deleted")
        );
    }
}
