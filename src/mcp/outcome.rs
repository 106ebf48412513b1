//! Canonical result of every backend interaction.
//!
//! The ERP backend answers with several body shapes: bare arrays, objects
//! wrapped in a `data` envelope, objects carrying a `success` flag, and error
//! objects with an optional `message`. [`Outcome::from_response`] is the one
//! place where those shapes are classified.

use reqwest::StatusCode;
use serde_json::{Map, Value};

pub const NOT_AUTHENTICATED: &str = "Not authenticated. Please authenticate first.";

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success { data: Value },
    ClientError { status_code: u16, message: String },
    ServerError { status_code: u16, message: String },
    NetworkError { message: String },
    AuthRequired,
}

/// Which call produced a response; only changes the generic text used for a
/// bodiless 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseContext {
    Login,
    Resource,
}

impl Outcome {
    pub fn success(data: Value) -> Self {
        Self::Success { data }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Classifies a raw backend response.
    ///
    /// The body is parsed as JSON regardless of status. An empty body reads as
    /// `null`; anything else that fails to parse is a `NetworkError`.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &[u8], context: ResponseContext) -> Self {
        let parsed = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            match serde_json::from_slice::<Value>(body) {
                Ok(value) => value,
                Err(e) => return Self::network(format!("malformed response body: {e}")),
            }
        };

        let status_code = status.as_u16();
        if status.is_success() {
            if parsed.get("success").and_then(Value::as_bool) == Some(false) {
                let message = body_message(&parsed)
                    .unwrap_or_else(|| "Request reported failure".to_string());
                return Self::ClientError {
                    status_code,
                    message,
                };
            }
            return Self::Success { data: parsed };
        }

        let message = body_message(&parsed).unwrap_or_else(|| fallback_message(status, context));
        if status.is_server_error() {
            Self::ServerError {
                status_code,
                message,
            }
        } else {
            Self::ClientError {
                status_code,
                message,
            }
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "Success",
            Self::ClientError { .. } => "ClientError",
            Self::ServerError { .. } => "ServerError",
            Self::NetworkError { .. } => "NetworkError",
            Self::AuthRequired => "AuthRequired",
        }
    }

    /// Human-readable message for the error variants; `None` on success.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::ClientError { message, .. }
            | Self::ServerError { message, .. }
            | Self::NetworkError { message } => Some(message),
            Self::AuthRequired => Some(NOT_AUTHENTICATED),
        }
    }

    /// HTTP status of a backend rejection, when there was a response at all.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::ClientError { status_code, .. } | Self::ServerError { status_code, .. } => {
                Some(*status_code)
            }
            Self::Success { .. } | Self::NetworkError { .. } | Self::AuthRequired => None,
        }
    }

    /// Empty object used when a successful login carries no profile.
    pub(crate) fn empty_object() -> Value {
        Value::Object(Map::new())
    }
}

fn body_message(body: &Value) -> Option<String> {
    match body.get("message")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::String(_) | Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn fallback_message(status: StatusCode, context: ResponseContext) -> String {
    match status.as_u16() {
        401 if context == ResponseContext::Login => "Invalid email or password.".to_string(),
        401 => "Authentication token has expired.".to_string(),
        403 => "You don't have permission to access this resource.".to_string(),
        404 => "The requested resource was not found.".to_string(),
        422 => "Validation error occurred.".to_string(),
        500..=599 => "Internal server error occurred.".to_string(),
        code => format!("API request failed with status {code}"),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn classify(code: u16, body: &str) -> Outcome {
        Outcome::from_response(
            StatusCode::from_u16(code).unwrap(),
            body.as_bytes(),
            ResponseContext::Resource,
        )
    }

    #[test]
    fn client_error_statuses_classify_as_client_errors() {
        for code in [400, 401, 403, 404, 422] {
            let outcome = classify(code, r#"{"message":"nope"}"#);
            assert_eq!(
                outcome,
                Outcome::ClientError {
                    status_code: code,
                    message: "nope".to_string()
                }
            );
        }
    }

    #[test]
    fn server_error_statuses_classify_as_server_errors() {
        for code in [500, 502, 503, 504] {
            assert_eq!(classify(code, "{}").kind(), "ServerError");
        }
    }

    #[test]
    fn success_statuses_keep_the_body_unmodified() {
        let body = json!([{"id": 1}, {"id": 2}]);
        for code in [200, 201] {
            assert_eq!(
                classify(code, &body.to_string()),
                Outcome::success(body.clone())
            );
        }
    }

    #[test]
    fn success_flag_false_is_a_client_error() {
        let outcome = classify(200, r#"{"success":false,"message":"Account locked"}"#);
        assert_eq!(
            outcome,
            Outcome::ClientError {
                status_code: 200,
                message: "Account locked".to_string()
            }
        );
    }

    #[test]
    fn unparseable_bodies_become_network_errors() {
        let outcome = classify(200, "<html>gateway</html>");
        assert_eq!(outcome.kind(), "NetworkError");
        assert!(outcome.message().unwrap().starts_with("malformed response body"));
    }

    #[test]
    fn empty_bodies_read_as_null() {
        assert_eq!(classify(204, ""), Outcome::success(Value::Null));
    }

    #[test]
    fn missing_messages_fall_back_to_status_text() {
        assert_eq!(
            classify(404, "{}").message(),
            Some("The requested resource was not found.")
        );
        assert_eq!(
            classify(418, "{}").message(),
            Some("API request failed with status 418")
        );
        let login = Outcome::from_response(StatusCode::UNAUTHORIZED, b"{}", ResponseContext::Login);
        assert_eq!(login.message(), Some("Invalid email or password."));
    }

    #[test]
    fn auth_required_carries_the_standard_message() {
        assert_eq!(Outcome::AuthRequired.message(), Some(NOT_AUTHENTICATED));
        assert_eq!(Outcome::AuthRequired.status_code(), None);
    }

    #[test]
    fn rejections_keep_their_http_status() {
        assert_eq!(classify(422, "{}").status_code(), Some(422));
        assert_eq!(classify(502, "{}").status_code(), Some(502));
        assert_eq!(classify(200, "[]").status_code(), None);
    }
}
