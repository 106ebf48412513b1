//! Error types for the ERP API MCP implementation.
//!
//! `ErpError` covers failures resolved locally, before or around a backend
//! call: bad tool input, unknown endpoints, database lookups with no row,
//! bad configuration, HTTP client construction and JSON serialization.
//! Backend responses, transport and database failures are never errors
//! here; they become an
//! [`Outcome`](crate::mcp::outcome::Outcome). None of these escape the tool
//! layer, which renders them as a single `<Kind>: <message>` line.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ErpError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ErpError {
    /// Label used when the error is rendered back to a tool caller.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::NotFound(_) => "NotFoundError",
            Self::Config(_) => "ConfigError",
            Self::Http(_) => "NetworkError",
            Self::Serialization(_) => "InternalError",
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_render_their_message_verbatim() {
        let err = ErpError::validation("employee_id must be a positive integer");
        assert_eq!(err.kind(), "ValidationError");
        assert_eq!(err.to_string(), "employee_id must be a positive integer");
    }

    #[test]
    fn config_errors_are_prefixed() {
        let err = ErpError::Config("ERP_API_TIMEOUT must be an integer".to_string());
        assert_eq!(err.kind(), "ConfigError");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: ERP_API_TIMEOUT must be an integer"
        );
    }
}
