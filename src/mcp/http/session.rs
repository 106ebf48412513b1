//! Authentication state for one logical connection to the ERP API.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};

use crate::mcp::error::ErpError;

/// A session is authenticated exactly when it holds a bearer token.
#[derive(Debug, Clone)]
pub struct SessionState {
    bearer_token: Option<String>,
    base_headers: HeaderMap,
}

impl SessionState {
    /// Fresh, unauthenticated state carrying only the default headers.
    ///
    /// # Errors
    /// Returns `ErpError::Config` if the user agent is not a valid header value.
    pub fn new(user_agent: &str) -> Result<Self, ErpError> {
        Ok(Self {
            bearer_token: None,
            base_headers: default_headers(user_agent)?,
        })
    }

    /// State after a successful login. Replaces, never merges with, whatever
    /// came before.
    ///
    /// # Errors
    /// Returns `ErpError::Validation` for an empty token or one that cannot be
    /// carried in an HTTP header.
    pub fn authenticated(user_agent: &str, token: &str) -> Result<Self, ErpError> {
        if token.is_empty() {
            return Err(ErpError::validation("Bearer token cannot be empty"));
        }
        let mut base_headers = default_headers(user_agent)?;
        let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            ErpError::validation("Token contains characters that are not valid in a header")
        })?;
        value.set_sensitive(true);
        base_headers.insert(AUTHORIZATION, value);

        Ok(Self {
            bearer_token: Some(token.to_string()),
            base_headers,
        })
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.bearer_token.is_some()
    }

    #[cfg(test)]
    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    #[must_use]
    pub const fn base_headers(&self) -> &HeaderMap {
        &self.base_headers
    }
}

/// Headers sent on every request, authenticated or not.
///
/// # Errors
/// Returns `ErpError::Config` if the user agent is not a valid header value.
pub fn default_headers(user_agent: &str) -> Result<HeaderMap, ErpError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent)
            .map_err(|e| ErpError::Config(format!("ERP_USER_AGENT: {e}")))?,
    );
    Ok(headers)
}
