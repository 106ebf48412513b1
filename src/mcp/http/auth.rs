//! Login and logout against the ERP API.
//!
//! Login responses differ between backend versions, so the bearer token is
//! located by trying an ordered list of dotted paths (`data.token`, `token`,
//! `access_token` unless configured otherwise). The first non-empty string
//! wins.

use reqwest::Method;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::mcp::{
    error::ErpError,
    http::{
        client::{build_client, describe_transport_error},
        gateway::{Gateway, RequestSpec},
        registry,
        session::{SessionState, default_headers},
    },
    outcome::{Outcome, ResponseContext},
};

const PROFILE_PATH: &str = "data.user";

impl Gateway {
    /// Logs in and, on success, replaces this gateway's session.
    ///
    /// A failed login leaves the current session untouched. On success the
    /// outcome carries the user profile from the response, or `{}`.
    ///
    /// # Errors
    /// Returns local errors only (bad user agent, unserializable payload);
    /// every backend or transport failure is an `Outcome`.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Outcome, ErpError> {
        let config = self.config();
        let headers = default_headers(&config.user_agent)?;
        let payload = serde_json::to_vec(&json!({ "email": email, "password": password }))?;

        let client = match build_client(config.timeout) {
            Ok(client) => client,
            Err(e) => return Ok(Outcome::network(e.to_string())),
        };

        let response = match client
            .post(config.auth_url())
            .headers(headers)
            .body(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let message = describe_transport_error(&e);
                warn!(error = %message, "ERP login request failed");
                return Ok(Outcome::network(message));
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return Ok(Outcome::network(format!("failed to read response body: {e}"))),
        };

        let data = match Outcome::from_response(status, &body, ResponseContext::Login) {
            Outcome::Success { data } => data,
            rejected => {
                warn!(
                    status = rejected.status_code(),
                    kind = rejected.kind(),
                    "ERP login rejected"
                );
                return Ok(rejected);
            }
        };

        let Some(token) = extract_token(&data, &config.token_paths) else {
            warn!(status = status.as_u16(), "ERP login response carried no token");
            return Ok(Outcome::ClientError {
                status_code: status.as_u16(),
                message: "No token found in response".to_string(),
            });
        };

        let session = match SessionState::authenticated(&config.user_agent, token) {
            Ok(session) => session,
            Err(e) => {
                return Ok(Outcome::ClientError {
                    status_code: status.as_u16(),
                    message: e.to_string(),
                });
            }
        };
        self.replace_session(session).await;
        info!("authenticated against ERP API");
        debug!(email, "ERP session established");

        let profile = lookup_path(&data, PROFILE_PATH)
            .filter(|v| !v.is_null())
            .cloned()
            .unwrap_or_else(Outcome::empty_object);
        Ok(Outcome::success(profile))
    }

    /// Invalidates the token server-side and drops the local session.
    ///
    /// # Errors
    /// Returns local errors from resolving or executing the request.
    pub async fn logout(&self) -> Result<Outcome, ErpError> {
        let endpoint = registry::resolve("logout", &[])?;
        let outcome = self.execute(RequestSpec::new(Method::POST, endpoint)).await?;
        if outcome.is_success() {
            self.replace_session(SessionState::new(&self.config().user_agent)?)
                .await;
            info!("logged out of ERP API");
        }
        Ok(outcome)
    }
}

/// Follows a dotted path (`data.token`) through nested objects.
#[must_use]
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| current.get(key))
}

/// First non-empty string found at any of `paths`, in order.
#[must_use]
pub fn extract_token<'a>(body: &'a Value, paths: &[String]) -> Option<&'a str> {
    paths
        .iter()
        .filter_map(|path| lookup_path(body, path))
        .filter_map(Value::as_str)
        .find(|token| !token.trim().is_empty())
}
