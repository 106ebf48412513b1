//! Request gateway: turns a resolved endpoint into exactly one HTTP call and
//! reduces whatever comes back to an [`Outcome`].

use std::sync::Arc;

use reqwest::{Method, Url};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::mcp::{
    config::ErpConfig,
    error::ErpError,
    http::{
        client::{build_client, describe_transport_error},
        registry::ResolvedEndpoint,
        session::SessionState,
    },
    outcome::{Outcome, ResponseContext},
};

/// One request, built per tool call and consumed by [`Gateway::execute`].
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub endpoint: ResolvedEndpoint,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestSpec {
    #[must_use]
    pub const fn new(method: Method, endpoint: ResolvedEndpoint) -> Self {
        Self {
            method,
            endpoint,
            query: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }
}

/// Gateway for one logical connection. Clones share the same session.
#[derive(Debug, Clone)]
pub struct Gateway {
    config: Arc<ErpConfig>,
    session: Arc<RwLock<SessionState>>,
}

impl Gateway {
    /// Creates a gateway with an unauthenticated session.
    ///
    /// # Errors
    /// Returns `ErpError::Config` if the configured user agent is not a valid
    /// header value.
    pub fn new(config: Arc<ErpConfig>) -> Result<Self, ErpError> {
        let session = SessionState::new(&config.user_agent)?;
        Ok(Self {
            config,
            session: Arc::new(RwLock::new(session)),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ErpConfig {
        &self.config
    }

    /// Snapshot of the session at call time.
    pub async fn session(&self) -> SessionState {
        self.session.read().await.clone()
    }

    pub(super) async fn replace_session(&self, state: SessionState) {
        *self.session.write().await = state;
    }

    /// Executes a single request.
    ///
    /// Backend and transport results are always `Ok(Outcome)`; only local
    /// failures that never touch the network come back as `Err`.
    ///
    /// # Errors
    /// * `Validation` - the method is not one of GET, POST, PUT, DELETE
    /// * `Config` - the base URL and endpoint path do not form a valid URL
    pub async fn execute(&self, spec: RequestSpec) -> Result<Outcome, ErpError> {
        let RequestSpec {
            method,
            endpoint,
            query,
            body,
        } = spec;

        let sends_body = match method {
            Method::GET | Method::DELETE => false,
            Method::POST | Method::PUT => true,
            other => {
                return Err(ErpError::validation(format!(
                    "Unsupported HTTP method: {other}"
                )));
            }
        };

        let session = self.session().await;
        if endpoint.requires_auth && !session.is_authenticated() {
            debug!(endpoint = endpoint.name, "refusing protected call without a session");
            return Ok(Outcome::AuthRequired);
        }

        let mut url = Url::parse(&self.config.url_for(&endpoint.path))
            .map_err(|e| ErpError::Config(format!("ERP_API_BASE_URL does not form a valid URL: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(&query);
        }

        let client = match build_client(self.config.timeout) {
            Ok(client) => client,
            Err(e) => return Ok(Outcome::network(e.to_string())),
        };

        let mut request = client
            .request(method.clone(), url)
            .headers(session.base_headers().clone());
        if sends_body {
            if let Some(body) = &body {
                request = request.body(serde_json::to_vec(body)?);
            }
        } else if body.is_some() {
            debug!(%method, endpoint = endpoint.name, "dropping body for bodiless method");
        }

        debug!(%method, endpoint = endpoint.name, path = %endpoint.path, "dispatching ERP API request");
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let message = describe_transport_error(&e);
                warn!(%method, endpoint = endpoint.name, error = %message, "ERP API request failed");
                return Ok(Outcome::network(message));
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return Ok(Outcome::network(format!("failed to read response body: {e}"))),
        };

        let outcome = Outcome::from_response(status, &bytes, ResponseContext::Resource);
        if outcome.is_success() {
            info!(%method, endpoint = endpoint.name, status = status.as_u16(), "ERP API request succeeded");
        } else {
            warn!(
                %method,
                endpoint = endpoint.name,
                status = status.as_u16(),
                kind = outcome.kind(),
                "ERP API request returned an error"
            );
        }
        Ok(outcome)
    }
}
