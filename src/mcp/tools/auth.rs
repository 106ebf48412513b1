//! Tools for starting and ending an ERP API session.

use rmcp::handler::server::wrapper::Parameters;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::mcp::{error::ErpError, http::Gateway, outcome::Outcome};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "User email. Falls back to ERP_DEFAULT_EMAIL when omitted.")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "User password. Falls back to ERP_DEFAULT_PASSWORD when omitted.")]
    pub password: Option<String>,
}

pub async fn authenticate_user(
    gateway: &Gateway,
    Parameters(args): Parameters<Credentials>,
) -> Result<Outcome, ErpError> {
    let config = gateway.config();
    let email = args
        .email
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| config.default_email.clone());
    let password = args
        .password
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| config.default_password.clone());

    if email.trim().is_empty() || password.is_empty() {
        return Err(ErpError::validation(
            "email and password are required (no defaults are configured)",
        ));
    }

    let outcome = gateway.authenticate(email.trim(), &password).await?;
    Ok(match outcome {
        Outcome::Success { data } => Outcome::success(json!({
            "message": "Authentication successful",
            "user": data,
        })),
        other => other,
    })
}

pub async fn logout_user(gateway: &Gateway) -> Result<Outcome, ErpError> {
    gateway.logout().await
}
