//! Lookup and status configuration tables.

use rmcp::handler::server::wrapper::Parameters;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::mcp::{
    error::ErpError,
    http::Gateway,
    outcome::Outcome,
    tools::{dispatch::ToolCall, params::PageRequest},
};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct LookupConfigRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Only return lookups in this category, e.g. gender")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Page number, starting at 1 (default: 1)")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Items per page (default: 15, maximum: 100)")]
    pub per_page: Option<u32>,
}

pub async fn get_lookup_configs(
    gateway: &Gateway,
    Parameters(args): Parameters<LookupConfigRequest>,
) -> Result<Outcome, ErpError> {
    let call = match args.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(category) => {
            ToolCall::get("lookup_configs_by_category").path_param("category", category)
        }
        None => ToolCall::get("lookup_configs"),
    };
    call.paginate(args.page, args.per_page, gateway.config())?
        .send(gateway)
        .await
}

pub async fn get_status_configs(
    gateway: &Gateway,
    Parameters(args): Parameters<PageRequest>,
) -> Result<Outcome, ErpError> {
    ToolCall::get("status_configs")
        .paginate(args.page, args.per_page, gateway.config())?
        .send(gateway)
        .await
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;
    use crate::mcp::testing::signed_in;

    #[tokio::test]
    async fn category_selects_the_category_template() {
        let mut server = mockito::Server::new_async().await;
        let gateway = signed_in(&mut server).await;
        let mock = server
            .mock(
                "GET",
                Matcher::Regex(r"^/humanresource/lookup-configs/category/marital(%20| )status$".into()),
            )
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(r#"[{"value":"single"}]"#)
            .create_async()
            .await;

        let outcome = get_lookup_configs(
            &gateway,
            Parameters(LookupConfigRequest {
                category: Some("marital status".to_string()),
                ..LookupConfigRequest::default()
            }),
        )
        .await
        .unwrap();

        assert!(outcome.is_success());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn blank_category_lists_everything() {
        let mut server = mockito::Server::new_async().await;
        let gateway = signed_in(&mut server).await;
        let mock = server
            .mock("GET", "/humanresource/lookup-configs")
            .match_query(Matcher::UrlEncoded("per_page".into(), "50".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let outcome = get_lookup_configs(
            &gateway,
            Parameters(LookupConfigRequest {
                category: Some("   ".to_string()),
                page: None,
                per_page: Some(50),
            }),
        )
        .await
        .unwrap();

        assert!(outcome.is_success());
        mock.assert_async().await;
    }
}
