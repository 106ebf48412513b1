//! Tools for employee records: listing, lookup, CRUD and the per-employee
//! bank and company detail sub-resources.

use rmcp::handler::server::wrapper::Parameters;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::mcp::{
    error::ErpError,
    http::Gateway,
    outcome::Outcome,
    tools::{
        dispatch::{ToolCall, parse_payload, positive_id},
        params::EmployeeRequest,
    },
};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct EmployeeListRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Page number, starting at 1 (default: 1)")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Items per page (default: 15, maximum: 100)")]
    pub per_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Free-text search on employee name or email")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Employment status filter, e.g. active")]
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EmployeePayload {
    #[schemars(description = "JSON object (as text) with the employee fields to create")]
    pub employee_data: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateEmployeeRequest {
    #[schemars(description = "Employee ID")]
    pub employee_id: u64,
    #[schemars(description = "JSON object (as text) with the employee fields to update")]
    pub employee_data: String,
}

pub async fn get_employees(
    gateway: &Gateway,
    Parameters(args): Parameters<EmployeeListRequest>,
) -> Result<Outcome, ErpError> {
    ToolCall::get("employees")
        .paginate(args.page, args.per_page, gateway.config())?
        .filter("search", args.search.as_deref())
        .filter("status", args.status.as_deref())
        .send(gateway)
        .await
}

pub async fn get_employee_by_id(
    gateway: &Gateway,
    Parameters(args): Parameters<EmployeeRequest>,
) -> Result<Outcome, ErpError> {
    let id = positive_id("employee_id", args.employee_id)?;
    ToolCall::get("employee").path_param("id", id).send(gateway).await
}

pub async fn get_employee_summary(gateway: &Gateway) -> Result<Outcome, ErpError> {
    ToolCall::get("employee_summary").send(gateway).await
}

pub async fn create_employee(
    gateway: &Gateway,
    Parameters(args): Parameters<EmployeePayload>,
) -> Result<Outcome, ErpError> {
    let body = parse_payload("employee_data", &args.employee_data)?;
    ToolCall::post("employees", body).send(gateway).await
}

pub async fn update_employee(
    gateway: &Gateway,
    Parameters(args): Parameters<UpdateEmployeeRequest>,
) -> Result<Outcome, ErpError> {
    let id = positive_id("employee_id", args.employee_id)?;
    let body = parse_payload("employee_data", &args.employee_data)?;
    ToolCall::put("employee", body)
        .path_param("id", id)
        .send(gateway)
        .await
}

pub async fn delete_employee(
    gateway: &Gateway,
    Parameters(args): Parameters<EmployeeRequest>,
) -> Result<Outcome, ErpError> {
    let id = positive_id("employee_id", args.employee_id)?;
    ToolCall::delete("employee").path_param("id", id).send(gateway).await
}

pub async fn get_employee_bank_details(
    gateway: &Gateway,
    Parameters(args): Parameters<EmployeeRequest>,
) -> Result<Outcome, ErpError> {
    let id = positive_id("employee_id", args.employee_id)?;
    ToolCall::get("employee_bank_details")
        .path_param("id", id)
        .send(gateway)
        .await
}

pub async fn get_employee_company_details(
    gateway: &Gateway,
    Parameters(args): Parameters<EmployeeRequest>,
) -> Result<Outcome, ErpError> {
    let id = positive_id("employee_id", args.employee_id)?;
    ToolCall::get("employee_company_details")
        .path_param("id", id)
        .send(gateway)
        .await
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::{Value, json};

    use super::*;
    use crate::mcp::{
        testing::{gateway_for, signed_in},
        tools::dispatch::ToolReply,
    };

    #[tokio::test]
    async fn lookup_before_login_is_auth_required_without_a_request() {
        let mut server = mockito::Server::new_async().await;
        let untouched = server.mock("GET", Matcher::Any).expect(0).create_async().await;

        let gateway = gateway_for(&server);
        let reply = ToolReply::render(
            get_employee_by_id(&gateway, Parameters(EmployeeRequest { employee_id: 42 })).await,
        );

        assert_eq!(
            reply.text,
            "AuthRequired: Not authenticated. Please authenticate first."
        );
        assert!(reply.is_error);
        untouched.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_payloads_never_reach_the_gateway() {
        let mut server = mockito::Server::new_async().await;
        let gateway = signed_in(&mut server).await;
        let untouched = server.mock("POST", "/humanresource/employees").expect(0).create_async().await;

        let reply = ToolReply::render(
            create_employee(
                &gateway,
                Parameters(EmployeePayload {
                    employee_data: "{invalid json".to_string(),
                }),
            )
            .await,
        );

        assert!(reply.is_error);
        assert!(reply
            .text
            .starts_with("ValidationError: Invalid JSON format for employee_data: "));
        untouched.assert_async().await;
    }

    #[tokio::test]
    async fn listing_returns_the_backend_list_unmodified() {
        let mut server = mockito::Server::new_async().await;
        let gateway = signed_in(&mut server).await;
        let listing = json!([
            {"id": 1, "name": "Ada Lovelace", "email": "ada@example.com"},
            {"id": 2, "name": "Alan Turing", "email": "alan@example.com"}
        ]);
        let mock = server
            .mock("GET", "/humanresource/employees")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "2".into()),
                Matcher::UrlEncoded("per_page".into(), "10".into()),
            ]))
            .with_status(200)
            .with_body(listing.to_string())
            .create_async()
            .await;

        let reply = ToolReply::render(
            get_employees(
                &gateway,
                Parameters(EmployeeListRequest {
                    page: Some(2),
                    per_page: Some(10),
                    ..EmployeeListRequest::default()
                }),
            )
            .await,
        );

        assert!(!reply.is_error);
        assert_eq!(reply.text, serde_json::to_string_pretty(&listing).unwrap());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn listing_forwards_filters() {
        let mut server = mockito::Server::new_async().await;
        let gateway = signed_in(&mut server).await;
        let mock = server
            .mock("GET", "/humanresource/employees")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("per_page".into(), "15".into()),
                Matcher::UrlEncoded("search".into(), "ada lovelace".into()),
                Matcher::UrlEncoded("status".into(), "active".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"success":true,"data":[]}"#)
            .create_async()
            .await;

        let outcome = get_employees(
            &gateway,
            Parameters(EmployeeListRequest {
                search: Some("ada lovelace".to_string()),
                status: Some("active".to_string()),
                ..EmployeeListRequest::default()
            }),
        )
        .await
        .unwrap();

        assert!(outcome.is_success());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn update_puts_the_parsed_payload() {
        let mut server = mockito::Server::new_async().await;
        let gateway = signed_in(&mut server).await;
        let mock = server
            .mock("PUT", "/humanresource/employees/42")
            .match_body(Matcher::Json(json!({"phone": "555-0100"})))
            .with_status(200)
            .with_body(r#"{"success":true,"data":{"id":42,"phone":"555-0100"}}"#)
            .create_async()
            .await;

        let outcome = update_employee(
            &gateway,
            Parameters(UpdateEmployeeRequest {
                employee_id: 42,
                employee_data: r#"{"phone": "555-0100"}"#.to_string(),
            }),
        )
        .await
        .unwrap();

        assert!(outcome.is_success());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn delete_of_missing_employee_is_a_client_error() {
        let mut server = mockito::Server::new_async().await;
        let gateway = signed_in(&mut server).await;
        let _mock = server
            .mock("DELETE", "/humanresource/employees/9")
            .with_status(404)
            .with_body("{}")
            .create_async()
            .await;

        let reply = ToolReply::render(
            delete_employee(&gateway, Parameters(EmployeeRequest { employee_id: 9 })).await,
        );

        assert!(reply.is_error);
        assert_eq!(
            reply.text,
            "ClientError: The requested resource was not found."
        );
    }

    #[tokio::test]
    async fn sub_resources_use_their_own_templates() {
        let mut server = mockito::Server::new_async().await;
        let gateway = signed_in(&mut server).await;
        let bank = server
            .mock("GET", "/humanresource/employees/5/bank-details")
            .with_status(200)
            .with_body(r#"{"bank_name":"First Bank"}"#)
            .create_async()
            .await;
        let company = server
            .mock("GET", "/humanresource/employees/5/company-details")
            .with_status(200)
            .with_body(r#"{"employee_number":"E-0005"}"#)
            .create_async()
            .await;

        let bank_outcome =
            get_employee_bank_details(&gateway, Parameters(EmployeeRequest { employee_id: 5 }))
                .await
                .unwrap();
        let company_outcome =
            get_employee_company_details(&gateway, Parameters(EmployeeRequest { employee_id: 5 }))
                .await
                .unwrap();

        assert_eq!(bank_outcome, Outcome::success(json!({"bank_name": "First Bank"})));
        assert_eq!(
            company_outcome,
            Outcome::success(json!({"employee_number": "E-0005"}))
        );
        bank.assert_async().await;
        company.assert_async().await;
    }

    #[tokio::test]
    async fn zero_ids_fail_before_any_request() {
        let server = mockito::Server::new_async().await;
        let gateway = gateway_for(&server);
        let err = get_employee_by_id(&gateway, Parameters(EmployeeRequest { employee_id: 0 }))
            .await
            .unwrap_err();
        assert!(matches!(err, ErpError::Validation(_)));
    }

    #[tokio::test]
    async fn summary_success_round_trips_through_rendering() {
        let mut server = mockito::Server::new_async().await;
        let gateway = signed_in(&mut server).await;
        let summary = json!({"total": 120, "active": 110, "on_leave": 10});
        let _mock = server
            .mock("GET", "/humanresource/employees/summary")
            .with_status(200)
            .with_body(summary.to_string())
            .create_async()
            .await;

        let reply = ToolReply::render(get_employee_summary(&gateway).await);
        let parsed: Value = serde_json::from_str(&reply.text).unwrap();

        assert_eq!(parsed, summary);
    }
}
