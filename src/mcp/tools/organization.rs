//! Departments and branches.

use rmcp::handler::server::wrapper::Parameters;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::mcp::{
    error::ErpError,
    http::Gateway,
    outcome::Outcome,
    tools::{
        dispatch::{ToolCall, positive_id},
        params::{DepartmentRequest, PageRequest},
    },
};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct BranchRequest {
    #[schemars(description = "Branch ID")]
    pub branch_id: u64,
}

pub async fn get_departments(
    gateway: &Gateway,
    Parameters(args): Parameters<PageRequest>,
) -> Result<Outcome, ErpError> {
    ToolCall::get("departments")
        .paginate(args.page, args.per_page, gateway.config())?
        .send(gateway)
        .await
}

pub async fn get_department_by_id(
    gateway: &Gateway,
    Parameters(args): Parameters<DepartmentRequest>,
) -> Result<Outcome, ErpError> {
    let id = positive_id("department_id", args.department_id)?;
    ToolCall::get("department").path_param("id", id).send(gateway).await
}

pub async fn get_branches(
    gateway: &Gateway,
    Parameters(args): Parameters<PageRequest>,
) -> Result<Outcome, ErpError> {
    ToolCall::get("branches")
        .paginate(args.page, args.per_page, gateway.config())?
        .send(gateway)
        .await
}

pub async fn get_branch_by_id(
    gateway: &Gateway,
    Parameters(args): Parameters<BranchRequest>,
) -> Result<Outcome, ErpError> {
    let id = positive_id("branch_id", args.branch_id)?;
    ToolCall::get("branch").path_param("id", id).send(gateway).await
}
