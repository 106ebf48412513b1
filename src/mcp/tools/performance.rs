//! Performance management: cycles, employee performances, goal trackings,
//! appraisals and KPIs.

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
pub struct PerformanceRequest {
    #[schemars(description = "Employee performance record ID")]
    pub performance_id: u64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GoalRequest {
    #[schemars(description = "Goal tracking ID")]
    pub goal_id: u64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AppraisalRequest {
    #[schemars(description = "Appraisal ID")]
    pub appraisal_id: u64,
}

async fn list(gateway: &Gateway, endpoint: &str, page: PageRequest) -> Result<Outcome, ErpError> {
    ToolCall::get(endpoint)
        .paginate(page.page, page.per_page, gateway.config())?
        .send(gateway)
        .await
}

async fn by_id(
    gateway: &Gateway,
    endpoint: &str,
    field: &str,
    id: u64,
) -> Result<Outcome, ErpError> {
    let id = positive_id(field, id)?;
    ToolCall::get(endpoint).path_param("id", id).send(gateway).await
}

pub async fn get_performance_cycles(
    gateway: &Gateway,
    Parameters(args): Parameters<PageRequest>,
) -> Result<Outcome, ErpError> {
    list(gateway, "performance_cycles", args).await
}

pub async fn get_current_active_cycle(gateway: &Gateway) -> Result<Outcome, ErpError> {
    ToolCall::get("current_active_cycle").send(gateway).await
}

pub async fn get_employee_performances(
    gateway: &Gateway,
    Parameters(args): Parameters<PageRequest>,
) -> Result<Outcome, ErpError> {
    list(gateway, "employee_performances", args).await
}

pub async fn get_employee_performance_by_id(
    gateway: &Gateway,
    Parameters(args): Parameters<PerformanceRequest>,
) -> Result<Outcome, ErpError> {
    by_id(gateway, "employee_performance", "performance_id", args.performance_id).await
}

pub async fn get_goal_trackings(
    gateway: &Gateway,
    Parameters(args): Parameters<PageRequest>,
) -> Result<Outcome, ErpError> {
    list(gateway, "goal_trackings", args).await
}

pub async fn get_goal_tracking_by_id(
    gateway: &Gateway,
    Parameters(args): Parameters<GoalRequest>,
) -> Result<Outcome, ErpError> {
    by_id(gateway, "goal_tracking", "goal_id", args.goal_id).await
}

pub async fn get_appraisals(
    gateway: &Gateway,
    Parameters(args): Parameters<PageRequest>,
) -> Result<Outcome, ErpError> {
    list(gateway, "appraisals", args).await
}

pub async fn get_appraisal_by_id(
    gateway: &Gateway,
    Parameters(args): Parameters<AppraisalRequest>,
) -> Result<Outcome, ErpError> {
    by_id(gateway, "appraisal", "appraisal_id", args.appraisal_id).await
}

pub async fn get_kpi_management(
    gateway: &Gateway,
    Parameters(args): Parameters<PageRequest>,
) -> Result<Outcome, ErpError> {
    list(gateway, "kpi_management", args).await
}

pub async fn get_kpi_by_department(
    gateway: &Gateway,
    Parameters(args): Parameters<DepartmentRequest>,
) -> Result<Outcome, ErpError> {
    by_id(gateway, "department_kpis", "department_id", args.department_id).await
}
