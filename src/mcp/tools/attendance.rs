//! Attendance records, summaries and check-in/check-out.

use rmcp::handler::server::wrapper::Parameters;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::mcp::{
    error::ErpError,
    http::Gateway,
    outcome::Outcome,
    tools::{
        dispatch::{DATE_FORMAT, ToolCall, date_range, parse_date, positive_id},
        params::{EmployeeRequest, PageRequest},
    },
};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EmployeeAttendanceRequest {
    #[schemars(description = "Employee ID")]
    pub employee_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Only records on or after this date, in YYYY-MM-DD format")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Only records on or before this date, in YYYY-MM-DD format")]
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CheckInRequest {
    #[schemars(description = "Employee ID")]
    pub employee_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Optional location of the check-in, e.g. Head Office")]
    pub location: Option<String>,
}

pub async fn get_attendances(
    gateway: &Gateway,
    Parameters(args): Parameters<PageRequest>,
) -> Result<Outcome, ErpError> {
    ToolCall::get("attendances")
        .paginate(args.page, args.per_page, gateway.config())?
        .send(gateway)
        .await
}

pub async fn get_attendance_by_employee(
    gateway: &Gateway,
    Parameters(args): Parameters<EmployeeAttendanceRequest>,
) -> Result<Outcome, ErpError> {
    let id = positive_id("employee_id", args.employee_id)?;
    let start = parse_date("start_date", args.start_date.as_deref())?;
    let end = parse_date("end_date", args.end_date.as_deref())?;
    if let (Some(start), Some(end)) = (start, end) {
        date_range(start, end)?;
    }

    let mut call = ToolCall::get("employee_attendance").path_param("id", id);
    if let Some(start) = start {
        call = call.query("start_date", start.format(DATE_FORMAT));
    }
    if let Some(end) = end {
        call = call.query("end_date", end.format(DATE_FORMAT));
    }
    call.send(gateway).await
}

pub async fn get_attendance_summary(gateway: &Gateway) -> Result<Outcome, ErpError> {
    ToolCall::get("attendance_summary").send(gateway).await
}

pub async fn check_in_employee(
    gateway: &Gateway,
    Parameters(args): Parameters<CheckInRequest>,
) -> Result<Outcome, ErpError> {
    let id = positive_id("employee_id", args.employee_id)?;
    let mut body = json!({ "employee_id": id });
    if let Some(location) = args.location.filter(|l| !l.trim().is_empty()) {
        body["location"] = json!(location);
    }
    ToolCall::post("check_in", body).send(gateway).await
}

pub async fn check_out_employee(
    gateway: &Gateway,
    Parameters(args): Parameters<EmployeeRequest>,
) -> Result<Outcome, ErpError> {
    let id = positive_id("employee_id", args.employee_id)?;
    ToolCall::post("check_out", json!({ "employee_id": id }))
        .send(gateway)
        .await
}
