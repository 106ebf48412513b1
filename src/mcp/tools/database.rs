//! Tools answered straight from the ERP database instead of the HTTP API.
//!
//! They are only registered when `ERP_DB_URL` is configured, and share the
//! HTTP tools' validation and rendering. Lists come back as JSON arrays,
//! possibly empty; single-record lookups report `NotFoundError` when nothing
//! matches.

use rmcp::handler::server::wrapper::Parameters;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::mcp::{
    db::{
        Database,
        queries::{self, EmployeeFilter, EmployeeKey},
    },
    error::ErpError,
    outcome::Outcome,
    tools::{
        dispatch::{date_range, positive_id, required_date},
        params::{DepartmentRequest, EmployeeRequest},
    },
};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct EmployeeLookupRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Employee ID; takes precedence over email")]
    pub employee_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Employee email address")]
    pub email: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct EmployeeSearchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Part of the employee's name")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Part of the department name")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Exact employment status, e.g. active")]
    pub status: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct CompanyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Company ID; omit to list every company")]
    pub company_id: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AttendanceRangeRequest {
    #[schemars(description = "Employee ID")]
    pub employee_id: u64,
    #[schemars(description = "First day of the range, in YYYY-MM-DD format")]
    pub start_date: String,
    #[schemars(description = "Last day of the range, in YYYY-MM-DD format")]
    pub end_date: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EmployeePerformanceRequest {
    #[schemars(description = "Employee ID")]
    pub employee_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Limit results to one performance cycle")]
    pub cycle_id: Option<u64>,
}

pub async fn get_employee_info(
    database: Option<&Database>,
    Parameters(args): Parameters<EmployeeLookupRequest>,
) -> Result<Outcome, ErpError> {
    let key = match (args.employee_id, non_blank(args.email)) {
        (Some(id), _) => EmployeeKey::Id(positive_id("employee_id", id)?),
        (None, Some(email)) => EmployeeKey::Email(email),
        (None, None) => {
            return Err(ErpError::validation(
                "Please provide either employee_id or email",
            ));
        }
    };
    connected(database)?
        .fetch_one("employee_info", queries::employee(key), "Employee not found")
        .await
}

pub async fn search_employees(
    database: Option<&Database>,
    Parameters(args): Parameters<EmployeeSearchRequest>,
) -> Result<Outcome, ErpError> {
    let filter = EmployeeFilter {
        name: non_blank(args.name),
        department: non_blank(args.department),
        status: non_blank(args.status),
    };
    Ok(connected(database)?
        .fetch_all("search_employees", queries::search_employees(filter))
        .await)
}

pub async fn get_company_info(
    database: Option<&Database>,
    Parameters(args): Parameters<CompanyRequest>,
) -> Result<Outcome, ErpError> {
    let database = connected(database)?;
    match args.company_id {
        Some(id) => {
            let id = positive_id("company_id", id)?;
            database
                .fetch_one("company", queries::companies(Some(id)), "Company not found")
                .await
        }
        None => Ok(database.fetch_all("companies", queries::companies(None)).await),
    }
}

pub async fn get_department_employees(
    database: Option<&Database>,
    Parameters(args): Parameters<DepartmentRequest>,
) -> Result<Outcome, ErpError> {
    let id = positive_id("department_id", args.department_id)?;
    Ok(connected(database)?
        .fetch_all("department_employees", queries::department_employees(id))
        .await)
}

pub async fn get_employee_attendance(
    database: Option<&Database>,
    Parameters(args): Parameters<AttendanceRangeRequest>,
) -> Result<Outcome, ErpError> {
    let id = positive_id("employee_id", args.employee_id)?;
    let (start, end) = date_range(
        required_date("start_date", &args.start_date)?,
        required_date("end_date", &args.end_date)?,
    )?;
    Ok(connected(database)?
        .fetch_all("employee_attendance", queries::employee_attendance(id, start, end))
        .await)
}

pub async fn get_employee_leave_history(
    database: Option<&Database>,
    Parameters(args): Parameters<EmployeeRequest>,
) -> Result<Outcome, ErpError> {
    let id = positive_id("employee_id", args.employee_id)?;
    Ok(connected(database)?
        .fetch_all("leave_history", queries::leave_history(id))
        .await)
}

pub async fn get_departments(database: Option<&Database>) -> Result<Outcome, ErpError> {
    Ok(connected(database)?
        .fetch_all("departments", queries::departments())
        .await)
}

pub async fn get_performance_cycles(database: Option<&Database>) -> Result<Outcome, ErpError> {
    Ok(connected(database)?
        .fetch_all("performance_cycles", queries::performance_cycles())
        .await)
}

pub async fn get_employee_performance(
    database: Option<&Database>,
    Parameters(args): Parameters<EmployeePerformanceRequest>,
) -> Result<Outcome, ErpError> {
    let id = positive_id("employee_id", args.employee_id)?;
    let cycle = args
        .cycle_id
        .map(|cycle| positive_id("cycle_id", cycle))
        .transpose()?;
    Ok(connected(database)?
        .fetch_all("employee_performance", queries::employee_performance(id, cycle))
        .await)
}

fn connected(database: Option<&Database>) -> Result<&Database, ErpError> {
    database.ok_or_else(|| {
        ErpError::Config("the database backend is not configured (set ERP_DB_URL)".to_string())
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
