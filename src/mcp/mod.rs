//! ERP human-resource API exposed over the Model Context Protocol.
//!
//! The implementation is organized into:
//!
//! - `config`: environment-driven settings
//! - `error`: local error types
//! - `outcome`: the canonical result every backend call reduces to
//! - `http`: endpoint registry, session, authentication and request gateway
//! - `db`: optional read-only MySQL backend
//! - `tools`: one MCP tool per ERP operation
//!
//! The main entry point is `ErpApiMCPFactory`. The server builds one factory
//! per MCP session, and each factory owns its own gateway, so every client
//! authenticates independently. The database pool is shared between
//! sessions; its `db_*` tools are registered only when it is configured.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod outcome;
pub mod tools;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use axum::http::request;
use rmcp::{
    ErrorData, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Implementation, InitializeRequestParam, InitializeResult,
        ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use tracing::info;

use crate::mcp::{
    config::ERP_CONFIG,
    db::Database,
    error::ErpError,
    http::Gateway,
    tools::{
        attendance::{self, CheckInRequest, EmployeeAttendanceRequest},
        auth::{self, Credentials},
        configs::{self, LookupConfigRequest},
        database::{
            self, AttendanceRangeRequest, CompanyRequest, EmployeeLookupRequest,
            EmployeePerformanceRequest, EmployeeSearchRequest,
        },
        dispatch::ToolReply,
        employees::{self, EmployeeListRequest, EmployeePayload, UpdateEmployeeRequest},
        organization::{self, BranchRequest},
        params::{DepartmentRequest, EmployeeRequest, PageRequest},
        performance::{self, AppraisalRequest, GoalRequest, PerformanceRequest},
    },
};

#[derive(Clone)]
pub struct ErpApiMCPFactory {
    gateway: Gateway,
    database: Option<Database>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ErpApiMCPFactory {
    /// Creates a factory with a fresh, unauthenticated gateway and, when
    /// given, the shared database handle.
    ///
    /// # Errors
    /// Fails fast if the process configuration could not be loaded.
    pub fn new(database: Option<Database>) -> Result<Self, ErpError> {
        let config = ERP_CONFIG
            .as_ref()
            .map_err(|e| ErpError::Config(e.to_string()))?;
        let gateway = Gateway::new(Arc::new(config.clone()))?;
        Ok(Self::with_backends(gateway, database))
    }

    /// Creates a factory around an existing gateway, without database tools.
    pub fn with_gateway(gateway: Gateway) -> Self {
        Self::with_backends(gateway, None)
    }

    pub fn with_backends(gateway: Gateway, database: Option<Database>) -> Self {
        let tool_router = if database.is_some() {
            Self::tool_router() + Self::database_router()
        } else {
            Self::tool_router()
        };
        Self {
            gateway,
            database,
            tool_router,
        }
    }

    // Thin delegating methods so the `tool_router` proc-macro can discover
    // the tools. The requests themselves live in `mcp::tools::*`; failures
    // come back as error results, never as protocol errors.

    #[tool(
        description = "Authenticate with the ERP API using email and password. Must be called before any other tool. Omitted credentials fall back to the server's configured defaults."
    )]
    async fn authenticate_user(
        &self,
        params: Parameters<Credentials>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(auth::authenticate_user(&self.gateway, params).await).into())
    }

    #[tool(description = "End the current ERP API session and discard the stored token.")]
    async fn logout_user(&self) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(auth::logout_user(&self.gateway).await).into())
    }

    #[tool(description = "Get a paginated list of employees, optionally filtered by a search term or employment status.")]
    async fn get_employees(
        &self,
        params: Parameters<EmployeeListRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(employees::get_employees(&self.gateway, params).await).into())
    }

    #[tool(description = "Get a single employee by their employee ID.")]
    async fn get_employee_by_id(
        &self,
        params: Parameters<EmployeeRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(employees::get_employee_by_id(&self.gateway, params).await).into())
    }

    #[tool(description = "Get employee summary statistics (headcount by status and similar).")]
    async fn get_employee_summary(&self) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(employees::get_employee_summary(&self.gateway).await).into())
    }

    #[tool(description = "Create a new employee. employee_data is a JSON object encoded as text.")]
    async fn create_employee(
        &self,
        params: Parameters<EmployeePayload>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(employees::create_employee(&self.gateway, params).await).into())
    }

    #[tool(description = "Update an existing employee. employee_data is a JSON object encoded as text holding the fields to change.")]
    async fn update_employee(
        &self,
        params: Parameters<UpdateEmployeeRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(employees::update_employee(&self.gateway, params).await).into())
    }

    #[tool(description = "Delete an employee by their employee ID.")]
    async fn delete_employee(
        &self,
        params: Parameters<EmployeeRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(employees::delete_employee(&self.gateway, params).await).into())
    }

    #[tool(description = "Get the bank details on file for an employee.")]
    async fn get_employee_bank_details(
        &self,
        params: Parameters<EmployeeRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(employees::get_employee_bank_details(&self.gateway, params).await).into())
    }

    #[tool(description = "Get company details (employee number, branch, department, designation, join date) for an employee.")]
    async fn get_employee_company_details(
        &self,
        params: Parameters<EmployeeRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(
            ToolReply::render(employees::get_employee_company_details(&self.gateway, params).await)
                .into(),
        )
    }

    #[tool(description = "Get a paginated list of departments.")]
    async fn get_departments(
        &self,
        params: Parameters<PageRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(organization::get_departments(&self.gateway, params).await).into())
    }

    #[tool(description = "Get a single department by its ID.")]
    async fn get_department_by_id(
        &self,
        params: Parameters<DepartmentRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(organization::get_department_by_id(&self.gateway, params).await).into())
    }

    #[tool(description = "Get a paginated list of branches.")]
    async fn get_branches(
        &self,
        params: Parameters<PageRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(organization::get_branches(&self.gateway, params).await).into())
    }

    #[tool(description = "Get a single branch by its ID.")]
    async fn get_branch_by_id(
        &self,
        params: Parameters<BranchRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(organization::get_branch_by_id(&self.gateway, params).await).into())
    }

    #[tool(description = "Get a paginated list of attendance records.")]
    async fn get_attendances(
        &self,
        params: Parameters<PageRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(attendance::get_attendances(&self.gateway, params).await).into())
    }

    #[tool(description = "Get attendance records for one employee, optionally limited to a YYYY-MM-DD date range.")]
    async fn get_attendance_by_employee(
        &self,
        params: Parameters<EmployeeAttendanceRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(attendance::get_attendance_by_employee(&self.gateway, params).await).into())
    }

    #[tool(description = "Get attendance summary statistics.")]
    async fn get_attendance_summary(&self) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(attendance::get_attendance_summary(&self.gateway).await).into())
    }

    #[tool(description = "Check in an employee, optionally recording a location.")]
    async fn check_in_employee(
        &self,
        params: Parameters<CheckInRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(attendance::check_in_employee(&self.gateway, params).await).into())
    }

    #[tool(description = "Check out an employee.")]
    async fn check_out_employee(
        &self,
        params: Parameters<EmployeeRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(attendance::check_out_employee(&self.gateway, params).await).into())
    }

    #[tool(description = "Get a paginated list of performance cycles.")]
    async fn get_performance_cycles(
        &self,
        params: Parameters<PageRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(performance::get_performance_cycles(&self.gateway, params).await).into())
    }

    #[tool(description = "Get the currently active performance cycle.")]
    async fn get_current_active_cycle(&self) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(performance::get_current_active_cycle(&self.gateway).await).into())
    }

    #[tool(description = "Get a paginated list of employee performance records.")]
    async fn get_employee_performances(
        &self,
        params: Parameters<PageRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(performance::get_employee_performances(&self.gateway, params).await).into())
    }

    #[tool(description = "Get a single employee performance record by its ID.")]
    async fn get_employee_performance_by_id(
        &self,
        params: Parameters<PerformanceRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(
            ToolReply::render(
                performance::get_employee_performance_by_id(&self.gateway, params).await,
            )
            .into(),
        )
    }

    #[tool(description = "Get a paginated list of goal trackings.")]
    async fn get_goal_trackings(
        &self,
        params: Parameters<PageRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(performance::get_goal_trackings(&self.gateway, params).await).into())
    }

    #[tool(description = "Get a single goal tracking by its ID.")]
    async fn get_goal_tracking_by_id(
        &self,
        params: Parameters<GoalRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(performance::get_goal_tracking_by_id(&self.gateway, params).await).into())
    }

    #[tool(description = "Get a paginated list of appraisals.")]
    async fn get_appraisals(
        &self,
        params: Parameters<PageRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(performance::get_appraisals(&self.gateway, params).await).into())
    }

    #[tool(description = "Get a single appraisal by its ID.")]
    async fn get_appraisal_by_id(
        &self,
        params: Parameters<AppraisalRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(performance::get_appraisal_by_id(&self.gateway, params).await).into())
    }

    #[tool(description = "Get a paginated list of KPI management records.")]
    async fn get_kpi_management(
        &self,
        params: Parameters<PageRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(performance::get_kpi_management(&self.gateway, params).await).into())
    }

    #[tool(description = "Get the KPIs defined for a department.")]
    async fn get_kpi_by_department(
        &self,
        params: Parameters<DepartmentRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(performance::get_kpi_by_department(&self.gateway, params).await).into())
    }

    #[tool(description = "Get lookup configurations, optionally limited to one category.")]
    async fn get_lookup_configs(
        &self,
        params: Parameters<LookupConfigRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(configs::get_lookup_configs(&self.gateway, params).await).into())
    }

    #[tool(description = "Get a paginated list of status configurations.")]
    async fn get_status_configs(
        &self,
        params: Parameters<PageRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(configs::get_status_configs(&self.gateway, params).await).into())
    }
}

// Registered only when a database is configured; names carry a `db_` prefix
// so they never shadow the HTTP tools.
#[tool_router(router = database_router)]
impl ErpApiMCPFactory {
    #[tool(description = "Look up one employee directly in the ERP database by ID or email, with branch, department and designation names.")]
    async fn db_get_employee_info(
        &self,
        params: Parameters<EmployeeLookupRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(database::get_employee_info(self.database.as_ref(), params).await).into())
    }

    #[tool(description = "Search employees in the ERP database by partial name, partial department name or exact status. Returns at most 50 rows.")]
    async fn db_search_employees(
        &self,
        params: Parameters<EmployeeSearchRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(database::search_employees(self.database.as_ref(), params).await).into())
    }

    #[tool(description = "Get one company from the ERP database, or every company when no ID is given.")]
    async fn db_get_company_info(
        &self,
        params: Parameters<CompanyRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(database::get_company_info(self.database.as_ref(), params).await).into())
    }

    #[tool(description = "List the employees of a department from the ERP database.")]
    async fn db_get_department_employees(
        &self,
        params: Parameters<DepartmentRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(
            ToolReply::render(
                database::get_department_employees(self.database.as_ref(), params).await,
            )
            .into(),
        )
    }

    #[tool(description = "Get an employee's attendance between two YYYY-MM-DD dates (inclusive) from the ERP database.")]
    async fn db_get_employee_attendance(
        &self,
        params: Parameters<AttendanceRangeRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(
            ToolReply::render(
                database::get_employee_attendance(self.database.as_ref(), params).await,
            )
            .into(),
        )
    }

    #[tool(description = "Get an employee's leave history, newest first, from the ERP database.")]
    async fn db_get_employee_leave_history(
        &self,
        params: Parameters<EmployeeRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(
            ToolReply::render(
                database::get_employee_leave_history(self.database.as_ref(), params).await,
            )
            .into(),
        )
    }

    #[tool(description = "List every department with its branch and company from the ERP database.")]
    async fn db_get_departments(&self) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(database::get_departments(self.database.as_ref()).await).into())
    }

    #[tool(description = "List performance cycles, newest first, from the ERP database.")]
    async fn db_get_performance_cycles(&self) -> Result<CallToolResult, ErrorData> {
        Ok(ToolReply::render(database::get_performance_cycles(self.database.as_ref()).await).into())
    }

    #[tool(description = "Get an employee's performance records from the ERP database, optionally for one cycle.")]
    async fn db_get_employee_performance(
        &self,
        params: Parameters<EmployeePerformanceRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(
            ToolReply::render(
                database::get_employee_performance(self.database.as_ref(), params).await,
            )
            .into(),
        )
    }
}

#[tool_handler]
impl ServerHandler for ErpApiMCPFactory {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "ERP human-resource MCP server. Call authenticate_user first; every other tool requires an authenticated session."
                    .to_string(),
            ),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, ErrorData> {
        if let Some(http_request_part) = context.extensions.get::<request::Parts>() {
            let initialize_uri = &http_request_part.uri;
            info!(%initialize_uri, "initialize from http server");
        }
        Ok(self.get_info())
    }
}
