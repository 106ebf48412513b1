//! Parameter sets shared by several tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct PageRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Page number, starting at 1 (default: 1)")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Items per page (default: 15, maximum: 100)")]
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EmployeeRequest {
    #[schemars(description = "Employee ID, e.g. 42")]
    pub employee_id: u64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DepartmentRequest {
    #[schemars(description = "Department ID")]
    pub department_id: u64,
}
