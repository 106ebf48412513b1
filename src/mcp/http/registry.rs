//! Static registry of ERP endpoint templates.
//!
//! Templates are paths relative to the configured base URL and may contain
//! `{name}` placeholders. Placeholder values are percent-encoded as single
//! path segments when a template is resolved.

use url::form_urlencoded;

use crate::mcp::error::ErpError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointTemplate {
    pub name: &'static str,
    pub path_template: &'static str,
    pub requires_auth: bool,
}

/// A template with every placeholder filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub name: &'static str,
    pub path: String,
    pub requires_auth: bool,
}

const fn protected(name: &'static str, path_template: &'static str) -> EndpointTemplate {
    EndpointTemplate {
        name,
        path_template,
        requires_auth: true,
    }
}

pub static ENDPOINTS: &[EndpointTemplate] = &[
    protected("logout", "/auth/logout"),
    // Employees
    protected("employees", "/humanresource/employees"),
    protected("employee", "/humanresource/employees/{id}"),
    protected("employee_summary", "/humanresource/employees/summary"),
    protected("employee_bank_details", "/humanresource/employees/{id}/bank-details"),
    protected("employee_company_details", "/humanresource/employees/{id}/company-details"),
    // Organization
    protected("departments", "/humanresource/departments"),
    protected("department", "/humanresource/departments/{id}"),
    protected("branches", "/humanresource/branches"),
    protected("branch", "/humanresource/branches/{id}"),
    // Attendance
    protected("attendances", "/humanresource/attendances"),
    protected("attendance_summary", "/humanresource/attendances/summary"),
    protected("employee_attendance", "/humanresource/attendances/employee/{id}"),
    protected("check_in", "/humanresource/attendances/check-in"),
    protected("check_out", "/humanresource/attendances/check-out"),
    // Performance
    protected("performance_cycles", "/humanresource/performance-cycles"),
    protected("current_active_cycle", "/humanresource/performance-cycles/current-active"),
    protected("employee_performances", "/humanresource/employee-performances"),
    protected("employee_performance", "/humanresource/employee-performances/{id}"),
    protected("goal_trackings", "/humanresource/goal-trackings"),
    protected("goal_tracking", "/humanresource/goal-trackings/{id}"),
    protected("appraisals", "/humanresource/appraisals"),
    protected("appraisal", "/humanresource/appraisals/{id}"),
    protected("kpi_management", "/humanresource/kpi-management"),
    protected("department_kpis", "/humanresource/kpi-management/department/{id}"),
    // Configuration lookups
    protected("lookup_configs", "/humanresource/lookup-configs"),
    protected("lookup_configs_by_category", "/humanresource/lookup-configs/category/{category}"),
    protected("status_configs", "/humanresource/status-configs"),
];

#[must_use]
pub fn template(name: &str) -> Option<&'static EndpointTemplate> {
    ENDPOINTS.iter().find(|t| t.name == name)
}

/// Resolves a named template against the supplied path parameters.
///
/// # Errors
/// * `NotFound` - no template is registered under `name`
/// * `Validation` - a placeholder has no (or an empty) value, or the template
///   is malformed
pub fn resolve(name: &str, path_params: &[(&str, String)]) -> Result<ResolvedEndpoint, ErpError> {
    let template =
        template(name).ok_or_else(|| ErpError::NotFound(format!("Unknown endpoint: {name}")))?;

    let mut path = String::with_capacity(template.path_template.len());
    let mut rest = template.path_template;
    while let Some((head, tail)) = rest.split_once('{') {
        path.push_str(head);
        let (key, after) = tail.split_once('}').ok_or_else(|| {
            ErpError::validation(format!("Unterminated placeholder in endpoint `{name}`"))
        })?;
        let value = path_params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                ErpError::validation(format!(
                    "Missing path parameter `{key}` for endpoint `{name}`"
                ))
            })?;
        path.push_str(&encode_segment(value));
        rest = after;
    }
    path.push_str(rest);

    Ok(ResolvedEndpoint {
        name: template.name,
        path,
        requires_auth: template.requires_auth,
    })
}

/// Percent-encodes a value for use as one path segment. The form encoder
/// turns spaces into `+` and escapes literal `+`, so swapping `+` for `%20`
/// afterwards is lossless.
fn encode_segment(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
