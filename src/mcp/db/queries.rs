//! Parameterized statements for the database tools.
//!
//! Caller input only ever reaches MySQL through `push_bind`. Tables with a
//! `deleted_at` column are filtered to live rows.

use chrono::NaiveDate;
use sqlx::{MySql, QueryBuilder};

pub type Statement = QueryBuilder<'static, MySql>;

/// Upper bound on rows returned by an employee search.
pub const SEARCH_LIMIT: u32 = 50;

const EMPLOYEE_DETAIL: &str = "
    SELECT e.*, ecd.employee_number, ecd.branch_id, ecd.department_id,
           ecd.designation_id, ecd.company_join_date, ecd.status,
           b.name AS branch_name, d.name AS department_name, des.name AS designation_name
    FROM employees e
    LEFT JOIN employee_company_details ecd ON e.id = ecd.employee_id
    LEFT JOIN branch b ON ecd.branch_id = b.id
    LEFT JOIN department d ON ecd.department_id = d.id
    LEFT JOIN designation des ON ecd.designation_id = des.id
    WHERE e.deleted_at IS NULL";

const EMPLOYEE_SEARCH: &str = "
    SELECT e.id, e.name, e.email, e.phone, ecd.employee_number,
           ecd.status, d.name AS department_name, des.name AS designation_name
    FROM employees e
    LEFT JOIN employee_company_details ecd ON e.id = ecd.employee_id
    LEFT JOIN department d ON ecd.department_id = d.id
    LEFT JOIN designation des ON ecd.designation_id = des.id
    WHERE e.deleted_at IS NULL";

const COMPANY_DETAIL: &str = "SELECT * FROM companies WHERE deleted_at IS NULL";

const COMPANY_LIST: &str = "
    SELECT id, name, legal_name, industry, type, size, founded_year, email, phone
    FROM companies
    WHERE deleted_at IS NULL
    ORDER BY name";

const DEPARTMENT_EMPLOYEES: &str = "
    SELECT e.id, e.name, e.email, e.phone, ecd.employee_number,
           ecd.company_join_date, ecd.status, des.name AS designation_name
    FROM employees e
    JOIN employee_company_details ecd ON e.id = ecd.employee_id
    LEFT JOIN designation des ON ecd.designation_id = des.id
    WHERE e.deleted_at IS NULL";

const ATTENDANCE: &str = "
    SELECT date, status, clock_in, clock_out, late, early_leaving, overtime
    FROM attendance";

// `leave` is a reserved word in MySQL.
const LEAVE_HISTORY: &str = "
    SELECT l.*, lt.name AS leave_type_name
    FROM `leave` l
    LEFT JOIN leave_type lt ON l.leave_type_id = lt.id";

const DEPARTMENTS: &str = "
    SELECT d.*, b.name AS branch_name, c.name AS company_name
    FROM department d
    LEFT JOIN branch b ON d.branch_id = b.id
    LEFT JOIN companies c ON b.company_id = c.id
    WHERE d.deleted_at IS NULL
    ORDER BY c.name, b.name, d.name";

const PERFORMANCE_CYCLES: &str = "
    SELECT pc.*, lc.lookup_value AS category_name, sc.status_name
    FROM performance_cycles pc
    LEFT JOIN lookup_config lc ON pc.category_id = lc.id
    LEFT JOIN status_config sc ON pc.status_id = sc.id
    WHERE pc.deleted_at IS NULL
    ORDER BY pc.start_date DESC";

const EMPLOYEE_PERFORMANCE: &str = "
    SELECT ep.*, pc.cycle_name, pt.template_name, sc.status_name
    FROM employee_performance ep
    LEFT JOIN performance_cycles pc ON ep.cycle_id = pc.id
    LEFT JOIN performance_templates pt ON ep.template_id = pt.id
    LEFT JOIN status_config sc ON ep.status_id = sc.id";

/// How a single employee is looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeKey {
    Id(u64),
    Email(String),
}

/// Optional, already-trimmed search criteria. Name and department match
/// partially; status matches exactly.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub name: Option<String>,
    pub department: Option<String>,
    pub status: Option<String>,
}

#[must_use]
pub fn employee(key: EmployeeKey) -> Statement {
    let mut statement = QueryBuilder::new(EMPLOYEE_DETAIL);
    match key {
        EmployeeKey::Id(id) => statement.push(" AND e.id = ").push_bind(id),
        EmployeeKey::Email(email) => statement.push(" AND e.email = ").push_bind(email),
    };
    statement
}

#[must_use]
pub fn search_employees(filter: EmployeeFilter) -> Statement {
    let mut statement = QueryBuilder::new(EMPLOYEE_SEARCH);
    if let Some(name) = filter.name {
        statement.push(" AND e.name LIKE ").push_bind(format!("%{name}%"));
    }
    if let Some(department) = filter.department {
        statement
            .push(" AND d.name LIKE ")
            .push_bind(format!("%{department}%"));
    }
    if let Some(status) = filter.status {
        statement.push(" AND ecd.status = ").push_bind(status);
    }
    statement.push(format_args!(" ORDER BY e.name LIMIT {SEARCH_LIMIT}"));
    statement
}

/// One company by id, or a summary of every live company.
#[must_use]
pub fn companies(company_id: Option<u64>) -> Statement {
    match company_id {
        Some(id) => {
            let mut statement = QueryBuilder::new(COMPANY_DETAIL);
            statement.push(" AND id = ").push_bind(id);
            statement
        }
        None => QueryBuilder::new(COMPANY_LIST),
    }
}

#[must_use]
pub fn department_employees(department_id: u64) -> Statement {
    let mut statement = QueryBuilder::new(DEPARTMENT_EMPLOYEES);
    statement
        .push(" AND ecd.department_id = ")
        .push_bind(department_id)
        .push(" ORDER BY e.name");
    statement
}

/// Attendance for one employee between two dates, inclusive, newest first.
#[must_use]
pub fn employee_attendance(employee_id: u64, start: NaiveDate, end: NaiveDate) -> Statement {
    let mut statement = QueryBuilder::new(ATTENDANCE);
    statement
        .push(" WHERE employee_id = ")
        .push_bind(employee_id)
        .push(" AND date BETWEEN ")
        .push_bind(start)
        .push(" AND ")
        .push_bind(end)
        .push(" ORDER BY date DESC");
    statement
}

#[must_use]
pub fn leave_history(employee_id: u64) -> Statement {
    let mut statement = QueryBuilder::new(LEAVE_HISTORY);
    statement
        .push(" WHERE l.employee_id = ")
        .push_bind(employee_id)
        .push(" ORDER BY l.applied_on DESC");
    statement
}

#[must_use]
pub fn departments() -> Statement {
    QueryBuilder::new(DEPARTMENTS)
}

#[must_use]
pub fn performance_cycles() -> Statement {
    QueryBuilder::new(PERFORMANCE_CYCLES)
}

/// Performance records for an employee, optionally within one cycle.
#[must_use]
pub fn employee_performance(employee_id: u64, cycle_id: Option<u64>) -> Statement {
    let mut statement = QueryBuilder::new(EMPLOYEE_PERFORMANCE);
    statement.push(" WHERE ep.employee_id = ").push_bind(employee_id);
    if let Some(cycle_id) = cycle_id {
        statement.push(" AND ep.cycle_id = ").push_bind(cycle_id);
    }
    statement.push(" ORDER BY pc.start_date DESC");
    statement
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholders(statement: &Statement) -> usize {
        statement.sql().matches('?').count()
    }

    #[test]
    fn employee_lookups_bind_their_key() {
        let by_id = employee(EmployeeKey::Id(42));
        assert!(by_id.sql().contains("e.deleted_at IS NULL AND e.id = ?"));
        assert_eq!(placeholders(&by_id), 1);

        let by_email = employee(EmployeeKey::Email("ada@acme.test".to_string()));
        assert!(by_email.sql().ends_with("AND e.email = ?"));
        assert!(!by_email.sql().contains("ada@acme.test"));
    }

    #[test]
    fn search_only_adds_the_filters_that_were_given() {
        let everyone = search_employees(EmployeeFilter::default());
        assert_eq!(placeholders(&everyone), 0);
        assert!(everyone.sql().ends_with("ORDER BY e.name LIMIT 50"));

        let filtered = search_employees(EmployeeFilter {
            name: Some("O'Brien".to_string()),
            department: None,
            status: Some("active".to_string()),
        });
        let sql = filtered.sql();
        assert_eq!(placeholders(&filtered), 2);
        assert!(sql.contains("AND e.name LIKE ?"));
        assert!(sql.contains("AND ecd.status = ?"));
        assert!(!sql.contains("d.name LIKE"));
        assert!(!sql.contains("O'Brien"));
    }

    #[test]
    fn soft_deleted_rows_are_excluded() {
        for statement in [
            employee(EmployeeKey::Id(1)),
            search_employees(EmployeeFilter::default()),
            companies(None),
            companies(Some(1)),
            department_employees(3),
            departments(),
            performance_cycles(),
        ] {
            assert!(statement.sql().contains("deleted_at IS NULL"), "{}", statement.sql());
        }
    }

    #[test]
    fn attendance_binds_the_id_and_both_dates() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let statement = employee_attendance(7, start, end);
        assert_eq!(placeholders(&statement), 3);
        assert!(statement.sql().contains("date BETWEEN ? AND ?"));
    }

    #[test]
    fn performance_cycle_filter_is_optional() {
        assert_eq!(placeholders(&employee_performance(7, None)), 1);
        let in_cycle = employee_performance(7, Some(2));
        assert_eq!(placeholders(&in_cycle), 2);
        assert!(in_cycle.sql().contains("AND ep.cycle_id = ?"));
    }

    #[test]
    fn leave_table_name_is_quoted() {
        assert!(leave_history(7).sql().contains("FROM `leave` l"));
    }
}
