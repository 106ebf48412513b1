//! Plumbing shared by every tool: request building, parameter checks and
//! rendering an [`Outcome`] as the single text payload a tool returns.

use chrono::NaiveDate;
use rmcp::model::{CallToolResult, Content};
use serde_json::Value;

use crate::mcp::{
    config::ErpConfig,
    error::ErpError,
    http::{Gateway, Method, RequestSpec, resolve},
    outcome::Outcome,
};

/// A tool's request before template resolution.
#[derive(Debug)]
pub struct ToolCall<'a> {
    endpoint: &'a str,
    method: Method,
    path_params: Vec<(&'a str, String)>,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl<'a> ToolCall<'a> {
    const fn new(method: Method, endpoint: &'a str, body: Option<Value>) -> Self {
        Self {
            endpoint,
            method,
            path_params: Vec::new(),
            query: Vec::new(),
            body,
        }
    }

    #[must_use]
    pub const fn get(endpoint: &'a str) -> Self {
        Self::new(Method::GET, endpoint, None)
    }

    #[must_use]
    pub const fn post(endpoint: &'a str, body: Value) -> Self {
        Self::new(Method::POST, endpoint, Some(body))
    }

    #[must_use]
    pub const fn put(endpoint: &'a str, body: Value) -> Self {
        Self::new(Method::PUT, endpoint, Some(body))
    }

    #[must_use]
    pub const fn delete(endpoint: &'a str) -> Self {
        Self::new(Method::DELETE, endpoint, None)
    }

    #[must_use]
    pub fn path_param(mut self, key: &'a str, value: impl ToString) -> Self {
        self.path_params.push((key, value.to_string()));
        self
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Adds a free-form filter, skipping absent or blank values.
    #[must_use]
    pub fn filter(self, key: &str, value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Appends `page` and `per_page`, applying the configured defaults.
    ///
    /// # Errors
    /// Returns `Validation` for zero values or a page size above the cap.
    pub fn paginate(
        self,
        page: Option<u32>,
        per_page: Option<u32>,
        config: &ErpConfig,
    ) -> Result<Self, ErpError> {
        let page = page.unwrap_or(config.default_page);
        let per_page = per_page.unwrap_or(config.default_per_page);
        if page == 0 {
            return Err(ErpError::validation("page must be a positive integer"));
        }
        if per_page == 0 {
            return Err(ErpError::validation("per_page must be a positive integer"));
        }
        if per_page > config.max_per_page {
            return Err(ErpError::validation(format!(
                "per_page must not exceed {}",
                config.max_per_page
            )));
        }
        Ok(self.query("page", page).query("per_page", per_page))
    }

    /// Resolves the endpoint template and hands the request to the gateway.
    ///
    /// # Errors
    /// Returns local errors from template resolution or the gateway.
    pub async fn send(self, gateway: &Gateway) -> Result<Outcome, ErpError> {
        let endpoint = resolve(self.endpoint, &self.path_params)?;
        let spec = RequestSpec::new(self.method, endpoint)
            .with_query(self.query)
            .with_body(self.body);
        gateway.execute(spec).await
    }
}

/// Rejects ids that are not positive.
///
/// # Errors
/// Returns `Validation` when `value` is zero.
pub fn positive_id(field: &str, value: u64) -> Result<u64, ErpError> {
    if value == 0 {
        Err(ErpError::validation(format!(
            "{field} must be a positive integer"
        )))
    } else {
        Ok(value)
    }
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses an optional `YYYY-MM-DD` date; blank input counts as absent.
///
/// # Errors
/// Returns `Validation` for text that is not a calendar date.
pub fn parse_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, ErpError> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| {
                ErpError::validation(format!("{field} must be a YYYY-MM-DD date: {e}"))
            })
        })
        .transpose()
}

/// Like [`parse_date`], but the date must be present.
///
/// # Errors
/// Returns `Validation` for blank or malformed input.
pub fn required_date(field: &str, raw: &str) -> Result<NaiveDate, ErpError> {
    parse_date(field, Some(raw))?
        .ok_or_else(|| ErpError::validation(format!("{field} is required")))
}

/// # Errors
/// Returns `Validation` when `start` falls after `end`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Result<(NaiveDate, NaiveDate), ErpError> {
    if start > end {
        Err(ErpError::validation("start_date must not be after end_date"))
    } else {
        Ok((start, end))
    }
}

/// Parses a JSON object supplied as text. The parser's message is passed
/// back verbatim.
///
/// # Errors
/// Returns `Validation` if `raw` is not valid JSON or not an object.
pub fn parse_payload(field: &str, raw: &str) -> Result<Value, ErpError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| {
        ErpError::validation(format!("Invalid JSON format for {field}: {e}"))
    })?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(ErpError::validation(format!(
            "{field} must be a JSON object"
        )))
    }
}

/// Text handed back to the MCP caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolReply {
    pub text: String,
    pub is_error: bool,
}

impl ToolReply {
    #[must_use]
    pub fn render(result: Result<Outcome, ErpError>) -> Self {
        match result {
            Ok(outcome) => Self::from_outcome(&outcome),
            Err(err) => Self::from_error(&err),
        }
    }

    #[must_use]
    pub fn from_outcome(outcome: &Outcome) -> Self {
        match (outcome, outcome.message()) {
            (Outcome::Success { data }, _) => Self {
                text: serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string()),
                is_error: false,
            },
            (_, message) => Self::error(format!(
                "{}: {}",
                outcome.kind(),
                message.unwrap_or_default()
            )),
        }
    }

    #[must_use]
    pub fn from_error(err: &ErpError) -> Self {
        Self::error(format!("{}: {err}", err.kind()))
    }

    const fn error(text: String) -> Self {
        Self {
            text,
            is_error: true,
        }
    }
}

impl From<ToolReply> for CallToolResult {
    fn from(reply: ToolReply) -> Self {
        let content = vec![Content::text(reply.text)];
        if reply.is_error {
            Self::error(content)
        } else {
            Self::success(content)
        }
    }
}
