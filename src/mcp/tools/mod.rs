//! MCP tools for the ERP human-resource API.
//!
//! Each module covers one resource family:
//! - `auth`: log in and out
//! - `employees`: employee records and their bank/company details
//! - `organization`: departments and branches
//! - `attendance`: attendance records and check-in/check-out
//! - `performance`: cycles, performances, goals, appraisals and KPIs
//! - `configs`: lookup and status configuration
//! - `database`: read-only lookups against the ERP database
//!
//! Every HTTP tool reduces to a [`dispatch::ToolCall`] sent through the
//! shared gateway. All tools render through [`dispatch::ToolReply`].

pub mod attendance;
pub mod auth;
pub mod configs;
pub mod database;
pub mod dispatch;
pub mod employees;
pub mod organization;
pub mod params;
pub mod performance;
