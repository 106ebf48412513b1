//! HTTP communication layer for the ERP API.
//!
//! Handles endpoint resolution, authentication, request construction and
//! response classification.

mod auth;
mod client;
mod gateway;
pub mod registry;
mod session;

// Re-export the public API used by the tools
pub use gateway::{Gateway, RequestSpec};
pub use registry::resolve;

// Re-export common types used in our public API
pub use reqwest::Method;
