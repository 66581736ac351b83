//! Rust client for the Toggl Track reports API.
//! Lists workspaces and downloads monthly detailed reports as raw CSV,
//! rejecting reports that hold no time entries.

pub mod client;
pub mod error;
pub mod models;
pub mod report;

pub use client::{Client, ClientBuilder, DEFAULT_USER_AGENT, RowCountHook, basic_auth_token};
pub use error::{ReportError, Result};
pub use models::{Workspace, parse_workspaces};
pub use report::{MIN_REPORT_ROWS, ReportPeriod, count_rows};
