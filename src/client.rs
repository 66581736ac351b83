use crate::error::ReportError;
use crate::models::{Workspace, parse_workspaces};
use crate::report::{ReportPeriod, count_rows, ensure_not_empty};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{debug, info};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub const BASE_URL: &str = "https://api.track.toggl.com";
pub const WORKSPACES_PATH: &str = "/api/v8/workspaces";
pub const DETAILED_REPORT_PATH: &str = "/reports/api/v2/details.csv";

/// Contact address the reports API requires in every request.
pub const DEFAULT_USER_AGENT: &str = "stornello-ducati0a@icloud.com";

const API_TOKEN_PASSWORD: &str = "api_token";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Receives the row count of every downloaded report while debug is on.
pub type RowCountHook = Arc<dyn Fn(usize) + Send + Sync>;

/// Token for `Authorization: Basic`, i.e. `base64("<api_key>:api_token")`.
pub fn basic_auth_token(api_key: &str) -> String {
    STANDARD.encode(format!("{api_key}:{API_TOKEN_PASSWORD}"))
}

pub struct ClientBuilder {
    api_key: String,
    debug: bool,
    user_agent: String,
    base_url: String,
    timeout: Option<Duration>,
    row_count_hook: Option<RowCountHook>,
}

impl ClientBuilder {
    fn new(api_key: String) -> Self {
        Self {
            api_key,
            debug: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            base_url: BASE_URL.to_string(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            row_count_hook: None,
        }
    }

    /// Report the row count of downloaded reports.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Override the contact string sent as the `user_agent` query parameter.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the base URL (useful for tests or proxies).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Request timeout applied to every call; `None` waits indefinitely.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn on_row_count<F>(mut self, hook: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.row_count_hook = Some(Arc::new(hook));
        self
    }

    pub fn build(self) -> Result<Client, ReportError> {
        let mut auth = HeaderValue::from_str(&format!("Basic {}", basic_auth_token(&self.api_key)))?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let mut builder = HttpClient::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        info!(
            "Initialized Toggl report client for {} (debug={})",
            self.base_url, self.debug
        );
        Ok(Client {
            api_key: self.api_key,
            http: Some(http),
            debug: self.debug,
            user_agent: self.user_agent,
            base_url: self.base_url,
            row_count_hook: self.row_count_hook,
        })
    }
}

/// Authenticated client for the Toggl workspace and reports APIs.
///
/// The transport is a shared connection pool, so `&self` calls may run
/// concurrently. It is released by [`Client::close`] or on drop.
pub struct Client {
    api_key: String,
    http: Option<HttpClient>,
    debug: bool,
    user_agent: String,
    base_url: String,
    row_count_hook: Option<RowCountHook>,
}

impl Client {
    /// Create a new client with the default configuration.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ReportError> {
        Self::builder(api_key).build()
    }

    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key.into())
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn is_closed(&self) -> bool {
        self.http.is_none()
    }

    /// Release the underlying transport. Calling it again does nothing.
    pub fn close(&mut self) {
        if self.http.take().is_some() {
            debug!("Closed Toggl report client");
        }
    }

    /// Fetch all workspaces visible to the authenticated user.
    pub async fn list_workspaces(&self) -> Result<Vec<Workspace>, ReportError> {
        let url = format!("{}{}", self.base_url, WORKSPACES_PATH);
        debug!("Fetching workspaces");
        let request = self.http()?.get(&url);
        let body = self.send(request, &url).await?.text().await?;
        parse_workspaces(&body)
    }

    /// Download the detailed CSV report of `workspace_id` for one month.
    ///
    /// Fails with [`ReportError::EmptyReport`] when the report holds no
    /// time entries.
    pub async fn download_detailed_report(
        &self,
        workspace_id: &str,
        year: i32,
        month: u32,
    ) -> Result<String, ReportError> {
        self.fetch_detailed_report(workspace_id, year, month, None)
            .await
    }

    /// Same as [`Client::download_detailed_report`] with a timeout for this
    /// call only.
    pub async fn download_detailed_report_with_timeout(
        &self,
        workspace_id: &str,
        year: i32,
        month: u32,
        timeout: Duration,
    ) -> Result<String, ReportError> {
        self.fetch_detailed_report(workspace_id, year, month, Some(timeout))
            .await
    }

    async fn fetch_detailed_report(
        &self,
        workspace_id: &str,
        year: i32,
        month: u32,
        timeout: Option<Duration>,
    ) -> Result<String, ReportError> {
        let period = ReportPeriod::month(year, month)?;
        let url = format!("{}{}", self.base_url, DETAILED_REPORT_PATH);
        debug!(
            "Fetching detailed report for workspace {} over {}",
            workspace_id, period
        );

        let since = period.since_param();
        let until = period.until_param();
        let mut request = self.http()?.get(&url).query(&[
            ("user_agent", self.user_agent.as_str()),
            ("workspace_id", workspace_id),
            ("since", since.as_str()),
            ("until", until.as_str()),
        ]);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let report = self.send(request, &url).await?.text().await?;

        let rows = count_rows(&report);
        if self.debug {
            info!("Report has length {}", rows);
            if let Some(hook) = &self.row_count_hook {
                hook(rows);
            }
        }
        ensure_not_empty(rows)?;

        Ok(report)
    }

    fn http(&self) -> Result<&HttpClient, ReportError> {
        self.http.as_ref().ok_or(ReportError::Closed)
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<Response, ReportError> {
        debug!("GET request to {}", url);
        let response = request.send().await?;
        let status = response.status();
        debug!("Received status {}", status);
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ReportError::Status { status, body })
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"<redacted>")
            .field("closed", &self.is_closed())
            .field("debug", &self.debug)
            .field("user_agent", &self.user_agent)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.close();
    }
}
