use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected http status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("report is empty: got {rows} rows, expected at least 3")]
    EmptyReport { rows: usize },

    #[error("invalid report period: year {year}, month {month}")]
    InvalidPeriod { year: i32, month: u32 },

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("client has been closed")]
    Closed,
}

impl ReportError {
    /// True when the service answered but the month holds no time entries.
    pub fn is_empty_report(&self) -> bool {
        matches!(self, ReportError::EmptyReport { .. })
    }

    /// HTTP status of a rejected request, if any.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ReportError::Status { status, .. } => Some(*status),
            ReportError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
