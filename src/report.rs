use crate::error::ReportError;
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Reports with fewer line-feed segments than this hold no time entries:
/// a header, at least one entry and the blank segment after the final newline.
pub const MIN_REPORT_ROWS: usize = 3;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive date range covering one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    pub since: NaiveDate,
    pub until: NaiveDate,
}

impl ReportPeriod {
    pub fn month(year: i32, month: u32) -> Result<Self, ReportError> {
        let invalid = || ReportError::InvalidPeriod { year, month };
        let since = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let until = next.and_then(|d| d.pred_opt()).ok_or_else(invalid)?;
        Ok(Self { since, until })
    }

    pub fn since_param(&self) -> String {
        self.since.format(DATE_FORMAT).to_string()
    }

    pub fn until_param(&self) -> String {
        self.until.format(DATE_FORMAT).to_string()
    }

    pub fn days(&self) -> u32 {
        self.until.day()
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.since_param(), self.until_param())
    }
}

/// Number of `\n`-delimited segments, trailing empty segment included.
///
/// `\r\n` bodies are not normalised, the threshold was calibrated against
/// plain line-feed splitting.
pub fn count_rows(report: &str) -> usize {
    report.split('\n').count()
}

pub(crate) fn ensure_not_empty(rows: usize) -> Result<(), ReportError> {
    if rows < MIN_REPORT_ROWS {
        return Err(ReportError::EmptyReport { rows });
    }
    Ok(())
}
