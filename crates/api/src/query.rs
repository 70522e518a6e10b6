//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use agentpay_core::error::CoreError;
use agentpay_core::period::{ReportPeriod, YearMonth};
use serde::Deserialize;

/// Report filter parameters (`?type=&month=&year=`).
#[derive(Debug, Default, Deserialize)]
pub struct PeriodParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// `YYYY-MM`.
    pub month: Option<String>,
    pub year: Option<i32>,
}

impl PeriodParams {
    pub fn period(&self) -> Result<ReportPeriod, CoreError> {
        ReportPeriod::from_params(self.kind.as_deref(), self.month.as_deref(), self.year)
    }
}

/// Parse an optional `?month=YYYY-MM` filter; blank counts as absent.
pub fn parse_month_filter(raw: Option<&str>) -> Result<Option<YearMonth>, CoreError> {
    raw.map(str::trim)
        .filter(|m| !m.is_empty())
        .map(YearMonth::parse)
        .transpose()
}
