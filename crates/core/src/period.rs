//! Year-month periods and report filter derivation.
//!
//! Debts are bucketed by the `YYYY-MM` prefix of their date, payments carry a
//! year-month period, and report filters select a month, a year or
//! everything. [`YearMonth`] and [`ReportPeriod`] cover all three.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Earliest year accepted in filters and periods.
pub const MIN_YEAR: i32 = 1900;
/// Latest year accepted in filters and periods.
pub const MAX_YEAR: i32 = 9999;

// ---------------------------------------------------------------------------
// YearMonth
// ---------------------------------------------------------------------------

/// A calendar month, formatted and parsed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        validate_year(year)?;
        if !(1..=12).contains(&month) {
            return Err(CoreError::Validation(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    /// Parse a strict `YYYY-MM` string.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::Validation(format!("expected a YYYY-MM month, got '{raw}'"));

        let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4
            || month.len() != 2
            || !year.bytes().all(|b| b.is_ascii_digit())
            || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The default filter month: the one containing `today`.
    pub fn current(today: NaiveDate) -> Self {
        Self::from_date(today)
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

fn validate_year(year: i32) -> Result<(), CoreError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(CoreError::Validation(format!(
            "year must be between {MIN_YEAR} and {MAX_YEAR}, got {year}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// ReportPeriod
// ---------------------------------------------------------------------------

/// The period a report or dashboard filter selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Monthly(YearMonth),
    Yearly(i32),
    All,
}

impl ReportPeriod {
    /// Derive a period from `?type=&month=&year=` filter parameters.
    ///
    /// `kind` is one of `monthly`, `yearly` or `all`. When it is absent the
    /// kind is inferred: a month wins over a year, and neither means `all`.
    pub fn from_params(
        kind: Option<&str>,
        month: Option<&str>,
        year: Option<i32>,
    ) -> Result<Self, CoreError> {
        let month = month.map(str::trim).filter(|m| !m.is_empty());

        let kind = match kind.map(str::trim).filter(|k| !k.is_empty()) {
            Some(k) => k.to_ascii_lowercase(),
            None if month.is_some() => "monthly".to_string(),
            None if year.is_some() => "yearly".to_string(),
            None => "all".to_string(),
        };

        match kind.as_str() {
            "monthly" => {
                let month = month.ok_or_else(|| {
                    CoreError::Validation("monthly reports require a month (YYYY-MM)".into())
                })?;
                Ok(Self::Monthly(YearMonth::parse(month)?))
            }
            "yearly" => {
                let year = year.ok_or_else(|| {
                    CoreError::Validation("yearly reports require a year".into())
                })?;
                validate_year(year)?;
                Ok(Self::Yearly(year))
            }
            "all" => Ok(Self::All),
            other => Err(CoreError::Validation(format!(
                "unknown report type '{other}', expected monthly, yearly or all"
            ))),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Monthly(_) => "monthly",
            Self::Yearly(_) => "yearly",
            Self::All => "all",
        }
    }

    /// Half-open `[start, end)` date range, or `None` for [`ReportPeriod::All`].
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match *self {
            Self::Monthly(ym) => Some((ym.first_day(), ym.next().first_day())),
            Self::Yearly(year) => {
                let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
                let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)?;
                Some((start, end))
            }
            Self::All => None,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match self.date_range() {
            Some((start, end)) => date >= start && date < end,
            None => true,
        }
    }

    pub fn contains_month(&self, month: YearMonth) -> bool {
        match *self {
            Self::Monthly(ym) => ym == month,
            Self::Yearly(year) => month.year() == year,
            Self::All => true,
        }
    }

    /// Query pairs understood by the payroll backend's report endpoints.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("type", self.kind().to_string())];
        match *self {
            Self::Monthly(ym) => pairs.push(("month", ym.to_string())),
            Self::Yearly(year) => pairs.push(("year", year.to_string())),
            Self::All => {}
        }
        pairs
    }

    /// Short label used in report file names, e.g. `2025-06`, `2025`, `all`.
    pub fn label(&self) -> String {
        match *self {
            Self::Monthly(ym) => ym.to_string(),
            Self::Yearly(year) => year.to_string(),
            Self::All => "all".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // -- YearMonth --

    #[test]
    fn parses_and_formats_year_month() {
        let ym = YearMonth::parse("2025-06").unwrap();
        assert_eq!(ym.year(), 2025);
        assert_eq!(ym.month(), 6);
        assert_eq!(ym.to_string(), "2025-06");
    }

    #[test]
    fn rejects_malformed_months() {
        let invalid = [
            "2025-6", "25-06", "2025-13", "2025-00", "2025/06", "abcd-ef", "", "2025-06-01",
        ];
        for raw in invalid {
            assert_matches!(YearMonth::parse(raw), Err(CoreError::Validation(_)), "{raw}");
        }
    }

    #[test]
    fn current_is_the_month_of_today() {
        assert_eq!(
            YearMonth::current(date(2025, 6, 14)),
            YearMonth::new(2025, 6).unwrap()
        );
    }

    #[test]
    fn next_rolls_over_the_year() {
        let dec = YearMonth::new(2024, 12).unwrap();
        assert_eq!(dec.next(), YearMonth::new(2025, 1).unwrap());
    }

    #[test]
    fn contains_matches_year_and_month() {
        let june = YearMonth::new(2025, 6).unwrap();
        assert!(june.contains(date(2025, 6, 30)));
        assert!(!june.contains(date(2025, 7, 1)));
        assert!(june.contains(date(2025, 6, 1)));
        assert!(!june.contains(date(2024, 6, 1)));
    }

    #[test]
    fn serde_uses_the_string_form() {
        let ym: YearMonth = serde_json::from_str("\"2025-02\"").unwrap();
        assert_eq!(serde_json::to_string(&ym).unwrap(), "\"2025-02\"");
        assert!(serde_json::from_str::<YearMonth>("\"2025-2\"").is_err());
    }

    // -- ReportPeriod --

    #[test]
    fn explicit_kinds_require_their_parameter() {
        assert!(ReportPeriod::from_params(Some("monthly"), None, Some(2025)).is_err());
        assert!(ReportPeriod::from_params(Some("yearly"), Some("2025-06"), None).is_err());
        assert_eq!(
            ReportPeriod::from_params(Some("all"), None, None).unwrap(),
            ReportPeriod::All
        );
    }

    #[test]
    fn kind_is_inferred_from_parameters() {
        assert_eq!(
            ReportPeriod::from_params(None, Some("2025-06"), Some(2024)).unwrap(),
            ReportPeriod::Monthly(YearMonth::new(2025, 6).unwrap())
        );
        assert_eq!(
            ReportPeriod::from_params(None, None, Some(2024)).unwrap(),
            ReportPeriod::Yearly(2024)
        );
        assert_eq!(ReportPeriod::from_params(None, Some(""), None).unwrap(), ReportPeriod::All);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert_matches!(
            ReportPeriod::from_params(Some("weekly"), None, None),
            Err(CoreError::Validation(msg)) if msg.contains("weekly")
        );
    }

    #[test]
    fn monthly_range_is_half_open() {
        let period = ReportPeriod::Monthly(YearMonth::new(2024, 2).unwrap());
        assert_eq!(period.date_range(), Some((date(2024, 2, 1), date(2024, 3, 1))));
        assert!(period.contains(date(2024, 2, 29)));
        assert!(!period.contains(date(2024, 3, 1)));
    }

    #[test]
    fn yearly_range_covers_the_year() {
        let period = ReportPeriod::Yearly(2025);
        assert!(period.contains(date(2025, 12, 31)));
        assert!(!period.contains(date(2026, 1, 1)));
        assert!(period.contains_month(YearMonth::new(2025, 3).unwrap()));
    }

    #[test]
    fn all_contains_everything() {
        assert_eq!(ReportPeriod::All.date_range(), None);
        assert!(ReportPeriod::All.contains(date(1999, 1, 1)));
    }

    #[test]
    fn query_pairs_match_backend_parameters() {
        let monthly = ReportPeriod::Monthly(YearMonth::new(2025, 6).unwrap());
        assert_eq!(
            monthly.query_pairs(),
            vec![("type", "monthly".to_string()), ("month", "2025-06".to_string())]
        );
        assert_eq!(ReportPeriod::Yearly(2025).label(), "2025");
        assert_eq!(ReportPeriod::All.query_pairs(), vec![("type", "all".to_string())]);
    }
}
