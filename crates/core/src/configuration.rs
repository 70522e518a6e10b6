//! Payroll configuration records: grades, pay elements, provinces and
//! establishments.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{Amount, EntityId};

// ---------------------------------------------------------------------------
// Grades
// ---------------------------------------------------------------------------

/// A salary grade. Labels are unique upstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grade {
    pub id: EntityId,
    pub label: String,
    pub base_salary: Amount,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GradeInput {
    #[validate(length(min = 1, max = 120))]
    pub label: String,
    #[serde(with = "crate::money::lenient")]
    pub base_salary: Amount,
}

// ---------------------------------------------------------------------------
// Pay elements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayElementKind {
    Gain,
    Deduction,
}

impl PayElementKind {
    /// Accepts the English names and the backend's `Gain` / `Retenue`.
    pub fn parse_lenient(raw: &str) -> Result<Self, CoreError> {
        match raw.trim().to_lowercase().as_str() {
            "gain" => Ok(Self::Gain),
            "deduction" | "retenue" => Ok(Self::Deduction),
            other => Err(CoreError::Validation(format!(
                "unknown pay element kind '{other}', expected gain or deduction"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gain => "gain",
            Self::Deduction => "deduction",
        }
    }
}

impl fmt::Display for PayElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configurable gain or deduction applied to payslips.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayElement {
    pub id: EntityId,
    pub name: String,
    pub kind: PayElementKind,
    /// Elements without a fixed amount contribute zero.
    pub fixed_amount: Option<Amount>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PayElementInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub kind: PayElementKind,
    #[serde(default, with = "crate::money::lenient_opt")]
    pub fixed_amount: Option<Amount>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Provinces and establishments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Province {
    pub id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProvinceInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

/// Pay zone of an establishment. Rural schools earn a bush allowance uplift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayZone {
    Urban,
    Rural,
}

impl PayZone {
    /// Accepts the English names and the backend's `Urbaine` / `Rurale`.
    pub fn parse_lenient(raw: &str) -> Result<Self, CoreError> {
        match raw.trim().to_lowercase().as_str() {
            "urban" | "urbaine" => Ok(Self::Urban),
            "rural" | "rurale" => Ok(Self::Rural),
            other => Err(CoreError::Validation(format!(
                "unknown pay zone '{other}', expected urban or rural"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Establishment {
    pub id: EntityId,
    pub name: String,
    pub province_id: EntityId,
    pub pay_zone: PayZone,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EstablishmentInput {
    #[validate(length(min = 1, max = 160))]
    pub name: String,
    pub province_id: EntityId,
    pub pay_zone: PayZone,
}
