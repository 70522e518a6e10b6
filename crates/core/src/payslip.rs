//! Payslip records and the request used to generate one.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::period::YearMonth;
use crate::types::{Amount, EntityId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayslipStatus {
    Pending,
    Paid,
}

impl PayslipStatus {
    /// Accepts the English names and the backend's `En attente` / `Payé`.
    pub fn parse_lenient(raw: &str) -> Result<Self, CoreError> {
        match raw.trim().to_lowercase().as_str() {
            "pending" | "en attente" => Ok(Self::Pending),
            "paid" | "payé" | "paye" => Ok(Self::Paid),
            other => Err(CoreError::Validation(format!(
                "unknown payslip status '{other}'"
            ))),
        }
    }

    /// The spelling the backend filters on.
    pub fn upstream_label(self) -> &'static str {
        match self {
            Self::Pending => "En attente",
            Self::Paid => "Payé",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payslip {
    pub id: EntityId,
    pub teacher_id: EntityId,
    pub period: YearMonth,
    pub gross: Amount,
    pub total_gains: Amount,
    pub total_deductions: Amount,
    pub net: Amount,
    pub status: PayslipStatus,
    pub payment_method: Option<String>,
    pub paid_at: Option<Timestamp>,
}

/// Generate a payslip for one teacher and month from selected pay elements.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PayslipRequest {
    pub teacher_id: EntityId,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
    #[validate(range(min = 1900, max = 9999))]
    pub year: i32,
    /// Gain element ids.
    #[serde(default)]
    pub gains: Vec<EntityId>,
    /// Deduction element ids.
    #[serde(default)]
    pub deductions: Vec<EntityId>,
}

impl PayslipRequest {
    pub fn period(&self) -> Result<YearMonth, CoreError> {
        YearMonth::new(self.year, self.month)
    }
}

/// Body of `POST /payslips/{id}/pay`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PayslipPayment {
    #[validate(length(min = 1, max = 60))]
    pub payment_method: String,
}
