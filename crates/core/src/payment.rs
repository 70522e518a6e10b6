//! Payment model and its one-directional status lifecycle.
//!
//! ```text
//! Pending ──► Completed
//!    │
//!    └─────► Cancelled
//! ```
//!
//! Completed and Cancelled are terminal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::period::YearMonth;
use crate::types::{Amount, EntityId};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Cancelled,
}

impl PaymentStatus {
    /// Parse the status spellings used by the backend and older dashboard
    /// builds (`"Paid"`, `"En attente"`, ...). Case-insensitive.
    pub fn parse_lenient(raw: &str) -> Result<Self, CoreError> {
        match raw.trim().to_lowercase().as_str() {
            "pending" | "en attente" => Ok(Self::Pending),
            "completed" | "paid" | "payé" | "paye" => Ok(Self::Completed),
            "cancelled" | "canceled" | "annulé" | "annule" => Ok(Self::Cancelled),
            other => Err(CoreError::Validation(format!(
                "unknown payment status '{other}'"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Only a pending payment moves, and only into a terminal status.
    pub fn can_transition_to(self, next: Self) -> bool {
        !self.is_terminal() && next.is_terminal()
    }

    /// Apply a transition, returning the new status or a conflict.
    pub fn transition(self, next: Self) -> Result<Self, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::Conflict(format!(
                "payment cannot move from {} to {}",
                self.as_str(),
                next.as_str()
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Payment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    pub id: EntityId,
    pub agent_id: EntityId,
    pub amount: Amount,
    pub status: PaymentStatus,
    pub period: YearMonth,
    pub payment_date: Option<NaiveDate>,
}

impl Payment {
    /// Whether this payment counts against `agent_id` for `month`.
    pub fn is_for(&self, agent_id: EntityId, month: YearMonth) -> bool {
        self.agent_id == agent_id && self.period == month
    }
}

/// DTO for recording a new payment. Payments always start as Pending.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentInput {
    pub agent_id: EntityId,
    #[serde(with = "crate::money::lenient")]
    pub amount: Amount,
    /// Pay period; defaults to the month of `payment_date`, then the current month.
    #[serde(default)]
    pub period: Option<YearMonth>,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
}

impl PaymentInput {
    /// The date forwarded to the backend, which only stores a payment date.
    ///
    /// A `payment_date` outside the given `period` is a validation error.
    pub fn resolved_date(&self, today: NaiveDate) -> Result<NaiveDate, CoreError> {
        match (self.payment_date, self.period) {
            (Some(date), Some(period)) if !period.contains(date) => Err(CoreError::Validation(
                format!("payment_date {date} is outside period {period}"),
            )),
            (Some(date), _) => Ok(date),
            (None, Some(period)) => Ok(period.first_day()),
            (None, None) => Ok(today),
        }
    }
}
