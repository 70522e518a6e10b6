//! Debt model, input DTO, and the pre-creation policy checks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::payment::{Payment, PaymentStatus};
use crate::period::YearMonth;
use crate::types::{Amount, EntityId};

/// A debt recorded against an agent. Debts are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Debt {
    pub id: EntityId,
    pub agent_id: EntityId,
    pub amount: Amount,
    pub reason: Option<String>,
    /// Only the year-month part is significant.
    pub debt_date: NaiveDate,
}

impl Debt {
    /// Whether this debt is charged to `agent_id` in `month`.
    pub fn is_for(&self, agent_id: EntityId, month: YearMonth) -> bool {
        self.agent_id == agent_id && month.contains(self.debt_date)
    }
}

/// DTO for recording a debt.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DebtInput {
    pub agent_id: EntityId,
    #[serde(with = "crate::money::lenient")]
    pub amount: Amount,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub reason: Option<String>,
    /// Defaults to today when omitted.
    #[serde(default)]
    pub debt_date: Option<NaiveDate>,
}

impl DebtInput {
    pub fn resolved_date(&self, today: NaiveDate) -> NaiveDate {
        self.debt_date.unwrap_or(today)
    }

    /// The month the debt is charged to.
    pub fn target_month(&self, today: NaiveDate) -> YearMonth {
        YearMonth::from_date(self.resolved_date(today))
    }
}

/// A debt cannot be charged to a month whose payment has already been
/// disbursed.
pub fn ensure_month_open(
    payments: &[Payment],
    agent_id: EntityId,
    month: YearMonth,
) -> Result<(), CoreError> {
    let settled = payments
        .iter()
        .any(|p| p.is_for(agent_id, month) && p.status == PaymentStatus::Completed);
    if settled {
        return Err(CoreError::Conflict(format!(
            "a completed payment already exists for agent {agent_id} in {month}"
        )));
    }
    Ok(())
}
