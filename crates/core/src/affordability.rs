//! Monthly debt affordability check.
//!
//! An agent's debts dated in a given month may not exceed 80% of the agent's
//! base salary, so at least 20% always remains payable. [`evaluate`] is a
//! pure function over already-fetched data: it never fails, and a rejection
//! is reported in the returned [`Evaluation`] rather than as an error.
//! Callers that want `?` semantics use [`Evaluation::into_result`].

use rust_decimal::Decimal;
use serde::Serialize;

use crate::agent::Agent;
use crate::debt::Debt;
use crate::period::YearMonth;
use crate::types::Amount;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Share of the base salary that monthly debts may consume, in percent.
pub const MAX_DEBT_PERCENT: i64 = 80;

/// `MAX_DEBT_PERCENT` as a ratio (0.80).
pub fn max_debt_ratio() -> Decimal {
    Decimal::new(MAX_DEBT_PERCENT, 2)
}

/// Share of the base salary that must stay payable (0.20).
pub fn reserve_ratio() -> Decimal {
    Decimal::ONE - max_debt_ratio()
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Outcome of an affordability check, with every bound that went into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub accepted: bool,
    pub target_month: YearMonth,
    pub salary: Amount,
    /// Sum of the agent's debts already dated in `target_month`.
    pub monthly_debt_total: Amount,
    /// `salary * 0.8`.
    pub max_allowed_debt: Amount,
    pub candidate_amount: Amount,
    /// `monthly_debt_total + candidate_amount`.
    pub total_potential: Amount,
    /// Largest candidate that would still be accepted, never negative.
    pub max_additional: Amount,
    /// `salary - total_potential`. Negative when the debts already exceed
    /// the salary; callers treat that as invalid rather than payable.
    pub remaining_salary: Amount,
    /// `salary * 0.2`, the amount that must stay payable.
    pub minimum_reserve: Amount,
}

/// Rejection raised by [`Evaluation::into_result`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AffordabilityError {
    #[error(
        "Debt refused: {total_potential} would exceed the monthly limit of {max_allowed_debt} \
         for {target_month}; at most {max_additional} more may be recorded"
    )]
    LimitExceeded {
        target_month: YearMonth,
        total_potential: Amount,
        max_allowed_debt: Amount,
        max_additional: Amount,
        minimum_reserve: Amount,
    },
}

impl Evaluation {
    pub fn into_result(self) -> Result<Self, AffordabilityError> {
        if self.accepted {
            Ok(self)
        } else {
            Err(AffordabilityError::LimitExceeded {
                target_month: self.target_month,
                total_potential: self.total_potential,
                max_allowed_debt: self.max_allowed_debt,
                max_additional: self.max_additional,
                minimum_reserve: self.minimum_reserve,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Sum the debts dated in `target_month`, saturating at `Decimal::MAX`.
///
/// `debts` are assumed to belong to a single agent.
pub fn monthly_debt_total(debts: &[Debt], target_month: YearMonth) -> Amount {
    debts
        .iter()
        .filter(|d| target_month.contains(d.debt_date))
        .fold(Decimal::ZERO, |total, d| total.saturating_add(d.amount))
}

/// Evaluate whether `candidate_amount` of new debt fits under the monthly cap.
///
/// `existing_debts` must all belong to the same agent; debts outside
/// `target_month` are ignored. Amounts are expected to be non-negative
/// (enforced by [`crate::money`] at the boundary).
pub fn evaluate(
    salary: Amount,
    existing_debts: &[Debt],
    target_month: YearMonth,
    candidate_amount: Amount,
) -> Evaluation {
    let monthly_debt_total = monthly_debt_total(existing_debts, target_month);
    let max_allowed_debt = salary.saturating_mul(max_debt_ratio());
    // Overflow saturates the total and always rejects.
    let (total_potential, accepted) = match monthly_debt_total.checked_add(candidate_amount) {
        Some(total) => (total, total <= max_allowed_debt),
        None => (Decimal::MAX, false),
    };

    Evaluation {
        accepted,
        target_month,
        salary,
        monthly_debt_total,
        max_allowed_debt,
        candidate_amount,
        total_potential,
        max_additional: max_allowed_debt
            .saturating_sub(monthly_debt_total)
            .max(Decimal::ZERO),
        remaining_salary: salary.saturating_sub(total_potential),
        minimum_reserve: salary.saturating_mul(reserve_ratio()),
    }
}

/// [`evaluate`] for one agent out of a mixed debt list.
pub fn evaluate_for_agent(
    agent: &Agent,
    all_debts: &[Debt],
    target_month: YearMonth,
    candidate_amount: Amount,
) -> Evaluation {
    let own: Vec<Debt> = all_debts
        .iter()
        .filter(|d| d.is_for(agent.id, target_month))
        .cloned()
        .collect();
    evaluate(agent.salary, &own, target_month, candidate_amount)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    use super::*;

    fn june() -> YearMonth {
        YearMonth::parse("2025-06").unwrap()
    }

    fn amount(v: i64) -> Amount {
        Amount::from(v)
    }

    fn debt(agent_id: i64, value: i64, date: &str) -> Debt {
        Debt {
            id: value,
            agent_id,
            amount: amount(value),
            reason: None,
            debt_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    // -- scenarios --

    #[test]
    fn full_allowance_on_a_clean_month_is_accepted() {
        let eval = evaluate(amount(1000), &[], june(), amount(800));
        assert!(eval.accepted);
        assert_eq!(eval.remaining_salary, amount(200));
        assert_eq!(eval.max_allowed_debt, amount(800));
    }

    #[test]
    fn exceeding_the_cap_is_rejected_with_headroom() {
        let debts = vec![debt(1, 700, "2025-06-03")];
        let eval = evaluate(amount(1000), &debts, june(), amount(200));
        assert!(!eval.accepted);
        assert_eq!(eval.max_allowed_debt, amount(800));
        assert_eq!(eval.total_potential, amount(900));
        assert_eq!(eval.max_additional, amount(100));
    }

    #[test]
    fn zero_salary_zero_candidate_is_accepted() {
        let eval = evaluate(amount(0), &[], june(), amount(0));
        assert!(eval.accepted);
        assert_eq!(eval.remaining_salary, amount(0));
    }

    #[test]
    fn zero_salary_rejects_any_positive_candidate() {
        let eval = evaluate(amount(0), &[], june(), Decimal::new(1, 2));
        assert!(!eval.accepted);
        assert_eq!(eval.max_additional, Decimal::ZERO);
    }

    // -- properties --

    #[test]
    fn no_debts_and_no_candidate_leaves_full_salary() {
        for salary in [0, 1, 999, 1000, 250_000] {
            let eval = evaluate(amount(salary), &[], june(), Decimal::ZERO);
            assert!(eval.accepted);
            assert_eq!(eval.remaining_salary, amount(salary));
        }
    }

    #[test]
    fn existing_debts_within_cap_are_accepted() {
        let debts = vec![debt(1, 300, "2025-06-01"), debt(1, 500, "2025-06-30")];
        let eval = evaluate(amount(1000), &debts, june(), Decimal::ZERO);
        assert!(eval.accepted);
        assert_eq!(eval.monthly_debt_total, amount(800));
        assert_eq!(eval.remaining_salary, amount(200));
    }

    #[test]
    fn debts_outside_the_target_month_are_ignored() {
        let debts = vec![
            debt(1, 700, "2025-05-31"),
            debt(1, 700, "2025-07-01"),
            debt(1, 700, "2024-06-15"),
        ];
        let eval = evaluate(amount(1000), &debts, june(), amount(800));
        assert_eq!(eval.monthly_debt_total, Decimal::ZERO);
        assert!(eval.accepted);
    }

    #[test]
    fn exact_headroom_is_accepted_and_one_cent_more_is_not() {
        let salary = Decimal::new(123_457, 2); // 1234.57
        let debts = vec![debt(1, 400, "2025-06-10")];
        let headroom = salary * max_debt_ratio() - amount(400);

        let at_limit = evaluate(salary, &debts, june(), headroom);
        assert!(at_limit.accepted);
        assert_eq!(at_limit.max_additional, headroom);

        let over = evaluate(salary, &debts, june(), headroom + Decimal::new(1, 2));
        assert!(!over.accepted);
    }

    #[test]
    fn larger_candidates_never_help() {
        let debts = vec![debt(1, 250, "2025-06-10")];
        let mut previous: Option<Evaluation> = None;
        for candidate in (0..=1000).step_by(50) {
            let eval = evaluate(amount(1000), &debts, june(), amount(candidate));
            if let Some(prev) = &previous {
                assert!(eval.remaining_salary <= prev.remaining_salary);
                assert!(prev.accepted || !eval.accepted);
            }
            previous = Some(eval);
        }
    }

    #[test]
    fn evaluation_is_idempotent() {
        let debts = vec![debt(1, 120, "2025-06-10")];
        let first = evaluate(amount(900), &debts, june(), amount(30));
        let second = evaluate(amount(900), &debts, june(), amount(30));
        assert_eq!(first, second);
    }

    #[test]
    fn remaining_salary_may_go_negative_when_already_overdrawn() {
        let debts = vec![debt(1, 1200, "2025-06-10")];
        let eval = evaluate(amount(1000), &debts, june(), Decimal::ZERO);
        assert!(!eval.accepted);
        assert_eq!(eval.remaining_salary, amount(-200));
        assert_eq!(eval.max_additional, Decimal::ZERO);
    }

    #[test]
    fn oversized_candidate_is_rejected_without_overflow() {
        let debts = vec![debt(1, 1, "2025-06-03")];
        let eval = evaluate(amount(1000), &debts, june(), Decimal::MAX);
        assert!(!eval.accepted);
        assert_eq!(eval.total_potential, Decimal::MAX);
        assert_eq!(eval.max_additional, amount(799));
        assert_eq!(eval.remaining_salary, amount(1000) - Decimal::MAX);
        assert_matches!(eval.into_result(), Err(AffordabilityError::LimitExceeded { .. }));
    }

    #[test]
    fn monthly_total_saturates() {
        let mut huge = debt(1, 1, "2025-06-03");
        huge.amount = Decimal::MAX;
        let debts = vec![huge.clone(), huge];
        assert_eq!(monthly_debt_total(&debts, june()), Decimal::MAX);

        let eval = evaluate(amount(1000), &debts, june(), Decimal::ZERO);
        assert!(!eval.accepted);
        assert_eq!(eval.max_additional, Decimal::ZERO);
    }

    #[test]
    fn reserve_is_twenty_percent() {
        let eval = evaluate(amount(1000), &[], june(), Decimal::ZERO);
        assert_eq!(eval.minimum_reserve, amount(200));
    }

    // -- agent filtering --

    #[test]
    fn evaluate_for_agent_ignores_other_agents() {
        let agent = Agent {
            id: 1,
            name: "Amani".into(),
            role: "Teacher".into(),
            salary: amount(1000),
            date_of_birth: None,
            email: None,
            phone: None,
        };
        let debts = vec![debt(1, 100, "2025-06-02"), debt(2, 700, "2025-06-02")];
        let eval = evaluate_for_agent(&agent, &debts, june(), amount(700));
        assert_eq!(eval.monthly_debt_total, amount(100));
        assert!(eval.accepted);
    }

    // -- into_result --

    #[test]
    fn rejection_converts_to_limit_exceeded() {
        let debts = vec![debt(1, 700, "2025-06-03")];
        let result = evaluate(amount(1000), &debts, june(), amount(200)).into_result();
        assert_matches!(
            result,
            Err(AffordabilityError::LimitExceeded { max_additional, .. })
                if max_additional == amount(100)
        );
    }

    #[test]
    fn acceptance_passes_through() {
        let eval = evaluate(amount(1000), &[], june(), amount(10));
        assert_eq!(eval.clone().into_result(), Ok(eval));
    }
}
