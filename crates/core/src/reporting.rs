//! Dashboard aggregation over fetched agents, debts and payments.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::agent::Agent;
use crate::debt::Debt;
use crate::payment::{Payment, PaymentStatus};
use crate::period::ReportPeriod;
use crate::types::Amount;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaymentTotals {
    pub count: usize,
    pub pending: Amount,
    pub completed: Amount,
    pub cancelled: Amount,
}

impl PaymentTotals {
    fn add(&mut self, payment: &Payment) {
        self.count += 1;
        match payment.status {
            PaymentStatus::Pending => self.pending = self.pending.saturating_add(payment.amount),
            PaymentStatus::Completed => {
                self.completed = self.completed.saturating_add(payment.amount)
            }
            PaymentStatus::Cancelled => {
                self.cancelled = self.cancelled.saturating_add(payment.amount)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    /// `monthly`, `yearly` or `all`.
    pub period_type: &'static str,
    pub period: String,
    pub agent_count: usize,
    /// Sum of monthly base salaries.
    pub total_salary: Amount,
    pub debt_count: usize,
    pub debt_total: Amount,
    pub payments: PaymentTotals,
    /// Salary left after the period's debts. Only meaningful for a single
    /// month, so `None` otherwise.
    pub remaining_payable: Option<Amount>,
}

/// Aggregate dashboard figures for `period`.
pub fn dashboard_stats(
    period: ReportPeriod,
    agents: &[Agent],
    debts: &[Debt],
    payments: &[Payment],
) -> DashboardStats {
    let total_salary = agents
        .iter()
        .fold(Decimal::ZERO, |total, a| total.saturating_add(a.salary));

    let period_debts: Vec<&Debt> = debts.iter().filter(|d| period.contains(d.debt_date)).collect();
    let debt_total = period_debts
        .iter()
        .fold(Decimal::ZERO, |total, d| total.saturating_add(d.amount));

    let mut totals = PaymentTotals::default();
    for payment in payments.iter().filter(|p| period.contains_month(p.period)) {
        totals.add(payment);
    }

    let remaining_payable = match period {
        ReportPeriod::Monthly(_) => {
            Some(total_salary.saturating_sub(debt_total).max(Decimal::ZERO))
        }
        _ => None,
    };

    DashboardStats {
        period_type: period.kind(),
        period: period.label(),
        agent_count: agents.len(),
        total_salary,
        debt_count: period_debts.len(),
        debt_total,
        payments: totals,
        remaining_payable,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::period::YearMonth;

    fn agent(id: i64, salary: i64) -> Agent {
        Agent {
            id,
            name: format!("agent-{id}"),
            role: "Teacher".into(),
            salary: Decimal::from(salary),
            date_of_birth: None,
            email: None,
            phone: None,
        }
    }

    fn debt(agent_id: i64, amount: i64, y: i32, m: u32) -> Debt {
        Debt {
            id: amount,
            agent_id,
            amount: Decimal::from(amount),
            reason: None,
            debt_date: NaiveDate::from_ymd_opt(y, m, 10).unwrap(),
        }
    }

    fn payment(amount: i64, status: PaymentStatus, y: i32, m: u32) -> Payment {
        Payment {
            id: amount,
            agent_id: 1,
            amount: Decimal::from(amount),
            status,
            period: YearMonth::new(y, m).unwrap(),
            payment_date: None,
        }
    }

    fn fixture() -> (Vec<Agent>, Vec<Debt>, Vec<Payment>) {
        (
            vec![agent(1, 1000), agent(2, 2000)],
            vec![debt(1, 100, 2025, 6), debt(2, 300, 2025, 6), debt(1, 50, 2025, 1)],
            vec![
                payment(900, PaymentStatus::Completed, 2025, 6),
                payment(1700, PaymentStatus::Pending, 2025, 6),
                payment(400, PaymentStatus::Cancelled, 2024, 12),
            ],
        )
    }

    #[test]
    fn monthly_stats_filter_to_the_month() {
        let (agents, debts, payments) = fixture();
        let period = ReportPeriod::Monthly(YearMonth::new(2025, 6).unwrap());
        let stats = dashboard_stats(period, &agents, &debts, &payments);

        assert_eq!(stats.period, "2025-06");
        assert_eq!(stats.agent_count, 2);
        assert_eq!(stats.total_salary, Decimal::from(3000));
        assert_eq!(stats.debt_count, 2);
        assert_eq!(stats.debt_total, Decimal::from(400));
        assert_eq!(stats.payments.count, 2);
        assert_eq!(stats.payments.completed, Decimal::from(900));
        assert_eq!(stats.payments.pending, Decimal::from(1700));
        assert_eq!(stats.remaining_payable, Some(Decimal::from(2600)));
    }

    #[test]
    fn yearly_and_all_have_no_remaining_payable() {
        let (agents, debts, payments) = fixture();

        let yearly = dashboard_stats(ReportPeriod::Yearly(2025), &agents, &debts, &payments);
        assert_eq!(yearly.debt_total, Decimal::from(450));
        assert_eq!(yearly.remaining_payable, None);

        let all = dashboard_stats(ReportPeriod::All, &agents, &debts, &payments);
        assert_eq!(all.payments.count, 3);
        assert_eq!(all.payments.cancelled, Decimal::from(400));
        assert_eq!(all.period_type, "all");
    }

    #[test]
    fn remaining_payable_never_goes_negative() {
        let agents = vec![agent(1, 100)];
        let debts = vec![debt(1, 500, 2025, 6)];
        let period = ReportPeriod::Monthly(YearMonth::new(2025, 6).unwrap());
        let stats = dashboard_stats(period, &agents, &debts, &[]);
        assert_eq!(stats.remaining_payable, Some(Decimal::ZERO));
    }

    #[test]
    fn totals_saturate_on_huge_figures() {
        let mut rich = agent(1, 0);
        rich.salary = Decimal::MAX;
        let agents = vec![rich.clone(), rich];

        let mut huge = payment(1, PaymentStatus::Pending, 2025, 6);
        huge.amount = Decimal::MAX;
        let payments = vec![huge.clone(), huge];

        let period = ReportPeriod::Monthly(YearMonth::new(2025, 6).unwrap());
        let stats = dashboard_stats(period, &agents, &[], &payments);
        assert_eq!(stats.total_salary, Decimal::MAX);
        assert_eq!(stats.payments.pending, Decimal::MAX);
        assert_eq!(stats.remaining_payable, Some(Decimal::MAX));
    }
}
