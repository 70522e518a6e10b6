//! Payslip computation.
//!
//! Mirrors the payroll backend's calculation so the dashboard can preview a
//! payslip before it is generated:
//!
//! ```text
//! gross      = grade base salary + gains (zone-adjusted)
//! CNSS       = 5% of min(gross, 180 000)
//! IPR        = progressive annual brackets on gross * 12, divided by 12
//! deductions = CNSS + IPR + selected deduction elements
//! net        = gross - deductions
//! ```

use rust_decimal::Decimal;
use serde::Serialize;

use crate::configuration::{PayElement, PayElementKind, PayZone};
use crate::money::round_money;
use crate::types::{Amount, EntityId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Monthly gross above which no further CNSS is withheld.
pub const CNSS_CEILING: i64 = 180_000;

/// One IPR bracket over annual gross: `(lower, upper, rate_percent)`.
/// `upper == None` means unbounded.
type Bracket = (i64, Option<i64>, i64);

const IPR_BRACKETS: [Bracket; 8] = [
    (0, Some(524_160), 0),
    (524_161, Some(1_428_000), 10),
    (1_428_001, Some(2_803_200), 15),
    (2_803_201, Some(5_044_800), 20),
    (5_044_801, Some(8_229_600), 22),
    (8_229_601, Some(13_200_000), 25),
    (13_200_001, Some(18_504_000), 30),
    (18_504_001, None, 35),
];

fn cnss_rate() -> Decimal {
    Decimal::new(5, 2)
}

/// Uplift applied to zone allowances in rural establishments.
fn rural_multiplier() -> Decimal {
    Decimal::new(12, 1)
}

// ---------------------------------------------------------------------------
// Breakdown
// ---------------------------------------------------------------------------

/// One line of a computed payslip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayrollLine {
    /// `None` for statutory lines (CNSS, IPR).
    pub element_id: Option<EntityId>,
    pub kind: PayElementKind,
    pub amount: Amount,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayrollBreakdown {
    pub base_salary: Amount,
    pub zone_multiplier: Amount,
    pub total_gains: Amount,
    pub gross: Amount,
    pub cnss: Amount,
    pub ipr: Amount,
    pub total_deductions: Amount,
    pub net: Amount,
    pub lines: Vec<PayrollLine>,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// CNSS contribution on a monthly gross.
pub fn cnss(gross: Amount) -> Amount {
    round_money(gross.min(Decimal::from(CNSS_CEILING)) * cnss_rate())
}

/// Monthly IPR for a monthly gross, computed on the annualized amount.
pub fn ipr(gross: Amount) -> Amount {
    let annual = gross.saturating_mul(Decimal::from(12));
    let mut tax = Decimal::ZERO;
    for (lower, upper, rate) in IPR_BRACKETS {
        let lower = Decimal::from(lower);
        if annual <= lower {
            continue;
        }
        let top = match upper {
            Some(upper) => annual.min(Decimal::from(upper)),
            None => annual,
        };
        tax = tax.saturating_add((top - lower).saturating_mul(Decimal::new(rate, 2)));
    }
    round_money(tax / Decimal::from(12))
}

/// Whether a gain is a zone allowance subject to the rural uplift.
fn is_zone_allowance(name: &str) -> bool {
    let name = name.to_lowercase();
    name.contains("brousse") || name.contains("zone")
}

/// Compute a payslip from a base salary, the establishment's pay zone and the
/// selected pay elements. Totals saturate instead of overflowing.
pub fn compute_payslip(
    base_salary: Amount,
    zone: Option<PayZone>,
    elements: &[PayElement],
) -> PayrollBreakdown {
    let zone_multiplier = match zone {
        Some(PayZone::Rural) => rural_multiplier(),
        _ => Decimal::ONE,
    };
    let zone_label = match zone {
        Some(PayZone::Rural) => "rural",
        Some(PayZone::Urban) => "urban",
        None => "n/a",
    };

    let mut lines = Vec::with_capacity(elements.len() + 2);

    let mut total_gains = Decimal::ZERO;
    for element in elements.iter().filter(|e| e.kind == PayElementKind::Gain) {
        let mut amount = element.fixed_amount.unwrap_or_default();
        if is_zone_allowance(&element.name) {
            amount = amount.saturating_mul(zone_multiplier);
        }
        total_gains = total_gains.saturating_add(amount);
        lines.push(PayrollLine {
            element_id: Some(element.id),
            kind: PayElementKind::Gain,
            amount,
            description: format!("{} (zone: {zone_label})", element.name),
        });
    }

    let gross = base_salary.saturating_add(total_gains);
    let cnss = cnss(gross);
    let ipr = ipr(gross);
    lines.push(PayrollLine {
        element_id: None,
        kind: PayElementKind::Deduction,
        amount: cnss,
        description: "CNSS (5%)".into(),
    });
    lines.push(PayrollLine {
        element_id: None,
        kind: PayElementKind::Deduction,
        amount: ipr,
        description: "IPR".into(),
    });

    let mut total_deductions = cnss.saturating_add(ipr);
    for element in elements.iter().filter(|e| e.kind == PayElementKind::Deduction) {
        let amount = element.fixed_amount.unwrap_or_default();
        total_deductions = total_deductions.saturating_add(amount);
        lines.push(PayrollLine {
            element_id: Some(element.id),
            kind: PayElementKind::Deduction,
            amount,
            description: element.name.clone(),
        });
    }

    PayrollBreakdown {
        base_salary,
        zone_multiplier,
        total_gains,
        gross,
        cnss,
        ipr,
        total_deductions,
        net: gross.saturating_sub(total_deductions),
        lines,
    }
}
