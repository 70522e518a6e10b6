//! Domain core for the AgentPay dashboard service.
//!
//! Pure types and logic with no I/O: money normalization, year-month
//! periods, the monthly debt affordability check, payment lifecycle,
//! payroll preview and report aggregation. The HTTP layer and the upstream
//! client both build on these types.

pub mod affordability;
pub mod agent;
pub mod configuration;
pub mod debt;
pub mod error;
pub mod money;
pub mod payment;
pub mod payroll;
pub mod payslip;
pub mod period;
pub mod reporting;
pub mod roles;
pub mod teacher;
pub mod types;
pub mod validation;
