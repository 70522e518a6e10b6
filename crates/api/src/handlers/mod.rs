pub mod agents;
pub mod auth;
pub mod configuration;
pub mod debts;
pub mod payments;
pub mod payslips;
pub mod preferences;
pub mod reports;
pub mod teachers;
