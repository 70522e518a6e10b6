//! Well-known role name constants.
//!
//! These must match the role strings issued by the payroll backend at login.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_ACCOUNTANT: &str = "accountant";

/// Whether `role` may perform accounting operations (payments, payslips,
/// teacher records). Admins inherit every accountant permission.
pub fn is_accountant_or_admin(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_ACCOUNTANT
}
