//! Typed REST client for the external payroll backend.
//!
//! [`api::PayrollApi`] wraps the backend's HTTP endpoints; [`wire`] holds the
//! backend's JSON shapes and their conversion into `agentpay_core` types.

pub mod api;
pub mod wire;

pub use api::{Document, PayrollApi, PayrollApiError};
