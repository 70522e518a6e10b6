//! Dashboard service for the agent payroll system.
//!
//! A JSON API in front of the external payroll backend: it holds browser
//! sessions, enforces roles, runs the debt affordability policy and passes
//! PDF exports through.

pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod routes;
pub mod session;
pub mod state;
