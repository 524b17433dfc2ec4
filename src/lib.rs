//! Billing service for the child-health platform: plan checkout orders,
//! payment signature verification and route gating.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod payments;
pub mod telemetry;
