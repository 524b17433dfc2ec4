//! Payment provider implementations
//!
//! Concrete implementations of the OrderProvider trait for different providers.

pub mod razorpay;

pub use razorpay::{RazorpayConfig, RazorpayProvider};
