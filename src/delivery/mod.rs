//! Delivery of serialized mirrors to the collector service
//!
//! One POST per extraction run: no retries, no batching, no request timeout.
//! Failures are logged and reported, never raised. Callers bound how long
//! they wait for the outcome with the configured grace period.

pub mod client;
pub mod config;

pub use client::{DeliveryClient, DeliveryHandle, DeliveryReport};
pub use config::{DEFAULT_ENDPOINT, DEFAULT_GRACE_PERIOD, DeliveryOptions};
