//! Metrics collection and exposition.
//!
//! # Metrics
//! - `helmet_policy_selected_total` (counter): requests by selected policy
//! - `helmet_cors_allowed_total` (counter): responses given the allow-all CORS header
//!
//! Recording without an installed exporter is a no-op.

use std::net::SocketAddr;

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use thiserror::Error;

use crate::policy::PolicyName;

pub const POLICY_SELECTED: &str = "helmet_policy_selected_total";
pub const CORS_ALLOWED: &str = "helmet_cors_allowed_total";

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("failed to install Prometheus exporter: {0}")]
    Install(#[from] BuildError),
}

/// Start the Prometheus exporter on `addr` and register metric descriptions.
pub fn init_metrics(addr: SocketAddr) -> Result<(), MetricsError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    describe_metrics();
    tracing::info!(address = %addr, "Prometheus metrics exporter started");
    Ok(())
}

pub fn describe_metrics() {
    describe_counter!(POLICY_SELECTED, "Requests served per security policy");
    describe_counter!(CORS_ALLOWED, "Responses given access-control-allow-origin: *");
}

pub fn record_policy_selected(policy: PolicyName) {
    counter!(POLICY_SELECTED, "policy" => policy.as_str()).increment(1);
}

pub fn record_cors_allowed() {
    counter!(CORS_ALLOWED).increment(1);
}
