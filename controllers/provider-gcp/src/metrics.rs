//! Prometheus metrics for reconciles

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::time::Duration;

/// Result label of a successful reconcile
pub const RESULT_SUCCESS: &str = "success";
/// Result label of a failed reconcile
pub const RESULT_ERROR: &str = "error";

/// Reconcile counters and latencies, labelled by managed kind
#[derive(Debug, Clone)]
pub struct Metrics {
    registry: Registry,
    reconcile_total: IntCounterVec,
    reconcile_duration: HistogramVec,
}

impl Metrics {
    /// Create the metrics and register them with a fresh registry
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let reconcile_total = IntCounterVec::new(
            Opts::new("gcp_reconcile_total", "Reconciles of GCP managed resources"),
            &["kind", "result"],
        )?;
        registry.register(Box::new(reconcile_total.clone()))?;

        let reconcile_duration = HistogramVec::new(
            HistogramOpts::new(
                "gcp_reconcile_duration_seconds",
                "Duration of GCP managed resource reconciles",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["kind"],
        )?;
        registry.register(Box::new(reconcile_duration.clone()))?;

        Ok(Self {
            registry,
            reconcile_total,
            reconcile_duration,
        })
    }

    /// Record one reconcile of `kind`
    pub fn observe(&self, kind: &str, result: &str, elapsed: Duration) {
        self.reconcile_total.with_label_values(&[kind, result]).inc();
        self.reconcile_duration
            .with_label_values(&[kind])
            .observe(elapsed.as_secs_f64());
    }

    /// Metrics in the Prometheus text exposition format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_counts_by_kind_and_result() {
        let metrics = Metrics::new().unwrap();
        metrics.observe("Network", RESULT_SUCCESS, Duration::from_millis(20));
        metrics.observe("Network", RESULT_SUCCESS, Duration::from_millis(30));
        metrics.observe("Topic", RESULT_ERROR, Duration::from_millis(5));

        let text = metrics.render().unwrap();
        assert!(text.contains(r#"gcp_reconcile_total{kind="Network",result="success"} 2"#));
        assert!(text.contains(r#"gcp_reconcile_total{kind="Topic",result="error"} 1"#));
        assert!(text.contains("gcp_reconcile_duration_seconds_bucket"));
    }
}
