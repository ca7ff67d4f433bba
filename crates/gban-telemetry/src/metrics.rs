//! Prometheus metrics for GBan subsystems.
//!
//! All metrics follow the naming convention: `gb_<area>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: outcomes, fallback invocations, reconnects, errors
//! - **Gauge**: trust edge count
//! - **Histogram**: propagation duration

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // PROPAGATION METRICS (Subsystem 4)
    // =========================================================================

    /// Per-target outcomes of global bans
    pub static ref PROPAGATION_OUTCOMES: CounterVec = CounterVec::new(
        Opts::new("gb_propagation_outcomes_total", "Per-target outcomes of global bans"),
        &["outcome"]  // success/non_trusted_alert/error_fallback_alert/error_failure
    ).expect("metric creation failed");

    /// Wall time of one global ban, from dispatch to summary
    pub static ref PROPAGATION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "gb_propagation_duration_seconds",
            "Time from dispatching a global ban to its summary"
        ).buckets(exponential_buckets(0.01, 2.0, 14).expect("valid buckets"))
    ).expect("metric creation failed");

    /// Fallback control invocations
    pub static ref FALLBACK_INVOCATIONS: CounterVec = CounterVec::new(
        Opts::new("gb_fallback_invocations_total", "Fallback control invocations"),
        &["action", "result"]  // action: apply_ban/apply_ban_and_trust/trust_node, result: completed/denied/failed
    ).expect("metric creation failed");

    // =========================================================================
    // TRUST GRAPH METRICS (Subsystem 1)
    // =========================================================================

    /// Stored trust edges
    pub static ref TRUST_EDGES: Gauge = Gauge::new(
        "gb_trust_edges",
        "Number of stored trust edges"
    ).expect("metric creation failed");

    // =========================================================================
    // STORAGE METRICS
    // =========================================================================

    /// RocksDB reopens after a lost connection. The in-memory backend has no
    /// connection to lose and never moves this counter.
    pub static ref STORE_RECONNECTS: Counter = Counter::new(
        "gb_store_reconnects_total",
        "RocksDB reopens after a lost storage connection"
    ).expect("metric creation failed");

    // =========================================================================
    // ERROR METRICS
    // =========================================================================

    /// Subsystem errors by type
    pub static ref SUBSYSTEM_ERRORS: CounterVec = CounterVec::new(
        Opts::new("gb_subsystem_errors_total", "Errors by subsystem and type"),
        &["subsystem", "error_type"]
    ).expect("metric creation failed");
}

/// Handle proving the metrics are registered.
pub struct MetricsHandle {
    _registry: Registry,
}

/// Register all metrics with the global registry. Safe to call more than once.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Propagation
        Box::new(PROPAGATION_OUTCOMES.clone()),
        Box::new(PROPAGATION_DURATION.clone()),
        Box::new(FALLBACK_INVOCATIONS.clone()),
        // Trust graph
        Box::new(TRUST_EDGES.clone()),
        // Storage
        Box::new(STORE_RECONNECTS.clone()),
        // Errors
        Box::new(SUBSYSTEM_ERRORS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: REGISTRY.clone(),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Record an error against `subsystem`.
pub fn record_error(subsystem: &str, error_type: &str) {
    SUBSYSTEM_ERRORS
        .with_label_values(&[subsystem, error_type])
        .inc();
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
