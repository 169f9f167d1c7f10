use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Cache metrics
    pub cache_hits: IntCounter,
    pub cache_misses: IntCounterVec,
    pub token_expiry_unix: IntGauge,

    // Grant metrics
    pub grant_requests: IntCounterVec,
    pub grant_failures: IntCounterVec,
    pub grant_duration: HistogramVec,

    // Config/runtime
    pub config_validation_errors: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("drupaltoken".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Cache
            cache_hits: IntCounter::new("token_cache_hits_total", "Tokens served from the store without a network call").unwrap(),
            cache_misses: IntCounterVec::new(Opts::new("token_cache_misses_total", "Store reads that required a grant"), &["reason"]).unwrap(),
            token_expiry_unix: IntGauge::new("token_expiry_unix_seconds", "Expiration timestamp of the last stored token").unwrap(),

            // Grant
            grant_requests: IntCounterVec::new(Opts::new("grant_requests_total", "Token endpoint requests by grant type"), &["grant"]).unwrap(),
            grant_failures: IntCounterVec::new(Opts::new("grant_failures_total", "Token endpoint failures by grant type and reason"), &["grant", "reason"]).unwrap(),
            grant_duration: HistogramVec::new(HistogramOpts::new("grant_duration_seconds", "Token endpoint round trip seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]), &["grant"]).unwrap(),

            // Config/runtime
            config_validation_errors: IntCounter::new("config_validation_errors_total", "Rejected configurations").unwrap(),
            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.cache_hits.clone())).unwrap();
        reg.register(Box::new(metrics.cache_misses.clone())).unwrap();
        reg.register(Box::new(metrics.token_expiry_unix.clone())).unwrap();
        reg.register(Box::new(metrics.grant_requests.clone())).unwrap();
        reg.register(Box::new(metrics.grant_failures.clone())).unwrap();
        reg.register(Box::new(metrics.grant_duration.clone())).unwrap();
        reg.register(Box::new(metrics.config_validation_errors.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
