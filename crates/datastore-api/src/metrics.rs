//! Prometheus registry for the read API, served on `/metrics`.
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub validation_failures_total: IntCounter,
    pub stale_data_sets: IntGauge,
    pub unknown_data_sets: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let validation_failures_total = IntCounter::new(
            "datastore_validation_failures_total",
            "Query requests rejected by time-window validation",
        )?;
        let stale_data_sets = IntGauge::new(
            "datastore_stale_data_sets",
            "Published data-sets found stale by the latest freshness check",
        )?;
        let unknown_data_sets = IntGauge::new(
            "datastore_unknown_data_sets",
            "Published data-sets whose staleness could not be determined",
        )?;

        registry.register(Box::new(validation_failures_total.clone()))?;
        registry.register(Box::new(stale_data_sets.clone()))?;
        registry.register(Box::new(unknown_data_sets.clone()))?;

        Ok(Self {
            registry,
            validation_failures_total,
            stale_data_sets,
            unknown_data_sets,
        })
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
