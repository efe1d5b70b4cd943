use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};
use std::sync::Arc;

pub struct MetricsCollector {
    registry: Registry,

    /// Schema documents served, by activity.
    pub forms_served: CounterVec,
    /// Option lookups, by activity and data source kind.
    pub option_lookups: CounterVec,
    /// Successful configuration reloads.
    pub config_reloads: Counter,
}

impl MetricsCollector {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let forms_served = CounterVec::new(
            Opts::new("formgate_forms_served_total", "Form schemas served"),
            &["activity"],
        )?;
        registry.register(Box::new(forms_served.clone()))?;

        let option_lookups = CounterVec::new(
            Opts::new("formgate_option_lookups_total", "Field option lookups"),
            &["activity", "source"],
        )?;
        registry.register(Box::new(option_lookups.clone()))?;

        let config_reloads = Counter::new(
            "formgate_config_reloads_total",
            "Successful configuration reloads",
        )?;
        registry.register(Box::new(config_reloads.clone()))?;

        Ok(Self {
            registry,
            forms_served,
            option_lookups,
            config_reloads,
        })
    }

    pub fn encode(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

pub struct MetricsHandler {
    collector: Arc<MetricsCollector>,
}

impl MetricsHandler {
    pub fn new(collector: Arc<MetricsCollector>) -> Self {
        Self { collector }
    }

    pub async fn metrics(&self) -> String {
        self.collector.encode().unwrap_or_else(|e| {
            tracing::error!("Failed to encode metrics: {}", e);
            String::from("# Error encoding metrics\n")
        })
    }
}
