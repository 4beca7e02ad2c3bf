//! OpenTelemetry export for the terminal front-end.
//!
//! When `telemetry.otlp_enabled` is set, command spans and the log events
//! recorded inside them are shipped through `tracing-opentelemetry`, and the
//! forge gauges are exported as observable gauges on a periodic OTLP metric
//! reader. The core never sees any of this; it only fills [`Gauges`].

use std::sync::Arc;
use std::time::Duration;

use forgequest_core::config::TelemetryConfig;
use forgequest_core::observer::Gauges;
use opentelemetry::KeyValue;
use opentelemetry::metrics::{MeterProvider as _, ObservableGauge};
use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::warn;

use crate::error::CliError;

/// Instrumentation scope name for spans and meters.
pub const SCOPE: &str = "forgequest";

/// Metric name of the forge heat gauge.
pub const HEAT_GAUGE: &str = "forgequest.forge.heat";

/// Metric name of the plain-sword gauge (0 or 1).
pub const HAS_SWORD_GAUGE: &str = "forgequest.player.has_sword";

/// Live OTLP providers. Dropping without [`Telemetry::shutdown`] loses the
/// final export batch.
pub struct Telemetry {
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
    /// Keeps the gauge callbacks registered.
    instruments: Vec<ObservableGauge<u64>>,
}

impl Telemetry {
    /// Build the OTLP exporters. Returns `None` when export is disabled.
    ///
    /// Must run inside the Tokio runtime; the gRPC channel connects lazily.
    pub fn init(config: &TelemetryConfig) -> Result<Option<Self>, CliError> {
        if !config.otlp_enabled {
            return Ok(None);
        }

        let span_exporter = SpanExporter::builder()
            .with_tonic()
            .with_endpoint(config.otlp_endpoint.as_str())
            .build()
            .map_err(|e| CliError::Telemetry {
                message: format!("span exporter: {e}"),
            })?;
        let tracer_provider = SdkTracerProvider::builder()
            .with_batch_exporter(span_exporter)
            .with_resource(resource(config))
            .build();

        let metric_exporter = MetricExporter::builder()
            .with_tonic()
            .with_endpoint(config.otlp_endpoint.as_str())
            .build()
            .map_err(|e| CliError::Telemetry {
                message: format!("metric exporter: {e}"),
            })?;
        let reader = PeriodicReader::builder(metric_exporter)
            .with_interval(Duration::from_millis(config.gauge_interval_ms))
            .build();
        let meter_provider = SdkMeterProvider::builder()
            .with_reader(reader)
            .with_resource(resource(config))
            .build();

        Ok(Some(Self {
            tracer_provider,
            meter_provider,
            instruments: Vec::new(),
        }))
    }

    /// Provider backing the `tracing-opentelemetry` layer.
    pub const fn tracer_provider(&self) -> &SdkTracerProvider {
        &self.tracer_provider
    }

    /// Export `gauges` on every metric collection.
    pub fn register_gauges(&mut self, gauges: &Arc<Gauges>) {
        let meter = self.meter_provider.meter(SCOPE);

        let heat = Arc::clone(gauges);
        self.instruments.push(
            meter
                .u64_observable_gauge(HEAT_GAUGE)
                .with_description("Current forge heat")
                .with_callback(move |observer| {
                    observer.observe(u64::from(heat.current_heat()), &[]);
                })
                .build(),
        );

        let sword = Arc::clone(gauges);
        self.instruments.push(
            meter
                .u64_observable_gauge(HAS_SWORD_GAUGE)
                .with_description("1 while the player carries a plain sword")
                .with_callback(move |observer| {
                    observer.observe(u64::from(sword.has_sword()), &[]);
                })
                .build(),
        );
    }

    /// Flush and stop both providers. Blocks until the exporters finish.
    pub fn shutdown(self) {
        if let Err(e) = self.tracer_provider.shutdown() {
            warn!(error = %e, "Span exporter shutdown failed");
        }
        if let Err(e) = self.meter_provider.shutdown() {
            warn!(error = %e, "Metric exporter shutdown failed");
        }
    }
}

/// Resource attributes identifying this process.
pub fn resource(config: &TelemetryConfig) -> Resource {
    Resource::builder()
        .with_service_name(config.service_name.clone())
        .with_attribute(KeyValue::new("service.instance.id", "instance-1"))
        .build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use opentelemetry::{Key, Value};

    use super::*;

    #[test]
    fn disabled_export_builds_nothing() {
        let config = TelemetryConfig::default();
        assert!(Telemetry::init(&config).unwrap().is_none());
    }

    #[test]
    fn resource_names_the_service() {
        let config = TelemetryConfig {
            service_name: String::from("forge-test"),
            ..TelemetryConfig::default()
        };
        let resource = resource(&config);
        assert_eq!(
            resource.get(&Key::new("service.name")),
            Some(Value::from("forge-test"))
        );
        assert_eq!(
            resource.get(&Key::new("service.instance.id")),
            Some(Value::from("instance-1"))
        );
    }
}
