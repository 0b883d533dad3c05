//! Prometheus gauges for check results.
//!
//! - `urlmon_external_url_up`: 0 if url is down, 1 if it is up
//! - `urlmon_external_url_response_ms`: milliseconds to receive the response
//!
//! Both are last-value gauges labelled by `url`.

use super::Observer;
use crate::error::MonitorResult;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::time::Duration;

const NAMESPACE: &str = "urlmon";
const SUBSYSTEM: &str = "external_url";

/// Observer backed by its own Prometheus registry.
#[derive(Clone)]
pub struct PrometheusObserver {
    registry: Registry,
    url_up: GaugeVec,
    url_response_ms: GaugeVec,
}

impl std::fmt::Debug for PrometheusObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusObserver").finish_non_exhaustive()
    }
}

impl PrometheusObserver {
    /// Create an observer with a fresh registry.
    pub fn new() -> MonitorResult<Self> {
        Self::with_registry(Registry::new())
    }

    /// Register the gauges on an existing registry.
    pub fn with_registry(registry: Registry) -> MonitorResult<Self> {
        let url_up = GaugeVec::new(
            Opts::new("up", "0 if url is down, 1 if it is up")
                .namespace(NAMESPACE)
                .subsystem(SUBSYSTEM),
            &["url"],
        )?;
        registry.register(Box::new(url_up.clone()))?;

        let url_response_ms = GaugeVec::new(
            Opts::new("response_ms", "number of milliseconds to receive response")
                .namespace(NAMESPACE)
                .subsystem(SUBSYSTEM),
            &["url"],
        )?;
        registry.register(Box::new(url_response_ms.clone()))?;

        Ok(Self {
            registry,
            url_up,
            url_response_ms,
        })
    }

    /// Underlying registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render all registered metrics in the text exposition format.
    pub fn encode(&self) -> MonitorResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        // TextEncoder only emits UTF-8
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Current up gauge value for `url`, if it has been recorded.
    pub fn up_value(&self, url: &str) -> Option<f64> {
        self.gauge_value("urlmon_external_url_up", url)
    }

    /// Current response time gauge value for `url`, if it has been recorded.
    pub fn response_ms_value(&self, url: &str) -> Option<f64> {
        self.gauge_value("urlmon_external_url_response_ms", url)
    }

    fn gauge_value(&self, family: &str, url: &str) -> Option<f64> {
        self.registry
            .gather()
            .into_iter()
            .find(|mf| mf.get_name() == family)?
            .get_metric()
            .iter()
            .find(|m| {
                m.get_label()
                    .iter()
                    .any(|l| l.get_name() == "url" && l.get_value() == url)
            })
            .map(|m| m.get_gauge().get_value())
    }
}

impl Observer for PrometheusObserver {
    fn record(&self, url: &str, up: bool, duration: Duration) {
        self.url_up
            .with_label_values(&[url])
            .set(if up { 1.0 } else { 0.0 });
        self.url_response_ms
            .with_label_values(&[url])
            .set(duration.as_millis() as f64);
    }

    fn name(&self) -> &str {
        "prometheus"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prometheus_name() {
        assert_eq!(PrometheusObserver::new().unwrap().name(), "prometheus");
    }

    #[test]
    fn record_sets_last_value() {
        let observer = PrometheusObserver::new().unwrap();

        observer.record("http://a.example", true, Duration::from_millis(120));
        assert_eq!(observer.up_value("http://a.example"), Some(1.0));
        assert_eq!(observer.response_ms_value("http://a.example"), Some(120.0));

        observer.record("http://a.example", false, Duration::from_millis(5));
        assert_eq!(observer.up_value("http://a.example"), Some(0.0));
        assert_eq!(observer.response_ms_value("http://a.example"), Some(5.0));
    }

    #[test]
    fn sub_millisecond_durations_truncate() {
        let observer = PrometheusObserver::new().unwrap();
        observer.record("http://a.example", true, Duration::from_micros(1999));
        assert_eq!(observer.response_ms_value("http://a.example"), Some(1.0));
    }

    #[test]
    fn encode_contains_labelled_gauges() {
        let observer = PrometheusObserver::new().unwrap();
        observer.record("http://a.example", true, Duration::from_millis(42));
        observer.record("http://b.example", false, Duration::from_millis(7));

        let text = observer.encode().unwrap();
        assert!(text.contains("# TYPE urlmon_external_url_up gauge"));
        assert!(text.contains("urlmon_external_url_up{url=\"http://a.example\"} 1"));
        assert!(text.contains("urlmon_external_url_up{url=\"http://b.example\"} 0"));
        assert!(text.contains("urlmon_external_url_response_ms{url=\"http://a.example\"} 42"));
    }

    #[test]
    fn unrecorded_url_has_no_value() {
        let observer = PrometheusObserver::new().unwrap();
        assert_eq!(observer.up_value("http://never.example"), None);
    }

    #[test]
    fn duplicate_registration_fails() {
        let registry = Registry::new();
        PrometheusObserver::with_registry(registry.clone()).unwrap();
        assert!(PrometheusObserver::with_registry(registry).is_err());
    }

    #[test]
    fn clones_share_gauges() {
        let observer = PrometheusObserver::new().unwrap();
        let clone = observer.clone();
        clone.record("http://a.example", true, Duration::from_millis(1));
        assert_eq!(observer.up_value("http://a.example"), Some(1.0));
    }
}
