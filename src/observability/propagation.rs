//! Header carriers for trace context propagation.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use opentelemetry::propagation::{Extractor, Injector};

/// Reads propagation fields from request headers.
pub struct HeaderExtractor<'a>(pub &'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

/// Writes propagation fields into outbound headers.
///
/// Fields whose name or value is not a legal header are dropped.
pub struct HeaderInjector<'a>(pub &'a mut HeaderMap);

impl Injector for HeaderInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        let name = HeaderName::from_bytes(key.as_bytes());
        let value = HeaderValue::from_str(&value);
        if let (Ok(name), Ok(value)) = (name, value) {
            self.0.insert(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_reads_case_insensitively() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_bytes(b"TraceParent").unwrap(),
            HeaderValue::from_static("00-abc"),
        );

        let extractor = HeaderExtractor(&headers);
        assert_eq!(extractor.get("traceparent"), Some("00-abc"));
        assert_eq!(extractor.keys(), vec!["traceparent"]);
    }

    #[test]
    fn test_injector_skips_invalid_values() {
        let mut headers = HeaderMap::new();
        let mut injector = HeaderInjector(&mut headers);
        injector.set("traceparent", "00-abc".to_string());
        injector.set("tracestate", "bad\nvalue".to_string());

        assert_eq!(headers.get("traceparent").unwrap(), "00-abc");
        assert!(headers.get("tracestate").is_none());
    }
}
