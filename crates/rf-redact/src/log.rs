//! Hand-off of redacted payloads to the logging pipeline.
//!
//! Request variables are redacted and emitted as one structured `tracing`
//! event. The sanitized mapping is also returned, but it is for logging only:
//! never feed it back into request execution.

use crate::redactor::Redactor;
use rf_common::value::Mapping;
use serde::Serialize;
use tracing::info;

/// Redact request variables and log them under `rf_redact::request`.
pub fn log_request_variables<T>(redactor: &Redactor, operation: &str, variables: &T) -> Mapping
where
    T: Serialize + ?Sized,
{
    let sanitized = redactor.redact(variables);
    let rendered = serde_json::to_string(&sanitized).unwrap_or_else(|_| "{}".to_string());

    info!(
        target: "rf_redact::request",
        operation = %operation,
        variables = %rendered,
        "request variables"
    );
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RedactionRegistry;
    use serde_json::json;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn capture<F: FnOnce()>(f: F) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        captured.contents()
    }

    #[test]
    fn test_logged_variables_are_redacted() {
        let redactor = Redactor::new(RedactionRegistry::from_names(["apiKey"]));
        let vars = json!({"projectId": "p1", "apiKey": "sk-live-123"});

        let output = capture(|| {
            let sanitized = log_request_variables(&redactor, "SaveProject", &vars);
            assert_eq!(sanitized["apiKey"].as_str(), Some("REDACTED"));
        });

        assert!(output.contains("SaveProject"));
        assert!(output.contains("REDACTED"));
        assert!(output.contains("p1"));
        assert!(!output.contains("sk-live-123"));
    }

    #[test]
    fn test_copy_failure_is_logged_and_nothing_leaks() {
        let redactor = Redactor::new(RedactionRegistry::from_names(["apiKey"]));
        let vars = json!(["sk-live-123"]);

        let output = capture(|| {
            let sanitized = log_request_variables(&redactor, "Broken", &vars);
            assert!(sanitized.is_empty());
        });

        assert!(output.contains("failed to deep copy payload"));
        assert!(output.contains("variables={}"));
        assert!(!output.contains("sk-live-123"));
    }
}
