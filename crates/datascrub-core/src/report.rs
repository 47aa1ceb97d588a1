//! Reporting port for audit events emitted by the cleaning operations.
//!
//! Operations never print. Each column-level action is handed to a
//! [`Reporter`] as a `(column, description)` pair, and the caller decides
//! where it goes.

/// Receiver of `(column, description)` audit events
pub trait Reporter {
    fn report(&mut self, column: &str, description: &str);
}

impl<F> Reporter for F
where
    F: FnMut(&str, &str),
{
    fn report(&mut self, column: &str, description: &str) {
        self(column, description)
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn report(&mut self, _column: &str, _description: &str) {}
}

/// Forwards events to `tracing` at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, column: &str, description: &str) {
        tracing::info!(column, "{}", description);
    }
}

/// A recorded audit event
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AuditEvent {
    pub column: String,
    pub description: String,
}

/// Keeps every event in memory, in emission order
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
    events: Vec<AuditEvent>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<AuditEvent> {
        self.events
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, column: &str, description: &str) {
        self.events.push(AuditEvent {
            column: column.to_string(),
            description: description.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_reporter_keeps_order() {
        let mut reporter = RecordingReporter::new();
        reporter.report("age", "filled 1 missing value using mean");
        reporter.report("city", "filled 1 missing value with custom value unknown");

        let columns: Vec<&str> = reporter.events().iter().map(|e| e.column.as_str()).collect();
        assert_eq!(columns, vec!["age", "city"]);
    }

    #[test]
    fn test_closure_reporter() {
        let mut seen = Vec::new();
        {
            let mut reporter = |column: &str, description: &str| {
                seen.push(format!("{column}: {description}"));
            };
            reporter.report("age", "scaled");
        }
        assert_eq!(seen, vec!["age: scaled".to_string()]);
    }
}
