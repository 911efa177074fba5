//! Non-fatal diagnostics.
//!
//! Components that need to report a problem without aborting (an unknown key
//! while consuming, a row without a developer-language value, an empty output
//! file that gets skipped) receive a [`DiagnosticSink`] instead of printing.

/// Receiver for warnings and informational messages.
pub trait DiagnosticSink {
    /// Reports a problem that does not stop the current operation.
    fn warning(&mut self, message: &str);

    /// Reports progress worth surfacing to the user.
    fn info(&mut self, message: &str) {
        let _ = message;
    }
}

/// Forwards every diagnostic to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warning(&mut self, message: &str) {
        tracing::warn!("{message}");
    }

    fn info(&mut self, message: &str) {
        tracing::info!("{message}");
    }
}

/// Keeps diagnostics in memory, mostly useful for tests and for callers that
/// want to render them themselves.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectingSink {
    pub warnings: Vec<String>,
    pub infos: Vec<String>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any warning contains `needle`.
    pub fn has_warning(&self, needle: &str) -> bool {
        self.warnings.iter().any(|w| w.contains(needle))
    }
}

impl DiagnosticSink for CollectingSink {
    fn warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_records_in_order() {
        let mut sink = CollectingSink::new();
        sink.warning("first");
        sink.info("note");
        sink.warning("second");
        assert_eq!(sink.warnings, vec!["first", "second"]);
        assert_eq!(sink.infos, vec!["note"]);
        assert!(sink.has_warning("sec"));
        assert!(!sink.has_warning("note"));
    }
}
