use tracing::{debug, warn};

use crate::error::ChangeError;

/// An error recorded against a source line.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportedError {
    pub error: ChangeError,
    /// Source line, 0 when unknown
    pub line: usize,
}

/// Error and warning sink for one compilation unit.
///
/// Holds at most one error: the first report wins and later ones are
/// dropped, since everything after the first hard error is usually fallout
/// from it. Warnings accumulate.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    error: Option<ReportedError>,
    warnings: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `error` unless an earlier error is already pending.
    pub fn report_error(&mut self, error: ChangeError, line: usize) {
        if let Some(pending) = &self.error {
            debug!(%error, pending = %pending.error, "suppressing error after first");
            return;
        }
        self.error = Some(ReportedError { error, line });
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.warnings.push(message);
    }

    pub fn error(&self) -> Option<&ReportedError> {
        self.error.as_ref()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}
