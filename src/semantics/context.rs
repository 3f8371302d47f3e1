use log::debug;

use crate::Position;

use super::diagnostics::{Diagnostic, DiagnosticKind, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// When false, warnings are dropped as they are reported.
    pub warnings_enabled: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            warnings_enabled: true,
        }
    }
}

/// State shared by the passes over one compilation unit: the symbol
/// ordinal counter and the diagnostics sink.
#[derive(Debug, Clone, Default)]
pub struct CompilationContext {
    options: Options,
    next_ordinal: usize,
    diagnostics: Vec<Diagnostic>,
}

impl CompilationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Options) -> Self {
        CompilationContext {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn next_ordinal(&mut self) -> usize {
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        ordinal
    }

    pub fn add_error(&mut self, position: Position, kind: DiagnosticKind) {
        self.push(Diagnostic {
            position,
            severity: Severity::Error,
            kind,
        });
    }

    pub fn add_warning(&mut self, position: Position, kind: DiagnosticKind) {
        if !self.options.warnings_enabled {
            return;
        }

        self.push(Diagnostic {
            position,
            severity: Severity::Warning,
            kind,
        });
    }

    /// Records a diagnostic once. Re-running a pass over the same unit
    /// reports the same problems at the same places, and those are dropped.
    fn push(&mut self, diagnostic: Diagnostic) {
        if self.diagnostics.contains(&diagnostic) {
            debug!("already reported at {}: {}", diagnostic.position, diagnostic.kind);
            return;
        }

        debug!(
            "{} at {}: {}",
            diagnostic.severity, diagnostic.position, diagnostic.kind
        );
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }

    /// Orders the diagnostics by row, column and severity. The sort is
    /// stable, so reports at the same spot keep their discovery order.
    pub fn sort_and_report(&mut self) -> &[Diagnostic] {
        self.diagnostics
            .sort_by_key(|d| (d.position.row, d.position.col, d.severity));
        &self.diagnostics
    }

    /// Drops all diagnostics and restarts ordinals for a new unit.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.next_ordinal = 0;
    }
}
