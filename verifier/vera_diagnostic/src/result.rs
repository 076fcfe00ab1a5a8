//! Terminal result shapes of a verification run.

use serde::{Deserialize, Serialize};

use crate::Diagnostic;

/// Outcome of fully analyzing a source unit.
///
/// A closed tagged union, kept closed so the persisted encoding stays
/// checkable: new outcome shapes are new variants under a new format
/// version, never open payloads.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum DiagnosticResult {
    /// Verification succeeded with no findings.
    #[default]
    Safe,
    /// Verification completed and produced findings.
    Unsafe(Vec<Diagnostic>),
    /// The analysis engine crashed; `context` describes where.
    Crash {
        diagnostics: Vec<Diagnostic>,
        context: String,
    },
}

impl DiagnosticResult {
    /// Returns `true` for [`DiagnosticResult::Safe`].
    pub fn is_safe(&self) -> bool {
        matches!(self, DiagnosticResult::Safe)
    }

    /// The diagnostic list, empty for `Safe`.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            DiagnosticResult::Safe => &[],
            DiagnosticResult::Unsafe(diagnostics)
            | DiagnosticResult::Crash { diagnostics, .. } => diagnostics,
        }
    }

    /// Consume the result, yielding its diagnostic list.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        match self {
            DiagnosticResult::Safe => Vec::new(),
            DiagnosticResult::Unsafe(diagnostics)
            | DiagnosticResult::Crash { diagnostics, .. } => diagnostics,
        }
    }

    /// Transform the diagnostic list while preserving the result shape.
    ///
    /// `Safe` passes through untouched; `Unsafe` stays `Unsafe` and `Crash`
    /// keeps its context, even if `f` empties the list.
    #[must_use]
    pub fn map_diagnostics(self, f: impl FnOnce(Vec<Diagnostic>) -> Vec<Diagnostic>) -> Self {
        match self {
            DiagnosticResult::Safe => DiagnosticResult::Safe,
            DiagnosticResult::Unsafe(diagnostics) => DiagnosticResult::Unsafe(f(diagnostics)),
            DiagnosticResult::Crash {
                diagnostics,
                context,
            } => DiagnosticResult::Crash {
                diagnostics: f(diagnostics),
                context,
            },
        }
    }
}
