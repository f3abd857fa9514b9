//! Syntax diagnostics.
//!
//! Every `Invalid` token in the stream becomes an error [`Diagnostic`]. Hosts can render these
//! as squiggles, gutter markers, or entries in a problems panel.

use std::collections::HashSet;
use yaml_editor_core_scanner::{Token, TokenKind};

/// Source name attached to every syntax diagnostic.
pub const DIAGNOSTIC_SOURCE: &str = "yaml";

/// A half-open character-offset range (`start..end`) in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticRange {
    /// Range start offset (inclusive), in Unicode scalar values (`char`) from the start of the document.
    pub start: usize,
    /// Range end offset (exclusive), in Unicode scalar values (`char`) from the start of the document.
    pub end: usize,
}

impl DiagnosticRange {
    /// Create a new diagnostic range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Diagnostic severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    /// Error diagnostics.
    Error,
    /// Warning diagnostics.
    Warning,
}

/// A single diagnostic item for the current document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Diagnostic range in character offsets.
    pub range: DiagnosticRange,
    /// Diagnostic severity.
    pub severity: DiagnosticSeverity,
    /// Diagnostic source (always [`DIAGNOSTIC_SOURCE`] for syntax errors).
    pub source: String,
    /// Diagnostic message.
    pub message: String,
}

/// Collect one error diagnostic per distinct `Invalid` token message.
///
/// When the same message is reported for several spans, only the first span is kept.
pub fn syntax_diagnostics<'a, I>(tokens: I) -> Vec<Diagnostic>
where
    I: IntoIterator<Item = &'a Token>,
{
    let mut seen = HashSet::new();
    let mut diagnostics = Vec::new();

    for token in tokens {
        let TokenKind::Invalid(message) = &token.kind else {
            continue;
        };
        if !seen.insert(message.as_str()) {
            continue;
        }

        diagnostics.push(Diagnostic {
            range: DiagnosticRange::new(token.start.index, token.end.index),
            severity: DiagnosticSeverity::Error,
            source: DIAGNOSTIC_SOURCE.to_string(),
            message: message.clone(),
        });
    }

    diagnostics
}
