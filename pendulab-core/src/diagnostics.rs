//! Diagnostics and error reporting for pendulab
//!
//! This module provides utilities for collecting scenario findings and
//! rendering scenario errors with context from the source text.

use crate::error::ScenarioError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single finding about a scenario
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub message: String,
    /// Field path inside the scenario, e.g. `pendulums[1].physical.m2`
    pub path: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, path: Option<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            message: message.into(),
            path,
        }
    }

    pub fn warning(message: impl Into<String>, path: Option<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            message: message.into(),
            path,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {} ({})", self.severity, self.message, path),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Ordered collection of diagnostics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn has_errors(&self) -> bool {
        self.items
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.items
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Error)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(items: Vec<Diagnostic>) -> Self {
        Self { items }
    }
}

/// Format a scenario error with context from the source text
pub fn format_scenario_error(error: &ScenarioError, source: &str) -> String {
    let mut msg = format!("Scenario error: {}", error);

    match error {
        ScenarioError::Parse { line, column, .. } => {
            // ron positions are 1-based
            if let Some(text) = line.checked_sub(1).and_then(|idx| source.lines().nth(idx)) {
                msg.push_str(&format!("\n  at line {}: {}", line, text));
                msg.push_str(&format!(
                    "\n  {}^",
                    " ".repeat(column.saturating_sub(1) + format!("at line {}: ", line).len())
                ));
            }
        }
        ScenarioError::Invalid(diagnostics) => {
            for diagnostic in diagnostics.iter() {
                msg.push_str(&format!("\n  {}", diagnostic));
            }
        }
        ScenarioError::Sim(_) => {}
    }

    msg
}
