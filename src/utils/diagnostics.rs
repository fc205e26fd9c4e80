//! Dataset diagnostics
//!
//! The compiler stops at the first problem it cannot render around. This
//! module looks at the whole dataset up front and reports everything it finds:
//!
//! - Errors: anything that would make the compiler abort (empty tables,
//!   keys colliding with the raw-literal delimiter, unreshapeable keys)
//! - Warnings: data that renders fine but will confuse the consuming library
//!   (ordering, duplicate keys, shadowed combining marks, empty values)
//!
//! ## Example
//!
//! ```rust
//! use unicodeit_datagen::data::Dataset;
//! use unicodeit_datagen::diagnostics::check_dataset;
//!
//! let ds = Dataset::new("0.7.5")
//!     .with_replacements([("\\alpha", "α"), ("\\longrightarrow", "⟶")])
//!     .with_combining_marks([("\\acute", "\u{301}")])
//!     .with_sub_super_scripts([("^2", "²")]);
//! let result = check_dataset(&ds);
//! assert!(!result.has_errors());
//! assert_eq!(result.warnings, 1); // longer key after a shorter one
//! ```

use fxhash::FxHashMap;
use std::fmt;

use crate::core::derive::{escaped_latex_key, BRACKET_SUFFIX};
use crate::core::render::raw_literal;
use crate::data::dataset::{Dataset, MappingEntry, TableId};
use crate::utils::error::GenError;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Informational note
    Info,
    /// Warning - output is valid but probably not what the library expects
    Warning,
    /// Error - the compiler will refuse this dataset
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,
    /// Human-readable message
    pub message: String,
    /// Table the entry belongs to
    pub table: Option<TableId>,
    /// Position of the entry within its table (0-indexed)
    pub index: Option<usize>,
    /// The offending key
    pub key: Option<String>,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            table: None,
            index: None,
            key: None,
            suggestion: None,
        }
    }

    /// Point at a whole table
    pub fn in_table(mut self, table: TableId) -> Self {
        self.table = Some(table);
        self
    }

    /// Point at an entry of a table
    pub fn at(mut self, table: TableId, index: usize) -> Self {
        self.table = Some(table);
        self.index = Some(index);
        self
    }

    /// Add the offending key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: level: message
        //         --> TABLE[index]
        //         |
        //         | key
        //         = help: suggestion

        write!(f, "{}: {}", self.level, self.message)?;

        match (self.table, self.index) {
            (Some(table), Some(index)) => write!(f, "\n  --> {}[{}]", table, index)?,
            (Some(table), None) => write!(f, "\n  --> {}", table)?,
            _ => {}
        }

        if let Some(ref key) = self.key {
            write!(f, "\n  |\n  | {:?}", key)?;
        }

        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  = help: {}", suggestion)?;
        }

        Ok(())
    }
}

/// Check result with summary
#[derive(Debug, Default)]
pub struct CheckResult {
    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,
    /// Number of errors
    pub errors: usize,
    /// Number of warnings
    pub warnings: usize,
    /// Number of info messages
    pub infos: usize,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Error => self.errors += 1,
            DiagnosticLevel::Warning => self.warnings += 1,
            DiagnosticLevel::Info => self.infos += 1,
        }
        self.diagnostics.push(diag);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Errors or warnings present; info notes do not count
    pub fn has_issues(&self) -> bool {
        self.errors + self.warnings > 0
    }

    /// Check if there are any issues at all
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get summary string
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.errors > 0 {
            parts.push(format!(
                "{} error{}",
                self.errors,
                if self.errors == 1 { "" } else { "s" }
            ));
        }
        if self.warnings > 0 {
            parts.push(format!(
                "{} warning{}",
                self.warnings,
                if self.warnings == 1 { "" } else { "s" }
            ));
        }
        if self.infos > 0 {
            parts.push(format!(
                "{} note{}",
                self.infos,
                if self.infos == 1 { "" } else { "s" }
            ));
        }
        if parts.is_empty() {
            "no issues found".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Check the whole dataset for issues
pub fn check_dataset(dataset: &Dataset) -> CheckResult {
    let mut result = CheckResult::new();

    for (id, entries) in dataset.base_tables() {
        if entries.is_empty() {
            result.add(
                Diagnostic::new(DiagnosticLevel::Error, "table is empty")
                    .in_table(id)
                    .with_suggestion("every base table needs at least one entry"),
            );
            continue;
        }
        check_keys_renderable(id, entries, &mut result);
        check_length_order(id, entries, &mut result);
        check_duplicates(id, entries, &mut result);
        check_empty_values(id, entries, &mut result);
    }

    check_combining_keys(&dataset.combining_marks, &mut result);
    check_combining_shadowed(dataset, &mut result);

    let suffixed = dataset
        .replacements
        .iter()
        .filter(|e| e.key.ends_with(BRACKET_SUFFIX))
        .count();
    result.add(Diagnostic::new(
        DiagnosticLevel::Info,
        format!("replacements ending in `{}`: {}", BRACKET_SUFFIX, suffixed),
    ));

    result
}

/// Keys must be representable as raw literals
fn check_keys_renderable(id: TableId, entries: &[MappingEntry], result: &mut CheckResult) {
    for (index, entry) in entries.iter().enumerate() {
        if let Err(GenError::MalformedData { message, .. }) = raw_literal(id.name(), &entry.key) {
            result.add(
                Diagnostic::new(DiagnosticLevel::Error, message)
                    .at(id, index)
                    .with_key(&entry.key),
            );
        }
    }
}

/// Lookup is first-match-wins, so longer commands must come first
fn check_length_order(id: TableId, entries: &[MappingEntry], result: &mut CheckResult) {
    let mut previous: Option<(&str, usize)> = None;
    for (index, entry) in entries.iter().enumerate() {
        // Character count, not bytes: `\alpha` and `α` compare by what a reader sees
        let len = entry.key.chars().count();
        if let Some((prev_key, prev_len)) = previous {
            if len > prev_len {
                result.add(
                    Diagnostic::new(
                        DiagnosticLevel::Warning,
                        format!(
                            "key is longer ({} chars) than the preceding {:?} ({} chars)",
                            len, prev_key, prev_len
                        ),
                    )
                    .at(id, index)
                    .with_key(&entry.key)
                    .with_suggestion("order keys by decreasing length"),
                );
            }
        }
        previous = Some((entry.key.as_str(), len));
    }
}

fn check_duplicates(id: TableId, entries: &[MappingEntry], result: &mut CheckResult) {
    let mut seen: FxHashMap<&str, usize> = FxHashMap::default();
    for (index, entry) in entries.iter().enumerate() {
        if let Some(first) = seen.get(entry.key.as_str()) {
            result.add(
                Diagnostic::new(
                    DiagnosticLevel::Warning,
                    format!("duplicate key, first defined at index {}", first),
                )
                .at(id, index)
                .with_key(&entry.key),
            );
        } else {
            seen.insert(entry.key.as_str(), index);
        }
    }
}

fn check_empty_values(id: TableId, entries: &[MappingEntry], result: &mut CheckResult) {
    for (index, entry) in entries.iter().enumerate() {
        if entry.value.is_empty() {
            result.add(
                Diagnostic::new(DiagnosticLevel::Warning, "empty replacement value")
                    .at(id, index)
                    .with_key(&entry.key),
            );
        }
    }
}

fn check_combining_keys(entries: &[MappingEntry], result: &mut CheckResult) {
    for (index, entry) in entries.iter().enumerate() {
        match escaped_latex_key(&entry.key) {
            None => result.add(
                Diagnostic::new(DiagnosticLevel::Error, "empty key cannot be reshaped")
                    .at(TableId::CombiningMarks, index),
            ),
            Some(reshaped) => {
                if let Err(GenError::MalformedData { message, .. }) =
                    raw_literal(TableId::CombiningMarksEscapedLatex.name(), &reshaped)
                {
                    result.add(
                        Diagnostic::new(DiagnosticLevel::Error, message)
                            .at(TableId::CombiningMarks, index)
                            .with_key(&entry.key),
                    );
                }
            }
        }
    }
}

/// A command present in both tables must not map to the combining mark itself
fn check_combining_shadowed(dataset: &Dataset, result: &mut CheckResult) {
    let replacements: FxHashMap<String, &str> = dataset
        .replacements
        .iter()
        .map(|e| (e.key.replace(BRACKET_SUFFIX, ""), e.value.as_str()))
        .collect();

    for (index, entry) in dataset.combining_marks.iter().enumerate() {
        let command = entry.key.replace(BRACKET_SUFFIX, "");
        if replacements.get(&command) == Some(&entry.value.as_str()) {
            result.add(
                Diagnostic::new(
                    DiagnosticLevel::Warning,
                    "command is also a replacement with the same combining value",
                )
                .at(TableId::CombiningMarks, index)
                .with_key(&entry.key)
                .with_suggestion("map the replacement to a spacing form of the mark"),
            );
        }
    }
}

/// Format check results for terminal output
pub fn format_diagnostics(result: &CheckResult, use_color: bool) -> String {
    let mut output = String::new();

    for diag in &result.diagnostics {
        if use_color {
            let color = match diag.level {
                DiagnosticLevel::Error => "\x1b[31m",   // Red
                DiagnosticLevel::Warning => "\x1b[33m", // Yellow
                DiagnosticLevel::Info => "\x1b[34m",    // Blue
            };
            output.push_str(color);
            output.push_str(&format!("{}", diag));
            output.push_str("\x1b[0m\n\n");
        } else {
            output.push_str(&format!("{}\n\n", diag));
        }
    }

    // Summary
    if use_color {
        if result.has_errors() {
            output.push_str("\x1b[31m");
        } else if result.warnings > 0 {
            output.push_str("\x1b[33m");
        } else {
            output.push_str("\x1b[32m");
        }
    }

    output.push_str(&format!("Summary: {}", result.summary()));

    if use_color {
        output.push_str("\x1b[0m");
    }

    output
}
