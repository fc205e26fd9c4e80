//! In-memory model of the canonical mapping dataset

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single `(command, glyph)` correspondence
///
/// Serialized as a two-element `[key, value]` array, the same shape the
/// upstream tables use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct MappingEntry {
    pub key: String,
    pub value: String,
}

impl MappingEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl From<(String, String)> for MappingEntry {
    fn from((key, value): (String, String)) -> Self {
        Self { key, value }
    }
}

impl From<MappingEntry> for (String, String) {
    fn from(entry: MappingEntry) -> Self {
        (entry.key, entry.value)
    }
}

impl From<(&str, &str)> for MappingEntry {
    fn from((key, value): (&str, &str)) -> Self {
        Self::new(key, value)
    }
}

/// Element type of an emitted constant array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementShape {
    /// `(&str, &str)` key/value tuples
    Pair,
    /// bare `&str` elements
    Str,
}

impl ElementShape {
    /// The Rust element type written in the array declaration
    pub fn rust_type(self) -> &'static str {
        match self {
            ElementShape::Pair => "(&str, &str)",
            ElementShape::Str => "&str",
        }
    }
}

/// Every table the compiled output declares, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableId {
    Replacements,
    CombiningMarks,
    SubSuperScripts,
    ReplacementsWithBracketSuffix,
    CombiningMarksEscapedLatex,
}

impl TableId {
    /// Emission order of the compiled output
    pub const ALL: [TableId; 5] = [
        TableId::Replacements,
        TableId::CombiningMarks,
        TableId::SubSuperScripts,
        TableId::ReplacementsWithBracketSuffix,
        TableId::CombiningMarksEscapedLatex,
    ];

    /// The three hand-authored tables
    pub const BASE: [TableId; 3] = [
        TableId::Replacements,
        TableId::CombiningMarks,
        TableId::SubSuperScripts,
    ];

    /// Name of the emitted constant
    pub fn name(self) -> &'static str {
        match self {
            TableId::Replacements => "REPLACEMENTS",
            TableId::CombiningMarks => "COMBINING_MARKS",
            TableId::SubSuperScripts => "SUB_SUPER_SCRIPTS",
            TableId::ReplacementsWithBracketSuffix => "REPLACEMENTS_WITH_BRACKET_SUFFIX",
            TableId::CombiningMarksEscapedLatex => "COMBINING_MARKS_ESCAPED_LATEX",
        }
    }

    pub fn shape(self) -> ElementShape {
        match self {
            TableId::CombiningMarksEscapedLatex => ElementShape::Str,
            _ => ElementShape::Pair,
        }
    }

    /// Whether the table is computed from another one rather than authored
    pub fn is_derived(self) -> bool {
        !TableId::BASE.contains(&self)
    }

    pub fn from_name(name: &str) -> Option<TableId> {
        TableId::ALL.into_iter().find(|id| id.name() == name)
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The canonical dataset: an upstream version plus three ordered base tables
///
/// Field aliases accept the upstream module's own names
/// (`__version__`, `REPLACEMENTS`, `COMBININGMARKS`, `SUBSUPERSCRIPTS`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(alias = "__version__")]
    pub version: String,
    #[serde(alias = "REPLACEMENTS")]
    pub replacements: Vec<MappingEntry>,
    #[serde(alias = "COMBININGMARKS")]
    pub combining_marks: Vec<MappingEntry>,
    #[serde(alias = "SUBSUPERSCRIPTS")]
    pub sub_super_scripts: Vec<MappingEntry>,
}

impl Dataset {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn with_replacements<E: Into<MappingEntry>>(
        mut self,
        entries: impl IntoIterator<Item = E>,
    ) -> Self {
        self.replacements = entries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_combining_marks<E: Into<MappingEntry>>(
        mut self,
        entries: impl IntoIterator<Item = E>,
    ) -> Self {
        self.combining_marks = entries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sub_super_scripts<E: Into<MappingEntry>>(
        mut self,
        entries: impl IntoIterator<Item = E>,
    ) -> Self {
        self.sub_super_scripts = entries.into_iter().map(Into::into).collect();
        self
    }

    /// Entries of a base table; `None` for derived tables
    pub fn table(&self, id: TableId) -> Option<&[MappingEntry]> {
        match id {
            TableId::Replacements => Some(&self.replacements),
            TableId::CombiningMarks => Some(&self.combining_marks),
            TableId::SubSuperScripts => Some(&self.sub_super_scripts),
            _ => None,
        }
    }

    /// Iterate over the base tables in emission order
    pub fn base_tables(&self) -> impl Iterator<Item = (TableId, &[MappingEntry])> {
        TableId::BASE
            .into_iter()
            .filter_map(move |id| self.table(id).map(|entries| (id, entries)))
    }

    /// Total number of entries across the base tables
    pub fn entry_count(&self) -> usize {
        self.base_tables().map(|(_, entries)| entries.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_and_names() {
        let names: Vec<_> = TableId::ALL.iter().map(|id| id.name()).collect();
        assert_eq!(
            names,
            [
                "REPLACEMENTS",
                "COMBINING_MARKS",
                "SUB_SUPER_SCRIPTS",
                "REPLACEMENTS_WITH_BRACKET_SUFFIX",
                "COMBINING_MARKS_ESCAPED_LATEX",
            ]
        );
        assert_eq!(TableId::from_name("COMBINING_MARKS"), Some(TableId::CombiningMarks));
        assert_eq!(TableId::from_name("combining_marks"), None);
    }

    #[test]
    fn test_derived_flags() {
        assert!(!TableId::Replacements.is_derived());
        assert!(TableId::ReplacementsWithBracketSuffix.is_derived());
        assert_eq!(TableId::CombiningMarksEscapedLatex.shape(), ElementShape::Str);
        assert_eq!(TableId::SubSuperScripts.shape().rust_type(), "(&str, &str)");
    }

    #[test]
    fn test_builder_and_counts() {
        let ds = Dataset::new("0.7.5")
            .with_replacements([("\\alpha", "α"), ("\\beta", "β")])
            .with_combining_marks([("\\acute", "\u{301}")])
            .with_sub_super_scripts([("^2", "²")]);
        assert_eq!(ds.entry_count(), 4);
        assert!(ds.table(TableId::ReplacementsWithBracketSuffix).is_none());
        let ids: Vec<_> = ds.base_tables().map(|(id, _)| id).collect();
        assert_eq!(ids, TableId::BASE);
    }

    #[test]
    fn test_entry_serializes_as_pair() {
        let entry = MappingEntry::new("\\doteq", "≐");
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"["\\doteq","≐"]"#);
        let back: MappingEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
