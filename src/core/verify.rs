//! Reading compiled output back
//!
//! The compiler renders the whole file into memory first and then parses it
//! again here, so a value that would not survive the Rust literal parser is
//! caught before anything touches disk.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::core::compiler::TableSet;
use crate::core::escape::unescape_literal;
use crate::data::dataset::{ElementShape, MappingEntry, TableId};
use crate::utils::error::{GenError, GenResult};

/// Pseudo table name used for errors about the file as a whole
pub const OUTPUT_TABLE: &str = "compiled output";

lazy_static! {
    static ref STR_CONST: Regex = Regex::new(r#"^pub const (\w+): &str = "(.*)";$"#).unwrap();
    static ref TABLE_OPEN: Regex = Regex::new(r"^pub const (\w+): &\[(.+)\] = &\[$").unwrap();
    static ref PAIR_ELEMENT: Regex = Regex::new(r###"^    \(r##"(.*?)"##, "(.*)"\),$"###).unwrap();
    static ref STR_ELEMENT: Regex = Regex::new(r###"^    r##"(.*)"##,$"###).unwrap();
}

/// One element of a parsed table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedElement {
    Pair(MappingEntry),
    Str(String),
}

/// A table declaration read back from the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    pub element_type: String,
    pub elements: Vec<ParsedElement>,
}

/// Everything the compiled file declares, in declaration order
#[derive(Debug, Clone, Default)]
pub struct ParsedOutput {
    pub constants: IndexMap<String, String>,
    pub tables: IndexMap<String, ParsedTable>,
}

fn line_error(line_no: usize, message: impl std::fmt::Display) -> GenError {
    GenError::malformed(OUTPUT_TABLE, format!("line {}: {}", line_no, message))
}

/// Parse the text of a compiled data file.
pub fn parse_compiled(text: &str) -> GenResult<ParsedOutput> {
    let mut parsed = ParsedOutput::default();
    let mut open: Option<(String, ParsedTable)> = None;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;

        if line == "];" {
            if let Some((name, table)) = open.take() {
                if parsed.tables.contains_key(&name) {
                    return Err(line_error(line_no, format!("table {} declared twice", name)));
                }
                parsed.tables.insert(name, table);
                continue;
            }
        }

        if let Some((name, table)) = open.as_mut() {
            let element = if let Some(caps) = PAIR_ELEMENT.captures(line) {
                let value = unescape_literal(&caps[2])
                    .map_err(|e| line_error(line_no, format!("in {}: {}", name, e)))?;
                ParsedElement::Pair(MappingEntry::new(&caps[1], value))
            } else if let Some(caps) = STR_ELEMENT.captures(line) {
                ParsedElement::Str(caps[1].to_string())
            } else {
                return Err(line_error(
                    line_no,
                    format!("unexpected line in {}: {:?}", name, line),
                ));
            };
            table.elements.push(element);
            continue;
        }

        if let Some(caps) = STR_CONST.captures(line) {
            let value = unescape_literal(&caps[2]).map_err(|e| line_error(line_no, e))?;
            parsed.constants.insert(caps[1].to_string(), value);
        } else if let Some(caps) = TABLE_OPEN.captures(line) {
            open = Some((
                caps[1].to_string(),
                ParsedTable {
                    element_type: caps[2].to_string(),
                    elements: Vec::new(),
                },
            ));
        }
    }

    if let Some((name, _)) = open {
        return Err(GenError::malformed(name, "table is never closed"));
    }
    Ok(parsed)
}

fn expected_elements(tables: &TableSet, id: TableId) -> Vec<ParsedElement> {
    match id.shape() {
        ElementShape::Pair => tables
            .pairs(id)
            .iter()
            .cloned()
            .map(ParsedElement::Pair)
            .collect(),
        ElementShape::Str => tables
            .strings(id)
            .iter()
            .cloned()
            .map(ParsedElement::Str)
            .collect(),
    }
}

/// Check that `text` declares exactly `tables`, in order, with every string intact.
pub fn verify_round_trip(text: &str, version_const: &str, tables: &TableSet) -> GenResult<()> {
    let parsed = parse_compiled(text)?;

    match parsed.constants.get(version_const) {
        Some(version) if *version == tables.version => {}
        Some(version) => {
            return Err(GenError::malformed(
                version_const,
                format!("reads back as {:?}, expected {:?}", version, tables.version),
            ))
        }
        None => return Err(GenError::malformed(version_const, "constant is missing")),
    }

    let names: Vec<&str> = parsed.tables.keys().map(String::as_str).collect();
    let expected_names: Vec<&str> = TableId::ALL.iter().map(|id| id.name()).collect();
    if names != expected_names {
        return Err(GenError::malformed(
            OUTPUT_TABLE,
            format!("declares {:?}, expected {:?}", names, expected_names),
        ));
    }

    for id in TableId::ALL {
        let table = &parsed.tables[id.name()];
        if table.element_type != id.shape().rust_type() {
            return Err(GenError::malformed(
                id.name(),
                format!("element type {} instead of {}", table.element_type, id.shape().rust_type()),
            ));
        }

        let expected = expected_elements(tables, id);
        if table.elements.len() != expected.len() {
            return Err(GenError::malformed(
                id.name(),
                format!("{} elements read back, {} rendered", table.elements.len(), expected.len()),
            ));
        }
        if let Some((index, (got, want))) = table
            .elements
            .iter()
            .zip(&expected)
            .enumerate()
            .find(|(_, (got, want))| got != want)
        {
            return Err(GenError::malformed(
                id.name(),
                format!("element {} reads back as {:?}, expected {:?}", index, got, want),
            ));
        }
    }

    Ok(())
}
