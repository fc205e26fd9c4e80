//! Rendering of tables into `pub const` array declarations
//!
//! Keys are written as raw literals (`r##"..."##`) so LaTeX commands stay
//! readable in the generated file; values go through [`escape_str`]. Every
//! table keeps one element per line, guarded by `#[rustfmt::skip]`.

use crate::core::escape::escape_str;
use crate::data::dataset::{ElementShape, MappingEntry};
use crate::utils::error::{GenError, GenResult};

/// Hash fence used for raw literals
pub const RAW_FENCE: &str = "##";

/// Sequence that would end a raw literal early; no raw text may contain it
pub const RAW_TERMINATOR: &str = "\"##";

/// Keeps rustfmt from re-wrapping the array
pub const SKIP_FORMAT_DIRECTIVE: &str = "#[rustfmt::skip]";

const INDENT: &str = "    ";

/// Text-direction controls; rustc denies them inside literals
const BIDI_CONTROLS: &[char] = &[
    '\u{202a}', '\u{202b}', '\u{202c}', '\u{202d}', '\u{202e}', '\u{2066}', '\u{2067}',
    '\u{2068}', '\u{2069}',
];

/// Quote `text` as a raw literal, refusing anything that cannot round-trip.
pub fn raw_literal(table: &str, text: &str) -> GenResult<String> {
    if text.contains(RAW_TERMINATOR) {
        return Err(GenError::malformed(
            table,
            format!("key {:?} contains the reserved raw delimiter `{}`", text, RAW_TERMINATOR),
        ));
    }
    if text.contains(['\n', '\r']) {
        return Err(GenError::malformed(
            table,
            format!("key {:?} contains a line break", text),
        ));
    }
    if let Some(c) = text.chars().find(|c| BIDI_CONTROLS.contains(c)) {
        return Err(GenError::malformed(
            table,
            format!("key {:?} contains the text-direction control U+{:04X}", text, c as u32),
        ));
    }
    Ok(format!("r{fence}\"{}\"{fence}", text, fence = RAW_FENCE))
}

/// Quote `text` as an ordinary escaped literal. Never fails.
pub fn string_literal(text: &str) -> String {
    format!("\"{}\"", escape_str(text))
}

/// `(r##"key"##, "escaped value")`
pub fn pair_literal(table: &str, entry: &MappingEntry) -> GenResult<String> {
    Ok(format!(
        "({}, {})",
        raw_literal(table, &entry.key)?,
        string_literal(&entry.value)
    ))
}

/// Renders one `pub const NAME: &[T] = &[ ... ];` block
#[derive(Debug, Clone)]
pub struct TableRenderer<'a> {
    name: &'a str,
    shape: ElementShape,
    allow_empty: bool,
}

impl<'a> TableRenderer<'a> {
    pub fn new(name: &'a str, shape: ElementShape) -> Self {
        Self {
            name,
            shape,
            allow_empty: false,
        }
    }

    /// Permit a table with no elements (rejected by default)
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    /// Render `elements` through a caller-supplied element renderer.
    ///
    /// Appends the block to `out` only when every element rendered, and
    /// returns the number of elements written.
    pub fn render<T, F>(
        &self,
        out: &mut String,
        elements: impl IntoIterator<Item = T>,
        mut render_element: F,
    ) -> GenResult<usize>
    where
        F: FnMut(T) -> GenResult<String>,
    {
        let mut block = String::new();
        block.push('\n');
        block.push_str(SKIP_FORMAT_DIRECTIVE);
        block.push('\n');
        block.push_str(&format!(
            "pub const {}: &[{}] = &[\n",
            self.name,
            self.shape.rust_type()
        ));

        let mut count = 0;
        for element in elements {
            block.push_str(INDENT);
            block.push_str(&render_element(element)?);
            block.push_str(",\n");
            count += 1;
        }
        block.push_str("];\n");

        if count == 0 && !self.allow_empty {
            return Err(GenError::malformed(self.name, "table is empty"));
        }

        out.push_str(&block);
        Ok(count)
    }

    /// Render key/value entries with the default pair layout.
    pub fn render_pairs(&self, out: &mut String, entries: &[MappingEntry]) -> GenResult<usize> {
        let name = self.name;
        self.render(out, entries, |entry| pair_literal(name, entry))
    }

    /// Render bare strings as raw literals.
    pub fn render_raw_strings(&self, out: &mut String, items: &[String]) -> GenResult<usize> {
        let name = self.name;
        self.render(out, items, |item| raw_literal(name, item))
    }
}
