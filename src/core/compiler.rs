//! The table compiler
//!
//! Turns a [`Dataset`] into the text of `src/data.rs` for the `unicodeit`
//! library: a stamped header, the version constant, the three base tables and
//! the two derived tables. Rendering happens entirely in memory; the result is
//! verified and only then written, atomically, by [`write_atomic`].

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, info};

use crate::core::derive::{escaped_latex_keys, with_bracket_suffix, BRACKET_SUFFIX};
use crate::core::escape::escape_str;
use crate::core::render::{raw_literal, TableRenderer};
use crate::core::verify::verify_round_trip;
use crate::data::dataset::{Dataset, MappingEntry, TableId};
use crate::data::source::DatasetSource;
use crate::utils::error::{GenError, GenResult};

/// Options for the table compiler
#[derive(Debug, Clone)]
pub struct RegenOptions {
    /// Generator named in the do-not-edit header
    pub generator: String,
    /// Name of the upstream project the data comes from
    pub upstream_name: String,
    /// Link used in the version constant's doc comment
    pub upstream_url: String,
    /// SPDX expression for the generated file
    pub license: String,
    /// Name of the emitted version constant
    pub version_const: String,
    /// Fail when no replacement key ends in `{}` (guards against upstream drift)
    pub require_bracket_suffix: bool,
    /// Parse the rendered text back and compare before returning it
    pub verify_round_trip: bool,
}

impl Default for RegenOptions {
    fn default() -> Self {
        Self {
            generator: "regen".to_string(),
            upstream_name: "unicodeit".to_string(),
            upstream_url: "https://github.com/svenkreiss/unicodeit".to_string(),
            license: "MIT AND LPPL-1.3c".to_string(),
            version_const: "UNICODEIT_VERSION".to_string(),
            require_bracket_suffix: true,
            verify_round_trip: true,
        }
    }
}

impl RegenOptions {
    /// Accept datasets without `{}`-suffixed replacements (synthetic or trimmed data)
    pub fn lenient() -> Self {
        Self {
            require_bracket_suffix: false,
            ..Default::default()
        }
    }

    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }
}

/// All five tables, ready to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSet {
    pub version: String,
    pub replacements: Vec<MappingEntry>,
    pub combining_marks: Vec<MappingEntry>,
    pub sub_super_scripts: Vec<MappingEntry>,
    pub replacements_with_bracket_suffix: Vec<MappingEntry>,
    pub combining_marks_escaped_latex: Vec<String>,
}

impl TableSet {
    /// Key/value entries of a pair-shaped table (empty for string tables)
    pub fn pairs(&self, id: TableId) -> &[MappingEntry] {
        match id {
            TableId::Replacements => &self.replacements,
            TableId::CombiningMarks => &self.combining_marks,
            TableId::SubSuperScripts => &self.sub_super_scripts,
            TableId::ReplacementsWithBracketSuffix => &self.replacements_with_bracket_suffix,
            TableId::CombiningMarksEscapedLatex => &[],
        }
    }

    /// Elements of a string-shaped table (empty for pair tables)
    pub fn strings(&self, id: TableId) -> &[String] {
        match id {
            TableId::CombiningMarksEscapedLatex => &self.combining_marks_escaped_latex,
            _ => &[],
        }
    }

    pub fn len(&self, id: TableId) -> usize {
        self.pairs(id).len() + self.strings(id).len()
    }
}

/// The rendered data file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledOutput {
    /// Upstream version recorded in the file
    pub version: String,
    /// Full file contents
    pub text: String,
    /// Element count per emitted table, in emission order
    pub counts: IndexMap<&'static str, usize>,
}

/// Compiles datasets into Rust source
#[derive(Debug, Clone, Default)]
pub struct TableCompiler {
    options: RegenOptions,
}

impl TableCompiler {
    pub fn new(options: RegenOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RegenOptions {
        &self.options
    }

    /// Compute the derived tables and check the table-level preconditions.
    pub fn build_tables(&self, dataset: &Dataset) -> GenResult<TableSet> {
        for (id, entries) in dataset.base_tables() {
            if entries.is_empty() {
                return Err(GenError::malformed(id.name(), "table is empty"));
            }
        }

        let replacements_with_bracket_suffix = with_bracket_suffix(&dataset.replacements);
        if replacements_with_bracket_suffix.is_empty() && self.options.require_bracket_suffix {
            return Err(GenError::malformed(
                TableId::ReplacementsWithBracketSuffix.name(),
                format!(
                    "no {} key ends in `{}`; has the upstream dataset changed?",
                    TableId::Replacements,
                    BRACKET_SUFFIX
                ),
            ));
        }
        let combining_marks_escaped_latex = escaped_latex_keys(&dataset.combining_marks)?;

        Ok(TableSet {
            version: dataset.version.clone(),
            replacements: dataset.replacements.clone(),
            combining_marks: dataset.combining_marks.clone(),
            sub_super_scripts: dataset.sub_super_scripts.clone(),
            replacements_with_bracket_suffix,
            combining_marks_escaped_latex,
        })
    }

    fn render_header(&self, out: &mut String, version: &str) {
        let opts = &self.options;
        let version = escape_str(version);
        out.push_str("// WARNING: DO NOT MANUALLY EDIT\n");
        out.push_str(&format!(
            "// This file has been automatically generated by {}\n",
            opts.generator
        ));
        out.push_str(&format!("// {}.__version__: {}\n", opts.upstream_name, version));
        out.push_str("//\n");
        out.push_str(&format!("// SPDX-License-Identifier: {}\n", opts.license));
        out.push_str("#![allow(dead_code)]\n");
        out.push('\n');
        out.push_str(&format!("/// The version of the upstream [{} project]\n", opts.upstream_name));
        out.push_str("/// where the library's data has been generated from.\n");
        out.push_str("///\n");
        out.push_str(&format!(
            "/// [{} project]: {}\n",
            opts.upstream_name, opts.upstream_url
        ));
        out.push_str(&format!(
            "pub const {}: &str = \"{}\";\n",
            opts.version_const, version
        ));
    }

    /// Render a table set into the full file text.
    pub fn render(&self, tables: &TableSet) -> GenResult<CompiledOutput> {
        let mut text = String::new();
        let mut counts = IndexMap::new();
        self.render_header(&mut text, &tables.version);

        for id in TableId::ALL {
            let renderer = TableRenderer::new(id.name(), id.shape())
                .allow_empty(id == TableId::ReplacementsWithBracketSuffix);
            let count = match id {
                TableId::CombiningMarksEscapedLatex => {
                    renderer.render(&mut text, tables.strings(id), |key| raw_literal(id.name(), key))?
                }
                _ => renderer.render_pairs(&mut text, tables.pairs(id))?,
            };
            debug!("rendered {} ({} elements)", id, count);
            counts.insert(id.name(), count);
        }

        Ok(CompiledOutput {
            version: tables.version.clone(),
            text,
            counts,
        })
    }

    /// Build, render and (by default) verify the output for `dataset`.
    pub fn compile(&self, dataset: &Dataset) -> GenResult<CompiledOutput> {
        let tables = self.build_tables(dataset)?;
        let output = self.render(&tables)?;
        if self.options.verify_round_trip {
            verify_round_trip(&output.text, &self.options.version_const, &tables)?;
            debug!("round-trip verification passed");
        }
        Ok(output)
    }

    /// Load from `source` and compile.
    pub fn compile_from(&self, source: &dyn DatasetSource) -> GenResult<CompiledOutput> {
        info!("loading dataset from {}", source.describe());
        let dataset = source.load()?;
        info!(
            "compiling {} entries (upstream version {})",
            dataset.entry_count(),
            dataset.version
        );
        self.compile(&dataset)
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{}.tmp", file_name))
}

/// Write `contents` to `path` all-or-nothing: a sibling temp file is written
/// and synced, then renamed over the target.
pub fn write_atomic(path: &Path, contents: &str) -> GenResult<()> {
    let tmp = temp_path_for(path);
    let result = (|| -> std::io::Result<()> {
        let mut writer = BufWriter::new(fs::File::create(&tmp)?);
        writer.write_all(contents.as_bytes())?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    result.map_err(|e| {
        let _ = fs::remove_file(&tmp);
        GenError::io(format!("writing {}", path.display()), e)
    })
}

/// Whether the file at `path` already holds exactly `output`.
///
/// A missing file is simply out of date.
pub fn is_up_to_date(path: &Path, output: &CompiledOutput) -> GenResult<bool> {
    match fs::read(path) {
        Ok(existing) => Ok(existing == output.text.as_bytes()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(GenError::io(format!("reading {}", path.display()), e)),
    }
}
