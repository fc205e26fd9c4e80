//! # unicodeit-datagen
//!
//! Build-time tooling for the `unicodeit` library.
//!
//! ## Features
//!
//! - **Table compiler**: turns the upstream LaTeX → Unicode dataset into a
//!   Rust source file of `pub const` arrays, including two derived tables
//! - **Verified output**: rendered text is parsed back and compared before it
//!   is written, and the write itself is atomic
//! - **Dataset lint**: ordering, duplicate and shadowing checks
//! - **Release staging**: cross-compiles, checksums and signs the binaries
//!
//! ## Usage Examples
//!
//! ```rust
//! use unicodeit_datagen::data::{Dataset, MemoryDatasetSource};
//! use unicodeit_datagen::{RegenOptions, TableCompiler};
//!
//! let dataset = Dataset::new("0.7.5")
//!     .with_replacements([("\\not{}", "\u{338}"), ("\\alpha", "α")])
//!     .with_combining_marks([("\\acute", "\u{301}")])
//!     .with_sub_super_scripts([("^2", "²")]);
//!
//! let output = TableCompiler::new(RegenOptions::default())
//!     .compile_from(&MemoryDatasetSource::new(dataset))
//!     .unwrap();
//! assert!(output.text.contains(r###"(r##"\alpha"##, "\u{3b1}"),"###));
//! assert!(output.text.contains(r###"r##"\ acute{"##,"###));
//! assert_eq!(output.counts["REPLACEMENTS_WITH_BRACKET_SUFFIX"], 1);
//! ```

use std::path::Path;

use log::info;

/// Table compilation
pub mod core;

/// Dataset model and sources
pub mod data;

/// Release staging
pub mod release;

/// Utility modules
pub mod utils;

pub use core::compiler::{
    is_up_to_date, write_atomic, CompiledOutput, RegenOptions, TableCompiler,
};
pub use core::escape::{escape_char, escape_str};
pub use data::{Dataset, DatasetSource, FileDatasetSource, MappingEntry, TableId};
pub use release::{ReleaseOptions, ReleaseOrchestrator, ReleaseReport, SystemRunner};

// Re-export utilities
pub use utils::diagnostics;
pub use utils::error::{GenError, GenResult};

/// How the output file compares to what it held before [`regenerate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegenOutcome {
    /// The contents changed (or the file did not exist)
    Updated(CompiledOutput),
    /// The file was rewritten with identical contents
    Unchanged(CompiledOutput),
}

impl RegenOutcome {
    pub fn output(&self) -> &CompiledOutput {
        match self {
            RegenOutcome::Updated(output) | RegenOutcome::Unchanged(output) => output,
        }
    }

    pub fn changed(&self) -> bool {
        matches!(self, RegenOutcome::Updated(_))
    }
}

/// Compile `source` and write the result to `output_path`.
///
/// The file is always replaced as a whole; nothing is written when loading or
/// compiling fails.
pub fn regenerate(
    source: &dyn DatasetSource,
    output_path: &Path,
    options: RegenOptions,
) -> GenResult<RegenOutcome> {
    let output = TableCompiler::new(options).compile_from(source)?;
    let unchanged = is_up_to_date(output_path, &output)?;
    write_atomic(output_path, &output.text)?;
    info!("wrote {} ({} bytes)", output_path.display(), output.text.len());
    if unchanged {
        Ok(RegenOutcome::Unchanged(output))
    } else {
        Ok(RegenOutcome::Updated(output))
    }
}
