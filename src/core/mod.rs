//! Table compilation
//!
//! - `escape`: character escaping for Rust string literals
//! - `derive`: the two tables computed from the dataset
//! - `render`: `pub const` array rendering
//! - `verify`: parsing rendered output back for comparison
//! - `compiler`: ties the above together and writes the result

pub mod compiler;
pub mod derive;
pub mod escape;
pub mod render;
pub mod verify;

pub use compiler::{
    is_up_to_date, write_atomic, CompiledOutput, RegenOptions, TableCompiler, TableSet,
};
pub use derive::{escaped_latex_key, escaped_latex_keys, with_bracket_suffix};
pub use escape::{escape_char, escape_str, unescape_literal, EscapeError};
pub use render::{raw_literal, string_literal, TableRenderer};
pub use verify::{parse_compiled, verify_round_trip, ParsedOutput};
