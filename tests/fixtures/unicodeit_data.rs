// WARNING: DO NOT MANUALLY EDIT
// This file has been automatically generated by regen
// unicodeit.__version__: 0.7.5
//
// SPDX-License-Identifier: MIT AND LPPL-1.3c
#![allow(dead_code)]

/// The version of the upstream [unicodeit project]
/// where the library's data has been generated from.
///
/// [unicodeit project]: https://github.com/svenkreiss/unicodeit
pub const UNICODEIT_VERSION: &str = "0.7.5";

#[rustfmt::skip]
pub const REPLACEMENTS: &[(&str, &str)] = &[
    (r##"\textquotesingle"##, "\'"),
    (r##"\textquotedbl"##, "\""),
    (r##"\backslash"##, "\\"),
    (r##"\not{}"##, "\u{338}"),
    (r##"a"#"##, "\u{0}\u{9}\u{d}\u{a}\u{7f}\u{85}"),
    (r##"\#"##, "#"),
];

#[rustfmt::skip]
pub const COMBINING_MARKS: &[(&str, &str)] = &[
    (r##"\acute"##, "\u{301}"),
    (r##"é"#"##, "\u{300}"),
];

#[rustfmt::skip]
pub const SUB_SUPER_SCRIPTS: &[(&str, &str)] = &[
    (r##"^2"##, "\u{b2}"),
    (r##"x""##, "\u{2093}"),
];

#[rustfmt::skip]
pub const REPLACEMENTS_WITH_BRACKET_SUFFIX: &[(&str, &str)] = &[
    (r##"\not{}"##, "\u{338}"),
];

#[rustfmt::skip]
pub const COMBINING_MARKS_ESCAPED_LATEX: &[&str] = &[
    r##"\ acute{"##,
    r##"\ "#{"##,
];
