//! Escaping of arbitrary strings into Rust string-literal bodies
//!
//! The generated tables must stay diffable, so printable ASCII passes through
//! untouched and only characters that would break the literal (or are not
//! printable ASCII) are escaped.

use std::fmt;

/// Escape a single character for use inside a `"..."` literal.
///
/// - `\`, `"` and `'` become `\\`, `\"` and `\'`
/// - printable ASCII is returned unchanged
/// - anything else becomes `\u{..}` with lowercase, unpadded hex digits
pub fn escape_char(c: char) -> String {
    match c {
        '\\' | '"' | '\'' => format!("\\{}", c),
        ' '..='~' => c.to_string(),
        _ => format!("\\u{{{:x}}}", c as u32),
    }
}

/// Escape every code point of `s` and concatenate the results.
pub fn escape_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        out.push_str(&escape_char(c));
    }
    out
}

/// Error returned when a literal body is not in the form [`escape_str`] emits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscapeError {
    /// A backslash followed by something other than a known escape
    UnknownEscape { offset: usize, found: Option<char> },
    /// `\u{...}` with missing braces or non-hex digits
    MalformedUnicode { offset: usize },
    /// `\u{...}` naming a surrogate or out-of-range value
    InvalidScalar { offset: usize, value: u32 },
    /// An unescaped `"` inside the body
    UnescapedQuote { offset: usize },
}

impl fmt::Display for EscapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscapeError::UnknownEscape { offset, found } => match found {
                Some(c) => write!(f, "unknown escape '\\{}' at byte {}", c, offset),
                None => write!(f, "dangling backslash at byte {}", offset),
            },
            EscapeError::MalformedUnicode { offset } => {
                write!(f, "malformed \\u{{..}} escape at byte {}", offset)
            }
            EscapeError::InvalidScalar { offset, value } => {
                write!(f, "\\u{{{:x}}} at byte {} is not a Unicode scalar value", value, offset)
            }
            EscapeError::UnescapedQuote { offset } => {
                write!(f, "unescaped quote at byte {}", offset)
            }
        }
    }
}

impl std::error::Error for EscapeError {}

/// Parse a literal body produced by [`escape_str`] back into the original string.
///
/// Only the escape forms the escaper emits are accepted.
pub fn unescape_literal(body: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices();

    while let Some((offset, c)) = chars.next() {
        match c {
            '"' => return Err(EscapeError::UnescapedQuote { offset }),
            '\\' => match chars.next() {
                Some((_, e @ ('\\' | '"' | '\''))) => out.push(e),
                Some((_, 'u')) => {
                    if !matches!(chars.next(), Some((_, '{'))) {
                        return Err(EscapeError::MalformedUnicode { offset });
                    }
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, d)) if d.is_ascii_hexdigit() && digits.len() < 6 => {
                                digits.push(d)
                            }
                            _ => return Err(EscapeError::MalformedUnicode { offset }),
                        }
                    }
                    let value = u32::from_str_radix(&digits, 16)
                        .map_err(|_| EscapeError::MalformedUnicode { offset })?;
                    let decoded = char::from_u32(value)
                        .ok_or(EscapeError::InvalidScalar { offset, value })?;
                    out.push(decoded);
                }
                other => {
                    return Err(EscapeError::UnknownEscape {
                        offset,
                        found: other.map(|(_, c)| c),
                    })
                }
            },
            _ => out.push(c),
        }
    }

    Ok(out)
}
