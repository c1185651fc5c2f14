//! A JSON parser and pretty-printer.
//!
//! The parser is a recursive descent implementation which scans its input exactly once
//! and produces an owned [JsonValue] tree, with errors carrying the coordinates of the
//! first offending character. The [writer::Writer] walks a [JsonValue] tree and renders
//! it back to text, either compactly or indented, optionally with object keys in
//! deterministic sorted order.
//!
//! ```
//! use burnish_json::{parse, serialize};
//!
//! let value = parse("{\"b\": 1, \"a\": [true, null]}").unwrap();
//! assert_eq!(
//!     serialize(&value, 0, true),
//!     "{\"a\":[true,null],\"b\":1}"
//! );
//! ```
pub mod coords;
pub mod decoders;
pub mod errors;
pub mod lexer;
pub mod parser;
#[cfg(test)]
mod test_macros;
pub mod writer;

use crate::errors::ParserResult;

/// Basic enumeration of different Json values
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    /// Map of keys to values, with insertion order preserved and keys unique
    Object(Vec<(String, JsonValue)>),
    /// Array of values
    Array(Vec<JsonValue>),
    /// Canonical string value
    String(String),
    /// Floating point numeric value
    Float(f64),
    /// Integer numeric value
    Integer(i64),
    /// Canonical boolean value
    Boolean(bool),
    /// Canonical null value
    Null,
}

/// Parse a complete JSON document held in a string, using the default parser
/// configuration
pub fn parse(input: &str) -> ParserResult<JsonValue> {
    parser::Parser::default().parse_str(input)
}

/// Render a value back to text. An `indent` of zero produces compact output with no
/// newlines; `sort_keys` emits object keys in codepoint-lexicographic order
pub fn serialize(value: &JsonValue, indent: usize, sort_keys: bool) -> String {
    writer::Writer::new(writer::WriterOptions { indent, sort_keys }).write(value)
}
