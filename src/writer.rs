//! The writer, which renders a [JsonValue] tree back into JSON text.
//!
//! Output is controlled through [WriterOptions]: an indent width of zero produces compact
//! single-line output, any other width produces one child per line with level-scaled
//! indentation. Object pairs can optionally be emitted in codepoint-lexicographic key
//! order for deterministic output.
use crate::JsonValue;

/// Options controlling the output produced by a [Writer]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WriterOptions {
    /// Number of spaces added per nesting level; zero selects compact output
    pub indent: usize,
    /// Emit object keys in codepoint-lexicographic order rather than insertion order
    pub sort_keys: bool,
}

impl Default for WriterOptions {
    /// The defaults mirror a typical pretty-printing setup: four space indentation,
    /// insertion ordered keys
    fn default() -> Self {
        WriterOptions {
            indent: 4,
            sort_keys: false,
        }
    }
}

/// Walks a [JsonValue] tree and produces formatted JSON text
#[derive(Debug, Default)]
pub struct Writer {
    options: WriterOptions,
}

impl Writer {
    pub fn new(options: WriterOptions) -> Self {
        Writer { options }
    }

    /// Render a complete value tree into a freshly allocated string
    pub fn write(&self, value: &JsonValue) -> String {
        let mut out = String::new();
        self.write_value(value, 0, &mut out);
        out
    }

    fn write_value(&self, value: &JsonValue, level: usize, out: &mut String) {
        match value {
            JsonValue::Object(pairs) => self.write_object(pairs, level, out),
            JsonValue::Array(values) => self.write_array(values, level, out),
            JsonValue::String(value) => write_string(value, out),
            JsonValue::Float(value) => write_float(*value, out),
            JsonValue::Integer(value) => out.push_str(&value.to_string()),
            JsonValue::Boolean(true) => out.push_str("true"),
            JsonValue::Boolean(false) => out.push_str("false"),
            JsonValue::Null => out.push_str("null"),
        }
    }

    fn write_object(&self, pairs: &[(String, JsonValue)], level: usize, out: &mut String) {
        if pairs.is_empty() {
            out.push_str("{}");
            return;
        }
        let mut ordered: Vec<&(String, JsonValue)> = pairs.iter().collect();
        if self.options.sort_keys {
            ordered.sort_by(|a, b| a.0.cmp(&b.0));
        }
        out.push('{');
        for (index, pair) in ordered.iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            self.write_line_prefix(level + 1, out);
            write_string(&pair.0, out);
            out.push(':');
            if self.options.indent > 0 {
                out.push(' ');
            }
            self.write_value(&pair.1, level + 1, out);
        }
        self.write_line_prefix(level, out);
        out.push('}');
    }

    fn write_array(&self, values: &[JsonValue], level: usize, out: &mut String) {
        if values.is_empty() {
            out.push_str("[]");
            return;
        }
        out.push('[');
        for (index, value) in values.iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            self.write_line_prefix(level + 1, out);
            self.write_value(value, level + 1, out);
        }
        self.write_line_prefix(level, out);
        out.push(']');
    }

    /// In indented mode, a newline followed by the indentation for the given level; in
    /// compact mode, nothing at all
    fn write_line_prefix(&self, level: usize, out: &mut String) {
        if self.options.indent > 0 {
            out.push('\n');
            out.extend(std::iter::repeat(' ').take(self.options.indent * level));
        }
    }
}

/// Re-escape a string for output. Double quotes, backslashes and the named control
/// characters use their short escapes, any remaining control character becomes a
/// `\uXXXX` escape, and everything else (non-ASCII included) is emitted literally.
fn write_string(value: &str, out: &mut String) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Floats are rendered in their shortest round-trip decimal form, with a fractional
/// marker retained so that a re-parse produces a float again. Non-finite values have no
/// JSON representation and are emitted as null.
fn write_float(value: f64, out: &mut String) {
    if !value.is_finite() {
        out.push_str("null");
        return;
    }
    let rendered = value.to_string();
    let fractional = rendered.contains(|c| c == '.' || c == 'e' || c == 'E');
    out.push_str(&rendered);
    if !fractional {
        out.push_str(".0");
    }
}
