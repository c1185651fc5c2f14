//! The DOM parser
//!
//! A recursive descent parser which consumes tokens from the [Lexer] and assembles a
//! complete [JsonValue] tree. Exactly one value is accepted per input; anything found
//! after it is a hard error, as is a missing value. A configurable depth guard bails
//! out on pathologically nested input rather than exhausting the stack.
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::decoders::{decoder_for, Encoding};
use crate::errors::{ParserErrorDetails, ParserResult};
use crate::lexer::{Lexer, PackedToken, Token};
use crate::parser_error;
use crate::JsonValue;

/// Default maximum number of nesting levels accepted before parsing bails out. Each level
/// costs a handful of stack frames, so the default has to sit comfortably inside the 2MiB
/// stack of a secondary thread; callers with bigger stacks can raise it through
/// [Parser::with_max_depth].
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Main JSON parser struct
pub struct Parser {
    /// Encoding assumed for byte-oriented inputs
    encoding: Encoding,
    /// Maximum number of nesting levels accepted before a
    /// [ParserErrorDetails::DepthExceeded] error is produced
    max_depth: usize,
}

impl Default for Parser {
    /// The default parser assumes Utf-8 input and the standard depth limit
    fn default() -> Self {
        Self {
            encoding: Encoding::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Parser {
    /// Create a new instance of the parser using a specific [Encoding]
    pub fn with_encoding(encoding: Encoding) -> Self {
        Self {
            encoding,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Adjust the nesting safety limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse the contents of a file. Failure to open the file maps to
    /// [ParserErrorDetails::InvalidFile]
    pub fn parse_file<PathLike: AsRef<Path>>(&self, path: PathLike) -> ParserResult<JsonValue> {
        match File::open(&path) {
            Ok(f) => {
                let mut reader = BufReader::new(f);
                let mut chars = decoder_for(self.encoding, &mut reader);
                self.parse(&mut chars)
            }
            Err(_) => parser_error!(ParserErrorDetails::InvalidFile),
        }
    }

    /// Parse a raw byte buffer, decoding with the configured [Encoding]
    pub fn parse_bytes(&self, bytes: &[u8]) -> ParserResult<JsonValue> {
        let mut reader = BufReader::new(bytes);
        let mut chars = decoder_for(self.encoding, &mut reader);
        self.parse(&mut chars)
    }

    /// Parse a string slice directly
    pub fn parse_str(&self, str: &str) -> ParserResult<JsonValue> {
        self.parse(&mut str.chars())
    }

    /// Parse a single JSON document from a stream of characters. The document must consist
    /// of exactly one value; trailing content is a [ParserErrorDetails::TrailingData] error
    /// and an empty input is an [ParserErrorDetails::EndOfInput] error.
    pub fn parse(&self, chars: &mut impl Iterator<Item = char>) -> ParserResult<JsonValue> {
        let mut lexer = Lexer::new(chars);
        let value = self.parse_value(&mut lexer, 0)?;
        match lexer.consume()? {
            (Token::EndOfInput, _) => Ok(value),
            (_, span) => parser_error!(ParserErrorDetails::TrailingData, span.start),
        }
    }

    fn parse_value(&self, lexer: &mut Lexer, depth: usize) -> ParserResult<JsonValue> {
        let packed = lexer.consume()?;
        self.parse_token(packed, lexer, depth)
    }

    /// Dispatch on an already consumed token. `depth` is the zero-based nesting level of
    /// the value being parsed.
    fn parse_token(
        &self,
        packed: PackedToken,
        lexer: &mut Lexer,
        depth: usize,
    ) -> ParserResult<JsonValue> {
        if depth >= self.max_depth {
            return parser_error!(
                ParserErrorDetails::DepthExceeded(self.max_depth),
                packed.1.start
            );
        }
        match packed {
            (Token::StartObject, _) => self.parse_object(lexer, depth),
            (Token::StartArray, _) => self.parse_array(lexer, depth),
            (Token::Str(str), _) => Ok(JsonValue::String(str)),
            (Token::Float(value), _) => Ok(JsonValue::Float(value)),
            (Token::Integer(value), _) => Ok(JsonValue::Integer(value)),
            (Token::Boolean(value), _) => Ok(JsonValue::Boolean(value)),
            (Token::Null, _) => Ok(JsonValue::Null),
            (Token::EndOfInput, span) => {
                parser_error!(ParserErrorDetails::EndOfInput, span.start)
            }
            (token, span) => parser_error!(
                ParserErrorDetails::UnexpectedToken(token.to_string()),
                span.start
            ),
        }
    }

    /// An object is a comma separated list of key/value pairs between braces
    fn parse_object(&self, lexer: &mut Lexer, depth: usize) -> ParserResult<JsonValue> {
        let mut pairs: Vec<(String, JsonValue)> = vec![];
        match lexer.consume()? {
            (Token::EndObject, _) => return Ok(JsonValue::Object(pairs)),
            packed => self.parse_pair(packed, &mut pairs, lexer, depth)?,
        }
        loop {
            match lexer.consume()? {
                (Token::EndObject, _) => return Ok(JsonValue::Object(pairs)),
                (Token::Comma, span) => match lexer.consume()? {
                    (Token::EndObject, _) => {
                        return parser_error!(ParserErrorDetails::TrailingComma, span.start)
                    }
                    packed => self.parse_pair(packed, &mut pairs, lexer, depth)?,
                },
                (Token::EndOfInput, span) => {
                    return parser_error!(ParserErrorDetails::EndOfInput, span.start)
                }
                (_, span) => {
                    return parser_error!(ParserErrorDetails::InvalidObject, span.start)
                }
            }
        }
    }

    /// A single key/value pair, the key token having already been consumed
    fn parse_pair(
        &self,
        packed: PackedToken,
        pairs: &mut Vec<(String, JsonValue)>,
        lexer: &mut Lexer,
        depth: usize,
    ) -> ParserResult<()> {
        match packed {
            (Token::Str(key), _) => match lexer.consume()? {
                (Token::Colon, _) => {
                    let value = self.parse_value(lexer, depth + 1)?;
                    insert_pair(pairs, key, value);
                    Ok(())
                }
                (_, span) => parser_error!(ParserErrorDetails::PairExpected, span.start),
            },
            (Token::EndOfInput, span) => {
                parser_error!(ParserErrorDetails::EndOfInput, span.start)
            }
            (_, span) => parser_error!(ParserErrorDetails::KeyExpected, span.start),
        }
    }

    /// An array is a comma separated list of values between brackets
    fn parse_array(&self, lexer: &mut Lexer, depth: usize) -> ParserResult<JsonValue> {
        let mut values: Vec<JsonValue> = vec![];
        match lexer.consume()? {
            (Token::EndArray, _) => return Ok(JsonValue::Array(values)),
            packed => values.push(self.parse_token(packed, lexer, depth + 1)?),
        }
        loop {
            match lexer.consume()? {
                (Token::EndArray, _) => return Ok(JsonValue::Array(values)),
                (Token::Comma, span) => match lexer.consume()? {
                    (Token::EndArray, _) => {
                        return parser_error!(ParserErrorDetails::TrailingComma, span.start)
                    }
                    packed => values.push(self.parse_token(packed, lexer, depth + 1)?),
                },
                (Token::EndOfInput, span) => {
                    return parser_error!(ParserErrorDetails::EndOfInput, span.start)
                }
                (_, span) => {
                    return parser_error!(ParserErrorDetails::InvalidArray, span.start)
                }
            }
        }
    }
}

/// Duplicate keys take the last value whilst the position of the first occurrence is
/// retained within the pair ordering
fn insert_pair(pairs: &mut Vec<(String, JsonValue)>, key: String, value: JsonValue) {
    match pairs.iter_mut().find(|(existing, _)| *existing == key) {
        Some(pair) => pair.1 = value,
        None => pairs.push((key, value)),
    }
}

#[cfg(test)]
mod tests {
    use crate::coords::Coords;
    use crate::errors::ParserErrorDetails;
    use crate::parser::{Parser, DEFAULT_MAX_DEPTH};
    use crate::relative_file;
    use crate::JsonValue;
    use bytesize::ByteSize;
    use std::fs;
    use std::path::PathBuf;
    use std::time::Instant;

    #[test]
    fn should_parse_char_iterators_directly() {
        let source = r#"{
            "test" : 1232.0,
            "some other" : "thasdasd",
            "a bool" : true,
            "an array" : [1,2,3,4,5.8,6,7.2,7,8,10]
        }"#;
        let parser = Parser::default();
        let parsed = parser.parse(&mut source.chars());
        assert!(parsed.is_ok());
    }

    #[test]
    fn should_parse_any_top_level_value() {
        let parser = Parser::default();
        assert_eq!(parser.parse_str("42").unwrap(), JsonValue::Integer(42));
        assert_eq!(
            parser.parse_str("\"hello\"").unwrap(),
            JsonValue::String("hello".to_string())
        );
        assert_eq!(
            parser.parse_str("true").unwrap(),
            JsonValue::Boolean(true)
        );
        assert_eq!(parser.parse_str("null").unwrap(), JsonValue::Null);
        assert_eq!(
            parser.parse_str("[]").unwrap(),
            JsonValue::Array(vec![])
        );
        assert_eq!(
            parser.parse_str("{}").unwrap(),
            JsonValue::Object(vec![])
        );
    }

    #[test]
    fn should_reject_empty_input() {
        let parser = Parser::default();
        for input in ["", "   ", "\t\r\n"] {
            let err = parser.parse_str(input).unwrap_err();
            assert_eq!(err.details, ParserErrorDetails::EndOfInput);
        }
    }

    #[test]
    fn should_reject_trailing_data() {
        let parser = Parser::default();
        let err = parser.parse_str("{} []").unwrap_err();
        assert_eq!(err.details, ParserErrorDetails::TrailingData);
        let err = parser.parse_str("1 2").unwrap_err();
        assert_eq!(err.details, ParserErrorDetails::TrailingData);
    }

    #[test]
    fn should_reject_trailing_commas_at_the_comma() {
        let parser = Parser::default();
        let err = parser.parse_str("[1, 2,]").unwrap_err();
        assert_eq!(err.details, ParserErrorDetails::TrailingComma);
        assert_eq!(
            err.coords.unwrap(),
            Coords {
                absolute: 5,
                line: 1,
                column: 6
            }
        );
        let err = parser.parse_str("{\"a\": [1, 2,]}").unwrap_err();
        assert_eq!(err.details, ParserErrorDetails::TrailingComma);
        assert_eq!(err.coords.unwrap().column, 12);
        let err = parser.parse_str("{\"a\": 1,}").unwrap_err();
        assert_eq!(err.details, ParserErrorDetails::TrailingComma);
    }

    #[test]
    fn should_reject_malformed_pairs() {
        let parser = Parser::default();
        let err = parser.parse_str("{\"a\" 1}").unwrap_err();
        assert_eq!(err.details, ParserErrorDetails::PairExpected);
        let err = parser.parse_str("{1: 2}").unwrap_err();
        assert_eq!(err.details, ParserErrorDetails::KeyExpected);
        let err = parser.parse_str("{\"a\": 1 \"b\": 2}").unwrap_err();
        assert_eq!(err.details, ParserErrorDetails::InvalidObject);
    }

    #[test]
    fn should_reject_unterminated_structures() {
        let parser = Parser::default();
        for input in ["[1, 2", "{\"a\": 1", "{\"a\":", "[", "{"] {
            let err = parser.parse_str(input).unwrap_err();
            assert_eq!(
                err.details,
                ParserErrorDetails::EndOfInput,
                "unexpected details for {}",
                input
            );
        }
    }

    #[test]
    fn should_overwrite_duplicate_keys_in_place() {
        let parser = Parser::default();
        let parsed = parser
            .parse_str("{\"a\": 1, \"b\": 2, \"a\": 3}")
            .unwrap();
        assert_eq!(
            parsed,
            JsonValue::Object(vec![
                ("a".to_string(), JsonValue::Integer(3)),
                ("b".to_string(), JsonValue::Integer(2)),
            ])
        );
    }

    #[test]
    fn should_bail_out_on_deeply_nested_input() {
        let source = format!("{}{}", "[".repeat(2000), "]".repeat(2000));
        let parser = Parser::default();
        let err = parser.parse_str(&source).unwrap_err();
        assert_eq!(
            err.details,
            ParserErrorDetails::DepthExceeded(DEFAULT_MAX_DEPTH)
        );
    }

    #[test]
    fn the_default_depth_limit_should_admit_reasonable_nesting() {
        let source = format!("{}1{}", "[".repeat(100), "]".repeat(100));
        let parser = Parser::default();
        assert!(parser.parse_str(&source).is_ok());
    }

    #[test]
    fn should_respect_a_custom_depth_limit() {
        let parser = Parser::default().with_max_depth(3);
        assert!(parser.parse_str("[[1]]").is_ok());
        let err = parser.parse_str("[[[1]]]").unwrap_err();
        assert_eq!(err.details, ParserErrorDetails::DepthExceeded(3));
    }

    #[test]
    fn should_parse_bytes_through_the_decoder() {
        let parser = Parser::default();
        let parsed = parser.parse_bytes("{\"k\": [true, null]}".as_bytes());
        assert!(parsed.is_ok());
    }

    #[test]
    fn should_report_missing_files() {
        let parser = Parser::default();
        let err = parser.parse_file("no/such/file.json").unwrap_err();
        assert_eq!(err.details, ParserErrorDetails::InvalidFile);
    }

    #[test]
    fn should_parse_basic_test_files() {
        for f in fs::read_dir(relative_file!("fixtures/json/valid")).unwrap() {
            let path = f.unwrap().path();
            if path.is_file() {
                let len = fs::metadata(&path).unwrap().len();
                let start = Instant::now();
                let parser = Parser::default();
                let parsed = parser.parse_file(&path);
                assert!(parsed.is_ok(), "parse of {:?} failed: {:?}", path, parsed);
                println!(
                    "Parsed {} in {:?} [{:?}]",
                    ByteSize(len),
                    start.elapsed(),
                    path,
                );
            }
        }
    }

    #[test]
    fn should_reject_invalid_test_files() {
        for f in fs::read_dir(relative_file!("fixtures/json/invalid")).unwrap() {
            let path = f.unwrap().path();
            if path.is_file() {
                let parser = Parser::default();
                let parsed = parser.parse_file(&path);
                assert!(parsed.is_err(), "parse of {:?} should have failed", path);
            }
        }
    }
}
