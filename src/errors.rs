//! General error types for the parser
use std::fmt::{Display, Formatter};

use crate::coords::Coords;

/// Global result type used throughout the parser stages
pub type ParserResult<T> = Result<T, ParserError>;

/// Enumeration of the parser stages that can produce an error
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ParserErrorSource {
    /// The lexical analysis stage
    Lexer,
    /// The DOM construction stage
    Parser,
}

impl Display for ParserErrorSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParserErrorSource::Lexer => write!(f, "lexer"),
            ParserErrorSource::Parser => write!(f, "parser"),
        }
    }
}

/// A global enumeration of error codes
#[derive(Debug, Clone, PartialEq)]
pub enum ParserErrorDetails {
    /// The input file couldn't be opened
    InvalidFile,
    /// The input ran out whilst a token or value was still expected
    EndOfInput,
    /// A string literal was still open when the input ran out
    UnterminatedString,
    /// A character which can't start any token
    InvalidCharacter(char),
    /// A malformed escape sequence within a string literal
    InvalidEscapeSequence(String),
    /// A malformed `\uXXXX` escape sequence within a string literal
    InvalidUnicodeEscapeSequence(String),
    /// A numeric literal which doesn't conform to the JSON grammar
    InvalidNumericRepresentation(String),
    /// A token which can't start a value
    UnexpectedToken(String),
    /// An object key was expected
    KeyExpected,
    /// A colon was expected following an object key
    PairExpected,
    /// A comma directly before a closing brace or bracket
    TrailingComma,
    /// Content found after the top level value
    TrailingData,
    /// Structural tokens within an object didn't follow the grammar
    InvalidObject,
    /// Structural tokens within an array didn't follow the grammar
    InvalidArray,
    /// The nesting safety limit was hit
    DepthExceeded(usize),
}

impl Display for ParserErrorDetails {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParserErrorDetails::InvalidFile => write!(f, "input file could not be opened"),
            ParserErrorDetails::EndOfInput => write!(f, "unexpected end of input"),
            ParserErrorDetails::UnterminatedString => {
                write!(f, "unterminated string literal")
            }
            ParserErrorDetails::InvalidCharacter(c) => {
                write!(f, "invalid character found: '{}'", c)
            }
            ParserErrorDetails::InvalidEscapeSequence(seq) => {
                write!(f, "invalid escape sequence: \"{}\"", seq)
            }
            ParserErrorDetails::InvalidUnicodeEscapeSequence(seq) => {
                write!(f, "invalid unicode escape sequence: \"{}\"", seq)
            }
            ParserErrorDetails::InvalidNumericRepresentation(repr) => {
                write!(f, "invalid numeric representation: \"{}\"", repr)
            }
            ParserErrorDetails::UnexpectedToken(token) => {
                write!(f, "unexpected token, expected value: found {}", token)
            }
            ParserErrorDetails::KeyExpected => write!(f, "expected a string object key"),
            ParserErrorDetails::PairExpected => {
                write!(f, "expected a colon following an object key")
            }
            ParserErrorDetails::TrailingComma => {
                write!(f, "trailing comma before closing delimiter")
            }
            ParserErrorDetails::TrailingData => {
                write!(f, "trailing data found after the top level value")
            }
            ParserErrorDetails::InvalidObject => write!(f, "invalid object structure"),
            ParserErrorDetails::InvalidArray => write!(f, "invalid array structure"),
            ParserErrorDetails::DepthExceeded(limit) => {
                write!(f, "maximum nesting depth of {} exceeded", limit)
            }
        }
    }
}

/// The general error structure
#[derive(Debug, Clone, PartialEq)]
pub struct ParserError {
    /// The originating stage for the error
    pub source: ParserErrorSource,
    /// The global error code for the error
    pub details: ParserErrorDetails,
    /// Optional parser coordinates
    pub coords: Option<Coords>,
}

impl Display for ParserError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.coords {
            Some(coords) => write!(f, "{} error: {} {}", self.source, self.details, coords),
            None => write!(f, "{} error: {}", self.source, self.details),
        }
    }
}

impl std::error::Error for ParserError {}

/// Convenience macro for constructing lexer stage errors
#[macro_export]
macro_rules! lexer_error {
    ($details: expr) => {
        Err($crate::errors::ParserError {
            source: $crate::errors::ParserErrorSource::Lexer,
            details: $details,
            coords: None,
        })
    };
    ($details: expr, $coords: expr) => {
        Err($crate::errors::ParserError {
            source: $crate::errors::ParserErrorSource::Lexer,
            details: $details,
            coords: Some($coords),
        })
    };
}

/// Convenience macro for constructing parser stage errors
#[macro_export]
macro_rules! parser_error {
    ($details: expr) => {
        Err($crate::errors::ParserError {
            source: $crate::errors::ParserErrorSource::Parser,
            details: $details,
            coords: None,
        })
    };
    ($details: expr, $coords: expr) => {
        Err($crate::errors::ParserError {
            source: $crate::errors::ParserErrorSource::Parser,
            details: $details,
            coords: Some($coords),
        })
    };
}
