//! The lexer, which scans a stream of `char`s into a sequence of [Token]s.
//!
//! Whitespace between tokens is skipped and never retained. String literals are fully
//! decoded during the scan (escape sequences are translated into their target codepoints)
//! and numeric literals are validated against the JSON grammar before being converted.
//! Every token carries a [Span] so that downstream errors can point at the offending
//! character in the original input.
use std::fmt::{Display, Formatter};

use crate::coords::{Coords, Span};
use crate::errors::{ParserErrorDetails, ParserResult};
use crate::lexer_error;

/// Default scratch buffer capacity
const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// Enumeration of valid JSON tokens
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    Colon,
    Comma,
    /// A string literal, with all escape sequences decoded
    Str(String),
    /// A numeric literal carrying a fractional part or an exponent
    Float(f64),
    /// An integral numeric literal
    Integer(i64),
    Boolean(bool),
    Null,
    EndOfInput,
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::StartObject => write!(f, "'{{'"),
            Token::EndObject => write!(f, "'}}'"),
            Token::StartArray => write!(f, "'['"),
            Token::EndArray => write!(f, "']'"),
            Token::Colon => write!(f, "':'"),
            Token::Comma => write!(f, "','"),
            Token::Str(value) => write!(f, "string \"{}\"", value),
            Token::Float(value) => write!(f, "number {}", value),
            Token::Integer(value) => write!(f, "number {}", value),
            Token::Boolean(value) => write!(f, "{}", value),
            Token::Null => write!(f, "null"),
            Token::EndOfInput => write!(f, "end of input"),
        }
    }
}

/// A packed token consists of a [Token] and the [Span] associated with it
pub type PackedToken = (Token, Span);

/// Convenience macro for packing tokens along with their positional information
macro_rules! packed_token {
    ($t:expr, $s:expr, $e:expr) => {
        ($t, Span { start: $s, end: $e })
    };
    ($t:expr, $s:expr) => {
        ($t, Span { start: $s, end: $s })
    };
}

/// A lexer which will consume characters from an underlying iterator and produce a stream
/// of [PackedToken]s
pub struct Lexer<'a> {
    /// The underlying source of characters
    chars: &'a mut dyn Iterator<Item = char>,
    /// Single character lookahead, along with its coordinates
    lookahead: Option<(char, Coords)>,
    /// Coordinates to be assigned to the next character pulled from the input
    coords: Coords,
    /// Scratch buffer used whilst assembling strings and numbers
    buffer: String,
}

impl<'a> Lexer<'a> {
    pub fn new(chars: &'a mut impl Iterator<Item = char>) -> Self {
        Lexer {
            chars,
            lookahead: None,
            coords: Coords::default(),
            buffer: String::with_capacity(DEFAULT_BUFFER_CAPACITY),
        }
    }

    /// Pull the next character from the underlying iterator, updating the position bookkeeping
    fn pull(&mut self) -> Option<(char, Coords)> {
        self.chars.next().map(|c| {
            let current = self.coords;
            self.coords.absolute += 1;
            if c == '\n' {
                self.coords.line += 1;
                self.coords.column = 1;
            } else {
                self.coords.column += 1;
            }
            (c, current)
        })
    }

    /// Take the next character, preferring any buffered lookahead
    fn advance(&mut self) -> Option<(char, Coords)> {
        match self.lookahead.take() {
            Some(entry) => Some(entry),
            None => self.pull(),
        }
    }

    /// Inspect the next character without consuming it
    fn peek(&mut self) -> Option<(char, Coords)> {
        if self.lookahead.is_none() {
            self.lookahead = self.pull();
        }
        self.lookahead
    }

    /// Consume the next token from the input. Whitespace between tokens is skipped, and
    /// an [Token::EndOfInput] token is produced once the underlying input is exhausted.
    pub fn consume(&mut self) -> ParserResult<PackedToken> {
        loop {
            match self.advance() {
                Some((c, coords)) => match c {
                    ' ' | '\t' | '\n' | '\r' => continue,
                    '{' => return Ok(packed_token!(Token::StartObject, coords)),
                    '}' => return Ok(packed_token!(Token::EndObject, coords)),
                    '[' => return Ok(packed_token!(Token::StartArray, coords)),
                    ']' => return Ok(packed_token!(Token::EndArray, coords)),
                    ':' => return Ok(packed_token!(Token::Colon, coords)),
                    ',' => return Ok(packed_token!(Token::Comma, coords)),
                    '"' => return self.match_string(coords),
                    '-' | '0'..='9' => return self.match_number(c, coords),
                    'n' => return self.match_literal(coords, "null", Token::Null),
                    't' => return self.match_literal(coords, "true", Token::Boolean(true)),
                    'f' => return self.match_literal(coords, "false", Token::Boolean(false)),
                    _ => return lexer_error!(ParserErrorDetails::InvalidCharacter(c), coords),
                },
                None => return Ok(packed_token!(Token::EndOfInput, self.coords)),
            }
        }
    }

    /// Consume and match (exactly) the remainder of a literal sequence such as `null` or `true`
    fn match_literal(
        &mut self,
        start: Coords,
        text: &'static str,
        token: Token,
    ) -> ParserResult<PackedToken> {
        let mut end = start;
        for expected in text.chars().skip(1) {
            match self.advance() {
                Some((c, coords)) if c == expected => end = coords,
                Some((c, coords)) => {
                    return lexer_error!(ParserErrorDetails::InvalidCharacter(c), coords)
                }
                None => return lexer_error!(ParserErrorDetails::EndOfInput, self.coords),
            }
        }
        Ok(packed_token!(token, start, end))
    }

    /// Match a string literal, decoding any escape sequences found along the way. The
    /// opening double quote has already been consumed at `start`.
    fn match_string(&mut self, start: Coords) -> ParserResult<PackedToken> {
        self.buffer.clear();
        loop {
            match self.advance() {
                Some(('"', end)) => {
                    return Ok(packed_token!(Token::Str(self.buffer.clone()), start, end))
                }
                Some(('\\', _)) => self.match_escape_sequence()?,
                Some((c, coords)) if (c as u32) < 0x20 => {
                    return lexer_error!(ParserErrorDetails::InvalidCharacter(c), coords)
                }
                Some((c, _)) => self.buffer.push(c),
                None => {
                    return lexer_error!(ParserErrorDetails::UnterminatedString, self.coords)
                }
            }
        }
    }

    /// Match a single escape sequence, pushing the decoded character into the scratch buffer
    fn match_escape_sequence(&mut self) -> ParserResult<()> {
        match self.advance() {
            Some(('"', _)) => self.buffer.push('"'),
            Some(('\\', _)) => self.buffer.push('\\'),
            Some(('/', _)) => self.buffer.push('/'),
            Some(('b', _)) => self.buffer.push('\u{0008}'),
            Some(('f', _)) => self.buffer.push('\u{000c}'),
            Some(('n', _)) => self.buffer.push('\n'),
            Some(('r', _)) => self.buffer.push('\r'),
            Some(('t', _)) => self.buffer.push('\t'),
            Some(('u', coords)) => {
                let decoded = self.match_unicode_escape_sequence(coords)?;
                self.buffer.push(decoded);
            }
            Some((c, coords)) => {
                return lexer_error!(
                    ParserErrorDetails::InvalidEscapeSequence(format!("\\{}", c)),
                    coords
                )
            }
            None => return lexer_error!(ParserErrorDetails::UnterminatedString, self.coords),
        }
        Ok(())
    }

    /// Match a unicode escape sequence in the form `uXXXX` where each X is a valid hex digit.
    /// A high surrogate must be followed by a second `\uXXXX` low surrogate, with the pair
    /// combining into a single codepoint beyond U+FFFF.
    fn match_unicode_escape_sequence(&mut self, coords: Coords) -> ParserResult<char> {
        let first = self.match_hex_quad()?;
        if (0xD800..=0xDBFF).contains(&first) {
            match self.advance() {
                Some(('\\', _)) => (),
                _ => {
                    return lexer_error!(
                        ParserErrorDetails::InvalidUnicodeEscapeSequence(format!(
                            "\\u{:04x}",
                            first
                        )),
                        coords
                    )
                }
            }
            match self.advance() {
                Some(('u', _)) => (),
                _ => {
                    return lexer_error!(
                        ParserErrorDetails::InvalidUnicodeEscapeSequence(format!(
                            "\\u{:04x}",
                            first
                        )),
                        coords
                    )
                }
            }
            let second = self.match_hex_quad()?;
            if !(0xDC00..=0xDFFF).contains(&second) {
                return lexer_error!(
                    ParserErrorDetails::InvalidUnicodeEscapeSequence(format!(
                        "\\u{:04x}\\u{:04x}",
                        first, second
                    )),
                    coords
                );
            }
            let combined = 0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00);
            match char::from_u32(combined) {
                Some(c) => Ok(c),
                None => lexer_error!(
                    ParserErrorDetails::InvalidUnicodeEscapeSequence(format!(
                        "\\u{:04x}\\u{:04x}",
                        first, second
                    )),
                    coords
                ),
            }
        } else if (0xDC00..=0xDFFF).contains(&first) {
            lexer_error!(
                ParserErrorDetails::InvalidUnicodeEscapeSequence(format!("\\u{:04x}", first)),
                coords
            )
        } else {
            match char::from_u32(first) {
                Some(c) => Ok(c),
                None => lexer_error!(
                    ParserErrorDetails::InvalidUnicodeEscapeSequence(format!("\\u{:04x}", first)),
                    coords
                ),
            }
        }
    }

    /// Match exactly four hex digits
    fn match_hex_quad(&mut self) -> ParserResult<u32> {
        let mut value = 0;
        for _ in 0..4 {
            match self.advance() {
                Some((c, digit_coords)) => match c.to_digit(16) {
                    Some(digit) => value = value * 16 + digit,
                    None => {
                        return lexer_error!(
                            ParserErrorDetails::InvalidUnicodeEscapeSequence(format!(
                                "\\u..{}",
                                c
                            )),
                            digit_coords
                        )
                    }
                },
                None => {
                    return lexer_error!(ParserErrorDetails::UnterminatedString, self.coords)
                }
            }
        }
        Ok(value)
    }

    /// Match a numeric literal, validating against the grammar
    /// `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?` whilst scanning. The raw text is
    /// assembled in the scratch buffer and converted once the full literal has been seen.
    fn match_number(&mut self, first: char, start: Coords) -> ParserResult<PackedToken> {
        self.buffer.clear();
        self.buffer.push(first);
        let mut end = start;
        let mut integral = true;

        if first == '-' {
            match self.advance() {
                Some((c @ '0'..='9', coords)) => {
                    self.buffer.push(c);
                    end = coords;
                }
                Some((c, coords)) => {
                    return lexer_error!(
                        ParserErrorDetails::InvalidNumericRepresentation(format!("-{}", c)),
                        coords
                    )
                }
                None => return lexer_error!(ParserErrorDetails::EndOfInput, self.coords),
            }
        }

        if self.buffer.ends_with('0') {
            // a leading zero must stand alone in the integer part
            if let Some((c @ '0'..='9', coords)) = self.peek() {
                return lexer_error!(
                    ParserErrorDetails::InvalidNumericRepresentation(format!(
                        "{}{}",
                        self.buffer, c
                    )),
                    coords
                );
            }
        } else {
            self.match_digits(&mut end);
        }

        if let Some(('.', _)) = self.peek() {
            self.advance();
            self.buffer.push('.');
            integral = false;
            if self.match_digits(&mut end) == 0 {
                return lexer_error!(
                    ParserErrorDetails::InvalidNumericRepresentation(self.buffer.clone()),
                    start
                );
            }
        }

        if let Some((c @ ('e' | 'E'), _)) = self.peek() {
            self.advance();
            self.buffer.push(c);
            integral = false;
            if let Some((sign @ ('+' | '-'), _)) = self.peek() {
                self.advance();
                self.buffer.push(sign);
            }
            if self.match_digits(&mut end) == 0 {
                return lexer_error!(
                    ParserErrorDetails::InvalidNumericRepresentation(self.buffer.clone()),
                    start
                );
            }
        }

        self.numeric_token(integral, start, end)
    }

    /// Consume a run of decimal digits into the scratch buffer, returning the count
    fn match_digits(&mut self, end: &mut Coords) -> usize {
        let mut count = 0;
        while let Some((c @ '0'..='9', coords)) = self.peek() {
            self.advance();
            self.buffer.push(c);
            *end = coords;
            count += 1;
        }
        count
    }

    /// Convert the scratch buffer into a numeric token. Integral literals become
    /// [Token::Integer] unless they overflow an `i64`, in which case they fall back to the
    /// float representation.
    #[cfg(feature = "mixed_numerics")]
    fn numeric_token(
        &mut self,
        integral: bool,
        start: Coords,
        end: Coords,
    ) -> ParserResult<PackedToken> {
        if integral {
            if let Ok(value) = lexical::parse::<i64, _>(self.buffer.as_bytes()) {
                return Ok(packed_token!(Token::Integer(value), start, end));
            }
        }
        self.float_token(start, end)
    }

    /// Convert the scratch buffer into a numeric token, always through `f64`
    #[cfg(not(feature = "mixed_numerics"))]
    fn numeric_token(
        &mut self,
        _integral: bool,
        start: Coords,
        end: Coords,
    ) -> ParserResult<PackedToken> {
        self.float_token(start, end)
    }

    fn float_token(&mut self, start: Coords, end: Coords) -> ParserResult<PackedToken> {
        match fast_float::parse(self.buffer.as_bytes()) {
            Ok(value) => Ok(packed_token!(Token::Float(value), start, end)),
            Err(_) => lexer_error!(
                ParserErrorDetails::InvalidNumericRepresentation(self.buffer.clone()),
                start
            ),
        }
    }
}
