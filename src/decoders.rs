//! The parser operates over a stream of `char`s produced by some flavour of iterator. The
//! byte-oriented entry points build that iterator from a decoder sitting on top of an
//! underlying [BufRead], with the encoding selected through the [Encoding] enumeration.
use chisel_decoders::{ascii::AsciiDecoder, utf8::Utf8Decoder};
use std::io::BufRead;

/// Enumeration of the supported encoding types
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Encoding {
    Utf8,
    Ascii,
}

impl Default for Encoding {
    fn default() -> Self {
        if cfg!(feature = "default_utf8_encoding") {
            Self::Utf8
        } else {
            Self::Ascii
        }
    }
}

/// Create a `char` iterator over the contents of `reader`, decoding with the given encoding
pub(crate) fn decoder_for<'a, B: BufRead>(
    encoding: Encoding,
    reader: &'a mut B,
) -> Box<dyn Iterator<Item = char> + 'a> {
    match encoding {
        Encoding::Utf8 => Box::new(Utf8Decoder::new(reader)),
        Encoding::Ascii => Box::new(AsciiDecoder::new(reader)),
    }
}
