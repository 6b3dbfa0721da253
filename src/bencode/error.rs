use thiserror::Error;

use crate::fallible::Contextual;

/// Errors produced while reading or decoding bencode input.
#[derive(Debug, Error)]
pub enum BencodeError {
    #[error("nothing to decode")]
    NothingToDecode,

    #[error("unexpected end of input: needed {needed} byte(s), {remaining} left")]
    EndOfInput { needed: usize, remaining: usize },

    #[error("unknown marker: {0:?}")]
    UnknownMarker(char),

    #[error("expected {expected:?}, found {found:?}")]
    ConsumeMismatch { expected: char, found: char },

    /// An integer body is not an optional `-` followed by digits.
    #[error("malformed integer: {0:?}")]
    MalformedInteger(String),

    #[error("invalid byte string length: {0:?}")]
    InvalidLength(String),

    /// A list or dictionary reached end of input before its closing `e`.
    #[error("missing terminator for {0}")]
    MissingTerminator(&'static str),

    #[error("nesting too deep (limit {0})")]
    NestingTooDeep(usize),

    /// Input violates canonical bencode while decoding in strict mode.
    #[error("non-canonical encoding: {0}")]
    NonCanonical(String),

    #[error("trailing data after value ({0} byte(s))")]
    TrailingData(usize),

    #[error("{context}")]
    Context {
        context: String,
        #[source]
        source: Box<BencodeError>,
    },
}

impl BencodeError {
    /// Returns the innermost failure, skipping any context wrappers.
    pub fn root_cause(&self) -> &BencodeError {
        let mut current = self;
        while let BencodeError::Context { source, .. } = current {
            current = source;
        }
        current
    }
}

impl Contextual for BencodeError {
    fn wrap(self, context: String) -> Self {
        BencodeError::Context {
            context,
            source: Box::new(self),
        }
    }
}
