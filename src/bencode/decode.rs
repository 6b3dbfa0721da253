use super::cursor::Cursor;
use super::error::BencodeError;
use super::value::{Bencode, Dictionary};
use crate::fallible::ResultExt;
use bytes::Bytes;
use num_bigint::BigInt;

const INTEGER_MARKER: u8 = b'i';
const LIST_MARKER: u8 = b'l';
const DICT_MARKER: u8 = b'd';
const ENDING_MARKER: u8 = b'e';
const SEPARATOR: u8 = b':';

const DEFAULT_MAX_DEPTH: usize = 64;

/// Decoder settings.
///
/// The default is relaxed: dictionary keys may be any value in any order, and
/// integers may carry leading zeros. [`strict`](DecoderConfig::strict) turns
/// on canonical-form validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Deepest container nesting accepted before failing with
    /// [`BencodeError::NestingTooDeep`].
    pub max_depth: usize,
    /// Reject input that is not in canonical form.
    pub strict: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            strict: false,
        }
    }
}

impl DecoderConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Recursive-descent decoder over an exclusively owned [`Cursor`].
///
/// Each call to [`decode`](Decoder::decode) reads the next complete value and
/// leaves any following input unread.
///
/// # Examples
///
/// ```
/// use bencode_peers::bencode::{Bencode, Decoder};
///
/// let mut decoder = Decoder::new(b"i1e4:spam");
/// assert_eq!(decoder.decode().unwrap(), Bencode::from(1));
/// assert_eq!(decoder.decode().unwrap(), Bencode::string("spam"));
/// assert!(decoder.is_exhausted());
/// ```
#[derive(Debug)]
pub struct Decoder<'a> {
    cursor: Cursor<'a>,
    config: DecoderConfig,
    depth: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, DecoderConfig::default())
    }

    pub fn with_config(input: &'a [u8], config: DecoderConfig) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            depth: 0,
        }
    }

    /// Byte offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    pub fn is_exhausted(&self) -> bool {
        !self.cursor.has_next()
    }

    /// Decodes the next value from the input.
    ///
    /// # Errors
    ///
    /// Returns [`BencodeError::NothingToDecode`] if the input is exhausted,
    /// or the first failure met while decoding the value.
    pub fn decode(&mut self) -> Result<Bencode, BencodeError> {
        self.depth = 0;
        self.decode_value()
    }

    fn decode_value(&mut self) -> Result<Bencode, BencodeError> {
        if !self.cursor.has_next() {
            return Err(BencodeError::NothingToDecode);
        }

        match self.cursor.peek()? {
            b'0'..=b'9' => self.decode_bytes(),
            INTEGER_MARKER => self.decode_integer(),
            LIST_MARKER => self.decode_list(),
            DICT_MARKER => self.decode_dict(),
            c => Err(BencodeError::UnknownMarker(c as char)),
        }
    }

    fn decode_integer(&mut self) -> Result<Bencode, BencodeError> {
        let start = self.cursor.position();
        self.cursor.consume(INTEGER_MARKER)?;
        let text = self
            .cursor
            .read_until(ENDING_MARKER)
            .with_context(|| format!("reading integer at byte {}", start))?;

        let digits = text.strip_prefix(b"-").unwrap_or(text);
        if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
            return Err(BencodeError::MalformedInteger(lossy(text)));
        }
        if self.config.strict && has_leading_zero(text) {
            return Err(BencodeError::NonCanonical(format!(
                "integer {:?} at byte {}",
                lossy(text),
                start
            )));
        }

        let value = BigInt::parse_bytes(text, 10)
            .ok_or_else(|| BencodeError::MalformedInteger(lossy(text)))?;
        Ok(Bencode::Integer(value))
    }

    fn decode_bytes(&mut self) -> Result<Bencode, BencodeError> {
        let start = self.cursor.position();
        let length_text = self.cursor.read_while(|b| b.is_ascii_digit());
        self.cursor
            .consume(SEPARATOR)
            .with_context(|| format!("reading byte string length at byte {}", start))?;

        if self.config.strict && length_text.len() > 1 && length_text[0] == b'0' {
            return Err(BencodeError::NonCanonical(format!(
                "byte string length {:?} at byte {}",
                lossy(length_text),
                start
            )));
        }
        let length: usize = std::str::from_utf8(length_text)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| BencodeError::InvalidLength(lossy(length_text)))?;

        let payload = self
            .cursor
            .read_exactly(length)
            .with_context(|| format!("reading {}-byte string at byte {}", length, start))?;
        Ok(Bencode::Bytes(Bytes::copy_from_slice(payload)))
    }

    fn decode_list(&mut self) -> Result<Bencode, BencodeError> {
        self.cursor.consume(LIST_MARKER)?;
        self.enter()?;

        let mut items = Vec::new();
        loop {
            if !self.cursor.has_next() {
                return Err(BencodeError::MissingTerminator("list"));
            }
            if self.cursor.consume(ENDING_MARKER).is_ok() {
                break;
            }
            let index = items.len();
            let item = self
                .decode_value()
                .with_context(|| format!("decoding list element {}", index))?;
            items.push(item);
        }

        self.depth -= 1;
        Ok(Bencode::List(items))
    }

    fn decode_dict(&mut self) -> Result<Bencode, BencodeError> {
        self.cursor.consume(DICT_MARKER)?;
        self.enter()?;

        let mut dict = Dictionary::new();
        let mut previous_key: Option<Bytes> = None;
        loop {
            if !self.cursor.has_next() {
                return Err(BencodeError::MissingTerminator("dictionary"));
            }
            if self.cursor.consume(ENDING_MARKER).is_ok() {
                break;
            }

            let key_pos = self.cursor.position();
            let key = self
                .decode_value()
                .with_context(|| format!("decoding dictionary key at byte {}", key_pos))?;
            if !self.cursor.has_next() {
                return Err(BencodeError::MissingTerminator("dictionary"));
            }
            let value = self
                .decode_value()
                .with_context(|| format!("decoding dictionary value at byte {}", key_pos))?;

            if self.config.strict {
                previous_key = Some(check_canonical_key(&key, previous_key, key_pos)?);
            }
            dict.insert(key, value);
        }

        self.depth -= 1;
        Ok(Bencode::Dict(dict))
    }

    fn enter(&mut self) -> Result<(), BencodeError> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(BencodeError::NestingTooDeep(self.config.max_depth));
        }
        Ok(())
    }
}

fn check_canonical_key(
    key: &Bencode,
    previous: Option<Bytes>,
    pos: usize,
) -> Result<Bytes, BencodeError> {
    let key = key.as_bytes().ok_or_else(|| {
        BencodeError::NonCanonical(format!(
            "{} used as dictionary key at byte {}",
            key.kind(),
            pos
        ))
    })?;
    if let Some(previous) = previous {
        if *key <= previous {
            return Err(BencodeError::NonCanonical(format!(
                "dictionary key \"{}\" at byte {} is not sorted after \"{}\"",
                key.escape_ascii(),
                pos,
                previous.escape_ascii()
            )));
        }
    }
    Ok(key.clone())
}

fn has_leading_zero(text: &[u8]) -> bool {
    match text {
        [b'-', b'0', ..] => true,
        [b'0', _, ..] => true,
        _ => false,
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Decodes a single bencode value that spans the whole input.
///
/// # Errors
///
/// Fails like [`Decoder::decode`], and with [`BencodeError::TrailingData`]
/// if bytes remain after the value.
///
/// # Examples
///
/// ```
/// use bencode_peers::bencode::{decode, Bencode};
///
/// let value = decode(b"l4:spam4:eggse").unwrap();
/// assert_eq!(
///     value,
///     Bencode::List(vec![Bencode::string("spam"), Bencode::string("eggs")])
/// );
///
/// assert!(decode(b"i42eextra").is_err());
/// ```
pub fn decode(data: &[u8]) -> Result<Bencode, BencodeError> {
    decode_with(data, DecoderConfig::default())
}

/// Like [`decode`], with explicit decoder settings.
pub fn decode_with(data: &[u8], config: DecoderConfig) -> Result<Bencode, BencodeError> {
    tracing::trace!("decoding {} bytes of bencode", data.len());

    let mut decoder = Decoder::with_config(data, config);
    let value = decoder.decode()?;

    if !decoder.is_exhausted() {
        let left = data.len() - decoder.position();
        tracing::debug!(
            "rejecting bencode with {} trailing bytes at byte {}",
            left,
            decoder.position()
        );
        return Err(BencodeError::TrailingData(left));
    }

    Ok(value)
}

/// Decodes back-to-back values until the input is exhausted.
///
/// Empty input yields an empty list.
pub fn decode_all(data: &[u8]) -> Result<Vec<Bencode>, BencodeError> {
    let mut decoder = Decoder::new(data);
    let mut values = Vec::new();
    while !decoder.is_exhausted() {
        let index = values.len();
        let value = decoder
            .decode()
            .with_context(|| format!("decoding value {}", index))?;
        values.push(value);
    }
    Ok(values)
}
