//! Bencode decoding and encoding ([BEP-3]).
//!
//! Bencode is the serialization format BitTorrent uses for `.torrent` files
//! and tracker responses.
//!
//! # Data Types
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! Integers are arbitrary precision and byte strings are binary-safe, so
//! `i12345678901234567890e` and `4:ab\x00c` both decode without loss.
//!
//! # Examples
//!
//! ```
//! use bencode_peers::bencode::{decode, Bencode};
//! use num_bigint::BigInt;
//!
//! let value = decode(b"i12345678901234567890e").unwrap();
//! let expected: BigInt = "12345678901234567890".parse().unwrap();
//! assert_eq!(value.as_integer(), Some(&expected));
//!
//! let value = decode(b"d3:cow3:moo4:spam4:eggse").unwrap();
//! assert_eq!(value.get(b"cow").and_then(|v| v.as_str()), Some("moo"));
//! ```
//!
//! Use a [`Decoder`] directly to read several values from one buffer, or
//! [`decode_with`] to tune [`DecoderConfig`].
//!
//! # Error Handling
//!
//! - [`BencodeError::NothingToDecode`] - No input left to decode
//! - [`BencodeError::EndOfInput`] - A read ran past the end of input
//! - [`BencodeError::UnknownMarker`] - A value starts with an unknown byte
//! - [`BencodeError::MalformedInteger`] - An integer body is not a number
//! - [`BencodeError::MissingTerminator`] - A list or dictionary is never closed
//! - [`BencodeError::NestingTooDeep`] - Recursion limit exceeded (64 levels by default)
//! - [`BencodeError::TrailingData`] - Extra data after the value
//!
//! Failures inside containers are wrapped in [`BencodeError::Context`];
//! [`BencodeError::root_cause`] returns the original failure.
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod cursor;
mod decode;
mod encode;
mod error;
mod value;

pub use cursor::Cursor;
pub use decode::{decode, decode_all, decode_with, Decoder, DecoderConfig};
pub use encode::encode;
pub use error::BencodeError;
pub use value::{Bencode, Dictionary, Kind};
