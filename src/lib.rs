//! bencode-peers - Bencode decoding and tracker peer-list extraction
//!
//! Decodes raw bencode (BEP-3) into a typed [`Bencode`] tree and narrows a
//! tracker's announce reply into a validated [`PeerResponse`].
//!
//! # Modules
//!
//! - [`bencode`] - Cursor, recursive-descent decoder, value tree and encoder
//! - [`fallible`] - Combinators for chaining fallible steps with context
//! - [`tracker`] - Typed extraction of peers and announce intervals
//!
//! # Examples
//!
//! ```
//! use bencode_peers::{decode, convert_to_peer_response};
//!
//! let body = b"d8:intervali1800e5:peersld2:ip7:1.2.3.47:peer id20:ABCDEFGHIJKLMNOPQRST4:porti6881eeee";
//! let tree = decode(body).unwrap();
//! let response = convert_to_peer_response(&tree).unwrap();
//!
//! assert_eq!(response.interval, 1800);
//! assert_eq!(response.peers[0].ip_str(), Some("1.2.3.4"));
//! ```

pub mod bencode;
pub mod fallible;
pub mod tracker;

pub use bencode::{
    decode, encode, Bencode, BencodeError, Decoder, DecoderConfig, Dictionary, Kind,
};
pub use tracker::{convert_to_peer_response, Peer, PeerResponse, TrackerError};
