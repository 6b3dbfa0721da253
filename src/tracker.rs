//! Tracker reply extraction (BEP-3).
//!
//! An HTTP tracker answers an announce with a bencoded dictionary holding the
//! re-announce `interval` and a `peers` list of `{ip, peer id, port}`
//! dictionaries. This module narrows that untyped tree into a
//! [`PeerResponse`], checking every key, variant and numeric range on the
//! way. Fetching the reply is left to the caller.
//!
//! # Examples
//!
//! ```
//! use bencode_peers::tracker::{PeerResponse, TrackerError};
//!
//! let body = b"d8:intervali900e5:peersld2:ip8:10.0.0.17:peer id20:-XX0001-abcdefghijkl4:porti51413eeee";
//! let response = PeerResponse::from_bytes(body).unwrap();
//! assert_eq!(response.interval, 900);
//! assert_eq!(response.peers[0].port, 51413);
//!
//! let err = PeerResponse::from_bytes(b"d14:failure reason7:bad keye").unwrap_err();
//! assert!(matches!(err, TrackerError::Failure(ref r) if r == "bad key"));
//! ```

mod error;
mod extract;
mod response;

pub use error::TrackerError;
pub use extract::{
    convert_to_peer_response, get_attr, get_bytes, get_dict, get_integer, get_list, get_peer,
    get_peer_response, get_peers,
};
pub use response::{Peer, PeerResponse};
