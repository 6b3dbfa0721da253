//! Typed accessors that turn a decoded tracker reply into domain records.
//!
//! Every accessor either returns a fully built value or the first failure it
//! hit; nothing partially populated escapes.

use super::error::TrackerError;
use super::response::{Peer, PeerResponse};
use crate::bencode::{decode, Bencode, Dictionary, Kind};
use crate::fallible::{sequence, ResultExt};
use bytes::Bytes;
use num_bigint::BigInt;

/// Looks up `key` and checks that its value is of kind `expected`.
///
/// # Errors
///
/// [`TrackerError::MissingAttribute`] if the key is absent,
/// [`TrackerError::TypeMismatch`] if the value has another kind.
///
/// # Examples
///
/// ```
/// use bencode_peers::bencode::{decode, Kind};
/// use bencode_peers::tracker::{get_attr, TrackerError};
///
/// let value = decode(b"d8:intervali1800ee").unwrap();
/// let dict = value.as_dict().unwrap();
///
/// assert!(get_attr(dict, "interval", Kind::Integer).is_ok());
/// assert!(matches!(
///     get_attr(dict, "interval", Kind::List),
///     Err(TrackerError::TypeMismatch { .. })
/// ));
/// ```
pub fn get_attr<'a>(
    dict: &'a Dictionary,
    key: &str,
    expected: Kind,
) -> Result<&'a Bencode, TrackerError> {
    get_typed(dict, key, expected, |v| (v.kind() == expected).then_some(v))
}

pub fn get_integer<'a>(dict: &'a Dictionary, key: &str) -> Result<&'a BigInt, TrackerError> {
    get_typed(dict, key, Kind::Integer, Bencode::as_integer)
}

pub fn get_bytes<'a>(dict: &'a Dictionary, key: &str) -> Result<&'a Bytes, TrackerError> {
    get_typed(dict, key, Kind::ByteString, Bencode::as_bytes)
}

pub fn get_list<'a>(dict: &'a Dictionary, key: &str) -> Result<&'a [Bencode], TrackerError> {
    get_typed(dict, key, Kind::List, Bencode::as_list)
}

pub fn get_dict<'a>(dict: &'a Dictionary, key: &str) -> Result<&'a Dictionary, TrackerError> {
    get_typed(dict, key, Kind::Dictionary, Bencode::as_dict)
}

fn get_typed<'a, T, F>(
    dict: &'a Dictionary,
    key: &str,
    expected: Kind,
    project: F,
) -> Result<T, TrackerError>
where
    F: FnOnce(&'a Bencode) -> Option<T>,
{
    let value = dict
        .get(key.as_bytes())
        .ok_or_else(|| TrackerError::MissingAttribute(key.to_string()))?;
    project(value).ok_or_else(|| TrackerError::TypeMismatch {
        key: key.to_string(),
        expected,
        actual: value.kind(),
    })
}

/// Like [`get_typed`], but an absent key is `Ok(None)`.
fn get_optional<'a, T, F>(
    dict: &'a Dictionary,
    key: &str,
    expected: Kind,
    project: F,
) -> Result<Option<T>, TrackerError>
where
    F: FnOnce(&'a Bencode) -> Option<T>,
{
    if !dict.contains_key(key.as_bytes()) {
        return Ok(None);
    }
    get_typed(dict, key, expected, project).map(Some)
}

fn to_interval(value: &BigInt) -> Result<u32, TrackerError> {
    u32::try_from(value).map_err(|_| TrackerError::IntervalOverflow(value.clone()))
}

fn to_count(key: &str, value: &BigInt) -> Result<u32, TrackerError> {
    u32::try_from(value).map_err(|_| TrackerError::CountOverflow {
        key: key.to_string(),
        value: value.clone(),
    })
}

/// Builds a [`Peer`] from one entry of a tracker's `peers` list.
///
/// Requires `ip` and `peer id` byte strings and an integer `port` in
/// `0..=65535`.
pub fn get_peer(dict: &Dictionary) -> Result<Peer, TrackerError> {
    let ip = get_bytes(dict, "ip")?;
    let peer_id = get_bytes(dict, "peer id")?;
    let port = get_integer(dict, "port")?;
    let port = u16::try_from(port).map_err(|_| TrackerError::PortOverflow(port.clone()))?;

    Ok(Peer::new(ip.clone(), peer_id.clone(), port))
}

/// Builds every peer in `list`, keeping the list's order.
///
/// Fails on the first element that is not a dictionary or not a valid peer.
pub fn get_peers(list: &[Bencode]) -> Result<Vec<Peer>, TrackerError> {
    sequence(list.iter().enumerate().map(|(index, item)| {
        let dict = item.as_dict().ok_or_else(|| TrackerError::TypeMismatch {
            key: format!("peers[{}]", index),
            expected: Kind::Dictionary,
            actual: item.kind(),
        })?;
        get_peer(dict).with_context(|| format!("reading peer {}", index))
    }))
}

/// Builds a [`PeerResponse`] from a tracker reply dictionary.
///
/// A `failure reason` key short-circuits into [`TrackerError::Failure`].
pub fn get_peer_response(dict: &Dictionary) -> Result<PeerResponse, TrackerError> {
    let failure = get_optional(dict, "failure reason", Kind::ByteString, Bencode::as_bytes)?;
    if let Some(reason) = failure {
        let reason = String::from_utf8_lossy(reason).into_owned();
        tracing::debug!("tracker reported failure: {}", reason);
        return Err(TrackerError::Failure(reason));
    }

    let interval = to_interval(get_integer(dict, "interval")?)?;
    let peers = get_peers(get_list(dict, "peers")?)?;

    let mut response = PeerResponse::new(interval, peers);
    response.min_interval = get_optional(dict, "min interval", Kind::Integer, Bencode::as_integer)?
        .map(to_interval)
        .transpose()
        .context("reading min interval")?;
    response.complete = get_optional(dict, "complete", Kind::Integer, Bencode::as_integer)?
        .map(|v| to_count("complete", v))
        .transpose()?;
    response.incomplete = get_optional(dict, "incomplete", Kind::Integer, Bencode::as_integer)?
        .map(|v| to_count("incomplete", v))
        .transpose()?;
    response.warning_message =
        get_optional(dict, "warning message", Kind::ByteString, Bencode::as_bytes)?
            .map(|b| String::from_utf8_lossy(b).into_owned());
    response.tracker_id =
        get_optional(dict, "tracker id", Kind::ByteString, Bencode::as_bytes)?.cloned();

    tracing::debug!(
        "parsed peer response: interval {}s, {} peers",
        response.interval,
        response.peers.len()
    );
    Ok(response)
}

/// Converts a decoded tracker reply into a [`PeerResponse`].
///
/// # Errors
///
/// [`TrackerError::WrongShape`] if `tree` is not a dictionary, otherwise
/// whatever [`get_peer_response`] reports.
///
/// # Examples
///
/// ```
/// use bencode_peers::bencode::decode;
/// use bencode_peers::tracker::{convert_to_peer_response, Peer};
///
/// let tree = decode(
///     b"d8:intervali1800e5:peersld2:ip7:1.2.3.47:peer id20:ABCDEFGHIJKLMNOPQRST4:porti6881eeee",
/// )
/// .unwrap();
/// let response = convert_to_peer_response(&tree).unwrap();
///
/// assert_eq!(response.interval, 1800);
/// assert_eq!(
///     response.peers,
///     vec![Peer::new("1.2.3.4", "ABCDEFGHIJKLMNOPQRST", 6881)]
/// );
/// ```
pub fn convert_to_peer_response(tree: &Bencode) -> Result<PeerResponse, TrackerError> {
    match tree {
        Bencode::Dict(dict) => get_peer_response(dict),
        other => Err(TrackerError::WrongShape(other.kind())),
    }
}

impl PeerResponse {
    /// Decodes a raw tracker reply body and extracts the peer response.
    pub fn from_bytes(data: &[u8]) -> Result<Self, TrackerError> {
        let tree = decode(data)?;
        convert_to_peer_response(&tree)
    }
}

impl TryFrom<&Bencode> for PeerResponse {
    type Error = TrackerError;

    fn try_from(tree: &Bencode) -> Result<Self, Self::Error> {
        convert_to_peer_response(tree)
    }
}
