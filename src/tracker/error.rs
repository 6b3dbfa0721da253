use num_bigint::BigInt;
use thiserror::Error;

use crate::bencode::{BencodeError, Kind};
use crate::fallible::Contextual;

/// Errors that can occur while turning a tracker reply into a [`PeerResponse`].
///
/// [`PeerResponse`]: super::PeerResponse
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("bencode error: {0}")]
    Bencode(#[from] BencodeError),

    /// The tracker rejected the request (`failure reason`).
    #[error("tracker returned error: {0}")]
    Failure(String),

    #[error("expected a dictionary, found {0}")]
    WrongShape(Kind),

    #[error("missing attribute: {0}")]
    MissingAttribute(String),

    #[error("attribute {key:?} should be {expected}, found {actual}")]
    TypeMismatch {
        key: String,
        expected: Kind,
        actual: Kind,
    },

    #[error("port out of range: {0}")]
    PortOverflow(BigInt),

    /// An announce interval that is negative or does not fit in 32 bits.
    #[error("interval out of range: {0}")]
    IntervalOverflow(BigInt),

    /// A swarm counter that is negative or does not fit in 32 bits.
    #[error("{key} count out of range: {value}")]
    CountOverflow { key: String, value: BigInt },

    #[error("{context}")]
    Context {
        context: String,
        #[source]
        source: Box<TrackerError>,
    },
}

impl TrackerError {
    /// Returns the innermost failure, skipping any context wrappers.
    pub fn root_cause(&self) -> &TrackerError {
        let mut current = self;
        while let TrackerError::Context { source, .. } = current {
            current = source;
        }
        current
    }
}

impl Contextual for TrackerError {
    fn wrap(self, context: String) -> Self {
        TrackerError::Context {
            context,
            source: Box::new(self),
        }
    }
}
