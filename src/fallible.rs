//! Combinators for chaining fallible steps.
//!
//! Failures are ordinary values carried by [`Result`]; nothing in this crate
//! panics on bad input. The plain combinators are the ones `Result` already
//! has:
//!
//! | Operation | `Result` method |
//! |-----------|-----------------|
//! | map | [`Result::map`] |
//! | flat map | [`Result::and_then`] (or `?`) |
//! | get or else | [`Result::unwrap_or`] |
//!
//! This module adds the rest: [`ResultExt::context`] wraps a failure while
//! keeping the original as its [`source`](std::error::Error::source),
//! [`ResultExt::fanout`] pairs two results, and [`sequence`] turns a list of
//! results into a result of a list.
//!
//! # Examples
//!
//! ```
//! use bencode_peers::fallible::{sequence, ResultExt};
//! use bencode_peers::BencodeError;
//!
//! let pair = Ok::<_, BencodeError>(1).fanout(|| Ok(2)).unwrap();
//! assert_eq!(pair, (1, 2));
//!
//! let failed: Result<u8, _> = Err(BencodeError::NothingToDecode).context("reading header");
//! let err = failed.unwrap_err();
//! assert_eq!(err.to_string(), "reading header");
//! assert!(matches!(err.root_cause(), BencodeError::NothingToDecode));
//!
//! let all = sequence(vec![Ok::<_, BencodeError>(1), Ok(2), Ok(3)]).unwrap();
//! assert_eq!(all, vec![1, 2, 3]);
//! ```

/// A failure type that can be wrapped with extra context.
///
/// Implementors keep `self` as the wrapped value's source, so the original
/// failure is never lost.
pub trait Contextual: Sized {
    fn wrap(self, context: String) -> Self;
}

pub trait ResultExt<T, E> {
    /// Wraps a failure with `context`. Successes pass through untouched.
    fn context<C: Into<String>>(self, context: C) -> Result<T, E>;

    /// Like [`context`](ResultExt::context), building the message only on failure.
    fn with_context<C: Into<String>, F: FnOnce() -> C>(self, f: F) -> Result<T, E>;

    /// Pairs this result with `other`, which only runs if this one succeeded.
    ///
    /// The first failure encountered is returned unchanged.
    fn fanout<U, F>(self, other: F) -> Result<(T, U), E>
    where
        F: FnOnce() -> Result<U, E>;
}

impl<T, E: Contextual> ResultExt<T, E> for Result<T, E> {
    fn context<C: Into<String>>(self, context: C) -> Result<T, E> {
        self.map_err(|e| e.wrap(context.into()))
    }

    fn with_context<C: Into<String>, F: FnOnce() -> C>(self, f: F) -> Result<T, E> {
        self.map_err(|e| e.wrap(f().into()))
    }

    fn fanout<U, F>(self, other: F) -> Result<(T, U), E>
    where
        F: FnOnce() -> Result<U, E>,
    {
        let first = self?;
        let second = other()?;
        Ok((first, second))
    }
}

/// Collects results in order, stopping at the first failure.
///
/// Items after the first failure are never pulled from the iterator.
pub fn sequence<T, E, I>(results: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = Result<T, E>>,
{
    let iter = results.into_iter();
    let mut values = Vec::with_capacity(iter.size_hint().0);
    for result in iter {
        values.push(result?);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bencode::BencodeError;
    use std::cell::Cell;
    use std::error::Error;

    #[test]
    fn test_context_keeps_source() {
        let result: Result<(), _> = Err(BencodeError::MissingTerminator("list"))
            .context("decoding list")
            .context("decoding response");
        let err = result.unwrap_err();

        assert_eq!(err.to_string(), "decoding response");
        let inner = err.source().unwrap();
        assert_eq!(inner.to_string(), "decoding list");
        assert_eq!(
            inner.source().unwrap().to_string(),
            "missing terminator for list"
        );
        assert!(matches!(
            err.root_cause(),
            BencodeError::MissingTerminator("list")
        ));
    }

    #[test]
    fn test_context_passes_success() {
        let result: Result<u8, BencodeError> = Ok(7);
        assert_eq!(result.with_context(|| "unused").unwrap(), 7);
    }

    #[test]
    fn test_fanout_short_circuits() {
        let ran = Cell::new(false);
        let result: Result<(u8, u8), _> = Err(BencodeError::NothingToDecode).fanout(|| {
            ran.set(true);
            Ok(1)
        });

        assert!(matches!(result, Err(BencodeError::NothingToDecode)));
        assert!(!ran.get());
    }

    #[test]
    fn test_fanout_second_failure() {
        let result: Result<(u8, u8), _> =
            Ok(1).fanout(|| Err(BencodeError::UnknownMarker('x')));
        assert!(matches!(result, Err(BencodeError::UnknownMarker('x'))));
    }

    #[test]
    fn test_sequence_stops_at_first_failure() {
        let pulled = Cell::new(0);
        let items = (0..5).map(|i| {
            pulled.set(pulled.get() + 1);
            if i == 2 {
                Err(BencodeError::MalformedInteger(i.to_string()))
            } else {
                Ok(i)
            }
        });

        let err = sequence(items).unwrap_err();
        assert!(matches!(err, BencodeError::MalformedInteger(ref s) if s == "2"));
        assert_eq!(pulled.get(), 3);
    }

    #[test]
    fn test_sequence_preserves_order() {
        let values = sequence(vec![Ok::<_, BencodeError>("a"), Ok("b"), Ok("c")]).unwrap();
        assert_eq!(values, vec!["a", "b", "c"]);

        let empty: Vec<Result<u8, BencodeError>> = Vec::new();
        assert!(sequence(empty).unwrap().is_empty());
    }
}
