use bytes::Bytes;
use indexmap::{Equivalent, IndexMap};
use num_bigint::BigInt;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A decoded bencode value.
///
/// Bencode has four data types: integers, byte strings, lists, and dictionaries.
/// Integers keep their full precision; narrowing them to fixed-width types is
/// left to the caller.
///
/// # Examples
///
/// ```
/// use bencode_peers::bencode::{Bencode, Kind};
///
/// let int: Bencode = 42i64.into();
/// let string = Bencode::string("hello");
/// let list = Bencode::List(vec![int.clone(), string.clone()]);
///
/// assert_eq!(int.kind(), Kind::Integer);
/// assert_eq!(string.as_str(), Some("hello"));
/// assert_eq!(list.as_list().map(|l| l.len()), Some(2));
/// assert_eq!(list.to_string(), r#"[42, "hello"]"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bencode {
    /// An arbitrary-precision signed integer.
    Integer(BigInt),
    /// A byte string (may or may not be valid UTF-8).
    Bytes(Bytes),
    /// An ordered list of values.
    List(Vec<Bencode>),
    /// A dictionary, kept in the order its entries were decoded.
    Dict(Dictionary),
}

/// The variant of a [`Bencode`] value, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Integer,
    ByteString,
    List,
    Dictionary,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Integer => "integer",
            Kind::ByteString => "byte string",
            Kind::List => "list",
            Kind::Dictionary => "dictionary",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Bencode {
    /// Creates a byte string value from a UTF-8 string.
    pub fn string(s: &str) -> Self {
        Bencode::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Bencode::Integer(_) => Kind::Integer,
            Bencode::Bytes(_) => Kind::ByteString,
            Bencode::List(_) => Kind::List,
            Bencode::Dict(_) => Kind::Dictionary,
        }
    }

    /// Returns the value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Bencode::Integer(i) => Some(i),
            _ => None,
        }
    }

    /// Returns the value as a byte string, if it is one.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Bencode::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the value as a UTF-8 string, if it is a valid UTF-8 byte string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Bencode::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Bencode]> {
        match self {
            Bencode::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Bencode::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Looks up a byte-string key in this value if it is a dictionary.
    ///
    /// ```
    /// use bencode_peers::bencode::decode;
    ///
    /// let value = decode(b"d3:foo3:bare").unwrap();
    /// assert_eq!(value.get(b"foo").and_then(|v| v.as_str()), Some("bar"));
    /// assert_eq!(value.get(b"missing"), None);
    /// ```
    pub fn get(&self, key: &[u8]) -> Option<&Bencode> {
        self.as_dict()?.get(key)
    }
}

impl From<i64> for Bencode {
    fn from(i: i64) -> Self {
        Bencode::Integer(BigInt::from(i))
    }
}

impl From<BigInt> for Bencode {
    fn from(i: BigInt) -> Self {
        Bencode::Integer(i)
    }
}

impl From<&str> for Bencode {
    fn from(s: &str) -> Self {
        Bencode::string(s)
    }
}

impl From<Bytes> for Bencode {
    fn from(b: Bytes) -> Self {
        Bencode::Bytes(b)
    }
}

impl From<Vec<Bencode>> for Bencode {
    fn from(l: Vec<Bencode>) -> Self {
        Bencode::List(l)
    }
}

impl From<Dictionary> for Bencode {
    fn from(d: Dictionary) -> Self {
        Bencode::Dict(d)
    }
}

/// Renders integers as numbers, byte strings quoted with non-printable
/// bytes escaped, lists as `[..]` and dictionaries as `{key: value, ..}`.
impl fmt::Display for Bencode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bencode::Integer(i) => write!(f, "{}", i),
            Bencode::Bytes(b) => write!(f, "\"{}\"", b.escape_ascii()),
            Bencode::List(l) => {
                f.write_str("[")?;
                for (i, item) in l.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Bencode::Dict(d) => {
                f.write_str("{")?;
                for (i, (key, value)) in d.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Dictionary entries in decode order.
///
/// Keys may be any [`Bencode`] value. Canonical bencode only allows byte
/// string keys in sorted order; that is checked by the decoder in strict
/// mode, not here. Inserting an existing key replaces its value in place.
///
/// Two dictionaries are equal only if they hold the same entries in the same
/// order.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: IndexMap<Bencode, Bencode>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the value stored under the byte-string key `key`.
    pub fn get(&self, key: &[u8]) -> Option<&Bencode> {
        self.entries.get(&ByteKey(key))
    }

    /// Looks up the value stored under an arbitrary key.
    pub fn get_entry(&self, key: &Bencode) -> Option<&Bencode> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.entries.contains_key(&ByteKey(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Bencode, &Bencode)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Bencode> {
        self.entries.keys()
    }

    pub(crate) fn insert(&mut self, key: Bencode, value: Bencode) -> Option<Bencode> {
        self.entries.insert(key, value)
    }
}

impl PartialEq for Dictionary {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for Dictionary {}

impl Hash for Dictionary {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.entries.len());
        for (key, value) in &self.entries {
            key.hash(state);
            value.hash(state);
        }
    }
}

// Tags must stay in sync with `ByteKey::hash`.
impl Hash for Bencode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Bencode::Integer(i) => {
                state.write_u8(0);
                i.hash(state);
            }
            Bencode::Bytes(b) => {
                state.write_u8(1);
                b.as_ref().hash(state);
            }
            Bencode::List(l) => {
                state.write_u8(2);
                l.hash(state);
            }
            Bencode::Dict(d) => {
                state.write_u8(3);
                d.hash(state);
            }
        }
    }
}

/// Borrowed byte-string key, so lookups by `&[u8]` need no allocation.
struct ByteKey<'a>(&'a [u8]);

impl Hash for ByteKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(1);
        self.0.hash(state);
    }
}

impl Equivalent<Bencode> for ByteKey<'_> {
    fn equivalent(&self, key: &Bencode) -> bool {
        matches!(key, Bencode::Bytes(b) if b.as_ref() == self.0)
    }
}

impl FromIterator<(Bencode, Bencode)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (Bencode, Bencode)>>(iter: I) -> Self {
        let mut dict = Dictionary::new();
        for (key, value) in iter {
            dict.insert(key, value);
        }
        dict
    }
}

impl<'a> FromIterator<(&'a str, Bencode)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (&'a str, Bencode)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(key, value)| (Bencode::string(key), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_keeps_insertion_order() {
        let dict: Dictionary = [
            ("spam", Bencode::from(1)),
            ("cow", Bencode::from(2)),
            ("spam", Bencode::from(3)),
        ]
        .into_iter()
        .collect();

        assert_eq!(dict.len(), 2);
        let keys: Vec<_> = dict.keys().filter_map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["spam", "cow"]);
        assert_eq!(dict.get(b"spam"), Some(&Bencode::from(3)));
    }

    #[test]
    fn test_dictionary_non_string_keys() {
        let dict: Dictionary = [(Bencode::from(7), Bencode::string("seven"))]
            .into_iter()
            .collect();

        assert_eq!(dict.get(b"7"), None);
        assert_eq!(
            dict.get_entry(&Bencode::from(7)).and_then(|v| v.as_str()),
            Some("seven")
        );
    }

    #[test]
    fn test_byte_key_lookup_matches_bencode_key() {
        let dict: Dictionary = [
            (Bencode::string("7"), Bencode::from(1)),
            (Bencode::from(7), Bencode::from(2)),
            (Bencode::List(vec![Bencode::string("7")]), Bencode::from(3)),
        ]
        .into_iter()
        .collect();

        assert_eq!(dict.get(b"7"), Some(&Bencode::from(1)));
        assert_eq!(dict.get_entry(&Bencode::string("7")), Some(&Bencode::from(1)));
        assert_eq!(dict.get_entry(&Bencode::from(7)), Some(&Bencode::from(2)));
        assert!(dict.contains_key(b"7"));
        assert!(!dict.contains_key(b"8"));
    }

    #[test]
    fn test_dictionary_equality_is_ordered() {
        let ab: Dictionary = [("a", Bencode::from(1)), ("b", Bencode::from(2))]
            .into_iter()
            .collect();
        let ba: Dictionary = [("b", Bencode::from(2)), ("a", Bencode::from(1))]
            .into_iter()
            .collect();

        assert_eq!(ab, ab.clone());
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_display_escapes_bytes() {
        let value = Bencode::Bytes(Bytes::from_static(b"ab\x00c"));
        assert_eq!(value.to_string(), r#""ab\x00c""#);

        let dict: Dictionary = [("n", Bencode::from(-5))].into_iter().collect();
        assert_eq!(Bencode::Dict(dict).to_string(), r#"{"n": -5}"#);
    }

    #[test]
    fn test_kind() {
        assert_eq!(Bencode::from(1).kind(), Kind::Integer);
        assert_eq!(Bencode::string("x").kind(), Kind::ByteString);
        assert_eq!(Bencode::List(vec![]).kind(), Kind::List);
        assert_eq!(Bencode::Dict(Dictionary::new()).kind(), Kind::Dictionary);
        assert_eq!(Kind::ByteString.to_string(), "byte string");
    }
}
