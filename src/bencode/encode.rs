use super::value::Bencode;

/// Serializes a value back to bencode.
///
/// Dictionaries are written in their stored order, so a value decoded from
/// canonical input re-encodes to the same bytes. Encoding into memory cannot
/// fail.
///
/// # Examples
///
/// ```
/// use bencode_peers::bencode::{decode, encode, Bencode};
///
/// assert_eq!(encode(&Bencode::from(-42)), b"i-42e");
///
/// let original = b"d3:cow3:moo4:spam4:eggse";
/// let value = decode(original).unwrap();
/// assert_eq!(encode(&value), original);
/// ```
pub fn encode(value: &Bencode) -> Vec<u8> {
    let mut out = Vec::new();
    append(value, &mut out);
    out
}

fn append(value: &Bencode, out: &mut Vec<u8>) {
    match value {
        Bencode::Integer(n) => {
            out.push(b'i');
            out.extend_from_slice(n.to_str_radix(10).as_bytes());
            out.push(b'e');
        }
        Bencode::Bytes(payload) => {
            out.extend_from_slice(payload.len().to_string().as_bytes());
            out.push(b':');
            out.extend_from_slice(payload);
        }
        Bencode::List(items) => {
            out.push(b'l');
            items.iter().for_each(|item| append(item, out));
            out.push(b'e');
        }
        Bencode::Dict(dict) => {
            out.push(b'd');
            for (key, entry) in dict.iter() {
                append(key, out);
                append(entry, out);
            }
            out.push(b'e');
        }
    }
}
