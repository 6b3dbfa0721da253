use super::error::BencodeError;

/// A single-pass reader over in-memory input with one byte of lookahead.
///
/// Every read either advances past exactly what it returns or leaves the
/// position where it was; failed reads never consume input.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Byte offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn has_next(&self) -> bool {
        self.pos < self.data.len()
    }

    /// Returns the next byte without consuming it.
    pub fn peek(&self) -> Result<u8, BencodeError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(BencodeError::EndOfInput {
                needed: 1,
                remaining: 0,
            })
    }

    /// Consumes the longest prefix whose bytes all satisfy `pred`.
    ///
    /// Never fails; returns an empty slice if the first byte does not match
    /// or the input is exhausted.
    pub fn read_while<P>(&mut self, mut pred: P) -> &'a [u8]
    where
        P: FnMut(u8) -> bool,
    {
        let start = self.pos;
        while let Some(&b) = self.data.get(self.pos) {
            if !pred(b) {
                break;
            }
            self.pos += 1;
        }
        let data = self.data;
        &data[start..self.pos]
    }

    /// Consumes `expected` if it is the next byte.
    pub fn consume(&mut self, expected: u8) -> Result<(), BencodeError> {
        let found = self.peek()?;
        if found != expected {
            return Err(BencodeError::ConsumeMismatch {
                expected: expected as char,
                found: found as char,
            });
        }
        self.pos += 1;
        Ok(())
    }

    /// Consumes exactly `n` bytes.
    pub fn read_exactly(&mut self, n: usize) -> Result<&'a [u8], BencodeError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(BencodeError::EndOfInput {
                needed: n,
                remaining,
            });
        }
        let data = self.data;
        let bytes = &data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Consumes bytes up to and including `terminator`, returning the bytes
    /// before it.
    pub fn read_until(&mut self, terminator: u8) -> Result<&'a [u8], BencodeError> {
        let start = self.pos;
        let body = self.read_while(|b| b != terminator);
        match self.consume(terminator) {
            Ok(()) => Ok(body),
            Err(e) => {
                self.pos = start;
                Err(e)
            }
        }
    }
}

impl Iterator for Cursor<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let b = self.data.get(self.pos).copied()?;
        self.pos += 1;
        Some(b)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_does_not_consume() {
        let cursor = Cursor::new(b"ab");
        assert_eq!(cursor.peek().unwrap(), b'a');
        assert_eq!(cursor.peek().unwrap(), b'a');
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_peek_at_end() {
        let cursor = Cursor::new(b"");
        assert!(!cursor.has_next());
        assert!(matches!(
            cursor.peek(),
            Err(BencodeError::EndOfInput { needed: 1, remaining: 0 })
        ));
    }

    #[test]
    fn test_next() {
        let mut cursor = Cursor::new(b"xy");
        assert_eq!(cursor.next(), Some(b'x'));
        assert_eq!(cursor.next(), Some(b'y'));
        assert_eq!(cursor.next(), None);
        assert!(!cursor.has_next());
    }

    #[test]
    fn test_read_while() {
        let mut cursor = Cursor::new(b"123:abc");
        assert_eq!(cursor.read_while(|b| b.is_ascii_digit()), b"123");
        assert_eq!(cursor.peek().unwrap(), b':');

        assert_eq!(cursor.read_while(|b| b.is_ascii_digit()), b"");
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_read_while_to_end() {
        let mut cursor = Cursor::new(b"999");
        assert_eq!(cursor.read_while(|b| b.is_ascii_digit()), b"999");
        assert!(!cursor.has_next());
    }

    #[test]
    fn test_consume_mismatch_keeps_position() {
        let mut cursor = Cursor::new(b"ie");
        let err = cursor.consume(b'e').unwrap_err();
        assert!(matches!(
            err,
            BencodeError::ConsumeMismatch { expected: 'e', found: 'i' }
        ));
        assert_eq!(cursor.position(), 0);

        cursor.consume(b'i').unwrap();
        cursor.consume(b'e').unwrap();
        assert!(matches!(
            cursor.consume(b'e'),
            Err(BencodeError::EndOfInput { .. })
        ));
    }

    #[test]
    fn test_read_exactly() {
        let mut cursor = Cursor::new(b"spam");
        assert_eq!(cursor.read_exactly(2).unwrap(), b"sp");
        assert!(matches!(
            cursor.read_exactly(3),
            Err(BencodeError::EndOfInput { needed: 3, remaining: 2 })
        ));
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.read_exactly(2).unwrap(), b"am");
        assert_eq!(cursor.read_exactly(0).unwrap(), b"");
    }

    #[test]
    fn test_read_until() {
        let mut cursor = Cursor::new(b"42e7");
        assert_eq!(cursor.read_until(b'e').unwrap(), b"42");
        assert_eq!(cursor.peek().unwrap(), b'7');
    }

    #[test]
    fn test_read_until_missing_terminator_restores() {
        let mut cursor = Cursor::new(b"123");
        assert!(cursor.read_until(b'e').is_err());
        assert_eq!(cursor.position(), 0);
    }
}
