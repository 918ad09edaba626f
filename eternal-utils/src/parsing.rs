//! Helpers for parsing binary data
use nom::Parser;
use thiserror::Error;

pub type IResult<I, O> = nom::IResult<I, O, ()>;


/// Bounds-checked cursor over a byte buffer
///
/// Values are read sequentially using nom parsers.
/// The cursor only advances when a parser succeeds, so [Cursor::offset()] points to the start of
/// the value that failed to be read.
///
/// Streaming parsers should be used: on a short buffer they report missing data, which is
/// converted to [ParseError::NotEnoughData].
/// ```
/// use eternal_utils::parsing::{Cursor, ParseError};
/// use nom::number::streaming::{le_i16, le_u32};
///
/// let mut cursor = Cursor::new(b"\x2a\x00\x00\x00\x07");
/// assert_eq!(cursor.read(le_u32).unwrap(), 42);
/// assert_eq!(cursor.offset(), 4);
/// assert!(matches!(cursor.read(le_i16), Err(ParseError::NotEnoughData)));
/// assert_eq!(cursor.offset(), 4);
/// ```
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    data: &'a [u8],
    rest: &'a [u8],
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the beginning of a buffer
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, rest: data }
    }

    /// Current position, from the beginning of the buffer
    pub fn offset(&self) -> usize {
        self.data.len() - self.rest.len()
    }

    /// Number of bytes left to read
    pub fn remaining(&self) -> usize {
        self.rest.len()
    }

    /// Return `true` if the whole buffer has been consumed
    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    /// Read a value, advance past it
    pub fn read<O, P>(&mut self, mut parser: P) -> Result<O, ParseError>
    where P: Parser<&'a [u8], O, ()> {
        let (rest, value) = parser.parse(self.rest)?;
        self.rest = rest;
        Ok(value)
    }

    /// Read `n` raw bytes
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], ParseError> {
        self.read(nom::bytes::streaming::take::<_, _, ()>(n))
    }
}


#[derive(Error, Debug)]
pub enum ParseError {
    #[error("unexpected data")]
    Error,
    #[error("not enough data")]
    NotEnoughData,
}

impl<T> From<nom::Err<T>> for ParseError {
    fn from(e: nom::Err<T>) -> Self {
        match e {
            nom::Err::Incomplete(_) => Self::NotEnoughData,
            nom::Err::Error(_) | nom::Err::Failure(_) => Self::Error,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use nom::number::streaming::{le_i16, le_u64};

    #[test]
    fn read_sequence() {
        let buf = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0xff, 0xff, b'a', b'b'];
        let mut cursor = Cursor::new(&buf);
        assert_eq!(cursor.read(le_u64).unwrap(), 0x0807060504030201);
        assert_eq!(cursor.read(le_i16).unwrap(), -1);
        assert_eq!(cursor.take(2).unwrap(), b"ab");
        assert!(cursor.is_empty());
        assert_eq!(cursor.offset(), buf.len());
    }

    #[test]
    fn take_past_end() {
        let mut cursor = Cursor::new(b"abc");
        assert_eq!(cursor.take(1).unwrap(), b"a");
        assert!(matches!(cursor.take(3), Err(ParseError::NotEnoughData)));
        assert_eq!(cursor.offset(), 1);
        assert_eq!(cursor.remaining(), 2);
        assert_eq!(cursor.take(0).unwrap(), b"");
    }

    #[test]
    fn empty_buffer() {
        let mut cursor = Cursor::new(&[]);
        assert!(cursor.is_empty());
        assert!(matches!(cursor.read(le_u64), Err(ParseError::NotEnoughData)));
    }
}
