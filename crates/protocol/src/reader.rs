//! Forward-only byte reader over a send stream source.

use std::io::{self, BufRead, BufReader, Read};

use crate::constants::SEND_BUFFER_SIZE;
use crate::error::StreamError;

/// Buffered, sequential reader that tracks the absolute stream offset.
///
/// Every read either fills the requested length completely or fails; a short
/// read surfaces as [`StreamError::Truncated`] and the reader should be
/// discarded afterwards.
#[derive(Debug)]
pub struct StreamReader<R> {
    inner: BufReader<R>,
    offset: u64,
}

impl<R: Read> StreamReader<R> {
    /// Wraps `source` in a buffer sized for the largest command.
    pub fn new(source: R) -> Self {
        Self {
            inner: BufReader::with_capacity(SEND_BUFFER_SIZE, source),
            offset: 0,
        }
    }

    /// Number of bytes consumed so far.
    #[must_use]
    #[inline]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Fills `buf` completely from the source.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), StreamError> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.offset += buf.len() as u64;
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Err(StreamError::Truncated {
                offset: self.offset,
                wanted: buf.len(),
            }),
            Err(err) => Err(StreamError::Io(err)),
        }
    }

    /// Reads exactly `len` bytes into `buf`, replacing its contents.
    pub fn read_into(&mut self, buf: &mut Vec<u8>, len: usize) -> Result<(), StreamError> {
        buf.clear();
        buf.resize(len, 0);
        self.read_exact(buf)
    }

    /// Reads a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], StreamError> {
        let mut bytes = [0u8; N];
        self.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    /// Reads a little-endian `u16`.
    pub fn read_u16_le(&mut self) -> Result<u16, StreamError> {
        self.read_array().map(u16::from_le_bytes)
    }

    /// Reads a little-endian `u32`.
    pub fn read_u32_le(&mut self) -> Result<u32, StreamError> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Reads a little-endian `u64`.
    pub fn read_u64_le(&mut self) -> Result<u64, StreamError> {
        self.read_array().map(u64::from_le_bytes)
    }

    /// Reports whether the source is exhausted, blocking until that is known.
    pub fn at_eof(&mut self) -> Result<bool, StreamError> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => return Ok(buf.is_empty()),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(StreamError::Io(err)),
            }
        }
    }

    /// Returns the wrapped source, discarding any buffered bytes.
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_little_endian_integers_and_tracks_offset() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0xBEEFu16.to_le_bytes());
        bytes.extend_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
        bytes.extend_from_slice(&7u64.to_le_bytes());
        let mut reader = StreamReader::new(Cursor::new(bytes));

        assert_eq!(reader.read_u16_le().unwrap(), 0xBEEF);
        assert_eq!(reader.offset(), 2);
        assert_eq!(reader.read_u32_le().unwrap(), 0xDEAD_BEEF);
        assert_eq!(reader.read_u64_le().unwrap(), 7);
        assert_eq!(reader.offset(), 14);
        assert!(reader.at_eof().unwrap());
    }

    #[test]
    fn short_read_reports_truncation_at_start_offset() {
        let mut reader = StreamReader::new(Cursor::new(vec![1, 2, 3, 4, 5]));
        reader.read_u16_le().unwrap();

        let err = reader.read_u32_le().unwrap_err();
        assert!(matches!(
            err,
            StreamError::Truncated {
                offset: 2,
                wanted: 4
            }
        ));
    }

    #[test]
    fn read_into_reuses_buffer() {
        let mut reader = StreamReader::new(Cursor::new(b"abcdef".to_vec()));
        let mut buf = Vec::with_capacity(16);

        reader.read_into(&mut buf, 2).unwrap();
        assert_eq!(buf, b"ab");
        reader.read_into(&mut buf, 4).unwrap();
        assert_eq!(buf, b"cdef");
        assert!(buf.capacity() >= 16);
    }

    #[test]
    fn at_eof_does_not_consume() {
        let mut reader = StreamReader::new(Cursor::new(vec![9]));
        assert!(!reader.at_eof().unwrap());
        assert_eq!(reader.read_array::<1>().unwrap(), [9]);
        assert!(reader.at_eof().unwrap());
    }

    #[test]
    fn non_eof_errors_surface_as_io() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            }
        }

        let mut reader = StreamReader::new(Failing);
        let err = reader.read_u32_le().unwrap_err();
        assert!(matches!(err, StreamError::Io(ref inner) if inner.kind() == io::ErrorKind::ConnectionReset));
    }
}
