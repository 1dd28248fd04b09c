use std::io::{ErrorKind, Read, Write};

use tracing::warn;

use crate::error::{Result, TransportError};

/// Fill `buf` completely from `reader` (blocking).
///
/// Partial reads are retried. An interrupted read is not retried: it ends
/// the transfer with [`TransportError::Interrupted`] so the caller can shut
/// down. End of stream yields [`TransportError::Closed`].
pub fn read_exact<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    let expected = buf.len();
    let mut offset = 0usize;
    while offset < expected {
        match reader.read(&mut buf[offset..]) {
            Ok(0) => {
                return Err(TransportError::Closed {
                    transferred: offset,
                    expected,
                })
            }
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => {
                warn!("got signal, exiting");
                return Err(TransportError::Interrupted);
            }
            Err(err) => return Err(TransportError::Io(err)),
        }
    }
    Ok(())
}

/// Write all of `buf` to `writer` (blocking) and flush.
///
/// Same interruption and close semantics as [`read_exact`].
pub fn write_exact<W: Write + ?Sized>(writer: &mut W, buf: &[u8]) -> Result<()> {
    let expected = buf.len();
    let mut offset = 0usize;
    while offset < expected {
        match writer.write(&buf[offset..]) {
            Ok(0) => {
                return Err(TransportError::Closed {
                    transferred: offset,
                    expected,
                })
            }
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => {
                warn!("got signal, exiting");
                return Err(TransportError::Interrupted);
            }
            Err(err) => return Err(TransportError::Io(err)),
        }
    }

    match writer.flush() {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::Interrupted => Err(TransportError::Interrupted),
        Err(err) => Err(TransportError::Io(err)),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct InterruptedReader;

    impl Read for InterruptedReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::Interrupted))
        }
    }

    struct ShortWriter {
        written: Vec<u8>,
        max_chunk: usize,
    }

    impl Write for ShortWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let n = buf.len().min(self.max_chunk);
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn reads_across_partial_reads() {
        let mut reader = ByteByByteReader {
            bytes: b"report".to_vec(),
            pos: 0,
        };
        let mut buf = [0u8; 6];
        read_exact(&mut reader, &mut buf).unwrap();
        assert_eq!(&buf, b"report");
    }

    #[test]
    fn zero_length_read_touches_nothing() {
        let mut reader = Cursor::new(Vec::<u8>::new());
        read_exact(&mut reader, &mut []).unwrap();
    }

    #[test]
    fn eof_before_first_byte_is_clean_close() {
        let mut reader = Cursor::new(Vec::<u8>::new());
        let mut buf = [0u8; 4];
        let err = read_exact(&mut reader, &mut buf).unwrap_err();
        assert!(matches!(
            err,
            TransportError::Closed {
                transferred: 0,
                expected: 4
            }
        ));
        assert!(err.is_shutdown());
    }

    #[test]
    fn eof_mid_read_is_truncation() {
        let mut reader = Cursor::new(vec![1u8, 2]);
        let mut buf = [0u8; 4];
        let err = read_exact(&mut reader, &mut buf).unwrap_err();
        assert!(matches!(err, TransportError::Closed { transferred: 2, .. }));
        assert!(!err.is_shutdown());
    }

    #[test]
    fn interrupted_read_stops_without_retry() {
        let mut buf = [0u8; 4];
        let err = read_exact(&mut InterruptedReader, &mut buf).unwrap_err();
        assert!(matches!(err, TransportError::Interrupted));
        assert!(err.is_shutdown());
    }

    #[test]
    fn writes_across_short_writes() {
        let mut writer = ShortWriter {
            written: Vec::new(),
            max_chunk: 3,
        };
        write_exact(&mut writer, b"feature").unwrap();
        assert_eq!(writer.written, b"feature");
    }

    #[test]
    fn broken_pipe_is_failure() {
        let err = write_exact(&mut BrokenWriter, b"x").unwrap_err();
        assert!(matches!(err, TransportError::Io(ref e) if e.kind() == ErrorKind::BrokenPipe));
        assert!(!err.is_shutdown());
    }
}
