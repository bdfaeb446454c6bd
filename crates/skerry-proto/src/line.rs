//! Line-based codec for tokio.
//!
//! Frames a byte stream into newline-terminated lines and writes composed
//! lines back out. Parsing is not done here.
//!
//! A bad line (too long, not UTF-8, NUL inside) is yielded as an `Err` item
//! rather than a decoder error: `FramedRead` ends the stream after a decoder
//! error, and one bad line must not end the connection.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, ProtocolError};

/// One decoded line, or the reason that line was rejected.
pub type Line = Result<String, ProtocolError>;

/// Default maximum line length (RFC 1459, including CRLF).
pub const DEFAULT_MAX_LINE_LEN: usize = 512;

/// Line-based codec that handles newline-terminated messages.
#[derive(Debug)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Dropping the remainder of an overlong line
    discarding: bool,
}

impl LineCodec {
    /// Create a codec with the default 512 byte limit.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Create a new codec with custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    /// Control characters other than CR, LF, TAB and the IRC formatting codes.
    fn is_illegal_control_char(ch: char) -> bool {
        ch == '\0'
    }

    fn validate_line(s: &str) -> Line {
        match s.chars().find(|c| Self::is_illegal_control_char(*c)) {
            Some(ch) => Err(ProtocolError::IllegalControlChar(ch)),
            None => Ok(s.to_string()),
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = Line;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Line>> {
        loop {
            let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
                // No complete line yet - remember where we stopped
                if src.len() > self.max_len {
                    let actual = src.len();
                    src.clear();
                    self.next_index = 0;
                    // Keep dropping bytes until the newline that ends this line
                    let already_discarding = std::mem::replace(&mut self.discarding, true);
                    if already_discarding {
                        return Ok(None);
                    }
                    return Ok(Some(Err(ProtocolError::LineTooLong {
                        actual,
                        limit: self.max_len,
                    })));
                }
                self.next_index = src.len();
                return Ok(None);
            };

            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if self.discarding {
                // Tail of an overlong line that was already reported
                self.discarding = false;
                continue;
            }

            if line.len() > self.max_len {
                return Ok(Some(Err(ProtocolError::LineTooLong {
                    actual: line.len(),
                    limit: self.max_len,
                })));
            }

            let decoded = match std::str::from_utf8(&line) {
                Ok(text) => Self::validate_line(text.trim_end_matches(['\r', '\n'])),
                Err(e) => Err(ProtocolError::InvalidUtf8 {
                    byte_pos: e.valid_up_to(),
                }),
            };
            return Ok(Some(decoded));
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> error::Result<()> {
        dst.reserve(line.len() + 2);
        dst.extend_from_slice(line.as_bytes());
        if !line.ends_with("\r\n") {
            dst.extend_from_slice(b"\r\n");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_complete_lines_only() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("NICK bob\r\nUSER bo");
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap().unwrap(), "NICK bob");
        assert!(codec.decode(&mut buf).unwrap().is_none());
        buf.extend_from_slice(b"b h s :Bob\n");
        assert_eq!(
            codec.decode(&mut buf).unwrap().unwrap().unwrap(),
            "USER bob h s :Bob"
        );
    }

    #[test]
    fn overlong_line_is_reported_once_then_skipped() {
        let mut codec = LineCodec::with_max_len(16);
        let mut buf = BytesMut::from("PRIVMSG #a :0123456789abcdef");
        assert!(matches!(
            codec.decode(&mut buf),
            Ok(Some(Err(ProtocolError::LineTooLong { .. })))
        ));
        buf.extend_from_slice(b"more tail\r\nQUIT\r\n");
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap().unwrap(), "QUIT");
    }

    #[test]
    fn invalid_utf8_affects_only_that_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"PRIVMSG #a :\xff\r\nQUIT\r\n"[..]);
        let err = codec.decode(&mut buf).unwrap().unwrap().unwrap_err();
        assert!(!err.is_fatal());
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap().unwrap(), "QUIT");
    }

    #[test]
    fn nul_is_rejected() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"NICK a\0b\r\n"[..]);
        assert!(matches!(
            codec.decode(&mut buf),
            Ok(Some(Err(ProtocolError::IllegalControlChar('\0'))))
        ));
    }

    #[test]
    fn encode_appends_crlf_once() {
        let mut codec = LineCodec::new();
        let mut dst = BytesMut::new();
        codec.encode("PING x".to_string(), &mut dst).unwrap();
        codec.encode("PONG x\r\n".to_string(), &mut dst).unwrap();
        assert_eq!(&dst[..], b"PING x\r\nPONG x\r\n");
    }

    #[tokio::test]
    async fn bad_line_does_not_end_framed_stream() {
        use futures_util::StreamExt;
        use tokio_util::codec::FramedRead;

        let data: &[u8] = b"NICK \xff\r\nNICK bob\r\n";
        let mut framed = FramedRead::new(data, LineCodec::new());
        assert!(framed.next().await.unwrap().unwrap().is_err());
        assert_eq!(framed.next().await.unwrap().unwrap().unwrap(), "NICK bob");
        assert!(framed.next().await.is_none());
    }
}
