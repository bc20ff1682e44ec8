//! Line codec — frames a TCP byte stream into protocol lines.
//!
//! Inbound: splits on `\n`, strips an optional trailing `\r`, and yields the
//! line as a `String`. Outbound: renders a [`ServerEvent`] and appends `\n`.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::message::ServerEvent;

/// Maximum inbound line length in bytes (excluding the newline).
const MAX_LINE_LENGTH: usize = 8192;

/// Codec error: a framing failure or an underlying I/O error.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("line exceeds maximum length ({MAX_LINE_LENGTH} bytes)")]
    LineTooLong,
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A tokio codec that frames protocol lines on `\n` boundaries.
#[derive(Debug, Default)]
pub struct LineCodec;

impl Decoder for LineCodec {
    type Item = String;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match src.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                if pos > MAX_LINE_LENGTH {
                    return Err(CodecError::LineTooLong);
                }

                let mut line_bytes = src.split_to(pos);
                src.advance(1); // skip \n
                if line_bytes.last() == Some(&b'\r') {
                    line_bytes.truncate(line_bytes.len() - 1);
                }

                let line = std::str::from_utf8(&line_bytes)
                    .map_err(|_| CodecError::InvalidUtf8)?
                    .to_string();
                Ok(Some(line))
            }
            None => {
                // No complete line yet; bail if the buffer can no longer
                // possibly hold a valid one.
                if src.len() > MAX_LINE_LENGTH {
                    return Err(CodecError::LineTooLong);
                }
                Ok(None)
            }
        }
    }
}

impl Encoder<ServerEvent> for LineCodec {
    type Error = CodecError;

    fn encode(&mut self, event: ServerEvent, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let line = event.to_string();
        dst.reserve(line.len() + 1);
        dst.put_slice(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(codec: &mut LineCodec, buf: &mut BytesMut) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = codec.decode(buf).unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn test_decode_single_line() {
        let mut codec = LineCodec;
        let mut buf = BytesMut::from("alice\n");
        assert_eq!(decode_all(&mut codec, &mut buf), vec!["alice"]);
    }

    #[test]
    fn test_decode_strips_carriage_return() {
        let mut codec = LineCodec;
        let mut buf = BytesMut::from("alice\r\n");
        assert_eq!(decode_all(&mut codec, &mut buf), vec!["alice"]);
    }

    #[test]
    fn test_decode_multiple_lines() {
        let mut codec = LineCodec;
        let mut buf = BytesMut::from("one\ntwo\n");
        assert_eq!(decode_all(&mut codec, &mut buf), vec!["one", "two"]);
    }

    #[test]
    fn test_decode_partial_line_waits() {
        let mut codec = LineCodec;
        let mut buf = BytesMut::from("ali");
        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"ce\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("alice".to_string()));
    }

    #[test]
    fn test_decode_empty_line() {
        let mut codec = LineCodec;
        let mut buf = BytesMut::from("\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(String::new()));
    }

    #[test]
    fn test_decode_oversize_line_errors() {
        let mut codec = LineCodec;
        let mut buf = BytesMut::from(vec![b'a'; MAX_LINE_LENGTH + 1].as_slice());
        assert!(matches!(
            codec.decode(&mut buf),
            Err(CodecError::LineTooLong)
        ));
    }

    #[test]
    fn test_decode_invalid_utf8_errors() {
        let mut codec = LineCodec;
        let mut buf = BytesMut::from(&[0xff, 0xfe, b'\n'][..]);
        assert!(matches!(
            codec.decode(&mut buf),
            Err(CodecError::InvalidUtf8)
        ));
    }

    #[test]
    fn test_encode_appends_newline() {
        let mut codec = LineCodec;
        let mut buf = BytesMut::new();
        codec.encode(ServerEvent::SubmitName, &mut buf).unwrap();
        assert_eq!(&buf[..], b"SUBMITNAME\n");
    }
}
