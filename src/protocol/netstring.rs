//! Netstring Framing Module
//!
//! Encodes and decodes the length-prefixed socketmap wire format:
//! `<decimal length>:<payload bytes>,`
//!
//! The payload is opaque. Its length is explicit, so decoding never scans
//! the payload for a delimiter.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::FramingError;

// == Wire Constants ==
/// Separates the length prefix from the payload.
pub const LENGTH_DELIMITER: u8 = b':';

/// Mandatory byte after the payload.
pub const TERMINATOR: u8 = b',';

/// Longest accepted length prefix in digits.
pub const MAX_PREFIX_DIGITS: usize = 10;

/// Largest payload Postfix will send or accept on a socketmap connection.
pub const DEFAULT_MAX_FRAME_LEN: usize = 100_000;

// == Frame ==
/// One complete unit of protocol data.
///
/// A `Frame` only exists once its whole payload and terminator have been
/// read, so its length always matches the length that was declared.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    payload: Vec<u8>,
}

impl Frame {
    /// Wraps a payload.
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Returns the payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consumes the frame, returning the payload.
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Returns true for a `0:,` frame.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

// == Encode ==
/// Produces `<len>:<payload>,`.
pub fn encode(payload: &[u8]) -> Vec<u8> {
    let prefix = payload.len().to_string();
    let mut out = Vec::with_capacity(prefix.len() + payload.len() + 2);
    out.extend_from_slice(prefix.as_bytes());
    out.push(LENGTH_DELIMITER);
    out.extend_from_slice(payload);
    out.push(TERMINATOR);
    out
}

// == Read Frame ==
/// Reads one frame from `reader`.
///
/// Returns `Ok(None)` when the stream ends cleanly before the first byte of
/// a frame. EOF anywhere later is `FramingError::Truncated`.
///
/// The payload is read with `read_exact`, which keeps reading until the
/// declared byte count is satisfied regardless of how the transport splits
/// the data.
pub async fn read_frame<R>(reader: &mut R, max_len: usize) -> Result<Option<Frame>, FramingError>
where
    R: AsyncRead + Unpin,
{
    let Some(len) = read_length_prefix(reader).await? else {
        return Ok(None);
    };

    if len > max_len as u64 {
        return Err(FramingError::FrameTooLarge {
            len: usize::try_from(len).unwrap_or(usize::MAX),
            max: max_len,
        });
    }
    let len = usize::try_from(len).map_err(|_| FramingError::InvalidLength)?;

    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .await
        .map_err(FramingError::from_read)?;

    let terminator = reader.read_u8().await.map_err(FramingError::from_read)?;
    if terminator != TERMINATOR {
        return Err(FramingError::BadTerminator(terminator));
    }

    Ok(Some(Frame::new(payload)))
}

/// Reads the decimal prefix up to and including the delimiter.
async fn read_length_prefix<R>(reader: &mut R) -> Result<Option<u64>, FramingError>
where
    R: AsyncRead + Unpin,
{
    let mut len: u64 = 0;
    let mut digits = 0usize;

    loop {
        let byte = match reader.read_u8().await {
            Ok(byte) => byte,
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof && digits == 0 => {
                return Ok(None);
            }
            Err(err) => return Err(FramingError::from_read(err)),
        };

        match byte {
            b'0'..=b'9' => {
                if digits == MAX_PREFIX_DIGITS {
                    return Err(FramingError::InvalidLength);
                }
                len = len * 10 + u64::from(byte - b'0');
                digits += 1;
            }
            LENGTH_DELIMITER if digits > 0 => return Ok(Some(len)),
            _ => return Err(FramingError::InvalidLength),
        }
    }
}

// == Write Frame ==
/// Writes `payload` as one frame and flushes.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&encode(payload)).await?;
    writer.flush().await
}
