//! Error types for the socketmap responder
//!
//! Provides the error taxonomy using thiserror. Framing errors end a
//! connection, request errors are answered in-band, provider errors are
//! answered as temporary failures.

use std::io;

use thiserror::Error;

// == Framing Error ==
/// Wire-level failure while decoding a netstring frame.
///
/// Every variant is connection-fatal: a corrupted byte stream has no
/// resynchronization point.
#[derive(Error, Debug)]
pub enum FramingError {
    /// Length prefix is empty, too long, or contains a non-digit
    #[error("invalid length prefix")]
    InvalidLength,

    /// Declared length exceeds the configured maximum
    #[error("frame of {len} bytes exceeds limit of {max} bytes")]
    FrameTooLarge { len: usize, max: usize },

    /// Stream ended before the frame was complete
    #[error("stream ended inside a frame")]
    Truncated,

    /// Byte after the payload was not the terminator
    #[error("expected ',' after payload, got {0:#04x}")]
    BadTerminator(u8),

    /// Underlying transport failure
    #[error("transport error: {0}")]
    Io(#[from] io::Error),
}

impl FramingError {
    /// Maps an I/O error, turning an unexpected EOF into `Truncated`.
    pub(crate) fn from_read(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            FramingError::Truncated
        } else {
            FramingError::Io(err)
        }
    }
}

// == Request Error ==
/// A decoded payload that is not a valid `<table> <key>` request.
///
/// Request-level only; the connection stays open.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Payload did not split into exactly two tokens
    #[error("invalid request format")]
    InvalidFormat,

    /// Payload was not valid UTF-8
    #[error("invalid request encoding")]
    InvalidEncoding,
}

// == Provider Error ==
/// Failure reaching the backing directory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Backend could not be reached or refused the query
    #[error("directory unavailable: {0}")]
    Unavailable(String),

    /// Backend did not answer in time
    #[error("directory lookup timed out")]
    Timeout,
}

// == Result Type Alias ==
/// Convenience Result type for directory lookups.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;
