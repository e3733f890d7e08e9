//! Socketmap request parsing
//!
//! A request payload is `<table> <key>`: exactly two whitespace-separated
//! tokens.

use crate::error::RequestError;

/// A parsed lookup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Requested table name
    pub table: String,
    /// Lookup key
    pub key: String,
}

impl Request {
    /// Parses request text.
    pub fn parse(raw: &str) -> Result<Self, RequestError> {
        let mut tokens = raw.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(table), Some(key), None) => Ok(Self {
                table: table.to_string(),
                key: key.to_string(),
            }),
            _ => Err(RequestError::InvalidFormat),
        }
    }

    /// Parses a raw frame payload, rejecting non UTF-8 input.
    pub fn from_payload(payload: &[u8]) -> Result<Self, RequestError> {
        let raw = std::str::from_utf8(payload).map_err(|_| RequestError::InvalidEncoding)?;
        Self::parse(raw)
    }
}
