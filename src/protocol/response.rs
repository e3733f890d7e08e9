//! Socketmap response variants and their wire text.

use std::fmt;

/// Answer to one lookup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Key exists. An empty value renders as a bare `OK`.
    Found(String),
    /// Key is absent, or the table is unknown
    NotFound,
    /// Request can never succeed as sent
    PermanentFailure(String),
    /// Directory could not answer; the caller should retry later
    TemporaryFailure(String),
}

impl Response {
    /// Renders the response payload text.
    pub fn to_wire(&self) -> String {
        self.to_string()
    }

    /// Short status word for logs.
    pub fn status(&self) -> &'static str {
        match self {
            Response::Found(_) => "OK",
            Response::NotFound => "NOTFOUND",
            Response::PermanentFailure(_) => "PERM",
            Response::TemporaryFailure(_) => "TEMP",
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Found(value) if value.is_empty() => f.write_str("OK"),
            Response::Found(value) => write!(f, "OK {value}"),
            Response::NotFound => f.write_str("NOTFOUND"),
            Response::PermanentFailure(message) => write!(f, "PERM {message}"),
            Response::TemporaryFailure(message) => write!(f, "TEMP {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_text() {
        assert_eq!(
            Response::Found("admin@example.com".to_string()).to_wire(),
            "OK admin@example.com"
        );
        assert_eq!(Response::Found(String::new()).to_wire(), "OK");
        assert_eq!(Response::NotFound.to_wire(), "NOTFOUND");
        assert_eq!(
            Response::PermanentFailure("invalid request format".to_string()).to_wire(),
            "PERM invalid request format"
        );
        assert_eq!(
            Response::TemporaryFailure("directory unavailable".to_string()).to_wire(),
            "TEMP directory unavailable"
        );
    }

    #[test]
    fn test_status() {
        assert_eq!(Response::NotFound.status(), "NOTFOUND");
        assert_eq!(Response::Found(String::new()).status(), "OK");
    }
}
