//! Protocol Module
//!
//! The socketmap wire protocol: netstring framing plus the text requests
//! and responses carried inside frames.

pub mod netstring;
pub mod request;
pub mod response;

pub use netstring::{encode, read_frame, write_frame, Frame, DEFAULT_MAX_FRAME_LEN};
pub use request::Request;
pub use response::Response;
