//! Connection Handler
//!
//! Drives one socketmap session: read a frame, dispatch it, write the
//! answer, repeat until the peer leaves, a timeout fires or the byte stream
//! is corrupt.

use std::fmt;
use std::io;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::time::timeout;
use tracing::debug;

use crate::error::FramingError;
use crate::lookup::Dispatcher;
use crate::protocol::{read_frame, write_frame, DEFAULT_MAX_FRAME_LEN};
use crate::server::ConnectionStats;

/// Per-connection limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// How long to wait for the next complete frame
    pub read_timeout: Duration,
    /// How long a response write may take
    pub write_timeout: Duration,
    /// Largest accepted request payload
    pub max_frame_len: usize,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(30),
            write_timeout: Duration::from_secs(5),
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }
}

/// Why a connection ended.
#[derive(Debug)]
pub enum CloseReason {
    /// Peer closed the stream between frames
    PeerClosed,
    /// No complete frame arrived within the read timeout
    IdleTimeout,
    /// The peer sent a malformed frame
    Framing(FramingError),
    /// The response could not be written within the write timeout
    WriteTimeout,
    /// Writing the response failed
    WriteFailed(io::Error),
}

impl CloseReason {
    /// Returns true when the session ended abnormally.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            CloseReason::Framing(_) | CloseReason::WriteTimeout | CloseReason::WriteFailed(_)
        )
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseReason::PeerClosed => f.write_str("closed by peer"),
            CloseReason::IdleTimeout => f.write_str("idle timeout"),
            CloseReason::Framing(err) => write!(f, "framing error: {err}"),
            CloseReason::WriteTimeout => f.write_str("write timeout"),
            CloseReason::WriteFailed(err) => write!(f, "write failed: {err}"),
        }
    }
}

/// Serves socketmap requests on `stream` until the session ends.
///
/// Each iteration waits for a frame under the read timeout, answers it via
/// the dispatcher and writes the answer under the write timeout. An empty
/// frame is skipped without a reply. Any framing error ends the session,
/// since a corrupt stream has no point to resynchronize on.
pub async fn handle_connection<S>(
    stream: S,
    dispatcher: &Dispatcher,
    settings: ConnectionSettings,
    stats: &ConnectionStats,
) -> CloseReason
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut stream = BufReader::new(stream);

    loop {
        let frame = match timeout(
            settings.read_timeout,
            read_frame(&mut stream, settings.max_frame_len),
        )
        .await
        {
            Err(_) => return CloseReason::IdleTimeout,
            Ok(Ok(None)) => return CloseReason::PeerClosed,
            Ok(Err(err)) => return CloseReason::Framing(err),
            Ok(Ok(Some(frame))) => frame,
        };

        if frame.is_empty() {
            debug!("empty frame, skipping");
            continue;
        }

        let response = dispatcher.dispatch_payload(frame.payload()).await;
        stats.record_request();
        debug!(
            request = %String::from_utf8_lossy(frame.payload()),
            status = response.status(),
            "answered"
        );

        let wire = response.to_wire();
        match timeout(settings.write_timeout, write_frame(&mut stream, wire.as_bytes())).await {
            Err(_) => return CloseReason::WriteTimeout,
            Ok(Err(err)) => return CloseReason::WriteFailed(err),
            Ok(Ok(())) => {}
        }
    }
}
