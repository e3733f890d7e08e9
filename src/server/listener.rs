//! Listener
//!
//! Accepts TCP connections and serves each one on its own task.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tracing::{info, info_span, warn, Instrument};

use crate::lookup::Dispatcher;
use crate::server::{handle_connection, ConnectionSettings, ConnectionStats};

/// Pause after a failed accept, e.g. when out of file descriptors.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Socketmap TCP server.
///
/// Binds to a local address and accepts connections from the mail agent.
/// Each connection is handled in a separate task; connections share
/// nothing but the dispatcher's cache.
pub struct Server {
    listener: TcpListener,
    dispatcher: Dispatcher,
    settings: ConnectionSettings,
    stats: Arc<ConnectionStats>,
}

impl Server {
    /// Binds the listening socket.
    ///
    /// `addr` may name the host, in which case it is resolved first.
    pub async fn bind<A: ToSocketAddrs>(
        addr: A,
        dispatcher: Dispatcher,
        settings: ConnectionSettings,
    ) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;

        Ok(Self {
            listener,
            dispatcher,
            settings,
            stats: Arc::new(ConnectionStats::new()),
        })
    }

    /// Address actually bound, useful when binding port 0.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Shared connection counters.
    pub fn stats(&self) -> Arc<ConnectionStats> {
        Arc::clone(&self.stats)
    }

    /// Accepts connections forever.
    pub async fn run(self) {
        self.run_until(std::future::pending()).await;
    }

    /// Accepts connections until `shutdown` completes.
    ///
    /// Connections already being served are left to finish on their own
    /// timeouts.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("listener stopped");
                    return;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => self.spawn_connection(stream, peer),
                    Err(err) => {
                        warn!(error = %err, "accept failed");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
            }
        }
    }

    fn spawn_connection(&self, stream: TcpStream, peer: SocketAddr) {
        let guard = self.stats.open();
        let span = info_span!("connection", id = guard.id(), %peer);
        let dispatcher = self.dispatcher.clone();
        let settings = self.settings;
        let stats = Arc::clone(&self.stats);

        tokio::spawn(
            async move {
                info!("connection opened");
                let reason = handle_connection(stream, &dispatcher, settings, &stats).await;
                if reason.is_error() {
                    warn!(%reason, "connection closed");
                } else {
                    info!(%reason, "connection closed");
                }
                drop(guard);
            }
            .instrument(span),
        );
    }
}
