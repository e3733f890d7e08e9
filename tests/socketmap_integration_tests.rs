//! Integration Tests for the Socketmap Listener
//!
//! Drives a real TCP listener with netstring frames.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use socketmap::cache::LookupCache;
use socketmap::protocol::{encode, read_frame};
use socketmap::server::{ConnectionSettings, ConnectionStats};
use socketmap::{Dispatcher, Server, StaticDirectory};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

// == Helper Functions ==

struct TestServer {
    addr: SocketAddr,
    cache: Arc<LookupCache>,
    stats: Arc<ConnectionStats>,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

async fn start_server(directory: StaticDirectory, settings: ConnectionSettings) -> TestServer {
    let cache = Arc::new(LookupCache::new());
    let dispatcher = Dispatcher::new(cache.clone(), Arc::new(directory));
    let server = Server::bind("127.0.0.1:0", dispatcher, settings)
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    let stats = server.stats();
    let (shutdown, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(server.run_until(async {
        let _ = rx.await;
    }));

    TestServer {
        addr,
        cache,
        stats,
        shutdown,
        handle,
    }
}

async fn start_demo_server() -> TestServer {
    start_server(StaticDirectory::demo(), ConnectionSettings::default()).await
}

async fn query(stream: &mut TcpStream, request: &str) -> String {
    stream.write_all(&encode(request.as_bytes())).await.unwrap();
    let frame = read_frame(stream, 100_000).await.unwrap().unwrap();
    String::from_utf8(frame.into_payload()).unwrap()
}

/// Reads until the server closes the connection, returning what arrived.
///
/// A reset counts as closed: the server may drop unread bytes.
async fn read_to_close(stream: &mut TcpStream) -> Vec<u8> {
    let mut rest = Vec::new();
    let result = tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut rest))
        .await
        .expect("server should close the connection");
    if let Err(err) = result {
        assert_eq!(err.kind(), std::io::ErrorKind::ConnectionReset);
    }
    rest
}

// == End-to-End Tests ==

#[tokio::test]
async fn test_user_exists_exact_wire_bytes() {
    let directory = StaticDirectory::new().with_user("admin@example.com");
    let server = start_server(directory, ConnectionSettings::default()).await;
    let mut stream = TcpStream::connect(server.addr).await.unwrap();

    stream
        .write_all(b"29:user-exists admin@example.com,")
        .await
        .unwrap();

    let expected = b"20:OK admin@example.com,";
    let mut buf = vec![0u8; expected.len()];
    stream.read_exact(&mut buf).await.unwrap();
    assert_eq!(buf, expected);
}

#[tokio::test]
async fn test_all_tables_on_one_connection() {
    let server = start_demo_server().await;
    let mut stream = TcpStream::connect(server.addr).await.unwrap();

    assert_eq!(
        query(&mut stream, "user-exists test@example.com").await,
        "OK test@example.com"
    );
    assert_eq!(query(&mut stream, "virtual-domains example.com").await, "OK");
    assert_eq!(
        query(&mut stream, "virtual-aliases postmaster@example.com").await,
        "OK admin@example.com"
    );
    assert_eq!(query(&mut stream, "virtual-domains other.org").await, "NOTFOUND");
    assert_eq!(query(&mut stream, "unknown-table anything").await, "NOTFOUND");
    assert_eq!(
        query(&mut stream, "onlyonetoken").await,
        "PERM invalid request format"
    );
    assert_eq!(
        query(&mut stream, "user-exists user@example.com").await,
        "OK user@example.com"
    );

    assert_eq!(server.stats.snapshot().requests, 7);
}

#[tokio::test]
async fn test_empty_frame_gets_no_reply() {
    let server = start_demo_server().await;
    let mut stream = TcpStream::connect(server.addr).await.unwrap();

    stream.write_all(b"0:,").await.unwrap();
    assert_eq!(
        query(&mut stream, "virtual-domains test.com").await,
        "OK"
    );
}

#[tokio::test]
async fn test_cache_is_shared_across_connections() {
    let server = start_demo_server().await;

    let mut first = TcpStream::connect(server.addr).await.unwrap();
    query(&mut first, "virtual-aliases info@example.com").await;
    drop(first);

    let mut second = TcpStream::connect(server.addr).await.unwrap();
    assert_eq!(
        query(&mut second, "virtual-aliases info@example.com").await,
        "OK admin@example.com"
    );

    let stats = server.cache.stats();
    assert_eq!(stats.inserts, 1);
    assert_eq!(stats.hits, 1);
}

// == Error Handling Tests ==

#[tokio::test]
async fn test_malformed_frame_closes_connection() {
    let server = start_demo_server().await;
    let mut stream = TcpStream::connect(server.addr).await.unwrap();

    stream.write_all(b"xyz:user-exists a,").await.unwrap();

    assert!(read_to_close(&mut stream).await.is_empty());
}

#[tokio::test]
async fn test_wrong_terminator_closes_connection() {
    let server = start_demo_server().await;
    let mut stream = TcpStream::connect(server.addr).await.unwrap();

    stream
        .write_all(b"28:user-exists test@example.com!")
        .await
        .unwrap();

    assert!(read_to_close(&mut stream).await.is_empty());
}

#[tokio::test]
async fn test_oversized_frame_closes_connection() {
    let settings = ConnectionSettings {
        max_frame_len: 64,
        ..ConnectionSettings::default()
    };
    let server = start_server(StaticDirectory::demo(), settings).await;
    let mut stream = TcpStream::connect(server.addr).await.unwrap();

    stream.write_all(b"65:").await.unwrap();

    assert!(read_to_close(&mut stream).await.is_empty());
}

#[tokio::test]
async fn test_idle_connection_is_closed() {
    let settings = ConnectionSettings {
        read_timeout: Duration::from_millis(200),
        ..ConnectionSettings::default()
    };
    let server = start_server(StaticDirectory::demo(), settings).await;
    let mut stream = TcpStream::connect(server.addr).await.unwrap();

    assert_eq!(
        query(&mut stream, "user-exists test@example.com").await,
        "OK test@example.com"
    );
    assert!(read_to_close(&mut stream).await.is_empty());
}

// == Concurrency Tests ==

#[tokio::test]
async fn test_stalled_client_does_not_block_others() {
    let server = start_demo_server().await;

    let mut stalled = TcpStream::connect(server.addr).await.unwrap();
    stalled.write_all(b"28:user-exists te").await.unwrap();

    let mut active = TcpStream::connect(server.addr).await.unwrap();
    let answer = tokio::time::timeout(
        Duration::from_secs(2),
        query(&mut active, "user-exists test@example.com"),
    )
    .await
    .expect("active client should be answered while another stalls");
    assert_eq!(answer, "OK test@example.com");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_clients() {
    let server = start_demo_server().await;
    let addr = server.addr;

    let clients: Vec<_> = (0..20)
        .map(|i| {
            tokio::spawn(async move {
                let mut stream = TcpStream::connect(addr).await.unwrap();
                for round in 0..10 {
                    let user = format!("user{}@example.com", (i + round) % 5);
                    let answer = query(&mut stream, &format!("user-exists {user}")).await;
                    assert_eq!(answer, format!("OK {user}"));
                }
            })
        })
        .collect();

    for client in clients {
        client.await.unwrap();
    }

    let snapshot = server.stats.snapshot();
    assert_eq!(snapshot.accepted, 20);
    assert_eq!(snapshot.requests, 200);
    assert_eq!(server.cache.len(), 5);
}

// == Lifecycle Tests ==

#[tokio::test]
async fn test_shutdown_stops_listener() {
    let server = start_demo_server().await;

    server.shutdown.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(2), server.handle)
        .await
        .expect("listener should stop after shutdown")
        .unwrap();

    assert!(TcpStream::connect(server.addr).await.is_err());
}
