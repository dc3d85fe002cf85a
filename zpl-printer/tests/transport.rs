use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::time::Instant;
use zpl_printer::{Completion, NetworkPrinter, PrintError, Printer};

const JOB: &[u8] = b"^XA\r\n^FO10,10^AZN,25,25^FDtest^FS\r\n^XZ";

async fn mock_peer() -> (TcpListener, NetworkPrinter) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let printer = NetworkPrinter::from_addr(&addr.to_string()).unwrap();
    (listener, printer)
}

#[tokio::test]
async fn test_silent_peer_resolves_after_grace() {
    let (listener, printer) = mock_peer().await;
    let printer = printer
        .with_grace(Duration::from_millis(300))
        .with_timeout(Duration::from_millis(2000));

    // Accept, read everything, never answer, never close
    let peer = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; JOB.len()];
        socket.read_exact(&mut buf).await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        buf
    });

    let started = Instant::now();
    let completion = printer.print(JOB).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(completion, Completion::GraceElapsed);
    assert!(elapsed >= Duration::from_millis(300), "resolved early: {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(2300), "resolved late: {:?}", elapsed);

    peer.abort();
}

#[tokio::test]
async fn test_hard_timeout_shorter_than_grace() {
    let (listener, printer) = mock_peer().await;
    let printer = printer
        .with_grace(Duration::from_millis(2000))
        .with_timeout(Duration::from_millis(300));

    let peer = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let started = Instant::now();
    let completion = printer.print(JOB).await.unwrap();

    assert_eq!(completion, Completion::HardTimeout);
    assert!(started.elapsed() < Duration::from_millis(1500));

    peer.abort();
}

#[tokio::test]
async fn test_reply_completes_immediately() {
    let (listener, printer) = mock_peer().await;
    let printer = printer.with_grace(Duration::from_secs(3));

    let peer = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; JOB.len()];
        socket.read_exact(&mut buf).await.unwrap();
        socket.write_all(b"\x02OK\x03").await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let started = Instant::now();
    let completion = printer.print(JOB).await.unwrap();

    assert_eq!(completion, Completion::Reply);
    assert!(started.elapsed() < Duration::from_secs(2));

    peer.abort();
}

#[tokio::test]
async fn test_peer_close_completes() {
    let (listener, printer) = mock_peer().await;
    let printer = printer.with_grace(Duration::from_secs(3));

    let peer = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; JOB.len()];
        socket.read_exact(&mut buf).await.unwrap();
        drop(socket);
        buf
    });

    let completion = printer.print(JOB).await.unwrap();
    assert_eq!(completion, Completion::RemoteClosed);

    // The peer got the whole job
    assert_eq!(peer.await.unwrap(), JOB);
}

#[tokio::test]
async fn test_refused_connection_fails_fast() {
    // Grab a free port, then close the listener so nothing is there
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let printer = NetworkPrinter::from_addr(&addr.to_string())
        .unwrap()
        .with_timeout(Duration::from_secs(5));

    let started = Instant::now();
    let result = printer.print(JOB).await;

    assert!(matches!(result, Err(PrintError::Connection(_))), "{:?}", result);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_is_online() {
    let (listener, printer) = mock_peer().await;
    assert!(printer.is_online().await);

    let addr = listener.local_addr().unwrap();
    drop(listener);
    let offline = NetworkPrinter::from_addr(&addr.to_string())
        .unwrap()
        .with_timeout(Duration::from_millis(500));
    assert!(!offline.is_online().await);
}
