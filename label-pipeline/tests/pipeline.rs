use std::sync::Arc;
use std::time::Duration;

use label_pipeline::{
    Completion, InspectionRecord, LabelError, LabelPrinter, PrintConfig, PrintOptions,
    PrintOutcome, PrinterTarget,
};
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::Instant;

const C_BASIC: &str = r#"{
    "variant": "c_basic",
    "fields": [
        {"key": "serial_number", "value": "CB-2025-0815"},
        {"key": "description", "value": "Rotoclear C Basic Steuergerät"},
        {"key": "article_number", "value": 10100},
        {"key": "electronics_serial", "value": "EL-4711"},
        {"key": "software_version", "value": "2.4.0"},
        {"key": "packaging_date", "value": "2025-08-15"}
    ]
}"#;

const ACCESSORY: &str = r#"{
    "variant": "accessory",
    "fields": [
        {"key": "delivery_note", "value": "LS-2025-0042"}
    ],
    "entries": [
        {"quantity": 2, "description": "Anschlusskabel 5 m", "part_number": "10310"},
        {"quantity": 1, "description": "C-Extender", "part_number": "10370",
         "serial_number": "EX-77"}
    ]
}"#;

fn record(json: &str) -> InspectionRecord {
    serde_json::from_str(json).unwrap()
}

/// Read one job, up to and including the end-of-format command
async fn read_job(socket: &mut TcpStream) -> Vec<u8> {
    let mut job = Vec::new();
    let mut buf = [0u8; 4096];
    while !job.ends_with(b"^XZ") {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        job.extend_from_slice(&buf[..n]);
    }
    job
}

async fn mock_printer() -> (TcpListener, PrinterTarget) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, PrinterTarget::new("127.0.0.1", port))
}

fn executor(target: PrinterTarget, serialize: bool) -> LabelPrinter {
    let mut config = PrintConfig::for_target(target);
    config.grace_ms = 2000;
    config.timeout_ms = 3000;
    config.serialize_targets = serialize;
    LabelPrinter::new(config)
}

#[tokio::test]
async fn test_c_basic_end_to_end() {
    let (listener, target) = mock_printer().await;

    let peer = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let job = read_job(&mut socket).await;
        drop(socket);
        String::from_utf8(job).unwrap()
    });

    let printer = executor(target.clone(), true);
    let outcome = printer
        .print(&record(C_BASIC), &PrintOptions::default())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        PrintOutcome::Sent {
            target,
            completion: Completion::RemoteClosed
        }
    );
    assert!(outcome.is_confirmed());

    let zpl = peer.await.unwrap();
    let lines: Vec<&str> = zpl.split("\r\n").collect();
    assert_eq!(
        &lines[..9],
        &[
            "^XA",
            "^CI28",
            "^PON",
            "^FWN",
            "^LH0,0",
            "^PW1181",
            "^LL1772",
            "^LS0",
            "^CWZ,E:TT0003M_.TTF"
        ]
    );
    assert_eq!(lines[9], "^FT72,108^AZN,50,50^FDRotoclear C Basic^FS");
    assert!(lines[10].starts_with("^FO1061,58^GFA,234,234,6,"));
    assert!(zpl.contains("^FT72,251^AZN,25,25^FDCarl-Benz-Strasse 10-12^FS"));
    assert!(zpl.contains("^FO757,180^GFA,15400,15400,44,"));
    assert!(zpl.contains(
        "^FT72,805^AZN,25,25^FDArtikelbezeichnung: Rotoclear C Basic Steuergert^FS"
    ));
    assert!(zpl.contains("^FT72,903^AZN,25,25^FDVerpackungsdatum: 2025-08-15^FS"));
    assert_eq!(*lines.last().unwrap(), "^XZ");
}

#[tokio::test]
async fn test_accessory_table_on_the_wire() {
    let (listener, target) = mock_printer().await;

    let peer = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let job = read_job(&mut socket).await;
        drop(socket);
        String::from_utf8(job).unwrap()
    });

    let printer = executor(target, true);
    printer
        .print(&record(ACCESSORY), &PrintOptions::default())
        .await
        .unwrap();

    let zpl = peer.await.unwrap();
    assert!(zpl.contains("^FO180,610^AZN,25,25^FB641,1,0,C,0^FDArtikel^FS"));
    assert!(zpl.contains("^FO833,610^AZN,25,25^FB336,1,0,L,0^FDArtikelnummer^FS"));
    assert!(zpl.contains("^FO72,646^GB1037,2,2^FS"));
    assert!(zpl.contains("^FO72,682^AZN,25,25^FB72,1,0,L,0^FD2x^FS"));
    assert!(zpl.contains("^FO833,720^AZN,25,25^FB336,1,0,L,0^FD10370^FS"));
}

#[tokio::test]
async fn test_silent_printer_is_success_after_grace() {
    let (listener, target) = mock_printer().await;

    let peer = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_job(&mut socket).await;
        // Keep the socket open and say nothing
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let mut config = PrintConfig::for_target(target);
    config.grace_ms = 300;
    config.timeout_ms = 2000;
    let printer = LabelPrinter::new(config);

    let started = Instant::now();
    let outcome = printer
        .print(&record(C_BASIC), &PrintOptions::default())
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        PrintOutcome::Sent {
            completion: Completion::GraceElapsed,
            ..
        }
    ));
    assert!(!outcome.is_confirmed());
    assert!(started.elapsed() >= Duration::from_millis(300));
    assert!(started.elapsed() < Duration::from_millis(2300));

    peer.abort();
}

#[tokio::test]
async fn test_unreachable_printer_is_transport_error() {
    let (listener, target) = mock_printer().await;
    drop(listener);

    let printer = executor(target, true);
    let started = Instant::now();
    let result = printer
        .print(&record(C_BASIC), &PrintOptions::default())
        .await;

    let err = result.unwrap_err();
    assert!(err.is_transport(), "{:?}", err);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_invalid_record_never_connects() {
    let (listener, target) = mock_printer().await;

    let mut broken = record(C_BASIC);
    broken.fields.clear();

    let printer = executor(target, true);
    let result = printer.print(&broken, &PrintOptions::default()).await;
    assert!(matches!(result, Err(LabelError::Validation(_))));

    // No connection was attempted
    let accepted = tokio::time::timeout(Duration::from_millis(100), listener.accept()).await;
    assert!(accepted.is_err());
}

#[tokio::test]
async fn test_dry_run_sends_nothing() {
    let (listener, target) = mock_printer().await;

    let printer = executor(target.clone(), true);
    let options = PrintOptions {
        target: Some(target),
        skip_print: true,
    };
    let outcome = printer.print(&record(ACCESSORY), &options).await.unwrap();
    assert_eq!(outcome, PrintOutcome::Skipped);

    let accepted = tokio::time::timeout(Duration::from_millis(100), listener.accept()).await;
    assert!(accepted.is_err());
}

/// Mock printer that takes every job, holds the connection for `hold`,
/// then closes. Reports the instant each job was fully received.
fn slow_printer(listener: TcpListener, hold: Duration) -> mpsc::UnboundedReceiver<Instant> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        loop {
            let (mut socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => break,
            };
            let tx = tx.clone();
            tokio::spawn(async move {
                read_job(&mut socket).await;
                let _ = tx.send(Instant::now());
                tokio::time::sleep(hold).await;
            });
        }
    });
    rx
}

async fn two_concurrent_jobs(serialize: bool) -> Duration {
    let (listener, target) = mock_printer().await;
    let mut received = slow_printer(listener, Duration::from_millis(400));

    let printer = Arc::new(executor(target, serialize));
    let jobs: Vec<_> = (0..2)
        .map(|_| {
            let printer = Arc::clone(&printer);
            tokio::spawn(async move {
                printer
                    .print(&record(C_BASIC), &PrintOptions::default())
                    .await
                    .unwrap()
            })
        })
        .collect();

    for job in jobs {
        let outcome = job.await.unwrap();
        assert!(matches!(
            outcome,
            PrintOutcome::Sent {
                completion: Completion::RemoteClosed,
                ..
            }
        ));
    }

    let first = received.recv().await.unwrap();
    let second = received.recv().await.unwrap();
    second.duration_since(first)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_jobs_to_one_printer_take_turns() {
    let gap = two_concurrent_jobs(true).await;
    assert!(gap >= Duration::from_millis(300), "jobs overlapped: {:?}", gap);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_jobs_overlap_without_serialization() {
    let gap = two_concurrent_jobs(false).await;
    assert!(gap < Duration::from_millis(300), "jobs were serialized: {:?}", gap);
}
