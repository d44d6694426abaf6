use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use xprinter::{
    Command, InterfaceConfig, KeyType, PrintError, Target, TransportOptions, WifiConfig,
    Xprinter, probe,
};

/// Accept one connection and return everything the client sent
async fn fake_printer() -> (u16, JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        socket.read_to_end(&mut buf).await.unwrap();
        buf
    });
    (port, handle)
}

fn options(port: u16) -> TransportOptions {
    TransportOptions::default()
        .with_port(port)
        .with_connect_timeout(Duration::from_secs(2))
        .with_write_timeout(Duration::from_secs(2))
}

#[tokio::test]
async fn test_set_ip_over_tcp() {
    let (port, server) = fake_printer().await;
    let opts = options(port);
    let target = Target::parse("127.0.0.1", opts.port).unwrap();

    let cmd = Command::SetIp("192.168.1.50".parse().unwrap());
    Xprinter::run_once(&target, &opts, &cmd).await.unwrap();

    let received = server.await.unwrap();
    assert_eq!(received, [0x1F, 0x1B, 0x1F, 0x22, 0xC0, 0xA8, 0x01, 0x32]);
}

#[tokio::test]
async fn test_set_all_over_tcp() {
    let (port, server) = fake_printer().await;
    let opts = options(port);
    let target = Target::parse("127.0.0.1", opts.port).unwrap();

    let iface = InterfaceConfig::parse("192.168.1.50", "255.255.255.0", "192.168.1.1").unwrap();
    let wifi = WifiConfig::new("Net", "pass123", Some(KeyType::WpaWpa2MixedMode)).unwrap();
    let expected = Command::SetAll(iface, wifi.clone()).encode();

    let mut printer = Xprinter::open(&target, &opts).await.unwrap();
    printer.send(&Command::SetAll(iface, wifi)).await.unwrap();
    printer.close().await.unwrap();

    let received = server.await.unwrap();
    assert_eq!(received, expected.as_bytes());
    assert_eq!(received[3], 0xB4);
    assert_eq!(received[16], 9);
}

#[tokio::test]
async fn test_several_commands_one_connection() {
    let (port, server) = fake_printer().await;
    let opts = options(port);
    let target = Target::parse("127.0.0.1", opts.port).unwrap();

    let mut printer = Xprinter::open(&target, &opts).await.unwrap();
    printer.set_subnet_mask("255.255.0.0").await.unwrap();
    assert!(printer.set_gateway("not-an-ip").await.is_err());
    printer.set_gateway("10.0.0.1").await.unwrap();
    printer.close().await.unwrap();

    let received = server.await.unwrap();
    assert_eq!(
        received,
        [
            0x1F, 0x1B, 0x1F, 0xB0, 255, 255, 0, 0, //
            0x1F, 0x1B, 0x1F, 0xB1, 10, 0, 0, 1,
        ]
    );
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let opts = options(port);
    let target = Target::parse("127.0.0.1", opts.port).unwrap();
    let err = Xprinter::open(&target, &opts).await.unwrap_err();
    assert!(matches!(err, PrintError::TargetUnavailable { .. }), "{err}");
    assert!(!probe(&target, &opts).await);
}

#[tokio::test]
#[ignore = "needs a network where 10.255.255.1 is unroutable"]
async fn test_connect_timeout_unroutable_host() {
    // Times out or fails fast, both are unavailable
    let opts = options(9100).with_connect_timeout(Duration::from_millis(200));
    let target = Target::parse("10.255.255.1", opts.port).unwrap();
    let err = Xprinter::open(&target, &opts).await.unwrap_err();
    assert!(matches!(err, PrintError::TargetUnavailable { .. }), "{err}");
}

#[tokio::test]
async fn test_probe_online() {
    let (port, server) = fake_printer().await;
    let opts = options(port);
    let target = Target::parse("127.0.0.1", opts.port).unwrap();

    assert!(probe(&target, &opts).await);
    assert!(server.await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_device() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lp0");
    let target = Target::parse(path.to_str().unwrap(), 9100).unwrap();
    assert!(target.is_device());

    let err = Xprinter::open(&target, &TransportOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PrintError::TargetUnavailable { .. }), "{err}");
    assert!(!path.exists());
}

#[tokio::test]
async fn test_regular_file_is_not_a_device() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let target = Target::parse(file.path().to_str().unwrap(), 9100).unwrap();

    let cmd = Command::SetGateway("10.0.0.1".parse().unwrap());
    let err = Xprinter::run_once(&target, &TransportOptions::default(), &cmd)
        .await
        .unwrap_err();
    assert!(matches!(err, PrintError::TargetUnavailable { .. }), "{err}");
    assert_eq!(std::fs::metadata(file.path()).unwrap().len(), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn test_write_to_char_device() {
    let target = Target::parse("/dev/null", 9100).unwrap();
    let opts = TransportOptions::default();

    assert!(probe(&target, &opts).await);

    let mut printer = Xprinter::open(&target, &opts).await.unwrap();
    printer.set_wifi("Net", "pass123", None).await.unwrap();
    printer.println("WiFi configured").await.unwrap();
    printer.close().await.unwrap();
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_write_failure_on_full_device() {
    let target = Target::parse("/dev/full", 9100).unwrap();
    let cmd = Command::SetIp("192.168.1.50".parse().unwrap());

    let err = Xprinter::run_once(&target, &TransportOptions::default(), &cmd)
        .await
        .unwrap_err();
    assert!(matches!(err, PrintError::WriteFailure { .. }), "{err}");
}
