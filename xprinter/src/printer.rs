//! Command writer
//!
//! `Xprinter` owns one sink and writes one frame per call. Convenience
//! setters validate their string inputs first, so a bad field never reaches
//! the wire.

use crate::command::{self, Command, Frame};
use crate::encoding::text_line;
use crate::error::PrintResult;
use crate::network::KeyType;
use crate::transport::{Connection, PrinterSink, Target, TransportOptions};
use tracing::{debug, info, instrument, warn};

/// A printer reachable through a single open sink
#[derive(Debug)]
pub struct Xprinter<S = Connection> {
    sink: S,
}

impl Xprinter<Connection> {
    /// Open a device node or TCP connection, depending on the target
    pub async fn open(target: &Target, options: &TransportOptions) -> PrintResult<Self> {
        let sink = Connection::open(target, options).await?;
        Ok(Self { sink })
    }

    /// Open, send one command, close
    ///
    /// The connection is closed even if the write fails; the write error wins.
    #[instrument(skip_all, fields(printer = %target, opcode = %cmd.opcode()))]
    pub async fn run_once(
        target: &Target,
        options: &TransportOptions,
        cmd: &Command,
    ) -> PrintResult<()> {
        let mut printer = Self::open(target, options).await?;
        let frame = cmd.encode();
        let sent = printer.write_frame(&frame).await;
        let closed = printer.close().await;
        match (sent, closed) {
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                warn!(error = %close_err, "Close failed after write error");
                Err(e)
            }
            (Ok(()), closed) => closed,
        }
    }
}

impl<S: PrinterSink> Xprinter<S> {
    /// Wrap an already-open sink
    pub fn with_sink(sink: S) -> Self {
        Self { sink }
    }

    /// Write one encoded frame and flush
    pub async fn write_frame(&mut self, frame: &Frame) -> PrintResult<()> {
        if frame.opcode().carries_credentials() {
            debug!(opcode = %frame.opcode(), len = frame.len(), "Sending frame");
        } else {
            debug!(opcode = %frame.opcode(), bytes = %frame.to_hex(), "Sending frame");
        }
        self.sink.write(frame.as_bytes()).await?;
        info!(opcode = %frame.opcode(), len = frame.len(), "Command sent");
        Ok(())
    }

    pub async fn send(&mut self, cmd: &Command) -> PrintResult<()> {
        self.write_frame(&cmd.encode()).await
    }

    pub async fn set_ip(&mut self, ip: &str) -> PrintResult<()> {
        let frame = command::set_ip(ip)?;
        self.write_frame(&frame).await
    }

    pub async fn set_subnet_mask(&mut self, mask: &str) -> PrintResult<()> {
        let frame = command::set_subnet_mask(mask)?;
        self.write_frame(&frame).await
    }

    pub async fn set_gateway(&mut self, gateway: &str) -> PrintResult<()> {
        let frame = command::set_gateway(gateway)?;
        self.write_frame(&frame).await
    }

    pub async fn set_interface(&mut self, ip: &str, mask: &str, gateway: &str) -> PrintResult<()> {
        let frame = command::set_interface(ip, mask, gateway)?;
        self.write_frame(&frame).await
    }

    pub async fn set_wifi(
        &mut self,
        ssid: &str,
        passphrase: &str,
        key_type: Option<KeyType>,
    ) -> PrintResult<()> {
        let frame = command::set_wifi(ssid, passphrase, key_type)?;
        self.write_frame(&frame).await
    }

    pub async fn set_all(
        &mut self,
        ip: &str,
        mask: &str,
        gateway: &str,
        ssid: &str,
        passphrase: &str,
        key_type: Option<KeyType>,
    ) -> PrintResult<()> {
        let frame = command::set_all(ip, mask, gateway, ssid, passphrase, key_type)?;
        self.write_frame(&frame).await
    }

    /// Print a line of text followed by CR LF
    pub async fn println(&mut self, text: &str) -> PrintResult<()> {
        let data = text_line(text);
        self.sink.write(&data).await?;
        info!(len = data.len(), "Text line sent");
        Ok(())
    }

    /// Release the sink
    pub async fn close(self) -> PrintResult<()> {
        self.sink.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PrintError, ValidationError};

    #[derive(Default)]
    struct VecSink {
        writes: Vec<Vec<u8>>,
    }

    impl PrinterSink for &mut VecSink {
        async fn write(&mut self, data: &[u8]) -> PrintResult<()> {
            self.writes.push(data.to_vec());
            Ok(())
        }

        async fn close(self) -> PrintResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_set_ip_writes_one_frame() {
        let mut sink = VecSink::default();
        let mut printer = Xprinter::with_sink(&mut sink);
        printer.set_ip("192.168.1.50").await.unwrap();
        printer.close().await.unwrap();

        assert_eq!(
            sink.writes,
            vec![vec![0x1F, 0x1B, 0x1F, 0x22, 0xC0, 0xA8, 0x01, 0x32]]
        );
    }

    #[tokio::test]
    async fn test_invalid_field_writes_nothing() {
        let mut sink = VecSink::default();
        let mut printer = Xprinter::with_sink(&mut sink);

        let err = printer.set_gateway("fe80::1").await.unwrap_err();
        assert!(matches!(
            err,
            PrintError::Validation(ValidationError::NotIpv4 { .. })
        ));
        let err = printer
            .set_wifi("Net", "bad\0key", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PrintError::Validation(ValidationError::EmbeddedNul { .. })
        ));
        printer.close().await.unwrap();

        assert!(sink.writes.is_empty());
    }

    #[tokio::test]
    async fn test_println() {
        let mut sink = VecSink::default();
        let mut printer = Xprinter::with_sink(&mut sink);
        printer.println("Network OK").await.unwrap();
        printer.close().await.unwrap();

        assert_eq!(sink.writes, vec![b"Network OK\r\n".to_vec()]);
    }

    #[tokio::test]
    async fn test_run_once_unavailable_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = Target::Device(dir.path().join("lp0"));
        let cmd = Command::SetIp("192.168.1.50".parse().unwrap());

        let err = Xprinter::run_once(&target, &TransportOptions::default(), &cmd)
            .await
            .unwrap_err();
        assert!(matches!(err, PrintError::TargetUnavailable { .. }), "{err}");
    }
}
