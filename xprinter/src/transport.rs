//! Printer transports
//!
//! Supports:
//! - Device nodes (USB/serial printers, e.g. `/dev/usb/lp0`)
//! - Network printers (raw TCP, port 9100)
//!
//! The channel is picked once from the shape of the target string: an
//! absolute path is a device, anything else is a host to dial.

use crate::error::{PrintError, PrintResult};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, instrument, warn};

/// Raw printing port
pub const DEFAULT_PORT: u16 = 9100;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Where frames are sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Character device node
    Device(PathBuf),
    /// Host name or IPv4 address, dialed over TCP
    Network { host: String, port: u16 },
}

impl Target {
    /// Resolve a target string
    ///
    /// Absolute paths select a device; everything else is dialed on `port`.
    pub fn parse(target: &str, port: u16) -> PrintResult<Self> {
        let target = target.trim();
        if target.is_empty() {
            return Err(PrintError::unavailable("<empty>", "no printer target given"));
        }

        let path = Path::new(target);
        if path.is_absolute() {
            Ok(Target::Device(path.to_path_buf()))
        } else {
            Ok(Target::Network {
                host: target.to_string(),
                port,
            })
        }
    }

    pub fn is_device(&self) -> bool {
        matches!(self, Target::Device(_))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Device(path) => write!(f, "{}", path.display()),
            Target::Network { host, port } => write!(f, "{}:{}", host, port),
        }
    }
}

/// Transport settings
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | XPRINTER_PORT | 9100 | TCP port for network targets |
/// | XPRINTER_CONNECT_TIMEOUT_MS | 5000 | Device open / TCP connect timeout |
/// | XPRINTER_WRITE_TIMEOUT_MS | 5000 | Write + flush timeout |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    pub port: u16,
    pub connect_timeout: Duration,
    pub write_timeout: Duration,
}

impl TransportOptions {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("XPRINTER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            connect_timeout: std::env::var("XPRINTER_CONNECT_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            write_timeout: std::env::var("XPRINTER_WRITE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_WRITE_TIMEOUT),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

/// Trait for byte sinks that reach a printer
#[allow(async_fn_in_trait)]
pub trait PrinterSink {
    /// Write all bytes and flush; nothing may stay buffered on return
    async fn write(&mut self, data: &[u8]) -> PrintResult<()>;

    /// Release the underlying handle
    ///
    /// Consumes the sink, so a connection can't be closed twice.
    async fn close(self) -> PrintResult<()>;
}

async fn write_flush<W>(writer: &mut W, data: &[u8], timeout: Duration) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let op = async {
        writer.write_all(data).await?;
        writer.flush().await
    };
    tokio::time::timeout(timeout, op)
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "write timed out"))?
}

/// Await a pending TCP connect for at most `timeout`
async fn connect_within<F>(peer: &str, timeout: Duration, connecting: F) -> PrintResult<TcpStream>
where
    F: Future<Output = io::Result<TcpStream>>,
{
    tokio::time::timeout(timeout, connecting)
        .await
        .map_err(|_| PrintError::unavailable(peer, "connection timeout"))?
        .map_err(|e| PrintError::unavailable(peer, e))
}

#[cfg(unix)]
fn is_device_node(file_type: &std::fs::FileType) -> bool {
    use std::os::unix::fs::FileTypeExt;
    file_type.is_char_device() || file_type.is_block_device()
}

#[cfg(not(unix))]
fn is_device_node(file_type: &std::fs::FileType) -> bool {
    !file_type.is_dir()
}

/// Printer attached as a device node
#[derive(Debug)]
pub struct DeviceSink {
    path: PathBuf,
    file: File,
    write_timeout: Duration,
}

impl DeviceSink {
    /// Open an existing device node for writing
    ///
    /// Never creates or truncates: missing paths and regular files are rejected.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn open(path: &Path, options: &TransportOptions) -> PrintResult<Self> {
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|e| PrintError::unavailable(path.display(), e))?;

        if !is_device_node(&meta.file_type()) {
            return Err(PrintError::unavailable(path.display(), "not a device node"));
        }

        let file = tokio::time::timeout(
            options.connect_timeout,
            OpenOptions::new().write(true).open(path),
        )
        .await
        .map_err(|_| PrintError::unavailable(path.display(), "open timed out"))?
        .map_err(|e| PrintError::unavailable(path.display(), e))?;

        info!("Device opened");

        Ok(Self {
            path: path.to_path_buf(),
            file,
            write_timeout: options.write_timeout,
        })
    }
}

impl PrinterSink for DeviceSink {
    #[instrument(skip(self, data), fields(path = %self.path.display(), data_len = data.len()))]
    async fn write(&mut self, data: &[u8]) -> PrintResult<()> {
        write_flush(&mut self.file, data, self.write_timeout)
            .await
            .map_err(|e| PrintError::write_failure(self.path.display(), e))?;
        debug!("Device write flushed");
        Ok(())
    }

    async fn close(mut self) -> PrintResult<()> {
        self.file
            .flush()
            .await
            .map_err(|e| PrintError::write_failure(self.path.display(), e))?;
        debug!(path = %self.path.display(), "Device closed");
        Ok(())
    }
}

/// Network printer (raw TCP)
#[derive(Debug)]
pub struct SocketSink {
    peer: String,
    stream: TcpStream,
    write_timeout: Duration,
}

impl SocketSink {
    /// Connect to `host:port`, bounded by the connect timeout
    #[instrument(skip_all, fields(addr = %format!("{}:{}", host, port)))]
    pub async fn connect(host: &str, port: u16, options: &TransportOptions) -> PrintResult<Self> {
        let peer = format!("{}:{}", host, port);
        info!("Connecting to printer");

        let stream =
            connect_within(&peer, options.connect_timeout, TcpStream::connect((host, port))).await?;

        if let Err(e) = stream.set_nodelay(true) {
            warn!(error = %e, "Failed to disable Nagle");
        }

        info!("Connected");

        Ok(Self {
            peer,
            stream,
            write_timeout: options.write_timeout,
        })
    }
}

impl PrinterSink for SocketSink {
    #[instrument(skip(self, data), fields(addr = %self.peer, data_len = data.len()))]
    async fn write(&mut self, data: &[u8]) -> PrintResult<()> {
        write_flush(&mut self.stream, data, self.write_timeout)
            .await
            .map_err(|e| PrintError::write_failure(&self.peer, e))?;
        debug!("Socket write flushed");
        Ok(())
    }

    async fn close(mut self) -> PrintResult<()> {
        self.stream
            .shutdown()
            .await
            .map_err(|e| PrintError::write_failure(&self.peer, e))?;
        debug!(addr = %self.peer, "Socket closed");
        Ok(())
    }
}

/// An open connection to a printer, either kind
#[derive(Debug)]
pub enum Connection {
    Device(DeviceSink),
    Socket(SocketSink),
}

impl Connection {
    /// Open the channel the target selects
    pub async fn open(target: &Target, options: &TransportOptions) -> PrintResult<Self> {
        match target {
            Target::Device(path) => Ok(Connection::Device(DeviceSink::open(path, options).await?)),
            Target::Network { host, port } => Ok(Connection::Socket(
                SocketSink::connect(host, *port, options).await?,
            )),
        }
    }
}

impl PrinterSink for Connection {
    async fn write(&mut self, data: &[u8]) -> PrintResult<()> {
        match self {
            Connection::Device(sink) => sink.write(data).await,
            Connection::Socket(sink) => sink.write(data).await,
        }
    }

    async fn close(self) -> PrintResult<()> {
        match self {
            Connection::Device(sink) => sink.close().await,
            Connection::Socket(sink) => sink.close().await,
        }
    }
}

/// Check whether the target can be opened; writes nothing
#[instrument(skip_all, fields(printer = %target))]
pub async fn probe(target: &Target, options: &TransportOptions) -> bool {
    match Connection::open(target, options).await {
        Ok(conn) => {
            if let Err(e) = conn.close().await {
                warn!(error = %e, "Printer reachable, close failed");
            }
            info!("Printer online");
            true
        }
        Err(e) => {
            warn!(error = %e, "Printer offline");
            false
        }
    }
}
