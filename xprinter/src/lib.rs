//! # xprinter
//!
//! Network configuration for Xprinter thermal receipt printers.
//!
//! ## Scope
//!
//! This crate handles:
//! - Validating addresses, key types and WiFi credentials
//! - Encoding the printer's binary configuration frames
//! - Sending frames over a device node (USB/serial) or raw TCP (port 9100)
//!
//! The protocol is fire-and-forget: nothing is read back from the printer,
//! so every field is validated before a byte is written.
//!
//! ## Example
//!
//! ```ignore
//! use xprinter::{Command, InterfaceConfig, Target, TransportOptions, WifiConfig, Xprinter};
//!
//! let iface = InterfaceConfig::parse("192.168.1.50", "255.255.255.0", "192.168.1.1")?;
//! let wifi = WifiConfig::new("Office", "secret", None)?;
//!
//! let options = TransportOptions::default();
//! let target = Target::parse("/dev/usb/lp0", options.port)?;
//! Xprinter::run_once(&target, &options, &Command::SetAll(iface, wifi)).await?;
//! ```

mod command;
mod encoding;
mod error;
mod network;
mod printer;
mod transport;

// Re-exports
pub use command::{
    Command, Frame, Opcode, PREAMBLE, hex_dump, set_all, set_gateway, set_interface, set_ip,
    set_subnet_mask, set_wifi,
};
pub use encoding::{encode_gbk, text_line};
pub use error::{AddressField, CredentialField, PrintError, PrintResult, ValidationError};
pub use network::{Credentials, InterfaceConfig, KeyType, WifiConfig, parse_ipv4};
pub use printer::Xprinter;
pub use transport::{
    Connection, DEFAULT_PORT, DeviceSink, PrinterSink, SocketSink, Target, TransportOptions,
    probe,
};
