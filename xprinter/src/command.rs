//! Network configuration command encoder
//!
//! Every frame is `PREAMBLE || opcode || payload`. The payload has no length
//! prefix: addresses are fixed 4-byte big-endian fields and strings end at a
//! single NUL, so the encoding here has to be byte-exact.

use crate::error::{AddressField, ValidationError};
use crate::network::{InterfaceConfig, KeyType, WifiConfig, parse_ipv4};
use std::fmt;
use std::net::Ipv4Addr;

/// Unit separator, escape, unit separator
pub const PREAMBLE: [u8; 3] = [0x1F, 0x1B, 0x1F];

/// Upper-case, space-separated hex ("1F 1B 1F 22 ...")
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| hex::encode_upper([*b]))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Configuration opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    SetIp = 0x22,
    SetSubnetMask = 0xB0,
    SetGateway = 0xB1,
    SetInterface = 0xB2,
    SetWifi = 0xB3,
    SetAll = 0xB4,
}

impl Opcode {
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Whether frames with this opcode carry a passphrase
    pub fn carries_credentials(self) -> bool {
        matches!(self, Opcode::SetWifi | Opcode::SetAll)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Opcode::SetIp => "SET_IP",
            Opcode::SetSubnetMask => "SET_SUBNET_MASK",
            Opcode::SetGateway => "SET_GATEWAY",
            Opcode::SetInterface => "SET_INTERFACE",
            Opcode::SetWifi => "SET_WIFI",
            Opcode::SetAll => "SET_ALL",
        };
        f.write_str(name)
    }
}

/// An encoded command, ready to be written once
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    opcode: Opcode,
    bytes: Vec<u8>,
}

impl Frame {
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// The full frame, preamble included
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Everything after the opcode byte
    pub fn payload(&self) -> &[u8] {
        &self.bytes[PREAMBLE.len() + 1..]
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// See [`hex_dump`]
    pub fn to_hex(&self) -> String {
        hex_dump(&self.bytes)
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Frame");
        s.field("opcode", &self.opcode).field("len", &self.bytes.len());
        if !self.opcode.carries_credentials() {
            s.field("bytes", &self.to_hex());
        }
        s.finish()
    }
}

/// Fluent frame writer
///
/// Starts with the preamble and opcode; each call appends one wire field.
struct FrameBuilder {
    opcode: Opcode,
    buf: Vec<u8>,
}

impl FrameBuilder {
    fn new(opcode: Opcode) -> Self {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(&PREAMBLE);
        buf.push(opcode.as_byte());
        Self { opcode, buf }
    }

    /// 4 bytes, network order
    fn address(&mut self, addr: Ipv4Addr) -> &mut Self {
        self.buf.extend_from_slice(&addr.octets());
        self
    }

    /// IP || mask || gateway
    fn interface(&mut self, iface: &InterfaceConfig) -> &mut Self {
        self.address(iface.ip)
            .address(iface.mask)
            .address(iface.gateway)
    }

    fn key_type(&mut self, key_type: KeyType) -> &mut Self {
        self.buf.push(key_type.as_byte());
        self
    }

    /// Raw bytes followed by one NUL terminator
    fn c_string(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self.buf.push(0x00);
        self
    }

    /// key type || SSID NUL || passphrase NUL
    fn wifi(&mut self, wifi: &WifiConfig) -> &mut Self {
        self.key_type(wifi.key_type)
            .c_string(wifi.credentials.ssid())
            .c_string(wifi.credentials.passphrase())
    }

    fn build(&mut self) -> Frame {
        Frame {
            opcode: self.opcode,
            bytes: std::mem::take(&mut self.buf),
        }
    }
}

/// A validated configuration command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetIp(Ipv4Addr),
    SetSubnetMask(Ipv4Addr),
    SetGateway(Ipv4Addr),
    SetInterface(InterfaceConfig),
    SetWifi(WifiConfig),
    SetAll(InterfaceConfig, WifiConfig),
}

impl Command {
    pub fn opcode(&self) -> Opcode {
        match self {
            Command::SetIp(_) => Opcode::SetIp,
            Command::SetSubnetMask(_) => Opcode::SetSubnetMask,
            Command::SetGateway(_) => Opcode::SetGateway,
            Command::SetInterface(_) => Opcode::SetInterface,
            Command::SetWifi(_) => Opcode::SetWifi,
            Command::SetAll(..) => Opcode::SetAll,
        }
    }

    pub fn encode(&self) -> Frame {
        let mut b = FrameBuilder::new(self.opcode());
        match self {
            Command::SetIp(addr) | Command::SetSubnetMask(addr) | Command::SetGateway(addr) => {
                b.address(*addr);
            }
            Command::SetInterface(iface) => {
                b.interface(iface);
            }
            Command::SetWifi(wifi) => {
                b.wifi(wifi);
            }
            Command::SetAll(iface, wifi) => {
                b.interface(iface).wifi(wifi);
            }
        }
        b.build()
    }
}

// === String-level builders ===

/// SET_IP from a dotted-decimal string
pub fn set_ip(ip: &str) -> Result<Frame, ValidationError> {
    let addr = parse_ipv4(AddressField::Ip, ip)?;
    Ok(Command::SetIp(addr).encode())
}

/// SET_SUBNET_MASK from a dotted-decimal string
pub fn set_subnet_mask(mask: &str) -> Result<Frame, ValidationError> {
    let addr = parse_ipv4(AddressField::SubnetMask, mask)?;
    Ok(Command::SetSubnetMask(addr).encode())
}

/// SET_GATEWAY from a dotted-decimal string
pub fn set_gateway(gateway: &str) -> Result<Frame, ValidationError> {
    let addr = parse_ipv4(AddressField::Gateway, gateway)?;
    Ok(Command::SetGateway(addr).encode())
}

pub fn set_interface(ip: &str, mask: &str, gateway: &str) -> Result<Frame, ValidationError> {
    let iface = InterfaceConfig::parse(ip, mask, gateway)?;
    Ok(Command::SetInterface(iface).encode())
}

/// SET_WIFI; `key_type` defaults to WPA2_AES_PSK
pub fn set_wifi(
    ssid: impl Into<Vec<u8>>,
    passphrase: impl Into<Vec<u8>>,
    key_type: Option<KeyType>,
) -> Result<Frame, ValidationError> {
    let wifi = WifiConfig::new(ssid, passphrase, key_type)?;
    Ok(Command::SetWifi(wifi).encode())
}

/// SET_ALL: interface addressing and WiFi network in one frame
pub fn set_all(
    ip: &str,
    mask: &str,
    gateway: &str,
    ssid: impl Into<Vec<u8>>,
    passphrase: impl Into<Vec<u8>>,
    key_type: Option<KeyType>,
) -> Result<Frame, ValidationError> {
    let iface = InterfaceConfig::parse(ip, mask, gateway)?;
    let wifi = WifiConfig::new(ssid, passphrase, key_type)?;
    Ok(Command::SetAll(iface, wifi).encode())
}
