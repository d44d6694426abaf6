//! Network configuration values and their validation
//!
//! Everything here is checked before a frame is built: addresses must be
//! dotted-decimal IPv4, key types must be one the firmware knows, and
//! credentials must not contain the NUL byte that terminates them on the wire.

use crate::error::{AddressField, CredentialField, ValidationError};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Parse a dotted-decimal IPv4 address for the given field
///
/// The input is taken as given, so padding is an error. IPv6 literals are
/// reported separately from garbage so the caller can tell the operator what
/// went wrong.
pub fn parse_ipv4(field: AddressField, input: &str) -> Result<Ipv4Addr, ValidationError> {
    if let Ok(addr) = input.parse::<Ipv4Addr>() {
        return Ok(addr);
    }
    if input.parse::<Ipv6Addr>().is_ok() {
        return Err(ValidationError::NotIpv4 {
            field,
            input: input.to_string(),
        });
    }
    Err(ValidationError::Unparseable {
        field,
        input: input.to_string(),
    })
}

/// WiFi security mode, sent as a single byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum KeyType {
    Null = 0,
    Wep64 = 1,
    Wep128 = 2,
    WpaAesPsk = 3,
    WpaTkipPsk = 4,
    WpaTkipAesPsk = 5,
    #[default]
    Wpa2AesPsk = 6,
    Wpa2Tkip = 7,
    Wpa2TkipAesPsk = 8,
    WpaWpa2MixedMode = 9,
}

impl KeyType {
    /// All key types in wire order
    pub const ALL: [KeyType; 10] = [
        KeyType::Null,
        KeyType::Wep64,
        KeyType::Wep128,
        KeyType::WpaAesPsk,
        KeyType::WpaTkipPsk,
        KeyType::WpaTkipAesPsk,
        KeyType::Wpa2AesPsk,
        KeyType::Wpa2Tkip,
        KeyType::Wpa2TkipAesPsk,
        KeyType::WpaWpa2MixedMode,
    ];

    /// The byte written to the frame
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Firmware name, as printed in the printer's manual
    pub fn name(self) -> &'static str {
        match self {
            KeyType::Null => "NULL",
            KeyType::Wep64 => "WEP64",
            KeyType::Wep128 => "WEP128",
            KeyType::WpaAesPsk => "WPA_AES_PSK",
            KeyType::WpaTkipPsk => "WPA_TKIP_PSK",
            KeyType::WpaTkipAesPsk => "WPA_TKIP_AES_PSK",
            KeyType::Wpa2AesPsk => "WPA2_AES_PSK",
            KeyType::Wpa2Tkip => "WPA2_TKIP",
            KeyType::Wpa2TkipAesPsk => "WPA2_TKIP_AES_PSK",
            KeyType::WpaWpa2MixedMode => "WPA_WPA2_MixedMode",
        }
    }

    /// Short human description for the key type table
    pub fn description(self) -> &'static str {
        match self {
            KeyType::Null => "Open network, no encryption",
            KeyType::Wep64 => "WEP, 64-bit key",
            KeyType::Wep128 => "WEP, 128-bit key",
            KeyType::WpaAesPsk => "WPA personal, AES",
            KeyType::WpaTkipPsk => "WPA personal, TKIP",
            KeyType::WpaTkipAesPsk => "WPA personal, TKIP or AES",
            KeyType::Wpa2AesPsk => "WPA2 personal, AES",
            KeyType::Wpa2Tkip => "WPA2 personal, TKIP",
            KeyType::Wpa2TkipAesPsk => "WPA2 personal, TKIP or AES",
            KeyType::WpaWpa2MixedMode => "WPA/WPA2 mixed mode",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for KeyType {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        KeyType::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| ValidationError::UnknownKeyType(value.to_string()))
    }
}

impl FromStr for KeyType {
    type Err = ValidationError;

    /// Accepts the numeric value ("6") or the firmware name ("wpa2_aes_psk")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            let value: u8 = s
                .parse()
                .map_err(|_| ValidationError::UnknownKeyType(s.to_string()))?;
            return KeyType::try_from(value);
        }

        let wanted = s.replace('-', "_");
        KeyType::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ValidationError::UnknownKeyType(s.to_string()))
    }
}

/// SSID and passphrase of a wireless network
///
/// Raw bytes: the firmware treats both as opaque NUL-terminated strings.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    ssid: Vec<u8>,
    passphrase: Vec<u8>,
}

impl Credentials {
    pub fn new(
        ssid: impl Into<Vec<u8>>,
        passphrase: impl Into<Vec<u8>>,
    ) -> Result<Self, ValidationError> {
        let ssid = ssid.into();
        let passphrase = passphrase.into();
        reject_nul(CredentialField::Ssid, &ssid)?;
        reject_nul(CredentialField::Passphrase, &passphrase)?;
        Ok(Self { ssid, passphrase })
    }

    pub fn ssid(&self) -> &[u8] {
        &self.ssid
    }

    pub fn passphrase(&self) -> &[u8] {
        &self.passphrase
    }
}

// Keep the passphrase out of logs and panic messages
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("ssid", &String::from_utf8_lossy(&self.ssid))
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

fn reject_nul(field: CredentialField, bytes: &[u8]) -> Result<(), ValidationError> {
    match bytes.iter().position(|&b| b == 0) {
        Some(offset) => Err(ValidationError::EmbeddedNul { field, offset }),
        None => Ok(()),
    }
}

/// Static addressing for the printer's network interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceConfig {
    pub ip: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub gateway: Ipv4Addr,
}

impl InterfaceConfig {
    /// Validate all three addresses, failing on the first bad one (ip, mask, gateway)
    pub fn parse(ip: &str, mask: &str, gateway: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            ip: parse_ipv4(AddressField::Ip, ip)?,
            mask: parse_ipv4(AddressField::SubnetMask, mask)?,
            gateway: parse_ipv4(AddressField::Gateway, gateway)?,
        })
    }
}

/// Wireless network to join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiConfig {
    pub key_type: KeyType,
    pub credentials: Credentials,
}

impl WifiConfig {
    /// `key_type` defaults to [`KeyType::Wpa2AesPsk`]
    pub fn new(
        ssid: impl Into<Vec<u8>>,
        passphrase: impl Into<Vec<u8>>,
        key_type: Option<KeyType>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            key_type: key_type.unwrap_or_default(),
            credentials: Credentials::new(ssid, passphrase)?,
        })
    }
}
