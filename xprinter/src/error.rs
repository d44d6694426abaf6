//! Error types for the printer library

use std::fmt;
use thiserror::Error;

/// Which address field of a network configuration failed to validate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    Ip,
    SubnetMask,
    Gateway,
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AddressField::Ip => "IP address",
            AddressField::SubnetMask => "subnet mask",
            AddressField::Gateway => "gateway",
        })
    }
}

/// Which credential field of a WiFi configuration failed to validate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    Ssid,
    Passphrase,
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CredentialField::Ssid => "SSID",
            CredentialField::Passphrase => "passphrase",
        })
    }
}

/// Field validation errors
///
/// Raised before any byte reaches a transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The input parsed, but as an IPv6 address
    #[error("Invalid {field}: {input:?} is an IPv6 address, the printer only accepts IPv4")]
    NotIpv4 { field: AddressField, input: String },

    /// The input is not dotted-decimal IPv4 at all
    #[error("Invalid {field}: {input:?} is not a dotted-decimal IPv4 address")]
    Unparseable { field: AddressField, input: String },

    /// NUL terminates string fields on the wire, so it can't appear inside one
    #[error("Invalid {field}: contains a NUL byte at offset {offset}")]
    EmbeddedNul { field: CredentialField, offset: usize },

    /// Key type outside 0-9
    #[error("Unknown key type: {0}")]
    UnknownKeyType(String),
}

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// A configuration value was rejected before anything was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Device node missing / not a device, or the TCP connection failed
    #[error("Printer unavailable ({target}): {reason}")]
    TargetUnavailable { target: String, reason: String },

    /// Write or flush failed after the connection was opened
    #[error("Write to {target} failed: {source}")]
    WriteFailure {
        target: String,
        #[source]
        source: std::io::Error,
    },
}

impl PrintError {
    pub(crate) fn unavailable(target: impl fmt::Display, reason: impl fmt::Display) -> Self {
        PrintError::TargetUnavailable {
            target: target.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write_failure(target: impl fmt::Display, source: std::io::Error) -> Self {
        PrintError::WriteFailure {
            target: target.to_string(),
            source,
        }
    }
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field() {
        let err = ValidationError::Unparseable {
            field: AddressField::Gateway,
            input: "10.0.0".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid gateway: \"10.0.0\" is not a dotted-decimal IPv4 address"
        );
    }

    #[test]
    fn test_validation_converts_to_print_error() {
        let err: PrintError = ValidationError::UnknownKeyType("42".into()).into();
        assert!(matches!(err, PrintError::Validation(_)));
        assert_eq!(err.to_string(), "Unknown key type: 42");
    }
}
