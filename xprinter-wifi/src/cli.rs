use clap::{Args, Parser, Subcommand};
use xprinter::{
    AddressField, Command, InterfaceConfig, KeyType, ValidationError, WifiConfig, parse_ipv4,
};

use crate::logging::{LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "xprinter-wifi",
    version,
    about = "Configure the network settings of an Xprinter thermal printer"
)]
pub struct Cli {
    /// Device node (e.g. /dev/usb/lp0) or printer host name / IP address
    #[arg(short, long, env = "XPRINTER_TARGET", global = true)]
    pub target: Option<String>,

    /// TCP port for network targets
    #[arg(long, value_name = "PORT", global = true)]
    pub port: Option<u16>,

    /// Device open / TCP connect timeout in milliseconds
    #[arg(long, value_name = "MS", global = true)]
    pub connect_timeout_ms: Option<u64>,

    /// Write timeout in milliseconds
    #[arg(long, value_name = "MS", global = true)]
    pub write_timeout_ms: Option<u64>,

    /// Validate and print the frame as hex instead of sending it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Log output format (stderr)
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Minimum log level (stderr), overridden by RUST_LOG
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub action: Action,
}

#[derive(Subcommand, Debug)]
pub enum Action {
    /// Set the IP address
    Ip { ip: String },
    /// Set the subnet mask
    Mask { mask: String },
    /// Set the default gateway
    Gateway { gateway: String },
    /// Set IP address, subnet mask and gateway at once
    Interface {
        ip: String,
        mask: String,
        gateway: String,
    },
    /// Set the wireless network to join
    Wifi(WifiArgs),
    /// Set addressing and wireless network in one command
    All {
        ip: String,
        mask: String,
        gateway: String,
        #[command(flatten)]
        wifi: WifiArgs,
    },
    /// Print a line of text, e.g. to check the printer responds
    Print { text: String },
    /// Check that the target can be opened
    Check,
    /// List the supported WiFi key types
    KeyTypes,
}

#[derive(Args, Debug)]
pub struct WifiArgs {
    pub ssid: String,

    #[arg(env = "XPRINTER_WIFI_PASSPHRASE", hide_env_values = true)]
    pub passphrase: String,

    /// Key type, by number (0-9) or name [default: 6, WPA2_AES_PSK]
    #[arg(short, long, value_name = "KEY_TYPE")]
    pub key_type: Option<KeyType>,
}

impl WifiArgs {
    fn to_config(&self) -> Result<WifiConfig, ValidationError> {
        WifiConfig::new(self.ssid.as_str(), self.passphrase.as_str(), self.key_type)
    }
}

impl Action {
    /// Validate the fields of a configuration action
    ///
    /// `None` for actions that don't send a configuration frame.
    pub fn to_command(&self) -> Result<Option<Command>, ValidationError> {
        let cmd = match self {
            Action::Ip { ip } => Command::SetIp(parse_ipv4(AddressField::Ip, ip)?),
            Action::Mask { mask } => {
                Command::SetSubnetMask(parse_ipv4(AddressField::SubnetMask, mask)?)
            }
            Action::Gateway { gateway } => {
                Command::SetGateway(parse_ipv4(AddressField::Gateway, gateway)?)
            }
            Action::Interface { ip, mask, gateway } => {
                Command::SetInterface(InterfaceConfig::parse(ip, mask, gateway)?)
            }
            Action::Wifi(wifi) => Command::SetWifi(wifi.to_config()?),
            Action::All {
                ip,
                mask,
                gateway,
                wifi,
            } => Command::SetAll(InterfaceConfig::parse(ip, mask, gateway)?, wifi.to_config()?),
            Action::Print { .. } | Action::Check | Action::KeyTypes => return Ok(None),
        };
        Ok(Some(cmd))
    }
}
