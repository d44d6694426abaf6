use std::time::Duration;
use xprinter::{PrintResult, Target, TransportOptions};

use crate::cli::Cli;

/// Runtime configuration: environment first, command-line flags on top
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | XPRINTER_TARGET | (none) | Device node or printer host |
/// | XPRINTER_PORT | 9100 | TCP port |
/// | XPRINTER_CONNECT_TIMEOUT_MS | 5000 | Open / connect timeout |
/// | XPRINTER_WRITE_TIMEOUT_MS | 5000 | Write timeout |
#[derive(Debug, Clone)]
pub struct Config {
    pub target: Option<String>,
    pub transport: TransportOptions,
    pub dry_run: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self::with_base(cli, TransportOptions::from_env())
    }

    fn with_base(cli: &Cli, mut transport: TransportOptions) -> Self {
        if let Some(port) = cli.port {
            transport = transport.with_port(port);
        }
        if let Some(ms) = cli.connect_timeout_ms {
            transport = transport.with_connect_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = cli.write_timeout_ms {
            transport = transport.with_write_timeout(Duration::from_millis(ms));
        }

        Self {
            target: cli.target.clone(),
            transport,
            dry_run: cli.dry_run,
        }
    }

    /// Resolve the target; a missing target is reported as unavailable
    pub fn target(&self) -> PrintResult<Target> {
        Target::parse(self.target.as_deref().unwrap_or_default(), self.transport.port)
    }
}
