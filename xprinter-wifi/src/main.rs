//! xprinter-wifi: configure a thermal printer's network settings
//!
//! Validates the requested settings, encodes them into a configuration
//! frame and writes it once to a device node or a raw TCP connection.

mod cli;
mod config;
mod exit;
mod logging;

use clap::Parser;
use std::process::ExitCode;
use tracing::info;
use xprinter::{KeyType, PrintError, PrintResult, Xprinter, hex_dump, probe, text_line};

use crate::cli::{Action, Cli};
use crate::config::Config;
use crate::logging::init_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { exit::USAGE } else { exit::SUCCESS };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    init_logging(cli.log_format, cli.log_level);
    let config = Config::from_cli(&cli);

    match run(&cli.action, &config).await {
        Ok(()) => ExitCode::from(exit::SUCCESS),
        Err(err) => exit::exit_with(&err),
    }
}

async fn run(action: &Action, config: &Config) -> PrintResult<()> {
    match action {
        Action::KeyTypes => {
            print_key_types();
            Ok(())
        }
        Action::Print { text } => print_line(text, config).await,
        Action::Check => check(config).await,
        _ => send_config(action, config).await,
    }
}

async fn check(config: &Config) -> PrintResult<()> {
    let target = config.target()?;
    if config.dry_run {
        println!("{} (dry run, not opened)", target);
        return Ok(());
    }

    if probe(&target, &config.transport).await {
        println!("{} is reachable", target);
        Ok(())
    } else {
        Err(PrintError::TargetUnavailable {
            target: target.to_string(),
            reason: "not reachable".into(),
        })
    }
}

async fn send_config(action: &Action, config: &Config) -> PrintResult<()> {
    // Validation happens before anything is opened
    let Some(cmd) = action.to_command()? else {
        return Ok(());
    };

    if config.dry_run {
        println!("{}", cmd.encode().to_hex());
        return Ok(());
    }

    let target = config.target()?;
    Xprinter::run_once(&target, &config.transport, &cmd).await?;
    info!(opcode = %cmd.opcode(), printer = %target, "Configuration sent");
    println!("{} sent to {}", cmd.opcode(), target);
    Ok(())
}

async fn print_line(text: &str, config: &Config) -> PrintResult<()> {
    if config.dry_run {
        println!("{}", hex_dump(&text_line(text)));
        return Ok(());
    }

    let target = config.target()?;
    let mut printer = Xprinter::open(&target, &config.transport).await?;
    let printed = printer.println(text).await;
    let closed = printer.close().await;
    printed.and(closed)
}

fn print_key_types() {
    println!("{:>4}  {:<20} {}", "TYPE", "NAME", "DESCRIPTION");
    for key_type in KeyType::ALL {
        let marker = if key_type == KeyType::default() {
            " (default)"
        } else {
            ""
        };
        println!(
            "{:>4}  {:<20} {}{}",
            key_type.as_byte(),
            key_type.name(),
            key_type.description(),
            marker
        );
    }
}
