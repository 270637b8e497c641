//! Enigma command-line tool.
//!
//! # Usage
//!
//! ```bash
//! # Generate a 2048-bit key pair into ./public and ./private
//! enigma gen-keys
//!
//! # Encrypt and decrypt a short file
//! enigma encrypt note.txt note.enc --publ public
//! enigma decrypt note.enc note.txt --priv private
//! ```

mod commands;
mod error;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use enigma::rand_core::OsRng;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    commands::{DecryptArgs, EncryptArgs, GenKeysArgs, ShowKeysArgs},
    error::CliError,
};

/// Enigma - simple tool for cryptography using RSA algorithm.
#[derive(Parser, Debug)]
#[command(name = "enigma")]
#[command(version)]
struct Args {
    /// Log level, overridden by RUST_LOG
    #[arg(
        long,
        global = true,
        default_value = "warn",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate public and private keys.
    GenKeys(GenKeysArgs),
    /// Print public and private keys.
    ShowKeys(ShowKeysArgs),
    /// Encrypt file.
    Encrypt(EncryptArgs),
    /// Decrypt file.
    Decrypt(DecryptArgs),
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::GenKeys(args) => commands::gen_keys(&args, &mut OsRng),
        Command::ShowKeys(args) => commands::show_keys(&args, &mut std::io::stdout().lock()),
        Command::Encrypt(args) => commands::encrypt(
            &args,
            &mut OsRng,
            &mut std::io::stdin().lock(),
            &mut std::io::stdout().lock(),
        ),
        Command::Decrypt(args) => commands::decrypt(
            &args,
            &mut OsRng,
            &mut std::io::stdin().lock(),
            &mut std::io::stdout().lock(),
        ),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
