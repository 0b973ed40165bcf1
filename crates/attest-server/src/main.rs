//! `attest`: key generation, the attestation server, and offline sign/verify.
//!
//! Exit codes: `0` success (or authentic), `1` not authentic, `2` error.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use attest_server::commands::{self, EXIT_ERROR};
use attest_server::{ServeOverrides, Verdict};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Sign data with an RSA key and verify signed data.
#[derive(Parser, Debug)]
#[command(name = "attest", version)]
#[command(about = "Serve signed data and verify its authenticity")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a key pair and write it to the key directory.
    Keygen(KeygenArgs),
    /// Run the HTTP server.
    Serve(ServeArgs),
    /// Sign a payload with the local private key and print `{ data, signature }`.
    Sign(SignArgs),
    /// Verify a `{ data, signature }` document against a public key.
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
struct KeygenArgs {
    /// Directory for the PEM key files
    #[arg(long, env = "ATTEST_KEY_DIR", default_value = "keys")]
    key_dir: PathBuf,

    /// RSA modulus size in bits
    #[arg(long, default_value_t = attest_core::config::DEFAULT_KEY_SIZE_BITS)]
    bits: usize,

    /// Replace existing key files
    #[arg(long)]
    force: bool,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// JSON configuration file; flags override its values
    #[arg(long, env = "ATTEST_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the PEM key files
    #[arg(long, env = "ATTEST_KEY_DIR")]
    key_dir: Option<PathBuf>,

    /// Listen address
    #[arg(long, env = "ATTEST_BIND")]
    bind: Option<SocketAddr>,

    /// Serve `{"message": <MESSAGE>}`
    #[arg(long, conflicts_with = "data_file")]
    message: Option<String>,

    /// Serve the JSON object in this file
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Disable permissive CORS
    #[arg(long)]
    no_cors: bool,
}

impl From<ServeArgs> for ServeOverrides {
    fn from(args: ServeArgs) -> Self {
        Self {
            config: args.config,
            key_dir: args.key_dir,
            bind: args.bind,
            message: args.message,
            data_file: args.data_file,
            no_cors: args.no_cors,
        }
    }
}

#[derive(Args, Debug)]
struct SignArgs {
    /// Directory holding the PEM key files
    #[arg(long, env = "ATTEST_KEY_DIR", default_value = "keys")]
    key_dir: PathBuf,

    /// Payload as JSON text
    #[arg(long, conflicts_with = "data_file", required_unless_present = "data_file")]
    data: Option<String>,

    /// Payload as a JSON file
    #[arg(long)]
    data_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// File containing `{ "data": ..., "signature": ... }`
    #[arg(long)]
    signed_file: PathBuf,

    /// PEM public key file
    #[arg(long)]
    public_key: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(verdict) => ExitCode::from(verdict.exit_code()),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Command) -> Result<Verdict> {
    match command {
        Command::Keygen(args) => {
            let keys = commands::keygen(&args.key_dir, args.bits, args.force)
                .context("key generation failed")?;
            println!("{}", keys.fingerprint());
        }
        Command::Serve(args) => {
            let config = ServeOverrides::from(args).resolve()?;
            attest_server::serve(config, shutdown_signal())
                .await
                .context("server failed")?;
        }
        Command::Sign(args) => {
            let payload =
                commands::payload_from_args(args.data.as_deref(), args.data_file.as_deref())?;
            let line = commands::sign_to_json(&args.key_dir, payload)
                .context("could not sign payload")?;
            println!("{}", line);
        }
        Command::Verify(args) => {
            return Ok(commands::verify_signed_file(&args.signed_file, &args.public_key)?);
        }
    }
    Ok(Verdict::Authentic)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
