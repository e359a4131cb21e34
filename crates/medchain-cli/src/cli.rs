use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "medchain",
    about = "Tamper-evident ledger for medical-record wallets",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server over a fresh in-memory ledger
    Serve(ServeArgs),
    /// Verify an exported chain dump
    Verify(VerifyArgs),
    /// Append JSON-lines transactions to a fresh ledger and print the chain
    Replay(ReplayArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides the config file)
    #[arg(long)]
    pub bind: Option<String>,
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// JSON array of blocks, as served by `GET /`
    pub path: PathBuf,
}

#[derive(Args)]
pub struct ReplayArgs {
    /// One transaction object per line
    pub path: PathBuf,
}
