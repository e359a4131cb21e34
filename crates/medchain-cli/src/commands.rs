use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use medchain_ledger::{Block, IntegrityReport, Ledger, Snapshot};
use medchain_server::{MedchainServer, ServerConfig};
use medchain_types::Transaction;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Verify(args) => cmd_verify(args, cli.format),
        Command::Replay(args) => cmd_replay(args, cli.format),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = &args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address `{bind}`"))?;
    }

    let server = MedchainServer::new(config)?;
    println!(
        "{} medchain server on {}",
        "✓".green().bold(),
        server.config().bind_addr.to_string().bold()
    );
    tokio::runtime::Runtime::new()?.block_on(server.serve())?;
    Ok(())
}

fn cmd_verify(args: VerifyArgs, format: OutputFormat) -> anyhow::Result<()> {
    let report = verify_dump(open(&args.path)?)?;
    match format {
        OutputFormat::Json => {
            let violations: Vec<String> =
                report.violations.iter().map(ToString::to_string).collect();
            let out = serde_json::json!({
                "height": report.height,
                "valid": report.is_valid(),
                "violations": violations,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => print_report(&report),
    }
    if !report.is_valid() {
        bail!(
            "chain in {} failed verification ({} violation(s))",
            args.path.display(),
            report.violations.len()
        );
    }
    Ok(())
}

fn cmd_replay(args: ReplayArgs, format: OutputFormat) -> anyhow::Result<()> {
    let snapshot = replay(open(&args.path)?)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &snapshot)?;
            writeln!(out)?;
        }
        OutputFormat::Text => render_text(&snapshot, &mut out)?,
    }
    Ok(())
}

fn open(path: &Path) -> anyhow::Result<File> {
    File::open(path).with_context(|| format!("opening {}", path.display()))
}

/// Check an exported chain (a JSON array of blocks).
pub fn verify_dump(reader: impl Read) -> anyhow::Result<IntegrityReport> {
    let blocks: Vec<Block<Transaction>> =
        serde_json::from_reader(reader).context("parsing chain dump")?;
    if blocks.is_empty() {
        bail!("chain dump is empty: expected at least a genesis block");
    }
    Ok(Snapshot::from_blocks(blocks).report())
}

/// Append every transaction (one JSON object per line) to a fresh ledger.
pub fn replay(reader: impl Read) -> anyhow::Result<Snapshot<Transaction>> {
    let ledger = Ledger::new(Transaction::genesis())?;
    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let tx: Transaction = serde_json::from_str(&line)
            .with_context(|| format!("line {}: invalid transaction", index + 1))?;
        ledger
            .append(tx)
            .with_context(|| format!("line {}: append rejected", index + 1))?;
    }
    let snapshot = ledger.snapshot()?;
    tracing::debug!(blocks = snapshot.len(), "replay complete");
    Ok(snapshot)
}

/// Human-readable chain dump: previous hash, data and hash per block.
pub fn render_text(snapshot: &Snapshot<Transaction>, out: &mut impl Write) -> anyhow::Result<()> {
    for block in snapshot.iter() {
        writeln!(out, "{} {}", "Position:".bold(), block.position())?;
        writeln!(
            out,
            "{} {}",
            "Prev. hash:".bold(),
            block.previous_hash().to_hex().dimmed()
        )?;
        let data = serde_json::to_string_pretty(block.payload())?;
        writeln!(out, "{} {}", "Data:".bold(), data)?;
        writeln!(out, "{} {}", "Hash:".bold(), block.hash().to_hex().yellow())?;
        writeln!(out)?;
    }
    Ok(())
}

fn print_report(report: &IntegrityReport) {
    let mark = |ok: bool| if ok { "valid".green() } else { "INVALID".red().bold() };
    if report.is_valid() {
        println!("{} Chain integrity verified", "✓".green().bold());
    } else {
        println!("{} Chain integrity check failed", "✗".red().bold());
    }
    println!("  Blocks: {}", report.height.to_string().bold());
    println!("  Hash chain: {}", mark(report.hash_chain_valid()));
    println!("  Positions: {}", mark(report.positions_contiguous()));
    println!("  Block hashes: {}", mark(report.hashes_consistent()));
    for violation in &report.violations {
        println!("    {} {}", "-".red(), violation);
    }
}
