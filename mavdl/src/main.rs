//! `mavdl` command-line front end.

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use mavdl_codegen::{CompileOptions, Target, compile};
use mavdl_schema::{FsLoader, MergedModel, ValidationOptions, decode_payload, load_dialect_with};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mavdl")]
#[command(about = "MAVLink XML dialect compiler", version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate source code for a dialect.
    Generate(GenerateArgs),
    /// Load and validate a dialect, then print a summary.
    Check(CheckArgs),
    /// Decode a hex payload against a message of a dialect.
    Decode(DecodeArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Root dialect file.
    dialect: PathBuf,
    /// Output directory.
    #[arg(short, long)]
    out: PathBuf,
    /// Target language (rust, protobuf).
    #[arg(short, long, default_value = "rust")]
    target: String,
    /// Module name; defaults to the dialect file name.
    #[arg(long)]
    module: Option<String>,
    /// Omit doc comments.
    #[arg(long)]
    no_docs: bool,
    /// Reject messages with an id above this value.
    #[arg(long = "max-message-id")]
    max_message_id: Option<u32>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Root dialect file.
    dialect: PathBuf,
    /// Reject messages with an id above this value.
    #[arg(long = "max-message-id")]
    max_message_id: Option<u32>,
}

#[derive(Debug, Args)]
struct DecodeArgs {
    /// Root dialect file.
    dialect: PathBuf,
    /// Message name or numeric id.
    message: String,
    /// Payload bytes as hex.
    payload: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Generate(args) => generate(args),
        Command::Check(args) => check(args),
        Command::Decode(args) => decode(args),
    }
}

fn generate(args: GenerateArgs) -> Result<()> {
    let target: Target = args.target.parse()?;
    let mut options = CompileOptions::new().target(target).docs(!args.no_docs);
    if let Some(module) = args.module {
        options = options.module_name(module);
    }
    if let Some(max) = args.max_message_id {
        options = options.max_message_id(max);
    }

    let written = compile(&args.dialect, &args.out, &options)
        .with_context(|| format!("failed to compile {}", args.dialect.display()))?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

fn check(args: CheckArgs) -> Result<()> {
    let mut options = ValidationOptions::new();
    if let Some(max) = args.max_message_id {
        options = options.with_max_message_id(max);
    }
    let model = load(&args.dialect, &options)?;

    println!(
        "dialect {}: {} enums, {} messages",
        model.dialect,
        model.enums.len(),
        model.messages.len()
    );
    for msg in &model.messages {
        println!(
            "  {:>6}  {:<32} len {:>3}  crc {:>3}",
            msg.id, msg.name, msg.encoded_len, msg.crc_extra
        );
    }
    Ok(())
}

fn decode(args: DecodeArgs) -> Result<()> {
    let model = load(&args.dialect, &ValidationOptions::new())?;
    let msg = model
        .get_message(&args.message)
        .or_else(|| {
            args.message
                .parse()
                .ok()
                .and_then(|id| model.message_by_id(id))
        })
        .ok_or_else(|| anyhow!("unknown message '{}'", args.message))?;

    let payload = hex::decode(args.payload.trim()).context("payload is not valid hex")?;
    let fields = decode_payload(msg, &payload)
        .with_context(|| format!("cannot decode payload as {}", msg.name))?;

    println!("{} (id {})", msg.name, msg.id);
    for (name, value) in fields {
        println!("  {name} = {value}");
    }
    Ok(())
}

fn load(path: &Path, options: &ValidationOptions) -> Result<MergedModel> {
    load_dialect_with(path, &FsLoader, options)
        .with_context(|| format!("failed to load {}", path.display()))
}
