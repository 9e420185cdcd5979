use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cidpack_tools::{
    decode_state_json, encode_state_json, format_decode_pretty, inspect_state, parse_schema_json,
    InspectReport,
};
use clap::{Parser, Subcommand, ValueEnum};
use codec::CodecLimits;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cidpack-tools",
    version,
    about = "cidpack inspection, decoding and encoding tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split encoded state into field blocks.
    Inspect {
        /// Encoded state, or a full custom id with --custom-id.
        encoded: String,
        /// Optional schema JSON for field names.
        #[arg(long)]
        schema: Option<PathBuf>,
        /// Read the input as `<prefix>.<state>`.
        #[arg(long)]
        custom_id: bool,
    },
    /// Decode state into structured JSON.
    Decode {
        /// Encoded state, or a full custom id with --custom-id.
        encoded: String,
        /// Schema JSON describing the state.
        #[arg(long)]
        schema: PathBuf,
        /// Read the input as `<prefix>.<state>`.
        #[arg(long)]
        custom_id: bool,
        /// Output format.
        #[arg(long, value_enum, default_value_t = DecodeFormat::Json)]
        format: DecodeFormat,
    },
    /// Encode a JSON object of field values.
    Encode {
        /// Schema JSON describing the state.
        #[arg(long)]
        schema: PathBuf,
        /// JSON object mapping field names to values, applied in order.
        #[arg(long)]
        values: PathBuf,
        /// Frame the result as a custom id with this prefix.
        #[arg(long)]
        prefix: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DecodeFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let limits = CodecLimits::default();
    match cli.command {
        Command::Inspect {
            encoded,
            schema,
            custom_id,
        } => {
            let schema = schema
                .as_deref()
                .map(load_schema)
                .transpose()
                .context("load schema")?;
            let report = inspect_state(&encoded, custom_id, schema.as_ref(), &limits)?;
            print_inspect_report(&report);
        }
        Command::Decode {
            encoded,
            schema,
            custom_id,
            format,
        } => {
            let schema = load_schema(&schema).context("load schema")?;
            let output = decode_state_json(&encoded, custom_id, &schema, &limits)?;
            match format {
                DecodeFormat::Json => {
                    let json = serde_json::to_string_pretty(&output).context("serialize json")?;
                    println!("{json}");
                }
                DecodeFormat::Pretty => {
                    print!("{}", format_decode_pretty(&output));
                }
            }
        }
        Command::Encode {
            schema,
            values,
            prefix,
        } => {
            let schema = load_schema(&schema).context("load schema")?;
            let contents = fs::read_to_string(&values)
                .with_context(|| format!("read values {}", values.display()))?;
            let values: serde_json::Map<String, serde_json::Value> =
                serde_json::from_str(&contents).context("parse values json")?;
            let encoded = encode_state_json(&schema, &values, prefix.as_deref(), &limits)?;
            println!("{encoded}");
        }
    }
    Ok(())
}

fn load_schema(path: &Path) -> Result<schema::Schema> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read schema {}", path.display()))?;
    parse_schema_json(&contents)
}

fn print_inspect_report(report: &InspectReport) {
    if let Some(prefix) = &report.prefix {
        println!("prefix: {prefix}");
    }
    if let Some(fingerprint) = &report.schema_fingerprint {
        println!("schema: {fingerprint}");
    }
    println!(
        "state: {} chars, {} blocks",
        report.state_chars,
        report.blocks.len()
    );
    for block in &report.blocks {
        let field = block.field.as_deref().unwrap_or("?");
        println!(
            "  @{} id {:?} ({field}): {} bytes, tokens {:?}",
            block.offset, block.id, block.byte_len, block.tokens
        );
        match &block.value {
            Some(Ok(value)) => println!("    = {value}"),
            Some(Err(err)) => println!("    ! {err}"),
            None => {}
        }
    }
}
