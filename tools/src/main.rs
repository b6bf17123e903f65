use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bitgrain_tools::{decode_stream, encode_stream, format_decode_pretty, parse_layout};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

#[derive(Parser)]
#[command(
    name = "bitgrain-tools",
    version,
    about = "bitgrain stream inspection and encoding tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a packed stream against a field layout.
    Decode {
        /// Path to the stream bytes, or `-` for hex on the command line.
        input: PathBuf,
        /// Comma-separated field layout, e.g. `bool,u3,ls37,align1`.
        #[arg(long)]
        layout: String,
        /// Treat the input path argument as inline hex instead of a file.
        #[arg(long)]
        hex: bool,
        /// Output format.
        #[arg(long, value_enum, default_value_t = DecodeFormat::Pretty)]
        format: DecodeFormat,
    },
    /// Encode a JSON array of values into a packed stream.
    Encode {
        /// Path to a JSON file holding the value array.
        values: PathBuf,
        /// Comma-separated field layout; skip/align take no value.
        #[arg(long)]
        layout: String,
        /// Output file; hex goes to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DecodeFormat {
    Json,
    Pretty,
}

fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    anyhow::ensure!(cleaned.len() % 2 == 0, "hex input needs an even digit count");
    (0..cleaned.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&cleaned[i..i + 2], 16).context("bad hex digit"))
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Decode {
            input,
            layout,
            hex,
            format,
        } => {
            let fields = parse_layout(&layout).context("parse layout")?;
            let bytes = if hex {
                parse_hex(&input.to_string_lossy())?
            } else {
                fs::read(&input).with_context(|| format!("read stream {}", input.display()))?
            };
            let decoded = decode_stream(&bytes, &fields)?;
            match format {
                DecodeFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&decoded)?);
                }
                DecodeFormat::Pretty => {
                    print!("{}", format_decode_pretty(&decoded));
                }
            }
        }
        Command::Encode {
            values,
            layout,
            output,
        } => {
            let fields = parse_layout(&layout).context("parse layout")?;
            let text = fs::read_to_string(&values)
                .with_context(|| format!("read values {}", values.display()))?;
            let values: Vec<Value> = serde_json::from_str(&text).context("parse value array")?;
            let bytes = encode_stream(&values, &fields)?;
            match output {
                Some(path) => {
                    fs::write(&path, &bytes)
                        .with_context(|| format!("write stream {}", path.display()))?;
                }
                None => {
                    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
                    println!("{hex}");
                }
            }
        }
    }
    Ok(())
}
