//! `dynjson` CLI — tokenize, materialize and inspect JSON documents.
//!
//! ## Usage
//!
//! ```sh
//! # Parse JSON (stdin → stdout), re-encoded with two-space indentation
//! echo '{"name":"Alice","tags":["a","b"]}' | dynjson parse
//!
//! # Compact output, file to file
//! dynjson parse --compact -i data.json -o out.json
//!
//! # Show the flat token array
//! dynjson tokens -i data.json
//! dynjson tokens --json -i data.json
//!
//! # Validate and print document statistics
//! dynjson check -i data.json
//!
//! # Tighter nesting limit, debug logging on stderr
//! dynjson -vv --max-depth 16 check -i data.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dynjson_core::{ParseOptions, Token};
use serde_json::json;
use std::io::{self, Read};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dynjson",
    version,
    about = "JSON tokenizer and dynamic value materializer"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Maximum container nesting depth (at most 1024)
    #[arg(
        long,
        global = true,
        default_value_t = dynjson_core::options::DEFAULT_MAX_DEPTH,
        value_parser = parse_max_depth
    )]
    max_depth: usize,

    /// Spare token slots allocated on top of the counted total
    #[arg(long, global = true, default_value_t = dynjson_core::options::DEFAULT_TOKEN_MARGIN)]
    token_margin: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse JSON and print the materialized value
    Parse {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Print compact JSON instead of indented JSON
        #[arg(long)]
        compact: bool,
    },
    /// Print the token array produced by the tokenizer
    Tokens {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Emit tokens as a JSON array instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Validate a document and print token and value statistics
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = ParseOptions::default()
        .with_max_depth(cli.max_depth)
        .with_token_margin(cli.token_margin);
    debug!(?options, "parse options");

    match cli.command {
        Commands::Parse {
            input,
            output,
            compact,
        } => {
            let json = read_input(input.as_deref())?;
            let value =
                dynjson_core::parse_with(&json, &options).context("Failed to parse JSON")?;
            let mut text = if compact {
                dynjson_core::encode(&value)
            } else {
                dynjson_core::encode_pretty(&value)
            }
            .context("Failed to encode JSON")?;
            text.push('\n');
            write_output(output.as_deref(), &text)?;
        }
        Commands::Tokens {
            input,
            output,
            json,
        } => {
            let source = read_input(input.as_deref())?;
            let tokenizer = dynjson_core::Tokenizer::with_max_input_len(options.max_input_len);
            let tokens = dynjson_core::tokenizer::tokenize_with(
                &tokenizer,
                source.as_bytes(),
                options.token_margin,
            )
            .context("Failed to tokenize JSON")?;
            info!(count = tokens.len(), "tokenized input");

            let text = if json {
                render_tokens_json(&tokens, source.as_bytes())?
            } else {
                render_tokens_table(&tokens, source.as_bytes())
            };
            write_output(output.as_deref(), &text)?;
        }
        Commands::Check { input } => {
            let json = read_input(input.as_deref())?;
            let doc = dynjson_core::parse_document(&json, &options)
                .context("Failed to parse JSON")?;
            println!("Input size:   {} bytes", json.len());
            println!("Tokens:       {}", doc.token_count);
            println!("Root type:    {}", doc.value.kind_name());
            println!("Value nodes:  {}", doc.value.node_count());
            println!("Depth:        {}", doc.value.depth());
        }
    }

    Ok(())
}

fn parse_max_depth(arg: &str) -> std::result::Result<usize, String> {
    let depth: usize = arg.parse().map_err(|e| format!("{e}"))?;
    let ceiling = dynjson_core::options::MAX_DEPTH_CEILING;
    if depth > ceiling {
        return Err(format!("must be at most {ceiling}"));
    }
    Ok(depth)
}

/// Log to stderr. `RUST_LOG` wins over `-v` when set.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Scalar tokens show their source text, cut at 32 characters; containers show
/// nothing.
fn token_text(token: &Token, source: &[u8]) -> String {
    if token.kind.is_container() {
        return String::new();
    }
    let span = token.span(source);
    let text = String::from_utf8_lossy(span);
    if text.chars().count() > 32 {
        let cut: String = text.chars().take(32).collect();
        format!("{cut}...")
    } else {
        text.into_owned()
    }
}

fn render_tokens_table(tokens: &[Token], source: &[u8]) -> String {
    let mut out = format!(
        "{:>5}  {:<9}  {:>7}  {:>7}  {:>5}  text\n",
        "index", "kind", "start", "end", "size"
    );
    for (i, token) in tokens.iter().enumerate() {
        out.push_str(&format!(
            "{:>5}  {:<9}  {:>7}  {:>7}  {:>5}  {}\n",
            i,
            token.kind.to_string(),
            token.start,
            token.end,
            token.size,
            token_text(token, source)
        ));
    }
    out
}

fn render_tokens_json(tokens: &[Token], source: &[u8]) -> Result<String> {
    let rows: Vec<serde_json::Value> = tokens
        .iter()
        .map(|token| {
            let mut row = json!({
                "kind": token.kind.to_string(),
                "start": token.start,
                "end": token.end,
                "size": token.size,
            });
            if !token.kind.is_container() {
                row["text"] = json!(String::from_utf8_lossy(token.span(source)));
            }
            row
        })
        .collect();
    let mut text = serde_json::to_string_pretty(&rows)?;
    text.push('\n');
    Ok(text)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
