use std::path::PathBuf;

use anyhow::Context;
use clap::Parser as _;

use argweave::logging::init_tracing;
use argweave::{Parser, ParserConfig};

/// Parse command-line tokens against a TOML element definition.
#[derive(clap::Parser, Debug)]
#[command(name = "argweave", version, about, long_about = None)]
struct Cli {
    /// Element definition file (default: ~/.config/argweave/definition.toml)
    #[arg(long, short = 'd')]
    definition: Option<PathBuf>,

    /// Fail on option-like tokens that no element claims
    #[arg(long)]
    strict: bool,

    /// Log level used when ARGWEAVE_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Tokens to parse, after `--`
    #[arg(last = true)]
    tokens: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.definition {
        Some(path) => ParserConfig::load_from(path),
        None => ParserConfig::load(),
    }
    .context("Failed to load element definitions")?;

    let parser = config.into_parser(Parser::new().strict(cli.strict))?;
    let matches = parser.parse(cli.tokens)?;

    println!("{}", serde_json::to_string_pretty(&matches.to_json())?);
    Ok(())
}
