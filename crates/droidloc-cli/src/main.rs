//! droidloc CLI
//!
//! Converts Android UI locators between selector mappings, `UiSelector`
//! builder strings and path expressions.
//!
//! Usage:
//!   droidloc convert '{"text": "OK"}' --to path
//!   droidloc convert '//*[@text="OK"]' --to builder
//!   droidloc validate 'new UiSelector().text("OK");'
//!   droidloc tokens 'new UiSelector().text("OK");'
//!
//! Pass `-` as the locator to read it from stdin.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use droidloc::builder::tokenize;
use droidloc::{Locator, LocatorConfig, LocatorConverter, Notation};
use std::io::Read;
use std::path::PathBuf;
use std::process;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "droidloc")]
#[command(version)]
#[command(about = "Convert Android UI locators between notations")]
#[command(
    long_about = "Converts Android UI locators between selector mappings (JSON), UiSelector builder strings and path expressions."
)]
struct Cli {
    /// JSON file with converter options
    #[clap(long, short = 'c', global = true, env = "DROIDLOC_CONFIG")]
    config: Option<PathBuf>,

    /// Log conversion steps to stderr
    #[clap(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "lower")]
enum InputNotation {
    Auto,
    Mapping,
    Builder,
    Path,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "lower")]
enum OutputNotation {
    Mapping,
    Builder,
    Path,
}

impl From<OutputNotation> for Notation {
    fn from(value: OutputNotation) -> Self {
        match value {
            OutputNotation::Mapping => Notation::Mapping,
            OutputNotation::Builder => Notation::Builder,
            OutputNotation::Path => Notation::Path,
        }
    }
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Locator to convert, or '-' for stdin
    input: String,

    /// Target notation
    #[clap(long, short = 't', value_enum)]
    to: OutputNotation,

    /// Notation of the input (auto-detected by default)
    #[clap(long, short = 'f', value_enum, default_value = "auto")]
    from: InputNotation,

    /// Pretty-print mapping output
    #[clap(long)]
    pretty: bool,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Locator to check, or '-' for stdin
    input: String,

    /// Notation of the input (auto-detected by default)
    #[clap(long, short = 'f', value_enum, default_value = "auto")]
    from: InputNotation,
}

#[derive(Parser, Debug)]
struct TokensArgs {
    /// Builder string to tokenize, or '-' for stdin
    input: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a locator into another notation
    Convert(ConvertArgs),
    /// Check that a locator is well formed
    Validate(ValidateArgs),
    /// Print the tokens of a builder string
    Tokens(TokensArgs),
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {e:#}", "Error:".red().bold());
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let default = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "loading converter options");
            LocatorConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => LocatorConfig::default(),
    };
    let converter = LocatorConverter::new(config);

    match cli.command {
        Commands::Convert(args) => convert(&converter, args),
        Commands::Validate(args) => validate(&converter, args),
        Commands::Tokens(args) => tokens(args),
    }
}

fn convert(converter: &LocatorConverter, args: ConvertArgs) -> Result<()> {
    let input = read_input(&args.input)?;
    let locator = read_locator(&input, args.from)?;
    debug!(from = %locator.notation(), to = ?args.to, "converting locator");

    match converter.convert(&locator, args.to.into())? {
        Locator::Mapping(selector) if args.pretty => {
            println!("{}", serde_json::to_string_pretty(&selector)?);
        }
        output => println!("{output}"),
    }
    Ok(())
}

fn validate(converter: &LocatorConverter, args: ValidateArgs) -> Result<()> {
    let input = read_input(&args.input)?;
    let locator = read_locator(&input, args.from)?;
    let selector = converter.to_mapping(&locator)?;
    println!(
        "{} {} locator, {} level(s)",
        "valid".green().bold(),
        locator.notation(),
        selector.depth()
    );
    Ok(())
}

fn tokens(args: TokensArgs) -> Result<()> {
    let input = read_input(&args.input)?;
    for token in tokenize(&input)? {
        println!(
            "{:>4}  {:<15}  {}",
            token.position,
            token.kind.to_string().cyan(),
            token.value
        );
    }
    Ok(())
}

fn read_locator(input: &str, from: InputNotation) -> Result<Locator> {
    let locator = match from {
        InputNotation::Auto => Locator::detect(input)?,
        InputNotation::Mapping => Locator::with_notation(input, Notation::Mapping)?,
        InputNotation::Builder => Locator::with_notation(input, Notation::Builder)?,
        InputNotation::Path => Locator::with_notation(input, Notation::Path)?,
    };
    Ok(locator)
}

fn read_input(input: &str) -> Result<String> {
    if input != "-" {
        return Ok(input.to_string());
    }
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read locator from stdin")?;
    Ok(buffer.trim().to_string())
}
