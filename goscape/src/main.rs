use anyhow::{Context, Result};
use clap::Parser;
use goscape_core::{resolve_command, resolve_entity, transform};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::io::{self, Read, Write};
use std::process::ExitCode;

const USAGE: &str = "goscape is simple tool to encoding and decoding web-specific values

Usage:
\tgoscape <command> <entity>

Commands:
\tencode, e - Encode specified entity
\tdecode, d - Decode specified entity

Entities:
\thtml   - Escape/unescape HTML offending characters
\turl    - Encode/decode URL string
\tbase64 - Encode/decode Base64
\tjson   - Escape/unescape JSON as string
";

/// Encode or decode web-specific values read from stdin.
///
/// Help and version flags are disabled: every token after the optional leading `--verbose`
/// is taken as a positional, hyphenated or not.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// Log diagnostics to stderr. Only recognized before the positionals.
    #[arg(long)]
    verbose: bool,

    /// <command> <entity>, e.g. `encode url` or `d base64`.
    #[arg(value_name = "ARGS", allow_hyphen_values = true, trailing_var_arg = true)]
    args: Vec<String>,
}

fn init_logging(verbose: bool) -> Result<()> {
    if verbose {
        TermLogger::init(
            LevelFilter::Debug,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )
        .context("Failed to initialize logger")?;
    }
    Ok(())
}

fn run(command: &str, entity: &str) -> Result<()> {
    let command = resolve_command(command)?;
    let entity = resolve_entity(entity)?;
    log::debug!("resolved {} {}", command, entity);

    let mut input = Vec::new();
    io::stdin()
        .read_to_end(&mut input)
        .context("Failed to read from stdin")?;

    let output = transform(command, entity, &input)?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&output)
        .context("Failed to write to stdout")?;
    stdout.flush().context("Failed to flush stdout")?;
    Ok(())
}

fn print_usage() {
    println!("{}", USAGE);
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(_) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
    };

    let result = init_logging(cli.verbose).and_then(|()| match cli.args.as_slice() {
        [command, entity] => run(command, entity),
        _ => {
            print_usage();
            Ok(())
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
