use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use urlfind::config::{self, Config};
use urlfind::input::InputSource;
use urlfind::report::{Format, Reporter};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("URLFIND_BUILD_GIT_HASH"),
    " ",
    env!("URLFIND_BUILD_PROFILE"),
    ")"
);

#[derive(Parser)]
#[command(
    name = "urlfind",
    about = "Extract URLs from chat logs and other free text",
    version,
    long_version = LONG_VERSION
)]
struct Cli {
    /// Input text file (use `-` for stdin)
    input: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Only print URLs matching this regex
    #[arg(long)]
    filter: Option<String>,

    /// Print each distinct URL once
    #[arg(long)]
    unique: bool,

    /// Log output file path (logs go to stderr via RUST_LOG otherwise)
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logger(cli.log.as_deref()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logger(log_path: Option<&std::path::Path>) -> Result<()> {
    match log_path {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            env_logger::Builder::from_default_env()
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        None => env_logger::init(),
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    // Load config file and merge CLI overrides
    let mut cfg = config::load_config()?;
    cfg.merge_cli(cli.format, cli.filter, cli.unique);
    let config = cfg.resolve()?;

    let source = InputSource::from_arg(cli.input)?;
    cmd_scan(&source, &config)
}

fn cmd_scan(source: &InputSource, config: &Config) -> Result<()> {
    let scan_start = Instant::now();

    let text = source.read_to_string()?;
    let name = source.display_name();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let written = Reporter::new(config)
        .report(&mut out, &name, &text)
        .context("failed to write output")?;
    out.flush().context("failed to write output")?;

    info!(
        "cmd_scan: {} URL(s) from {} ({} bytes) in {:.1}ms",
        written,
        name,
        text.len(),
        scan_start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}
