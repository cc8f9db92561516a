// BPRINT main entry point
// Prints each fixed-size record of a binary file through a printf-style template

use anyhow::Context;
use bprint_rs::{Options, VERSION};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

/// bprint - print binary records with printf-style formats
#[derive(Debug, Parser)]
#[command(name = "bprint", about, long_about = None, disable_version_flag = true)]
struct Cli {
    /// Binary file to read; standard input when omitted.
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Binary format specifier. c,s,l,q for signed 8,16,32,64-bit int. Upper case for unsigned int.
    #[arg(short = 'e', value_name = "LAYOUT", default_value = bprint_rs::DEFAULT_LAYOUT)]
    layout: String,

    /// printf style format string; "%d,4#" repeats "%d" 4 times joined by ",". Defaults to %02x per field.
    #[arg(short = 'p', value_name = "FORMAT")]
    format: Option<String>,

    /// Print record count.
    #[arg(short = 'c')]
    count: bool,

    /// Print record offset.
    #[arg(short = 'o')]
    offset: bool,

    /// Print version information.
    #[arg(long)]
    version: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            layout: self.layout.clone(),
            template: self.format.clone(),
            show_index: self.count,
            show_offset: self.offset,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("bprint version {}", VERSION);
        return Ok(());
    }

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))?;

    let format_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .init();

    // Validate layout and format before touching the input
    let plan = cli.options().prepare()?;
    let input = open_input(cli.path.as_deref())?;

    let stdout = io::stdout();
    let summary = plan.run(input, BufWriter::new(stdout.lock()))?;

    if let Some(notice) = summary.termination.notice() {
        eprintln!("{}", notice);
    }

    Ok(())
}

fn open_input(path: Option<&Path>) -> anyhow::Result<Box<dyn Read>> {
    match path {
        None => Ok(Box::new(io::stdin().lock())),
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("While opening file {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}
