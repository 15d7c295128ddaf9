use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// Use the library instead of declaring modules
use codepdf::converter::{self, ConvertOptions, DEFAULT_TAB_WIDTH};
use codepdf::highlight::{DEFAULT_STYLE, Highlighter};
use codepdf::stylesheet::DEFAULT_STYLESHEET_PATH;
use codepdf::wrap::{DEFAULT_WRAP_WIDTH, WrapWidth};
use codepdf::{Error, Result};

#[derive(Parser)]
#[command(name = "codepdf")]
#[command(version = concat!("v. ", env!("CARGO_PKG_VERSION")))]
#[command(about = "Convert a source code file into a PDF with syntax highlighting")]
#[command(disable_version_flag = true)]
struct Cli {
    #[arg(help = "Source file to convert", required_unless_present = "list_styles")]
    input: Option<PathBuf>,
    #[arg(help = "Output PDF file (default: <input name>.pdf in the current directory)")]
    output: Option<PathBuf>,
    #[arg(short = 'v', long = "version", action = ArgAction::Version, help = "Print version")]
    version: Option<bool>,
    #[arg(long, help = "Maximum characters per printed line", default_value_t = DEFAULT_WRAP_WIDTH)]
    width: usize,
    #[arg(long, help = "Highlighting style", default_value = DEFAULT_STYLE)]
    style: String,
    #[arg(long, help = "Style sheet with page layout and fonts", default_value = DEFAULT_STYLESHEET_PATH)]
    stylesheet: PathBuf,
    #[arg(long, help = "Spaces per tab stop (0 keeps tabs)", default_value_t = DEFAULT_TAB_WIDTH)]
    tab_width: usize,
    #[arg(long, help = "List the available highlighting styles and exit")]
    list_styles: bool,
    #[arg(long, action = ArgAction::Count, help = "More log output (repeat for trace)")]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_tracing(cli.verbose) {
        eprintln!("Error initialising logging: {e:#}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let highlighter = Highlighter::new();

    if cli.list_styles {
        for name in highlighter.style_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let input = cli
        .input
        .ok_or_else(|| Error::config("input file is required"))?;
    let mut options = ConvertOptions::new(input)
        .with_wrap_width(WrapWidth::new(cli.width)?)
        .with_style(&cli.style)
        .with_stylesheet(cli.stylesheet)
        .with_tab_width(cli.tab_width);
    if let Some(output) = cli.output {
        options = options.with_output(output);
    }

    converter::convert_with(&highlighter, &options)?;
    Ok(())
}

/// Logging goes to stderr; `RUST_LOG` overrides the verbosity flag.
fn setup_tracing(verbosity: u8) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbosity {
        0 => EnvFilter::new("codepdf=info"),
        1 => EnvFilter::new("codepdf=debug"),
        _ => EnvFilter::new("codepdf=trace"),
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .try_init()?;

    Ok(())
}
