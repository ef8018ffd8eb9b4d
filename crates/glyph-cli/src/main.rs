//! Glyph CLI entry point.

mod repl;
mod terminal;

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rhizome_glyph_session::{EchoEngine, PlaygroundConfig, ProcessEngine, spawn_engine};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Targets logged at info unless `RUST_LOG` says otherwise: the binary and
/// the library crates.
const DEFAULT_DIRECTIVES: [&str; 2] = ["glyph=info", "rhizome_glyph=info"];

fn env_filter(base: EnvFilter) -> Result<EnvFilter, ParseError> {
    DEFAULT_DIRECTIVES
        .iter()
        .try_fold(base, |filter, directive| Ok(filter.add_directive(directive.parse()?)))
}

#[derive(Parser)]
#[command(name = "glyph")]
#[command(about = "Glyph language playground")]
struct Cli {
    /// Config file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive playground
    Repl {
        /// Indent width, in separators
        #[arg(long)]
        indent: Option<usize>,

        /// Interpreter command line (built-in echo engine if unset)
        #[arg(short, long)]
        engine: Option<String>,

        /// Directory example files are loaded from
        #[arg(short, long)]
        library: Option<PathBuf>,
    },

    /// Expand abbreviations in text and print the result
    Expand {
        /// Text to type (reads stdin if omitted)
        text: Option<String>,
    },

    /// List the active abbreviations
    Symbols,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Diagnostics go to stderr; stdout carries the log pane.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter(EnvFilter::from_default_env())?)
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => PlaygroundConfig::load(path)?,
        None => PlaygroundConfig::default(),
    };

    match cli.command {
        Commands::Repl {
            indent,
            engine,
            library,
        } => {
            if let Some(indent) = indent {
                config.editor.indent_unit = indent;
            }
            if let Some(engine) = engine {
                config.engine.command = engine.split_whitespace().map(String::from).collect();
            }
            if let Some(library) = library {
                config.engine.library_dir = library;
            }
            config.validate()?;

            let handle = if config.engine.command.is_empty() {
                info!("Using built-in echo engine");
                spawn_engine(EchoEngine)
            } else {
                info!("Engine command: {}", config.engine.command.join(" "));
                ProcessEngine::spawn(&config.engine.command)?
            };

            repl::run(config, handle).await?;
        }

        Commands::Expand { text } => {
            let input = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };

            let keymap = config.keymap()?;
            println!("{}", repl::expand_text(&keymap, input.trim_end_matches('\n')));
        }

        Commands::Symbols => {
            repl::print_symbols(&config.keymap()?);
        }
    }

    Ok(())
}
