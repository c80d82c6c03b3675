//! Poster CLI - Markdown poster renderer.
//!
//! Provides commands for:
//! - `build`: Render a Markdown poster to a standalone HTML file
//! - `meta`: Print frontmatter with resolved authors as JSON
//! - `style`: Print the resolved poster stylesheet

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, MetaArgs, StyleArgs};
use output::Output;

/// Poster - Markdown poster renderer.
#[derive(Parser)]
#[command(name = "poster", version, about)]
struct Cli {
    /// Enable verbose output (per-stage logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a Markdown poster to HTML.
    Build(BuildArgs),
    /// Print frontmatter and resolved authors as JSON.
    Meta(MetaArgs),
    /// Print the resolved poster stylesheet.
    Style(StyleArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Meta(args) => args.execute(),
        Commands::Style(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_flags_parse() {
        let cli = Cli::try_parse_from([
            "poster",
            "build",
            "poster.md",
            "-o",
            "out.html",
            "--lang",
            "en",
            "--no-highlight",
            "--no-math",
            "-v",
        ]);
        let Ok(cli) = cli else {
            panic!("build flags should parse");
        };
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Build(_)));
    }
}
