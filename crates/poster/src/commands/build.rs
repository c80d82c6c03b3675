//! `poster build` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use poster_config::{CliSettings, Config};
use poster_meta::Frontmatter;
use poster_renderer::{Preconnect, PosterRenderer};

use super::read_input;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to the Markdown poster.
    input: PathBuf,

    /// Output HTML file (default: derived from the title, next to the input).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover poster.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Document language (overrides config).
    #[arg(long = "lang")]
    language: Option<String>,

    /// Disable syntax highlighting.
    #[arg(long)]
    no_highlight: bool,

    /// Disable math rendering.
    #[arg(long)]
    no_math: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, reading the input or writing the
    /// output fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            language: self.language.clone(),
            highlight: self.no_highlight.then_some(false),
            math: self.no_math.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }

        let markdown = read_input(&self.input)?;
        output.info(&format!("Rendering {}...", self.input.display()));

        let result = renderer_from_config(&config).render(&markdown);
        output.warnings(&result.warnings);

        let output_path = self
            .output
            .unwrap_or_else(|| default_output_path(&self.input, &result.frontmatter));
        std::fs::write(&output_path, &result.html)?;
        tracing::info!(
            path = %output_path.display(),
            bytes = result.html.len(),
            "Wrote poster"
        );

        output.success(&format!("Poster written to {}", output_path.display()));
        Ok(())
    }
}

/// Build a renderer from the loaded configuration.
fn renderer_from_config(config: &Config) -> PosterRenderer {
    let preconnect = config
        .document
        .preconnect
        .iter()
        .map(|p| {
            let hint = Preconnect::new(&p.href);
            if p.crossorigin { hint.with_crossorigin() } else { hint }
        })
        .collect();

    PosterRenderer::new()
        .with_language(&config.document.language)
        .with_stylesheets(config.document.stylesheets.clone())
        .with_preconnect(preconnect)
        .with_footnote_label(&config.render.footnote_label)
        .with_highlighting(config.render.highlight)
        .with_highlight_theme(&config.render.highlight_theme)
        .with_math(config.render.math)
}

/// `<title>.html` in the directory of the input file.
fn default_output_path(input: &Path, frontmatter: &Frontmatter) -> PathBuf {
    input.with_file_name(frontmatter.file_name("html"))
}
