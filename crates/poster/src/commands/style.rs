//! `poster style` command implementation.

use std::path::PathBuf;

use clap::Args;
use poster_meta::{build_poster_style, extract_frontmatter};

use super::read_input;
use crate::error::CliError;
use crate::output::{Output, print_result};

/// Arguments for the style command.
#[derive(Args)]
pub(crate) struct StyleArgs {
    /// Path to the Markdown poster.
    input: PathBuf,
}

impl StyleArgs {
    /// Execute the style command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let markdown = read_input(&self.input)?;
        let extracted = extract_frontmatter(&markdown);
        Output::new().warnings(&extracted.warnings);

        print_result(&build_poster_style(extracted.frontmatter.style.as_ref()))?;
        Ok(())
    }
}
