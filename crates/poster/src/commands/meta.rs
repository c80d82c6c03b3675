//! `poster meta` command implementation.

use std::path::PathBuf;

use clap::Args;
use poster_meta::{Frontmatter, ResolvedAuthors, extract_frontmatter, resolve_authors};
use serde::Serialize;

use super::read_input;
use crate::error::CliError;
use crate::output::{Output, print_result};

/// Arguments for the meta command.
#[derive(Args)]
pub(crate) struct MetaArgs {
    /// Path to the Markdown poster.
    input: PathBuf,
}

/// JSON document printed by `poster meta`.
#[derive(Serialize)]
struct MetaReport<'a> {
    frontmatter: &'a Frontmatter,
    #[serde(flatten)]
    resolved: ResolvedAuthors,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    warnings: &'a [String],
}

impl MetaArgs {
    /// Execute the meta command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let markdown = read_input(&self.input)?;
        let json = meta_json(&markdown, &Output::new())?;
        print_result(&json)?;
        Ok(())
    }
}

fn meta_json(markdown: &str, output: &Output) -> Result<String, CliError> {
    let extracted = extract_frontmatter(markdown);
    output.warnings(&extracted.warnings);

    let report = MetaReport {
        frontmatter: &extracted.frontmatter,
        resolved: resolve_authors(extracted.frontmatter.all_authors()),
        warnings: &extracted.warnings,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
