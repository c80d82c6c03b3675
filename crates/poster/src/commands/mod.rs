//! CLI command implementations.

mod build;
mod meta;
mod style;

use std::path::Path;

pub(crate) use build::BuildArgs;
pub(crate) use meta::MetaArgs;
pub(crate) use style::StyleArgs;

use crate::error::CliError;

/// Read a Markdown input file.
fn read_input(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Input {
        path: path.display().to_string(),
        source,
    })
}
