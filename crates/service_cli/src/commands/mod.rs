//! CLI command implementations
//!
//! Each submodule implements a specific CLI command and writes its report
//! to the supplied writer.

pub mod aggregate;
pub mod analyze;
pub mod check;
pub mod penalty;

use std::path::Path;

use crate::{CliError, Result};

/// Reads an input file, reporting a missing file by name.
pub(crate) fn read_input(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    Ok(std::fs::read_to_string(path)?)
}
