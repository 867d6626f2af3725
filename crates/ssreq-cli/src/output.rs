//! Where and how the report is written.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use ssreq_core::Report;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Compact,
    Pretty,
}

impl OutputFormat {
    pub fn render(self, report: &Report) -> Result<String, CliError> {
        let json = match self {
            OutputFormat::Compact => serde_json::to_string(report),
            OutputFormat::Pretty => serde_json::to_string_pretty(report),
        };
        Ok(json.context("JSON serialization failed")?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// Refuse a report path that names the input trace itself.
    pub fn ensure_not_input(&self, input: &Path) -> Result<(), CliError> {
        let OutputTarget::File(path) = self else {
            return Ok(());
        };
        let input = fs::canonicalize(input)
            .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
        if absolute_target(path)? == input {
            return Err(CliError::new(format!(
                "report path must differ from input: {}",
                path.display()
            ))
            .with_hint("choose a different output path"));
        }
        Ok(())
    }

    /// Returns the written path, or `None` for stdout.
    pub fn write(&self, json: &str) -> Result<Option<&Path>, CliError> {
        match self {
            OutputTarget::Stdout => {
                print!("{}", json);
                Ok(None)
            }
            OutputTarget::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
                fs::write(path, json)
                    .with_context(|| format!("Failed to write report: {}", path.display()))?;
                Ok(Some(path.as_path()))
            }
        }
    }
}

/// The report path made absolute through its (existing) parent directory.
/// A missing parent cannot contain the input, so the raw path is returned.
fn absolute_target(path: &Path) -> Result<PathBuf, CliError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let Some(name) = path.file_name() else {
        return Err(CliError::new(format!("invalid report path: {}", path.display())));
    };
    if !parent.exists() {
        return Ok(path.to_path_buf());
    }
    let parent = fs::canonicalize(parent)
        .with_context(|| format!("Failed to resolve output path: {}", path.display()))?;
    Ok(parent.join(name))
}
