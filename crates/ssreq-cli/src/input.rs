//! Trace input resolution: a literal path or a glob naming exactly one file.

use std::path::{Path, PathBuf};

use glob::glob;
use tracing::debug;

use crate::error::CliError;

const TRACE_EXTENSION: &str = "jsonl";
const LISTED_MATCHES: usize = 3;

/// Resolve `input` to one existing `.jsonl` trace file.
pub fn resolve_trace(input: &Path) -> Result<PathBuf, CliError> {
    let path = if looks_like_glob(&input.to_string_lossy()) {
        expand_single(input)?
    } else {
        input.to_path_buf()
    };
    check_trace_file(&path)?;
    Ok(path)
}

fn looks_like_glob(text: &str) -> bool {
    text.contains(['*', '?', '['])
}

fn expand_single(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    let invalid = |detail: String| {
        CliError::new(format!("invalid input pattern '{}'", pattern))
            .with_hint(format!("pattern error: {}", detail))
    };

    let mut files = Vec::new();
    for entry in glob(&pattern).map_err(|err| invalid(err.msg.to_string()))? {
        let path = entry.map_err(|err| invalid(err.to_string()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    debug!(%pattern, matches = files.len(), "expanded input pattern");

    match files.len() {
        0 => Err(CliError::new(format!("no files match pattern '{}'", pattern))
            .with_hint("check the path or quote the pattern; expected .jsonl")),
        1 => Ok(files.remove(0)),
        count => {
            let mut listed: Vec<String> = files
                .iter()
                .take(LISTED_MATCHES)
                .map(|path| path.display().to_string())
                .collect();
            if count > LISTED_MATCHES {
                listed.push("...".to_string());
            }
            Err(CliError::new(format!(
                "multiple files match pattern '{}' ({} matches): {}",
                pattern,
                count,
                listed.join(", ")
            ))
            .with_hint("pass a single trace file, or run once per file"))
        }
    }
}

fn check_trace_file(path: &Path) -> Result<(), CliError> {
    if !path.exists() {
        return Err(CliError::new(format!("input file not found: {}", path.display()))
            .with_hint("use a .jsonl trace file"));
    }
    if !path.is_file() {
        return Err(CliError::new(format!("input is not a file: {}", path.display()))
            .with_hint("use a .jsonl trace file"));
    }
    let is_trace = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TRACE_EXTENSION));
    if !is_trace {
        return Err(
            CliError::new(format!("unsupported input format '{}'", path.display()))
                .with_hint("expected a .jsonl trace file"),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::looks_like_glob;

    #[test]
    fn glob_metacharacters() {
        assert!(looks_like_glob("captures/*.jsonl"));
        assert!(looks_like_glob("run?.jsonl"));
        assert!(looks_like_glob("run[12].jsonl"));
        assert!(!looks_like_glob("captures/run.jsonl"));
    }
}
