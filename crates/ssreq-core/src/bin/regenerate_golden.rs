//! Rewrites `tests/golden/<case>/expected_report.json` from each case's
//! `input.jsonl`. Run from the repo root; pass case names to limit the run.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ssreq_core::{ReplayConfig, replay_trace_file};

const GOLDEN_ROOT: &str = "tests/golden";

fn main() -> ExitCode {
    let only: Vec<String> = env::args().skip(1).collect();
    match regenerate(Path::new(GOLDEN_ROOT), &only) {
        Ok(0) => {
            eprintln!("error: no golden cases found under {}", GOLDEN_ROOT);
            ExitCode::from(1)
        }
        Ok(count) => {
            eprintln!("regenerated {} golden case(s)", count);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(1)
        }
    }
}

fn regenerate(root: &Path, only: &[String]) -> Result<usize, String> {
    let mut cases = golden_cases(root)?;
    if !only.is_empty() {
        cases.retain(|case| {
            case.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| only.iter().any(|wanted| wanted == name))
        });
    }
    for case in &cases {
        regenerate_case(case)?;
    }
    Ok(cases.len())
}

/// Case directories holding an `input.jsonl`, sorted by name.
fn golden_cases(root: &Path) -> Result<Vec<PathBuf>, String> {
    let entries =
        fs::read_dir(root).map_err(|err| format!("failed to read {}: {}", root.display(), err))?;
    let mut cases = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|err| format!("failed to read entry: {}", err))?
            .path();
        if path.join("input.jsonl").is_file() {
            cases.push(path);
        }
    }
    cases.sort();
    Ok(cases)
}

fn regenerate_case(case: &Path) -> Result<(), String> {
    let config_path = case.join("config.json");
    let config = if config_path.is_file() {
        ReplayConfig::from_path(&config_path)
            .map_err(|err| format!("bad config {}: {}", config_path.display(), err))?
    } else {
        ReplayConfig::default()
    };

    let input = case.join("input.jsonl");
    let report = replay_trace_file(&input, &config)
        .map_err(|err| format!("replay failed for {}: {}", input.display(), err))?;
    let mut json = serde_json::to_string_pretty(&report)
        .map_err(|err| format!("JSON serialization failed: {}", err))?;
    json.push('\n');

    let output = case.join("expected_report.json");
    fs::write(&output, json).map_err(|err| format!("failed to write {}: {}", output.display(), err))
}
