use std::env;
use std::process::Command;

/// Version details baked into `ssreq --version`.
struct BuildInfo {
    commit: String,
    date: String,
}

impl BuildInfo {
    fn collect() -> Self {
        let commit = env::var("GITHUB_SHA")
            .ok()
            .filter(|sha| !sha.is_empty())
            .or_else(|| git(&["rev-parse", "HEAD"]))
            .map(|sha| sha.chars().take(7).collect())
            .unwrap_or_else(|| "unknown".to_string());
        let date = git(&["log", "-1", "--format=%cs"]).unwrap_or_else(|| "unknown".to_string());
        Self { commit, date }
    }

    fn emit(&self) {
        println!("cargo:rustc-env=SSREQ_BUILD_COMMIT={}", self.commit);
        println!("cargo:rustc-env=SSREQ_BUILD_DATE={}", self.date);
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");
    BuildInfo::collect().emit();
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!value.is_empty()).then_some(value)
}
