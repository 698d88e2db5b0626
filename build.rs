//! Build metadata for alertmanager-relay
//!
//! Exposes `BUILD_TIME`, `GIT_HASH` and `RUST_VERSION` to `env!`/`option_env!`.

use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const UNKNOWN: &str = "unknown";

fn main() {
    let docs_rs = std::env::var_os("DOCS_RS").is_some();

    let build_time = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs().to_string())
        .unwrap_or_else(|_| UNKNOWN.to_string());

    let git_hash = if docs_rs {
        Some("docs-rs-build".to_string())
    } else {
        git_revision()
    };

    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let rust_version = if docs_rs {
        Some("stable".to_string())
    } else {
        command_output(&rustc, &["--version"])
    };

    emit("BUILD_TIME", &build_time);
    emit("GIT_HASH", git_hash.as_deref().unwrap_or(UNKNOWN));
    emit("RUST_VERSION", rust_version.as_deref().unwrap_or(UNKNOWN));

    for path in [".git/HEAD", ".git/index", "Cargo.toml"] {
        println!("cargo:rerun-if-changed={}", path);
    }
}

fn emit(name: &str, value: &str) {
    println!("cargo:rustc-env={}={}", name, value);
}

/// Short HEAD hash, suffixed with `-dirty` when the worktree has changes
fn git_revision() -> Option<String> {
    let hash = command_output("git", &["rev-parse", "--short", "HEAD"])?;
    let dirty = command_output("git", &["status", "--porcelain", "--untracked-files=no"])
        .is_some_and(|status| !status.is_empty());
    Some(if dirty { format!("{}-dirty", hash) } else { hash })
}

/// Trimmed stdout of a successful command
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|stdout| stdout.trim().to_string())
}
