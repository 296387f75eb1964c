//! Build script for embedding build metadata at compile time
//!
//! Emits the git commit, the build timestamp and, when present, a default
//! backend base URL taken from `DECIDE_BACKEND_URL` in the build environment.
//!
//! The baked URL is only a default: the runtime `DECIDE_BACKEND_URL` variable
//! and the `[backend]` section of config.toml both take precedence. When no
//! URL is baked in, the build warns and the binary refuses to start until one
//! is configured.

use std::env;

fn main() {
    // 1. Get the current Git commit hash
    let commit_hash = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=GIT_COMMIT_HASH={}", commit_hash);

    // 2. Get the current Build Timestamp (ISO 8601)
    let build_time = chrono::Utc::now().to_rfc3339();
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", build_time);

    // 3. Optional default backend URL
    println!("cargo:rerun-if-env-changed=DECIDE_BACKEND_URL");
    match env::var("DECIDE_BACKEND_URL") {
        Ok(url) if !url.trim().is_empty() => {
            println!("cargo:rustc-env=DECIDE_BUILD_BACKEND_URL={}", url.trim());
        }
        _ => {
            println!("cargo:warning=DECIDE_BACKEND_URL not set at build time");
            println!("cargo:warning=The binary will require it at runtime via:");
            println!("cargo:warning=  - DECIDE_BACKEND_URL environment variable");
            println!("cargo:warning=  - [backend] base_url in ~/.decide/config.toml");
        }
    }
}
