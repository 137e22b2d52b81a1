use std::env;
use std::process::Command;

/// Short commit for `artview --version`. Source tarballs have no `.git`, so
/// packagers can pin it with ARTVIEW_BUILD_COMMIT.
fn commit_hash() -> String {
    if let Ok(pinned) = env::var("ARTVIEW_BUILD_COMMIT") {
        if !pinned.trim().is_empty() {
            return pinned.trim().to_string();
        }
    }

    Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    println!("cargo:rerun-if-env-changed=ARTVIEW_BUILD_COMMIT");
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs/heads");

    println!("cargo:rustc-env=GIT_COMMIT_HASH={}", commit_hash());

    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=TARGET={}", target);
}
