use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
    println!("cargo:rerun-if-env-changed=GIT_VERSION");

    println!("cargo:rustc-env=GIT_VERSION={}", git_version());
}

/// Resolve the version string reported by `/api/health`.
///
/// An explicit `GIT_VERSION` (set by CI or container builds) wins, then
/// `git describe`, then the literal `dev`.
fn git_version() -> String {
    match std::env::var("GIT_VERSION") {
        Ok(version) if !version.is_empty() && version != "dev" => return version,
        _ => {}
    }

    Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "dev".to_string())
}
