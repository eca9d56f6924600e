// build.rs
use std::path::Path;

fn short_hash(output: std::io::Result<std::process::Output>) -> String {
    output
        .map(|output| {
            let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if hash.len() >= 8 {
                hash[..8].to_string()
            } else {
                hash
            }
        })
        .ok()
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let version = std::env::var("CARGO_PKG_VERSION")?;
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    let version_suffix = if Path::new(".git").exists() {
        let local_hash = short_hash(
            std::process::Command::new("git")
                .args(["rev-parse", "HEAD"])
                .output(),
        );

        let local_dirty = std::process::Command::new("git")
            .args(["diff", "--quiet"])
            .status()
            .map(|status| if status.success() { "" } else { "-dirty" })
            .unwrap_or("");

        format!("{}{}-{}", local_hash, local_dirty, profile)
    } else {
        // Source tarball, no repository metadata to stamp
        profile
    };

    let full_version = format!("{} {}", version, version_suffix);

    println!("cargo:rustc-env=RESERVOIR_CORE_VERSION={}", full_version);

    println!("cargo:rerun-if-changed=.git/HEAD");

    Ok(())
}
