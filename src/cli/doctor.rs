//! Environment readiness check.

use crate::browser::chromium;
use anyhow::Result;
use std::path::Path;

/// Check CDP endpoint reachability and output-directory writability.
pub async fn run(endpoint: &str, out_dir: &Path) -> Result<()> {
    println!("Trawl Doctor");
    println!("============");
    println!();

    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;
    println!("OS:   {os}");
    println!("Arch: {arch}");
    println!();

    // CDP endpoint
    let endpoint_ok = match chromium::probe_endpoint(endpoint).await {
        Ok(info) => {
            match info.browser {
                Some(browser) => println!("[OK] Browser reachable at {endpoint} ({browser})"),
                None => println!("[OK] Browser reachable at {endpoint}"),
            }
            true
        }
        Err(e) => {
            println!("[!!] Browser NOT reachable at {endpoint}: {e:#}");
            println!("     Start your browser with --remote-debugging-port and log in first.");
            false
        }
    };

    // Output directory
    let dir_ok = match check_writable(out_dir) {
        Ok(()) => {
            println!("[OK] Output directory {} is writable", out_dir.display());
            true
        }
        Err(e) => {
            println!(
                "[!!] Output directory {} is not writable: {e}",
                out_dir.display()
            );
            false
        }
    };

    println!();
    if endpoint_ok && dir_ok {
        println!("Status: READY");
    } else {
        println!("Status: NOT READY");
    }

    Ok(())
}

fn check_writable(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let probe = dir.join(".trawl-write-check");
    std::fs::write(&probe, b"ok")?;
    std::fs::remove_file(&probe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_check_writable_creates_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a/b");
        assert!(check_writable(&nested).is_ok());
        assert!(nested.exists());
        assert!(!nested.join(".trawl-write-check").exists());
    }
}
