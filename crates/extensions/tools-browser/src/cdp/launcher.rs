//! Locating and launching Chrome with remote debugging.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tracing::{info, warn};

use crate::manager::BrowserManagerConfig;

use super::error::CdpError;

const STARTUP_POLL: Duration = Duration::from_millis(200);
const STARTUP_ATTEMPTS: u32 = 30;

/// Find a Chrome/Chromium executable in the usual install locations.
pub fn find_chrome() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    let paths: &[&str] = &[
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    ];

    #[cfg(target_os = "linux")]
    let paths: &[&str] = &[
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
    ];

    #[cfg(target_os = "windows")]
    let paths: &[&str] = &[
        r"C:\Program Files\Google\Chrome\Application\chrome.exe",
        r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    ];

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    let paths: &[&str] = &[];

    paths.iter().map(PathBuf::from).find(|p| p.exists())
}

/// Command-line flags for a debuggable, quiet Chrome.
pub(crate) fn chrome_args(config: &BrowserManagerConfig, wayland: bool) -> Vec<String> {
    let mut args = vec![
        format!("--remote-debugging-port={}", config.debug_port),
        format!("--user-data-dir={}", config.get_profile_dir().display()),
        "--no-first-run".to_string(),
        "--no-default-browser-check".to_string(),
        "--disable-background-networking".to_string(),
        "--disable-sync".to_string(),
        "--disable-translate".to_string(),
        "--metrics-recording-only".to_string(),
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
    ];
    if config.headless {
        args.push("--headless=new".to_string());
    } else if wayland {
        args.push("--ozone-platform=wayland".to_string());
    }
    args
}

/// Whether something answers CDP discovery at `endpoint`.
pub(crate) async fn is_chrome_running(endpoint: &str) -> bool {
    reqwest::get(format!("{}/json/version", endpoint))
        .await
        .is_ok()
}

/// Make sure Chrome is listening on the configured port. Returns the child
/// process when this call launched it.
pub(crate) async fn ensure_chrome(config: &BrowserManagerConfig) -> Result<Option<Child>, CdpError> {
    let endpoint = config.endpoint();
    if is_chrome_running(&endpoint).await {
        info!("Chrome already running on port {}", config.debug_port);
        return Ok(None);
    }

    info!("Chrome not running on port {}, launching...", config.debug_port);
    let mut child = launch_chrome(config)?;

    for _ in 0..STARTUP_ATTEMPTS {
        tokio::time::sleep(STARTUP_POLL).await;
        if is_chrome_running(&endpoint).await {
            return Ok(Some(child));
        }
    }

    let _ = child.kill().await;
    Err(CdpError::LaunchFailed(
        "Chrome failed to start within timeout".to_string(),
    ))
}

fn launch_chrome(config: &BrowserManagerConfig) -> Result<Child, CdpError> {
    let chrome_path = find_chrome().ok_or(CdpError::ChromeNotFound)?;
    let profile_dir = config.get_profile_dir();

    if let Err(e) = std::fs::create_dir_all(&profile_dir) {
        warn!("Failed to create profile directory: {}", e);
    }

    info!("Launching Chrome with profile at: {}", profile_dir.display());

    let wayland = std::env::var_os("WAYLAND_DISPLAY").is_some();
    let child = Command::new(&chrome_path)
        .args(chrome_args(config, wayland))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| CdpError::LaunchFailed(e.to_string()))?;

    info!("Chrome launched with PID: {:?}", child.id());
    Ok(child)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(headless: bool) -> BrowserManagerConfig {
        BrowserManagerConfig {
            debug_port: 9333,
            profile_dir: Some(PathBuf::from("/tmp/webnav-profile")),
            headless,
            ..Default::default()
        }
    }

    #[test]
    fn test_args_carry_port_and_profile() {
        let args = chrome_args(&config(true), false);
        assert!(args.contains(&"--remote-debugging-port=9333".to_string()));
        assert!(args.contains(&"--user-data-dir=/tmp/webnav-profile".to_string()));
        assert!(args.contains(&"--no-sandbox".to_string()));
        assert!(args.contains(&"--disable-dev-shm-usage".to_string()));
    }

    #[test]
    fn test_headless_flag() {
        assert!(chrome_args(&config(true), false).contains(&"--headless=new".to_string()));
        assert!(!chrome_args(&config(false), false).contains(&"--headless=new".to_string()));
    }

    #[test]
    fn test_wayland_only_when_headed() {
        let flag = "--ozone-platform=wayland".to_string();
        assert!(chrome_args(&config(false), true).contains(&flag));
        assert!(!chrome_args(&config(false), false).contains(&flag));
        assert!(!chrome_args(&config(true), true).contains(&flag));
    }

    #[tokio::test]
    async fn test_nothing_listening() {
        assert!(!is_chrome_running("http://127.0.0.1:1").await);
    }
}
