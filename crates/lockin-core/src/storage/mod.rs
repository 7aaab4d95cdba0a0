mod config;

pub use config::{Config, NotificationsConfig, TimerSettings};

use std::path::PathBuf;

/// Returns the configuration directory.
///
/// `LOCKIN_CONFIG_DIR` overrides the location outright. Otherwise this is
/// `~/.config/lockin[-dev]/`, with the `-dev` suffix when `LOCKIN_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("LOCKIN_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("LOCKIN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("lockin-dev")
            } else {
                base_dir.join("lockin")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
