mod config;
pub mod database;

pub use config::Config;
pub use database::{Database, Stats};

use std::path::PathBuf;

/// Returns the data directory, honoring overrides:
///
/// - `STUDYLOOP_DATA_DIR` points anywhere (used by tests)
/// - `STUDYLOOP_ENV=dev` selects `~/.config/studyloop-dev/`
/// - otherwise `~/.config/studyloop/`
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Ok(dir) = std::env::var("STUDYLOOP_DATA_DIR") {
        let dir = PathBuf::from(dir);
        std::fs::create_dir_all(&dir)?;
        return Ok(dir);
    }

    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STUDYLOOP_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("studyloop-dev")
    } else {
        base_dir.join("studyloop")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
