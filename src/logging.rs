// SPDX-License-Identifier: MIT
//
// Log file setup. The terminal belongs to the UI, so every record goes to
// a file: `notepyd.log` in the working directory unless NOTEPYD_LOG names
// another path. NOTEPYD_LOG_LEVEL picks the level (default `info`).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use log::LevelFilter;

pub const LOG_PATH_VAR: &str = "NOTEPYD_LOG";
pub const LOG_LEVEL_VAR: &str = "NOTEPYD_LOG_LEVEL";
const DEFAULT_LOG_PATH: &str = "notepyd.log";

/// Where the log goes and how much of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub path: PathBuf,
    pub level: LevelFilter,
    /// The level variable was set but not understood.
    pub bad_level: Option<String>,
}

impl LogSettings {
    /// Read the overrides from the environment.
    pub fn from_env() -> Self {
        Self::resolve(
            env::var_os(LOG_PATH_VAR).map(PathBuf::from),
            env::var(LOG_LEVEL_VAR).ok(),
        )
    }

    fn resolve(path: Option<PathBuf>, level: Option<String>) -> Self {
        let path = path
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH));
        let (level, bad_level) = match level {
            None => (LevelFilter::Info, None),
            Some(raw) => LevelFilter::from_str(raw.trim())
                .map_or((LevelFilter::Info, Some(raw)), |level| (level, None)),
        };
        Self {
            path,
            level,
            bad_level,
        }
    }
}

/// Install the global logger.
///
/// # Errors
///
/// Fails if the log file cannot be opened or a logger is already set.
pub fn init(settings: &LogSettings) -> Result<()> {
    let file = fern::log_file(&settings.path)
        .with_context(|| format!("cannot open log file {}", settings.path.display()))?;

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:<5} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ));
        })
        .level(settings.level)
        .chain(file)
        .apply()
        .context("logger already installed")?;

    if let Some(raw) = &settings.bad_level {
        log::warn!("ignoring {LOG_LEVEL_VAR}={raw:?}, using info");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let s = LogSettings::resolve(None, None);
        assert_eq!(s.path, PathBuf::from("notepyd.log"));
        assert_eq!(s.level, LevelFilter::Info);
        assert_eq!(s.bad_level, None);
    }

    #[test]
    fn overrides() {
        let s = LogSettings::resolve(Some("/tmp/n.log".into()), Some("debug".into()));
        assert_eq!(s.path, PathBuf::from("/tmp/n.log"));
        assert_eq!(s.level, LevelFilter::Debug);
    }

    #[test]
    fn empty_path_falls_back() {
        let s = LogSettings::resolve(Some(PathBuf::new()), None);
        assert_eq!(s.path, PathBuf::from("notepyd.log"));
    }

    #[test]
    fn unknown_level_is_reported() {
        let s = LogSettings::resolve(None, Some("chatty".into()));
        assert_eq!(s.level, LevelFilter::Info);
        assert_eq!(s.bad_level.as_deref(), Some("chatty"));
    }
}
