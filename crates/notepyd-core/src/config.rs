//! Startup configuration.
//!
//! Loaded once from a TOML file (`assets/config.toml` unless overridden).
//! Every key is required: a missing icon or font size is a startup error,
//! never a silent default.
//!
//! ```toml
//! [icons]
//! main = "assets/icons/notepyd.png"
//! "new file" = "assets/icons/new.png"
//! # ... one entry per command ...
//!
//! [font]
//! size = 12
//! ```

use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "./assets/config.toml";

/// Largest accepted `font.size`.
pub const MAX_FONT_SIZE: u16 = 96;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub icons: Icons,
    pub font: Font,
}

/// Icon per command, keyed the way the command table names them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Icons {
    pub main: String,
    #[serde(rename = "new file")]
    pub new_file: String,
    pub open: String,
    pub save: String,
    #[serde(rename = "save as")]
    pub save_as: String,
    pub print: String,
    pub undo: String,
    pub redo: String,
    pub cut: String,
    pub copy: String,
    pub paste: String,
    #[serde(rename = "select all")]
    pub select_all: String,
    pub about: String,
}

impl Icons {
    /// Look up an icon by its config key (`"new file"`, `"save as"`, ...).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        let icon = match key {
            "main" => &self.main,
            "new file" => &self.new_file,
            "open" => &self.open,
            "save" => &self.save,
            "save as" => &self.save_as,
            "print" => &self.print,
            "undo" => &self.undo,
            "redo" => &self.redo,
            "cut" => &self.cut,
            "copy" => &self.copy,
            "paste" => &self.paste,
            "select all" => &self.select_all,
            "about" => &self.about,
            _ => return None,
        };
        Some(icon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Font {
    /// Point size for the editor font.
    pub size: u16,
}

impl Settings {
    /// Read and validate the file at `path`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Read`] if the file cannot be read,
    /// [`ConfigError::Parse`] if it is not valid TOML or a key is missing,
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::parse(&text, path)?;
        debug!("loaded config from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate `text`; `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), minus the read failure.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate(path)?;
        Ok(settings)
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        if !(1..=MAX_FONT_SIZE).contains(&self.font.size) {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                message: format!(
                    "font.size must be between 1 and {MAX_FONT_SIZE}, got {}",
                    self.font.size
                ),
            });
        }
        Ok(())
    }
}
