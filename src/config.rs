// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Startup settings.
//!
//! An optional `settings.toml` in the platform config directory can change
//! where overlay images are read from, the space reserved around the
//! preview, and the initial colors and theme. The file is never written.

use crate::models::render_state::Rgb;
use crate::util::geometry::FixedInset;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "SafeZone";

pub const DEFAULT_SAFE_COLOR: Rgb = Rgb([0x2e, 0xcc, 0x71]);
pub const DEFAULT_UNSAFE_COLOR: Rgb = Rgb([0xe7, 0x4c, 0x3c]);

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub asset_root: Option<PathBuf>,
    pub viewport_inset_horizontal: Option<f32>,
    pub viewport_inset_vertical: Option<f32>,
    pub safe_color: Option<String>,
    pub unsafe_color: Option<String>,
    pub dark_mode: Option<bool>,
}

impl Config {
    pub fn asset_root(&self) -> PathBuf {
        self.asset_root.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn inset(&self) -> FixedInset {
        let default = FixedInset::default();
        FixedInset {
            horizontal: self
                .viewport_inset_horizontal
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(default.horizontal),
            vertical: self
                .viewport_inset_vertical
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(default.vertical),
        }
    }

    pub fn safe_color(&self) -> Rgb {
        color_or(self.safe_color.as_deref(), DEFAULT_SAFE_COLOR)
    }

    pub fn unsafe_color(&self) -> Rgb {
        color_or(self.unsafe_color.as_deref(), DEFAULT_UNSAFE_COLOR)
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode.unwrap_or(false)
    }
}

fn color_or(value: Option<&str>, default: Rgb) -> Rgb {
    match value {
        Some(s) => Rgb::from_hex(s).unwrap_or_else(|| {
            log::warn!("Ignoring invalid color {:?} in settings", s);
            default
        }),
        None => default,
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

/// Load settings from the platform config directory, or defaults if the
/// file does not exist.
pub fn load() -> Result<Config> {
    if let Some(path) = default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

/// Load settings from `path`. Invalid TOML yields defaults.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(toml::from_str(&content).unwrap_or_else(|e| {
        log::warn!("Invalid settings in {}: {}", path.display(), e);
        Config::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.asset_root(), PathBuf::from("."));
        assert_eq!(config.inset(), FixedInset::default());
        assert_eq!(config.safe_color(), DEFAULT_SAFE_COLOR);
        assert_eq!(config.unsafe_color(), DEFAULT_UNSAFE_COLOR);
        assert!(!config.dark_mode());
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "asset_root = \"/opt/safezone\"\n\
             viewport_inset_horizontal = 320.0\n\
             safe_color = \"#00ff00\"\n\
             dark_mode = true\n",
        )
        .unwrap();

        let config = load_from_path(&path).unwrap();
        assert_eq!(config.asset_root(), PathBuf::from("/opt/safezone"));
        assert_eq!(config.inset().horizontal, 320.0);
        assert_eq!(config.inset().vertical, 100.0);
        assert_eq!(config.safe_color(), Rgb([0, 255, 0]));
        assert_eq!(config.unsafe_color(), DEFAULT_UNSAFE_COLOR);
        assert!(config.dark_mode());
    }

    #[test]
    fn test_invalid_toml_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "not = valid = toml").unwrap();

        let config = load_from_path(&path).unwrap();
        assert!(config.asset_root.is_none());
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let config = Config {
            viewport_inset_vertical: Some(-5.0),
            unsafe_color: Some("red".to_string()),
            ..Config::default()
        };
        assert_eq!(config.inset().vertical, 100.0);
        assert_eq!(config.unsafe_color(), DEFAULT_UNSAFE_COLOR);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(&dir.path().join("absent.toml")).is_err());
    }
}
