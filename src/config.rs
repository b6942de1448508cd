// Global configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::engine::normalize::Defaults;
use crate::engine::types::Preset;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub ffmpeg: FfmpegConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Quality percentage applied when a request omits `quality`
    #[serde(default = "default_quality")]
    pub quality: u8,

    /// Bitrate in kbps applied when a request omits `bitrate`
    #[serde(default = "default_bitrate_kbps")]
    pub bitrate_kbps: u32,

    /// Preset name applied when a request omits `preset`
    #[serde(default = "default_preset")]
    pub preset: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FfmpegConfig {
    /// Encoder binary name or path
    #[serde(default = "default_binary")]
    pub binary: String,
}

fn default_quality() -> u8 {
    75
}

fn default_bitrate_kbps() -> u32 {
    1000
}

fn default_preset() -> String {
    "medium".to_string()
}

fn default_binary() -> String {
    "ffmpeg".to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            quality: default_quality(),
            bitrate_kbps: default_bitrate_kbps(),
            preset: default_preset(),
        }
    }
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
        }
    }
}

impl Config {
    /// Get the config file path (~/.config/media-compressor/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("media-compressor");
        Ok(config_dir.join("config.toml"))
    }

    /// Load config from disk, or return defaults if no file exists
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            // First run: write the default config so the user has a file to
            // edit, but don't fail if the directory isn't writable.
            let config = Self::default();
            if let Err(e) = config.save() {
                eprintln!("Warning: Could not create default config file: {}", e);
            }
            return Ok(config);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save config to disk, creating the directory if needed
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Resolve the configured defaults into normalizer fallbacks. A config
    /// file carrying an unknown preset is an error, same as a request would be.
    pub fn engine_defaults(&self) -> Result<Defaults> {
        let preset = Preset::parse(&self.defaults.preset).with_context(|| {
            format!("Unknown preset '{}' in config file", self.defaults.preset)
        })?;

        Ok(Defaults {
            quality: self.defaults.quality.min(100),
            bitrate_kbps: self.defaults.bitrate_kbps.max(100),
            preset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_resolves() {
        let defaults = Config::default().engine_defaults().unwrap();
        assert_eq!(defaults.quality, 75);
        assert_eq!(defaults.bitrate_kbps, 1000);
        assert_eq!(defaults.preset, Preset::Medium);
    }

    #[test]
    fn bad_preset_in_config_errors() {
        let config = Config {
            defaults: DefaultsConfig {
                preset: "blazing".to_string(),
                ..DefaultsConfig::default()
            },
            ..Config::default()
        };
        assert!(config.engine_defaults().is_err());
    }

    #[test]
    fn config_defaults_clamped() {
        let config = Config {
            defaults: DefaultsConfig {
                quality: 200,
                bitrate_kbps: 5,
                preset: "fast".to_string(),
            },
            ..Config::default()
        };
        let defaults = config.engine_defaults().unwrap();
        assert_eq!(defaults.quality, 100);
        assert_eq!(defaults.bitrate_kbps, 100);
    }

    #[test]
    fn parses_partial_toml() {
        let config: Config = toml::from_str("[defaults]\npreset = \"slow\"\n").unwrap();
        assert_eq!(config.defaults.preset, "slow");
        assert_eq!(config.defaults.quality, 75);
        assert_eq!(config.ffmpeg.binary, "ffmpeg");
    }
}
