//! Chart appearance settings loaded from evalplot.toml.
//!
//! Configuration never changes what gets plotted, only how the charts look.
//! A missing file means defaults; a file that fails to parse, or an invalid
//! color value, is an error.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration loaded from evalplot.toml.
#[derive(Debug, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PlotConfig {
    pub chart: ChartSettings,
    pub labels: LabelSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Output image size in pixels.
    pub width: u32,
    pub height: u32,
    /// Bar fill color as a `#rrggbb` hex string.
    pub bar_color: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    pub title_size: u32,
    pub tick_size: u32,
    /// Draw x-axis labels vertically so long experiment names stay legible.
    pub rotate_x_labels: bool,
}

// --- Default implementations ---

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 960,
            height: 600,
            bar_color: "#1f77b4".to_string(),
        }
    }
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            title_size: 22,
            tick_size: 15,
            rotate_x_labels: true,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    InvalidColor { value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse config {}: {source}", path.display())
            }
            ConfigError::InvalidColor { value } => {
                write!(f, "invalid bar_color {value:?}: expected \"#rrggbb\"")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::InvalidColor { .. } => None,
        }
    }
}

impl PlotConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(PlotConfig::default());
            }
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        let config: PlotConfig = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.chart.bar_rgb()?;
        Ok(config)
    }
}

impl ChartSettings {
    /// Parse `bar_color` into RGB components.
    pub fn bar_rgb(&self) -> Result<(u8, u8, u8), ConfigError> {
        parse_hex_color(&self.bar_color).ok_or_else(|| ConfigError::InvalidColor {
            value: self.bar_color.clone(),
        })
    }
}

fn parse_hex_color(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}
