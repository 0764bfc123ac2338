use std::{
    fs,
    path::{Path, PathBuf},
};

use pmu_image::{Color, Encoding};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CANVAS_WIDTH: u32 = 300;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 150;
pub const DEFAULT_STROKE_WIDTH: f32 = 2.0;
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] json5::Error),
    #[error("Config directory not found")]
    ConfigDirNotFound,
}

/// Signature pad configuration, read from `signature.json5`.
///
/// Every field is optional; the accessor methods fall back to the built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignatureConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas: Option<CanvasConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<StrokeConfig>,

    /// Fill behind the strokes. Transparent unless set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Encoding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub jpeg_quality: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CanvasConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StrokeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl SignatureConfig {
    #[must_use]
    pub fn canvas_width(&self) -> u32 {
        self.canvas
            .as_ref()
            .and_then(|x| x.width)
            .unwrap_or(DEFAULT_CANVAS_WIDTH)
    }

    #[must_use]
    pub fn canvas_height(&self) -> u32 {
        self.canvas
            .as_ref()
            .and_then(|x| x.height)
            .unwrap_or(DEFAULT_CANVAS_HEIGHT)
    }

    #[must_use]
    pub fn stroke_width(&self) -> f32 {
        self.stroke
            .as_ref()
            .and_then(|x| x.width)
            .unwrap_or(DEFAULT_STROKE_WIDTH)
    }

    #[must_use]
    pub fn stroke_color(&self) -> Color {
        self.stroke
            .as_ref()
            .and_then(|x| x.color)
            .unwrap_or(Color::BLACK)
    }

    #[must_use]
    pub fn background(&self) -> Color {
        self.background.unwrap_or(Color::TRANSPARENT)
    }

    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.encoding.unwrap_or_default()
    }

    #[must_use]
    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality.unwrap_or(DEFAULT_JPEG_QUALITY).min(100)
    }
}

/// Get the path to a config file, preferring .json5 but also checking .json
fn get_config_file_path(dir: &Path, filename: &str) -> Option<PathBuf> {
    let json5_path = dir.join(format!("{filename}.json5"));
    if json5_path.exists() {
        return Some(json5_path);
    }

    let json_path = dir.join(format!("{filename}.json"));
    if json_path.exists() {
        return Some(json_path);
    }

    None
}

fn load_config_file<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = json5::from_str(&content)?;
    Ok(config)
}

/// Load the signature configuration from `dir`.
///
/// A missing file is not an error; the default configuration is returned instead.
///
/// # Errors
///
/// * If the config file cannot be read
/// * If the config file is malformed
pub fn load_signature_config_from(dir: &Path) -> Result<SignatureConfig, ConfigError> {
    if let Some(path) = get_config_file_path(dir, "signature") {
        log::debug!("Loading signature config from {}", path.display());
        load_config_file(&path)
    } else {
        log::debug!("No signature config in {}, using defaults", dir.display());
        Ok(SignatureConfig::default())
    }
}

/// Load the signature configuration from the config directory.
///
/// # Errors
///
/// * If the config directory cannot be found
/// * If the config file cannot be read
/// * If the config file is malformed
pub fn load_signature_config() -> Result<SignatureConfig, ConfigError> {
    let config_dir = crate::get_config_dir_path().ok_or(ConfigError::ConfigDirNotFound)?;

    load_signature_config_from(&config_dir)
}
