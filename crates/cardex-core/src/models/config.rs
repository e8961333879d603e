//! Configuration structures for extraction and the OCR collaborator.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::card::rules::keywords::{
    DEFAULT_COMPANY_KEYWORDS, DEFAULT_LOCATION_KEYWORDS, DEFAULT_WEBSITE_TLDS,
};
use crate::error::{CardexError, Result};

/// Environment variable consulted when no OCR API key is configured.
pub const OCR_API_KEY_ENV: &str = "OCR_SPACE_API_KEY";

/// Main configuration for cardex.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardexConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// OCR service configuration.
    pub ocr: OcrConfig,
}

/// Keyword and allow-list configuration for the field rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Tokens marking a company line (case-insensitive).
    pub company_keywords: Vec<String>,

    /// Tokens marking a location line; stripped from the city value.
    pub location_keywords: Vec<String>,

    /// Top-level domains accepted for bare `name.tld` websites.
    pub website_tlds: Vec<String>,

    /// Also look for WeChat/WhatsApp handles and extra phone numbers.
    pub extract_extras: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            company_keywords: to_strings(DEFAULT_COMPANY_KEYWORDS),
            location_keywords: to_strings(DEFAULT_LOCATION_KEYWORDS),
            website_tlds: to_strings(DEFAULT_WEBSITE_TLDS),
            extract_extras: true,
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// OCR.space service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Parse endpoint URL.
    pub endpoint: String,

    /// API key. Falls back to the `OCR_SPACE_API_KEY` environment variable.
    pub api_key: Option<String>,

    /// Recognition language code.
    pub language: String,

    /// OCR engine number (1 or 2).
    pub engine: u8,

    /// Let the service auto-rotate the image.
    pub detect_orientation: bool,

    /// Let the service upscale low-resolution images.
    pub scale: bool,

    /// Request word positions along with the text.
    pub overlay: bool,

    /// Images larger than this many bytes are downscaled before upload.
    pub compress_above_bytes: usize,

    /// Longest side in pixels after downscaling.
    pub max_dimension: u32,

    /// JPEG quality (1-100) used when re-encoding.
    pub jpeg_quality: u8,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.ocr.space/parse/image".to_string(),
            api_key: None,
            language: "eng".to_string(),
            engine: 1,
            detect_orientation: true,
            scale: true,
            overlay: false,
            compress_above_bytes: 1_500_000,
            max_dimension: 1280,
            jpeg_quality: 80,
            timeout_secs: 30,
        }
    }
}

impl OcrConfig {
    /// Configured API key, or the one from the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(OCR_API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

impl CardexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.ocr.engine, 1 | 2) {
            return Err(CardexError::Config(format!(
                "ocr.engine must be 1 or 2, got {}",
                self.ocr.engine
            )));
        }
        if !(1..=100).contains(&self.ocr.jpeg_quality) {
            return Err(CardexError::Config(format!(
                "ocr.jpeg_quality must be between 1 and 100, got {}",
                self.ocr.jpeg_quality
            )));
        }
        if self.ocr.max_dimension == 0 {
            return Err(CardexError::Config("ocr.max_dimension must be positive".to_string()));
        }
        Ok(())
    }

    /// Default config file location under the user's config directory.
    pub fn default_path(config_dir: Option<PathBuf>) -> PathBuf {
        config_dir
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cardex")
            .join("config.json")
    }
}
