//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod extract;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use cardex_core::{
    BusinessCardParser, CardExtractor, CardParser, CardexConfig, ExtractionResult, OcrService,
};

use crate::ocr_space::OcrSpaceClient;

/// Extensions sent to the OCR service rather than read as text.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "tif", "tiff", "gif"];

/// Extensions read as already-recognized OCR text.
pub const TEXT_EXTENSIONS: &[&str] = &["txt", "text"];

/// Config file used when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    CardexConfig::default_path(dirs::config_dir())
}

/// Resolve the config file path from the global `--config` option.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration, falling back to defaults when no file exists.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CardexConfig> {
    if let Some(path) = config_path {
        return Ok(CardexConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(CardexConfig::from_file(&path)?)
    } else {
        Ok(CardexConfig::default())
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

pub fn is_image(path: &Path) -> bool {
    IMAGE_EXTENSIONS.contains(&extension(path).as_str())
}

pub fn is_supported(path: &Path) -> bool {
    is_image(path) || TEXT_EXTENSIONS.contains(&extension(path).as_str())
}

/// Extract a card from a text file or, through the OCR service, an image file.
pub async fn extract_file(
    path: &Path,
    parser: &BusinessCardParser,
    ocr: Option<&OcrSpaceClient>,
) -> anyhow::Result<ExtractionResult> {
    if !is_image(path) {
        let text = fs::read_to_string(path)?;
        return Ok(parser.parse(&text));
    }

    let Some(client) = ocr else {
        anyhow::bail!("No OCR client available for {}", path.display());
    };

    let bytes = fs::read(path)?;
    let ocr_result = client.recognize(&bytes).await?;
    debug!("OCR text for {}: {:?}", path.display(), ocr_result.text);

    Ok(parser.extract(&ocr_result))
}
