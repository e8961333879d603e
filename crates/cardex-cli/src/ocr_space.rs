//! OCR.space HTTP client implementing the core `OcrService` capability.

use std::io::Cursor;
use std::time::{Duration, Instant};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use serde::Deserialize;
use tracing::{debug, info};

use cardex_core::models::config::OcrConfig;
use cardex_core::{OcrError, OcrResult, OcrService, TextBox};

/// Client for the OCR.space parse endpoint.
pub struct OcrSpaceClient {
    http: reqwest::Client,
    config: OcrConfig,
    api_key: String,
}

impl OcrSpaceClient {
    /// Create a client, resolving the API key from config or the environment.
    pub fn new(config: OcrConfig) -> Result<Self, OcrError> {
        let api_key = config.resolve_api_key().ok_or(OcrError::MissingApiKey)?;
        Self::with_api_key(config, api_key)
    }

    /// Create a client with an explicit API key.
    pub fn with_api_key(config: OcrConfig, api_key: impl Into<String>) -> Result<Self, OcrError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OcrError::Request(e.to_string()))?;

        Ok(Self {
            http,
            config,
            api_key: api_key.into(),
        })
    }

    fn form(&self, data_url: String) -> Vec<(&'static str, String)> {
        vec![
            ("base64Image", data_url),
            ("apikey", self.api_key.clone()),
            ("language", self.config.language.clone()),
            ("isOverlayRequired", self.config.overlay.to_string()),
            ("detectOrientation", self.config.detect_orientation.to_string()),
            ("scale", self.config.scale.to_string()),
            ("OCREngine", self.config.engine.to_string()),
        ]
    }
}

impl OcrService for OcrSpaceClient {
    async fn recognize(&self, image: &[u8]) -> Result<OcrResult, OcrError> {
        let start = Instant::now();
        let data_url = prepare_image(image, &self.config)?;
        info!("Sending {} KB to OCR service", data_url.len() / 1024);

        let response = self
            .http
            .post(&self.config.endpoint)
            .form(&self.form(data_url))
            .send()
            .await
            .map_err(|e| OcrError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OcrError::Request(format!("OCR API error: {}", status)));
        }

        let body: ParseResponse = response
            .json()
            .await
            .map_err(|e| OcrError::Request(format!("malformed response: {}", e)))?;

        let mut result = body.into_result()?;
        result.engine = Some(format!("ocr.space/{}", self.config.engine));
        if result.processing_time_ms == 0 {
            result.processing_time_ms = start.elapsed().as_millis() as u64;
        }

        debug!(
            "OCR returned {} chars and {} words in {}ms",
            result.text.len(),
            result.boxes.len(),
            result.processing_time_ms
        );

        Ok(result)
    }
}

/// Encode image bytes as a data URL, downscaling large images first.
pub fn prepare_image(bytes: &[u8], config: &OcrConfig) -> Result<String, OcrError> {
    let format = image::guess_format(bytes).map_err(|e| OcrError::InvalidImage(e.to_string()))?;

    if bytes.len() <= config.compress_above_bytes {
        return Ok(data_url(format, bytes));
    }

    let image = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| OcrError::InvalidImage(e.to_string()))?;
    let compressed = compress(&image, config.max_dimension, config.jpeg_quality)?;

    debug!(
        "Compressed image from {} to {} bytes",
        bytes.len(),
        compressed.len()
    );

    Ok(data_url(ImageFormat::Jpeg, &compressed))
}

fn compress(image: &DynamicImage, max_dimension: u32, quality: u8) -> Result<Vec<u8>, OcrError> {
    let resized = if image.width() > max_dimension || image.height() > max_dimension {
        image.resize(max_dimension, max_dimension, FilterType::Triangle)
    } else {
        image.clone()
    };

    let mut out = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut out, quality);
    DynamicImage::ImageRgb8(resized.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| OcrError::InvalidImage(e.to_string()))?;

    Ok(out.into_inner())
}

fn data_url(format: ImageFormat, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", format.to_mime_type(), STANDARD.encode(bytes))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParseResponse {
    #[serde(default)]
    parsed_results: Vec<ParsedResult>,
    #[serde(default)]
    is_errored_on_processing: bool,
    #[serde(default)]
    error_message: Option<ErrorMessage>,
    #[serde(default)]
    processing_time_in_milliseconds: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl ErrorMessage {
    fn first(&self) -> Option<&str> {
        match self {
            ErrorMessage::One(message) => Some(message.as_str()),
            ErrorMessage::Many(messages) => messages.first().map(String::as_str),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct ParsedResult {
    parsed_text: String,
    text_overlay: Option<TextOverlay>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct TextOverlay {
    lines: Vec<OverlayLine>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct OverlayLine {
    words: Vec<OverlayWord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct OverlayWord {
    word_text: String,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

impl ParseResponse {
    fn into_result(self) -> Result<OcrResult, OcrError> {
        if self.is_errored_on_processing {
            let message = self
                .error_message
                .as_ref()
                .and_then(ErrorMessage::first)
                .unwrap_or("OCR processing failed");
            return Err(OcrError::Service(message.to_string()));
        }

        let processing_time_ms = self
            .processing_time_in_milliseconds
            .as_ref()
            .and_then(|v| v.as_u64().or_else(|| v.as_str()?.parse().ok()))
            .unwrap_or(0);

        let Some(parsed) = self.parsed_results.into_iter().next() else {
            return Err(OcrError::NoText);
        };

        let boxes: Vec<TextBox> = parsed
            .text_overlay
            .map(|overlay| overlay.lines)
            .unwrap_or_default()
            .into_iter()
            .flat_map(|line| line.words)
            .map(|w| TextBox::new(w.word_text, w.left, w.top, w.width, w.height))
            .collect();

        if parsed.parsed_text.trim().is_empty() && boxes.is_empty() {
            return Err(OcrError::NoText);
        }

        Ok(OcrResult {
            boxes,
            text: parsed.parsed_text,
            processing_time_ms,
            engine: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> Result<OcrResult, OcrError> {
        serde_json::from_str::<ParseResponse>(json).unwrap().into_result()
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x ^ y) % 256) as u8])
        });
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(image)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_parse_success() {
        let result = parse(
            r#"{
                "ParsedResults": [{"ParsedText": "John Smith\r\njohn@acme.com\r\n", "FileParseExitCode": 1}],
                "OCRExitCode": 1,
                "IsErroredOnProcessing": false,
                "ProcessingTimeInMilliseconds": "343"
            }"#,
        )
        .unwrap();

        assert_eq!(result.text, "John Smith\r\njohn@acme.com\r\n");
        assert_eq!(result.processing_time_ms, 343);
        assert!(result.boxes.is_empty());
    }

    #[test]
    fn test_parse_overlay_words() {
        let result = parse(
            r#"{
                "ParsedResults": [{
                    "ParsedText": "",
                    "TextOverlay": {"Lines": [{"Words": [
                        {"WordText": "Lisa", "Left": 10, "Top": 12, "Width": 40, "Height": 12},
                        {"WordText": "Chen", "Left": 55, "Top": 12, "Width": 40, "Height": 12}
                    ], "MaxHeight": 12, "MinTop": 12}]}
                }],
                "IsErroredOnProcessing": false
            }"#,
        )
        .unwrap();

        assert_eq!(result.boxes.len(), 2);
        assert_eq!(result.full_text(), "Lisa Chen");
    }

    #[test]
    fn test_error_message_array() {
        let err = parse(
            r#"{"IsErroredOnProcessing": true, "ErrorMessage": ["File failed validation", "Other"]}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "OCR processing failed: File failed validation");
    }

    #[test]
    fn test_error_message_string() {
        let err = parse(r#"{"IsErroredOnProcessing": true, "ErrorMessage": "Invalid API key"}"#)
            .unwrap_err();
        assert!(matches!(err, OcrError::Service(m) if m == "Invalid API key"));
    }

    #[test]
    fn test_error_without_message() {
        let err = parse(r#"{"IsErroredOnProcessing": true}"#).unwrap_err();
        assert!(matches!(err, OcrError::Service(m) if m == "OCR processing failed"));
    }

    #[test]
    fn test_blank_text_is_no_text() {
        let err = parse(
            r#"{"ParsedResults": [{"ParsedText": "  \r\n"}], "IsErroredOnProcessing": false}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "no text found in image");

        assert!(matches!(parse(r#"{"ParsedResults": []}"#), Err(OcrError::NoText)));
    }

    #[test]
    fn test_small_image_sent_as_is() {
        let bytes = png(20, 10);
        let url = prepare_image(&bytes, &OcrConfig::default()).unwrap();

        assert!(url.starts_with("data:image/png;base64,"));
        let encoded = url.trim_start_matches("data:image/png;base64,");
        assert_eq!(STANDARD.decode(encoded).unwrap(), bytes);
    }

    #[test]
    fn test_large_image_downscaled_to_jpeg() {
        let bytes = png(400, 200);
        let config = OcrConfig {
            compress_above_bytes: 100,
            max_dimension: 128,
            ..OcrConfig::default()
        };

        let url = prepare_image(&bytes, &config).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));

        let encoded = url.trim_start_matches("data:image/jpeg;base64,");
        let decoded = image::load_from_memory(&STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(decoded.dimensions(), (128, 64));
    }

    #[test]
    fn test_invalid_image_rejected() {
        let err = prepare_image(b"not an image", &OcrConfig::default()).unwrap_err();
        assert!(matches!(err, OcrError::InvalidImage(_)));
    }

    #[test]
    fn test_form_fields() {
        let client = OcrSpaceClient::with_api_key(OcrConfig::default(), "k").unwrap();
        let form = client.form("data:image/png;base64,AA".to_string());

        assert!(form.contains(&("apikey", "k".to_string())));
        assert!(form.contains(&("OCREngine", "1".to_string())));
        assert!(form.contains(&("isOverlayRequired", "false".to_string())));
    }
}
