//! OCR collaborator capability and its result types.
//!
//! Text recognition itself happens outside this crate. A host application
//! provides an [`OcrService`] (for example an HTTP client for a hosted OCR API),
//! owns its lifecycle, and hands the resulting text to a
//! [`CardExtractor`](crate::card::CardExtractor).

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Text recognition capability supplied by the host application.
pub trait OcrService {
    /// Recognize the text printed in an encoded image (PNG, JPEG, ...).
    fn recognize(&self, image: &[u8]) -> impl Future<Output = Result<OcrResult, OcrError>> + Send;
}

/// A recognized piece of text with its axis-aligned position in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    /// Recognized text content.
    pub text: String,

    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl TextBox {
    pub fn new(text: impl Into<String>, left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            text: text.into(),
            left,
            top,
            width,
            height,
        }
    }
}

/// Result of OCR processing on one card image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    /// Recognized lines or words with positions, when the service reports them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub boxes: Vec<TextBox>,

    /// Full text as returned by the service.
    pub text: String,

    /// Processing time reported by the service, in milliseconds.
    #[serde(default)]
    pub processing_time_ms: u64,

    /// Name of the engine that produced the text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
}

/// Vertical distance (pixels) under which boxes count as the same row.
const ROW_HEIGHT: f32 = 20.0;

impl OcrResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a result holding plain text only.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// The service text, or the boxes in reading order when the text is blank.
    pub fn full_text(&self) -> String {
        if !self.text.trim().is_empty() {
            return self.text.clone();
        }

        let mut boxes: Vec<&TextBox> = self.boxes.iter().collect();
        sort_reading_order(&mut boxes);
        join_rows(&boxes)
    }
}

fn row_of(text_box: &TextBox) -> i32 {
    (text_box.top / ROW_HEIGHT) as i32
}

fn sort_reading_order(boxes: &mut [&TextBox]) {
    boxes.sort_by(|a, b| {
        let row_a = row_of(a);
        let row_b = row_of(b);

        if row_a != row_b {
            row_a.cmp(&row_b)
        } else {
            a.left.partial_cmp(&b.left).unwrap_or(std::cmp::Ordering::Equal)
        }
    });
}

/// Join sorted boxes: same row with spaces, rows with newlines.
fn join_rows(boxes: &[&TextBox]) -> String {
    let mut rows: Vec<(i32, Vec<&str>)> = Vec::new();

    for text_box in boxes {
        let row = row_of(text_box);
        if let Some((current, words)) = rows.last_mut() {
            if *current == row {
                words.push(text_box.text.as_str());
                continue;
            }
        }
        rows.push((row, vec![text_box.text.as_str()]));
    }

    rows.iter()
        .map(|(_, words)| words.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}
