//! Business-card field extraction module.

mod parser;
pub mod rules;

pub use parser::{BusinessCardParser, CardParser, ExtractionResult};

use crate::ocr::OcrResult;

/// Trait for card field extractors working on OCR output.
pub trait CardExtractor {
    /// Extract card fields from an OCR result.
    fn extract(&self, ocr_result: &OcrResult) -> ExtractionResult;

    /// Extract card fields from plain text.
    fn extract_from_text(&self, text: &str) -> ExtractionResult;
}
