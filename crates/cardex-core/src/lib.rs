//! Core library for business-card OCR field extraction.
//!
//! This crate provides:
//! - Whole-text extractors for email, phone and website
//! - A line classifier for name, company and city
//! - A parser combining both into an [`ExtractedCard`] with a populated-field count
//! - The fill-empty merge policy for capture contact fields
//! - The [`OcrService`] capability implemented by host applications

pub mod card;
pub mod error;
pub mod models;
pub mod ocr;

pub use card::{BusinessCardParser, CardExtractor, CardParser, ExtractionResult};
pub use error::{CardexError, OcrError, Result};
pub use models::capture::{MergeReport, PocDetails};
pub use models::card::{
    CandidateSource, CardOcrMetadata, ContactExtras, ExtractedCard, Feedback, FieldCandidate,
    FieldKind,
};
pub use models::config::{CardexConfig, ExtractionConfig, OcrConfig};
pub use ocr::{OcrResult, OcrService, TextBox};

/// Parse raw OCR text with the default rules.
pub fn extract_card(text: &str) -> ExtractionResult {
    BusinessCardParser::new().parse(text)
}
