//! WASM bindings for business-card field extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! OCR itself runs on the JavaScript side; these bindings take its text or
//! word boxes and return the extracted contact fields.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use cardex_core::card::rules::{has_dotted_domain, is_valid_phone, normalize_website};
use cardex_core::{
    BusinessCardParser, CardExtractor as _, CardOcrMetadata, CardParser, ContactExtras,
    ExtractedCard, ExtractionConfig, ExtractionResult, Feedback, OcrResult, PocDetails, TextBox,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extraction output handed to JavaScript.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CardView {
    card: ExtractedCard,
    populated: usize,
    message: String,
    is_warning: bool,
    metadata: CardOcrMetadata,
    #[serde(skip_serializing_if = "ContactExtras::is_empty")]
    extras: ContactExtras,
}

impl From<ExtractionResult> for CardView {
    fn from(result: ExtractionResult) -> Self {
        let feedback = result.feedback();
        Self {
            metadata: result.metadata(),
            populated: result.populated,
            message: feedback.to_string(),
            is_warning: feedback.is_warning(),
            card: result.card,
            extras: result.extras,
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract contact fields from OCR text with the default rules.
#[wasm_bindgen(js_name = extractCard)]
pub fn extract_card(text: &str) -> Result<JsValue, JsValue> {
    to_js(&CardView::from(cardex_core::extract_card(text)))
}

fn merge_text(record: PocDetails, text: &str) -> PocDetails {
    let mut record = record;
    let result = cardex_core::extract_card(text);
    record.fill_empty(&result.card);
    record
}

/// Fill the empty `poc*` fields of a capture record from OCR text.
///
/// Fields that already hold a value are returned unchanged.
#[wasm_bindgen(js_name = fillEmptyFields)]
pub fn fill_empty_fields(existing: JsValue, text: &str) -> Result<JsValue, JsValue> {
    let record: PocDetails = if existing.is_undefined() || existing.is_null() {
        PocDetails::default()
    } else {
        serde_wasm_bindgen::from_value(existing).map_err(|e| JsValue::from_str(&e.to_string()))?
    };

    to_js(&merge_text(record, text))
}

/// User-facing message for a populated-field count.
#[wasm_bindgen(js_name = feedbackMessage)]
pub fn feedback_message(populated: usize) -> String {
    Feedback::from_count(populated).to_string()
}

/// Check that an email has one `@` and a dotted domain.
#[wasm_bindgen(js_name = isValidEmail)]
pub fn is_valid_email(email: &str) -> bool {
    has_dotted_domain(email.trim())
}

/// Check that a phone number has 7 to 15 digits.
#[wasm_bindgen(js_name = isValidPhone)]
pub fn is_valid_phone_number(phone: &str) -> bool {
    is_valid_phone(phone)
}

/// Normalize a website to an absolute http(s) URL, if it is one.
#[wasm_bindgen(js_name = normalizeWebsite)]
pub fn normalize_website_url(website: &str) -> Option<String> {
    normalize_website(website)
}

/// Card extractor class for browser use.
#[wasm_bindgen(js_name = CardExtractor)]
pub struct CardExtractorJs {
    parser: BusinessCardParser,
}

#[wasm_bindgen(js_class = CardExtractor)]
impl CardExtractorJs {
    /// Create an extractor with the default keyword lists.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: BusinessCardParser::new(),
        }
    }

    /// Create an extractor from an extraction config in JSON.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(config_json: &str) -> Result<CardExtractorJs, JsValue> {
        let config: ExtractionConfig =
            serde_json::from_str(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let parser = BusinessCardParser::from_config(&config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { parser })
    }

    /// Turn messaging handle extraction on or off.
    #[wasm_bindgen(js_name = setExtractExtras)]
    pub fn set_extract_extras(&mut self, extract: bool) {
        self.parser = self.parser.clone().with_extras(extract);
    }

    /// Extract contact fields from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&CardView::from(self.parser.parse(text)))
    }

    /// Number of fields that would be extracted from text.
    #[wasm_bindgen(js_name = countFields)]
    pub fn count_fields(&self, text: &str) -> usize {
        self.parser.parse(text).populated
    }
}

impl Default for CardExtractorJs {
    fn default() -> Self {
        Self::new()
    }
}

/// OCR result built from browser-side recognition.
#[wasm_bindgen(js_name = OcrResult)]
pub struct OcrResultJs {
    inner: OcrResult,
}

#[wasm_bindgen(js_class = OcrResult)]
impl OcrResultJs {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: OcrResult::empty(),
        }
    }

    /// Add a recognized word or line with its bounding box.
    #[wasm_bindgen(js_name = addBox)]
    pub fn add_box(&mut self, text: &str, left: f32, top: f32, width: f32, height: f32) {
        self.inner
            .boxes
            .push(TextBox::new(text, left, top, width, height));
    }

    /// Set the full text.
    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&mut self, text: &str) {
        self.inner.text = text.to_string();
    }

    /// The full text, or the boxes in reading order when no text was set.
    #[wasm_bindgen(js_name = getText)]
    pub fn get_text(&self) -> String {
        self.inner.full_text()
    }

    /// Extract contact fields from this OCR result.
    #[wasm_bindgen(js_name = extractCard)]
    pub fn extract_card(&self) -> Result<JsValue, JsValue> {
        to_js(&CardView::from(BusinessCardParser::new().extract(&self.inner)))
    }
}

impl Default for OcrResultJs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_validators() {
        assert!(is_valid_email(" john@acme.com "));
        assert!(!is_valid_email("bob@localhost"));
        assert!(is_valid_phone_number("+86 138 0013 8000"));
        assert!(!is_valid_phone_number("12345"));
        assert_eq!(
            normalize_website_url("WWW.Acme.com,"),
            Some("https://www.acme.com".to_string())
        );
    }

    #[wasm_bindgen_test]
    fn test_feedback_message() {
        assert_eq!(
            feedback_message(2),
            "Extracted 2 fields! Please review and edit as needed."
        );
        assert_eq!(
            feedback_message(0),
            "Could not detect card details clearly. Please fill manually."
        );
    }

    #[wasm_bindgen_test]
    fn test_card_view() {
        let view = CardView::from(cardex_core::extract_card("Lisa Chen\nlisa@bright.io"));
        assert_eq!(view.populated, 2);
        assert!(!view.is_warning);
        assert_eq!(view.metadata.contact_name.as_deref(), Some("Lisa Chen"));
    }

    #[wasm_bindgen_test]
    fn test_merge_keeps_existing() {
        let record = PocDetails {
            name: Some("Elisabeth".to_string()),
            ..Default::default()
        };
        let merged = merge_text(record, "Lisa Chen\nlisa@bright.io");
        assert_eq!(merged.name.as_deref(), Some("Elisabeth"));
        assert_eq!(merged.email.as_deref(), Some("lisa@bright.io"));
    }

    #[wasm_bindgen_test]
    fn test_ocr_builder_reading_order() {
        let mut ocr = OcrResultJs::new();
        ocr.add_box("Chen", 60.0, 10.0, 40.0, 12.0);
        ocr.add_box("Lisa", 10.0, 11.0, 40.0, 12.0);
        ocr.add_box("Shenzhen", 10.0, 40.0, 80.0, 12.0);
        assert_eq!(ocr.get_text(), "Lisa Chen\nShenzhen");
    }

    #[wasm_bindgen_test]
    fn test_extractor_config() {
        let extractor = CardExtractorJs::from_config(r#"{"company_keywords": ["gmbh"]}"#)
            .unwrap_or_else(|_| panic!("config should parse"));
        assert_eq!(extractor.count_fields("Max Muster\nMuster GmbH"), 2);
    }
}
