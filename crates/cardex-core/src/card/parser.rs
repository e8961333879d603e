//! Card parser assembling whole-text extractors and the line classifier.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::card::{CardOcrMetadata, ContactExtras, ExtractedCard, Feedback, FieldCandidate};
use crate::models::config::ExtractionConfig;
use crate::ocr::OcrResult;

use super::rules::{
    extract_extras, split_lines, EmailExtractor, FieldExtractor, LineClassifier, PhoneExtractor,
    WebsiteExtractor,
};
use super::CardExtractor;

/// Result of card extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted fields.
    pub card: ExtractedCard,
    /// Number of fields present in `card`.
    pub populated: usize,
    /// Messaging handles and extra numbers (not counted in `populated`).
    #[serde(default, skip_serializing_if = "ContactExtras::is_empty")]
    pub extras: ContactExtras,
    /// Candidates that produced each populated field, in resolution order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<FieldCandidate>,
    /// Number of non-empty lines seen.
    pub line_count: usize,
}

impl ExtractionResult {
    /// Result for input with nothing to extract.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Message for the user based on the populated count.
    pub fn feedback(&self) -> Feedback {
        Feedback::from_count(self.populated)
    }

    /// OCR summary to store on the capture record.
    ///
    /// The address is the detected address lines, or the city when there are none.
    pub fn metadata(&self) -> CardOcrMetadata {
        let mut metadata = CardOcrMetadata::from(&self.card);
        if let Some(address) = &self.extras.address {
            metadata.address = Some(address.clone());
        }
        metadata
    }
}

/// Trait for card parsing.
pub trait CardParser {
    /// Parse a card from raw OCR text.
    ///
    /// Never fails: anything that cannot be detected is left absent.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Rule-based card parser.
#[derive(Debug, Clone)]
pub struct BusinessCardParser {
    email: EmailExtractor,
    phone: PhoneExtractor,
    website: WebsiteExtractor,
    classifier: LineClassifier,
    extract_extras: bool,
}

impl BusinessCardParser {
    /// Create a parser with the default keyword lists.
    pub fn new() -> Self {
        Self {
            email: EmailExtractor::new(),
            phone: PhoneExtractor::new(),
            website: WebsiteExtractor::new(),
            classifier: LineClassifier::new(),
            extract_extras: true,
        }
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        let website = WebsiteExtractor::with_tlds(config.website_tlds.as_slice())?;
        let classifier =
            LineClassifier::from_config(config)?.with_website_pattern(website.pattern().clone());

        Ok(Self {
            email: EmailExtractor::new(),
            phone: PhoneExtractor::new(),
            website,
            classifier,
            extract_extras: config.extract_extras,
        })
    }

    /// Set extraction of messaging handles and alternate phones.
    pub fn with_extras(mut self, extract: bool) -> Self {
        self.extract_extras = extract;
        self
    }
}

impl Default for BusinessCardParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CardParser for BusinessCardParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        if text.trim().is_empty() {
            debug!("Empty OCR text, nothing to extract");
            return ExtractionResult::empty();
        }

        let lines = split_lines(text);
        info!("Parsing card from {} lines of text", lines.len());

        let mut card = ExtractedCard::default();
        let mut candidates = Vec::new();

        // Content patterns first; they may share lines with the classified fields
        let whole_text = [
            self.email.extract(text),
            self.phone.extract(text),
            self.website.extract(text),
        ];

        let roles = self.classifier.classify(&lines);
        let mut claimed: Vec<usize> = [&roles.name, &roles.company]
            .into_iter()
            .flatten()
            .filter_map(|c| c.line_index())
            .collect();

        for candidate in whole_text.into_iter().flatten().chain(roles.into_candidates()) {
            card.set(candidate.kind, Some(candidate.value.clone()));
            candidates.push(candidate);
        }

        let extras = if self.extract_extras {
            let mut extras = extract_extras(text, card.phone.as_deref());
            if let Some(line) = self.classifier.find_designation(&lines, &claimed) {
                claimed.push(line.index);
                extras.designation = Some(line.text.to_string());
            }
            extras.address = self.classifier.find_address(&lines, &claimed);
            extras
        } else {
            ContactExtras::default()
        };

        let populated = card.populated_count();
        debug!("Extracted {} card fields: {:?}", populated, card.populated_fields());

        ExtractionResult {
            card,
            populated,
            extras,
            candidates,
            line_count: lines.len(),
        }
    }
}

impl CardExtractor for BusinessCardParser {
    fn extract(&self, ocr_result: &OcrResult) -> ExtractionResult {
        let text = ocr_result.full_text();
        debug!(
            "Extracting card from OCR result with {} text boxes",
            ocr_result.boxes.len()
        );
        self.parse(&text)
    }

    fn extract_from_text(&self, text: &str) -> ExtractionResult {
        self.parse(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::card::FieldKind;
    use crate::ocr::TextBox;
    use pretty_assertions::assert_eq;

    const SAMPLE_CARD: &str =
        "John Smith\nAcme Trading Co.\nShanghai City\nPh: +86 138 0013 8000\njohn@acme.com\nwww.acme.com";

    #[test]
    fn test_parse_full_card() {
        let result = BusinessCardParser::new().parse(SAMPLE_CARD);

        assert_eq!(
            result.card,
            ExtractedCard {
                name: Some("John Smith".to_string()),
                company: Some("Acme Trading Co.".to_string()),
                city: Some("Shanghai".to_string()),
                phone: Some("+86 138 0013 8000".to_string()),
                email: Some("john@acme.com".to_string()),
                website: Some("https://www.acme.com".to_string()),
            }
        );
        assert_eq!(result.populated, 6);
        assert_eq!(result.line_count, 6);
        assert_eq!(result.feedback(), Feedback::Extracted(6));
    }

    #[test]
    fn test_numeric_lines_only() {
        let result = BusinessCardParser::new().parse("12345\n67890");
        assert_eq!(result.card, ExtractedCard::default());
        assert_eq!(result.populated, 0);
        assert!(result.feedback().is_warning());
    }

    #[test]
    fn test_malformed_url_fragment() {
        let result = BusinessCardParser::new().parse("visit us at ,,,acme");
        assert_eq!(result.card.website, None);
    }

    #[test]
    fn test_email_without_domain_dot() {
        let result = BusinessCardParser::new().parse("Bob Jones\nbob@localhost");
        assert_eq!(result.card.email, None);
        assert_eq!(result.card.name.as_deref(), Some("Bob Jones"));
    }

    #[test]
    fn test_empty_input() {
        let parser = BusinessCardParser::new();
        assert_eq!(parser.parse(""), ExtractionResult::empty());
        assert_eq!(parser.parse("  \n\t \r\n"), ExtractionResult::empty());
    }

    #[test]
    fn test_name_from_first_qualifying_line() {
        let text = "No. 1888 Century Avenue, Pudong New District, Shanghai 200120\nLisa Chen";
        let result = BusinessCardParser::new().parse(text);
        assert_eq!(result.card.name.as_deref(), Some("Lisa Chen"));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let parser = BusinessCardParser::new();
        assert_eq!(parser.parse(SAMPLE_CARD), parser.parse(SAMPLE_CARD));
    }

    #[test]
    fn test_candidates_record_sources() {
        let result = BusinessCardParser::new().parse(SAMPLE_CARD);
        let kinds: Vec<FieldKind> = result.candidates.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FieldKind::Email,
                FieldKind::Phone,
                FieldKind::Url,
                FieldKind::Name,
                FieldKind::Company,
                FieldKind::City,
            ]
        );
        assert_eq!(result.candidates[5].line_index(), Some(2));
    }

    #[test]
    fn test_extras_can_be_disabled() {
        let text = "Li Wei\nWeChat: liwei_sh88";
        let with = BusinessCardParser::new().parse(text);
        assert_eq!(with.extras.wechat_id.as_deref(), Some("liwei_sh88"));

        let without = BusinessCardParser::new().with_extras(false).parse(text);
        assert!(without.extras.is_empty());
        assert_eq!(with.populated, without.populated);
    }

    #[test]
    fn test_designation_and_address() {
        let text = "John Smith\nSales Director\nAcme Ltd\nRoom 1203, 88 Century Avenue, Pudong\nShanghai City";
        let result = BusinessCardParser::new().parse(text);

        assert_eq!(result.extras.designation.as_deref(), Some("Sales Director"));
        assert_eq!(
            result.extras.address.as_deref(),
            Some("Room 1203, 88 Century Avenue, Pudong")
        );
        assert_eq!(result.populated, result.card.populated_count());
        assert_eq!(
            result.metadata().address.as_deref(),
            Some("Room 1203, 88 Century Avenue, Pudong")
        );
    }

    #[test]
    fn test_metadata_address_falls_back_to_city() {
        let result = BusinessCardParser::new().parse(SAMPLE_CARD);
        assert_eq!(result.extras.designation, None);
        assert_eq!(result.extras.address, None);
        assert_eq!(result.metadata().address.as_deref(), Some("Shanghai"));
    }

    #[test]
    fn test_from_config() {
        let config = ExtractionConfig {
            company_keywords: vec!["s.a.".to_string()],
            website_tlds: vec!["pl".to_string()],
            ..Default::default()
        };
        let parser = BusinessCardParser::from_config(&config).unwrap();
        let result = parser.parse("Jan Kowalski\nKowalski S.A.\nkowalski.pl");

        assert_eq!(result.card.company.as_deref(), Some("Kowalski S.A."));
        assert_eq!(result.card.website.as_deref(), Some("https://kowalski.pl"));
    }

    #[test]
    fn test_extract_from_ocr_boxes() {
        let mut ocr = OcrResult::empty();
        ocr.boxes = vec![
            TextBox::new("Acme Holdings", 10.0, 60.0, 200.0, 20.0),
            TextBox::new("Mark Lee", 10.0, 20.0, 120.0, 24.0),
        ];

        let result = BusinessCardParser::new().extract(&ocr);
        assert_eq!(result.card.name.as_deref(), Some("Mark Lee"));
        assert_eq!(result.card.company.as_deref(), Some("Acme Holdings"));
    }
}
