//! Messaging handles and secondary phone numbers.

use super::patterns::{WECHAT, WHATSAPP};
use super::phone::{is_valid_phone, PhoneExtractor};
use crate::models::card::ContactExtras;

/// Maximum number of alternate phone numbers kept.
pub const MAX_ALTERNATE_PHONES: usize = 2;

/// Find WeChat/WhatsApp handles and phone numbers other than `primary_phone`.
///
/// Designation and address are line based and filled in by the parser.
pub fn extract_extras(text: &str, primary_phone: Option<&str>) -> ContactExtras {
    let wechat_id = WECHAT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    let whatsapp = WHATSAPP
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .find(|number| is_valid_phone(number));

    let alternate_phones = PhoneExtractor::new()
        .extract_valid(text)
        .into_iter()
        .filter(|p| Some(p.as_str()) != primary_phone)
        .take(MAX_ALTERNATE_PHONES)
        .collect();

    ContactExtras {
        wechat_id,
        whatsapp,
        alternate_phones,
        ..ContactExtras::default()
    }
}
