//! Checkout submission validation.
//!
//! Card data is validated for shape only; nothing is charged. A validated
//! submission carries the masked card number and never the raw digits, so it
//! is safe to log.
//!
//! ## Rules
//!
//! Applied in order, stopping at the first failure:
//!
//! 1. `name`, `cardNumber`, `expiry`, and `cvc` are non-empty
//! 2. Card digits number 12–19 and pass the Luhn check
//! 3. CVC is 3 or 4 digits
//! 4. Expiry looks like `MM/YY` (1–2 digits, slash, 2–4 digits)

use core::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Character replacing hidden card digits.
pub const MASK_CHAR: char = '*';

const CARD_DIGITS_MIN: usize = 12;
const CARD_DIGITS_MAX: usize = 19;
const CVC_DIGITS_MIN: usize = 3;
const CVC_DIGITS_MAX: usize = 4;

static EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[0-9]{1,2}\s*/\s*[0-9]{2,4}\s*$").expect("Invalid regex"));

/// Raw checkout form as posted by a client.
///
/// Every field defaults to empty so a missing field surfaces as
/// `MissingFields` rather than a decode error.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub expiry: String,
    #[serde(default)]
    pub cvc: String,
    #[serde(default, alias = "quantity")]
    pub qty: Option<Value>,
}

impl fmt::Debug for CheckoutSubmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutSubmission")
            .field("name", &self.name)
            .field("card_number", &mask_card(&self.card_number))
            .field("expiry", &self.expiry)
            .field("cvc", &"[REDACTED]")
            .field("qty", &self.qty)
            .finish()
    }
}

impl CheckoutSubmission {
    /// Requested quantity, normalized with [`normalize_quantity`].
    #[must_use]
    pub fn quantity(&self) -> u32 {
        normalize_quantity(self.qty.as_ref())
    }
}

/// A submission that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedSubmission {
    pub name: String,
    pub masked_card: String,
    pub expiry: String,
    pub quantity: u32,
}

/// Loggable record of an accepted checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutRecord {
    pub name: String,
    pub masked_card: String,
    pub expiry: String,
    pub quantity: u32,
    pub at: DateTime<Utc>,
}

impl CheckoutRecord {
    /// Stamp a validated submission with the time it was accepted.
    #[must_use]
    pub fn new(submission: ValidatedSubmission, at: DateTime<Utc>) -> Self {
        Self {
            name: submission.name,
            masked_card: submission.masked_card,
            expiry: submission.expiry,
            quantity: submission.quantity,
            at,
        }
    }
}

/// Validate a checkout submission.
///
/// # Errors
///
/// Returns the first `ValidationError` in rule order.
pub fn validate(submission: &CheckoutSubmission) -> Result<ValidatedSubmission, ValidationError> {
    let name = submission.name.trim();
    let expiry = submission.expiry.trim();
    if name.is_empty()
        || submission.card_number.trim().is_empty()
        || expiry.is_empty()
        || submission.cvc.trim().is_empty()
    {
        return Err(ValidationError::MissingFields);
    }

    let card = digits_only(&submission.card_number);
    if !(CARD_DIGITS_MIN..=CARD_DIGITS_MAX).contains(&card.len()) || !luhn_valid(&card) {
        return Err(ValidationError::InvalidCard);
    }

    let cvc = digits_only(&submission.cvc);
    if !(CVC_DIGITS_MIN..=CVC_DIGITS_MAX).contains(&cvc.len()) {
        return Err(ValidationError::InvalidCvc);
    }

    if !EXPIRY_RE.is_match(expiry) {
        return Err(ValidationError::InvalidExpiry);
    }

    Ok(ValidatedSubmission {
        name: name.to_string(),
        masked_card: mask_card(&card),
        expiry: expiry.to_string(),
        quantity: submission.quantity(),
    })
}

/// Strip everything but ASCII digits.
#[must_use]
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Luhn checksum over a string of digits.
///
/// Returns `false` if the input contains anything other than ASCII digits.
#[must_use]
pub fn luhn_valid(digits: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in digits.chars().rev().enumerate() {
        let Some(mut digit) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }
    sum % 10 == 0
}

/// Mask a card number for display and logging.
///
/// Non-digits are dropped first. Numbers longer than 10 digits keep the first
/// 6 and last 4; shorter ones keep only the last 4.
///
/// ```
/// use dropzone_core::checkout::mask_card;
///
/// assert_eq!(mask_card("4242 4242 4242 4242"), "424242******4242");
/// assert_eq!(mask_card("1234567890"), "******7890");
/// ```
#[must_use]
pub fn mask_card(input: &str) -> String {
    let digits = digits_only(input);
    let len = digits.len();
    let head = if len > 10 { 6 } else { 0 };
    let tail_start = len.saturating_sub(4);

    digits
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if i < head || i >= tail_start {
                c
            } else {
                MASK_CHAR
            }
        })
        .collect()
}

/// Normalize a client-supplied quantity.
///
/// Numbers and numeric strings are floored; anything missing, unparseable, or
/// below 1 becomes 1.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn normalize_quantity(raw: Option<&Value>) -> u32 {
    let parsed = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed.map(f64::floor) {
        Some(qty) if qty.is_finite() && qty >= 1.0 => qty as u32,
        _ => 1,
    }
}
