//! # Payload Codec
//!
//! Reversible mapping between a numeric objective code and the opaque token
//! stored in a record.
//!
//! ## NOT CRYPTOGRAPHICALLY SECURE
//!
//! [`MarkerCodec`] is base64 over the decimal text of the value. Anyone with
//! read access to the store can recover every code. It is a placeholder that
//! keeps the registry protocol independent of the primitive; a deployment
//! that needs confidentiality must supply a real encryption service behind
//! [`ObjectiveCodec`].

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

/// Standard alphabet, padding optional on decode.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Pluggable value ↔ token transform.
///
/// Contract: `decode(&encode(v)) == Some(v)` for every finite `v`. `decode`
/// must never panic; `None` is the "unparseable" sentinel.
pub trait ObjectiveCodec: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Encodes a value into a token.
    fn encode(&self, value: f64) -> String;

    /// Decodes a token, or returns None if it carries no number.
    fn decode(&self, token: &str) -> Option<f64>;
}

/// Marker-prefixed base64 codec (`FHE-<base64 of decimal text>`).
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerCodec;

impl MarkerCodec {
    /// Prefix identifying tokens produced by this codec.
    pub const MARKER: &'static str = "FHE-";

    /// Creates the codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ObjectiveCodec for MarkerCodec {
    fn name(&self) -> &'static str {
        "marker-base64"
    }

    fn encode(&self, value: f64) -> String {
        format!("{}{}", Self::MARKER, LENIENT_BASE64.encode(value.to_string()))
    }

    fn decode(&self, token: &str) -> Option<f64> {
        match token.strip_prefix(Self::MARKER) {
            Some(body) => {
                let raw = LENIENT_BASE64.decode(body.trim()).ok()?;
                let text = String::from_utf8(raw).ok()?;
                parse_float_prefix(&text)
            }
            // Foreign or pre-existing data: best-effort numeric parse
            None => parse_float_prefix(token),
        }
    }
}

/// Parses the longest numeric prefix of `input`, `parseFloat`-style.
///
/// Leading whitespace is skipped. Accepts an optional sign, digits with an
/// optional fraction, an optional exponent, or `Infinity`. Trailing garbage
/// is ignored. Returns None when no digits are found.
#[must_use]
pub fn parse_float_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    if s[end..].starts_with("Infinity") {
        let negative = bytes.first() == Some(&b'-');
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts if at least one digit follows it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| !v.is_nan())
}

// =============================================================================
// TESTS
// =============================================================================
