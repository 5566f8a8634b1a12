//! Facet term codec.
//!
//! Engines index every facet value as a term: a one-character type marker
//! followed by the encoded value. Numeric encodings are fixed-width hex of an
//! order-preserving transform, so comparing terms as strings orders numbers
//! numerically within one type. A term consisting of the marker alone carries
//! no value.

use crate::error::{FacetNavError, Result};
use crate::types::FieldValue;

pub const TEXT_MARKER: char = 's';
pub const LONG_MARKER: char = 'l';
pub const DOUBLE_MARKER: char = 'd';
pub const DATE_MARKER: char = 't';

const SIGN_BIT: u64 = 1 << 63;

/// Term for a plain text value.
pub fn text_term(value: &str) -> String {
    let mut term = String::with_capacity(value.len() + 1);
    term.push(TEXT_MARKER);
    term.push_str(value);
    term
}

/// Terms of a property value: one per single value of a multi-valued
/// property, in property order, duplicates removed.
pub fn encode_terms(value: &FieldValue) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for single in value.values() {
        if let Some(term) = encode_single(single) {
            if !terms.contains(&term) {
                terms.push(term);
            }
        }
    }
    terms
}

/// Term of a single value. Arrays have no single term.
pub fn encode_single(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Text(s) => Some(text_term(s)),
        FieldValue::Integer(i) => Some(format!("{}{}", LONG_MARKER, encode_long(*i))),
        FieldValue::Date(d) => Some(format!("{}{}", DATE_MARKER, encode_long(*d))),
        FieldValue::Float(f) => Some(format!("{}{}", DOUBLE_MARKER, encode_double(*f))),
        FieldValue::Array(_) => None,
    }
}

/// Decode a term back into the value it was produced from.
pub fn decode_term(term: &str) -> Result<FieldValue> {
    let mut chars = term.chars();
    let marker = chars
        .next()
        .ok_or_else(|| FacetNavError::InvalidQuery("empty facet term".to_string()))?;
    let body = chars.as_str();
    match marker {
        TEXT_MARKER => Ok(FieldValue::Text(body.to_string())),
        LONG_MARKER => Ok(FieldValue::Integer(decode_long(body)?)),
        DATE_MARKER => Ok(FieldValue::Date(decode_long(body)?)),
        DOUBLE_MARKER => Ok(FieldValue::Float(decode_double(body)?)),
        other => Err(FacetNavError::InvalidQuery(format!(
            "unknown facet term type '{}' in term '{}'",
            other, term
        ))),
    }
}

/// Human readable property string of a term.
pub fn term_to_property_string(term: &str) -> Result<String> {
    decode_term(term).map(|v| v.to_display_string())
}

fn encode_long(value: i64) -> String {
    hex::encode(((value as u64) ^ SIGN_BIT).to_be_bytes())
}

fn decode_long(body: &str) -> Result<i64> {
    Ok((decode_u64(body)? ^ SIGN_BIT) as i64)
}

fn encode_double(value: f64) -> String {
    let bits = value.to_bits();
    let sortable = if bits & SIGN_BIT != 0 {
        !bits
    } else {
        bits ^ SIGN_BIT
    };
    hex::encode(sortable.to_be_bytes())
}

fn decode_double(body: &str) -> Result<f64> {
    let sortable = decode_u64(body)?;
    let bits = if sortable & SIGN_BIT != 0 {
        sortable ^ SIGN_BIT
    } else {
        !sortable
    };
    Ok(f64::from_bits(bits))
}

fn decode_u64(body: &str) -> Result<u64> {
    let bytes = hex::decode(body)
        .map_err(|e| FacetNavError::InvalidQuery(format!("bad numeric term '{}': {}", body, e)))?;
    let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
        FacetNavError::InvalidQuery(format!("numeric term '{}' is not 8 bytes", body))
    })?;
    Ok(u64::from_be_bytes(raw))
}
