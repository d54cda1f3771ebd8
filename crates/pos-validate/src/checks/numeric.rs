//! Decimal and integer field checks.
//!
//! Decimal fields (prices) must parse, must not be negative, and should carry
//! at most two fractional digits. Integer fields (stock) must parse; a
//! negative quantity is only a warning.

use pos_model::{FieldKind, TargetField};

use super::Finding;

/// Maximum fractional digits before a decimal is flagged.
const MAX_FRACTION_DIGITS: usize = 2;

/// A parsed decimal literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalParts {
    pub negative: bool,
    pub fraction_digits: usize,
}

/// Parses `[+-]digits[.digits]`, allowing a leading `$` after the sign.
///
/// Returns `None` for anything else, including exponents and `NaN`.
pub fn parse_decimal(value: &str) -> Option<DecimalParts> {
    let trimmed = value.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let unsigned = unsigned.strip_prefix('$').unwrap_or(unsigned);

    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (unsigned, ""),
    };
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !all_digits(whole) || !all_digits(fraction) {
        return None;
    }
    Some(DecimalParts {
        negative,
        fraction_digits: fraction.len(),
    })
}

/// Checks one non-blank value of a numeric field.
pub fn check(field: &TargetField, value: &str) -> Vec<Finding> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    match field.kind {
        FieldKind::Decimal => check_decimal(field, trimmed),
        FieldKind::Integer => check_integer(field, trimmed),
        FieldKind::Text | FieldKind::Barcode => Vec::new(),
    }
}

fn check_decimal(field: &TargetField, value: &str) -> Vec<Finding> {
    let Some(parts) = parse_decimal(value) else {
        return vec![Finding::NotANumber {
            kind: field.kind,
            value: value.to_string(),
        }];
    };

    let mut findings = Vec::new();
    if parts.negative && !is_zero(value) {
        findings.push(Finding::NegativeAmount {
            value: value.to_string(),
        });
    }
    if parts.fraction_digits > MAX_FRACTION_DIGITS {
        findings.push(Finding::TooManyDecimals {
            value: value.to_string(),
        });
    }
    findings
}

fn check_integer(field: &TargetField, value: &str) -> Vec<Finding> {
    match value.parse::<i64>() {
        Ok(n) if n < 0 => vec![Finding::NegativeQuantity {
            value: value.to_string(),
        }],
        Ok(_) => Vec::new(),
        Err(_) => vec![Finding::NotANumber {
            kind: field.kind,
            value: value.to_string(),
        }],
    }
}

fn is_zero(value: &str) -> bool {
    value.chars().all(|c| matches!(c, '0' | '.' | '-' | '+' | '$'))
}
