// 🧾 Receipt Model
// Wire payload (strings as submitted) → validated Receipt (typed, exact decimals)

use crate::error::{ReceiptError, Result};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

// ============================================================================
// WIRE TYPES
// ============================================================================

/// Receipt exactly as submitted over HTTP
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptPayload {
    pub retailer: String,
    pub purchase_date: String,
    pub purchase_time: String,
    pub items: Vec<ItemPayload>,
    pub total: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub short_description: String,
    pub price: String,
}

// ============================================================================
// VALIDATED TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub short_description: String,
    pub price: Decimal,
}

impl Item {
    /// Character count of the description without surrounding whitespace
    pub fn trimmed_description_len(&self) -> usize {
        self.short_description.trim().chars().count()
    }
}

/// Validated receipt - the only input the rule engine accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub retailer: String,
    pub purchase_date: NaiveDate,
    pub purchase_time: NaiveTime,
    pub items: Vec<Item>,
    pub total: Decimal,
}

impl TryFrom<ReceiptPayload> for Receipt {
    type Error = ReceiptError;

    fn try_from(payload: ReceiptPayload) -> Result<Self> {
        let purchase_date = parse_date(&payload.purchase_date)?;
        let purchase_time = parse_time(&payload.purchase_time)?;
        let total = parse_amount("total", &payload.total)?;

        let items = payload
            .items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| -> Result<Item> {
                let price = parse_amount(&format!("items[{}].price", idx), &item.price)?;
                Ok(Item {
                    short_description: item.short_description,
                    price,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Receipt {
            retailer: payload.retailer,
            purchase_date,
            purchase_time,
            items,
            total,
        })
    }
}

// ============================================================================
// FIELD PARSERS
// ============================================================================

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|e| {
        ReceiptError::validation("purchaseDate", format!("expected YYYY-MM-DD, got {:?} ({})", raw, e))
    })
}

pub fn parse_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT).map_err(|e| {
        ReceiptError::validation("purchaseTime", format!("expected HH:MM, got {:?} ({})", raw, e))
    })
}

/// Most fractional digits an amount may carry once trailing zeros are dropped
pub const MAX_FRACTION_DIGITS: u32 = 28;

/// Parse a monetary amount without any binary floating-point step
///
/// Accepts plain decimals ("35.35") and scientific notation ("1e2", "1.5E-3").
/// Values that cannot be held exactly are rejected, never rounded.
pub fn parse_amount(field: &str, raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ReceiptError::validation(field, "amount is empty"));
    }

    let invalid = |reason: String| {
        ReceiptError::validation(field, format!("not a decimal amount: {:?} ({})", raw, reason))
    };
    let too_precise = || {
        ReceiptError::validation(
            field,
            format!(
                "{:?} needs more than {} fractional digits or a larger magnitude than can be held exactly",
                raw, MAX_FRACTION_DIGITS
            ),
        )
    };

    let (digits, exponent) = match trimmed.split_once(|c: char| c == 'e' || c == 'E') {
        Some((digits, exponent)) => {
            let exponent = exponent
                .parse::<i64>()
                .map_err(|e| invalid(format!("bad exponent: {}", e)))?;
            (digits, exponent)
        }
        None => (trimmed, 0),
    };

    // Trailing fractional zeros carry no value
    let digits = if digits.contains('.') {
        let stripped = digits.trim_end_matches('0');
        stripped.strip_suffix('.').unwrap_or(stripped)
    } else {
        digits
    };
    let fraction_digits = digits.split_once('.').map_or(0, |(_, fraction)| fraction.len());

    let value = Decimal::from_str_exact(digits).map_err(|e| {
        if fraction_digits > MAX_FRACTION_DIGITS as usize {
            too_precise()
        } else {
            invalid(e.to_string())
        }
    })?;

    if exponent == 0 || value.is_zero() {
        return Ok(value);
    }
    shift_decimal_point(value, exponent).ok_or_else(too_precise)
}

/// value * 10^exponent, exact or not at all
fn shift_decimal_point(value: Decimal, exponent: i64) -> Option<Decimal> {
    let value = value.normalize();
    let scale = i64::from(value.scale()).checked_sub(exponent)?;

    if scale >= 0 {
        let scale = u32::try_from(scale).ok()?;
        Decimal::try_from_i128_with_scale(value.mantissa(), scale).ok()
    } else {
        let factor = u32::try_from(-scale).ok().and_then(|p| 10i128.checked_pow(p))?;
        Decimal::try_from_i128_with_scale(value.mantissa().checked_mul(factor)?, 0).ok()
    }
}

// ============================================================================
// TESTS
// ============================================================================
