use std::fmt;

use serde::{Deserialize, Serialize};

/// A single stock record.
///
/// Items are persisted exactly as they appear here: a JSON object with the
/// keys `name`, `stock` and `price`. The display index shown in the table is
/// derived from list position at render time and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Item name, non-empty.
    pub name: String,
    /// Units in stock.
    pub stock: u32,
    /// Unit price, non-negative.
    pub price: f64,
}

impl Item {
    /// Create a new item.
    pub fn new(name: impl Into<String>, stock: u32, price: f64) -> Self {
        Self {
            name: name.into(),
            stock,
            price,
        }
    }
}

/// Reasons an item submission can be rejected.
///
/// The Display messages are user-facing; they end up in the danger banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyName,
    InvalidStock,
    NegativeStock,
    InvalidPrice,
    NegativePrice,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "item name must not be empty"),
            Self::InvalidStock => write!(f, "stock must be a whole number"),
            Self::NegativeStock => write!(f, "stock must not be negative"),
            Self::InvalidPrice => write!(f, "price must be a number"),
            Self::NegativePrice => write!(f, "price must not be negative"),
        }
    }
}

impl std::error::Error for ValidationError {}

/* # Why a pure validation function?

Validation takes the raw form field strings and produces either an Item or a
rejection. No I/O, no rendering, no store access, so it can be tested on its
own and the request handler stays a thin dispatcher.
*/

/// Validate raw form fields and build an [`Item`].
///
/// Rules:
/// - `name` must be non-empty after trimming
/// - `stock` must parse as an integer and be >= 0
/// - `price` must parse as a finite number and be >= 0
///
/// Any failure leaves the caller's item list untouched; nothing is partially
/// applied.
pub fn validate_submission(name: &str, stock: &str, price: &str) -> Result<Item, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let stock_value: i64 = stock
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidStock)?;
    if stock_value < 0 {
        return Err(ValidationError::NegativeStock);
    }
    let stock_value =
        u32::try_from(stock_value).map_err(|_| ValidationError::InvalidStock)?;

    let price_value: f64 = price
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidPrice)?;
    // "nan" and "inf" parse successfully as f64, reject them explicitly
    if !price_value.is_finite() {
        return Err(ValidationError::InvalidPrice);
    }
    if price_value < 0.0 {
        return Err(ValidationError::NegativePrice);
    }

    Ok(Item::new(name, stock_value, price_value))
}
