use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::ops::Bound;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Fractional digits kept for prices
pub const PRICE_SCALE: u32 = 2;

/// Lower bound (exclusive) for luxury products
pub const LUXURY_PRICE_THRESHOLD: i64 = 5000;

/// Upper bound (exclusive) for affordable products
pub const AFFORDABLE_PRICE_THRESHOLD: i64 = 500;

/// Default bounds for the price-range filter
pub const DEFAULT_MIN_PRICE: i64 = 5000;
pub const DEFAULT_MAX_PRICE: i64 = 8000;

/// Product as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier, assigned at creation
    pub id: Uuid,
    /// Product name
    #[schema(example = "iPhone 14 Pro Max")]
    pub name: String,
    /// Unit price, serialized as a decimal string
    #[schema(value_type = String, example = "8500.00")]
    pub price: Decimal,
    /// Units in stock
    pub quantity: i64,
    /// Whether the product is available
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored representation of a product
///
/// `id` is the lookup key (unique index); Mongo's own `_id` is left to the
/// server. Prices are kept in minor units so range queries stay exact, with
/// the number of fractional digits the caller wrote (0..=2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDocument {
    #[serde(with = "uuid_as_string")]
    pub id: Uuid,
    pub name: String,
    pub price_cents: i64,
    #[serde(default = "default_price_scale")]
    pub price_scale: u32,
    pub quantity: i64,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_price_scale() -> u32 {
    PRICE_SCALE
}

/// Ids are stored as hyphenated strings whichever BSON serializer is used.
mod uuid_as_string {
    use serde::{Deserialize, Deserializer, Serializer};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(id: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Uuid::parse_str(&raw).map_err(serde::de::Error::custom)
    }
}

impl ProductDocument {
    /// Build a new document from validated input, stamping id and timestamps.
    pub fn new(input: CreateProduct, price_cents: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            price_scale: price_scale(input.price),
            name: input.name,
            price_cents,
            quantity: input.quantity,
            status: input.status,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<ProductDocument> for Product {
    fn from(doc: ProductDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            price: cents_to_price(doc.price_cents, doc.price_scale),
            quantity: doc.quantity,
            status: doc.status,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

fn default_status() -> bool {
    true
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateProduct {
    #[validate(length(min = 1, message = "name must not be empty"))]
    #[schema(example = "iPhone 14 Pro Max")]
    pub name: String,
    /// Accepts a JSON number or a decimal string
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = String, example = "8500.00")]
    pub price: Decimal,
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    #[schema(example = 10)]
    pub quantity: i64,
    #[serde(default = "default_status")]
    #[schema(default = true)]
    pub status: bool,
}

/// DTO for a partial update. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: Option<i64>,
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = Option<String>, example = "7500.00")]
    pub price: Option<Decimal>,
    pub status: Option<bool>,
    /// Overrides the automatic `updated_at` stamp
    pub updated_at: Option<DateTime<Utc>>,
}

impl UpdateProduct {
    /// True when no recognized field was supplied
    pub fn is_empty(&self) -> bool {
        self.quantity.is_none()
            && self.price.is_none()
            && self.status.is_none()
            && self.updated_at.is_none()
    }
}

/// Normalized partial update handed to the repository.
///
/// `None` fields are left untouched; `updated_at` is always written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_scale: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

/// Price bounds in minor units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Bound<i64>,
    pub max: Bound<i64>,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: Bound::Unbounded,
            max: Bound::Unbounded,
        }
    }
}

impl PriceRange {
    /// `min <= price <= max`, both in major units
    pub fn inclusive(min: Decimal, max: Decimal) -> Self {
        Self {
            min: Bound::Included(lower_bound_cents(min)),
            max: Bound::Included(upper_bound_cents(max)),
        }
    }

    /// `price > min`
    pub fn above(min_cents: i64) -> Self {
        Self {
            min: Bound::Excluded(min_cents),
            max: Bound::Unbounded,
        }
    }

    /// `price < max`
    pub fn below(max_cents: i64) -> Self {
        Self {
            min: Bound::Unbounded,
            max: Bound::Excluded(max_cents),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self.min, Bound::Unbounded) && matches!(self.max, Bound::Unbounded)
    }

    pub fn contains(&self, cents: i64) -> bool {
        let above_min = match self.min {
            Bound::Included(min) => cents >= min,
            Bound::Excluded(min) => cents > min,
            Bound::Unbounded => true,
        };
        let below_max = match self.max {
            Bound::Included(max) => cents <= max,
            Bound::Excluded(max) => cents < max,
            Bound::Unbounded => true,
        };
        above_min && below_max
    }
}

/// Store query. Empty filter matches every product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive literal substring of the name
    pub name: Option<String>,
    pub price: PriceRange,
}

impl ProductFilter {
    pub fn price(price: PriceRange) -> Self {
        Self { name: None, price }
    }

    pub fn name_contains(term: impl Into<String>) -> Self {
        Self {
            name: Some(term.into()),
            price: PriceRange::default(),
        }
    }
}

/// Query parameters for listing products
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Case-insensitive substring of the product name
    pub name: Option<String>,
    /// Inclusive lower price bound
    #[param(value_type = Option<String>)]
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound
    #[param(value_type = Option<String>)]
    pub max_price: Option<Decimal>,
}

impl From<ListQuery> for ProductFilter {
    fn from(query: ListQuery) -> Self {
        Self {
            name: query.name.filter(|name| !name.is_empty()),
            price: PriceRange {
                min: query
                    .min_price
                    .map_or(Bound::Unbounded, |min| Bound::Included(lower_bound_cents(min))),
                max: query
                    .max_price
                    .map_or(Bound::Unbounded, |max| Bound::Included(upper_bound_cents(max))),
            },
        }
    }
}

fn default_min_price() -> Decimal {
    Decimal::from(DEFAULT_MIN_PRICE)
}

fn default_max_price() -> Decimal {
    Decimal::from(DEFAULT_MAX_PRICE)
}

/// Query parameters for the price-range filter
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PriceRangeQuery {
    /// Inclusive lower bound
    #[serde(default = "default_min_price")]
    #[param(value_type = String, default = "5000")]
    pub min_price: Decimal,
    /// Inclusive upper bound
    #[serde(default = "default_max_price")]
    #[param(value_type = String, default = "8000")]
    pub max_price: Decimal,
}

/// Query parameters for name search
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Term to look for in product names
    pub q: String,
}

/// Rejects non-positive prices and prices with more than two decimal places.
fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        return Err(ValidationError::new("price_positive")
            .with_message("price must be greater than 0".into()));
    }
    if price_to_cents(*price).is_none() {
        return Err(ValidationError::new("price_precision")
            .with_message("price must have at most 2 decimal places".into()));
    }
    Ok(())
}

/// Convert a price to minor units; `None` if it has more than two decimals
/// or does not fit.
pub fn price_to_cents(price: Decimal) -> Option<i64> {
    if price.normalize().scale() > PRICE_SCALE {
        return None;
    }
    price.checked_mul(Decimal::ONE_HUNDRED)?.to_i64()
}

/// Fractional digits to echo back for `price`, capped at two
pub fn price_scale(price: Decimal) -> u32 {
    price.scale().min(PRICE_SCALE)
}

/// Rebuild a price from minor units, written with `scale` fractional digits
pub fn cents_to_price(cents: i64, scale: u32) -> Decimal {
    let mut price = Decimal::new(cents, PRICE_SCALE);
    if scale < PRICE_SCALE && price.normalize().scale() <= scale {
        price.rescale(scale);
    }
    price
}

/// Smallest whole cent amount `>= price`
fn lower_bound_cents(price: Decimal) -> i64 {
    price
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.ceil().to_i64())
        .unwrap_or(if price.is_sign_negative() { i64::MIN } else { i64::MAX })
}

/// Largest whole cent amount `<= price`
fn upper_bound_cents(price: Decimal) -> i64 {
    price
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.floor().to_i64())
        .unwrap_or(if price.is_sign_negative() { i64::MIN } else { i64::MAX })
}
