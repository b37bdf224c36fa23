//! Product models and DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockpile_core::error::CoreError;
use stockpile_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `products` table with its category resolved.
///
/// Every read query LEFT JOINs `categories` so callers get the category
/// name without a second round trip. `category_id`/`category_name` are
/// `None` for products whose category was deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    /// Resolved category name (from JOIN).
    pub category_name: Option<String>,
    pub quantity: i64,
    pub price: Decimal,
    pub supplier_info: Option<String>,
    pub date_added: Timestamp,
    pub last_updated: Timestamp,
}

/// One entry of the category-wise stock report.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStock {
    pub category_name: String,
    pub total_quantity: i64,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub quantity: i64,
    pub price: Decimal,
    pub supplier_info: Option<String>,
}

/// DTO for a partial product update.
///
/// Quantity is deliberately absent: all quantity changes go through the
/// stock adjustment operation so the non-negative invariant is enforced.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub price: Option<Decimal>,
    pub supplier_info: Option<String>,
}

/// Optional listing filters, combined with AND semantics.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    /// Filter by category id.
    pub category_id: Option<DbId>,
    /// Filter by name (case-sensitive substring).
    pub name: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
}

/// DTO for a stock adjustment. Whole units only; fractional JSON numbers
/// fail deserialization before reaching the core.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustStock {
    pub delta: i64,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Outcome of an atomic stock adjustment.
///
/// Domain rejections are data, not `sqlx::Error`: the transaction rolled
/// back cleanly and the caller maps the outcome to its own error type.
#[derive(Debug)]
pub enum StockAdjustment {
    /// The adjustment committed; the product reflects the new quantity.
    Adjusted(Product),
    /// No product with the given id exists.
    NotFound,
    /// The invariant check rejected the adjustment; nothing was written.
    Rejected(CoreError),
}
