//! Handlers for the product catalog: CRUD, filtered listing, stock
//! adjustment, and the stock-level listings.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use serde::Deserialize;

use stockpile_core::error::CoreError;
use stockpile_core::stock;
use stockpile_core::types::DbId;
use stockpile_db::models::product::{
    AdjustStock, CreateProduct, Product, ProductFilter, StockAdjustment, UpdateProduct,
};
use stockpile_db::repositories::{CategoryRepo, ProductRepo};

use crate::auth::MutatorGate;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Query parameters for the low-stock listing.
#[derive(Debug, Deserialize)]
pub struct LowStockParams {
    /// Replenishment cutoff; products strictly below it are flagged.
    pub threshold: Option<i64>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Verify that a product exists, returning the full row.
async fn ensure_product_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Product> {
    ProductRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        })
    })
}

/// Verify that a referenced category exists before a write is committed.
async fn ensure_category_exists(pool: &sqlx::PgPool, category_id: DbId) -> AppResult<()> {
    if !CategoryRepo::exists(pool, category_id).await? {
        return Err(AppError::Core(CoreError::UnknownCategory { category_id }));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// GET /products
// ---------------------------------------------------------------------------

/// List products matching the optional filters (AND semantics).
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> AppResult<impl IntoResponse> {
    let items = ProductRepo::list(&state.pool, &filter).await?;
    tracing::debug!(count = items.len(), "Listed products");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /products
// ---------------------------------------------------------------------------

/// Create a new product.
pub async fn create_product(
    _gate: MutatorGate,
    State(state): State<AppState>,
    Json(input): Json<CreateProduct>,
) -> AppResult<impl IntoResponse> {
    stock::validate_name(&input.name)?;
    stock::validate_price(input.price)?;
    stock::validate_quantity(input.quantity)?;
    if let Some(category_id) = input.category_id {
        ensure_category_exists(&state.pool, category_id).await?;
    }

    let created = ProductRepo::create(&state.pool, &input).await?;
    tracing::info!(id = created.id, name = %created.name, "Product created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /products/{id}
// ---------------------------------------------------------------------------

/// Get a single product by id.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let product = ensure_product_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: product }))
}

// ---------------------------------------------------------------------------
// PUT /products/{id}
// ---------------------------------------------------------------------------

/// Partially update a product's descriptive fields and price.
pub async fn update_product(
    _gate: MutatorGate,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProduct>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref name) = input.name {
        stock::validate_name(name)?;
    }
    if let Some(price) = input.price {
        stock::validate_price(price)?;
    }
    if let Some(category_id) = input.category_id {
        ensure_category_exists(&state.pool, category_id).await?;
    }

    let updated = ProductRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Product",
                id,
            })
        })?;
    tracing::info!(id = updated.id, "Product updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /products/{id}
// ---------------------------------------------------------------------------

/// Delete a product. Unconditional; a second delete reports not found.
pub async fn delete_product(
    _gate: MutatorGate,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ProductRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }));
    }
    tracing::info!(id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /products/{id}/stock
// ---------------------------------------------------------------------------

/// Apply a signed quantity delta atomically.
pub async fn adjust_stock(
    _gate: MutatorGate,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AdjustStock>,
) -> AppResult<impl IntoResponse> {
    match ProductRepo::adjust_stock(&state.pool, id, input.delta).await? {
        StockAdjustment::Adjusted(product) => {
            tracing::info!(id, delta = input.delta, quantity = product.quantity, "Stock adjusted");
            Ok(Json(DataResponse { data: product }))
        }
        StockAdjustment::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        })),
        StockAdjustment::Rejected(err) => {
            tracing::debug!(id, delta = input.delta, %err, "Stock adjustment rejected");
            Err(AppError::Core(err))
        }
    }
}

// ---------------------------------------------------------------------------
// GET /products/low-stock
// ---------------------------------------------------------------------------

/// List products below the replenishment threshold (default 10).
pub async fn low_stock(
    State(state): State<AppState>,
    Query(params): Query<LowStockParams>,
) -> AppResult<impl IntoResponse> {
    let threshold = params
        .threshold
        .unwrap_or(stock::DEFAULT_LOW_STOCK_THRESHOLD);
    let items = ProductRepo::low_stock(&state.pool, threshold).await?;
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /products/out-of-stock
// ---------------------------------------------------------------------------

/// List products with zero quantity.
pub async fn out_of_stock(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = ProductRepo::out_of_stock(&state.pool).await?;
    Ok(Json(DataResponse { data: items }))
}
