//! Repository for the `products` table.
//!
//! Owns every product SQL statement: CRUD with category resolution, the
//! filtered listing query, the atomic stock adjustment, and the report
//! aggregates.

use rust_decimal::Decimal;
use sqlx::PgPool;
use stockpile_core::stock;
use stockpile_core::types::DbId;

use crate::models::product::{
    CategoryStock, CreateProduct, Product, ProductFilter, StockAdjustment, UpdateProduct,
};

/// Column list for joined `products` queries. Expects the product row
/// aliased as `p` and the joined category as `c`.
const PRODUCT_COLUMNS: &str = "\
    p.id, p.name, p.description, p.category_id, c.name AS category_name, \
    p.quantity, p.price, p.supplier_info, p.date_added, p.last_updated";

/// Shared FROM clause resolving each product's category.
const FROM_JOINED: &str = "FROM products p LEFT JOIN categories c ON c.id = p.category_id";

/// Provides CRUD, stock adjustment, and report queries for products.
pub struct ProductRepo;

impl ProductRepo {
    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Create a product. `date_added` and `last_updated` are stamped by the
    /// database; the returned row carries the resolved category.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "WITH p AS (\
                INSERT INTO products (\
                    name, description, category_id, quantity, price, supplier_info\
                ) VALUES ($1, $2, $3, $4, $5, $6) \
                RETURNING *\
             ) \
             SELECT {PRODUCT_COLUMNS} FROM p \
             LEFT JOIN categories c ON c.id = p.category_id"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&input.name)
            .bind(input.description.as_deref())
            .bind(input.category_id)
            .bind(input.quantity)
            .bind(input.price)
            .bind(input.supplier_info.as_deref())
            .fetch_one(pool)
            .await
    }

    /// Find a product by id with its category resolved.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {PRODUCT_COLUMNS} {FROM_JOINED} WHERE p.id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List products matching the conjunction of all supplied filters.
    ///
    /// Omitted filters impose no constraint; an empty filter set returns
    /// every product. Ordered by id so repeated calls against an unchanged
    /// data set are stable.
    pub async fn list(pool: &PgPool, filter: &ProductFilter) -> Result<Vec<Product>, sqlx::Error> {
        // Build dynamic WHERE clauses.
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if filter.category_id.is_some() {
            conditions.push(format!("p.category_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.name.is_some() {
            conditions.push(format!("p.name LIKE ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.min_price.is_some() {
            conditions.push(format!("p.price >= ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.max_price.is_some() {
            conditions.push(format!("p.price <= ${bind_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query =
            format!("SELECT {PRODUCT_COLUMNS} {FROM_JOINED} {where_clause} ORDER BY p.id");

        let mut q = sqlx::query_as::<_, Product>(&query);

        // Bind dynamic parameters in order.
        if let Some(category_id) = filter.category_id {
            q = q.bind(category_id);
        }
        if let Some(ref name) = filter.name {
            q = q.bind(format!("%{name}%"));
        }
        if let Some(min_price) = filter.min_price {
            q = q.bind(min_price);
        }
        if let Some(max_price) = filter.max_price {
            q = q.bind(max_price);
        }

        q.fetch_all(pool).await
    }

    /// Partially update a product and re-stamp `last_updated`.
    /// Returns the updated row, or `None` if not found.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "WITH p AS (\
                UPDATE products SET \
                    name = COALESCE($2, name), \
                    description = COALESCE($3, description), \
                    category_id = COALESCE($4, category_id), \
                    price = COALESCE($5, price), \
                    supplier_info = COALESCE($6, supplier_info), \
                    last_updated = NOW() \
                WHERE id = $1 \
                RETURNING *\
             ) \
             SELECT {PRODUCT_COLUMNS} FROM p \
             LEFT JOIN categories c ON c.id = p.category_id"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.description.as_deref())
            .bind(input.category_id)
            .bind(input.price)
            .bind(input.supplier_info.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Delete a product by id. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Stock adjustment
    // -----------------------------------------------------------------------

    /// Atomically apply a signed quantity delta.
    ///
    /// The `FOR UPDATE` read locks the product row for the duration of the
    /// transaction, so concurrent adjustments on the same product serialize
    /// (each sees the prior committed quantity) while adjustments on
    /// different products never contend. A rejected adjustment rolls back
    /// without writing anything.
    pub async fn adjust_stock(
        pool: &PgPool,
        id: DbId,
        delta: i64,
    ) -> Result<StockAdjustment, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row: Option<(i64,)> =
            sqlx::query_as("SELECT quantity FROM products WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((current,)) = row else {
            tx.rollback().await?;
            return Ok(StockAdjustment::NotFound);
        };

        let candidate = match stock::apply_delta(current, delta) {
            Ok(quantity) => quantity,
            Err(err) => {
                tx.rollback().await?;
                tracing::debug!(id, delta, current, "Stock adjustment rolled back");
                return Ok(StockAdjustment::Rejected(err));
            }
        };

        sqlx::query("UPDATE products SET quantity = $2, last_updated = NOW() WHERE id = $1")
            .bind(id)
            .bind(candidate)
            .execute(&mut *tx)
            .await?;

        // Read the joined row inside the transaction so the returned
        // product reflects exactly the committed state.
        let query = format!("SELECT {PRODUCT_COLUMNS} {FROM_JOINED} WHERE p.id = $1");
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(StockAdjustment::Adjusted(product))
    }

    // -----------------------------------------------------------------------
    // Reports
    // -----------------------------------------------------------------------

    /// Total inventory value: SUM(price * quantity) over all products.
    /// Zero for an empty product set. NUMERIC end to end, no float drift.
    pub async fn total_stock_value(pool: &PgPool) -> Result<Decimal, sqlx::Error> {
        let row: (Decimal,) =
            sqlx::query_as("SELECT COALESCE(SUM(price * quantity), 0) FROM products")
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// All products with zero quantity, category-resolved.
    pub async fn out_of_stock(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!("SELECT {PRODUCT_COLUMNS} {FROM_JOINED} WHERE p.quantity = 0 ORDER BY p.id");
        sqlx::query_as::<_, Product>(&query).fetch_all(pool).await
    }

    /// All products with quantity strictly below `threshold`. A threshold
    /// of zero or less legally yields an empty result.
    pub async fn low_stock(pool: &PgPool, threshold: i64) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!("SELECT {PRODUCT_COLUMNS} {FROM_JOINED} WHERE p.quantity < $1 ORDER BY p.id");
        sqlx::query_as::<_, Product>(&query)
            .bind(threshold)
            .fetch_all(pool)
            .await
    }

    /// Total quantity per category, grouped by category name.
    ///
    /// Products whose category was deleted carry a NULL `category_id` and
    /// are excluded by the inner join. One statement, one snapshot.
    pub async fn category_wise_stock(pool: &PgPool) -> Result<Vec<CategoryStock>, sqlx::Error> {
        sqlx::query_as::<_, CategoryStock>(
            "SELECT c.name AS category_name, SUM(p.quantity)::BIGINT AS total_quantity \
             FROM products p \
             JOIN categories c ON c.id = p.category_id \
             GROUP BY c.name \
             ORDER BY c.name",
        )
        .fetch_all(pool)
        .await
    }
}
