//! Handlers for the derived report views. Each report is a single SQL
//! aggregate, so every response reflects one consistent snapshot.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use rust_decimal::Decimal;
use serde::Serialize;

use stockpile_db::repositories::ProductRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Total inventory value payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalStockValue {
    pub total_stock_value: Decimal,
}

/// GET /reports/stock-value -- SUM(price * quantity) over the catalog.
pub async fn stock_value(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let total = ProductRepo::total_stock_value(&state.pool).await?;
    Ok(Json(DataResponse {
        data: TotalStockValue {
            total_stock_value: total,
        },
    }))
}

/// GET /reports/category-stock -- total quantity per category.
pub async fn category_stock(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = ProductRepo::category_wise_stock(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}
