//! Handlers for category grouping. Pass-through CRUD; the only behaviour
//! worth noting is deletion, which un-scopes referencing products instead
//! of cascading.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use stockpile_core::error::CoreError;
use stockpile_core::stock;
use stockpile_core::types::DbId;
use stockpile_db::models::category::{CreateCategory, UpdateCategory};
use stockpile_db::repositories::CategoryRepo;

use crate::auth::MutatorGate;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// List all categories.
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: items }))
}

/// Create a new category.
pub async fn create_category(
    _gate: MutatorGate,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    stock::validate_name(&input.name)?;
    let created = CategoryRepo::create(&state.pool, &input).await?;
    tracing::info!(id = created.id, name = %created.name, "Category created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// Get a single category by id.
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Category",
                id,
            })
        })?;
    Ok(Json(DataResponse { data: category }))
}

/// Rename a category.
pub async fn update_category(
    _gate: MutatorGate,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref name) = input.name {
        stock::validate_name(name)?;
    }
    let updated = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Category",
                id,
            })
        })?;
    tracing::info!(id = updated.id, "Category updated");
    Ok(Json(DataResponse { data: updated }))
}

/// Delete a category. Referencing products keep their data but lose the
/// category link.
pub async fn delete_category(
    _gate: MutatorGate,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !CategoryRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }));
    }
    tracing::info!(id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}
