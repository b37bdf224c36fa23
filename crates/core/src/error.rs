use crate::types::DbId;

/// Domain error taxonomy for the inventory core.
///
/// Every failure a mutation or query can produce is one of these variants,
/// so the HTTP layer can map each kind to a distinct status code instead of
/// collapsing everything into an opaque 500.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient stock: {available} available, adjustment of {requested} requested")]
    InsufficientStock { available: i64, requested: i64 },

    #[error("Category with id {category_id} does not exist")]
    UnknownCategory { category_id: DbId },

    #[error("Conflicting concurrent write, retry the operation: {0}")]
    Conflict(String),
}
