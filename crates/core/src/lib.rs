//! Pure domain logic for the stockpile inventory engine.
//!
//! No I/O lives here: the error taxonomy, shared id/timestamp types, and the
//! stock invariant checks that every mutation must pass before it reaches
//! the database.

pub mod error;
pub mod stock;
pub mod types;
