//! HTTP surface for the stockpile inventory service.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod state;
