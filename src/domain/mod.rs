//! Core domain types and logic.

pub mod record;
pub mod clean;
pub mod prices;
pub mod universe;
pub mod error;
