//! Domain types and DTOs

pub mod drinks;

pub use drinks::*;
