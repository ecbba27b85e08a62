//! Drink menu API guarded by Auth0-issued, permission-scoped JWTs.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod store;
