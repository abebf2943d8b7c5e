pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod input;
pub mod models;
pub mod pdf;
pub mod routes;
pub mod schema;
pub mod seed;
pub mod state;
pub mod store;
