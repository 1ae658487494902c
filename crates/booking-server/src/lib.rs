pub mod auth;
pub mod booking;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod store;

pub use config::Config;
pub use db::DbPool;
