pub mod config;
pub mod error;
pub mod models;
pub mod notifier;
pub mod routes;
pub mod store;
pub mod telemetry;
