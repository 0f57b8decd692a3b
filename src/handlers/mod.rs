//! handlers/mod.rs
pub mod auth_handler;
pub mod channel_handler;
pub mod dashboard_handler;
pub mod stats_handler;
