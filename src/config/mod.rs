//! config/mod.rs
pub mod dashboard_config;
