//! services/mod.rs
//! Módulo que agrupa distintos "servicios" o "capas de negocio" de la app.

pub mod auth_service;
pub mod channel_service;
pub mod session_service;
pub mod status_service;
