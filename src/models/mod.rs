//! models/mod.rs
//! Módulo raíz para modelos/estructuras compartidas.

pub mod auth_model;
pub mod channel_model;
pub mod status_model;
