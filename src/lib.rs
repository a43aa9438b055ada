//! Wireflow Rust Library
//!
//! Este crate actúa como la capa de aplicación de Wireflow:
//! - Expone `config` con la configuración global del pipeline.
//! - Expone `protocols` con el protocolo JSON plano de referencia.
//!
//! Los núcleos reutilizables viven en `wire-model` (valores de transporte),
//! `wire-codec` (codificación escalar) y `wire-server` (orquestación).

pub mod config;
pub mod protocols;
