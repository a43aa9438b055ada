//! Errores de la capa de codificación (escalar y binaria).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    /// Entrada malformada o que excede un límite declarado. Conserva siempre
    /// el valor ofensivo tal como llegó del wire.
    #[error("valor inválido {value:?}: {reason}")]
    Validation { value: String, reason: String },
    /// Mal uso del API por parte del programador. No se reintenta ni se
    /// convierte en respuesta; debe aflorar de inmediato.
    #[error("uso inválido: {0}")]
    Usage(String),
    /// Fallo de E/S durante rollover o lectura de archivos. Se propaga al
    /// llamador sin política de reintento.
    #[error("E/S: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Construye un error de validación con el valor ofensivo.
    pub fn validation(value: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::Validation { value: value.into(),
                                 reason: reason.into() }
    }
}
