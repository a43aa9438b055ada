//! Falla de negocio: el único error que se serializa de vuelta al llamador
//! como respuesta válida, a diferencia de un crash.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use wire_model::CodecError;

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct Fault {
    /// Código jerárquico al estilo SOAP ("Client.ValidationError").
    pub code: String,
    pub message: String,
    /// Carga auxiliar opcional para el documento de falla.
    pub detail: Option<Value>,
}

impl Fault {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code: code.into(),
               message: message.into(),
               detail: None }
    }

    /// Falla atribuible al llamador.
    pub fn client(message: impl Into<String>) -> Self {
        Self::new("Client", message)
    }

    /// Falla interna del servicio.
    pub fn server(message: impl Into<String>) -> Self {
        Self::new("Server", message)
    }

    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

impl From<CodecError> for Fault {
    fn from(err: CodecError) -> Self {
        match &err {
            CodecError::Validation { .. } => Fault::new("Client.ValidationError", err.to_string()),
            CodecError::Usage(_) | CodecError::Io(_) => Fault::server(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_code_and_message() {
        let f = Fault::new("Client.ValidationError", "valor inválido");
        assert_eq!(f.to_string(), "Client.ValidationError: valor inválido");
    }

    #[test]
    fn codec_validation_maps_to_client_fault() {
        let f: Fault = CodecError::validation("xyz", "malformado").into();
        assert_eq!(f.code, "Client.ValidationError");
        assert!(f.message.contains("xyz"));
    }

    #[test]
    fn codec_usage_maps_to_server_fault() {
        let f: Fault = CodecError::Usage("mal uso".into()).into();
        assert_eq!(f.code, "Server");
    }
}
