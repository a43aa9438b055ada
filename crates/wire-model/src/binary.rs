//! Codificaciones binarias del wire.
//!
//! Cada protocolo encapsula los datos binarios de forma distinta: los
//! protocolos sobre XML suelen usar base64, los HTTP planos entregan los
//! bytes tal cual. El selector `BinaryEncoding` es un conjunto cerrado y se
//! despacha por `match`, nunca por identidad de objeto.

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;

use crate::errors::CodecError;

/// Selector de codificación binaria de un campo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinaryEncoding {
    /// Sin transformación: concatenación cruda de chunks.
    Raw,
    /// Hexadecimal en minúsculas.
    Hex,
    /// Base64 estándar (RFC 4648 §4).
    Base64,
    /// Base64 apto para URLs (RFC 4648 §5).
    UrlsafeBase64,
    /// Centinela: diferir a la sugerencia del protocolo activo.
    #[default]
    UseDefault,
}

impl BinaryEncoding {
    /// Resuelve el selector efectivo: el campo manda salvo que declare
    /// `UseDefault`; una sugerencia `UseDefault` degrada a `Raw`.
    pub fn resolve(self, suggested: BinaryEncoding) -> BinaryEncoding {
        match self {
            BinaryEncoding::UseDefault => match suggested {
                BinaryEncoding::UseDefault => BinaryEncoding::Raw,
                other => other,
            },
            other => other,
        }
    }
}

/// Codifica una secuencia finita de chunks en la variante indicada.
/// `UseDefault` debe resolverse antes; si llega aquí se trata como `Raw`.
pub fn encode_chunks(chunks: &[Vec<u8>], encoding: BinaryEncoding) -> Vec<u8> {
    let joined = chunks.concat();
    match encoding {
        BinaryEncoding::Raw | BinaryEncoding::UseDefault => joined,
        BinaryEncoding::Hex => hex::encode(&joined).into_bytes(),
        BinaryEncoding::Base64 => STANDARD.encode(&joined).into_bytes(),
        BinaryEncoding::UrlsafeBase64 => URL_SAFE.encode(&joined).into_bytes(),
    }
}

/// Decodifica un valor del wire a un único chunk en memoria (no se
/// re-trocea). Entradas malformadas producen `Validation` con el valor
/// ofensivo.
pub fn decode_chunks(value: &[u8], encoding: BinaryEncoding) -> Result<Vec<Vec<u8>>, CodecError> {
    let decoded = match encoding {
        BinaryEncoding::Raw | BinaryEncoding::UseDefault => value.to_vec(),
        BinaryEncoding::Hex => hex::decode(value).map_err(|e| invalid(value, e.to_string()))?,
        BinaryEncoding::Base64 => STANDARD.decode(value).map_err(|e| invalid(value, e.to_string()))?,
        BinaryEncoding::UrlsafeBase64 => URL_SAFE.decode(value).map_err(|e| invalid(value, e.to_string()))?,
    };
    Ok(vec![decoded])
}

fn invalid(value: &[u8], reason: String) -> CodecError {
    CodecError::validation(String::from_utf8_lossy(value), reason)
}
