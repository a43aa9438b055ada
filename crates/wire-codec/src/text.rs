//! Codecs de texto y cadenas de bytes con codificación declarada.

use wire_model::CodecError;

use crate::attrs::{DecodePolicy, StringAttrs, TextEncoding};

/// Aplica una plantilla envolvente con un único hueco `{}`.
pub(crate) fn apply_wrapper(template: &str, value: &str) -> String {
    if template.contains("{}") {
        template.replacen("{}", value, 1)
    } else {
        template.to_string()
    }
}

/// Texto nativo a su forma de wire, con plantilla opcional.
pub fn unicode_to_string(attrs: &StringAttrs, value: &str) -> String {
    match &attrs.format {
        Some(template) => apply_wrapper(template, value),
        None => value.to_string(),
    }
}

/// Texto nativo a bytes según la codificación declarada (UTF-8 si no hay),
/// con la plantilla aplicada antes de codificar.
pub fn unicode_to_bytes(attrs: &StringAttrs, value: &str) -> Result<Vec<u8>, CodecError> {
    let shaped = unicode_to_string(attrs, value);
    match attrs.encoding {
        None | Some(TextEncoding::Utf8) => Ok(shaped.into_bytes()),
        Some(TextEncoding::Ascii) => {
            if shaped.is_ascii() {
                Ok(shaped.into_bytes())
            } else {
                Err(CodecError::validation(shaped, "contiene caracteres fuera de ASCII"))
            }
        }
    }
}

/// Bytes del wire a texto nativo según la codificación declarada.
pub fn unicode_from_bytes(attrs: &StringAttrs, value: &[u8]) -> Result<String, CodecError> {
    match (attrs.encoding.unwrap_or(TextEncoding::Utf8), attrs.errors) {
        (TextEncoding::Utf8, DecodePolicy::Strict) => {
            String::from_utf8(value.to_vec())
                .map_err(|e| CodecError::validation(String::from_utf8_lossy(value), e.to_string()))
        }
        (TextEncoding::Utf8, DecodePolicy::Replace) => Ok(String::from_utf8_lossy(value).into_owned()),
        (TextEncoding::Ascii, policy) => {
            if value.is_ascii() {
                Ok(String::from_utf8_lossy(value).into_owned())
            } else if policy == DecodePolicy::Replace {
                Ok(value.iter()
                        .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
                        .collect())
            } else {
                Err(CodecError::validation(String::from_utf8_lossy(value),
                                           "contiene bytes fuera de ASCII"))
            }
        }
    }
}

/// Cadena de bytes: exige una codificación declarada para poder convertir.
pub fn string_to_bytes(attrs: &StringAttrs, value: &str) -> Result<Vec<u8>, CodecError> {
    if attrs.encoding.is_none() {
        return Err(CodecError::Usage("hace falta declarar una codificación para convertir texto entrante a bytes".into()));
    }
    unicode_to_bytes(attrs, value)
}

/// Envuelve la forma textual de un primitivo en una secuencia de un chunk;
/// la ausencia de valor produce un único chunk vacío.
pub fn simple_to_chunks(value: Option<String>) -> Vec<Vec<u8>> {
    match value {
        Some(s) => vec![s.into_bytes()],
        None => vec![Vec::new()],
    }
}

/// Los valores estructurados no se aplanan a una cadena: es un defecto del
/// programador pedirlo, no un fallo de validación.
pub fn complex_to_string<T>(_value: &T) -> Result<String, CodecError> {
    Err(CodecError::Usage("sólo los primitivos se serializan a cadena".into()))
}

pub fn complex_from_string<T>(_s: &str) -> Result<T, CodecError> {
    Err(CodecError::Usage("sólo los primitivos se deserializan desde cadena".into()))
}
