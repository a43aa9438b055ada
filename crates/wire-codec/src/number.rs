//! Codecs de números y booleanos.

use wire_model::CodecError;

use crate::attrs::{DecimalAttrs, DoubleAttrs, IntegerAttrs};

fn check_len(s: &str, max: Option<usize>, kind: &str) -> Result<(), CodecError> {
    match max {
        Some(limit) if s.len() > limit => {
            Err(CodecError::validation(s, format!("{kind} de más de {limit} caracteres")))
        }
        _ => Ok(()),
    }
}

pub fn integer_to_string(attrs: &IntegerAttrs, value: i64) -> String {
    match attrs.format {
        Some(f) => f(value),
        None => value.to_string(),
    }
}

pub fn integer_from_string(attrs: &IntegerAttrs, s: &str) -> Result<i64, CodecError> {
    check_len(s, attrs.max_str_len, "entero")?;
    s.parse().map_err(|_| CodecError::validation(s, "no se pudo interpretar como entero"))
}

/// El decimal se respalda en `f64`; ver DESIGN.md por la decisión.
pub fn decimal_to_string(attrs: &DecimalAttrs, value: f64) -> String {
    match attrs.format {
        Some(f) => f(value),
        None => value.to_string(),
    }
}

pub fn decimal_from_string(attrs: &DecimalAttrs, s: &str) -> Result<f64, CodecError> {
    check_len(s, attrs.max_str_len, "decimal")?;
    s.parse().map_err(|_| CodecError::validation(s, "no se pudo interpretar como decimal"))
}

pub fn double_to_string(attrs: &DoubleAttrs, value: f64) -> String {
    match attrs.format {
        Some(f) => f(value),
        None => value.to_string(),
    }
}

pub fn double_from_string(_attrs: &DoubleAttrs, s: &str) -> Result<f64, CodecError> {
    s.parse().map_err(|_| CodecError::validation(s, "no se pudo interpretar como doble"))
}

pub fn boolean_to_string(value: bool) -> String {
    if value { "true".to_string() } else { "false".to_string() }
}

/// Permisivo a propósito: acepta "true" o "1" (sin distinguir mayúsculas)
/// como verdadero y cualquier otra cosa como falso, sin rechazar basura.
pub fn boolean_from_string(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    lower == "true" || lower == "1"
}
