//! Configuración inmutable por campo.
//!
//! Enumera cada opción reconocida por los codecs y su efecto. El llamador
//! construye una instancia (o usa `Default`) y la pasa a cada función; nada
//! aquí es mutable ni compartido entre peticiones.

use chrono::FixedOffset;
use wire_model::BinaryEncoding;

/// Opciones de los enteros.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerAttrs {
    /// Longitud máxima de la cadena entrante, verificada antes de parsear.
    pub max_str_len: Option<usize>,
    /// Formato de salida; por defecto la forma decimal canónica.
    pub format: Option<fn(i64) -> String>,
}

/// Opciones de los decimales.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalAttrs {
    pub max_str_len: Option<usize>,
    pub format: Option<fn(f64) -> String>,
}

/// Opciones de los dobles. Sin límite de longitud (igual que el original).
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleAttrs {
    pub format: Option<fn(f64) -> String>,
}

/// Codificación de bytes declarada para campos de texto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Ascii,
}

/// Qué hacer ante bytes indecodificables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Error de validación.
    #[default]
    Strict,
    /// Sustituir por U+FFFD.
    Replace,
}

/// Opciones de cadenas y texto unicode.
#[derive(Debug, Clone, Default)]
pub struct StringAttrs {
    /// Codificación de bytes declarada; requerida para convertir a bytes.
    pub encoding: Option<TextEncoding>,
    pub errors: DecodePolicy,
    /// Plantilla envolvente con un único hueco `{}`.
    pub format: Option<String>,
}

/// Opciones de hora del día. Reservado; la gramática ISO no admite opciones.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeAttrs {}

/// Opciones de fecha-hora.
#[derive(Debug, Clone)]
pub struct DateTimeAttrs {
    /// Formato strftime que reemplaza a ISO en ambas direcciones.
    pub format: Option<String>,
    /// Plantilla envolvente aplicada al final (sólo salida).
    pub string_format: Option<String>,
    /// Conversión "observar como esta zona" antes de formatear.
    pub as_timezone: Option<FixedOffset>,
    /// Si es `false`, se descarta la información de zona por completo.
    pub timezone: bool,
}

impl Default for DateTimeAttrs {
    fn default() -> Self {
        Self { format: None,
               string_format: None,
               as_timezone: None,
               timezone: true }
    }
}

/// Opciones de fecha.
#[derive(Debug, Clone)]
pub struct DateAttrs {
    /// Formato strftime de la fecha.
    pub format: String,
}

impl Default for DateAttrs {
    fn default() -> Self {
        Self { format: "%Y-%m-%d".to_string() }
    }
}

/// Opciones de campos binarios.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteArrayAttrs {
    /// Selector de codificación; `UseDefault` difiere al protocolo activo.
    pub encoding: BinaryEncoding,
}
