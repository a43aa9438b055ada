//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable (`CONFIG`)
//! con los parámetros del pipeline: tamaño máximo de petición y codificación
//! binaria por defecto para los campos que difieren al protocolo.
use once_cell::sync::Lazy;
use std::env;

use wire_model::BinaryEncoding;

/// Configuración global de la aplicación (extensible para más secciones: logging, etc.).
pub struct AppConfig {
    /// Configuración específica del pipeline de peticiones.
    pub pipeline: PipelineConfig,
}

/// Parámetros del pipeline de peticiones.
pub struct PipelineConfig {
    /// Longitud máxima en bytes de una petición entrante.
    pub max_request_len: usize,
    /// Codificación binaria sugerida cuando el campo no declara una.
    pub default_binary_encoding: BinaryEncoding,
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    let max_request_len = env::var("WIREFLOW_MAX_REQUEST_LEN").ok()
        .and_then(|v| v.parse().ok()).unwrap_or(2 * 1024 * 1024);
    let default_binary_encoding = env::var("WIREFLOW_BINARY_ENCODING").ok()
        .map(|v| parse_encoding(&v)).unwrap_or(BinaryEncoding::Base64);
    AppConfig {
        pipeline: PipelineConfig { max_request_len, default_binary_encoding },
    }
});

fn parse_encoding(value: &str) -> BinaryEncoding {
    match value.to_ascii_lowercase().as_str() {
        "raw" => BinaryEncoding::Raw,
        "hex" => BinaryEncoding::Hex,
        "urlsafe_base64" => BinaryEncoding::UrlsafeBase64,
        _ => BinaryEncoding::Base64,
    }
}
