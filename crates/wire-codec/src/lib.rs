//! wire-codec: conversión determinista valor↔cadena por tipo primitivo.
//!
//! Cada tipo primitivo expone un par `*_to_string` / `*_from_string`, puro y
//! sin efectos salvo fallar ante entrada malformada. Las opciones por campo
//! (codificación, formato, longitud máxima) viajan en estructuras de
//! configuración inmutables (`attrs`), no en estado de clase heredado.

pub mod attrs;
pub mod binary;
pub mod ids;
pub mod number;
pub mod temporal;
pub mod text;

pub use attrs::{ByteArrayAttrs, DateAttrs, DateTimeAttrs, DecimalAttrs, DecodePolicy, DoubleAttrs,
                IntegerAttrs, StringAttrs, TextEncoding, TimeAttrs};
pub use binary::{byte_array_from_string, byte_array_to_string, file_from_string, file_to_chunks};
pub use ids::{uuid_from_string, uuid_to_string};
pub use number::{boolean_from_string, boolean_to_string, decimal_from_string, decimal_to_string,
                 double_from_string, double_to_string, integer_from_string, integer_to_string};
pub use temporal::{date_from_string, date_to_string, datetime_from_string, datetime_from_string_iso,
                   datetime_to_string, duration_from_string, duration_to_string, time_from_string,
                   time_to_string, DateTimeValue};
pub use text::{complex_from_string, complex_to_string, simple_to_chunks, string_to_bytes,
               unicode_from_bytes, unicode_to_bytes, unicode_to_string};
pub use wire_model::{BinaryEncoding, CodecError};
