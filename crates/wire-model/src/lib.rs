//! wire-model: tipos binarios neutrales del wire.
//!
//! Este crate contiene los tipos de datos que la capa codec comparte con el
//! pipeline:
//! - `BinaryEncoding`: el selector cerrado de codificaciones binarias.
//! - `FileValue`: valor de tipo archivo con contenido en memoria, en disco o
//!   detrás de un handle abierto, con su normalización (`rollover`).
//! - `CodecError`: taxonomía de errores compartida por toda la capa codec.

pub mod binary;
pub mod errors;
pub mod file;

pub use binary::{decode_chunks, encode_chunks, BinaryEncoding};
pub use errors::CodecError;
pub use file::{Base64FileChunks, FileBody, FileChunks, FileValue};
