//! Codec binario a nivel de campo: resuelve el selector activo y delega en
//! los manejadores de wire-model.

use wire_model::{decode_chunks, encode_chunks, BinaryEncoding, CodecError, FileChunks, FileValue};

use crate::attrs::ByteArrayAttrs;

/// Codifica los chunks de un campo binario con la variante efectiva: la del
/// campo si la declara, si no la sugerida por el protocolo, si no cruda.
pub fn byte_array_to_string(attrs: &ByteArrayAttrs, chunks: &[Vec<u8>], suggested: BinaryEncoding) -> Vec<u8> {
    encode_chunks(chunks, attrs.encoding.resolve(suggested))
}

pub fn byte_array_from_string(attrs: &ByteArrayAttrs,
                              value: &[u8],
                              suggested: BinaryEncoding)
                              -> Result<Vec<Vec<u8>>, CodecError> {
    decode_chunks(value, attrs.encoding.resolve(suggested))
}

/// Decodifica un campo archivo completo a un valor con un único chunk en
/// memoria.
pub fn file_from_string(attrs: &ByteArrayAttrs,
                        value: &[u8],
                        suggested: BinaryEncoding)
                        -> Result<FileValue, CodecError> {
    let chunks = decode_chunks(value, attrs.encoding.resolve(suggested))?;
    Ok(FileValue::buffered(chunks))
}

/// Lectura cruda en streaming del contenido de un campo archivo.
pub fn file_to_chunks(value: &FileValue) -> Result<FileChunks, CodecError> {
    value.chunks()
}
