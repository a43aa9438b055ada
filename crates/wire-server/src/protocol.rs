//! Contratos de los protocolos colaboradores.
//!
//! Los formatos concretos de documento (XML, JSON, etc.) viven fuera de
//! este núcleo; el pipeline sólo conoce estas interfaces. Un protocolo de
//! entrada produce representaciones sucesivas en el contexto; uno de salida
//! las consume en orden inverso.

use wire_model::BinaryEncoding;

use crate::context::RequestContext;
use crate::fault::Fault;
use crate::stream::SerializedOutput;

pub trait InputProtocol {
    /// Parsea `ctx.in_string` y fija `ctx.in_document`.
    fn create_in_document(&self, ctx: &mut RequestContext) -> Result<(), Fault>;

    /// Separa el sobre: fija `ctx.in_body_doc`, `ctx.in_header_doc` y
    /// `ctx.method_request_string`.
    fn decompose_incoming_envelope(&self, ctx: &mut RequestContext) -> Result<(), Fault>;

    /// Devuelve los contextos del método resuelto. Puede devolver más de
    /// uno cuando hay métodos auxiliares ligados al principal.
    fn generate_method_contexts(&self, ctx: &mut RequestContext) -> Result<Vec<RequestContext>, Fault> {
        Ok(vec![ctx.clone()])
    }

    /// Deserializa la entrada: fija `ctx.in_object` y `ctx.in_header`.
    fn deserialize(&self, ctx: &mut RequestContext) -> Result<(), Fault>;

    /// Codificación binaria sugerida para campos que difieren al protocolo.
    fn suggested_binary_encoding(&self) -> BinaryEncoding {
        BinaryEncoding::Raw
    }
}

pub trait OutputProtocol {
    /// Construye `ctx.out_document` a partir de `ctx.out_object` (o del
    /// error pendiente), o devuelve un productor en streaming.
    fn serialize(&self, ctx: &mut RequestContext) -> Result<SerializedOutput, Fault>;

    /// Serializa `ctx.out_document` a `ctx.out_string`.
    fn create_out_string(&self, ctx: &mut RequestContext) -> Result<(), Fault>;

    fn suggested_binary_encoding(&self) -> BinaryEncoding {
        BinaryEncoding::Raw
    }
}
