//! Contexto de una petición: el registro mutable que acompaña una petición
//! y su respuesta por todas las etapas del pipeline.
//!
//! Hay exactamente una instancia por petición, propiedad exclusiva del
//! pipeline durante su vida, y se descarta al terminar. Los campos `in_*` y
//! `out_*` son representaciones sucesivas, cada una derivada de la anterior.

use serde_json::Value;
use uuid::Uuid;

use crate::fault::Fault;

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Identificador del contexto, útil para correlacionar trazas.
    pub ctx_id: Uuid,

    /// Bytes crudos de entrada tal como los entregó el transporte.
    pub in_string: Option<Vec<u8>>,
    /// Documento neutral parseado desde `in_string`.
    pub in_document: Option<Value>,
    /// Cabecera del sobre, si el protocolo la separa.
    pub in_header_doc: Option<Value>,
    /// Cuerpo del sobre.
    pub in_body_doc: Option<Value>,
    /// Nombre del método solicitado, extraído del sobre.
    pub method_request_string: Option<String>,

    /// Entrada deserializada; ausente si no se pudo parsear.
    pub in_object: Option<Value>,
    /// Cabecera deserializada.
    pub in_header: Option<Value>,

    /// Falla capturada al procesar la entrada. Se fija junto con
    /// `out_error`; las etapas posteriores no deben pisarla sin intención
    /// explícita.
    pub in_error: Option<Fault>,
    pub out_error: Option<Fault>,

    /// Salida del método despachado.
    pub out_object: Option<Value>,
    /// Documento de salida construido por el protocolo.
    pub out_document: Option<Value>,
    /// Bytes de respuesta como secuencia de chunks. Siempre presente al
    /// terminar el pipeline, incluso ante falla.
    pub out_string: Option<Vec<Vec<u8>>>,
}

impl RequestContext {
    /// Contexto inicial con los bytes crudos que entregó el transporte.
    pub fn new(in_string: Vec<u8>) -> Self {
        Self { ctx_id: Uuid::new_v4(),
               in_string: Some(in_string),
               ..Default::default() }
    }

    /// Registra una falla de entrada: fija ambos campos de error y borra
    /// `in_object`, manteniendo el invariante de exclusión mutua.
    pub fn fail(&mut self, fault: Fault) {
        self.in_object = None;
        self.in_error = Some(fault.clone());
        self.out_error = Some(fault);
    }
}
