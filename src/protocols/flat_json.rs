//! Protocolo JSON plano de referencia.
//!
//! Sobre de entrada: `{"header": ..., "body": {"method": ..., "params": ...}}`
//! (la cabecera es opcional). Respuesta: `{"result": ...}` en éxito o
//! `{"fault": {"code": ..., "message": ...}}` ante falla.

use serde_json::{json, Value};

use wire_codec::{datetime_from_string_iso, datetime_to_string, DateTimeAttrs};
use wire_model::BinaryEncoding;
use wire_server::{Fault, InputProtocol, OutputProtocol, RequestContext, RequestHandler,
                  SerializedOutput};

use crate::config::CONFIG;

pub struct FlatJsonProtocol {
    max_request_len: usize,
    binary_encoding: BinaryEncoding,
}

impl FlatJsonProtocol {
    pub fn new() -> Self {
        Self { max_request_len: CONFIG.pipeline.max_request_len,
               binary_encoding: CONFIG.pipeline.default_binary_encoding }
    }

    pub fn with_max_request_len(max_request_len: usize) -> Self {
        Self { max_request_len,
               binary_encoding: BinaryEncoding::Base64 }
    }
}

impl Default for FlatJsonProtocol {
    fn default() -> Self {
        Self::new()
    }
}

impl InputProtocol for FlatJsonProtocol {
    fn create_in_document(&self, ctx: &mut RequestContext) -> Result<(), Fault> {
        let raw = ctx.in_string.as_deref()
                     .ok_or_else(|| Fault::client("petición sin cuerpo"))?;
        if raw.len() > self.max_request_len {
            return Err(Fault::new("Client.RequestTooLong",
                                  format!("petición de {} bytes excede el máximo de {}",
                                          raw.len(), self.max_request_len)));
        }
        let doc: Value = serde_json::from_slice(raw)
            .map_err(|e| Fault::new("Client.ParseError", e.to_string()))?;
        ctx.in_document = Some(doc);
        Ok(())
    }

    fn decompose_incoming_envelope(&self, ctx: &mut RequestContext) -> Result<(), Fault> {
        let doc = ctx.in_document.clone()
                     .ok_or_else(|| Fault::server("sin documento de entrada"))?;
        let body = doc.get("body").cloned()
                      .ok_or_else(|| Fault::client("sobre sin cuerpo"))?;
        let method = body.get("method")
                         .and_then(Value::as_str)
                         .ok_or_else(|| Fault::client("cuerpo sin nombre de método"))?;
        ctx.method_request_string = Some(method.to_string());
        ctx.in_header_doc = doc.get("header").cloned();
        ctx.in_body_doc = Some(body);
        Ok(())
    }

    fn deserialize(&self, ctx: &mut RequestContext) -> Result<(), Fault> {
        let body = ctx.in_body_doc.clone()
                      .ok_or_else(|| Fault::server("sin cuerpo descompuesto"))?;
        ctx.in_object = Some(body.get("params").cloned().unwrap_or(Value::Null));
        ctx.in_header = ctx.in_header_doc.clone();
        Ok(())
    }

    fn suggested_binary_encoding(&self) -> BinaryEncoding {
        self.binary_encoding
    }
}

impl OutputProtocol for FlatJsonProtocol {
    fn serialize(&self, ctx: &mut RequestContext) -> Result<SerializedOutput, Fault> {
        let doc = match &ctx.out_error {
            Some(fault) => {
                let mut body = json!({"code": fault.code, "message": fault.message});
                if let Some(detail) = &fault.detail {
                    body["detail"] = detail.clone();
                }
                json!({"fault": body})
            }
            None => json!({"result": ctx.out_object.clone().unwrap_or(Value::Null)}),
        };
        ctx.out_document = Some(doc);
        Ok(SerializedOutput::Document)
    }

    fn create_out_string(&self, ctx: &mut RequestContext) -> Result<(), Fault> {
        if let Some(doc) = &ctx.out_document {
            let bytes = serde_json::to_vec(doc).map_err(|e| Fault::server(e.to_string()))?;
            ctx.out_string = Some(vec![bytes]);
        }
        Ok(())
    }

    fn suggested_binary_encoding(&self) -> BinaryEncoding {
        self.binary_encoding
    }
}

/// Manejador de demostración con tres métodos: `echo` devuelve sus
/// parámetros, `ping` no devuelve nada y `normalize_datetime` reescribe una
/// marca temporal ISO-8601 en forma canónica.
pub struct DemoHandler;

impl RequestHandler for DemoHandler {
    fn process_request(&self, ctx: &mut RequestContext) -> Result<(), Fault> {
        match ctx.method_request_string.as_deref() {
            Some("echo") => {
                ctx.out_object = ctx.in_object.clone();
                Ok(())
            }
            Some("ping") => Ok(()),
            Some("normalize_datetime") => {
                let raw = ctx.in_object.as_ref()
                             .and_then(Value::as_str)
                             .ok_or_else(|| Fault::client("se espera una cadena ISO-8601"))?;
                let attrs = DateTimeAttrs::default();
                let value = datetime_from_string_iso(&attrs, raw)?;
                ctx.out_object = Some(Value::String(datetime_to_string(&attrs, value)));
                Ok(())
            }
            other => Err(Fault::new("Client.ResourceNotFound",
                                    format!("método no publicado: {}", other.unwrap_or("?")))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_request_is_rejected_with_named_fault() {
        let protocol = FlatJsonProtocol::with_max_request_len(8);
        let mut ctx = RequestContext::new(br#"{"body":{"method":"echo"}}"#.to_vec());
        let err = protocol.create_in_document(&mut ctx).unwrap_err();
        assert_eq!(err.code, "Client.RequestTooLong");
    }

    #[test]
    fn envelope_without_method_is_a_client_fault() {
        let protocol = FlatJsonProtocol::with_max_request_len(1024);
        let mut ctx = RequestContext::new(br#"{"body":{"params":1}}"#.to_vec());
        protocol.create_in_document(&mut ctx).expect("json válido");
        let err = protocol.decompose_incoming_envelope(&mut ctx).unwrap_err();
        assert_eq!(err.code, "Client");
    }

    #[test]
    fn header_is_carried_into_context() {
        let protocol = FlatJsonProtocol::with_max_request_len(1024);
        let mut ctx = RequestContext::new(
            br#"{"header":{"token":"t"},"body":{"method":"ping"}}"#.to_vec());
        protocol.create_in_document(&mut ctx).expect("json válido");
        protocol.decompose_incoming_envelope(&mut ctx).expect("sobre válido");
        protocol.deserialize(&mut ctx).expect("entrada válida");
        assert_eq!(ctx.in_header, Some(json!({"token": "t"})));
        assert_eq!(ctx.method_request_string.as_deref(), Some("ping"));
    }

    #[test]
    fn normalize_datetime_rewrites_offset_form() {
        let mut ctx = RequestContext::default();
        ctx.method_request_string = Some("normalize_datetime".to_string());
        ctx.in_object = Some(Value::String("2024-03-01 10:30:00+02:00".to_string()));
        DemoHandler.process_request(&mut ctx).expect("fecha válida");
        assert_eq!(ctx.out_object,
                   Some(Value::String("2024-03-01T10:30:00+02:00".to_string())));
    }

    #[test]
    fn invalid_datetime_maps_to_validation_fault() {
        let mut ctx = RequestContext::default();
        ctx.method_request_string = Some("normalize_datetime".to_string());
        ctx.in_object = Some(Value::String("no-es-fecha".to_string()));
        let err = DemoHandler.process_request(&mut ctx).unwrap_err();
        assert_eq!(err.code, "Client.ValidationError");
    }
}
