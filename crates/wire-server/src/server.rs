//! El pipeline de petición: etapas estrictamente secuenciales con un canal
//! lateral de falla activo desde cualquier etapa en adelante.
//!
//! Orden de etapas para un contexto dado:
//! documento parseado → sobre descompuesto → contextos generados → entrada
//! deserializada → despachado → documento de salida → cadena de salida.
//! Los fallos de parseo, deserialización y despacho se capturan como fallas
//! sobre el contexto y se llevan hasta la serialización de la respuesta de
//! falla; sólo los constructores no diseñados como falibles propagan.

use crate::context::RequestContext;
use crate::events::{EventSink, LifecycleEvent};
use crate::fault::Fault;
use crate::protocol::{InputProtocol, OutputProtocol};
use crate::stream::{CancelToken, SerializedOutput, StreamingProducer};

/// Colaborador de despacho: recibe el contexto con `in_object` resuelto y
/// debe fijar `out_object` o devolver una falla. La búsqueda del método por
/// nombre queda fuera de este núcleo.
pub trait RequestHandler {
    fn process_request(&self, ctx: &mut RequestContext) -> Result<(), Fault>;
}

/// Orquesta una petición de bytes de entrada a bytes de salida.
///
/// No retiene estado entre peticiones: la concurrencia entre peticiones es
/// responsabilidad del transporte que lo invoca, con un contexto por
/// llamada.
pub struct Server<I, O, H, E>
    where I: InputProtocol,
          O: OutputProtocol,
          H: RequestHandler,
          E: EventSink
{
    in_protocol: I,
    out_protocol: O,
    handler: H,
    events: E,
}

impl<I, O, H, E> Server<I, O, H, E>
    where I: InputProtocol,
          O: OutputProtocol,
          H: RequestHandler,
          E: EventSink
{
    pub fn new(in_protocol: I, out_protocol: O, handler: H, events: E) -> Self {
        Self { in_protocol,
               out_protocol,
               handler,
               events }
    }

    pub fn in_protocol(&self) -> &I {
        &self.in_protocol
    }

    pub fn out_protocol(&self) -> &O {
        &self.out_protocol
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    /// Etapas de parseo y generación de contextos. Ante cualquier falla la
    /// captura en ambos campos de error y devuelve el contexto fallido como
    /// único resultado: el llamador siempre recibe al menos un contexto,
    /// nunca una propagación.
    pub fn generate_contexts(&self, mut ctx: RequestContext) -> Vec<RequestContext> {
        match self.generate_contexts_inner(&mut ctx) {
            Ok(contexts) => contexts,
            Err(fault) => {
                ctx.fail(fault);
                vec![ctx]
            }
        }
    }

    fn generate_contexts_inner(&self, ctx: &mut RequestContext) -> Result<Vec<RequestContext>, Fault> {
        self.in_protocol.create_in_document(ctx)?;
        self.in_protocol.decompose_incoming_envelope(ctx)?;
        self.in_protocol.generate_method_contexts(ctx)
    }

    /// Deserializa la entrada. Ante falla la registra en el log y en ambos
    /// campos de error, borra `in_object` y no propaga.
    pub fn get_in_object(&self, ctx: &mut RequestContext) {
        if let Err(fault) = self.in_protocol.deserialize(ctx) {
            tracing::error!(ctx_id = %ctx.ctx_id, %fault, "fallo al deserializar la entrada");
            ctx.fail(fault);
        }
    }

    /// Despacha al método resuelto. Si la entrada ya falló, devuelve esa
    /// falla de inmediato: esta etapa es fatal-en-entrada a propósito, para
    /// que el manejador externo del transporte la convierta en respuesta de
    /// falla.
    pub fn get_out_object(&self, ctx: &mut RequestContext) -> Result<(), Fault> {
        if let Some(fault) = ctx.in_error.clone() {
            return Err(fault);
        }
        self.handler.process_request(ctx)
    }

    /// Construye `out_document` y `out_string`, disparando los eventos de
    /// ciclo de vida en el orden documento → cadena. Garantiza salida no
    /// ausente incluso para resultados void.
    pub fn get_out_string(&self, ctx: &mut RequestContext, cancel: &CancelToken) -> Result<(), Fault> {
        // El llamador ya suministró el flujo de salida: se deja tal cual.
        if ctx.out_string.is_some() {
            return Ok(());
        }

        if ctx.out_document.is_none() {
            match self.out_protocol.serialize(ctx)? {
                SerializedOutput::Document => {}
                SerializedOutput::Stream(mut producer) => {
                    self.drive_stream(ctx, producer.as_mut(), cancel)?;
                }
            }
        }

        self.fire_phase_event(ctx,
                              LifecycleEvent::MethodReturnDocument,
                              LifecycleEvent::MethodExceptionDocument);

        self.out_protocol.create_out_string(ctx)?;

        self.fire_phase_event(ctx,
                              LifecycleEvent::MethodReturnString,
                              LifecycleEvent::MethodExceptionString);

        if ctx.out_string.is_none() {
            ctx.out_string = Some(vec![Vec::new()]);
        }
        Ok(())
    }

    /// Conduce un productor cooperativo hasta su terminación normal, o le
    /// inyecta la señal de cancelación si el token se activó; la
    /// terminación tras la señal cuenta como cancelación exitosa.
    fn drive_stream(&self,
                    ctx: &mut RequestContext,
                    producer: &mut dyn StreamingProducer,
                    cancel: &CancelToken)
                    -> Result<(), Fault> {
        loop {
            if cancel.is_cancelled() {
                producer.cancel(ctx)?;
                tracing::debug!(ctx_id = %ctx.ctx_id, "flujo de salida cancelado a petición");
                return Ok(());
            }
            if !producer.resume(ctx)? {
                return Ok(());
            }
        }
    }

    fn fire_phase_event(&self, ctx: &mut RequestContext, on_return: LifecycleEvent, on_exception: LifecycleEvent) {
        let event = if ctx.out_error.is_none() { on_return } else { on_exception };
        self.events.fire_event(event, ctx);
    }

    /// Conduce el contrato completo del transporte para una petición:
    /// generación de contextos y, por contexto, deserialización, despacho
    /// bajo conversión falla→respuesta y construcción de la salida.
    pub fn process_request_cycle(&self, ctx: RequestContext) -> Vec<RequestContext> {
        let cancel = CancelToken::new();
        let mut contexts = self.generate_contexts(ctx);

        for ctx in contexts.iter_mut() {
            if ctx.in_error.is_none() {
                self.get_in_object(ctx);
            }

            if let Err(fault) = self.get_out_object(ctx) {
                // conversión falla→respuesta propia del transporte
                ctx.out_error = Some(fault);
            }

            if let Err(fault) = self.get_out_string(ctx, &cancel) {
                tracing::error!(ctx_id = %ctx.ctx_id, %fault, "fallo al construir la salida");
                ctx.out_error = Some(fault);
            }

            if ctx.out_string.is_none() {
                ctx.out_string = Some(vec![Vec::new()]);
            }
        }

        contexts
    }
}
