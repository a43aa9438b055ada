//! Puntos de disparo de eventos de ciclo de vida.
//!
//! La gestión de suscripciones es responsabilidad de un colaborador
//! externo; aquí sólo se define el contrato de disparo y los cuatro puntos
//! con nombre. Por fase (documento y cadena) los eventos de retorno y de
//! excepción son mutuamente excluyentes, y la fase documento dispara
//! siempre antes que la fase cadena.

use std::sync::Mutex;

use crate::context::RequestContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    MethodReturnDocument,
    MethodExceptionDocument,
    MethodReturnString,
    MethodExceptionString,
}

impl LifecycleEvent {
    pub fn name(self) -> &'static str {
        match self {
            LifecycleEvent::MethodReturnDocument => "method_return_document",
            LifecycleEvent::MethodExceptionDocument => "method_exception_document",
            LifecycleEvent::MethodReturnString => "method_return_string",
            LifecycleEvent::MethodExceptionString => "method_exception_string",
        }
    }
}

/// Colaborador que recibe los disparos. Sin suscriptores, no hace nada.
pub trait EventSink {
    fn fire_event(&self, event: LifecycleEvent, ctx: &mut RequestContext);
}

/// Implementación nula por defecto.
#[derive(Debug, Default)]
pub struct NoopEvents;

impl EventSink for NoopEvents {
    fn fire_event(&self, _event: LifecycleEvent, _ctx: &mut RequestContext) {}
}

/// Registra los eventos disparados, en orden. Pensado para pruebas.
#[derive(Debug, Default)]
pub struct RecordingEvents {
    fired: Mutex<Vec<LifecycleEvent>>,
}

impl RecordingEvents {
    pub fn fired(&self) -> Vec<LifecycleEvent> {
        self.fired.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.fired().into_iter().map(LifecycleEvent::name).collect()
    }
}

impl EventSink for RecordingEvents {
    fn fire_event(&self, event: LifecycleEvent, _ctx: &mut RequestContext) {
        if let Ok(mut fired) = self.fired.lock() {
            fired.push(event);
        }
    }
}
