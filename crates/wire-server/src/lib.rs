//! wire-server: pipeline de una petición RPC, de bytes de entrada a bytes
//! de salida.
//!
//! El pipeline ordena parseo del documento, descomposición del sobre,
//! generación de contextos, deserialización de la entrada, despacho y
//! serialización de la salida, con cortocircuito por falla y puntos de
//! disparo de eventos de ciclo de vida. Cualquier fallo de cualquier etapa
//! degrada a una respuesta de falla bien formada; nunca tumba el ciclo.

pub mod context;
pub mod events;
pub mod fault;
pub mod protocol;
pub mod server;
pub mod stream;

pub use context::RequestContext;
pub use events::{EventSink, LifecycleEvent, NoopEvents, RecordingEvents};
pub use fault::Fault;
pub use protocol::{InputProtocol, OutputProtocol};
pub use server::{RequestHandler, Server};
pub use stream::{CancelToken, SerializedOutput, StreamingProducer};
