//! Protocolo cooperativo de salida en streaming.
//!
//! El serializador de salida puede devolver un productor que se conduce por
//! tirones (pull): sólo avanza cuando se lo reanuda explícitamente, desde un
//! único hilo, nunca de forma concurrente. La cancelación a mitad de flujo
//! se expresa como una señal explícita inyectada en el productor (no como
//! abandono), para que los recursos en vuelo (archivos abiertos) se liberen
//! en su propia ruta de desmonte.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::context::RequestContext;
use crate::fault::Fault;

/// Token de cancelación compartido entre el transporte y el conductor.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }
}

/// Resultado del serializador de salida.
pub enum SerializedOutput {
    /// El documento quedó producido por completo en `ctx.out_document`.
    Document,
    /// Producción incremental: el conductor debe reanudar hasta completar.
    Stream(Box<dyn StreamingProducer>),
}

/// Unidad cooperativa de generación de salida.
pub trait StreamingProducer {
    /// Avanza un paso. `Ok(false)` señala terminación normal.
    fn resume(&mut self, ctx: &mut RequestContext) -> Result<bool, Fault>;

    /// Señal de cancelación. Un retorno normal tras la señal cuenta como
    /// cancelación exitosa, no como error; el productor debe liberar aquí
    /// los recursos que tuviera en vuelo.
    fn cancel(&mut self, ctx: &mut RequestContext) -> Result<(), Fault>;
}
