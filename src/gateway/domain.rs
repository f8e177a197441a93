//! Registro de consumidores de ingesta.
//!
//! Lista explícita de manejadores tipados de lecturas (patrón de registro):
//! el gateway entrega cada lectura aceptada a todos los consumidores en
//! orden de registro, aislando el fallo de cada uno.


use tracing::error;
use crate::reading::domain::Reading;


/// Fallo de un consumidor durante la entrega. Se aísla por consumidor: no
/// interrumpe la entrega a los restantes.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct ConsumerError(pub String);


/// Manejador tipado de lecturas.
///
/// Todo el estado de los consumidores se muta exclusivamente desde la tarea
/// del gateway; por construcción no hace falta ningún candado aquí.
pub trait ReadingConsumer: Send {
    /// Nombre estable del consumidor; clave de idempotencia del registro.
    fn name(&self) -> &'static str;

    fn on_reading(&mut self, reading: &Reading) -> Result<(), ConsumerError>;
}


#[derive(Default)]
pub struct ConsumerSet {
    consumers: Vec<Box<dyn ReadingConsumer>>,
}

impl ConsumerSet {
    pub fn new() -> Self {
        Self { consumers: Vec::new() }
    }

    /// Registro síncrono e idempotente: registrar dos veces el mismo nombre
    /// reemplaza al existente en su posición, sin duplicarlo.
    pub fn register(&mut self, consumer: Box<dyn ReadingConsumer>) {
        match self.consumers.iter_mut().find(|c| c.name() == consumer.name()) {
            Some(slot) => *slot = consumer,
            None => self.consumers.push(consumer),
        }
    }

    /// Baja síncrona e idempotente; devuelve si el consumidor existía.
    pub fn deregister(&mut self, name: &str) -> bool {
        let before = self.consumers.len();
        self.consumers.retain(|c| c.name() != name);
        before != self.consumers.len()
    }

    pub fn len(&self) -> usize {
        self.consumers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumers.is_empty()
    }

    /// Entrega en orden de registro. El fallo de un consumidor se registra
    /// y la entrega continúa con los restantes.
    pub fn deliver(&mut self, reading: &Reading) {
        for consumer in &mut self.consumers {
            if let Err(e) = consumer.on_reading(reading) {
                error!("Error: consumidor '{}' falló al procesar la lectura: {e}", consumer.name());
            }
        }
    }
}
