//! Dominio de Transportes.
//!
//! Define los dos adaptadores de transporte como contratos: el sondeo
//! (petición/respuesta sobre un enlace de líneas) y la suscripción (push
//! asíncrono por MQTT). El objeto físico de conexión queda fuera de alcance:
//! el sistema lo consume como caja negra a través del trait `SensorLink`.


use tokio::time::Duration;


/// Identifica cuál de los dos adaptadores produjo un payload o un evento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    Poller,
    Subscriber,
}


/// Estado de sesión de un adaptador, propiedad exclusiva del gateway.
///
/// Ciclo de vida: `Idle → Connecting → Active → (Disconnected | Failed)`.
/// Tras `Failed` el gateway no emite más ciclos de sondeo hasta un reinicio
/// explícito. Los consumidores nunca ven este estado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Active,
    Disconnected,
    Failed,
}


/// Error a nivel de transporte. Se reporta a la máquina de estados del
/// gateway; nunca tumba el proceso.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("conexión perdida: {0}")]
    ConnectionLost(String),

    #[error("fallo de escritura: {0}")]
    Write(String),

    #[error("fallo de lectura: {0}")]
    Read(String),
}


/// Eventos que cruzan desde los contextos de los transportes hacia la tarea
/// del gateway. Este canal es la única frontera de sincronización del sistema.
#[derive(Debug)]
pub enum TransportEvent {
    /// Primer acuse exitoso del transporte.
    Connected(TransportKind),
    /// Payload crudo, todavía sin normalizar.
    Payload(TransportKind, String),
    /// Cierre explícito del transporte.
    Disconnected(TransportKind),
    /// Error irrecuperable del transporte.
    Failed(TransportKind, TransportError),
}


/// Enlace de sensores del canal de sondeo (caja negra).
///
/// La implementación física (puente serie-TCP, puerto serie real) queda fuera
/// del núcleo. La reconexión es responsabilidad del colaborador externo; el
/// gateway solo puede invocarla.
pub trait SensorLink: Send {
    fn is_connected(&self) -> bool;

    /// Envía un comando de una línea (ej. `S\n`).
    fn send_command(&mut self, cmd: &str) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Intenta exactamente una lectura del buffer de respuesta durante la
    /// ventana dada. `None` significa ausencia de datos, no error.
    fn read_line(&mut self, window: Duration) -> impl Future<Output = Result<Option<String>, TransportError>> + Send;

    fn reconnect(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;
}
