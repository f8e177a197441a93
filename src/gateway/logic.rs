//! Gateway de ingesta.
//!
//! Autoridad única sobre ambos transportes: es el único componente que llama
//! al normalizador y el único que empuja lecturas hacia los consumidores.
//! Los payloads de ambos adaptadores llegan por un solo canal acotado, de
//! modo que toda entrega ocurre serializada dentro de esta tarea; ningún
//! consumidor se invoca desde el contexto del suscriptor.
//!
//! Un payload malformado se descarta en silencio (se cuenta y se loguea):
//! el siguiente ciclo o mensaje lo reemplaza. Ningún error de este
//! subsistema es fatal para el proceso.


use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, interval_at};
use tracing::{debug, error, info, warn};
use chrono::Utc;
use crate::config::ingest::STATUS_INTERVAL_SECS;
use crate::gateway::domain::ConsumerSet;
use crate::reading::logic::Normalizer;
use crate::transport::domain::{SessionState, TransportEvent, TransportKind};


/// Estados de sesión de ambos adaptadores. Propiedad exclusiva del gateway.
#[derive(Debug, Clone, Copy)]
pub struct SessionTable {
    poller: SessionState,
    subscriber: SessionState,
}

impl SessionTable {
    pub fn new() -> Self {
        Self {
            poller: SessionState::Idle,
            subscriber: SessionState::Idle,
        }
    }

    /// Primera habilitación: `Idle → Connecting` en ambos adaptadores.
    pub fn enable(&mut self) {
        self.poller = SessionState::Connecting;
        self.subscriber = SessionState::Connecting;
    }

    pub fn get(&self, kind: TransportKind) -> SessionState {
        match kind {
            TransportKind::Poller => self.poller,
            TransportKind::Subscriber => self.subscriber,
        }
    }

    pub fn on_event(&mut self, event: &TransportEvent) {
        match event {
            TransportEvent::Connected(kind) => self.set(*kind, SessionState::Active),
            // Un payload también es un acuse del transporte.
            TransportEvent::Payload(kind, _) => {
                if self.get(*kind) == SessionState::Connecting {
                    self.set(*kind, SessionState::Active);
                }
            }
            TransportEvent::Disconnected(kind) => {
                if self.get(*kind) != SessionState::Failed {
                    self.set(*kind, SessionState::Disconnected);
                }
            }
            TransportEvent::Failed(kind, _) => self.set(*kind, SessionState::Failed),
        }
    }

    fn set(&mut self, kind: TransportKind, state: SessionState) {
        let slot = match kind {
            TransportKind::Poller => &mut self.poller,
            TransportKind::Subscriber => &mut self.subscriber,
        };
        if *slot != state {
            info!("Info: sesión {kind:?} pasa de {:?} a {state:?}", *slot);
            *slot = state;
        }
    }
}


pub async fn gateway_task(mut rx: mpsc::Receiver<TransportEvent>,
                          mut consumers: ConsumerSet,
                          normalizer: Normalizer,
                          mut shutdown: watch::Receiver<bool>) {

    info!("Info: gateway task creada con {} consumidores", consumers.len());

    let mut sessions = SessionTable::new();
    sessions.enable();

    let mut delivered: u64 = 0;
    let mut dropped: u64 = 0;

    let period = Duration::from_secs(STATUS_INTERVAL_SECS);
    let mut status = interval_at(Instant::now() + period, period);

    loop {
        tokio::select! {
            res = shutdown.changed() => {
                if res.is_err() || *shutdown.borrow() { break; }
            }

            _ = status.tick() => {
                info!("Info: estado de ingesta: poller {:?}, subscriber {:?}, entregadas {delivered}, descartadas {dropped}",
                      sessions.get(TransportKind::Poller),
                      sessions.get(TransportKind::Subscriber));
            }

            event = rx.recv() => {
                let Some(event) = event else { break };
                sessions.on_event(&event);

                match event {
                    TransportEvent::Payload(kind, raw) => {
                        match normalizer.parse(kind, &raw, Utc::now().timestamp_millis()) {
                            Ok(reading) => {
                                consumers.deliver(&reading);
                                delivered += 1;
                            }
                            Err(e) => {
                                dropped += 1;
                                debug!("Debug: payload de {kind:?} descartado: {e}");
                            }
                        }
                    }
                    TransportEvent::Failed(kind, e) => {
                        error!("Error: transporte {kind:?} falló: {e}");
                    }
                    TransportEvent::Disconnected(kind) => {
                        warn!("Warning: transporte {kind:?} desconectado");
                    }
                    TransportEvent::Connected(_) => {}
                }
            }
        }
    }

    info!("Info: gateway task finalizada, entregadas {delivered}, descartadas {dropped}");
}


pub fn start_gateway(rx_from_transports: mpsc::Receiver<TransportEvent>,
                     consumers: ConsumerSet,
                     normalizer: Normalizer,
                     shutdown: watch::Receiver<bool>) -> JoinHandle<()> {

    info!("Info: iniciando tarea gateway");
    tokio::spawn(async move {
        gateway_task(rx_from_transports, consumers, normalizer, shutdown).await;
    })
}


/// Manejador del ciclo de vida del subsistema de ingesta.
///
/// El apagado es ordenado: se señala el fin a todas las tareas (el poller no
/// emite más tics, el suscriptor se desconecta) y se espera a que cada
/// contexto de fondo termine del todo antes de reportar el apagado completo.
/// Así una entrega tardía nunca corre contra un conjunto de consumidores ya
/// destruido.
pub struct Gateway {
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl Gateway {
    pub fn new(shutdown_tx: watch::Sender<bool>, handles: Vec<JoinHandle<()>>) -> Self {
        Self { shutdown_tx, handles }
    }

    pub async fn shutdown(self) {
        info!("Info: iniciando apagado del gateway");
        let _ = self.shutdown_tx.send(true);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Error: una tarea terminó con pánico durante el apagado: {e}");
            }
        }
        info!("Info: apagado completo");
    }
}
