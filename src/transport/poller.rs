//! Adaptador de sondeo (petición/respuesta).
//!
//! Ciclo de sondeo: con un intervalo fijo, y solo si el enlace se reporta
//! conectado, se emite un comando de lectura; tras una espera de gracia se
//! intenta exactamente una lectura del buffer de respuesta. Si no hay datos,
//! el ciclo es un no-op silencioso: no reintenta ni propaga nada.
//!
//! La serialización está garantizada por construcción: la petición, la espera
//! y la lectura son awaits secuenciales dentro de una sola tarea, y el
//! siguiente tic recién se programa cuando la lectura del ciclo anterior ya
//! ocurrió. Nunca hay dos peticiones en vuelo.


use tokio::sync::{mpsc, watch};
use tokio::time::{Duration, sleep};
use tracing::{debug, error, info};
use crate::config::poll::REQUEST_CMD;
use crate::context::domain::AppContext;
use crate::transport::domain::{SensorLink, TransportEvent, TransportKind};


pub async fn poller_task<L: SensorLink>(mut link: L,
                                        tx: mpsc::Sender<TransportEvent>,
                                        mut shutdown: watch::Receiver<bool>,
                                        interval: Duration,
                                        grace: Duration,
                                        window: Duration) {

    info!("Info: poller task creada");
    let mut announced = false;

    loop {
        tokio::select! {
            res = shutdown.changed() => {
                if res.is_err() || *shutdown.borrow() { break; }
            }
            _ = sleep(interval) => {
                if !link.is_connected() {
                    continue;
                }

                if let Err(e) = link.send_command(REQUEST_CMD).await {
                    error!("Error: fallo al emitir la petición de sondeo: {e}");
                    let _ = tx.send(TransportEvent::Failed(TransportKind::Poller, e)).await;
                    return;
                }
                if !announced {
                    announced = true;
                    let _ = tx.send(TransportEvent::Connected(TransportKind::Poller)).await;
                }

                sleep(grace).await;

                match link.read_line(window).await {
                    Ok(Some(line)) => {
                        if tx.send(TransportEvent::Payload(TransportKind::Poller, line)).await.is_err() {
                            return;
                        }
                    }
                    Ok(None) => {
                        // Ciclo vacío: ausencia de datos, no es error.
                        debug!("Debug: ciclo de sondeo sin respuesta");
                    }
                    Err(e) => {
                        error!("Error: fallo de lectura en el ciclo de sondeo: {e}");
                        let _ = tx.send(TransportEvent::Failed(TransportKind::Poller, e)).await;
                        return;
                    }
                }
            }
        }
    }

    let _ = tx.send(TransportEvent::Disconnected(TransportKind::Poller)).await;
    info!("Info: poller task finalizada");
}


pub fn start_poller<L: SensorLink + 'static>(link: L,
                                             tx_to_gateway: mpsc::Sender<TransportEvent>,
                                             shutdown: watch::Receiver<bool>,
                                             ctx: AppContext) -> tokio::task::JoinHandle<()> {

    info!("Info: iniciando tarea poller");
    tokio::spawn(async move {
        poller_task(
            link,
            tx_to_gateway,
            shutdown,
            Duration::from_millis(ctx.system.poll_interval_ms),
            Duration::from_millis(ctx.system.poll_grace_ms),
            crate::config::poll::READ_WINDOW,
        ).await;
    })
}
