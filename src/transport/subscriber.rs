//! Adaptador de suscripción (push MQTT).
//!
//! El bucle de recepción corre en su propia tarea, independiente del ciclo de
//! sondeo y del contexto del gateway. Nunca toca estado de consumidores
//! directamente: cada payload cruza por el canal de eventos hacia la tarea
//! del gateway, que es la única frontera de sincronización del sistema.
//!
//! La reconexión de bajo nivel es del event loop de rumqttc; esta tarea solo
//! reporta el fallo a la máquina de sesión y espera el intervalo fijo antes
//! de volver a sondear el event loop.


use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tracing::{error, info, warn};
use crate::config::mqtt::{EVENT_CAPACITY, KEEP_ALIVE, RETRY_WAIT};
use crate::context::domain::AppContext;
use crate::transport::domain::{TransportError, TransportEvent, TransportKind};


pub async fn subscriber_task(tx: mpsc::Sender<TransportEvent>,
                             mut shutdown: watch::Receiver<bool>,
                             ctx: AppContext) {

    info!("Info: subscriber task creada");

    let mut options = MqttOptions::new("chamber-telemetry", &ctx.system.mqtt_host, ctx.system.mqtt_port);
    options.set_keep_alive(KEEP_ALIVE);

    let (client, mut eventloop) = AsyncClient::new(options, EVENT_CAPACITY);

    if let Err(e) = client.subscribe(&ctx.system.mqtt_topic, QoS::AtMostOnce).await {
        error!("Error: no se pudo encolar la suscripción inicial: {e}");
        let _ = tx.send(TransportEvent::Failed(
            TransportKind::Subscriber,
            TransportError::ConnectionLost(e.to_string()),
        )).await;
        return;
    }

    loop {
        tokio::select! {
            res = shutdown.changed() => {
                if res.is_err() || *shutdown.borrow() {
                    let _ = client.disconnect().await;
                    break;
                }
            }

            event = eventloop.poll() => match event {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("Info: MQTT conectado, suscrito a {}", ctx.system.mqtt_topic);

                    // Re-suscribir en cada reconexión: el broker puede haber
                    // perdido la sesión.
                    if let Err(e) = client.subscribe(&ctx.system.mqtt_topic, QoS::AtMostOnce).await {
                        error!("Error: fallo al re-suscribir: {e}");
                    }
                    let _ = tx.send(TransportEvent::Connected(TransportKind::Subscriber)).await;
                }

                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    match String::from_utf8(publish.payload.to_vec()) {
                        Ok(payload) => {
                            if tx.send(TransportEvent::Payload(TransportKind::Subscriber, payload)).await.is_err() {
                                return;
                            }
                        }
                        Err(_) => warn!("Warning: payload MQTT no es UTF-8, descartado"),
                    }
                }

                Ok(Event::Incoming(Packet::Disconnect)) => {
                    warn!("Warning: el broker cerró la conexión MQTT");
                    let _ = tx.send(TransportEvent::Disconnected(TransportKind::Subscriber)).await;
                }

                Ok(_) => {}

                Err(e) => {
                    error!("Error: event loop MQTT: {e}");
                    let _ = tx.send(TransportEvent::Failed(
                        TransportKind::Subscriber,
                        TransportError::ConnectionLost(e.to_string()),
                    )).await;
                    sleep(RETRY_WAIT).await;
                }
            }
        }
    }

    let _ = tx.send(TransportEvent::Disconnected(TransportKind::Subscriber)).await;
    info!("Info: subscriber task finalizada");
}


pub fn start_subscriber(tx_to_gateway: mpsc::Sender<TransportEvent>,
                        shutdown: watch::Receiver<bool>,
                        ctx: AppContext) -> tokio::task::JoinHandle<()> {

    info!("Info: iniciando tarea subscriber");
    tokio::spawn(async move {
        subscriber_task(tx_to_gateway, shutdown, ctx).await;
    })
}
