use tokio::sync::{mpsc, watch};
use crate::config::ingest::CHANNEL_CAPACITY;
use crate::transport::domain::TransportEvent;


pub struct Channels {
    pub poller_to_gateway: mpsc::Sender<TransportEvent>,
    pub subscriber_to_gateway: mpsc::Sender<TransportEvent>,
    pub gateway_from_transports: mpsc::Receiver<TransportEvent>,

    pub shutdown: watch::Sender<bool>,
    pub shutdown_for_poller: watch::Receiver<bool>,
    pub shutdown_for_subscriber: watch::Receiver<bool>,
    pub shutdown_for_gateway: watch::Receiver<bool>,
}


impl Channels {
    pub fn new() -> Channels {
        let (transports_to_gw, gw_from_transports) = mpsc::channel::<TransportEvent>(CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            poller_to_gateway: transports_to_gw.clone(),
            subscriber_to_gateway: transports_to_gw,
            gateway_from_transports: gw_from_transports,
            shutdown: shutdown_tx,
            shutdown_for_poller: shutdown_rx.clone(),
            shutdown_for_subscriber: shutdown_rx.clone(),
            shutdown_for_gateway: shutdown_rx,
        }
    }
}
