use tracing::{error, info};
use chamber_telemetry_service::channels::domain::Channels;
use chamber_telemetry_service::context::domain::AppContext;
use chamber_telemetry_service::gateway::domain::ConsumerSet;
use chamber_telemetry_service::gateway::logic::{Gateway, start_gateway};
use chamber_telemetry_service::gauges::logic::ZoneGaugeSet;
use chamber_telemetry_service::reading::logic::Normalizer;
use chamber_telemetry_service::series::domain::SeriesSet;
use chamber_telemetry_service::system::domain::{System, init_tracing};
use chamber_telemetry_service::transport::link::TcpSensorLink;
use chamber_telemetry_service::transport::poller::start_poller;
use chamber_telemetry_service::transport::subscriber::start_subscriber;


#[tokio::main]
async fn main() {

    let system = System::new();
    init_tracing(&system);

    let app_context = AppContext::new(system);
    let channels = Channels::new();

    let mut consumers = ConsumerSet::new();
    consumers.register(Box::new(SeriesSet::new(app_context.system.series_capacity)));
    consumers.register(Box::new(ZoneGaugeSet::new((*app_context.profile).clone())));

    let normalizer = Normalizer::new(app_context.system.poller_zone,
                                     app_context.system.subscriber_zone);

    let addr = app_context.system.sensor_addr.clone();
    let link = match TcpSensorLink::connect(addr.clone()).await {
        Ok(link) => link,
        // Sin enlace al arranque el ciclo de sondeo queda en no-op; la
        // telemetría push sigue funcionando.
        Err(_) => TcpSensorLink::new(addr),
    };

    let poller = start_poller(link,
                              channels.poller_to_gateway,
                              channels.shutdown_for_poller,
                              app_context.clone());

    let subscriber = start_subscriber(channels.subscriber_to_gateway,
                                      channels.shutdown_for_subscriber,
                                      app_context.clone());

    let ingest = start_gateway(channels.gateway_from_transports,
                               consumers,
                               normalizer,
                               channels.shutdown_for_gateway);

    let gateway = Gateway::new(channels.shutdown, vec![poller, subscriber, ingest]);

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Error: no se pudo escuchar la señal de apagado: {e}");
    }
    info!("Info: señal de apagado recibida");

    gateway.shutdown().await;
}
