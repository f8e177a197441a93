//! Módulo de configuración central y gestión del entorno de ejecución.
//!
//! Este módulo actúa como la fuente única de verdad para la configuración de
//! la aplicación: lee las variables de entorno, establece valores por defecto
//! seguros y configura la observabilidad (tracing).
//!
//! # Funcionalidades Principales
//! * **Carga de Configuración:** Lee de `.env` en desarrollo y variables de
//!   sistema en producción.
//! * **Observabilidad:** Configura `tracing_subscriber` para logs
//!   estructurados o legibles según el entorno.


use std::env;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use crate::config::{poll, series};
use crate::reading::domain::Zone;


/// Representa la configuración global del sistema y el estado del entorno.
#[derive(Debug, Clone)]
pub struct System {
    /// Dirección del puente serie-TCP del controlador de la cámara
    /// (ej. `192.168.4.1:5333`).
    pub sensor_addr: String,

    /// Host del broker MQTT. Por defecto: `localhost`.
    pub mqtt_host: String,

    /// Puerto del broker MQTT. Por defecto: `1883`.
    pub mqtt_port: u16,

    /// Tópico de telemetría push. Por defecto: `sensor/data`.
    pub mqtt_topic: String,

    /// Intervalo del ciclo de sondeo en milisegundos. Por defecto: `2000`.
    pub poll_interval_ms: u64,

    /// Espera de gracia entre la petición y la lectura. Por defecto: `100`.
    pub poll_grace_ms: u64,

    /// Puntos retenidos por métrica en la ventana de series. Por defecto: `300`.
    pub series_capacity: usize,

    /// Zona estampada a las lecturas del canal de sondeo. Por defecto: `external`.
    pub poller_zone: Zone,

    /// Zona estampada a las lecturas del canal push. Por defecto: `unzoned`.
    pub subscriber_zone: Zone,

    /// Perfil de planta activo. Por defecto: `Lettuce`.
    pub plant_profile: String,

    /// Ruta del archivo JSON de perfiles. Por defecto: `profiles.json`.
    pub profile_path: String,

    /// Entorno de ejecución actual (`development`, `staging`, `production`).
    pub environment: String,

    /// Nivel de detalle de los logs; se autoconfigura según el entorno si no
    /// se especifica.
    pub rust_log: String,
}


impl System {

    /// Carga la configuración desde las variables de entorno.
    ///
    /// # Comportamiento
    /// * Si `ENVIRONMENT` es "development", intenta cargar un archivo `.env`.
    /// * Establece valores por defecto para todas las variables opcionales.
    ///
    /// # Panics
    /// * Si las variables numéricas no son números válidos.
    pub fn new() -> Self {

        info!("Info: creando objeto system");

        let environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".into());

        if environment == "development" {
            dotenv::dotenv().ok();
        }

        System {
            sensor_addr: env::var("SENSOR_ADDR")
                .unwrap_or("127.0.0.1:5333".to_string()),

            mqtt_host: env::var("MQTT_HOST")
                .unwrap_or("localhost".to_string()),

            mqtt_port: env::var("MQTT_PORT")
                .unwrap_or("1883".to_string())
                .parse()
                .expect("MQTT_PORT debe ser un número"),

            mqtt_topic: env::var("MQTT_TOPIC")
                .unwrap_or("sensor/data".to_string()),

            poll_interval_ms: env::var("POLL_INTERVAL_MS")
                .map(|v| v.parse().expect("POLL_INTERVAL_MS debe ser un número"))
                .unwrap_or(poll::INTERVAL_MS),

            poll_grace_ms: env::var("POLL_GRACE_MS")
                .map(|v| v.parse().expect("POLL_GRACE_MS debe ser un número"))
                .unwrap_or(poll::GRACE_MS),

            series_capacity: env::var("SERIES_CAPACITY")
                .map(|v| v.parse().expect("SERIES_CAPACITY debe ser un número"))
                .unwrap_or(series::CAPACITY),

            poller_zone: parse_zone(env::var("POLLER_ZONE").ok().as_deref(), Zone::External),

            subscriber_zone: parse_zone(env::var("SUBSCRIBER_ZONE").ok().as_deref(), Zone::Unzoned),

            plant_profile: env::var("PLANT_PROFILE")
                .unwrap_or("Lettuce".to_string()),

            profile_path: env::var("PROFILE_PATH")
                .unwrap_or("profiles.json".to_string()),

            rust_log: env::var("RUST_LOG")
                .unwrap_or_else(|_| {
                    match environment.as_str() {
                        "development" => "debug".to_string(),
                        "staging" => "info".to_string(),
                        _ => "warn".to_string(),
                    }
                }),

            environment,
        }
    }
}


fn parse_zone(value: Option<&str>, default: Zone) -> Zone {
    match value {
        Some("internal") => Zone::Internal,
        Some("external") => Zone::External,
        Some("unzoned") => Zone::Unzoned,
        _ => default,
    }
}


/// Inicializa el sistema de trazabilidad y logs (Tracing).
///
/// * **Production**: Salida JSON (para logs estructurados).
/// * **Development/Otros**: Salida "Pretty" (colores y formato legible).
pub fn init_tracing(system: &System) {

    let filter = EnvFilter::try_new(&system.rust_log)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt().with_env_filter(filter).with_target(false);

    if system.environment == "production" {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_come_from_the_operational_constants() {
        let system = System::new();

        assert_eq!(system.poll_interval_ms, poll::INTERVAL_MS);
        assert_eq!(system.poll_grace_ms, poll::GRACE_MS);
        assert_eq!(system.series_capacity, series::CAPACITY);
    }

    #[test]
    fn unknown_zone_names_fall_back_to_the_default() {
        assert_eq!(parse_zone(Some("internal"), Zone::External), Zone::Internal);
        assert_eq!(parse_zone(Some("patio"), Zone::External), Zone::External);
        assert_eq!(parse_zone(None, Zone::Unzoned), Zone::Unzoned);
    }
}
