//! Servicio de telemetría para una cámara de cultivo controlada.
//!
//! Adquiere lecturas de sensores por dos transportes independientes (sondeo
//! petición/respuesta sobre un enlace de líneas y push por MQTT), las
//! normaliza en una lectura canónica y las distribuye a consumidores
//! registrados: una ventana de series temporales acotada y un conjunto de
//! medidores animados por zona.

pub mod channels;
pub mod config;
pub mod context;
pub mod gateway;
pub mod gauges;
pub mod profile;
pub mod reading;
pub mod series;
pub mod system;
pub mod transport;
