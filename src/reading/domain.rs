//! Dominio de Lecturas y Modelos de Datos.
//!
//! Este módulo define las estructuras de datos fundamentales que se intercambian
//! entre los distintos componentes del sistema: la lectura canónica de sensores
//! (`Reading`) y los errores tipados de normalización (`ParseError`).


use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};


/// Zona física a la que pertenece una lectura.
///
/// La cámara tiene dos juegos de sensores separados (interno y externo).
/// `Unzoned` cubre el modo legado de zona única: la lectura aplica a los
/// consumidores que no distinguen zona.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Zone {
    Internal,
    External,
    #[default]
    Unzoned,
}


/// Métrica ambiental medida por los sensores de la cámara.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    Temperature,
    Humidity,
    Lux,
    Co2,
    Tvoc,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::Lux,
        Metric::Co2,
        Metric::Tvoc,
    ];

    /// Nombre canónico de la métrica.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::Lux => "lux",
            Metric::Co2 => "co2",
            Metric::Tvoc => "tvoc",
        }
    }

    /// Clave corta usada por el formato delimitado por llaves del firmware.
    pub fn wire_key(&self) -> &'static str {
        match self {
            Metric::Temperature => "temp",
            Metric::Humidity => "hum",
            Metric::Lux => "lux",
            Metric::Co2 => "co2",
            Metric::Tvoc => "tvoc",
        }
    }

    /// Temperatura y humedad son decimales; lux/co2/tvoc son enteros en el cable.
    pub fn is_integer(&self) -> bool {
        matches!(self, Metric::Lux | Metric::Co2 | Metric::Tvoc)
    }
}


/// Instantánea normalizada de sensores: la unidad que circula por todo el sistema.
///
/// Invariante: `metrics` nunca está vacío. Un payload que no produce ninguna
/// métrica es un payload rechazado, no una lectura. Las claves ausentes son un
/// no-op para los consumidores, nunca se tratan como cero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reading {
    /// Instante de ingesta en milisegundos epoch (el cable no trae timestamp).
    pub timestamp: i64,
    pub zone: Zone,
    pub metrics: BTreeMap<Metric, f64>,
}

impl Reading {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.metrics.get(&metric).copied()
    }
}


/// Error tipado de normalización: nombra qué campo falló y por qué.
///
/// El parseo es total y sin efectos: o produce un `Reading` completo o uno de
/// estos errores. Nunca se emiten lecturas parciales.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("campo faltante: {0}")]
    MissingField(&'static str),

    #[error("valor no numérico en {field}: '{value}'")]
    NonNumeric { field: &'static str, value: String },

    #[error("cantidad de campos inválida: se esperaban {expected}, llegaron {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("payload sin métricas conocidas")]
    EmptyPayload,

    #[error("payload malformado: {0}")]
    Malformed(String),
}
