use std::collections::BTreeMap;
use serde_json::Value;
use crate::reading::domain::{Metric, ParseError, Reading, Zone};
use crate::transport::domain::TransportKind;


/// Normalizador: convierte los payloads crudos de ambos transportes en una
/// lectura canónica, o los rechaza con un error tipado.
///
/// * Transporte de sondeo: objeto delimitado por llaves con claves
///   `temp, hum, lux, co2, tvoc` (literal flotante o entero). Las claves se
///   direccionan por nombre, no por posición.
/// * Transporte de suscripción: una línea de cinco campos separados por coma
///   en el orden fijo `temperatura,humedad,lux,eco2,tvoc`. El orden es un
///   contrato externo heredado y no debe reinterpretarse.
///
/// Los payloads no traen zona: se estampa una zona por transporte, tomada de
/// la configuración.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    pub poller_zone: Zone,
    pub subscriber_zone: Zone,
}

impl Normalizer {
    pub fn new(poller_zone: Zone, subscriber_zone: Zone) -> Self {
        Self { poller_zone, subscriber_zone }
    }

    pub fn parse(&self, kind: TransportKind, raw: &str, now_ms: i64) -> Result<Reading, ParseError> {
        let metrics = match kind {
            TransportKind::Poller => parse_braced(raw)?,
            TransportKind::Subscriber => parse_positional(raw)?,
        };

        Ok(Reading {
            timestamp: now_ms,
            zone: self.zone_for(kind),
            metrics,
        })
    }

    fn zone_for(&self, kind: TransportKind) -> Zone {
        match kind {
            TransportKind::Poller => self.poller_zone,
            TransportKind::Subscriber => self.subscriber_zone,
        }
    }
}


/// Parsea el formato delimitado por llaves del canal de sondeo.
///
/// No es necesario que estén las cinco claves; las ausentes son un no-op para
/// los consumidores. Un objeto sin ninguna clave conocida se rechaza: una
/// lectura sin métricas no es una lectura.
fn parse_braced(raw: &str) -> Result<BTreeMap<Metric, f64>, ParseError> {
    let line = raw.trim();
    if !line.starts_with('{') || !line.ends_with('}') {
        return Err(ParseError::Malformed("se esperaba un objeto entre llaves".to_string()));
    }

    let value: Value = serde_json::from_str(line)
        .map_err(|e| ParseError::Malformed(e.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| ParseError::Malformed("el payload no es un objeto".to_string()))?;

    let mut metrics = BTreeMap::new();
    for metric in Metric::ALL {
        let Some(field) = object.get(metric.wire_key()) else {
            continue;
        };
        let number = field.as_f64().ok_or_else(|| ParseError::NonNumeric {
            field: metric.key(),
            value: field.to_string(),
        })?;
        metrics.insert(metric, coerce(metric, number));
    }

    if metrics.is_empty() {
        return Err(ParseError::EmptyPayload);
    }
    Ok(metrics)
}


/// Parsea la línea posicional de cinco campos del canal de suscripción.
fn parse_positional(raw: &str) -> Result<BTreeMap<Metric, f64>, ParseError> {
    let parts: Vec<&str> = raw.trim().split(',').collect();
    if parts.len() != Metric::ALL.len() {
        return Err(ParseError::FieldCount {
            expected: Metric::ALL.len(),
            found: parts.len(),
        });
    }

    let mut metrics = BTreeMap::new();
    for (metric, part) in Metric::ALL.into_iter().zip(parts) {
        let text = part.trim();
        if text.is_empty() {
            return Err(ParseError::MissingField(metric.key()));
        }
        let number: f64 = text.parse().map_err(|_| ParseError::NonNumeric {
            field: metric.key(),
            value: text.to_string(),
        })?;
        metrics.insert(metric, coerce(metric, number));
    }
    Ok(metrics)
}


/// Coerción numérica: lux/co2/tvoc se truncan a entero, como hace el firmware.
fn coerce(metric: Metric, number: f64) -> f64 {
    if metric.is_integer() { number.trunc() } else { number }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new(Zone::External, Zone::Unzoned)
    }

    #[test]
    fn braced_payload_with_all_keys_maps_exactly() {
        let reading = normalizer()
            .parse(TransportKind::Poller, r#"{"temp": 24.5, "hum": 61.2, "lux": 850, "co2": 612, "tvoc": 14}"#, 1_000)
            .unwrap();

        assert_eq!(reading.zone, Zone::External);
        assert_eq!(reading.timestamp, 1_000);
        assert_eq!(reading.metrics.len(), 5);
        assert_eq!(reading.get(Metric::Temperature), Some(24.5));
        assert_eq!(reading.get(Metric::Humidity), Some(61.2));
        assert_eq!(reading.get(Metric::Lux), Some(850.0));
        assert_eq!(reading.get(Metric::Co2), Some(612.0));
        assert_eq!(reading.get(Metric::Tvoc), Some(14.0));
    }

    #[test]
    fn braced_payload_accepts_partial_keys() {
        let reading = normalizer()
            .parse(TransportKind::Poller, r#"{"temp": 22.0, "hum": 55.0}"#, 0)
            .unwrap();

        assert_eq!(reading.metrics.len(), 2);
        assert_eq!(reading.get(Metric::Lux), None);
    }

    #[test]
    fn braced_payload_without_known_keys_is_rejected() {
        let err = normalizer()
            .parse(TransportKind::Poller, r#"{"pressure": 1013}"#, 0)
            .unwrap_err();
        assert_eq!(err, ParseError::EmptyPayload);
    }

    #[test]
    fn braced_payload_with_non_numeric_value_is_rejected() {
        let err = normalizer()
            .parse(TransportKind::Poller, r#"{"temp": "caliente"}"#, 0)
            .unwrap_err();
        assert!(matches!(err, ParseError::NonNumeric { field: "temperature", .. }));
    }

    #[test]
    fn braced_payload_without_braces_is_rejected() {
        let err = normalizer()
            .parse(TransportKind::Poller, "temp=22", 0)
            .unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
    }

    #[test]
    fn positional_payload_maps_fields_in_fixed_order() {
        let reading = normalizer()
            .parse(TransportKind::Subscriber, "22,55,1000,800,30", 0)
            .unwrap();

        assert_eq!(reading.zone, Zone::Unzoned);
        assert_eq!(reading.get(Metric::Temperature), Some(22.0));
        assert_eq!(reading.get(Metric::Humidity), Some(55.0));
        assert_eq!(reading.get(Metric::Lux), Some(1000.0));
        assert_eq!(reading.get(Metric::Co2), Some(800.0));
        assert_eq!(reading.get(Metric::Tvoc), Some(30.0));
    }

    #[test]
    fn positional_payload_truncates_integer_metrics() {
        let reading = normalizer()
            .parse(TransportKind::Subscriber, "22.4,55.1,1000.9,800.5,30.2", 0)
            .unwrap();

        assert_eq!(reading.get(Metric::Temperature), Some(22.4));
        assert_eq!(reading.get(Metric::Lux), Some(1000.0));
        assert_eq!(reading.get(Metric::Co2), Some(800.0));
        assert_eq!(reading.get(Metric::Tvoc), Some(30.0));
    }

    #[test]
    fn positional_payload_with_three_fields_is_rejected() {
        let err = normalizer()
            .parse(TransportKind::Subscriber, "22,55,1000", 0)
            .unwrap_err();
        assert_eq!(err, ParseError::FieldCount { expected: 5, found: 3 });
    }

    #[test]
    fn positional_payload_with_six_fields_is_rejected() {
        let err = normalizer()
            .parse(TransportKind::Subscriber, "22,55,1000,800,30,9", 0)
            .unwrap_err();
        assert_eq!(err, ParseError::FieldCount { expected: 5, found: 6 });
    }

    #[test]
    fn positional_payload_with_empty_field_is_rejected() {
        let err = normalizer()
            .parse(TransportKind::Subscriber, "22,,1000,800,30", 0)
            .unwrap_err();
        assert_eq!(err, ParseError::MissingField("humidity"));
    }

    #[test]
    fn positional_payload_with_garbage_field_is_rejected() {
        let err = normalizer()
            .parse(TransportKind::Subscriber, "22,x,1000,800,30", 0)
            .unwrap_err();
        assert!(matches!(err, ParseError::NonNumeric { field: "humidity", .. }));
    }
}
