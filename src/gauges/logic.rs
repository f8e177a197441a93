use std::collections::HashMap;
use chrono::Utc;
use crate::config::gauge::{CO2_DIVISOR, LUX_DIVISOR, STRIP_ANIM_MS, STRIP_MAX, TEMP_ANIM_MS, TVOC_DIVISOR};
use crate::gateway::domain::{ConsumerError, ReadingConsumer};
use crate::gauges::domain::GaugeState;
use crate::profile::domain::PlantProfile;
use crate::reading::domain::{Metric, Reading, Zone};


/// Conjunto de medidores instantáneos por `(zona, métrica)`.
///
/// Política de recorte por métrica (los valores fuera de rango se recortan,
/// nunca se rechazan; eso es responsabilidad del consumidor, no del
/// normalizador):
/// * temperatura: al rango del perfil de planta activo;
/// * humedad: a `[0,100]`;
/// * lux/co2/tvoc: `target` conserva el valor verdadero para el texto y solo
///   la fracción de presentación pasa por el divisor y se tapa en 100.
#[derive(Debug, Clone)]
pub struct ZoneGaugeSet {
    gauges: HashMap<(Zone, Metric), GaugeState>,
    profile: PlantProfile,
}

impl ZoneGaugeSet {
    pub fn new(profile: PlantProfile) -> Self {
        Self {
            gauges: HashMap::new(),
            profile,
        }
    }

    /// Aplica una lectura: localiza o crea el medidor de cada métrica
    /// presente, fija su objetivo y arranca una animación nueva desde el
    /// valor actualmente mostrado.
    pub fn apply(&mut self, reading: &Reading, now_ms: i64) {
        for (metric, value) in &reading.metrics {
            let target = self.clamp_target(*metric, *value);
            let fraction = self.display_fraction(*metric, target);
            let duration = match metric {
                Metric::Temperature => TEMP_ANIM_MS,
                _ => STRIP_ANIM_MS,
            };

            let gauge = self.gauges
                .entry((reading.zone, *metric))
                .or_insert_with(GaugeState::new);
            gauge.target = target;
            gauge.fraction.start(fraction, duration, now_ms);
        }
    }

    pub fn target(&self, zone: Zone, metric: Metric) -> Option<f64> {
        self.gauges.get(&(zone, metric)).map(|g| g.target)
    }

    pub fn displayed(&mut self, zone: Zone, metric: Metric, now_ms: i64) -> Option<f64> {
        self.gauges.get_mut(&(zone, metric)).map(|g| g.displayed(now_ms))
    }

    pub fn len(&self) -> usize {
        self.gauges.len()
    }

    /// Borrado externo explícito: único camino que destruye medidores.
    pub fn clear(&mut self) {
        self.gauges.clear();
    }

    fn clamp_target(&self, metric: Metric, value: f64) -> f64 {
        match metric {
            Metric::Temperature => value.clamp(self.profile.temp_min, self.profile.temp_max),
            Metric::Humidity => value.clamp(0.0, 100.0),
            Metric::Lux | Metric::Co2 | Metric::Tvoc => value,
        }
    }

    fn display_fraction(&self, metric: Metric, target: f64) -> f64 {
        match metric {
            Metric::Temperature => {
                let span = self.profile.temp_max - self.profile.temp_min;
                if span <= 0.0 {
                    0.0
                } else {
                    (target - self.profile.temp_min) * STRIP_MAX / span
                }
            }
            Metric::Humidity => target,
            Metric::Co2 => (target / CO2_DIVISOR).clamp(0.0, STRIP_MAX),
            Metric::Tvoc => (target / TVOC_DIVISOR).clamp(0.0, STRIP_MAX),
            Metric::Lux => (target / LUX_DIVISOR).clamp(0.0, STRIP_MAX),
        }
    }
}

impl ReadingConsumer for ZoneGaugeSet {
    fn name(&self) -> &'static str {
        "gauges"
    }

    fn on_reading(&mut self, reading: &Reading) -> Result<(), ConsumerError> {
        self.apply(reading, Utc::now().timestamp_millis());
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use super::*;

    fn set() -> ZoneGaugeSet {
        ZoneGaugeSet::new(PlantProfile::default())
    }

    fn reading(zone: Zone, metric: Metric, value: f64) -> Reading {
        Reading {
            timestamp: 0,
            zone,
            metrics: BTreeMap::from([(metric, value)]),
        }
    }

    #[test]
    fn gauges_are_created_lazily_per_zone_and_metric() {
        let mut gauges = set();
        assert_eq!(gauges.len(), 0);

        gauges.apply(&reading(Zone::External, Metric::Temperature, 31.0), 0);
        gauges.apply(&reading(Zone::Internal, Metric::Temperature, 26.0), 0);

        assert_eq!(gauges.len(), 2);
        assert_eq!(gauges.target(Zone::External, Metric::Temperature), Some(31.0));
        assert_eq!(gauges.target(Zone::Internal, Metric::Temperature), Some(26.0));
        assert_eq!(gauges.target(Zone::Unzoned, Metric::Temperature), None);
    }

    #[test]
    fn temperature_is_clamped_to_the_profile_range() {
        let mut gauges = set();
        gauges.apply(&reading(Zone::External, Metric::Temperature, 55.0), 0);
        assert_eq!(gauges.target(Zone::External, Metric::Temperature), Some(40.0));

        gauges.apply(&reading(Zone::External, Metric::Temperature, 5.0), 10_000);
        assert_eq!(gauges.target(Zone::External, Metric::Temperature), Some(20.0));
    }

    #[test]
    fn humidity_is_clamped_to_percent() {
        let mut gauges = set();
        gauges.apply(&reading(Zone::Unzoned, Metric::Humidity, 120.0), 0);
        assert_eq!(gauges.target(Zone::Unzoned, Metric::Humidity), Some(100.0));
    }

    #[test]
    fn intensity_metrics_keep_the_true_value_and_cap_the_fraction() {
        let mut gauges = set();
        gauges.apply(&reading(Zone::Unzoned, Metric::Co2, 3_000.0), 0);

        assert_eq!(gauges.target(Zone::Unzoned, Metric::Co2), Some(3_000.0));
        // 3000 / 20 = 150, tapado a 100 al final de la animación.
        let displayed = gauges.displayed(Zone::Unzoned, Metric::Co2, 10_000).unwrap();
        assert_eq!(displayed, 100.0);
    }

    #[test]
    fn negative_lux_caps_the_fraction_at_zero() {
        let mut gauges = set();
        gauges.apply(&reading(Zone::Unzoned, Metric::Lux, -40.0), 0);

        assert_eq!(gauges.target(Zone::Unzoned, Metric::Lux), Some(-40.0));
        assert_eq!(gauges.displayed(Zone::Unzoned, Metric::Lux, 10_000), Some(0.0));
    }

    #[test]
    fn successive_updates_animate_without_jumps() {
        let mut gauges = set();
        gauges.apply(&reading(Zone::External, Metric::Humidity, 80.0), 0);

        let mid = gauges.displayed(Zone::External, Metric::Humidity, 200).unwrap();
        gauges.apply(&reading(Zone::External, Metric::Humidity, 20.0), 200);

        let after = gauges.displayed(Zone::External, Metric::Humidity, 200).unwrap();
        assert!((after - mid).abs() < 1e-9);
    }

    #[test]
    fn clear_is_the_only_way_gauges_are_destroyed() {
        let mut gauges = set();
        gauges.apply(&reading(Zone::External, Metric::Temperature, 30.0), 0);
        gauges.apply(&reading(Zone::External, Metric::Temperature, 25.0), 1_000);
        assert_eq!(gauges.len(), 1);

        gauges.clear();
        assert_eq!(gauges.len(), 0);
    }
}
