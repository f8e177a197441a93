//! Buffers de series temporales en memoria.
//!
//! Contenedores acotados que acumulan la historia reciente de cada métrica
//! para el gráfico combinado. La persistencia más allá de esta ventana en
//! memoria queda fuera de alcance.


use std::collections::{BTreeMap, VecDeque};
use crate::gateway::domain::{ConsumerError, ReadingConsumer};
use crate::reading::domain::{Metric, Reading};


/// Punto de serie: solo se agrega, nunca se muta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesPoint {
    pub timestamp: i64,
    pub value: f64,
}


/// Historia acotada de una métrica, ordenada por timestamp.
///
/// Invariantes: la secuencia es no-decreciente en el tiempo y la expulsión
/// por capacidad elimina siempre del extremo más viejo, sin reordenar.
#[derive(Debug, Clone)]
pub struct SeriesBuffer {
    points: VecDeque<TimeSeriesPoint>,
    capacity: usize,
}

impl SeriesBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Agrega un punto; si el timestamp retrocede (deriva de reloj) se fija
    /// al último conocido en lugar de reordenar la secuencia.
    pub fn push(&mut self, timestamp: i64, value: f64) {
        let timestamp = match self.points.back() {
            Some(last) if timestamp < last.timestamp => last.timestamp,
            _ => timestamp,
        };

        self.points.push_back(TimeSeriesPoint { timestamp, value });
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = &TimeSeriesPoint> {
        self.points.iter()
    }

    /// Vista reescalada a `[0,1]` por min-max sobre los puntos retenidos.
    ///
    /// Una serie sin varianza (todos los valores iguales) se dibuja como
    /// línea plana en 0.5; es convención de presentación, no un error.
    pub fn rescaled(&self) -> Vec<TimeSeriesPoint> {
        let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in &self.points {
            min = min.min(p.value);
            max = max.max(p.value);
        }

        self.points
            .iter()
            .map(|p| TimeSeriesPoint {
                timestamp: p.timestamp,
                value: if max == min { 0.5 } else { (p.value - min) / (max - min) },
            })
            .collect()
    }
}


/// Consumidor de ingesta: una serie acotada por métrica presente.
///
/// Cada métrica conserva su propio conjunto nativo de timestamps; no hay
/// remuestreo ni interpolación entre métricas.
#[derive(Debug, Clone)]
pub struct SeriesSet {
    series: BTreeMap<Metric, SeriesBuffer>,
    capacity: usize,
}

impl SeriesSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            series: BTreeMap::new(),
            capacity,
        }
    }

    pub fn append(&mut self, reading: &Reading) {
        for (metric, value) in &reading.metrics {
            self.series
                .entry(*metric)
                .or_insert_with(|| SeriesBuffer::new(self.capacity))
                .push(reading.timestamp, *value);
        }
    }

    pub fn buffer(&self, metric: Metric) -> Option<&SeriesBuffer> {
        self.series.get(&metric)
    }

    /// Vista de render: cada métrica reescalada de forma independiente.
    pub fn render_view(&self) -> BTreeMap<Metric, Vec<TimeSeriesPoint>> {
        self.series
            .iter()
            .map(|(metric, buffer)| (*metric, buffer.rescaled()))
            .collect()
    }
}

impl ReadingConsumer for SeriesSet {
    fn name(&self) -> &'static str {
        "series"
    }

    fn on_reading(&mut self, reading: &Reading) -> Result<(), ConsumerError> {
        self.append(reading);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::domain::Zone;

    fn reading(ts: i64, temp: f64) -> Reading {
        Reading {
            timestamp: ts,
            zone: Zone::External,
            metrics: BTreeMap::from([(Metric::Temperature, temp)]),
        }
    }

    #[test]
    fn eviction_keeps_the_most_recent_in_order() {
        let mut buffer = SeriesBuffer::new(3);
        for i in 0..4 {
            buffer.push(i, i as f64);
        }

        assert_eq!(buffer.len(), 3);
        let kept: Vec<i64> = buffer.points().map(|p| p.timestamp).collect();
        assert_eq!(kept, vec![1, 2, 3]);
    }

    #[test]
    fn timestamps_never_decrease() {
        let mut buffer = SeriesBuffer::new(8);
        buffer.push(100, 1.0);
        buffer.push(90, 2.0);

        let stamps: Vec<i64> = buffer.points().map(|p| p.timestamp).collect();
        assert_eq!(stamps, vec![100, 100]);
    }

    #[test]
    fn flat_series_rescales_to_half() {
        let mut buffer = SeriesBuffer::new(8);
        for i in 0..5 {
            buffer.push(i, 42.0);
        }

        for p in buffer.rescaled() {
            assert_eq!(p.value, 0.5);
        }
    }

    #[test]
    fn rescale_spans_zero_to_one() {
        let mut buffer = SeriesBuffer::new(8);
        buffer.push(0, 10.0);
        buffer.push(1, 15.0);
        buffer.push(2, 20.0);

        let view = buffer.rescaled();
        assert_eq!(view[0].value, 0.0);
        assert_eq!(view[1].value, 0.5);
        assert_eq!(view[2].value, 1.0);
    }

    #[test]
    fn metrics_rescale_independently() {
        let mut set = SeriesSet::new(8);
        let mut r = reading(0, 20.0);
        r.metrics.insert(Metric::Lux, 500.0);
        set.append(&r);
        let mut r = reading(1, 30.0);
        r.metrics.insert(Metric::Lux, 1500.0);
        set.append(&r);

        let view = set.render_view();
        assert_eq!(view[&Metric::Temperature].last().unwrap().value, 1.0);
        assert_eq!(view[&Metric::Lux].last().unwrap().value, 1.0);
    }

    #[test]
    fn absent_metric_is_a_no_op() {
        let mut set = SeriesSet::new(8);
        set.append(&reading(0, 25.0));

        assert_eq!(set.buffer(Metric::Temperature).unwrap().len(), 1);
        assert!(set.buffer(Metric::Humidity).is_none());
    }
}
