//! Dominio de medidores animados.
//!
//! `AnimatedValue` es la primitiva de suavizado de todos los medidores:
//! convierte una secuencia de valores objetivo discretos en un valor de
//! presentación continuo, interpolado en el tiempo con una curva de entrada
//! y salida suaves (cuadrática: acelera y luego desacelera).


/// Máquina de estados de la animación: `Idle → Animating → Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    Animating,
}


#[derive(Debug, Clone)]
pub struct AnimatedValue {
    from: f64,
    to: f64,
    start_ms: i64,
    duration_ms: i64,
    state: AnimationState,
}

impl AnimatedValue {
    pub fn new(initial: f64) -> Self {
        Self {
            from: initial,
            to: initial,
            start_ms: 0,
            duration_ms: 0,
            state: AnimationState::Idle,
        }
    }

    /// Inicia una animación hacia `to`.
    ///
    /// Si ya hay una animación en vuelo, el valor de partida es el valor
    /// *actualmente mostrado* (posiblemente a mitad de interpolación), no el
    /// objetivo anterior. Esto garantiza continuidad ante actualizaciones
    /// rápidas sucesivas: nunca hay un salto discontinuo.
    pub fn start(&mut self, to: f64, duration_ms: i64, now_ms: i64) {
        let from = self.sample(now_ms);
        self.from = from;
        self.to = to;
        self.start_ms = now_ms;
        self.duration_ms = duration_ms;

        if duration_ms <= 0 || from == to {
            self.from = to;
            self.state = AnimationState::Idle;
        } else {
            self.state = AnimationState::Animating;
        }
    }

    /// Valor mostrado en el instante `now_ms`.
    ///
    /// En `t = 1` el valor es exactamente `to` (sin deriva residual) y el
    /// estado vuelve a `Idle`.
    pub fn sample(&mut self, now_ms: i64) -> f64 {
        match self.state {
            AnimationState::Idle => self.to,
            AnimationState::Animating => {
                let t = ((now_ms - self.start_ms) as f64 / self.duration_ms as f64).clamp(0.0, 1.0);
                if t >= 1.0 {
                    self.from = self.to;
                    self.state = AnimationState::Idle;
                    self.to
                } else {
                    self.from + (self.to - self.from) * ease_in_out_quad(t)
                }
            }
        }
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }
}


fn ease_in_out_quad(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}


/// Estado de un medidor por `(zona, métrica)`.
///
/// `target` conserva el valor verdadero de la métrica (para el texto);
/// `fraction` anima la fracción de presentación 0-100 de la tira o el arco.
/// Se crea perezosamente con la primera lectura del par y solo se reinicia
/// por un borrado externo explícito.
#[derive(Debug, Clone)]
pub struct GaugeState {
    pub target: f64,
    pub fraction: AnimatedValue,
}

impl GaugeState {
    pub fn new() -> Self {
        Self {
            target: 0.0,
            fraction: AnimatedValue::new(0.0),
        }
    }

    pub fn displayed(&mut self, now_ms: i64) -> f64 {
        self.fraction.sample(now_ms)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_follows_the_easing_curve_and_lands_exactly() {
        let mut anim = AnimatedValue::new(0.0);
        anim.start(100.0, 1_000, 0);

        assert_eq!(anim.state(), AnimationState::Animating);
        assert!(anim.sample(0) < 1e-9);

        let mid = anim.sample(500);
        assert!(mid > 0.0 && mid < 100.0);

        assert_eq!(anim.sample(1_000), 100.0);
        assert_eq!(anim.state(), AnimationState::Idle);
        assert_eq!(anim.sample(2_000), 100.0);
    }

    #[test]
    fn easing_accelerates_then_decelerates() {
        let mut anim = AnimatedValue::new(0.0);
        anim.start(100.0, 1_000, 0);

        let early = anim.sample(250);
        let late = anim.sample(750);
        // Primer cuarto por debajo de la recta, último cuarto por encima.
        assert!(early < 25.0);
        assert!(late > 75.0);
    }

    #[test]
    fn restart_mid_flight_starts_from_the_displayed_value() {
        let mut anim = AnimatedValue::new(0.0);
        anim.start(100.0, 1_000, 0);

        let displayed = anim.sample(500);
        anim.start(0.0, 1_000, 500);

        // Sin salto en el instante de la transición.
        let after = anim.sample(500);
        assert!((after - displayed).abs() < 1e-9);
        assert_ne!(displayed, 100.0);
    }

    #[test]
    fn zero_duration_jumps_straight_to_target() {
        let mut anim = AnimatedValue::new(10.0);
        anim.start(50.0, 0, 0);

        assert_eq!(anim.state(), AnimationState::Idle);
        assert_eq!(anim.sample(0), 50.0);
    }

    #[test]
    fn starting_towards_the_current_value_stays_idle() {
        let mut anim = AnimatedValue::new(30.0);
        anim.start(30.0, 400, 0);

        assert_eq!(anim.state(), AnimationState::Idle);
        assert_eq!(anim.sample(200), 30.0);
    }
}
