use std::f64::consts::TAU;

/// Easing curves mapping normalized time `[0, 1]` to normalized progress.
///
/// Names follow the common animation-library convention where `Power1` is
/// quadratic, `Power2` cubic and `Power3` quartic.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum Ease {
    #[default]
    Linear,
    Power2In,
    Power2Out,
    Power3Out,
    ElasticOut {
        amplitude: f64,
        period: f64,
    },
}

impl Ease {
    pub const ELASTIC: Ease = Ease::ElasticOut {
        amplitude: 1.0,
        period: 0.3,
    };

    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power2In => t * t * t,
            Ease::Power2Out => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Ease::Power3Out => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv * inv
            }
            Ease::ElasticOut { amplitude, period } => elastic_out(t, amplitude, period),
        }
    }
}

fn elastic_out(t: f64, amplitude: f64, period: f64) -> f64 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let amplitude = amplitude.max(1.0);
    let period = if period > 0.0 { period } else { 0.3 };
    let shift = period / TAU * (1.0 / amplitude).asin();
    amplitude * 2f64.powf(-10.0 * t) * ((t - shift) * TAU / period).sin() + 1.0
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
