use std::f32::consts::PI;
use std::fmt;
use std::sync::Arc;

use flo_curves::bezier::{curve_intersects_line, Curve};
use flo_curves::{BezierCurveFactory, Coord2};
use serde::{Deserialize, Serialize};

/// Time interpolators: functions that remap an animation fraction. Most
/// map 0 to 0 and 1 to 1, though some overshoot in between.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interpolator {
    Linear,
    AccelerateDecelerate,
    Accelerate {
        #[serde(default = "default_factor")]
        factor: f32,
    },
    Decelerate {
        #[serde(default = "default_factor")]
        factor: f32,
    },
    Anticipate {
        #[serde(default = "default_tension")]
        tension: f32,
    },
    Overshoot {
        #[serde(default = "default_tension")]
        tension: f32,
    },
    AnticipateOvershoot {
        #[serde(default = "default_anticipate_overshoot_tension")]
        tension: f32,
    },
    Bounce,
    Cycle {
        #[serde(default = "default_factor")]
        cycles: f32,
    },
    /// A CSS-style timing curve from (0, 0) to (1, 1) with the two given
    /// control points.
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
    #[serde(skip)]
    Custom(Arc<dyn Fn(f32) -> f32 + Send + Sync>),
}

fn default_factor() -> f32 {
    1.0
}

fn default_tension() -> f32 {
    2.0
}

fn default_anticipate_overshoot_tension() -> f32 {
    2.0 * 1.5
}

impl Interpolator {
    pub fn fast_out_slow_in() -> Self {
        Interpolator::CubicBezier {
            x1: 0.4,
            y1: 0.0,
            x2: 0.2,
            y2: 1.0,
        }
    }

    pub fn fast_out_linear_in() -> Self {
        Interpolator::CubicBezier {
            x1: 0.4,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
        }
    }

    pub fn linear_out_slow_in() -> Self {
        Interpolator::CubicBezier {
            x1: 0.0,
            y1: 0.0,
            x2: 0.2,
            y2: 1.0,
        }
    }

    pub fn custom(f: impl Fn(f32) -> f32 + Send + Sync + 'static) -> Self {
        Interpolator::Custom(Arc::new(f))
    }

    pub fn interpolate(&self, t: f32) -> f32 {
        match self {
            Interpolator::Linear => t,
            Interpolator::AccelerateDecelerate => ((t + 1.0) * PI).cos() / 2.0 + 0.5,
            Interpolator::Accelerate { factor } => {
                if *factor == 1.0 {
                    t * t
                } else {
                    t.powf(2.0 * factor)
                }
            }
            Interpolator::Decelerate { factor } => {
                if *factor == 1.0 {
                    1.0 - (1.0 - t) * (1.0 - t)
                } else {
                    1.0 - (1.0 - t).powf(2.0 * factor)
                }
            }
            Interpolator::Anticipate { tension } => t * t * ((tension + 1.0) * t - tension),
            Interpolator::Overshoot { tension } => {
                let t = t - 1.0;
                t * t * ((tension + 1.0) * t + tension) + 1.0
            }
            Interpolator::AnticipateOvershoot { tension } => {
                if t < 0.5 {
                    0.5 * anticipate(t * 2.0, *tension)
                } else {
                    0.5 * (overshoot(t * 2.0 - 2.0, *tension) + 2.0)
                }
            }
            Interpolator::Bounce => bounce_curve(t),
            Interpolator::Cycle { cycles } => (2.0 * cycles * PI * t).sin(),
            Interpolator::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(t, *x1, *y1, *x2, *y2),
            Interpolator::Custom(f) => f(t),
        }
    }
}

fn anticipate(t: f32, s: f32) -> f32 {
    t * t * ((s + 1.0) * t - s)
}

fn overshoot(t: f32, s: f32) -> f32 {
    t * t * ((s + 1.0) * t + s)
}

fn bounce(t: f32) -> f32 {
    t * t * 8.0
}

fn bounce_curve(t: f32) -> f32 {
    let t = t * 1.1226;
    if t < 0.3535 {
        bounce(t)
    } else if t < 0.7408 {
        bounce(t - 0.54719) + 0.7
    } else if t < 0.9644 {
        bounce(t - 0.8526) + 0.9
    } else {
        bounce(t - 1.0435) + 0.95
    }
}

/// Solves the curve for the `y` at horizontal position `t`. Falls back to
/// `t` when the curve doesn't cross the vertical line, which only happens
/// outside [0, 1].
fn cubic_bezier(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 || t >= 1.0 {
        return t;
    }
    let curve = Curve::from_points(
        Coord2(0.0, 0.0),
        (
            Coord2(x1 as f64, y1 as f64),
            Coord2(x2 as f64, y2 as f64),
        ),
        Coord2(1.0, 1.0),
    );
    let intersection =
        curve_intersects_line(&curve, &(Coord2(t as f64, 0.0), Coord2(t as f64, 1.0)));
    if intersection.is_empty() {
        t
    } else {
        intersection[0].2 .1 as f32
    }
}

impl Default for Interpolator {
    fn default() -> Self {
        Interpolator::Linear
    }
}

impl fmt::Debug for Interpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpolator::Linear => write!(f, "Linear"),
            Interpolator::AccelerateDecelerate => write!(f, "AccelerateDecelerate"),
            Interpolator::Accelerate { factor } => write!(f, "Accelerate({})", factor),
            Interpolator::Decelerate { factor } => write!(f, "Decelerate({})", factor),
            Interpolator::Anticipate { tension } => write!(f, "Anticipate({})", tension),
            Interpolator::Overshoot { tension } => write!(f, "Overshoot({})", tension),
            Interpolator::AnticipateOvershoot { tension } => {
                write!(f, "AnticipateOvershoot({})", tension)
            }
            Interpolator::Bounce => write!(f, "Bounce"),
            Interpolator::Cycle { cycles } => write!(f, "Cycle({})", cycles),
            Interpolator::CubicBezier { x1, y1, x2, y2 } => {
                write!(f, "CubicBezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
            Interpolator::Custom(_) => write!(f, "Custom"),
        }
    }
}
