use std::fmt;

use crate::{Argb, PathData, Point};

/// Any value a property can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Float(f32),
    Argb(Argb),
    FloatArray(Vec<f32>),
    Path(PathData),
    Point(Point),
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<Argb> for Value {
    fn from(value: Argb) -> Self {
        Value::Argb(value)
    }
}

impl From<Vec<f32>> for Value {
    fn from(value: Vec<f32>) -> Self {
        Value::FloatArray(value)
    }
}

impl From<PathData> for Value {
    fn from(value: PathData) -> Self {
        Value::Path(value)
    }
}

impl From<Point> for Value {
    fn from(value: Point) -> Self {
        Value::Point(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(v) => write!(f, "{}", v),
            Value::Argb(color) => write!(f, "{}", color),
            Value::FloatArray(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Value::Path(path) => write!(f, "{}", path),
            Value::Point(p) => write!(f, "({}, {})", p.x, p.y),
        }
    }
}
