use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, PathData, Point};

/// Value types that keyframes can interpolate between.
pub trait Lerp: Clone {
    /// The value `t` of the way from `self` to `other`. `t` may fall
    /// outside [0, 1] when an interpolator overshoots.
    fn lerp(&self, other: &Self, t: f32) -> Result<Self, Error>;

    /// Same as [`Lerp::lerp`], writing into `out` so that its storage can
    /// be reused across frames.
    fn lerp_into(&self, other: &Self, t: f32, out: &mut Self) -> Result<(), Error> {
        *out = self.lerp(other, t)?;
        Ok(())
    }
}

impl Lerp for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Result<Self, Error> {
        Ok(self + (other - self) * t)
    }
}

impl Lerp for Point {
    fn lerp(&self, other: &Self, t: f32) -> Result<Self, Error> {
        Ok(Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        ))
    }
}

impl Lerp for Vec<f32> {
    fn lerp(&self, other: &Self, t: f32) -> Result<Self, Error> {
        let mut out = Vec::with_capacity(self.len());
        self.lerp_into(other, t, &mut out)?;
        Ok(out)
    }

    fn lerp_into(&self, other: &Self, t: f32, out: &mut Self) -> Result<(), Error> {
        if self.len() != other.len() {
            return Err(Error::InvalidValueType(format!(
                "can't interpolate float arrays of length {} and {}",
                self.len(),
                other.len()
            )));
        }
        out.resize(self.len(), 0.0);
        for ((o, a), b) in out.iter_mut().zip(self.iter()).zip(other.iter()) {
            *o = a + t * (b - a);
        }
        Ok(())
    }
}

impl Lerp for PathData {
    fn lerp(&self, other: &Self, t: f32) -> Result<Self, Error> {
        let mut out = self.clone();
        out.interpolate(self, other, t)?;
        Ok(out)
    }

    fn lerp_into(&self, other: &Self, t: f32, out: &mut Self) -> Result<(), Error> {
        if !out.can_morph_with(self) {
            *out = self.clone();
        }
        out.interpolate(self, other, t)
    }
}

/// A packed `0xAARRGGBB` sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Argb(pub u32);

impl Argb {
    pub fn new(a: u8, r: u8, g: u8, b: u8) -> Argb {
        Argb((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }
}

fn to_linear(channel: u8) -> f32 {
    (channel as f32 / 255.0).powf(2.2)
}

fn to_srgb(linear: f32) -> u8 {
    (linear.max(0.0).powf(1.0 / 2.2) * 255.0).round().clamp(0.0, 255.0) as u8
}

impl Lerp for Argb {
    /// Red, green and blue are blended in linear light; alpha is blended
    /// as is.
    fn lerp(&self, other: &Self, t: f32) -> Result<Self, Error> {
        let channel = |from: u8, to: u8| {
            let (from, to) = (to_linear(from), to_linear(to));
            to_srgb(from + t * (to - from))
        };
        let (a0, a1) = (self.alpha() as f32 / 255.0, other.alpha() as f32 / 255.0);
        let a = ((a0 + t * (a1 - a0)) * 255.0).round().clamp(0.0, 255.0) as u8;
        Ok(Argb::new(
            a,
            channel(self.red(), other.red()),
            channel(self.green(), other.green()),
            channel(self.blue(), other.blue()),
        ))
    }
}

impl From<u32> for Argb {
    fn from(value: u32) -> Self {
        Argb(value)
    }
}

impl FromStr for Argb {
    type Err = Error;

    /// Accepts `#RRGGBB` (opaque) and `#AARRGGBB`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        let invalid = || Error::InvalidValueType(format!("{:?} is not a colour", s));
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        match hex.len() {
            6 => Ok(Argb(0xFF00_0000 | value)),
            8 => Ok(Argb(value)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Argb {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Argb> for String {
    fn from(color: Argb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}
