//! Keyframe animation of vector shape properties.
//!
//! Animations are queued on [`Property`]s, properties are registered on a
//! [`Timeline`], and ticking the timeline moves every property to the same
//! play time. Path data is parsed into [`PathData`], which can be morphed,
//! flattened into cubic segments, or followed by a moving point.

pub use animation::*;
pub use config::{AnimationConfig, Scene, SceneConfig};
pub use error::Error;
pub use interpolator::Interpolator;
pub use keyframe::{Keyframe, KeyframeSet, Keyframes};
pub use lerp::{Argb, Lerp};
pub use motion::PathKeyframeSet;
pub use path::{CommandKind, PathCommand, PathData};
pub use property::{Property, PropertyBuilder};
pub use timeline::{PropertyId, PropertyKey, Timeline};
pub use value::Value;

mod animation;
pub mod config;
mod error;
mod interpolator;
mod keyframe;
mod lerp;
pub mod motion;
pub mod path;
mod property;
mod timeline;
mod value;

pub type Point = euclid::default::Point2D<f32>;

pub mod prelude {
    pub use crate::keyframe::Keyframes;
    pub use crate::lerp::Lerp;
    pub use crate::path::{flatten, PathMeasure, Segment};
    pub use crate::*;
}
