//! Serde description of an animated scene.
//!
//! ```json
//! {
//!   "properties": {
//!     "opacity": [
//!       { "type": "float", "values": [0, 1], "duration": 500 },
//!       { "type": "float", "values": [0], "start_delay": 1000,
//!         "interpolator": { "type": "accelerate_decelerate" } }
//!     ]
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::animation::Timing;
use crate::timeline::PropertyId;
use crate::{Animation, Argb, Error, Keyframe, Lerp, PathData, Property, Timeline, Value};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub properties: BTreeMap<String, Vec<AnimationConfig>>,
}

/// One animation of a property, tagged with the kind of value it animates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimationConfig {
    Float(ValuesConfig<f32>),
    Argb(ValuesConfig<Argb>),
    FloatArray(ValuesConfig<Vec<f32>>),
    PathMorph(ValuesConfig<PathData>),
    PathMotion(MotionConfig),
}

/// Either plain `values`, spread evenly, or explicit `keyframes`. Keyframes
/// win when both are given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuesConfig<T> {
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<T>,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub keyframes: Vec<Keyframe<T>>,
    #[serde(flatten)]
    pub timing: Timing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    pub path: PathData,
    #[serde(flatten)]
    pub timing: Timing,
}

impl<T: Lerp + 'static> ValuesConfig<T> {
    fn build(
        &self,
        of_values: fn(Vec<T>) -> Result<Animation<T>, Error>,
        of_keyframes: fn(Vec<Keyframe<T>>) -> Result<Animation<T>, Error>,
    ) -> Result<Animation<T>, Error> {
        let animation = if self.keyframes.is_empty() {
            of_values(self.values.clone())?
        } else {
            of_keyframes(self.keyframes.clone())?
        };
        Ok(animation.with_timing(self.timing.clone()))
    }
}

impl AnimationConfig {
    fn kind(&self) -> &'static str {
        match self {
            AnimationConfig::Float(_) => "float",
            AnimationConfig::Argb(_) => "argb",
            AnimationConfig::FloatArray(_) => "float_array",
            AnimationConfig::PathMorph(_) => "path_morph",
            AnimationConfig::PathMotion(_) => "path_motion",
        }
    }
}

/// A built scene: the timeline and the id of every named property on it.
pub struct Scene {
    pub timeline: Timeline,
    pub properties: BTreeMap<String, PropertyId>,
}

impl Scene {
    pub fn from_reader<R: Read>(r: R) -> Result<Self, Error> {
        SceneConfig::from_reader(r)?.build()
    }

    /// Every property's value at the timeline's current play time, by name.
    pub fn values(&mut self) -> Result<Vec<(String, Value)>, Error> {
        let mut values = Vec::with_capacity(self.properties.len());
        for (name, id) in self.properties.iter() {
            values.push((name.clone(), self.timeline.value_of(*id)?));
        }
        Ok(values)
    }
}

impl SceneConfig {
    pub fn from_reader<R: Read>(r: R) -> Result<Self, Error> {
        Ok(serde_json::from_reader(r)?)
    }

    pub fn build(&self) -> Result<Scene, Error> {
        let mut timeline = Timeline::new();
        let mut properties = BTreeMap::new();
        for (name, animations) in self.properties.iter() {
            let first = animations.first().ok_or(Error::NoAnimations)?;
            let id = match first {
                AnimationConfig::Float(_) => {
                    let property = collect(name, animations, |config| match config {
                        AnimationConfig::Float(c) => Some(c.build(
                            |v| Animation::of_float(v),
                            |k| Animation::of_float_keyframes(k),
                        )),
                        _ => None,
                    })?;
                    timeline.register(property).id()
                }
                AnimationConfig::Argb(_) => {
                    let property = collect(name, animations, |config| match config {
                        AnimationConfig::Argb(c) => Some(c.build(
                            |v| Animation::of_argb(v),
                            |k| Animation::of_argb_keyframes(k),
                        )),
                        _ => None,
                    })?;
                    timeline.register(property).id()
                }
                AnimationConfig::FloatArray(_) => {
                    let property = collect(name, animations, |config| match config {
                        AnimationConfig::FloatArray(c) => Some(c.build(
                            |v| Animation::of_float_array(v),
                            |k| Animation::of_float_array_keyframes(k),
                        )),
                        _ => None,
                    })?;
                    timeline.register(property).id()
                }
                AnimationConfig::PathMorph(_) => {
                    let property = collect(name, animations, |config| match config {
                        AnimationConfig::PathMorph(c) => Some(c.build(
                            |v| Animation::of_path_morph(v),
                            |k| Animation::of_path_morph_keyframes(k),
                        )),
                        _ => None,
                    })?;
                    timeline.register(property).id()
                }
                AnimationConfig::PathMotion(_) => {
                    let property = collect(name, animations, |config| match config {
                        AnimationConfig::PathMotion(c) => Some(
                            Animation::of_path_motion(&c.path)
                                .map(|a| a.with_timing(c.timing.clone())),
                        ),
                        _ => None,
                    })?;
                    timeline.register(property).id()
                }
            };
            properties.insert(name.clone(), id);
        }
        Ok(Scene {
            timeline,
            properties,
        })
    }
}

/// Builds one property from configs that must all be of the kind `pick`
/// accepts.
fn collect<V: 'static>(
    name: &str,
    animations: &[AnimationConfig],
    pick: impl Fn(&AnimationConfig) -> Option<Result<Animation<V>, Error>>,
) -> Result<Property<V>, Error> {
    let mut builder = Property::builder();
    for config in animations {
        let animation = pick(config).ok_or_else(|| {
            Error::InvalidValueType(format!(
                "property {:?} mixes {} with {} animations",
                name,
                animations[0].kind(),
                config.kind()
            ))
        })??;
        builder = builder.add(animation);
    }
    builder.build()
}
