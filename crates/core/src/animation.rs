use std::fmt;

use serde::{Deserialize, Serialize};

use crate::keyframe::{KeyframeSet, Keyframes};
use crate::motion::PathKeyframeSet;
use crate::{Argb, Error, Interpolator, Keyframe, Lerp, PathData, Point};

pub const DEFAULT_DURATION: u64 = 300;

/// How often an animation plays after its first run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum RepeatCount {
    Count(u32),
    Infinite,
}

impl Default for RepeatCount {
    fn default() -> Self {
        RepeatCount::Count(0)
    }
}

impl TryFrom<i64> for RepeatCount {
    type Error = Error;

    /// `-1` stands for infinite.
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(RepeatCount::Infinite),
            n => u32::try_from(n)
                .map(RepeatCount::Count)
                .map_err(|_| Error::InvalidValueType(format!("invalid repeat count {}", n))),
        }
    }
}

impl From<u32> for RepeatCount {
    fn from(count: u32) -> Self {
        RepeatCount::Count(count)
    }
}

impl From<RepeatCount> for i64 {
    fn from(count: RepeatCount) -> Self {
        match count {
            RepeatCount::Count(n) => n as i64,
            RepeatCount::Infinite => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatMode {
    /// Every repetition runs from the start again.
    #[default]
    Restart,
    /// Every other repetition runs backwards.
    Reverse,
}

/// Length of an animation or property including start delay and repeats.
/// `Infinite` orders after every finite duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TotalDuration {
    Finite(u64),
    Infinite,
}

impl TotalDuration {
    /// Milliseconds, with `-1` standing for infinite.
    pub fn as_millis(self) -> i64 {
        match self {
            TotalDuration::Finite(ms) => ms as i64,
            TotalDuration::Infinite => -1,
        }
    }

    pub fn is_infinite(self) -> bool {
        self == TotalDuration::Infinite
    }
}

impl Default for TotalDuration {
    fn default() -> Self {
        TotalDuration::Finite(0)
    }
}

impl fmt::Display for TotalDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TotalDuration::Finite(ms) => write!(f, "{}ms", ms),
            TotalDuration::Infinite => write!(f, "infinite"),
        }
    }
}

/// When and how often an animation runs. Times are in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub start_delay: u64,
    pub duration: u64,
    pub repeat_count: RepeatCount,
    pub repeat_mode: RepeatMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpolator: Option<Interpolator>,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            start_delay: 0,
            duration: DEFAULT_DURATION,
            repeat_count: RepeatCount::default(),
            repeat_mode: RepeatMode::default(),
            interpolator: None,
        }
    }
}

impl Timing {
    pub fn total_duration(&self) -> TotalDuration {
        match self.repeat_count {
            RepeatCount::Infinite => TotalDuration::Infinite,
            RepeatCount::Count(n) => {
                let active = self.duration.saturating_mul(n as u64 + 1);
                TotalDuration::Finite(self.start_delay.saturating_add(active))
            }
        }
    }

    /// Fraction of the current repetition at global time `play_time`,
    /// before easing. Reverse repetitions count down from 1. Before the
    /// start delay this is the fractional part of a negative fraction.
    pub fn linear_fraction(&self, play_time: u64) -> f32 {
        if self.duration == 0 {
            return 1.0;
        }
        let play_time = match self.total_duration() {
            TotalDuration::Finite(total) => play_time.min(total),
            TotalDuration::Infinite => play_time,
        };
        let fraction = (play_time as f64 - self.start_delay as f64) / self.duration as f64;
        let iteration = current_iteration(fraction);
        let mut current = fraction - iteration as f64;
        let within_repeats = match self.repeat_count {
            RepeatCount::Infinite => true,
            RepeatCount::Count(n) => iteration <= n as i64,
        };
        if iteration > 0
            && self.repeat_mode == RepeatMode::Reverse
            && within_repeats
            && iteration % 2 == 1
        {
            current = 1.0 - current;
        }
        current as f32
    }

    /// [`Timing::linear_fraction`] run through the interpolator.
    pub fn fraction(&self, play_time: u64) -> f32 {
        let fraction = self.linear_fraction(play_time);
        match &self.interpolator {
            Some(interpolator) => interpolator.interpolate(fraction),
            None => fraction,
        }
    }
}

/// A whole positive fraction counts as the end of the iteration before it
/// rather than the start of a new one.
fn current_iteration(fraction: f64) -> i64 {
    let iteration = fraction.floor() as i64;
    if fraction == fraction.floor() && fraction > 0.0 {
        iteration - 1
    } else {
        iteration
    }
}

struct Transformer<T, V> {
    forward: Box<dyn Fn(&T) -> V>,
    backward: Option<Box<dyn Fn(&V) -> T>>,
}

/// One timed run over a set of keyframes of type `T`, producing values of
/// type `V`.
///
/// Build it with one of the `of_*` constructors and the consuming timing
/// setters, then hand it to a [`crate::PropertyBuilder`]; it can't be
/// changed after that.
pub struct Animation<T, V = T> {
    keyframes: Box<dyn Keyframes<T>>,
    transformer: Transformer<T, V>,
    timing: Timing,
}

impl<T: Clone + 'static> Animation<T> {
    fn identity(keyframes: impl Keyframes<T> + 'static) -> Self {
        Animation {
            keyframes: Box::new(keyframes),
            transformer: Transformer {
                forward: Box::new(T::clone),
                backward: Some(Box::new(T::clone)),
            },
            timing: Timing::default(),
        }
    }
}

impl<T: Lerp + 'static> Animation<T> {
    fn of_values(values: impl IntoIterator<Item = T>) -> Result<Self, Error> {
        Ok(Self::identity(KeyframeSet::of_values(
            values.into_iter().collect(),
        )?))
    }

    fn of_keyframes(keyframes: impl IntoIterator<Item = Keyframe<T>>) -> Result<Self, Error> {
        Ok(Self::identity(KeyframeSet::of_keyframes(
            keyframes.into_iter().collect(),
        )?))
    }
}

impl Animation<f32> {
    pub fn of_float(values: impl IntoIterator<Item = f32>) -> Result<Self, Error> {
        Self::of_values(values)
    }

    pub fn of_float_keyframes(
        keyframes: impl IntoIterator<Item = Keyframe<f32>>,
    ) -> Result<Self, Error> {
        Self::of_keyframes(keyframes)
    }
}

impl Animation<Argb> {
    pub fn of_argb(values: impl IntoIterator<Item = Argb>) -> Result<Self, Error> {
        Self::of_values(values)
    }

    pub fn of_argb_keyframes(
        keyframes: impl IntoIterator<Item = Keyframe<Argb>>,
    ) -> Result<Self, Error> {
        Self::of_keyframes(keyframes)
    }
}

impl Animation<Vec<f32>> {
    pub fn of_float_array(values: impl IntoIterator<Item = Vec<f32>>) -> Result<Self, Error> {
        Self::of_values(values)
    }

    pub fn of_float_array_keyframes(
        keyframes: impl IntoIterator<Item = Keyframe<Vec<f32>>>,
    ) -> Result<Self, Error> {
        Self::of_keyframes(keyframes)
    }
}

impl Animation<PathData> {
    /// Every value has to be morphable into every other one.
    pub fn of_path_morph(values: impl IntoIterator<Item = PathData>) -> Result<Self, Error> {
        let values = values.into_iter().collect::<Vec<_>>();
        check_morphable(values.iter())?;
        Self::of_values(values)
    }

    pub fn of_path_morph_keyframes(
        keyframes: impl IntoIterator<Item = Keyframe<PathData>>,
    ) -> Result<Self, Error> {
        let keyframes = keyframes.into_iter().collect::<Vec<_>>();
        check_morphable(keyframes.iter().filter_map(Keyframe::value))?;
        Self::of_keyframes(keyframes)
    }
}

fn check_morphable<'a>(mut paths: impl Iterator<Item = &'a PathData>) -> Result<(), Error> {
    let first = match paths.next() {
        Some(first) => first,
        None => return Ok(()),
    };
    for (i, path) in paths.enumerate() {
        if !first.can_morph_with(path) {
            return Err(Error::ShapeMismatch(format!(
                "value {} can't be morphed into {:?}",
                i + 1,
                first.to_string()
            )));
        }
    }
    Ok(())
}

impl Animation<Point> {
    /// Moves a point along `path` at constant speed.
    pub fn of_path_motion(path: &PathData) -> Result<Self, Error> {
        Ok(Self::identity(PathKeyframeSet::new(path)?))
    }
}

impl<T: 'static, V: 'static> Animation<T, V> {
    pub fn start_delay(mut self, start_delay: u64) -> Self {
        self.timing.start_delay = start_delay;
        self
    }

    pub fn duration(mut self, duration: u64) -> Self {
        self.timing.duration = duration;
        self
    }

    pub fn repeat_count(mut self, repeat_count: impl Into<RepeatCount>) -> Self {
        self.timing.repeat_count = repeat_count.into();
        self
    }

    pub fn repeat_mode(mut self, repeat_mode: RepeatMode) -> Self {
        self.timing.repeat_mode = repeat_mode;
        self
    }

    pub fn interpolator(mut self, interpolator: Interpolator) -> Self {
        self.timing.interpolator = Some(interpolator);
        self
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn total_duration(&self) -> TotalDuration {
        self.timing.total_duration()
    }

    /// Replaces the output conversion. The new animation can't take a
    /// chained start value.
    pub fn transform<W>(self, forward: impl Fn(&T) -> W + 'static) -> Animation<T, W> {
        Animation {
            keyframes: self.keyframes,
            transformer: Transformer {
                forward: Box::new(forward),
                backward: None,
            },
            timing: self.timing,
        }
    }

    /// Replaces the output conversion with one that can be undone, so a
    /// missing start value can still be chained in.
    pub fn transform_bidirectional<W>(
        self,
        forward: impl Fn(&T) -> W + 'static,
        backward: impl Fn(&W) -> T + 'static,
    ) -> Animation<T, W> {
        Animation {
            keyframes: self.keyframes,
            transformer: Transformer {
                forward: Box::new(forward),
                backward: Some(Box::new(backward)),
            },
            timing: self.timing,
        }
    }

    /// Output value at keyframe fraction `fraction`, which is already eased.
    pub fn value_at(&mut self, fraction: f32) -> Result<V, Error> {
        let value = self.keyframes.value_at(fraction)?;
        Ok((self.transformer.forward)(value))
    }

    /// Fills every keyframe without a value from `value`, the output of the
    /// animation that runs before this one.
    pub(crate) fn set_start_value(&mut self, value: &V) -> Result<(), Error> {
        if self.keyframes.missing_value().is_none() {
            return Ok(());
        }
        let backward = self.transformer.backward.as_ref().ok_or_else(|| {
            Error::InvalidValueType(
                "a transformed animation needs an inverse transform to chain its start value"
                    .to_string(),
            )
        })?;
        self.keyframes.fill_missing_values(&backward(value));
        Ok(())
    }

    pub(crate) fn missing_value(&self) -> Option<usize> {
        self.keyframes.missing_value()
    }
}

impl<T, V> fmt::Debug for Animation<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}
