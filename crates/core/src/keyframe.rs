use std::collections::HashSet;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::{Error, Interpolator, Lerp};

/// A value pinned at a fraction of an animation.
///
/// Both the fraction and the value may be left unset while an animation is
/// being assembled: unset fractions are spread evenly between their
/// neighbours, unset values are chained in from the animation that runs
/// before this one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyframe<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fraction: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<T>,
    /// Eases the interval that ends at this keyframe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interpolator: Option<Interpolator>,
}

impl<T> Keyframe<T> {
    /// A negative `fraction` leaves it unset.
    pub fn new(fraction: f32, value: T) -> Self {
        Keyframe {
            fraction: defined(fraction),
            value: Some(value),
            interpolator: None,
        }
    }

    /// A keyframe whose value will be chained in.
    pub fn empty(fraction: f32) -> Self {
        Keyframe {
            fraction: defined(fraction),
            value: None,
            interpolator: None,
        }
    }

    /// A keyframe whose fraction will be placed between its neighbours.
    pub fn unplaced(value: T) -> Self {
        Keyframe {
            fraction: None,
            value: Some(value),
            interpolator: None,
        }
    }

    pub fn with_interpolator(mut self, interpolator: Interpolator) -> Self {
        self.interpolator = Some(interpolator);
        self
    }

    pub fn fraction(&self) -> Option<f32> {
        self.fraction
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn interpolator(&self) -> Option<&Interpolator> {
        self.interpolator.as_ref()
    }

    fn position(&self) -> f32 {
        self.fraction.unwrap_or(0.0)
    }
}

fn defined(fraction: f32) -> Option<f32> {
    if fraction < 0.0 {
        None
    } else {
        Some(fraction)
    }
}

/// A source of animated values over a fraction of an animation.
///
/// The returned reference points into a buffer owned by the source and is
/// overwritten by the next call.
pub trait Keyframes<T> {
    fn value_at(&mut self, fraction: f32) -> Result<&T, Error>;

    /// Sets every keyframe that has no value yet to `value`.
    fn fill_missing_values(&mut self, value: &T);

    /// Index of the first keyframe still missing a value.
    fn missing_value(&self) -> Option<usize>;
}

/// An ordered list of keyframes for one value type, starting at fraction
/// 0 and ending at fraction 1.
#[derive(Debug, Clone)]
pub struct KeyframeSet<T> {
    keyframes: Vec<Keyframe<T>>,
    scratch: Option<T>,
}

impl<T: Lerp> KeyframeSet<T> {
    /// Spreads `values` evenly over [0, 1]. A single value is the end
    /// value; the start is left to be chained in.
    pub fn of_values(values: Vec<T>) -> Result<Self, Error> {
        let count = values.len();
        let keyframes = match count {
            0 => return Err(Error::EmptyKeyframes),
            1 => {
                let mut keyframes = vec![Keyframe::empty(0.0)];
                keyframes.extend(values.into_iter().map(|v| Keyframe::new(1.0, v)));
                keyframes
            }
            _ => values
                .into_iter()
                .enumerate()
                .map(|(i, v)| Keyframe::new(i as f32 / (count - 1) as f32, v))
                .collect(),
        };
        Ok(KeyframeSet {
            keyframes,
            scratch: None,
        })
    }

    /// Places unset fractions, then sorts by fraction. When two keyframes
    /// share a fraction the later one wins. Empty keyframes are added at 0
    /// and 1 if the list doesn't reach them; their values get chained in.
    pub fn of_keyframes(mut keyframes: Vec<Keyframe<T>>) -> Result<Self, Error> {
        if keyframes.is_empty() {
            return Err(Error::EmptyKeyframes);
        }
        place_fractions(&mut keyframes);
        keyframes.sort_by_key(|k| OrderedFloat(k.position()));

        let mut seen = HashSet::with_capacity(keyframes.len());
        let mut unique = Vec::with_capacity(keyframes.len() + 2);
        for keyframe in keyframes.into_iter().rev() {
            if seen.insert(OrderedFloat(keyframe.position())) {
                unique.push(keyframe);
            }
        }
        unique.reverse();
        cover_unit_range(&mut unique);

        Ok(KeyframeSet {
            keyframes: unique,
            scratch: None,
        })
    }

    pub fn keyframes(&self) -> &[Keyframe<T>] {
        &self.keyframes
    }

    /// Picks the keyframes bracketing `fraction` and the eased fraction
    /// between them.
    fn interval(&self, fraction: f32) -> (usize, usize, f32) {
        let count = self.keyframes.len();
        if count == 2 {
            let t = ease(self.keyframes[1].interpolator.as_ref(), fraction);
            return (0, 1, t);
        }
        let next = if fraction <= 0.0 {
            1
        } else if fraction >= 1.0 {
            count - 1
        } else {
            self.keyframes[1..]
                .iter()
                .position(|k| fraction < k.position())
                .map_or(count - 1, |i| i + 1)
        };
        let (prev_kf, next_kf) = (&self.keyframes[next - 1], &self.keyframes[next]);
        let span = next_kf.position() - prev_kf.position();
        let interval = if span == 0.0 {
            1.0
        } else {
            (fraction - prev_kf.position()) / span
        };
        (next - 1, next, ease(next_kf.interpolator.as_ref(), interval))
    }
}

fn ease(interpolator: Option<&Interpolator>, fraction: f32) -> f32 {
    interpolator.map_or(fraction, |i| i.interpolate(fraction))
}

impl<T: Lerp> Keyframes<T> for KeyframeSet<T> {
    fn value_at(&mut self, fraction: f32) -> Result<&T, Error> {
        let (from, to, t) = self.interval(fraction);
        let start = self.keyframes[from]
            .value
            .as_ref()
            .ok_or(Error::MissingKeyframeValue { index: from })?;
        let end = self.keyframes[to]
            .value
            .as_ref()
            .ok_or(Error::MissingKeyframeValue { index: to })?;
        let out: &T = match &mut self.scratch {
            Some(out) => {
                start.lerp_into(end, t, out)?;
                out
            }
            empty => empty.insert(start.lerp(end, t)?),
        };
        Ok(out)
    }

    fn fill_missing_values(&mut self, value: &T) {
        for keyframe in self.keyframes.iter_mut().filter(|k| k.value.is_none()) {
            keyframe.value = Some(value.clone());
        }
    }

    fn missing_value(&self) -> Option<usize> {
        self.keyframes.iter().position(|k| k.value.is_none())
    }
}

/// Gives every keyframe a fraction. An unset last fraction becomes 1 and
/// an unset first fraction 0; runs of unset fractions in between are spread
/// evenly across the gap left by their neighbours.
fn place_fractions<T>(keyframes: &mut [Keyframe<T>]) {
    for keyframe in keyframes.iter_mut() {
        keyframe.fraction = keyframe.fraction.and_then(defined);
    }
    if let Some(last) = keyframes.last_mut() {
        last.fraction.get_or_insert(1.0);
    }
    if let Some(first) = keyframes.first_mut() {
        first.fraction.get_or_insert(0.0);
    }

    let last = keyframes.len().saturating_sub(1);
    let mut start = 1;
    while start < last {
        if keyframes[start].fraction.is_some() {
            start += 1;
            continue;
        }
        let mut end = start;
        while end + 1 < last && keyframes[end + 1].fraction.is_none() {
            end += 1;
        }
        let from = keyframes[start - 1].position();
        let to = keyframes[end + 1].fraction.unwrap_or(1.0);
        let increment = (to - from) / (end - start + 2) as f32;
        for i in start..=end {
            keyframes[i].fraction = Some(keyframes[i - 1].position() + increment);
        }
        start = end + 1;
    }
}

/// Adds empty keyframes at 0 and 1 when the sorted list stops short of
/// either end.
fn cover_unit_range<T>(keyframes: &mut Vec<Keyframe<T>>) {
    if keyframes.first().map_or(true, |k| k.position() > 0.0) {
        keyframes.insert(0, Keyframe::empty(0.0));
    }
    if keyframes.last().map_or(true, |k| k.position() < 1.0) {
        keyframes.push(Keyframe::empty(1.0));
    }
}
