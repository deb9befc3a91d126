use std::cmp::Ordering;
use std::fmt;

use crate::animation::{Timing, TotalDuration};
use crate::{Animation, Error};

/// Type-erased view of an `Animation<T, V>` for a property of `V`.
trait Queued<V> {
    fn timing(&self) -> &Timing;
    fn value_at(&mut self, fraction: f32) -> Result<V, Error>;
    fn set_start_value(&mut self, value: &V) -> Result<(), Error>;
    fn missing_value(&self) -> Option<usize>;
}

impl<T: 'static, V: 'static> Queued<V> for Animation<T, V> {
    fn timing(&self) -> &Timing {
        Animation::timing(self)
    }

    fn value_at(&mut self, fraction: f32) -> Result<V, Error> {
        Animation::value_at(self, fraction)
    }

    fn set_start_value(&mut self, value: &V) -> Result<(), Error> {
        Animation::set_start_value(self, value)
    }

    fn missing_value(&self) -> Option<usize> {
        Animation::missing_value(self)
    }
}

/// Earlier start first; on a tie the one that ends first, infinite last.
fn compare(a: &Timing, b: &Timing) -> Ordering {
    a.start_delay
        .cmp(&b.start_delay)
        .then_with(|| a.total_duration().cmp(&b.total_duration()))
}

pub struct PropertyBuilder<V> {
    animations: Vec<Box<dyn Queued<V>>>,
}

impl<V: 'static> PropertyBuilder<V> {
    pub fn add<T: 'static>(mut self, animation: Animation<T, V>) -> Self {
        self.animations.push(Box::new(animation));
        self
    }

    pub fn build(self) -> Result<Property<V>, Error> {
        Property::new(self.animations)
    }
}

impl<V: 'static> Default for PropertyBuilder<V> {
    fn default() -> Self {
        PropertyBuilder { animations: vec![] }
    }
}

/// One animatable channel: every animation queued on it, ordered by start
/// time, plus the current play time.
pub struct Property<V> {
    animations: Vec<Box<dyn Queued<V>>>,
    total_duration: TotalDuration,
    play_time: u64,
    listeners: Vec<Box<dyn FnMut(u64)>>,
}

impl<V: 'static> Property<V> {
    pub fn builder() -> PropertyBuilder<V> {
        PropertyBuilder::default()
    }

    /// Shortcut for a property driven by a single animation.
    pub fn of<T: 'static>(animation: Animation<T, V>) -> Result<Self, Error> {
        Self::builder().add(animation).build()
    }

    fn new(mut animations: Vec<Box<dyn Queued<V>>>) -> Result<Self, Error> {
        if animations.is_empty() {
            return Err(Error::NoAnimations);
        }
        animations.sort_by(|a, b| compare(a.timing(), b.timing()));

        let total_duration = animations
            .iter()
            .map(|a| a.timing().total_duration())
            .max()
            .unwrap_or_default();

        // Each animation without a start value continues from where the
        // previous one ends.
        for i in 1..animations.len() {
            let end = animations[i - 1].value_at(1.0)?;
            animations[i].set_start_value(&end)?;
        }
        if let Some(index) = animations.iter().find_map(|a| a.missing_value()) {
            return Err(Error::MissingKeyframeValue { index });
        }

        Ok(Property {
            animations,
            total_duration,
            play_time: 0,
            listeners: vec![],
        })
    }

    pub fn total_duration(&self) -> TotalDuration {
        self.total_duration
    }

    pub fn play_time(&self) -> u64 {
        self.play_time
    }

    /// Registers a callback run with the new play time whenever it changes.
    pub fn add_listener(&mut self, listener: impl FnMut(u64) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Moves the property to `play_time`, clamped to [0, total duration].
    /// Returns whether the play time changed.
    pub fn set_play_time(&mut self, play_time: i64) -> bool {
        let mut play_time = play_time.max(0) as u64;
        if let TotalDuration::Finite(total) = self.total_duration {
            play_time = play_time.min(total);
        }
        if play_time == self.play_time {
            return false;
        }
        self.play_time = play_time;
        for listener in self.listeners.iter_mut() {
            listener(play_time);
        }
        true
    }

    /// The last animation that has started, or the first one if none has.
    /// The final animation stays active for good once it starts.
    fn current_animation(&self) -> usize {
        self.animations
            .iter()
            .rposition(|a| a.timing().start_delay <= self.play_time)
            .unwrap_or(0)
    }

    /// Fraction of the active animation at the current play time, after
    /// easing.
    pub fn current_fraction(&self) -> f32 {
        let animation = &self.animations[self.current_animation()];
        animation.timing().fraction(self.play_time)
    }

    pub fn value(&mut self) -> Result<V, Error> {
        let index = self.current_animation();
        let animation = &mut self.animations[index];
        let fraction = animation.timing().fraction(self.play_time);
        animation.value_at(fraction)
    }

    /// Value at `play_time`; same as [`Property::set_play_time`] followed by
    /// [`Property::value`].
    pub fn value_at(&mut self, play_time: i64) -> Result<V, Error> {
        self.set_play_time(play_time);
        self.value()
    }
}

impl<V> fmt::Debug for Property<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("animations", &self.animations.len())
            .field("total_duration", &self.total_duration)
            .field("play_time", &self.play_time)
            .finish()
    }
}
