use std::any::Any;
use std::marker::PhantomData;

use log::{debug, trace};
use slotmap::SlotMap;

use crate::animation::TotalDuration;
use crate::{Error, Property, Value};

slotmap::new_key_type! {
    pub struct PropertyId;
}

/// Typed handle to a property registered on a [`Timeline`].
pub struct PropertyKey<V> {
    id: PropertyId,
    marker: PhantomData<fn() -> V>,
}

impl<V> PropertyKey<V> {
    pub fn id(&self) -> PropertyId {
        self.id
    }
}

impl<V> Clone for PropertyKey<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for PropertyKey<V> {}

impl<V> std::fmt::Debug for PropertyKey<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PropertyKey").field(&self.id).finish()
    }
}

trait AnyProperty {
    fn set_play_time(&mut self, play_time: i64) -> bool;
    fn total_duration(&self) -> TotalDuration;
    fn value(&mut self) -> Result<Value, Error>;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<V: Into<Value> + 'static> AnyProperty for Property<V> {
    fn set_play_time(&mut self, play_time: i64) -> bool {
        Property::set_play_time(self, play_time)
    }

    fn total_duration(&self) -> TotalDuration {
        Property::total_duration(self)
    }

    fn value(&mut self) -> Result<Value, Error> {
        Property::value(self).map(Into::into)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Every property of one animated scene, advanced together.
#[derive(Default)]
pub struct Timeline {
    store: SlotMap<PropertyId, Box<dyn AnyProperty>>,
    total_duration: TotalDuration,
    play_time: i64,
    on_invalidate: Option<Box<dyn FnMut(PropertyId)>>,
}

impl Timeline {
    pub fn new() -> Self {
        Timeline::default()
    }

    pub fn register<V: Into<Value> + 'static>(&mut self, property: Property<V>) -> PropertyKey<V> {
        let duration = property.total_duration();
        self.total_duration = self.total_duration.max(duration);
        let id = self.store.insert(Box::new(property));
        debug!("registered property {:?} lasting {}", id, duration);
        PropertyKey {
            id,
            marker: PhantomData,
        }
    }

    /// Sets the callback run for every property whose play time changes on
    /// a tick, typically to schedule a redraw.
    pub fn on_invalidate(&mut self, callback: impl FnMut(PropertyId) + 'static) {
        self.on_invalidate = Some(Box::new(callback));
    }

    /// Moves every property to `play_time`.
    pub fn tick(&mut self, play_time: i64) {
        trace!("tick {}", play_time);
        self.play_time = play_time;
        for (id, property) in self.store.iter_mut() {
            if property.set_play_time(play_time) {
                if let Some(callback) = self.on_invalidate.as_mut() {
                    callback(id);
                }
            }
        }
    }

    pub fn play_time(&self) -> i64 {
        self.play_time
    }

    /// Longest total duration of any registered property.
    pub fn total_duration(&self) -> TotalDuration {
        self.total_duration
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = PropertyId> + '_ {
        self.store.keys()
    }

    pub fn property_mut<V: 'static>(&mut self, key: PropertyKey<V>) -> Option<&mut Property<V>> {
        self.store
            .get_mut(key.id)?
            .as_any_mut()
            .downcast_mut::<Property<V>>()
    }

    pub fn value<V: 'static>(&mut self, key: PropertyKey<V>) -> Result<V, Error> {
        self.property_mut(key)
            .ok_or(Error::UnknownProperty)?
            .value()
    }

    pub fn value_of(&mut self, id: PropertyId) -> Result<Value, Error> {
        self.store
            .get_mut(id)
            .ok_or(Error::UnknownProperty)?
            .value()
    }
}
