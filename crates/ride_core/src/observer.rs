//! Observer seam between the tracker and whatever renders it.
//!
//! Systems never call observers directly; they queue notifications in the
//! [`RideOutbox`] resource and the tracker drains it after each step. A push
//! channel from a real dispatch service would feed the same interface.

use std::cell::RefCell;
use std::rc::Rc;

use bevy_ecs::prelude::{Entity, Resource};

use crate::error::RideError;
use crate::presentation::RideView;

pub trait RideObserver {
    fn on_update(&mut self, view: &RideView);

    fn on_error(&mut self, error: &RideError);
}

/// Lets a caller keep a handle on an observer it registered.
impl<T: RideObserver> RideObserver for Rc<RefCell<T>> {
    fn on_update(&mut self, view: &RideView) {
        self.borrow_mut().on_update(view);
    }

    fn on_error(&mut self, error: &RideError) {
        self.borrow_mut().on_error(error);
    }
}

/// Notifications queued during a schedule run.
#[derive(Debug, Default, Resource)]
pub struct RideOutbox {
    pub updated: Vec<Entity>,
    pub errors: Vec<(Entity, RideError)>,
}

impl RideOutbox {
    pub fn mark_updated(&mut self, entity: Entity) {
        if !self.updated.contains(&entity) {
            self.updated.push(entity);
        }
    }

    pub fn push_error(&mut self, entity: Entity, error: RideError) {
        self.errors.push((entity, error));
    }

    pub fn is_empty(&self) -> bool {
        self.updated.is_empty() && self.errors.is_empty()
    }
}

/// Observer that keeps everything it was told; used by tests and the demo.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub updates: Vec<RideView>,
    pub errors: Vec<RideError>,
}

impl RideObserver for RecordingObserver {
    fn on_update(&mut self, view: &RideView) {
        self.updates.push(view.clone());
    }

    fn on_error(&mut self, error: &RideError) {
        self.errors.push(error.clone());
    }
}
