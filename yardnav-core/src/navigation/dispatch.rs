//! Fan-out of one position fix stream to independent consumers: the
//! best-effort camera follower and the authoritative progress tracker.

use log::trace;

use super::{
    CameraSink, InstructionSink, NavigationEvent, NavigationTracker, PositionFix,
};
use crate::{Coordinate, Error, YardModel};

/// Consumer of position fixes
pub trait FixSubscriber {
    fn on_fix(&mut self, fix: &PositionFix);
}

/// Keeps the map camera on the walker unless the user is panning the map
#[derive(Debug, Clone)]
pub struct CameraFollow<C> {
    sink: C,
    panning: bool,
}

impl<C: CameraSink> CameraFollow<C> {
    pub fn new(sink: C) -> Self {
        Self {
            sink,
            panning: false,
        }
    }

    pub fn set_panning(&mut self, panning: bool) {
        self.panning = panning;
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    pub fn sink(&self) -> &C {
        &self.sink
    }
}

impl<C: CameraSink> FixSubscriber for CameraFollow<C> {
    fn on_fix(&mut self, fix: &PositionFix) {
        if self.panning {
            trace!("Camera follow suppressed while panning");
            return;
        }
        self.sink.follow(fix.position, fix.heading);
    }
}

/// Drives a tracker and speaks every event it emits
#[derive(Debug, Clone)]
pub struct Announcer<S> {
    tracker: NavigationTracker,
    sink: S,
}

impl<S: InstructionSink> Announcer<S> {
    pub fn new(tracker: NavigationTracker, sink: S) -> Self {
        Self { tracker, sink }
    }

    pub fn tracker(&self) -> &NavigationTracker {
        &self.tracker
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// # Errors
    ///
    /// See [`NavigationTracker::start`]
    pub fn start(
        &mut self,
        model: &YardModel,
        position: Coordinate,
        drop_lot: &str,
    ) -> Result<(), Error> {
        let events = self.tracker.start(model, position, drop_lot)?;
        self.announce(&events);
        Ok(())
    }

    pub fn stop(&mut self) {
        let events = self.tracker.stop();
        self.announce(&events);
    }

    fn announce(&mut self, events: &[NavigationEvent]) {
        for event in events {
            self.sink.speak(event.text());
        }
    }
}

impl<S: InstructionSink> FixSubscriber for Announcer<S> {
    fn on_fix(&mut self, fix: &PositionFix) {
        let events = self.tracker.handle_fix(fix);
        self.announce(&events);
    }
}

/// Delivers each fix to the camera follower, then to the announcer
#[derive(Debug, Clone)]
pub struct FixDispatcher<C, S> {
    camera: CameraFollow<C>,
    announcer: Announcer<S>,
}

impl<C: CameraSink, S: InstructionSink> FixDispatcher<C, S> {
    pub fn new(camera: CameraFollow<C>, announcer: Announcer<S>) -> Self {
        Self { camera, announcer }
    }

    pub fn dispatch(&mut self, fix: &PositionFix) {
        let subscribers: [&mut dyn FixSubscriber; 2] = [&mut self.camera, &mut self.announcer];
        for subscriber in subscribers {
            subscriber.on_fix(fix);
        }
    }

    pub fn camera(&self) -> &CameraFollow<C> {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraFollow<C> {
        &mut self.camera
    }

    pub fn announcer(&self) -> &Announcer<S> {
        &self.announcer
    }

    pub fn announcer_mut(&mut self) -> &mut Announcer<S> {
        &mut self.announcer
    }
}
