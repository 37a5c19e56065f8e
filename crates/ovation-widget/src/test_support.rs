//! Recording engine used by unit tests to count scheduling calls.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use ovation_core::{Animation, BurstSpec, MotionEngine, Timeline, TweenSpec};

pub struct RecordingTimeline {
    pub replays: Cell<u32>,
    pub parts: Cell<usize>,
}

impl Timeline for RecordingTimeline {
    fn replay(&self) {
        self.replays.set(self.replays.get() + 1);
    }

    fn is_running(&self) -> bool {
        false
    }

    fn add(&self, parts: Vec<Animation>) {
        self.parts.set(self.parts.get() + parts.len());
    }
}

#[derive(Default)]
pub struct RecordingEngine {
    tweens: Cell<u32>,
    bursts: Cell<u32>,
    built: RefCell<Vec<Weak<RecordingTimeline>>>,
}

impl RecordingEngine {
    pub fn tweens(&self) -> u32 {
        self.tweens.get()
    }

    pub fn bursts(&self) -> u32 {
        self.bursts.get()
    }

    /// Total compose calls over this engine's lifetime.
    pub fn timelines(&self) -> usize {
        self.built.borrow().len()
    }

    /// Compositions still referenced by someone.
    pub fn live_timelines(&self) -> usize {
        self.built
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// The most recently composed timeline, if still alive.
    pub fn last(&self) -> Option<Rc<RecordingTimeline>> {
        self.built.borrow().last().and_then(Weak::upgrade)
    }
}

impl MotionEngine for RecordingEngine {
    fn tween(&self, _spec: &TweenSpec) -> Animation {
        self.tweens.set(self.tweens.get() + 1);
        Animation::new(())
    }

    fn burst(&self, _spec: &BurstSpec) -> Animation {
        self.bursts.set(self.bursts.get() + 1);
        Animation::new(())
    }

    fn timeline(&self, parts: Vec<Animation>) -> Rc<dyn Timeline> {
        let timeline = Rc::new(RecordingTimeline {
            replays: Cell::new(0),
            parts: Cell::new(parts.len()),
        });
        self.built.borrow_mut().push(Rc::downgrade(&timeline));
        timeline
    }
}
