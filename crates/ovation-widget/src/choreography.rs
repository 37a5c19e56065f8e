//! Animation choreography.
//!
//! Builds the five-part clap animation — trigger pulse, total reveal, delta
//! rise-then-fade, triangle burst, circle burst — into a single timeline,
//! exactly once per distinct handle-set identity, and replays that cached
//! timeline on every activation. Rebuilding per activation would leak
//! timeline instances and reset in-flight playback, so the rebuild is gated
//! on the registry's identity, not on state.
//!
//! The rebuild runs in the layout phase: geometry is final, nothing painted
//! yet. Before the engine is involved at all, the trigger's transform is
//! snapped back to identity directly on the handle, so every replay starts
//! from the same baseline.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use ovation_core::{
    BurstChildSpec, BurstSpec, Color, Easing, ElementId, NoopTimeline, Shape, Span, StageSpec,
    Timeline, Timing, TweenSpec, layout_effect, motion_engine, remember, scoped_effect,
};

use crate::refs::{HandleSet, PartRole, RefRegistry};

/// Base duration `D` of the choreography; every sub-animation is phrased in
/// multiples of it.
pub const BASE_DURATION: Duration = Duration::from_millis(300);

const BURST_CHILD_DELAY: Duration = Duration::from_millis(30);
const BURST_EASING: Easing = Easing::Bezier(0.1, 1.0, 0.3, 1.0);
const BURST_CHILD_SPEED: f32 = 0.2;

struct TimelineSlot {
    timeline: Rc<dyn Timeline>,
    identity: Option<(ElementId, ElementId, ElementId)>,
    builds: u32,
}

/// Cloneable handle over the cached timeline. Always safe to replay; a
/// no-op before the first build.
#[derive(Clone)]
pub struct ClapTimeline {
    slot: Rc<RefCell<TimelineSlot>>,
}

impl ClapTimeline {
    pub fn replay(&self) {
        self.slot.borrow().timeline.replay();
    }

    pub fn is_running(&self) -> bool {
        self.slot.borrow().timeline.is_running()
    }

    /// How many times a timeline has been composed for this widget. At most
    /// one per distinct handle-set identity.
    pub fn builds(&self) -> u32 {
        self.slot.borrow().builds
    }
}

/// Caches and maintains the clap timeline for the registry's current
/// handle set. While any role is missing the previous timeline (or the
/// initial no-op) is returned unchanged; once all three are present — or any
/// handle's identity changes, e.g. a remount — the timeline is rebuilt once.
pub fn use_clap_animation(registry: &RefRegistry) -> ClapTimeline {
    let slot = remember(|| {
        RefCell::new(TimelineSlot {
            timeline: Rc::new(NoopTimeline),
            identity: None,
            builds: 0,
        })
    });

    // Release the composed timeline when the widget unmounts, even if a
    // consumer still holds a ClapTimeline clone.
    let installed = remember(|| Cell::new(false));
    if !installed.get() {
        installed.set(true);
        let slot = slot.clone();
        scoped_effect(move || {
            Box::new(move || {
                let mut slot = slot.borrow_mut();
                slot.timeline = Rc::new(NoopTimeline);
                slot.identity = None;
            })
        });
    }

    let engine = motion_engine();
    let handles = registry.handles();
    let key = handles.identity();

    let slot2 = slot.clone();
    layout_effect(key, move || {
        let Some(identity) = key else {
            return; // not ready yet: defer, keep whatever we had
        };
        let Some(engine) = engine else {
            log::warn!("no motion engine provided; clap animation stays inert");
            return;
        };

        let timeline = build_timeline(&*engine, &handles);
        let mut slot = slot2.borrow_mut();
        slot.timeline = timeline; // prior instance dropped here
        slot.identity = Some(identity);
        slot.builds += 1;
        log::debug!("composed clap timeline for elements {identity:?}");
    });

    ClapTimeline { slot }
}

/// Schedules the five sub-animations and composes them. Requires a ready
/// handle set.
fn build_timeline(
    engine: &dyn ovation_core::MotionEngine,
    handles: &HandleSet,
) -> Rc<dyn Timeline> {
    let (Some(trigger), Some(delta), Some(total)) = (
        handles.get(PartRole::Trigger),
        handles.get(PartRole::DeltaCounter),
        handles.get(PartRole::RunningTotal),
    ) else {
        return Rc::new(NoopTimeline);
    };

    let d = BASE_DURATION;

    // Replays must start from scale 1; reset on the handle itself, before
    // the engine sees it.
    trigger.reset_transform();

    let trigger_pulse = engine.tween(
        &TweenSpec::new(trigger.clone(), Timing::new(d).easing(Easing::EaseOut))
            .stage(StageSpec::default().scale(1.3, 1.0)),
    );

    let total_reveal = engine.tween(
        &TweenSpec::new(total.clone(), Timing::new(d).delay(d * 3 / 2))
            .stage(StageSpec::default().opacity(0.0, 1.0).y(0.0, -3.0)),
    );

    let delta_rise_fade = engine.tween(
        &TweenSpec::new(delta.clone(), Timing::new(d))
            .stage(StageSpec::default().opacity(0.0, 1.0).y(0.0, -30.0))
            .then(
                StageSpec::default()
                    .opacity(1.0, 0.0)
                    .y(-30.0, -80.0)
                    .timing(Timing::new(d).delay(d / 2)),
            ),
    );

    let triangle_burst = engine.burst(&BurstSpec {
        parent: trigger.clone(),
        radius: Span::new(50.0, 95.0),
        angle: 30.0,
        count: 5,
        duration: d,
        children: BurstChildSpec {
            shape: Shape::Polygon,
            radius: Span::new(6.0, 0.0),
            stroke: Some(Color::from_rgba(211, 54, 0, 0.5)),
            stroke_width: 2.0,
            fill: None,
            angle: 210.0,
            speed: BURST_CHILD_SPEED,
            delay: BURST_CHILD_DELAY,
            easing: BURST_EASING,
            duration: d,
        },
    });

    let circle_burst = engine.burst(&BurstSpec {
        parent: trigger.clone(),
        radius: Span::new(50.0, 75.0),
        angle: 25.0,
        count: 5,
        duration: d,
        children: BurstChildSpec {
            shape: Shape::Circle,
            radius: Span::new(3.0, 0.0),
            stroke: None,
            stroke_width: 0.0,
            fill: Some(Color::from_rgba(149, 165, 166, 0.5)),
            angle: 0.0,
            speed: BURST_CHILD_SPEED,
            delay: BURST_CHILD_DELAY,
            easing: BURST_EASING,
            duration: d,
        },
    });

    engine.timeline(vec![
        trigger_pulse,
        total_reveal,
        delta_rise_fade,
        triangle_burst,
        circle_burst,
    ])
}
