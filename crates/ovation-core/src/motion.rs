//! Motion-engine interface.
//!
//! The widget layer never talks to a concrete animation engine. It describes
//! what it wants — property interpolations with delay/duration/easing, radial
//! particle bursts — and hands those specs to whatever [`MotionEngine`] the
//! composition provides ambiently. The engine returns opaque [`Animation`]
//! tokens and composes them into a replayable [`Timeline`].
//!
//! `ovation-motion` ships a deterministic software engine; render backends
//! can substitute their own.

use std::any::Any;
use std::rc::Rc;
use std::time::Duration;

use crate::element::ElementHandle;
use crate::locals::{local, with_local};
use crate::Color;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Cubic bezier with control points (x1, y1, x2, y2), CSS-style.
    Bezier(f32, f32, f32, f32),
}

impl Easing {
    pub fn interpolate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::Bezier(x1, y1, x2, y2) => cubic_bezier(t, *x1, *y1, *x2, *y2),
        }
    }
}

/// Evaluates y for the unit cubic bezier (0,0)..(x1,y1)..(x2,y2)..(1,1) at
/// horizontal position `x`, Newton first, bisection fallback.
fn cubic_bezier(x: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    fn sample(a: f32, b: f32, s: f32) -> f32 {
        // Coefficients for P(s) with P0=0, P3=1 on one axis.
        let c3 = 1.0 + 3.0 * a - 3.0 * b;
        let c2 = 3.0 * b - 6.0 * a;
        let c1 = 3.0 * a;
        ((c3 * s + c2) * s + c1) * s
    }
    fn sample_derivative(a: f32, b: f32, s: f32) -> f32 {
        let c3 = 1.0 + 3.0 * a - 3.0 * b;
        let c2 = 3.0 * b - 6.0 * a;
        let c1 = 3.0 * a;
        (3.0 * c3 * s + 2.0 * c2) * s + c1
    }

    let mut s = x;
    for _ in 0..8 {
        let err = sample(x1, x2, s) - x;
        if err.abs() < 1e-5 {
            return sample(y1, y2, s);
        }
        let d = sample_derivative(x1, x2, s);
        if d.abs() < 1e-6 {
            break;
        }
        s -= err / d;
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    s = x;
    for _ in 0..20 {
        let err = sample(x1, x2, s) - x;
        if err.abs() < 1e-5 {
            break;
        }
        if err > 0.0 {
            hi = s;
        } else {
            lo = s;
        }
        s = (lo + hi) * 0.5;
    }
    sample(y1, y2, s)
}

/// Interpolation endpoints for one scalar property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub from: f32,
    pub to: f32,
}

impl Span {
    pub fn new(from: f32, to: f32) -> Self {
        Self { from, to }
    }

    pub fn at(&self, t: f32) -> f32 {
        self.from + (self.to - self.from) * t
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    pub delay: Duration,
    pub duration: Duration,
    pub easing: Easing,
}

impl Timing {
    pub fn new(duration: Duration) -> Self {
        Self {
            delay: Duration::ZERO,
            duration,
            easing: Easing::Linear,
        }
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// One timed segment of a tween: which properties move, and when.
#[derive(Clone, Debug, Default)]
pub struct StageSpec {
    pub scale: Option<Span>,
    pub opacity: Option<Span>,
    pub y: Option<Span>,
    pub timing: Option<Timing>,
}

impl StageSpec {
    pub fn scale(mut self, from: f32, to: f32) -> Self {
        self.scale = Some(Span::new(from, to));
        self
    }

    pub fn opacity(mut self, from: f32, to: f32) -> Self {
        self.opacity = Some(Span::new(from, to));
        self
    }

    pub fn y(mut self, from: f32, to: f32) -> Self {
        self.y = Some(Span::new(from, to));
        self
    }

    pub fn timing(mut self, timing: Timing) -> Self {
        self.timing = Some(timing);
        self
    }
}

/// Property interpolation against one element, optionally chained into a
/// follow-up stage that starts after the first completes.
#[derive(Clone, Debug)]
pub struct TweenSpec {
    pub target: ElementHandle,
    pub stage: StageSpec,
    pub timing: Timing,
    pub then: Option<StageSpec>,
}

impl TweenSpec {
    pub fn new(target: ElementHandle, timing: Timing) -> Self {
        Self {
            target,
            stage: StageSpec::default(),
            timing,
            then: None,
        }
    }

    pub fn stage(mut self, stage: StageSpec) -> Self {
        self.stage = stage;
        self
    }

    pub fn then(mut self, stage: StageSpec) -> Self {
        self.then = Some(stage);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Polygon,
    Circle,
}

/// Per-particle settings shared by every child of a burst.
#[derive(Clone, Debug)]
pub struct BurstChildSpec {
    pub shape: Shape,
    pub radius: Span,
    pub stroke: Option<Color>,
    pub stroke_width: f32,
    pub fill: Option<Color>,
    /// Orientation of each particle, degrees.
    pub angle: f32,
    /// Playback-rate multiplier applied to each child's local clock.
    pub speed: f32,
    pub delay: Duration,
    pub easing: Easing,
    pub duration: Duration,
}

/// Radial particle emission anchored at a parent element.
#[derive(Clone, Debug)]
pub struct BurstSpec {
    pub parent: ElementHandle,
    /// Ring radius the particles travel along.
    pub radius: Span,
    /// Angular spacing between consecutive children, degrees.
    pub angle: f32,
    pub count: usize,
    pub duration: Duration,
    pub children: BurstChildSpec,
}

/// Engine-opaque token for one built sub-animation.
#[derive(Clone)]
pub struct Animation(Rc<dyn Any>);

impl Animation {
    pub fn new<T: 'static>(inner: T) -> Self {
        Self(Rc::new(inner))
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

/// Composed, replayable handle over a set of sub-animations.
///
/// `replay` restarts from t=0; calling it mid-flight restarts rather than
/// queueing a second playback.
pub trait Timeline {
    fn replay(&self);
    fn is_running(&self) -> bool;
    /// Appends more sub-animations to this timeline.
    fn add(&self, parts: Vec<Animation>);
}

/// Placeholder timeline used before any element handles exist. Replaying it
/// is a no-op, never an error.
pub struct NoopTimeline;

impl Timeline for NoopTimeline {
    fn replay(&self) {}

    fn is_running(&self) -> bool {
        false
    }

    fn add(&self, _parts: Vec<Animation>) {}
}

/// Opaque timeline-builder the widget layer schedules against.
pub trait MotionEngine {
    fn tween(&self, spec: &TweenSpec) -> Animation;
    fn burst(&self, spec: &BurstSpec) -> Animation;
    fn timeline(&self, parts: Vec<Animation>) -> Rc<dyn Timeline>;
}

#[derive(Clone)]
struct EngineLocal(Rc<dyn MotionEngine>);

/// Provides `engine` ambiently for the duration of `f` (composition local).
pub fn with_motion_engine<R>(engine: Rc<dyn MotionEngine>, f: impl FnOnce() -> R) -> R {
    with_local(EngineLocal(engine), f)
}

/// The ambient engine, if one was provided.
pub fn motion_engine() -> Option<Rc<dyn MotionEngine>> {
    local::<EngineLocal>().map(|e| e.0)
}
