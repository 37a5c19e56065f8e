//! Software motion engine.
//!
//! Implements `ovation_core::MotionEngine` without a GPU or a DOM: tweens
//! write eased property values straight through element handles, bursts
//! expose per-particle geometry snapshots for whatever paints them. Driven
//! by an explicit [`Clock`], so everything is deterministic under
//! [`TestClock`].
//!
//! Replay semantics are restart-not-queue: `replay()` moves the playhead
//! back to t=0 regardless of what was in flight.

mod clock;

pub use clock::{Clock, SystemClock, TestClock};

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use smallvec::SmallVec;
use web_time::{Duration, Instant};

use ovation_core::{
    Animation, BurstChildSpec, BurstSpec, Color, MotionEngine, Shape, Span, Timeline, TweenSpec,
    Vec2, WeakElementHandle,
};

/// One particle of a burst at a point in time, positioned relative to the
/// burst's parent element.
#[derive(Clone, Debug)]
pub struct Particle {
    pub offset: Vec2,
    pub radius: f32,
    pub shape: Shape,
    pub stroke: Option<Color>,
    pub stroke_width: f32,
    pub fill: Option<Color>,
}

/// A tween stage resolved onto the timeline's local time axis.
struct ResolvedStage {
    start: Duration,
    delay: Duration,
    duration: Duration,
    easing: ovation_core::Easing,
    scale: Option<Span>,
    opacity: Option<Span>,
    y: Option<Span>,
}

impl ResolvedStage {
    fn end(&self) -> Duration {
        self.start + self.delay + self.duration
    }
}

struct TweenTrack {
    target: WeakElementHandle,
    stages: SmallVec<[ResolvedStage; 2]>,
}

impl TweenTrack {
    fn from_spec(spec: &TweenSpec) -> Self {
        let mut stages: SmallVec<[ResolvedStage; 2]> = SmallVec::new();
        stages.push(ResolvedStage {
            start: Duration::ZERO,
            delay: spec.timing.delay,
            duration: spec.timing.duration,
            easing: spec.timing.easing,
            scale: spec.stage.scale,
            opacity: spec.stage.opacity,
            y: spec.stage.y,
        });

        if let Some(then) = &spec.then {
            let timing = then.timing.unwrap_or(spec.timing);
            stages.push(ResolvedStage {
                start: spec.timing.delay + spec.timing.duration,
                delay: timing.delay,
                duration: timing.duration,
                easing: timing.easing,
                scale: then.scale,
                opacity: then.opacity,
                y: then.y,
            });
        }

        Self {
            target: spec.target.downgrade(),
            stages,
        }
    }

    fn total(&self) -> Duration {
        self.stages
            .iter()
            .map(ResolvedStage::end)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    fn apply(&self, elapsed: Duration) {
        let Some(target) = self.target.upgrade() else {
            return; // element torn down; nothing to animate
        };

        for stage in &self.stages {
            if elapsed < stage.start {
                break;
            }
            let local = elapsed.saturating_sub(stage.start);
            let t_raw = if local <= stage.delay || stage.duration.is_zero() {
                0.0
            } else {
                (local - stage.delay).as_secs_f32() / stage.duration.as_secs_f32()
            };
            let t = stage.easing.interpolate(t_raw.min(1.0));

            target.update_style(|s| {
                if let Some(span) = stage.scale {
                    s.transform.scale_x = span.at(t);
                    s.transform.scale_y = span.at(t);
                }
                if let Some(span) = stage.opacity {
                    s.opacity = span.at(t);
                }
                if let Some(span) = stage.y {
                    s.transform.translate_y = span.at(t);
                }
            });
        }
    }
}

struct BurstTrack {
    parent: WeakElementHandle,
    ring: Span,
    spacing_deg: f32,
    count: usize,
    duration: Duration,
    child: BurstChildSpec,
}

impl BurstTrack {
    fn from_spec(spec: &BurstSpec) -> Self {
        Self {
            parent: spec.parent.downgrade(),
            ring: spec.radius,
            spacing_deg: spec.angle,
            count: spec.count,
            duration: spec.duration,
            child: spec.children.clone(),
        }
    }

    /// Child playback is scaled by `speed` (a rate), so the wall-clock length
    /// of each particle's life is `duration / speed`.
    fn child_duration(&self) -> Duration {
        if self.child.speed > 0.0 {
            self.child.duration.div_f32(self.child.speed)
        } else {
            self.child.duration
        }
    }

    fn total(&self) -> Duration {
        self.duration.max(self.child.delay + self.child_duration())
    }

    fn particles(&self, elapsed: Duration) -> Vec<Particle> {
        if self.parent.upgrade().is_none() {
            return Vec::new();
        }

        let ring_t = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        };
        let ring_radius = self.ring.at(ring_t);

        let child_t_raw = if elapsed <= self.child.delay {
            0.0
        } else {
            let local = elapsed - self.child.delay;
            let d = self.child_duration();
            if d.is_zero() {
                1.0
            } else {
                (local.as_secs_f32() / d.as_secs_f32()).min(1.0)
            }
        };
        let child_t = self.child.easing.interpolate(child_t_raw);
        let child_radius = self.child.radius.at(child_t);

        (0..self.count)
            .map(|i| {
                let angle = (self.spacing_deg * i as f32).to_radians();
                Particle {
                    offset: Vec2::new(ring_radius * angle.sin(), -ring_radius * angle.cos()),
                    radius: child_radius,
                    shape: self.child.shape,
                    stroke: self.child.stroke,
                    stroke_width: self.child.stroke_width,
                    fill: self.child.fill,
                }
            })
            .collect()
    }
}

enum Track {
    Tween(TweenTrack),
    Burst(BurstTrack),
}

impl Track {
    fn total(&self) -> Duration {
        match self {
            Track::Tween(t) => t.total(),
            Track::Burst(b) => b.total(),
        }
    }

    fn apply(&self, elapsed: Duration) {
        if let Track::Tween(t) = self {
            t.apply(elapsed);
        }
        // Bursts are pull-based: geometry is computed in `particles`.
    }
}

/// Engine-opaque token carried inside `Animation`.
#[derive(Clone)]
struct TrackToken(Rc<Track>);

/// Replayable composition of tween and burst tracks.
pub struct SoftwareTimeline {
    clock: Rc<dyn Clock>,
    tracks: RefCell<SmallVec<[Rc<Track>; 8]>>,
    total: Cell<Duration>,
    started: Cell<Option<Instant>>,
}

impl SoftwareTimeline {
    fn new(clock: Rc<dyn Clock>, tracks: SmallVec<[Rc<Track>; 8]>) -> Self {
        let total = tracks.iter().map(|t| t.total()).max().unwrap_or(Duration::ZERO);
        Self {
            clock,
            tracks: RefCell::new(tracks),
            total: Cell::new(total),
            started: Cell::new(None),
        }
    }

    fn elapsed(&self) -> Option<Duration> {
        self.started
            .get()
            .map(|start| self.clock.now().saturating_duration_since(start))
    }

    /// Applies the playhead to every track; returns whether playback is
    /// still in flight.
    pub fn tick(&self) -> bool {
        let Some(elapsed) = self.elapsed() else {
            return false;
        };
        for track in self.tracks.borrow().iter() {
            track.apply(elapsed);
        }
        elapsed < self.total.get()
    }

    /// Current burst geometry across all tracks (empty when not started).
    pub fn particles(&self) -> Vec<Particle> {
        let Some(elapsed) = self.elapsed() else {
            return Vec::new();
        };
        self.tracks
            .borrow()
            .iter()
            .filter_map(|t| match t.as_ref() {
                Track::Burst(b) => Some(b.particles(elapsed)),
                Track::Tween(_) => None,
            })
            .flatten()
            .collect()
    }
}

impl Timeline for SoftwareTimeline {
    fn replay(&self) {
        self.started.set(Some(self.clock.now()));
        // Restart is synchronous: tracks snap to their t=0 values now, not
        // on the next tick.
        for track in self.tracks.borrow().iter() {
            track.apply(Duration::ZERO);
        }
    }

    fn is_running(&self) -> bool {
        self.elapsed().is_some_and(|e| e < self.total.get())
    }

    fn add(&self, parts: Vec<Animation>) {
        let mut tracks = self.tracks.borrow_mut();
        for part in parts {
            match part.downcast_ref::<TrackToken>() {
                Some(token) => tracks.push(token.0.clone()),
                None => log::warn!("timeline.add: foreign animation token ignored"),
            }
        }
        let total = tracks.iter().map(|t| t.total()).max().unwrap_or(Duration::ZERO);
        self.total.set(total);
    }
}

/// Deterministic, clock-driven [`MotionEngine`].
pub struct SoftwareMotion {
    clock: Rc<dyn Clock>,
    live: RefCell<Vec<Weak<SoftwareTimeline>>>,
}

impl SoftwareMotion {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            live: RefCell::new(Vec::new()),
        }
    }

    pub fn system() -> Rc<Self> {
        Rc::new(Self::new(Rc::new(SystemClock)))
    }

    /// Advances every live timeline; returns whether any is still playing.
    /// Timelines whose last strong reference dropped are pruned here, which
    /// is what keeps a rebuilt-and-replaced timeline from accumulating.
    pub fn tick(&self) -> bool {
        let mut live = self.live.borrow_mut();
        live.retain(|w| w.strong_count() > 0);
        let mut running = false;
        for weak in live.iter() {
            if let Some(timeline) = weak.upgrade() {
                running |= timeline.tick();
            }
        }
        running
    }

    /// Number of timelines still strongly referenced by consumers.
    pub fn live_timelines(&self) -> usize {
        let mut live = self.live.borrow_mut();
        live.retain(|w| w.strong_count() > 0);
        live.len()
    }

    /// Aggregated burst geometry across live timelines.
    pub fn particles(&self) -> Vec<Particle> {
        self.live
            .borrow()
            .iter()
            .filter_map(|w| w.upgrade())
            .flat_map(|t| t.particles())
            .collect()
    }
}

impl MotionEngine for SoftwareMotion {
    fn tween(&self, spec: &TweenSpec) -> Animation {
        Animation::new(TrackToken(Rc::new(Track::Tween(TweenTrack::from_spec(spec)))))
    }

    fn burst(&self, spec: &BurstSpec) -> Animation {
        Animation::new(TrackToken(Rc::new(Track::Burst(BurstTrack::from_spec(spec)))))
    }

    fn timeline(&self, parts: Vec<Animation>) -> Rc<dyn Timeline> {
        let mut tracks: SmallVec<[Rc<Track>; 8]> = SmallVec::new();
        for part in &parts {
            match part.downcast_ref::<TrackToken>() {
                Some(token) => tracks.push(token.0.clone()),
                None => log::warn!("timeline: foreign animation token ignored"),
            }
        }
        let timeline = Rc::new(SoftwareTimeline::new(self.clock.clone(), tracks));
        self.live.borrow_mut().push(Rc::downgrade(&timeline));
        timeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovation_core::{Easing, ElementHandle, StageSpec, Timing};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn engine_with_clock() -> (Rc<SoftwareMotion>, Rc<TestClock>) {
        let clock = Rc::new(TestClock::new());
        let engine = Rc::new(SoftwareMotion::new(clock.clone()));
        (engine, clock)
    }

    #[test]
    fn tween_is_deterministic_under_test_clock() {
        let (engine, clock) = engine_with_clock();
        let el = ElementHandle::new();

        let pulse = engine.tween(
            &TweenSpec::new(el.clone(), Timing::new(ms(300)).easing(Easing::EaseOut))
                .stage(StageSpec::default().scale(1.3, 1.0)),
        );
        let tl = engine.timeline(vec![pulse]);

        tl.replay();
        assert_eq!(el.style().transform.scale_x, 1.3);

        clock.advance(ms(150));
        assert!(engine.tick());
        // ease-out(0.5) = 0.75 → 1.3 + (1.0 - 1.3) * 0.75
        assert!((el.style().transform.scale_x - 1.075).abs() < 1e-4);

        clock.advance(ms(150));
        engine.tick();
        assert!((el.style().transform.scale_x - 1.0).abs() < 1e-4);
        assert!(!tl.is_running());
    }

    #[test]
    fn delayed_tween_holds_from_value() {
        let (engine, clock) = engine_with_clock();
        let el = ElementHandle::new();

        let reveal = engine.tween(
            &TweenSpec::new(el.clone(), Timing::new(ms(100)).delay(ms(100)))
                .stage(StageSpec::default().opacity(0.0, 1.0)),
        );
        let tl = engine.timeline(vec![reveal]);
        tl.replay();

        clock.advance(ms(50));
        engine.tick();
        assert_eq!(el.style().opacity, 0.0);

        clock.advance(ms(100)); // t = 150, halfway through the window
        engine.tick();
        assert!((el.style().opacity - 0.5).abs() < 1e-4);

        clock.advance(ms(100));
        engine.tick();
        assert_eq!(el.style().opacity, 1.0);
    }

    #[test]
    fn chained_stage_starts_after_first_completes() {
        let (engine, clock) = engine_with_clock();
        let el = ElementHandle::new();

        let rise_fade = engine.tween(
            &TweenSpec::new(el.clone(), Timing::new(ms(300)))
                .stage(StageSpec::default().y(0.0, -30.0))
                .then(
                    StageSpec::default()
                        .y(-30.0, -80.0)
                        .timing(Timing::new(ms(300)).delay(ms(150))),
                ),
        );
        let tl = engine.timeline(vec![rise_fade]);
        tl.replay();

        clock.advance(ms(300));
        engine.tick();
        assert!((el.style().transform.translate_y + 30.0).abs() < 1e-3);

        // Inside the second stage's delay: holds.
        clock.advance(ms(100));
        engine.tick();
        assert!((el.style().transform.translate_y + 30.0).abs() < 1e-3);

        // 150ms into the second stage's 300ms window.
        clock.advance(ms(200));
        engine.tick();
        assert!((el.style().transform.translate_y + 55.0).abs() < 1e-3);

        clock.advance(ms(150));
        assert!(!engine.tick());
        assert!((el.style().transform.translate_y + 80.0).abs() < 1e-3);
    }

    #[test]
    fn replay_restarts_mid_flight() {
        let (engine, clock) = engine_with_clock();
        let el = ElementHandle::new();

        let pulse = engine.tween(
            &TweenSpec::new(el.clone(), Timing::new(ms(300)))
                .stage(StageSpec::default().scale(1.3, 1.0)),
        );
        let tl = engine.timeline(vec![pulse]);

        tl.replay();
        clock.advance(ms(200));
        engine.tick();
        let mid = el.style().transform.scale_x;
        assert!(mid < 1.3);

        tl.replay(); // restart, not queue
        assert_eq!(el.style().transform.scale_x, 1.3);
        assert!(tl.is_running());
    }

    #[test]
    fn burst_geometry_spacing_and_radius() {
        let (engine, clock) = engine_with_clock();
        let parent = ElementHandle::new();

        let burst = engine.burst(&BurstSpec {
            parent: parent.clone(),
            radius: Span::new(50.0, 95.0),
            angle: 30.0,
            count: 5,
            duration: ms(300),
            children: BurstChildSpec {
                shape: Shape::Polygon,
                radius: Span::new(6.0, 0.0),
                stroke: Some(Color::from_rgba(211, 54, 0, 0.5)),
                stroke_width: 2.0,
                fill: None,
                angle: 210.0,
                speed: 1.0,
                delay: ms(0),
                easing: Easing::Linear,
                duration: ms(300),
            },
        });
        let tl = engine.timeline(vec![burst]);
        tl.replay();

        clock.advance(ms(300));
        engine.tick();
        let particles = engine.particles();
        assert_eq!(particles.len(), 5);

        // Ring fully expanded, children fully shrunk.
        for p in &particles {
            let dist = (p.offset.x * p.offset.x + p.offset.y * p.offset.y).sqrt();
            assert!((dist - 95.0).abs() < 1e-2);
            assert!(p.radius.abs() < 1e-3);
        }

        // First child points straight up, second is 30° around.
        assert!(particles[0].offset.x.abs() < 1e-2);
        assert!((particles[1].offset.x - 95.0 * 30f32.to_radians().sin()).abs() < 1e-2);
    }

    #[test]
    fn dropped_element_is_skipped() {
        let (engine, clock) = engine_with_clock();
        let el = ElementHandle::new();

        let pulse = engine.tween(
            &TweenSpec::new(el.clone(), Timing::new(ms(300)))
                .stage(StageSpec::default().scale(1.3, 1.0)),
        );
        let tl = engine.timeline(vec![pulse]);
        tl.replay();
        drop(el);

        clock.advance(ms(100));
        engine.tick(); // must not panic
        assert!(tl.is_running());
    }

    #[test]
    fn replaced_timelines_are_pruned() {
        let (engine, _clock) = engine_with_clock();
        let el = ElementHandle::new();

        let build = |engine: &SoftwareMotion| {
            let pulse = engine.tween(
                &TweenSpec::new(el.clone(), Timing::new(ms(300)))
                    .stage(StageSpec::default().scale(1.3, 1.0)),
            );
            engine.timeline(vec![pulse])
        };

        let first = build(&engine);
        let second = build(&engine);
        assert_eq!(engine.live_timelines(), 2);

        drop(first); // rebuild replaced the old instance
        assert_eq!(engine.live_timelines(), 1);
        drop(second);
        assert_eq!(engine.live_timelines(), 0);
    }

    #[test]
    fn timeline_add_extends_composition() {
        let (engine, clock) = engine_with_clock();
        let el = ElementHandle::new();

        let tl = engine.timeline(vec![]);
        let fade = engine.tween(
            &TweenSpec::new(el.clone(), Timing::new(ms(200)))
                .stage(StageSpec::default().opacity(0.0, 1.0)),
        );
        tl.add(vec![fade]);

        tl.replay();
        clock.advance(ms(100));
        engine.tick();
        assert!((el.style().opacity - 0.5).abs() < 1e-4);
    }
}
