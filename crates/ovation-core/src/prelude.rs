pub use crate::color::Color;
pub use crate::effects::{after_mount_effect, layout_effect, passive_effect};
pub use crate::element::{ElementHandle, ElementId, ElementStyle, WeakElementHandle};
pub use crate::geometry::{Transform, Vec2};
pub use crate::locals::{local, with_local};
pub use crate::motion::{
    Animation, BurstChildSpec, BurstSpec, Easing, MotionEngine, NoopTimeline, Shape, Span,
    StageSpec, Timeline, Timing, TweenSpec, motion_engine, with_motion_engine,
};
pub use crate::runtime::{Host, HostError, remember};
pub use crate::scope::{Scope, current_scope, scoped_effect};
pub use crate::semantics::{Role, Semantics, SemanticsValue};
pub use crate::signal::{Signal, signal};
