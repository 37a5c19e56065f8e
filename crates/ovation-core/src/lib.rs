//! # Composition runtime for the Ovation clap widget
//!
//! Ovation uses a small slot-based composition core instead of a widget tree
//! with mutable fields. The pieces:
//!
//! - [`Host`] — owns one mounted composition: `remember` slots, root
//!   [`Scope`], and the two per-frame effect phases (layout = pre-paint,
//!   passive = post-paint).
//! - [`remember`] — lifecycle-aware storage bound to composition.
//! - [`layout_effect`] / [`passive_effect`] / [`after_mount_effect`] —
//!   keyed, phase-scheduled side effects.
//! - [`Signal<T>`] — observable, reactive value.
//! - `locals` — ambient broadcast from a root to its descendants.
//! - `motion` — the opaque timeline-builder interface animation engines
//!   implement.
//!
//! ## Remembered state
//!
//! ```rust
//! use ovation_core::*;
//!
//! let mut host = Host::new();
//! host.render(|| {
//!     let count = remember(|| signal(0i32));
//!     count.update(|c| *c += 1);
//! }).unwrap();
//! ```
//!
//! `remember` is order-based: the Nth call in a frame always refers to the
//! Nth stored value, so keep calls out of conditional branches.
//!
//! ## Effects and cleanup
//!
//! ```rust
//! use ovation_core::*;
//!
//! let mut host = Host::new();
//! host.render(|| {
//!     scoped_effect(|| Box::new(|| log::info!("unmounted")));
//!     layout_effect((), || { /* runs pre-paint, once */ });
//! }).unwrap();
//! host.unmount(); // disposers run, slots drop
//! ```

pub mod color;
pub mod effects;
pub mod element;
pub mod geometry;
pub mod locals;
pub mod motion;
pub mod prelude;
pub mod runtime;
pub mod scope;
pub mod semantics;
pub mod signal;

pub use color::*;
pub use effects::*;
pub use element::*;
pub use geometry::*;
pub use locals::*;
pub use motion::*;
pub use runtime::*;
pub use scope::*;
pub use semantics::*;
pub use signal::*;
