//! # The Ovation clap control
//!
//! A reusable "clap" applause control: a bounded per-viewer counter, a
//! running aggregate total, and a five-part replay animation choreographed
//! over three element roles. The mechanism is built once and exposed
//! through two facades:
//!
//! - [`Clap`] — broadcast composition. The root owns everything and
//!   broadcasts a [`ClapScope`] to a fixed family of parts
//!   ([`ClapIcon`], [`ClapCount`], [`ClapTotal`]) the consumer arranges
//!   freely between the braces.
//! - [`RenderClap`] — getter-props composition. The consumer renders
//!   arbitrary elements, pulls [`TogglerProps`] / [`CounterProps`]
//!   bundles for them, and attaches role-tagged ref setters to the ones
//!   that should animate.
//!
//! Both facades share the same state machine ([`InteractionState`]), the
//! same registry ([`RefRegistry`]), and the same timeline cache
//! ([`use_clap_animation`]): one timeline per distinct handle-set
//! identity, replayed on every activation.

pub mod choreography;
pub mod clap;
pub mod refs;
pub mod render_props;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use choreography::{BASE_DURATION, ClapTimeline, use_clap_animation};
pub use clap::{
    Clap, ClapCount, ClapCountView, ClapIcon, ClapIconView, ClapScope, ClapTotal, ClapTotalView,
    ClapView,
};
pub use refs::{HandleSet, PartRole, RefRegistry, RefSetter, use_ref_registry};
pub use render_props::{ClapApi, RenderClap};
pub use state::{
    ClapState, CounterOverrides, CounterProps, InteractionState, MAX_CLAPS_PER_VIEWER,
    TogglerOverrides, TogglerProps, call_all, use_clap_state,
};
