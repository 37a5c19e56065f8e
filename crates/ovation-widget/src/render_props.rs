//! Getter-props facade.
//!
//! Instead of broadcasting to fixed parts, this variant hands the consumer
//! a [`ClapApi`] and lets them render anything: they pull property bundles
//! for the elements they choose to create, attach role-tagged ref setters
//! to the ones that should animate, and keep full control of markup. The
//! widget still owns the transition, the timeline cache, and the
//! after-mount choreography; replay and notification both key off the
//! count, so they follow every activation and skip the mounting render.

use std::rc::Rc;

use ovation_core::after_mount_effect;

use crate::choreography::use_clap_animation;
use crate::refs::{PartRole, RefRegistry, RefSetter, use_ref_registry};
use crate::state::{
    ClapState, CounterOverrides, CounterProps, InteractionState, TogglerOverrides, TogglerProps,
    use_clap_state,
};

/// Everything the consumer's render closure may pull from the widget.
#[derive(Clone)]
pub struct ClapApi {
    state: ClapState,
    registry: RefRegistry,
}

impl ClapApi {
    pub fn state(&self) -> InteractionState {
        self.state.get()
    }

    pub fn count(&self) -> u32 {
        self.state.count()
    }

    pub fn count_total(&self) -> u32 {
        self.state.count_total()
    }

    pub fn is_activated(&self) -> bool {
        self.state.is_activated()
    }

    /// Props for whichever element the consumer uses as the activation
    /// surface. The internal transition always runs before the consumer's
    /// own handler.
    pub fn toggler_props(&self, overrides: TogglerOverrides) -> TogglerProps {
        self.state.toggler_props(overrides)
    }

    /// Props for the consumer's count display.
    pub fn counter_props(&self, overrides: CounterOverrides) -> CounterProps {
        self.state.counter_props(overrides)
    }

    /// Ref setter for `role`; the consumer attaches it to the element that
    /// should play that role in the choreography.
    pub fn set_ref(&self, role: PartRole) -> RefSetter {
        self.registry.set_ref(role)
    }
}

/// The clap control, getter-props-composed.
///
/// ```no_run
/// use ovation_core::{ElementHandle, Host, with_motion_engine};
/// use ovation_motion::SoftwareMotion;
/// use ovation_widget::{PartRole, RenderClap, TogglerOverrides};
///
/// let engine = SoftwareMotion::system();
/// let mut host = Host::new();
/// host.render(|| {
///     with_motion_engine(engine.clone(), || {
///         RenderClap::new().show(|api| {
///             let button = ElementHandle::new();
///             api.set_ref(PartRole::Trigger).set(button.clone());
///             api.set_ref(PartRole::DeltaCounter).set(ElementHandle::new());
///             api.set_ref(PartRole::RunningTotal).set(ElementHandle::new());
///             api.toggler_props(TogglerOverrides::default())
///         })
///     })
/// }).unwrap();
/// ```
pub struct RenderClap {
    initial: InteractionState,
    on_clap: Option<Rc<dyn Fn(InteractionState)>>,
}

impl RenderClap {
    pub fn new() -> Self {
        Self {
            initial: InteractionState::default(),
            on_clap: None,
        }
    }

    pub fn initial(mut self, initial: InteractionState) -> Self {
        self.initial = initial;
        self
    }

    /// Activation callback; same contract as the broadcast facade.
    pub fn on_clap(mut self, f: impl Fn(InteractionState) + 'static) -> Self {
        self.on_clap = Some(Rc::new(f));
        self
    }

    /// Runs the consumer's render closure, then wires choreography and
    /// after-mount effects over whatever it registered. Whatever the
    /// closure returns is returned unchanged.
    pub fn show<R>(self, render: impl FnOnce(&ClapApi) -> R) -> R {
        let state = use_clap_state(self.initial);
        let registry = use_ref_registry();

        let api = ClapApi {
            state: state.clone(),
            registry: registry.clone(),
        };
        let out = render(&api);

        // Registration happened inside `render`, so the animation layer
        // sees a complete handle set on the very first pass.
        let timeline = use_clap_animation(&registry);

        let count = state.count();
        let replay_timeline = timeline.clone();
        after_mount_effect(count, move || {
            replay_timeline.replay();
        });

        let notify = self.on_clap.clone();
        let notify_state = state.clone();
        after_mount_effect(count, move || {
            log::debug!("clap activation notification");
            if let Some(cb) = &notify {
                cb(notify_state.get());
            }
        });

        out
    }
}

impl Default for RenderClap {
    fn default() -> Self {
        Self::new()
    }
}
