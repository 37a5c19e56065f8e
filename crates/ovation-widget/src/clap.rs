//! Broadcast facade.
//!
//! The root owns the state, the registry, and the choreography, and
//! broadcasts a read-only [`ClapScope`] to whatever the consumer composes
//! beneath it. The parts are a fixed set — icon, delta counter, running
//! total — attached to the widget's namespace; consumers can reorder or
//! omit them, but there is no open-ended role space. Each part reads
//! exactly the fields it needs from the scope and registers its own handle
//! on mount.

use std::rc::Rc;

use ovation_core::{
    ElementHandle, Role, Semantics, after_mount_effect, local, remember, with_local,
};

use crate::choreography::{ClapTimeline, use_clap_animation};
use crate::refs::{PartRole, RefRegistry, use_ref_registry};
use crate::state::{ClapState, InteractionState, use_clap_state};

/// Read-only snapshot broadcast from the root to its parts, plus the
/// registration entry point. Writable only by the root.
#[derive(Clone)]
pub struct ClapScope {
    pub count: u32,
    pub count_total: u32,
    pub is_activated: bool,
    registry: RefRegistry,
}

impl ClapScope {
    pub fn register(&self, role: PartRole, handle: ElementHandle) {
        self.registry.register(role, handle);
    }
}

/// The clap control, broadcast-composed.
///
/// ```no_run
/// use ovation_core::{Host, with_motion_engine};
/// use ovation_motion::SoftwareMotion;
/// use ovation_widget::{Clap, ClapCount, ClapIcon, ClapTotal, InteractionState};
///
/// let engine = SoftwareMotion::system();
/// let mut host = Host::new();
/// let view = host.render(|| {
///     with_motion_engine(engine.clone(), || {
///         Clap::new()
///             .initial(InteractionState::with_total(267))
///             .on_clap(|state| println!("clapped: {state:?}"))
///             .show(|| {
///                 ClapIcon();
///                 ClapCount();
///                 ClapTotal();
///             })
///     })
/// }).unwrap();
/// view.click();
/// ```
pub struct Clap {
    initial: InteractionState,
    on_clap: Option<Rc<dyn Fn(InteractionState)>>,
}

impl Clap {
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

    /// Activation callback, invoked with the post-transition state after
    /// every activation — never on the mounting render.
    pub fn on_clap(mut self, f: impl Fn(InteractionState) + 'static) -> Self {
        self.on_clap = Some(Rc::new(f));
        self
    }

    /// Composes the widget: broadcasts the scope to `children`, wires the
    /// choreography over whatever they registered, and returns the root
    /// view with its activation handler.
    pub fn show(self, children: impl FnOnce()) -> ClapView {
        let state = use_clap_state(self.initial);
        let registry = use_ref_registry();

        let trigger = remember(ElementHandle::new);
        registry.register(PartRole::Trigger, (*trigger).clone());

        let snapshot = state.get();
        with_local(
            ClapScope {
                count: snapshot.count,
                count_total: snapshot.count_total,
                is_activated: snapshot.is_activated,
                registry: registry.clone(),
            },
            children,
        );

        let timeline = use_clap_animation(&registry);

        let notify = self.on_clap.clone();
        let notify_state = state.clone();
        after_mount_effect(snapshot.count, move || {
            log::debug!("clap activation notification");
            if let Some(cb) = &notify {
                cb(notify_state.get());
            }
        });

        let on_click: Rc<dyn Fn()> = {
            let state = state.clone();
            let timeline = timeline.clone();
            Rc::new(move || {
                timeline.replay();
                state.activate();
            })
        };

        ClapView {
            trigger: (*trigger).clone(),
            semantics: Semantics::new(Role::Button).pressed(snapshot.is_activated),
            on_click,
            timeline,
            state,
        }
    }
}

impl Default for Clap {
    fn default() -> Self {
        Self::new()
    }
}

/// Root view of the broadcast facade: the trigger element and its
/// activation handler.
pub struct ClapView {
    pub trigger: ElementHandle,
    pub semantics: Semantics,
    pub on_click: Rc<dyn Fn()>,
    pub timeline: ClapTimeline,
    state: ClapState,
}

impl ClapView {
    /// Dispatches one activation: replay, then transition.
    pub fn click(&self) {
        (self.on_click)();
    }

    pub fn state(&self) -> InteractionState {
        self.state.get()
    }
}

pub struct ClapIconView {
    pub is_activated: bool,
}

/// The clap glyph. Reads only the activation flag (it tints once the
/// viewer has clapped).
#[allow(non_snake_case)]
pub fn ClapIcon() -> ClapIconView {
    match local::<ClapScope>() {
        Some(scope) => ClapIconView {
            is_activated: scope.is_activated,
        },
        None => {
            log::warn!("ClapIcon composed outside a Clap root");
            ClapIconView {
                is_activated: false,
            }
        }
    }
}

pub struct ClapCountView {
    pub handle: ElementHandle,
    pub text: String,
}

/// The transient "+N" readout; registers itself as the delta counter.
#[allow(non_snake_case)]
pub fn ClapCount() -> ClapCountView {
    let handle = remember(ElementHandle::new);
    let count = match local::<ClapScope>() {
        Some(scope) => {
            scope.register(PartRole::DeltaCounter, (*handle).clone());
            scope.count
        }
        None => {
            log::warn!("ClapCount composed outside a Clap root");
            0
        }
    };
    ClapCountView {
        handle: (*handle).clone(),
        text: format!("+ {count}"),
    }
}

pub struct ClapTotalView {
    pub handle: ElementHandle,
    pub text: String,
}

/// The aggregate readout; registers itself as the running total.
#[allow(non_snake_case)]
pub fn ClapTotal() -> ClapTotalView {
    let handle = remember(ElementHandle::new);
    let total = match local::<ClapScope>() {
        Some(scope) => {
            scope.register(PartRole::RunningTotal, (*handle).clone());
            scope.count_total
        }
        None => {
            log::warn!("ClapTotal composed outside a Clap root");
            0
        }
    };
    ClapTotalView {
        handle: (*handle).clone(),
        text: total.to_string(),
    }
}
