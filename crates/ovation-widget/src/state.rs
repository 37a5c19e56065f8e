//! Interaction state.
//!
//! The whole state machine is one total transition: `activate` bumps the
//! per-viewer count (saturating at [`MAX_CLAPS_PER_VIEWER`]), carries the
//! running total along while the cap has not been hit, and latches the
//! activation flag. There are no error states.

use std::rc::Rc;

use ovation_core::{Role, Semantics, Signal, remember, signal};

/// How many claps a single viewer may contribute.
pub const MAX_CLAPS_PER_VIEWER: u32 = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InteractionState {
    /// This viewer's claps, capped at [`MAX_CLAPS_PER_VIEWER`].
    pub count: u32,
    /// Aggregate claps across viewers; monotonically non-decreasing.
    pub count_total: u32,
    /// True once this viewer has clapped at least once.
    pub is_activated: bool,
}

impl InteractionState {
    /// Fresh viewer state over an existing aggregate total.
    pub fn with_total(count_total: u32) -> Self {
        Self {
            count: 0,
            count_total,
            is_activated: false,
        }
    }

    /// The bounded-increment transition. Total: defined for every state.
    /// The total-increment guard reads the pre-transition count.
    fn activated(self) -> Self {
        Self {
            count: (self.count + 1).min(MAX_CLAPS_PER_VIEWER),
            count_total: if self.count < MAX_CLAPS_PER_VIEWER {
                self.count_total + 1
            } else {
                self.count_total
            },
            is_activated: true,
        }
    }
}

/// Consumer overrides merged into [`ClapState::toggler_props`].
#[derive(Clone, Default)]
pub struct TogglerOverrides {
    /// Consumer click handler, invoked after the internal transition.
    pub on_click: Option<Rc<dyn Fn()>>,
    /// Wins over the derived `aria-pressed` value.
    pub pressed: Option<bool>,
}

/// Property bundle for the element that receives activations.
#[derive(Clone)]
pub struct TogglerProps {
    pub on_click: Rc<dyn Fn()>,
    pub semantics: Semantics,
}

/// Consumer overrides merged into [`ClapState::counter_props`].
#[derive(Clone, Default)]
pub struct CounterOverrides {
    pub label: Option<String>,
}

/// Property bundle for the element displaying the per-viewer count.
#[derive(Clone)]
pub struct CounterProps {
    pub count: u32,
    pub semantics: Semantics,
}

/// Composes handlers left to right; all fire, panics propagate to the
/// caller (consumer handlers are invoked best-effort, not supervised).
pub fn call_all(fns: Vec<Rc<dyn Fn()>>) -> Rc<dyn Fn()> {
    Rc::new(move || {
        for f in &fns {
            f();
        }
    })
}

/// Cloneable handle over the remembered interaction state.
#[derive(Clone)]
pub struct ClapState {
    state: Signal<InteractionState>,
}

/// Remembers the interaction state for this composition slot, seeding it
/// with `initial` on the mounting render only.
pub fn use_clap_state(initial: InteractionState) -> ClapState {
    let sig = remember(move || signal(initial));
    ClapState {
        state: (*sig).clone(),
    }
}

impl ClapState {
    pub fn get(&self) -> InteractionState {
        self.state.get()
    }

    pub fn count(&self) -> u32 {
        self.state.get().count
    }

    pub fn count_total(&self) -> u32 {
        self.state.get().count_total
    }

    pub fn is_activated(&self) -> bool {
        self.state.get().is_activated
    }

    /// Applies the bounded-increment transition and returns the new state.
    pub fn activate(&self) -> InteractionState {
        self.state.update(|s| *s = s.activated());
        let next = self.state.get();
        log::trace!(
            "clap activated: count={} total={}",
            next.count,
            next.count_total
        );
        next
    }

    /// The underlying signal, for consumers that want synchronous
    /// per-transition observation rather than the per-frame notification.
    pub fn signal(&self) -> Signal<InteractionState> {
        self.state.clone()
    }

    /// Bundle for the activating element: internal transition first, then
    /// the consumer's handler; `aria-pressed` derived unless overridden.
    pub fn toggler_props(&self, overrides: TogglerOverrides) -> TogglerProps {
        let this = self.clone();
        let mut handlers: Vec<Rc<dyn Fn()>> = vec![Rc::new(move || {
            this.activate();
        })];
        if let Some(on_click) = overrides.on_click {
            handlers.push(on_click);
        }

        let pressed = overrides.pressed.unwrap_or_else(|| self.is_activated());
        TogglerProps {
            on_click: call_all(handlers),
            semantics: Semantics::new(Role::Button).pressed(pressed),
        }
    }

    /// Bundle for the count display: value plus `aria-valuemin/max/now`.
    pub fn counter_props(&self, overrides: CounterOverrides) -> CounterProps {
        let count = self.count();
        let mut semantics =
            Semantics::new(Role::Text).value(0, MAX_CLAPS_PER_VIEWER, count);
        if let Some(label) = overrides.label {
            semantics = semantics.label(label);
        }
        CounterProps { count, semantics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_saturates_at_cap() {
        let mut s = InteractionState::with_total(267);
        for _ in 0..MAX_CLAPS_PER_VIEWER + 10 {
            s = s.activated();
        }
        assert_eq!(s.count, MAX_CLAPS_PER_VIEWER);
    }

    #[test]
    fn total_tracks_count_until_cap() {
        let mut s = InteractionState::with_total(267);

        s = s.activated();
        assert_eq!(s, InteractionState {
            count: 1,
            count_total: 268,
            is_activated: true
        });

        for _ in 1..50 {
            s = s.activated();
        }
        assert_eq!(s.count, 50);
        assert_eq!(s.count_total, 317);

        // 51st activation changes nothing but stays total.
        s = s.activated();
        assert_eq!(s.count, 50);
        assert_eq!(s.count_total, 317);
        assert!(s.is_activated);
    }

    #[test]
    fn count_after_n_is_min_n_cap() {
        for n in [0u32, 1, 7, 50, 51, 80] {
            let mut s = InteractionState::default();
            for _ in 0..n {
                s = s.activated();
            }
            assert_eq!(s.count, n.min(MAX_CLAPS_PER_VIEWER), "after {n}");
        }
    }

    #[test]
    fn toggler_runs_internal_then_consumer() {
        use std::cell::RefCell;

        let mut host = ovation_core::Host::new();
        let order: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

        let order2 = order.clone();
        host.render(move || {
            let state = use_clap_state(InteractionState::default());
            let observer = state.clone();
            let order3 = order2.clone();
            let props = state.toggler_props(TogglerOverrides {
                on_click: Some(Rc::new(move || {
                    // Internal transition already applied when we run.
                    assert_eq!(observer.count(), 1);
                    order3.borrow_mut().push("consumer");
                })),
                pressed: None,
            });
            (props.on_click)();
            assert!(state.is_activated());
        })
        .unwrap();

        assert_eq!(*order.borrow(), vec!["consumer"]);
    }

    #[test]
    fn subscribers_observe_each_transition() {
        use std::cell::RefCell;

        let mut host = ovation_core::Host::new();
        let seen: Rc<RefCell<Vec<u32>>> = Rc::new(RefCell::new(Vec::new()));

        let seen2 = seen.clone();
        host.render(move || {
            let state = use_clap_state(InteractionState::with_total(267));
            let seen = seen2.clone();
            state.signal().subscribe(move |s| seen.borrow_mut().push(s.count));

            state.activate();
            state.activate();
            state.activate();
        })
        .unwrap();

        // Synchronous, one notification per transition — unlike the batched
        // per-frame on_clap surface.
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn pressed_override_wins() {
        let mut host = ovation_core::Host::new();
        host.render(|| {
            let state = use_clap_state(InteractionState::default());
            let props = state.toggler_props(TogglerOverrides {
                on_click: None,
                pressed: Some(true),
            });
            assert_eq!(props.semantics.pressed, Some(true));

            let derived = state.toggler_props(TogglerOverrides::default());
            assert_eq!(derived.semantics.pressed, Some(false));
        })
        .unwrap();
    }

    #[test]
    fn counter_props_carry_bounds() {
        let mut host = ovation_core::Host::new();
        host.render(|| {
            let state = use_clap_state(InteractionState::with_total(267));
            state.activate();
            state.activate();

            let props = state.counter_props(CounterOverrides::default());
            assert_eq!(props.count, 2);
            let value = props.semantics.value.unwrap();
            assert_eq!((value.min, value.max, value.now), (0, 50, 2));
        })
        .unwrap();
    }
}
