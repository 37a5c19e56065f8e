//! Role-keyed element registry.
//!
//! The three visual parts mount in whatever order the consumer arranges
//! them; each registers its handle under its role as it appears. The
//! registry merges registrations (never discards another role), tolerates
//! re-registration of the same handle, and reports readiness once all three
//! roles are present. Roles are a closed enum, so an unexpected role is
//! unrepresentable rather than validated.

use std::cell::RefCell;
use std::rc::Rc;

use ovation_core::{ElementHandle, ElementId, remember};

/// Logical role of a visual part.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartRole {
    /// The activation surface (the clap button itself).
    Trigger,
    /// The transient "+N" readout.
    DeltaCounter,
    /// The aggregate total readout.
    RunningTotal,
}

/// Per-role handle snapshot. Partial until every part has mounted.
#[derive(Clone, Debug, Default)]
pub struct HandleSet {
    trigger: Option<ElementHandle>,
    delta_counter: Option<ElementHandle>,
    running_total: Option<ElementHandle>,
}

impl HandleSet {
    pub fn get(&self, role: PartRole) -> Option<&ElementHandle> {
        match role {
            PartRole::Trigger => self.trigger.as_ref(),
            PartRole::DeltaCounter => self.delta_counter.as_ref(),
            PartRole::RunningTotal => self.running_total.as_ref(),
        }
    }

    fn slot_mut(&mut self, role: PartRole) -> &mut Option<ElementHandle> {
        match role {
            PartRole::Trigger => &mut self.trigger,
            PartRole::DeltaCounter => &mut self.delta_counter,
            PartRole::RunningTotal => &mut self.running_total,
        }
    }

    pub fn ready(&self) -> bool {
        self.identity().is_some()
    }

    /// Identity of the full handle set; the animation layer rebuilds its
    /// timeline exactly once per distinct value of this.
    pub fn identity(&self) -> Option<(ElementId, ElementId, ElementId)> {
        match (&self.trigger, &self.delta_counter, &self.running_total) {
            (Some(t), Some(d), Some(r)) => Some((t.id(), d.id(), r.id())),
            _ => None,
        }
    }
}

/// Shared, cloneable registry over a [`HandleSet`].
#[derive(Clone, Default)]
pub struct RefRegistry {
    inner: Rc<RefCell<HandleSet>>,
}

impl RefRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or replaces) the handle for `role`. Idempotent for the same
    /// handle; other roles are never touched.
    pub fn register(&self, role: PartRole, handle: ElementHandle) {
        let mut set = self.inner.borrow_mut();
        let slot = set.slot_mut(role);
        if slot.as_ref() == Some(&handle) {
            return;
        }
        *slot = Some(handle);
    }

    /// Current snapshot of the handle set.
    pub fn handles(&self) -> HandleSet {
        self.inner.borrow().clone()
    }

    /// Role-tagged setter for consumers that attach refs to their own
    /// elements (the getter-props facade).
    pub fn set_ref(&self, role: PartRole) -> RefSetter {
        RefSetter {
            role,
            registry: self.clone(),
        }
    }
}

/// A registration function pre-bound to one role.
#[derive(Clone)]
pub struct RefSetter {
    role: PartRole,
    registry: RefRegistry,
}

impl RefSetter {
    pub fn set(&self, handle: ElementHandle) {
        self.registry.register(self.role, handle);
    }

    pub fn role(&self) -> PartRole {
        self.role
    }
}

/// Remembers one registry per composition slot.
pub fn use_ref_registry() -> RefRegistry {
    (*remember(RefRegistry::new)).clone()
}
