//! Effects.
//!
//! Two suspension points per frame, mirroring the host lifecycle the widget
//! layer is written against:
//!
//! - **layout effects** run after the build closure returns but before the
//!   paint boundary — element geometry is final, nothing is on screen yet.
//!   Animation timelines are (re)built here.
//! - **passive effects** run after the paint boundary and never block
//!   animation start. Consumer notifications go here.
//!
//! Both are keyed: the callback is scheduled only on renders where the key
//! differs from the previous composition at the same slot, so a stable key
//! schedules exactly once.

use std::cell::{Cell, RefCell};

use crate::runtime::{enqueue_layout, enqueue_passive, remember};

/// Schedules `f` for the pre-paint phase of this frame when `key` differs
/// from the last composition at this slot.
pub fn layout_effect<K: PartialEq + Clone + 'static>(key: K, f: impl FnOnce() + 'static) {
    let last = remember(|| RefCell::new(None::<K>));
    let changed = last.borrow().as_ref() != Some(&key);
    if changed {
        *last.borrow_mut() = Some(key);
        enqueue_layout(Box::new(f));
    }
}

/// Schedules `f` for the post-paint phase of this frame when `key` differs
/// from the last composition at this slot.
pub fn passive_effect<K: PartialEq + Clone + 'static>(key: K, f: impl FnOnce() + 'static) {
    let last = remember(|| RefCell::new(None::<K>));
    let changed = last.borrow().as_ref() != Some(&key);
    if changed {
        *last.borrow_mut() = Some(key);
        enqueue_passive(Box::new(f));
    }
}

/// Like [`passive_effect`], but the very first scheduled invocation per slot
/// lifetime only arms a latch and is swallowed; later key changes fire `f`.
///
/// This is the "no notification on mount" guard: key the effect on a value
/// that changes once per activation and `f` fires exactly once per
/// activation, never on the mounting render.
pub fn after_mount_effect<K: PartialEq + Clone + 'static>(key: K, f: impl FnOnce() + 'static) {
    let last = remember(|| RefCell::new(None::<K>));
    let mounted = remember(|| Cell::new(false));

    let changed = last.borrow().as_ref() != Some(&key);
    if changed {
        *last.borrow_mut() = Some(key);
        enqueue_passive(Box::new(move || {
            if mounted.get() {
                f();
            } else {
                mounted.set(true);
            }
        }));
    }
}
