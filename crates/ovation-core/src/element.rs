//! Element handles.
//!
//! The widget layer never owns real platform nodes; it holds cloneable
//! handles over the small slice of style the animation layer writes to
//! (transform, opacity). Handles compare by identity so a remount (a new
//! handle under the same logical role) is observable.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::Transform;

pub type ElementId = u64;

thread_local! {
    static NEXT_ELEMENT_ID: Cell<ElementId> = const { Cell::new(1) };
}

/// The animatable subset of an element's presentation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementStyle {
    pub transform: Transform,
    pub opacity: f32,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            opacity: 1.0,
        }
    }
}

/// Cloneable, identity-comparable handle to a rendered element.
///
/// Cloning shares the underlying style cell; `ElementHandle::new` mints a
/// distinct element with a fresh id.
#[derive(Clone)]
pub struct ElementHandle {
    id: ElementId,
    style: Rc<RefCell<ElementStyle>>,
}

impl ElementHandle {
    pub fn new() -> Self {
        let id = NEXT_ELEMENT_ID.with(|n| {
            let id = n.get();
            n.set(id + 1);
            id
        });
        Self {
            id,
            style: Rc::new(RefCell::new(ElementStyle::default())),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn style(&self) -> ElementStyle {
        *self.style.borrow()
    }

    pub fn update_style(&self, f: impl FnOnce(&mut ElementStyle)) {
        f(&mut self.style.borrow_mut());
    }

    /// Snaps the transform back to identity, bypassing any animation.
    pub fn reset_transform(&self) {
        self.style.borrow_mut().transform = Transform::identity();
    }

    pub fn downgrade(&self) -> WeakElementHandle {
        WeakElementHandle {
            id: self.id,
            style: Rc::downgrade(&self.style),
        }
    }
}

impl Default for ElementHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ElementHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Rc::ptr_eq(&self.style, &other.style)
    }
}

impl std::fmt::Debug for ElementHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementHandle").field("id", &self.id).finish()
    }
}

/// Non-owning handle used by animation tracks so a torn-down element does
/// not outlive its widget.
#[derive(Clone)]
pub struct WeakElementHandle {
    id: ElementId,
    style: Weak<RefCell<ElementStyle>>,
}

impl WeakElementHandle {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn upgrade(&self) -> Option<ElementHandle> {
        self.style.upgrade().map(|style| ElementHandle {
            id: self.id,
            style,
        })
    }
}
