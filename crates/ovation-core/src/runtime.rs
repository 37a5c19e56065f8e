//! Composition runtime.
//!
//! A [`Host`] owns one widget tree: its `remember` slots, its root [`Scope`],
//! and the per-frame effect queues. [`Host::render`] runs the build closure,
//! flushes layout effects (pre-paint), crosses the paint boundary, then
//! flushes passive effects (post-paint). [`Host::unmount`] disposes the scope
//! and drops every slot, so nothing composed under the host survives it.
//!
//! Slot storage is per-host (not process-global): two hosts never share
//! state, and unmounting releases everything — timelines, registries,
//! remembered signals.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use crate::scope::Scope;

thread_local! {
    static CURRENT: RefCell<Option<Composer>> = const { RefCell::new(None) };
}

#[derive(Debug, Error)]
pub enum HostError {
    /// `Host::render` was called while another composition is in flight on
    /// this thread (e.g. from inside a build closure).
    #[error("render re-entered while a composition is already in flight")]
    NestedRender,
}

#[derive(Default)]
pub struct Composer {
    slots: Vec<Box<dyn Any>>,
    cursor: usize,
    layout_queue: Vec<Box<dyn FnOnce()>>,
    passive_queue: Vec<Box<dyn FnOnce()>>,
}

/// Owns one mounted composition.
#[derive(Default)]
pub struct Host {
    composer: Composer,
    root_scope: Option<Scope>,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    /// Composes one frame: runs `build` under the root scope, then the two
    /// effect phases around the paint boundary.
    pub fn render<R>(&mut self, build: impl FnOnce() -> R) -> Result<R, HostError> {
        let nested = CURRENT.with(|c| c.borrow().is_some());
        if nested {
            return Err(HostError::NestedRender);
        }

        self.composer.cursor = 0;
        CURRENT.with(|c| {
            *c.borrow_mut() = Some(std::mem::take(&mut self.composer));
        });

        // Guard recovers the composer on unwind too: a panicking build
        // closure must not leave the thread mid-composition (every later
        // render would report NestedRender) or lose this host's slots.
        struct Recover<'a>(&'a mut Composer);
        impl Drop for Recover<'_> {
            fn drop(&mut self) {
                *self.0 = CURRENT.with(|c| c.borrow_mut().take()).unwrap_or_default();
            }
        }

        let scope = self.root_scope.get_or_insert_with(Scope::new).clone();
        let result = {
            let _recover = Recover(&mut self.composer);
            scope.run(build)
        };

        // Pre-paint: layout effects see final geometry, nothing painted yet.
        let layout = std::mem::take(&mut self.composer.layout_queue);
        for f in layout {
            f();
        }

        // The paint boundary sits here. Passive effects run after it and
        // never delay animation start.
        let passive = std::mem::take(&mut self.composer.passive_queue);
        for f in passive {
            f();
        }

        Ok(result)
    }

    /// Tears the composition down: scope disposers run (children first),
    /// then every slot is dropped.
    pub fn unmount(&mut self) {
        if let Some(scope) = self.root_scope.take() {
            scope.dispose();
        }
        self.composer = Composer::default();
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        self.unmount();
    }
}

pub(crate) fn enqueue_layout(f: Box<dyn FnOnce()>) {
    CURRENT.with(|c| match c.borrow_mut().as_mut() {
        Some(composer) => composer.layout_queue.push(f),
        None => {
            log::warn!("layout effect scheduled outside composition; running inline");
            f();
        }
    });
}

pub(crate) fn enqueue_passive(f: Box<dyn FnOnce()>) {
    CURRENT.with(|c| match c.borrow_mut().as_mut() {
        Some(composer) => composer.passive_queue.push(f),
        None => {
            log::warn!("passive effect scheduled outside composition; running inline");
            f();
        }
    });
}

/// Slot-based remember (sequential composition only): the Nth call per frame
/// always resolves to the Nth slot.
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    CURRENT.with(|c| {
        let mut borrow = c.borrow_mut();
        let Some(composer) = borrow.as_mut() else {
            log::warn!("remember called outside composition; value will not persist");
            return Rc::new(init());
        };

        let cursor = composer.cursor;
        composer.cursor += 1;

        if cursor >= composer.slots.len() {
            let rc: Rc<T> = Rc::new(init());
            composer.slots.push(Box::new(rc.clone()));
            return rc;
        }

        if let Some(rc) = composer.slots[cursor].downcast_ref::<Rc<T>>() {
            rc.clone()
        } else {
            log::warn!(
                "remember: slot {cursor} type changed; replacing. \
                 Keep remember calls out of conditional branches."
            );
            let rc: Rc<T> = Rc::new(init());
            composer.slots[cursor] = Box::new(rc.clone());
            rc
        }
    })
}
