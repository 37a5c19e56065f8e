//! Observable values.
//!
//! A [`Signal`] is a cloneable handle over one value plus the callbacks
//! watching it. Every `set`/`update` notifies all subscribers synchronously,
//! in registration order, with a reference to the new value. Subscriptions
//! live as long as the signal does; drop the last handle and they go with it.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone)]
pub struct Signal<T: 'static> {
    inner: Rc<RefCell<Inner<T>>>,
}

struct Inner<T> {
    value: T,
    watchers: Vec<Box<dyn Fn(&T)>>,
}

impl<T> Inner<T> {
    fn notify(&self) {
        for watcher in &self.watchers {
            watcher(&self.value);
        }
    }
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                watchers: Vec::new(),
            })),
        }
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.borrow().value.clone()
    }

    pub fn set(&self, value: T) {
        let inner = &mut *self.inner.borrow_mut();
        inner.value = value;
        inner.notify();
    }

    /// Mutates the value in place, then notifies.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let inner = &mut *self.inner.borrow_mut();
        f(&mut inner.value);
        inner.notify();
    }

    /// Watches every subsequent change. The callback must not `set`/`update`
    /// this signal reentrantly.
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) {
        self.inner.borrow_mut().watchers.push(Box::new(f));
    }
}

pub fn signal<T>(t: T) -> Signal<T> {
    Signal::new(t)
}
