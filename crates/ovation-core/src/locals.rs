//! Composition locals.
//!
//! A thread-local stack of typed frames lets a root widget broadcast a value
//! to everything composed beneath it without threading parameters through
//! every call: the provider pushes a frame for the duration of its children,
//! descendants look the type up innermost-frame-first.
//!
//! ```rust
//! use ovation_core::locals::{local, with_local};
//!
//! #[derive(Clone)]
//! struct Accent(&'static str);
//!
//! with_local(Accent("coral"), || {
//!     let accent = local::<Accent>();
//!     assert_eq!(accent.map(|a| a.0), Some("coral"));
//! });
//! assert!(local::<Accent>().is_none());
//! ```

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

thread_local! {
    static LOCALS_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = const { RefCell::new(Vec::new()) };
}

/// Provides `value` as the local of type `T` for the duration of `f`.
pub fn with_local<T: Clone + 'static, R>(value: T, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<T>(), Box::new(value));
        f()
    })
}

/// Reads the innermost provided local of type `T`, if any.
pub fn local<T: Clone + 'static>() -> Option<T> {
    LOCALS_STACK.with(|st| {
        for frame in st.borrow().iter().rev() {
            if let Some(v) = frame.get(&TypeId::of::<T>()) {
                if let Some(t) = v.downcast_ref::<T>() {
                    return Some(t.clone());
                }
            }
        }
        None
    })
}

fn with_locals_frame<R>(f: impl FnOnce() -> R) -> R {
    // Frame guard ensures pop on unwind.
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            LOCALS_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    LOCALS_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

fn set_local_boxed(t: TypeId, v: Box<dyn Any>) {
    LOCALS_STACK.with(|st| {
        if let Some(top) = st.borrow_mut().last_mut() {
            top.insert(t, v);
        }
    });
}
