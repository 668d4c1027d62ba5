//! Application state models provided as reactive contexts.
//!
//! DESIGN
//! ======
//! State types are plain structs so transitions stay unit-testable; the root
//! component wraps each in an `RwSignal` and services write through
//! [`StateStore`], which replaces the snapshot in one update.

pub mod admin;
pub mod session;

use leptos::prelude::*;

/// Write access to a shared state snapshot.
pub trait StateStore<T> {
    /// Run `f` against the current value. `None` if the store is gone
    /// (e.g. the owning component was disposed).
    fn mutate<U>(&self, f: impl FnOnce(&mut T) -> U) -> Option<U>;
}

impl<T> StateStore<T> for RwSignal<T>
where
    T: Send + Sync + 'static,
{
    fn mutate<U>(&self, f: impl FnOnce(&mut T) -> U) -> Option<U> {
        self.try_update(f)
    }
}

#[cfg(test)]
impl<T> StateStore<T> for std::cell::RefCell<T> {
    fn mutate<U>(&self, f: impl FnOnce(&mut T) -> U) -> Option<U> {
        Some(f(&mut self.borrow_mut()))
    }
}
