//! Deferred actions
//!
//! An [`Action`] is a side-effectful computation that has not run yet.
//! Producers return actions rather than performing I/O on the spot, so a
//! pipeline can be assembled first and executed once, and so producers can
//! be sequenced with [`Action::bind`] (that is all
//! [`Producer::append`][crate::producer::Producer::append] is).
//!
//! A consumer *is* trivially an action — one that performs no effect and
//! yields itself — which is what lets transduction results and real I/O be
//! sequenced under one protocol; see the [`From`] impl below.

use crate::consumer::Consumer;

/// A deferred computation yielding a `T` when run.
pub struct Action<T> {
    thunk: Box<dyn FnOnce() -> T>,
}

impl<T: 'static> Action<T> {
    /// Defer a computation.
    pub fn new(f: impl FnOnce() -> T + 'static) -> Action<T> {
        Action { thunk: Box::new(f) }
    }

    /// An action with no effect.
    pub fn pure(x: T) -> Action<T> {
        Action::new(move || x)
    }

    /// Execute the action.
    pub fn run(self) -> T {
        (self.thunk)()
    }

    /// Run `self`, then run the action `f` makes from its result.
    pub fn bind<U: 'static>(self, f: impl FnOnce(T) -> Action<U> + 'static) -> Action<U> {
        Action::new(move || f(self.run()).run())
    }

    /// Run `self` for its effect, then `b`.
    pub fn then<U: 'static>(self, b: Action<U>) -> Action<U> {
        Action::new(move || {
            self.run();
            b.run()
        })
    }

    /// Run `self` for its effect, then yield `x`.
    pub fn then_return<U: 'static>(self, x: U) -> Action<U> {
        Action::new(move || {
            self.run();
            x
        })
    }
}

impl<T: 'static> From<Consumer<T>> for Action<Consumer<T>> {
    fn from(c: Consumer<T>) -> Action<Consumer<T>> {
        Action::pure(c)
    }
}
