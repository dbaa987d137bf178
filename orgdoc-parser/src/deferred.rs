//! Values whose final form depends on the parse state as it stands *after* the whole
//! input has been scanned.
//!
//! The scanning pass never knows everything it needs: a footnote reference can precede
//! its definition and a `#+OPTIONS:` line at the end of a file still governs header
//! tags at the top. Every block and inline component therefore produces a
//! [`Deferred`] closed over "whatever the final state turns out to be". The document is
//! built as one tree of deferred values and forced exactly once, by
//! [`Deferred::resolve`], against the [`FinalState`].
use std::{fmt, rc::Rc};

use crate::state::FinalState;

/// A computation pending the final parse state.
pub struct Deferred<T>(Rc<dyn Fn(&FinalState) -> T>);

impl<T: 'static> Deferred<T> {
    /// Build a deferred value from a function of the final state.
    pub fn new(f: impl Fn(&FinalState) -> T + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Lift a plain value.
    pub fn pure(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(move |_| value.clone())
    }

    #[must_use]
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Deferred<U> {
        Deferred::new(move |state| f(self.resolve(state)))
    }

    /// Combine two deferred values; `f` runs after both have been resolved.
    #[must_use]
    pub fn combine<U: 'static, V: 'static>(
        self,
        other: Deferred<U>,
        f: impl Fn(T, U) -> V + 'static,
    ) -> Deferred<V> {
        Deferred::new(move |state| f(self.resolve(state), other.resolve(state)))
    }

    /// Force the value. Only the top-level entry point and the final state's own
    /// lookups call this, after scanning has finished.
    pub(crate) fn resolve(&self, state: &FinalState) -> T {
        (self.0)(state)
    }
}

impl<T: 'static> Deferred<Vec<T>> {
    /// The identity of [`Deferred::append`].
    #[must_use]
    pub fn empty() -> Self {
        Self::new(|_| Vec::new())
    }

    /// Concatenate two deferred sequences, `self` first.
    #[must_use]
    pub fn append(self, other: Self) -> Self {
        self.combine(other, |mut first, second| {
            first.extend(second);
            first
        })
    }

    /// Lift a single deferred element into a one-element sequence.
    pub fn singleton(item: Deferred<T>) -> Self {
        item.map(|value| vec![value])
    }
}

/// Turn a list of deferred values into one deferred list, preserving order.
pub fn sequence<T: 'static>(items: Vec<Deferred<T>>) -> Deferred<Vec<T>> {
    Deferred::new(move |state| items.iter().map(|item| item.resolve(state)).collect())
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: 'static> Default for Deferred<Vec<T>> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: 'static> FromIterator<Deferred<Vec<T>>> for Deferred<Vec<T>> {
    fn from_iter<I: IntoIterator<Item = Deferred<Vec<T>>>>(iter: I) -> Self {
        let parts: Vec<_> = iter.into_iter().collect();
        sequence(parts).map(|parts| parts.into_iter().flatten().collect())
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Deferred(..)")
    }
}
