//! Append-only ordered storage for children, middleware and handlers.
use std::{ops::Deref, slice};

/// An ordered, duplicate-permitting sequence that only grows.
///
/// Insertion order is observable: the collector relies on "first match in registration
/// order" semantics, so nothing here ever reorders or removes an element.
#[derive(Clone, Debug)]
pub struct Store<T> {
    items: Vec<T>,
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        let items = vec![];
        Self { items }
    }
}

impl<T> Store<T> {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append `value`, returning a reference to the stored element.
    ///
    /// ```
    /// use routetrie::Store;
    ///
    /// let mut s = Store::new();
    /// *s.push(1) += 1;
    /// s.push(5);
    /// assert_eq!(&[2, 5], s.as_slice());
    /// ```
    pub fn push(&mut self, value: T) -> &mut T {
        let i = self.items.len();
        self.items.push(value);
        &mut self.items[i]
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Mutable access to the element at `i`, which must be in bounds. The element may
    /// change; its position may not.
    #[inline]
    pub(crate) fn nth_mut(&mut self, i: usize) -> &mut T {
        &mut self.items[i]
    }
}

impl<T> Deref for Store<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<'a, T> IntoIterator for &'a Store<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_push_returns_stored_value() {
        let mut s = Store::new();
        s.push("a");
        *s.push("b") = "c";

        assert_eq!(&["a", "c"], s.as_slice());
        assert_eq!(2, s.len());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut s = Store::default();
        s.push(7);
        s.push(7);

        assert_eq!(vec![&7, &7], s.iter().collect::<Vec<_>>());
    }

    #[quickcheck]
    fn test_preserves_insertion_order(xs: Vec<u32>) -> bool {
        let mut s = Store::new();
        for x in &xs {
            s.push(*x);
        }

        s.as_slice() == &xs[..]
    }
}
