//! # BoundedSelector
//!
//! A fixed-capacity structure that keeps the `K` most preferred items it has
//! seen. Preference comes from an injected comparator, so the same type keeps
//! the `K` best or the `K` worst items depending on how it is built.
//!
//! Internally this is a binary heap with the *least* preferred retained item
//! at the root. That makes the full-selector check on insert O(1) and the
//! eviction O(log K).
//!
//! ## Example
//!
//! ```rust
//! use godsel::selection::BoundedSelector;
//!
//! // Keep the three smallest numbers.
//! let mut smallest = BoundedSelector::new(3, |a: &i32, b: &i32| a.cmp(b));
//! for n in [9, 4, 7, 1, 8, 2] {
//!     smallest.insert(n);
//! }
//! assert_eq!(smallest.drain_ordered(), vec![1, 2, 4]);
//!
//! // Keep the two largest.
//! let mut largest = BoundedSelector::new(2, |a: &i32, b: &i32| b.cmp(a));
//! for n in [9, 4, 7, 1, 8, 2] {
//!     largest.insert(n);
//! }
//! assert_eq!(largest.pop().unwrap(), 9);
//! assert_eq!(largest.pop().unwrap(), 8);
//! assert!(largest.pop().is_err());
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::error::{GeneticError, Result};

/// Retains the `capacity` most preferred items under `compare`.
///
/// `compare(a, b)` returns `Less` when `a` ranks before `b`, `Equal` on a tie
/// and `Greater` when `a` ranks after `b`.
pub struct BoundedSelector<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Heap ordered so that `items[0]` is the least preferred retained item.
    items: Vec<T>,
    capacity: usize,
    compare: C,
}

impl<T, C> BoundedSelector<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Creates an empty selector. The capacity never changes afterwards.
    pub fn new(capacity: usize, compare: C) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            compare,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// The least preferred retained item, i.e. the one the next better insert evicts.
    pub fn peek_least_preferred(&self) -> Option<&T> {
        self.items.first()
    }

    /// Offers `item` to the selector.
    ///
    /// Returns the item that did not make the cut: `None` if `item` was
    /// retained without evicting anything, the evicted item if `item`
    /// displaced it, or `item` itself if it was rejected. Ties never evict.
    pub fn insert(&mut self, item: T) -> Option<T> {
        if self.items.len() < self.capacity {
            self.items.push(item);
            self.sift_up(self.items.len() - 1);
            return None;
        }

        let displaces = self
            .items
            .first()
            .is_some_and(|least| (self.compare)(&item, least) == Ordering::Less);
        if !displaces {
            return Some(item);
        }

        let evicted = std::mem::replace(&mut self.items[0], item);
        self.sift_down(0);
        Some(evicted)
    }

    /// Removes and returns the most preferred retained item.
    ///
    /// # Errors
    ///
    /// Returns [`GeneticError::SelectorUnderflow`] if nothing is retained.
    pub fn pop(&mut self) -> Result<T> {
        let len = self.items.len();
        if len == 0 {
            return Err(GeneticError::SelectorUnderflow);
        }

        // The root holds the least preferred item, so the most preferred one
        // is always among the leaves.
        let mut best = len / 2;
        for idx in (len / 2 + 1)..len {
            if (self.compare)(&self.items[idx], &self.items[best]) == Ordering::Less {
                best = idx;
            }
        }

        let item = self.items.swap_remove(best);
        if best < self.items.len() {
            self.sift_up(best);
            self.sift_down(best);
        }
        Ok(item)
    }

    /// Pops every retained item, most preferred first.
    pub fn drain_ordered(&mut self) -> Vec<T> {
        let mut drained = Vec::with_capacity(self.items.len());
        while let Ok(item) = self.pop() {
            drained.push(item);
        }
        drained
    }

    /// Empties the selector. Capacity is unchanged.
    pub fn flush(&mut self) {
        self.items.clear();
    }

    /// True when `a` ranks strictly after `b`.
    fn ranks_after(&self, a: usize, b: usize) -> bool {
        (self.compare)(&self.items[a], &self.items[b]) == Ordering::Greater
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if !self.ranks_after(idx, parent) {
                break;
            }
            self.items.swap(idx, parent);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let mut least = idx;

            if left < len && self.ranks_after(left, least) {
                least = left;
            }
            if right < len && self.ranks_after(right, least) {
                least = right;
            }
            if least == idx {
                break;
            }
            self.items.swap(idx, least);
            idx = least;
        }
    }
}

impl<T, C> fmt::Debug for BoundedSelector<T, C>
where
    T: fmt::Debug,
    C: Fn(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedSelector")
            .field("capacity", &self.capacity)
            .field("items", &self.items)
            .finish()
    }
}
