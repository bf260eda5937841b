//! Read-only view over the ordered collection a sampler draws from.
//!
//! The sampler never owns the elements' lifecycle: it reads the collection on
//! refresh (to compute weights) and on element sampling (to hand back the
//! selected element). Callers pick the handle that matches how they mutate the
//! collection:
//! - `&[T]` / `&Vec<T>` for a frozen borrow
//! - `Vec<T>` when the sampler may hold it and the caller edits via `source_mut()`
//! - `Rc<RefCell<Vec<T>>>` when the caller keeps mutating it independently

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// An ordered, indexable, length-queryable collection.
pub trait Population {
    type Item;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visit the element at `index`, or return `None` if it is out of range.
    fn with_item<U>(&self, index: usize, f: impl FnOnce(&Self::Item) -> U) -> Option<U>;

    /// Visit every element in index order.
    fn for_each_item(&self, mut f: impl FnMut(usize, &Self::Item)) {
        for index in 0..self.len() {
            self.with_item(index, |item| f(index, item));
        }
    }
}

impl<T> Population for [T] {
    type Item = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn with_item<U>(&self, index: usize, f: impl FnOnce(&T) -> U) -> Option<U> {
        self.get(index).map(f)
    }

    fn for_each_item(&self, mut f: impl FnMut(usize, &T)) {
        for (index, item) in self.iter().enumerate() {
            f(index, item);
        }
    }
}

impl<T> Population for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn with_item<U>(&self, index: usize, f: impl FnOnce(&T) -> U) -> Option<U> {
        self.as_slice().with_item(index, f)
    }

    fn for_each_item(&self, f: impl FnMut(usize, &T)) {
        self.as_slice().for_each_item(f)
    }
}

impl<T> Population for VecDeque<T> {
    type Item = T;

    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn with_item<U>(&self, index: usize, f: impl FnOnce(&T) -> U) -> Option<U> {
        self.get(index).map(f)
    }

    fn for_each_item(&self, mut f: impl FnMut(usize, &T)) {
        for (index, item) in self.iter().enumerate() {
            f(index, item);
        }
    }
}

impl<P: Population + ?Sized> Population for &P {
    type Item = P::Item;

    fn len(&self) -> usize {
        (**self).len()
    }

    fn with_item<U>(&self, index: usize, f: impl FnOnce(&P::Item) -> U) -> Option<U> {
        (**self).with_item(index, f)
    }

    fn for_each_item(&self, f: impl FnMut(usize, &P::Item)) {
        (**self).for_each_item(f)
    }
}

/// Shared, caller-mutable handle. Each call takes a short-lived borrow, so the
/// caller must not hold a `borrow_mut()` across a refresh or sample.
impl<P: Population> Population for Rc<RefCell<P>> {
    type Item = P::Item;

    fn len(&self) -> usize {
        self.borrow().len()
    }

    fn with_item<U>(&self, index: usize, f: impl FnOnce(&P::Item) -> U) -> Option<U> {
        self.borrow().with_item(index, f)
    }

    fn for_each_item(&self, f: impl FnMut(usize, &P::Item)) {
        self.borrow().for_each_item(f)
    }
}
