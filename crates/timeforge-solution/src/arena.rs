//! Slot storage addressed by typed handles.
//!
//! Removed slots go on a free list and are reused by later inserts, so a
//! handle stays valid for exactly the life of its object. [`Arena::insert_at`]
//! reinstates an object at a specific free slot, which is how undo restores
//! deleted objects under their original handles.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use timeforge_core::Id;

/// Vector of optional slots with a free list.
#[derive(Clone)]
pub struct Arena<I: Id, T> {
    slots: Vec<Option<T>>,
    free: Vec<usize>,
    len: usize,
    _marker: PhantomData<I>,
}

impl<I: Id, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Id, T> Arena<I, T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Number of live objects.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots, live or free.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Stores `value`, reusing the most recently freed slot if any.
    pub fn insert(&mut self, value: T) -> I {
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                debug_assert!(self.slots[index].is_none());
                self.slots[index] = Some(value);
                I::new(index)
            }
            None => {
                self.slots.push(Some(value));
                I::new(self.slots.len() - 1)
            }
        }
    }

    /// Stores `value` at `id`, which must be free or past the end.
    ///
    /// # Panics
    /// Panics if the slot is occupied.
    pub fn insert_at(&mut self, id: I, value: T) {
        let index = id.index();
        while self.slots.len() <= index {
            self.free.push(self.slots.len());
            self.slots.push(None);
        }
        assert!(
            self.slots[index].is_none(),
            "arena slot {:?} is already occupied",
            id
        );
        if let Some(pos) = self.free.iter().rposition(|&f| f == index) {
            self.free.remove(pos);
        }
        self.slots[index] = Some(value);
        self.len += 1;
    }

    /// Reserves a fresh slot past the end without filling it.
    ///
    /// The slot must be filled with [`Arena::fill`] before it is read.
    pub fn reserve(&mut self) -> I {
        self.slots.push(None);
        I::new(self.slots.len() - 1)
    }

    /// Fills a slot obtained from [`Arena::reserve`].
    pub fn fill(&mut self, id: I, value: T) {
        let slot = &mut self.slots[id.index()];
        assert!(slot.is_none(), "arena slot {:?} filled twice", id);
        *slot = Some(value);
        self.len += 1;
    }

    /// Removes and returns the object at `id`.
    ///
    /// # Panics
    /// Panics if the slot is empty.
    pub fn remove(&mut self, id: I) -> T {
        let value = self
            .slots
            .get_mut(id.index())
            .and_then(Option::take)
            .unwrap_or_else(|| panic!("no live object at {:?}", id));
        self.free.push(id.index());
        self.len -= 1;
        value
    }

    #[inline]
    pub fn contains(&self, id: I) -> bool {
        matches!(self.slots.get(id.index()), Some(Some(_)))
    }

    #[inline]
    pub fn get(&self, id: I) -> Option<&T> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn get_mut(&mut self, id: I) -> Option<&mut T> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Iterates over live objects in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|v| (I::new(i), v)))
    }

    /// Iterates over the handles of live objects in slot order.
    pub fn ids(&self) -> impl Iterator<Item = I> + '_ {
        self.iter().map(|(id, _)| id)
    }
}

impl<I: Id, T> Index<I> for Arena<I, T> {
    type Output = T;

    #[inline]
    fn index(&self, id: I) -> &T {
        self.get(id)
            .unwrap_or_else(|| panic!("no live object at {:?}", id))
    }
}

impl<I: Id, T> IndexMut<I> for Arena<I, T> {
    #[inline]
    fn index_mut(&mut self, id: I) -> &mut T {
        self.get_mut(id)
            .unwrap_or_else(|| panic!("no live object at {:?}", id))
    }
}

impl<I: Id, T: fmt::Debug> fmt::Debug for Arena<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
