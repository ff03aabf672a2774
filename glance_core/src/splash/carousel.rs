// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.

/// A wrapping cursor over a list that may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel<T> {
    items: Vec<T>,
    index: usize,
}

impl<T> Default for Carousel<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> Carousel<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, index: 0 }
    }

    /// Replaces the list and rewinds to the first item.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.index = 0;
    }

    /// Moves forward, wrapping to the first item. Does nothing on an empty list.
    pub fn next(&mut self) {
        if !self.items.is_empty() {
            self.index = (self.index + 1) % self.items.len();
        }
    }

    /// Moves back, wrapping to the last item. Does nothing on an empty list.
    pub fn prev(&mut self) {
        if !self.items.is_empty() {
            self.index = self.index.checked_sub(1).unwrap_or(self.items.len() - 1);
        }
    }

    pub fn current(&self) -> Option<&T> {
        self.items.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Every asset path the items will need, so they can be loaded ahead of time.
    pub fn preload_paths(&self, path_of: impl FnMut(&T) -> Option<String>) -> Vec<String> {
        self.items.iter().filter_map(path_of).collect()
    }
}
