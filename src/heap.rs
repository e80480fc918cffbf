//! Array-backed binary min-heap.
//!
//! Ordering ties are resolved positionally: an item only moves past another
//! one when it compares strictly smaller, so on equal keys the element already
//! closer to the root stays there and the left child is preferred over the
//! right one. Tree shapes built on top of the heap depend on this.

#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    items: Vec<T>,
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Smallest item, if any.
    pub fn top(&self) -> Option<&T> {
        self.items.first()
    }
}

impl<T: Ord> MinHeap<T> {
    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    /// Removes and returns the smallest item. An empty heap yields `None`
    /// and is left untouched.
    pub fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let top = self.items.swap_remove(0);
        self.sift_down(0);
        Some(top)
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.items[index] >= self.items[parent] {
                break;
            }
            self.items.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let n = self.items.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            if left >= n {
                break;
            }

            // left wins ties
            let child = if right < n && self.items[right] < self.items[left] {
                right
            } else {
                left
            };

            if self.items[child] >= self.items[index] {
                break;
            }
            self.items.swap(index, child);
            index = child;
        }
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for MinHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut heap = Self::with_capacity(iter.size_hint().0);
        for item in iter {
            heap.push(item);
        }
        heap
    }
}
