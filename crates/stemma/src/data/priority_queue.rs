//! Binary min-heap keyed by node id, with decrease-key support.
//!
//! Backs the greedy frontier expansions in rank assignment: the longest-path
//! initial ranking (priority = remaining in-degree) and Prim-style spanning
//! tree construction (priority = edge slack).

use crate::LayoutError;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
struct Entry {
    key: String,
    priority: i64,
}

#[derive(Debug, Clone, Default)]
pub struct PriorityQueue {
    heap: Vec<Entry>,
    // key -> heap slot
    indices: FxHashMap<String, usize>,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn has(&self, key: &str) -> bool {
        self.indices.contains_key(key)
    }

    pub fn priority(&self, key: &str) -> Option<i64> {
        self.indices.get(key).map(|&i| self.heap[i].priority)
    }

    /// Adds a key with the given priority. Returns `false` (leaving the
    /// existing entry untouched) when the key is already present.
    pub fn add(&mut self, key: impl Into<String>, priority: i64) -> bool {
        let key = key.into();
        if self.indices.contains_key(&key) {
            return false;
        }
        let index = self.heap.len();
        self.indices.insert(key.clone(), index);
        self.heap.push(Entry { key, priority });
        self.sift_up(index);
        true
    }

    /// The key with the smallest priority, if any.
    pub fn min(&self) -> Option<&str> {
        self.heap.first().map(|e| e.key.as_str())
    }

    pub fn remove_min(&mut self) -> Option<String> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let entry = self.heap.pop().expect("heap is non-empty");
        self.indices.remove(&entry.key);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(entry.key)
    }

    /// Lowers the priority of `key`. Raising a priority would violate the
    /// min-heap invariant, so that is an error rather than a silent no-op.
    pub fn decrease(&mut self, key: &str, priority: i64) -> Result<(), LayoutError> {
        let index = *self
            .indices
            .get(key)
            .ok_or_else(|| crate::graphlib::GraphError::MissingNode(key.to_string()))?;
        let current = self.heap[index].priority;
        if priority > current {
            return Err(LayoutError::PriorityIncrease {
                key: key.to_string(),
                current,
                requested: priority,
            });
        }
        self.heap[index].priority = priority;
        self.sift_up(index);
        Ok(())
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) >> 1;
            if self.heap[parent].priority <= self.heap[index].priority {
                break;
            }
            self.swap(parent, index);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;
            if left < self.heap.len() && self.heap[left].priority < self.heap[smallest].priority {
                smallest = left;
            }
            if right < self.heap.len() && self.heap[right].priority < self.heap[smallest].priority {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.swap(index, smallest);
            index = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.indices.insert(self.heap[a].key.clone(), a);
        self.indices.insert(self.heap[b].key.clone(), b);
    }
}
