//! Bounded rotating store of killed text.
//!
//! Slots are reused in rotation once the ring is full: the slot after the
//! current one (wrapping) is overwritten, which is always the oldest entry.
//! A kill that continues a streak merges into the current slot instead of
//! taking a new one.

use tracing::debug;

#[derive(Debug, Clone)]
pub struct KillRing {
    entries: Vec<String>,
    /// Slot the next yank reads; `None` until the first kill.
    index: Option<usize>,
    capacity: usize,
}

impl KillRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: None,
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Slot contents in storage order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Text a yank would insert.
    pub fn current(&self) -> Option<&str> {
        self.index
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
    }

    /// Record killed text. With `continue_streak` the text is merged into the
    /// current slot (in front when `prepend`), otherwise a new slot is used.
    pub fn push(&mut self, text: &str, prepend: bool, continue_streak: bool) {
        if continue_streak && let Some(slot) = self.index.and_then(|i| self.entries.get_mut(i)) {
            if prepend {
                slot.insert_str(0, text);
            } else {
                slot.push_str(text);
            }
            debug!(target: "state.kill_ring", index = ?self.index, prepend, len = slot.len(), "kill_merged");
            return;
        }
        if self.entries.len() < self.capacity {
            self.entries.push(text.to_string());
            self.index = Some(self.entries.len() - 1);
        } else {
            let next = self.index.map_or(0, |i| (i + 1) % self.entries.len());
            self.entries[next] = text.to_string();
            self.index = Some(next);
        }
        debug!(target: "state.kill_ring", index = ?self.index, slots = self.entries.len(), "kill_new_slot");
    }

    /// Step the yank index back one slot (wrapping) and return that slot.
    pub fn rotate_back(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let len = self.entries.len();
        let i = match self.index {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.index = Some(i);
        debug!(target: "state.kill_ring", index = i, "rotate_back");
        Some(&self.entries[i])
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = None;
    }

    /// Change the capacity. Shrinking keeps the most recent entries.
    pub fn set_capacity(&mut self, capacity: usize) {
        let capacity = capacity.max(1);
        if capacity < self.entries.len() {
            let mut kept = Vec::with_capacity(capacity);
            let len = self.entries.len();
            let newest = self.index.unwrap_or(len - 1);
            for back in (0..capacity).rev() {
                kept.push(self.entries[(newest + len - back) % len].clone());
            }
            self.entries = kept;
            self.index = Some(capacity - 1);
        }
        self.capacity = capacity;
    }
}
