//! Online top-N instruction ranking
//!
//! Streams (instruction, count) pairs exactly once, keeping one running
//! total per distinct instruction name in an index-addressable max-heap.
//! Repeat sightings adjust the slot's total and reheapify it in place
//! instead of removing and reinserting, so a series with many buckets per
//! instruction stays cheap. The structure lives for one request and is
//! consumed by [`InstructionTotals::into_top_n`].

use std::collections::{HashMap, HashSet};

/// Arena slot holding one instruction's running total.
/// `pos` is the slot's current position in the heap order and is kept in
/// sync on every swap.
#[derive(Debug)]
struct Slot {
    name: String,
    total: i64,
    pos: usize,
}

/// Per-request accumulator of instruction invocation totals
#[derive(Debug, Default)]
pub struct InstructionTotals {
    slots: Vec<Slot>,
    // Heap of arena indices ordered by slot total, largest at the root.
    heap: Vec<usize>,
    by_name: HashMap<String, usize>,
}

impl InstructionTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct instruction names seen so far.
    pub fn distinct(&self) -> usize {
        self.slots.len()
    }

    /// Record one bucket's count against its instruction name.
    pub fn record(&mut self, name: &str, count: i64) {
        if let Some(&slot) = self.by_name.get(name) {
            self.slots[slot].total += count;
            let pos = self.slots[slot].pos;
            let pos = self.sift_up(pos);
            self.sift_down(pos);
        } else {
            let slot = self.slots.len();
            self.slots.push(Slot {
                name: name.to_string(),
                total: count,
                pos: self.heap.len(),
            });
            self.by_name.insert(name.to_string(), slot);
            self.heap.push(slot);
            self.sift_up(self.heap.len() - 1);
        }
    }

    /// Consume the accumulator and return the names holding the `n` largest
    /// totals. Yields `min(n, distinct)` names; `n <= 0` yields none. Ties
    /// break arbitrarily.
    pub fn into_top_n(mut self, n: i64) -> HashSet<String> {
        let take = n.clamp(0, self.heap.len() as i64) as usize;
        let mut top = HashSet::with_capacity(take);
        for _ in 0..take {
            if let Some(slot) = self.pop_max() {
                top.insert(std::mem::take(&mut self.slots[slot].name));
            }
        }
        top
    }

    fn pop_max(&mut self) -> Option<usize> {
        let last = self.heap.len().checked_sub(1)?;
        self.swap(0, last);
        let slot = self.heap.pop();
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        slot
    }

    fn total_at(&self, pos: usize) -> i64 {
        self.slots[self.heap[pos]].total
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.slots[self.heap[a]].pos = a;
        self.slots[self.heap[b]].pos = b;
    }

    /// Restore heap order upward from `pos`; returns the final position.
    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.total_at(pos) <= self.total_at(parent) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
        pos
    }

    /// Restore heap order downward from `pos`.
    fn sift_down(&mut self, mut pos: usize) {
        loop {
            let mut largest = pos;
            for child in [2 * pos + 1, 2 * pos + 2] {
                if child < self.heap.len() && self.total_at(child) > self.total_at(largest) {
                    largest = child;
                }
            }
            if largest == pos {
                return;
            }
            self.swap(pos, largest);
            pos = largest;
        }
    }
}

/// Rank a decoded series' (instruction, count) pairs and return the top-N
/// instruction names.
pub fn select_top_n<'a, I>(pairs: I, n: i64) -> HashSet<String>
where
    I: IntoIterator<Item = (&'a str, i64)>,
{
    let mut totals = InstructionTotals::new();
    for (name, count) in pairs {
        totals.record(name, count);
    }
    totals.into_top_n(n)
}
