//! Indexed d-ary min-heap with decrease-key.
//!
//! Items are dense indices `0..n` (node ids).  Keys are `(f64, u64)` pairs
//! compared lexicographically with `f64::total_cmp`, so the secondary key
//! breaks ties deterministically.  A larger arity makes the tree shallower
//! (cheaper decrease-key) at the cost of more comparisons per pop.

use std::cmp::Ordering;

pub type HeapKey = (f64, u64);

const UNSEEN: u32 = u32::MAX;
const POPPED: u32 = u32::MAX - 1;

/// Where an item is relative to the heap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ItemState {
    /// Never pushed since the last reset.
    Unseen,
    /// Currently in the heap.
    InHeap,
    /// Pushed and popped; its key is final.
    Popped,
}

pub struct DaryHeap {
    arity: usize,
    /// Items in heap order.
    heap:  Vec<u32>,
    /// Position of each item in `heap`, or `UNSEEN` / `POPPED`.
    pos:   Vec<u32>,
    keys:  Vec<HeapKey>,
}

#[inline]
fn less(a: HeapKey, b: HeapKey) -> bool {
    match a.0.total_cmp(&b.0) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => a.1 < b.1,
    }
}

impl DaryHeap {
    /// Arities below 2 are raised to 2.
    pub fn new(arity: usize) -> Self {
        Self { arity: arity.max(2), heap: Vec::new(), pos: Vec::new(), keys: Vec::new() }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Empty the heap and size it for items `0..n`, all `Unseen`.
    pub fn reset(&mut self, n: usize) {
        self.heap.clear();
        self.pos.clear();
        self.pos.resize(n, UNSEEN);
        self.keys.clear();
        self.keys.resize(n, (f64::INFINITY, u64::MAX));
    }

    /// Change the branching factor.  Only valid while empty.
    pub fn set_arity(&mut self, arity: usize) {
        debug_assert!(self.heap.is_empty());
        self.arity = arity.max(2);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[inline]
    pub fn state(&self, item: usize) -> ItemState {
        match self.pos[item] {
            UNSEEN => ItemState::Unseen,
            POPPED => ItemState::Popped,
            _ => ItemState::InHeap,
        }
    }

    /// Current (or final) key of `item`.
    #[inline]
    pub fn key(&self, item: usize) -> HeapKey {
        self.keys[item]
    }

    /// Smallest key without removing it.
    pub fn peek(&self) -> Option<(usize, HeapKey)> {
        self.heap.first().map(|&i| (i as usize, self.keys[i as usize]))
    }

    /// Insert an unseen item, or lower the key of one in the heap.
    ///
    /// Returns `true` if the heap changed.  Popped items and keys that are
    /// not strictly smaller are ignored.
    pub fn push_or_decrease(&mut self, item: usize, key: HeapKey) -> bool {
        match self.pos[item] {
            POPPED => false,
            UNSEEN => {
                let at = self.heap.len();
                self.heap.push(item as u32);
                self.pos[item] = at as u32;
                self.keys[item] = key;
                self.sift_up(at);
                true
            }
            at => {
                if !less(key, self.keys[item]) {
                    return false;
                }
                self.keys[item] = key;
                self.sift_up(at as usize);
                true
            }
        }
    }

    /// Remove and return the item with the smallest key.
    pub fn pop(&mut self) -> Option<(usize, HeapKey)> {
        let top = *self.heap.first()? as usize;
        let last = self.heap.pop()?;
        if !self.heap.is_empty() {
            self.heap[0] = last;
            self.pos[last as usize] = 0;
            self.sift_down(0);
        }
        self.pos[top] = POPPED;
        Some((top, self.keys[top]))
    }

    fn sift_up(&mut self, mut at: usize) {
        let item = self.heap[at];
        let key = self.keys[item as usize];
        while at > 0 {
            let parent = (at - 1) / self.arity;
            let p_item = self.heap[parent];
            if !less(key, self.keys[p_item as usize]) {
                break;
            }
            self.heap[at] = p_item;
            self.pos[p_item as usize] = at as u32;
            at = parent;
        }
        self.heap[at] = item;
        self.pos[item as usize] = at as u32;
    }

    fn sift_down(&mut self, mut at: usize) {
        let len = self.heap.len();
        let item = self.heap[at];
        let key = self.keys[item as usize];
        loop {
            let first = at * self.arity + 1;
            if first >= len {
                break;
            }
            let end = (first + self.arity).min(len);
            let mut best = first;
            for c in first + 1..end {
                if less(self.keys[self.heap[c] as usize], self.keys[self.heap[best] as usize]) {
                    best = c;
                }
            }
            let b_item = self.heap[best];
            if !less(self.keys[b_item as usize], key) {
                break;
            }
            self.heap[at] = b_item;
            self.pos[b_item as usize] = at as u32;
            at = best;
        }
        self.heap[at] = item;
        self.pos[item as usize] = at as u32;
    }
}
