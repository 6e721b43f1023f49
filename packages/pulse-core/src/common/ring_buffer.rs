//! Fixed-capacity ring buffer with FIFO eviction.
//!
//! - O(1) push / peek / pushback
//! - `push` hands back the evicted element as an `Option`, so `0.0` and
//!   `NaN` are ordinary evicted values rather than "nothing evicted"

use core::fmt;
use std::iter;

#[derive(Clone)]
pub struct RingBuffer<T: Copy + Default> {
    data: Vec<T>,
    capacity: usize,
    head: usize, // next write index
    len: usize,
    filled: bool, // capacity reached at least once
}

impl<T: Copy + Default> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity)
            .field("len", &self.len)
            .field("head", &self.head)
            .field("filled", &self.filled)
            .finish_non_exhaustive()
    }
}

impl<T: Copy + Default> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        Self {
            data: vec![T::default(); capacity],
            capacity,
            head: 0,
            len: 0,
            filled: false,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether capacity has ever been reached. Never reverts.
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// Index (in `data`) of the oldest element.
    #[inline]
    fn start(&self) -> usize {
        (self.head + self.capacity - self.len) % self.capacity
    }

    /// Appends `value`. When the buffer was already full the oldest element
    /// is overwritten and returned.
    #[inline]
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = if self.len == self.capacity {
            Some(self.data[self.head])
        } else {
            self.len += 1;
            None
        };

        self.data[self.head] = value;
        self.head = (self.head + 1) % self.capacity;
        if self.len == self.capacity {
            self.filled = true;
        }
        evicted
    }

    /// Oldest element, without touching the buffer.
    #[inline]
    pub fn peek(&self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        Some(self.data[self.start()])
    }

    /// Re-inserts `value` as the new oldest element.
    ///
    /// On a full buffer this drops the newest element, which undoes a
    /// preceding `push` when handed the element that push evicted.
    #[inline]
    pub fn pushback(&mut self, value: T) {
        if self.len == self.capacity {
            self.head = (self.head + self.capacity - 1) % self.capacity;
            self.data[self.head] = value;
        } else {
            let start = (self.start() + self.capacity - 1) % self.capacity;
            self.data[start] = value;
            self.len += 1;
            if self.len == self.capacity {
                self.filled = true;
            }
        }
    }

    /// Gets element by index from oldest (0 = oldest).
    #[inline]
    pub fn get(&self, i: usize) -> Option<T> {
        if i >= self.len {
            return None;
        }
        Some(self.data[(self.start() + i) % self.capacity])
    }

    /// Most recently pushed element.
    #[inline]
    pub fn last(&self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.get(self.len - 1)
    }

    /// Iterator from oldest to newest.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { buffer: self, i: 0 }
    }

    /// Contents as they would read after `push(value)`, oldest first,
    /// without mutating the buffer.
    pub fn iter_pushed(&self, value: T) -> impl Iterator<Item = T> + '_ {
        let skip = usize::from(self.len == self.capacity);
        self.iter().skip(skip).chain(iter::once(value))
    }

    /// Current contents, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

pub struct Iter<'a, T: Copy + Default> {
    buffer: &'a RingBuffer<T>,
    i: usize,
}

impl<'a, T: Copy + Default> Iterator for Iter<'a, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let v = self.buffer.get(self.i)?;
        self.i += 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len - self.i;
        (remaining, Some(remaining))
    }
}

impl<'a, T: Copy + Default> ExactSizeIterator for Iter<'a, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_reports_evictions() {
        let mut rb = RingBuffer::<f64>::new(3);
        let evicted: Vec<_> = [1.0, 2.0, 3.0, 4.0].iter().map(|&v| rb.push(v)).collect();

        assert_eq!(evicted, vec![None, None, None, Some(1.0)]);
        assert_eq!(rb.to_vec(), vec![2.0, 3.0, 4.0]);
        assert_eq!(rb.peek(), Some(2.0));
        assert_eq!(rb.last(), Some(4.0));
    }

    #[test]
    fn pushback_restores_evicted_oldest() {
        let mut rb = RingBuffer::<f64>::new(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            rb.push(v);
        }

        rb.pushback(1.0);
        assert_eq!(rb.to_vec(), vec![1.0, 2.0, 3.0]);
        assert_eq!(rb.len(), 3);

        // Behaves as if 4.0 was never pushed.
        assert_eq!(rb.push(5.0), Some(1.0));
        assert_eq!(rb.to_vec(), vec![2.0, 3.0, 5.0]);
    }

    #[test]
    fn pushback_on_partial_buffer_prepends() {
        let mut rb = RingBuffer::<i32>::new(3);
        rb.push(2);
        rb.pushback(1);
        assert_eq!(rb.to_vec(), vec![1, 2]);
        assert!(!rb.is_filled());

        rb.pushback(0);
        assert_eq!(rb.to_vec(), vec![0, 1, 2]);
        assert!(rb.is_filled());
    }

    #[test]
    fn zero_and_nan_are_real_evictions() {
        let mut rb = RingBuffer::<f64>::new(1);
        assert_eq!(rb.push(0.0), None);
        assert_eq!(rb.push(f64::NAN), Some(0.0));
        assert!(rb.push(1.0).is_some_and(f64::is_nan));
    }

    #[test]
    fn filled_flag_never_reverts() {
        let mut rb = RingBuffer::<i32>::new(2);
        assert!(!rb.is_filled());
        rb.push(1);
        assert!(!rb.is_filled());
        rb.push(2);
        assert!(rb.is_filled());
        rb.push(3);
        rb.pushback(1);
        assert!(rb.is_filled());
    }

    #[test]
    fn iter_pushed_previews_without_mutation() {
        let mut rb = RingBuffer::<i32>::new(3);
        rb.push(1);
        rb.push(2);
        assert_eq!(rb.iter_pushed(3).collect::<Vec<_>>(), vec![1, 2, 3]);
        rb.push(3);
        assert_eq!(rb.iter_pushed(4).collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(rb.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn peek_on_empty() {
        let rb = RingBuffer::<f64>::new(4);
        assert_eq!(rb.peek(), None);
        assert!(rb.is_empty());
        assert_eq!(rb.iter().len(), 0);
    }

    #[test]
    fn wraps_many_times() {
        let mut rb = RingBuffer::<i32>::new(3);
        for i in 0..10 {
            rb.push(i);
        }
        assert_eq!(rb.to_vec(), vec![7, 8, 9]);
        assert_eq!(rb.capacity(), 3);
    }
}
