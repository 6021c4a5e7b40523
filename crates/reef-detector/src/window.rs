//! Fixed-capacity rolling window.

use std::collections::VecDeque;

/// Bounded FIFO sequence: newest at the back, oldest evicted once full.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    values: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// Create an empty window holding at most `capacity` values.
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a value, returning the evicted oldest value if the window was full.
    pub fn push(&mut self, value: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(value);
        }
        let evicted = if self.values.len() == self.capacity {
            self.values.pop_front()
        } else {
            None
        };
        self.values.push_back(value);
        evicted
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    /// Most recent value.
    pub fn latest(&self) -> Option<&T> {
        self.values.back()
    }

    /// Value immediately before the most recent one.
    pub fn previous(&self) -> Option<&T> {
        let len = self.values.len();
        if len < 2 {
            return None;
        }
        self.values.get(len - 2)
    }

    /// The last `n` values, oldest first. Fewer if the window holds less.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &T> {
        let skip = self.values.len().saturating_sub(n);
        self.values.iter().skip(skip)
    }

    /// All values, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eviction_when_full() {
        let mut window = RollingWindow::new(3);
        assert_eq!(window.push(1), None);
        assert_eq!(window.push(2), None);
        assert_eq!(window.push(3), None);
        assert!(window.is_full());

        assert_eq!(window.push(4), Some(1));
        assert_eq!(window.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn test_latest_and_previous() {
        let mut window = RollingWindow::new(4);
        assert!(window.latest().is_none());

        window.push(10);
        assert_eq!(window.latest(), Some(&10));
        assert!(window.previous().is_none());

        window.push(11);
        assert_eq!(window.latest(), Some(&11));
        assert_eq!(window.previous(), Some(&10));
    }

    #[test]
    fn test_tail() {
        let mut window = RollingWindow::new(5);
        for v in 1..=5 {
            window.push(v);
        }
        assert_eq!(window.tail(2).copied().collect::<Vec<_>>(), vec![4, 5]);
        assert_eq!(window.tail(10).count(), 5);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut window = RollingWindow::new(0);
        assert_eq!(window.push(7), Some(7));
        assert!(window.is_empty());
    }
}
