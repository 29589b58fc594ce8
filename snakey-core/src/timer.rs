//! One-shot timer queue driven by an external clock.
//!
//! Deadlines are measured as a [`Duration`] since the pet started. The
//! queue never sleeps; the event loop asks for [`TimerQueue::next_deadline`],
//! waits until then, and pops everything that is due.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

/// Identifier of an armed timer, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A priority queue of one-shot timers carrying a payload of type `T`.
///
/// Timers with equal deadlines fire in the order they were armed.
#[derive(Debug)]
pub struct TimerQueue<T> {
    heap: BinaryHeap<Reverse<(Duration, TimerId)>>,
    pending: HashMap<TimerId, T>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            pending: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer that fires at `deadline`.
    pub fn schedule_at(&mut self, deadline: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.heap.push(Reverse((deadline, id)));
        self.pending.insert(id, payload);
        id
    }

    /// Cancel a pending timer. Returns its payload if it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        // The heap entry stays behind and is skipped when it surfaces.
        self.pending.remove(&id)
    }

    /// Whether the timer is still waiting to fire.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Number of timers waiting to fire.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timers are waiting.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest deadline among pending timers.
    pub fn next_deadline(&mut self) -> Option<Duration> {
        self.discard_cancelled();
        self.heap.peek().map(|Reverse((deadline, _))| *deadline)
    }

    /// Pop the earliest timer whose deadline is at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, TimerId, T)> {
        self.discard_cancelled();
        let Reverse((deadline, id)) = *self.heap.peek()?;
        if deadline > now {
            return None;
        }
        self.heap.pop();
        let payload = self.pending.remove(&id)?;
        Some((deadline, id, payload))
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.pending.clear();
    }

    fn discard_cancelled(&mut self) {
        while let Some(Reverse((_, id))) = self.heap.peek() {
            if self.pending.contains_key(id) {
                break;
            }
            self.heap.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_pops_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule_at(ms(300), "c");
        q.schedule_at(ms(100), "a");
        q.schedule_at(ms(200), "b");

        let fired: Vec<_> = std::iter::from_fn(|| q.pop_due(ms(1000)))
            .map(|(_, _, p)| p)
            .collect();
        assert_eq!(fired, vec!["a", "b", "c"]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_equal_deadlines_fire_in_arming_order() {
        let mut q = TimerQueue::new();
        q.schedule_at(ms(50), 1);
        q.schedule_at(ms(50), 2);
        q.schedule_at(ms(50), 3);

        let fired: Vec<_> = std::iter::from_fn(|| q.pop_due(ms(50)))
            .map(|(_, _, p)| p)
            .collect();
        assert_eq!(fired, vec![1, 2, 3]);
    }

    #[test]
    fn test_not_due_yet() {
        let mut q = TimerQueue::new();
        q.schedule_at(ms(100), ());
        assert!(q.pop_due(ms(99)).is_none());
        assert_eq!(q.next_deadline(), Some(ms(100)));
        assert!(q.pop_due(ms(100)).is_some());
        assert_eq!(q.next_deadline(), None);
    }

    #[test]
    fn test_cancel_skips_timer() {
        let mut q = TimerQueue::new();
        let early = q.schedule_at(ms(10), "early");
        q.schedule_at(ms(20), "late");

        assert_eq!(q.cancel(early), Some("early"));
        assert!(!q.is_pending(early));
        assert_eq!(q.cancel(early), None);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_deadline(), Some(ms(20)));

        let (deadline, _, payload) = q.pop_due(ms(100)).unwrap();
        assert_eq!(deadline, ms(20));
        assert_eq!(payload, "late");
    }

    #[test]
    fn test_clear() {
        let mut q = TimerQueue::new();
        q.schedule_at(ms(1), 'x');
        q.schedule_at(ms(2), 'y');
        q.clear();
        assert!(q.is_empty());
        assert!(q.pop_due(ms(10)).is_none());
    }
}
