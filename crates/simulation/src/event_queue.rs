//! Pending-task queue for the discrete-event loop.

use crate::task::Task;
use std::collections::BTreeMap;
use std::time::Duration;

/// Key ordering scheduled tasks.
///
/// Tasks run in wake-up time order. Tasks sharing a wake-up time run in the
/// order they were scheduled, which the monotonically increasing `seq`
/// guarantees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventKey {
    /// Simulated time at which the task resumes.
    pub time: Duration,
    /// Scheduling order; unique for the lifetime of a queue.
    pub seq: u64,
}

/// Arena of live tasks indexed by their [`EventKey`].
///
/// Each pending task is individually addressable, so it can be inspected or
/// cancelled before it runs.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: BTreeMap<EventKey, Task>,
    next_seq: u64,
}

impl EventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task to resume at `time`.
    pub fn schedule(&mut self, time: Duration, task: Task) -> EventKey {
        let key = EventKey {
            time,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.pending.insert(key, task);
        key
    }

    /// Remove and return the earliest task whose wake-up is strictly before `horizon`.
    pub fn pop_before(&mut self, horizon: Duration) -> Option<(EventKey, Task)> {
        let entry = self.pending.first_entry()?;
        if entry.key().time >= horizon {
            return None;
        }
        Some(entry.remove_entry())
    }

    /// Look at a pending task.
    pub fn get(&self, key: &EventKey) -> Option<&Task> {
        self.pending.get(key)
    }

    /// Cancel a pending task.
    pub fn cancel(&mut self, key: &EventKey) -> Option<Task> {
        self.pending.remove(key)
    }

    /// Wake-up time of the next task, if any.
    pub fn next_time(&self) -> Option<Duration> {
        self.pending.keys().next().map(|key| key.time)
    }

    /// Number of tasks ever scheduled on this queue.
    pub fn scheduled_total(&self) -> u64 {
        self.next_seq
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if no task is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floodsim_types::NodeId;

    fn generate(node: u32) -> Task {
        Task::Generate { node: NodeId(node) }
    }

    #[test]
    fn test_pops_in_time_order() {
        let mut queue = EventQueue::new();
        queue.schedule(Duration::from_secs(10), generate(1));
        queue.schedule(Duration::from_secs(5), generate(2));

        let (key, task) = queue.pop_before(Duration::MAX).unwrap();
        assert_eq!(key.time, Duration::from_secs(5));
        assert_eq!(task, generate(2));
    }

    #[test]
    fn test_same_time_is_fifo() {
        let mut queue = EventQueue::new();
        for node in 0..4 {
            queue.schedule(Duration::from_secs(3), generate(node));
        }

        for node in 0..4 {
            let (_, task) = queue.pop_before(Duration::MAX).unwrap();
            assert_eq!(task, generate(node));
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_horizon_is_exclusive() {
        let mut queue = EventQueue::new();
        queue.schedule(Duration::from_secs(4), generate(0));

        assert!(queue.pop_before(Duration::from_secs(4)).is_none());
        assert_eq!(queue.len(), 1);
        assert!(queue.pop_before(Duration::from_secs(5)).is_some());
    }

    #[test]
    fn test_cancel() {
        let mut queue = EventQueue::new();
        let key = queue.schedule(Duration::from_secs(1), generate(7));
        queue.schedule(Duration::from_secs(2), generate(8));

        assert_eq!(queue.get(&key), Some(&generate(7)));
        assert_eq!(queue.cancel(&key), Some(generate(7)));
        assert_eq!(queue.next_time(), Some(Duration::from_secs(2)));
        assert_eq!(queue.scheduled_total(), 2);
    }
}
