//! Job Scheduler
//!
//! A single time-ordered queue for every deferred and periodic piece of
//! work in the simulation. Jobs due at the same instant are ordered by
//! their rank, then by insertion order.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::clock::SimTime;

/// Ordering of jobs that fall due at the same instant.
///
/// Lower rank = processed first.
pub trait Rank {
    /// Rank of this job among jobs due at the same instant.
    fn rank(&self) -> u8;
}

struct Entry<J> {
    due: SimTime,
    rank: u8,
    seq: u64,
    job: J,
}

impl<J> Entry<J> {
    fn key(&self) -> (SimTime, u8, u64) {
        (self.due, self.rank, self.seq)
    }
}

impl<J> PartialEq for Entry<J> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<J> Eq for Entry<J> {}

impl<J> PartialOrd for Entry<J> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<J> Ord for Entry<J> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Min-queue of jobs keyed by `(due, rank, sequence)`.
pub struct Scheduler<J> {
    queue: BinaryHeap<Reverse<Entry<J>>>,
    next_seq: u64,
}

impl<J: Rank> Scheduler<J> {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Queue `job` to run at `due`.
    pub fn schedule(&mut self, due: SimTime, job: J) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry {
            due,
            rank: job.rank(),
            seq,
            job,
        }));
    }

    /// Remove and return the earliest job due at or before `now`.
    pub fn pop_due(&mut self, now: SimTime) -> Option<(SimTime, J)> {
        if self.next_due()? > now {
            return None;
        }
        self.queue.pop().map(|Reverse(entry)| (entry.due, entry.job))
    }

    /// When the earliest queued job is due.
    pub fn next_due(&self) -> Option<SimTime> {
        self.queue.peek().map(|Reverse(entry)| entry.due)
    }

    /// Number of queued jobs.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop every queued job.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<J: Rank> Default for Scheduler<J> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum TestJob {
        Urgent(u32),
        Lazy(u32),
    }

    impl Rank for TestJob {
        fn rank(&self) -> u8 {
            match self {
                TestJob::Urgent(_) => 0,
                TestJob::Lazy(_) => 1,
            }
        }
    }

    #[test]
    fn test_pops_in_time_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(SimTime::from_millis(30), TestJob::Lazy(3));
        scheduler.schedule(SimTime::from_millis(10), TestJob::Lazy(1));
        scheduler.schedule(SimTime::from_millis(20), TestJob::Lazy(2));

        let now = SimTime::from_millis(100);
        let order: Vec<_> = std::iter::from_fn(|| scheduler.pop_due(now))
            .map(|(due, _)| due.as_millis())
            .collect();
        assert_eq!(order, vec![10, 20, 30]);
    }

    #[test]
    fn test_rank_breaks_ties_then_fifo() {
        let mut scheduler = Scheduler::new();
        let t = SimTime::from_millis(5);
        scheduler.schedule(t, TestJob::Lazy(1));
        scheduler.schedule(t, TestJob::Urgent(2));
        scheduler.schedule(t, TestJob::Lazy(3));

        assert_eq!(scheduler.pop_due(t).map(|(_, j)| j), Some(TestJob::Urgent(2)));
        assert_eq!(scheduler.pop_due(t).map(|(_, j)| j), Some(TestJob::Lazy(1)));
        assert_eq!(scheduler.pop_due(t).map(|(_, j)| j), Some(TestJob::Lazy(3)));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_future_jobs_stay_queued() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(SimTime::from_millis(50), TestJob::Urgent(1));

        assert!(scheduler.pop_due(SimTime::from_millis(49)).is_none());
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.next_due(), Some(SimTime::from_millis(50)));
        assert!(scheduler.pop_due(SimTime::from_millis(50)).is_some());
    }
}
