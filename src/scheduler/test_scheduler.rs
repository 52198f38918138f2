//! Virtual scheduler for deterministic testing of time-based operators.
//!
//! Pending tasks sit in an ordered queue keyed by virtual due time;
//! [`TestScheduler::advance_by`] fires every task whose due time falls
//! inside the advanced window in ascending due-time order (FIFO within the
//! same due time), then moves the clock to the target. Nothing runs until
//! time is advanced, so tests over `timeout`/`timer` never touch the wall
//! clock.

use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;
use std::sync::{Arc, Mutex};

use super::{Duration, Scheduler, Task};
use crate::subscription::{Subscription, SubscriptionLike};

#[derive(Clone, Default)]
pub struct TestScheduler {
  inner: Arc<Mutex<TestSchedulerCore>>,
}

#[derive(Default)]
struct TestSchedulerCore {
  now: Duration,
  queue: BinaryHeap<ScheduledTask>,
  next_seq: usize,
}

struct ScheduledTask {
  due: Duration,
  seq: usize,
  task: Option<Task>,
  handle: Subscription,
}

impl PartialEq for ScheduledTask {
  fn eq(&self, other: &Self) -> bool {
    self.due == other.due && self.seq == other.seq
  }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
  fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
    Some(self.cmp(other))
  }
}

impl Ord for ScheduledTask {
  fn cmp(&self, other: &Self) -> CmpOrdering {
    // Min-heap: earlier due times first, then FIFO by sequence number.
    other
      .due
      .cmp(&self.due)
      .then_with(|| other.seq.cmp(&self.seq))
  }
}

impl TestScheduler {
  pub fn new() -> Self { Self::default() }

  /// The current virtual time.
  pub fn now(&self) -> Duration { self.inner.lock().unwrap().now }

  /// Number of tasks still waiting for their due time.
  pub fn pending_tasks(&self) -> usize {
    self.inner.lock().unwrap().queue.len()
  }

  /// Advances virtual time by `duration`, firing every due task in order.
  ///
  /// The clock is set to each task's due time while it runs, so a task
  /// scheduling follow-up work (e.g. `interval` re-arming itself) lands at
  /// the right virtual instant and still fires within the same advance if
  /// it falls inside the window. Tasks run outside the scheduler lock.
  pub fn advance_by(&self, duration: Duration) {
    let target = self.inner.lock().unwrap().now + duration;
    loop {
      let next = {
        let mut core = self.inner.lock().unwrap();
        match core.queue.peek() {
          Some(head) if head.due <= target => {
            let mut head = core.queue.pop().unwrap();
            core.now = head.due;
            head.task.take().map(|task| (task, head.handle))
          }
          _ => break,
        }
      };
      if let Some((task, mut handle)) = next {
        if !handle.is_closed() {
          task();
        }
        // The handle closes once the entry has been dealt with, so
        // long-lived composites holding it can shed it.
        handle.unsubscribe();
      }
    }
    self.inner.lock().unwrap().now = target;
  }
}

impl Scheduler for TestScheduler {
  fn schedule(&self, task: Task) -> Subscription {
    self.schedule_after(Duration::ZERO, task)
  }

  fn schedule_after(&self, delay: Duration, task: Task) -> Subscription {
    let handle = Subscription::empty();
    let mut core = self.inner.lock().unwrap();
    let seq = core.next_seq;
    core.next_seq += 1;
    let due = core.now + delay;
    core.queue.push(ScheduledTask {
      due,
      seq,
      task: Some(task),
      handle: handle.clone(),
    });
    handle
  }
}
