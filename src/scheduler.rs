//! Scheduler capability: run an action now or after a relative delay, and
//! hand back a subscription that cancels the action if released before it
//! runs.
//!
//! The core never blocks or yields by itself; "waiting" is always
//! represented by returning a cancellation handle immediately and having
//! the scheduler invoke the action later. Time-based operators are tested
//! against [`TestScheduler`], which advances a virtual clock only on
//! demand.

use std::sync::Arc;

pub use std::time::{Duration, Instant};

use crate::subscription::Subscription;

mod test_scheduler;
mod thread_scheduler;
pub use test_scheduler::TestScheduler;
pub use thread_scheduler::NewThreadScheduler;

#[cfg(all(feature = "futures-scheduler", feature = "timer"))]
mod thread_pool_scheduler;
#[cfg(all(feature = "futures-scheduler", feature = "timer"))]
pub use thread_pool_scheduler::ThreadPoolScheduler;

/// A unit of work handed to a scheduler.
pub type Task = Box<dyn FnOnce() + Send>;

/// An object able to order tasks and schedule their execution.
///
/// Real schedulers measure `schedule_after` against the wall clock
/// (`Instant::now`); the virtual [`TestScheduler`] measures it against its
/// own manually advanced clock.
pub trait Scheduler {
  /// Runs `task` as soon as the scheduler can.
  fn schedule(&self, task: Task) -> Subscription;

  /// Runs `task` once `delay` has elapsed.
  fn schedule_after(&self, delay: Duration, task: Task) -> Subscription;
}

impl<S: Scheduler + ?Sized> Scheduler for Arc<S> {
  #[inline]
  fn schedule(&self, task: Task) -> Subscription { (**self).schedule(task) }

  #[inline]
  fn schedule_after(&self, delay: Duration, task: Task) -> Subscription {
    (**self).schedule_after(delay, task)
  }
}
