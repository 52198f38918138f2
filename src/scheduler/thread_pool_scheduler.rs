use futures::executor::ThreadPool;
use once_cell::sync::Lazy;

use super::{Duration, Scheduler, Task};
use crate::subscription::{Subscription, SubscriptionLike};

static DEFAULT_POOL: Lazy<ThreadPool> =
  Lazy::new(|| ThreadPool::new().expect("failed to build scheduler pool"));

/// A scheduler backed by a shared `futures` thread pool. Delayed tasks are
/// spawned as futures sleeping on a timer, so thousands of pending delays
/// do not pin thousands of threads.
#[derive(Clone)]
pub struct ThreadPoolScheduler {
  pool: ThreadPool,
}

impl Default for ThreadPoolScheduler {
  fn default() -> Self {
    ThreadPoolScheduler {
      pool: DEFAULT_POOL.clone(),
    }
  }
}

impl ThreadPoolScheduler {
  /// A scheduler on the process-wide default pool.
  pub fn new() -> Self { Self::default() }

  /// A scheduler on a dedicated pool.
  pub fn with_pool(pool: ThreadPool) -> Self { ThreadPoolScheduler { pool } }
}

impl Scheduler for ThreadPoolScheduler {
  fn schedule(&self, task: Task) -> Subscription {
    let handle = Subscription::empty();
    let mut done = handle.clone();
    self.pool.spawn_ok(async move {
      if !done.is_closed() {
        task();
      }
      done.unsubscribe();
    });
    handle
  }

  fn schedule_after(&self, delay: Duration, task: Task) -> Subscription {
    let handle = Subscription::empty();
    let mut done = handle.clone();
    self.pool.spawn_ok(async move {
      futures_time::task::sleep(futures_time::time::Duration::from(delay))
        .await;
      if !done.is_closed() {
        task();
      }
      done.unsubscribe();
    });
    handle
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::subscription::SubscriptionLike;
  use std::sync::mpsc::channel;

  #[test]
  fn runs_immediate_and_delayed_tasks() {
    let scheduler = ThreadPoolScheduler::new();
    let (tx, rx) = channel();
    let tx2 = tx.clone();
    scheduler.schedule(Box::new(move || {
      tx.send("now").unwrap();
    }));
    scheduler.schedule_after(
      Duration::from_millis(10),
      Box::new(move || {
        tx2.send("later").unwrap();
      }),
    );
    let mut got = vec![
      rx.recv_timeout(Duration::from_secs(5)).unwrap(),
      rx.recv_timeout(Duration::from_secs(5)).unwrap(),
    ];
    got.sort();
    assert_eq!(got, vec!["later", "now"]);
  }

  #[test]
  fn handle_closes_once_the_task_has_run() {
    let scheduler = ThreadPoolScheduler::new();
    let (tx, rx) = channel();
    let sub = scheduler.schedule(Box::new(move || {
      tx.send(()).unwrap();
    }));
    rx.recv_timeout(Duration::from_secs(5)).unwrap();
    for _ in 0..1000 {
      if sub.is_closed() {
        break;
      }
      std::thread::sleep(Duration::from_millis(1));
    }
    assert!(sub.is_closed());
  }

  #[test]
  fn cancelled_delayed_task_never_runs() {
    let scheduler = ThreadPoolScheduler::new();
    let (tx, rx) = channel();
    let mut sub = scheduler.schedule_after(
      Duration::from_millis(50),
      Box::new(move || {
        tx.send(()).unwrap();
      }),
    );
    sub.unsubscribe();
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
  }
}
