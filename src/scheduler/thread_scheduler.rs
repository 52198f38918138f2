use std::thread;

use super::{Duration, Scheduler, Task};
use crate::subscription::{Subscription, SubscriptionLike};

/// A scheduler that creates a new thread for each unit of work. Delays are
/// slept on the worker thread; the worker checks the handle right before
/// running the task and closes it afterwards, so holders of the handle can
/// tell a finished task from a pending one.
#[derive(Clone, Copy, Default)]
pub struct NewThreadScheduler;

impl NewThreadScheduler {
  pub fn new() -> Self { NewThreadScheduler }
}

impl Scheduler for NewThreadScheduler {
  fn schedule(&self, task: Task) -> Subscription {
    self.schedule_after(Duration::ZERO, task)
  }

  fn schedule_after(&self, delay: Duration, task: Task) -> Subscription {
    let handle = Subscription::empty();
    let mut done = handle.clone();
    thread::Builder::new()
      .name("rxlite-worker".into())
      .spawn(move || {
        if !delay.is_zero() {
          thread::sleep(delay);
        }
        if !done.is_closed() {
          task();
        }
        done.unsubscribe();
      })
      .expect("failed to spawn scheduler thread");
    handle
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::subscription::SubscriptionLike;
  use std::sync::mpsc::channel;

  #[test]
  fn runs_scheduled_task() {
    let (tx, rx) = channel();
    NewThreadScheduler::new().schedule(Box::new(move || {
      tx.send(7).unwrap();
    }));
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 7);
  }

  #[test]
  fn handle_closes_once_the_task_has_run() {
    let (tx, rx) = channel();
    let sub = NewThreadScheduler::new().schedule(Box::new(move || {
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
  fn cancelled_task_never_runs() {
    let (tx, rx) = channel();
    let mut sub = NewThreadScheduler::new().schedule_after(
      Duration::from_millis(50),
      Box::new(move || {
        tx.send(()).unwrap();
      }),
    );
    sub.unsubscribe();
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
  }
}
