use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::RxError;
use crate::observable::Observable;
use crate::observer::{Observer, SharedObserver};
use crate::subscription::{
  CompositeSubscription, SerialSubscription, Subscription, SubscriptionLike,
};

impl<Item: Send + 'static> Observable<Item> {
  /// Resubscribes the source after an error, up to `max_attempts` total
  /// subscriptions (so `retry(1)` never retries and `retry(0)` is treated
  /// the same). Once attempts are exhausted the last error goes through
  /// unhandled. Values already delivered by failed attempts are not
  /// replayed.
  pub fn retry(self, max_attempts: usize) -> Observable<Item> {
    Observable::create(move |observer| {
      let core = Arc::new(RetryCore {
        source: self.clone(),
        shared: SharedObserver::new(observer),
        current: SerialSubscription::default(),
        remaining: AtomicUsize::new(max_attempts.saturating_sub(1)),
        driving: AtomicBool::new(false),
        pending: AtomicBool::new(false),
      });
      let handle = CompositeSubscription::default();
      let silenced = core.shared.clone();
      handle.insert(Subscription::new(move || silenced.close()));
      handle.insert(core.current.clone());
      RetryCore::drive(&core);
      handle.boxed()
    })
  }
}

struct RetryCore<Item> {
  source: Observable<Item>,
  shared: SharedObserver<Item>,
  current: SerialSubscription,
  remaining: AtomicUsize,
  driving: AtomicBool,
  pending: AtomicBool,
}

impl<Item: Send + 'static> RetryCore<Item> {
  /// Trampolined resubscription: a source failing synchronously inside
  /// its own subscribe call only flags `pending`, and the frame already
  /// driving loops back around, so an always-failing source with a large
  /// attempt budget cannot overflow the stack.
  fn drive(core: &Arc<Self>) {
    core.pending.store(true, Ordering::SeqCst);
    if core.driving.swap(true, Ordering::SeqCst) {
      return;
    }
    loop {
      while core.pending.swap(false, Ordering::SeqCst) {
        if core.shared.is_closed() {
          break;
        }
        let sub = core
          .source
          .actual_subscribe(RetryObserver { core: core.clone() });
        core.current.set(sub);
      }
      core.driving.store(false, Ordering::SeqCst);
      if !core.pending.load(Ordering::SeqCst)
        || core.driving.swap(true, Ordering::SeqCst)
      {
        break;
      }
    }
  }
}

struct RetryObserver<Item> {
  core: Arc<RetryCore<Item>>,
}

impl<Item: Send + 'static> Observer<Item> for RetryObserver<Item> {
  fn next(&mut self, value: Item) { self.core.shared.clone().next(value) }

  fn error(self, err: RxError) {
    let spent = self
      .core
      .remaining
      .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
      .is_err();
    if spent {
      self.core.shared.clone().error(err);
    } else {
      RetryCore::drive(&self.core);
    }
  }

  fn complete(self) { self.core.shared.clone().complete() }

  fn is_closed(&self) -> bool { self.core.shared.is_closed() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::{Arc, Mutex};

  fn flaky(failures: usize) -> (Arc<AtomicUsize>, Observable<i32>) {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let source = Observable::create(move |mut observer: BoxedObserver<i32>| {
      let attempt = counter.fetch_add(1, Ordering::SeqCst);
      observer.next(attempt as i32);
      if attempt < failures {
        observer.error(RxError::message("flaky"));
      } else {
        observer.complete();
      }
      Subscription::closed().boxed()
    });
    (attempts, source)
  }

  #[test]
  fn resubscribes_until_success() {
    let (attempts, source) = flaky(2);
    let log = Arc::new(Mutex::new(Vec::new()));
    let values = log.clone();
    let completion = log.clone();
    source.retry(5).subscribe_complete(
      move |v| values.lock().unwrap().push(format!("next({v})")),
      move || completion.lock().unwrap().push("complete".into()),
    );
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(
      *log.lock().unwrap(),
      vec!["next(0)", "next(1)", "next(2)", "complete"]
    );
  }

  #[test]
  fn exhausted_attempts_surface_the_error() {
    let (attempts, source) = flaky(usize::MAX);
    let log = Arc::new(Mutex::new(Vec::new()));
    let errors = log.clone();
    source.retry(3).subscribe_err(
      |_| {},
      move |e| errors.lock().unwrap().push(format!("error({e})")),
    );
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(*log.lock().unwrap(), vec!["error(flaky)"]);
  }

  #[test]
  fn single_attempt_means_no_retry() {
    let (attempts, source) = flaky(usize::MAX);
    source.retry(1).subscribe_err(|_| {}, |_| {});
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn deep_synchronous_retry_chain_stays_flat() {
    let source = observable::throw_err::<i32>(RxError::message("always"));
    let errored = Arc::new(AtomicUsize::new(0));
    let probe = errored.clone();
    source.retry(10_000).subscribe_err(
      |_| {},
      move |_| {
        probe.fetch_add(1, Ordering::SeqCst);
      },
    );
    assert_eq!(errored.load(Ordering::SeqCst), 1);
  }
}
