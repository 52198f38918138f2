use std::sync::Arc;

use crate::observable::Observable;
use crate::subscription::{
  CompositeSubscription, Subscription, SubscriptionLike,
};

impl<Item: Send + 'static> Observable<Item> {
  /// Runs `f` exactly once when the subscription is released, regardless of
  /// which channel terminated it — error, completion or an external
  /// `unsubscribe`.
  pub fn finalize<F>(self, f: F) -> Observable<Item>
  where
    F: Fn() + Send + Sync + 'static,
  {
    let hook = Arc::new(f);
    Observable::create(move |observer| {
      let hook = hook.clone();
      let handle = CompositeSubscription::default();
      handle.insert(self.actual_subscribe(observer));
      handle.insert(Subscription::new(move || hook()));
      handle.boxed()
    })
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  #[test]
  fn fires_on_completion() {
    let count = Arc::new(AtomicUsize::new(0));
    let probe = count.clone();
    observable::of(1)
      .finalize(move || {
        probe.fetch_add(1, Ordering::SeqCst);
      })
      .subscribe(|_| {});
    assert_eq!(count.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn fires_on_error() {
    let count = Arc::new(AtomicUsize::new(0));
    let probe = count.clone();
    observable::throw_err::<i32>(RxError::message("boom"))
      .finalize(move || {
        probe.fetch_add(1, Ordering::SeqCst);
      })
      .subscribe_err(|_| {}, |_| {});
    assert_eq!(count.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn fires_once_on_external_release() {
    let count = Arc::new(AtomicUsize::new(0));
    let probe = count.clone();
    let mut sub = observable::never::<i32>()
      .finalize(move || {
        probe.fetch_add(1, Ordering::SeqCst);
      })
      .subscribe(|_| {});
    assert_eq!(count.load(Ordering::SeqCst), 0);
    sub.unsubscribe();
    sub.unsubscribe();
    assert_eq!(count.load(Ordering::SeqCst), 1);
  }
}
