use std::sync::Arc;

use crate::observable::Observable;
use crate::scheduler::Scheduler;
use crate::subscription::{
  CompositeSubscription, SerialSubscription, SubscriptionLike,
};

impl<Item: Send + 'static> Observable<Item> {
  /// Redirects the act of subscribing itself through `scheduler`; the
  /// source's subscribe function runs as a scheduled task instead of on
  /// the caller's stack. The returned handle works even before that task
  /// has run: releasing it cancels the pending task, and once the task
  /// does run the inner handle lands in an already-closed slot and is
  /// released on arrival.
  pub fn subscribe_on<S>(self, scheduler: S) -> Observable<Item>
  where
    S: Scheduler + Send + Sync + 'static,
  {
    let scheduler = Arc::new(scheduler);
    Observable::create(move |observer| {
      let handle = CompositeSubscription::default();
      let inner = SerialSubscription::default();
      handle.insert(inner.clone());
      let source = self.clone();
      let task = Box::new(move || {
        inner.set(source.actual_subscribe(observer));
      });
      handle.insert(scheduler.schedule(task));
      handle.boxed()
    })
  }
}
