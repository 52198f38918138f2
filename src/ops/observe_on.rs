use std::sync::Arc;

use crate::error::RxError;
use crate::observable::Observable;
use crate::observer::{Observer, SharedObserver};
use crate::scheduler::Scheduler;
use crate::subscription::{
  CompositeSubscription, Subscription, SubscriptionLike,
};

impl<Item: Send + 'static> Observable<Item> {
  /// Redirects delivery of every downstream callback through `scheduler`,
  /// one scheduled task per event. Event order is preserved by schedulers
  /// that run tasks in submission order.
  pub fn observe_on<S>(self, scheduler: S) -> Observable<Item>
  where
    S: Scheduler + Send + Sync + 'static,
  {
    let scheduler = Arc::new(scheduler);
    Observable::create(move |observer| {
      let shared = SharedObserver::new(observer);
      let handle = CompositeSubscription::default();
      // Closing the latch first keeps tasks already queued on the
      // scheduler from delivering after an external release.
      let silenced = shared.clone();
      handle.insert(Subscription::new(move || silenced.close()));
      handle.insert(self.actual_subscribe(ObserveOnObserver {
        shared,
        scheduler: scheduler.clone(),
        handle: handle.clone(),
      }));
      handle.boxed()
    })
  }
}

struct ObserveOnObserver<Item, S> {
  shared: SharedObserver<Item>,
  scheduler: Arc<S>,
  handle: CompositeSubscription,
}

impl<Item, S> Observer<Item> for ObserveOnObserver<Item, S>
where
  Item: Send + 'static,
  S: Scheduler,
{
  fn next(&mut self, value: Item) {
    if self.shared.is_closed() {
      return;
    }
    let mut target = self.shared.clone();
    self
      .handle
      .insert(self.scheduler.schedule(Box::new(move || target.next(value))));
  }

  fn error(self, err: RxError) {
    let target = self.shared.clone();
    self
      .handle
      .insert(self.scheduler.schedule(Box::new(move || target.error(err))));
  }

  fn complete(self) {
    let target = self.shared.clone();
    self
      .handle
      .insert(self.scheduler.schedule(Box::new(move || target.complete())));
  }

  fn is_closed(&self) -> bool { self.shared.is_closed() }
}
