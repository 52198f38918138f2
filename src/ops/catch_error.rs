use std::sync::Arc;

use crate::error::RxError;
use crate::observable::Observable;
use crate::observer::{Observer, SharedObserver};
use crate::subscription::{
  CompositeSubscription, SerialSubscription, Subscription, SubscriptionLike,
};

impl<Item: Send + 'static> Observable<Item> {
  /// On upstream error, asks `handler` for a fallback observable and
  /// switches the downstream observer over to it; values and terminal
  /// events from the fallback flow through untouched. A source that
  /// completes normally never invokes the handler. A handler that cannot
  /// recover expresses that by returning `throw_err`.
  pub fn catch_error<F>(self, handler: F) -> Observable<Item>
  where
    F: Fn(RxError) -> Observable<Item> + Send + Sync + 'static,
  {
    let handler: Arc<dyn Fn(RxError) -> Observable<Item> + Send + Sync> =
      Arc::new(handler);
    Observable::create(move |observer| {
      let shared = SharedObserver::new(observer);
      // The fallback gets its own serial slot; if the source errors while
      // we are still inside its subscribe call, setting the (already dead)
      // source handle afterwards must not tear the fallback down.
      let fallback = SerialSubscription::default();
      let handle = CompositeSubscription::default();
      let silenced = shared.clone();
      handle.insert(Subscription::new(move || silenced.close()));
      handle.insert(fallback.clone());
      handle.insert(self.actual_subscribe(CatchObserver {
        shared,
        fallback,
        handler: handler.clone(),
      }));
      handle.boxed()
    })
  }
}

struct CatchObserver<Item> {
  shared: SharedObserver<Item>,
  fallback: SerialSubscription,
  handler: Arc<dyn Fn(RxError) -> Observable<Item> + Send + Sync>,
}

impl<Item: Send + 'static> Observer<Item> for CatchObserver<Item> {
  fn next(&mut self, value: Item) { self.shared.next(value) }

  fn error(self, err: RxError) {
    let source = (self.handler)(err);
    let sub = source.actual_subscribe(self.shared);
    self.fallback.set(sub);
  }

  fn complete(self) { self.shared.complete() }

  fn is_closed(&self) -> bool { self.shared.is_closed() }
}
