use std::sync::Arc;

use crate::error::RxError;
use crate::observable::Observable;
use crate::observer::Observer;

impl<Item: Send + 'static> Observable<Item> {
  /// Runs a side effect for every value, passing the value through
  /// unchanged.
  pub fn tap<F>(self, on_next: F) -> Observable<Item>
  where
    F: Fn(&Item) + Send + Sync + 'static,
  {
    self.tap_all(on_next, |_| {}, || {})
  }

  /// Side-effect hooks for every channel; values, errors and completion
  /// all pass through to the downstream observer unchanged. For a hook on
  /// disposal itself, see [`finalize`](Self::finalize).
  pub fn tap_all<N, E, C>(
    self,
    on_next: N,
    on_error: E,
    on_complete: C,
  ) -> Observable<Item>
  where
    N: Fn(&Item) + Send + Sync + 'static,
    E: Fn(&RxError) + Send + Sync + 'static,
    C: Fn() + Send + Sync + 'static,
  {
    let hooks = Arc::new(TapHooks {
      on_next: Box::new(on_next),
      on_error: Box::new(on_error),
      on_complete: Box::new(on_complete),
    });
    Observable::create(move |observer| {
      self.actual_subscribe(TapObserver {
        observer,
        hooks: hooks.clone(),
      })
    })
  }
}

struct TapHooks<Item> {
  on_next: Box<dyn Fn(&Item) + Send + Sync>,
  on_error: Box<dyn Fn(&RxError) + Send + Sync>,
  on_complete: Box<dyn Fn() + Send + Sync>,
}

struct TapObserver<O, Item> {
  observer: O,
  hooks: Arc<TapHooks<Item>>,
}

impl<O, Item> Observer<Item> for TapObserver<O, Item>
where
  O: Observer<Item>,
{
  fn next(&mut self, value: Item) {
    (self.hooks.on_next)(&value);
    self.observer.next(value);
  }

  fn error(self, err: RxError) {
    (self.hooks.on_error)(&err);
    self.observer.error(err);
  }

  fn complete(self) {
    (self.hooks.on_complete)();
    self.observer.complete();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
