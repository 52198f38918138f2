use std::sync::Arc;

use crate::error::RxError;
use crate::observable::Observable;
use crate::observer::Observer;

impl<Item: Send + 'static> Observable<Item> {
  /// Emits only the values for which `predicate` returns `true`.
  pub fn filter<F>(self, predicate: F) -> Observable<Item>
  where
    F: Fn(&Item) -> bool + Send + Sync + 'static,
  {
    let predicate: Arc<dyn Fn(&Item) -> bool + Send + Sync> =
      Arc::new(predicate);
    Observable::create(move |observer| {
      self.actual_subscribe(FilterObserver {
        observer,
        predicate: predicate.clone(),
      })
    })
  }

  /// Like [`filter`](Self::filter) for fallible predicates: an `Err` from
  /// the predicate terminates the subscription with that error.
  pub fn try_filter<F>(self, predicate: F) -> Observable<Item>
  where
    F: Fn(&Item) -> Result<bool, RxError> + Send + Sync + 'static,
  {
    let predicate: Arc<
      dyn Fn(&Item) -> Result<bool, RxError> + Send + Sync,
    > = Arc::new(predicate);
    Observable::create(move |observer| {
      self.actual_subscribe(TryFilterObserver {
        observer: Some(observer),
        predicate: predicate.clone(),
      })
    })
  }
}

struct FilterObserver<O, Item> {
  observer: O,
  predicate: Arc<dyn Fn(&Item) -> bool + Send + Sync>,
}

impl<O, Item> Observer<Item> for FilterObserver<O, Item>
where
  O: Observer<Item>,
{
  fn next(&mut self, value: Item) {
    if (self.predicate)(&value) {
      self.observer.next(value);
    }
  }

  fn error(self, err: RxError) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

struct TryFilterObserver<O, Item> {
  observer: Option<O>,
  predicate: Arc<dyn Fn(&Item) -> Result<bool, RxError> + Send + Sync>,
}

impl<O, Item> Observer<Item> for TryFilterObserver<O, Item>
where
  O: Observer<Item>,
{
  fn next(&mut self, value: Item) {
    if self.observer.is_none() {
      return;
    }
    match (self.predicate)(&value) {
      Ok(true) => {
        if let Some(observer) = self.observer.as_mut() {
          observer.next(value);
        }
      }
      Ok(false) => {}
      Err(err) => {
        if let Some(observer) = self.observer.take() {
          observer.error(err);
        }
      }
    }
  }

  fn error(self, err: RxError) {
    if let Some(observer) = self.observer {
      observer.error(err);
    }
  }

  fn complete(self) {
    if let Some(observer) = self.observer {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool {
    self.observer.as_ref().map_or(true, Observer::is_closed)
  }
}
