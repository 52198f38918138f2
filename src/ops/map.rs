use std::sync::Arc;

use crate::error::RxError;
use crate::observable::Observable;
use crate::observer::Observer;

impl<Item: Send + 'static> Observable<Item> {
  /// Calls a closure on each value and emits its return value.
  ///
  /// ```
  /// use rxlite::prelude::*;
  /// use std::sync::{Arc, Mutex};
  ///
  /// let sum = Arc::new(Mutex::new(0));
  /// let probe = sum.clone();
  /// observable::from_iter(100..101)
  ///   .map(|v| v * 2)
  ///   .subscribe(move |v| *probe.lock().unwrap() += v);
  /// assert_eq!(*sum.lock().unwrap(), 200);
  /// ```
  pub fn map<U, F>(self, f: F) -> Observable<U>
  where
    U: Send + 'static,
    F: Fn(Item) -> U + Send + Sync + 'static,
  {
    let map: Arc<dyn Fn(Item) -> U + Send + Sync> = Arc::new(f);
    Observable::create(move |observer| {
      self.actual_subscribe(MapObserver {
        observer,
        map: map.clone(),
      })
    })
  }

  /// Like [`map`](Self::map) for fallible transforms: an `Err` from the
  /// closure is delivered downstream as the terminal error and nothing is
  /// delivered afterwards for that subscription.
  pub fn try_map<U, F>(self, f: F) -> Observable<U>
  where
    U: Send + 'static,
    F: Fn(Item) -> Result<U, RxError> + Send + Sync + 'static,
  {
    let map: Arc<dyn Fn(Item) -> Result<U, RxError> + Send + Sync> =
      Arc::new(f);
    Observable::create(move |observer| {
      self.actual_subscribe(TryMapObserver {
        observer: Some(observer),
        map: map.clone(),
      })
    })
  }
}

struct MapObserver<O, Item, U> {
  observer: O,
  map: Arc<dyn Fn(Item) -> U + Send + Sync>,
}

impl<O, Item, U> Observer<Item> for MapObserver<O, Item, U>
where
  O: Observer<U>,
{
  fn next(&mut self, value: Item) {
    let mapped = (self.map)(value);
    self.observer.next(mapped);
  }

  fn error(self, err: RxError) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

struct TryMapObserver<O, Item, U> {
  observer: Option<O>,
  map: Arc<dyn Fn(Item) -> Result<U, RxError> + Send + Sync>,
}

impl<O, Item, U> Observer<Item> for TryMapObserver<O, Item, U>
where
  O: Observer<U>,
{
  fn next(&mut self, value: Item) {
    if self.observer.is_none() {
      return;
    }
    match (self.map)(value) {
      Ok(mapped) => {
        if let Some(observer) = self.observer.as_mut() {
          observer.next(mapped);
        }
      }
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
