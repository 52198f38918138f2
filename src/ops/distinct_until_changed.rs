use std::sync::Arc;

use crate::error::RxError;
use crate::observable::Observable;
use crate::observer::Observer;

impl<Item: Send + 'static> Observable<Item> {
  /// Suppresses consecutive duplicates, compared with `==`.
  pub fn distinct_until_changed(self) -> Observable<Item>
  where
    Item: Clone + PartialEq,
  {
    self.distinct_until_changed_by(|prev, next| prev == next)
  }

  /// Suppresses a value when `comparer(previous, value)` reports it equal
  /// to the last delivered one.
  pub fn distinct_until_changed_by<F>(self, comparer: F) -> Observable<Item>
  where
    Item: Clone,
    F: Fn(&Item, &Item) -> bool + Send + Sync + 'static,
  {
    let comparer: Arc<dyn Fn(&Item, &Item) -> bool + Send + Sync> =
      Arc::new(comparer);
    Observable::create(move |observer| {
      self.actual_subscribe(DistinctObserver {
        observer,
        last: None,
        comparer: comparer.clone(),
      })
    })
  }
}

struct DistinctObserver<O, Item> {
  observer: O,
  last: Option<Item>,
  comparer: Arc<dyn Fn(&Item, &Item) -> bool + Send + Sync>,
}

impl<O, Item> Observer<Item> for DistinctObserver<O, Item>
where
  O: Observer<Item>,
  Item: Clone,
{
  fn next(&mut self, value: Item) {
    let duplicate = self
      .last
      .as_ref()
      .map_or(false, |last| (self.comparer)(last, &value));
    if !duplicate {
      self.last = Some(value.clone());
      self.observer.next(value);
    }
  }

  fn error(self, err: RxError) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn drops_consecutive_duplicates_only() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let probe = seen.clone();
    observable::from_iter(vec![1, 1, 2, 2, 2, 1, 3, 3])
      .distinct_until_changed()
      .subscribe(move |v| probe.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 1, 3]);
  }

  #[test]
  fn custom_comparer_decides_equality() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let probe = seen.clone();
    observable::from_iter(vec!["a", "A", "b", "B"])
      .distinct_until_changed_by(|prev, next| {
        prev.eq_ignore_ascii_case(next)
      })
      .subscribe(move |v| probe.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec!["a", "b"]);
  }
}
