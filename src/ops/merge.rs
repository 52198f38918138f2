use crate::observable::Observable;

impl<Item: Send + 'static> Observable<Item> {
  /// Subscribes `self` and `other` together and delivers values from both
  /// in arrival order; completes once both have completed, errors as soon
  /// as either errors.
  pub fn merge(self, other: Observable<Item>) -> Observable<Item> {
    crate::observable::from_iter(vec![self, other]).merge_all()
  }
}

impl<Item: Send + 'static> Observable<Observable<Item>> {
  /// Flattens an observable of observables by subscribing every inner
  /// source as it arrives and interleaving their outputs.
  pub fn merge_all(self) -> Observable<Item> {
    self.flat_map(|source| source)
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn interleaves_in_arrival_order() {
    let left = PublishSubject::new();
    let right = PublishSubject::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let values = log.clone();
    let completion = log.clone();
    left
      .observable()
      .merge(right.observable())
      .subscribe_complete(
        move |v: i32| values.lock().unwrap().push(format!("next({v})")),
        move || completion.lock().unwrap().push("complete".into()),
      );
    left.next(1);
    right.next(2);
    left.next(3);
    left.complete();
    right.next(4);
    right.complete();
    assert_eq!(
      *log.lock().unwrap(),
      vec!["next(1)", "next(2)", "next(3)", "next(4)", "complete"]
    );
  }

  #[test]
  fn either_error_short_circuits() {
    let left = PublishSubject::new();
    let right = PublishSubject::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let values = log.clone();
    let errors = log.clone();
    left
      .observable()
      .merge(right.observable())
      .subscribe_err(
        move |v: i32| values.lock().unwrap().push(format!("next({v})")),
        move |e| errors.lock().unwrap().push(format!("error({e})")),
      );
    left.next(1);
    right.error(RxError::message("boom"));
    left.next(2);
    assert_eq!(*log.lock().unwrap(), vec!["next(1)", "error(boom)"]);
  }

  #[test]
  fn merge_all_flattens_every_source() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let probe = seen.clone();
    observable::from_iter(vec![
      observable::from_iter(vec![1, 2]),
      observable::from_iter(vec![3, 4]),
    ])
    .merge_all()
    .subscribe(move |v| probe.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4]);
  }
}
