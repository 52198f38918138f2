use std::sync::Arc;

use crate::error::RxError;
use crate::observable::Observable;
use crate::observer::Observer;

impl<Item: Send + 'static> Observable<Item> {
  /// Folds the whole sequence into one accumulated value, emitted on
  /// completion. An empty source emits the seed itself, then completes.
  pub fn reduce<Acc, F>(self, seed: Acc, fold: F) -> Observable<Acc>
  where
    Acc: Clone + Send + Sync + 'static,
    F: Fn(Acc, Item) -> Acc + Send + Sync + 'static,
  {
    let fold: Arc<dyn Fn(Acc, Item) -> Acc + Send + Sync> = Arc::new(fold);
    Observable::create(move |observer| {
      self.actual_subscribe(ReduceObserver {
        observer,
        acc: Some(seed.clone()),
        fold: fold.clone(),
      })
    })
  }
}

struct ReduceObserver<O, Item, Acc> {
  observer: O,
  acc: Option<Acc>,
  fold: Arc<dyn Fn(Acc, Item) -> Acc + Send + Sync>,
}

impl<O, Item, Acc> Observer<Item> for ReduceObserver<O, Item, Acc>
where
  O: Observer<Acc>,
{
  fn next(&mut self, value: Item) {
    if let Some(acc) = self.acc.take() {
      self.acc = Some((self.fold)(acc, value));
    }
  }

  fn error(self, err: RxError) { self.observer.error(err) }

  fn complete(self) {
    let ReduceObserver {
      mut observer, acc, ..
    } = self;
    if let Some(acc) = acc {
      observer.next(acc);
    }
    observer.complete();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn folds_the_whole_sequence() {
    let result = Arc::new(Mutex::new(Vec::new()));
    let probe = result.clone();
    observable::from_iter(1..=4)
      .reduce(0, |acc, v| acc + v)
      .subscribe(move |total| probe.lock().unwrap().push(total));
    assert_eq!(*result.lock().unwrap(), vec![10]);
  }

  #[test]
  fn empty_source_emits_the_seed() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let values = log.clone();
    let completion = log.clone();
    observable::empty::<i32>()
      .reduce(42, |acc, v| acc + v)
      .subscribe_complete(
        move |total| values.lock().unwrap().push(format!("next({total})")),
        move || completion.lock().unwrap().push("complete".into()),
      );
    assert_eq!(*log.lock().unwrap(), vec!["next(42)", "complete"]);
  }

  #[test]
  fn error_discards_the_accumulator() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let values = log.clone();
    let errors = log.clone();
    observable::throw_err::<i32>(RxError::message("boom"))
      .reduce(0, |acc, v| acc + v)
      .subscribe_err(
        move |total| values.lock().unwrap().push(format!("next({total})")),
        move |e| errors.lock().unwrap().push(format!("error({e})")),
      );
    assert_eq!(*log.lock().unwrap(), vec!["error(boom)"]);
  }
}
