use crate::error::RxError;
use crate::observable::Observable;
use crate::observer::Observer;

impl<Item: Send + 'static> Observable<Item> {
  /// Buffers every value and emits them as one `Vec` on completion. An
  /// error discards the buffer and is forwarded as-is.
  pub fn collect(self) -> Observable<Vec<Item>> {
    Observable::create(move |observer| {
      self.actual_subscribe(CollectObserver {
        observer,
        buffer: Vec::new(),
      })
    })
  }
}

struct CollectObserver<O, Item> {
  observer: O,
  buffer: Vec<Item>,
}

impl<O, Item> Observer<Item> for CollectObserver<O, Item>
where
  O: Observer<Vec<Item>>,
{
  fn next(&mut self, value: Item) { self.buffer.push(value) }

  fn error(self, err: RxError) { self.observer.error(err) }

  fn complete(self) {
    let CollectObserver {
      mut observer,
      buffer,
    } = self;
    observer.next(buffer);
    observer.complete();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn gathers_values_in_order() {
    let result = Arc::new(Mutex::new(Vec::new()));
    let probe = result.clone();
    observable::from_iter(1..4)
      .collect()
      .subscribe(move |values| probe.lock().unwrap().push(values));
    assert_eq!(*result.lock().unwrap(), vec![vec![1, 2, 3]]);
  }

  #[test]
  fn empty_source_yields_empty_vec() {
    let result = Arc::new(Mutex::new(Vec::new()));
    let probe = result.clone();
    observable::empty::<i32>()
      .collect()
      .subscribe(move |values| probe.lock().unwrap().push(values));
    assert_eq!(*result.lock().unwrap(), vec![Vec::<i32>::new()]);
  }

  #[test]
  fn error_discards_the_buffer() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let values = events.clone();
    let errors = events.clone();
    observable::from_iter(1..3)
      .concat(observable::throw_err(RxError::message("boom")))
      .collect()
      .subscribe_err(
        move |v: Vec<i32>| values.lock().unwrap().push(format!("next({v:?})")),
        move |e| errors.lock().unwrap().push(format!("error({e})")),
      );
    assert_eq!(*events.lock().unwrap(), vec!["error(boom)"]);
  }
}
