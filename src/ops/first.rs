use crate::error::RxError;
use crate::observable::Observable;
use crate::observer::Observer;

impl<Item: Send + 'static> Observable<Item> {
  /// Emits the first value and completes right after it; the upstream
  /// subscription is released by the terminal delivery. An empty source
  /// just completes.
  pub fn first(self) -> Observable<Item> {
    Observable::create(move |observer| {
      self.actual_subscribe(FirstObserver {
        observer: Some(observer),
      })
    })
  }

  /// Like [`first`](Self::first), but an empty source emits `default`
  /// before completing.
  pub fn first_or(self, default: Item) -> Observable<Item>
  where
    Item: Clone + Sync,
  {
    Observable::create(move |observer| {
      self.actual_subscribe(FirstOrObserver {
        observer: Some(observer),
        default: default.clone(),
      })
    })
  }
}

struct FirstObserver<O> {
  observer: Option<O>,
}

impl<O, Item> Observer<Item> for FirstObserver<O>
where
  O: Observer<Item>,
{
  fn next(&mut self, value: Item) {
    if let Some(mut observer) = self.observer.take() {
      observer.next(value);
      observer.complete();
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

  // Closed as soon as the one value went out, so pull-style sources stop
  // emitting instead of running their whole sequence.
  fn is_closed(&self) -> bool {
    self.observer.as_ref().map_or(true, Observer::is_closed)
  }
}

struct FirstOrObserver<O, Item> {
  observer: Option<O>,
  default: Item,
}

impl<O, Item> Observer<Item> for FirstOrObserver<O, Item>
where
  O: Observer<Item>,
{
  fn next(&mut self, value: Item) {
    if let Some(mut observer) = self.observer.take() {
      observer.next(value);
      observer.complete();
    }
  }

  fn error(self, err: RxError) {
    if let Some(observer) = self.observer {
      observer.error(err);
    }
  }

  fn complete(self) {
    if let Some(mut observer) = self.observer {
      observer.next(self.default);
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool {
    self.observer.as_ref().map_or(true, Observer::is_closed)
  }
}
