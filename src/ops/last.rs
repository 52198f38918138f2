use crate::error::RxError;
use crate::observable::Observable;
use crate::observer::Observer;

impl<Item: Send + 'static> Observable<Item> {
  /// Emits only the final value, once completion tells us which one that
  /// was. An empty source just completes.
  pub fn last(self) -> Observable<Item> {
    Observable::create(move |observer| {
      self.actual_subscribe(LastObserver {
        observer,
        last: None,
      })
    })
  }

  /// Like [`last`](Self::last), but an empty source emits `default` before
  /// completing.
  pub fn last_or(self, default: Item) -> Observable<Item>
  where
    Item: Clone + Sync,
  {
    Observable::create(move |observer| {
      self.actual_subscribe(LastOrObserver {
        observer,
        last: None,
        default: default.clone(),
      })
    })
  }
}

struct LastObserver<O, Item> {
  observer: O,
  last: Option<Item>,
}

impl<O, Item> Observer<Item> for LastObserver<O, Item>
where
  O: Observer<Item>,
{
  fn next(&mut self, value: Item) { self.last = Some(value) }

  fn error(self, err: RxError) { self.observer.error(err) }

  fn complete(self) {
    let LastObserver { mut observer, last } = self;
    if let Some(last) = last {
      observer.next(last);
    }
    observer.complete();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

struct LastOrObserver<O, Item> {
  observer: O,
  last: Option<Item>,
  default: Item,
}

impl<O, Item> Observer<Item> for LastOrObserver<O, Item>
where
  O: Observer<Item>,
{
  fn next(&mut self, value: Item) { self.last = Some(value) }

  fn error(self, err: RxError) { self.observer.error(err) }

  fn complete(self) {
    let LastOrObserver {
      mut observer,
      last,
      default,
    } = self;
    observer.next(last.unwrap_or(default));
    observer.complete();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
