use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::RxError;
use crate::observable::Observable;
use crate::observer::{Observer, SharedObserver};
use crate::subscription::{
  CompositeSubscription, Subscription, SubscriptionLike,
};

impl<Item: Send + 'static> Observable<Item> {
  /// For each upstream value, subscribes the observable produced by
  /// `project` and merges all inner outputs into one stream. Values
  /// interleave in arrival order; completion waits for the outer source
  /// and every inner source; the first error from anywhere releases the
  /// whole group.
  pub fn flat_map<U, F>(self, project: F) -> Observable<U>
  where
    U: Send + 'static,
    F: Fn(Item) -> Observable<U> + Send + Sync + 'static,
  {
    let project: Arc<dyn Fn(Item) -> Observable<U> + Send + Sync> =
      Arc::new(project);
    Observable::create(move |observer| {
      let shared = SharedObserver::new(observer);
      let group = CompositeSubscription::default();
      // Seeded at one for the outer subscription itself; completion fires
      // only when the counter drains to zero.
      let active = Arc::new(AtomicUsize::new(1));
      let silenced = shared.clone();
      group.insert(Subscription::new(move || silenced.close()));
      group.insert(self.actual_subscribe(OuterObserver {
        shared,
        group: group.clone(),
        active,
        project: project.clone(),
      }));
      group.boxed()
    })
  }
}

struct OuterObserver<Item, U> {
  shared: SharedObserver<U>,
  group: CompositeSubscription,
  active: Arc<AtomicUsize>,
  project: Arc<dyn Fn(Item) -> Observable<U> + Send + Sync>,
}

impl<Item, U> Observer<Item> for OuterObserver<Item, U>
where
  Item: Send + 'static,
  U: Send + 'static,
{
  fn next(&mut self, value: Item) {
    if self.shared.is_closed() {
      return;
    }
    self.active.fetch_add(1, Ordering::SeqCst);
    let inner = (self.project)(value);
    self.group.insert(inner.actual_subscribe(InnerObserver {
      shared: self.shared.clone(),
      group: self.group.clone(),
      active: self.active.clone(),
    }));
  }

  fn error(self, err: RxError) {
    self.shared.error(err);
    self.group.clone().unsubscribe();
  }

  fn complete(self) {
    if self.active.fetch_sub(1, Ordering::SeqCst) == 1 {
      self.shared.complete();
    }
  }

  fn is_closed(&self) -> bool { self.shared.is_closed() }
}

struct InnerObserver<U> {
  shared: SharedObserver<U>,
  group: CompositeSubscription,
  active: Arc<AtomicUsize>,
}

impl<U> Observer<U> for InnerObserver<U> {
  fn next(&mut self, value: U) { self.shared.next(value) }

  fn error(self, err: RxError) {
    self.shared.error(err);
    self.group.clone().unsubscribe();
  }

  fn complete(self) {
    if self.active.fetch_sub(1, Ordering::SeqCst) == 1 {
      self.shared.complete();
    }
  }

  fn is_closed(&self) -> bool { self.shared.is_closed() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn synchronous_inners_keep_arrival_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let values = log.clone();
    let completion = log.clone();
    observable::from_iter(vec![1, 2, 3])
      .flat_map(|v| observable::of(v * 2))
      .subscribe_complete(
        move |v| values.lock().unwrap().push(format!("next({v})")),
        move || completion.lock().unwrap().push("complete".into()),
      );
    assert_eq!(
      *log.lock().unwrap(),
      vec!["next(2)", "next(4)", "next(6)", "complete"]
    );
  }

  #[test]
  fn completion_waits_for_open_inners() {
    let inner = PublishSubject::new();
    let inner_view = inner.observable();
    let log = Arc::new(Mutex::new(Vec::new()));
    let values = log.clone();
    let completion = log.clone();
    observable::of(())
      .flat_map(move |_| inner_view.clone())
      .subscribe_complete(
        move |v: i32| values.lock().unwrap().push(format!("next({v})")),
        move || completion.lock().unwrap().push("complete".into()),
      );
    // Outer already completed, but the inner subject is still open.
    inner.next(1);
    assert_eq!(*log.lock().unwrap(), vec!["next(1)"]);
    inner.complete();
    assert_eq!(*log.lock().unwrap(), vec!["next(1)", "complete"]);
  }

  #[test]
  fn inner_error_terminates_the_whole_group() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let values = log.clone();
    let errors = log.clone();
    observable::from_iter(vec![1, 2, 3])
      .flat_map(|v| {
        if v == 2 {
          observable::throw_err(RxError::message("boom"))
        } else {
          observable::of(v)
        }
      })
      .subscribe_err(
        move |v| values.lock().unwrap().push(format!("next({v})")),
        move |e| errors.lock().unwrap().push(format!("error({e})")),
      );
    assert_eq!(*log.lock().unwrap(), vec!["next(1)", "error(boom)"]);
  }
}
