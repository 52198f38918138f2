use std::sync::{Arc, Mutex};

use crate::error::RxError;
use crate::observable::Observable;
use crate::observer::{Observer, SharedObserver};
use crate::subscription::{
  CompositeSubscription, Subscription, SubscriptionLike,
};

impl<Item: Send + 'static> Observable<Item> {
  /// Combines the latest value from each side through `selector`. Nothing
  /// is emitted until both sides have produced at least one value; a side
  /// completing freezes its last value and the other side keeps combining
  /// against it; overall completion waits for both sides; either side's
  /// error terminates the combination immediately.
  pub fn combine_latest<Other, Out, F>(
    self,
    other: Observable<Other>,
    selector: F,
  ) -> Observable<Out>
  where
    Item: Clone,
    Other: Clone + Send + 'static,
    Out: Send + 'static,
    F: Fn(Item, Other) -> Out + Send + Sync + 'static,
  {
    let selector: Arc<dyn Fn(Item, Other) -> Out + Send + Sync> =
      Arc::new(selector);
    Observable::create(move |observer| {
      let shared = SharedObserver::new(observer);
      let state = Arc::new(Mutex::new(CombineState {
        left: None,
        right: None,
        left_done: false,
        right_done: false,
      }));
      let group = CompositeSubscription::default();
      let silenced = shared.clone();
      group.insert(Subscription::new(move || silenced.close()));
      group.insert(self.actual_subscribe(LeftObserver {
        shared: shared.clone(),
        state: state.clone(),
        group: group.clone(),
        selector: selector.clone(),
      }));
      group.insert(other.actual_subscribe(RightObserver {
        shared,
        state,
        group: group.clone(),
        selector: selector.clone(),
      }));
      group.boxed()
    })
  }
}

struct CombineState<Item, Other> {
  left: Option<Item>,
  right: Option<Other>,
  left_done: bool,
  right_done: bool,
}

struct LeftObserver<Item, Other, Out> {
  shared: SharedObserver<Out>,
  state: Arc<Mutex<CombineState<Item, Other>>>,
  group: CompositeSubscription,
  selector: Arc<dyn Fn(Item, Other) -> Out + Send + Sync>,
}

impl<Item, Other, Out> Observer<Item> for LeftObserver<Item, Other, Out>
where
  Item: Clone,
  Other: Clone,
{
  fn next(&mut self, value: Item) {
    // Snapshot the pair under the lock, run the selector outside it.
    let pair = {
      let mut state = self.state.lock().unwrap();
      state.left = Some(value.clone());
      state.right.clone().map(|right| (value, right))
    };
    if let Some((left, right)) = pair {
      self.shared.next((self.selector)(left, right));
    }
  }

  fn error(self, err: RxError) {
    self.shared.error(err);
    self.group.clone().unsubscribe();
  }

  fn complete(self) {
    let both_done = {
      let mut state = self.state.lock().unwrap();
      state.left_done = true;
      state.right_done
    };
    if both_done {
      self.shared.complete();
    }
  }

  fn is_closed(&self) -> bool { self.shared.is_closed() }
}

struct RightObserver<Item, Other, Out> {
  shared: SharedObserver<Out>,
  state: Arc<Mutex<CombineState<Item, Other>>>,
  group: CompositeSubscription,
  selector: Arc<dyn Fn(Item, Other) -> Out + Send + Sync>,
}

impl<Item, Other, Out> Observer<Other> for RightObserver<Item, Other, Out>
where
  Item: Clone,
  Other: Clone,
{
  fn next(&mut self, value: Other) {
    let pair = {
      let mut state = self.state.lock().unwrap();
      state.right = Some(value.clone());
      state.left.clone().map(|left| (left, value))
    };
    if let Some((left, right)) = pair {
      self.shared.next((self.selector)(left, right));
    }
  }

  fn error(self, err: RxError) {
    self.shared.error(err);
    self.group.clone().unsubscribe();
  }

  fn complete(self) {
    let both_done = {
      let mut state = self.state.lock().unwrap();
      state.right_done = true;
      state.left_done
    };
    if both_done {
      self.shared.complete();
    }
  }

  fn is_closed(&self) -> bool { self.shared.is_closed() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  fn pipeline() -> (
    PublishSubject<i32>,
    PublishSubject<i32>,
    Arc<Mutex<Vec<String>>>,
  ) {
    let left = PublishSubject::new();
    let right = PublishSubject::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let values = log.clone();
    let errors = log.clone();
    let completion = log.clone();
    left
      .observable()
      .combine_latest(right.observable(), |a, b| a * 10 + b)
      .subscribe_all(
        move |v| values.lock().unwrap().push(format!("next({v})")),
        move |e| errors.lock().unwrap().push(format!("error({e})")),
        move || completion.lock().unwrap().push("complete".into()),
      );
    (left, right, log)
  }

  #[test]
  fn waits_for_both_sides_before_emitting() {
    let (left, right, log) = pipeline();
    left.next(1);
    left.next(2);
    assert!(log.lock().unwrap().is_empty());
    right.next(3);
    left.next(4);
    assert_eq!(*log.lock().unwrap(), vec!["next(23)", "next(43)"]);
  }

  #[test]
  fn completed_side_keeps_its_frozen_value() {
    let (left, right, log) = pipeline();
    left.next(1);
    left.complete();
    right.next(5);
    right.next(6);
    assert_eq!(*log.lock().unwrap(), vec!["next(15)", "next(16)"]);
    right.complete();
    assert_eq!(
      *log.lock().unwrap(),
      vec!["next(15)", "next(16)", "complete"]
    );
  }

  #[test]
  fn either_error_terminates_everything() {
    let (left, right, log) = pipeline();
    left.next(1);
    right.next(2);
    left.error(RxError::message("boom"));
    right.next(3);
    assert_eq!(*log.lock().unwrap(), vec!["next(12)", "error(boom)"]);
  }
}
