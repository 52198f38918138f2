use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::RxError;
use crate::observable::Observable;
use crate::observer::{Observer, SharedObserver};
use crate::subscription::{
  CompositeSubscription, SerialSubscription, Subscription, SubscriptionLike,
};

impl<Item: Send + 'static> Observable<Item> {
  /// Emits everything from `self`, then everything from `other`. `other`
  /// is not subscribed until `self` completes.
  pub fn concat(self, other: Observable<Item>) -> Observable<Item> {
    crate::observable::from_iter(vec![self, other]).concat_all()
  }
}

impl<Item: Send + 'static> Observable<Observable<Item>> {
  /// Flattens an observable of observables by draining the inner sources
  /// one at a time in arrival order: each source is subscribed only once
  /// the previous one has completed. Any error anywhere aborts the chain.
  pub fn concat_all(self) -> Observable<Item> {
    Observable::create(move |observer| {
      let core = Arc::new(ConcatCore {
        shared: SharedObserver::new(observer),
        current: SerialSubscription::default(),
        state: Mutex::new(ConcatState {
          queue: VecDeque::new(),
          outer_done: false,
          inner_active: false,
        }),
        driving: AtomicBool::new(false),
        pending: AtomicBool::new(false),
      });
      let handle = CompositeSubscription::default();
      let silenced = core.shared.clone();
      handle.insert(Subscription::new(move || silenced.close()));
      handle.insert(core.current.clone());
      handle.insert(self.actual_subscribe(ConcatOuterObserver {
        core: core.clone(),
      }));
      handle.boxed()
    })
  }
}

struct ConcatCore<Item> {
  shared: SharedObserver<Item>,
  current: SerialSubscription,
  state: Mutex<ConcatState<Item>>,
  driving: AtomicBool,
  pending: AtomicBool,
}

struct ConcatState<Item> {
  queue: VecDeque<Observable<Item>>,
  outer_done: bool,
  inner_active: bool,
}

impl<Item: Send + 'static> ConcatCore<Item> {
  /// Trampolined advance: a reentrant call (an inner source completing
  /// synchronously inside `subscribe`) only flags `pending` and returns,
  /// and the frame already driving picks the step up in its loop. Chains
  /// of tens of thousands of synchronous sources stay at fixed stack
  /// depth.
  fn drive(core: &Arc<Self>) {
    core.pending.store(true, Ordering::SeqCst);
    if core.driving.swap(true, Ordering::SeqCst) {
      return;
    }
    loop {
      while core.pending.swap(false, Ordering::SeqCst) {
        Self::step(core);
      }
      core.driving.store(false, Ordering::SeqCst);
      if !core.pending.load(Ordering::SeqCst)
        || core.driving.swap(true, Ordering::SeqCst)
      {
        break;
      }
    }
  }

  fn step(core: &Arc<Self>) {
    if core.shared.is_closed() {
      return;
    }
    let next = {
      let mut state = core.state.lock().unwrap();
      if state.inner_active {
        return;
      }
      match state.queue.pop_front() {
        Some(source) => {
          state.inner_active = true;
          Some(source)
        }
        None if state.outer_done => None,
        None => return,
      }
    };
    match next {
      Some(source) => {
        let sub = source.actual_subscribe(ConcatInnerObserver {
          core: core.clone(),
        });
        core.current.set(sub);
      }
      None => core.shared.clone().complete(),
    }
  }
}

struct ConcatOuterObserver<Item> {
  core: Arc<ConcatCore<Item>>,
}

impl<Item: Send + 'static> Observer<Observable<Item>>
  for ConcatOuterObserver<Item>
{
  fn next(&mut self, source: Observable<Item>) {
    self.core.state.lock().unwrap().queue.push_back(source);
    ConcatCore::drive(&self.core);
  }

  fn error(self, err: RxError) {
    self.core.shared.clone().error(err);
    self.core.current.clone().unsubscribe();
  }

  fn complete(self) {
    self.core.state.lock().unwrap().outer_done = true;
    ConcatCore::drive(&self.core);
  }

  fn is_closed(&self) -> bool { self.core.shared.is_closed() }
}

struct ConcatInnerObserver<Item> {
  core: Arc<ConcatCore<Item>>,
}

impl<Item: Send + 'static> Observer<Item> for ConcatInnerObserver<Item> {
  fn next(&mut self, value: Item) { self.core.shared.clone().next(value) }

  fn error(self, err: RxError) { self.core.shared.clone().error(err) }

  fn complete(self) {
    self.core.state.lock().unwrap().inner_active = false;
    ConcatCore::drive(&self.core);
  }

  fn is_closed(&self) -> bool { self.core.shared.is_closed() }
}
