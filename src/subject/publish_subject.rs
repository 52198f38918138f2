use std::sync::{Arc, Mutex};

use smallvec::SmallVec;

use super::{SubjectObserver, SubjectState};
use crate::bag::Bag;
use crate::error::RxError;
use crate::observable::Observable;
use crate::observer::{BoxedObserver, Observer, SharedObserver};
use crate::subscription::{BoxSubscription, Subscription, SubscriptionLike};

/// A hot multicast subject: values pushed in are broadcast to every
/// observer subscribed at that moment. Subscribers joining after the
/// subject terminated receive nothing and get an already-closed handle.
pub struct PublishSubject<Item> {
  inner: Arc<Mutex<SubjectInner<Item>>>,
}

struct SubjectInner<Item> {
  observers: Bag<SharedObserver<Item>>,
  state: SubjectState,
}

impl<Item> Clone for PublishSubject<Item> {
  fn clone(&self) -> Self {
    PublishSubject {
      inner: self.inner.clone(),
    }
  }
}

impl<Item> Default for PublishSubject<Item> {
  fn default() -> Self {
    PublishSubject {
      inner: Arc::new(Mutex::new(SubjectInner {
        observers: Bag::default(),
        state: SubjectState::Running,
      })),
    }
  }
}

/// Outcome of registering an observer with a subject's registry.
pub(crate) enum Registration<Item> {
  /// Registered while running; the shared handle addresses exactly this
  /// subscriber and the subscription removes it from the registry.
  Active {
    observer: SharedObserver<Item>,
    subscription: BoxSubscription,
  },
  /// The subject already terminated; the observer is handed back untouched
  /// together with the terminal state.
  Terminated {
    observer: BoxedObserver<Item>,
    state: SubjectState,
  },
}

impl<Item: Send + 'static> PublishSubject<Item> {
  pub fn new() -> Self { Self::default() }

  /// `true` while at least one observer is registered. `share()` relies on
  /// this to probe its refcount.
  pub fn has_observers(&self) -> bool {
    !self.inner.lock().unwrap().observers.is_empty()
  }

  /// The cold-looking view of this hot source; subscribing registers with
  /// the live registry.
  pub fn observable(&self) -> Observable<Item> {
    let subject = self.clone();
    Observable::create(move |observer| subject.register(observer))
  }

  /// This subject viewed as an observer; see [`SubjectObserver`].
  pub fn observer(&self) -> SubjectObserver<Self> {
    SubjectObserver {
      subject: self.clone(),
    }
  }

  pub(crate) fn register(&self, observer: BoxedObserver<Item>) -> BoxSubscription {
    match self.register_shared(observer, |_| {}) {
      Registration::Active { subscription, .. } => subscription,
      Registration::Terminated { .. } => Subscription::closed().boxed(),
    }
  }

  /// Registers an observer with the live registry. `on_register` runs on
  /// the fresh latch while the registry lock is still held, so anything it
  /// queues is ordered ahead of every broadcast that can see this
  /// subscriber; `BehaviorSubject` queues its replayed value there.
  pub(crate) fn register_shared(
    &self,
    observer: BoxedObserver<Item>,
    on_register: impl FnOnce(&SharedObserver<Item>),
  ) -> Registration<Item> {
    let mut inner = self.inner.lock().unwrap();
    if !inner.state.is_running() {
      let state = inner.state.clone();
      return Registration::Terminated { observer, state };
    }
    let shared = SharedObserver::new(observer);
    let key = inner.observers.insert(shared.clone());
    on_register(&shared);
    drop(inner);
    let registry = self.inner.clone();
    let silenced = shared.clone();
    let subscription = Subscription::new(move || {
      let removed = registry.lock().unwrap().observers.remove(key);
      drop(removed);
      // A broadcast snapshot taken before removal may still hold this
      // subscriber; closing the latch keeps it from delivering late.
      silenced.close();
    });
    Registration::Active {
      observer: shared,
      subscription: subscription.boxed(),
    }
  }

  /// Broadcasts `value` to every currently registered observer. Delivery
  /// happens outside the registry lock on a snapshot, so a subscriber may
  /// subscribe or unsubscribe from within its own callback.
  pub fn next(&self, value: Item)
  where
    Item: Clone,
  {
    let snapshot: SmallVec<[SharedObserver<Item>; 2]> = {
      let inner = self.inner.lock().unwrap();
      if !inner.state.is_running() {
        return;
      }
      inner.observers.iter().cloned().collect()
    };
    for mut observer in snapshot {
      observer.next(value.clone());
    }
  }

  /// Fails the subject: the registry is atomically detached together with
  /// the state change, then every observer receives the error outside the
  /// lock. Later events and subscriptions are no-ops.
  pub fn error(&self, err: RxError) {
    let snapshot = {
      let mut inner = self.inner.lock().unwrap();
      if !inner.state.is_running() {
        return;
      }
      inner.state = SubjectState::Failed(err.clone());
      inner.observers.drain()
    };
    for observer in snapshot {
      observer.error(err.clone());
    }
  }

  /// Completes the subject; same registry handling as [`error`](Self::error).
  pub fn complete(&self) {
    let snapshot = {
      let mut inner = self.inner.lock().unwrap();
      if !inner.state.is_running() {
        return;
      }
      inner.state = SubjectState::Completed;
      inner.observers.drain()
    };
    for observer in snapshot {
      observer.complete();
    }
  }

  pub(crate) fn state(&self) -> SubjectState {
    self.inner.lock().unwrap().state.clone()
  }
}

impl<Item: Clone + Send + 'static> Observer<Item>
  for SubjectObserver<PublishSubject<Item>>
{
  fn next(&mut self, value: Item) { self.subject.next(value) }

  fn error(self, err: RxError) { self.subject.error(err) }

  fn complete(self) { self.subject.complete() }

  fn is_closed(&self) -> bool { !self.subject.state().is_running() }
}
