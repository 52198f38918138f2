use std::sync::{Arc, Mutex};

use super::publish_subject::{PublishSubject, Registration};
use super::{SubjectObserver, SubjectState};
use crate::error::RxError;
use crate::observable::Observable;
use crate::observer::{BoxedObserver, Observer};
use crate::subscription::{BoxSubscription, Subscription, SubscriptionLike};

/// A multicast subject that owns a current value: every new subscriber
/// synchronously receives the stored value right after registering, then
/// whatever the subject broadcasts afterwards. After failure, a new
/// subscriber receives the terminal error instead; after completion, the
/// completion event.
pub struct BehaviorSubject<Item> {
  subject: PublishSubject<Item>,
  value: Arc<Mutex<Item>>,
}

impl<Item> Clone for BehaviorSubject<Item> {
  fn clone(&self) -> Self {
    BehaviorSubject {
      subject: self.subject.clone(),
      value: self.value.clone(),
    }
  }
}

impl<Item: Clone + Send + 'static> BehaviorSubject<Item> {
  pub fn new(initial: Item) -> Self {
    BehaviorSubject {
      subject: PublishSubject::new(),
      value: Arc::new(Mutex::new(initial)),
    }
  }

  /// The value a subscriber joining right now would receive first.
  pub fn value(&self) -> Item { self.value.lock().unwrap().clone() }

  pub fn has_observers(&self) -> bool { self.subject.has_observers() }

  pub fn observable(&self) -> Observable<Item> {
    let subject = self.clone();
    Observable::create(move |observer| subject.register(observer))
  }

  /// Stores `value` as current, then broadcasts it.
  pub fn next(&self, value: Item) {
    *self.value.lock().unwrap() = value.clone();
    self.subject.next(value);
  }

  pub fn error(&self, err: RxError) { self.subject.error(err); }

  pub fn complete(&self) { self.subject.complete(); }

  /// This subject viewed as an observer; see [`SubjectObserver`].
  pub fn observer(&self) -> SubjectObserver<Self> {
    SubjectObserver {
      subject: self.clone(),
    }
  }

  fn register(&self, observer: BoxedObserver<Item>) -> BoxSubscription {
    let current = self.value.clone();
    let registration = self.subject.register_shared(observer, |shared| {
      // Queue the replay while the registry lock is still held: a broadcast
      // racing with this registration snapshots the registry after the
      // queueing and so lands behind the replayed value, never ahead of it.
      shared.push(current.lock().unwrap().clone());
    });
    match registration {
      Registration::Active {
        observer: shared,
        subscription,
      } => {
        shared.drive();
        subscription
      }
      Registration::Terminated { observer, state } => {
        match state {
          SubjectState::Failed(err) => observer.error(err),
          SubjectState::Completed => observer.complete(),
          SubjectState::Running => unreachable!("terminated while running"),
        }
        Subscription::closed().boxed()
      }
    }
  }
}

impl<Item: Clone + Send + 'static> Observer<Item>
  for SubjectObserver<BehaviorSubject<Item>>
{
  fn next(&mut self, value: Item) { self.subject.next(value) }

  fn error(self, err: RxError) { self.subject.error(err) }

  fn complete(self) { self.subject.complete() }

  fn is_closed(&self) -> bool { !self.subject.subject.state().is_running() }
}
