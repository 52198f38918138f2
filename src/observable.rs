//! The `Observable` producer capability and its subscription surface.
//!
//! An observable is nothing but a subscription function: subscribing hands
//! it an observer and gets back the handle releasing that one subscription.
//! Every factory and operator in the crate is built purely in terms of
//! [`Observable::create`]; there is no subclass hierarchy.

use std::sync::Arc;

use crate::error::RxError;
use crate::observer::{BoxedObserver, CallbackObserver, Observer};
use crate::subscription::{
  BoxSubscription, CompositeSubscription, SerialSubscription, Subscription,
  SubscriptionLike, TeardownFn,
};

mod defer;
mod from_iter;
mod of;
#[cfg(feature = "timer")]
mod timer;

pub use defer::defer;
pub use from_iter::from_iter;
pub use of::{empty, never, of, throw_err};
#[cfg(feature = "timer")]
pub use timer::{interval, timer};

type SubscribeFn<Item> =
  dyn Fn(BoxedObserver<Item>) -> BoxSubscription + Send + Sync;

/// A push-based sequence of values terminated by completion or error.
///
/// Cloning is cheap and shares the underlying subscription function; each
/// subscription runs it afresh, so (subjects aside) observables hold no
/// per-subscription state.
pub struct Observable<Item> {
  subscribe_fn: Arc<SubscribeFn<Item>>,
}

impl<Item> Clone for Observable<Item> {
  fn clone(&self) -> Self {
    Observable {
      subscribe_fn: self.subscribe_fn.clone(),
    }
  }
}

impl<Item: Send + 'static> Observable<Item> {
  /// Wraps a subscription function. `subscribe` is called once per
  /// subscription with the downstream observer and must return the handle
  /// releasing whatever it started.
  pub fn create(
    subscribe: impl Fn(BoxedObserver<Item>) -> BoxSubscription
      + Send
      + Sync
      + 'static,
  ) -> Self {
    Observable {
      subscribe_fn: Arc::new(subscribe),
    }
  }

  /// Subscribes `observer` without any terminal-auto-release composition.
  /// Operators build on this; callers normally want the `subscribe_*`
  /// family instead.
  pub fn actual_subscribe(
    &self,
    observer: impl Observer<Item> + Send + 'static,
  ) -> BoxSubscription {
    (self.subscribe_fn)(Box::new(observer))
  }

  /// Subscribes with a value callback only.
  pub fn subscribe(
    &self,
    next: impl FnMut(Item) + Send + 'static,
  ) -> CompositeSubscription {
    self.subscribe_observer(CallbackObserver::default().on_next(next), None)
  }

  /// Subscribes with value and error callbacks.
  pub fn subscribe_err(
    &self,
    next: impl FnMut(Item) + Send + 'static,
    error: impl FnOnce(RxError) + Send + 'static,
  ) -> CompositeSubscription {
    self.subscribe_observer(
      CallbackObserver::default().on_next(next).on_error(error),
      None,
    )
  }

  /// Subscribes with value and completion callbacks.
  pub fn subscribe_complete(
    &self,
    next: impl FnMut(Item) + Send + 'static,
    complete: impl FnOnce() + Send + 'static,
  ) -> CompositeSubscription {
    self.subscribe_observer(
      CallbackObserver::default()
        .on_next(next)
        .on_complete(complete),
      None,
    )
  }

  /// Subscribes with callbacks for every channel.
  pub fn subscribe_all(
    &self,
    next: impl FnMut(Item) + Send + 'static,
    error: impl FnOnce(RxError) + Send + 'static,
    complete: impl FnOnce() + Send + 'static,
  ) -> CompositeSubscription {
    self.subscribe_observer(
      CallbackObserver::default()
        .on_next(next)
        .on_error(error)
        .on_complete(complete),
      None,
    )
  }

  /// Like [`subscribe_all`](Self::subscribe_all), plus an `unsub` hook that
  /// fires once when the subscription is released, whether by a terminal
  /// event or by an external `unsubscribe`.
  pub fn subscribe_all_unsub(
    &self,
    next: impl FnMut(Item) + Send + 'static,
    error: impl FnOnce(RxError) + Send + 'static,
    complete: impl FnOnce() + Send + 'static,
    unsub: impl FnOnce() + Send + 'static,
  ) -> CompositeSubscription {
    self.subscribe_observer(
      CallbackObserver::default()
        .on_next(next)
        .on_error(error)
        .on_complete(complete),
      Some(Box::new(unsub)),
    )
  }

  /// The shared composition behind the `subscribe_*` family: one returned
  /// handle covers the upstream subscription and the optional release hook,
  /// and any terminal event releases everything automatically.
  fn subscribe_observer(
    &self,
    callbacks: CallbackObserver<Item>,
    unsub: Option<TeardownFn>,
  ) -> CompositeSubscription {
    let handle = CompositeSubscription::default();
    if let Some(unsub) = unsub {
      handle.insert(Subscription::new(unsub));
    }
    let serial = SerialSubscription::default();
    handle.insert(serial.clone());
    let upstream = self.actual_subscribe(AutoUnsubObserver {
      callbacks,
      handle: handle.clone(),
    });
    // If a terminal event already fired during subscribe, the serial is
    // closed and releases the upstream handle here instead of retaining it.
    serial.set(upstream);
    handle
  }
}

/// Delivers to the caller's callbacks and releases the whole subscription
/// handle right after a terminal event.
struct AutoUnsubObserver<Item> {
  callbacks: CallbackObserver<Item>,
  handle: CompositeSubscription,
}

impl<Item> Observer<Item> for AutoUnsubObserver<Item> {
  fn next(&mut self, value: Item) {
    if !self.handle.is_closed() {
      self.callbacks.next(value);
    }
  }

  fn error(self, err: RxError) {
    let AutoUnsubObserver {
      callbacks,
      mut handle,
    } = self;
    if handle.is_closed() {
      return;
    }
    callbacks.error(err);
    handle.unsubscribe();
  }

  fn complete(self) {
    let AutoUnsubObserver {
      callbacks,
      mut handle,
    } = self;
    if handle.is_closed() {
      return;
    }
    callbacks.complete();
    handle.unsubscribe();
  }

  fn is_closed(&self) -> bool { self.handle.is_closed() }
}
