//! Subscription handles returned from `Observable::subscribe` and from
//! schedulers, used to release an upstream subscription or cancel a pending
//! action.
//!
//! All handles are idempotent: unsubscribing more than once has the same
//! effect as unsubscribing once. Teardown actions always run outside the
//! lock that guards them, so a member may re-enter the handle it is being
//! released from (e.g. a subscriber unsubscribing during its own `next`).

use std::sync::{Arc, Mutex};

use crate::bag::{Bag, BagKey};

/// The capability of releasing one subscription or resource.
pub trait SubscriptionLike {
  /// Releases the subscription. Safe to call from any thread, any number of
  /// times, including from within a callback of the same subscription.
  fn unsubscribe(&mut self);

  fn is_closed(&self) -> bool;

  /// Boxes the handle for storage in heterogeneous registries.
  fn boxed(self) -> BoxSubscription
  where
    Self: Sized + Send + 'static,
  {
    Box::new(self)
  }

  /// Activates RAII behavior: `unsubscribe` runs when the returned guard
  /// goes out of scope.
  fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self>
  where
    Self: Sized,
  {
    SubscriptionGuard(self)
  }
}

pub type BoxSubscription = Box<dyn SubscriptionLike + Send>;

pub(crate) type TeardownFn = Box<dyn FnOnce() + Send>;

impl<T: ?Sized + SubscriptionLike> SubscriptionLike for Box<T> {
  #[inline]
  fn unsubscribe(&mut self) { (**self).unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

// ============================================================================
// Subscription - at-most-once teardown action
// ============================================================================

/// A handle over a single teardown action, executed exactly once on the
/// first `unsubscribe` call. The action is cleared under the lock before it
/// runs, which guarantees at-most-once execution even when several threads
/// race on `unsubscribe`.
#[derive(Clone, Default)]
pub struct Subscription {
  inner: Arc<Mutex<SubscriptionInner>>,
}

#[derive(Default)]
struct SubscriptionInner {
  closed: bool,
  teardown: Option<TeardownFn>,
}

impl Subscription {
  /// A subscription with nothing to release; `unsubscribe` only flips the
  /// closed flag.
  pub fn empty() -> Self { Self::default() }

  /// A subscription that is already closed.
  pub fn closed() -> Self {
    Subscription {
      inner: Arc::new(Mutex::new(SubscriptionInner {
        closed: true,
        teardown: None,
      })),
    }
  }

  pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
    Subscription {
      inner: Arc::new(Mutex::new(SubscriptionInner {
        closed: false,
        teardown: Some(Box::new(teardown)),
      })),
    }
  }
}

impl SubscriptionLike for Subscription {
  fn unsubscribe(&mut self) {
    let teardown = {
      let mut inner = self.inner.lock().unwrap();
      if inner.closed {
        return;
      }
      inner.closed = true;
      inner.teardown.take()
    };
    if let Some(teardown) = teardown {
      teardown();
    }
  }

  fn is_closed(&self) -> bool { self.inner.lock().unwrap().closed }
}

// ============================================================================
// SerialSubscription - holds at most one inner subscription
// ============================================================================

/// Holds at most one current inner subscription. Setting a new one releases
/// the previous one; setting after the serial itself was closed releases the
/// newcomer immediately instead of retaining it.
#[derive(Clone, Default)]
pub struct SerialSubscription {
  inner: Arc<Mutex<SerialInner>>,
}

#[derive(Default)]
struct SerialInner {
  closed: bool,
  current: Option<BoxSubscription>,
}

impl SerialSubscription {
  pub fn set(&self, subscription: impl SubscriptionLike + Send + 'static) {
    let fresh: BoxSubscription = Box::new(subscription);
    let stale = {
      let mut inner = self.inner.lock().unwrap();
      if inner.closed {
        Some(fresh)
      } else {
        inner.current.replace(fresh)
      }
    };
    if let Some(mut stale) = stale {
      stale.unsubscribe();
    }
  }
}

impl SubscriptionLike for SerialSubscription {
  fn unsubscribe(&mut self) {
    let current = {
      let mut inner = self.inner.lock().unwrap();
      if inner.closed {
        return;
      }
      inner.closed = true;
      inner.current.take()
    };
    if let Some(mut current) = current {
      current.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.inner.lock().unwrap().closed }
}

// ============================================================================
// CompositeSubscription - keyed bag of member subscriptions
// ============================================================================

/// A registry of member subscriptions released together. `insert` hands back
/// a key for removing that one member; once the composite is closed every
/// later insert releases the member immediately so nothing assigned after
/// teardown can leak.
#[derive(Clone, Default)]
pub struct CompositeSubscription {
  inner: Arc<Mutex<CompositeInner>>,
}

#[derive(Default)]
struct CompositeInner {
  closed: bool,
  bag: Bag<BoxSubscription>,
}

impl CompositeSubscription {
  pub fn insert(
    &self,
    subscription: impl SubscriptionLike + Send + 'static,
  ) -> Option<BagKey> {
    let mut member: BoxSubscription = Box::new(subscription);
    {
      let mut inner = self.inner.lock().unwrap();
      if !inner.closed {
        // Drop members that already finished so long-lived composites do
        // not accumulate dead handles.
        inner.bag.retain(|m| !m.is_closed());
        return Some(inner.bag.insert(member));
      }
    }
    member.unsubscribe();
    None
  }

  /// Removes and releases the member inserted under `key`.
  pub fn remove(&self, key: BagKey) {
    let removed = self.inner.lock().unwrap().bag.remove(key);
    if let Some(mut removed) = removed {
      removed.unsubscribe();
    }
  }

  pub fn len(&self) -> usize { self.inner.lock().unwrap().bag.len() }

  pub fn is_empty(&self) -> bool { self.inner.lock().unwrap().bag.is_empty() }
}

impl SubscriptionLike for CompositeSubscription {
  fn unsubscribe(&mut self) {
    // Detach the whole bag under the lock, release outside it; a member
    // calling back into insert/remove during teardown sees an already
    // closed composite instead of a half-drained bag.
    let members = {
      let mut inner = self.inner.lock().unwrap();
      if inner.closed {
        return;
      }
      inner.closed = true;
      inner.bag.drain()
    };
    for mut member in members {
      member.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.inner.lock().unwrap().closed }
}

// ============================================================================
// SubscriptionGuard - RAII unsubscribe
// ============================================================================

/// An RAII wrapper: when the guard is dropped, the subscription is released.
///
/// If you don't assign the guard to a variable it is dropped immediately,
/// which is probably not what you want.
#[must_use]
pub struct SubscriptionGuard<T: SubscriptionLike>(pub(crate) T);

impl<T: SubscriptionLike> SubscriptionGuard<T> {
  pub fn new(subscription: T) -> Self { SubscriptionGuard(subscription) }
}

impl<T: SubscriptionLike> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}
