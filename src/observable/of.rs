use crate::observable::Observable;
use crate::observer::Observer;
use crate::prelude::{BoxedObserver, RxError, Subscription, SubscriptionLike};

/// Emits `value` once, then completes.
///
/// ```
/// use rxlite::prelude::*;
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let probe = seen.clone();
/// observable::of(42).subscribe(move |v| probe.lock().unwrap().push(v));
/// assert_eq!(*seen.lock().unwrap(), vec![42]);
/// ```
pub fn of<Item>(value: Item) -> Observable<Item>
where
  Item: Clone + Send + Sync + 'static,
{
  Observable::create(move |mut observer: BoxedObserver<Item>| {
    observer.next(value.clone());
    observer.complete();
    Subscription::closed().boxed()
  })
}

/// Completes immediately without emitting any value.
pub fn empty<Item: Send + 'static>() -> Observable<Item> {
  Observable::create(|observer: BoxedObserver<Item>| {
    observer.complete();
    Subscription::closed().boxed()
  })
}

/// Never emits and never terminates.
pub fn never<Item: Send + 'static>() -> Observable<Item> {
  Observable::create(|_observer: BoxedObserver<Item>| {
    Subscription::empty().boxed()
  })
}

/// Fails immediately with `err` without emitting any value.
pub fn throw_err<Item: Send + 'static>(err: RxError) -> Observable<Item> {
  Observable::create(move |observer: BoxedObserver<Item>| {
    observer.error(err.clone());
    Subscription::closed().boxed()
  })
}
