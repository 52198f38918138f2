use crate::observable::Observable;
use crate::observer::Observer;
use crate::prelude::{BoxedObserver, Subscription, SubscriptionLike};

/// Emits every item of `iter` in order, then completes.
///
/// The iterable is cloned per subscription, so each subscriber observes the
/// full sequence from the start. Emission stops early when the observer
/// reports itself closed (e.g. downstream took its first value and left).
///
/// ```
/// use rxlite::prelude::*;
/// use std::sync::{Arc, Mutex};
///
/// let sum = Arc::new(Mutex::new(0));
/// let probe = sum.clone();
/// observable::from_iter(0..5).subscribe(move |v| *probe.lock().unwrap() += v);
/// assert_eq!(*sum.lock().unwrap(), 10);
/// ```
pub fn from_iter<I>(iter: I) -> Observable<I::Item>
where
  I: IntoIterator + Clone + Send + Sync + 'static,
  I::Item: Send + 'static,
{
  Observable::create(move |mut observer: BoxedObserver<I::Item>| {
    for value in iter.clone() {
      if observer.is_closed() {
        break;
      }
      observer.next(value);
    }
    if !observer.is_closed() {
      observer.complete();
    }
    Subscription::closed().boxed()
  })
}
