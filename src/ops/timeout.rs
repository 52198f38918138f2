use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::RxError;
use crate::observable::Observable;
use crate::observer::{Observer, SharedObserver};
use crate::scheduler::{Duration, Scheduler};
use crate::subscription::{
  CompositeSubscription, SerialSubscription, Subscription, SubscriptionLike,
};

impl<Item: Send + 'static> Observable<Item> {
  /// Fails the subscription with [`RxError::Timeout`] if the source stays
  /// silent for `duration` after subscribing. The deadline is absolute —
  /// it is never rescheduled — and the first event of any kind disarms it
  /// permanently. External release before the deadline never surfaces the
  /// moot timeout error.
  pub fn timeout<S>(self, duration: Duration, scheduler: S) -> Observable<Item>
  where
    S: Scheduler + Send + Sync + 'static,
  {
    let scheduler = Arc::new(scheduler);
    Observable::create(move |observer| {
      let shared = SharedObserver::new(observer);
      let armed = Arc::new(AtomicBool::new(true));
      let upstream = SerialSubscription::default();
      let handle = CompositeSubscription::default();
      // The latch closes before anything else on external release, so a
      // timeout task already queued on the scheduler delivers into a
      // closed observer instead of reaching the caller.
      let silenced = shared.clone();
      handle.insert(Subscription::new(move || silenced.close()));
      let fire_armed = armed.clone();
      let fire_upstream = upstream.clone();
      let fire_shared = shared.clone();
      let timer = scheduler.schedule_after(
        duration,
        Box::new(move || {
          if fire_armed.swap(false, Ordering::SeqCst) {
            fire_upstream.clone().unsubscribe();
            fire_shared.error(RxError::Timeout);
          }
        }),
      );
      handle.insert(timer.clone());
      upstream.set(self.actual_subscribe(TimeoutObserver {
        shared,
        armed,
        timer,
      }));
      handle.insert(upstream.clone());
      handle.boxed()
    })
  }
}

struct TimeoutObserver<Item> {
  shared: SharedObserver<Item>,
  armed: Arc<AtomicBool>,
  timer: Subscription,
}

impl<Item> TimeoutObserver<Item> {
  fn disarm(armed: &AtomicBool, timer: &mut Subscription) {
    if armed.swap(false, Ordering::SeqCst) {
      timer.unsubscribe();
    }
  }
}

impl<Item: Send + 'static> Observer<Item> for TimeoutObserver<Item> {
  fn next(&mut self, value: Item) {
    Self::disarm(&self.armed, &mut self.timer);
    self.shared.next(value);
  }

  fn error(self, err: RxError) {
    let TimeoutObserver {
      shared,
      armed,
      mut timer,
    } = self;
    Self::disarm(&armed, &mut timer);
    shared.error(err);
  }

  fn complete(self) {
    let TimeoutObserver {
      shared,
      armed,
      mut timer,
    } = self;
    Self::disarm(&armed, &mut timer);
    shared.complete();
  }

  fn is_closed(&self) -> bool { self.shared.is_closed() }
}
