use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::observable::Observable;
use crate::observer::{Observer, SharedObserver};
use crate::prelude::{
  BoxedObserver, CompositeSubscription, Duration, Scheduler,
  SerialSubscription, Subscription, SubscriptionLike,
};

/// Emits `0` once `due` has elapsed on `scheduler`, then completes.
/// Releasing the subscription before the deadline cancels the pending tick.
pub fn timer<S>(due: Duration, scheduler: S) -> Observable<u64>
where
  S: Scheduler + Send + Sync + 'static,
{
  let scheduler = Arc::new(scheduler);
  Observable::create(move |observer: BoxedObserver<u64>| {
    let shared = SharedObserver::new(observer);
    let tick = shared.clone();
    let pending = scheduler.schedule_after(
      due,
      Box::new(move || {
        let mut next = tick.clone();
        next.next(0);
        tick.complete();
      }),
    );
    let handle = CompositeSubscription::default();
    handle.insert(pending);
    handle.insert(Subscription::new(move || shared.close()));
    handle.boxed()
  })
}

/// Emits an increasing counter every `period`, forever, starting one period
/// after subscribe. Each tick re-arms itself through a serial holder so
/// releasing the subscription stops the chain.
pub fn interval<S>(period: Duration, scheduler: S) -> Observable<u64>
where
  S: Scheduler + Send + Sync + 'static,
{
  let scheduler: Arc<dyn Scheduler + Send + Sync> = Arc::new(scheduler);
  Observable::create(move |observer: BoxedObserver<u64>| {
    let shared = SharedObserver::new(observer);
    let serial = SerialSubscription::default();
    let count = Arc::new(AtomicU64::new(0));
    arm(&scheduler, period, &shared, &serial, &count);
    let handle = CompositeSubscription::default();
    handle.insert(serial);
    handle.insert(Subscription::new(move || shared.close()));
    handle.boxed()
  })
}

fn arm(
  scheduler: &Arc<dyn Scheduler + Send + Sync>,
  period: Duration,
  shared: &SharedObserver<u64>,
  serial: &SerialSubscription,
  count: &Arc<AtomicU64>,
) {
  let tick_scheduler = scheduler.clone();
  let tick_shared = shared.clone();
  let tick_serial = serial.clone();
  let tick_count = count.clone();
  let pending = scheduler.schedule_after(
    period,
    Box::new(move || {
      if tick_shared.is_closed() {
        return;
      }
      let mut next = tick_shared.clone();
      next.next(tick_count.fetch_add(1, Ordering::SeqCst));
      arm(&tick_scheduler, period, &tick_shared, &tick_serial, &tick_count);
    }),
  );
  serial.set(pending);
}
