//! Imports the whole public surface in one line:
//! `use rxlite::prelude::*;`

pub use crate::bag::{Bag, BagKey};
pub use crate::error::RxError;
pub use crate::observable::{self, Observable};
pub use crate::observer::{
  BoxedObserver, CallbackObserver, DynObserver, Observer, SharedObserver,
};
#[cfg(all(feature = "futures-scheduler", feature = "timer"))]
pub use crate::scheduler::ThreadPoolScheduler;
pub use crate::scheduler::{
  Duration, Instant, NewThreadScheduler, Scheduler, Task, TestScheduler,
};
pub use crate::subject::{BehaviorSubject, PublishSubject, SubjectObserver};
pub use crate::subscription::{
  BoxSubscription, CompositeSubscription, SerialSubscription, Subscription,
  SubscriptionGuard, SubscriptionLike,
};
