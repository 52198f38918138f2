use std::sync::{Arc, Mutex};

use crate::observable::Observable;
use crate::subject::PublishSubject;
use crate::subscription::{BoxSubscription, Subscription, SubscriptionLike};

impl<Item: Clone + Send + 'static> Observable<Item> {
  /// Multicasts one upstream subscription to any number of subscribers
  /// through an internal [`PublishSubject`], refcounting them: the first
  /// subscriber triggers the single upstream subscription, later ones join
  /// the live multicast, and when the last subscriber leaves the upstream
  /// is released. A subscriber arriving after that starts a fresh cycle
  /// with a new subject.
  pub fn share(self) -> Observable<Item> {
    let state: Arc<Mutex<ShareState<Item>>> =
      Arc::new(Mutex::new(ShareState {
        subject: None,
        count: 0,
        upstream: None,
      }));
    Observable::create(move |observer| {
      let (subject, first) = {
        let mut state = state.lock().unwrap();
        let subject = match &state.subject {
          Some(subject) => subject.clone(),
          None => {
            let subject = PublishSubject::new();
            state.subject = Some(subject.clone());
            subject
          }
        };
        state.count += 1;
        (subject, state.count == 1)
      };
      // Register downstream before touching the upstream so a source that
      // emits synchronously reaches this subscriber.
      let mut registration = subject.register(observer);
      if first {
        let upstream = self.actual_subscribe(subject.observer());
        state.lock().unwrap().upstream = Some(upstream);
      }
      let state = state.clone();
      Subscription::new(move || {
        registration.unsubscribe();
        let upstream = {
          let mut state = state.lock().unwrap();
          state.count -= 1;
          if state.count == 0 {
            state.subject = None;
            state.upstream.take()
          } else {
            None
          }
        };
        if let Some(mut upstream) = upstream {
          upstream.unsubscribe();
        }
      })
      .boxed()
    })
  }
}

struct ShareState<Item> {
  subject: Option<PublishSubject<Item>>,
  count: usize,
  upstream: Option<BoxSubscription>,
}
