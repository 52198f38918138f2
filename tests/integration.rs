//! End-to-end tests over whole operator chains: disposal idempotence,
//! terminal-once, subject replay rules, multicast refcounting and the
//! virtual-time behavior of `timeout`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rxlite::prelude::*;

type Log = Arc<Mutex<Vec<String>>>;

fn record<Item: std::fmt::Debug + Send + 'static>(
  log: &Log,
  source: &Observable<Item>,
) -> CompositeSubscription {
  let values = log.clone();
  let errors = log.clone();
  let completion = log.clone();
  let unsub = log.clone();
  source.subscribe_all_unsub(
    move |v| values.lock().unwrap().push(format!("next({v:?})")),
    move |e| {
      let tag = if e.is_timeout() {
        "timeout".to_string()
      } else {
        e.to_string()
      };
      errors.lock().unwrap().push(format!("error({tag})"));
    },
    move || completion.lock().unwrap().push("complete".into()),
    move || unsub.lock().unwrap().push("disposed".into()),
  )
}

fn taken(log: &Log) -> Vec<String> { log.lock().unwrap().clone() }

#[test]
fn dispose_is_idempotent_across_the_whole_chain() {
  let released = Arc::new(AtomicUsize::new(0));
  let probe = released.clone();
  let mut sub = observable::never::<i32>()
    .map(|v| v + 1)
    .filter(|v| v % 2 == 0)
    .finalize(move || {
      probe.fetch_add(1, Ordering::SeqCst);
    })
    .subscribe(|_| {});
  for _ in 0..4 {
    sub.unsubscribe();
  }
  assert_eq!(released.load(Ordering::SeqCst), 1);
  assert!(sub.is_closed());
}

#[test]
fn no_value_is_delivered_after_a_terminal_event() {
  // A deliberately misbehaving source keeps pushing after its error.
  let source = Observable::create(|mut observer: BoxedObserver<i32>| {
    observer.next(1);
    let shared = SharedObserver::new(observer);
    shared.clone().error(RxError::message("boom"));
    shared.clone().next(2);
    shared.clone().complete();
    Subscription::closed().boxed()
  });
  let log = Arc::new(Mutex::new(Vec::new()));
  record(&log, &source.map(|v| v * 10));
  assert_eq!(taken(&log), vec!["next(10)", "error(boom)", "disposed"]);
}

#[test]
fn publish_subject_gives_late_subscribers_nothing() {
  let subject = PublishSubject::new();
  subject.next(1);
  subject.complete();
  let log = Arc::new(Mutex::new(Vec::new()));
  let sub = record(&log, &subject.observable());
  assert!(taken(&log).is_empty());
  assert!(!subject.has_observers());
  drop(sub);
}

#[test]
fn behavior_subject_replays_value_then_terminal_state() {
  let subject = BehaviorSubject::new(0);
  subject.next(3);
  let log = Arc::new(Mutex::new(Vec::new()));
  record(&log, &subject.observable());
  assert_eq!(taken(&log), vec!["next(3)"]);

  subject.error(RxError::message("down"));
  let late = Arc::new(Mutex::new(Vec::new()));
  record(&late, &subject.observable());
  assert_eq!(taken(&late), vec!["error(down)", "disposed"]);
}

#[test]
fn share_holds_exactly_one_upstream_subscription() {
  let active = Arc::new(AtomicUsize::new(0));
  let total = Arc::new(AtomicUsize::new(0));
  let active_probe = active.clone();
  let total_probe = total.clone();
  let source = Observable::create(move |observer: BoxedObserver<i32>| {
    active_probe.fetch_add(1, Ordering::SeqCst);
    total_probe.fetch_add(1, Ordering::SeqCst);
    drop(observer);
    let active_probe = active_probe.clone();
    Subscription::new(move || {
      active_probe.fetch_sub(1, Ordering::SeqCst);
    })
    .boxed()
  })
  .share();

  assert_eq!(active.load(Ordering::SeqCst), 0);
  let mut a = source.subscribe(|_| {});
  let mut b = source.subscribe(|_| {});
  assert_eq!(active.load(Ordering::SeqCst), 1);
  a.unsubscribe();
  assert_eq!(active.load(Ordering::SeqCst), 1);
  b.unsubscribe();
  assert_eq!(active.load(Ordering::SeqCst), 0);
  // A fresh subscriber restarts the multicast cycle.
  let _c = source.subscribe(|_| {});
  assert_eq!(total.load(Ordering::SeqCst), 2);
}

#[test]
fn reduce_on_an_empty_source_emits_the_seed() {
  let log = Arc::new(Mutex::new(Vec::new()));
  record(&log, &observable::empty::<i32>().reduce(10, |acc, v| acc + v));
  assert_eq!(taken(&log), vec!["next(10)", "complete", "disposed"]);
}

#[test]
fn flat_map_keeps_synchronous_order_and_propagates_inner_errors() {
  let log = Arc::new(Mutex::new(Vec::new()));
  record(
    &log,
    &observable::from_iter(vec![1, 2, 3]).flat_map(|v| observable::of(v * 2)),
  );
  assert_eq!(
    taken(&log),
    vec!["next(2)", "next(4)", "next(6)", "complete", "disposed"]
  );

  let failing = Arc::new(Mutex::new(Vec::new()));
  record(
    &failing,
    &observable::from_iter(vec![1, 2, 3]).flat_map(|v| {
      if v == 2 {
        observable::throw_err(RxError::message("inner"))
      } else {
        observable::of(v)
      }
    }),
  );
  assert_eq!(
    taken(&failing),
    vec!["next(1)", "error(inner)", "disposed"]
  );
}

#[test]
fn concat_runs_sources_strictly_in_sequence() {
  let log = Arc::new(Mutex::new(Vec::new()));
  record(
    &log,
    &observable::from_iter(vec!["1", "3"])
      .concat(observable::from_iter(vec!["2", "4"])),
  );
  assert_eq!(
    taken(&log),
    vec![
      "next(\"1\")",
      "next(\"3\")",
      "next(\"2\")",
      "next(\"4\")",
      "complete",
      "disposed"
    ]
  );
}

#[test]
fn concat_of_ten_thousand_sources_stays_on_the_stack() {
  let sources: Vec<Observable<usize>> =
    (0..10_000).map(observable::of).collect();
  let count = Arc::new(AtomicUsize::new(0));
  let probe = count.clone();
  let completed = Arc::new(AtomicUsize::new(0));
  let done = completed.clone();
  observable::from_iter(sources)
    .concat_all()
    .subscribe_complete(
      move |_| {
        probe.fetch_add(1, Ordering::SeqCst);
      },
      move || {
        done.fetch_add(1, Ordering::SeqCst);
      },
    );
  assert_eq!(count.load(Ordering::SeqCst), 10_000);
  assert_eq!(completed.load(Ordering::SeqCst), 1);
}

#[test]
fn combine_latest_follows_the_frozen_value_policy() {
  let left = PublishSubject::new();
  let right = PublishSubject::new();
  let log = Arc::new(Mutex::new(Vec::new()));
  record(
    &log,
    &left
      .observable()
      .combine_latest(right.observable(), |a: i32, b: i32| (a, b)),
  );
  left.next(1);
  assert!(taken(&log).is_empty());
  right.next(10);
  left.complete();
  right.next(20);
  right.complete();
  assert_eq!(
    taken(&log),
    vec!["next((1, 10))", "next((1, 20))", "complete", "disposed"]
  );
}

#[test]
fn timeout_fires_only_exactly_at_the_virtual_deadline() {
  let scheduler = TestScheduler::new();
  let subject = PublishSubject::new();
  let log = Arc::new(Mutex::new(Vec::new()));
  record(
    &log,
    &subject
      .observable()
      .timeout(Duration::from_secs(3), scheduler.clone()),
  );
  subject.next(0);
  log.lock().unwrap().clear();
  scheduler.advance_by(Duration::from_millis(2999));
  scheduler.advance_by(Duration::from_millis(1));
  // The early value disarmed the deadline for good.
  assert!(taken(&log).is_empty());

  let silent = PublishSubject::<i32>::new();
  let late = Arc::new(Mutex::new(Vec::new()));
  record(
    &late,
    &silent
      .observable()
      .timeout(Duration::from_secs(3), scheduler.clone()),
  );
  scheduler.advance_by(Duration::from_millis(2999));
  assert!(taken(&late).is_empty());
  scheduler.advance_by(Duration::from_millis(1));
  assert_eq!(taken(&late), vec!["error(timeout)", "disposed"]);
}

#[test]
fn timeout_stays_silent_after_external_release() {
  let scheduler = TestScheduler::new();
  let subject = PublishSubject::<i32>::new();
  let log = Arc::new(Mutex::new(Vec::new()));
  let mut sub = record(
    &log,
    &subject
      .observable()
      .timeout(Duration::from_secs(3), scheduler.clone()),
  );
  sub.unsubscribe();
  assert_eq!(taken(&log), vec!["disposed"]);
  scheduler.advance_by(Duration::from_secs(10));
  assert_eq!(taken(&log), vec!["disposed"]);
}
