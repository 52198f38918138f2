//! Observer trait and the type-erased observer values operators are built
//! from.
//!
//! An observer receives values, at most one terminal event, and nothing
//! afterwards. The terminal methods consume the observer, so delivering a
//! second terminal event to the same observer is a compile error rather than
//! a runtime bug.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::RxError;

// ============================================================================
// Observer trait
// ============================================================================

/// The consumer of data in the reactive pattern.
pub trait Observer<Item> {
  /// Receive the next value.
  fn next(&mut self, value: Item);

  /// Receive the failure terminal event. Consumes the observer; no events
  /// may follow.
  fn error(self, err: RxError);

  /// Receive the completion terminal event. Consumes the observer; no
  /// events may follow.
  fn complete(self);

  /// `true` once the observer will not accept more values. Pull-style
  /// sources (like `from_iter`) use this to stop emitting early.
  fn is_closed(&self) -> bool;
}

// ============================================================================
// DynObserver - object-safe mirror
// ============================================================================

/// Object-safe mirror of [`Observer`]. The standard trait is not object
/// safe because terminal methods take `self` by value; this adapts them to
/// `Box<Self>` receivers for vtable dispatch.
pub trait DynObserver<Item> {
  fn box_next(&mut self, value: Item);
  fn box_error(self: Box<Self>, err: RxError);
  fn box_complete(self: Box<Self>);
  fn box_is_closed(&self) -> bool;
}

impl<T, Item> DynObserver<Item> for T
where
  T: Observer<Item>,
{
  fn box_next(&mut self, value: Item) { self.next(value); }

  fn box_error(self: Box<Self>, err: RxError) { (*self).error(err); }

  fn box_complete(self: Box<Self>) { (*self).complete(); }

  fn box_is_closed(&self) -> bool { self.is_closed() }
}

/// The erased observer every `Observable` subscribe function receives.
pub type BoxedObserver<Item> = Box<dyn DynObserver<Item> + Send>;

impl<Item> Observer<Item> for BoxedObserver<Item> {
  #[inline]
  fn next(&mut self, value: Item) { (**self).box_next(value) }

  #[inline]
  fn error(self, err: RxError) { self.box_error(err) }

  #[inline]
  fn complete(self) { self.box_complete() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).box_is_closed() }
}

// ============================================================================
// CallbackObserver - erased record of optional callbacks
// ============================================================================

/// Adapts an ad-hoc set of callbacks into the [`Observer`] capability.
/// Missing callbacks are no-ops, so operators never need one concrete type
/// per combination of supplied handlers.
pub struct CallbackObserver<Item> {
  on_next: Option<Box<dyn FnMut(Item) + Send>>,
  on_error: Option<Box<dyn FnOnce(RxError) + Send>>,
  on_complete: Option<Box<dyn FnOnce() + Send>>,
}

impl<Item> Default for CallbackObserver<Item> {
  fn default() -> Self {
    CallbackObserver {
      on_next: None,
      on_error: None,
      on_complete: None,
    }
  }
}

impl<Item> CallbackObserver<Item> {
  pub fn on_next(mut self, f: impl FnMut(Item) + Send + 'static) -> Self {
    self.on_next = Some(Box::new(f));
    self
  }

  pub fn on_error(mut self, f: impl FnOnce(RxError) + Send + 'static) -> Self {
    self.on_error = Some(Box::new(f));
    self
  }

  pub fn on_complete(mut self, f: impl FnOnce() + Send + 'static) -> Self {
    self.on_complete = Some(Box::new(f));
    self
  }
}

impl<Item> Observer<Item> for CallbackObserver<Item> {
  fn next(&mut self, value: Item) {
    if let Some(f) = self.on_next.as_mut() {
      f(value);
    }
  }

  fn error(self, err: RxError) {
    if let Some(f) = self.on_error {
      f(err);
    }
  }

  fn complete(self) {
    if let Some(f) = self.on_complete {
      f();
    }
  }

  fn is_closed(&self) -> bool { false }
}

// ============================================================================
// SharedObserver - terminal-latching shared handle
// ============================================================================

/// A clonable handle over one downstream observer, used wherever several
/// callbacks or sources feed the same observer (merge, flat_map, timeout,
/// subjects).
///
/// Events are queued per latch and drained by whichever frame holds the
/// `driving` flag: a callback that synchronously feeds an event back into
/// its own latch only enqueues it and returns, and the frame already
/// delivering picks it up next. That keeps reentrant `next`/terminal calls
/// from relocking the observer slot on the same thread.
///
/// The terminal gate is an atomic flag flipped when the terminal event is
/// queued, so exactly one terminal event is ever delivered no matter how
/// many clones race. [`close`](Self::close) additionally silences the
/// queue, so events already queued (e.g. by a timeout task) cannot reach
/// the observer afterwards.
pub struct SharedObserver<Item> {
  latch: Arc<Latch<Item>>,
}

struct Latch<Item> {
  slot: Mutex<Option<BoxedObserver<Item>>>,
  queue: Mutex<VecDeque<Queued<Item>>>,
  driving: AtomicBool,
  // No further events are accepted once set.
  gate_closed: AtomicBool,
  // Events already queued are dropped instead of delivered once set.
  silenced: AtomicBool,
}

enum Queued<Item> {
  Value(Item),
  Failed(RxError),
  Completed,
}

impl<Item> Clone for SharedObserver<Item> {
  fn clone(&self) -> Self {
    SharedObserver {
      latch: self.latch.clone(),
    }
  }
}

impl<Item> SharedObserver<Item> {
  pub fn new(observer: BoxedObserver<Item>) -> Self {
    SharedObserver {
      latch: Arc::new(Latch {
        slot: Mutex::new(Some(observer)),
        queue: Mutex::new(VecDeque::new()),
        driving: AtomicBool::new(false),
        gate_closed: AtomicBool::new(false),
        silenced: AtomicBool::new(false),
      }),
    }
  }

  /// Silently closes the latch without delivering a terminal event. Used by
  /// external disposal; queued events are discarded.
  pub fn close(&self) {
    self.latch.gate_closed.store(true, Ordering::SeqCst);
    self.latch.silenced.store(true, Ordering::SeqCst);
    self.latch.queue.lock().unwrap().clear();
    // Best effort: free the callbacks now if no delivery is in flight;
    // otherwise the driving frame drops them on its way out.
    if let Ok(mut slot) = self.latch.slot.try_lock() {
      slot.take();
    }
  }

  /// Queues a value without driving delivery. Subjects use this to order a
  /// replayed value ahead of racing broadcasts while still holding their
  /// registry lock; everyone else goes through [`Observer::next`].
  pub(crate) fn push(&self, value: Item) {
    if self.latch.gate_closed.load(Ordering::SeqCst) {
      return;
    }
    self.latch.queue.lock().unwrap().push_back(Queued::Value(value));
  }

  /// Drains the queue in FIFO order. At most one frame drives at a time; a
  /// reentrant call returns immediately and leaves its event to the frame
  /// already in this loop.
  pub(crate) fn drive(&self) {
    if self.latch.driving.swap(true, Ordering::SeqCst) {
      return;
    }
    loop {
      let queued = self.latch.queue.lock().unwrap().pop_front();
      let Some(queued) = queued else {
        self.latch.driving.store(false, Ordering::SeqCst);
        // An event enqueued between the empty pop and clearing the flag
        // would otherwise be stranded; whoever wins the re-swap drives it.
        if self.latch.queue.lock().unwrap().is_empty()
          || self.latch.driving.swap(true, Ordering::SeqCst)
        {
          return;
        }
        continue;
      };
      if self.latch.silenced.load(Ordering::SeqCst) {
        if let Ok(mut slot) = self.latch.slot.try_lock() {
          slot.take();
        }
        continue;
      }
      match queued {
        Queued::Value(value) => {
          let mut slot = self.latch.slot.lock().unwrap();
          if let Some(observer) = slot.as_mut() {
            observer.box_next(value);
          }
        }
        Queued::Failed(err) => {
          let observer = self.latch.slot.lock().unwrap().take();
          if let Some(observer) = observer {
            observer.box_error(err);
          }
        }
        Queued::Completed => {
          let observer = self.latch.slot.lock().unwrap().take();
          if let Some(observer) = observer {
            observer.box_complete();
          }
        }
      }
    }
  }
}

impl<Item> Observer<Item> for SharedObserver<Item> {
  fn next(&mut self, value: Item) {
    self.push(value);
    self.drive();
  }

  fn error(self, err: RxError) {
    if self.latch.gate_closed.swap(true, Ordering::SeqCst) {
      return;
    }
    self.latch.queue.lock().unwrap().push_back(Queued::Failed(err));
    self.drive();
  }

  fn complete(self) {
    if self.latch.gate_closed.swap(true, Ordering::SeqCst) {
      return;
    }
    self.latch.queue.lock().unwrap().push_back(Queued::Completed);
    self.drive();
  }

  fn is_closed(&self) -> bool {
    if self.latch.gate_closed.load(Ordering::SeqCst) {
      return true;
    }
    // try_lock so a probe from inside a delivery in flight cannot
    // self-deadlock; a contended slot is by definition still open.
    match self.latch.slot.try_lock() {
      Ok(slot) => match slot.as_ref() {
        Some(observer) => observer.box_is_closed(),
        None => true,
      },
      Err(_) => false,
    }
  }
}
