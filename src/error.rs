//! The error value carried on the `error` channel.
//!
//! Every subscription terminates with at most one error. Errors are cheap to
//! clone because subjects and `retry`/`catch_error` may deliver the same
//! error value to many observers.

use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// The error type delivered through an observable's `error` channel.
///
/// A timeout is the only failure the framework raises by itself; everything
/// else wraps a caller-supplied error. The two are the same type and only
/// distinguishable by kind, so `catch_error`/`retry` treat them uniformly.
#[derive(Clone)]
pub enum RxError {
  /// No event arrived before a `timeout` deadline.
  Timeout,
  /// A failure raised by a source or a user closure.
  Custom(Arc<dyn Error + Send + Sync>),
}

impl RxError {
  /// Wraps any error value.
  pub fn custom(err: impl Error + Send + Sync + 'static) -> Self {
    RxError::Custom(Arc::new(err))
  }

  /// Builds an error from a plain message.
  pub fn message(msg: impl Into<String>) -> Self {
    RxError::Custom(Arc::new(StringError(msg.into())))
  }

  #[inline]
  pub fn is_timeout(&self) -> bool { matches!(self, RxError::Timeout) }
}

impl Display for RxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      RxError::Timeout => write!(f, "timed out waiting for an event"),
      RxError::Custom(err) => Display::fmt(err, f),
    }
  }
}

impl Debug for RxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      RxError::Timeout => write!(f, "RxError::Timeout"),
      RxError::Custom(err) => write!(f, "RxError::Custom({err:?})"),
    }
  }
}

impl Error for RxError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      RxError::Timeout => None,
      RxError::Custom(err) => Some(err.as_ref()),
    }
  }
}

struct StringError(String);

impl Display for StringError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    Display::fmt(&self.0, f)
  }
}

impl Debug for StringError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    Debug::fmt(&self.0, f)
  }
}

impl Error for StringError {}
