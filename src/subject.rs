//! Hot multicast subjects: entities that are both an observer (a sink fed
//! by a source, via [`SubjectObserver`]) and an observable (a source for
//! many subscribers).

use crate::error::RxError;

mod behavior_subject;
mod publish_subject;

pub use behavior_subject::BehaviorSubject;
pub use publish_subject::PublishSubject;

/// The observer-side view of a subject, obtained from its `observer()`
/// method and handed to `actual_subscribe` when the subject is fed from an
/// upstream source.
///
/// `Observer`'s terminal methods consume their receiver; routing them
/// through this view consumes only the view, so the subject handle itself
/// stays usable (and shareable) after the upstream terminates.
pub struct SubjectObserver<S> {
  pub(crate) subject: S,
}

/// Lifecycle of a subject. Once terminal, further events are no-ops and new
/// subscriptions register nothing.
#[derive(Clone, Debug)]
pub(crate) enum SubjectState {
  Running,
  Completed,
  Failed(RxError),
}

impl SubjectState {
  #[inline]
  pub(crate) fn is_running(&self) -> bool {
    matches!(self, SubjectState::Running)
  }
}
