//! A minimal push-based reactive-streams runtime: observables and
//! observers, hot multicast subjects, a pluggable scheduler capability
//! (including a virtual-time scheduler for tests), and composable
//! operators, all tied together by an explicit, idempotent disposal
//! protocol.
//!
//! ```
//! use rxlite::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let probe = seen.clone();
//! observable::from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * v)
//!   .subscribe(move |v| probe.lock().unwrap().push(v));
//! assert_eq!(*seen.lock().unwrap(), vec![0, 4, 16, 36, 64]);
//! ```

pub mod bag;
pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod scheduler;
pub mod subject;
pub mod subscription;

pub use prelude::*;
