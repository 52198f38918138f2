//! Operator implementations. Each operator is a pure function from
//! observable to observable, built on `Observable::create`; the operator's
//! per-subscription state machine lives in a private observer struct in its
//! own file.

mod catch_error;
mod collect;
mod combine_latest;
mod concat;
mod distinct_until_changed;
mod filter;
mod finalize;
mod first;
mod flat_map;
mod last;
mod map;
mod merge;
mod observe_on;
mod reduce;
mod retry;
mod share;
mod subscribe_on;
mod tap;
mod timeout;
