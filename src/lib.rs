//! # rxsink: the termination kernel of a push-based stream library
//!
//! Producers push `next*` followed by at most one `error` or `complete` into
//! an [`Observer`]. Stateful operators sit in between, and each one has to
//! guarantee two things: downstream never sees a malformed sequence, and the
//! upstream subscription is released exactly once, however the stream ends.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxsink::prelude::*;
//!
//! let mut leaders = vec![];
//! observable::from_iter(vec![("a", 5), ("b", 9), ("c", 9), ("d", 3)])
//!   .max_by_key(|v| v.1)
//!   .subscribe(|v| leaders = v);
//!
//! assert_eq!(leaders, vec![("b", 9), ("c", 9)]);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Disposable`] | Idempotent, thread-safe release of a subscription |
//! | [`Sink`] | Pairs a downstream observer with an upstream disposable |
//! | [`Observable`] | A cold stream that starts on subscription |
//!
//! The [`Sink`] mutes its downstream and releases its upstream in one
//! `dispose()` call that may race with itself on any number of threads. The
//! max/min-by operators in [`ops::max_by`] are built on it.
//!
//! [`Observer`]: observer::Observer
//! [`Disposable`]: subscription::Disposable
//! [`Sink`]: sink::Sink
//! [`Observable`]: observable::Observable

pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod sink;
pub mod subscription;

#[cfg(test)]
mod test_util;

pub use prelude::*;
