//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Sources live under `observable::*`
pub use crate::observable;
// Core traits
pub use crate::observable::{Observable, ObservableExt};
// Observer trait and adapters
pub use crate::observer::{AllObserver, Emitter, FnMutObserver, Observer};
// Operators
pub use crate::ops::max_by::{KeyComparer, KeySelector, MaxByOp, NaturalOrder, Reversed, Total};
// Termination kernel
pub use crate::sink::{Forwarder, Sink, SinkSubscription};
// Subscription
pub use crate::subscription::*;
