//! Disposable trait and the handles built on it
//!
//! A disposable releases the resources behind a subscription. Every
//! implementation in this crate is idempotent and may be disposed from several
//! threads at once: the first effective call does the work, later calls are
//! no-ops.

use std::{
  fmt::{Debug, Formatter},
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
  },
};

mod boxed;
mod single_assignment;

pub use boxed::*;
pub use single_assignment::*;

/// Handle returned from `Observable::actual_subscribe` that lets the caller
/// cancel the stream before it terminates on its own.
pub trait Disposable {
  /// Releases the underlying resource. Calling it more than once, or from
  /// several threads concurrently, has the effect of a single call.
  fn dispose(&self);

  fn is_disposed(&self) -> bool;
}

/// The unit handle owns nothing, there is nothing to release.
impl Disposable for () {
  #[inline]
  fn dispose(&self) {}

  #[inline]
  fn is_disposed(&self) -> bool { true }
}

impl<T: ?Sized + Disposable> Disposable for Box<T> {
  #[inline]
  fn dispose(&self) { (**self).dispose() }

  #[inline]
  fn is_disposed(&self) -> bool { (**self).is_disposed() }
}

impl<T: ?Sized + Disposable> Disposable for Arc<T> {
  #[inline]
  fn dispose(&self) { (**self).dispose() }

  #[inline]
  fn is_disposed(&self) -> bool { (**self).is_disposed() }
}

impl<T: Disposable> Disposable for Option<T> {
  fn dispose(&self) {
    if let Some(inner) = self {
      inner.dispose();
    }
  }

  fn is_disposed(&self) -> bool { self.as_ref().map_or(true, Disposable::is_disposed) }
}

/// Locks `mutex`, recovering the guard if a panicking holder poisoned it.
///
/// Disposal must never fail observably, so a poisoned lock is treated like a
/// healthy one.
#[inline]
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
  mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// BooleanDisposable
// ============================================================================

/// A disposable that only records whether it has been disposed.
#[derive(Clone, Debug, Default)]
pub struct BooleanDisposable(Arc<AtomicBool>);

impl BooleanDisposable {
  pub fn new() -> Self { Self::default() }
}

impl Disposable for BooleanDisposable {
  #[inline]
  fn dispose(&self) { self.0.store(true, Ordering::Release); }

  #[inline]
  fn is_disposed(&self) -> bool { self.0.load(Ordering::Acquire) }
}

// ============================================================================
// ClosureDisposable
// ============================================================================

/// Runs a teardown closure the first time it is disposed.
pub struct ClosureDisposable<F>(Mutex<Option<F>>);

impl<F: FnOnce()> ClosureDisposable<F> {
  pub fn new(teardown: F) -> Self { Self(Mutex::new(Some(teardown))) }
}

impl<F: FnOnce()> Disposable for ClosureDisposable<F> {
  fn dispose(&self) {
    // Release the lock before running user code.
    let teardown = lock(&self.0).take();
    if let Some(teardown) = teardown {
      teardown();
    }
  }

  fn is_disposed(&self) -> bool { lock(&self.0).is_none() }
}

impl<F> Debug for ClosureDisposable<F> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ClosureDisposable")
      .field("is_disposed", &lock(&self.0).is_none())
      .finish()
  }
}

// ============================================================================
// SubscriptionWrapper / DisposeGuard
// ============================================================================

/// Wrapper around a subscription which provides the
/// `dispose_when_dropped()` method.
#[derive(Debug)]
pub struct SubscriptionWrapper<T: Disposable>(pub(crate) T);

impl<T: Disposable> SubscriptionWrapper<T> {
  /// Activates "RAII" behavior for this subscription. That means `dispose()`
  /// will be called automatically as soon as the returned value goes out of
  /// scope.
  ///
  /// **Attention:** If you don't assign the return value to a variable,
  /// `dispose()` is called immediately, which is probably not what you want!
  pub fn dispose_when_dropped(self) -> DisposeGuard<T> { DisposeGuard(self.0) }

  /// Consumes this wrapper and returns the underlying subscription.
  pub fn into_inner(self) -> T { self.0 }
}

impl<T: Disposable> Disposable for SubscriptionWrapper<T> {
  #[inline]
  fn dispose(&self) { self.0.dispose() }

  #[inline]
  fn is_disposed(&self) -> bool { self.0.is_disposed() }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription is
/// disposed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[derive(Debug)]
#[must_use]
pub struct DisposeGuard<T: Disposable>(pub(crate) T);

impl<T: Disposable> DisposeGuard<T> {
  /// Wraps an existing subscription with a guard to enable RAII behavior for
  /// it.
  pub fn new(subscription: T) -> DisposeGuard<T> { DisposeGuard(subscription) }
}

impl<T: Disposable> Drop for DisposeGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.dispose() }
}
