use std::fmt::{Debug, Formatter};

use super::Disposable;

/// A type-erased disposable that can cross thread boundaries.
///
/// The sink keeps its upstream handle in this form, so one sink type serves
/// every producer regardless of the concrete subscription it returns.
///
/// # Why `'static`?
///
/// Subscriptions are **control handles**, not data views. They are stored,
/// moved and disposed at an arbitrary later time, possibly from another
/// thread, so they must own everything they release.
///
/// # Examples
///
/// ```rust
/// use rxsink::prelude::*;
///
/// let flag = BooleanDisposable::new();
/// let subs: Vec<BoxedDisposable> =
///   vec![BoxedDisposable::new(flag.clone()), BoxedDisposable::new(())];
///
/// for sub in &subs {
///   sub.dispose();
/// }
/// assert!(flag.is_disposed());
/// ```
pub struct BoxedDisposable(Box<dyn Disposable + Send>);

impl BoxedDisposable {
  #[inline]
  pub fn new(disposable: impl Disposable + Send + 'static) -> Self { Self(Box::new(disposable)) }
}

impl Disposable for BoxedDisposable {
  #[inline]
  fn dispose(&self) { self.0.dispose() }

  #[inline]
  fn is_disposed(&self) -> bool { self.0.is_disposed() }
}

impl Debug for BoxedDisposable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BoxedDisposable")
      .field("is_disposed", &self.is_disposed())
      .finish()
  }
}

/// Conversion of any sendable disposable into a [`BoxedDisposable`].
pub trait IntoBoxedDisposable {
  fn into_boxed(self) -> BoxedDisposable;
}

impl<T: Disposable + Send + 'static> IntoBoxedDisposable for T {
  #[inline]
  fn into_boxed(self) -> BoxedDisposable { BoxedDisposable::new(self) }
}
