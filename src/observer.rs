//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the push model. It
//! provides three methods: next (for values), error (for failures), and
//! complete (for stream completion). A stream delivers `next*` followed by at
//! most one terminal call.

use std::convert::Infallible;

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: The consumer of data in reactive programming
///
/// An Observer receives values, errors, and completion notifications from
/// an Observable.
pub trait Observer<Item, Err> {
  /// Receive the next value from the observable
  fn next(&mut self, value: Item);

  /// Handle an error from the observable
  ///
  /// This consumes the observer, as no more values can be emitted after an
  /// error
  fn error(self, err: Err);

  /// Handle completion of the observable
  ///
  /// This consumes the observer, as no more values can be emitted after
  /// completion
  fn complete(self);

  /// Returns `true` if the observer is closed and will not accept more values.
  ///
  /// Sources such as `from_iter` check this to stop emitting early once the
  /// subscription has been disposed downstream.
  fn is_closed(&self) -> bool;
}

// ============================================================================
// Emitter Trait
// ============================================================================

/// A trait for emitting items to an Observer via mutable reference.
///
/// Unlike `Observer`, which consumes `self` for `error` and `complete`,
/// `Emitter` takes `&mut self` for all methods so that the closure given to
/// [`create`](crate::observable::create) can work with `&mut dyn Emitter`
/// without knowing the concrete observer type down the chain.
///
/// Calls made after a terminal notification are ignored.
pub trait Emitter<Item, Err> {
  fn next(&mut self, value: Item);
  fn error(&mut self, err: Err);
  fn complete(&mut self);
  fn is_closed(&self) -> bool;
}

// ============================================================================
// FnMutObserver - Closure adapter
// ============================================================================

/// Closure adapter for streams that can never fail.
///
/// This enables ergonomic subscription syntax: `observable.subscribe(|v|
/// println!("{}", v))`. The closure becomes the `next` handler, and completion
/// is ignored.
#[derive(Clone)]
pub struct FnMutObserver<F>(pub F);

impl<F, Item> Observer<Item, Infallible> for FnMutObserver<F>
where
  F: FnMut(Item),
{
  #[inline]
  fn next(&mut self, v: Item) { (self.0)(v); }

  #[inline]
  fn error(self, err: Infallible) { match err {} }

  #[inline]
  fn complete(self) {}

  #[inline]
  fn is_closed(&self) -> bool { false }
}

// ============================================================================
// AllObserver - one closure per notification kind
// ============================================================================

/// Observer built from three closures, one per notification kind.
#[derive(Clone)]
pub struct AllObserver<N, E, C> {
  next: N,
  error: E,
  complete: C,
}

impl<N, E, C> AllObserver<N, E, C> {
  pub fn new(next: N, error: E, complete: C) -> Self { Self { next, error, complete } }
}

impl<N, E, C, Item, Err> Observer<Item, Err> for AllObserver<N, E, C>
where
  N: FnMut(Item),
  E: FnOnce(Err),
  C: FnOnce(),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value); }

  #[inline]
  fn error(self, err: Err) { (self.error)(err); }

  #[inline]
  fn complete(self) { (self.complete)(); }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

// ============================================================================
// Option<O> - the no-op sentinel
// ============================================================================

/// `None` absorbs every notification silently, `Some` delegates to the inner
/// observer. `create` keeps its observer in this shape, so taking it out on a
/// terminal call leaves a closed, silent observer behind.
impl<O, Item, Err> Observer<Item, Err> for Option<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(inner) = self {
      inner.next(value);
    }
  }

  fn error(self, err: Err) {
    if let Some(inner) = self {
      inner.error(err);
    }
  }

  fn complete(self) {
    if let Some(inner) = self {
      inner.complete();
    }
  }

  fn is_closed(&self) -> bool { self.as_ref().map_or(true, |inner| inner.is_closed()) }
}

// ============================================================================
// Tests
// ============================================================================
