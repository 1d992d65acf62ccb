use std::marker::PhantomData;

use crate::prelude::*;

/// Creates an observable from a function that drives an [`Emitter`].
///
/// The function runs on every subscription and returns the handle that
/// releases whatever it set up. Notifications sent after a terminal one, or
/// after the observer closed, are dropped.
///
/// # Examples
///
/// ```
/// use rxsink::prelude::*;
///
/// let mut values = vec![];
/// observable::create(|emitter: &mut dyn Emitter<i32, String>| {
///   emitter.next(1);
///   emitter.next(2);
///   emitter.complete();
/// })
/// .subscribe_all(|v| values.push(v), |_| {}, || {});
///
/// assert_eq!(values, vec![1, 2]);
/// ```
pub fn create<F, Item, Err, U>(f: F) -> Create<F, Item, Err>
where
  F: FnOnce(&mut dyn Emitter<Item, Err>) -> U,
  U: Disposable,
{
  Create { f, _marker: PhantomData }
}

/// Observable created from a function.
#[derive(Clone)]
pub struct Create<F, Item, Err> {
  f: F,
  _marker: PhantomData<fn() -> (Item, Err)>,
}

/// Wrapper to implement Emitter for Option<O>
struct CreateEmitter<O>(Option<O>);

impl<O, Item, Err> Emitter<Item, Err> for CreateEmitter<O>
where
  O: Observer<Item, Err>,
{
  #[inline]
  fn next(&mut self, value: Item) {
    if let Some(observer) = &mut self.0 {
      if !observer.is_closed() {
        observer.next(value);
      }
    }
  }

  #[inline]
  fn error(&mut self, err: Err) {
    if let Some(observer) = self.0.take() {
      observer.error(err);
    }
  }

  #[inline]
  fn complete(&mut self) {
    if let Some(observer) = self.0.take() {
      observer.complete();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { Observer::<Item, Err>::is_closed(&self.0) }
}

impl<F, Item, Err, O, U> Observable<Item, Err, O> for Create<F, Item, Err>
where
  O: Observer<Item, Err>,
  F: FnOnce(&mut dyn Emitter<Item, Err>) -> U,
  U: Disposable,
{
  type Unsub = U;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let mut emitter = CreateEmitter(Some(observer));
    (self.f)(&mut emitter)
  }
}

impl<F, Item, Err> ObservableExt<Item, Err> for Create<F, Item, Err> {}

#[cfg(test)]
mod tests {
  use crate::prelude::*;

  #[test]
  fn test_create_next_complete() {
    let mut emitted = vec![];
    let mut completed = false;

    observable::create(|emitter: &mut dyn Emitter<i32, ()>| {
      emitter.next(1);
      emitter.next(2);
      emitter.complete();
      emitter.next(3);
    })
    .subscribe_all(|v| emitted.push(v), |_| {}, || completed = true);

    assert_eq!(emitted, vec![1, 2]);
    assert!(completed);
  }

  #[test]
  fn test_create_error_is_terminal() {
    let mut emitted = vec![];
    let mut error = None;
    let mut completed = false;

    observable::create(|emitter: &mut dyn Emitter<i32, &str>| {
      emitter.next(1);
      emitter.error("oops");
      emitter.complete();
    })
    .subscribe_all(|v| emitted.push(v), |e| error = Some(e), || completed = true);

    assert_eq!(emitted, vec![1]);
    assert_eq!(error, Some("oops"));
    assert!(!completed);
  }

  #[test]
  fn test_create_returns_teardown() {
    let teardown = BooleanDisposable::new();
    let handle = teardown.clone();
    let subscription = observable::create(move |_: &mut dyn Emitter<i32, ()>| handle)
      .subscribe_all(|_| {}, |_| {}, || {});

    assert!(!teardown.is_disposed());
    subscription.dispose();
    assert!(teardown.is_disposed());
  }
}
