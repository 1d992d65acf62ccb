use std::marker::PhantomData;

use crate::prelude::*;

/// Creates an observable that emits no items, just terminates with an error.
///
/// # Arguments
///
/// * `e` - An error to emit and terminate with
pub fn throw<Item, Err>(e: Err) -> Throw<Item, Err> { Throw(e, PhantomData) }

#[derive(Clone)]
pub struct Throw<Item, Err>(Err, PhantomData<fn() -> Item>);

impl<Item, Err, O> Observable<Item, Err, O> for Throw<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = ();

  fn actual_subscribe(self, observer: O) -> Self::Unsub { observer.error(self.0) }
}

impl<Item, Err> ObservableExt<Item, Err> for Throw<Item, Err> {}

/// Creates an observable that never emits anything and never terminates.
///
/// The returned subscription reports when it has been disposed, which makes
/// it a convenient upstream for cancellation tests.
pub fn never<Item, Err>() -> Never<Item, Err> { Never(PhantomData) }

pub struct Never<Item, Err>(PhantomData<fn() -> (Item, Err)>);

impl<Item, Err> Clone for Never<Item, Err> {
  fn clone(&self) -> Self { Never(PhantomData) }
}

impl<Item, Err, O> Observable<Item, Err, O> for Never<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = BooleanDisposable;

  fn actual_subscribe(self, _observer: O) -> Self::Unsub { BooleanDisposable::new() }
}

impl<Item, Err> ObservableExt<Item, Err> for Never<Item, Err> {}
