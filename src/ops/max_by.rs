//! Running maximum-by-key with ties.
//!
//! The reducer keeps the key of the current leader and every item whose key
//! compares equal to it. A strictly greater key resets the buffer; a smaller
//! one is dropped. The buffer is emitted once, on completion, followed by the
//! completion itself. On failure nothing but the error reaches downstream.

use std::{cmp::Ordering, marker::PhantomData};

use smallvec::SmallVec;

use crate::{
  prelude::*,
  sink::{Sink, SinkSubscription},
  subscription::{IntoBoxedDisposable, SingleAssignment},
};

/// Extracts the comparison key of an item.
pub trait KeySelector<Item, Key, Err> {
  fn select_key(&mut self, item: &Item) -> Result<Key, Err>;
}

impl<F, Item, Key, Err> KeySelector<Item, Key, Err> for F
where
  F: FnMut(&Item) -> Result<Key, Err>,
{
  #[inline]
  fn select_key(&mut self, item: &Item) -> Result<Key, Err> { self(item) }
}

/// Orders a freshly selected key against the current leader.
pub trait KeyComparer<Key, Err> {
  fn compare(&mut self, key: &Key, leader: &Key) -> Result<Ordering, Err>;
}

impl<F, Key, Err> KeyComparer<Key, Err> for F
where
  F: FnMut(&Key, &Key) -> Result<Ordering, Err>,
{
  #[inline]
  fn compare(&mut self, key: &Key, leader: &Key) -> Result<Ordering, Err> { self(key, leader) }
}

/// Adapts a callable that cannot fail.
#[derive(Clone)]
pub struct Total<F>(pub F);

impl<F, Item, Key, Err> KeySelector<Item, Key, Err> for Total<F>
where
  F: FnMut(&Item) -> Key,
{
  #[inline]
  fn select_key(&mut self, item: &Item) -> Result<Key, Err> { Ok((self.0)(item)) }
}

impl<F, Key, Err> KeyComparer<Key, Err> for Total<F>
where
  F: FnMut(&Key, &Key) -> Ordering,
{
  #[inline]
  fn compare(&mut self, key: &Key, leader: &Key) -> Result<Ordering, Err> {
    Ok((self.0)(key, leader))
  }
}

/// Compares keys by their `Ord` implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalOrder;

impl<Key: Ord, Err> KeyComparer<Key, Err> for NaturalOrder {
  #[inline]
  fn compare(&mut self, key: &Key, leader: &Key) -> Result<Ordering, Err> { Ok(key.cmp(leader)) }
}

/// Flips a comparer, turning the maximum reducer into a minimum one.
#[derive(Clone, Copy, Debug, Default)]
pub struct Reversed<C>(pub C);

impl<C, Key, Err> KeyComparer<Key, Err> for Reversed<C>
where
  C: KeyComparer<Key, Err>,
{
  #[inline]
  fn compare(&mut self, key: &Key, leader: &Key) -> Result<Ordering, Err> {
    self.0.compare(leader, key)
  }
}

#[derive(Clone)]
pub struct MaxByOp<S, KF, CF, Key> {
  source: S,
  key_selector: KF,
  comparer: CF,
  _key: PhantomData<fn() -> Key>,
}

impl<S, KF, CF, Key> MaxByOp<S, KF, CF, Key> {
  #[inline]
  pub(crate) fn new(source: S, key_selector: KF, comparer: CF) -> Self {
    MaxByOp { source, key_selector, comparer, _key: PhantomData }
  }
}

impl<Item, Err, O, S, KF, CF, Key> Observable<Vec<Item>, Err, O> for MaxByOp<S, KF, CF, Key>
where
  O: Observer<Vec<Item>, Err>,
  S: Observable<Item, Err, MaxByObserver<O, KF, CF, Item, Key>>,
  S::Unsub: Send + 'static,
  KF: KeySelector<Item, Key, Err>,
  CF: KeyComparer<Key, Err>,
{
  type Unsub = SinkSubscription<O>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    // The source may run to completion inside `actual_subscribe`, before its
    // handle exists. The cell releases a late handle on arrival.
    let upstream = SingleAssignment::new();
    let sink = Sink::new(observer, upstream.clone());
    let subscription = sink.subscription();

    let reducer = MaxByObserver {
      sink,
      key_selector: self.key_selector,
      comparer: self.comparer,
      leader: None,
      accumulated: SmallVec::new(),
    };
    upstream.set(self.source.actual_subscribe(reducer).into_boxed());
    subscription
  }
}

impl<Item, Err, S, KF, CF, Key> ObservableExt<Vec<Item>, Err> for MaxByOp<S, KF, CF, Key> where
  S: ObservableExt<Item, Err>
{
}

/// Per-subscription state of the max-by reducer.
pub struct MaxByObserver<O, KF, CF, Item, Key> {
  sink: Sink<O>,
  key_selector: KF,
  comparer: CF,
  leader: Option<Key>,
  accumulated: SmallVec<[Item; 1]>,
}

impl<O, KF, CF, Item, Key> MaxByObserver<O, KF, CF, Item, Key> {
  fn accumulate<Err>(&mut self, value: Item) -> Result<(), Err>
  where
    KF: KeySelector<Item, Key, Err>,
    CF: KeyComparer<Key, Err>,
  {
    let key = self.key_selector.select_key(&value)?;
    let ordering = match self.leader.as_ref() {
      // The first item leads on its own.
      None => Ordering::Equal,
      Some(leader) => self.comparer.compare(&key, leader)?,
    };

    match ordering {
      Ordering::Greater => {
        self.leader = Some(key);
        self.accumulated.clear();
        self.accumulated.push(value);
      }
      Ordering::Equal => {
        if self.leader.is_none() {
          self.leader = Some(key);
        }
        self.accumulated.push(value);
      }
      Ordering::Less => {}
    }
    Ok(())
  }
}

impl<O, KF, CF, Item, Key, Err> Observer<Item, Err> for MaxByObserver<O, KF, CF, Item, Key>
where
  O: Observer<Vec<Item>, Err>,
  KF: KeySelector<Item, Key, Err>,
  CF: KeyComparer<Key, Err>,
{
  fn next(&mut self, value: Item) {
    if self.sink.is_disposed() {
      return;
    }
    if let Some(err) = self.accumulate(value).err() {
      tracing::debug!("max_by key selector or comparer failed, terminating");
      self.accumulated = SmallVec::new();
      self.leader = None;
      self.sink.error_downstream::<Vec<Item>, Err>(err);
      self.sink.dispose();
    }
  }

  fn error(self, err: Err) {
    self.sink.error_downstream::<Vec<Item>, Err>(err);
    self.sink.dispose();
  }

  fn complete(self) {
    let MaxByObserver { sink, accumulated, .. } = self;
    sink.next_downstream::<Vec<Item>, Err>(accumulated.into_vec());
    sink.complete_downstream::<Vec<Item>, Err>();
    sink.dispose();
  }

  #[inline]
  fn is_closed(&self) -> bool { self.sink.is_disposed() }
}
