//! Observable traits and the built-in sources
//!
//! An [`Observable`] is a cold description of a stream: nothing runs until
//! [`actual_subscribe`](Observable::actual_subscribe) hands it an observer.
//! [`ObservableExt`] carries the user-facing subscribe calls and operators.

use std::cmp::Ordering;

use crate::{
  observer::{AllObserver, FnMutObserver, Observer},
  ops::max_by::{MaxByOp, NaturalOrder, Reversed, Total},
  subscription::{Disposable, SubscriptionWrapper},
};

mod create;
mod from_iter;
mod trivial;

pub use create::*;
pub use from_iter::*;
pub use trivial::*;

/// A stream of `Item`s that may fail with `Err`, subscribable by `O`.
pub trait Observable<Item, Err, O> {
  /// Handle returned to the subscriber to cancel the stream.
  type Unsub: Disposable;

  /// Starts the stream, delivering every notification to `observer`.
  fn actual_subscribe(self, observer: O) -> Self::Unsub;
}

/// Subscription entry points and operators shared by every observable.
pub trait ObservableExt<Item, Err>: Sized {
  /// Invokes an execution of an Observable and registers a `next` handler.
  /// Only available on streams that can never fail.
  fn subscribe<N>(
    self, next: N,
  ) -> SubscriptionWrapper<<Self as Observable<Item, Err, FnMutObserver<N>>>::Unsub>
  where
    N: FnMut(Item),
    Self: Observable<Item, Err, FnMutObserver<N>>,
  {
    SubscriptionWrapper(self.actual_subscribe(FnMutObserver(next)))
  }

  /// Invokes an execution of an Observable and registers Observer handlers for
  /// notifications it will emit.
  ///
  /// * `error`: A handler for a terminal event resulting from an error.
  /// * `complete`: A handler for a terminal event resulting from successful
  ///   completion.
  fn subscribe_all<N, E, C>(
    self, next: N, error: E, complete: C,
  ) -> SubscriptionWrapper<<Self as Observable<Item, Err, AllObserver<N, E, C>>>::Unsub>
  where
    N: FnMut(Item),
    E: FnOnce(Err),
    C: FnOnce(),
    Self: Observable<Item, Err, AllObserver<N, E, C>>,
  {
    SubscriptionWrapper(self.actual_subscribe(AllObserver::new(next, error, complete)))
  }

  /// Subscribes a ready-made observer.
  fn subscribe_with<O>(
    self, observer: O,
  ) -> SubscriptionWrapper<<Self as Observable<Item, Err, O>>::Unsub>
  where
    O: Observer<Item, Err>,
    Self: Observable<Item, Err, O>,
  {
    SubscriptionWrapper(self.actual_subscribe(observer))
  }

  /// Emits, once the source completes, every item whose key is the maximum
  /// key of the whole stream, in arrival order.
  ///
  /// Both callables may fail; the first failure is delivered as the stream's
  /// error and nothing else is emitted. An empty source emits an empty list.
  ///
  /// The source's subscription is stored type-erased, so it must be `Send +
  /// 'static`. Chaining one reducer onto another therefore needs an owning
  /// final observer (`subscribe_with` a recorder, or a `move` closure over
  /// shared state); a `subscribe` closure that borrows a local is rejected.
  ///
  /// # Examples
  ///
  /// ```
  /// use rxsink::prelude::*;
  /// use std::convert::Infallible;
  ///
  /// let mut leaders = vec![];
  /// observable::from_iter(vec![("a", 5), ("b", 9), ("c", 9), ("d", 3)])
  ///   .try_max_by(
  ///     |v| Ok::<_, Infallible>(v.1),
  ///     |key, best| Ok(key.cmp(best)),
  ///   )
  ///   .subscribe(|v| leaders = v);
  ///
  /// assert_eq!(leaders, vec![("b", 9), ("c", 9)]);
  /// ```
  fn try_max_by<Key, KF, CF>(self, key_selector: KF, comparer: CF) -> MaxByOp<Self, KF, CF, Key>
  where
    KF: FnMut(&Item) -> Result<Key, Err>,
    CF: FnMut(&Key, &Key) -> Result<Ordering, Err>,
  {
    MaxByOp::new(self, key_selector, comparer)
  }

  /// Infallible form of [`try_max_by`](ObservableExt::try_max_by).
  fn max_by<Key, KF, CF>(
    self, key_selector: KF, comparer: CF,
  ) -> MaxByOp<Self, Total<KF>, Total<CF>, Key>
  where
    KF: FnMut(&Item) -> Key,
    CF: FnMut(&Key, &Key) -> Ordering,
  {
    MaxByOp::new(self, Total(key_selector), Total(comparer))
  }

  /// Emits every item sharing the greatest key under `Ord`.
  ///
  /// # Examples
  ///
  /// ```
  /// use rxsink::prelude::*;
  ///
  /// let mut longest = vec![];
  /// observable::from_iter(vec!["ab", "abc", "x", "xyz"])
  ///   .max_by_key(|s| s.len())
  ///   .subscribe(|v| longest = v);
  ///
  /// assert_eq!(longest, vec!["abc", "xyz"]);
  /// ```
  fn max_by_key<Key, KF>(self, key_selector: KF) -> MaxByOp<Self, Total<KF>, NaturalOrder, Key>
  where
    KF: FnMut(&Item) -> Key,
    Key: Ord,
  {
    MaxByOp::new(self, Total(key_selector), NaturalOrder)
  }

  /// Emits every item sharing the minimum key, in arrival order.
  ///
  /// `comparer` keeps its usual meaning: it orders two keys ascending.
  fn try_min_by<Key, KF, CF>(
    self, key_selector: KF, comparer: CF,
  ) -> MaxByOp<Self, KF, Reversed<CF>, Key>
  where
    KF: FnMut(&Item) -> Result<Key, Err>,
    CF: FnMut(&Key, &Key) -> Result<Ordering, Err>,
  {
    MaxByOp::new(self, key_selector, Reversed(comparer))
  }

  /// Infallible form of [`try_min_by`](ObservableExt::try_min_by).
  fn min_by<Key, KF, CF>(
    self, key_selector: KF, comparer: CF,
  ) -> MaxByOp<Self, Total<KF>, Reversed<Total<CF>>, Key>
  where
    KF: FnMut(&Item) -> Key,
    CF: FnMut(&Key, &Key) -> Ordering,
  {
    MaxByOp::new(self, Total(key_selector), Reversed(Total(comparer)))
  }

  /// Emits every item sharing the smallest key under `Ord`.
  fn min_by_key<Key, KF>(
    self, key_selector: KF,
  ) -> MaxByOp<Self, Total<KF>, Reversed<NaturalOrder>, Key>
  where
    KF: FnMut(&Item) -> Key,
    Key: Ord,
  {
    MaxByOp::new(self, Total(key_selector), Reversed(NaturalOrder))
  }
}
