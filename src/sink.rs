//! The termination kernel shared by every stateful operator.
//!
//! A [`Sink`] pairs the observer an operator feeds (its *downstream*) with the
//! subscription it was built on (its *upstream*). Implementations of sinks are
//! responsible for enforcing the message grammar on the downstream observer:
//! after a terminal notification they dispose the sink, which mutes the
//! downstream and releases the upstream exactly once.
//!
//! Disposal may race with the producer. One thread can be delivering
//! `complete` while another cancels the subscription. Both slots are
//! therefore exchanged under their own lock, and only the caller that takes
//! the upstream handle out of its slot gets to release it.

use std::{
  fmt::{Debug, Formatter},
  sync::{Arc, Mutex},
};

use crate::{
  observer::Observer,
  subscription::{lock, BoxedDisposable, Disposable},
};

/// State of the downstream slot.
enum Downstream<O> {
  /// The real consumer, ready to receive.
  Ready(O),
  /// The consumer is lent out to an in-flight `next` call.
  Emitting,
  /// The sentinel: every notification is absorbed.
  Disposed,
}

struct SinkCore<O> {
  downstream: Mutex<Downstream<O>>,
  upstream: Mutex<Option<BoxedDisposable>>,
}

/// Pairs a downstream observer with the upstream subscription feeding it.
///
/// `Sink` is a cheap handle: clones share the same slots. The operator that
/// created it owns the first handle; [`forwarder`](Sink::forwarder) and
/// [`SinkSubscription`] hold the others.
///
/// # Examples
///
/// ```rust
/// use rxsink::prelude::*;
///
/// let upstream = BooleanDisposable::new();
/// let sink = Sink::new(Some(FnMutObserver(|v: i32| println!("{v}"))), upstream.clone());
///
/// let mut forwarder = sink.forwarder();
/// forwarder.next(1);
/// forwarder.complete();
///
/// assert!(upstream.is_disposed());
/// assert!(sink.is_disposed());
/// ```
pub struct Sink<O>(Arc<SinkCore<O>>);

impl<O> Sink<O> {
  /// Takes ownership of the upstream handle. Nothing else happens until the
  /// sink is fed or disposed.
  pub fn new(downstream: O, upstream: impl Disposable + Send + 'static) -> Self {
    Self(Arc::new(SinkCore {
      downstream: Mutex::new(Downstream::Ready(downstream)),
      upstream: Mutex::new(Some(BoxedDisposable::new(upstream))),
    }))
  }

  /// Mutes the downstream observer and releases the upstream subscription.
  ///
  /// The downstream slot is overwritten with the sentinel on every call. The
  /// upstream handle is taken out of its slot atomically, so however many
  /// threads call this concurrently the upstream is released exactly once.
  pub fn dispose(&self) {
    let muted = std::mem::replace(&mut *lock(&self.0.downstream), Downstream::Disposed);
    drop(muted);

    let upstream = lock(&self.0.upstream).take();
    if let Some(upstream) = upstream {
      tracing::trace!("sink disposed, releasing upstream");
      upstream.dispose();
    }
  }

  /// Returns `true` once the downstream has been swapped for the sentinel.
  pub fn is_disposed(&self) -> bool { matches!(*lock(&self.0.downstream), Downstream::Disposed) }

  /// An observer that forwards into this sink and disposes it right after
  /// every terminal notification.
  pub fn forwarder(&self) -> Forwarder<O> { Forwarder(self.clone()) }

  /// A handle that exposes only disposal, for callers outside the operator.
  pub fn subscription(&self) -> SinkSubscription<O> { SinkSubscription(self.clone()) }

  /// Delivers `value` to the current downstream without triggering disposal.
  ///
  /// The observer is taken out of its slot for the duration of the call, so
  /// a consumer may dispose the sink from inside its own `next` handler. If
  /// that happens the observer is dropped instead of being put back.
  pub fn next_downstream<Item, Err>(&self, value: Item)
  where
    O: Observer<Item, Err>,
  {
    let mut observer = {
      let mut slot = lock(&self.0.downstream);
      match std::mem::replace(&mut *slot, Downstream::Emitting) {
        Downstream::Ready(observer) => observer,
        other => {
          *slot = other;
          tracing::trace!("next absorbed by disposed sink");
          return;
        }
      }
    };

    observer.next(value);

    let mut slot = lock(&self.0.downstream);
    if matches!(*slot, Downstream::Emitting) {
      *slot = Downstream::Ready(observer);
    }
  }

  /// Delivers `err` to the downstream and leaves the sentinel in its place.
  ///
  /// Callers are expected to [`dispose`](Sink::dispose) right after.
  pub fn error_downstream<Item, Err>(&self, err: Err)
  where
    O: Observer<Item, Err>,
  {
    match self.take_downstream() {
      Some(observer) => observer.error(err),
      None => tracing::trace!("error absorbed by disposed sink"),
    }
  }

  /// Delivers completion to the downstream and leaves the sentinel in its
  /// place.
  ///
  /// Callers are expected to [`dispose`](Sink::dispose) right after.
  pub fn complete_downstream<Item, Err>(&self)
  where
    O: Observer<Item, Err>,
  {
    match self.take_downstream() {
      Some(observer) => observer.complete(),
      None => tracing::trace!("completion absorbed by disposed sink"),
    }
  }

  fn take_downstream(&self) -> Option<O> {
    match std::mem::replace(&mut *lock(&self.0.downstream), Downstream::Disposed) {
      Downstream::Ready(observer) => Some(observer),
      Downstream::Emitting | Downstream::Disposed => None,
    }
  }
}

impl<O> Clone for Sink<O> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<O> Disposable for Sink<O> {
  #[inline]
  fn dispose(&self) { Sink::dispose(self) }

  #[inline]
  fn is_disposed(&self) -> bool { Sink::is_disposed(self) }
}

impl<O> Debug for Sink<O> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Sink")
      .field("is_disposed", &self.is_disposed())
      .field("upstream", &*lock(&self.0.upstream))
      .finish()
  }
}

/// Observer view of a [`Sink`].
///
/// `next` goes straight to the current downstream. `error` and `complete` are
/// delivered and then followed by disposal, so a terminal notification can
/// never leave the upstream running.
pub struct Forwarder<O>(Sink<O>);

impl<O, Item, Err> Observer<Item, Err> for Forwarder<O>
where
  O: Observer<Item, Err>,
{
  #[inline]
  fn next(&mut self, value: Item) { self.0.next_downstream::<Item, Err>(value); }

  fn error(self, err: Err) {
    self.0.error_downstream::<Item, Err>(err);
    self.0.dispose();
  }

  fn complete(self) {
    self.0.complete_downstream::<Item, Err>();
    self.0.dispose();
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_disposed() }
}

/// Disposal-only handle to a running [`Sink`], returned to subscribers.
pub struct SinkSubscription<O>(Sink<O>);

impl<O> Disposable for SinkSubscription<O> {
  #[inline]
  fn dispose(&self) { self.0.dispose() }

  #[inline]
  fn is_disposed(&self) -> bool { self.0.is_disposed() }
}

impl<O> Debug for SinkSubscription<O> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_tuple("SinkSubscription").field(&self.0).finish()
  }
}

#[cfg(test)]
mod test {
  use std::{
    sync::{Arc, Barrier, Mutex},
    thread,
  };

  use tracing_test::traced_test;

  use super::*;
  use crate::test_util::{CountingDisposable, Event, Recorder};

  #[test]
  fn forwards_values_in_order() {
    let (recorder, events) = Recorder::<i32, &str>::new();
    let sink = Sink::new(recorder, ());
    let mut forwarder = sink.forwarder();

    forwarder.next(1);
    forwarder.next(2);
    assert!(!forwarder.is_closed());
    forwarder.complete();

    assert_eq!(*events.lock().unwrap(), vec![Event::Next(1), Event::Next(2), Event::Complete]);
  }

  #[test]
  fn complete_disposes_upstream_once() {
    let (recorder, _) = Recorder::<i32, &str>::new();
    let upstream = CountingDisposable::new();
    let sink = Sink::new(recorder, upstream.clone());

    sink.forwarder().complete();
    assert!(sink.is_disposed());
    assert_eq!(upstream.count(), 1);

    sink.dispose();
    sink.dispose();
    assert_eq!(upstream.count(), 1);
  }

  #[test]
  fn error_is_delivered_then_disposes() {
    let (recorder, events) = Recorder::<i32, &str>::new();
    let upstream = CountingDisposable::new();
    let sink = Sink::new(recorder, upstream.clone());

    let mut forwarder = sink.forwarder();
    forwarder.next(3);
    forwarder.error("boom");

    assert_eq!(*events.lock().unwrap(), vec![Event::Next(3), Event::Error("boom")]);
    assert_eq!(upstream.count(), 1);
  }

  #[test]
  fn notifications_after_terminal_are_absorbed() {
    let (recorder, events) = Recorder::<i32, &str>::new();
    let sink = Sink::new(recorder, ());

    sink.forwarder().complete();
    let mut late = sink.forwarder();
    late.next(9);
    assert!(late.is_closed());
    late.error("late");
    sink.complete_downstream();

    assert_eq!(*events.lock().unwrap(), vec![Event::Complete]);
  }

  #[test]
  fn external_dispose_mutes_downstream() {
    let (recorder, events) = Recorder::<i32, &str>::new();
    let upstream = CountingDisposable::new();
    let sink = Sink::new(recorder, upstream.clone());
    let mut forwarder = sink.forwarder();

    forwarder.next(1);
    sink.subscription().dispose();
    forwarder.next(2);
    forwarder.complete();

    assert_eq!(*events.lock().unwrap(), vec![Event::Next(1)]);
    assert_eq!(upstream.count(), 1);
  }

  #[test]
  fn direct_terminal_does_not_dispose_by_itself() {
    let (recorder, events) = Recorder::<i32, &str>::new();
    let upstream = CountingDisposable::new();
    let sink = Sink::new(recorder, upstream.clone());

    sink.complete_downstream();
    assert_eq!(*events.lock().unwrap(), vec![Event::Complete]);
    assert!(sink.is_disposed());
    assert_eq!(upstream.count(), 0);

    sink.dispose();
    assert_eq!(upstream.count(), 1);
  }

  #[test]
  fn concurrent_dispose_releases_upstream_exactly_once() {
    for threads in [1, 2, 8, 32] {
      let (recorder, _) = Recorder::<i32, &str>::new();
      let upstream = CountingDisposable::new();
      let sink = Sink::new(recorder, upstream.clone());
      let barrier = Arc::new(Barrier::new(threads));

      let handles: Vec<_> = (0..threads)
        .map(|_| {
          let sink = sink.clone();
          let barrier = barrier.clone();
          thread::spawn(move || {
            barrier.wait();
            sink.dispose();
          })
        })
        .collect();
      handles.into_iter().for_each(|h| h.join().unwrap());

      assert_eq!(upstream.count(), 1, "{threads} threads");
    }
  }

  #[test]
  fn completion_racing_external_cancel() {
    for _ in 0..64 {
      let (recorder, events) = Recorder::<i32, &str>::new();
      let upstream = CountingDisposable::new();
      let sink = Sink::new(recorder, upstream.clone());
      let barrier = Arc::new(Barrier::new(2));

      let producer = {
        let mut forwarder = sink.forwarder();
        let barrier = barrier.clone();
        thread::spawn(move || {
          forwarder.next(1);
          barrier.wait();
          forwarder.complete();
        })
      };
      let canceller = {
        let subscription = sink.subscription();
        thread::spawn(move || {
          barrier.wait();
          subscription.dispose();
        })
      };
      producer.join().unwrap();
      canceller.join().unwrap();

      assert_eq!(upstream.count(), 1);
      let events = events.lock().unwrap();
      assert_eq!(events[0], Event::Next(1));
      assert!(events.len() <= 2);
    }
  }

  struct DisposeOnNext {
    events: Arc<Mutex<Vec<Event<i32, &'static str>>>>,
    hook: Arc<Mutex<Option<BoxedDisposable>>>,
  }

  impl Observer<i32, &'static str> for DisposeOnNext {
    fn next(&mut self, value: i32) {
      self.events.lock().unwrap().push(Event::Next(value));
      let hook = self.hook.lock().unwrap().take();
      if let Some(hook) = hook {
        hook.dispose();
      }
    }

    fn error(self, err: &'static str) { self.events.lock().unwrap().push(Event::Error(err)); }

    fn complete(self) { self.events.lock().unwrap().push(Event::Complete); }

    fn is_closed(&self) -> bool { false }
  }

  #[test]
  fn consumer_may_dispose_inside_next() {
    let events = Arc::new(Mutex::new(vec![]));
    let hook = Arc::new(Mutex::new(None));
    let upstream = CountingDisposable::new();
    let sink = Sink::new(DisposeOnNext { events: events.clone(), hook: hook.clone() }, upstream.clone());
    *hook.lock().unwrap() = Some(BoxedDisposable::new(sink.subscription()));

    let mut forwarder = sink.forwarder();
    forwarder.next(1);
    forwarder.next(2);
    forwarder.complete();

    assert_eq!(*events.lock().unwrap(), vec![Event::Next(1)]);
    assert_eq!(upstream.count(), 1);
  }

  #[traced_test]
  #[test]
  fn logs_upstream_release() {
    let (recorder, _) = Recorder::<i32, &str>::new();
    let sink = Sink::new(recorder, CountingDisposable::new());
    sink.forwarder().complete();
    assert!(logs_contain("releasing upstream"));
  }
}
