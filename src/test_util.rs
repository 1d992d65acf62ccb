use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc, Mutex,
};

use crate::{observer::Observer, subscription::Disposable};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Event<T, E> {
  Next(T),
  Error(E),
  Complete,
}

/// Observer that records every notification it receives.
pub(crate) struct Recorder<T, E>(Arc<Mutex<Vec<Event<T, E>>>>);

impl<T, E> Recorder<T, E> {
  pub(crate) fn new() -> (Self, Arc<Mutex<Vec<Event<T, E>>>>) {
    let events = Arc::new(Mutex::new(vec![]));
    (Self(events.clone()), events)
  }
}

impl<T, E> Observer<T, E> for Recorder<T, E> {
  fn next(&mut self, value: T) { self.0.lock().unwrap().push(Event::Next(value)); }

  fn error(self, err: E) { self.0.lock().unwrap().push(Event::Error(err)); }

  fn complete(self) { self.0.lock().unwrap().push(Event::Complete); }

  fn is_closed(&self) -> bool { false }
}

/// Counts how many times it was released; never deduplicates.
#[derive(Clone, Default)]
pub(crate) struct CountingDisposable(Arc<AtomicUsize>);

impl CountingDisposable {
  pub(crate) fn new() -> Self { Self::default() }

  pub(crate) fn count(&self) -> usize { self.0.load(Ordering::SeqCst) }
}

impl Disposable for CountingDisposable {
  fn dispose(&self) { self.0.fetch_add(1, Ordering::SeqCst); }

  fn is_disposed(&self) -> bool { self.count() > 0 }
}
