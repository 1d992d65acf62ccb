//! SingleAssignment subscription cell
//!
//! A producer has to hand its sink an upstream handle *before* it subscribes
//! to its source, because the source may emit and terminate synchronously
//! inside that very subscribe call. `SingleAssignment` is that handle: an
//! empty slot that receives the real subscription later.

use std::sync::{Arc, Mutex};

use super::{lock, BoxedDisposable, Disposable};

/// State of the assignment slot.
#[derive(Debug, Default)]
enum Slot {
  /// Waiting for the upstream subscription.
  #[default]
  Empty,
  /// Holding the upstream subscription.
  Assigned(BoxedDisposable),
  /// Disposed; anything assigned from now on is released immediately.
  Disposed,
}

/// A disposable that can be assigned exactly once.
///
/// - Disposing before assignment makes the later `set` release its value on
///   the spot.
/// - Disposing after assignment releases the stored value exactly once.
/// - A second `set` is a producer bug; the extra value is released and a
///   warning is logged.
#[derive(Clone, Debug, Default)]
pub struct SingleAssignment(Arc<Mutex<Slot>>);

impl SingleAssignment {
  pub fn new() -> Self { Self::default() }

  /// Stores the upstream subscription.
  pub fn set(&self, disposable: BoxedDisposable) {
    let mut slot = lock(&self.0);
    match &*slot {
      Slot::Empty => *slot = Slot::Assigned(disposable),
      Slot::Disposed => {
        drop(slot);
        tracing::debug!("subscription assigned after disposal, releasing it now");
        disposable.dispose();
      }
      Slot::Assigned(_) => {
        drop(slot);
        tracing::warn!("single assignment subscription assigned twice");
        disposable.dispose();
      }
    }
  }

  /// Returns `true` once the slot has left its empty state, either by
  /// assignment or by disposal.
  pub fn is_assigned(&self) -> bool { !matches!(*lock(&self.0), Slot::Empty) }
}

impl Disposable for SingleAssignment {
  fn dispose(&self) {
    let previous = std::mem::replace(&mut *lock(&self.0), Slot::Disposed);
    if let Slot::Assigned(upstream) = previous {
      upstream.dispose();
    }
  }

  fn is_disposed(&self) -> bool { matches!(*lock(&self.0), Slot::Disposed) }
}
