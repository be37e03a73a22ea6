//! Observer contract for [`BoardModel`](super::BoardModel) change notifications.
//!
//! # What does an observer receive?
//!
//! Nothing but the fact that something changed.  The model passes a reference
//! to itself and the observer re-reads whatever it needs (usually through
//! [`BoardModel::snapshot`](super::BoardModel::snapshot)).  Re-deriving the
//! whole view is cheap and idempotent, so there is no diff payload.
//!
//! # Rules for observers
//!
//! - Observers are called on the thread that performed the mutation, which is
//!   normally the network receive loop.  Keep the callback short; hand heavy
//!   work to another thread (see [`ChannelObserver`]).
//! - Observers may read the model freely: no model lock is held while they run.
//! - Observers must not mutate the model from inside the callback.

use std::sync::mpsc;
use std::sync::{Mutex, PoisonError};

use super::board::BoardModel;

/// Receives a notification after every successful board mutation.
pub trait BoardObserver: Send + Sync {
    /// Called exactly once per mutation, after the mutation is complete and
    /// all model locks have been released.
    fn board_changed(&self, model: &BoardModel);
}

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Unit message delivered by [`BoardModel::watch`](super::BoardModel::watch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardChanged;

/// Adapts a closure into a [`BoardObserver`].
pub(crate) struct FnObserver<F>(pub(crate) F);

impl<F> BoardObserver for FnObserver<F>
where
    F: Fn(&BoardModel) + Send + Sync,
{
    fn board_changed(&self, model: &BoardModel) {
        (self.0)(model)
    }
}

/// Forwards each notification onto an `mpsc` channel.
///
/// The callback never blocks: `Sender::send` on an unbounded channel only
/// fails once the receiver is gone, in which case the notification is dropped.
pub(crate) struct ChannelObserver {
    tx: Mutex<mpsc::Sender<BoardChanged>>,
}

impl ChannelObserver {
    pub(crate) fn new(tx: mpsc::Sender<BoardChanged>) -> Self {
        Self { tx: Mutex::new(tx) }
    }
}

impl BoardObserver for ChannelObserver {
    fn board_changed(&self, _model: &BoardModel) {
        let tx = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = tx.send(BoardChanged);
    }
}
