//! `BoardModel`: the client's mirror of the server-authoritative game state.
//!
//! # Who writes, who reads?
//!
//! ```text
//! network receive loop ──apply_*──▶ BoardModel ──board_changed──▶ observers
//!                                       ▲                              │
//!                                       └────── contents_at / snapshot ┘
//! ```
//!
//! Exactly one producer (the network client) mutates the model; any number of
//! observers read it.  Every field lives behind one `RwLock` owned by the
//! model and never handed out, so a reader can never see half of a batched
//! cell update.
//!
//! # Mutation protocol
//!
//! Each `apply_*` mutator follows the same three steps:
//!
//! 1. take the write lock and validate the whole request,
//! 2. apply it and release the lock,
//! 3. notify every subscribed observer exactly once.
//!
//! Observers run with no lock held, so they may call back into the model
//! (for example `snapshot()`) without deadlocking.  A mutator that fails
//! validation changes nothing and notifies nobody.
//!
//! # Status is monotonic
//!
//! `InProgress` moves to exactly one terminal status (`Tie`, `Won`, `Lost`,
//! `Error`) and then the model is frozen: every later mutator returns
//! [`ModelError::GameFinished`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{
    mpsc, Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use super::cell::{CellMark, CellUpdate, GameStatus, Outcome, TurnOwner, MAX_DIMENSION};
use super::observer::{BoardChanged, BoardObserver, ChannelObserver, FnObserver, SubscriptionId};

/// Contract violations reported by [`BoardModel`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The requested side is zero or larger than [`MAX_DIMENSION`].
    #[error("invalid board dimension {0}: must be between 1 and {max}", max = MAX_DIMENSION)]
    InvalidDimension(usize),

    /// `initialize` was called on a model that already has a grid.
    #[error("board is already initialized with dimension {0}")]
    AlreadyInitialized(usize),

    /// The operation needs a grid but `initialize` has not run yet.
    #[error("board has not been initialized")]
    NotInitialized,

    /// A coordinate falls outside `[0, dim)`.
    #[error("cell ({row}, {col}) is outside the {dim}x{dim} board")]
    OutOfBounds { row: usize, col: usize, dim: usize },

    /// The model already holds a terminal status and accepts no more mutation.
    #[error("game already finished with status {0:?}")]
    GameFinished(GameStatus),
}

/// Unrecoverable protocol or connection condition surfaced to observers.
///
/// Reported once through [`BoardModel::report_fault`], which also moves the
/// status to [`GameStatus::Error`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Fault {
    #[error("connection lost: {0}")]
    ConnectionLost(String),
    #[error("malformed message: {0}")]
    MalformedMessage(String),
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
    #[error("server error: {0}")]
    ServerError(String),
}

// ── Internal state ────────────────────────────────────────────────────────────

#[derive(Debug)]
struct Grid {
    dim: usize,
    /// Row-major, `dim * dim` entries.
    cells: Vec<CellMark>,
}

impl Grid {
    fn new(dim: usize) -> Self {
        Self {
            dim,
            cells: vec![CellMark::Empty; dim * dim],
        }
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, ModelError> {
        if row >= self.dim || col >= self.dim {
            return Err(ModelError::OutOfBounds {
                row,
                col,
                dim: self.dim,
            });
        }
        Ok(row * self.dim + col)
    }

    fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    fn rows(&self) -> Vec<Vec<CellMark>> {
        self.cells.chunks(self.dim).map(<[CellMark]>::to_vec).collect()
    }
}

#[derive(Debug, Default)]
struct BoardState {
    grid: Option<Grid>,
    turn: TurnOwner,
    status: GameStatus,
    moves_remaining: usize,
    fault: Option<Fault>,
}

impl BoardState {
    fn ensure_in_progress(&self) -> Result<(), ModelError> {
        if self.status.is_terminal() {
            return Err(ModelError::GameFinished(self.status));
        }
        Ok(())
    }

    fn grid(&self) -> Result<&Grid, ModelError> {
        self.grid.as_ref().ok_or(ModelError::NotInitialized)
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Owned, internally consistent copy of every observable field.
///
/// Taken under a single read lock, so it never mixes two mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// `None` until the dimension announcement has been applied.
    pub dimension: Option<usize>,
    /// Row-major grid; empty until initialized.
    pub cells: Vec<Vec<CellMark>>,
    pub turn: TurnOwner,
    pub status: GameStatus,
    pub moves_remaining: usize,
    pub fault: Option<Fault>,
}

impl BoardSnapshot {
    pub fn is_local_turn(&self) -> bool {
        self.turn == TurnOwner::Local
    }

    /// Returns `None` for coordinates outside the grid.
    pub fn contents_at(&self, row: usize, col: usize) -> Option<CellMark> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Number of cells currently holding `mark`.
    pub fn count(&self, mark: CellMark) -> usize {
        self.cells.iter().flatten().filter(|&&c| c == mark).count()
    }
}

// ── BoardModel ────────────────────────────────────────────────────────────────

/// Thread-safe board model with change notification.
///
/// Share it as `Arc<BoardModel>` between the network client (the only writer)
/// and the presentation layer (readers and observers).
pub struct BoardModel {
    state: RwLock<BoardState>,
    observers: Mutex<Vec<(SubscriptionId, Arc<dyn BoardObserver>)>>,
    next_subscription: AtomicU64,
}

impl BoardModel {
    /// Creates an empty, uninitialized model.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(BoardState::default()),
            observers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Allocates an empty `dim x dim` grid.
    ///
    /// # Errors
    ///
    /// - [`ModelError::InvalidDimension`] if `dim` is 0 or above [`MAX_DIMENSION`].
    /// - [`ModelError::AlreadyInitialized`] on a second call.
    /// - [`ModelError::GameFinished`] if a fault was reported first.
    pub fn initialize(&self, dim: usize) -> Result<(), ModelError> {
        if dim == 0 || dim > MAX_DIMENSION {
            return Err(ModelError::InvalidDimension(dim));
        }
        self.mutate("initialize", |state| {
            if let Some(grid) = &state.grid {
                return Err(ModelError::AlreadyInitialized(grid.dim));
            }
            state.ensure_in_progress()?;
            state.grid = Some(Grid::new(dim));
            state.moves_remaining = dim * dim;
            debug!(dim, "board initialized");
            Ok(())
        })
    }

    // ── Read accessors ────────────────────────────────────────────────────────

    /// Board side, or `None` before `initialize`.
    pub fn dimension(&self) -> Option<usize> {
        self.read().grid.as_ref().map(|g| g.dim)
    }

    pub fn is_initialized(&self) -> bool {
        self.read().grid.is_some()
    }

    /// Returns the mark at `(row, col)`.
    ///
    /// # Errors
    ///
    /// [`ModelError::NotInitialized`] before `initialize`, and
    /// [`ModelError::OutOfBounds`] for coordinates outside `[0, dim)`.
    pub fn contents_at(&self, row: usize, col: usize) -> Result<CellMark, ModelError> {
        let state = self.read();
        let grid = state.grid()?;
        Ok(grid.cells[grid.index(row, col)?])
    }

    pub fn is_local_turn(&self) -> bool {
        self.read().turn == TurnOwner::Local
    }

    pub fn turn_owner(&self) -> TurnOwner {
        self.read().turn
    }

    pub fn status(&self) -> GameStatus {
        self.read().status
    }

    /// Advisory count of empty cells.
    pub fn moves_remaining(&self) -> usize {
        self.read().moves_remaining
    }

    /// The fault that ended the game, if any.
    pub fn fault(&self) -> Option<Fault> {
        self.read().fault.clone()
    }

    /// Conservative local pre-check for a move request.
    ///
    /// Returns `false` when the game is over, it is not the local player's
    /// turn, the coordinates are off the board, or the cell is occupied.
    /// Capture rules are the server's business; a `true` here can still be
    /// refused by the server.
    pub fn is_legal_move(&self, row: usize, col: usize) -> bool {
        let state = self.read();
        if state.status.is_terminal() || state.turn != TurnOwner::Local {
            return false;
        }
        let Ok(grid) = state.grid() else {
            return false;
        };
        match grid.index(row, col) {
            Ok(idx) => grid.cells[idx].is_empty(),
            Err(_) => false,
        }
    }

    /// Copies every observable field under one read lock.
    pub fn snapshot(&self) -> BoardSnapshot {
        let state = self.read();
        BoardSnapshot {
            dimension: state.grid.as_ref().map(|g| g.dim),
            cells: state.grid.as_ref().map(Grid::rows).unwrap_or_default(),
            turn: state.turn,
            status: state.status,
            moves_remaining: state.moves_remaining,
            fault: state.fault.clone(),
        }
    }

    // ── Mutators (driven by the network client) ───────────────────────────────

    /// Applies every update of one broadcast as a single mutation.
    ///
    /// The batch is validated in full before any cell is written, and all
    /// observers are notified once for the whole batch.  An empty batch is a
    /// no-op and produces no notification.
    ///
    /// # Errors
    ///
    /// [`ModelError::GameFinished`], [`ModelError::NotInitialized`] or
    /// [`ModelError::OutOfBounds`]; in every case no cell is changed.
    pub fn apply_cell_updates(&self, updates: &[CellUpdate]) -> Result<(), ModelError> {
        if updates.is_empty() {
            return Ok(());
        }
        self.mutate("cells", |state| {
            state.ensure_in_progress()?;
            let grid = state.grid.as_mut().ok_or(ModelError::NotInitialized)?;
            let indices = updates
                .iter()
                .map(|u| grid.index(u.row, u.col))
                .collect::<Result<Vec<_>, _>>()?;
            for (idx, update) in indices.into_iter().zip(updates) {
                grid.cells[idx] = update.mark;
            }
            state.moves_remaining = grid.empty_count();
            Ok(())
        })
    }

    /// Records whose turn it is next.
    ///
    /// # Errors
    ///
    /// [`ModelError::GameFinished`] or [`ModelError::NotInitialized`].
    pub fn apply_turn_change(&self, owner: TurnOwner) -> Result<(), ModelError> {
        self.mutate("turn", |state| {
            state.ensure_in_progress()?;
            state.grid()?;
            state.turn = owner;
            Ok(())
        })
    }

    /// Moves the status to the terminal value matching `outcome`.
    ///
    /// # Errors
    ///
    /// [`ModelError::GameFinished`] or [`ModelError::NotInitialized`].
    pub fn apply_game_over(&self, outcome: Outcome) -> Result<(), ModelError> {
        self.mutate("game_over", |state| {
            state.ensure_in_progress()?;
            state.grid()?;
            state.status = outcome.into();
            debug!(status = ?state.status, "game over");
            Ok(())
        })
    }

    /// Records an unrecoverable fault and moves the status to `Error`.
    ///
    /// Works on an uninitialized model too, since a connection can fail
    /// before the dimension announcement arrives.
    ///
    /// # Errors
    ///
    /// [`ModelError::GameFinished`] if the status is already terminal; the
    /// first terminal condition wins.
    pub fn report_fault(&self, fault: Fault) -> Result<(), ModelError> {
        self.mutate("fault", |state| {
            state.ensure_in_progress()?;
            debug!(%fault, "fault reported");
            state.status = GameStatus::Error;
            state.fault = Some(fault);
            Ok(())
        })
    }

    // ── Subscription ──────────────────────────────────────────────────────────

    /// Registers an observer for every future mutation.
    pub fn subscribe(&self, observer: Arc<dyn BoardObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, observer));
        id
    }

    /// Registers a closure as an observer.
    pub fn subscribe_fn<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&BoardModel) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(FnObserver(f)))
    }

    /// Returns a channel that receives one [`BoardChanged`] per mutation.
    ///
    /// Useful when the presentation runs its own loop and must not do any
    /// work on the receive-loop thread.
    pub fn watch(&self) -> mpsc::Receiver<BoardChanged> {
        let (tx, rx) = mpsc::channel();
        self.subscribe(Arc::new(ChannelObserver::new(tx)));
        rx
    }

    /// Removes an observer.  Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|(sub, _)| *sub != id);
        observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn read(&self) -> RwLockReadGuard<'_, BoardState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BoardState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` under the write lock, then notifies if it succeeded.
    fn mutate<F>(&self, what: &'static str, f: F) -> Result<(), ModelError>
    where
        F: FnOnce(&mut BoardState) -> Result<(), ModelError>,
    {
        {
            let mut state = self.write();
            f(&mut state)?;
        }
        trace!(mutation = what, "board mutated");
        self.notify();
        Ok(())
    }

    /// Dispatches to a copy of the observer list with no lock held.
    fn notify(&self) {
        let observers: Vec<Arc<dyn BoardObserver>> = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer.board_changed(self);
        }
    }
}

impl Default for BoardModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BoardModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardModel")
            .field("state", &*self.read())
            .field("observers", &self.observer_count())
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
