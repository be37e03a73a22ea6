//! [`NetworkClient`]: keeps a [`BoardModel`] in sync with a Reversi server.
//!
//! # Threads
//!
//! - The **receive loop** runs on its own thread (`reversi-recv-<id>`).  It
//!   blocks on the socket, decodes one line at a time, and applies the result
//!   to the model.  Every model mutation, and therefore every observer
//!   callback, happens on this thread, in wire order.
//! - Any other thread may call [`NetworkClient::submit_move`] and
//!   [`NetworkClient::close`].  Writes are serialized by a mutex, so two
//!   concurrent submissions never interleave on the wire.
//!
//! # Faults
//!
//! A malformed line, a message that is not allowed in the current state, a
//! server `ERROR`, an I/O error, or the server hanging up mid-game all take
//! the same path: the client moves to `Closed`, releases the socket, and
//! reports exactly one [`Fault`] to the model.  The transition to `Closed`
//! happens under the state lock, so whichever thread gets there first is the
//! only one that reports.

use std::io::{self, BufRead, Read, Write};
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use reversi_core::{decode_message, encode_move, BoardModel, CodecError, Fault, ModelError, ProtocolEvent};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::connection::{Connection, ConnectionShutdown};
use super::{ClientError, ClientState};
use crate::application::play_move::{MoveSubmitter, SubmitError};

/// A live session with the server.
///
/// Dropping the client closes it.
pub struct NetworkClient {
    shared: Arc<Shared>,
    receiver: Mutex<Option<JoinHandle<()>>>,
}

/// State reachable from both the receive loop and the caller's threads.
struct Shared {
    session_id: Uuid,
    peer: String,
    model: Arc<BoardModel>,
    state: Mutex<ClientState>,
    /// `None` once the connection has been released.
    writer: Mutex<Option<Box<dyn Write + Send>>>,
    shutdown: Arc<dyn ConnectionShutdown>,
}

impl NetworkClient {
    /// Connects to `host:port` and starts the receive loop.
    ///
    /// # Errors
    ///
    /// [`ClientError::ConnectFailed`] if the server cannot be reached, or
    /// [`ClientError::Spawn`] if the receive thread cannot be started.
    pub fn connect(host: &str, port: u16, model: Arc<BoardModel>) -> Result<Self, ClientError> {
        info!(%host, port, "connecting");
        let connection = Connection::open(host, port)?;
        Self::start(connection, model)
    }

    /// Attaches to an already established connection and starts the
    /// receive loop.  The client begins in `AwaitingDimension`.
    pub fn start(connection: Connection, model: Arc<BoardModel>) -> Result<Self, ClientError> {
        let (peer, reader, writer, shutdown) = connection.into_parts();
        let session_id = Uuid::new_v4();
        let shared = Arc::new(Shared {
            session_id,
            peer,
            model,
            state: Mutex::new(ClientState::Connecting),
            writer: Mutex::new(Some(writer)),
            shutdown,
        });
        shared.advance(ClientState::AwaitingDimension);

        let loop_shared = Arc::clone(&shared);
        let spawned = thread::Builder::new()
            .name(format!("reversi-recv-{}", &session_id.simple().to_string()[..8]))
            .spawn(move || receive_loop(loop_shared, reader));
        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                error!(session = %session_id, "failed to spawn receive loop: {e}");
                shared.close_quietly("receive loop not started");
                return Err(ClientError::Spawn(e));
            }
        };

        info!(session = %session_id, peer = %shared.peer, "session started");
        Ok(Self {
            shared,
            receiver: Mutex::new(Some(handle)),
        })
    }

    /// Sends `MOVE <row> <col>` to the server.
    ///
    /// The model is not touched; the move shows up once the server
    /// broadcasts it back.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotPlaying`] outside the `Playing` state.  Nothing is
    ///   written.
    /// - [`ClientError::Model`] / [`ClientError::Codec`] for coordinates off
    ///   the board (or no board yet).  Nothing is written.
    /// - [`ClientError::ConnectionLost`] if the write fails.  The client is
    ///   closed and a [`Fault::ConnectionLost`] is reported to the model.
    pub fn submit_move(&self, row: usize, col: usize) -> Result<(), ClientError> {
        let state = self.shared.state();
        if state != ClientState::Playing {
            return Err(ClientError::NotPlaying { state });
        }
        let dim = self.shared.model.dimension().ok_or(ModelError::NotInitialized)?;
        if row >= dim || col >= dim {
            return Err(ModelError::OutOfBounds { row, col, dim }.into());
        }
        let line = encode_move(row, col)?;

        let written = {
            let mut writer = self.shared.lock_writer();
            let Some(writer) = writer.as_mut() else {
                return Err(ClientError::NotPlaying {
                    state: ClientState::Closed,
                });
            };
            writer.write_all(line.as_bytes()).and_then(|()| writer.flush())
        };

        match written {
            Ok(()) => {
                debug!(session = %self.shared.session_id, row, col, "move sent");
                Ok(())
            }
            Err(e) => {
                self.shared.fail(Fault::ConnectionLost(e.to_string()));
                Err(ClientError::ConnectionLost(e.to_string()))
            }
        }
    }

    /// Closes the session.
    ///
    /// Idempotent.  Releases the socket, which unblocks the receive loop, and
    /// waits for that thread to finish unless called from it (for example by
    /// an observer).  A local close reports no fault.
    pub fn close(&self) {
        if self.shared.close_quietly("closed locally") {
            info!(session = %self.shared.session_id, "session closed");
        }
        let handle = self
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.thread().id() == thread::current().id() {
                // The loop notices `Closed` on its next iteration.
                return;
            }
            if handle.join().is_err() {
                error!(session = %self.shared.session_id, "receive loop panicked");
            }
        }
    }

    pub fn state(&self) -> ClientState {
        self.shared.state()
    }

    pub fn is_closed(&self) -> bool {
        self.state() == ClientState::Closed
    }

    pub fn model(&self) -> &Arc<BoardModel> {
        &self.shared.model
    }

    /// Correlation id attached to every log line of this session.
    pub fn session_id(&self) -> Uuid {
        self.shared.session_id
    }

    pub fn peer(&self) -> &str {
        &self.shared.peer
    }
}

impl Drop for NetworkClient {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for NetworkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkClient")
            .field("session_id", &self.shared.session_id)
            .field("peer", &self.shared.peer)
            .field("state", &self.shared.state())
            .finish()
    }
}

impl MoveSubmitter for NetworkClient {
    fn submit_move(&self, row: usize, col: usize) -> Result<(), SubmitError> {
        NetworkClient::submit_move(self, row, col).map_err(SubmitError::from)
    }
}

impl From<ClientError> for SubmitError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::NotPlaying { .. } => SubmitError::NotPlaying,
            ClientError::Model(e) => SubmitError::Invalid(e.to_string()),
            ClientError::Codec(e) => SubmitError::Invalid(e.to_string()),
            other => SubmitError::ConnectionLost(other.to_string()),
        }
    }
}

// ── Shared state transitions ──────────────────────────────────────────────────

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, ClientState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_writer(&self) -> MutexGuard<'_, Option<Box<dyn Write + Send>>> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state(&self) -> ClientState {
        *self.lock_state()
    }

    /// Moves to a non-terminal state.  Returns `false` if already closed.
    fn advance(&self, to: ClientState) -> bool {
        let mut state = self.lock_state();
        if *state == ClientState::Closed {
            return false;
        }
        debug!(session = %self.session_id, from = ?*state, to = ?to, "state change");
        *state = to;
        true
    }

    /// Shuts the socket down and drops the writer.  Call with the state lock
    /// held, right after setting `Closed`.
    fn release(&self) {
        if let Err(e) = self.shutdown.shutdown() {
            debug!(session = %self.session_id, "socket shutdown: {e}");
        }
        self.lock_writer().take();
    }

    /// Closes without reporting a fault.  Returns `true` if this call did
    /// the closing.
    fn close_quietly(&self, reason: &str) -> bool {
        let mut state = self.lock_state();
        if *state == ClientState::Closed {
            return false;
        }
        debug!(session = %self.session_id, from = ?*state, reason, "closing");
        *state = ClientState::Closed;
        self.release();
        true
    }

    /// Closes and reports `fault` to the model, unless already closed.
    fn fail(&self, fault: Fault) {
        {
            let mut state = self.lock_state();
            if *state == ClientState::Closed {
                debug!(session = %self.session_id, %fault, "fault after close ignored");
                return;
            }
            warn!(session = %self.session_id, from = ?*state, %fault, "session failed");
            *state = ClientState::Closed;
            self.release();
        }
        // Observers run without the state lock so they may query the client.
        if let Err(e) = self.model.report_fault(fault) {
            debug!(session = %self.session_id, "fault not recorded: {e}");
        }
    }

    fn violation(&self, detail: impl Into<String>) -> ControlFlow<()> {
        self.fail(Fault::ProtocolViolation(detail.into()));
        ControlFlow::Break(())
    }

    fn server_error(&self, text: String) -> ControlFlow<()> {
        self.fail(Fault::ServerError(text));
        ControlFlow::Break(())
    }

    // ── Receive-loop handlers ─────────────────────────────────────────────────

    fn on_line(&self, line: &str) -> ControlFlow<()> {
        let state = self.state();
        match state {
            ClientState::Closed => ControlFlow::Break(()),
            ClientState::GameOver => {
                debug!(session = %self.session_id, line = line.trim_end(), "ignoring line after game over");
                ControlFlow::Continue(())
            }
            ClientState::Connecting | ClientState::AwaitingDimension | ClientState::Playing => {
                match decode_message(line) {
                    Ok(event) => {
                        debug!(session = %self.session_id, kind = ?event.kind(), "received");
                        self.on_event(state, event)
                    }
                    Err(e) => {
                        self.fail(Fault::MalformedMessage(codec_detail(e)));
                        ControlFlow::Break(())
                    }
                }
            }
        }
    }

    fn on_event(&self, state: ClientState, event: ProtocolEvent) -> ControlFlow<()> {
        match state {
            ClientState::Connecting | ClientState::AwaitingDimension => match event {
                ProtocolEvent::DimensionAnnounced(dim) => {
                    // The grid must exist before `Playing` lets moves through.
                    if let Err(e) = self.model.initialize(dim) {
                        return self.violation(e.to_string());
                    }
                    if !self.advance(ClientState::Playing) {
                        return ControlFlow::Break(());
                    }
                    info!(session = %self.session_id, dim, "board initialized");
                    ControlFlow::Continue(())
                }
                ProtocolEvent::ProtocolError(text) => {
                    self.violation(format!("ERROR received before the board dimension: {text}"))
                }
                other => self.violation(format!(
                    "{} received before the board dimension",
                    other.kind().keyword()
                )),
            },
            ClientState::Playing => {
                let applied = match event {
                    ProtocolEvent::DimensionAnnounced(dim) => {
                        return self.violation(format!("second dimension announcement ({dim})"));
                    }
                    ProtocolEvent::CellsUpdated(updates) => self.model.apply_cell_updates(&updates),
                    ProtocolEvent::TurnChanged(owner) => self.model.apply_turn_change(owner),
                    ProtocolEvent::GameOver(outcome) => {
                        if !self.advance(ClientState::GameOver) {
                            return ControlFlow::Break(());
                        }
                        info!(session = %self.session_id, ?outcome, "game over");
                        self.model.apply_game_over(outcome)
                    }
                    ProtocolEvent::ProtocolError(text) => return self.server_error(text),
                };
                match applied {
                    Ok(()) => ControlFlow::Continue(()),
                    Err(e) => self.violation(e.to_string()),
                }
            }
            // `on_line` filters these out before decoding.
            ClientState::GameOver | ClientState::Closed => ControlFlow::Break(()),
        }
    }

    fn on_end_of_stream(&self) {
        match self.state() {
            ClientState::Closed => {}
            ClientState::GameOver => {
                if self.close_quietly("server closed after game over") {
                    info!(session = %self.session_id, "server closed the connection");
                }
            }
            ClientState::Connecting | ClientState::AwaitingDimension | ClientState::Playing => {
                self.fail(Fault::ConnectionLost("server closed the connection".to_string()));
            }
        }
    }

    /// A line hit [`MAX_LINE_BYTES`] without a terminator.
    fn on_oversized_line(&self) -> ControlFlow<()> {
        match self.state() {
            ClientState::Closed => ControlFlow::Break(()),
            ClientState::GameOver => {
                debug!(session = %self.session_id, "ignoring oversized line after game over");
                ControlFlow::Continue(())
            }
            ClientState::Connecting | ClientState::AwaitingDimension | ClientState::Playing => {
                self.fail(Fault::MalformedMessage(format!(
                    "line longer than {MAX_LINE_BYTES} bytes"
                )));
                ControlFlow::Break(())
            }
        }
    }

    fn on_read_error(&self, e: io::Error) {
        let fault = if e.kind() == io::ErrorKind::InvalidData {
            Fault::MalformedMessage("line is not valid UTF-8".to_string())
        } else {
            Fault::ConnectionLost(e.to_string())
        };
        match self.state() {
            ClientState::GameOver => {
                self.close_quietly("read error after game over");
            }
            _ => self.fail(fault),
        }
    }
}

fn codec_detail(e: CodecError) -> String {
    match e {
        CodecError::MalformedMessage(detail) => detail,
        other => other.to_string(),
    }
}

// ── Receive loop ──────────────────────────────────────────────────────────────

/// Longest line the receive loop accepts, terminator included.
///
/// A full 26x26 `MOVE_MADE` broadcast is well under 6 KiB.
pub const MAX_LINE_BYTES: u64 = 8 * 1024;

fn receive_loop(shared: Arc<Shared>, mut reader: Box<dyn BufRead + Send>) {
    debug!(session = %shared.session_id, peer = %shared.peer, "receive loop started");
    let mut line = String::new();
    loop {
        if shared.state() == ClientState::Closed {
            break;
        }
        line.clear();
        match reader.by_ref().take(MAX_LINE_BYTES).read_line(&mut line) {
            Ok(0) => {
                shared.on_end_of_stream();
                break;
            }
            Ok(n) if n as u64 == MAX_LINE_BYTES && !line.ends_with('\n') => {
                if shared.on_oversized_line().is_break() {
                    break;
                }
            }
            Ok(_) => {
                if shared.on_line(&line).is_break() {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                if shared.state() != ClientState::Closed {
                    shared.on_read_error(e);
                }
                break;
            }
        }
    }
    debug!(session = %shared.session_id, "receive loop stopped");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
