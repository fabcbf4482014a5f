//! Game logic on top of the core data.
//!
//! - [`GameField`] - matrix, falling piece, hold slot and queue; applies [`Move`]s
//! - [`GameBoard`] - one game: field plus [`GameStats`], run clock and lifecycle
//! - [`InputController`] - turns [`KeyStates`] into moves with DAS/ARR/SDR repeat
//! - [`PieceBuffer`] - 7-bag piece generation
//! - [`Settings`] - movement timing and kick table selection
//!
//! # Frame Flow
//!
//! 1. The device layer updates [`KeyStates`] with presses and releases
//! 2. [`InputController::process_frame`] turns the frame's key state and
//!    delta time into a list of moves
//! 3. The moves run against the [`GameBoard`] in order; a hard drop locks the
//!    piece, clears lines and spawns the next one
//! 4. The renderer reads [`GameBoard::render_matrix`] and the queue
//!
//! The board tops out when a freshly spawned piece has no room.

pub use self::{
    game_board::*, game_field::*, game_stats::*, input::*, piece_buffer::*, settings::*,
};

mod game_board;
mod game_field;
mod game_stats;
mod input;
mod piece_buffer;
mod settings;
