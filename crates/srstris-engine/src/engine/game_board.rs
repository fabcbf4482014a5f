use std::time::{Duration, Instant};

use crate::{
    MatrixSizeError,
    core::{
        board_matrix::BoardMatrix,
        kick_table::KickTable,
        mino::{MinoType, PieceKind},
        piece::{Piece, Position},
    },
};

use super::{
    game_field::{GameField, Move, MoveOutcome},
    game_stats::GameStats,
    piece_buffer::PieceSeed,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum BoardState {
    /// Loaded, waiting for the first input.
    Paused,
    Running,
    /// Topped out. Only [`GameBoard::load`] leaves this state.
    GameOver,
}

/// One game from load to top-out.
///
/// Wraps a [`GameField`] with run statistics, the run clock and the
/// Paused / Running / `GameOver` lifecycle. The kick table is fixed at
/// construction; everything else is reset by [`GameBoard::load`].
///
/// # Example
///
/// ```
/// use srstris_engine::{GameBoard, KickTable, Move, PieceSeed};
///
/// let mut board = GameBoard::with_seed(KickTable::SrsPlus, PieceSeed::from_u128(7));
/// assert!(board.is_paused());
///
/// board.start();
/// board.execute_moves(&[Move::DasLeft, Move::HardDrop]);
/// assert_eq!(board.stats().pieces_placed(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameBoard {
    field: GameField,
    stats: GameStats,
    state: BoardState,
    seed: PieceSeed,
    start_time: Instant,
    stop_time: Instant,
}

impl GameBoard {
    /// Creates a board loaded with a seed drawn from system entropy.
    #[must_use]
    pub fn new(kick_table: KickTable) -> Self {
        Self::with_seed(kick_table, PieceSeed::from_entropy())
    }

    #[must_use]
    pub fn with_seed(kick_table: KickTable, seed: PieceSeed) -> Self {
        let now = Instant::now();
        let mut board = Self {
            field: GameField::new(kick_table, seed),
            stats: GameStats::new(),
            state: BoardState::Paused,
            seed,
            start_time: now,
            stop_time: now,
        };
        board.load_with_seed(seed);
        board
    }

    /// Resets the whole game with a fresh entropy seed.
    pub fn load(&mut self) {
        self.load_with_seed(PieceSeed::from_entropy());
    }

    /// Resets the whole game: empty matrix, new queue, zeroed counters, empty
    /// hold. The board ends up paused with a zero run clock.
    pub fn load_with_seed(&mut self, seed: PieceSeed) {
        let now = Instant::now();
        self.field = GameField::new(self.field.kick_table(), seed);
        self.stats = GameStats::new();
        self.state = BoardState::Paused;
        self.seed = seed;
        self.start_time = now;
        self.stop_time = now;
        tracing::debug!(%seed, kick_table = ?self.field.kick_table(), "board loaded");
    }

    /// Starts the run clock. Only a paused board starts.
    pub fn start(&mut self) {
        if self.state.is_paused() {
            self.state = BoardState::Running;
            self.start_time = Instant::now();
            tracing::debug!("board started");
        }
    }

    fn stop(&mut self) {
        self.stop_time = Instant::now();
    }

    /// Applies `moves` in order. Ignored unless the board is running.
    ///
    /// A top-out ends the game and discards the remaining moves.
    pub fn execute_moves(&mut self, moves: &[Move]) {
        if !self.state.is_running() {
            return;
        }
        for &mv in moves {
            match self.field.apply(mv) {
                MoveOutcome::Applied | MoveOutcome::Rejected => {}
                MoveOutcome::Locked { cleared_lines } => {
                    self.stats.complete_piece_drop(cleared_lines);
                }
                MoveOutcome::ToppedOut { cleared_lines } => {
                    self.stats.complete_piece_drop(cleared_lines);
                    self.stop();
                    self.state = BoardState::GameOver;
                    tracing::info!(
                        pieces = self.stats.pieces_placed(),
                        lines = self.stats.lines_cleared(),
                        elapsed = ?self.elapsed(),
                        "game over"
                    );
                    break;
                }
            }
        }
        self.field.update_ghost();
    }

    /// Run time: up to now while running, frozen otherwise.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        match self.state {
            BoardState::Running => self.start_time.elapsed(),
            BoardState::Paused | BoardState::GameOver => {
                self.stop_time.saturating_duration_since(self.start_time)
            }
        }
    }

    #[must_use]
    pub fn state(&self) -> BoardState {
        self.state
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn kick_table(&self) -> KickTable {
        self.field.kick_table()
    }

    #[must_use]
    pub fn matrix(&self) -> &BoardMatrix {
        self.field.matrix()
    }

    #[must_use]
    pub fn current_piece(&self) -> Piece {
        self.field.current_piece()
    }

    #[must_use]
    pub fn ghost_position(&self) -> Position {
        self.field.ghost_position()
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.field.held_piece()
    }

    #[must_use]
    pub fn is_hold_used(&self) -> bool {
        self.field.is_hold_used()
    }

    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.field.next_pieces()
    }

    pub fn preview(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.field.preview()
    }

    /// Matrix with the next spawn preview, the ghost and the falling piece
    /// drawn in.
    #[must_use]
    pub fn render_matrix(&self) -> BoardMatrix {
        self.field.render_matrix()
    }

    /// Loads a preset stack, bottom row first.
    pub fn set_matrix<R>(&mut self, rows: &[R]) -> Result<(), MatrixSizeError>
    where
        R: AsRef<[MinoType]>,
    {
        self.field.set_matrix(rows)
    }

    /// Replaces the falling piece with a freshly spawned `kind`.
    pub fn spawn_piece(&mut self, kind: PieceKind) {
        self.field.spawn_piece(kind);
    }

    pub fn replace_queue<I>(&mut self, pieces: I)
    where
        I: IntoIterator<Item = PieceKind>,
    {
        self.field.replace_queue(pieces);
    }
}
