use crate::{
    MatrixSizeError, PieceCollisionError,
    core::{
        board_matrix::BoardMatrix,
        kick_table::KickTable,
        mino::{MinoType, PieceKind},
        piece::{Offset, Piece, Position, Rotation},
    },
};

use super::piece_buffer::{PieceBuffer, PieceSeed};

/// A discrete board command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    MoveLeft,
    MoveRight,
    /// Snap to the furthest reachable column on the left.
    DasLeft,
    /// Snap to the furthest reachable column on the right.
    DasRight,
    RotateClockwise,
    RotateAnticlockwise,
    Rotate180,
    HardDrop,
    /// Snap to the lowest reachable row without locking.
    SoftDrop,
    Hold,
    MoveUp,
    MoveDown,
}

/// Result of applying one [`Move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MoveOutcome {
    Applied,
    /// The move was blocked; nothing changed.
    Rejected,
    /// The piece locked and the next one spawned.
    Locked { cleared_lines: usize },
    /// The piece locked but the next one has no room at spawn.
    ToppedOut { cleared_lines: usize },
}

const LEFT: Offset = Offset::new(0, -1);
const RIGHT: Offset = Offset::new(0, 1);
const UP: Offset = Offset::new(1, 0);
const DOWN: Offset = Offset::new(-1, 0);

/// Single-piece game state: matrix, falling piece, hold slot and queue.
///
/// Every command either commits completely or leaves the field unchanged.
/// The ghost position is refreshed by [`GameField::update_ghost`], which the
/// caller runs once per batch of moves.
#[derive(Debug, Clone)]
pub struct GameField {
    matrix: BoardMatrix,
    kick_table: KickTable,
    current: Piece,
    ghost: Position,
    held: Option<PieceKind>,
    hold_used: bool,
    piece_buffer: PieceBuffer,
}

impl GameField {
    /// Creates an empty field and spawns the first piece from a fresh queue.
    #[must_use]
    pub fn new(kick_table: KickTable, seed: PieceSeed) -> Self {
        let mut piece_buffer = PieceBuffer::with_seed(seed);
        let current = Piece::new(piece_buffer.pop_next());
        let mut field = Self {
            matrix: BoardMatrix::new(),
            kick_table,
            current,
            ghost: current.position(),
            held: None,
            hold_used: false,
            piece_buffer,
        };
        field.update_ghost();
        field
    }

    #[must_use]
    pub fn matrix(&self) -> &BoardMatrix {
        &self.matrix
    }

    #[must_use]
    pub fn kick_table(&self) -> KickTable {
        self.kick_table
    }

    #[must_use]
    pub fn current_piece(&self) -> Piece {
        self.current
    }

    #[must_use]
    pub fn ghost_position(&self) -> Position {
        self.ghost
    }

    /// The current piece moved to the ghost position.
    #[must_use]
    pub fn ghost_piece(&self) -> Piece {
        self.current.with_position(self.ghost)
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.held
    }

    #[must_use]
    pub fn is_hold_used(&self) -> bool {
        self.hold_used
    }

    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.piece_buffer.next_pieces()
    }

    pub fn preview(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.piece_buffer.preview()
    }

    /// Moves the falling piece to `piece` if it fits.
    pub fn set_current_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if !self.matrix.can_place(&piece) {
            return Err(PieceCollisionError);
        }
        self.current = piece;
        Ok(())
    }

    /// Replaces the falling piece with a freshly spawned piece of `kind`.
    pub fn spawn_piece(&mut self, kind: PieceKind) {
        self.current = Piece::new(kind);
        self.update_ghost();
    }

    pub fn set_matrix<R>(&mut self, rows: &[R]) -> Result<(), MatrixSizeError>
    where
        R: AsRef<[MinoType]>,
    {
        self.matrix.set_rows(rows)?;
        self.update_ghost();
        Ok(())
    }

    pub fn replace_queue<I>(&mut self, pieces: I)
    where
        I: IntoIterator<Item = PieceKind>,
    {
        self.piece_buffer.replace_queue(pieces);
    }

    pub fn update_ghost(&mut self) {
        self.ghost = self.snapped(DOWN).position();
    }

    /// Applies one command.
    pub fn apply(&mut self, mv: Move) -> MoveOutcome {
        match mv {
            Move::MoveLeft => self.shift(LEFT),
            Move::MoveRight => self.shift(RIGHT),
            Move::MoveUp => self.shift(UP),
            Move::MoveDown => self.shift(DOWN),
            Move::DasLeft => self.snap(LEFT),
            Move::DasRight => self.snap(RIGHT),
            Move::SoftDrop => self.snap(DOWN),
            Move::RotateClockwise => self.rotate(self.current.rotation().clockwise()),
            Move::RotateAnticlockwise => self.rotate(self.current.rotation().anticlockwise()),
            Move::Rotate180 => self.rotate(self.current.rotation().half_turn()),
            Move::Hold => self.hold(),
            Move::HardDrop => self.hard_drop(),
        }
    }

    fn shift(&mut self, offset: Offset) -> MoveOutcome {
        match self.set_current_piece(self.current.shifted(offset)) {
            Ok(()) => MoveOutcome::Applied,
            Err(PieceCollisionError) => MoveOutcome::Rejected,
        }
    }

    /// Furthest placement reachable by repeating `step` from the current piece.
    fn snapped(&self, step: Offset) -> Piece {
        let mut piece = self.current;
        loop {
            let next = piece.shifted(step);
            if !self.matrix.can_place(&next) {
                return piece;
            }
            piece = next;
        }
    }

    fn snap(&mut self, step: Offset) -> MoveOutcome {
        let snapped = self.snapped(step);
        if snapped == self.current {
            return MoveOutcome::Rejected;
        }
        self.current = snapped;
        MoveOutcome::Applied
    }

    /// SRS rotation: the first kick offset that yields a valid placement wins.
    fn rotate(&mut self, to: Rotation) -> MoveOutcome {
        let rotated = self.current.rotated(to);
        let kicked = self
            .kick_table
            .kicks(self.current.kind(), self.current.rotation(), to)
            .iter()
            .map(|&offset| rotated.shifted(offset))
            .find(|piece| self.matrix.can_place(piece));
        match kicked {
            Some(piece) => {
                self.current = piece;
                MoveOutcome::Applied
            }
            None => MoveOutcome::Rejected,
        }
    }

    /// Stores the current piece. An empty slot draws the next piece from the
    /// queue; an occupied slot swaps kinds in place, keeping the current
    /// position and rotation.
    fn hold(&mut self) -> MoveOutcome {
        if self.hold_used {
            return MoveOutcome::Rejected;
        }
        self.hold_used = true;
        match self.held.replace(self.current.kind()) {
            Some(held) => self.current = self.current.with_kind(held),
            None => self.spawn_next(),
        }
        MoveOutcome::Applied
    }

    fn hard_drop(&mut self) -> MoveOutcome {
        let landed = self.snapped(DOWN);
        self.matrix.stamp(&landed, landed.kind().mino());
        let cleared_lines = self.matrix.clear_lines();
        self.hold_used = false;
        self.spawn_next();
        if self.matrix.can_place(&self.current) {
            MoveOutcome::Locked { cleared_lines }
        } else {
            MoveOutcome::ToppedOut { cleared_lines }
        }
    }

    fn spawn_next(&mut self) {
        self.current = Piece::new(self.piece_buffer.pop_next());
    }

    /// Copy of the matrix with the next piece's spawn preview, the ghost and
    /// the falling piece drawn in, later layers on top.
    #[must_use]
    pub fn render_matrix(&self) -> BoardMatrix {
        let mut matrix = self.matrix.clone();
        if let Some(next) = self.piece_buffer.front() {
            matrix.stamp(&Piece::new(next), MinoType::SpawnPreview);
        }
        matrix.stamp(&self.ghost_piece(), self.current.kind().ghost());
        matrix.stamp(&self.current, self.current.kind().mino());
        matrix
    }
}
