use serde::{Deserialize, Serialize};

use super::mino::PieceKind;

/// Spawn pivot row of every new piece.
pub const SPAWN_ROW: i32 = 21;
/// Spawn pivot column of every new piece.
pub const SPAWN_COL: i32 = 4;

/// A falling piece: kind, pivot position and rotation state.
///
/// Pieces are plain values. Movement and rotation return new `Piece`
/// instances; whether the result fits is decided by
/// [`BoardMatrix::can_place`](super::board_matrix::BoardMatrix::can_place).
///
/// # Example
///
/// ```
/// use srstris_engine::{Piece, PieceKind, Rotation};
///
/// let piece = Piece::new(PieceKind::T);
/// let moved = piece.left().rotated(Rotation::EAST);
/// assert_eq!(moved.rotation(), Rotation::EAST);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Piece {
    kind: PieceKind,
    position: Position,
    rotation: Rotation,
}

impl Piece {
    /// Creates a piece at the spawn pivot in spawn orientation.
    #[must_use]
    pub const fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            position: Position::SPAWN,
            rotation: Rotation::SPAWN,
        }
    }

    #[must_use]
    pub const fn with_placement(kind: PieceKind, position: Position, rotation: Rotation) -> Self {
        Self {
            kind,
            position,
            rotation,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Same placement, different kind. Used by the hold swap.
    #[must_use]
    pub const fn with_kind(self, kind: PieceKind) -> Self {
        Self { kind, ..self }
    }

    #[must_use]
    pub const fn with_position(self, position: Position) -> Self {
        Self { position, ..self }
    }

    #[must_use]
    pub const fn rotated(self, rotation: Rotation) -> Self {
        Self { rotation, ..self }
    }

    #[must_use]
    pub const fn shifted(self, offset: Offset) -> Self {
        self.with_position(self.position.offset(offset))
    }

    #[must_use]
    pub const fn left(self) -> Self {
        self.shifted(Offset::new(0, -1))
    }

    #[must_use]
    pub const fn right(self) -> Self {
        self.shifted(Offset::new(0, 1))
    }

    #[must_use]
    pub const fn up(self) -> Self {
        self.shifted(Offset::new(1, 0))
    }

    #[must_use]
    pub const fn down(self) -> Self {
        self.shifted(Offset::new(-1, 0))
    }

    /// Absolute matrix cells covered by this piece.
    #[must_use]
    pub fn cells(&self) -> [Position; 4] {
        self.kind
            .cell_offsets(self.rotation)
            .map(|offset| self.position.offset(offset))
    }
}

/// Pivot location on the matrix. Row 0 is the bottom row; rows grow upward.
///
/// Coordinates are signed because candidate positions probed during kicks
/// and wall snaps may lie outside the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const SPAWN: Self = Self::new(SPAWN_ROW, SPAWN_COL);

    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub const fn offset(self, offset: Offset) -> Self {
        Self::new(self.row + offset.row, self.col + offset.col)
    }
}

/// Relative (row, col) displacement, used for cell shapes and kicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    pub row: i32,
    pub col: i32,
}

impl Offset {
    pub const ZERO: Self = Self::new(0, 0);

    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// Rotation state of a piece.
///
/// - `0`: spawn / north
/// - `1`: right / east
/// - `2`: 180 / south
/// - `3`: left / west
///
/// Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rotation(u8);

impl Rotation {
    pub const SPAWN: Self = Self(0);
    pub const EAST: Self = Self(1);
    pub const SOUTH: Self = Self(2);
    pub const WEST: Self = Self(3);

    #[must_use]
    pub const fn clockwise(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    #[must_use]
    pub const fn anticlockwise(self) -> Self {
        Self((self.0 + 3) % 4)
    }

    #[must_use]
    pub const fn half_turn(self) -> Self {
        Self((self.0 + 2) % 4)
    }

    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for Rotation {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < 4 {
            Ok(Self(value))
        } else {
            Err(format!("rotation must be 0-3, got {value}"))
        }
    }
}

impl From<Rotation> for u8 {
    fn from(rotation: Rotation) -> Self {
        rotation.0
    }
}

impl PieceKind {
    /// Cell offsets from the pivot for the given rotation state.
    #[must_use]
    pub const fn cell_offsets(self, rotation: Rotation) -> [Offset; 4] {
        PIECE_SHAPES[self.index()][rotation.as_usize()]
    }
}

type PieceShape = [Offset; 4];

const fn shape(cells: [(i32, i32); 4]) -> PieceShape {
    let mut shape = [Offset::ZERO; 4];
    let mut i = 0;
    while i < 4 {
        shape[i] = Offset::new(cells[i].0, cells[i].1);
        i += 1;
    }
    shape
}

// (row, col) offsets, rows growing upward.
const PIECE_SHAPES: [[PieceShape; 4]; PieceKind::LEN] = [
    // I-piece
    [
        shape([(0, -1), (0, 0), (0, 1), (0, 2)]),
        shape([(1, 1), (0, 1), (-1, 1), (-2, 1)]),
        shape([(-1, -1), (-1, 0), (-1, 1), (-1, 2)]),
        shape([(1, 0), (0, 0), (-1, 0), (-2, 0)]),
    ],
    // J-piece
    [
        shape([(1, -1), (0, -1), (0, 0), (0, 1)]),
        shape([(1, 0), (1, 1), (0, 0), (-1, 0)]),
        shape([(0, -1), (0, 0), (0, 1), (-1, 1)]),
        shape([(1, 0), (0, 0), (-1, -1), (-1, 0)]),
    ],
    // L-piece
    [
        shape([(1, 1), (0, -1), (0, 0), (0, 1)]),
        shape([(1, 0), (0, 0), (-1, 0), (-1, 1)]),
        shape([(0, -1), (0, 0), (0, 1), (-1, -1)]),
        shape([(1, -1), (1, 0), (0, 0), (-1, 0)]),
    ],
    // O-piece
    [
        shape([(0, 0), (0, 1), (1, 0), (1, 1)]),
        shape([(0, 0), (0, 1), (1, 0), (1, 1)]),
        shape([(0, 0), (0, 1), (1, 0), (1, 1)]),
        shape([(0, 0), (0, 1), (1, 0), (1, 1)]),
    ],
    // S-piece
    [
        shape([(1, 0), (1, 1), (0, -1), (0, 0)]),
        shape([(1, 0), (0, 0), (0, 1), (-1, 1)]),
        shape([(0, 0), (0, 1), (-1, -1), (-1, 0)]),
        shape([(1, -1), (0, -1), (0, 0), (-1, 0)]),
    ],
    // T-piece
    [
        shape([(1, 0), (0, -1), (0, 0), (0, 1)]),
        shape([(1, 0), (0, 0), (0, 1), (-1, 0)]),
        shape([(0, -1), (0, 0), (0, 1), (-1, 0)]),
        shape([(1, 0), (0, -1), (0, 0), (-1, 0)]),
    ],
    // Z-piece
    [
        shape([(1, -1), (1, 0), (0, 0), (0, 1)]),
        shape([(1, 1), (0, 0), (0, 1), (-1, 0)]),
        shape([(0, -1), (0, 0), (-1, 0), (-1, 1)]),
        shape([(1, 0), (0, -1), (0, 0), (-1, -1)]),
    ],
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const ROTATIONS: [Rotation; 4] = [
        Rotation::SPAWN,
        Rotation::EAST,
        Rotation::SOUTH,
        Rotation::WEST,
    ];

    #[test]
    fn test_every_shape_has_four_distinct_cells() {
        for kind in PieceKind::ALL {
            for rotation in ROTATIONS {
                let cells: HashSet<_> = kind.cell_offsets(rotation).into_iter().collect();
                assert_eq!(cells.len(), 4, "{kind:?} rotation {rotation:?}");
            }
        }
    }

    #[test]
    fn test_rotation_arithmetic_wraps() {
        assert_eq!(Rotation::SPAWN.anticlockwise(), Rotation::WEST);
        assert_eq!(Rotation::WEST.clockwise(), Rotation::SPAWN);
        assert_eq!(Rotation::EAST.half_turn(), Rotation::WEST);
        let mut rotation = Rotation::SOUTH;
        for _ in 0..4 {
            rotation = rotation.clockwise();
        }
        assert_eq!(rotation, Rotation::SOUTH);
    }

    #[test]
    fn test_spawn_t_piece_cells() {
        let piece = Piece::new(PieceKind::T);
        assert_eq!(
            piece.cells(),
            [
                Position::new(22, 4),
                Position::new(21, 3),
                Position::new(21, 4),
                Position::new(21, 5),
            ]
        );
    }

    #[test]
    fn test_movement_returns_new_piece() {
        let piece = Piece::new(PieceKind::L);
        assert_eq!(piece.left().position(), Position::new(SPAWN_ROW, SPAWN_COL - 1));
        assert_eq!(piece.right().position(), Position::new(SPAWN_ROW, SPAWN_COL + 1));
        assert_eq!(piece.up().position(), Position::new(SPAWN_ROW + 1, SPAWN_COL));
        assert_eq!(piece.down().position(), Position::new(SPAWN_ROW - 1, SPAWN_COL));
        assert_eq!(piece.position(), Position::SPAWN);
    }

    #[test]
    fn test_rotation_serialization() {
        let piece = Piece::with_placement(PieceKind::S, Position::new(3, 7), Rotation::SOUTH);
        let json = serde_json::to_string(&piece).unwrap();
        let parsed: Piece = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, piece);
        assert!(serde_json::from_str::<Rotation>("4").is_err());
    }
}
