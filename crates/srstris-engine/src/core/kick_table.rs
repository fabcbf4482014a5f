use serde::{Deserialize, Serialize};

use super::{
    mino::PieceKind,
    piece::{Offset, Rotation},
};

/// Wall kick rule set a board resolves rotations with.
///
/// Both tables are indexed by piece kind and the (from, to) rotation pair.
/// Each entry is an ordered list of pivot displacements; the first one is
/// always the zero offset, so an unobstructed rotation never moves the piece.
///
/// - [`KickTable::Srs`]: the guideline Super Rotation System. 180 degree
///   rotations have no kicks.
/// - [`KickTable::SrsPlus`]: SRS with 180 degree kicks and symmetric I kicks.
///
/// # Example
///
/// ```
/// use srstris_engine::{KickTable, PieceKind, Rotation};
///
/// let kicks = KickTable::Srs.kicks(PieceKind::T, Rotation::SPAWN, Rotation::EAST);
/// assert_eq!(kicks.len(), 5);
/// assert_eq!((kicks[0].row, kicks[0].col), (0, 0));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KickTable {
    Srs,
    #[default]
    SrsPlus,
}

type KickList = &'static [Offset];
type KickMatrix = [[KickList; 4]; 4];

impl KickTable {
    /// Candidate pivot displacements for rotating `kind` from `from` to `to`.
    #[must_use]
    pub fn kicks(self, kind: PieceKind, from: Rotation, to: Rotation) -> &'static [Offset] {
        let matrix = match (self, kind) {
            (_, PieceKind::O) => &O_KICKS,
            (KickTable::Srs, PieceKind::I) => &I_SRS_KICKS,
            (KickTable::SrsPlus, PieceKind::I) => &I_SRS_PLUS_KICKS,
            (KickTable::Srs, _) => &JLSTZ_SRS_KICKS,
            (KickTable::SrsPlus, _) => &JLSTZ_SRS_PLUS_KICKS,
        };
        matrix[from.as_usize()][to.as_usize()]
    }
}

macro_rules! kicks {
    ($(($row:expr, $col:expr)),* $(,)?) => {
        &[$(Offset::new($row, $col)),*]
    };
}

const NONE: KickList = kicks![(0, 0)];

// Offsets are (row, col) with rows growing upward, i.e. the transposed
// (x, y) pairs of the usual SRS charts.
const JLSTZ_SRS_KICKS: KickMatrix = [
    [
        NONE,
        kicks![(0, 0), (0, -1), (1, -1), (-2, 0), (-2, -1)],
        NONE,
        kicks![(0, 0), (0, 1), (1, 1), (-2, 0), (-2, 1)],
    ],
    [
        kicks![(0, 0), (0, 1), (-1, 1), (2, 0), (2, 1)],
        NONE,
        kicks![(0, 0), (0, 1), (-1, 1), (2, 0), (2, 1)],
        NONE,
    ],
    [
        NONE,
        kicks![(0, 0), (0, -1), (1, -1), (-2, 0), (-2, -1)],
        NONE,
        kicks![(0, 0), (0, 1), (1, 1), (-2, 0), (-2, 1)],
    ],
    [
        kicks![(0, 0), (0, -1), (-1, -1), (2, 0), (2, -1)],
        NONE,
        kicks![(0, 0), (0, -1), (-1, -1), (2, 0), (2, -1)],
        NONE,
    ],
];

const JLSTZ_SRS_PLUS_KICKS: KickMatrix = [
    [
        NONE,
        kicks![(0, 0), (0, -1), (1, -1), (-2, 0), (-2, -1)],
        kicks![(0, 0), (1, 0), (1, 1), (1, -1), (0, 1), (0, -1)],
        kicks![(0, 0), (0, 1), (1, 1), (-2, 0), (-2, 1)],
    ],
    [
        kicks![(0, 0), (0, 1), (-1, 1), (2, 0), (2, 1)],
        NONE,
        kicks![(0, 0), (0, 1), (-1, 1), (2, 0), (2, 1)],
        kicks![(0, 0), (0, 1), (2, 1), (1, 1), (2, 0), (1, 0)],
    ],
    [
        kicks![(0, 0), (-1, 0), (-1, -1), (-1, 1), (0, -1), (0, 1)],
        kicks![(0, 0), (0, -1), (1, -1), (-2, 0), (-2, -1)],
        NONE,
        kicks![(0, 0), (0, 1), (1, 1), (-2, 0), (-2, 1)],
    ],
    [
        kicks![(0, 0), (0, -1), (-1, -1), (2, 0), (2, -1)],
        kicks![(0, 0), (0, -1), (2, -1), (1, -1), (2, 0), (1, 0)],
        kicks![(0, 0), (0, -1), (-1, -1), (2, 0), (2, -1)],
        NONE,
    ],
];

const O_KICKS: KickMatrix = [[NONE; 4]; 4];

const I_SRS_KICKS: KickMatrix = [
    [
        NONE,
        kicks![(0, 0), (0, -2), (0, 1), (-1, -2), (2, 1)],
        NONE,
        kicks![(0, 0), (0, -1), (0, 2), (2, -1), (-1, 2)],
    ],
    [
        kicks![(0, 0), (0, 2), (0, -1), (1, 2), (-2, -1)],
        NONE,
        kicks![(0, 0), (0, -1), (0, 2), (2, -1), (-1, 2)],
        NONE,
    ],
    [
        NONE,
        kicks![(0, 0), (0, 1), (0, -2), (-2, 1), (1, -2)],
        NONE,
        kicks![(0, 0), (0, 2), (0, -1), (1, 2), (-2, -1)],
    ],
    [
        kicks![(0, 0), (0, 1), (0, -2), (-2, 1), (1, -2)],
        NONE,
        kicks![(0, 0), (0, -2), (0, 1), (-1, -2), (2, 1)],
        NONE,
    ],
];

const I_SRS_PLUS_KICKS: KickMatrix = [
    [
        NONE,
        kicks![(0, 0), (0, 1), (0, -2), (-1, -2), (2, 1)],
        kicks![(0, 0), (1, 0), (1, 1), (1, -1), (0, 1), (0, -1)],
        kicks![(0, 0), (0, -1), (0, 2), (-1, 2), (2, -1)],
    ],
    [
        kicks![(0, 0), (0, -1), (0, 2), (-2, -1), (1, 2)],
        NONE,
        kicks![(0, 0), (0, -1), (0, 2), (2, -1), (-1, 2)],
        kicks![(0, 0), (0, 1), (2, 1), (1, 1), (2, 0), (1, 0)],
    ],
    [
        kicks![(0, 0), (-1, 0), (-1, -1), (-1, 1), (0, -1), (0, 1)],
        kicks![(0, 0), (0, -2), (0, -1), (1, -2), (-2, 1)],
        NONE,
        kicks![(0, 0), (0, 2), (0, -1), (1, 2), (-2, -1)],
    ],
    [
        kicks![(0, 0), (0, 1), (0, -2), (-2, 1), (1, -2)],
        kicks![(0, 0), (0, -1), (2, -1), (1, -1), (2, 0), (1, 0)],
        kicks![(0, 0), (0, 1), (0, -2), (2, 1), (-1, -2)],
        NONE,
    ],
];
