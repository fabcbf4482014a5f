use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// The seven tetromino kinds.
///
/// Declaration order is the canonical bag order (I, J, L, O, S, T, Z) and is
/// used to index the geometry and kick tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// Z-piece.
    Z = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    /// Every kind, in bag order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// The cell kind a locked piece of this kind leaves on the board.
    #[must_use]
    pub const fn mino(self) -> MinoType {
        match self {
            PieceKind::I => MinoType::I,
            PieceKind::J => MinoType::J,
            PieceKind::L => MinoType::L,
            PieceKind::O => MinoType::O,
            PieceKind::S => MinoType::S,
            PieceKind::T => MinoType::T,
            PieceKind::Z => MinoType::Z,
        }
    }

    /// The translucent variant used to draw this kind's landing preview.
    #[must_use]
    pub const fn ghost(self) -> MinoType {
        match self {
            PieceKind::I => MinoType::GhostI,
            PieceKind::J => MinoType::GhostJ,
            PieceKind::L => MinoType::GhostL,
            PieceKind::O => MinoType::GhostO,
            PieceKind::S => MinoType::GhostS,
            PieceKind::T => MinoType::GhostT,
            PieceKind::Z => MinoType::GhostZ,
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use srstris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use srstris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('S'), Some(PieceKind::S));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// Contents of a single matrix cell.
///
/// Every variant other than [`MinoType::Empty`] counts as occupied for
/// collision. The variant also selects the color a renderer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[repr(u8)]
pub enum MinoType {
    #[default]
    Empty,
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
    /// Ordinary garbage, cleared like any other block.
    Garbage,
    /// Indestructible garbage. A row holding one of these never clears.
    SolidGarbage,
    GhostI,
    GhostJ,
    GhostL,
    GhostO,
    GhostS,
    GhostT,
    GhostZ,
    /// Marks where the next piece will appear. Never stored in the matrix.
    SpawnPreview,
}

impl MinoType {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, MinoType::Empty)
    }

    #[must_use]
    pub const fn is_ghost(self) -> bool {
        matches!(
            self,
            MinoType::GhostI
                | MinoType::GhostJ
                | MinoType::GhostL
                | MinoType::GhostO
                | MinoType::GhostS
                | MinoType::GhostT
                | MinoType::GhostZ
        )
    }

    /// The piece kind a block or ghost cell belongs to.
    #[must_use]
    pub const fn piece_kind(self) -> Option<PieceKind> {
        match self {
            MinoType::I | MinoType::GhostI => Some(PieceKind::I),
            MinoType::J | MinoType::GhostJ => Some(PieceKind::J),
            MinoType::L | MinoType::GhostL => Some(PieceKind::L),
            MinoType::O | MinoType::GhostO => Some(PieceKind::O),
            MinoType::S | MinoType::GhostS => Some(PieceKind::S),
            MinoType::T | MinoType::GhostT => Some(PieceKind::T),
            MinoType::Z | MinoType::GhostZ => Some(PieceKind::Z),
            MinoType::Empty
            | MinoType::Garbage
            | MinoType::SolidGarbage
            | MinoType::SpawnPreview => None,
        }
    }

    /// Character used by the ASCII board dump.
    ///
    /// Blocks use their piece letter, ghosts the lowercase letter.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            MinoType::Empty => '.',
            MinoType::Garbage => 'G',
            MinoType::SolidGarbage => '#',
            MinoType::SpawnPreview => 'x',
            MinoType::I => 'I',
            MinoType::J => 'J',
            MinoType::L => 'L',
            MinoType::O => 'O',
            MinoType::S => 'S',
            MinoType::T => 'T',
            MinoType::Z => 'Z',
            MinoType::GhostI => 'i',
            MinoType::GhostJ => 'j',
            MinoType::GhostL => 'l',
            MinoType::GhostO => 'o',
            MinoType::GhostS => 's',
            MinoType::GhostT => 't',
            MinoType::GhostZ => 'z',
        }
    }
}
