//! Static game data and the board grid.
//!
//! - [`PieceKind`] / [`MinoType`] - piece kinds and matrix cell contents
//! - [`Piece`] - a piece placement plus the SRS rotation geometry
//! - [`KickTable`] - SRS and SRS+ wall kick tables
//! - [`BoardMatrix`] - the 40x10 grid with collision and line clearing

pub use self::{board_matrix::*, kick_table::*, mino::*, piece::*};

pub(crate) mod board_matrix;
pub(crate) mod kick_table;
pub(crate) mod mino;
pub(crate) mod piece;
