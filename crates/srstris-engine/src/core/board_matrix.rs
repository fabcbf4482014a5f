use std::fmt;

use crate::MatrixSizeError;

use super::{
    mino::MinoType,
    piece::{Piece, Position},
};

/// One matrix row, leftmost column first.
pub type MatrixRow = [MinoType; BoardMatrix::WIDTH];

/// Fixed 40x10 grid of cells: the locked blocks of a game.
///
/// Row 0 is the bottom of the playfield and row indices grow upward, so
/// gravity moves pieces toward lower rows. Only the bottom
/// [`BoardMatrix::VISIBLE_HEIGHT`] rows are normally shown; the rest is
/// buffer space for spawning and stacking out of view.
///
/// Collision bounds are the column range `[0, WIDTH)` and `row >= 0`. There
/// is no upper row bound: cells above the top row read as empty and are
/// dropped when stamped.
///
/// # Example
///
/// ```
/// use srstris_engine::{BoardMatrix, Piece, PieceKind};
///
/// let mut matrix = BoardMatrix::new();
/// let piece = Piece::new(PieceKind::O);
/// assert!(matrix.can_place(&piece));
///
/// matrix.stamp(&piece, PieceKind::O.mino());
/// assert!(!matrix.can_place(&piece));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardMatrix {
    rows: [MatrixRow; Self::HEIGHT],
}

impl Default for BoardMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardMatrix {
    pub const WIDTH: usize = 10;
    pub const HEIGHT: usize = 40;
    pub const VISIBLE_HEIGHT: usize = 20;

    const EMPTY_ROW: MatrixRow = [MinoType::Empty; Self::WIDTH];

    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: [Self::EMPTY_ROW; Self::HEIGHT],
        }
    }

    /// All rows, bottom first.
    #[must_use]
    pub fn rows(&self) -> &[MatrixRow; Self::HEIGHT] {
        &self.rows
    }

    /// The bottom [`Self::VISIBLE_HEIGHT`] rows, bottom first.
    pub fn visible_rows(&self) -> impl Iterator<Item = &MatrixRow> {
        self.rows[..Self::VISIBLE_HEIGHT].iter()
    }

    /// Returns the cell at `position`, or `None` when it lies outside the grid.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<MinoType> {
        let (row, col) = Self::index(position)?;
        Some(self.rows[row][col])
    }

    pub fn set(&mut self, position: Position, mino: MinoType) {
        if let Some((row, col)) = Self::index(position) {
            self.rows[row][col] = mino;
        }
    }

    fn index(position: Position) -> Option<(usize, usize)> {
        let row = usize::try_from(position.row).ok()?;
        let col = usize::try_from(position.col).ok()?;
        (row < Self::HEIGHT && col < Self::WIDTH).then_some((row, col))
    }

    fn is_free(&self, position: Position) -> bool {
        let in_columns = usize::try_from(position.col).is_ok_and(|col| col < Self::WIDTH);
        if position.row < 0 || !in_columns {
            return false;
        }
        // Above the top row counts as free space.
        self.get(position).is_none_or(MinoType::is_empty)
    }

    /// Whether `piece` fits: every cell within the columns, at or above the
    /// floor, and on an empty cell.
    #[must_use]
    pub fn can_place(&self, piece: &Piece) -> bool {
        piece.cells().into_iter().all(|cell| self.is_free(cell))
    }

    /// Writes `mino` into every cell of `piece`.
    pub fn stamp(&mut self, piece: &Piece, mino: MinoType) {
        for cell in piece.cells() {
            self.set(cell, mino);
        }
    }

    /// Removes every full row and returns how many were removed.
    ///
    /// A row is full when it has no empty cell and no
    /// [`MinoType::SolidGarbage`]. Rows above a removed row move down by one
    /// for each full row below them, and the vacated rows at the top become
    /// empty.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;
        for row in 0..Self::HEIGHT {
            if is_row_full(&self.rows[row]) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[row - count] = self.rows[row];
            }
        }
        self.rows[Self::HEIGHT - count..].fill(Self::EMPTY_ROW);
        count
    }

    /// Replaces the contents with `rows`, bottom row first, clearing
    /// everything not covered by the preset.
    ///
    /// Rows may be shorter than [`Self::WIDTH`]; missing cells are empty.
    pub fn set_rows<R>(&mut self, rows: &[R]) -> Result<(), MatrixSizeError>
    where
        R: AsRef<[MinoType]>,
    {
        let width = rows.iter().map(|row| row.as_ref().len()).max().unwrap_or(0);
        if rows.len() > Self::HEIGHT || width > Self::WIDTH {
            return Err(MatrixSizeError {
                rows: rows.len(),
                cols: width,
            });
        }
        self.clear();
        for (dst, src) in self.rows.iter_mut().zip(rows) {
            let src = src.as_ref();
            dst[..src.len()].copy_from_slice(src);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.rows.fill(Self::EMPTY_ROW);
    }

    fn highest_occupied_row(&self) -> Option<usize> {
        self.rows
            .iter()
            .rposition(|row| row.iter().any(|cell| !cell.is_empty()))
    }
}

fn is_row_full(row: &MatrixRow) -> bool {
    row.iter()
        .all(|&cell| !cell.is_empty() && cell != MinoType::SolidGarbage)
}

/// Draws the visible rows (more if the stack is higher), top row first.
impl fmt::Display for BoardMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let height = self
            .highest_occupied_row()
            .map_or(Self::VISIBLE_HEIGHT, |row| (row + 1).max(Self::VISIBLE_HEIGHT));
        for row in self.rows[..height].iter().rev() {
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PieceKind, Rotation};

    const B: MinoType = MinoType::Garbage;
    const E: MinoType = MinoType::Empty;

    fn full_row(mino: MinoType) -> MatrixRow {
        [mino; BoardMatrix::WIDTH]
    }

    fn holed_row(mino: MinoType, hole: usize) -> MatrixRow {
        let mut row = full_row(mino);
        row[hole] = E;
        row
    }

    #[test]
    fn test_initial_board_is_empty() {
        let matrix = BoardMatrix::new();
        assert!(matrix.rows().iter().flatten().all(|cell| cell.is_empty()));
        assert_eq!(matrix.visible_rows().count(), BoardMatrix::VISIBLE_HEIGHT);
    }

    #[test]
    fn test_can_place_respects_walls_and_floor() {
        let matrix = BoardMatrix::new();
        let piece = Piece::with_placement(PieceKind::I, Position::new(0, 1), Rotation::SPAWN);
        assert!(matrix.can_place(&piece));
        assert!(!matrix.can_place(&piece.left()));
        assert!(!matrix.can_place(&piece.down()));

        let right_edge = Piece::with_placement(PieceKind::I, Position::new(0, 7), Rotation::SPAWN);
        assert!(matrix.can_place(&right_edge));
        assert!(!matrix.can_place(&right_edge.right()));
    }

    #[test]
    fn test_can_place_has_no_upper_bound() {
        let matrix = BoardMatrix::new();
        let piece = Piece::with_placement(PieceKind::O, Position::new(45, 4), Rotation::SPAWN);
        assert!(matrix.can_place(&piece));

        let straddling = Piece::with_placement(PieceKind::O, Position::new(39, 4), Rotation::SPAWN);
        assert!(matrix.can_place(&straddling));
    }

    #[test]
    fn test_can_place_rejects_occupied_cells() {
        let mut matrix = BoardMatrix::new();
        matrix.set(Position::new(0, 4), MinoType::SolidGarbage);
        let piece = Piece::with_placement(PieceKind::O, Position::new(0, 4), Rotation::SPAWN);
        assert!(!matrix.can_place(&piece));
        assert!(matrix.can_place(&piece.up()));
    }

    #[test]
    fn test_stamp_drops_cells_above_top() {
        let mut matrix = BoardMatrix::new();
        let piece = Piece::with_placement(PieceKind::O, Position::new(39, 0), Rotation::SPAWN);
        matrix.stamp(&piece, MinoType::O);
        assert_eq!(matrix.get(Position::new(39, 0)), Some(MinoType::O));
        assert_eq!(matrix.get(Position::new(39, 1)), Some(MinoType::O));
        assert_eq!(matrix.get(Position::new(40, 0)), None);
    }

    #[test]
    fn test_clear_lines_two_separate_rows() {
        let mut matrix = BoardMatrix::new();
        let mut rows = Vec::new();
        for row in 0..8 {
            if row == 2 || row == 5 {
                rows.push(full_row(MinoType::T));
            } else {
                // Marks the original row index in the hole position.
                rows.push(holed_row(B, row % BoardMatrix::WIDTH));
            }
        }
        rows.push(full_row(MinoType::Empty));
        let mut top = full_row(E);
        top[0] = MinoType::L;
        rows.push(top);
        matrix.set_rows(&rows).unwrap();

        assert_eq!(matrix.clear_lines(), 2);

        let expected_holes = [0, 1, 3, 4, 6, 7];
        for (row, hole) in expected_holes.into_iter().enumerate() {
            assert_eq!(matrix.rows()[row], holed_row(B, hole), "row {row}");
        }
        assert_eq!(matrix.rows()[6], full_row(E));
        assert_eq!(matrix.rows()[7][0], MinoType::L);
        assert_eq!(matrix.rows()[BoardMatrix::HEIGHT - 1], full_row(E));
        assert_eq!(matrix.rows()[BoardMatrix::HEIGHT - 2], full_row(E));
    }

    #[test]
    fn test_clear_lines_cascading_stack() {
        let mut matrix = BoardMatrix::new();
        matrix
            .set_rows(&[
                full_row(B),
                full_row(B),
                full_row(B),
                holed_row(MinoType::J, 9),
            ])
            .unwrap();
        assert_eq!(matrix.clear_lines(), 3);
        assert_eq!(matrix.rows()[0], holed_row(MinoType::J, 9));
        assert_eq!(matrix.rows()[1], full_row(E));
    }

    #[test]
    fn test_clear_lines_top_row_full() {
        let mut matrix = BoardMatrix::new();
        let mut rows = vec![full_row(E); BoardMatrix::HEIGHT];
        rows[BoardMatrix::HEIGHT - 1] = full_row(B);
        rows[BoardMatrix::HEIGHT - 2] = holed_row(B, 3);
        matrix.set_rows(&rows).unwrap();

        assert_eq!(matrix.clear_lines(), 1);
        assert_eq!(matrix.rows()[BoardMatrix::HEIGHT - 2], holed_row(B, 3));
        assert_eq!(matrix.rows()[BoardMatrix::HEIGHT - 1], full_row(E));
    }

    #[test]
    fn test_solid_garbage_row_never_clears() {
        let mut matrix = BoardMatrix::new();
        let mut row = full_row(B);
        row[6] = MinoType::SolidGarbage;
        matrix.set_rows(&[row]).unwrap();

        assert_eq!(matrix.clear_lines(), 0);
        assert_eq!(matrix.rows()[0], row);
    }

    #[test]
    fn test_clear_lines_with_partial_lines() {
        let mut matrix = BoardMatrix::new();
        matrix.set_rows(&[holed_row(MinoType::I, 0)]).unwrap();
        assert_eq!(matrix.clear_lines(), 0);
        assert_eq!(matrix.rows()[0], holed_row(MinoType::I, 0));
    }

    #[test]
    fn test_set_rows_accepts_short_rows_and_rejects_oversize() {
        let mut matrix = BoardMatrix::new();
        matrix.set(Position::new(10, 0), MinoType::Z);
        matrix.set_rows(&[vec![B, E, B]]).unwrap();
        assert_eq!(matrix.get(Position::new(0, 2)), Some(B));
        assert_eq!(matrix.get(Position::new(0, 3)), Some(E));
        assert_eq!(matrix.get(Position::new(10, 0)), Some(E));

        let too_wide = vec![vec![B; BoardMatrix::WIDTH + 1]];
        let err = matrix.set_rows(&too_wide).unwrap_err();
        assert_eq!(err.cols, BoardMatrix::WIDTH + 1);

        let too_tall = vec![vec![B]; BoardMatrix::HEIGHT + 1];
        assert!(matrix.set_rows(&too_tall).is_err());
    }

    #[test]
    fn test_display_draws_top_row_first() {
        let mut matrix = BoardMatrix::new();
        matrix.set(Position::new(0, 0), MinoType::SolidGarbage);
        let text = matrix.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), BoardMatrix::VISIBLE_HEIGHT);
        assert_eq!(lines[BoardMatrix::VISIBLE_HEIGHT - 1], "#.........");
        assert_eq!(lines[0], "..........");
    }
}
