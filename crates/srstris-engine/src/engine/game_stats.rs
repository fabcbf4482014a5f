use std::time::Duration;

use serde::Serialize;

/// Per-run counters.
///
/// - **Lines cleared**: total rows removed
/// - **Pieces placed**: hard drops completed
/// - **Combo**: consecutive hard drops that each cleared at least one row
/// - **Line clear distribution**: drops by rows cleared (0 to 4)
///
/// # Example
///
/// ```
/// use srstris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(1);
/// stats.complete_piece_drop(4);
/// assert_eq!(stats.combo(), 2);
/// assert_eq!(stats.lines_cleared(), 5);
///
/// stats.complete_piece_drop(0);
/// assert_eq!(stats.combo(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    lines_cleared: usize,
    pieces_placed: usize,
    combo: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines_cleared: 0,
            pieces_placed: 0,
            combo: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn lines_cleared(&self) -> usize {
        self.lines_cleared
    }

    #[must_use]
    pub const fn pieces_placed(&self) -> usize {
        self.pieces_placed
    }

    #[must_use]
    pub const fn combo(&self) -> usize {
        self.combo
    }

    /// Histogram of drops by number of rows cleared.
    ///
    /// - `[0]`: drops clearing nothing
    /// - `[1]`..`[4]`: singles, doubles, triples, quads
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Attack sent to an opponent. Versus play is not modeled, so always 0.
    #[must_use]
    pub const fn attack(&self) -> usize {
        0
    }

    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn pieces_per_second(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs > 0.0 {
            self.pieces_placed as f64 / secs
        } else {
            0.0
        }
    }

    /// Records one hard drop that cleared `cleared_lines` rows.
    pub const fn complete_piece_drop(&mut self, cleared_lines: usize) {
        self.pieces_placed += 1;
        self.lines_cleared += cleared_lines;
        if cleared_lines < self.line_cleared_counter.len() {
            self.line_cleared_counter[cleared_lines] += 1;
        }
        if cleared_lines > 0 {
            self.combo += 1;
        } else {
            self.combo = 0;
        }
    }
}
