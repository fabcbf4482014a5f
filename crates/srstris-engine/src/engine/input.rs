use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{game_board::GameBoard, game_field::Move, settings::RepeatTiming};

/// A bindable player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    SoftDrop,
    HardDrop,
    Hold,
    RotateClockwise,
    RotateAnticlockwise,
    Rotate180,
    Restart,
}

impl Action {
    pub const LEN: usize = 11;

    pub const ALL: [Self; Self::LEN] = [
        Self::MoveLeft,
        Self::MoveRight,
        Self::MoveUp,
        Self::MoveDown,
        Self::SoftDrop,
        Self::HardDrop,
        Self::Hold,
        Self::RotateClockwise,
        Self::RotateAnticlockwise,
        Self::Rotate180,
        Self::Restart,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Physical state of one key.
///
/// `down` mirrors the device. `processed` is set once the controller has
/// consumed the press and cleared again on release, so a held key is
/// `down && processed`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeyState {
    pub down: bool,
    pub processed: bool,
}

/// Key state for every [`Action`], shared between the device layer and the
/// [`InputController`].
#[derive(Debug, Default, Clone)]
pub struct KeyStates {
    keys: [KeyState; Action::LEN],
}

impl KeyStates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, action: Action) -> KeyState {
        self.keys[action.index()]
    }

    pub fn press(&mut self, action: Action) {
        self.keys[action.index()].down = true;
    }

    pub fn release(&mut self, action: Action) {
        self.keys[action.index()] = KeyState::default();
    }

    /// Held past the frame that consumed the press.
    fn is_held(&self, action: Action) -> bool {
        let key = self.get(action);
        key.down && key.processed
    }

    /// Consumes a new press, returning whether there was one.
    fn take_press(&mut self, action: Action) -> bool {
        let key = &mut self.keys[action.index()];
        if key.down && !key.processed {
            key.processed = true;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Left,
    Right,
}

impl Direction {
    const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    const fn step(self) -> Move {
        match self {
            Self::Left => Move::MoveLeft,
            Self::Right => Move::MoveRight,
        }
    }

    const fn snap(self) -> Move {
        match self {
            Self::Left => Move::DasLeft,
            Self::Right => Move::DasRight,
        }
    }
}

/// Taps handled before soft drop.
const MOVEMENT_TAPS: [(Action, Move); 6] = [
    (Action::MoveLeft, Move::MoveLeft),
    (Action::MoveRight, Move::MoveRight),
    (Action::MoveUp, Move::MoveUp),
    (Action::MoveDown, Move::MoveDown),
    (Action::Rotate180, Move::Rotate180),
    (Action::RotateAnticlockwise, Move::RotateAnticlockwise),
];

/// Taps handled last, so buffered movement lands before the next spawn.
const LOCKING_TAPS: [(Action, Move); 3] = [
    (Action::HardDrop, Move::HardDrop),
    (Action::Hold, Move::Hold),
    (Action::RotateClockwise, Move::RotateClockwise),
];

/// Turns per-frame key state into board moves.
///
/// Horizontal keys auto-repeat: after a key has been held for DAS, it moves
/// once and then once per ARR interval (or snaps to the wall every frame when
/// ARR is zero). Soft drop repeats every SDR interval (or snaps when SDR is
/// zero). Timer remainders carry between frames, so the number of moves
/// depends only on total held time, not on how it is split into frames.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use srstris_engine::{Action, GameBoard, InputController, KeyStates, KickTable, Move, RepeatTiming};
///
/// let mut board = GameBoard::new(KickTable::SrsPlus);
/// let mut keys = KeyStates::new();
/// let mut input = InputController::new(RepeatTiming::default());
///
/// keys.press(Action::HardDrop);
/// let moves = input.process_frame(Duration::from_millis(16), &mut keys, &mut board);
/// assert_eq!(moves, [Move::HardDrop]);
/// assert!(board.is_running());
/// ```
#[derive(Debug, Clone)]
pub struct InputController {
    timing: RepeatTiming,
    das_timer: Duration,
    /// `None` until the first repeat after DAS charges.
    arr_timer: Option<Duration>,
    soft_drop_timer: Duration,
    last_direction: Option<Direction>,
}

impl InputController {
    #[must_use]
    pub fn new(timing: RepeatTiming) -> Self {
        Self {
            timing,
            das_timer: Duration::ZERO,
            arr_timer: None,
            soft_drop_timer: Duration::ZERO,
            last_direction: None,
        }
    }

    #[must_use]
    pub fn timing(&self) -> RepeatTiming {
        self.timing
    }

    /// Processes one frame of `dt` and applies the resulting moves to
    /// `board`, starting it if it was paused.
    ///
    /// Returns the moves in the order they were applied.
    pub fn process_frame(
        &mut self,
        dt: Duration,
        keys: &mut KeyStates,
        board: &mut GameBoard,
    ) -> Vec<Move> {
        let mut moves = Vec::new();

        if keys.take_press(Action::Restart) {
            board.load();
        }
        if board.is_game_over() {
            return moves;
        }

        self.auto_shift(dt, keys, &mut moves);
        for (action, mv) in MOVEMENT_TAPS {
            if keys.take_press(action) {
                moves.push(mv);
            }
        }
        self.soft_drop(dt, keys, &mut moves);
        for (action, mv) in LOCKING_TAPS {
            if keys.take_press(action) {
                moves.push(mv);
            }
        }

        if !moves.is_empty() {
            tracing::trace!(?moves, "frame moves");
            board.start();
            board.execute_moves(&moves);
        }
        moves
    }

    fn reset_das(&mut self) {
        self.das_timer = Duration::ZERO;
        self.arr_timer = None;
    }

    fn held_direction(&mut self, direction: Direction) -> Direction {
        if self.timing.reset_das_on_direction_change
            && self.last_direction == Some(direction.opposite())
        {
            self.reset_das();
        }
        self.last_direction = Some(direction);
        direction
    }

    fn auto_shift(&mut self, dt: Duration, keys: &KeyStates, moves: &mut Vec<Move>) {
        let left = keys.is_held(Action::MoveLeft);
        let right = keys.is_held(Action::MoveRight);
        if !left && !right {
            self.reset_das();
            self.last_direction = None;
            return;
        }

        self.das_timer += dt;
        let direction = match (left, right) {
            (true, true) => {
                if self.timing.reset_das_on_direction_change {
                    self.reset_das();
                }
                // Both held: the key pressed later wins.
                match self.last_direction {
                    Some(Direction::Left) => Direction::Right,
                    _ => Direction::Left,
                }
            }
            (true, false) => self.held_direction(Direction::Left),
            _ => self.held_direction(Direction::Right),
        };

        if self.das_timer < self.timing.das {
            return;
        }
        if self.timing.arr.is_zero() {
            moves.push(direction.snap());
            return;
        }

        let mut arr_timer = match self.arr_timer {
            Some(timer) => timer + dt,
            None => {
                moves.push(direction.step());
                self.das_timer - self.timing.das
            }
        };
        while arr_timer >= self.timing.arr {
            moves.push(direction.step());
            arr_timer -= self.timing.arr;
        }
        self.arr_timer = Some(arr_timer);
    }

    fn soft_drop(&mut self, dt: Duration, keys: &mut KeyStates, moves: &mut Vec<Move>) {
        let sdr = self.timing.sdr;
        if keys.take_press(Action::SoftDrop) {
            self.soft_drop_timer = Duration::ZERO;
            moves.push(if sdr.is_zero() {
                Move::SoftDrop
            } else {
                Move::MoveDown
            });
            return;
        }
        if !keys.is_held(Action::SoftDrop) {
            return;
        }
        if sdr.is_zero() {
            moves.push(Move::SoftDrop);
            return;
        }
        self.soft_drop_timer += dt;
        while self.soft_drop_timer >= sdr {
            moves.push(Move::MoveDown);
            self.soft_drop_timer -= sdr;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KickTable, MinoType, PieceKind, PieceSeed, core::board_matrix::BoardMatrix};

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn timing(das: u64, arr: u64, sdr: u64, reset: bool) -> RepeatTiming {
        RepeatTiming {
            das: ms(das),
            arr: ms(arr),
            sdr: ms(sdr),
            reset_das_on_direction_change: reset,
        }
    }

    fn board() -> GameBoard {
        GameBoard::with_seed(KickTable::SrsPlus, PieceSeed::from_u128(11))
    }

    fn count(moves: &[Move], mv: Move) -> usize {
        moves.iter().filter(|&&m| m == mv).count()
    }

    fn hold_left_for(frames: &[u64]) -> usize {
        let mut board = board();
        let mut keys = KeyStates::new();
        let mut input = InputController::new(timing(200, 50, 0, true));

        keys.press(Action::MoveLeft);
        let tap = input.process_frame(ms(16), &mut keys, &mut board);
        assert_eq!(tap, [Move::MoveLeft]);

        frames
            .iter()
            .map(|&dt| count(&input.process_frame(ms(dt), &mut keys, &mut board), Move::MoveLeft))
            .sum()
    }

    #[test]
    fn test_repeat_count_is_frame_rate_independent() {
        let irregular = [17, 33, 50, 7, 93, 100, 40, 60, 25, 75];
        let steady = [10; 50];
        let single = [500];
        for frames in [&irregular[..], &steady[..], &single[..]] {
            assert_eq!(frames.iter().sum::<u64>(), 500);
            assert_eq!(hold_left_for(frames), 7, "{frames:?}");
        }
    }

    #[test]
    fn test_no_repeat_before_das() {
        assert_eq!(hold_left_for(&[100, 99]), 0);
        assert_eq!(hold_left_for(&[100, 100]), 1);
    }

    #[test]
    fn test_zero_arr_snaps_every_frame() {
        let mut board = board();
        let mut keys = KeyStates::new();
        let mut input = InputController::new(timing(200, 0, 0, true));

        keys.press(Action::MoveLeft);
        assert_eq!(input.process_frame(ms(16), &mut keys, &mut board), [Move::MoveLeft]);
        assert!(input.process_frame(ms(100), &mut keys, &mut board).is_empty());
        assert_eq!(input.process_frame(ms(100), &mut keys, &mut board), [Move::DasLeft]);
        assert_eq!(input.process_frame(ms(16), &mut keys, &mut board), [Move::DasLeft]);

        keys.release(Action::MoveLeft);
        assert!(input.process_frame(ms(16), &mut keys, &mut board).is_empty());
        assert_eq!(board.current_piece().cells().iter().map(|c| c.col).min(), Some(0));
    }

    #[test]
    fn test_both_held_favors_later_key() {
        let mut board = board();
        let mut keys = KeyStates::new();
        let mut input = InputController::new(timing(50, 10, 0, false));

        keys.press(Action::MoveLeft);
        assert_eq!(input.process_frame(ms(10), &mut keys, &mut board), [Move::MoveLeft]);
        assert!(input.process_frame(ms(10), &mut keys, &mut board).is_empty());
        keys.press(Action::MoveRight);
        assert_eq!(input.process_frame(ms(10), &mut keys, &mut board), [Move::MoveRight]);
        assert_eq!(
            input.process_frame(ms(40), &mut keys, &mut board),
            [Move::MoveRight, Move::MoveRight]
        );
    }

    #[test]
    fn test_both_held_with_reset_never_charges() {
        let mut board = board();
        let mut keys = KeyStates::new();
        let mut input = InputController::new(timing(50, 10, 0, true));

        keys.press(Action::MoveLeft);
        keys.press(Action::MoveRight);
        assert_eq!(
            input.process_frame(ms(10), &mut keys, &mut board),
            [Move::MoveLeft, Move::MoveRight]
        );
        for _ in 0..5 {
            assert!(input.process_frame(ms(1000), &mut keys, &mut board).is_empty());
        }
    }

    #[test]
    fn test_direction_change_resets_das() {
        fn run(reset: bool) -> Vec<Vec<Move>> {
            let mut board = board();
            let mut keys = KeyStates::new();
            let mut input = InputController::new(timing(100, 0, 0, reset));
            let mut frames = Vec::new();

            keys.press(Action::MoveLeft);
            frames.push(input.process_frame(ms(10), &mut keys, &mut board));
            frames.push(input.process_frame(ms(150), &mut keys, &mut board));
            keys.press(Action::MoveRight);
            frames.push(input.process_frame(ms(10), &mut keys, &mut board));
            frames.push(input.process_frame(ms(10), &mut keys, &mut board));
            keys.release(Action::MoveLeft);
            frames.push(input.process_frame(ms(10), &mut keys, &mut board));
            frames.push(input.process_frame(ms(100), &mut keys, &mut board));
            frames
        }

        let kept = run(false);
        assert_eq!(kept[0], [Move::MoveLeft]);
        assert_eq!(kept[1], [Move::DasLeft]);
        assert_eq!(kept[2], [Move::DasLeft, Move::MoveRight]);
        assert_eq!(kept[3], [Move::DasRight]);
        assert_eq!(kept[4], [Move::DasRight]);

        let reset = run(true);
        assert_eq!(reset[2], [Move::DasLeft, Move::MoveRight]);
        assert!(reset[3].is_empty());
        assert!(reset[4].is_empty());
        assert_eq!(reset[5], [Move::DasRight]);
    }

    #[test]
    fn test_soft_drop_rate() {
        let mut board = board();
        let mut keys = KeyStates::new();
        let mut input = InputController::new(timing(200, 50, 50, true));

        keys.press(Action::SoftDrop);
        assert_eq!(input.process_frame(ms(16), &mut keys, &mut board), [Move::MoveDown]);
        assert!(input.process_frame(ms(30), &mut keys, &mut board).is_empty());
        assert_eq!(input.process_frame(ms(30), &mut keys, &mut board), [Move::MoveDown]);
        assert_eq!(
            input.process_frame(ms(140), &mut keys, &mut board),
            [Move::MoveDown; 3]
        );

        keys.release(Action::SoftDrop);
        assert!(input.process_frame(ms(100), &mut keys, &mut board).is_empty());
    }

    #[test]
    fn test_instant_soft_drop() {
        let mut board = board();
        let mut keys = KeyStates::new();
        let mut input = InputController::new(timing(200, 50, 0, true));

        keys.press(Action::SoftDrop);
        assert_eq!(input.process_frame(ms(16), &mut keys, &mut board), [Move::SoftDrop]);
        assert_eq!(input.process_frame(ms(16), &mut keys, &mut board), [Move::SoftDrop]);
        assert_eq!(board.current_piece().cells().iter().map(|c| c.row).min(), Some(0));
    }

    #[test]
    fn test_frame_move_order() {
        let mut board = board();
        let mut keys = KeyStates::new();
        let mut input = InputController::new(timing(200, 50, 0, true));

        for action in [
            Action::RotateClockwise,
            Action::Hold,
            Action::HardDrop,
            Action::SoftDrop,
            Action::RotateAnticlockwise,
            Action::Rotate180,
            Action::MoveDown,
            Action::MoveUp,
            Action::MoveLeft,
        ] {
            keys.press(action);
        }
        assert_eq!(
            input.process_frame(ms(16), &mut keys, &mut board),
            [
                Move::MoveLeft,
                Move::MoveUp,
                Move::MoveDown,
                Move::Rotate180,
                Move::RotateAnticlockwise,
                Move::SoftDrop,
                Move::HardDrop,
                Move::Hold,
                Move::RotateClockwise,
            ]
        );
    }

    #[test]
    fn test_taps_fire_once_per_press() {
        let mut board = board();
        let mut keys = KeyStates::new();
        let mut input = InputController::new(RepeatTiming::default());

        keys.press(Action::RotateClockwise);
        assert_eq!(input.process_frame(ms(16), &mut keys, &mut board), [Move::RotateClockwise]);
        assert!(input.process_frame(ms(16), &mut keys, &mut board).is_empty());
        keys.release(Action::RotateClockwise);
        keys.press(Action::RotateClockwise);
        assert_eq!(input.process_frame(ms(16), &mut keys, &mut board), [Move::RotateClockwise]);
    }

    #[test]
    fn test_board_starts_on_first_move() {
        let mut board = board();
        let mut keys = KeyStates::new();
        let mut input = InputController::new(RepeatTiming::default());

        assert!(input.process_frame(ms(16), &mut keys, &mut board).is_empty());
        assert!(board.is_paused());

        keys.press(Action::HardDrop);
        input.process_frame(ms(16), &mut keys, &mut board);
        assert!(board.is_running());
        assert_eq!(board.stats().pieces_placed(), 1);
    }

    #[test]
    fn test_game_over_blocks_input_until_restart() {
        let mut board = board();
        let mut row = [MinoType::Garbage; BoardMatrix::WIDTH];
        row[9] = MinoType::Empty;
        board.set_matrix(&[row; 21]).unwrap();
        board.spawn_piece(PieceKind::T);
        board.start();
        board.execute_moves(&[Move::HardDrop]);
        assert!(board.is_game_over());

        let mut keys = KeyStates::new();
        let mut input = InputController::new(RepeatTiming::default());
        keys.press(Action::MoveLeft);
        assert!(input.process_frame(ms(16), &mut keys, &mut board).is_empty());
        assert!(!keys.get(Action::MoveLeft).processed);

        keys.press(Action::Restart);
        assert_eq!(input.process_frame(ms(16), &mut keys, &mut board), [Move::MoveLeft]);
        assert!(board.is_running());
        assert_eq!(board.stats().pieces_placed(), 0);
        assert!(board.matrix().rows().iter().flatten().all(|c| c.is_empty()));
    }

    #[test]
    fn test_restart_reloads_board() {
        let mut board = board();
        let mut keys = KeyStates::new();
        let mut input = InputController::new(RepeatTiming::default());

        keys.press(Action::HardDrop);
        input.process_frame(ms(16), &mut keys, &mut board);
        assert_eq!(board.stats().pieces_placed(), 1);

        keys.press(Action::Restart);
        assert!(input.process_frame(ms(16), &mut keys, &mut board).is_empty());
        assert!(board.is_paused());
        assert_eq!(board.stats().pieces_placed(), 0);
        assert!(input.process_frame(ms(16), &mut keys, &mut board).is_empty());
        assert!(board.is_paused());
    }
}
