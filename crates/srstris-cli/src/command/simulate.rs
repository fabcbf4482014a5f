use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use rand::{Rng, SeedableRng as _, rngs::StdRng};
use serde::{Deserialize, Serialize};
use srstris_engine::{
    Action, GameBoard, GameStats, InputController, KeyStates, KickTable, PieceKind, PieceSeed,
    Settings,
};

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Settings JSON file (built-in defaults when omitted)
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Key event script JSON file (random key presses when omitted)
    #[arg(long)]
    script: Option<PathBuf>,
    /// Number of frames to simulate
    #[arg(long, default_value_t = 3600)]
    frames: u64,
    /// Simulated frames per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,
    /// Piece seed as 32 hex digits (random when omitted)
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Seed for the random key driver
    #[arg(long)]
    driver_seed: Option<u64>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Key changes applied at the start of one frame.
#[derive(Debug, Clone, Deserialize)]
struct KeyEvent {
    frame: u64,
    #[serde(default)]
    press: Vec<Action>,
    #[serde(default)]
    release: Vec<Action>,
}

/// Source of key state for a headless run.
trait KeyDriver {
    fn drive(&mut self, frame: u64, keys: &mut KeyStates);
}

/// Replays a list of key events, ordered by frame.
#[derive(Debug)]
struct ScriptDriver {
    events: Vec<KeyEvent>,
    next: usize,
}

impl ScriptDriver {
    fn new(mut events: Vec<KeyEvent>) -> Self {
        events.sort_by_key(|event| event.frame);
        Self { events, next: 0 }
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let events = util::read_json_file(path).context("Failed to load key script")?;
        Ok(Self::new(events))
    }
}

impl KeyDriver for ScriptDriver {
    fn drive(&mut self, frame: u64, keys: &mut KeyStates) {
        while let Some(event) = self.events.get(self.next) {
            if event.frame > frame {
                break;
            }
            for &action in &event.release {
                keys.release(action);
            }
            for &action in &event.press {
                keys.press(action);
            }
            self.next += 1;
        }
    }
}

/// Mashes keys at random: each frame an idle key is pressed with a per-action
/// probability, and a held key is released with a fixed probability.
#[derive(Debug)]
struct RandomDriver<R> {
    rng: R,
}

const RELEASE_PROBABILITY: f64 = 0.25;

fn press_probability(action: Action) -> f64 {
    match action {
        Action::MoveLeft | Action::MoveRight => 0.08,
        Action::RotateClockwise | Action::RotateAnticlockwise => 0.05,
        Action::HardDrop => 0.03,
        Action::SoftDrop | Action::Rotate180 => 0.02,
        Action::Hold | Action::MoveDown => 0.01,
        Action::MoveUp | Action::Restart => 0.0,
    }
}

impl<R> KeyDriver for RandomDriver<R>
where
    R: Rng,
{
    fn drive(&mut self, _frame: u64, keys: &mut KeyStates) {
        for action in Action::ALL {
            if keys.get(action).down {
                if self.rng.random_bool(RELEASE_PROBABILITY) {
                    keys.release(action);
                }
            } else if self.rng.random_bool(press_probability(action)) {
                keys.press(action);
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct SimulationSummary {
    seed: PieceSeed,
    kick_table: KickTable,
    frames: u64,
    simulated_secs: f64,
    moves: usize,
    game_over: bool,
    stats: GameStats,
    attack: usize,
    pieces_per_second: f64,
    held_piece: Option<PieceKind>,
    preview: Vec<PieceKind>,
    board: Vec<String>,
}

#[expect(clippy::cast_precision_loss)]
fn simulate(
    settings: &Settings,
    seed: PieceSeed,
    frames: u64,
    fps: u32,
    driver: &mut dyn KeyDriver,
) -> anyhow::Result<SimulationSummary> {
    let timing = settings
        .movement
        .timing()
        .context("Invalid movement settings")?;
    let mut board = GameBoard::with_seed(settings.rotation.kick_table, seed);
    let mut input = InputController::new(timing);
    let mut keys = KeyStates::new();
    let dt = Duration::from_secs(1) / fps;

    let mut frames_run = 0;
    let mut moves = 0;
    for frame in 0..frames {
        driver.drive(frame, &mut keys);
        moves += input.process_frame(dt, &mut keys, &mut board).len();
        frames_run = frame + 1;
        if board.is_game_over() {
            break;
        }
    }

    let simulated = Duration::from_secs_f64(frames_run as f64 / f64::from(fps));
    tracing::info!(
        frames = frames_run,
        moves,
        game_over = board.is_game_over(),
        "simulation finished"
    );

    Ok(SimulationSummary {
        seed: board.seed(),
        kick_table: board.kick_table(),
        frames: frames_run,
        simulated_secs: simulated.as_secs_f64(),
        moves,
        game_over: board.is_game_over(),
        stats: board.stats().clone(),
        attack: board.stats().attack(),
        pieces_per_second: board.stats().pieces_per_second(simulated),
        held_piece: board.held_piece(),
        preview: board.preview().collect(),
        board: board
            .render_matrix()
            .to_string()
            .lines()
            .map(str::to_owned)
            .collect(),
    })
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let settings = match &arg.settings {
        Some(path) => util::read_settings_file(path)?,
        None => Settings::default(),
    };
    let seed = arg.seed.unwrap_or_else(PieceSeed::from_entropy);

    let mut driver: Box<dyn KeyDriver> = match &arg.script {
        Some(path) => Box::new(ScriptDriver::from_file(path)?),
        None => {
            let rng = match arg.driver_seed {
                Some(driver_seed) => StdRng::seed_from_u64(driver_seed),
                None => StdRng::from_os_rng(),
            };
            Box::new(RandomDriver { rng })
        }
    };

    tracing::debug!(%seed, frames = arg.frames, fps = arg.fps, "starting simulation");
    let summary = simulate(&settings, seed, arg.frames, arg.fps, driver.as_mut())?;
    util::write_json(&summary, arg.output.as_deref())
}
