use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Number of upcoming pieces a player can see.
pub const PREVIEW_NUMBER: usize = 6;

/// Upcoming piece queue fed by a 7-bag randomizer.
///
/// # 7-Bag System
///
/// 1. A "bag" holds one piece of each of the 7 kinds
/// 2. The bag is shuffled (Fisher-Yates, on a seeded PCG stream)
/// 3. The whole bag is appended to the queue
/// 4. Bags are appended until more than [`PREVIEW_NUMBER`] pieces are queued
///
/// The generator is seeded once; successive bags are further draws from the
/// same stream. Every run of 7 pieces starting at a bag boundary is therefore
/// a permutation of all kinds.
///
/// # Example
///
/// ```
/// use srstris_engine::{PieceBuffer, PREVIEW_NUMBER};
///
/// let mut buffer = PieceBuffer::new();
/// let first = buffer.pop_next();
/// assert!(buffer.len() > PREVIEW_NUMBER);
/// ```
#[derive(Debug, Clone)]
pub struct PieceBuffer {
    rng: Pcg32,
    queue: VecDeque<PieceKind>,
}

impl Default for PieceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit value that initializes the bag generator. The same seed always
/// produces the same piece sequence. Serialized as a 32 character hex string.
///
/// # Example
///
/// ```
/// use srstris_engine::{PieceBuffer, PieceSeed};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let mut a = PieceBuffer::with_seed(seed);
/// let mut b = PieceBuffer::with_seed(seed);
/// assert_eq!(a.pop_next(), b.pop_next());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    /// Draws a fresh seed from the OS-seeded thread-local generator.
    #[must_use]
    pub fn from_entropy() -> Self {
        rand::rng().random()
    }

    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A seed string that is not 32 hex digits.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid seed {input:?}: expected 32 hex digits")]
pub struct ParseSeedError {
    input: String,
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(error());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| error())?;
        Ok(Self::from_u128(num))
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl PieceBuffer {
    /// Creates a buffer seeded from system entropy, already populated.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(PieceSeed::from_entropy())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let mut this = Self {
            rng: Pcg32::from_seed(seed.0),
            queue: VecDeque::with_capacity(PieceKind::LEN * 2),
        };
        this.populate();
        this
    }

    /// Returns one shuffled bag: a uniformly random permutation of all kinds.
    pub fn next_bag(&mut self) -> [PieceKind; PieceKind::LEN] {
        let mut bag = PieceKind::ALL;
        bag.shuffle(&mut self.rng);
        bag
    }

    /// Appends whole bags until more than [`PREVIEW_NUMBER`] pieces are queued.
    pub fn populate(&mut self) {
        while self.queue.len() <= PREVIEW_NUMBER {
            let bag = self.next_bag();
            self.queue.extend(bag);
        }
    }

    /// Takes the front piece and tops the queue back up.
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty, which `populate` rules out.
    pub fn pop_next(&mut self) -> PieceKind {
        let piece = self
            .queue
            .pop_front()
            .expect("piece queue should never be empty");
        self.populate();
        piece
    }

    /// Number of queued pieces, always greater than [`PREVIEW_NUMBER`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// The whole queue, front first.
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.iter().copied()
    }

    /// The pieces shown in the preview column.
    pub fn preview(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.next_pieces().take(PREVIEW_NUMBER)
    }

    #[must_use]
    pub fn front(&self) -> Option<PieceKind> {
        self.queue.front().copied()
    }

    /// Replaces the queue with `pieces` and tops it up with fresh bags.
    ///
    /// Intended for puzzle setups where the first pieces are fixed.
    pub fn replace_queue<I>(&mut self, pieces: I)
    where
        I: IntoIterator<Item = PieceKind>,
    {
        self.queue.clear();
        self.queue.extend(pieces);
        self.populate();
    }
}
