//! Shuffled sequencing order
//!
//! A shuffle order is a Fisher-Yates permutation of domain positions, drawn
//! once per domain. Walking it forward visits every song exactly once per
//! cycle and wraps back to the first entry, so stepping back across either
//! end of a cycle replays the same songs. The order is only redrawn when the
//! domain's ids change or the order is invalidated.

use crate::navigation::{Direction, Domain};
use cadence_core::SongId;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Permutation of domain positions plus a cursor into it
#[derive(Debug, Clone)]
pub struct ShuffleOrder {
    rng: StdRng,

    /// Domain positions in play order
    order: Vec<usize>,

    /// Domain ids the order was drawn for
    signature: Vec<SongId>,

    /// Index into `order` of the current song
    position: usize,
}

impl ShuffleOrder {
    /// Create an empty order, seeded for reproducible permutations
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            order: Vec::new(),
            signature: Vec::new(),
            position: 0,
        }
    }

    /// Forget the current permutation
    ///
    /// The next step draws a new one anchored on the current song.
    pub fn invalidate(&mut self) {
        self.order.clear();
        self.signature.clear();
        self.position = 0;
    }

    /// Current permutation (domain positions)
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Start a fresh cycle with no current song
    pub fn first(&mut self, domain: &Domain) -> Option<usize> {
        if domain.is_empty() {
            return None;
        }
        self.draw(domain, None);
        self.order.first().copied()
    }

    /// Step from the song at domain position `current`
    pub fn step(&mut self, domain: &Domain, current: usize, direction: Direction) -> Option<usize> {
        let len = domain.len();
        if len == 0 || current >= len {
            return None;
        }

        if self.signature != domain.ids() || self.order.len() != len {
            tracing::debug!(len, "Shuffle order drawn for new domain");
            self.draw(domain, Some(current));
        }

        if self.order.get(self.position) != Some(&current) {
            match self.order.iter().position(|index| *index == current) {
                Some(position) => self.position = position,
                None => self.draw(domain, Some(current)),
            }
        }

        self.position = match direction {
            Direction::Next => (self.position + 1) % len,
            Direction::Previous => (self.position + len - 1) % len,
        };

        self.order.get(self.position).copied()
    }

    /// Draw a new permutation, with `anchor` placed first
    fn draw(&mut self, domain: &Domain, anchor: Option<usize>) {
        let len = domain.len();
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(&mut self.rng);

        if let Some(at) = anchor.and_then(|anchor| order.iter().position(|index| *index == anchor)) {
            order.swap(0, at);
        }

        self.order = order;
        self.signature = domain.ids().to_vec();
        self.position = 0;
    }
}
