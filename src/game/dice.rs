use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Source of every random draw the engine makes.
///
/// The campaign owns one roller, so a seed (or a script) fully determines a game.
pub trait Roller: Send + Sync {
    /// Uniform draw in `0..upper`. `upper` is never zero.
    fn below(&mut self, upper: u32) -> u32;

    /// A six-sided die, 1 to 6.
    fn d6(&mut self) -> u8 {
        (self.below(6) + 1) as u8
    }
}

/// Production roller backed by a seeded `StdRng`
pub struct SeededRoller {
    rng: StdRng,
}

impl SeededRoller {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Roller for SeededRoller {
    fn below(&mut self, upper: u32) -> u32 {
        self.rng.gen_range(0..upper)
    }
}

/// Replays a fixed queue of raw draws. Once the queue runs dry every draw is 0.
///
/// Values are raw `below` results, so a d6 face `f` is scripted as `f - 1`.
/// Out-of-range values are wrapped into range.
#[derive(Debug, Default, Clone)]
pub struct ScriptedRoller {
    draws: VecDeque<u32>,
}

impl ScriptedRoller {
    pub fn new(draws: impl IntoIterator<Item = u32>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl Roller for ScriptedRoller {
    fn below(&mut self, upper: u32) -> u32 {
        self.draws.pop_front().unwrap_or(0) % upper
    }
}

/// Cumulative-weight draw over `items`. Returns `None` only when every weight is zero.
pub fn weighted_pick<T: Copy>(
    roller: &mut dyn Roller,
    items: &[T],
    weight: impl Fn(&T) -> u32,
) -> Option<T> {
    let total: u32 = items.iter().map(&weight).sum();
    if total == 0 {
        return None;
    }

    let mut roll = roller.below(total);
    for item in items {
        let w = weight(item);
        if roll < w {
            return Some(*item);
        }
        roll -= w;
    }

    None
}
