//! Demand source trait and implementations.
//!
//! Each tick, the engine asks a [`DemandSource`] how many units each
//! category sells. The trait abstracts the randomness so a round can be
//! replayed exactly: [`SeededDemand`] draws from a seeded PRNG, while
//! [`FixedDemand`] and [`ScriptedDemand`] return predetermined offsets.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use warehouse_types::Category;

use crate::config::DemandConfig;

/// A source of per-tick demand draws.
///
/// The engine calls [`draw`](DemandSource::draw) once per category per
/// tick, in [`Category::ALL`] order.
pub trait DemandSource: Send {
    /// Return the units demanded from `category` this tick, given its
    /// baseline demand.
    fn draw(&mut self, category: Category, base_demand: u32) -> u32;
}

/// Apply a signed offset to a baseline, never going below zero.
const fn offset_demand(base_demand: u32, offset: i32) -> u32 {
    base_demand.saturating_add_signed(offset)
}

/// Uniform demand in `base - variance ..= base + variance`, from a seeded PRNG.
#[derive(Debug, Clone)]
pub struct SeededDemand {
    rng: SmallRng,
    variance: i32,
}

impl SeededDemand {
    /// Create a generator with an explicit seed.
    pub fn new(seed: u64, variance: u32) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            variance: i32::try_from(variance).unwrap_or(i32::MAX),
        }
    }

    /// Create a generator seeded from OS entropy.
    pub fn from_entropy(variance: u32) -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
            variance: i32::try_from(variance).unwrap_or(i32::MAX),
        }
    }

    /// Create a generator from configuration, seeding from entropy when no
    /// seed is configured.
    pub fn from_config(config: &DemandConfig) -> Self {
        config.seed.map_or_else(
            || Self::from_entropy(config.variance),
            |seed| Self::new(seed, config.variance),
        )
    }
}

impl DemandSource for SeededDemand {
    fn draw(&mut self, _category: Category, base_demand: u32) -> u32 {
        let offset = self
            .rng
            .random_range(self.variance.saturating_neg()..=self.variance);
        offset_demand(base_demand, offset)
    }
}

/// Applies the same offset to every draw.
///
/// `FixedDemand::new(0)` makes every category sell exactly its baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedDemand {
    offset: i32,
}

impl FixedDemand {
    /// Create a source that always applies `offset`.
    pub const fn new(offset: i32) -> Self {
        Self { offset }
    }
}

impl DemandSource for FixedDemand {
    fn draw(&mut self, _category: Category, base_demand: u32) -> u32 {
        offset_demand(base_demand, self.offset)
    }
}

/// Replays a queue of offsets, one per draw, then falls back to zero.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDemand {
    offsets: VecDeque<i32>,
}

impl ScriptedDemand {
    /// Create a source that replays `offsets` in order.
    pub fn new(offsets: impl IntoIterator<Item = i32>) -> Self {
        Self {
            offsets: offsets.into_iter().collect(),
        }
    }

    /// Number of scripted offsets not yet consumed.
    pub fn remaining(&self) -> usize {
        self.offsets.len()
    }
}

impl DemandSource for ScriptedDemand {
    fn draw(&mut self, _category: Category, base_demand: u32) -> u32 {
        let offset = self.offsets.pop_front().unwrap_or(0);
        offset_demand(base_demand, offset)
    }
}
