use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::PlayerId;

/// Buildings a region can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    Farm,
    Market,
    Hall,
    /// Defensive works, cannot be pillaged
    Castle,
}

/// Per-turn production of one building
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Yield {
    pub food: u32,
    pub silver: u32,
    pub influence: u32,
}

impl Yield {
    pub fn add(&mut self, other: Yield) {
        self.food += other.food;
        self.silver += other.silver;
        self.influence += other.influence;
    }
}

impl BuildingKind {
    pub fn name(&self) -> &'static str {
        match self {
            BuildingKind::Farm => "Farm",
            BuildingKind::Market => "Market",
            BuildingKind::Hall => "Hall",
            BuildingKind::Castle => "Castle",
        }
    }

    /// Silver cost before discounts
    pub fn cost(&self) -> u32 {
        match self {
            BuildingKind::Farm => 1,
            BuildingKind::Market => 2,
            BuildingKind::Hall => 3,
            BuildingKind::Castle => 3,
        }
    }

    pub fn yields(&self) -> Yield {
        match self {
            BuildingKind::Farm => Yield { food: 1, ..Yield::default() },
            BuildingKind::Market => Yield { silver: 1, ..Yield::default() },
            BuildingKind::Hall => Yield { influence: 1, ..Yield::default() },
            BuildingKind::Castle => Yield::default(),
        }
    }

    /// Defense added to the region in battle
    pub fn defense(&self) -> i32 {
        match self {
            BuildingKind::Castle => 2,
            _ => 0,
        }
    }

    pub fn pillageable(&self) -> bool {
        !matches!(self, BuildingKind::Castle)
    }
}

/// Mutable state of one region
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionState {
    pub owner: Option<PlayerId>,
    /// Stored levies per player
    pub levies: BTreeMap<PlayerId, u32>,
    pub buildings: Vec<BuildingKind>,
}

impl RegionState {
    pub fn total_levies(&self) -> u32 {
        self.levies.values().sum()
    }

    pub fn levies_of(&self, player: PlayerId) -> u32 {
        self.levies.get(&player).copied().unwrap_or(0)
    }

    pub fn add_levy(&mut self, player: PlayerId, count: u32) {
        *self.levies.entry(player).or_insert(0) += count;
    }

    /// Takes up to `count` of `player`'s levies, returning how many were taken
    pub fn take_levies(&mut self, player: PlayerId, count: u32) -> u32 {
        let Some(stored) = self.levies.get_mut(&player) else {
            return 0;
        };
        let taken = count.min(*stored);
        *stored -= taken;
        if *stored == 0 {
            self.levies.remove(&player);
        }
        taken
    }

    pub fn has_castle(&self) -> bool {
        self.buildings.contains(&BuildingKind::Castle)
    }

    pub fn building_defense(&self) -> i32 {
        // Castles do not stack
        if self.has_castle() {
            BuildingKind::Castle.defense()
        } else {
            0
        }
    }

    pub fn production(&self) -> Yield {
        let mut total = Yield::default();
        for building in &self.buildings {
            total.add(building.yields());
        }
        total
    }

    pub fn pillageable(&self) -> Vec<usize> {
        self.buildings
            .iter()
            .enumerate()
            .filter(|(_, b)| b.pillageable())
            .map(|(i, _)| i)
            .collect()
    }
}
