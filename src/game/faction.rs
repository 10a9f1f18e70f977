use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AiStyle, RegionId, Stance};

/// Seat index into `Campaign::players`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

/// Stockpiled resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Commodity {
    Food,
    Silver,
    Influence,
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Commodity::Food => "food",
            Commodity::Silver => "silver",
            Commodity::Influence => "influence",
        })
    }
}

/// One kingdom at the table, human or AI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub kingdom: String,
    pub capital: RegionId,
    /// Historic homeland, used for the dominion victory
    pub core: Vec<RegionId>,
    pub food: u32,
    pub silver: u32,
    pub influence: u32,
    pub is_human: bool,
    pub style: AiStyle,
    /// Stance used when a human player's army is attacked
    pub standing_stance: Stance,
    pub eliminated: bool,
}

impl Player {
    pub fn stock(&self, commodity: Commodity) -> u32 {
        match commodity {
            Commodity::Food => self.food,
            Commodity::Silver => self.silver,
            Commodity::Influence => self.influence,
        }
    }

    /// Spend if affordable; false leaves the stock untouched
    pub fn spend(&mut self, commodity: Commodity, amount: u32) -> bool {
        let current = match commodity {
            Commodity::Food => &mut self.food,
            Commodity::Silver => &mut self.silver,
            Commodity::Influence => &mut self.influence,
        };
        if *current >= amount {
            *current -= amount;
            true
        } else {
            false
        }
    }

    /// Remove up to `amount`, flooring at zero
    pub fn lose(&mut self, commodity: Commodity, amount: u32) {
        let current = match commodity {
            Commodity::Food => &mut self.food,
            Commodity::Silver => &mut self.silver,
            Commodity::Influence => &mut self.influence,
        };
        *current = current.saturating_sub(amount);
    }

    pub fn is_alive(&self) -> bool {
        !self.eliminated
    }
}
