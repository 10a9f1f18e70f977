use serde::{Deserialize, Serialize};

use super::{PlayerId, RegionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArmyId(pub u32);

/// A stack of active units. Friendly stacks in one region are always merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Army {
    pub id: ArmyId,
    pub owner: PlayerId,
    pub region: RegionId,
    /// Strength; an army at zero is removed from play
    pub units: u32,
}
