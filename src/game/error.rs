use thiserror::Error;

use super::{ArmyId, Commodity, RegionId};

/// Why a player command was refused. A refused command never changes state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("the game is over")]
    GameOver,
    #[error("not your turn")]
    NotYourTurn,
    #[error("a pending decision must be resolved first")]
    DecisionPending,
    #[error("there is no pending decision")]
    NoDecisionPending,
    #[error("that answer does not match the pending decision")]
    WrongDecision,
    #[error("insufficient AP: need {needed}, have {available}")]
    InsufficientAp { needed: u32, available: u32 },
    #[error("insufficient {commodity}: need {needed}, have {available}")]
    InsufficientResources {
        commodity: Commodity,
        needed: u32,
        available: u32,
    },
    #[error("unknown region {0:?}")]
    UnknownRegion(RegionId),
    #[error("unknown army {0:?}")]
    UnknownArmy(ArmyId),
    #[error("army {0:?} belongs to another player")]
    NotYourArmy(ArmyId),
    #[error("{to:?} is not adjacent to {from:?}")]
    NotAdjacent { from: RegionId, to: RegionId },
    #[error("region {0:?} is not under your control")]
    NotControlled(RegionId),
    #[error("region {0:?} is transit only")]
    TransitOnly(RegionId),
    #[error("no free building slot in {0:?}")]
    NoFreeSlot(RegionId),
    #[error("levy cap reached in {0:?}")]
    LevyCapReached(RegionId),
    #[error("no stored levies to call up")]
    NoStoredLevies,
    #[error("no enemy army in {0:?}")]
    NoEnemyPresent(RegionId),
    #[error("no army of yours in {0:?}")]
    NoFriendlyArmy(RegionId),
    #[error("cannot pillage your own region {0:?}")]
    OwnRegion(RegionId),
    #[error("nothing to pillage in {0:?}")]
    NothingToPillage(RegionId),
    #[error("invalid unit count {0}")]
    InvalidCount(u32),
}

/// Failure to load or validate game data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to parse game data: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("failed to read game data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid map: {0}")]
    InvalidMap(String),
}

/// Failure to start a campaign.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("{requested} players requested, the map supports 2 to {available}")]
    InvalidPlayerCount { requested: usize, available: usize },
    #[error("unknown kingdom [{0}]")]
    UnknownKingdom(String),
    #[error("kingdom [{0}] was chosen twice")]
    DuplicateKingdom(String),
    #[error(transparent)]
    Data(#[from] DataError),
}
