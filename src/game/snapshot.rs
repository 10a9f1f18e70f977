use serde::{Deserialize, Serialize};

use super::{
    Army, BuildingKind, Campaign, CaptureTimer, ChronicleEntry, Edge, GameOutcome,
    PendingDecision, Player, PlayerId, RegionId, TurnState,
};

/// Serializable view of one region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSnapshot {
    pub id: RegionId,
    pub key: String,
    pub terrain: String,
    /// Kingdom seated here, for capitals
    pub capital_of: Option<String>,
    pub owner: Option<PlayerId>,
    pub levies: Vec<(PlayerId, u32)>,
    pub buildings: Vec<BuildingKind>,
    pub capture: Option<CaptureTimer>,
}

/// Everything a front end needs to draw the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignSnapshot {
    pub map: String,
    pub edges: Vec<Edge>,
    pub turn: TurnState,
    pub players: Vec<Player>,
    pub regions: Vec<RegionSnapshot>,
    pub armies: Vec<Army>,
    pub pending: Option<PendingDecision>,
    pub outcome: Option<GameOutcome>,
    /// Latest chronicle entries, oldest first
    pub recent: Vec<ChronicleEntry>,
}

const RECENT_ENTRIES: usize = 20;

impl Campaign {
    pub fn snapshot(&self) -> CampaignSnapshot {
        let regions = self
            .map
            .regions()
            .map(|def| {
                let state = self.region(def.id);
                RegionSnapshot {
                    id: def.id,
                    key: def.key.clone(),
                    terrain: def.terrain.name().to_string(),
                    capital_of: self.map.capital_of(def.id).map(|k| k.name.clone()),
                    owner: state.owner,
                    levies: state.levies.iter().map(|(p, n)| (*p, *n)).collect(),
                    buildings: state.buildings.clone(),
                    capture: self.capture_timers.get(&def.id).copied(),
                }
            })
            .collect();

        let entries = self.chronicle.entries();
        let recent = entries[entries.len().saturating_sub(RECENT_ENTRIES)..].to_vec();

        CampaignSnapshot {
            map: self.map.name.clone(),
            edges: self.map.edges().to_vec(),
            turn: self.turn.clone(),
            players: self.players.clone(),
            regions,
            armies: self.armies.clone(),
            pending: self.pending.clone(),
            outcome: self.outcome.clone(),
            recent,
        }
    }
}

impl CampaignSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
