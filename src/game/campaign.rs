use bevy::log::info;
use bevy::prelude::Resource;
use std::collections::BTreeMap;

use super::{
    AiStyle, Army, ArmyId, CaptureTimer, Chronicle, GameData, GameOutcome, GameRules, MapGraph,
    PendingDecision, Player, PlayerId, RegionId, RegionState, Roller, SetupError, Stance,
    TurnPhase, TurnState,
};

/// The human seat at the table
#[derive(Debug, Clone)]
pub struct HumanSeat {
    pub name: String,
    pub kingdom: String,
}

/// How to seat a new campaign
#[derive(Debug, Clone)]
pub struct CampaignSetup {
    pub player_count: usize,
    /// `None` for an all-AI game
    pub human: Option<HumanSeat>,
    /// AI kingdoms in seat order; missing seats are drawn at random
    pub ai_kingdoms: Vec<String>,
    /// Cycled over the AI seats; random when empty
    pub ai_styles: Vec<AiStyle>,
    pub shuffle_order: bool,
}

impl Default for CampaignSetup {
    fn default() -> Self {
        Self {
            player_count: 3,
            human: None,
            ai_kingdoms: Vec::new(),
            ai_styles: Vec::new(),
            shuffle_order: true,
        }
    }
}

/// The whole game: board, players, armies, timers and the turn machine.
///
/// Every engine component takes this aggregate explicitly; nothing else holds game state.
#[derive(Resource)]
pub struct Campaign {
    pub map: MapGraph,
    pub rules: GameRules,
    /// Indexed by `PlayerId`
    pub players: Vec<Player>,
    /// Indexed by `RegionId`
    pub regions: Vec<RegionState>,
    /// In creation order
    pub armies: Vec<Army>,
    pub capture_timers: BTreeMap<RegionId, CaptureTimer>,
    pub turn: TurnState,
    pub chronicle: Chronicle,
    pub pending: Option<PendingDecision>,
    pub outcome: Option<GameOutcome>,
    next_army: u32,
    roller: Box<dyn Roller>,
}

impl Campaign {
    pub fn new(
        data: &GameData,
        setup: CampaignSetup,
        mut roller: Box<dyn Roller>,
    ) -> Result<Self, SetupError> {
        let available = data.map.kingdoms.len();
        if setup.player_count < 2 || setup.player_count > available {
            return Err(SetupError::InvalidPlayerCount {
                requested: setup.player_count,
                available,
            });
        }

        let known = |name: &str| data.map.kingdoms.iter().any(|k| k.name == name);
        let mut seats: Vec<String> = Vec::with_capacity(setup.player_count);
        let requested = setup
            .human
            .iter()
            .map(|h| &h.kingdom)
            .chain(setup.ai_kingdoms.iter());
        for kingdom in requested {
            if seats.len() == setup.player_count {
                break;
            }
            if !known(kingdom) {
                return Err(SetupError::UnknownKingdom(kingdom.clone()));
            }
            if seats.contains(kingdom) {
                return Err(SetupError::DuplicateKingdom(kingdom.clone()));
            }
            seats.push(kingdom.clone());
        }
        while seats.len() < setup.player_count {
            let rest: Vec<&String> = data
                .map
                .kingdoms
                .iter()
                .map(|k| &k.name)
                .filter(|name| !seats.contains(*name))
                .collect();
            let pick = rest[roller.below(rest.len() as u32) as usize].clone();
            seats.push(pick);
        }

        let map = MapGraph::from_data(&data.map.restricted_to(&seats))?;
        let rules = data.rules.clone();

        let mut players = Vec::with_capacity(seats.len());
        let mut ai_seat = 0;
        for (i, kingdom) in seats.iter().enumerate() {
            let def = map
                .kingdom(kingdom)
                .ok_or_else(|| SetupError::UnknownKingdom(kingdom.clone()))?;
            let human = setup.human.as_ref().filter(|_| i == 0);
            let style = if human.is_some() {
                AiStyle::Balanced
            } else {
                let style = if setup.ai_styles.is_empty() {
                    AiStyle::all()[roller.below(AiStyle::all().len() as u32) as usize]
                } else {
                    setup.ai_styles[ai_seat % setup.ai_styles.len()]
                };
                ai_seat += 1;
                style
            };

            players.push(Player {
                id: PlayerId(i as u8),
                name: human.map_or_else(|| kingdom.clone(), |h| h.name.clone()),
                kingdom: kingdom.clone(),
                capital: def.capital,
                core: def.core.clone(),
                food: rules.starting_food,
                silver: rules.starting_silver,
                influence: 0,
                is_human: human.is_some(),
                style,
                standing_stance: Stance::Balanced,
                eliminated: false,
            });
        }

        let mut order: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
        if setup.shuffle_order {
            for i in (1..order.len()).rev() {
                let j = roller.below(i as u32 + 1) as usize;
                order.swap(i, j);
            }
        }

        let mut regions = vec![RegionState::default(); map.len()];
        for player in &players {
            let capital = &mut regions[player.capital.0 as usize];
            capital.owner = Some(player.id);
            let cap = map.region(player.capital).levy_cap();
            capital.add_levy(player.id, rules.starting_levies.min(cap));
        }

        let mut campaign = Self {
            turn: TurnState::new(order, rules.action_points),
            map,
            rules,
            players,
            regions,
            armies: Vec::new(),
            capture_timers: BTreeMap::new(),
            chronicle: Chronicle::default(),
            pending: None,
            outcome: None,
            next_army: 1,
            roller,
        };

        let lineup = campaign
            .turn
            .order
            .iter()
            .map(|id| campaign.player(*id).kingdom.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        info!("Campaign on {} with {} kingdoms", campaign.map.name, campaign.players.len());
        campaign.record_system("Campaign begins", format!("Turn order: {lineup}"));

        Ok(campaign)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.0 as usize]
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.0 as usize]
    }

    pub fn current_player(&self) -> PlayerId {
        self.turn.order[self.turn.index]
    }

    pub fn round(&self) -> u32 {
        self.turn.round
    }

    pub fn ap(&self) -> u32 {
        self.turn.ap
    }

    pub fn phase(&self) -> TurnPhase {
        self.turn.phase
    }

    pub fn pending(&self) -> Option<&PendingDecision> {
        self.pending.as_ref()
    }

    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn region(&self, id: RegionId) -> &RegionState {
        &self.regions[id.0 as usize]
    }

    pub(crate) fn region_mut(&mut self, id: RegionId) -> &mut RegionState {
        &mut self.regions[id.0 as usize]
    }

    pub fn label(&self, id: RegionId) -> &str {
        &self.map.region(id).name
    }

    pub fn army(&self, id: ArmyId) -> Option<&Army> {
        self.armies.iter().find(|a| a.id == id)
    }

    pub(crate) fn army_mut(&mut self, id: ArmyId) -> Option<&mut Army> {
        self.armies.iter_mut().find(|a| a.id == id)
    }

    pub fn armies_of(&self, player: PlayerId) -> impl Iterator<Item = &Army> {
        self.armies.iter().filter(move |a| a.owner == player)
    }

    pub fn armies_in(&self, region: RegionId) -> impl Iterator<Item = &Army> {
        self.armies.iter().filter(move |a| a.region == region)
    }

    pub fn friendly_army_in(&self, player: PlayerId, region: RegionId) -> Option<&Army> {
        self.armies_in(region).find(|a| a.owner == player)
    }

    pub fn enemy_units_in(&self, player: PlayerId, region: RegionId) -> u32 {
        self.armies_in(region)
            .filter(|a| a.owner != player)
            .map(|a| a.units)
            .sum()
    }

    pub fn has_enemy_in(&self, player: PlayerId, region: RegionId) -> bool {
        self.armies_in(region).any(|a| a.owner != player)
    }

    pub fn active_units(&self, player: PlayerId) -> u32 {
        self.armies_of(player).map(|a| a.units).sum()
    }

    pub fn owned_regions(&self, player: PlayerId) -> Vec<RegionId> {
        self.regions
            .iter()
            .enumerate()
            .filter(|(_, r)| r.owner == Some(player))
            .map(|(i, _)| RegionId(i as u16))
            .collect()
    }

    /// Levies `player` can call up: those stored in regions it owns
    pub fn stored_levies(&self, player: PlayerId) -> u32 {
        self.owned_regions(player)
            .into_iter()
            .map(|r| self.region(r).levies_of(player))
            .sum()
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_alive())
    }

    pub(crate) fn roller(&mut self) -> &mut dyn Roller {
        self.roller.as_mut()
    }

    // ========================================================================
    // STATE PRIMITIVES
    // ========================================================================

    /// Put `units` into play in `region`, reinforcing an existing friendly army there
    pub fn spawn_army(&mut self, owner: PlayerId, region: RegionId, units: u32) -> ArmyId {
        if let Some(existing) = self
            .armies
            .iter_mut()
            .find(|a| a.owner == owner && a.region == region)
        {
            existing.units += units;
            return existing.id;
        }

        let id = ArmyId(self.next_army);
        self.next_army += 1;
        self.armies.push(Army {
            id,
            owner,
            region,
            units,
        });
        id
    }

    pub(crate) fn remove_army(&mut self, id: ArmyId) {
        self.armies.retain(|a| a.id != id);
    }

    /// Remove up to `count` units; the army leaves play at zero. Returns units removed.
    pub(crate) fn drop_units(&mut self, id: ArmyId, count: u32) -> u32 {
        let Some(army) = self.army_mut(id) else {
            return 0;
        };
        let removed = count.min(army.units);
        army.units -= removed;
        if army.units == 0 {
            self.remove_army(id);
        }
        removed
    }

    /// Move an army, merging it into a friendly army already at `to`.
    /// Returns the id of the army now standing in `to`.
    pub(crate) fn relocate_army(&mut self, id: ArmyId, to: RegionId) -> ArmyId {
        let Some(army) = self.army(id).cloned() else {
            return id;
        };
        if let Some(host) = self
            .armies
            .iter_mut()
            .find(|a| a.id != id && a.owner == army.owner && a.region == to)
        {
            host.units += army.units;
            let host_id = host.id;
            self.remove_army(id);
            return host_id;
        }
        if let Some(army) = self.army_mut(id) {
            army.region = to;
        }
        id
    }

    /// Change ownership; the region's stored levies and capture timer are cleared
    pub(crate) fn set_owner(&mut self, region: RegionId, owner: Option<PlayerId>) {
        let state = self.region_mut(region);
        state.owner = owner;
        state.levies.clear();
        self.capture_timers.remove(&region);
    }

    pub(crate) fn record(&mut self, actor: PlayerId, title: &str, details: impl Into<String>) {
        let kingdom = self.player(actor).kingdom.clone();
        self.chronicle.record(self.turn.round, kingdom, title, details);
    }

    pub(crate) fn record_system(&mut self, title: &str, details: impl Into<String>) {
        self.chronicle.record(self.turn.round, "System", title, details);
    }

    // ========================================================================
    // INVARIANTS
    // ========================================================================

    /// Engine-bug detector. Empty in every reachable state.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        for army in &self.armies {
            if army.units == 0 {
                violations.push(format!("army {:?} persists with zero units", army.id));
            }
            if self.player(army.owner).eliminated {
                violations.push(format!("eliminated player owns army {:?}", army.id));
            }
        }

        for def in self.map.regions() {
            let state = self.region(def.id);
            if def.transit_only
                && (state.owner.is_some() || !state.buildings.is_empty() || state.total_levies() > 0)
            {
                violations.push(format!("transit region {} is owned, built or garrisoned", def.key));
            }
            if state.total_levies() > def.levy_cap() {
                violations.push(format!("levies above cap in {}", def.key));
            }
            if state.buildings.len() > def.slot_cap() {
                violations.push(format!("buildings above slot cap in {}", def.key));
            }
            if let Some(owner) = state.owner {
                if self.player(owner).eliminated {
                    violations.push(format!("eliminated player owns {}", def.key));
                }
            }
            let mut owners: Vec<PlayerId> = self.armies_in(def.id).map(|a| a.owner).collect();
            let stacks = owners.len();
            owners.sort();
            owners.dedup();
            if owners.len() != stacks {
                violations.push(format!("unmerged friendly armies in {}", def.key));
            }
        }

        for (region, timer) in &self.capture_timers {
            let occupied = self.friendly_army_in(timer.occupier, *region).is_some();
            let contested = self.has_enemy_in(timer.occupier, *region);
            if !occupied || contested {
                violations.push(format!("capture timer on broken occupation of {:?}", region));
            }
            if self.region(*region).owner == Some(timer.occupier) {
                violations.push(format!("capture timer on an owned region {:?}", region));
            }
        }

        violations
    }

    pub(crate) fn debug_check(&self) {
        if cfg!(debug_assertions) {
            let violations = self.invariant_violations();
            debug_assert!(violations.is_empty(), "engine invariant violated: {violations:?}");
        }
    }
}
