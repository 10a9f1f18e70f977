//! Player commands
//!
//! Humans and the AI go through the same `check`/`perform` pair, so a predicate such as
//! `can_recruit` is exactly the validation half of `recruit`.

use bevy::log::warn;
use serde::{Deserialize, Serialize};

use super::{
    capture, combat, movement, ActionError, ArmyId, BattleReport, BuildingKind, Campaign,
    Commodity, PendingDecision, PlayerId, RegionId, Stance,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Move { army: ArmyId, to: RegionId },
    /// Store one levy in an owned region
    Recruit { region: RegionId },
    /// Turn stored levies into units at the capital
    CallUp { units: u32 },
    Build { region: RegionId, kind: BuildingKind },
    Pillage { region: RegionId },
    /// `stance: None` lets a human choose later, or the AI choose now
    Attack {
        region: RegionId,
        stance: Option<Stance>,
    },
    Disband { army: ArmyId, count: u32 },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Move { .. } => "Move",
            Action::Recruit { .. } => "Recruit",
            Action::CallUp { .. } => "Call up",
            Action::Build { .. } => "Build",
            Action::Pillage { .. } => "Pillage",
            Action::Attack { .. } => "Attack",
            Action::Disband { .. } => "Disband",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// `army` is the stack now standing in `to` (after any merge)
    Moved { army: ArmyId, to: RegionId },
    Recruited { region: RegionId },
    CalledUp { army: ArmyId, units: u32 },
    Built { region: RegionId, kind: BuildingKind },
    Pillaged { region: RegionId, destroyed: BuildingKind },
    Battle(BattleReport),
    Disbanded { army: ArmyId, count: u32 },
    /// The attack waits for `choose_stance`
    AwaitingStance { region: RegionId },
}

/// AP cost of calling up `units`
pub fn call_up_cost(units: u32) -> u32 {
    if units <= 2 {
        1
    } else {
        2
    }
}

impl Campaign {
    // ========================================================================
    // VALIDATION
    // ========================================================================

    /// Validate `action` for `actor`, returning its AP cost
    pub fn check(&self, actor: PlayerId, action: &Action) -> Result<u32, ActionError> {
        self.ensure_action_phase(actor)?;

        let cost = match *action {
            Action::Move { army, to } => {
                let from = self.own_army(actor, army)?.region;
                self.known_region(to)?;
                let edge = self
                    .map
                    .edge_cost(from, to)
                    .ok_or(ActionError::NotAdjacent { from, to })?;
                edge + self.turn.effects.move_surcharge
            }
            Action::Recruit { region } => {
                self.owned_buildable(actor, region)?;
                if self.region(region).total_levies() >= self.map.region(region).levy_cap() {
                    return Err(ActionError::LevyCapReached(region));
                }
                self.afford(actor, Commodity::Silver, 1)?;
                1
            }
            Action::CallUp { units } => {
                let stored = self.stored_levies(actor);
                if stored == 0 {
                    return Err(ActionError::NoStoredLevies);
                }
                if units == 0 || units > stored {
                    return Err(ActionError::InvalidCount(units));
                }
                call_up_cost(units)
            }
            Action::Build { region, kind } => {
                self.owned_buildable(actor, region)?;
                if self.region(region).buildings.len() >= self.map.region(region).slot_cap() {
                    return Err(ActionError::NoFreeSlot(region));
                }
                self.afford(actor, Commodity::Silver, self.build_price(kind))?;
                1
            }
            Action::Pillage { region } => {
                self.known_region(region)?;
                if self.map.region(region).transit_only {
                    return Err(ActionError::TransitOnly(region));
                }
                if self.friendly_army_in(actor, region).is_none() {
                    return Err(ActionError::NoFriendlyArmy(region));
                }
                if self.region(region).owner == Some(actor) {
                    return Err(ActionError::OwnRegion(region));
                }
                if self.region(region).pillageable().is_empty() {
                    return Err(ActionError::NothingToPillage(region));
                }
                1
            }
            Action::Attack { region, .. } => {
                self.known_region(region)?;
                if self.friendly_army_in(actor, region).is_none() {
                    return Err(ActionError::NoFriendlyArmy(region));
                }
                if !self.has_enemy_in(actor, region) {
                    return Err(ActionError::NoEnemyPresent(region));
                }
                1
            }
            Action::Disband { army, count } => {
                let units = self.own_army(actor, army)?.units;
                if count == 0 || count > units {
                    return Err(ActionError::InvalidCount(count));
                }
                1
            }
        };

        if cost > self.turn.ap {
            return Err(ActionError::InsufficientAp {
                needed: cost,
                available: self.turn.ap,
            });
        }
        Ok(cost)
    }

    fn known_region(&self, region: RegionId) -> Result<(), ActionError> {
        if self.map.contains(region) {
            Ok(())
        } else {
            Err(ActionError::UnknownRegion(region))
        }
    }

    fn own_army(&self, actor: PlayerId, army: ArmyId) -> Result<&super::Army, ActionError> {
        let found = self.army(army).ok_or(ActionError::UnknownArmy(army))?;
        if found.owner != actor {
            return Err(ActionError::NotYourArmy(army));
        }
        Ok(found)
    }

    fn owned_buildable(&self, actor: PlayerId, region: RegionId) -> Result<(), ActionError> {
        self.known_region(region)?;
        if self.map.region(region).transit_only {
            return Err(ActionError::TransitOnly(region));
        }
        if self.region(region).owner != Some(actor) {
            return Err(ActionError::NotControlled(region));
        }
        Ok(())
    }

    fn afford(&self, actor: PlayerId, commodity: Commodity, needed: u32) -> Result<(), ActionError> {
        let available = self.player(actor).stock(commodity);
        if available < needed {
            return Err(ActionError::InsufficientResources {
                commodity,
                needed,
                available,
            });
        }
        Ok(())
    }

    /// Silver price after this turn's discount
    pub fn build_price(&self, kind: BuildingKind) -> u32 {
        kind.cost().saturating_sub(self.turn.effects.build_discount)
    }

    /// Strongest enemy army in `region`, lowest id on ties
    pub fn defender_in(&self, actor: PlayerId, region: RegionId) -> Option<ArmyId> {
        self.armies_in(region)
            .filter(|a| a.owner != actor)
            .max_by(|a, b| a.units.cmp(&b.units).then(b.id.cmp(&a.id)))
            .map(|a| a.id)
    }

    // ========================================================================
    // EXECUTION
    // ========================================================================

    /// Validate and carry out `action` for `actor`. A rejected action changes nothing.
    pub fn perform(&mut self, actor: PlayerId, action: Action) -> Result<ActionOutcome, ActionError> {
        let cost = match self.check(actor, &action) {
            Ok(cost) => cost,
            Err(e) => {
                warn!("{} rejected for {}: {}", action.name(), self.player(actor).kingdom, e);
                return Err(e);
            }
        };

        let outcome = match action {
            Action::Move { army, to } => {
                let from = self.army(army).map(|a| a.region).unwrap_or(to);
                self.turn.ap -= cost;
                let army = self.relocate_army(army, to);
                capture::prune_broken_timers(self);
                let details = format!(
                    "{} → {} (−{} AP)",
                    self.label(from),
                    self.label(to),
                    cost
                );
                self.record(actor, "Move", details);
                ActionOutcome::Moved { army, to }
            }
            Action::Recruit { region } => {
                self.turn.ap -= cost;
                self.player_mut(actor).silver -= 1;
                self.region_mut(region).add_levy(actor, 1);
                let details = format!("+1 levy into {} (−1 silver, −1 AP)", self.label(region));
                self.record(actor, "Recruit", details);
                ActionOutcome::Recruited { region }
            }
            Action::CallUp { units } => {
                self.turn.ap -= cost;
                let capital = self.player(actor).capital;
                let mut sources = self.owned_regions(actor);
                sources.sort_by_key(|r| *r != capital);
                let mut left = units;
                for region in sources {
                    if left == 0 {
                        break;
                    }
                    left -= self.region_mut(region).take_levies(actor, left);
                }
                let army = self.spawn_army(actor, capital, units);
                capture::prune_broken_timers(self);
                let details = format!("{} unit(s) to {} (−{} AP)", units, self.label(capital), cost);
                self.record(actor, "Call up", details);
                ActionOutcome::CalledUp { army, units }
            }
            Action::Build { region, kind } => {
                let price = self.build_price(kind);
                self.turn.ap -= cost;
                self.turn.effects.build_discount = 0;
                self.player_mut(actor).silver -= price;
                self.region_mut(region).buildings.push(kind);
                let details = format!(
                    "{} in {} (−{} silver, −1 AP)",
                    kind.name(),
                    self.label(region),
                    price
                );
                self.record(actor, "Build", details);
                ActionOutcome::Built { region, kind }
            }
            Action::Pillage { region } => {
                let targets = self.region(region).pillageable();
                let pick = self.roller().below(targets.len() as u32) as usize;
                self.turn.ap -= cost;
                let destroyed = self.region_mut(region).buildings.remove(targets[pick]);
                self.player_mut(actor).silver += 1;
                let details = format!(
                    "Destroyed {} in {} (+1 silver, −1 AP)",
                    destroyed.name(),
                    self.label(region)
                );
                self.record(actor, "Pillage", details);
                ActionOutcome::Pillaged { region, destroyed }
            }
            Action::Attack { region, stance } => self.launch_attack(actor, region, stance, cost)?,
            Action::Disband { army, count } => {
                let region = self.army(army).map(|a| a.region);
                self.turn.ap -= cost;
                self.drop_units(army, count);
                capture::prune_broken_timers(self);
                if let Some(region) = region {
                    let details = format!("Disbanded {count} unit(s) in {}", self.label(region));
                    self.record(actor, "Disband", details);
                }
                ActionOutcome::Disbanded { army, count }
            }
        };

        self.debug_check();
        Ok(outcome)
    }

    fn launch_attack(
        &mut self,
        actor: PlayerId,
        region: RegionId,
        stance: Option<Stance>,
        cost: u32,
    ) -> Result<ActionOutcome, ActionError> {
        let attacker = self
            .friendly_army_in(actor, region)
            .cloned()
            .ok_or(ActionError::NoFriendlyArmy(region))?;
        let defender = self
            .defender_in(actor, region)
            .ok_or(ActionError::NoEnemyPresent(region))?;
        let defender_units = self.army(defender).map_or(0, |a| a.units);

        if stance.is_none()
            && self.player(actor).is_human
            && !combat::is_skirmish(attacker.units, defender_units)
        {
            self.pending = Some(PendingDecision::StanceChoice {
                player: actor,
                region,
            });
            return Ok(ActionOutcome::AwaitingStance { region });
        }

        let report = combat::resolve_battle(self, attacker.id, defender, stance)
            .ok_or(ActionError::NoEnemyPresent(region))?;
        self.turn.ap -= cost;
        self.record(actor, "Attack", report.summary.clone());
        Ok(ActionOutcome::Battle(report))
    }

    // ========================================================================
    // HUMAN SURFACE
    // ========================================================================

    /// Perform `action` for the human player whose action phase it is
    pub fn act(&mut self, action: Action) -> Result<ActionOutcome, ActionError> {
        let player = self.human_in_action()?;
        self.perform(player, action)
    }

    pub fn move_army(&mut self, army: ArmyId, to: RegionId) -> Result<ActionOutcome, ActionError> {
        self.act(Action::Move { army, to })
    }

    pub fn recruit(&mut self, region: RegionId) -> Result<ActionOutcome, ActionError> {
        self.act(Action::Recruit { region })
    }

    pub fn call_up(&mut self, units: u32) -> Result<ActionOutcome, ActionError> {
        self.act(Action::CallUp { units })
    }

    pub fn build(&mut self, region: RegionId, kind: BuildingKind) -> Result<ActionOutcome, ActionError> {
        self.act(Action::Build { region, kind })
    }

    pub fn pillage(&mut self, region: RegionId) -> Result<ActionOutcome, ActionError> {
        self.act(Action::Pillage { region })
    }

    pub fn attack(
        &mut self,
        region: RegionId,
        stance: Option<Stance>,
    ) -> Result<ActionOutcome, ActionError> {
        self.act(Action::Attack { region, stance })
    }

    pub fn disband(&mut self, army: ArmyId, count: u32) -> Result<ActionOutcome, ActionError> {
        self.act(Action::Disband { army, count })
    }

    /// Resolve an attack that is waiting on the human's stance
    pub fn choose_stance(&mut self, stance: Stance) -> Result<BattleReport, ActionError> {
        let Some(PendingDecision::StanceChoice { player, region }) = self.pending.clone() else {
            return Err(match self.pending {
                Some(_) => ActionError::WrongDecision,
                None => ActionError::NoDecisionPending,
            });
        };

        let pending = self.pending.take();
        let action = Action::Attack {
            region,
            stance: Some(stance),
        };
        if let Err(e) = self.check(player, &action) {
            self.pending = pending;
            return Err(e);
        }
        match self.perform(player, action)? {
            ActionOutcome::Battle(report) => Ok(report),
            _ => Err(ActionError::NoEnemyPresent(region)),
        }
    }

    /// Withdraw a pending attack; no AP is spent
    pub fn cancel_stance_choice(&mut self) -> Result<(), ActionError> {
        match self.pending {
            Some(PendingDecision::StanceChoice { .. }) => {
                self.pending = None;
                Ok(())
            }
            Some(_) => Err(ActionError::WrongDecision),
            None => Err(ActionError::NoDecisionPending),
        }
    }

    /// Stance a human's armies take when attacked
    pub fn set_standing_stance(&mut self, player: PlayerId, stance: Stance) -> Result<(), ActionError> {
        if !self.player(player).is_human {
            return Err(ActionError::NotYourTurn);
        }
        self.player_mut(player).standing_stance = stance;
        Ok(())
    }

    // ========================================================================
    // PREDICATES
    // ========================================================================

    fn human_can(&self, action: Action) -> bool {
        self.human_in_action()
            .and_then(|player| self.check(player, &action))
            .is_ok()
    }

    pub fn can_move(&self, army: ArmyId, to: RegionId) -> bool {
        self.human_can(Action::Move { army, to })
    }

    pub fn can_recruit(&self, region: RegionId) -> bool {
        self.human_can(Action::Recruit { region })
    }

    pub fn can_call_up(&self, units: u32) -> bool {
        self.human_can(Action::CallUp { units })
    }

    pub fn can_build(&self, region: RegionId, kind: BuildingKind) -> bool {
        self.human_can(Action::Build { region, kind })
    }

    pub fn can_pillage(&self, region: RegionId) -> bool {
        self.human_can(Action::Pillage { region })
    }

    pub fn can_attack(&self, region: RegionId) -> bool {
        self.human_can(Action::Attack {
            region,
            stance: None,
        })
    }

    pub fn can_disband(&self, army: ArmyId, count: u32) -> bool {
        self.human_can(Action::Disband { army, count })
    }

    /// Neighbouring regions `army` can afford to enter this turn, with their cost
    pub fn reachable_moves(&self, army: ArmyId) -> Vec<(RegionId, u32)> {
        match self.army(army) {
            Some(army) => movement::reachable_moves(
                &self.map,
                army.region,
                self.turn.ap,
                self.turn.effects.move_surcharge,
            ),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::*;
    use crate::game::{BattleKind, Progress};

    /// Human Mercia at the start of its round-one action phase
    fn ready(rolls: Vec<u32>) -> Campaign {
        let mut campaign = human_vs_ai(rolls);
        assert_eq!(campaign.advance(), Progress::AwaitingHuman(PlayerId(0)));
        campaign
    }

    #[test]
    fn call_up_one_levy() {
        let mut campaign = ready(Vec::new());
        let tamworth = region(&campaign, "TAMWORTH");
        let outcome = campaign.call_up(1).unwrap();
        let ActionOutcome::CalledUp { army, units: 1 } = outcome else {
            panic!("unexpected {outcome:?}");
        };
        assert_eq!(campaign.army(army).map(|a| (a.region, a.units)), Some((tamworth, 1)));
        assert_eq!(campaign.ap(), 1);
        assert_eq!(campaign.region(tamworth).levies_of(PlayerId(0)), 0);
        assert!(!campaign.can_call_up(1));
        assert_eq!(campaign.call_up(1), Err(ActionError::NoStoredLevies));
    }

    #[test]
    fn large_call_up_costs_two_ap() {
        let mut campaign = ready(Vec::new());
        let tamworth = region(&campaign, "TAMWORTH");
        let hwicce = region(&campaign, "HWICCE");
        campaign.regions[hwicce.0 as usize].owner = Some(PlayerId(0));
        campaign.regions[hwicce.0 as usize].add_levy(PlayerId(0), 2);
        assert!(!campaign.can_call_up(4));
        assert!(campaign.can_call_up(3));
        assert_eq!(campaign.call_up(4), Err(ActionError::InvalidCount(4)));
        campaign.call_up(3).unwrap();
        assert_eq!(campaign.ap(), 0);
        // capital drained first
        assert_eq!(campaign.region(tamworth).total_levies(), 0);
        assert_eq!(campaign.region(hwicce).levies_of(PlayerId(0)), 0);
        assert_eq!(campaign.active_units(PlayerId(0)), 3);
    }

    #[test]
    fn rejected_move_changes_nothing() {
        let mut campaign = ready(Vec::new());
        let tamworth = region(&campaign, "TAMWORTH");
        let hwicce = region(&campaign, "HWICCE");
        let lindsey = region(&campaign, "LINDSEY");
        let army = campaign.spawn_army(PlayerId(0), tamworth, 2);
        assert_eq!(
            campaign.move_army(army, lindsey),
            Err(ActionError::NotAdjacent {
                from: tamworth,
                to: lindsey
            })
        );
        campaign.turn.effects.move_surcharge = 2;
        assert!(!campaign.can_move(army, hwicce));
        assert_eq!(
            campaign.move_army(army, hwicce),
            Err(ActionError::InsufficientAp {
                needed: 3,
                available: 2
            })
        );
        assert_eq!(campaign.army(army).unwrap().region, tamworth);
        assert_eq!(campaign.ap(), 2);
    }

    #[test]
    fn moving_onto_a_friendly_army_merges() {
        let mut campaign = ready(Vec::new());
        let tamworth = region(&campaign, "TAMWORTH");
        let hwicce = region(&campaign, "HWICCE");
        let mover = campaign.spawn_army(PlayerId(0), tamworth, 2);
        let host = campaign.spawn_army(PlayerId(0), hwicce, 1);
        assert_eq!(campaign.reachable_moves(mover).len(), 2);
        let outcome = campaign.move_army(mover, hwicce).unwrap();
        assert_eq!(outcome, ActionOutcome::Moved { army: host, to: hwicce });
        assert_eq!(campaign.army(host).unwrap().units, 3);
        assert!(campaign.army(mover).is_none());
        assert_eq!(campaign.ap(), 1);
    }

    #[test]
    fn recruit_respects_ownership_and_cap() {
        let mut campaign = ready(Vec::new());
        let tamworth = region(&campaign, "TAMWORTH");
        let hwicce = region(&campaign, "HWICCE");
        assert_eq!(campaign.recruit(hwicce), Err(ActionError::NotControlled(hwicce)));
        campaign.recruit(tamworth).unwrap();
        campaign.recruit(tamworth).unwrap();
        assert_eq!(campaign.region(tamworth).levies_of(PlayerId(0)), 3);
        assert_eq!(campaign.player(PlayerId(0)).silver, 1);
        campaign.turn.ap = 1;
        assert_eq!(campaign.recruit(tamworth), Err(ActionError::LevyCapReached(tamworth)));
    }

    #[test]
    fn build_uses_discount_once() {
        let mut campaign = ready(Vec::new());
        let tamworth = region(&campaign, "TAMWORTH");
        campaign.turn.effects.build_discount = 1;
        campaign.build(tamworth, BuildingKind::Hall).unwrap();
        assert_eq!(campaign.player(PlayerId(0)).silver, 1);
        assert_eq!(campaign.build_price(BuildingKind::Market), 2);
        assert_eq!(
            campaign.build(tamworth, BuildingKind::Market),
            Err(ActionError::InsufficientResources {
                commodity: Commodity::Silver,
                needed: 2,
                available: 1
            })
        );
        campaign.build(tamworth, BuildingKind::Farm).unwrap();
        assert_eq!(
            campaign.region(tamworth).buildings,
            vec![BuildingKind::Hall, BuildingKind::Farm]
        );
    }

    #[test]
    fn build_needs_a_free_slot() {
        let mut campaign = ready(Vec::new());
        let tamworth = region(&campaign, "TAMWORTH");
        campaign.regions[tamworth.0 as usize].buildings =
            vec![BuildingKind::Farm, BuildingKind::Farm, BuildingKind::Market];
        assert!(!campaign.can_build(tamworth, BuildingKind::Farm));
        assert_eq!(
            campaign.build(tamworth, BuildingKind::Farm),
            Err(ActionError::NoFreeSlot(tamworth))
        );
    }

    #[test]
    fn pillage_spares_castles() {
        let mut campaign = ready(vec![0]);
        let bernicia = region(&campaign, "BERNICIA");
        let tamworth = region(&campaign, "TAMWORTH");
        assert_eq!(campaign.pillage(bernicia), Err(ActionError::NoFriendlyArmy(bernicia)));
        campaign.spawn_army(PlayerId(0), tamworth, 1);
        assert_eq!(campaign.pillage(tamworth), Err(ActionError::OwnRegion(tamworth)));

        campaign.spawn_army(PlayerId(0), bernicia, 2);
        campaign.regions[bernicia.0 as usize].buildings = vec![BuildingKind::Castle];
        assert_eq!(campaign.pillage(bernicia), Err(ActionError::NothingToPillage(bernicia)));
        assert!(!campaign.can_pillage(bernicia));
        campaign.regions[bernicia.0 as usize].buildings =
            vec![BuildingKind::Castle, BuildingKind::Market];
        assert!(campaign.can_pillage(bernicia));
        let outcome = campaign.pillage(bernicia).unwrap();
        assert_eq!(
            outcome,
            ActionOutcome::Pillaged {
                region: bernicia,
                destroyed: BuildingKind::Market
            }
        );
        assert_eq!(campaign.region(bernicia).buildings, vec![BuildingKind::Castle]);
        assert_eq!(campaign.player(PlayerId(0)).silver, 4);
    }

    #[test]
    fn human_attack_waits_for_a_stance() {
        // defender draws Balanced, defense die 3
        let mut campaign = ready(vec![2, 2]);
        let deira = region(&campaign, "DEIRA");
        campaign.rules.big_battle_units = 100;
        campaign.spawn_army(PlayerId(0), deira, 5);
        campaign.spawn_army(PlayerId(1), deira, 2);

        assert_eq!(
            campaign.attack(deira, None),
            Ok(ActionOutcome::AwaitingStance { region: deira })
        );
        assert_eq!(campaign.ap(), 2);
        assert_eq!(campaign.call_up(1), Err(ActionError::DecisionPending));
        assert_eq!(campaign.end_turn(), Err(ActionError::DecisionPending));

        let report = campaign.choose_stance(Stance::Balanced).unwrap();
        assert_eq!(report.kind, BattleKind::MinorWin);
        assert!(campaign.pending().is_none());
        assert_eq!(campaign.ap(), 1);
    }

    #[test]
    fn cancelled_attack_costs_nothing() {
        let mut campaign = ready(Vec::new());
        let deira = region(&campaign, "DEIRA");
        campaign.spawn_army(PlayerId(0), deira, 3);
        campaign.spawn_army(PlayerId(1), deira, 3);
        campaign.attack(deira, None).unwrap();
        campaign.cancel_stance_choice().unwrap();
        assert_eq!(campaign.ap(), 2);
        assert_eq!(campaign.cancel_stance_choice(), Err(ActionError::NoDecisionPending));
    }

    #[test]
    fn skirmish_resolves_without_a_stance() {
        let mut campaign = ready(vec![5]);
        let deira = region(&campaign, "DEIRA");
        campaign.spawn_army(PlayerId(0), deira, 1);
        let enemy = campaign.spawn_army(PlayerId(1), deira, 2);
        let ActionOutcome::Battle(report) = campaign.attack(deira, None).unwrap() else {
            panic!("expected a battle");
        };
        assert_eq!(report.kind, BattleKind::Skirmish);
        assert_eq!(campaign.army(enemy).unwrap().units, 1);
        assert_eq!(campaign.ap(), 1);
    }

    #[test]
    fn attack_needs_both_sides() {
        let mut campaign = ready(Vec::new());
        let deira = region(&campaign, "DEIRA");
        assert!(!campaign.can_attack(deira));
        campaign.spawn_army(PlayerId(0), deira, 2);
        assert_eq!(campaign.attack(deira, None), Err(ActionError::NoEnemyPresent(deira)));
    }

    #[test]
    fn disband_checks_count() {
        let mut campaign = ready(Vec::new());
        let tamworth = region(&campaign, "TAMWORTH");
        let army = campaign.spawn_army(PlayerId(0), tamworth, 2);
        assert!(!campaign.can_disband(army, 3));
        assert!(campaign.can_disband(army, 2));
        campaign.disband(army, 2).unwrap();
        assert!(campaign.army(army).is_none());
        assert_eq!(campaign.ap(), 1);
    }

    #[test]
    fn standing_stance_is_for_humans() {
        let mut campaign = ready(Vec::new());
        campaign.set_standing_stance(PlayerId(0), Stance::Defensive).unwrap();
        assert_eq!(campaign.player(PlayerId(0)).standing_stance, Stance::Defensive);
        assert_eq!(
            campaign.set_standing_stance(PlayerId(1), Stance::Defensive),
            Err(ActionError::NotYourTurn)
        );
    }
}
