use bevy::log::{info, warn};
use bevy::prelude::{App, Plugin, ResMut, Update};
use serde::{Deserialize, Serialize};

use super::{ai, capture, economy, events, ActionError, ArmyId, Campaign, PlayerId, RegionId};

pub struct TurnPlugin;

impl Plugin for TurnPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, drive_campaign);
    }
}

/// Phases of one player's turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    TurnStart,
    Event,
    IncomeUpkeep,
    Action,
    EndTurn,
    GameOver,
}

/// Effects that last until the end of the current turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEffects {
    /// Added to every movement cost
    pub move_surcharge: u32,
    /// Taken off the next building's price, then spent
    pub build_discount: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnState {
    pub round: u32,
    pub order: Vec<PlayerId>,
    /// Index into `order` of the active player
    pub index: usize,
    pub ap: u32,
    pub phase: TurnPhase,
    pub effects: TurnEffects,
}

impl TurnState {
    pub fn new(order: Vec<PlayerId>, ap: u32) -> Self {
        Self {
            round: 1,
            order,
            index: 0,
            ap,
            phase: TurnPhase::TurnStart,
            effects: TurnEffects::default(),
        }
    }
}

/// A human decision the engine is waiting on. Nothing else advances until it is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingDecision {
    /// Pay tribute or lose one of `regions`
    Revolt {
        player: PlayerId,
        regions: Vec<RegionId>,
        tribute: u32,
    },
    /// Upkeep could not be paid; `remaining` units must be disbanded
    ForcedDisband { player: PlayerId, remaining: u32 },
    /// An attack in `region` is waiting for the attacker's stance
    StanceChoice { player: PlayerId, region: RegionId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevoltChoice {
    PayTribute,
    Concede,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VictoryKind {
    /// Last kingdom standing
    Elimination,
    Influence,
    /// Whole homeland plus enough conquests
    Dominion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Victory { player: PlayerId, kind: VictoryKind },
    /// A human player lost their capital
    Defeat { player: PlayerId },
    RoundLimit { round: u32 },
}

/// Where `advance` stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    AwaitingHuman(PlayerId),
    AwaitingDecision(PendingDecision),
    /// An AI player finished its turn
    TurnEnded(PlayerId),
    GameOver(GameOutcome),
}

impl Campaign {
    /// Run automatic phases until the engine needs a human, an AI turn ends, or the game is over.
    pub fn advance(&mut self) -> Progress {
        loop {
            if let Some(outcome) = &self.outcome {
                return Progress::GameOver(outcome.clone());
            }
            if let Some(pending) = &self.pending {
                return Progress::AwaitingDecision(pending.clone());
            }

            let player = self.current_player();
            match self.turn.phase {
                TurnPhase::TurnStart => self.start_turn(player),
                TurnPhase::Event => {
                    self.turn.phase = TurnPhase::IncomeUpkeep;
                    if self.turn.round >= self.rules.events_start_round {
                        events::draw_and_apply(self, player);
                    }
                }
                TurnPhase::IncomeUpkeep => {
                    self.turn.phase = TurnPhase::Action;
                    let report = economy::collect(self, player);
                    if report.deficit > 0 {
                        info!(
                            "{} cannot feed {} of {} unit(s)",
                            self.player(player).kingdom,
                            report.deficit,
                            report.upkeep
                        );
                    }
                }
                TurnPhase::Action => {
                    if self.player(player).is_human {
                        return Progress::AwaitingHuman(player);
                    }
                    ai::run_turn(self, player);
                    self.turn.phase = TurnPhase::EndTurn;
                }
                TurnPhase::EndTurn => {
                    self.finish_turn(player);
                    return match &self.outcome {
                        Some(outcome) => Progress::GameOver(outcome.clone()),
                        None => Progress::TurnEnded(player),
                    };
                }
                TurnPhase::GameOver => {
                    // Only reachable with an outcome set; treat a bare GameOver as final
                    warn!("GameOver phase without an outcome");
                    return Progress::GameOver(GameOutcome::RoundLimit {
                        round: self.turn.round,
                    });
                }
            }
            self.debug_check();
        }
    }

    /// `advance` until something other than an AI turn boundary
    pub fn run_until_input(&mut self) -> Progress {
        loop {
            match self.advance() {
                Progress::TurnEnded(_) => continue,
                other => return other,
            }
        }
    }

    /// True when `advance` would return without changing anything
    pub fn awaits_input(&self) -> bool {
        self.outcome.is_some()
            || self.pending.is_some()
            || (self.turn.phase == TurnPhase::Action && self.player(self.current_player()).is_human)
    }

    /// Close the human player's action phase
    pub fn end_turn(&mut self) -> Result<(), ActionError> {
        let player = self.human_in_action()?;
        self.turn.phase = TurnPhase::EndTurn;
        self.finish_turn(player);
        Ok(())
    }

    /// Answer a pending major revolt
    pub fn resolve_revolt(&mut self, choice: RevoltChoice) -> Result<(), ActionError> {
        let Some(PendingDecision::Revolt {
            player,
            regions,
            tribute,
        }) = self.pending.clone()
        else {
            return Err(match self.pending {
                Some(_) => ActionError::WrongDecision,
                None => ActionError::NoDecisionPending,
            });
        };

        match choice {
            RevoltChoice::PayTribute => {
                let available = self.player(player).silver;
                if !self.player_mut(player).spend(super::Commodity::Silver, tribute) {
                    return Err(ActionError::InsufficientResources {
                        commodity: super::Commodity::Silver,
                        needed: tribute,
                        available,
                    });
                }
                self.record(player, "Major Revolt", format!("Paid {tribute} silver"));
            }
            RevoltChoice::Concede => {
                events::lose_region_to_revolt(self, player, &regions);
            }
        }

        self.pending = None;
        self.debug_check();
        Ok(())
    }

    /// Disband units toward a pending upkeep shortfall. Costs no AP.
    pub fn resolve_forced_disband(&mut self, army: ArmyId, count: u32) -> Result<(), ActionError> {
        let Some(PendingDecision::ForcedDisband { player, remaining }) = self.pending.clone() else {
            return Err(match self.pending {
                Some(_) => ActionError::WrongDecision,
                None => ActionError::NoDecisionPending,
            });
        };

        let target = self.army(army).ok_or(ActionError::UnknownArmy(army))?;
        if target.owner != player {
            return Err(ActionError::NotYourArmy(army));
        }
        if count == 0 || count > remaining || count > target.units {
            return Err(ActionError::InvalidCount(count));
        }

        let region = target.region;
        self.drop_units(army, count);
        capture::prune_broken_timers(self);
        let left = remaining - count;
        self.record(
            player,
            "Forced disband",
            format!("Disbanded {count} unit(s) in {}", self.label(region)),
        );

        self.pending = if left > 0 && self.active_units(player) > 0 {
            Some(PendingDecision::ForcedDisband {
                player,
                remaining: left,
            })
        } else {
            None
        };
        self.debug_check();
        Ok(())
    }

    /// The active player if it is a human in its action phase with nothing pending
    pub(crate) fn human_in_action(&self) -> Result<PlayerId, ActionError> {
        let player = self.current_player();
        self.ensure_action_phase(player)?;
        if !self.player(player).is_human {
            return Err(ActionError::NotYourTurn);
        }
        Ok(player)
    }

    pub(crate) fn ensure_action_phase(&self, player: PlayerId) -> Result<(), ActionError> {
        if self.outcome.is_some() {
            return Err(ActionError::GameOver);
        }
        if self.pending.is_some() {
            return Err(ActionError::DecisionPending);
        }
        if self.turn.phase != TurnPhase::Action || self.current_player() != player {
            return Err(ActionError::NotYourTurn);
        }
        Ok(())
    }

    fn start_turn(&mut self, player: PlayerId) {
        self.turn.effects = TurnEffects::default();
        self.turn.ap = self.rules.action_points;
        self.chronicle.start_turn();
        info!(
            "Round {}: {} to play",
            self.turn.round,
            self.player(player).kingdom
        );
        self.turn.phase = TurnPhase::Event;
    }

    /// Capture resolution, victory check, then hand over to the next player
    fn finish_turn(&mut self, player: PlayerId) {
        capture::resolve(self, player);

        if let Some(outcome) = self.check_victory(player) {
            self.declare(outcome);
            return;
        }

        self.pass_to_next_player();

        if let Some(limit) = self.rules.round_limit {
            if self.turn.round > limit {
                self.declare(GameOutcome::RoundLimit { round: limit });
                return;
            }
        }

        self.turn.phase = TurnPhase::TurnStart;
        self.debug_check();
    }

    fn pass_to_next_player(&mut self) {
        let seats = self.turn.order.len();
        for _ in 0..seats {
            self.turn.index += 1;
            if self.turn.index == seats {
                self.turn.index = 0;
                self.turn.round += 1;
            }
            if self.player(self.current_player()).is_alive() {
                return;
            }
        }
    }

    /// Victory conditions for the player who just ended their turn, in priority order
    pub fn check_victory(&self, player: PlayerId) -> Option<GameOutcome> {
        let alive: Vec<PlayerId> = self.alive_players().map(|p| p.id).collect();
        if alive.len() == 1 {
            return Some(GameOutcome::Victory {
                player: alive[0],
                kind: VictoryKind::Elimination,
            });
        }

        if self.rules.end_on_human_defeat {
            if let Some(human) = self.players.iter().find(|p| p.is_human && p.eliminated) {
                return Some(GameOutcome::Defeat { player: human.id });
            }
        }

        let p = self.player(player);
        if p.eliminated {
            return None;
        }

        if p.influence >= self.rules.influence_target(alive.len()) {
            return Some(GameOutcome::Victory {
                player,
                kind: VictoryKind::Influence,
            });
        }

        let owned = self.owned_regions(player);
        let has_homeland = p.core.iter().all(|core| owned.contains(core));
        if has_homeland {
            let extra = owned
                .iter()
                .filter(|r| !p.core.contains(r) && !self.map.region(**r).transit_only)
                .count();
            if extra >= self.rules.dominion_extra(alive.len()) {
                return Some(GameOutcome::Victory {
                    player,
                    kind: VictoryKind::Dominion,
                });
            }
        }

        None
    }

    fn declare(&mut self, outcome: GameOutcome) {
        let text = match &outcome {
            GameOutcome::Victory { player, kind } => {
                format!("{} wins by {:?}", self.player(*player).kingdom, kind)
            }
            GameOutcome::Defeat { player } => {
                format!("{} lost its capital", self.player(*player).kingdom)
            }
            GameOutcome::RoundLimit { round } => format!("No victor after {round} rounds"),
        };
        info!("Game over: {}", text);
        self.record_system("Game over", text);
        self.turn.phase = TurnPhase::GameOver;
        self.outcome = Some(outcome);
    }
}

/// Steps the campaign one AI turn (or automatic phase run) per frame
fn drive_campaign(campaign: Option<ResMut<Campaign>>) {
    let Some(mut campaign) = campaign else {
        return;
    };
    if campaign.awaits_input() {
        return;
    }
    campaign.advance();
}
