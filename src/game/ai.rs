use bevy::log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use super::{
    weighted_pick, Action, BuildingKind, Campaign, DistanceMap, PathOptions, PlayerId, RegionId,
    Stance,
};

// ============================================================================
// AI CONFIGURATION
// ============================================================================

/// AI style - affects what the AI values, not which moves are legal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiStyle {
    Aggressive,
    Defensive,
    Balanced,
}

/// Score-weighting parameters for one style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleWeights {
    /// Value of an un-owned region of the home kingdom
    pub core_target: i32,
    /// Value of an ownerless region
    pub neutral_target: i32,
    /// Value of a region owned by another kingdom
    pub enemy_target: i32,
    /// Score lost per AP of travel
    pub distance_penalty: i32,
    /// Score lost per enemy unit in excess of the moving army
    pub outnumbered_penalty: i32,
    /// Stance weights: offensive, balanced, defensive
    pub stance_bias: [u32; 3],
    /// What to spend silver and spare AP on, most wanted first
    pub development: &'static [Develop],
}

/// Economic moves the AI considers once nothing better is available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Develop {
    Recruit,
    Build(BuildingKind),
    /// A castle in the capital, if it has none
    FortifyCapital,
}

impl AiStyle {
    pub fn name(&self) -> &'static str {
        match self {
            AiStyle::Aggressive => "Aggressive",
            AiStyle::Defensive => "Defensive",
            AiStyle::Balanced => "Balanced",
        }
    }

    pub fn all() -> &'static [AiStyle] {
        &[AiStyle::Aggressive, AiStyle::Defensive, AiStyle::Balanced]
    }

    pub fn weights(&self) -> StyleWeights {
        match self {
            AiStyle::Aggressive => StyleWeights {
                core_target: 6,
                neutral_target: 4,
                enemy_target: 5,
                distance_penalty: 1,
                outnumbered_penalty: 1,
                stance_bias: [3, 2, 1],
                development: &[
                    Develop::Recruit,
                    Develop::Build(BuildingKind::Market),
                    Develop::Build(BuildingKind::Farm),
                    Develop::Build(BuildingKind::Hall),
                ],
            },
            AiStyle::Defensive => StyleWeights {
                core_target: 8,
                neutral_target: 3,
                enemy_target: 1,
                distance_penalty: 2,
                outnumbered_penalty: 3,
                stance_bias: [1, 2, 3],
                development: &[
                    Develop::FortifyCapital,
                    Develop::Build(BuildingKind::Farm),
                    Develop::Recruit,
                    Develop::Build(BuildingKind::Hall),
                    Develop::Build(BuildingKind::Market),
                ],
            },
            AiStyle::Balanced => StyleWeights {
                core_target: 6,
                neutral_target: 4,
                enemy_target: 3,
                distance_penalty: 1,
                outnumbered_penalty: 2,
                stance_bias: [2, 2, 2],
                development: &[
                    Develop::Build(BuildingKind::Market),
                    Develop::Build(BuildingKind::Hall),
                    Develop::Recruit,
                    Develop::Build(BuildingKind::Farm),
                ],
            },
        }
    }
}

/// Upper bound on actions in one AI turn, in case a board has zero-cost edges
const MAX_ACTIONS_PER_TURN: usize = 16;

// ============================================================================
// STRATEGIES
// ============================================================================

type Strategy = fn(&Campaign, PlayerId) -> Option<Action>;

/// Tried in order every iteration; the first one with a valid action wins
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("muster", muster),
    ("engage", engage),
    ("advance", advance),
    ("reinforce", reinforce),
    ("develop", develop),
];

/// Play one AI action phase to completion
pub fn run_turn(campaign: &mut Campaign, player: PlayerId) {
    let mut taken = 0;
    for _ in 0..MAX_ACTIONS_PER_TURN {
        if campaign.ap() == 0
            || campaign.pending.is_some()
            || campaign.outcome.is_some()
            || !campaign.player(player).is_alive()
        {
            break;
        }

        let mut acted = false;
        for (name, strategy) in STRATEGIES {
            let Some(action) = strategy(campaign, player) else {
                continue;
            };
            match campaign.perform(player, action) {
                Ok(_) => {
                    debug!("{} {}: {:?}", campaign.player(player).kingdom, name, action);
                    acted = true;
                    taken += 1;
                    break;
                }
                Err(e) => warn!("AI {} strategy failed: {}", name, e),
            }
        }
        if !acted {
            break;
        }
    }

    if taken == 0 {
        campaign.record(player, "AI turn", "No actions");
    }
}

/// No army in the field but levies at home
fn muster(campaign: &Campaign, player: PlayerId) -> Option<Action> {
    if campaign.armies_of(player).next().is_some() {
        return None;
    }
    let stored = campaign.stored_levies(player);
    if stored == 0 {
        return None;
    }
    valid(campaign, player, Action::CallUp { units: stored.min(2) })
}

/// Fight wherever an army shares a region with an enemy
fn engage(campaign: &Campaign, player: PlayerId) -> Option<Action> {
    campaign
        .armies_of(player)
        .filter(|a| campaign.has_enemy_in(player, a.region))
        .find_map(|a| {
            valid(campaign, player, Action::Attack {
                region: a.region,
                stance: None,
            })
        })
}

/// Step the army with the best target one region closer to it
fn advance(campaign: &Campaign, player: PlayerId) -> Option<Action> {
    let weights = campaign.player(player).style.weights();
    let core = &campaign.player(player).core;
    let surcharge = campaign.turn.effects.move_surcharge;

    // (score, -cost, -region) for deterministic ties
    let mut best: Option<((i32, Reverse<u32>, Reverse<RegionId>), Action)> = None;

    for army in campaign.armies_of(player) {
        if is_holding(campaign, player, army.region) {
            continue;
        }
        let distances = DistanceMap::compute(
            &campaign.map,
            army.region,
            &PathOptions::with_surcharge(surcharge),
        );

        for target in campaign.map.regions() {
            if target.transit_only || target.id == army.region {
                continue;
            }
            let owner = campaign.region(target.id).owner;
            let value = match owner {
                Some(p) if p == player => continue,
                _ if core.contains(&target.id) => weights.core_target,
                None => weights.neutral_target,
                Some(_) => weights.enemy_target,
            };
            let Some(cost) = distances.cost_to(target.id) else {
                continue;
            };
            let outnumbered =
                (campaign.enemy_units_in(player, target.id) as i32 - army.units as i32).max(0);
            let score = value
                - weights.distance_penalty * cost as i32
                - weights.outnumbered_penalty * outnumbered;

            let Some(step) = distances.first_step(target.id) else {
                continue;
            };
            let key = (score, Reverse(cost), Reverse(target.id));
            if best.as_ref().map_or(true, |(k, _)| key > *k) {
                best = Some((key, Action::Move { army: army.id, to: step }));
            }
        }
    }

    let ((score, ..), action) = best?;
    debug!("{} advance score {}: {:?}", campaign.player(player).kingdom, score, action);
    valid(campaign, player, action)
}

/// Armies sitting on a region they are about to capture stay put
fn is_holding(campaign: &Campaign, player: PlayerId, region: RegionId) -> bool {
    !campaign.map.region(region).transit_only
        && campaign.region(region).owner != Some(player)
        && !campaign.has_enemy_in(player, region)
}

/// Call up more troops while food allows it
fn reinforce(campaign: &Campaign, player: PlayerId) -> Option<Action> {
    let stored = campaign.stored_levies(player);
    let active = campaign.active_units(player);
    if stored == 0 || active >= 4 || campaign.player(player).food < active + 2 {
        return None;
    }
    valid(campaign, player, Action::CallUp { units: stored.min(2) })
}

fn develop(campaign: &Campaign, player: PlayerId) -> Option<Action> {
    let weights = campaign.player(player).style.weights();
    let starving = campaign.player(player).food <= campaign.active_units(player);
    let farm_first = starving.then_some(Develop::Build(BuildingKind::Farm));

    farm_first
        .into_iter()
        .chain(weights.development.iter().copied())
        .find_map(|wish| develop_action(campaign, player, wish))
}

fn develop_action(campaign: &Campaign, player: PlayerId, wish: Develop) -> Option<Action> {
    let capital = campaign.player(player).capital;
    let mut owned = campaign.owned_regions(player);
    match wish {
        Develop::Recruit => {
            owned.sort_by_key(|r| campaign.region(*r).total_levies());
            owned
                .into_iter()
                .find_map(|region| valid(campaign, player, Action::Recruit { region }))
        }
        Develop::Build(kind) => {
            owned.sort_by_key(|r| *r != capital);
            owned
                .into_iter()
                .find_map(|region| valid(campaign, player, Action::Build { region, kind }))
        }
        Develop::FortifyCapital => {
            if campaign.region(capital).has_castle() {
                return None;
            }
            valid(campaign, player, Action::Build {
                region: capital,
                kind: BuildingKind::Castle,
            })
        }
    }
}

fn valid(campaign: &Campaign, player: PlayerId, action: Action) -> Option<Action> {
    campaign.check(player, &action).ok().map(|_| action)
}

// ============================================================================
// STANCE HEURISTIC
// ============================================================================

/// Stance weights for `style` given both sides' unit counts
pub fn stance_weights(style: AiStyle, own_units: u32, enemy_units: u32) -> [u32; 3] {
    let mut weights = style.weights().stance_bias;
    if own_units * 2 >= enemy_units * 3 {
        weights[0] += 2;
    } else if own_units * 3 <= enemy_units * 2 {
        weights[2] += 2;
    }
    weights
}

pub fn choose_stance(
    campaign: &mut Campaign,
    player: PlayerId,
    own_units: u32,
    enemy_units: u32,
) -> Stance {
    let weights = stance_weights(campaign.player(player).style, own_units, enemy_units);
    let options = [
        (Stance::Offensive, weights[0]),
        (Stance::Balanced, weights[1]),
        (Stance::Defensive, weights[2]),
    ];
    weighted_pick(campaign.roller(), &options, |(_, w)| *w)
        .map(|(stance, _)| stance)
        .unwrap_or_default()
}
