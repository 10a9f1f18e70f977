use bevy::log::{info, warn};
use serde::{Deserialize, Serialize};

use super::{
    ai, capture, weighted_pick, ArmyId, Campaign, DistanceMap, PathOptions, PlayerId, RegionId,
    TacticCard, TacticModifiers,
};

// ============================================================================
// STANCES & SIDES
// ============================================================================

/// Battle posture, resolved rock-paper-scissors style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stance {
    Offensive,
    #[default]
    Balanced,
    Defensive,
}

impl Stance {
    pub fn name(&self) -> &'static str {
        match self {
            Stance::Offensive => "Offensive",
            Stance::Balanced => "Balanced",
            Stance::Defensive => "Defensive",
        }
    }

    pub fn all() -> &'static [Stance] {
        &[Stance::Offensive, Stance::Balanced, Stance::Defensive]
    }

    /// Offensive beats Balanced, Balanced beats Defensive, Defensive beats Offensive
    pub fn beats(&self, other: Stance) -> bool {
        matches!(
            (self, other),
            (Stance::Offensive, Stance::Balanced)
                | (Stance::Balanced, Stance::Defensive)
                | (Stance::Defensive, Stance::Offensive)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Attacker,
    Defender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleKind {
    /// One-die resolution when either side has a single unit
    Skirmish,
    Stalemate,
    MinorWin,
    ClearWin,
    /// The beaten army is wiped out
    Crushing,
}

impl BattleKind {
    pub fn name(&self) -> &'static str {
        match self {
            BattleKind::Skirmish => "Skirmish",
            BattleKind::Stalemate => "Stalemate",
            BattleKind::MinorWin => "Minor win",
            BattleKind::ClearWin => "Clear win",
            BattleKind::Crushing => "Crushing victory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReport {
    pub region: RegionId,
    pub attacker: PlayerId,
    pub defender: PlayerId,
    pub kind: BattleKind,
    pub winner: Option<Side>,
    pub attacker_stance: Option<Stance>,
    pub defender_stance: Option<Stance>,
    /// The skirmish die or the defense die
    pub roll: u8,
    pub attacker_tactic: Option<TacticCard>,
    pub defender_tactic: Option<TacticCard>,
    pub attacker_strength: i32,
    pub defender_strength: i32,
    pub attacker_losses: u32,
    pub defender_losses: u32,
    /// Where the beaten army ended up, if it fell back
    pub retreat: Option<(Side, RegionId)>,
    /// Armies removed from play
    pub destroyed: Vec<Side>,
    pub summary: String,
}

// ============================================================================
// RULE TABLES
// ============================================================================

pub fn is_skirmish(attacker_units: u32, defender_units: u32) -> bool {
    attacker_units == 1 || defender_units == 1
}

/// (winner, attacker losses, defender losses) for a skirmish die
pub fn skirmish_result(roll: u8) -> (Option<Side>, u32, u32) {
    match roll {
        1 | 2 => (Some(Side::Defender), 1, 0),
        3 => (None, 1, 1),
        _ => (Some(Side::Attacker), 0, 1),
    }
}

/// Defense die: 1 → +2, 2 → +1, 3-4 → 0, 5 → −1, 6 → −2
pub fn defense_modifier(roll: u8) -> i32 {
    match roll {
        1 => 2,
        2 => 1,
        3 | 4 => 0,
        5 => -1,
        _ => -2,
    }
}

/// Strength the defender gains from its defense value
pub fn defense_to_strength(defense: i32) -> i32 {
    match defense {
        i32::MIN..=1 => 0,
        2..=3 => 1,
        4..=5 => 2,
        _ => 3,
    }
}

/// (kind, loser's base losses, retreat steps) for a strength difference
pub fn classify(diff: u32) -> (BattleKind, u32, u32) {
    match diff {
        0..=1 => (BattleKind::Stalemate, 1, 0),
        2..=3 => (BattleKind::MinorWin, 1, 1),
        4..=5 => (BattleKind::ClearWin, 2, 2),
        _ => (BattleKind::Crushing, 3, 0),
    }
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// Fight one battle between two armies sharing a region.
///
/// Draws, in order: attacker stance (when not given and not a skirmish), defender stance
/// (AI only), the die, then one tactic card per side in a big battle.
/// Spends no AP; returns `None` if either army is gone.
pub fn resolve_battle(
    campaign: &mut Campaign,
    attacker: ArmyId,
    defender: ArmyId,
    attacker_stance: Option<Stance>,
) -> Option<BattleReport> {
    let (Some(atk), Some(dfn)) = (campaign.army(attacker).cloned(), campaign.army(defender).cloned())
    else {
        warn!("Battle between missing armies {:?} and {:?}", attacker, defender);
        return None;
    };
    let region = dfn.region;

    let mut report = BattleReport {
        region,
        attacker: atk.owner,
        defender: dfn.owner,
        kind: BattleKind::Skirmish,
        winner: None,
        attacker_stance: None,
        defender_stance: None,
        roll: 0,
        attacker_tactic: None,
        defender_tactic: None,
        attacker_strength: atk.units as i32,
        defender_strength: dfn.units as i32,
        attacker_losses: 0,
        defender_losses: 0,
        retreat: None,
        destroyed: Vec::new(),
        summary: String::new(),
    };

    if is_skirmish(atk.units, dfn.units) {
        let roll = campaign.roller().d6();
        let (winner, atk_loss, def_loss) = skirmish_result(roll);
        report.roll = roll;
        report.winner = winner;
        report.attacker_losses = campaign.drop_units(attacker, atk_loss);
        report.defender_losses = campaign.drop_units(defender, def_loss);
        report.summary = format!(
            "Skirmish (d6={}): {}",
            roll,
            match winner {
                Some(Side::Defender) => "Defender holds. Attacker loses 1.",
                None => "Stalemate. Both lose 1.",
                Some(Side::Attacker) => "Attacker wins. Defender loses 1.",
            }
        );
        finish(campaign, &mut report, attacker, defender);
        return Some(report);
    }

    // Stances
    let a_stance = match attacker_stance {
        Some(stance) => stance,
        None => ai::choose_stance(campaign, atk.owner, atk.units, dfn.units),
    };
    let d_stance = if campaign.player(dfn.owner).is_human {
        campaign.player(dfn.owner).standing_stance
    } else {
        ai::choose_stance(campaign, dfn.owner, dfn.units, atk.units)
    };
    report.attacker_stance = Some(a_stance);
    report.defender_stance = Some(d_stance);
    let stance_winner = if a_stance.beats(d_stance) {
        Some(Side::Attacker)
    } else if d_stance.beats(a_stance) {
        Some(Side::Defender)
    } else {
        None
    };

    let roll = campaign.roller().d6();
    report.roll = roll;

    // Tactics
    if atk.units + dfn.units >= campaign.rules.big_battle_units {
        report.attacker_tactic = weighted_pick(campaign.roller(), TacticCard::all(), TacticCard::weight);
        report.defender_tactic = weighted_pick(campaign.roller(), TacticCard::all(), TacticCard::weight);
    }
    let has_castle = campaign.region(region).has_castle();
    let a_mods = report
        .attacker_tactic
        .map(|c| c.modifiers(Side::Attacker, has_castle))
        .unwrap_or_default();
    let d_mods = report
        .defender_tactic
        .map(|c| c.modifiers(Side::Defender, has_castle))
        .unwrap_or_default();

    // Defense value
    let def = campaign.map.region(region);
    let mut defense = def.terrain.defense_bonus() + campaign.region(region).building_defense();
    if def.is_capital {
        defense += 1;
    }
    if stance_winner == Some(Side::Defender) {
        defense += 1;
    }
    defense = (defense + defense_modifier(roll) + d_mods.defense).max(0);

    let stance_bonus = i32::from(stance_winner == Some(Side::Attacker));
    let atk_strength = atk.units as i32 + stance_bonus + a_mods.strength;
    let dfn_strength = dfn.units as i32 + defense_to_strength(defense) + d_mods.strength;
    report.attacker_strength = atk_strength;
    report.defender_strength = dfn_strength;

    let diff = atk_strength.abs_diff(dfn_strength);
    let (kind, base_loss, retreat_steps) = classify(diff);
    report.kind = kind;

    let mut summary = format!(
        "Battle: A{} vs D{} ({} vs {}, def {} => +{}, d6={}",
        atk.units,
        dfn.units,
        a_stance.name(),
        d_stance.name(),
        defense,
        defense_to_strength(defense),
        roll
    );
    for (label, card) in [("A", report.attacker_tactic), ("D", report.defender_tactic)] {
        if let Some(card) = card {
            summary.push_str(&format!(", {label}: {}", card.name()));
        }
    }
    summary.push_str("). ");

    if kind == BattleKind::Stalemate {
        report.attacker_losses = campaign.drop_units(attacker, 1u32.saturating_sub(a_mods.loss_reduction));
        report.defender_losses = campaign.drop_units(defender, 1u32.saturating_sub(d_mods.loss_reduction));
        summary.push_str("Stalemate: both lose 1.");
        report.summary = summary;
        finish(campaign, &mut report, attacker, defender);
        return Some(report);
    }

    let winner = if atk_strength > dfn_strength {
        Side::Attacker
    } else {
        Side::Defender
    };
    report.winner = Some(winner);
    let (loser_id, loser_side, winner_mods, loser_mods) = match winner {
        Side::Attacker => (defender, Side::Defender, a_mods, d_mods),
        Side::Defender => (attacker, Side::Attacker, d_mods, a_mods),
    };
    let loser_name = match loser_side {
        Side::Attacker => "attacker",
        Side::Defender => "defender",
    };

    // A retreat into a friendly stack merges the loser under the host's id
    let mut survivors = (attacker, defender);
    let losses = if kind == BattleKind::Crushing {
        let units = campaign.army(loser_id).map_or(0, |a| a.units);
        campaign.remove_army(loser_id);
        summary.push_str(&format!(
            "{}: {loser_name} loses 3; survivors disband.",
            kind.name()
        ));
        units
    } else {
        let loss = (base_loss + winner_mods.extra_enemy_loss_on_win)
            .saturating_sub(loser_mods.loss_reduction)
            .saturating_sub(loser_mods.loss_reduction_when_beaten);
        let removed = campaign.drop_units(loser_id, loss);
        summary.push_str(&format!(
            "{}: {loser_name} loses {removed} and retreats {retreat_steps}.",
            kind.name()
        ));
        if let Some((to, host)) = retreat(campaign, loser_id, retreat_steps) {
            report.retreat = Some((loser_side, to));
            match loser_side {
                Side::Attacker => survivors.0 = host,
                Side::Defender => survivors.1 = host,
            }
        }
        removed
    };
    match loser_side {
        Side::Attacker => report.attacker_losses = losses,
        Side::Defender => report.defender_losses = losses,
    }

    if winner_mods.silver_on_win > 0 {
        let owner = match winner {
            Side::Attacker => atk.owner,
            Side::Defender => dfn.owner,
        };
        campaign.player_mut(owner).silver += winner_mods.silver_on_win;
    }

    report.summary = summary;
    finish(campaign, &mut report, survivors.0, survivors.1);
    Some(report)
}

fn finish(campaign: &mut Campaign, report: &mut BattleReport, attacker: ArmyId, defender: ArmyId) {
    if campaign.army(attacker).is_none() {
        report.destroyed.push(Side::Attacker);
    }
    if campaign.army(defender).is_none() {
        report.destroyed.push(Side::Defender);
    }
    capture::prune_broken_timers(campaign);
    info!(
        "Battle in {}: {}",
        campaign.label(report.region),
        report.summary
    );
}

/// Fall back up to `steps` regions toward the owner's capital, never stepping into an
/// enemy-held region. Returns the new region and the id of the army standing there,
/// which differs from `army` when it merged into a friendly stack.
pub fn retreat(campaign: &mut Campaign, army: ArmyId, steps: u32) -> Option<(RegionId, ArmyId)> {
    let army = campaign.army(army).cloned()?;
    let capital = campaign.player(army.owner).capital;

    let mut options = PathOptions::with_surcharge(campaign.turn.effects.move_surcharge);
    for other in &campaign.armies {
        if other.owner != army.owner && other.region != capital {
            options.blocked.insert(other.region);
        }
    }
    let path = DistanceMap::compute(&campaign.map, army.region, &options).path_to(capital)?;

    let mut destination = army.region;
    for step in path.steps.into_iter().take(steps as usize) {
        if campaign.has_enemy_in(army.owner, step) {
            break;
        }
        destination = step;
    }
    if destination == army.region {
        return None;
    }
    let host = campaign.relocate_army(army.id, destination);
    Some((destination, host))
}
