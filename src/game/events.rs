use bevy::log::info;
use serde::{Deserialize, Serialize};

use super::{weighted_pick, Campaign, Commodity, PendingDecision, PlayerId, RegionId};

// ============================================================================
// EVENT CARDS
// ============================================================================

/// One-shot effects drawn at the start of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCard {
    GoodHarvest,
    PoorHarvest,
    TradeBoom,
    Banditry,
    RoyalFavour,
    Plague,
    StormySeas,
    MasterMasons,
    Volunteers,
    MajorRevolt,
}

impl EventCard {
    pub fn name(&self) -> &'static str {
        match self {
            EventCard::GoodHarvest => "Good Harvest",
            EventCard::PoorHarvest => "Poor Harvest",
            EventCard::TradeBoom => "Trade Boom",
            EventCard::Banditry => "Banditry",
            EventCard::RoyalFavour => "Royal Favour",
            EventCard::Plague => "Plague",
            EventCard::StormySeas => "Stormy Seas",
            EventCard::MasterMasons => "Master Masons",
            EventCard::Volunteers => "Volunteers",
            EventCard::MajorRevolt => "Major Revolt",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EventCard::GoodHarvest => "+2 Food.",
            EventCard::PoorHarvest => "-1 Food.",
            EventCard::TradeBoom => "+2 Silver.",
            EventCard::Banditry => "-1 Silver.",
            EventCard::RoyalFavour => "+1 Influence.",
            EventCard::Plague => "Disband 1 active unit (if any).",
            EventCard::StormySeas => "Movement costs +1 AP this turn.",
            EventCard::MasterMasons => "Your next building this turn costs 1 Silver less.",
            EventCard::Volunteers => "+1 unit at your capital.",
            EventCard::MajorRevolt => "Pay Silver or lose control of a non-capital region.",
        }
    }

    pub fn all() -> &'static [EventCard] {
        &[
            EventCard::GoodHarvest,
            EventCard::PoorHarvest,
            EventCard::TradeBoom,
            EventCard::Banditry,
            EventCard::RoyalFavour,
            EventCard::Plague,
            EventCard::StormySeas,
            EventCard::MasterMasons,
            EventCard::Volunteers,
            EventCard::MajorRevolt,
        ]
    }

    /// Weight for random selection (higher is more common)
    pub fn weight(&self) -> u32 {
        match self {
            EventCard::GoodHarvest => 5,
            EventCard::PoorHarvest => 5,
            EventCard::TradeBoom => 5,
            EventCard::Banditry => 5,
            EventCard::RoyalFavour => 4,
            EventCard::Plague => 4,
            EventCard::StormySeas => 2,
            EventCard::MasterMasons => 2,
            EventCard::Volunteers => 2,
            EventCard::MajorRevolt => 1,
        }
    }
}

// ============================================================================
// DRAW & APPLY
// ============================================================================

pub fn draw(campaign: &mut Campaign) -> EventCard {
    weighted_pick(campaign.roller(), EventCard::all(), EventCard::weight)
        .unwrap_or(EventCard::GoodHarvest)
}

pub fn draw_and_apply(campaign: &mut Campaign, player: PlayerId) -> EventCard {
    let card = draw(campaign);
    info!("{} draws {}", campaign.player(player).kingdom, card.name());
    let result = apply(campaign, player, card);
    campaign.record(
        player,
        &format!("Event: {}", card.name()),
        format!("{} {}", card.description(), result),
    );
    card
}

/// Apply `card` to `player`, returning a short line for the chronicle
pub fn apply(campaign: &mut Campaign, player: PlayerId, card: EventCard) -> String {
    match card {
        EventCard::GoodHarvest => {
            campaign.player_mut(player).food += 2;
            "+2 Food".to_string()
        }
        EventCard::PoorHarvest => {
            campaign.player_mut(player).lose(Commodity::Food, 1);
            "-1 Food".to_string()
        }
        EventCard::TradeBoom => {
            campaign.player_mut(player).silver += 2;
            "+2 Silver".to_string()
        }
        EventCard::Banditry => {
            campaign.player_mut(player).lose(Commodity::Silver, 1);
            "-1 Silver".to_string()
        }
        EventCard::RoyalFavour => {
            campaign.player_mut(player).influence += 1;
            "+1 Influence".to_string()
        }
        EventCard::Plague => {
            let Some(army) = campaign.armies_of(player).next().map(|a| a.id) else {
                return "No active units.".to_string();
            };
            campaign.drop_units(army, 1);
            super::capture::prune_broken_timers(campaign);
            "Lost 1 unit to plague".to_string()
        }
        EventCard::StormySeas => {
            campaign.turn.effects.move_surcharge += 1;
            "Movement +1 AP this turn".to_string()
        }
        EventCard::MasterMasons => {
            campaign.turn.effects.build_discount = 1;
            "Next build -1 Silver".to_string()
        }
        EventCard::Volunteers => {
            let capital = campaign.player(player).capital;
            campaign.spawn_army(player, capital, 1);
            // A besieger in the capital is now contested
            super::capture::prune_broken_timers(campaign);
            format!("+1 unit at {}", campaign.label(capital))
        }
        EventCard::MajorRevolt => major_revolt(campaign, player),
    }
}

fn major_revolt(campaign: &mut Campaign, player: PlayerId) -> String {
    let options: Vec<RegionId> = campaign
        .owned_regions(player)
        .into_iter()
        .filter(|r| {
            let def = campaign.map.region(*r);
            !def.is_capital && !def.transit_only
        })
        .collect();
    if options.is_empty() {
        return "No eligible region.".to_string();
    }

    let tribute = campaign.rules.revolt_tribute;
    if campaign.player(player).silver < tribute {
        return lose_region_to_revolt(campaign, player, &options);
    }

    if campaign.player(player).is_human {
        campaign.pending = Some(PendingDecision::Revolt {
            player,
            regions: options,
            tribute,
        });
        "Choice required".to_string()
    } else {
        campaign.player_mut(player).silver -= tribute;
        format!("Paid {tribute} Silver to stop the revolt")
    }
}

/// A random region from `options` throws off its owner
pub(crate) fn lose_region_to_revolt(
    campaign: &mut Campaign,
    player: PlayerId,
    options: &[RegionId],
) -> String {
    if options.is_empty() {
        return "No eligible region.".to_string();
    }
    let lost = options[campaign.roller().below(options.len() as u32) as usize];
    campaign.set_owner(lost, None);
    let line = format!("Lost control of {}", campaign.label(lost));
    campaign.record(player, "Major Revolt", line.clone());
    line
}
