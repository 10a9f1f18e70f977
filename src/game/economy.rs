use bevy::log::debug;

use super::{capture, Campaign, PendingDecision, PlayerId, Yield};

/// What one income/upkeep phase did to a player's stores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncomeReport {
    pub income: Yield,
    pub upkeep: u32,
    /// Units that had to be disbanded for lack of food
    pub deficit: u32,
}

/// Capital baseline plus every building in every region the player owns
pub fn income_for(campaign: &Campaign, player: PlayerId) -> Yield {
    let mut total = Yield {
        food: 1,
        silver: 1,
        influence: 0,
    };
    for region in campaign.owned_regions(player) {
        total.add(campaign.region(region).production());
    }
    total
}

/// Run the income and upkeep phase. A human with a shortfall is left with a pending disband.
pub fn collect(campaign: &mut Campaign, player: PlayerId) -> IncomeReport {
    let income = income_for(campaign, player);
    let upkeep = campaign.active_units(player);

    let stores = campaign.player_mut(player);
    stores.food += income.food;
    stores.silver += income.silver;
    stores.influence += income.influence;

    let deficit = upkeep.saturating_sub(stores.food);
    stores.food -= upkeep - deficit;

    let mut summary = format!(
        "+{} food, +{} silver, +{} influence, upkeep -{} food",
        income.food, income.silver, income.influence, upkeep
    );

    if deficit > 0 {
        if campaign.player(player).is_human {
            summary.push_str(&format!(", must disband {deficit} unit(s)"));
            campaign.pending = Some(PendingDecision::ForcedDisband {
                player,
                remaining: deficit,
            });
        } else {
            let removed = disband_smallest_first(campaign, player, deficit);
            summary.push_str(&format!(", disbanded {removed} unit(s)"));
        }
    }

    debug!(
        "{} income {:?}, upkeep {}, deficit {}",
        campaign.player(player).kingdom,
        income,
        upkeep,
        deficit
    );
    campaign.record(player, "Income & upkeep", summary);

    IncomeReport {
        income,
        upkeep,
        deficit,
    }
}

/// Remove `count` units starting with the smallest armies. Returns units removed.
pub fn disband_smallest_first(campaign: &mut Campaign, player: PlayerId, count: u32) -> u32 {
    let mut armies: Vec<(u32, _)> = campaign.armies_of(player).map(|a| (a.units, a.id)).collect();
    armies.sort();

    let mut left = count;
    for (_, id) in armies {
        if left == 0 {
            break;
        }
        left -= campaign.drop_units(id, left);
    }
    capture::prune_broken_timers(campaign);
    count - left
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::*;
    use crate::game::{ActionError, ArmyId, BuildingKind};

    #[test]
    fn buildings_in_owned_regions_produce() {
        let mut campaign = human_vs_ai(Vec::new());
        let human = PlayerId(0);
        let tamworth = region(&campaign, "TAMWORTH");
        let cheshire = region(&campaign, "CHESHIRE");
        campaign.regions[tamworth.0 as usize].buildings = vec![BuildingKind::Farm, BuildingKind::Hall];
        // built but not owned: no yield
        campaign.regions[cheshire.0 as usize].buildings = vec![BuildingKind::Market];
        assert_eq!(
            income_for(&campaign, human),
            Yield {
                food: 2,
                silver: 1,
                influence: 1
            }
        );
    }

    #[test]
    fn upkeep_is_paid_from_food() {
        let mut campaign = human_vs_ai(Vec::new());
        let human = PlayerId(0);
        let tamworth = region(&campaign, "TAMWORTH");
        campaign.spawn_army(human, tamworth, 2);
        let report = collect(&mut campaign, human);
        assert_eq!(report.upkeep, 2);
        assert_eq!(report.deficit, 0);
        assert_eq!(campaign.player(human).food, 1);
        assert!(campaign.pending.is_none());
    }

    #[test]
    fn ai_disbands_smallest_armies_first() {
        let mut campaign = human_vs_ai(Vec::new());
        let ai = PlayerId(1);
        let bernicia = region(&campaign, "BERNICIA");
        let deira = region(&campaign, "DEIRA");
        let lothian = region(&campaign, "LOTHIAN");
        let big = campaign.spawn_army(ai, bernicia, 4);
        let small = campaign.spawn_army(ai, deira, 1);
        let mid = campaign.spawn_army(ai, lothian, 2);
        campaign.players[1].food = 0;

        // income 1 food against 7 upkeep
        let report = collect(&mut campaign, ai);
        assert_eq!(report.deficit, 6);
        assert_eq!(campaign.player(ai).food, 0);
        assert!(campaign.army(small).is_none());
        assert!(campaign.army(mid).is_none());
        assert_eq!(campaign.army(big).map(|a| a.units), Some(1));
    }

    #[test]
    fn human_shortfall_becomes_a_pending_disband() {
        let mut campaign = human_vs_ai(Vec::new());
        let human = PlayerId(0);
        let tamworth = region(&campaign, "TAMWORTH");
        let army = campaign.spawn_army(human, tamworth, 5);
        campaign.players[0].food = 0;
        collect(&mut campaign, human);
        assert_eq!(campaign.player(human).food, 0);
        assert_eq!(
            campaign.pending,
            Some(PendingDecision::ForcedDisband {
                player: human,
                remaining: 4
            })
        );

        assert_eq!(
            campaign.resolve_forced_disband(army, 5),
            Err(ActionError::InvalidCount(5))
        );
        assert_eq!(
            campaign.resolve_forced_disband(ArmyId(999), 1),
            Err(ActionError::UnknownArmy(ArmyId(999)))
        );
        campaign.resolve_forced_disband(army, 3).unwrap();
        assert_eq!(
            campaign.pending,
            Some(PendingDecision::ForcedDisband {
                player: human,
                remaining: 1
            })
        );
        campaign.resolve_forced_disband(army, 1).unwrap();
        assert!(campaign.pending.is_none());
        assert_eq!(campaign.active_units(human), 1);
    }
}
