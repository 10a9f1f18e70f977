use bevy::log::info;
use serde::{Deserialize, Serialize};

use super::{Campaign, PlayerId, RegionId};

/// Progress of an uncontested occupation toward ownership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureTimer {
    pub occupier: PlayerId,
    /// End-of-turn resolutions still needed
    pub remaining: u32,
}

/// Qualifying turn-ends needed to take a region
pub fn required_turns(campaign: &Campaign, region: RegionId) -> u32 {
    if campaign.map.region(region).is_capital {
        2
    } else {
        1
    }
}

/// End-of-turn capture resolution for `player`
pub fn resolve(campaign: &mut Campaign, player: PlayerId) {
    prune_broken_timers(campaign);

    let occupied: Vec<RegionId> = campaign.armies_of(player).map(|a| a.region).collect();
    for region in occupied {
        // An earlier capture this turn may have eliminated someone and moved armies
        if campaign.friendly_army_in(player, region).is_none() {
            continue;
        }
        if campaign.map.region(region).transit_only || campaign.has_enemy_in(player, region) {
            continue;
        }
        if campaign.region(region).owner == Some(player) {
            campaign.capture_timers.remove(&region);
            continue;
        }

        let required = required_turns(campaign, region);
        let timer = campaign
            .capture_timers
            .entry(region)
            .or_insert(CaptureTimer {
                occupier: player,
                remaining: required,
            });
        if timer.occupier != player {
            *timer = CaptureTimer {
                occupier: player,
                remaining: required,
            };
        }
        timer.remaining = timer.remaining.saturating_sub(1);
        let remaining = timer.remaining;

        if remaining == 0 {
            take_region(campaign, player, region);
        } else {
            let details = format!(
                "{} besieged, {} more turn(s) to take it",
                campaign.label(region),
                remaining
            );
            campaign.record(player, "Siege", details);
        }
    }
}

/// Drop every timer whose occupation no longer holds
pub fn prune_broken_timers(campaign: &mut Campaign) {
    let broken: Vec<RegionId> = campaign
        .capture_timers
        .iter()
        .filter(|(region, timer)| {
            campaign.friendly_army_in(timer.occupier, **region).is_none()
                || campaign.has_enemy_in(timer.occupier, **region)
                || campaign.region(**region).owner == Some(timer.occupier)
        })
        .map(|(region, _)| *region)
        .collect();
    for region in broken {
        campaign.capture_timers.remove(&region);
    }
}

fn take_region(campaign: &mut Campaign, player: PlayerId, region: RegionId) {
    campaign.set_owner(region, Some(player));
    let details = format!("{} is now controlled", campaign.label(region));
    campaign.record(player, "Captured", details);

    if !campaign.map.region(region).is_capital {
        return;
    }
    let loser = campaign
        .players
        .iter()
        .find(|p| p.capital == region && p.id != player && p.is_alive())
        .map(|p| p.id);
    if let Some(loser) = loser {
        eliminate(campaign, loser);
    }
}

/// Knock a player out: armies gone, levies gone, regions left ownerless
pub fn eliminate(campaign: &mut Campaign, loser: PlayerId) {
    campaign.player_mut(loser).eliminated = true;
    campaign.armies.retain(|a| a.owner != loser);

    for region in campaign.owned_regions(loser) {
        campaign.set_owner(region, None);
    }
    for state in &mut campaign.regions {
        state.levies.remove(&loser);
    }
    prune_broken_timers(campaign);

    info!("{} has been eliminated", campaign.player(loser).kingdom);
    let details = format!(
        "{} has lost its capital and is eliminated",
        campaign.player(loser).kingdom
    );
    campaign.record_system("Kingdom defeated", details);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::*;

    #[test]
    fn ordinary_region_falls_after_one_turn_end() {
        let mut campaign = human_vs_ai(Vec::new());
        let human = PlayerId(0);
        let deira = region(&campaign, "DEIRA");
        campaign.spawn_army(human, deira, 2);
        resolve(&mut campaign, human);
        assert_eq!(campaign.region(deira).owner, Some(human));
        assert!(campaign.capture_timers.is_empty());
    }

    #[test]
    fn capital_needs_two_uncontested_turn_ends() {
        let mut campaign = human_vs_ai(Vec::new());
        let human = PlayerId(0);
        let bernicia = region(&campaign, "BERNICIA");
        campaign.spawn_army(human, bernicia, 2);

        resolve(&mut campaign, human);
        assert_eq!(campaign.region(bernicia).owner, Some(PlayerId(1)));
        assert_eq!(
            campaign.capture_timers.get(&bernicia),
            Some(&CaptureTimer {
                occupier: human,
                remaining: 1
            })
        );

        resolve(&mut campaign, human);
        assert_eq!(campaign.region(bernicia).owner, Some(human));
        assert!(campaign.player(PlayerId(1)).eliminated);
        assert_eq!(campaign.armies_of(PlayerId(1)).count(), 0);
        assert!(campaign.invariant_violations().is_empty());
    }

    #[test]
    fn contest_resets_the_timer() {
        let mut campaign = human_vs_ai(Vec::new());
        let human = PlayerId(0);
        let bernicia = region(&campaign, "BERNICIA");
        let army = campaign.spawn_army(human, bernicia, 2);
        resolve(&mut campaign, human);
        assert!(campaign.capture_timers.contains_key(&bernicia));

        let enemy = campaign.spawn_army(PlayerId(1), bernicia, 1);
        prune_broken_timers(&mut campaign);
        assert!(campaign.capture_timers.is_empty());

        campaign.remove_army(enemy);
        resolve(&mut campaign, human);
        // fresh timer, not a capture
        assert_eq!(campaign.capture_timers[&bernicia].remaining, 1);
        assert!(campaign.army(army).is_some());
    }

    #[test]
    fn occupier_leaving_breaks_the_timer() {
        let mut campaign = human_vs_ai(Vec::new());
        let human = PlayerId(0);
        let bernicia = region(&campaign, "BERNICIA");
        let lothian = region(&campaign, "LOTHIAN");
        let army = campaign.spawn_army(human, bernicia, 2);
        resolve(&mut campaign, human);
        campaign.relocate_army(army, lothian);
        prune_broken_timers(&mut campaign);
        assert!(!campaign.capture_timers.contains_key(&bernicia));
    }

    #[test]
    fn capture_clears_stored_levies() {
        let mut campaign = human_vs_ai(Vec::new());
        let human = PlayerId(0);
        let deira = region(&campaign, "DEIRA");
        campaign.regions[deira.0 as usize].owner = Some(PlayerId(1));
        campaign.regions[deira.0 as usize].add_levy(PlayerId(1), 2);
        campaign.spawn_army(human, deira, 1);
        resolve(&mut campaign, human);
        assert_eq!(campaign.region(deira).owner, Some(human));
        assert_eq!(campaign.region(deira).total_levies(), 0);
    }

    #[test]
    fn transit_regions_are_never_captured() {
        let mut campaign = five_ai(Vec::new());
        let man = region(&campaign, "ISLE_OF_MAN");
        campaign.spawn_army(PlayerId(0), man, 3);
        resolve(&mut campaign, PlayerId(0));
        assert_eq!(campaign.region(man).owner, None);
        assert!(campaign.capture_timers.is_empty());
    }

    #[test]
    fn elimination_strips_the_loser() {
        let mut campaign = three_ai(Vec::new());
        let loser = PlayerId(1);
        let deira = region(&campaign, "DEIRA");
        campaign.regions[deira.0 as usize].owner = Some(loser);
        campaign.spawn_army(loser, deira, 2);
        eliminate(&mut campaign, loser);
        assert!(campaign.owned_regions(loser).is_empty());
        assert_eq!(campaign.stored_levies(loser), 0);
        assert!(campaign.regions.iter().all(|r| r.levies_of(loser) == 0));
        assert_eq!(campaign.active_units(loser), 0);
    }
}
