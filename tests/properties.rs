//! Property-based tests over rule tables and seeded AI campaigns.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use crown_and_levy::game::{
    classify, collect, defense_to_strength, income_for, is_skirmish, skirmish_result, AiStyle,
    BattleKind, Campaign, CampaignSetup, GameData, HumanSeat, PendingDecision, PlayerId, Progress,
    ScriptedRoller, SeededRoller, Side,
};

fn seeded_table(seed: u64, players: usize, style: AiStyle) -> Campaign {
    let data = GameData::load_defaults().unwrap();
    let setup = CampaignSetup {
        player_count: players,
        human: None,
        ai_kingdoms: Vec::new(),
        ai_styles: vec![style],
        shuffle_order: true,
    };
    Campaign::new(&data, setup, Box::new(SeededRoller::new(seed))).unwrap()
}

/// Human Mercia against AI Northumbria
fn duel_table() -> Campaign {
    let data = GameData::load_defaults().unwrap();
    let setup = CampaignSetup {
        player_count: 2,
        human: Some(HumanSeat {
            name: "Offa".to_string(),
            kingdom: "Mercia".to_string(),
        }),
        ai_kingdoms: vec!["Northumbria".to_string()],
        ai_styles: vec![AiStyle::Balanced],
        shuffle_order: false,
    };
    Campaign::new(&data, setup, Box::new(ScriptedRoller::new(Vec::new()))).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Whole AI games keep every engine invariant after every turn.
    #[test]
    fn prop_ai_campaigns_stay_consistent(
        seed in any::<u64>(),
        players in 2usize..=5,
        style in prop::sample::select(AiStyle::all().to_vec()),
    ) {
        let mut campaign = seeded_table(seed, players, style);
        campaign.rules.round_limit = Some(12);

        for _ in 0..200 {
            let progress = campaign.advance();
            let violations = campaign.invariant_violations();
            prop_assert!(violations.is_empty(), "{:?}", violations);

            for def in campaign.map.regions().filter(|r| r.transit_only) {
                prop_assert_eq!(campaign.region(def.id).owner, None);
            }
            for army in &campaign.armies {
                prop_assert!(army.units > 0);
            }

            match progress {
                Progress::GameOver(_) => break,
                Progress::TurnEnded(_) => {}
                other => prop_assert!(false, "AI-only game stopped at {:?}", other),
            }
        }
        prop_assert!(campaign.is_over());
    }

    /// Upkeep never overdraws food: a shortfall is disbanded by the AI or owed by a human.
    #[test]
    fn prop_upkeep_never_overdraws(
        food in 0u32..8,
        units in prop::collection::vec(1u32..5, 0..=3),
        human in any::<bool>(),
    ) {
        let mut campaign = duel_table();
        let (player, homes) = if human {
            (PlayerId(0), ["TAMWORTH", "HWICCE", "CHESHIRE"])
        } else {
            (PlayerId(1), ["BERNICIA", "DEIRA", "LOTHIAN"])
        };
        for (key, n) in homes.iter().zip(&units) {
            let region = campaign.map.find(key).unwrap();
            campaign.spawn_army(player, region, *n);
        }
        campaign.players[player.0 as usize].food = food;

        let income = income_for(&campaign, player);
        let upkeep: u32 = units.iter().sum();
        let available = food + income.food;
        let report = collect(&mut campaign, player);

        prop_assert_eq!(report.income, income);
        prop_assert_eq!(report.upkeep, upkeep);
        prop_assert_eq!(report.deficit, upkeep.saturating_sub(available));
        prop_assert_eq!(campaign.player(player).food, available.saturating_sub(upkeep));
        if human {
            let owed = (report.deficit > 0).then_some(PendingDecision::ForcedDisband {
                player,
                remaining: report.deficit,
            });
            prop_assert_eq!(campaign.pending.clone(), owed);
            prop_assert_eq!(campaign.active_units(player), upkeep);
        } else {
            prop_assert!(campaign.pending.is_none());
            prop_assert_eq!(campaign.active_units(player), upkeep - report.deficit);
        }
        prop_assert!(campaign.invariant_violations().is_empty());
    }

    /// Any battle involving a single unit is a skirmish.
    #[test]
    fn prop_single_units_skirmish(attacker in 1u32..20, defender in 1u32..20) {
        prop_assert_eq!(
            is_skirmish(attacker, defender),
            attacker == 1 || defender == 1
        );
    }

    /// The skirmish loser always loses exactly one unit.
    #[test]
    fn prop_skirmish_losses(roll in 1u8..=6) {
        let (winner, attacker_losses, defender_losses) = skirmish_result(roll);
        match winner {
            Some(Side::Attacker) => prop_assert_eq!((attacker_losses, defender_losses), (0, 1)),
            Some(Side::Defender) => prop_assert_eq!((attacker_losses, defender_losses), (1, 0)),
            None => prop_assert_eq!((attacker_losses, defender_losses), (1, 1)),
        }
    }

    /// Close fights are stalemates and lopsided ones crush without a retreat.
    #[test]
    fn prop_battle_bands(diff in 0u32..40) {
        let (kind, losses, steps) = classify(diff);
        if diff <= 1 {
            prop_assert_eq!(kind, BattleKind::Stalemate);
            prop_assert_eq!(steps, 0);
        }
        if diff >= 6 {
            prop_assert_eq!(kind, BattleKind::Crushing);
            prop_assert_eq!((losses, steps), (3, 0));
        }
        prop_assert!(losses >= 1);
    }

    /// More defense never means less strength.
    #[test]
    fn prop_defense_is_monotonic(defense in -4i32..12) {
        prop_assert!(defense_to_strength(defense + 1) >= defense_to_strength(defense));
        prop_assert!(defense_to_strength(defense) <= 3);
    }
}
