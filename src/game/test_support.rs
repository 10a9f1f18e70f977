//! Campaign fixtures shared by the unit tests

use super::{AiStyle, Campaign, CampaignSetup, GameData, HumanSeat, RegionId, ScriptedRoller};

fn build(setup: CampaignSetup, rolls: Vec<u32>) -> Campaign {
    let data = GameData::load_defaults().unwrap();
    Campaign::new(&data, setup, Box::new(ScriptedRoller::new(rolls))).unwrap()
}

fn ai_setup(kingdoms: &[&str], styles: Vec<AiStyle>) -> CampaignSetup {
    CampaignSetup {
        player_count: kingdoms.len(),
        human: None,
        ai_kingdoms: kingdoms.iter().map(|k| k.to_string()).collect(),
        ai_styles: styles,
        shuffle_order: false,
    }
}

/// Human Mercia (player 0) against a balanced Northumbria (player 1)
pub fn human_vs_ai(rolls: Vec<u32>) -> Campaign {
    build(
        CampaignSetup {
            player_count: 2,
            human: Some(HumanSeat {
                name: "Offa".to_string(),
                kingdom: "Mercia".to_string(),
            }),
            ai_kingdoms: vec!["Northumbria".to_string()],
            ai_styles: vec![AiStyle::Balanced],
            shuffle_order: false,
        },
        rolls,
    )
}

pub fn two_ai(rolls: Vec<u32>, styles: [AiStyle; 2]) -> Campaign {
    build(ai_setup(&["Mercia", "Northumbria"], styles.to_vec()), rolls)
}

pub fn three_ai(rolls: Vec<u32>) -> Campaign {
    build(
        ai_setup(&["Mercia", "Northumbria", "Wessex"], vec![AiStyle::Balanced]),
        rolls,
    )
}

pub fn five_ai(rolls: Vec<u32>) -> Campaign {
    build(
        ai_setup(
            &["Mercia", "Northumbria", "Wessex", "Wales", "Picts"],
            vec![AiStyle::Balanced],
        ),
        rolls,
    )
}

pub fn region(campaign: &Campaign, key: &str) -> RegionId {
    campaign.map.find(key).unwrap()
}
