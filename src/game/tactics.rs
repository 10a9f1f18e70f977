use serde::{Deserialize, Serialize};

use super::Side;

/// One-shot battle modifiers drawn by each side in a big battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TacticCard {
    Shieldwall,
    WarDrums,
    Rally,
    FeignedRetreat,
    ArrowStorm,
    Flanking,
    SupplyLines,
}

impl TacticCard {
    pub fn name(&self) -> &'static str {
        match self {
            TacticCard::Shieldwall => "Shieldwall",
            TacticCard::WarDrums => "War Drums",
            TacticCard::Rally => "Rally",
            TacticCard::FeignedRetreat => "Feigned Retreat",
            TacticCard::ArrowStorm => "Arrow Storm",
            TacticCard::Flanking => "Flanking",
            TacticCard::SupplyLines => "Supply Lines",
        }
    }

    pub fn all() -> &'static [TacticCard] {
        &[
            TacticCard::Shieldwall,
            TacticCard::WarDrums,
            TacticCard::Rally,
            TacticCard::FeignedRetreat,
            TacticCard::ArrowStorm,
            TacticCard::Flanking,
            TacticCard::SupplyLines,
        ]
    }

    pub fn weight(&self) -> u32 {
        match self {
            TacticCard::Shieldwall | TacticCard::WarDrums => 3,
            _ => 2,
        }
    }

    /// What the card does for `side` in a region with or without a castle
    pub fn modifiers(&self, side: Side, has_castle: bool) -> TacticModifiers {
        let mut m = TacticModifiers::default();
        match (self, side) {
            (TacticCard::Shieldwall, Side::Defender) => m.defense = 2,
            (TacticCard::WarDrums, _) => m.strength = 1,
            (TacticCard::Rally, _) => m.loss_reduction = 1,
            (TacticCard::FeignedRetreat, _) => m.loss_reduction_when_beaten = 1,
            (TacticCard::ArrowStorm, _) => m.extra_enemy_loss_on_win = 1,
            (TacticCard::Flanking, Side::Attacker) if !has_castle => m.strength = 2,
            (TacticCard::SupplyLines, _) => m.silver_on_win = 1,
            _ => {}
        }
        m
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TacticModifiers {
    pub strength: i32,
    /// Added to the region's defense value; only meaningful for the defender
    pub defense: i32,
    pub loss_reduction: u32,
    pub loss_reduction_when_beaten: u32,
    pub extra_enemy_loss_on_win: u32,
    pub silver_on_win: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_restricted_cards() {
        assert_eq!(
            TacticCard::Shieldwall.modifiers(Side::Attacker, false),
            TacticModifiers::default()
        );
        assert_eq!(TacticCard::Shieldwall.modifiers(Side::Defender, false).defense, 2);
        assert_eq!(TacticCard::Flanking.modifiers(Side::Attacker, false).strength, 2);
        assert_eq!(TacticCard::Flanking.modifiers(Side::Attacker, true).strength, 0);
        assert_eq!(TacticCard::Flanking.modifiers(Side::Defender, false).strength, 0);
    }

    #[test]
    fn deck_weights() {
        let total: u32 = TacticCard::all().iter().map(|c| c.weight()).sum();
        assert_eq!(total, 16);
    }
}
