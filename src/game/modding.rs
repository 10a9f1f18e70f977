//! Game data for Crown & Levy
//!
//! The board and the rule constants are RON files embedded at compile time.
//! Native builds can overlay them from a mods directory, where every
//! sub-directory may carry its own `rules.ron` and `map.ron`.

use bevy::log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::{DataError, MapData, MapGraph};

// ============================================================================
// EMBEDDED DEFAULT DATA
// ============================================================================

/// Default board embedded at compile time
const DEFAULT_MAP_RON: &str = include_str!("../../assets/data/britain.ron");

/// Default rules embedded at compile time
const DEFAULT_RULES_RON: &str = include_str!("../../assets/data/rules.ron");

// ============================================================================
// RULES
// ============================================================================

/// Tunable rule constants. Missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    /// AP granted at the start of every turn
    pub action_points: u32,
    /// First round in which event cards are drawn
    pub events_start_round: u32,
    pub starting_food: u32,
    pub starting_silver: u32,
    /// Levies stored in each capital at setup
    pub starting_levies: u32,
    /// Surviving player count from which the large-game targets apply
    pub large_game_players: usize,
    pub influence_target_small: u32,
    pub influence_target_large: u32,
    /// Non-core regions needed on top of the full homeland
    pub dominion_extra_small: usize,
    pub dominion_extra_large: usize,
    /// Combined units from which tactic cards are drawn
    pub big_battle_units: u32,
    /// Silver that buys off a major revolt
    pub revolt_tribute: u32,
    /// End the game as soon as a human player is eliminated
    pub end_on_human_defeat: bool,
    /// Stop after this many rounds
    pub round_limit: Option<u32>,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            action_points: 2,
            events_start_round: 2,
            starting_food: 2,
            starting_silver: 2,
            starting_levies: 1,
            large_game_players: 4,
            influence_target_small: 18,
            influence_target_large: 24,
            dominion_extra_small: 2,
            dominion_extra_large: 3,
            big_battle_units: 6,
            revolt_tribute: 2,
            end_on_human_defeat: true,
            round_limit: None,
        }
    }
}

impl GameRules {
    fn is_large(&self, surviving: usize) -> bool {
        surviving >= self.large_game_players
    }

    pub fn influence_target(&self, surviving: usize) -> u32 {
        if self.is_large(surviving) {
            self.influence_target_large
        } else {
            self.influence_target_small
        }
    }

    pub fn dominion_extra(&self, surviving: usize) -> usize {
        if self.is_large(surviving) {
            self.dominion_extra_large
        } else {
            self.dominion_extra_small
        }
    }
}

// ============================================================================
// GAME DATA
// ============================================================================

/// Everything needed to start a campaign
#[derive(Debug, Clone)]
pub struct GameData {
    pub map: MapData,
    pub rules: GameRules,
    /// Names of the mods applied on top of the defaults
    pub loaded_mods: Vec<String>,
}

impl GameData {
    /// Parse the embedded board and rules
    pub fn load_defaults() -> Result<Self, DataError> {
        let map: MapData = ron::from_str(DEFAULT_MAP_RON)?;
        let rules: GameRules = ron::from_str(DEFAULT_RULES_RON)?;
        // Fail early on a broken board rather than at setup
        MapGraph::from_data(&map)?;

        Ok(Self {
            map,
            rules,
            loaded_mods: Vec::new(),
        })
    }

    /// Overlay every mod found under `mods_dir`, in directory order.
    /// Unreadable or invalid files are skipped with a warning.
    pub fn load_mods(&mut self, mods_dir: &Path) {
        if !mods_dir.exists() {
            info!("No mods directory at {}, using default data", mods_dir.display());
            return;
        }

        let Ok(entries) = fs::read_dir(mods_dir) else {
            warn!("Failed to read mods directory {}", mods_dir.display());
            return;
        };

        let mut dirs: Vec<_> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        dirs.sort();

        for path in dirs {
            let mod_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string();

            info!("Loading mod: {}", mod_name);

            let rules_path = path.join("rules.ron");
            if rules_path.exists() {
                match read_ron::<GameRules>(&rules_path) {
                    Ok(rules) => {
                        info!("  Overriding rules");
                        self.rules = rules;
                    }
                    Err(e) => warn!("Failed to load {}: {}", rules_path.display(), e),
                }
            }

            let map_path = path.join("map.ron");
            if map_path.exists() {
                match read_ron::<MapData>(&map_path)
                    .and_then(|map| MapGraph::from_data(&map).map(|_| map))
                {
                    Ok(map) => {
                        info!("  Overriding board: {}", map.name);
                        self.map = map;
                    }
                    Err(e) => warn!("Failed to load {}: {}", map_path.display(), e),
                }
            }

            self.loaded_mods.push(mod_name);
        }
    }
}

fn read_ron<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, DataError> {
    let content = fs::read_to_string(path)?;
    Ok(ron::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn embedded_rules_match_defaults() {
        let data = GameData::load_defaults().unwrap();
        assert_eq!(data.rules, GameRules::default());
    }

    #[test]
    fn partial_rules_fill_in_defaults() {
        let rules: GameRules = ron::from_str("(dominion_extra_large: 4)").unwrap();
        assert_eq!(rules.dominion_extra_large, 4);
        assert_eq!(rules.action_points, 2);
    }

    #[test]
    fn thresholds_follow_surviving_players() {
        let rules = GameRules::default();
        assert_eq!(rules.influence_target(2), 18);
        assert_eq!(rules.influence_target(3), 18);
        assert_eq!(rules.influence_target(4), 24);
        assert_eq!(rules.dominion_extra(3), 2);
        assert_eq!(rules.dominion_extra(5), 3);
    }

    /// Two-kingdom board used as a map override
    const ISLAND_RON: &str = r#"(
        name: "Island",
        regions: [
            (key: "NORTH", name: "North", kingdom: Some("Mercia"), capital: true, terrain: Plains),
            (key: "SOUTH", name: "South", kingdom: Some("Wessex"), capital: true, terrain: Mountain),
        ],
        edges: [("NORTH", "SOUTH", 1)],
        kingdoms: [
            (name: "Mercia", capital: "NORTH", core: ["NORTH"]),
            (name: "Wessex", capital: "SOUTH", core: ["SOUTH"]),
        ],
    )"#;

    #[test]
    fn mods_override_rules_and_board() {
        let dir = tempdir().unwrap();
        let island = dir.path().join("island");
        fs::create_dir(&island).unwrap();
        fs::write(island.join("rules.ron"), "(action_points: 3, revolt_tribute: 5)").unwrap();
        fs::write(island.join("map.ron"), ISLAND_RON).unwrap();

        let mut data = GameData::load_defaults().unwrap();
        data.load_mods(dir.path());

        assert_eq!(data.loaded_mods, vec!["island".to_string()]);
        assert_eq!(data.rules.action_points, 3);
        assert_eq!(data.rules.revolt_tribute, 5);
        assert_eq!(data.rules.starting_food, GameRules::default().starting_food);
        assert_eq!(data.map.name, "Island");
        assert_eq!(data.map.regions.len(), 2);
    }

    #[test]
    fn broken_mod_files_are_skipped() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken");
        fs::create_dir(&broken).unwrap();
        fs::write(broken.join("rules.ron"), "(action_points: \"many\")").unwrap();
        // edge to a region that does not exist
        fs::write(
            broken.join("map.ron"),
            ISLAND_RON.replace(r#"("NORTH", "SOUTH", 1)"#, r#"("NORTH", "ATLANTIS", 1)"#),
        )
        .unwrap();

        let mut data = GameData::load_defaults().unwrap();
        data.load_mods(dir.path());

        assert_eq!(data.loaded_mods, vec!["broken".to_string()]);
        assert_eq!(data.rules, GameRules::default());
        assert_eq!(data.map.name, "Britain");
    }

    #[test]
    fn missing_mods_dir_keeps_defaults() {
        let mut data = GameData::load_defaults().unwrap();
        data.load_mods(Path::new("definitely/not/here"));
        assert!(data.loaded_mods.is_empty());
    }
}
