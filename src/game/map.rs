use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::DataError;

/// Index of a region on the active board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub u16);

/// Terrain of a region. Only affects the defender in battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Open country
    Plains,
    /// Hills and highlands
    Mountain,
    /// Open water, used by transit regions
    Sea,
}

impl Terrain {
    pub fn name(&self) -> &'static str {
        match self {
            Terrain::Plains => "Plains",
            Terrain::Mountain => "Mountain",
            Terrain::Sea => "Sea",
        }
    }

    pub fn defense_bonus(&self) -> i32 {
        match self {
            Terrain::Plains => 0,
            Terrain::Mountain => 1,
            Terrain::Sea => 0,
        }
    }
}

// ============================================================================
// MAP DATA (as authored)
// ============================================================================

/// Board definition as stored in RON. Edges and kingdoms refer to region keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapData {
    pub name: String,
    pub regions: Vec<RegionData>,
    /// (region, region, AP cost); bidirectional
    pub edges: Vec<(String, String, u32)>,
    pub kingdoms: Vec<KingdomData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionData {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub kingdom: Option<String>,
    #[serde(default)]
    pub capital: bool,
    pub terrain: Terrain,
    #[serde(default)]
    pub transit_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KingdomData {
    pub name: String,
    pub capital: String,
    pub core: Vec<String>,
}

impl MapData {
    /// Drop the regions (and their edges) of kingdoms that are not in play.
    /// Transit regions always stay.
    pub fn restricted_to(&self, kingdoms: &[String]) -> MapData {
        let regions: Vec<RegionData> = self
            .regions
            .iter()
            .filter(|r| {
                r.transit_only
                    || r.kingdom
                        .as_ref()
                        .map_or(false, |k| kingdoms.iter().any(|name| name == k))
            })
            .cloned()
            .collect();
        let kept: HashSet<&str> = regions.iter().map(|r| r.key.as_str()).collect();

        let edges = self
            .edges
            .iter()
            .filter(|(a, b, _)| kept.contains(a.as_str()) && kept.contains(b.as_str()))
            .cloned()
            .collect();
        let kingdoms = self
            .kingdoms
            .iter()
            .filter(|k| kingdoms.iter().any(|name| *name == k.name))
            .cloned()
            .collect();

        MapData {
            name: self.name.clone(),
            regions,
            edges,
            kingdoms,
        }
    }
}

// ============================================================================
// MAP GRAPH (validated, indexed)
// ============================================================================

/// Static description of one region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionDef {
    pub id: RegionId,
    pub key: String,
    pub name: String,
    pub kingdom: Option<String>,
    pub is_capital: bool,
    pub terrain: Terrain,
    pub transit_only: bool,
}

impl RegionDef {
    /// Maximum stored levies
    pub fn levy_cap(&self) -> u32 {
        if self.transit_only {
            0
        } else if self.is_capital {
            3
        } else {
            2
        }
    }

    /// Maximum number of buildings
    pub fn slot_cap(&self) -> usize {
        if self.transit_only {
            0
        } else if self.is_capital {
            3
        } else {
            2
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub a: RegionId,
    pub b: RegionId,
    pub cost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KingdomDef {
    pub name: String,
    pub capital: RegionId,
    pub core: Vec<RegionId>,
}

/// Regions plus weighted bidirectional edges. Immutable once built.
#[derive(Debug, Clone)]
pub struct MapGraph {
    pub name: String,
    regions: Vec<RegionDef>,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<(RegionId, u32)>>,
    kingdoms: Vec<KingdomDef>,
}

impl MapGraph {
    pub fn from_data(data: &MapData) -> Result<Self, DataError> {
        let mut index: BTreeMap<&str, RegionId> = BTreeMap::new();
        let mut regions = Vec::with_capacity(data.regions.len());

        for (i, r) in data.regions.iter().enumerate() {
            let id = RegionId(i as u16);
            if index.insert(r.key.as_str(), id).is_some() {
                return Err(DataError::InvalidMap(format!("duplicate region key {}", r.key)));
            }
            if r.transit_only && r.capital {
                return Err(DataError::InvalidMap(format!(
                    "transit region {} cannot be a capital",
                    r.key
                )));
            }
            regions.push(RegionDef {
                id,
                key: r.key.clone(),
                name: r.name.clone(),
                kingdom: r.kingdom.clone(),
                is_capital: r.capital,
                terrain: r.terrain,
                transit_only: r.transit_only,
            });
        }

        let lookup = |key: &str| {
            index
                .get(key)
                .copied()
                .ok_or_else(|| DataError::InvalidMap(format!("unknown region {key}")))
        };

        let mut adjacency = vec![Vec::new(); regions.len()];
        let mut edges = Vec::with_capacity(data.edges.len());
        for (a, b, cost) in &data.edges {
            let (a, b) = (lookup(a)?, lookup(b)?);
            if a == b {
                return Err(DataError::InvalidMap(format!("self-loop on {:?}", a)));
            }
            adjacency[a.0 as usize].push((b, *cost));
            adjacency[b.0 as usize].push((a, *cost));
            edges.push(Edge { a, b, cost: *cost });
        }

        let mut kingdoms = Vec::with_capacity(data.kingdoms.len());
        for k in &data.kingdoms {
            let capital = lookup(&k.capital)?;
            if !regions[capital.0 as usize].is_capital {
                return Err(DataError::InvalidMap(format!(
                    "{} is the capital of {} but is not flagged as a capital",
                    k.capital, k.name
                )));
            }
            let core = k
                .core
                .iter()
                .map(|key| lookup(key))
                .collect::<Result<Vec<_>, _>>()?;
            kingdoms.push(KingdomDef {
                name: k.name.clone(),
                capital,
                core,
            });
        }

        Ok(Self {
            name: data.name.clone(),
            regions,
            edges,
            adjacency,
            kingdoms,
        })
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn contains(&self, id: RegionId) -> bool {
        (id.0 as usize) < self.regions.len()
    }

    /// Panics on an id that did not come from this graph; external ids go through `contains` first.
    pub fn region(&self, id: RegionId) -> &RegionDef {
        &self.regions[id.0 as usize]
    }

    pub fn regions(&self) -> impl Iterator<Item = &RegionDef> {
        self.regions.iter()
    }

    pub fn find(&self, key: &str) -> Option<RegionId> {
        self.regions.iter().find(|r| r.key == key).map(|r| r.id)
    }

    pub fn neighbors(&self, id: RegionId) -> &[(RegionId, u32)] {
        &self.adjacency[id.0 as usize]
    }

    pub fn edge_cost(&self, from: RegionId, to: RegionId) -> Option<u32> {
        self.neighbors(from)
            .iter()
            .find(|(n, _)| *n == to)
            .map(|(_, cost)| *cost)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn kingdoms(&self) -> &[KingdomDef] {
        &self.kingdoms
    }

    pub fn kingdom(&self, name: &str) -> Option<&KingdomDef> {
        self.kingdoms.iter().find(|k| k.name == name)
    }

    /// Kingdom whose capital is `id`
    pub fn capital_of(&self, id: RegionId) -> Option<&KingdomDef> {
        self.kingdoms.iter().find(|k| k.capital == id)
    }
}
