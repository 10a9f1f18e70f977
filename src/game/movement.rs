use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use super::{MapGraph, RegionId};

/// Constraints on a path search
#[derive(Debug, Clone, Default)]
pub struct PathOptions {
    /// Added to every edge cost (e.g. stormy seas)
    pub surcharge: u32,
    /// Regions the path may not enter. The start region is never blocked.
    pub blocked: BTreeSet<RegionId>,
}

impl PathOptions {
    pub fn with_surcharge(surcharge: u32) -> Self {
        Self {
            surcharge,
            ..Default::default()
        }
    }
}

/// A route excluding its start region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub steps: Vec<RegionId>,
    pub cost: u32,
}

/// Dijkstra from `start` over the whole board
#[derive(Debug, Clone)]
pub struct DistanceMap {
    start: RegionId,
    dist: Vec<Option<u32>>,
    prev: Vec<Option<RegionId>>,
}

impl DistanceMap {
    pub fn compute(map: &MapGraph, start: RegionId, options: &PathOptions) -> Self {
        let mut dist = vec![None; map.len()];
        let mut prev = vec![None; map.len()];
        let mut heap = BinaryHeap::new();

        dist[start.0 as usize] = Some(0);
        heap.push(Reverse((0u32, start)));

        while let Some(Reverse((cost, region))) = heap.pop() {
            if dist[region.0 as usize].map_or(false, |best| cost > best) {
                continue;
            }

            for &(next, edge_cost) in map.neighbors(region) {
                if next != start && options.blocked.contains(&next) {
                    continue;
                }
                let new_cost = cost + edge_cost + options.surcharge;
                let better = dist[next.0 as usize].map_or(true, |old| new_cost < old);
                if better {
                    dist[next.0 as usize] = Some(new_cost);
                    prev[next.0 as usize] = Some(region);
                    heap.push(Reverse((new_cost, next)));
                }
            }
        }

        Self { start, dist, prev }
    }

    pub fn cost_to(&self, target: RegionId) -> Option<u32> {
        self.dist.get(target.0 as usize).copied().flatten()
    }

    pub fn path_to(&self, target: RegionId) -> Option<Path> {
        let cost = self.cost_to(target)?;
        let mut steps = Vec::new();
        let mut cursor = target;
        while cursor != self.start {
            steps.push(cursor);
            cursor = self.prev[cursor.0 as usize]?;
        }
        steps.reverse();
        Some(Path { steps, cost })
    }

    /// First region on the shortest path to `target`
    pub fn first_step(&self, target: RegionId) -> Option<RegionId> {
        self.path_to(target)?.steps.first().copied()
    }
}

pub fn shortest_path(
    map: &MapGraph,
    from: RegionId,
    to: RegionId,
    options: &PathOptions,
) -> Option<Path> {
    DistanceMap::compute(map, from, options).path_to(to)
}

/// Next single step from `from` toward `to`; `None` when already there or unreachable
pub fn next_step_toward(
    map: &MapGraph,
    from: RegionId,
    to: RegionId,
    options: &PathOptions,
) -> Option<RegionId> {
    DistanceMap::compute(map, from, options).first_step(to)
}

/// Adjacent regions affordable with `ap`, with their cost
pub fn reachable_moves(
    map: &MapGraph,
    from: RegionId,
    ap: u32,
    surcharge: u32,
) -> Vec<(RegionId, u32)> {
    map.neighbors(from)
        .iter()
        .map(|&(next, cost)| (next, cost + surcharge))
        .filter(|&(_, cost)| cost <= ap)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameData;

    fn britain() -> MapGraph {
        MapGraph::from_data(&GameData::load_defaults().unwrap().map).unwrap()
    }

    fn id(map: &MapGraph, key: &str) -> RegionId {
        map.find(key).unwrap()
    }

    #[test]
    fn finds_cheapest_cost_between_capitals() {
        let map = britain();
        // Both routes via LOTHIAN cost 3
        let path = shortest_path(&map, id(&map, "SCONE"), id(&map, "BERNICIA"), &PathOptions::default())
            .unwrap();
        assert_eq!(path.cost, 3);
        assert_eq!(*path.steps.last().unwrap(), id(&map, "BERNICIA"));
    }

    #[test]
    fn surcharge_penalises_every_edge() {
        let map = britain();
        // Direct SCONE-LOTHIAN (2) beats SCONE-GALLOWAY-LOTHIAN (1+1) once each edge costs +1
        let path = shortest_path(
            &map,
            id(&map, "SCONE"),
            id(&map, "LOTHIAN"),
            &PathOptions::with_surcharge(1),
        )
        .unwrap();
        assert_eq!(path.steps, vec![id(&map, "LOTHIAN")]);
        assert_eq!(path.cost, 3);
    }

    #[test]
    fn blocked_regions_are_routed_around() {
        let map = britain();
        let mut options = PathOptions::default();
        options.blocked.insert(id(&map, "CHESHIRE"));
        let path = shortest_path(&map, id(&map, "CUMBRIA"), id(&map, "TAMWORTH"), &options).unwrap();
        assert!(!path.steps.contains(&id(&map, "CHESHIRE")));
    }

    #[test]
    fn no_step_when_already_there() {
        let map = britain();
        let scone = id(&map, "SCONE");
        assert_eq!(next_step_toward(&map, scone, scone, &PathOptions::default()), None);
    }

    #[test]
    fn reachable_moves_respect_ap() {
        let map = britain();
        let moves = reachable_moves(&map, id(&map, "SCONE"), 1, 0);
        assert_eq!(moves, vec![(id(&map, "GALLOWAY"), 1)]);
        assert_eq!(reachable_moves(&map, id(&map, "SCONE"), 2, 1).len(), 1);
    }
}
