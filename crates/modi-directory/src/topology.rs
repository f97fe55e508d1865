//! Topology - where each module sits relative to the network module
//!
//! Each module reports the ids attached on its four sides. Grid positions
//! are assigned breadth-first from the root at (0, 0); x grows to the right
//! and y grows upward.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use modi_core::ModuleId;

/// Ids attached on each side of a module
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub right: Option<ModuleId>,
    pub top: Option<ModuleId>,
    pub left: Option<ModuleId>,
    pub bottom: Option<ModuleId>,
    /// A battery module sits on at least one side. Batteries have no id
    /// and do not relay topology.
    pub battery: bool,
}

impl Neighbors {
    /// Decode the raw side ids of a topology report.
    ///
    /// Order is right, top, left, bottom. 0xFFFF means nothing attached,
    /// zero means a battery.
    pub fn from_raw(sides: [u16; 4]) -> Self {
        let side = |raw: u16| (raw != 0 && raw != 0xFFFF).then_some(ModuleId::new(raw));
        Neighbors {
            right: side(sides[0]),
            top: side(sides[1]),
            left: side(sides[2]),
            bottom: side(sides[3]),
            battery: sides.contains(&0),
        }
    }

    /// Attached ids with their grid offsets
    fn offsets(&self) -> impl Iterator<Item = (ModuleId, (i32, i32))> {
        [
            (self.right, (1, 0)),
            (self.top, (0, 1)),
            (self.left, (-1, 0)),
            (self.bottom, (0, -1)),
        ]
        .into_iter()
        .filter_map(|(id, offset)| id.map(|id| (id, offset)))
    }
}

/// Grid placement of a module reachable from the root
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    /// Hops from the network module
    pub hops: u32,
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ROOT: Position = Position { hops: 0, x: 0, y: 0 };

    /// Sort key: nearer first, then left to right, then top to bottom
    pub fn order_key(&self) -> (u32, i32, i32) {
        (self.hops, self.x, -self.y)
    }
}

/// Neighbour reports for the whole chain
#[derive(Clone, Debug, Default)]
pub struct TopologyMap {
    reports: BTreeMap<ModuleId, Neighbors>,
}

impl TopologyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the report of one module
    pub fn update(&mut self, id: ModuleId, neighbors: Neighbors) {
        self.reports.insert(id, neighbors);
    }

    /// Drop a module's report
    pub fn remove(&mut self, id: ModuleId) -> Option<Neighbors> {
        self.reports.remove(&id)
    }

    pub fn neighbors(&self, id: ModuleId) -> Option<Neighbors> {
        self.reports.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Links in both directions; a side seen by only one of the two
    /// modules still connects them
    fn adjacency(&self) -> BTreeMap<ModuleId, Vec<(ModuleId, (i32, i32))>> {
        let mut adjacency: BTreeMap<ModuleId, Vec<(ModuleId, (i32, i32))>> = BTreeMap::new();
        for (&id, neighbors) in &self.reports {
            for (other, (dx, dy)) in neighbors.offsets() {
                adjacency.entry(id).or_default().push((other, (dx, dy)));
                adjacency.entry(other).or_default().push((id, (-dx, -dy)));
            }
        }
        adjacency
    }

    /// Positions of every module reachable from `root`
    pub fn positions(&self, root: ModuleId) -> HashMap<ModuleId, Position> {
        self.positions_filtered(root, |_| true)
    }

    /// Positions reachable from `root` through `live` modules only; stale
    /// reports naming a departed module do not route through it
    pub fn positions_among(
        &self,
        root: ModuleId,
        live: &HashSet<ModuleId>,
    ) -> HashMap<ModuleId, Position> {
        self.positions_filtered(root, |id| live.contains(&id))
    }

    fn positions_filtered(
        &self,
        root: ModuleId,
        is_live: impl Fn(ModuleId) -> bool,
    ) -> HashMap<ModuleId, Position> {
        let adjacency = self.adjacency();
        let mut positions = HashMap::new();
        let mut queue = VecDeque::new();

        positions.insert(root, Position::ROOT);
        queue.push_back(root);

        while let Some(id) = queue.pop_front() {
            let here = positions[&id];
            let Some(links) = adjacency.get(&id) else {
                continue;
            };
            for &(other, (dx, dy)) in links {
                if positions.contains_key(&other) || !is_live(other) {
                    continue;
                }
                positions.insert(
                    other,
                    Position {
                        hops: here.hops + 1,
                        x: here.x + dx,
                        y: here.y + dy,
                    },
                );
                queue.push_back(other);
            }
        }

        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u16) -> ModuleId {
        ModuleId::new(n)
    }

    #[test]
    fn test_from_raw_sides() {
        let n = Neighbors::from_raw([5, 0xFFFF, 0xFFFF, 7]);
        assert_eq!(n.right, Some(id(5)));
        assert_eq!(n.top, None);
        assert_eq!(n.left, None);
        assert_eq!(n.bottom, Some(id(7)));
        assert!(!n.battery);
    }

    #[test]
    fn test_zero_side_is_a_battery() {
        let n = Neighbors::from_raw([0xFFFF, 0, 0xFFFF, 3]);
        assert!(n.battery);
        assert_eq!(n.top, None);
        assert_eq!(n.bottom, Some(id(3)));
    }

    #[test]
    fn test_positions_skip_departed_modules() {
        let mut map = TopologyMap::new();
        map.update(
            id(1),
            Neighbors {
                top: Some(id(2)),
                ..Default::default()
            },
        );
        map.update(
            id(3),
            Neighbors {
                right: Some(id(2)),
                ..Default::default()
            },
        );
        assert_eq!(map.positions(id(1))[&id(3)].hops, 2);

        let live: HashSet<ModuleId> = [id(1), id(3)].into_iter().collect();
        let pos = map.positions_among(id(1), &live);
        assert!(!pos.contains_key(&id(2)));
        assert!(!pos.contains_key(&id(3)));
    }

    #[test]
    fn test_positions_breadth_first() {
        let mut map = TopologyMap::new();
        // root -> top: A; A -> left: B, right: C
        map.update(
            id(1),
            Neighbors {
                top: Some(id(2)),
                ..Default::default()
            },
        );
        map.update(
            id(2),
            Neighbors {
                left: Some(id(3)),
                right: Some(id(4)),
                bottom: Some(id(1)),
                ..Default::default()
            },
        );

        let pos = map.positions(id(1));
        assert_eq!(pos[&id(1)], Position::ROOT);
        assert_eq!(pos[&id(2)], Position { hops: 1, x: 0, y: 1 });
        assert_eq!(pos[&id(3)], Position { hops: 2, x: -1, y: 1 });
        assert_eq!(pos[&id(4)], Position { hops: 2, x: 1, y: 1 });
    }

    #[test]
    fn test_one_sided_report_links_both_ways() {
        let mut map = TopologyMap::new();
        // only the leaf reports the link back to the root
        map.update(
            id(9),
            Neighbors {
                left: Some(id(1)),
                ..Default::default()
            },
        );

        let pos = map.positions(id(1));
        assert_eq!(pos[&id(9)], Position { hops: 1, x: 1, y: 0 });
    }

    #[test]
    fn test_unreachable_modules_have_no_position() {
        let mut map = TopologyMap::new();
        map.update(
            id(5),
            Neighbors {
                right: Some(id(6)),
                ..Default::default()
            },
        );

        let pos = map.positions(id(1));
        assert_eq!(pos.len(), 1);
        assert!(!pos.contains_key(&id(5)));
    }
}
