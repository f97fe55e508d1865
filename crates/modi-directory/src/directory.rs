//! Directory - ordered, filterable view over live module proxies

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use modi_core::{ModiError, ModiResult, ModuleId, ModuleType};
use modi_modules::Module;

use crate::{Neighbors, Position, TopologyMap};

/// Live module proxies plus the topology needed to order them.
///
/// Membership is changed only by the discovery side (`insert`/`remove`);
/// every query works on a copied snapshot.
#[derive(Debug, Default)]
pub struct Directory {
    modules: RwLock<Vec<Module>>,
    topology: RwLock<TopologyMap>,
    root: RwLock<Option<ModuleId>>,
}

impl Directory {
    pub fn new() -> Self {
        Directory::default()
    }

    /// Add a proxy. If a proxy with the same id is already live, that proxy
    /// is kept and returned instead.
    ///
    /// The flag is true only when `module` itself went in.
    pub fn insert(&self, module: Module) -> (Module, bool) {
        let mut modules = self.modules.write();
        if let Some(existing) = modules.iter().find(|m| m.id() == module.id()) {
            return (existing.clone(), false);
        }
        tracing::debug!(
            module = %module.id(),
            module_type = %module.module_type(),
            "directory insert"
        );
        modules.push(module.clone());
        (module, true)
    }

    /// Remove a proxy and its topology report
    pub fn remove(&self, id: ModuleId) -> Option<Module> {
        let removed = {
            let mut modules = self.modules.write();
            let index = modules.iter().position(|m| m.id() == id)?;
            modules.remove(index)
        };
        self.topology.write().remove(id);
        let mut root = self.root.write();
        if *root == Some(id) {
            *root = None;
        }
        Some(removed)
    }

    pub fn contains(&self, id: ModuleId) -> bool {
        self.modules.read().iter().any(|m| m.id() == id)
    }

    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.read().is_empty()
    }

    /// Record the neighbours a module reported
    pub fn update_topology(&self, id: ModuleId, neighbors: Neighbors) {
        self.topology.write().update(id, neighbors);
    }

    /// Pin the module that positions are measured from
    pub fn set_root(&self, id: ModuleId) {
        *self.root.write() = Some(id);
    }

    /// The pinned root if it is live, else the lowest-id network module
    pub fn root(&self) -> Option<ModuleId> {
        let modules = self.modules.read();
        Self::root_in(*self.root.read(), &modules)
    }

    fn root_in(pinned: Option<ModuleId>, modules: &[Module]) -> Option<ModuleId> {
        pinned
            .filter(|id| modules.iter().any(|m| m.id() == *id))
            .or_else(|| {
                modules
                    .iter()
                    .filter(|m| m.module_type() == ModuleType::Network)
                    .map(|m| m.id())
                    .min()
            })
    }

    /// Copy membership and compute positions for the copy
    fn snapshot(&self) -> (Vec<Module>, HashMap<ModuleId, Position>) {
        let modules = self.modules.read().clone();
        let positions = match Self::root_in(*self.root.read(), &modules) {
            Some(root) => {
                let live: HashSet<ModuleId> = modules.iter().map(Module::id).collect();
                self.topology.read().positions_among(root, &live)
            }
            None => HashMap::new(),
        };
        (modules, positions)
    }

    fn sort(modules: &mut [Module], positions: &HashMap<ModuleId, Position>) {
        modules.sort_by(|a, b| compare(a, b, positions));
    }

    /// Every live module in topological order, freshly computed
    pub fn snapshot_sorted(&self) -> Vec<Module> {
        let (mut modules, positions) = self.snapshot();
        Self::sort(&mut modules, &positions);
        modules
    }

    pub fn all(&self) -> Vec<Module> {
        self.snapshot_sorted()
    }

    /// Live modules of one type in topological order
    pub fn of_type(&self, module_type: ModuleType) -> Vec<Module> {
        let (mut modules, positions) = self.snapshot();
        modules.retain(|m| m.module_type() == module_type);
        Self::sort(&mut modules, &positions);
        modules
    }

    /// Exact lookup; absence is an error
    pub fn get(&self, id: ModuleId) -> ModiResult<Module> {
        self.modules
            .read()
            .iter()
            .find(|m| m.id() == id)
            .cloned()
            .ok_or(ModiError::ModuleNotFound(id))
    }

    /// Place in the current order, `None` if the module is not live
    pub fn index_of(&self, id: ModuleId) -> Option<usize> {
        self.snapshot_sorted().iter().position(|m| m.id() == id)
    }

    /// Grid position, if the module is reachable from the root
    pub fn position_of(&self, id: ModuleId) -> Option<Position> {
        let (_, positions) = self.snapshot();
        positions.get(&id).copied()
    }
}

/// Placed modules by position; unplaced after all placed; ties by uuid, then id
fn compare(a: &Module, b: &Module, positions: &HashMap<ModuleId, Position>) -> Ordering {
    let key = |m: &Module| positions.get(&m.id()).map(Position::order_key);
    match (key(a), key(b)) {
        (Some(ka), Some(kb)) => ka.cmp(&kb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.uuid().cmp(&b.uuid()))
    .then_with(|| a.id().cmp(&b.id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use modi_core::{CommandSink, ModuleUuid};
    use modi_modules::FactoryTable;

    fn build(id: u16, prefix: Option<u16>, serial: u32) -> Module {
        let (sink, _rx) = CommandSink::channel();
        let uuid = prefix.map(|p| ModuleUuid::from_prefix_serial(p, serial));
        FactoryTable::standard()
            .build(ModuleId::new(id), uuid, sink)
            .unwrap()
    }

    fn ids(modules: &[Module]) -> Vec<u16> {
        modules.iter().map(|m| m.id().raw()).collect()
    }

    /// root(1) -> top A(2); A -> left B(3), right C(4)
    fn chain() -> Directory {
        let dir = Directory::new();
        dir.insert(build(4, Some(0x4020), 1));
        dir.insert(build(3, Some(0x4020), 2));
        dir.insert(build(2, Some(0x2030), 3));
        dir.insert(build(1, None, 0));
        dir.update_topology(
            ModuleId::new(1),
            Neighbors {
                top: Some(ModuleId::new(2)),
                ..Default::default()
            },
        );
        dir.update_topology(
            ModuleId::new(2),
            Neighbors {
                left: Some(ModuleId::new(3)),
                right: Some(ModuleId::new(4)),
                bottom: Some(ModuleId::new(1)),
                ..Default::default()
            },
        );
        dir
    }

    #[test]
    fn test_topological_order() {
        let dir = chain();
        assert_eq!(ids(&dir.all()), vec![1, 2, 3, 4]);
        assert_eq!(dir.root(), Some(ModuleId::new(1)));
    }

    #[test]
    fn test_of_type_keeps_order() {
        let dir = chain();
        assert_eq!(ids(&dir.of_type(ModuleType::Led)), vec![3, 4]);
        assert!(dir.of_type(ModuleType::Gyro).is_empty());
    }

    #[test]
    fn test_top_before_bottom_at_same_column() {
        let dir = Directory::new();
        dir.insert(build(1, None, 0));
        dir.insert(build(7, Some(0x2000), 1));
        dir.insert(build(8, Some(0x2000), 2));
        dir.update_topology(
            ModuleId::new(1),
            Neighbors {
                bottom: Some(ModuleId::new(7)),
                top: Some(ModuleId::new(8)),
                ..Default::default()
            },
        );

        assert_eq!(ids(&dir.all()), vec![1, 8, 7]);
    }

    #[test]
    fn test_unplaced_modules_sort_last_by_uuid() {
        let dir = chain();
        dir.insert(build(20, Some(0x2050), 9));
        dir.insert(build(10, Some(0x2050), 8));

        assert_eq!(ids(&dir.all()), vec![1, 2, 3, 4, 10, 20]);
        assert_eq!(dir.position_of(ModuleId::new(10)), None);
    }

    #[test]
    fn test_get_and_index_of() {
        let dir = chain();
        assert_eq!(dir.get(ModuleId::new(3)).unwrap().id(), ModuleId::new(3));
        assert_eq!(
            dir.get(ModuleId::new(99)).unwrap_err(),
            ModiError::ModuleNotFound(ModuleId::new(99))
        );

        assert_eq!(dir.index_of(ModuleId::new(3)), Some(2));
        assert_eq!(dir.index_of(ModuleId::new(99)), None);
    }

    #[test]
    fn test_duplicate_insert_keeps_first() {
        let dir = Directory::new();
        let (first, inserted) = dir.insert(build(5, Some(0x4020), 1));
        let (again, inserted_again) = dir.insert(build(5, Some(0x4020), 1));

        assert!(inserted);
        assert!(!inserted_again);
        assert_eq!(dir.len(), 1);
        assert!(first.same_proxy(&again));
    }

    #[test]
    fn test_order_after_removing_a_relay() {
        // root(1) -> top A(2); B(3) reports A on its right
        let dir = Directory::new();
        dir.insert(build(1, None, 0));
        dir.insert(build(2, Some(0x2000), 1));
        dir.insert(build(3, Some(0x4020), 9));
        dir.insert(build(4, Some(0x4020), 1));
        dir.update_topology(
            ModuleId::new(1),
            Neighbors {
                top: Some(ModuleId::new(2)),
                right: Some(ModuleId::new(4)),
                ..Default::default()
            },
        );
        dir.update_topology(
            ModuleId::new(3),
            Neighbors {
                right: Some(ModuleId::new(2)),
                ..Default::default()
            },
        );
        assert_eq!(ids(&dir.all()), vec![1, 2, 4, 3]);

        dir.remove(ModuleId::new(2)).unwrap();

        assert_eq!(dir.position_of(ModuleId::new(3)), None);
        assert_eq!(
            dir.position_of(ModuleId::new(4)),
            Some(Position { hops: 1, x: 1, y: 0 })
        );
        assert_eq!(ids(&dir.all()), vec![1, 4, 3]);
    }

    #[test]
    fn test_remove_drops_topology_and_root() {
        let dir = chain();
        dir.set_root(ModuleId::new(1));
        dir.remove(ModuleId::new(1)).unwrap();

        assert!(!dir.contains(ModuleId::new(1)));
        assert_eq!(dir.root(), None);
        assert!(dir.remove(ModuleId::new(1)).is_none());
        // nothing reachable any more: uuid order
        assert_eq!(ids(&dir.all()), vec![2, 4, 3]);
    }

    #[test]
    fn test_snapshot_is_independent_of_later_changes() {
        let dir = chain();
        let before = dir.all();
        dir.insert(build(30, Some(0x2060), 1));

        assert_eq!(before.len(), 4);
        assert_eq!(dir.len(), 5);
    }
}
