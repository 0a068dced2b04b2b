//! Resource module economy - per-module storage, production conversion,
//! maintenance consumption, and the sharing/acquisition policy the
//! planner queries when deciding whether a resource is obtainable.
//!
//! All transfers are partial-fill: they return the quantity actually
//! moved and never error. A resource absent from a module's capacity
//! list silently transfers nothing.

use crate::components::{ColonistId, GridPos, ModuleId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resource kinds tracked by module storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    Oxygen,
    Water,
    Food,
    Power,
    Minerals,
}

/// Pressurized modules leak this fraction of their footprint area in
/// oxygen units every hour (rounded up).
const OXYGEN_LEAK_PER_AREA: f32 = 0.1;

/// How eagerly a module type gives away vs pulls in resources. Fixed at
/// construction, never mutated afterward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SharingPolicy {
    /// Fraction of stock offered to colonists/other modules (0 = hoard).
    pub share_fraction: f32,
    /// Fraction of capacity the module tries to keep stocked.
    pub acquire_fraction: f32,
}

impl Default for SharingPolicy {
    fn default() -> Self {
        Self {
            share_fraction: 1.0,
            acquire_fraction: 0.5,
        }
    }
}

/// Catalog entry describing a module type. Supplied by the structure
/// catalog fetch outside this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub pressurized: bool,
    pub crew_capacity: usize,
    /// (resource, max quantity) pairs; the only resources the module holds.
    pub storage: Vec<(ResourceKind, u32)>,
    pub production_inputs: Vec<(ResourceKind, u32)>,
    pub production_outputs: Vec<(ResourceKind, u32)>,
    pub maintenance_costs: Vec<(ResourceKind, u32)>,
    pub sharing: SharingPolicy,
}

impl ModuleInfo {
    pub fn footprint_area(&self) -> i32 {
        self.width * self.height
    }

    pub fn capacity_of(&self, kind: ResourceKind) -> Option<u32> {
        self.storage.iter().find(|(k, _)| *k == kind).map(|(_, c)| *c)
    }

    pub fn is_production_output(&self, kind: ResourceKind) -> bool {
        self.production_outputs.iter().any(|(k, _)| *k == kind)
    }
}

/// A placed structure with live storage and crew occupancy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    /// Top-left corner of the footprint.
    pub position: GridPos,
    pub info: ModuleInfo,
    /// Current quantities, one entry per storage entry, same order.
    pub resources: Vec<(ResourceKind, u32)>,
    pub crew_present: Vec<ColonistId>,
    pub is_maintained: bool,
}

impl Module {
    pub fn quantity_of(&self, kind: ResourceKind) -> u32 {
        self.resources
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, q)| *q)
            .unwrap_or(0)
    }

    /// Add up to `amount`; returns the quantity actually stored.
    pub fn add_resource(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        let Some(capacity) = self.info.capacity_of(kind) else {
            return 0;
        };
        let slot = self
            .resources
            .iter_mut()
            .find(|(k, _)| *k == kind)
            .map(|(_, q)| q);
        match slot {
            Some(q) => {
                let headroom = capacity.saturating_sub(*q);
                let stored = amount.min(headroom);
                *q += stored;
                stored
            }
            None => 0,
        }
    }

    /// Remove up to `amount`; returns the quantity actually removed.
    pub fn deduct_resource(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        let slot = self
            .resources
            .iter_mut()
            .find(|(k, _)| *k == kind)
            .map(|(_, q)| q);
        match slot {
            Some(q) => {
                let taken = amount.min(*q);
                *q -= taken;
                taken
            }
            None => 0,
        }
    }

    /// Every declared production input present in at least its required
    /// quantity.
    pub fn has_production_inputs(&self) -> bool {
        self.info
            .production_inputs
            .iter()
            .all(|(kind, required)| self.quantity_of(*kind) >= *required)
    }

    pub fn free_crew_slots(&self) -> usize {
        self.info.crew_capacity.saturating_sub(self.crew_present.len())
    }
}

/// A module asking the wider economy for a top-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequest {
    pub module_id: ModuleId,
    pub resource: ResourceKind,
    pub quantity: u32,
}

/// Arena of placed modules keyed by id. BTreeMap keeps hourly processing
/// order deterministic, which fixes resource contention first-come-
/// first-served.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleRegistry {
    modules: BTreeMap<ModuleId, Module>,
    next_id: ModuleId,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, info: ModuleInfo, position: GridPos) -> ModuleId {
        let id = self.next_id;
        self.next_id += 1;
        let resources = info.storage.iter().map(|(k, _)| (*k, 0)).collect();
        self.modules.insert(
            id,
            Module {
                id,
                position,
                info,
                resources,
                crew_present: Vec::new(),
                is_maintained: true,
            },
        );
        id
    }

    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(&id)
    }

    pub fn module_mut(&mut self, id: ModuleId) -> Option<&mut Module> {
        self.modules.get_mut(&id)
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn add_resource(&mut self, id: ModuleId, kind: ResourceKind, amount: u32) -> u32 {
        self.modules
            .get_mut(&id)
            .map(|m| m.add_resource(kind, amount))
            .unwrap_or(0)
    }

    pub fn deduct_resource(&mut self, id: ModuleId, kind: ResourceKind, amount: u32) -> u32 {
        self.modules
            .get_mut(&id)
            .map(|m| m.deduct_resource(kind, amount))
            .unwrap_or(0)
    }

    /// Per stored resource, target = acquisition fraction x capacity; a
    /// module under target requests the difference. Production outputs
    /// are treated as already at target so they are never pulled back in.
    pub fn determine_resource_requests(&self) -> Vec<ResourceRequest> {
        let mut requests = Vec::new();
        for module in self.modules.values() {
            for (kind, capacity) in &module.info.storage {
                if module.info.is_production_output(*kind) {
                    continue;
                }
                let target =
                    (*capacity as f32 * module.info.sharing.acquire_fraction).floor() as u32;
                let current = module.quantity_of(*kind);
                if current < target {
                    requests.push(ResourceRequest {
                        module_id: module.id,
                        resource: *kind,
                        quantity: target - current,
                    });
                }
            }
        }
        requests
    }

    pub fn has_production_inputs(&self, id: ModuleId) -> bool {
        self.modules
            .get(&id)
            .map(|m| m.has_production_inputs())
            .unwrap_or(false)
    }

    /// Run one production cycle. Inputs are deducted regardless; output
    /// only appears when every input was fully available - a shortfall
    /// wastes whatever was deducted.
    pub fn produce(&mut self, id: ModuleId) -> bool {
        let Some(module) = self.modules.get_mut(&id) else {
            return false;
        };
        let satisfied = module.has_production_inputs();
        let inputs = module.info.production_inputs.clone();
        for (kind, required) in inputs {
            module.deduct_resource(kind, required);
        }
        if !satisfied {
            return false;
        }
        let outputs = module.info.production_outputs.clone();
        for (kind, produced) in outputs {
            module.add_resource(kind, produced);
        }
        true
    }

    /// Hourly upkeep: deduct maintenance costs and leak oxygen. Success
    /// requires both; the result gates crew occupancy via `is_maintained`.
    pub fn handle_maintenance(&mut self, id: ModuleId) -> bool {
        let ok = self.handle_resource_use(id) & self.handle_oxygen_leakage(id);
        if let Some(module) = self.modules.get_mut(&id) {
            module.is_maintained = ok;
        }
        ok
    }

    /// Deduct each maintenance cost; success only if the full amount of
    /// every cost was available.
    fn handle_resource_use(&mut self, id: ModuleId) -> bool {
        let Some(module) = self.modules.get_mut(&id) else {
            return false;
        };
        let costs = module.info.maintenance_costs.clone();
        let mut ok = true;
        for (kind, cost) in costs {
            if module.deduct_resource(kind, cost) < cost {
                ok = false;
            }
        }
        ok
    }

    /// Pressurized modules leak oxygen proportional to floor area every
    /// hour. Success iff the module still had that much oxygen.
    fn handle_oxygen_leakage(&mut self, id: ModuleId) -> bool {
        let Some(module) = self.modules.get_mut(&id) else {
            return false;
        };
        if !module.info.pressurized {
            return true;
        }
        let leak = (module.info.footprint_area() as f32 * OXYGEN_LEAK_PER_AREA).ceil() as u32;
        module.deduct_resource(ResourceKind::Oxygen, leak) == leak
    }

    /// Occupancy gate: refused when unmaintained or full.
    pub fn punch_in(&mut self, id: ModuleId, colonist: ColonistId) -> bool {
        let Some(module) = self.modules.get_mut(&id) else {
            return false;
        };
        if !module.is_maintained || module.free_crew_slots() == 0 {
            return false;
        }
        if !module.crew_present.contains(&colonist) {
            module.crew_present.push(colonist);
        }
        true
    }

    pub fn punch_out(&mut self, id: ModuleId, colonist: ColonistId) {
        if let Some(module) = self.modules.get_mut(&id) {
            module.crew_present.retain(|c| *c != colonist);
        }
    }

    /// Modules willing and able to hand out a resource right now.
    /// Unordered; the planner sorts candidates by distance.
    pub fn providers_of(&self, kind: ResourceKind) -> Vec<&Module> {
        self.modules
            .values()
            .filter(|m| m.info.sharing.share_fraction > 0.0 && m.quantity_of(kind) > 0)
            .collect()
    }

    /// Modules a colonist can sleep in: pressurized, maintained, with a
    /// free crew slot.
    pub fn rest_providers(&self) -> Vec<&Module> {
        self.modules
            .values()
            .filter(|m| m.info.pressurized && m.is_maintained && m.free_crew_slots() > 0)
            .collect()
    }

    /// Hourly logistics pass: fulfill each open request from sharing
    /// modules, nearest first. A provider only offers its share fraction
    /// of current stock per pass, so hoarders keep theirs and no single
    /// request drains a tank dry.
    pub fn distribute(&mut self) {
        let requests = self.determine_resource_requests();
        for request in requests {
            let mut remaining = request.quantity;
            let requester_x = match self.modules.get(&request.module_id) {
                Some(m) => m.position.x,
                None => continue,
            };

            let mut provider_ids: Vec<ModuleId> = self
                .providers_of(request.resource)
                .iter()
                .filter(|m| m.id != request.module_id)
                .map(|m| m.id)
                .collect();
            provider_ids.sort_by_key(|id| {
                self.modules
                    .get(id)
                    .map(|m| m.position.x_distance(requester_x))
                    .unwrap_or(i32::MAX)
            });

            for provider_id in provider_ids {
                if remaining == 0 {
                    break;
                }
                let offer = match self.modules.get(&provider_id) {
                    Some(m) => {
                        let stock = m.quantity_of(request.resource) as f32;
                        (stock * m.info.sharing.share_fraction).floor() as u32
                    }
                    None => 0,
                };
                if offer == 0 {
                    continue;
                }
                let taken = self.deduct_resource(provider_id, request.resource, offer.min(remaining));
                let stored = self.add_resource(request.module_id, request.resource, taken);
                // Headroom changed between request and fill; hand back
                // anything the requester could not take.
                if stored < taken {
                    self.add_resource(provider_id, request.resource, taken - stored);
                }
                remaining -= stored;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tank(storage: Vec<(ResourceKind, u32)>) -> ModuleInfo {
        ModuleInfo {
            name: "Storage Tank".to_string(),
            width: 3,
            height: 2,
            pressurized: false,
            crew_capacity: 2,
            storage,
            production_inputs: vec![],
            production_outputs: vec![],
            maintenance_costs: vec![],
            sharing: SharingPolicy::default(),
        }
    }

    fn farm() -> ModuleInfo {
        ModuleInfo {
            name: "Hydroponics Pod".to_string(),
            width: 4,
            height: 3,
            pressurized: true,
            crew_capacity: 1,
            storage: vec![
                (ResourceKind::Water, 100),
                (ResourceKind::Oxygen, 50),
                (ResourceKind::Food, 200),
            ],
            production_inputs: vec![(ResourceKind::Water, 5)],
            production_outputs: vec![(ResourceKind::Food, 10)],
            maintenance_costs: vec![],
            sharing: SharingPolicy {
                share_fraction: 1.0,
                acquire_fraction: 0.5,
            },
        }
    }

    #[test]
    fn test_add_deduct_partial_fill_bounds() {
        let mut reg = ModuleRegistry::new();
        let id = reg.register(tank(vec![(ResourceKind::Water, 10)]), GridPos::new(0, 0));

        // Overfill is clamped to headroom
        assert_eq!(reg.add_resource(id, ResourceKind::Water, 25), 10);
        assert_eq!(reg.module(id).unwrap().quantity_of(ResourceKind::Water), 10);
        assert_eq!(reg.add_resource(id, ResourceKind::Water, 5), 0);

        // Overdraw is clamped to stock
        assert_eq!(reg.deduct_resource(id, ResourceKind::Water, 25), 10);
        assert_eq!(reg.module(id).unwrap().quantity_of(ResourceKind::Water), 0);
        assert_eq!(reg.deduct_resource(id, ResourceKind::Water, 1), 0);
    }

    #[test]
    fn test_unlisted_resource_noops() {
        let mut reg = ModuleRegistry::new();
        let id = reg.register(tank(vec![(ResourceKind::Water, 10)]), GridPos::new(0, 0));
        assert_eq!(reg.add_resource(id, ResourceKind::Minerals, 5), 0);
        assert_eq!(reg.deduct_resource(id, ResourceKind::Minerals, 5), 0);
    }

    #[test]
    fn test_produce_parity_between_equal_modules() {
        let mut reg = ModuleRegistry::new();
        let a = reg.register(farm(), GridPos::new(0, 0));
        let b = reg.register(farm(), GridPos::new(10, 0));
        reg.add_resource(a, ResourceKind::Water, 5);
        reg.add_resource(b, ResourceKind::Water, 5);

        assert!(reg.produce(a));
        assert!(reg.produce(b));

        for id in [a, b] {
            let m = reg.module(id).unwrap();
            assert_eq!(m.quantity_of(ResourceKind::Food), 10);
            assert_eq!(m.quantity_of(ResourceKind::Water), 0);
        }
    }

    #[test]
    fn test_produce_shortfall_wastes_inputs() {
        let mut reg = ModuleRegistry::new();
        let id = reg.register(farm(), GridPos::new(0, 0));
        reg.add_resource(id, ResourceKind::Water, 3); // short of the 5 required

        assert!(!reg.produce(id));
        let m = reg.module(id).unwrap();
        assert_eq!(m.quantity_of(ResourceKind::Food), 0);
        // Present input was still consumed
        assert_eq!(m.quantity_of(ResourceKind::Water), 0);
    }

    #[test]
    fn test_resource_requests_skip_outputs() {
        let mut reg = ModuleRegistry::new();
        let id = reg.register(farm(), GridPos::new(0, 0));

        let requests = reg.determine_resource_requests();
        // Water (target 50) and oxygen (target 25), but never food: it is
        // a production output and must not be pulled back in.
        assert_eq!(requests.len(), 2);
        assert!(requests
            .iter()
            .any(|r| r.module_id == id && r.resource == ResourceKind::Water && r.quantity == 50));
        assert!(requests
            .iter()
            .any(|r| r.resource == ResourceKind::Oxygen && r.quantity == 25));
        assert!(!requests.iter().any(|r| r.resource == ResourceKind::Food));

        // Topping up shrinks the request
        reg.add_resource(id, ResourceKind::Water, 30);
        let requests = reg.determine_resource_requests();
        assert!(requests
            .iter()
            .any(|r| r.resource == ResourceKind::Water && r.quantity == 20));
    }

    #[test]
    fn test_oxygen_leakage_and_maintenance_gate() {
        let mut reg = ModuleRegistry::new();
        let id = reg.register(farm(), GridPos::new(0, 0));
        // Area 12 -> leak ceil(1.2) = 2 per hour
        reg.add_resource(id, ResourceKind::Oxygen, 3);

        assert!(reg.handle_maintenance(id));
        assert_eq!(reg.module(id).unwrap().quantity_of(ResourceKind::Oxygen), 1);

        // Second hour: only 1 left, leak fails, module unmaintained
        assert!(!reg.handle_maintenance(id));
        assert!(!reg.module(id).unwrap().is_maintained);
    }

    #[test]
    fn test_punch_in_gated_by_capacity_and_maintenance() {
        let mut reg = ModuleRegistry::new();
        let id = reg.register(tank(vec![(ResourceKind::Water, 10)]), GridPos::new(0, 0));

        assert!(reg.punch_in(id, ColonistId(1)));
        assert!(reg.punch_in(id, ColonistId(2)));
        // Capacity 2 -> third refused
        assert!(!reg.punch_in(id, ColonistId(3)));

        reg.punch_out(id, ColonistId(1));
        assert!(reg.punch_in(id, ColonistId(3)));

        reg.module_mut(id).unwrap().is_maintained = false;
        reg.punch_out(id, ColonistId(2));
        assert!(!reg.punch_in(id, ColonistId(2)));
    }

    #[test]
    fn test_distribute_fills_from_nearest_provider_first() {
        let mut reg = ModuleRegistry::new();
        // Requester: capacity 10, default acquisition target 5.
        let requester = reg.register(tank(vec![(ResourceKind::Water, 10)]), GridPos::new(0, 0));
        // Providers never request (acquire 0), so the pass is one-way.
        let mut provider_info = tank(vec![(ResourceKind::Water, 100)]);
        provider_info.sharing.acquire_fraction = 0.0;
        let near = reg.register(provider_info.clone(), GridPos::new(4, 0));
        let far = reg.register(provider_info, GridPos::new(20, 0));
        reg.add_resource(near, ResourceKind::Water, 3);
        reg.add_resource(far, ResourceKind::Water, 50);

        reg.distribute();

        // Near was drained first, far topped up the remainder.
        assert_eq!(
            reg.module(requester).unwrap().quantity_of(ResourceKind::Water),
            5
        );
        assert_eq!(reg.module(near).unwrap().quantity_of(ResourceKind::Water), 0);
        assert_eq!(reg.module(far).unwrap().quantity_of(ResourceKind::Water), 48);
    }

    #[test]
    fn test_distribute_respects_share_fraction() {
        let mut reg = ModuleRegistry::new();
        let requester = reg.register(tank(vec![(ResourceKind::Water, 20)]), GridPos::new(0, 0));
        let mut stingy_info = tank(vec![(ResourceKind::Water, 100)]);
        stingy_info.sharing = SharingPolicy {
            share_fraction: 0.5,
            acquire_fraction: 0.0,
        };
        let stingy = reg.register(stingy_info, GridPos::new(4, 0));
        reg.add_resource(stingy, ResourceKind::Water, 10);

        reg.distribute();

        // Target was 10 but the provider only offers half its stock.
        assert_eq!(
            reg.module(requester).unwrap().quantity_of(ResourceKind::Water),
            5
        );
        assert_eq!(
            reg.module(stingy).unwrap().quantity_of(ResourceKind::Water),
            5
        );
    }

    #[test]
    fn test_rest_providers_gate_on_pressure_and_occupancy() {
        let mut reg = ModuleRegistry::new();
        let mut quarters_info = tank(vec![(ResourceKind::Oxygen, 50)]);
        quarters_info.pressurized = true;
        let quarters = reg.register(quarters_info.clone(), GridPos::new(0, 0));
        let broken = reg.register(quarters_info.clone(), GridPos::new(5, 0));
        let unpressurized = reg.register(tank(vec![]), GridPos::new(9, 0));
        reg.module_mut(broken).unwrap().is_maintained = false;
        let _ = unpressurized;

        let ids: Vec<ModuleId> = reg.rest_providers().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![quarters]);

        // Fill the crew slots; the module stops offering beds.
        assert!(reg.punch_in(quarters, ColonistId(1)));
        assert!(reg.punch_in(quarters, ColonistId(2)));
        assert!(reg.rest_providers().is_empty());
    }

    #[test]
    fn test_providers_require_stock_and_sharing() {
        let mut reg = ModuleRegistry::new();
        let empty = reg.register(tank(vec![(ResourceKind::Water, 10)]), GridPos::new(0, 0));
        let stocked = reg.register(tank(vec![(ResourceKind::Water, 10)]), GridPos::new(5, 0));
        let mut hoard_info = tank(vec![(ResourceKind::Water, 10)]);
        hoard_info.sharing.share_fraction = 0.0;
        let hoarder = reg.register(hoard_info, GridPos::new(9, 0));

        reg.add_resource(stocked, ResourceKind::Water, 4);
        reg.add_resource(hoarder, ResourceKind::Water, 4);

        let providers: Vec<ModuleId> = reg
            .providers_of(ResourceKind::Water)
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(providers, vec![stocked]);
        assert!(!providers.contains(&empty));
    }
}
