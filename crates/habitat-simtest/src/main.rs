//! Habitat Headless Simulation Harness
//!
//! Validates colony logic and data without a renderer. Runs entirely
//! in-process, no windowing, no networking.
//!
//! Usage:
//!   cargo run -p habitat-simtest
//!   cargo run -p habitat-simtest -- --verbose

use habitat_core::prelude::*;
use habitat_core::systems::{plan_need, PlannerContext};
use serde::Deserialize;
use std::collections::BTreeMap;

// ── Module manifest (same JSON the builder UI uses) ─────────────────────
const MANIFEST_JSON: &str = include_str!("../../../data/module_manifest.json");

#[derive(Debug, Deserialize)]
struct ModuleSpec {
    name: String,
    width: i32,
    height: i32,
    pressurized: bool,
    crew_capacity: usize,
    #[serde(default)]
    storage: BTreeMap<ResourceKind, u32>,
    #[serde(default)]
    production_inputs: BTreeMap<ResourceKind, u32>,
    #[serde(default)]
    production_outputs: BTreeMap<ResourceKind, u32>,
    #[serde(default)]
    maintenance_costs: BTreeMap<ResourceKind, u32>,
    #[serde(default = "default_share")]
    share_fraction: f32,
    #[serde(default = "default_acquire")]
    acquire_fraction: f32,
}

fn default_share() -> f32 {
    1.0
}

fn default_acquire() -> f32 {
    0.5
}

impl ModuleSpec {
    fn to_info(&self) -> ModuleInfo {
        ModuleInfo {
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            pressurized: self.pressurized,
            crew_capacity: self.crew_capacity,
            storage: self.storage.iter().map(|(k, v)| (*k, *v)).collect(),
            production_inputs: self.production_inputs.iter().map(|(k, v)| (*k, *v)).collect(),
            production_outputs: self
                .production_outputs
                .iter()
                .map(|(k, v)| (*k, *v))
                .collect(),
            maintenance_costs: self
                .maintenance_costs
                .iter()
                .map(|(k, v)| (*k, *v))
                .collect(),
            sharing: SharingPolicy {
                share_fraction: self.share_fraction,
                acquire_fraction: self.acquire_fraction,
            },
        }
    }
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Habitat Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Module manifest validation
    results.extend(validate_module_manifest(verbose));

    // 2. Terrain zoning
    results.extend(validate_zoning(verbose));

    // 3. Building graph
    results.extend(validate_building_graph(verbose));

    // 4. Economy resource loop
    results.extend(validate_economy(verbose));

    // 5. Planner decision sweep
    results.extend(validate_planner(verbose));

    // 6. Morale duration sweep
    results.extend(validate_morale(verbose));

    // 7. One simulated day end-to-end
    results.extend(run_one_day(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn check(results: &mut Vec<TestResult>, name: &str, passed: bool, detail: String) {
    results.push(TestResult {
        name: name.into(),
        passed,
        detail,
    });
}

// ── 1. Module Manifest ──────────────────────────────────────────────────

fn validate_module_manifest(_verbose: bool) -> Vec<TestResult> {
    println!("--- Module Manifest ---");
    let mut results = Vec::new();

    let manifest: Vec<ModuleSpec> = match serde_json::from_str(MANIFEST_JSON) {
        Ok(m) => m,
        Err(e) => {
            check(
                &mut results,
                "manifest_parse",
                false,
                format!("JSON parse error: {}", e),
            );
            return results;
        }
    };

    check(
        &mut results,
        "manifest_not_empty",
        manifest.len() >= 5,
        format!("{} module types loaded", manifest.len()),
    );

    let bad_dims: Vec<_> = manifest
        .iter()
        .filter(|m| m.width <= 0 || m.height <= 0)
        .collect();
    check(
        &mut results,
        "manifest_positive_footprints",
        bad_dims.is_empty(),
        format!("{} modules with non-positive footprint", bad_dims.len()),
    );

    // Every production resource must have a storage slot, or output is
    // silently discarded.
    let orphans: Vec<&str> = manifest
        .iter()
        .filter(|m| {
            m.production_outputs
                .keys()
                .chain(m.production_inputs.keys())
                .any(|k| !m.storage.contains_key(k))
        })
        .map(|m| m.name.as_str())
        .collect();
    check(
        &mut results,
        "manifest_production_has_storage",
        orphans.is_empty(),
        format!("modules with storage-less production: {:?}", orphans),
    );

    // Pressurized modules leak oxygen; without an oxygen slot they are
    // permanently unmaintained.
    let airless: Vec<&str> = manifest
        .iter()
        .filter(|m| m.pressurized && !m.storage.contains_key(&ResourceKind::Oxygen))
        .map(|m| m.name.as_str())
        .collect();
    check(
        &mut results,
        "manifest_pressurized_store_oxygen",
        airless.is_empty(),
        format!("pressurized modules without oxygen storage: {:?}", airless),
    );

    let fractions_ok = manifest.iter().all(|m| {
        (0.0..=1.0).contains(&m.share_fraction) && (0.0..=1.0).contains(&m.acquire_fraction)
    });
    check(
        &mut results,
        "manifest_fractions_in_range",
        fractions_ok,
        "sharing fractions within 0..=1".into(),
    );

    results
}

// ── 2. Terrain Zoning ───────────────────────────────────────────────────

fn validate_zoning(_verbose: bool) -> Vec<TestResult> {
    println!("--- Terrain Zoning ---");
    let mut results = Vec::new();

    let flat = Terrain::flat(32, 40, 20);
    check(
        &mut results,
        "flat_terrain_one_zone",
        flat.zones().len() == 1,
        format!("{} zones on flat terrain", flat.zones().len()),
    );

    // Cliff of 4 splits; step of 2 does not.
    let mut cliff = Terrain::flat(32, 40, 20);
    for x in 16..32 {
        for y in 16..20 {
            cliff.set_block(x, y, 1);
        }
    }
    check(
        &mut results,
        "cliff_splits_zones",
        cliff.zones().len() == 2,
        format!("{} zones with a 4-cell cliff", cliff.zones().len()),
    );

    let mut step = Terrain::flat(32, 40, 20);
    for x in 16..32 {
        for y in 18..20 {
            step.set_block(x, y, 1);
        }
    }
    check(
        &mut results,
        "climbable_step_keeps_zone",
        step.zones().len() == 1,
        format!("{} zones with a 2-cell step", step.zones().len()),
    );

    check(
        &mut results,
        "zone_ids_deterministic",
        cliff.zones()[0].id == "0020" && cliff.zones()[1].id == "1616",
        format!(
            "ids {:?}",
            cliff.zones().iter().map(|z| z.id.clone()).collect::<Vec<_>>()
        ),
    );

    check(
        &mut results,
        "walkability_respects_zones",
        cliff.walkable_from_location(0, 20, 15, 20)
            && !cliff.walkable_from_location(0, 20, 16, 16),
        "same-zone walkable, cross-cliff not".into(),
    );

    results
}

// ── 3. Building Graph ───────────────────────────────────────────────────

fn validate_building_graph(_verbose: bool) -> Vec<TestResult> {
    println!("--- Building Graph ---");
    let mut results = Vec::new();

    let terrain = Terrain::flat(32, 40, 20);
    let mut infra = Infrastructure::new();

    // Two adjacent ground modules merge into one floor.
    let a = infra.add_module(1, 4, 17, 4, 3, &terrain);
    let b = infra.add_module(2, 8, 17, 4, 3, &terrain);
    check(
        &mut results,
        "adjacent_modules_merge",
        a == b && infra.floors().len() == 1,
        format!("{} floors after stacking two side by side", infra.floors().len()),
    );

    // A second storey makes a new, ungrounded floor.
    let upper = infra.add_module(3, 4, 14, 4, 3, &terrain);
    let grounded = infra.floor(upper).map(|f| f.ground_zone_ids.is_empty());
    check(
        &mut results,
        "upper_floor_not_grounded",
        upper != a && grounded == Some(true),
        "second storey has its own ungrounded floor".into(),
    );

    // A ladder from the ground services both storeys.
    let eid = infra.add_connector(5, 15, 20, &terrain);
    let serviced = infra.floors_for_elevator(eid).len();
    check(
        &mut results,
        "ladder_services_both_storeys",
        serviced == 2,
        format!("ladder touches {} floors", serviced),
    );

    let surface_ok = infra.surface_at(5, 16, &terrain) == Some(Surface::Floor(upper))
        && infra.surface_at(20, 20, &terrain) == Some(Surface::Ground("0020".into()))
        && infra.surface_at(20, 10, &terrain).is_none();
    check(
        &mut results,
        "surface_lookup",
        surface_ok,
        "floor row, ground row, and mid-air resolve correctly".into(),
    );

    results
}

// ── 4. Economy Loop ─────────────────────────────────────────────────────

fn validate_economy(_verbose: bool) -> Vec<TestResult> {
    println!("--- Economy Loop ---");
    let mut results = Vec::new();

    let manifest: Vec<ModuleSpec> = serde_json::from_str(MANIFEST_JSON).expect("manifest parses");
    let spec = |name: &str| -> ModuleInfo {
        manifest
            .iter()
            .find(|m| m.name == name)
            .unwrap_or_else(|| panic!("manifest entry {name} missing"))
            .to_info()
    };

    let mut reg = ModuleRegistry::new();
    let tank = reg.register(spec("Water Tank"), GridPos::new(0, 18));
    let pod = reg.register(spec("Hydroponics Pod"), GridPos::new(8, 17));
    reg.add_resource(tank, ResourceKind::Water, 400);
    reg.add_resource(pod, ResourceKind::Oxygen, 40);

    // Distribution fills the pod toward its acquisition target.
    reg.distribute();
    let pod_water = reg.module(pod).unwrap().quantity_of(ResourceKind::Water);
    check(
        &mut results,
        "distribution_fills_to_target",
        pod_water == 30,
        format!("pod water {} after one pass (target 30)", pod_water),
    );

    // Production converts water to food.
    let produced = reg.produce(pod);
    let food = reg.module(pod).unwrap().quantity_of(ResourceKind::Food);
    check(
        &mut results,
        "production_converts",
        produced && food == 10,
        format!("pod food {} after one cycle", food),
    );

    // Pressurized pod leaks oxygen each maintenance pass; area 12 -> 2.
    reg.handle_maintenance(pod);
    let oxygen = reg.module(pod).unwrap().quantity_of(ResourceKind::Oxygen);
    check(
        &mut results,
        "oxygen_leak_scales_with_area",
        oxygen == 38,
        format!("pod oxygen {} after one hour", oxygen),
    );

    // Starve the pod of oxygen and the maintenance gate trips.
    reg.deduct_resource(pod, ResourceKind::Oxygen, 37);
    let ok = reg.handle_maintenance(pod);
    check(
        &mut results,
        "maintenance_gate_trips",
        !ok && !reg.module(pod).unwrap().is_maintained,
        "oxygen shortfall marks the pod unmaintained".into(),
    );

    results
}

// ── 5. Planner Decision Sweep ───────────────────────────────────────────

fn validate_planner(_verbose: bool) -> Vec<TestResult> {
    println!("--- Planner ---");
    let mut results = Vec::new();

    let manifest: Vec<ModuleSpec> = serde_json::from_str(MANIFEST_JSON).expect("manifest parses");
    let tank_info = manifest
        .iter()
        .find(|m| m.name == "Water Tank")
        .expect("tank entry")
        .to_info();

    let terrain = Terrain::flat(32, 40, 20);
    let mut infra = Infrastructure::new();
    let mut reg = ModuleRegistry::new();

    // Ground storey plus a tank two storeys up, ladder from the surface.
    let base = reg.register(tank_info.clone(), GridPos::new(4, 18));
    infra.add_module(base, 4, 18, 3, 2, &terrain);
    let mid = reg.register(tank_info.clone(), GridPos::new(4, 16));
    infra.add_module(mid, 4, 16, 3, 2, &terrain);
    let top = reg.register(tank_info.clone(), GridPos::new(4, 14));
    infra.add_module(top, 4, 14, 3, 2, &terrain);
    reg.add_resource(top, ResourceKind::Water, 100);
    infra.add_connector(5, 15, 20, &terrain);

    let ctx = PlannerContext {
        terrain: &terrain,
        infrastructure: &infra,
        registry: &reg,
    };

    let stack = plan_need(
        GridPos::new(12, 20),
        &Surface::Ground("0020".into()),
        NeedKind::Water,
        6,
        Morale::default(),
        &ctx,
    );
    let shape: Vec<String> = stack
        .as_ref()
        .map(|s| {
            s.iter_execution_order()
                .map(|a| format!("{:?}", a).split_whitespace().next().unwrap().to_string())
                .collect()
        })
        .unwrap_or_default();
    check(
        &mut results,
        "climb_plan_shape",
        shape == ["Move", "Climb", "Move", "Drink"],
        format!("execution order {:?}", shape),
    );

    let climb_y = stack.as_ref().and_then(|s| {
        s.iter_execution_order()
            .find(|a| a.is_climb())
            .map(|a| a.dest().y)
    });
    let top_floor = infra.floor_from_module_id(top).unwrap();
    check(
        &mut results,
        "climb_targets_standing_row",
        climb_y == Some(top_floor.elevation - 1),
        format!("climb y {:?}, floor elevation {}", climb_y, top_floor.elevation),
    );

    // Nearest provider wins when several have stock.
    let near = reg.register(tank_info.clone(), GridPos::new(14, 18));
    infra.add_module(near, 14, 18, 3, 2, &terrain);
    reg.add_resource(near, ResourceKind::Water, 100);
    let ctx = PlannerContext {
        terrain: &terrain,
        infrastructure: &infra,
        registry: &reg,
    };
    let stack = plan_need(
        GridPos::new(16, 20),
        &Surface::Ground("0020".into()),
        NeedKind::Water,
        6,
        Morale::default(),
        &ctx,
    );
    let target = stack
        .as_ref()
        .and_then(|s| s.iter_execution_order().last())
        .and_then(|a| a.module_id());
    check(
        &mut results,
        "nearest_provider_wins",
        target == Some(near),
        format!("picked module {:?}, expected {}", target, near),
    );

    results
}

// ── 6. Morale Durations ─────────────────────────────────────────────────

fn validate_morale(_verbose: bool) -> Vec<TestResult> {
    println!("--- Morale ---");
    let mut results = Vec::new();

    let mut work_monotonic = true;
    let mut rest_monotonic = true;
    let mut prev_work = u32::MAX;
    let mut prev_rest = u32::MAX;
    for morale in 0..=100 {
        let work = Morale(morale).work_duration(30);
        let rest = Morale(morale).rest_duration(480);
        if work > prev_work {
            work_monotonic = false;
        }
        if rest > prev_rest {
            rest_monotonic = false;
        }
        prev_work = work;
        prev_rest = rest;
    }
    check(
        &mut results,
        "work_duration_monotonic",
        work_monotonic,
        "higher morale never works longer".into(),
    );
    check(
        &mut results,
        "rest_duration_monotonic",
        rest_monotonic,
        "higher morale never sleeps longer".into(),
    );

    check(
        &mut results,
        "duration_extremes",
        Morale(100).work_duration(30) == 25
            && Morale(0).work_duration(30) == 35
            && Morale(100).rest_duration(480) == 360
            && Morale(0).rest_duration(480) == 600,
        "30min work spans 25..35, 8h rest spans 6h..10h".into(),
    );

    results
}

// ── 7. One Simulated Day ────────────────────────────────────────────────

fn run_one_day(verbose: bool) -> Vec<TestResult> {
    println!("--- One Simulated Day ---");
    let mut results = Vec::new();

    let manifest: Vec<ModuleSpec> = serde_json::from_str(MANIFEST_JSON).expect("manifest parses");
    let spec = |name: &str| -> ModuleInfo {
        manifest
            .iter()
            .find(|m| m.name == name)
            .unwrap_or_else(|| panic!("manifest entry {name} missing"))
            .to_info()
    };

    let mut engine = HabitatEngine::new(Terrain::flat(64, 80, 40));
    let water_tank = engine.place_module(spec("Water Tank"), 4, 38);
    let oxygen_tank = engine.place_module(spec("Oxygen Tank"), 10, 38);
    let pod = engine.place_module(spec("Hydroponics Pod"), 16, 37);
    let quarters = engine.place_module(spec("Crew Quarters"), 24, 37);
    let canteen = engine.place_module(spec("Canteen"), 40, 38);
    let depot = engine.place_module(spec("Mineral Depot"), 48, 38);
    let solar = engine.place_module(spec("Solar Array"), 56, 39);

    engine.modules.add_resource(water_tank, ResourceKind::Water, 350);
    engine.modules.add_resource(oxygen_tank, ResourceKind::Oxygen, 550);
    engine.modules.add_resource(canteen, ResourceKind::Food, 60);
    engine.modules.add_resource(canteen, ResourceKind::Water, 30);
    engine.modules.add_resource(canteen, ResourceKind::Oxygen, 25);
    engine.modules.add_resource(quarters, ResourceKind::Oxygen, 100);
    engine.modules.add_resource(quarters, ResourceKind::Power, 30);
    engine.modules.add_resource(solar, ResourceKind::Power, 200);

    engine.spawn_colonist(18, Role::Farmer).expect("farmer spawns");
    engine.spawn_colonist(20, Role::Farmer).expect("farmer spawns");
    engine.spawn_colonist(46, Role::Miner).expect("miner spawns");

    for _ in 0..(24 * 60) {
        engine.update();
    }

    let views = engine.colonist_views();
    check(
        &mut results,
        "day_colonists_alive",
        views.len() == 3,
        format!("{} colonists after 24h", views.len()),
    );

    let in_bounds = views
        .iter()
        .all(|(_, pos, _)| engine.terrain.in_bounds(pos.x) && pos.y >= 0 && pos.y <= 40);
    check(
        &mut results,
        "day_positions_sane",
        in_bounds,
        "everyone on or above the surface, inside the map".into(),
    );

    let mut max_water = 0;
    let mut max_food = 0;
    for (_, (_, needs)) in engine.world.query::<(&Colonist, &Needs)>().iter() {
        max_water = max_water.max(needs.water);
        max_food = max_food.max(needs.food);
    }
    check(
        &mut results,
        "day_needs_bounded",
        max_water <= 12 && max_food <= 16,
        format!("worst water {} worst food {}", max_water, max_food),
    );

    let minerals = engine
        .modules
        .module(depot)
        .unwrap()
        .quantity_of(ResourceKind::Minerals);
    check(
        &mut results,
        "day_mining_happened",
        minerals > 0,
        format!("{} minerals banked", minerals),
    );

    let tank_left = engine
        .modules
        .module(water_tank)
        .unwrap()
        .quantity_of(ResourceKind::Water);
    check(
        &mut results,
        "day_water_circulated",
        tank_left < 350,
        format!("{} water left in the main tank", tank_left),
    );

    let pod_food = engine.modules.module(pod).unwrap().quantity_of(ResourceKind::Food);
    if verbose {
        println!(
            "  day summary: minerals {}, tank water {}, pod food {}",
            minerals, tank_left, pod_food
        );
    }

    results
}
