//! Aquarium Tests
//!
//! Tests for:
//! - Creature lifecycle: spawn, populate, place, remove
//! - Generation-tagged loads: stale, removed and failed results
//! - Motion-only creatures and never-resolving loads
//! - Lanes, seeding, resize and frame output

use std::thread;
use std::time::{Duration, Instant};

use glam::Vec3;

use aquarium::app::LoadOutcome;
use aquarium::assets::{FishBuilder, LoadCompletion};
use aquarium::{
    AquaError, Aquarium, AquariumConfig, AssetServer, CreatureConfig, CreatureKey, LoadError, LoadTicket,
    MemoryLoader, StartSide,
};

const EPSILON: f32 = 1e-4;
const DT: f32 = 1.0 / 60.0;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// 10 x 10 world units, no lanes.
fn square_tank() -> AquariumConfig {
    let mut config = AquariumConfig::default();
    config.viewport.pixel_width = 800;
    config.viewport.pixel_height = 800;
    config.lanes.clear();
    config
}

fn complete(aquarium: &mut Aquarium, ticket: LoadTicket, source: &str, builder: &FishBuilder) -> LoadOutcome {
    aquarium.complete_load(LoadCompletion {
        ticket,
        source: source.into(),
        result: Ok(builder.build()),
    })
}

/// Spawns and services the load by hand.
fn spawn_loaded(aquarium: &mut Aquarium, config: CreatureConfig, builder: &FishBuilder) -> CreatureKey {
    let source = config.source.clone().map(|s| s.to_string()).unwrap_or_default();
    let key = aquarium.spawn(config).unwrap();
    let (ticket, _) = aquarium.take_requests().pop().unwrap();
    assert_eq!(complete(aquarium, ticket, &source, builder), LoadOutcome::Applied);
    key
}

fn wait_until_placed(aquarium: &mut Aquarium, expected: usize) {
    let start = Instant::now();
    while aquarium.tick(0.0).placed < expected {
        assert!(start.elapsed() < Duration::from_secs(5), "loads did not finish");
        thread::sleep(Duration::from_millis(2));
    }
}

// ============================================================================
// Placement scenario
// ============================================================================

#[test]
fn left_spawn_sits_inside_margin() {
    let mut aquarium = Aquarium::new(&square_tank()).unwrap();
    let config = CreatureConfig {
        margin: Some(0.7),
        height_ratio: Some(0.2),
        size_multiplier: Some(1.0),
        start_side: Some(StartSide::Left),
        ..CreatureConfig::with_source("fish")
    };
    let key = spawn_loaded(&mut aquarium, config, &FishBuilder::new().size(Vec3::new(2.0, 0.8, 0.5)));

    let frame = aquarium.tick(DT);
    let placed = frame.creature(key).unwrap();
    assert!(approx(placed.transform.position.x, -3.29), "x = {}", placed.transform.position.x);
    assert!(approx(placed.transform.scale.y, 1.0));

    let creature = aquarium.get(key).unwrap();
    assert!(approx(creature.body().unwrap().footprint.half_width, 1.0));
}

#[test]
fn pivot_offset_recenters_asset() {
    let mut aquarium = Aquarium::new(&square_tank()).unwrap();
    let builder = FishBuilder::new().center(Vec3::new(3.0, -1.0, 0.5));
    let key = spawn_loaded(&mut aquarium, CreatureConfig::with_source("fish"), &builder);

    let frame = aquarium.tick(DT);
    assert_eq!(frame.creature(key).unwrap().transform.pivot_offset, Vec3::new(-3.0, 1.0, -0.5));
}

// ============================================================================
// Load races
// ============================================================================

#[test]
fn never_resolving_load_emits_nothing() {
    let loader = MemoryLoader::new();
    loader.insert_pending("abyss");
    let server: AssetServer<_, LoadTicket> = AssetServer::new(loader).unwrap();
    let mut aquarium = Aquarium::with_dispatcher(&square_tank(), server).unwrap();
    let key = aquarium.spawn(CreatureConfig::with_source("abyss")).unwrap();

    for _ in 0..1_000 {
        let frame = aquarium.tick(DT);
        assert_eq!(frame.placed, 0);
        assert!(frame.creatures.is_empty());
    }
    let creature = aquarium.get(key).unwrap();
    assert!(!creature.is_populated());
    assert!(creature.render_transform().is_none());
}

#[test]
fn reconfigured_source_discards_first_load() {
    let mut aquarium = Aquarium::new(&square_tank()).unwrap();
    let key = aquarium.spawn(CreatureConfig::with_source("old")).unwrap();
    let (old_ticket, old_source) = aquarium.take_requests().pop().unwrap();
    assert_eq!(old_source.as_str(), "old");

    aquarium.reconfigure(key, CreatureConfig::with_source("new")).unwrap();
    let (new_ticket, new_source) = aquarium.take_requests().pop().unwrap();
    assert_eq!(new_source.as_str(), "new");
    assert_ne!(old_ticket.generation, new_ticket.generation);

    // The old load resolves late and must not populate the creature.
    let outcome = complete(&mut aquarium, old_ticket, "old", &FishBuilder::new());
    assert_eq!(outcome, LoadOutcome::Stale);
    assert!(!aquarium.get(key).unwrap().is_populated());
    assert_eq!(aquarium.tick(DT).placed, 0);

    assert_eq!(complete(&mut aquarium, new_ticket, "new", &FishBuilder::new()), LoadOutcome::Applied);
    assert_eq!(aquarium.tick(DT).placed, 1);
}

#[test]
fn reconfigured_source_resets_placed_creature() {
    let mut aquarium = Aquarium::new(&square_tank()).unwrap();
    let key = spawn_loaded(&mut aquarium, CreatureConfig::with_source("a"), &FishBuilder::new());
    assert_eq!(aquarium.tick(DT).placed, 1);

    aquarium.reconfigure(key, CreatureConfig::with_source("b")).unwrap();
    assert!(!aquarium.get(key).unwrap().is_populated());
    assert_eq!(aquarium.tick(DT).placed, 0);
}

#[test]
fn load_for_removed_creature_is_dropped() {
    let mut aquarium = Aquarium::new(&square_tank()).unwrap();
    let key = aquarium.spawn(CreatureConfig::with_source("fish")).unwrap();
    let (ticket, _) = aquarium.take_requests().pop().unwrap();

    assert!(aquarium.remove(key));
    assert!(!aquarium.remove(key));
    assert_eq!(complete(&mut aquarium, ticket, "fish", &FishBuilder::new()), LoadOutcome::Removed);
    assert!(aquarium.is_empty());
}

#[test]
fn failed_load_stays_unplaced() {
    let mut aquarium = Aquarium::new(&square_tank()).unwrap();
    let key = aquarium.spawn(CreatureConfig::with_source("broken")).unwrap();
    let (ticket, _) = aquarium.take_requests().pop().unwrap();

    let outcome = aquarium.complete_load(LoadCompletion {
        ticket,
        source: "broken".into(),
        result: Err(LoadError::Decode {
            source_ref: "broken".into(),
            message: "truncated".into(),
        }),
    });
    assert_eq!(outcome, LoadOutcome::Failed);
    for _ in 0..10 {
        assert_eq!(aquarium.tick(DT).placed, 0);
    }
    assert!(!aquarium.get(key).unwrap().is_placed());
}

#[test]
fn creature_without_source_waits_quietly() {
    let mut aquarium = Aquarium::new(&square_tank()).unwrap();
    aquarium.spawn(CreatureConfig::default()).unwrap();
    assert!(aquarium.take_requests().is_empty());
    assert_eq!(aquarium.tick(DT).live, 1);
}

#[test]
fn async_loads_arrive_through_the_server() {
    let loader = MemoryLoader::new();
    loader.insert("clown", FishBuilder::new().build());
    loader.insert("tang", FishBuilder::new().without_animation().build());
    let server: AssetServer<_, LoadTicket> = AssetServer::new(loader).unwrap();

    let mut config = AquariumConfig::default();
    config.creatures = vec![CreatureConfig::with_source("clown"), CreatureConfig::with_source("tang")];
    let mut aquarium = Aquarium::with_dispatcher(&config, server).unwrap();

    wait_until_placed(&mut aquarium, 2);
    let frame = aquarium.tick(DT);
    assert_eq!(frame.placed, 2);
    assert_eq!(frame.creatures.iter().filter(|c| c.pose.is_some()).count(), 1);
}

// ============================================================================
// Animation
// ============================================================================

#[test]
fn motion_only_creature_never_advances_clips() {
    let mut aquarium = Aquarium::new(&square_tank()).unwrap();
    let key = spawn_loaded(
        &mut aquarium,
        CreatureConfig::with_source("pebble"),
        &FishBuilder::new().without_animation(),
    );

    for _ in 0..300 {
        let frame = aquarium.tick(DT);
        let placed = frame.creature(key).unwrap();
        assert!(placed.transform.position.is_finite());
        assert!(placed.pose.is_none());
        assert!(placed.clip.is_none());
    }
    let creature = aquarium.get(key).unwrap();
    assert!(!creature.has_active_clip());
    assert_eq!(creature.body().unwrap().blender.advance_count(), 0);
}

#[test]
fn animated_creature_reports_clip_and_pose() {
    let mut aquarium = Aquarium::new(&square_tank()).unwrap();
    let key = spawn_loaded(&mut aquarium, CreatureConfig::with_source("fish"), &FishBuilder::new());

    aquarium.tick(DT);
    let frame = aquarium.tick(DT);
    let placed = frame.creature(key).unwrap();
    assert_eq!(placed.clip.as_deref(), Some("Swim_Loop"));
    assert!(placed.pose.as_ref().is_some_and(|p| !p.is_empty()));
}

#[test]
fn animation_reconfigure_crossfades_without_reload() {
    let mut aquarium = Aquarium::new(&square_tank()).unwrap();
    let builder = FishBuilder::new().with_clip("Dash");
    let key = spawn_loaded(&mut aquarium, CreatureConfig::with_source("fish"), &builder);
    aquarium.tick(DT);
    let generation = aquarium.get(key).unwrap().generation();

    let config = CreatureConfig {
        animation_name: Some("Dash".into()),
        ..CreatureConfig::with_source("fish")
    };
    aquarium.reconfigure(key, config).unwrap();
    assert!(aquarium.take_requests().is_empty());

    let creature = aquarium.get(key).unwrap();
    assert_eq!(creature.generation(), generation);
    assert!(creature.is_placed());
    let blender = &creature.body().unwrap().blender;
    assert_eq!(blender.active_clip_name(), Some("Dash"));
}

// ============================================================================
// Tank-level behavior
// ============================================================================

#[test]
fn lanes_separate_depths() {
    let mut config = AquariumConfig::default();
    config.viewport.pixel_width = 1600;
    config.viewport.pixel_height = 900;
    let mut aquarium = Aquarium::new(&config).unwrap();
    let keys: Vec<_> = (0..3)
        .map(|_| spawn_loaded(&mut aquarium, CreatureConfig::with_source("fish"), &FishBuilder::new()))
        .collect();

    let frame = aquarium.tick(DT);
    let depths: Vec<f32> = keys
        .iter()
        .map(|&k| frame.creature(k).unwrap().transform.position.z)
        .collect();
    assert_eq!(depths, vec![0.0, -0.4, -0.8]);
}

#[test]
fn same_seed_same_tank() {
    let run = || {
        let mut config = AquariumConfig::default();
        config.seed = 42;
        let mut aquarium = Aquarium::new(&config).unwrap();
        let key = spawn_loaded(&mut aquarium, CreatureConfig::with_source("fish"), &FishBuilder::new());
        let mut y = 0.0;
        for _ in 0..240 {
            y = aquarium.tick(DT).creature(key).unwrap().transform.position.y;
        }
        y
    };
    assert_eq!(run().to_bits(), run().to_bits());
}

#[test]
fn resize_widens_world() {
    let mut aquarium = Aquarium::new(&square_tank()).unwrap();
    assert!(approx(aquarium.viewport().width, 10.0));
    aquarium.resize(1600, 800);
    let viewport = aquarium.viewport();
    assert!(approx(viewport.width, 20.0));
    assert!(approx(viewport.height, 10.0));
}

#[test]
fn unknown_key_is_an_error() {
    let mut aquarium = Aquarium::new(&square_tank()).unwrap();
    let key = aquarium.spawn(CreatureConfig::default()).unwrap();
    aquarium.remove(key);
    let err = aquarium.reconfigure(key, CreatureConfig::default()).unwrap_err();
    assert!(matches!(err, AquaError::UnknownCreature(_)));
}

#[test]
fn invalid_creature_config_is_rejected() {
    let mut aquarium = Aquarium::new(&square_tank()).unwrap();
    let config = CreatureConfig {
        turn_zone: Some(f32::NAN),
        ..CreatureConfig::with_source("fish")
    };
    assert!(matches!(aquarium.spawn(config), Err(AquaError::InvalidConfig(_))));
    assert!(aquarium.is_empty());
}

#[test]
fn frame_output_serializes() {
    let mut aquarium = Aquarium::new(&square_tank()).unwrap();
    spawn_loaded(&mut aquarium, CreatureConfig::with_source("fish"), &FishBuilder::new());
    let frame = aquarium.tick(DT);
    let json = serde_json::to_value(&frame).unwrap();
    assert_eq!(json["placed"], 1);
    assert!(json["creatures"][0]["transform"]["position"].is_array());
}
