//! Motion Controller Tests
//!
//! Tests for:
//! - Placement from start side, lane and depth
//! - Boundary easing, the 35% floor and continuity across flips
//! - Face-turn yaw along the shorter arc, flip-mode scale mirroring
//! - Wave drift convergence and the zero-amplitude case
//! - Bounds under random bounded deltas, for both boundary policies

use std::f32::consts::PI;

use glam::Vec3;
use proptest::prelude::*;

use aquarium::Viewport;
use aquarium::common::math::{lerp_angle, shortest_arc};
use aquarium::common::{CreatureRng, RandomSource, ValueRange};
use aquarium::motion::{
    BoundaryPolicy, Direction, Footprint, LaneAllocator, MIN_SPEED_FACTOR, MotionController, MotionParams, StartSide, WaveParams,
};

const EPSILON: f32 = 1e-4;
const DT: f32 = 1.0 / 60.0;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Always returns the same sample.
struct FixedRandom(f32);

impl RandomSource for FixedRandom {
    fn next_unit(&mut self) -> f32 {
        self.0
    }
}

fn motion(start_side: StartSide) -> MotionParams {
    MotionParams {
        speed: 1.5,
        margin: 0.7,
        turn_zone: 1.5,
        flip_on_turn: false,
        start_side,
        spawn_fraction: 0.5,
        initial_yaw_deg: 90.0,
        vertical_fraction: 0.0,
        depth_layer: 0.0,
        boundary_policy: BoundaryPolicy::Overshoot,
    }
}

fn wave(bob_amplitude: f32) -> WaveParams {
    WaveParams {
        bob_amplitude,
        bob_frequency: 0.35,
        amplitude_range: ValueRange::new(bob_amplitude * 0.6, bob_amplitude * 1.4),
        frequency_range: ValueRange::new(0.245, 0.455),
        retarget_interval_range: ValueRange::new(2.5, 5.0),
    }
}

fn footprint(half_width: f32) -> Footprint {
    Footprint {
        base_scale: 0.5,
        half_width,
        pivot_offset: Vec3::ZERO,
        max_dim: 4.0 * half_width,
        size: Vec3::splat(4.0 * half_width),
    }
}

fn controller(params: MotionParams, wave: WaveParams) -> MotionController {
    MotionController::new(params, wave, Box::new(CreatureRng::seeded(11)))
}

fn square() -> Viewport {
    Viewport::new(10.0, 10.0)
}

// ============================================================================
// Placement
// ============================================================================

#[test]
fn left_start_places_inside_left_bound() {
    let mut c = controller(motion(StartSide::Left), wave(0.0));
    c.place(square(), &footprint(1.0));

    let k = c.kinematics().unwrap();
    assert!(approx(k.position.x, -3.29), "got x = {}", k.position.x);
    assert_eq!(k.direction, Direction::Right);
    assert!(approx(k.yaw, PI / 2.0));
}

#[test]
fn placement_uses_lane_and_depth() {
    let mut params = motion(StartSide::Middle);
    params.vertical_fraction = 0.5;
    params.depth_layer = -0.8;
    let mut c = controller(params, wave(0.0));
    c.place(square(), &footprint(1.0));

    let k = c.kinematics().unwrap();
    assert!(approx(k.position.x, 0.0));
    assert!(approx(k.position.y, 2.5));
    assert_eq!(k.position.z, -0.8);
}

#[test]
fn spawn_fraction_is_clamped() {
    let mut params = motion(StartSide::Middle);
    params.spawn_fraction = 7.0;
    let mut c = controller(params, wave(0.0));
    c.place(square(), &footprint(1.0));
    assert!(approx(c.kinematics().unwrap().position.x, 3.3));
}

#[test]
fn place_twice_keeps_first_placement() {
    let mut c = controller(motion(StartSide::Left), wave(0.0));
    let fp = footprint(1.0);
    c.place(square(), &fp);
    for _ in 0..30 {
        c.step(square(), &fp, DT);
    }
    let x = c.kinematics().unwrap().position.x;
    c.place(square(), &fp);
    assert_eq!(c.kinematics().unwrap().position.x, x);
}

// ============================================================================
// Easing and turns
// ============================================================================

#[test]
fn flip_happens_at_the_speed_floor() {
    for policy in [BoundaryPolicy::Overshoot, BoundaryPolicy::Clamp] {
        let mut params = motion(StartSide::Left);
        params.boundary_policy = policy;
        let mut c = controller(params, wave(0.0));
        let fp = footprint(1.0);
        c.place(square(), &fp);

        let mut turned = false;
        for _ in 0..2_000 {
            let report = c.step(square(), &fp, DT).unwrap();
            if report.turned {
                assert!(report.edge_distance <= 0.0);
                let speed = c.effective_speed(square(), &fp).unwrap();
                assert!(approx(speed, MIN_SPEED_FACTOR * 1.5), "{policy:?}: speed {speed}");
                assert_eq!(c.kinematics().unwrap().direction, Direction::Left);
                turned = true;
                break;
            }
            assert!(report.edge_distance > 0.0);
        }
        assert!(turned, "{policy:?}: never reached the right wall");
    }
}

#[test]
fn speed_never_jumps() {
    let params = motion(StartSide::Left);
    let mut c = controller(params, wave(0.0));
    let fp = footprint(1.0);
    c.place(square(), &fp);

    // Largest change the ease ramp allows over one step.
    let max_change = params.speed * (1.0 - MIN_SPEED_FACTOR) * (params.speed * DT) / params.turn_zone + EPSILON;

    let mut previous = c.effective_speed(square(), &fp).unwrap();
    let mut turns = 0;
    for _ in 0..3_000 {
        if c.step(square(), &fp, DT).unwrap().turned {
            turns += 1;
        }
        let speed = c.effective_speed(square(), &fp).unwrap();
        assert!((speed - previous).abs() <= max_change, "jump {previous} -> {speed}");
        assert!(speed >= MIN_SPEED_FACTOR * params.speed - EPSILON);
        previous = speed;
    }
    assert!(turns >= 2);
}

#[test]
fn face_turn_takes_the_short_way_through_180() {
    let mut params = motion(StartSide::Left);
    params.initial_yaw_deg = 100.0;
    params.speed = 3.0;
    let mut c = controller(params, wave(0.0));
    let fp = footprint(1.0);
    c.place(square(), &fp);
    let start = c.kinematics().unwrap().yaw;

    while !c.step(square(), &fp, DT).unwrap().turned {}
    let after_turn = c.kinematics().unwrap().yaw;
    assert!(after_turn > start, "yaw should rotate toward 180, got {after_turn}");

    for _ in 0..600 {
        c.step(square(), &fp, DT);
        let k = *c.kinematics().unwrap();
        if k.direction == Direction::Right {
            break;
        }
        // Never swings back through 0.
        assert!(k.yaw.abs() >= 100.0_f32.to_radians() - EPSILON);
    }
}

#[test]
fn shortest_arc_never_exceeds_half_turn() {
    // Mirrored 100 degree headings: 160 degrees through 180, not 200 through 0.
    let from = 100.0_f32.to_radians();
    let to = -100.0_f32.to_radians();
    assert!(approx(shortest_arc(from, to), 160.0_f32.to_radians()));
    assert!(lerp_angle(from, to, 0.1) > from);

    let from = 170.0_f32.to_radians();
    let to = -170.0_f32.to_radians();
    assert!(approx(shortest_arc(from, to), 20.0_f32.to_radians()));

    // An exact half-turn resolves toward +180.
    assert_eq!(shortest_arc(0.0, PI), PI);
    assert_eq!(shortest_arc(0.0, -PI), PI);
}

#[test]
fn flip_mode_keeps_yaw_and_mirrors_scale() {
    let mut params = motion(StartSide::Left);
    params.flip_on_turn = true;
    params.speed = 3.0;
    let mut c = controller(params, wave(0.0));
    let fp = footprint(1.0);
    c.place(square(), &fp);
    let yaw = c.kinematics().unwrap().yaw;

    let mut flips = 0;
    for _ in 0..3_000 {
        if c.step(square(), &fp, DT).unwrap().turned {
            flips += 1;
            let k = c.kinematics().unwrap();
            let expected = if flips % 2 == 1 { -1.0 } else { 1.0 };
            assert_eq!(k.scale_sign, expected);
            assert_eq!(k.yaw, yaw);
        }
    }
    assert!(flips >= 2);
}

// ============================================================================
// Vertical motion and drift
// ============================================================================

#[test]
fn no_bob_means_exact_lane() {
    let mut params = motion(StartSide::Left);
    params.vertical_fraction = -0.4;
    let mut c = controller(params, wave(0.0));
    let fp = footprint(1.0);
    c.place(square(), &fp);
    for _ in 0..500 {
        c.step(square(), &fp, DT);
        assert_eq!(c.kinematics().unwrap().position.y, LaneAllocator::lane_y(10.0, -0.4));
    }
}

#[test]
fn bob_stays_within_amplitude_range() {
    let p = wave(0.15);
    let mut c = controller(motion(StartSide::Left), p);
    let fp = footprint(1.0);
    c.place(square(), &fp);
    for _ in 0..2_000 {
        c.step(square(), &fp, DT);
        let y = c.kinematics().unwrap().position.y;
        assert!(y.abs() <= p.amplitude_range.max + EPSILON);
    }
}

#[test]
fn held_targets_converge() {
    let mut c = controller(motion(StartSide::Left), wave(0.15));
    let fp = footprint(1.0);
    c.place(square(), &fp);
    c.drift_mut().hold_targets(0.2, 0.4);

    for _ in 0..600 {
        c.step(square(), &fp, DT);
    }
    let drift = c.drift();
    assert!(approx(drift.current_amplitude, 0.2));
    assert!(approx(drift.current_frequency, 0.4));
}

#[test]
fn bob_follows_sine_of_elapsed_time_while_frequency_drifts() {
    let mut c = controller(motion(StartSide::Left), wave(0.15));
    let fp = footprint(1.0);
    c.place(square(), &fp);
    c.drift_mut().hold_targets(0.5, 1.0);

    let mut worst = 0.0_f32;
    for _ in 0..1_200 {
        c.step(square(), &fp, DT);
        let d = c.drift();
        let expected = (std::f32::consts::TAU * d.current_frequency * c.elapsed() + d.phase).sin() * d.current_amplitude;
        worst = worst.max((c.kinematics().unwrap().position.y - expected).abs());
    }
    assert!(worst < 1e-3, "max deviation {worst}");
}

#[test]
fn convergence_does_not_depend_on_step_size() {
    let fp = footprint(1.0);
    let run = |steps: usize, dt: f32| {
        let mut c = controller(motion(StartSide::Left), wave(0.15));
        c.place(square(), &fp);
        c.drift_mut().hold_targets(0.2, 0.4);
        for _ in 0..steps {
            c.step(square(), &fp, dt);
        }
        c.drift().current_amplitude
    };
    let coarse = run(10, 0.05);
    let fine = run(100, 0.005);
    assert!((coarse - fine).abs() < 1e-4, "{coarse} vs {fine}");
}

#[test]
fn injected_random_source_fixes_phase() {
    let c = MotionController::new(motion(StartSide::Left), wave(0.15), Box::new(FixedRandom(0.5)));
    assert!(approx(c.drift().phase, PI));
    assert!(approx(c.drift().next_change_in, 3.75));
}

// ============================================================================
// Robustness
// ============================================================================

#[test]
fn bad_deltas_change_nothing_horizontally() {
    let mut c = controller(motion(StartSide::Left), wave(0.0));
    let fp = footprint(1.0);
    c.place(square(), &fp);
    let x = c.kinematics().unwrap().position.x;
    for delta in [f32::NAN, -1.0, f32::NEG_INFINITY, 0.0] {
        c.step(square(), &fp, delta);
    }
    assert_eq!(c.kinematics().unwrap().position.x, x);
}

#[test]
fn resize_moves_the_walls() {
    let mut params = motion(StartSide::Right);
    params.boundary_policy = BoundaryPolicy::Clamp;
    let mut c = controller(params, wave(0.0));
    let fp = footprint(1.0);
    c.place(Viewport::new(20.0, 10.0), &fp);
    assert!(approx(c.kinematics().unwrap().position.x, 8.29));

    c.step(square(), &fp, DT);
    let k = c.kinematics().unwrap();
    assert!(k.position.x <= 3.3 + EPSILON);
}

fn run_with_deltas(policy: BoundaryPolicy, speed: f32, width: f32, half_width: f32, deltas: &[f32]) -> (f32, f32, f32) {
    let mut params = motion(StartSide::Left);
    params.speed = speed;
    params.boundary_policy = policy;
    let viewport = Viewport::new(width, 10.0);
    let fp = footprint(half_width);
    let mut c = controller(params, wave(0.15));
    c.place(viewport, &fp);
    let bounds = c.bounds(viewport, &fp);

    let (mut lo, mut hi) = (f32::INFINITY, f32::NEG_INFINITY);
    for &delta in deltas {
        c.step(viewport, &fp, delta);
        let x = c.kinematics().unwrap().position.x;
        lo = lo.min(x - bounds.left);
        hi = hi.max(x - bounds.right);
    }
    (lo, hi, speed * deltas.iter().copied().fold(0.0, f32::max))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn clamp_policy_never_leaves_bounds(
        speed in 0.1f32..3.0,
        width in 8.0f32..20.0,
        half_width in 0.2f32..1.5,
        deltas in prop::collection::vec(0.0f32..0.05, 100..400),
    ) {
        let (lo, hi, _) = run_with_deltas(BoundaryPolicy::Clamp, speed, width, half_width, &deltas);
        prop_assert!(lo >= 0.0, "went {lo} past the left bound");
        prop_assert!(hi <= 0.0, "went {hi} past the right bound");
    }

    #[test]
    fn overshoot_stays_within_one_step(
        speed in 0.1f32..3.0,
        width in 8.0f32..20.0,
        half_width in 0.2f32..1.5,
        deltas in prop::collection::vec(0.0f32..0.05, 100..400),
    ) {
        let (lo, hi, step) = run_with_deltas(BoundaryPolicy::Overshoot, speed, width, half_width, &deltas);
        prop_assert!(lo >= -step - EPSILON, "left overshoot {lo} > step {step}");
        prop_assert!(hi <= step + EPSILON, "right overshoot {hi} > step {step}");
    }
}
