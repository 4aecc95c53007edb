use proptest::prelude::*;
use swarm_core::{BoundaryPolicy, Simulation, SimulationParams, Vector3};

type State = (f32, f32, f32, f32, f32, f32);

fn any_state() -> impl Strategy<Value = State> {
    (
        -40.0f32..40.0,
        -40.0f32..40.0,
        -40.0f32..40.0,
        -30.0f32..30.0,
        -30.0f32..30.0,
        -30.0f32..30.0,
    )
}

fn any_params() -> impl Strategy<Value = SimulationParams> {
    (
        0.0f32..20.0,
        0.0f32..50.0,
        0.0f32..25.0,
        0.0f32..60.0,
        (0.0f32..5.0, 0.0f32..5.0, 0.0f32..5.0, 0.0f32..5.0),
    )
        .prop_map(
            |(desired_separation, max_acceleration, max_speed, perception_distance, weights)| {
                SimulationParams {
                    desired_separation,
                    max_acceleration,
                    max_speed,
                    perception_distance,
                    cohesion: weights.0,
                    separation: weights.1,
                    alignment: weights.2,
                    fear: weights.3,
                }
            },
        )
}

fn build(boids: &[State], enemies: &[State], params: SimulationParams) -> Simulation {
    let mut sim = Simulation::new(Vector3::new(80.0, 80.0, 80.0), params).unwrap();
    sim.set_boundary(BoundaryPolicy::Unbounded);
    for &(x, y, z, vx, vy, vz) in boids {
        sim.create_boid(Vector3::new(x, y, z), Vector3::new(vx, vy, vz), ());
    }
    for &(x, y, z, _, _, _) in enemies {
        sim.create_touch_enemy(Vector3::new(x, y, z), ());
    }
    sim
}

fn within_bound(value: f32, bound: f32) -> bool {
    value <= bound * (1.0 + 1e-5) + 1e-5
}

proptest! {
    #[test]
    fn prop_speed_and_acceleration_stay_bounded(
        boids in prop::collection::vec(any_state(), 1..20),
        enemies in prop::collection::vec(any_state(), 0..4),
        params in any_params(),
        delta_t in 0.001f64..0.5,
    ) {
        let mut sim = build(&boids, &enemies, params);

        for _ in 0..5 {
            sim.step_simulation(delta_t).unwrap();
            for boid in sim.boids() {
                prop_assert!(within_bound(boid.velocity.magnitude(), params.max_speed));
                prop_assert!(within_bound(
                    boid.acceleration().magnitude(),
                    params.max_acceleration
                ));
                prop_assert!(boid.position.is_finite());
            }
        }
    }

    #[test]
    fn prop_boid_never_its_own_neighbour(
        boids in prop::collection::vec(any_state(), 1..20),
        enemies in prop::collection::vec(any_state(), 0..4),
        params in any_params(),
    ) {
        let mut sim = build(&boids, &enemies, params);

        for _ in 0..3 {
            sim.step_simulation(0.1).unwrap();
            for boid in sim.boids() {
                prop_assert!(!boid.neighbours().contains(&boid.id()));
                prop_assert!(!boid.enemies().contains(&boid.id()));
                for neighbour in sim.neighbours_of(boid.id()) {
                    prop_assert!(neighbour.id() != boid.id());
                }
            }
        }
    }

    #[test]
    fn prop_rejected_params_leave_config_untouched(
        params in any_params(),
        bad in -100.0f32..-0.001,
    ) {
        let mut sim = build(&[], &[], params);

        prop_assert!(sim.update_params(|p| p.max_speed = bad).is_err());
        prop_assert!(sim.update_params(|p| p.fear = bad).is_err());
        prop_assert_eq!(*sim.params(), params);
    }
}
