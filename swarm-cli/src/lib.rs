//! Headless driver for the flocking simulation.
//!
//! Plays the part of the display and input layers: builds a simulation from
//! [`SwarmSettings`], moves touch enemies along scripted orbits the way a
//! gesture recognizer would, steps with a fixed time step and writes every
//! frame as one line of JSON.

use std::io::Write;

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use swarm_core::{AgentId, AgentKind, BoundaryPolicy, Simulation, SimulationParams, Vector3};
use swarm_shared::{AgentRole, AgentSnapshot, Boundary, FrameSnapshot, RuleSettings, SwarmSettings};

pub fn params_from(rules: &RuleSettings) -> SimulationParams {
    SimulationParams {
        desired_separation: rules.desired_separation,
        max_acceleration: rules.max_acceleration,
        max_speed: rules.max_speed,
        perception_distance: rules.perception_distance,
        cohesion: rules.cohesion,
        separation: rules.separation,
        alignment: rules.alignment,
        fear: rules.fear,
    }
}

pub fn boundary_from(boundary: Boundary) -> BoundaryPolicy {
    match boundary {
        Boundary::Unbounded => BoundaryPolicy::Unbounded,
        Boundary::Wrap => BoundaryPolicy::Wrap,
        Boundary::Contain => BoundaryPolicy::Contain,
    }
}

pub fn role_of(kind: AgentKind) -> AgentRole {
    match kind {
        AgentKind::Boid => AgentRole::Boid,
        AgentKind::TouchBoid => AgentRole::TouchBoid,
        AgentKind::TouchEnemy => AgentRole::TouchEnemy,
    }
}

/// Circular path in the XY plane standing in for a finger dragging an enemy
#[derive(Debug, Clone, Copy)]
pub struct Orbit {
    pub center: Vector3,
    pub radius: f32,
    /// Radians per second
    pub angular_speed: f32,
    pub phase: f32,
}

impl Orbit {
    pub fn position_at(&self, t: f32) -> Vector3 {
        let angle = self.phase + self.angular_speed * t;
        self.center + Vector3::new(angle.cos(), angle.sin(), 0.0) * self.radius
    }

    pub fn velocity_at(&self, t: f32) -> Vector3 {
        let angle = self.phase + self.angular_speed * t;
        Vector3::new(-angle.sin(), angle.cos(), 0.0) * (self.radius * self.angular_speed)
    }
}

/// Totals reported at the end of a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: u64,
    pub frames: u64,
    pub boid_centroid: Option<[f32; 3]>,
}

pub struct Runner {
    simulation: Simulation<String>,
    enemies: Vec<(AgentId, Orbit)>,
    time_step: f64,
    elapsed: f64,
}

impl Runner {
    pub fn new(settings: &SwarmSettings) -> Result<Self> {
        if !(settings.time_step.is_finite() && settings.time_step > 0.0) {
            bail!("time_step must be a positive number of seconds, got {}", settings.time_step);
        }

        let size = Vector3::from(settings.world_size);
        let mut simulation = Simulation::new(size, params_from(&settings.rules))
            .context("Invalid simulation settings")?;
        simulation.set_boundary(boundary_from(settings.boundary));

        let mut rng = StdRng::seed_from_u64(settings.seed);
        for i in 0..settings.boid_count {
            simulation.spawn_boid(&mut rng, format!("boid-{}", i));
        }

        let center = size * 0.5;
        let radius = 0.35 * size.x.min(size.y);
        let count = settings.enemy_count.max(1) as f32;
        let mut enemies = Vec::with_capacity(settings.enemy_count);
        for i in 0..settings.enemy_count {
            let orbit = Orbit {
                center,
                radius,
                angular_speed: 0.5,
                phase: std::f32::consts::TAU * i as f32 / count,
            };
            let id = simulation.create_touch_enemy(orbit.position_at(0.0), format!("enemy-{}", i));
            enemies.push((id, orbit));
        }

        log::info!(
            "Simulation ready: {} boids, {} enemies, world {:?}, boundary {:?}",
            simulation.boid_count(),
            simulation.enemy_count(),
            settings.world_size,
            settings.boundary
        );

        Ok(Self {
            simulation,
            enemies,
            time_step: settings.time_step,
            elapsed: 0.0,
        })
    }

    pub fn simulation(&self) -> &Simulation<String> {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation<String> {
        &mut self.simulation
    }

    /// Moves the scripted enemies, then advances the flock by one time step.
    pub fn step(&mut self) -> Result<()> {
        let t = self.elapsed as f32;
        for (id, orbit) in &self.enemies {
            // Enemies removed by the caller are skipped
            if let Some(enemy) = self.simulation.agent_mut(*id) {
                enemy.position = orbit.position_at(t);
                enemy.velocity = orbit.velocity_at(t);
            }
        }

        self.simulation
            .step_simulation(self.time_step)
            .context("Simulation step failed")?;
        self.elapsed += self.time_step;
        Ok(())
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let agents = self
            .simulation
            .boids()
            .chain(self.simulation.enemies())
            .map(|agent| AgentSnapshot {
                id: agent.id().raw(),
                role: role_of(agent.kind()),
                label: agent.payload().clone(),
                position: agent.position.to_array(),
                velocity: agent.velocity.to_array(),
                neighbours: agent.neighbours().len(),
            })
            .collect();

        FrameSnapshot {
            step: self.simulation.steps(),
            elapsed: self.elapsed,
            agents,
        }
    }

    /// Runs `steps` steps, writing a frame every `every` steps (and after the last one).
    pub fn run<W: Write>(&mut self, steps: u64, every: u64, out: &mut W) -> Result<RunSummary> {
        if every == 0 {
            bail!("frame interval must be at least 1");
        }

        let mut frames = 0;
        for step in 1..=steps {
            self.step()?;

            if step % every == 0 || step == steps {
                let line = self
                    .snapshot()
                    .to_json_line()
                    .context("Failed to serialize frame")?;
                writeln!(out, "{}", line).context("Failed to write frame")?;
                frames += 1;
            }
        }
        out.flush().context("Failed to flush output")?;

        let boid_centroid = self.snapshot().centroid(AgentRole::Boid);
        log::info!("Finished {} steps, wrote {} frames", steps, frames);
        log::debug!("Final boid centroid: {:?}", boid_centroid);

        Ok(RunSummary {
            steps,
            frames,
            boid_centroid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_velocity_is_tangent() {
        let orbit = Orbit {
            center: Vector3::new(10.0, 10.0, 0.0),
            radius: 5.0,
            angular_speed: 2.0,
            phase: 0.0,
        };

        let offset = orbit.position_at(0.3) - orbit.center;
        let velocity = orbit.velocity_at(0.3);

        assert!((offset.magnitude() - 5.0).abs() < 1e-4);
        assert!(offset.dot(&velocity).abs() < 1e-3);
        assert!((velocity.magnitude() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_params_from_rules() {
        let rules = RuleSettings {
            fear: 7.0,
            ..RuleSettings::default()
        };
        let params = params_from(&rules);
        assert_eq!(params.fear, 7.0);
        assert_eq!(params.max_speed, rules.max_speed);
    }

    #[test]
    fn test_runner_rejects_zero_time_step() {
        let settings = SwarmSettings {
            time_step: 0.0,
            ..SwarmSettings::default()
        };
        assert!(Runner::new(&settings).is_err());
    }

    #[test]
    fn test_runner_rejects_negative_weight() {
        let mut settings = SwarmSettings::default();
        settings.rules.cohesion = -1.0;
        let err = Runner::new(&settings).err().expect("negative weight accepted");
        assert!(format!("{:#}", err).contains("cohesion"));
    }
}
