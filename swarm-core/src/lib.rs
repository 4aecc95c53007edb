//! Flocking simulation core.
//!
//! A [`Simulation`] owns a roster of boids and a roster of enemies. Each call
//! to [`Simulation::step_simulation`] snapshots both rosters, finds every
//! boid's neighbours and enemies, steers it with the cohesion, separation,
//! alignment and fear rules, and integrates its velocity and position.
//! Rendering and input live outside this crate: they create and remove
//! agents and read back positions between steps.
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod agent;
pub mod error;
pub mod neighbours;
pub mod params;
pub mod rules;
pub mod simulation;
pub mod vector;

pub use agent::{Agent, AgentId, AgentKind};
pub use error::SimulationError;
pub use neighbours::{BruteForce, Kinematics, NeighbourQuery};
pub use params::{BoundaryPolicy, SimulationParams};
pub use rules::RuleContributions;
pub use simulation::Simulation;
pub use vector::Vector3;
