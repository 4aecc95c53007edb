//! Radius queries over a snapshot of agent positions.
//!
//! The stepper snapshots every roster before any agent moves and asks a
//! [`NeighbourQuery`] for the members within a radius of each boid. The
//! default [`BruteForce`] scan is O(N) per query; a spatial index can be
//! plugged in without touching the stepper or the rule engine.

use alloc::vec::Vec;

use crate::agent::AgentId;
use crate::vector::Vector3;

/// An agent's state as captured at the start of a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub id: AgentId,
    pub position: Vector3,
    pub velocity: Vector3,
}

/// A pluggable radius query over a population snapshot
pub trait NeighbourQuery {
    /// Rebuild internal structures for `population`. Called once per step,
    /// before any query against that population.
    fn rebuild(&mut self, _population: &[Kinematics]) {}

    /// Push into `out` the indices of every member of `population` within
    /// `radius` (inclusive) of `origin`, skipping the member whose id is
    /// `exclude`. `out` is cleared first.
    fn query(
        &self,
        population: &[Kinematics],
        origin: Vector3,
        radius: f32,
        exclude: Option<AgentId>,
        out: &mut Vec<usize>,
    );

    /// Human-readable name for logs.
    fn name(&self) -> &'static str;
}

/// All-pairs scan, no internal state
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl NeighbourQuery for BruteForce {
    fn query(
        &self,
        population: &[Kinematics],
        origin: Vector3,
        radius: f32,
        exclude: Option<AgentId>,
        out: &mut Vec<usize>,
    ) {
        out.clear();
        let radius_sq = radius * radius;

        for (index, other) in population.iter().enumerate() {
            if Some(other.id) == exclude {
                continue;
            }
            if other.position.distance_squared(&origin) <= radius_sq {
                out.push(index);
            }
        }
    }

    fn name(&self) -> &'static str {
        "BruteForce"
    }
}
