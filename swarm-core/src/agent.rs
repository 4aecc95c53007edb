use alloc::vec::Vec;

use crate::neighbours::Kinematics;
use crate::params::SimulationParams;
use crate::rules;
use crate::vector::Vector3;

/// Handle to an agent owned by a [`Simulation`](crate::Simulation)
///
/// Ids are handed out in increasing order and never reused, so a handle kept
/// after removal simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgentId(u64);

impl AgentId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// How an agent takes part in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    /// Flocks: steered by the rule engine every step
    Boid,
    /// Sits in the boid roster and is seen as a neighbour, but is moved externally
    TouchBoid,
    /// Sits in the enemy roster and is moved externally
    TouchEnemy,
}

impl AgentKind {
    pub fn is_steerable(self) -> bool {
        matches!(self, AgentKind::Boid)
    }

    pub fn is_enemy(self) -> bool {
        matches!(self, AgentKind::TouchEnemy)
    }
}

/// A mobile object in the simulation
///
/// `position` and `velocity` are public so an input layer can drive touch
/// agents between steps. Steerable boids have them rewritten by every step.
#[derive(Debug, Clone)]
pub struct Agent<T> {
    id: AgentId,
    kind: AgentKind,
    pub position: Vector3,
    pub velocity: Vector3,
    acceleration: Vector3,
    payload: T,
    neighbours: Vec<AgentId>,
    enemies: Vec<AgentId>,
}

impl<T> Agent<T> {
    pub(crate) fn new(
        id: AgentId,
        kind: AgentKind,
        position: Vector3,
        velocity: Vector3,
        payload: T,
    ) -> Self {
        Self {
            id,
            kind,
            position,
            velocity,
            acceleration: Vector3::zero(),
            payload,
            neighbours: Vec::new(),
            enemies: Vec::new(),
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    pub fn is_steerable(&self) -> bool {
        self.kind.is_steerable()
    }

    /// Acceleration applied during the most recent step, already clamped
    pub fn acceleration(&self) -> Vector3 {
        self.acceleration
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }

    /// Boid-roster neighbours found in the most recent step
    pub fn neighbours(&self) -> &[AgentId] {
        &self.neighbours
    }

    /// Enemies found in the most recent step
    pub fn enemies(&self) -> &[AgentId] {
        &self.enemies
    }

    pub fn kinematics(&self) -> Kinematics {
        Kinematics {
            id: self.id,
            position: self.position,
            velocity: self.velocity,
        }
    }

    /// Replaces the transient neighbour and enemy lists with this step's query results.
    pub(crate) fn set_perception(&mut self, neighbours: &[Kinematics], enemies: &[Kinematics]) {
        self.neighbours.clear();
        self.neighbours
            .extend(neighbours.iter().map(|k| k.id).filter(|&id| id != self.id));
        self.enemies.clear();
        self.enemies
            .extend(enemies.iter().map(|k| k.id).filter(|&id| id != self.id));
    }

    pub(crate) fn clear_perception(&mut self) {
        self.neighbours.clear();
        self.enemies.clear();
        self.acceleration = Vector3::zero();
    }

    pub(crate) fn forget(&mut self, id: AgentId) {
        self.neighbours.retain(|&n| n != id);
        self.enemies.retain(|&e| e != id);
    }

    /// Advances this agent by `delta_t` seconds.
    ///
    /// `neighbours` and `enemies` must describe the other agents as they were
    /// at the start of the step. The net steering request is clamped to
    /// `max_acceleration`, velocity to `max_speed`, and position integrated
    /// with the clamped velocity.
    pub fn step_simulation(
        &mut self,
        neighbours: &[Kinematics],
        enemies: &[Kinematics],
        params: &SimulationParams,
        delta_t: f32,
    ) {
        let me = self.kinematics();
        let steering = rules::steering(&me, neighbours, enemies, params);

        self.acceleration = steering.limit(params.max_acceleration);
        self.velocity += self.acceleration * delta_t;
        self.velocity = self.velocity.limit(params.max_speed);
        self.position += self.velocity * delta_t;
    }
}
