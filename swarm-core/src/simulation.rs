use alloc::collections::BTreeMap;
use alloc::vec::Vec;

#[cfg(feature = "std")]
use rand::Rng;

use crate::agent::{Agent, AgentId, AgentKind};
use crate::error::SimulationError;
use crate::neighbours::{BruteForce, Kinematics, NeighbourQuery};
use crate::params::{validate_size, BoundaryPolicy, SimulationParams};
use crate::vector::Vector3;

/// Owns the boid and enemy rosters and advances them in discrete time steps
///
/// `T` is the payload callers attach to each agent; the simulation stores it
/// and hands it back but never looks inside. `Q` answers the radius queries.
///
/// Rosters are keyed by [`AgentId`], so iteration follows creation order and
/// repeated runs from the same state are deterministic.
pub struct Simulation<T = (), Q = BruteForce> {
    boids: BTreeMap<AgentId, Agent<T>>,
    enemies: BTreeMap<AgentId, Agent<T>>,
    size: Vector3,
    boundary: BoundaryPolicy,
    params: SimulationParams,
    next_id: u64,
    steps: u64,
    boid_query: Q,
    enemy_query: Q,
    boid_snapshot: Vec<Kinematics>,
    enemy_snapshot: Vec<Kinematics>,
}

impl<T> Simulation<T, BruteForce> {
    pub fn new(size: Vector3, params: SimulationParams) -> Result<Self, SimulationError> {
        Self::with_neighbour_query(size, params, BruteForce)
    }
}

impl<T, Q> Simulation<T, Q>
where
    Q: NeighbourQuery + Clone,
{
    /// Creates an empty simulation that answers radius queries with `query`.
    /// One copy indexes the boid roster, another the enemy roster.
    pub fn with_neighbour_query(
        size: Vector3,
        params: SimulationParams,
        query: Q,
    ) -> Result<Self, SimulationError> {
        validate_size(size)?;
        params.validate()?;

        log::debug!(
            "Creating simulation: size <{}, {}, {}>, neighbour query {}",
            size.x,
            size.y,
            size.z,
            query.name()
        );

        Ok(Self {
            boids: BTreeMap::new(),
            enemies: BTreeMap::new(),
            size,
            boundary: BoundaryPolicy::default(),
            params,
            next_id: 0,
            steps: 0,
            enemy_query: query.clone(),
            boid_query: query,
            boid_snapshot: Vec::new(),
            enemy_snapshot: Vec::new(),
        })
    }
}

impl<T, Q> Simulation<T, Q>
where
    Q: NeighbourQuery,
{
    /// Adds a steerable boid.
    pub fn create_boid(&mut self, position: Vector3, velocity: Vector3, payload: T) -> AgentId {
        self.insert(AgentKind::Boid, position, velocity, payload)
    }

    /// Adds a boid that flocks with nobody but is seen by others as a
    /// neighbour. Its state is driven externally, e.g. by a gesture.
    pub fn create_touch_boid(&mut self, position: Vector3, payload: T) -> AgentId {
        self.insert(AgentKind::TouchBoid, position, Vector3::zero(), payload)
    }

    /// Adds an externally driven enemy that boids fear.
    pub fn create_touch_enemy(&mut self, position: Vector3, payload: T) -> AgentId {
        self.insert(AgentKind::TouchEnemy, position, Vector3::zero(), payload)
    }

    /// Adds a steerable boid at a uniformly random point of the world box,
    /// heading in a random direction at up to `max_speed`.
    #[cfg(feature = "std")]
    pub fn spawn_boid<R: Rng + ?Sized>(&mut self, rng: &mut R, payload: T) -> AgentId {
        let position = Vector3::new(
            rng.gen_range(0.0..=self.size.x),
            rng.gen_range(0.0..=self.size.y),
            rng.gen_range(0.0..=self.size.z),
        );
        let heading = Vector3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            if self.size.z > 0.0 { rng.gen_range(-1.0..=1.0) } else { 0.0 },
        )
        .normalize();
        let speed = rng.gen_range(0.0..=self.params.max_speed);

        self.create_boid(position, heading * speed, payload)
    }

    fn insert(
        &mut self,
        kind: AgentKind,
        position: Vector3,
        velocity: Vector3,
        payload: T,
    ) -> AgentId {
        let id = AgentId::new(self.next_id);
        self.next_id += 1;

        let agent = Agent::new(id, kind, position, velocity, payload);
        if kind.is_enemy() {
            self.enemies.insert(id, agent);
        } else {
            self.boids.insert(id, agent);
        }

        log::debug!("Created {:?} {}", kind, id.raw());
        id
    }

    /// Removes an agent from whichever roster holds it. Unknown ids are ignored.
    ///
    /// The id is also dropped from every other agent's neighbour and enemy
    /// lists, so nothing refers to the removed agent afterwards.
    pub fn remove_boid(&mut self, id: AgentId) -> Option<Agent<T>> {
        let removed = self.boids.remove(&id).or_else(|| self.enemies.remove(&id))?;

        for agent in self.boids.values_mut() {
            agent.forget(id);
        }
        log::debug!("Removed {:?} {}", removed.kind(), id.raw());

        Some(removed)
    }

    /// Advances every steerable boid by `delta_t` seconds.
    ///
    /// Both rosters are snapshotted first, so every boid's neighbours, enemies
    /// and steering are computed from positions as they were at the start of
    /// the step. A zero `delta_t` does nothing; a negative, non-finite or
    /// too large for `f32` one is rejected without touching any agent.
    pub fn step_simulation(&mut self, delta_t: f64) -> Result<(), SimulationError> {
        if !delta_t.is_finite() || delta_t < 0.0 || delta_t > f32::MAX as f64 {
            log::warn!("Rejecting step with delta_t {}", delta_t);
            return Err(SimulationError::InvalidTimeStep(delta_t));
        }
        if delta_t == 0.0 {
            return Ok(());
        }
        let dt = delta_t as f32;

        self.boid_snapshot.clear();
        self.boid_snapshot
            .extend(self.boids.values().map(Agent::kinematics));
        self.enemy_snapshot.clear();
        self.enemy_snapshot
            .extend(self.enemies.values().map(Agent::kinematics));
        self.boid_query.rebuild(&self.boid_snapshot);
        self.enemy_query.rebuild(&self.enemy_snapshot);

        let params = self.params;
        let neighbour_radius = params.neighbour_radius();
        let mut hits = Vec::new();
        let mut neighbours = Vec::new();
        let mut enemies = Vec::new();
        let mut stepped = 0usize;

        // Snapshot slot i belongs to the i-th boid in roster order.
        for (slot, agent) in self.boids.values_mut().enumerate() {
            if !agent.is_steerable() {
                agent.clear_perception();
                continue;
            }
            let me = self.boid_snapshot[slot];

            self.boid_query.query(
                &self.boid_snapshot,
                me.position,
                neighbour_radius,
                Some(me.id),
                &mut hits,
            );
            hits.sort_unstable();
            neighbours.clear();
            neighbours.extend(hits.iter().map(|&i| self.boid_snapshot[i]));

            self.enemy_query.query(
                &self.enemy_snapshot,
                me.position,
                params.perception_distance,
                Some(me.id),
                &mut hits,
            );
            hits.sort_unstable();
            enemies.clear();
            enemies.extend(hits.iter().map(|&i| self.enemy_snapshot[i]));

            agent.set_perception(&neighbours, &enemies);
            agent.step_simulation(&neighbours, &enemies, &params, dt);
            self.boundary
                .apply(self.size, &mut agent.position, &mut agent.velocity);
            stepped += 1;
        }

        self.steps += 1;
        log::trace!(
            "Step {}: dt {}, {} boids stepped, {} enemies",
            self.steps,
            dt,
            stepped,
            self.enemies.len()
        );
        Ok(())
    }

    /// Neighbours found for `id` in the most recent step, in roster order.
    ///
    /// The iterator is lazy and can be restarted by calling this again. It is
    /// empty for unknown ids, enemies and non-steerable boids.
    pub fn neighbours_of(&self, id: AgentId) -> impl Iterator<Item = &Agent<T>> + '_ {
        self.boids
            .get(&id)
            .map(|agent| agent.neighbours())
            .unwrap_or(&[])
            .iter()
            .filter_map(move |n| self.boids.get(n))
    }

    /// Calls `visitor` with each neighbour of `id` and returns how many were visited.
    pub fn visit_neighbours_for_boid<F>(&self, id: AgentId, mut visitor: F) -> usize
    where
        F: FnMut(&Agent<T>),
    {
        let mut visited = 0;
        for neighbour in self.neighbours_of(id) {
            visitor(neighbour);
            visited += 1;
        }
        visited
    }

    /// Enemies found for `id` in the most recent step, in roster order.
    pub fn enemies_of(&self, id: AgentId) -> impl Iterator<Item = &Agent<T>> + '_ {
        self.boids
            .get(&id)
            .map(|agent| agent.enemies())
            .unwrap_or(&[])
            .iter()
            .filter_map(move |e| self.enemies.get(e))
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent<T>> {
        self.boids.get(&id).or_else(|| self.enemies.get(&id))
    }

    /// Mutable access for the input layer. Only call between steps.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent<T>> {
        match self.boids.get_mut(&id) {
            Some(agent) => Some(agent),
            None => self.enemies.get_mut(&id),
        }
    }

    /// Boid roster (steerable and touch boids) in creation order
    pub fn boids(&self) -> impl Iterator<Item = &Agent<T>> + '_ {
        self.boids.values()
    }

    /// Enemy roster in creation order
    pub fn enemies(&self) -> impl Iterator<Item = &Agent<T>> + '_ {
        self.enemies.values()
    }

    pub fn boid_count(&self) -> usize {
        self.boids.len()
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    /// Number of non-empty steps taken so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn size(&self) -> Vector3 {
        self.size
    }

    pub fn set_size(&mut self, size: Vector3) -> Result<(), SimulationError> {
        validate_size(size)?;
        log::debug!("World size set to <{}, {}, {}>", size.x, size.y, size.z);
        self.size = size;
        Ok(())
    }

    pub fn boundary(&self) -> BoundaryPolicy {
        self.boundary
    }

    pub fn set_boundary(&mut self, boundary: BoundaryPolicy) {
        log::debug!("Boundary policy set to {:?}", boundary);
        self.boundary = boundary;
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Replaces the parameters, effective from the next step. Invalid
    /// parameters are rejected and the previous ones kept.
    pub fn set_params(&mut self, params: SimulationParams) -> Result<(), SimulationError> {
        params.validate()?;
        log::debug!("Simulation params updated: {:?}", params);
        self.params = params;
        Ok(())
    }

    /// Edits a copy of the parameters and commits it only if it validates.
    pub fn update_params<F>(&mut self, edit: F) -> Result<(), SimulationError>
    where
        F: FnOnce(&mut SimulationParams),
    {
        let mut params = self.params;
        edit(&mut params);
        self.set_params(params)
    }
}
