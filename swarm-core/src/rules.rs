//! Steering rules.
//!
//! Each rule returns a direction: a unit vector, or zero when the rule has
//! nothing to react to. [`steering`] weights and sums all four, so an idle
//! rule still takes part in the sum as a zero term.

use crate::neighbours::Kinematics;
use crate::params::SimulationParams;
use crate::vector::Vector3;

/// The four rule directions for one agent, before weighting
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RuleContributions {
    pub cohesion: Vector3,
    pub separation: Vector3,
    pub alignment: Vector3,
    pub fear: Vector3,
}

impl RuleContributions {
    pub fn compute(
        me: &Kinematics,
        neighbours: &[Kinematics],
        enemies: &[Kinematics],
        params: &SimulationParams,
    ) -> Self {
        Self {
            cohesion: cohesion(me, neighbours, params.perception_distance),
            separation: separation(me, neighbours, params.desired_separation),
            alignment: alignment(me, neighbours, params.perception_distance),
            fear: fear(me, enemies, params.perception_distance),
        }
    }

    pub fn weighted_sum(&self, params: &SimulationParams) -> Vector3 {
        self.cohesion * params.cohesion
            + self.separation * params.separation
            + self.alignment * params.alignment
            + self.fear * params.fear
    }
}

/// Net steering request for `me`, not yet clamped to `max_acceleration`.
pub fn steering(
    me: &Kinematics,
    neighbours: &[Kinematics],
    enemies: &[Kinematics],
    params: &SimulationParams,
) -> Vector3 {
    RuleContributions::compute(me, neighbours, enemies, params).weighted_sum(params)
}

/// Toward the centroid of the neighbours within `perception_distance`.
pub fn cohesion<'a, I>(me: &Kinematics, neighbours: I, perception_distance: f32) -> Vector3
where
    I: IntoIterator<Item = &'a Kinematics>,
{
    let mut sum = Vector3::zero();
    let mut count = 0;

    for other in within(me.position, neighbours, perception_distance) {
        sum += other.position;
        count += 1;
    }

    if count > 0 {
        let centroid = sum / count as f32;
        (centroid - me.position).normalize()
    } else {
        Vector3::zero()
    }
}

/// Away from every neighbour strictly closer than `desired_separation`,
/// each push scaled by the inverse of its distance.
pub fn separation<'a, I>(me: &Kinematics, neighbours: I, desired_separation: f32) -> Vector3
where
    I: IntoIterator<Item = &'a Kinematics>,
{
    let mut steering = Vector3::zero();

    for other in neighbours {
        let distance = me.position.distance(&other.position);
        if distance < desired_separation {
            steering += repulsion(me.position, other.position, distance);
        }
    }

    steering.normalize()
}

/// Toward the mean velocity of the neighbours within `perception_distance`.
pub fn alignment<'a, I>(me: &Kinematics, neighbours: I, perception_distance: f32) -> Vector3
where
    I: IntoIterator<Item = &'a Kinematics>,
{
    let mut sum = Vector3::zero();
    let mut count = 0;

    for other in within(me.position, neighbours, perception_distance) {
        sum += other.velocity;
        count += 1;
    }

    if count > 0 {
        (sum / count as f32).normalize()
    } else {
        Vector3::zero()
    }
}

/// Away from every enemy within `perception_distance`, inversely scaled by distance.
pub fn fear<'a, I>(me: &Kinematics, enemies: I, perception_distance: f32) -> Vector3
where
    I: IntoIterator<Item = &'a Kinematics>,
{
    let mut steering = Vector3::zero();

    for enemy in enemies {
        let distance = me.position.distance(&enemy.position);
        if distance <= perception_distance {
            steering += repulsion(me.position, enemy.position, distance);
        }
    }

    steering.normalize()
}

fn within<'a, I>(origin: Vector3, others: I, radius: f32) -> impl Iterator<Item = &'a Kinematics>
where
    I: IntoIterator<Item = &'a Kinematics>,
{
    let radius_sq = radius * radius;
    others
        .into_iter()
        .filter(move |other| origin.distance_squared(&other.position) <= radius_sq)
}

// Co-located agents have no direction to push along.
fn repulsion(from: Vector3, source: Vector3, distance: f32) -> Vector3 {
    if distance > 0.0 {
        (from - source).normalize() / distance
    } else {
        Vector3::zero()
    }
}
