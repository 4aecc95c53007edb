use crate::error::SimulationError;
use crate::vector::{math, Vector3};

/// Tunable parameters for the flocking rules
///
/// All values must be finite and non-negative; see [`SimulationParams::validate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    pub desired_separation: f32,
    pub max_acceleration: f32,
    pub max_speed: f32,
    pub perception_distance: f32,
    pub cohesion: f32,
    pub separation: f32,
    pub alignment: f32,
    pub fear: f32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            desired_separation: 15.0,
            max_acceleration: 40.0,
            max_speed: 60.0,
            perception_distance: 50.0,
            cohesion: 1.0,
            separation: 1.5,
            alignment: 1.0,
            fear: 3.0,
        }
    }
}

impl SimulationParams {
    /// Params with every rule weight set to zero
    pub fn without_rules(self) -> Self {
        Self {
            cohesion: 0.0,
            separation: 0.0,
            alignment: 0.0,
            fear: 0.0,
            ..self
        }
    }

    /// Radius of the boid-roster query: wide enough for every rule that uses it.
    pub fn neighbour_radius(&self) -> f32 {
        self.perception_distance.max(self.desired_separation)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        let fields = [
            ("desired_separation", self.desired_separation),
            ("max_acceleration", self.max_acceleration),
            ("max_speed", self.max_speed),
            ("perception_distance", self.perception_distance),
            ("cohesion", self.cohesion),
            ("separation", self.separation),
            ("alignment", self.alignment),
            ("fear", self.fear),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

/// What happens to a steerable boid that leaves the world box `[0, size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Positions are never constrained
    #[default]
    Unbounded,
    /// Leaving one face re-enters through the opposite face
    Wrap,
    /// Position is clamped to the box and the outward velocity component reflected
    Contain,
}

impl BoundaryPolicy {
    pub(crate) fn apply(self, size: Vector3, position: &mut Vector3, velocity: &mut Vector3) {
        match self {
            BoundaryPolicy::Unbounded => {}
            BoundaryPolicy::Wrap => {
                wrap_axis(&mut position.x, size.x);
                wrap_axis(&mut position.y, size.y);
                wrap_axis(&mut position.z, size.z);
            }
            BoundaryPolicy::Contain => {
                contain_axis(&mut position.x, &mut velocity.x, size.x);
                contain_axis(&mut position.y, &mut velocity.y, size.y);
                contain_axis(&mut position.z, &mut velocity.z, size.z);
            }
        }
    }
}

// A zero extent leaves the axis unconstrained so flat (2D) worlds keep working.
fn wrap_axis(position: &mut f32, extent: f32) {
    if extent > 0.0 {
        *position = math::rem_euclid(*position, extent);
    }
}

fn contain_axis(position: &mut f32, velocity: &mut f32, extent: f32) {
    if extent <= 0.0 {
        return;
    }
    if *position < 0.0 {
        *position = 0.0;
        *velocity = math::abs(*velocity);
    } else if *position > extent {
        *position = extent;
        *velocity = -math::abs(*velocity);
    }
}

pub(crate) fn validate_size(size: Vector3) -> Result<(), SimulationError> {
    let ok = |v: f32| v.is_finite() && v >= 0.0;
    if ok(size.x) && ok(size.y) && ok(size.z) {
        Ok(())
    } else {
        Err(SimulationError::InvalidSize(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        assert!(SimulationParams::default().validate().is_ok());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let params = SimulationParams {
            fear: -0.5,
            ..SimulationParams::default()
        };
        assert_eq!(
            params.validate(),
            Err(SimulationError::InvalidParameter {
                name: "fear",
                value: -0.5
            })
        );
    }

    #[test]
    fn test_nan_radius_rejected() {
        let params = SimulationParams {
            perception_distance: f32::NAN,
            ..SimulationParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(SimulationError::InvalidParameter {
                name: "perception_distance",
                ..
            })
        ));
    }

    #[test]
    fn test_neighbour_radius_covers_separation() {
        let params = SimulationParams {
            perception_distance: 5.0,
            desired_separation: 8.0,
            ..SimulationParams::default()
        };
        assert_eq!(params.neighbour_radius(), 8.0);
    }

    #[test]
    fn test_wrap_policy() {
        let size = Vector3::new(100.0, 100.0, 0.0);
        let mut position = Vector3::new(-1.0, 101.0, 7.0);
        let mut velocity = Vector3::new(1.0, 1.0, 1.0);

        BoundaryPolicy::Wrap.apply(size, &mut position, &mut velocity);

        assert_eq!(position, Vector3::new(99.0, 1.0, 7.0));
        assert_eq!(velocity, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_contain_policy_reflects_velocity() {
        let size = Vector3::new(100.0, 100.0, 100.0);
        let mut position = Vector3::new(-5.0, 50.0, 120.0);
        let mut velocity = Vector3::new(-2.0, 3.0, 4.0);

        BoundaryPolicy::Contain.apply(size, &mut position, &mut velocity);

        assert_eq!(position, Vector3::new(0.0, 50.0, 100.0));
        assert_eq!(velocity, Vector3::new(2.0, 3.0, -4.0));
    }

    #[test]
    fn test_unbounded_policy_is_identity() {
        let mut position = Vector3::new(-500.0, 0.0, 1.0e6);
        let mut velocity = Vector3::new(-1.0, 0.0, 0.0);
        BoundaryPolicy::Unbounded.apply(Vector3::new(1.0, 1.0, 1.0), &mut position, &mut velocity);
        assert_eq!(position, Vector3::new(-500.0, 0.0, 1.0e6));
    }

    #[test]
    fn test_validate_size() {
        assert!(validate_size(Vector3::new(10.0, 10.0, 0.0)).is_ok());
        assert!(validate_size(Vector3::new(10.0, -1.0, 0.0)).is_err());
        assert!(validate_size(Vector3::new(f32::INFINITY, 1.0, 0.0)).is_err());
    }
}
