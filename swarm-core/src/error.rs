//! Errors returned by the simulation.
//!
//! Nothing in a normal step fails; these only report configuration or
//! caller contract violations, rejected before any state changes.

use core::fmt;

use crate::vector::Vector3;

/// Errors that can occur when configuring or stepping a simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimulationError {
    /// A weight, radius, speed or acceleration was negative or not finite.
    InvalidParameter { name: &'static str, value: f32 },
    /// A world extent was negative or not finite.
    InvalidSize(Vector3),
    /// The elapsed time for a step was negative, not finite, or too large for `f32`.
    InvalidTimeStep(f64),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidParameter { name, value } => {
                write!(
                    f,
                    "Invalid simulation parameter `{}`: {} (must be finite and non-negative)",
                    name, value
                )
            }
            SimulationError::InvalidSize(size) => write!(
                f,
                "Invalid world size <{}, {}, {}> (extents must be finite and non-negative)",
                size.x, size.y, size.z
            ),
            SimulationError::InvalidTimeStep(dt) => {
                write!(f, "Invalid time step {} (must be finite, non-negative and fit in f32)", dt)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SimulationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_parameter() {
        let err = SimulationError::InvalidParameter {
            name: "max_speed",
            value: -1.0,
        };
        let message = err.to_string();
        assert!(message.contains("max_speed"));
        assert!(message.contains("-1"));
    }
}
