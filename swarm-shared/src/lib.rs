#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// What happens to boids leaving the world box
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    #[default]
    Unbounded,
    Wrap,
    Contain,
}

/// Rule weights and limits
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleSettings {
    pub desired_separation: f32,
    pub max_acceleration: f32,
    pub max_speed: f32,
    pub perception_distance: f32,
    pub cohesion: f32,
    pub separation: f32,
    pub alignment: f32,
    pub fear: f32,
}

impl Default for RuleSettings {
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

/// Full description of a run: world, rules and initial population
///
/// Every field has a default, so a settings document only needs the values
/// it wants to change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SwarmSettings {
    pub world_size: [f32; 3],
    pub boundary: Boundary,
    pub rules: RuleSettings,
    pub boid_count: usize,
    pub enemy_count: usize,
    /// Seconds per step
    pub time_step: f64,
    pub seed: u64,
}

impl Default for SwarmSettings {
    fn default() -> Self {
        Self {
            world_size: [800.0, 600.0, 200.0],
            boundary: Boundary::Wrap,
            rules: RuleSettings::default(),
            boid_count: 100,
            enemy_count: 1,
            time_step: 1.0 / 60.0,
            seed: 0,
        }
    }
}

#[cfg(feature = "std")]
impl SwarmSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Role of an agent in a frame
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Boid,
    TouchBoid,
    TouchEnemy,
}

/// One agent's state as read by a renderer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentSnapshot {
    pub id: u64,
    pub role: AgentRole,
    pub label: String,
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub neighbours: usize,
}

/// Every agent's state after a step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameSnapshot {
    pub step: u64,
    /// Simulated seconds since the start of the run
    pub elapsed: f64,
    pub agents: Vec<AgentSnapshot>,
}

impl FrameSnapshot {
    pub fn with_role(&self, role: AgentRole) -> impl Iterator<Item = &AgentSnapshot> + '_ {
        self.agents.iter().filter(move |a| a.role == role)
    }

    /// Mean position of the agents with `role`, if there are any
    pub fn centroid(&self, role: AgentRole) -> Option<[f32; 3]> {
        let mut sum = [0.0f32; 3];
        let mut count = 0;
        for agent in self.with_role(role) {
            for (s, p) in sum.iter_mut().zip(agent.position) {
                *s += p;
            }
            count += 1;
        }

        if count == 0 {
            return None;
        }
        Some(sum.map(|s| s / count as f32))
    }
}

#[cfg(feature = "std")]
impl FrameSnapshot {
    /// Single-line JSON, for JSON-lines output
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: u64, role: AgentRole, position: [f32; 3]) -> AgentSnapshot {
        AgentSnapshot {
            id,
            role,
            label: format!("agent-{}", id),
            position,
            velocity: [0.0; 3],
            neighbours: 0,
        }
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings = SwarmSettings::from_json(
            r#"{ "boid_count": 12, "boundary": "contain", "rules": { "fear": 9.0 } }"#,
        )
        .unwrap();

        assert_eq!(settings.boid_count, 12);
        assert_eq!(settings.boundary, Boundary::Contain);
        assert_eq!(settings.rules.fear, 9.0);
        assert_eq!(settings.rules.cohesion, RuleSettings::default().cohesion);
        assert_eq!(settings.world_size, SwarmSettings::default().world_size);
    }

    #[test]
    fn test_unknown_boundary_rejected() {
        assert!(SwarmSettings::from_json(r#"{ "boundary": "bounce" }"#).is_err());
    }

    #[test]
    fn test_frame_centroid() {
        let frame = FrameSnapshot {
            step: 1,
            elapsed: 0.5,
            agents: vec![
                agent(0, AgentRole::Boid, [0.0, 0.0, 0.0]),
                agent(1, AgentRole::Boid, [2.0, 4.0, 6.0]),
                agent(2, AgentRole::TouchEnemy, [100.0, 100.0, 100.0]),
            ],
        };

        assert_eq!(frame.centroid(AgentRole::Boid), Some([1.0, 2.0, 3.0]));
        assert_eq!(frame.centroid(AgentRole::TouchBoid), None);
        assert_eq!(frame.with_role(AgentRole::TouchEnemy).count(), 1);
    }

    #[test]
    fn test_frame_json_line_has_no_newlines() {
        let frame = FrameSnapshot {
            step: 3,
            elapsed: 0.05,
            agents: vec![agent(7, AgentRole::TouchBoid, [1.0, 2.0, 3.0])],
        };

        let line = frame.to_json_line().unwrap();

        assert!(!line.contains('\n'));
        assert!(line.contains("\"touch_boid\""));
    }
}
