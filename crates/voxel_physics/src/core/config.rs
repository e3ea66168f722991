//! # Simulation Configuration
//!
//! Tunables for the integrator, the broad-phase grid and the pathfinder,
//! grouped the same way the subsystems are. Every default matches the
//! behaviour the game shipped with.
//!
//! ## Configuration Categories
//!
//! - **Physics Config**: gravity, substep size, speed cap, broad-phase grid
//! - **Pathfinding Config**: step length, arrival threshold, step budget
//! - **Simulation Config**: both of the above plus the log filter

use serde::{Serialize, Deserialize};

use crate::config::Config;
use crate::physics::error::PhysicsError;

/// Default downward acceleration (units/s²)
pub const GRAVITY: f32 = -9.81;

/// Largest slice of simulated time per substep (seconds)
pub const MAX_TIME_STEP: f32 = 0.02;

/// Speed cap applied after gravity and drag (units/s)
pub const MAX_VELOCITY: f32 = 50.0;

/// # Physics Configuration
///
/// Integrator constants and broad-phase grid sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Vertical acceleration applied to bodies that use gravity
    pub gravity: f32,
    /// Maximum simulated time per substep
    pub max_time_step: f32,
    /// Speed cap
    pub max_velocity: f32,
    /// Edge length of a broad-phase grid cell
    pub grid_cell_size: f32,
    /// Integrate entities on the rayon thread pool
    pub parallel: bool,
}

impl PhysicsConfig {
    /// Create a configuration with the default constants
    pub fn new() -> Self {
        Self {
            gravity: GRAVITY,
            max_time_step: MAX_TIME_STEP,
            max_velocity: MAX_VELOCITY,
            grid_cell_size: 4.0,
            parallel: cfg!(feature = "parallel"),
        }
    }

    /// Set gravity
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the maximum substep length
    pub fn with_max_time_step(mut self, max_time_step: f32) -> Self {
        self.max_time_step = max_time_step;
        self
    }

    /// Set the speed cap
    pub fn with_max_velocity(mut self, max_velocity: f32) -> Self {
        self.max_velocity = max_velocity;
        self
    }

    /// Set the broad-phase cell size
    pub fn with_grid_cell_size(mut self, cell_size: f32) -> Self {
        self.grid_cell_size = cell_size;
        self
    }

    /// Enable or disable parallel integration
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !(self.max_time_step > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "max_time_step must be positive, got {}",
                self.max_time_step
            )));
        }
        if !(self.max_velocity > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "max_velocity must be positive, got {}",
                self.max_velocity
            )));
        }
        if !(self.grid_cell_size > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "grid_cell_size must be positive, got {}",
                self.grid_cell_size
            )));
        }
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig("gravity must be finite".to_string()));
        }
        Ok(())
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Pathfinding Configuration
///
/// Bounds for the greedy straight-line pathfinder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfindingConfig {
    /// Distance covered by each step
    pub step_length: f32,
    /// Stop once the target is this close
    pub arrival_threshold: f32,
    /// Hard cap on the number of steps
    pub max_steps: usize,
}

impl PathfindingConfig {
    /// Create a configuration with the default bounds
    pub fn new() -> Self {
        Self {
            step_length: 0.5,
            arrival_threshold: 0.5,
            max_steps: 100,
        }
    }

    /// Set the step length
    pub fn with_step_length(mut self, step_length: f32) -> Self {
        self.step_length = step_length;
        self
    }

    /// Set the step budget
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !(self.step_length > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "step_length must be positive, got {}",
                self.step_length
            )));
        }
        if self.arrival_threshold < 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "arrival_threshold must not be negative, got {}",
                self.arrival_threshold
            )));
        }
        Ok(())
    }
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Simulation Configuration
///
/// Top-level configuration loaded by hosts from TOML or RON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Default log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Integrator settings
    pub physics: PhysicsConfig,
    /// Pathfinder settings
    pub pathfinding: PathfindingConfig,
}

impl SimulationConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            physics: PhysicsConfig::default(),
            pathfinding: PathfindingConfig::default(),
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), PhysicsError> {
        self.physics.validate()?;
        self.pathfinding.validate()?;
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for SimulationConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_defaults_match_constants() {
        let config = SimulationConfig::default();
        assert_eq!(config.physics.gravity, -9.81);
        assert_eq!(config.physics.max_time_step, 0.02);
        assert_eq!(config.physics.max_velocity, 50.0);
        assert_eq!(config.pathfinding.step_length, 0.5);
        assert_eq!(config.pathfinding.arrival_threshold, 0.5);
        assert_eq!(config.pathfinding.max_steps, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(PhysicsConfig::new().with_max_time_step(0.0).validate().is_err());
        assert!(PhysicsConfig::new().with_max_velocity(-1.0).validate().is_err());
        assert!(PhysicsConfig::new().with_grid_cell_size(f32::NAN).validate().is_err());
        assert!(PhysicsConfig::new().with_gravity(f32::INFINITY).validate().is_err());
        assert!(PathfindingConfig::new().with_step_length(0.0).validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("physics.toml");
        let path = path.to_str().unwrap();

        let mut config = SimulationConfig::default();
        config.physics = config.physics.with_gravity(-20.0).with_parallel(false);
        config.pathfinding = config.pathfinding.with_max_steps(32);
        config.save_to_file(path).unwrap();

        let loaded = SimulationConfig::load_from_file(path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("physics.ron");
        std::fs::write(&path, "(physics: (gravity: -3.5))").unwrap();

        let loaded = SimulationConfig::load_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.physics.gravity, -3.5);
        assert_eq!(loaded.physics.max_time_step, MAX_TIME_STEP);
        assert_eq!(loaded.pathfinding, PathfindingConfig::default());
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let result = SimulationConfig::load_from_file("physics.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_)) | Err(ConfigError::UnsupportedFormat(_))));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("physics.json");
        std::fs::write(&path, "{}").unwrap();
        let result = SimulationConfig::load_from_file(path.to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
