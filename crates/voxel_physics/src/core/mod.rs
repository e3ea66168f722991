//! # Core Module
//!
//! Shared configuration for every physics subsystem.
//!
//! ## Organization
//!
//! - **Config**: simulation, integrator and pathfinder settings

pub mod config;

pub use config::{
    PhysicsConfig,
    PathfindingConfig,
    SimulationConfig,
    GRAVITY,
    MAX_TIME_STEP,
    MAX_VELOCITY,
};
pub use crate::config::{Config, ConfigError};
