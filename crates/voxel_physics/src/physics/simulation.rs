//! Per-tick physics scheduler
//!
//! One tick runs in three phases:
//!
//! 1. Snapshot every collider from the registry and build a broad-phase grid
//! 2. Integrate each dynamic entity against that snapshot (on the rayon pool
//!    when enabled); no entity sees another's mid-tick position
//! 3. Commit positions and rigidbody state back to the world
//!
//! Entity-bound colliders read their position from the world, so after the
//! commit the registry reflects the new positions without any extra work.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::config::PhysicsConfig;
use crate::ecs::{Entity, World};
use crate::foundation::math::Vec3;
use crate::physics::collider_registry::{ColliderAnchor, ColliderDesc, ColliderHandle, ColliderRegistry};
use crate::physics::error::PhysicsError;
use crate::physics::rigidbody::{integrate, substeps, BodyCollider, ContactWorld, RigidbodyState};
use crate::spatial::SpatialGrid;

/// Outcome of one simulation tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Substeps each body was advanced by
    pub substeps: u32,
    /// Number of bodies integrated
    pub simulated: usize,
    /// Bodies skipped this tick and why
    pub skipped: Vec<(Entity, PhysicsError)>,
}

impl StepReport {
    /// True when no body was skipped
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Offset of a body's collider from its entity.
///
/// Only a collider anchored to the body's own entity moves with the body.
fn attachment_offset(entity: Entity, handle: ColliderHandle, desc: &ColliderDesc) -> Result<Vec3, PhysicsError> {
    match desc.anchor {
        ColliderAnchor::Entity { entity: owner, offset } if owner == entity => Ok(offset),
        _ => Err(PhysicsError::ColliderNotAttached(handle)),
    }
}

/// One body's work item, owned by whichever thread integrates it
#[derive(Debug, Clone)]
struct BodyJob {
    entity: Entity,
    body: RigidbodyState,
    position: Vec3,
    collider: BodyCollider,
}

/// Drives rigidbody integration for a [`World`]
#[derive(Debug, Clone, Default)]
pub struct PhysicsSimulation {
    config: PhysicsConfig,
}

impl PhysicsSimulation {
    /// Create a simulation with a validated configuration
    pub fn new(config: PhysicsConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Advance every dynamic entity by `delta_time` seconds.
    ///
    /// Entities that cannot be simulated (no collider, a collider the
    /// registry no longer knows, or one not anchored to the entity) are left
    /// untouched for this tick and listed in the report.
    pub fn step(&self, world: &mut World, registry: &ColliderRegistry, delta_time: f32) -> StepReport {
        let (steps, _) = substeps(delta_time, self.config.max_time_step);
        let mut report = StepReport {
            substeps: steps,
            ..StepReport::default()
        };
        if steps == 0 {
            log::debug!("Physics tick skipped: delta time {delta_time}");
            return report;
        }

        let snapshot = registry.get_all(&*world);
        let grid = SpatialGrid::from_snapshot(&snapshot, self.config.grid_cell_size);
        let contacts = ContactWorld {
            colliders: &snapshot,
            broad_phase: &grid,
        };

        let mut jobs = Vec::new();
        for (entity, body) in world.dynamic_entities() {
            match Self::prepare(world, registry, entity, body) {
                Ok(job) => jobs.push(job),
                Err(err) => {
                    log::warn!("Skipping physics for {entity:?}: {err}");
                    report.skipped.push((entity, err));
                }
            }
        }

        let results = self.integrate_all(jobs, &contacts, delta_time);
        report.simulated = results.len();

        for job in results {
            if let Some(transform) = world.transform_mut(job.entity) {
                transform.position = job.position;
            }
            if let Some(body) = world.rigidbody_mut(job.entity) {
                *body = job.body;
            }
        }

        log::debug!(
            "Physics tick: dt {delta_time:.4}s, {steps} substeps, {} bodies, {} colliders, {} skipped",
            report.simulated,
            snapshot.len(),
            report.skipped.len()
        );
        report
    }

    fn prepare(
        world: &World,
        registry: &ColliderRegistry,
        entity: Entity,
        body: &RigidbodyState,
    ) -> Result<BodyJob, PhysicsError> {
        let handle = world.collider(entity).ok_or(PhysicsError::MissingCollider(entity))?;
        let desc = registry.describe(handle).ok_or(PhysicsError::ColliderNotFound(handle))?;
        let position = world
            .transform(entity)
            .map(|t| t.position)
            .ok_or(PhysicsError::MissingEntity(entity))?;

        let offset = attachment_offset(entity, handle, &desc)?;

        Ok(BodyJob {
            entity,
            body: body.clone(),
            position,
            collider: BodyCollider {
                handle,
                size: desc.size,
                offset,
            },
        })
    }

    fn run(&self, mut job: BodyJob, contacts: &ContactWorld<'_>, delta_time: f32) -> BodyJob {
        integrate(
            &mut job.body,
            &mut job.position,
            &job.collider,
            contacts,
            &self.config,
            delta_time,
        );
        job
    }

    fn integrate_all(&self, jobs: Vec<BodyJob>, contacts: &ContactWorld<'_>, delta_time: f32) -> Vec<BodyJob> {
        #[cfg(feature = "parallel")]
        {
            if self.config.parallel {
                return jobs
                    .into_par_iter()
                    .map(|job| self.run(job, contacts, delta_time))
                    .collect();
            }
        }

        jobs.into_iter()
            .map(|job| self.run(job, contacts, delta_time))
            .collect()
    }
}
