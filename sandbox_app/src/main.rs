//! Headless drop demo
//!
//! Builds a bumpy voxel terrain, drops a handful of crates onto it and runs
//! the physics tick for a few simulated seconds. Afterwards a scout fires a
//! few rays across the terrain and plans a straight-line walk to a beacon.
//!
//! Pass a `.toml` or `.ron` file as the first argument to override the
//! simulation settings. Set `RUST_LOG=debug` for per-tick output.

use rand::{rngs::StdRng, Rng, SeedableRng};
use thiserror::Error;
use voxel_physics::foundation::logging;
use voxel_physics::prelude::*;

const TERRAIN_RADIUS: i32 = 8;
const CRATE_COUNT: usize = 12;
const FRAME_TIME: f32 = 1.0 / 60.0;
const SIMULATED_SECONDS: f32 = 4.0;

#[derive(Error, Debug)]
enum DemoError {
    #[error("physics: {0}")]
    Physics(#[from] PhysicsError),

    #[error("configuration: {0}")]
    Config(#[from] voxel_physics::config::ConfigError),
}

struct DropDemo {
    registry: ColliderRegistry,
    world: World,
    simulation: PhysicsSimulation,
    pathfinding: PathfindingConfig,
    crates: Vec<Entity>,
    rng: StdRng,
}

impl DropDemo {
    fn new(config: SimulationConfig, seed: u64) -> Result<Self, DemoError> {
        config.validate()?;
        log::info!("Creating drop demo (seed {seed})");

        Ok(Self {
            registry: ColliderRegistry::new(),
            world: World::new(),
            simulation: PhysicsSimulation::new(config.physics)?,
            pathfinding: config.pathfinding,
            crates: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// One unit voxel column per cell, with a random height of 1 to 3
    fn build_terrain(&mut self) {
        let mut voxels = 0;
        for x in -TERRAIN_RADIUS..=TERRAIN_RADIUS {
            for z in -TERRAIN_RADIUS..=TERRAIN_RADIUS {
                let height = self.rng.gen_range(1..=3);
                for y in 0..height {
                    self.registry.register_fixed(
                        Vec3::new(x as f32, y as f32 - 2.5, z as f32),
                        Vec3::new(1.0, 1.0, 1.0),
                    );
                    voxels += 1;
                }
            }
        }
        log::info!("Terrain built: {voxels} voxels");
    }

    fn drop_crates(&mut self) {
        let extent = TERRAIN_RADIUS as f32 - 1.0;
        for _ in 0..CRATE_COUNT {
            let position = Vec3::new(
                self.rng.gen_range(-extent..extent),
                self.rng.gen_range(4.0..10.0),
                self.rng.gen_range(-extent..extent),
            );
            let body = RigidbodyState::new(self.rng.gen_range(0.5..3.0), 0.01);
            let entity = self
                .world
                .spawn_body(&self.registry, position, Vec3::new(0.8, 0.8, 0.8), body);
            self.crates.push(entity);
        }
        log::info!("Dropped {} crates", self.crates.len());
    }

    fn run(&mut self) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let frames = (SIMULATED_SECONDS / FRAME_TIME).round() as usize;

        for frame in 0..frames {
            let report = self.simulation.step(&mut self.world, &self.registry, FRAME_TIME);
            if !report.is_clean() {
                log::warn!("Frame {frame}: {} bodies skipped", report.skipped.len());
            }

            // Halfway through, shove every crate that has landed
            if frame == frames / 2 {
                for &entity in &self.crates {
                    if let Some(body) = self.world.rigidbody_mut(entity) {
                        if body.is_grounded {
                            body.add_force(Vec3::new(2.0, 0.0, 1.0));
                        }
                    }
                }
            }
        }

        let grounded = self
            .crates
            .iter()
            .filter(|&&entity| self.world.rigidbody(entity).is_some_and(|body| body.is_grounded))
            .count();
        log::info!("After {frames} frames: {grounded}/{} crates grounded", self.crates.len());

        for &entity in &self.crates {
            if let (Some(transform), Some(body)) = (self.world.transform(entity), self.world.rigidbody(entity)) {
                log::debug!(
                    "{entity:?}: position {:?}, speed {:.3}",
                    transform.position,
                    body.speed()
                );
            }
        }
    }

    fn survey(&self) {
        let scout = Vec3::new(0.0, 6.0, 0.0);
        for direction in [
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(1.0, -0.5, 0.0),
            Vec3::new(-1.0, -0.25, 1.0),
            Vec3::new(0.0, 1.0, 0.0),
        ] {
            match raycast::cast(&self.registry, &self.world, scout, direction, 30.0, None) {
                Some(hit) => log::info!(
                    "Ray {direction:?}: hit {:?} at {:.2} ({:?}), normal {:?}",
                    hit.collider,
                    hit.distance,
                    hit.point,
                    hit.normal
                ),
                None => log::info!("Ray {direction:?}: no hit"),
            }
        }

        let start = Vec3::new(-6.0, 2.0, -6.0);
        let beacon = Vec3::new(6.0, 2.0, 6.0);
        let snapshot = self.registry.get_all(&self.world);
        let mut path = find_path(start, beacon, Vec3::new(0.6, 1.8, 0.6), &snapshot, None, &self.pathfinding);
        log::info!("Path to beacon: {} waypoints, {:?}", path.len(), path.status);
        if let Some(first) = path.next_waypoint() {
            log::debug!("First waypoint {first:?}");
        }
    }

    fn cleanup(&mut self) {
        for entity in self.crates.drain(..) {
            if let Err(err) = self.world.despawn(entity, &self.registry) {
                log::warn!("Despawn failed: {err}");
            }
        }
        log::info!("Cleanup complete, {} static colliders left", self.registry.len());
        self.registry.clear();
    }
}

fn load_config(path: Option<&str>) -> Result<SimulationConfig, DemoError> {
    match path {
        Some(path) => Ok(SimulationConfig::load_from_file(path)?),
        None => Ok(SimulationConfig::default()),
    }
}

fn main() -> Result<(), DemoError> {
    let path = std::env::args().nth(1);
    let config = load_config(path.as_deref())?;

    // Logging starts after the config so its log_level can apply
    logging::init_with_level(&config.log_level);
    if let Some(path) = &path {
        log::info!("Loaded configuration from {path}");
    }

    let mut demo = DropDemo::new(config, 0x5EED)?;
    demo.build_terrain();
    demo.drop_crates();
    demo.run();
    demo.survey();
    demo.cleanup();

    Ok(())
}
