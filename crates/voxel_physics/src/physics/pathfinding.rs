//! Greedy straight-line pathfinder
//!
//! Walks from the start towards the target in fixed-length steps, checking
//! that an agent-sized box fits at each stepped-to position. The first step
//! that would overlap a collider ends construction. There is no backtracking
//! and no attempt to route around obstacles; callers that need a real planner
//! layer one on top and use this for short, direct moves.

use std::collections::VecDeque;

use crate::core::config::PathfindingConfig;
use crate::foundation::math::Vec3;
use crate::physics::collider_registry::{ColliderHandle, ResolvedCollider};
use crate::physics::collision::{intersects, AxisAlignedBox};

/// How path construction ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStatus {
    /// The last waypoint is within the arrival threshold of the target
    Reached,
    /// A step would have overlapped a collider
    Blocked,
    /// The step budget ran out first
    Truncated,
}

/// Waypoints from (but excluding) the start position
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Remaining waypoints, nearest first
    pub waypoints: VecDeque<Vec3>,
    /// How construction ended
    pub status: PathStatus,
}

impl Path {
    /// Pop the next waypoint, if any are left
    pub fn next_waypoint(&mut self) -> Option<Vec3> {
        self.waypoints.pop_front()
    }

    /// Peek at the next waypoint
    pub fn peek(&self) -> Option<&Vec3> {
        self.waypoints.front()
    }

    /// Last waypoint
    pub fn destination(&self) -> Option<&Vec3> {
        self.waypoints.back()
    }

    /// Number of remaining waypoints
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// True when no waypoints remain
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// True when construction ended at the target
    pub fn is_complete(&self) -> bool {
        self.status == PathStatus::Reached
    }
}

/// Build a straight-line path from `start` to `target` for an agent of
/// `agent_size`.
///
/// `ignore` excludes one collider, normally the agent's own.
pub fn find_path(
    start: Vec3,
    target: Vec3,
    agent_size: Vec3,
    colliders: &[ResolvedCollider],
    ignore: Option<ColliderHandle>,
    config: &PathfindingConfig,
) -> Path {
    let mut waypoints = VecDeque::new();
    let mut current = start;

    let status = loop {
        let to_target = target - current;
        let distance = to_target.norm();
        if distance <= config.arrival_threshold {
            break PathStatus::Reached;
        }
        if waypoints.len() >= config.max_steps || !(config.step_length > 0.0) {
            break PathStatus::Truncated;
        }

        let next = current + to_target * (config.step_length.min(distance) / distance);
        let agent = AxisAlignedBox::new(next, agent_size);
        let blocked = colliders
            .iter()
            .filter(|collider| Some(collider.handle) != ignore)
            .any(|collider| intersects(&agent, &collider.bounds));
        if blocked {
            break PathStatus::Blocked;
        }

        waypoints.push_back(next);
        current = next;
    };

    log::debug!(
        "Path {start:?} -> {target:?}: {} waypoints, {status:?}",
        waypoints.len()
    );
    Path { waypoints, status }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::World;
    use crate::physics::collider_registry::ColliderRegistry;
    use approx::assert_relative_eq;

    fn cube() -> Vec3 {
        Vec3::new(1.0, 1.0, 1.0)
    }

    #[test]
    fn test_open_line_reaches_target() {
        let path = find_path(Vec3::zeros(), Vec3::new(5.2, 0.0, 0.0), cube(), &[], None, &PathfindingConfig::default());

        assert_eq!(path.status, PathStatus::Reached);
        assert_eq!(path.len(), 10);
        assert_relative_eq!(*path.peek().unwrap(), Vec3::new(0.5, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(*path.destination().unwrap(), Vec3::new(5.0, 0.0, 0.0), epsilon = 1e-4);
    }

    #[test]
    fn test_start_within_threshold_needs_no_steps() {
        let path = find_path(Vec3::zeros(), Vec3::new(0.3, 0.0, 0.0), cube(), &[], None, &PathfindingConfig::default());
        assert!(path.is_empty());
        assert!(path.is_complete());
    }

    #[test]
    fn test_obstacle_aborts_and_keeps_partial_path() {
        let world = World::new();
        let registry = ColliderRegistry::new();
        registry.register_fixed(Vec3::new(2.0, 0.0, 0.0), cube());

        let mut path = find_path(
            Vec3::zeros(),
            Vec3::new(5.0, 0.0, 0.0),
            cube(),
            &registry.get_all(&world),
            None,
            &PathfindingConfig::default(),
        );

        assert_eq!(path.status, PathStatus::Blocked);
        assert_eq!(path.len(), 1);
        assert_relative_eq!(path.next_waypoint().unwrap(), Vec3::new(0.5, 0.0, 0.0), epsilon = 1e-5);
        assert_eq!(path.next_waypoint(), None);
    }

    #[test]
    fn test_fully_blocked_line_yields_empty_path() {
        let world = World::new();
        let registry = ColliderRegistry::new();
        registry.register_fixed(Vec3::new(1.0, 0.0, 0.0), cube());

        let mut path = find_path(
            Vec3::zeros(),
            Vec3::new(5.0, 0.0, 0.0),
            cube(),
            &registry.get_all(&world),
            None,
            &PathfindingConfig::default(),
        );

        assert_eq!(path.status, PathStatus::Blocked);
        assert!(path.is_empty());
        assert_eq!(path.next_waypoint(), None);
    }

    #[test]
    fn test_own_collider_is_ignored() {
        let world = World::new();
        let registry = ColliderRegistry::new();
        let own = registry.register_fixed(Vec3::zeros(), cube());
        let snapshot = registry.get_all(&world);

        let config = PathfindingConfig::default();
        let blocked = find_path(Vec3::zeros(), Vec3::new(3.0, 0.0, 0.0), cube(), &snapshot, None, &config);
        assert!(blocked.is_empty());

        let clear = find_path(Vec3::zeros(), Vec3::new(3.0, 0.0, 0.0), cube(), &snapshot, Some(own), &config);
        assert_eq!(clear.status, PathStatus::Reached);
    }

    #[test]
    fn test_step_budget_truncates() {
        let config = PathfindingConfig::default().with_max_steps(3);
        let path = find_path(Vec3::zeros(), Vec3::new(0.0, 0.0, 100.0), cube(), &[], None, &config);

        assert_eq!(path.status, PathStatus::Truncated);
        assert_eq!(path.len(), 3);
        assert_relative_eq!(*path.destination().unwrap(), Vec3::new(0.0, 0.0, 1.5), epsilon = 1e-5);
    }

    #[test]
    fn test_path_passes_over_low_obstacles_only_when_clear() {
        let world = World::new();
        let registry = ColliderRegistry::new();
        // Floor under the whole route: touching from below counts as blocked
        registry.register_fixed(Vec3::new(0.0, -1.0, 0.0), Vec3::new(20.0, 1.0, 20.0));

        let snapshot = registry.get_all(&world);
        let config = PathfindingConfig::default();

        let touching = find_path(Vec3::zeros(), Vec3::new(4.0, 0.0, 0.0), cube(), &snapshot, None, &config);
        assert_eq!(touching.status, PathStatus::Blocked);

        let hovering = find_path(Vec3::new(0.0, 0.1, 0.0), Vec3::new(4.0, 0.1, 0.0), cube(), &snapshot, None, &config);
        assert_eq!(hovering.status, PathStatus::Reached);
    }
}
