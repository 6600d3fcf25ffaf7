//! Immutable polyline the enemies travel along.

use gecko_defence_core::Position;
use thiserror::Error;

/// Errors that make a waypoint sequence unusable as a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// A path needs at least two waypoints.
    #[error("path needs at least two waypoints, got {0}")]
    TooFewWaypoints(usize),
    /// The waypoints collapse to a single point.
    #[error("path has zero total length")]
    ZeroLength,
}

/// Fixed route from spawn to goal, queried by normalised progress.
///
/// Immutable after creation. Positions between waypoints are linearly
/// interpolated; curvature smoothing is a renderer concern.
#[derive(Clone, Debug)]
pub struct PathModel {
    waypoints: Vec<Position>,
    cumulative: Vec<f32>,
    length: f32,
}

impl PathModel {
    /// Builds a path from an ordered waypoint sequence.
    pub fn new(waypoints: Vec<Position>) -> Result<Self, PathError> {
        if waypoints.len() < 2 {
            return Err(PathError::TooFewWaypoints(waypoints.len()));
        }

        let mut cumulative = Vec::with_capacity(waypoints.len());
        cumulative.push(0.0);
        let mut length = 0.0;
        for pair in waypoints.windows(2) {
            length += pair[0].distance(pair[1]);
            cumulative.push(length);
        }

        if length <= 0.0 {
            return Err(PathError::ZeroLength);
        }

        Ok(Self {
            waypoints,
            cumulative,
            length,
        })
    }

    /// Total path length in world units.
    #[must_use]
    pub const fn length(&self) -> f32 {
        self.length
    }

    /// Position at normalised progress `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f32) -> Position {
        let t = t.clamp(0.0, 1.0);
        let target = t * self.length;

        let segment = self
            .cumulative
            .partition_point(|&travelled| travelled <= target)
            .saturating_sub(1)
            .min(self.waypoints.len() - 2);

        let segment_start = self.cumulative[segment];
        let segment_length = self.cumulative[segment + 1] - segment_start;
        if segment_length <= 0.0 {
            return self.waypoints[segment];
        }

        let local = (target - segment_start) / segment_length;
        self.waypoints[segment].lerp(self.waypoints[segment + 1], local)
    }

    /// Remaining distance to the goal for an enemy at progress `t`.
    #[must_use]
    pub fn distance_to_goal(&self, t: f32) -> f32 {
        (1.0 - t.clamp(0.0, 1.0)) * self.length
    }

    /// Reports whether the point lies within `radius` of the path. Used to
    /// forbid tower placement on the route.
    #[must_use]
    pub fn is_near(&self, point: Position, radius: f32) -> bool {
        let radius_squared = radius * radius;
        self.waypoints
            .windows(2)
            .any(|pair| segment_distance_squared(point, pair[0], pair[1]) <= radius_squared)
    }
}

fn segment_distance_squared(point: Position, a: Position, b: Position) -> f32 {
    let ab_x = b.x() - a.x();
    let ab_y = b.y() - a.y();
    let length_squared = ab_x * ab_x + ab_y * ab_y;
    if length_squared <= 0.0 {
        return point.distance_squared(a);
    }

    let ap_x = point.x() - a.x();
    let ap_y = point.y() - a.y();
    let t = ((ap_x * ab_x + ap_y * ab_y) / length_squared).clamp(0.0, 1.0);
    point.distance_squared(a.lerp(b, t))
}

#[cfg(test)]
mod tests {
    use super::{PathError, PathModel};
    use gecko_defence_core::Position;

    fn l_shaped_path() -> PathModel {
        PathModel::new(vec![
            Position::new(0.0, 0.0),
            Position::new(100.0, 0.0),
            Position::new(100.0, 50.0),
        ])
        .expect("valid path")
    }

    #[test]
    fn rejects_degenerate_paths() {
        assert!(matches!(
            PathModel::new(vec![Position::new(1.0, 1.0)]),
            Err(PathError::TooFewWaypoints(1))
        ));
        assert!(matches!(
            PathModel::new(vec![Position::new(1.0, 1.0), Position::new(1.0, 1.0)]),
            Err(PathError::ZeroLength)
        ));
    }

    #[test]
    fn length_sums_segments() {
        assert!((l_shaped_path().length() - 150.0).abs() < f32::EPSILON);
    }

    #[test]
    fn point_at_interpolates_across_segments() {
        let path = l_shaped_path();
        assert_eq!(path.point_at(0.0), Position::new(0.0, 0.0));
        assert_eq!(path.point_at(1.0), Position::new(100.0, 50.0));

        let midway = path.point_at(0.5);
        assert!((midway.x() - 75.0).abs() < 1e-4);
        assert!((midway.y() - 0.0).abs() < 1e-4);

        let on_second_leg = path.point_at(0.8);
        assert!((on_second_leg.x() - 100.0).abs() < 1e-4);
        assert!((on_second_leg.y() - 20.0).abs() < 1e-4);
    }

    #[test]
    fn point_at_clamps_out_of_range_progress() {
        let path = l_shaped_path();
        assert_eq!(path.point_at(-0.5), path.point_at(0.0));
        assert_eq!(path.point_at(1.5), path.point_at(1.0));
    }

    #[test]
    fn distance_to_goal_shrinks_with_progress() {
        let path = l_shaped_path();
        assert!((path.distance_to_goal(0.0) - 150.0).abs() < f32::EPSILON);
        assert!((path.distance_to_goal(0.9) - 15.0).abs() < 1e-4);
        assert_eq!(path.distance_to_goal(1.0), 0.0);
    }

    #[test]
    fn is_near_detects_points_close_to_any_segment() {
        let path = l_shaped_path();
        assert!(path.is_near(Position::new(50.0, 10.0), 15.0));
        assert!(path.is_near(Position::new(110.0, 25.0), 15.0));
        assert!(!path.is_near(Position::new(50.0, 40.0), 15.0));
    }
}
