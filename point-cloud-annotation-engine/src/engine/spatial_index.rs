use std::collections::HashMap;

use bevy::prelude::*;
use thiserror::Error;

use crate::engine::cuboid::CuboidPose;

#[derive(Debug, Error, PartialEq)]
pub enum GridIndexError {
    #[error("grid cell size must be positive, got {0}")]
    NonPositiveCellSize(f32),
}

/// Uniform-grid bucket index over point-cloud indices. Built once per cloud
/// in O(N), read-only afterwards, discarded on reload.
#[derive(Resource, Debug)]
pub struct GridPointIndex {
    cell_size: f32,
    buckets: HashMap<(i32, i32, i32), Vec<u32>>,
}

impl GridPointIndex {
    pub fn build(positions: &[Vec3], cell_size: f32) -> Result<Self, GridIndexError> {
        if !(cell_size > 0.0) {
            return Err(GridIndexError::NonPositiveCellSize(cell_size));
        }
        let mut buckets: HashMap<(i32, i32, i32), Vec<u32>> = HashMap::new();
        for (i, position) in positions.iter().enumerate() {
            buckets
                .entry(Self::key(*position, cell_size))
                .or_default()
                .push(i as u32);
        }
        Ok(Self { cell_size, buckets })
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn key(position: Vec3, cell_size: f32) -> (i32, i32, i32) {
        (
            (position.x / cell_size).floor() as i32,
            (position.y / cell_size).floor() as i32,
            (position.z / cell_size).floor() as i32,
        )
    }

    /// Indices of every point whose grid cell intersects the axis-aligned
    /// bounds of the oriented box scaled by `scale_ratio`. A conservative
    /// superset of true membership; exact filtering is the caller's job via
    /// [`CuboidPose::contains`].
    pub fn query(&self, pose: &CuboidPose, scale_ratio: f32) -> Vec<u32> {
        let corners = pose.corners(scale_ratio);
        let mut min = corners[0];
        let mut max = corners[0];
        for corner in &corners[1..] {
            min = min.min(*corner);
            max = max.max(*corner);
        }

        let lo = Self::key(min, self.cell_size);
        let hi = Self::key(max, self.cell_size);
        let mut indices = Vec::new();
        for x in lo.0..=hi.0 {
            for y in lo.1..=hi.1 {
                for z in lo.2..=hi.2 {
                    if let Some(bucket) = self.buckets.get(&(x, y, z)) {
                        indices.extend_from_slice(bucket);
                    }
                }
            }
        }
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constants::canvas_settings::MEMBERSHIP_EPSILON;

    fn sample_cloud() -> Vec<Vec3> {
        // A deterministic lattice with some off-grid jitter.
        let mut points = Vec::new();
        for i in -6..=6 {
            for j in -6..=6 {
                for k in -2..=2 {
                    points.push(Vec3::new(
                        i as f32 * 0.7 + 0.13,
                        j as f32 * 0.9 - 0.21,
                        k as f32 * 1.1 + 0.05,
                    ));
                }
            }
        }
        points
    }

    #[test]
    fn rejects_non_positive_cell_size() {
        assert_eq!(
            GridPointIndex::build(&[], 0.0).unwrap_err(),
            GridIndexError::NonPositiveCellSize(0.0)
        );
        assert!(GridPointIndex::build(&[], -1.0).is_err());
    }

    #[test]
    fn query_is_a_superset_of_membership() {
        let cloud = sample_cloud();
        let index = GridPointIndex::build(&cloud, 1.0).unwrap();
        let pose = CuboidPose::new(
            Vec3::new(0.4, -0.3, 0.2),
            Vec3::new(0.1, 0.2, 0.9),
            Vec3::new(2.5, 1.5, 1.8),
        );

        let candidates = index.query(&pose, 1.0);
        for (i, point) in cloud.iter().enumerate() {
            if pose.contains(*point, 1.0, MEMBERSHIP_EPSILON) {
                assert!(
                    candidates.contains(&(i as u32)),
                    "index missed member point {i}"
                );
            }
        }
    }

    #[test]
    fn larger_cells_never_lose_recall() {
        let cloud = sample_cloud();
        let fine = GridPointIndex::build(&cloud, 0.5).unwrap();
        let coarse = GridPointIndex::build(&cloud, 2.0).unwrap();
        let pose = CuboidPose::new(Vec3::ZERO, Vec3::ZERO, Vec3::splat(2.0));

        let fine_hits = fine.query(&pose, 1.0);
        let coarse_hits = coarse.query(&pose, 1.0);
        for hit in &fine_hits {
            assert!(coarse_hits.contains(hit));
        }
    }

    #[test]
    fn absent_cells_contribute_nothing() {
        let index = GridPointIndex::build(&[Vec3::splat(100.0)], 1.0).unwrap();
        let pose = CuboidPose::new(Vec3::ZERO, Vec3::ZERO, Vec3::ONE);
        assert!(index.query(&pose, 1.0).is_empty());
    }
}
