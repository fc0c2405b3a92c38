use bevy::math::EulerRot;
use bevy::prelude::*;

use constants::canvas_settings::{CAMERA_REFERENCE_DISTANCE, MIN_CUBOID_SCALE};

use crate::engine::camera::view::ViewKind;

/// Canonical unit-cube corner signs, indexed so that bit 0 selects +X,
/// bit 1 selects +Y and bit 2 selects +Z.
pub const CANONICAL_CORNERS: [Vec3; 8] = [
    Vec3::new(-0.5, -0.5, -0.5),
    Vec3::new(0.5, -0.5, -0.5),
    Vec3::new(-0.5, 0.5, -0.5),
    Vec3::new(0.5, 0.5, -0.5),
    Vec3::new(-0.5, -0.5, 0.5),
    Vec3::new(0.5, -0.5, 0.5),
    Vec3::new(-0.5, 0.5, 0.5),
    Vec3::new(0.5, 0.5, 0.5),
];

/// Permutation from the canonical corner order into the order image-space
/// consumers expect: front-bottom-left, front-bottom-right, front-top-right,
/// front-top-left, then the same circuit on the rear face. Front is +X,
/// left is -Y, bottom is -Z.
pub const IMAGE_CORNER_ORDER: [usize; 8] = [1, 3, 7, 5, 0, 2, 6, 4];

/// Pose of one oriented bounding volume: center, intrinsic Euler rotation
/// (applied Z then Y then X) and per-axis scale. Scale components never drop
/// below [`MIN_CUBOID_SCALE`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CuboidPose {
    pub center: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for CuboidPose {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl CuboidPose {
    pub fn new(center: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            center,
            rotation,
            scale: clamp_scale(scale),
        }
    }

    /// Reads the pose out of a 16-float store record (pos3 + rot3 + scale3).
    pub fn from_record(points: &[f32; 16]) -> Self {
        Self::new(
            Vec3::new(points[0], points[1], points[2]),
            Vec3::new(points[3], points[4], points[5]),
            Vec3::new(points[6], points[7], points[8]),
        )
    }

    /// Writes the pose into the 16-float store record; reserved slots stay 0.
    pub fn to_record(&self) -> [f32; 16] {
        let mut points = [0.0; 16];
        points[0..3].copy_from_slice(&self.center.to_array());
        points[3..6].copy_from_slice(&self.rotation.to_array());
        points[6..9].copy_from_slice(&self.scale.to_array());
        points
    }

    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::ZYX,
            self.rotation.z,
            self.rotation.y,
            self.rotation.x,
        )
    }

    /// Rigid transform of the pose (no scale): Translate(center) · Rotate.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation_quat(), self.center)
    }

    /// The eight world-space corners, canonical order, with every scale axis
    /// multiplied by `scale_ratio`.
    pub fn corners(&self, scale_ratio: f32) -> [Vec3; 8] {
        let transform = self.transform();
        let scaled = self.scale * scale_ratio;
        CANONICAL_CORNERS.map(|sign| transform.transform_point3(sign * scaled))
    }

    /// Point-in-box test in box-local space. The inverse rotation is the
    /// conjugate of the (orthonormal) pose quaternion; a point is inside when
    /// every local axis magnitude stays within scale/2 · ratio + epsilon.
    /// NaN coordinates never pass.
    pub fn contains(&self, point: Vec3, scale_ratio: f32, epsilon: f32) -> bool {
        let local = self.rotation_quat().inverse() * (point - self.center);
        let bound = self.scale * (0.5 * scale_ratio) + Vec3::splat(epsilon);
        local.x.abs() <= bound.x && local.y.abs() <= bound.y && local.z.abs() <= bound.z
    }

    /// Sets one scale component, keeping the minimum-scale invariant.
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = clamp_scale(scale);
    }

    /// Rotates the pose about one of its local axes, the way a view-local
    /// drag spins the box.
    pub fn rotate_local(&mut self, axis: Vec3, angle: f32) {
        let rotated = self.rotation_quat() * Quat::from_axis_angle(axis, angle);
        let (z, y, x) = rotated.to_euler(EulerRot::ZYX);
        self.rotation = Vec3::new(x, y, z);
    }

    /// Box-local offset of the per-view camera reference node.
    pub fn reference_offset(view: ViewKind) -> Vec3 {
        match view {
            ViewKind::Top => Vec3::new(0.0, 0.0, CAMERA_REFERENCE_DISTANCE),
            ViewKind::Side => Vec3::new(0.0, CAMERA_REFERENCE_DISTANCE, 0.0),
            ViewKind::Front | ViewKind::Perspective => {
                Vec3::new(CAMERA_REFERENCE_DISTANCE, 0.0, 0.0)
            }
        }
    }

    /// World position of the per-view camera reference node.
    pub fn reference_coordinates(&self, view: ViewKind) -> Vec3 {
        self.transform()
            .transform_point3(Self::reference_offset(view))
    }

    /// Counter-scale applied to pose-attached helper markers so they keep a
    /// constant size while the box resizes.
    pub fn helper_counter_scale(&self) -> Vec3 {
        self.scale.recip()
    }
}

fn clamp_scale(scale: Vec3) -> Vec3 {
    scale.max(Vec3::splat(MIN_CUBOID_SCALE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use constants::canvas_settings::MEMBERSHIP_EPSILON;

    fn unit_box() -> CuboidPose {
        CuboidPose::new(Vec3::ZERO, Vec3::ZERO, Vec3::splat(2.0))
    }

    #[test]
    fn membership_inside_and_outside() {
        let pose = unit_box();
        assert!(pose.contains(Vec3::new(0.9, 0.0, 0.0), 1.0, MEMBERSHIP_EPSILON));
        assert!(!pose.contains(Vec3::new(1.2, 0.0, 0.0), 1.0, MEMBERSHIP_EPSILON));
    }

    #[test]
    fn corners_all_pass_membership() {
        let pose = CuboidPose::new(
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(0.2, -0.4, 1.3),
            Vec3::new(2.0, 1.0, 3.0),
        );
        for corner in pose.corners(1.0) {
            assert!(pose.contains(corner, 1.0, MEMBERSHIP_EPSILON));
        }
    }

    #[test]
    fn displaced_points_fail_membership() {
        let pose = unit_box();
        let eps = MEMBERSHIP_EPSILON;
        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            let displaced = axis * (pose.scale.x / 2.0 + 2.0 * eps);
            assert!(!pose.contains(displaced, 1.0, eps));
        }
    }

    #[test]
    fn nan_points_are_rejected() {
        let pose = unit_box();
        assert!(!pose.contains(Vec3::new(f32::NAN, 0.0, 0.0), 1.0, MEMBERSHIP_EPSILON));
    }

    #[test]
    fn rotated_membership_follows_box_frame() {
        let pose = CuboidPose::new(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_4),
            Vec3::new(4.0, 0.4, 0.4),
        );
        // The long axis now runs along the rotated X; a point on the world
        // diagonal is inside while the same distance along world X is not.
        let along = Quat::from_rotation_z(std::f32::consts::FRAC_PI_4) * Vec3::new(1.8, 0.0, 0.0);
        assert!(pose.contains(along, 1.0, MEMBERSHIP_EPSILON));
        assert!(!pose.contains(Vec3::new(1.8, 0.0, 0.0), 1.0, MEMBERSHIP_EPSILON));
    }

    #[test]
    fn record_roundtrip_preserves_pose() {
        let pose = CuboidPose::new(
            Vec3::new(4.0, 5.0, 6.0),
            Vec3::new(0.1, 0.2, 0.3),
            Vec3::new(2.0, 3.0, 4.0),
        );
        let record = pose.to_record();
        assert_eq!(CuboidPose::from_record(&record), pose);
        assert!(record[9..].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn scale_is_clamped_everywhere() {
        let mut pose = CuboidPose::new(Vec3::ZERO, Vec3::ZERO, Vec3::new(-1.0, 0.0, 0.1));
        assert_eq!(pose.scale, Vec3::splat(0.2));
        pose.set_scale(Vec3::new(1.0, 0.05, 1.0));
        assert_eq!(pose.scale.y, 0.2);
    }

    #[test]
    fn helper_counter_scale_cancels_the_box_scale() {
        let pose = CuboidPose::new(Vec3::ZERO, Vec3::ZERO, Vec3::new(2.0, 4.0, 0.5));
        assert_eq!(pose.scale * pose.helper_counter_scale(), Vec3::ONE);
    }

    #[test]
    fn local_rotation_composes_on_the_right() {
        let mut pose = unit_box();
        pose.rotate_local(Vec3::Z, std::f32::consts::FRAC_PI_2);
        let rotated = pose.rotation_quat() * Vec3::X;
        assert!((rotated - Vec3::Y).length() < 1e-5);
    }
}
