//! Fits a cuboid to a point selection under a fixed yaw, and the
//! rectangle-drag flow that creates an annotation from one gesture.

use bevy::math::EulerRot;
use bevy::prelude::*;

use constants::canvas_settings::{BOX_FIT_PADDING, RECT_SELECTION_DEPTH_GATE};

use crate::engine::camera::view::Views;
use crate::engine::core::events::{CanvasCommand, DrawnEvent};
use crate::engine::cuboid::CuboidPose;
use crate::engine::point_cloud::PointCloud;
use crate::tools::polygon;

/// Fits an oriented box around the selected points.
///
/// The yaw is an input, not a fit result: points rotate into the yaw frame,
/// the box takes the per-axis extents there, and the world center is
/// recovered from the local-frame midpoint. Every scale axis gets a fixed
/// padding. Empty selections yield no box.
pub fn fit_cuboid(
    positions: &[Vec3],
    indices: impl IntoIterator<Item = u32>,
    yaw: f32,
) -> Option<CuboidPose> {
    let selected: Vec<Vec3> = indices
        .into_iter()
        .filter_map(|i| positions.get(i as usize).copied())
        .filter(|p| p.is_finite())
        .collect();
    if selected.is_empty() {
        return None;
    }

    let mut center = selected.iter().sum::<Vec3>() / selected.len() as f32;
    center.z = 0.0;

    let inverse_yaw = Quat::from_rotation_z(yaw).inverse();
    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    for point in &selected {
        let local = inverse_yaw * (*point - center);
        min = min.min(local);
        max = max.max(local);
    }

    let extent = max - min;
    let midpoint = min + extent / 2.0;

    // Recover the world center from the local midpoint along the yaw axes.
    center.x += midpoint.x * yaw.cos() + midpoint.y * (std::f32::consts::FRAC_PI_2 + yaw).cos();
    center.y += midpoint.x * yaw.sin() + midpoint.y * (std::f32::consts::FRAC_PI_2 + yaw).sin();
    center.z += midpoint.z;

    Some(CuboidPose::new(
        center,
        Vec3::new(0.0, 0.0, yaw),
        extent + Vec3::splat(BOX_FIT_PADDING),
    ))
}

/// Closes a viewport rectangle `[x0, y0, x1, y1]` into a selection polygon.
pub fn rect_to_polygon(rect: Vec4) -> Vec<Vec2> {
    vec![
        Vec2::new(rect.x, rect.y),
        Vec2::new(rect.z, rect.y),
        Vec2::new(rect.z, rect.w),
        Vec2::new(rect.x, rect.w),
    ]
}

/// Rectangle-drag annotation: selects every cloud point projecting inside
/// the rectangle (with a stricter depth gate than region selection), fits a
/// cuboid at the viewing camera's heading and reports it as drawn.
pub fn create_from_rect(
    mut commands: EventReader<CanvasCommand>,
    cloud: Res<PointCloud>,
    views: Res<Views>,
    mut drawn: EventWriter<DrawnEvent>,
) {
    for command in commands.read() {
        let CanvasCommand::RectDrawn { view, rect_ndc } = command else {
            continue;
        };
        let state = views.get(*view);
        let aspect = state.aspect();
        let region = rect_to_polygon(*rect_ndc);

        let mut inside = Vec::new();
        for (i, position) in cloud.positions().iter().enumerate() {
            let Some(ndc) = state.camera.world_to_ndc(*position, aspect) else {
                continue;
            };
            if ndc.z > RECT_SELECTION_DEPTH_GATE
                && polygon::point_in_polygon(ndc.truncate(), &region)
            {
                inside.push(i as u32);
            }
        }

        let (camera_yaw, _, _) = state.camera.transform.rotation.to_euler(EulerRot::ZYX);
        let yaw = camera_yaw + std::f32::consts::FRAC_PI_2;
        let Some(pose) = fit_cuboid(cloud.positions(), inside, yaw) else {
            debug!("rectangle selection contained no points");
            continue;
        };
        info!("rectangle drag fitted cuboid at {}", pose.center);
        drawn.write(DrawnEvent {
            points: pose.to_record(),
            initial: None,
            continues: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_aligned_fit_recovers_extents() {
        let positions = vec![
            Vec3::new(1.0, 2.0, 0.5),
            Vec3::new(3.0, 2.0, 0.5),
            Vec3::new(1.0, 5.0, 1.5),
            Vec3::new(3.0, 5.0, 1.5),
        ];
        let pose = fit_cuboid(&positions, 0..4, 0.0).unwrap();
        assert!((pose.center - Vec3::new(2.0, 3.5, 1.0)).length() < 1e-4);
        assert!((pose.scale - Vec3::new(2.02, 3.02, 1.02)).length() < 1e-4);
        assert_eq!(pose.rotation, Vec3::ZERO);
    }

    #[test]
    fn yawed_fit_keeps_the_input_yaw_exactly() {
        let yaw = std::f32::consts::FRAC_PI_4;
        let spin = Quat::from_rotation_z(yaw);
        // A 4x1 slab of points, rotated into the yaw frame.
        let mut positions = Vec::new();
        for i in 0..5 {
            for j in 0..2 {
                let local = Vec3::new(i as f32 - 2.0, j as f32 - 0.5, 0.0);
                positions.push(spin * local + Vec3::new(10.0, -3.0, 0.0));
            }
        }
        let pose = fit_cuboid(&positions, 0..positions.len() as u32, yaw).unwrap();
        assert_eq!(pose.rotation, Vec3::new(0.0, 0.0, yaw));
        assert!((pose.scale.x - (4.0 + BOX_FIT_PADDING)).abs() < 1e-3);
        assert!((pose.scale.y - (1.0 + BOX_FIT_PADDING)).abs() < 1e-3);
        assert!((pose.center - Vec3::new(10.0, -3.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn every_input_point_ends_up_inside_the_fit() {
        let positions = vec![
            Vec3::new(0.3, 0.1, 0.2),
            Vec3::new(-1.2, 0.7, 0.9),
            Vec3::new(0.8, -0.4, 1.4),
        ];
        let pose = fit_cuboid(&positions, 0..3, 0.7).unwrap();
        for p in &positions {
            assert!(pose.contains(*p, 1.0, 0.01));
        }
    }

    #[test]
    fn empty_selection_fits_nothing() {
        assert!(fit_cuboid(&[], [], 0.0).is_none());
        assert!(fit_cuboid(&[Vec3::ONE], [5], 0.0).is_none());
    }
}
