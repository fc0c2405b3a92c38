use bevy::input::keyboard::KeyCode;
use bevy::prelude::*;

use constants::canvas_settings::{
    CAMERA_CLIP_PADDING, CAMERA_MARGIN_RATIO, DOLLY_FACTOR, FOV_DEFAULT, MOVEMENT_FACTOR,
};
use constants::coordinate_system::{
    FRONT_VIEW_OFFSET, PERSPECTIVE_VIEW_OFFSET, SCENE_UP, SIDE_VIEW_OFFSET, TOP_VIEW_OFFSET,
};

use crate::engine::annotations::SelectedCuboid;
use crate::engine::camera::view::{CameraMode, ViewKind, ViewProjection, Views};
use crate::engine::core::events::CanvasCommand;
use crate::engine::cuboid::CuboidPose;
use crate::engine::point_cloud::PointCloud;

/// World point the whole canvas is framed around, refreshed per cloud.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SceneFrame {
    pub coordinates: Vec3,
}

/// Point at distance `len` from `a` towards `b`.
pub fn point_between(a: Vec3, b: Vec3, len: f32) -> Vec3 {
    a + (b - a).normalize_or_zero() * len
}

// The top camera keeps screen-right on world X and screen-up on world Y so
// in-plane gestures map one-to-one onto the box axes.
fn view_up(view: ViewKind) -> Vec3 {
    match view {
        ViewKind::Top => Vec3::Y,
        _ => SCENE_UP,
    }
}

/// Homes all four cameras onto a world point with the default offsets.
pub fn position_all_views(views: &mut Views, target: Vec3) {
    views.perspective.camera.transform =
        Transform::from_translation(target + PERSPECTIVE_VIEW_OFFSET).looking_at(target, SCENE_UP);
    for (view, offset) in [
        (ViewKind::Top, TOP_VIEW_OFFSET),
        (ViewKind::Side, SIDE_VIEW_OFFSET),
        (ViewKind::Front, FRONT_VIEW_OFFSET),
    ] {
        let state = views.get_mut(view);
        state.camera.mode = CameraMode::Free;
        state.camera.transform =
            Transform::from_translation(target + offset).looking_at(target, view_up(view));
        if let ViewProjection::Orthographic { zoom, .. } = &mut state.camera.projection {
            *zoom = FOV_DEFAULT;
        }
    }
}

/// Centers every camera on the activated object and sizes the orthographic
/// viewports so the object fills them with a fixed visual margin.
pub fn fit_cameras_to_object(views: &mut Views, pose: &CuboidPose) {
    let center = pose.center;
    views.perspective.camera.transform =
        Transform::from_translation(center + PERSPECTIVE_VIEW_OFFSET).looking_at(center, SCENE_UP);

    for view in ViewKind::ORTHOGRAPHIC {
        // Expected extents per view plane, aspect-fitted below.
        let (height, width, clip) = match view {
            ViewKind::Top => (pose.scale.x, pose.scale.y, pose.scale.z),
            ViewKind::Side => (pose.scale.z, pose.scale.x, pose.scale.y),
            _ => (pose.scale.z, pose.scale.y, pose.scale.x),
        };
        let height = height * CAMERA_MARGIN_RATIO;
        let width = width * CAMERA_MARGIN_RATIO;
        let clip = clip + CAMERA_CLIP_PADDING;

        let state = views.get_mut(view);
        let aspect = state.aspect();
        let fitted = if width / height > aspect {
            width / aspect
        } else {
            height
        };
        state.camera.mode = CameraMode::Free;
        state.camera.projection = ViewProjection::Orthographic {
            view_size: fitted,
            zoom: FOV_DEFAULT,
            near: -clip / 2.0,
            far: clip / 2.0,
        };

        let reference = pose.reference_coordinates(view);
        let distance = reference.distance(center);
        let half = half_extent_towards(view, pose);
        state.camera.transform =
            Transform::from_translation(point_between(reference, center, distance - half))
                .looking_at(center, view_up(view));
    }
}

fn half_extent_towards(view: ViewKind, pose: &CuboidPose) -> f32 {
    match view {
        ViewKind::Top => pose.scale.z / 2.0,
        ViewKind::Side => pose.scale.y / 2.0,
        _ => pose.scale.x / 2.0,
    }
}

/// Commit-time repositioning: keep each orthographic camera just outside the
/// object face it looks through, preserving its accumulated orientation.
pub fn adjust_ortho_cameras(views: &mut Views, pose: &CuboidPose) {
    for view in ViewKind::ORTHOGRAPHIC {
        let reference = pose.reference_coordinates(view);
        let distance = reference.distance(pose.center);
        let half = half_extent_towards(view, pose);
        let translation = point_between(reference, pose.center, distance - half);
        views.get_mut(view).camera.transform.translation = translation;
    }
}

/// Re-parents the two orthographic cameras that are not driving the rotation
/// onto the edited object, so they visually track it for the gesture.
pub fn attach_tracking_cameras(views: &mut Views, pose: &CuboidPose, gesture: ViewKind) {
    let inverse = pose.transform().inverse();
    for view in ViewKind::ORTHOGRAPHIC {
        if view == gesture {
            continue;
        }
        let camera = &mut views.get_mut(view).camera;
        let local = inverse * camera.transform.compute_matrix();
        camera.mode = CameraMode::TrackingObject { local };
    }
}

/// Returns tracking cameras to the scene root at the absolute pose their
/// tracked pose resolves to, preserving the accumulated rotation.
pub fn detach_tracking_cameras(views: &mut Views, pose: &CuboidPose) {
    let transform = pose.transform();
    for view in ViewKind::ORTHOGRAPHIC {
        let camera = &mut views.get_mut(view).camera;
        if let CameraMode::TrackingObject { local } = camera.mode {
            camera.transform = Transform::from_matrix(transform * local);
            camera.mode = CameraMode::Free;
        }
    }
}

/// Per-frame resolution of tracking cameras against the live pose.
pub fn follow_tracked_object(selected: Option<Res<SelectedCuboid>>, mut views: ResMut<Views>) {
    let Some(selected) = selected else {
        return;
    };
    let transform = selected.pose.transform();
    for view in ViewKind::ORTHOGRAPHIC {
        let camera = &mut views.get_mut(view).camera;
        if let CameraMode::TrackingObject { local } = camera.mode {
            camera.transform = Transform::from_matrix(transform * local);
        }
    }
}

/// Frames the scene once the cloud and index are ready.
pub fn frame_scene(cloud: Res<PointCloud>, mut frame: ResMut<SceneFrame>, mut views: ResMut<Views>) {
    if cloud.is_empty() {
        return;
    }
    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    for position in cloud.positions() {
        min = min.min(*position);
        max = max.max(*position);
    }
    let center = (min + max) * 0.5;
    let radius = (max - min).length() * 0.5;
    // Only rehome when the default camera rig would sit outside the data.
    if center.length() > radius / 2.0 {
        frame.coordinates = center;
        position_all_views(&mut views, center);
        info!("framed scene at {center}");
    }
}

/// Keyboard camera nudges, viewport resizes and wheel zoom.
pub fn handle_camera_commands(mut commands: EventReader<CanvasCommand>, mut views: ResMut<Views>) {
    for command in commands.read() {
        match command {
            CanvasCommand::CameraNudge { code, shift, alt } => {
                apply_camera_nudge(&mut views, *code, *shift, *alt);
            }
            CanvasCommand::SetViewport { view, size } => {
                views.get_mut(*view).viewport = *size;
            }
            CanvasCommand::ZoomViewport { view, delta } => {
                if view.is_orthographic() {
                    views.get_mut(*view).camera.zoom_by(*delta);
                }
            }
            _ => {}
        }
    }
}

fn apply_camera_nudge(views: &mut Views, code: KeyCode, shift: bool, alt: bool) {
    let camera = &mut views.perspective.camera;
    let transform = &mut camera.transform;
    let rotate_step = 0.1_f32.to_radians() * MOVEMENT_FACTOR;
    let tilt_step = 0.05_f32.to_radians() * MOVEMENT_FACTOR;
    let truck_step = 0.01 * MOVEMENT_FACTOR;

    if shift {
        match code {
            KeyCode::ArrowRight => rotate_about_up(transform, -rotate_step),
            KeyCode::ArrowLeft => rotate_about_up(transform, rotate_step),
            KeyCode::ArrowUp => transform.rotate_local_x(tilt_step),
            KeyCode::ArrowDown => transform.rotate_local_x(-tilt_step),
            _ => {}
        }
    } else if alt {
        let forward = transform.forward().as_vec3();
        let right = transform.right().as_vec3();
        let up = transform.up().as_vec3();
        match code {
            KeyCode::KeyI => transform.translation += forward * DOLLY_FACTOR * 0.1,
            KeyCode::KeyK => transform.translation -= forward * DOLLY_FACTOR * 0.1,
            KeyCode::KeyJ => transform.translation -= right * truck_step,
            KeyCode::KeyL => transform.translation += right * truck_step,
            KeyCode::KeyU => transform.translation += up * truck_step,
            KeyCode::KeyO => transform.translation -= up * truck_step,
            _ => {}
        }
    }
}

fn rotate_about_up(transform: &mut Transform, angle: f32) {
    transform.rotation = Quat::from_axis_angle(SCENE_UP, angle) * transform.rotation;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitted_top_camera_sits_above_the_box_face() {
        let mut views = Views::default();
        let pose = CuboidPose::new(Vec3::new(4.0, 2.0, 1.0), Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        fit_cameras_to_object(&mut views, &pose);
        let translation = views.top.camera.transform.translation;
        assert!((translation.x - 4.0).abs() < 1e-4);
        assert!((translation.y - 2.0).abs() < 1e-4);
        assert!(translation.z > pose.center.z);
    }

    #[test]
    fn attach_then_detach_preserves_camera_pose_for_identity_motion() {
        let mut views = Views::default();
        let pose = CuboidPose::default();
        let before = views.side.camera.transform;
        attach_tracking_cameras(&mut views, &pose, ViewKind::Top);
        detach_tracking_cameras(&mut views, &pose);
        let after = views.side.camera.transform;
        assert!((before.translation - after.translation).length() < 1e-4);
    }

    #[test]
    fn tracking_cameras_follow_a_moved_box() {
        let mut views = Views::default();
        let mut pose = CuboidPose::default();
        attach_tracking_cameras(&mut views, &pose, ViewKind::Top);
        let before = views.front.camera.transform.translation;
        pose.center += Vec3::new(1.0, 0.0, 0.0);
        detach_tracking_cameras(&mut views, &pose);
        let after = views.front.camera.transform.translation;
        assert!((after - before - Vec3::X).length() < 1e-4);
    }
}
