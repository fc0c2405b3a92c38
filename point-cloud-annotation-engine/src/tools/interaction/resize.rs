use bevy::prelude::*;

use constants::canvas_settings::MIN_CUBOID_SCALE;

use crate::engine::annotations::SelectedCuboid;
use crate::engine::camera::focus;
use crate::engine::camera::view::{ViewKind, Views};
use crate::engine::cuboid::CuboidPose;
use crate::tools::interaction::state::{Interaction, InteractionAction, ReferencePlanes, ResizeState};

/// Per-frame resize. The two in-plane scale components follow the ratio of
/// the current cursor offset to the offset at grab time, floored at the
/// minimum scale; the accumulated correction vector shifts the center so the
/// box appears to grow out of its anchored opposite corner.
pub fn update_resize(
    mut interaction: ResMut<Interaction>,
    selected: Option<ResMut<SelectedCuboid>>,
    mut views: ResMut<Views>,
    planes: Res<ReferencePlanes>,
) {
    let InteractionAction::Resizing(state) = &mut interaction.action else {
        return;
    };
    let Some(mut selected) = selected else {
        return;
    };
    let cursor = views.get(state.view).cursor_ndc;
    if apply_resize_step(state, cursor, &mut selected.pose, &planes) {
        focus::adjust_ortho_cameras(&mut views, &selected.pose);
    }
}

/// One resize step against the current cursor. Returns whether the pose
/// changed this frame.
///
/// The per-view component mapping, the 4-way screen-quadrant sign rules and
/// the front-view first-frame toggle are a behavioral contract carried over
/// from the legacy annotation tool; the resize tests pin them down.
pub fn apply_resize_step(
    state: &mut ResizeState,
    cursor: Vec2,
    pose: &mut CuboidPose,
    planes: &ReferencePlanes,
) -> bool {
    if cursor == state.initial_cursor || cursor == state.recent_cursor {
        return false;
    }
    state.recent_cursor = cursor;

    let ratio = cursor / state.initial_cursor;
    if !ratio.is_finite() {
        return false;
    }

    let correction = &mut state.correction;
    match state.view {
        ViewKind::Top => {
            let sx = (state.init_scales.x * ratio.x).max(MIN_CUBOID_SCALE);
            let sy = (state.init_scales.y * ratio.y).max(MIN_CUBOID_SCALE);
            pose.set_scale(Vec3::new(sx, sy, pose.scale.z));
            let dx = sx / 2.0 - state.mem_scales.x / 2.0;
            let dy = sy / 2.0 - state.mem_scales.y / 2.0;
            if cursor.x > 0.0 && cursor.y < 0.0 {
                correction.x += dx;
                correction.y -= dy;
            } else if cursor.x > 0.0 && cursor.y > 0.0 {
                correction.x += dx;
                correction.y += dy;
            } else if cursor.x < 0.0 && cursor.y < 0.0 {
                correction.x -= dx;
                correction.y -= dy;
            } else if cursor.x < 0.0 && cursor.y > 0.0 {
                correction.x -= dx;
                correction.y += dy;
            }
            state.mem_scales.x = sx;
            state.mem_scales.y = sy;
        }
        ViewKind::Side => {
            let sx = (state.init_scales.x * ratio.x).max(MIN_CUBOID_SCALE);
            let sz = (state.init_scales.z * ratio.y).max(MIN_CUBOID_SCALE);
            pose.set_scale(Vec3::new(sx, pose.scale.y, sz));
            let dx = sx / 2.0 - state.mem_scales.x / 2.0;
            let dy = sz / 2.0 - state.mem_scales.z / 2.0;
            if cursor.x > 0.0 && cursor.y < 0.0 {
                correction.x += dx;
                correction.y -= dy;
            } else if cursor.x > 0.0 && cursor.y > 0.0 {
                correction.x += dx;
                correction.y += dy;
            } else if cursor.x < 0.0 && cursor.y < 0.0 {
                correction.x -= dx;
                correction.y -= dy;
            } else if cursor.x < 0.0 && cursor.y > 0.0 {
                correction.x -= dx;
                correction.y += dy;
            }
            state.mem_scales.x = sx;
            state.mem_scales.z = sz;
        }
        ViewKind::Front => {
            let sy = (state.init_scales.y * ratio.x).max(MIN_CUBOID_SCALE);
            let sz = (state.init_scales.z * ratio.y).max(MIN_CUBOID_SCALE);
            pose.set_scale(Vec3::new(pose.scale.x, sy, sz));
            // The front view swaps its memory axes after the first frame.
            let (dx, dy) = if !state.front_toggle {
                state.front_toggle = true;
                (
                    sz / 2.0 - state.mem_scales.z / 2.0,
                    sy / 2.0 - state.mem_scales.y / 2.0,
                )
            } else {
                (
                    sz / 2.0 - state.mem_scales.y / 2.0,
                    sy / 2.0 - state.mem_scales.z / 2.0,
                )
            };
            if cursor.x > 0.0 && cursor.y < 0.0 {
                correction.x += dx;
                correction.y += dy;
            } else if cursor.x > 0.0 && cursor.y > 0.0 {
                correction.x -= dx;
                correction.y += dy;
            } else if cursor.x < 0.0 && cursor.y < 0.0 {
                correction.x += dx;
                correction.y -= dy;
            } else if cursor.x < 0.0 && cursor.y > 0.0 {
                correction.x -= dx;
                correction.y -= dy;
            }
            state.mem_scales.y = sz;
            state.mem_scales.z = sy;
        }
        ViewKind::Perspective => return false,
    }

    // The correction lives in the gesture plane's frame; the box grows out
    // of the anchored corner once it is mapped back to world space.
    let world = planes.orientation(state.view) * Vec3::new(correction.x, correction.y, 0.0)
        + planes.center;
    if !world.is_finite() {
        warn!("resize produced a non-finite center, skipping frame");
        return false;
    }
    pose.center = world;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top_resize(initial: Vec2) -> (ResizeState, CuboidPose, ReferencePlanes) {
        (
            ResizeState::new(ViewKind::Top, initial, Vec3::ONE),
            CuboidPose::default(),
            ReferencePlanes::default(),
        )
    }

    #[test]
    fn top_view_resize_follows_cursor_ratios() {
        let (mut state, mut pose, planes) = top_resize(Vec2::new(0.1, 0.1));
        let changed = apply_resize_step(&mut state, Vec2::new(0.2, 0.05), &mut pose, &planes);
        assert!(changed);
        // X offset doubled, Y offset halved.
        assert!((pose.scale.x - 2.0).abs() < 1e-5);
        assert!((pose.scale.y - 0.5).abs() < 1e-5);
        assert!((pose.scale.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn opposite_corner_stays_anchored() {
        let (mut state, mut pose, planes) = top_resize(Vec2::new(0.1, 0.1));
        let before = pose.center - Vec3::new(pose.scale.x / 2.0, pose.scale.y / 2.0, 0.0);
        apply_resize_step(&mut state, Vec2::new(0.2, 0.05), &mut pose, &planes);
        let after = pose.center - Vec3::new(pose.scale.x / 2.0, pose.scale.y / 2.0, 0.0);
        assert!((after - before).length() < 1e-5);
    }

    #[test]
    fn anchoring_survives_several_frames() {
        let (mut state, mut pose, planes) = top_resize(Vec2::new(0.1, 0.1));
        let anchored = pose.center - Vec3::new(pose.scale.x / 2.0, pose.scale.y / 2.0, 0.0);
        for cursor in [
            Vec2::new(0.12, 0.1),
            Vec2::new(0.15, 0.08),
            Vec2::new(0.2, 0.05),
        ] {
            apply_resize_step(&mut state, cursor, &mut pose, &planes);
        }
        let after = pose.center - Vec3::new(pose.scale.x / 2.0, pose.scale.y / 2.0, 0.0);
        assert!((after - anchored).length() < 1e-5);
    }

    #[test]
    fn scale_floors_at_the_minimum() {
        let (mut state, mut pose, planes) = top_resize(Vec2::new(0.1, 0.1));
        apply_resize_step(&mut state, Vec2::new(0.001, -0.1), &mut pose, &planes);
        assert_eq!(pose.scale.x, MIN_CUBOID_SCALE);
        assert_eq!(pose.scale.y, MIN_CUBOID_SCALE);
    }

    #[test]
    fn side_view_adjusts_x_and_z() {
        let mut state = ResizeState::new(ViewKind::Side, Vec2::new(0.1, 0.1), Vec3::ONE);
        let mut pose = CuboidPose::default();
        let planes = ReferencePlanes::default();
        apply_resize_step(&mut state, Vec2::new(0.3, 0.2), &mut pose, &planes);
        assert!((pose.scale.x - 3.0).abs() < 1e-5);
        assert!((pose.scale.y - 1.0).abs() < 1e-5);
        assert!((pose.scale.z - 2.0).abs() < 1e-5);
    }

    #[test]
    fn repeated_cursor_is_ignored() {
        let (mut state, mut pose, planes) = top_resize(Vec2::new(0.1, 0.1));
        assert!(apply_resize_step(&mut state, Vec2::new(0.2, 0.2), &mut pose, &planes));
        assert!(!apply_resize_step(&mut state, Vec2::new(0.2, 0.2), &mut pose, &planes));
        // And the grab position itself never counts as movement.
        assert!(!apply_resize_step(&mut state, Vec2::new(0.1, 0.1), &mut pose, &planes));
    }
}
