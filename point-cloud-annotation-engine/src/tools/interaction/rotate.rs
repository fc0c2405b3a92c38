use bevy::prelude::*;

use constants::canvas_settings::ROTATION_SPEED;

use crate::engine::annotations::SelectedCuboid;
use crate::engine::camera::view::{ViewKind, Views};
use crate::tools::interaction::state::{Interaction, InteractionAction, ReferencePlanes};

/// Side test telling which way the cursor swept around the view center.
///
/// ```text
/// A
/// |\          A = rotation center (viewport middle)
/// | \         B = previous frame position
/// |  C        C = current frame position
/// B
/// ```
fn is_left(a: Vec2, b: Vec2, c: Vec2) -> bool {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x) > 0.0
}

/// Box axis one rotation detent spins about, per gesture view.
fn rotation_axis(view: ViewKind) -> Vec3 {
    match view {
        ViewKind::Side => Vec3::Y,
        ViewKind::Front => Vec3::X,
        _ => Vec3::Z,
    }
}

/// Per-frame rotation: compares the cursor's angle about the viewport center
/// against the previous frame and applies one fixed angular detent in the
/// winding direction — to the pose, to the three reference planes (with the
/// per-view axis mapping) and to the gesture view's own camera.
pub fn update_rotation(
    mut interaction: ResMut<Interaction>,
    selected: Option<ResMut<SelectedCuboid>>,
    mut views: ResMut<Views>,
    mut planes: ResMut<ReferencePlanes>,
) {
    let InteractionAction::Rotating(state) = &mut interaction.action else {
        return;
    };
    let Some(mut selected) = selected else {
        return;
    };
    if state.screen_init == state.screen_move {
        return;
    }
    let view_state = views.get(state.view);
    let cursor = view_state.cursor_ndc;
    if cursor == state.recent_cursor {
        return;
    }
    state.recent_cursor = cursor;

    let center = view_state.viewport / 2.0;
    let step = std::f32::consts::PI / ROTATION_SPEED;
    let direction = if is_left(center, state.screen_init, state.screen_move) {
        -step
    } else {
        step
    };

    selected
        .pose
        .rotate_local(rotation_axis(state.view), direction);
    planes.rotate_for_gesture(state.view, direction);

    // The gesture view's camera spins with the box so the drag reads as
    // in-plane rotation; the other two cameras follow through tracking mode.
    let camera = &mut views.get_mut(state.view).camera;
    camera.transform.rotation *= Quat::from_rotation_z(direction);

    state.screen_init = state.screen_move;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_test_matches_winding() {
        let a = Vec2::new(400.0, 300.0);
        let b = Vec2::new(500.0, 300.0);
        assert!(is_left(a, b, Vec2::new(500.0, 350.0)));
        assert!(!is_left(a, b, Vec2::new(500.0, 250.0)));
    }

    #[test]
    fn each_view_spins_its_own_axis() {
        assert_eq!(rotation_axis(ViewKind::Top), Vec3::Z);
        assert_eq!(rotation_axis(ViewKind::Side), Vec3::Y);
        assert_eq!(rotation_axis(ViewKind::Front), Vec3::X);
    }
}
