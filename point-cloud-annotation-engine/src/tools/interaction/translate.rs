use bevy::prelude::*;

use crate::engine::annotations::SelectedCuboid;
use crate::engine::camera::ray::ray_plane_hit;
use crate::engine::camera::view::Views;
use crate::tools::interaction::state::{Interaction, InteractionAction, ReferencePlanes};

/// Per-frame translation: ray-cast the gesture view's reference plane,
/// subtract the grab offset and push the hit through the stored inverse
/// parent transform. The result lands in the single pose record every view
/// renders from.
///
/// A frame whose computation degenerates (parallel ray, non-finite result)
/// is skipped and retried next frame; the gesture itself survives.
pub fn update_translation(
    mut interaction: ResMut<Interaction>,
    selected: Option<ResMut<SelectedCuboid>>,
    views: Res<Views>,
    planes: Res<ReferencePlanes>,
) {
    let InteractionAction::Translating(state) = &mut interaction.action else {
        return;
    };
    let Some(mut selected) = selected else {
        return;
    };

    let view_state = views.get(state.view);
    let cursor = view_state.cursor_ndc;
    if cursor == state.last_cursor {
        return;
    }
    state.last_cursor = cursor;

    let Some(ray) = view_state.cursor_ray() else {
        return;
    };
    let Some(hit) = ray_plane_hit(
        ray.origin,
        ray.direction.as_vec3(),
        planes.center,
        planes.normal(state.view),
    ) else {
        return;
    };

    let local = state
        .inverse_parent
        .transform_point3(hit - state.grab_offset);
    if !local.is_finite() {
        warn!("translation produced a non-finite position, skipping frame");
        return;
    }
    selected.pose.center = local;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    use crate::engine::camera::view::ViewKind;
    use crate::engine::cuboid::CuboidPose;
    use crate::tools::interaction::state::TranslationState;

    #[test]
    fn plane_hit_moves_the_pose_preserving_the_grab_offset() {
        let mut views = Views::default();
        views.top.cursor_ndc = Vec2::new(0.2, 0.0);
        let planes = ReferencePlanes::default();

        let mut interaction = Interaction::default();
        interaction.action = InteractionAction::Translating(TranslationState {
            view: ViewKind::Top,
            grab_offset: Vec3::new(0.1, 0.0, 0.0),
            inverse_parent: Mat4::IDENTITY,
            last_cursor: Vec2::INFINITY,
        });

        let mut world = bevy::ecs::world::World::new();
        world.insert_resource(interaction);
        world.insert_resource(views);
        world.insert_resource(planes);
        world.insert_resource(SelectedCuboid {
            client_id: 1,
            pose: CuboidPose::default(),
            locked: false,
            pinned: false,
            hidden: false,
        });
        world
            .run_system_once(update_translation)
            .expect("system runs");

        let selected = world.resource::<SelectedCuboid>();
        // Cursor at NDC 0.2 in the top view, grab offset 0.1 along X.
        let half_w = constants::canvas_settings::ZOOM_FACTOR * 0.5 * (800.0 / 600.0);
        let expected_x = 0.2 * half_w - 0.1;
        assert!((selected.pose.center.x - expected_x).abs() < 1e-4);
        assert!(selected.pose.center.z.abs() < 1e-4);
    }
}
