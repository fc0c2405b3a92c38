use bevy::prelude::*;

use constants::canvas_settings::ROTATION_HELPER_OFFSET;

use crate::engine::annotations::{ActiveElement, AnnotatedObjects, SelectedCuboid};
use crate::engine::camera::focus;
use crate::engine::camera::ray::{ray_hits_obb, ray_plane_hit, ray_point_distance};
use crate::engine::camera::view::{ViewKind, Views};
use crate::engine::core::canvas_state::TransformMode;
use crate::engine::core::events::{
    CanvasCommand, CanvasPointerEvent, ContextMenuEvent, PointerKind, SelectedEvent,
};
use crate::engine::cuboid::CuboidPose;
use crate::tools::draw::DrawMode;
use crate::tools::group::GroupMode;
use crate::tools::interaction::state::{
    Interaction, InteractionAction, ReferencePlanes, ResizeState, RotationState, TranslationState,
};

/// Gesture the perspective view resolves into, switched by the host.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct TransformModeState(pub TransformMode);

pub fn handle_transform_mode(
    mut commands: EventReader<CanvasCommand>,
    mut mode: ResMut<TransformModeState>,
) {
    for command in commands.read() {
        if let CanvasCommand::SetTransformMode(new_mode) = command {
            mode.0 = *new_mode;
        }
    }
}

/// World position of the rotation handle marker in one orthographic view.
pub fn rotation_handle_position(view: ViewKind, pose: &CuboidPose) -> Vec3 {
    let local = match view {
        ViewKind::Top => Vec3::X * (0.5 + ROTATION_HELPER_OFFSET) * pose.scale.x,
        _ => Vec3::Z * (0.5 + ROTATION_HELPER_OFFSET) * pose.scale.z,
    };
    pose.transform().transform_point3(local)
}

/// Pointer press over a viewport while an object is active starts a scan.
/// Locked and hidden objects never enter the automaton.
pub fn begin_scan(
    mut pointers: EventReader<CanvasPointerEvent>,
    selected: Option<Res<SelectedCuboid>>,
    draw: Res<DrawMode>,
    group: Res<GroupMode>,
    mut interaction: ResMut<Interaction>,
) {
    for pointer in pointers.read() {
        if pointer.kind != PointerKind::Press {
            continue;
        }
        let Some(selected) = selected.as_ref() else {
            continue;
        };
        if draw.enabled
            || group.enabled
            || selected.locked
            || selected.hidden
            || !matches!(interaction.action, InteractionAction::Idle)
        {
            continue;
        }
        interaction.action = InteractionAction::Scanning {
            view: pointer.view,
            press_screen: pointer.screen,
        };
        interaction.selectable = false;
    }
}

/// Resolves an open scan into a gesture on the first frame after the press.
/// Hit-test priority, first match wins: resize handle markers, then the
/// rotation handle, then the box mesh itself. A pinned object refuses
/// translation; anything unresolved stays scanning and dies as a no-op on
/// release.
pub fn resolve_scan(
    mut interaction: ResMut<Interaction>,
    selected: Option<Res<SelectedCuboid>>,
    mut views: ResMut<Views>,
    planes: Res<ReferencePlanes>,
    transform_mode: Res<TransformModeState>,
) {
    let InteractionAction::Scanning { view, press_screen } = interaction.action else {
        return;
    };
    let Some(selected) = selected else {
        interaction.reset();
        return;
    };
    if selected.locked {
        return;
    }

    let state = views.get(view);
    let Some(ray) = state.cursor_ray() else {
        return;
    };
    let origin = ray.origin;
    let dir = ray.direction.as_vec3();
    let cursor = state.cursor_ndc;
    let pose = selected.pose;

    if view.is_orthographic() {
        let radius = state.camera.helper_radius();
        let handle_hit = pose
            .corners(1.0)
            .iter()
            .any(|corner| ray_point_distance(origin, dir, *corner) <= radius);
        if handle_hit {
            interaction.action =
                InteractionAction::Resizing(ResizeState::new(view, cursor, pose.scale));
            return;
        }

        let rotation_handle = rotation_handle_position(view, &pose);
        if ray_point_distance(origin, dir, rotation_handle) <= radius {
            interaction.action = InteractionAction::Rotating(RotationState {
                view,
                screen_init: press_screen,
                screen_move: press_screen,
                recent_cursor: Vec2::INFINITY,
            });
            focus::attach_tracking_cameras(&mut views, &pose, view);
            return;
        }
    } else if transform_mode.0 != TransformMode::Translate {
        return;
    }

    if ray_hits_obb(origin, dir, pose.transform(), pose.scale).is_some() {
        if selected.pinned {
            return;
        }
        let Some(plane_hit) = ray_plane_hit(origin, dir, planes.center, planes.normal(view)) else {
            return;
        };
        let inverse_parent = Mat4::IDENTITY;
        interaction.action = InteractionAction::Translating(TranslationState {
            view,
            grab_offset: plane_hit - pose.center,
            inverse_parent,
            last_cursor: Vec2::INFINITY,
        });
    }
}

/// Click picking in the perspective view: the nearest box under the cursor
/// becomes the selection candidate, empty space clears it. Context clicks
/// surface the active element to the host menu.
pub fn pick_on_click(
    mut pointers: EventReader<CanvasPointerEvent>,
    interaction: Res<Interaction>,
    views: Res<Views>,
    objects: Res<AnnotatedObjects>,
    active: Res<ActiveElement>,
    draw: Res<DrawMode>,
    group: Res<GroupMode>,
    mut selected_events: EventWriter<SelectedEvent>,
    mut context_events: EventWriter<ContextMenuEvent>,
) {
    for pointer in pointers.read() {
        if pointer.view != ViewKind::Perspective {
            continue;
        }
        if pointer.kind == PointerKind::ContextMenu {
            if let Some(client_id) = active.client_id {
                context_events.write(ContextMenuEvent {
                    client_id,
                    screen: pointer.screen,
                });
            }
            continue;
        }
        if pointer.kind != PointerKind::Press
            || !interaction.selectable
            || !matches!(interaction.action, InteractionAction::Idle)
            || draw.enabled
            || group.enabled
        {
            continue;
        }

        let state = views.get(ViewKind::Perspective);
        let Some(ray) = state.camera.viewport_to_world(pointer.ndc, state.aspect()) else {
            continue;
        };
        let origin = ray.origin;
        let dir = ray.direction.as_vec3();

        let mut best: Option<(i64, f32)> = None;
        for object in &objects.objects {
            if object.hidden {
                continue;
            }
            let pose = object.pose();
            if let Some(t) = ray_hits_obb(origin, dir, pose.transform(), pose.scale) {
                if t > 0.0 && best.is_none_or(|(_, best_t)| t < best_t) {
                    best = Some((object.client_id, t));
                }
            }
        }
        selected_events.write(SelectedEvent {
            client_id: best.map(|(id, _)| id),
        });
    }
}
