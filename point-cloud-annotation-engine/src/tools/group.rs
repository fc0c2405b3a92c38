//! Group mode: clicking objects in the perspective view toggles their
//! membership in a pending group, reported when the host finishes the mode.

use bevy::prelude::*;

use crate::engine::annotations::AnnotatedObjects;
use crate::engine::camera::ray::ray_hits_obb;
use crate::engine::camera::view::{ViewKind, Views};
use crate::engine::core::canvas_state::CanvasStage;
use crate::engine::core::events::{
    CanceledEvent, CanvasCommand, CanvasPointerEvent, GrouppedEvent, PointerKind,
};

#[derive(Resource, Debug, Default)]
pub struct GroupMode {
    pub enabled: bool,
    pub grouped: Vec<i64>,
}

pub fn handle_group_commands(
    mut commands: EventReader<CanvasCommand>,
    mut group: ResMut<GroupMode>,
    mut groupped: EventWriter<GrouppedEvent>,
    mut canceled: EventWriter<CanceledEvent>,
) {
    for command in commands.read() {
        match command {
            CanvasCommand::EnterGroupMode => {
                group.enabled = true;
                group.grouped.clear();
            }
            CanvasCommand::FinishGroupMode => {
                if !group.enabled {
                    continue;
                }
                if group.grouped.is_empty() {
                    canceled.write(CanceledEvent);
                } else {
                    groupped.write(GrouppedEvent {
                        client_ids: std::mem::take(&mut group.grouped),
                    });
                }
                group.enabled = false;
            }
            _ => {}
        }
    }
}

/// Toggles membership of the clicked object while group mode is active.
pub fn toggle_group_membership(
    mut pointers: EventReader<CanvasPointerEvent>,
    mut group: ResMut<GroupMode>,
    views: Res<Views>,
    objects: Res<AnnotatedObjects>,
) {
    for pointer in pointers.read() {
        if !group.enabled
            || pointer.view != ViewKind::Perspective
            || pointer.kind != PointerKind::Press
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
        let Some((client_id, _)) = best else {
            continue;
        };
        if let Some(at) = group.grouped.iter().position(|id| *id == client_id) {
            group.grouped.remove(at);
        } else {
            group.grouped.push(client_id);
        }
        debug!("group membership toggled for {client_id}");
    }
}

pub struct GroupToolPlugin;

impl Plugin for GroupToolPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GroupMode>()
            .add_systems(Update, handle_group_commands)
            .add_systems(
                Update,
                toggle_group_membership.run_if(in_state(CanvasStage::Running)),
            );
    }
}
