use bevy::prelude::*;

use crate::engine::annotations::{AnnotatedObjects, SelectedCuboid};
use crate::engine::camera::focus;
use crate::engine::camera::view::Views;
use crate::engine::core::events::{CanvasPointerEvent, EditedEvent, PointerKind};
use crate::tools::interaction::state::{Interaction, InteractionAction, ReferencePlanes};

/// Pointer release or leave ends the gesture unconditionally. A scan that
/// never resolved dies silently; a detected gesture reads the final pose
/// back, reports it to the store, re-homes the reference planes and restores
/// the orthographic cameras.
pub fn complete_on_release(
    mut pointers: EventReader<CanvasPointerEvent>,
    mut interaction: ResMut<Interaction>,
    selected: Option<Res<SelectedCuboid>>,
    mut objects: ResMut<AnnotatedObjects>,
    mut views: ResMut<Views>,
    mut planes: ResMut<ReferencePlanes>,
    mut edited: EventWriter<EditedEvent>,
) {
    let released = pointers
        .read()
        .any(|p| matches!(p.kind, PointerKind::Release | PointerKind::Leave));
    if !released || matches!(interaction.action, InteractionAction::Idle) {
        return;
    }

    if !interaction.action.detected() {
        interaction.reset();
        return;
    }
    let Some(cuboid) = selected else {
        interaction.reset();
        return;
    };

    let was_rotating = matches!(interaction.action, InteractionAction::Rotating(_));
    let pose = cuboid.pose;
    let points = pose.to_record();

    if let Some(record) = objects.get_mut(cuboid.client_id) {
        record.points = points;
    }
    edited.write(EditedEvent {
        client_id: cuboid.client_id,
        points,
    });

    if was_rotating {
        focus::detach_tracking_cameras(&mut views, &pose);
    }
    focus::adjust_ortho_cameras(&mut views, &pose);
    planes.center = pose.center;
    interaction.reset();
    info!("gesture committed for object {}", cuboid.client_id);
}

/// Losing the active element cancels whatever gesture was running; nothing
/// partially-committed survives.
pub fn abort_without_selection(
    selected: Option<Res<SelectedCuboid>>,
    mut interaction: ResMut<Interaction>,
) {
    if selected.is_none() && !matches!(interaction.action, InteractionAction::Idle) {
        interaction.reset();
    }
}
