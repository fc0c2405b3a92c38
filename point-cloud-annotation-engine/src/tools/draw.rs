//! Draw mode: a preview cuboid follows the perspective cursor over the
//! ground plane until the user confirms or cancels.

use bevy::prelude::*;

use crate::engine::annotations::ObjectRecord;
use crate::engine::camera::focus::SceneFrame;
use crate::engine::camera::ray::ray_plane_hit;
use crate::engine::camera::view::{ViewKind, Views};
use crate::engine::core::canvas_state::CanvasStage;
use crate::engine::core::events::{
    CanceledEvent, CanvasCommand, CanvasPointerEvent, DrawnEvent, EditedEvent, PointerKind,
};
use crate::engine::cuboid::CuboidPose;

/// Draw-mode state. `redraw` repaints an existing object in place; `initial`
/// seeds the new object's store fields.
#[derive(Resource, Debug, Default)]
pub struct DrawMode {
    pub enabled: bool,
    pub redraw: Option<i64>,
    pub initial: Option<ObjectRecord>,
    pub preview: CuboidPose,
}

pub fn handle_draw_commands(
    mut commands: EventReader<CanvasCommand>,
    mut draw: ResMut<DrawMode>,
    mut canceled: EventWriter<CanceledEvent>,
) {
    for command in commands.read() {
        match command {
            CanvasCommand::EnterDrawMode { initial, redraw } => {
                draw.enabled = true;
                draw.redraw = *redraw;
                draw.initial = initial.clone();
                draw.preview = initial
                    .as_ref()
                    .map(|record| record.pose())
                    .unwrap_or_default();
                info!("draw mode entered (redraw: {:?})", draw.redraw);
            }
            CanvasCommand::CancelDraw => {
                if draw.enabled {
                    *draw = DrawMode::default();
                    canceled.write(CanceledEvent);
                }
            }
            _ => {}
        }
    }
}

/// The preview cuboid follows the perspective-view ground-plane hit each
/// frame while draw mode is active.
pub fn update_draw_preview(views: Res<Views>, frame: Res<SceneFrame>, mut draw: ResMut<DrawMode>) {
    if !draw.enabled {
        return;
    }
    let Some(ray) = views.perspective.cursor_ray() else {
        return;
    };
    let ground = Vec3::new(0.0, 0.0, frame.coordinates.z);
    let Some(hit) = ray_plane_hit(ray.origin, ray.direction.as_vec3(), ground, Vec3::Z) else {
        return;
    };
    draw.preview.center = hit;
}

/// Confirms the drawing on a perspective double-click: an existing object
/// being redrawn reports `edited`, a fresh cuboid reports `drawn`; either
/// way draw mode ends with a `canceled` notification, matching the
/// cancellation-is-total contract.
pub fn complete_draw(
    mut pointers: EventReader<CanvasPointerEvent>,
    mut draw: ResMut<DrawMode>,
    mut drawn: EventWriter<DrawnEvent>,
    mut edited: EventWriter<EditedEvent>,
    mut canceled: EventWriter<CanceledEvent>,
) {
    for pointer in pointers.read() {
        if !draw.enabled
            || pointer.view != ViewKind::Perspective
            || pointer.kind != PointerKind::DoubleClick
        {
            continue;
        }
        let points = draw.preview.to_record();
        match draw.redraw {
            Some(client_id) => {
                edited.write(EditedEvent { client_id, points });
            }
            None => {
                drawn.write(DrawnEvent {
                    points,
                    initial: draw.initial.clone(),
                    continues: false,
                });
            }
        }
        canceled.write(CanceledEvent);
        *draw = DrawMode::default();
        info!("draw completed");
    }
}

pub struct DrawToolPlugin;

impl Plugin for DrawToolPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DrawMode>()
            .add_systems(Update, handle_draw_commands)
            .add_systems(
                Update,
                (update_draw_preview, complete_draw)
                    .chain()
                    .run_if(in_state(CanvasStage::Running)),
            );
    }
}
