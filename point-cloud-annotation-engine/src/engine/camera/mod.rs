use bevy::prelude::*;

use crate::engine::core::canvas_state::CanvasStage;

/// Camera focus, framing and tracking behaviour.
pub mod focus;

/// Ray intersection primitives shared by hit-testing and translation.
pub mod ray;

/// The four viewport cameras and their projection math.
pub mod view;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<view::Views>()
            .init_resource::<focus::SceneFrame>()
            .add_systems(Update, focus::handle_camera_commands)
            .add_systems(
                Update,
                focus::follow_tracked_object.run_if(in_state(CanvasStage::Running)),
            )
            .add_systems(OnEnter(CanvasStage::Running), focus::frame_scene);
    }
}
