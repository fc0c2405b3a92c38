//! Interactive cuboid annotation core for 3D point clouds.
//!
//! The host application owns rendering, widget layout and persistence; this
//! crate owns the annotation engine: a grid index over the cloud, oriented-box
//! geometry, calibrated-image projection, 2D region selection, and the
//! four-viewport interaction state machine. Everything is exposed as bevy
//! plugins, resources and events — add [`AnnotationCanvasPlugin`], feed the
//! inbound events and consume the outbound ones.

pub mod engine;
pub mod tools;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::engine::calibration::{CalibrationLibrary, CameraCalibration};
use crate::engine::camera::CameraPlugin;
use crate::engine::core::canvas_state::{
    CanvasOptions, CanvasStage, handle_appearance_commands,
};
use crate::engine::core::events::*;
use crate::engine::annotations::{
    ActivateObjectEvent, ActiveElement, AnnotatedObjects, ObjectsUpdatedEvent,
    sync_selected_object,
};
use crate::engine::point_cloud::{
    PointCloud, PointCloudLoadedEvent, build_scene_index, ingest_point_cloud,
};
use crate::engine::projection::{CuboidProjectedEvent, project_annotated_cuboids};
use crate::tools::colorize::{colorize_full_cloud, colorize_on_change};
use crate::tools::draw::DrawToolPlugin;
use crate::tools::group::GroupToolPlugin;
use crate::tools::interaction::InteractionPlugin;
use crate::tools::region::RegionSelectPlugin;

/// Top-level plugin wiring the whole annotation canvas together.
pub struct AnnotationCanvasPlugin;

impl Plugin for AnnotationCanvasPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<StatesPlugin>() {
            app.add_plugins(StatesPlugin);
        }
        if !app.is_plugin_added::<AssetPlugin>() {
            app.add_plugins(AssetPlugin::default());
        }
        app.add_plugins(JsonAssetPlugin::<CameraCalibration>::new(&["json"]))
            .init_state::<CanvasStage>()
            .init_resource::<CanvasOptions>()
            .init_resource::<PointCloud>()
            .init_resource::<AnnotatedObjects>()
            .init_resource::<ActiveElement>()
            .init_resource::<CalibrationLibrary>()
            .add_event::<PointCloudLoadedEvent>()
            .add_event::<ObjectsUpdatedEvent>()
            .add_event::<ActivateObjectEvent>()
            .add_event::<CanvasPointerEvent>()
            .add_event::<CanvasCommand>()
            .add_event::<SelectedEvent>()
            .add_event::<EditedEvent>()
            .add_event::<DrawnEvent>()
            .add_event::<CanceledEvent>()
            .add_event::<GrouppedEvent>()
            .add_event::<ContextMenuEvent>()
            .add_event::<SelectionOutlineEvent>()
            .add_event::<CuboidProjectedEvent>()
            .add_plugins((
                CameraPlugin,
                InteractionPlugin,
                RegionSelectPlugin,
                DrawToolPlugin,
                GroupToolPlugin,
            ))
            .add_systems(
                Update,
                (ingest_point_cloud, build_scene_index, handle_appearance_commands).chain(),
            )
            .add_systems(
                Update,
                (sync_selected_object, colorize_on_change, project_annotated_cuboids)
                    .chain()
                    .run_if(in_state(CanvasStage::Running)),
            )
            .add_systems(OnEnter(CanvasStage::Running), colorize_full_cloud);
    }
}
