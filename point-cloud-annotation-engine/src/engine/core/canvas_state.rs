use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::core::events::CanvasCommand;
use crate::engine::point_cloud::{Colormap, ColormapMode};

/// Canvas lifecycle. Interaction systems only run in `Running`; the stage
/// drops back to `Loading` whenever a new cloud arrives so that per-frame
/// work never races the index rebuild.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum CanvasStage {
    #[default]
    Loading,
    Running,
}

/// Which of the three object colors paints the points inside a cuboid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBy {
    #[default]
    Label,
    Instance,
    Group,
}

/// Gesture the perspective viewport resolves a box hit into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformMode {
    #[default]
    Translate,
    Rotate,
    Scale,
    Close,
}

/// Per-instance options the host may override before (or while) running.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasOptions {
    pub grid_cell_size: f32,
    pub colormap: Colormap,
    pub colormap_mode: ColormapMode,
    pub color_by: ColorBy,
    pub selection_color: [f32; 3],
    pub selected_opacity: f32,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            grid_cell_size: constants::canvas_settings::DEFAULT_GRID_CELL_SIZE,
            colormap: Colormap::default(),
            colormap_mode: ColormapMode::default(),
            color_by: ColorBy::default(),
            selection_color: [1.0, 0.0, 0.0],
            selected_opacity: 0.4,
        }
    }
}

/// Theme/colormap switching from the host. Unknown colormap names are
/// rejected without touching the current options.
pub fn handle_appearance_commands(
    mut commands: EventReader<CanvasCommand>,
    mut options: ResMut<CanvasOptions>,
) {
    for command in commands.read() {
        match command {
            CanvasCommand::SetColormap { name } => match Colormap::from_name(name) {
                Some(colormap) => options.colormap = colormap,
                None => warn!("unknown colormap {name:?} ignored"),
            },
            CanvasCommand::SetColorBy(color_by) => {
                options.color_by = *color_by;
            }
            _ => {}
        }
    }
}
