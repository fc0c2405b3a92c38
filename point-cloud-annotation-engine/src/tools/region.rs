//! Region selection: picking point subsets through a drawn 2D outline,
//! maintaining the derived selection outline, and painting the selection.

use std::collections::HashSet;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use constants::canvas_settings::{OUTLINE_DISC_RADIUS, OUTLINE_DISC_SEGMENTS};

use crate::engine::camera::view::{ViewState, Views};
use crate::engine::core::canvas_state::{CanvasOptions, CanvasStage};
use crate::engine::core::events::{CanvasCommand, SelectionOutlineEvent};
use crate::engine::point_cloud::PointCloud;
use crate::tools::polygon;

/// How a drawn region combines with the existing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    Add,
    Remove,
    Toggle,
}

/// The ephemeral point selection. Indices always reference the live cloud;
/// the whole region is dropped when the cloud reloads.
#[derive(Resource, Debug, Default)]
pub struct SelectionRegion {
    pub indices: HashSet<u32>,
    pub outline_ndc: Vec<Vec2>,
}

impl SelectionRegion {
    pub fn clear(&mut self) {
        self.indices.clear();
        self.outline_ndc.clear();
    }

    /// Whether a viewport position falls inside the selection outline.
    pub fn hit(&self, ndc: Vec2) -> bool {
        polygon::point_in_polygon(ndc, &self.outline_ndc)
    }
}

/// Applies one drawn region to the selection. Candidate points are projected
/// into the drawing view's NDC frame; points behind the camera never
/// qualify. Returns how many points fell inside the region.
pub fn select_by_polygon(
    cloud: &PointCloud,
    view: &ViewState,
    polygon_ndc: &[Vec2],
    mode: SelectionMode,
    selection: &mut SelectionRegion,
) -> usize {
    if polygon_ndc.len() < 3 {
        return 0;
    }
    let aspect = view.aspect();
    let mut inside = Vec::new();
    for (i, position) in cloud.positions().iter().enumerate() {
        if view.camera.view_depth(*position) <= 0.0 {
            continue;
        }
        let Some(ndc) = view.camera.world_to_ndc(*position, aspect) else {
            continue;
        };
        if polygon::point_in_polygon(ndc.truncate(), polygon_ndc) {
            inside.push(i as u32);
        }
    }

    for index in &inside {
        match mode {
            SelectionMode::Add => {
                selection.indices.insert(*index);
            }
            SelectionMode::Remove => {
                selection.indices.remove(index);
            }
            SelectionMode::Toggle => {
                if !selection.indices.insert(*index) {
                    selection.indices.remove(index);
                }
            }
        }
    }
    inside.len()
}

/// Recomputes the outline of the selection as seen from `view`: the convex
/// hull of the projected selection, inflated by unioning a small disc onto
/// every hull vertex. Degenerate selections yield no outline.
pub fn selection_outline(
    cloud: &PointCloud,
    view: &ViewState,
    selection: &SelectionRegion,
) -> Option<Vec<Vec2>> {
    let aspect = view.aspect();
    let projected: Vec<Vec2> = selection
        .indices
        .iter()
        .filter_map(|i| view.camera.world_to_ndc(cloud.position(*i), aspect))
        .map(|ndc| ndc.truncate())
        .collect();
    let hull = polygon::convex_hull(&projected)?;
    polygon::inflate_hull(&hull, OUTLINE_DISC_RADIUS, OUTLINE_DISC_SEGMENTS)
}

/// NDC outline flattened into viewport pixel coordinates.
pub fn outline_to_screen(outline: &[Vec2], viewport: Vec2) -> Vec<f32> {
    let mut flat = Vec::with_capacity(outline.len() * 2);
    for point in outline {
        flat.push(((point.x + 1.0) * viewport.x / 2.0).round());
        flat.push(((-point.y + 1.0) * viewport.y / 2.0).round());
    }
    flat
}

/// Handles drawn regions: updates the selection, paints the selected points
/// and reports the refreshed outline.
pub fn apply_drawn_regions(
    mut commands: EventReader<CanvasCommand>,
    mut cloud: ResMut<PointCloud>,
    mut selection: ResMut<SelectionRegion>,
    views: Res<Views>,
    options: Res<CanvasOptions>,
    mut outlines: EventWriter<SelectionOutlineEvent>,
) {
    for command in commands.read() {
        let CanvasCommand::RegionDrawn {
            view,
            polygon_ndc,
            mode,
        } = command
        else {
            continue;
        };
        let state = views.get(*view);
        let found = select_by_polygon(&cloud, state, polygon_ndc, *mode, &mut selection);
        debug!("region selection hit {found} points, {} total", selection.indices.len());

        for index in selection.indices.clone() {
            cloud.paint(index, options.selection_color);
        }

        match selection_outline(&cloud, state, &selection) {
            Some(outline) => {
                let flat = outline_to_screen(&outline, state.viewport);
                selection.outline_ndc = outline;
                outlines.write(SelectionOutlineEvent { polygon: flat });
            }
            None => {
                selection.outline_ndc.clear();
                warn!("selection outline needs at least 3 distinct projected points");
            }
        }
    }
}

pub struct RegionSelectPlugin;

impl Plugin for RegionSelectPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectionRegion>().add_systems(
            Update,
            (apply_drawn_regions, crate::tools::box_fit::create_from_rect)
                .run_if(in_state(CanvasStage::Running)),
        );
    }
}
