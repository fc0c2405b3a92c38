use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::core::canvas_state::{CanvasOptions, CanvasStage};
use crate::engine::core::events::CanceledEvent;
use crate::engine::spatial_index::GridPointIndex;
use crate::tools::region::SelectionRegion;

/// The live point cloud: immutable positions with a parallel mutable color
/// buffer. Replaced wholesale when the host loads a new frame.
#[derive(Resource, Debug, Default)]
pub struct PointCloud {
    positions: Vec<Vec3>,
    colors: Vec<[f32; 3]>,
    intensities: Option<Vec<f32>>,
}

impl PointCloud {
    pub fn new(
        positions: Vec<Vec3>,
        colors: Option<Vec<[f32; 3]>>,
        intensities: Option<Vec<f32>>,
    ) -> Self {
        let colors = colors.unwrap_or_else(|| vec![[1.0, 1.0, 1.0]; positions.len()]);
        Self {
            positions,
            colors,
            intensities,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn position(&self, index: u32) -> Vec3 {
        self.positions[index as usize]
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn paint(&mut self, index: u32, color: [f32; 3]) {
        if let Some(slot) = self.colors.get_mut(index as usize) {
            *slot = color;
        }
    }

    /// Resets every point to the colormap fallback, ramped by height or by
    /// intensity where the cloud carries one.
    pub fn apply_colormap(&mut self, colormap: Colormap, mode: ColormapMode) {
        if self.positions.is_empty() {
            return;
        }
        match (mode, self.intensities.as_ref()) {
            (ColormapMode::Intensity, Some(intensities)) => {
                let (min, max) = min_max(intensities.iter().copied());
                let span = (max - min).max(f32::EPSILON);
                for (i, value) in intensities.iter().enumerate() {
                    self.colors[i] = colormap.sample((value - min) / span);
                }
            }
            _ => {
                let (min, max) = min_max(self.positions.iter().map(|p| p.z));
                let span = (max - min).max(f32::EPSILON);
                for (i, position) in self.positions.iter().enumerate() {
                    self.colors[i] = colormap.sample((position.z - min) / span);
                }
            }
        }
    }
}

fn min_max(values: impl Iterator<Item = f32>) -> (f32, f32) {
    values.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Fallback color ramps used when no annotation claims a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Default,
    Rainbow,
    CoolToWarm,
    Blackbody,
    Grayscale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColormapMode {
    #[default]
    Height,
    Intensity,
}

impl Colormap {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::Default),
            "rainbow" => Some(Self::Rainbow),
            "cooltowarm" => Some(Self::CoolToWarm),
            "blackbody" => Some(Self::Blackbody),
            "grayscale" => Some(Self::Grayscale),
            _ => None,
        }
    }

    /// Samples the ramp at `t` in [0, 1] (clamped).
    pub fn sample(&self, t: f32) -> [f32; 3] {
        let stops: &[[f32; 3]] = match self {
            Self::Default | Self::Rainbow => &[
                [0.0, 0.0, 1.0],
                [0.0, 1.0, 1.0],
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
                [1.0, 0.0, 0.0],
            ],
            Self::CoolToWarm => &[
                [0.23, 0.30, 0.75],
                [0.87, 0.87, 0.87],
                [0.71, 0.02, 0.15],
            ],
            Self::Blackbody => &[
                [0.0, 0.0, 0.0],
                [0.9, 0.0, 0.0],
                [0.9, 0.9, 0.0],
                [1.0, 1.0, 1.0],
            ],
            Self::Grayscale => &[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]],
        };

        let t = t.clamp(0.0, 1.0) * (stops.len() - 1) as f32;
        let lo = (t.floor() as usize).min(stops.len() - 2);
        let frac = t - lo as f32;
        let a = stops[lo];
        let b = stops[lo + 1];
        [
            a[0] + (b[0] - a[0]) * frac,
            a[1] + (b[1] - a[1]) * frac,
            a[2] + (b[2] - a[2]) * frac,
        ]
    }
}

/// Host-parsed buffers for a freshly loaded cloud; file parsing stays on the
/// host side.
#[derive(Event, Debug, Clone)]
pub struct PointCloudLoadedEvent {
    pub positions: Vec<Vec3>,
    pub colors: Option<Vec<[f32; 3]>>,
    pub intensities: Option<Vec<f32>>,
}

/// Swaps the cloud on load and drops the canvas back to `Loading` so no
/// per-frame interaction runs against a half-built scene. Whatever the user
/// had in flight is canceled with the frame.
pub fn ingest_point_cloud(
    mut commands: Commands,
    mut events: EventReader<PointCloudLoadedEvent>,
    mut cloud: ResMut<PointCloud>,
    mut selection: ResMut<SelectionRegion>,
    mut next_stage: ResMut<NextState<CanvasStage>>,
    mut canceled: EventWriter<CanceledEvent>,
) {
    let Some(event) = events.read().last() else {
        return;
    };
    *cloud = PointCloud::new(
        event.positions.clone(),
        event.colors.clone(),
        event.intensities.clone(),
    );
    selection.clear();
    commands.remove_resource::<GridPointIndex>();
    next_stage.set(CanvasStage::Loading);
    canceled.write(CanceledEvent);
    info!("point cloud replaced, {} points", cloud.len());
}

/// One-shot O(N) work per reload: builds the grid index and promotes the
/// canvas to `Running`.
pub fn build_scene_index(
    mut commands: Commands,
    cloud: Res<PointCloud>,
    options: Res<CanvasOptions>,
    index: Option<Res<GridPointIndex>>,
    stage: Res<State<CanvasStage>>,
    mut next_stage: ResMut<NextState<CanvasStage>>,
) {
    if *stage.get() != CanvasStage::Loading || cloud.is_empty() || index.is_some() {
        return;
    }
    match GridPointIndex::build(cloud.positions(), options.grid_cell_size) {
        Ok(index) => {
            info!(
                "grid index built: {} points, cell size {}",
                cloud.len(),
                index.cell_size()
            );
            commands.insert_resource(index);
            next_stage.set(CanvasStage::Running);
        }
        Err(err) => {
            warn!("grid index build failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colormap_samples_are_clamped_and_finite() {
        for map in [
            Colormap::Default,
            Colormap::Rainbow,
            Colormap::CoolToWarm,
            Colormap::Blackbody,
            Colormap::Grayscale,
        ] {
            for t in [-1.0, 0.0, 0.25, 0.5, 0.99, 1.0, 2.0] {
                let c = map.sample(t);
                assert!(c.iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v)));
            }
        }
    }

    #[test]
    fn height_colormap_orders_by_z() {
        let mut cloud = PointCloud::new(
            vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 10.0)],
            None,
            None,
        );
        cloud.apply_colormap(Colormap::Grayscale, ColormapMode::Height);
        assert_eq!(cloud.colors()[0], [0.0, 0.0, 0.0]);
        assert_eq!(cloud.colors()[1], [1.0, 1.0, 1.0]);
    }

    #[test]
    fn intensity_colormap_prefers_intensities() {
        let mut cloud = PointCloud::new(
            vec![Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 5.0)],
            None,
            Some(vec![0.0, 1.0]),
        );
        cloud.apply_colormap(Colormap::Grayscale, ColormapMode::Intensity);
        assert_eq!(cloud.colors()[0], [0.0, 0.0, 0.0]);
        assert_eq!(cloud.colors()[1], [1.0, 1.0, 1.0]);
    }

    #[test]
    fn colormap_names_resolve() {
        assert_eq!(Colormap::from_name("rainbow"), Some(Colormap::Rainbow));
        assert_eq!(Colormap::from_name("mindflow"), None);
    }
}
