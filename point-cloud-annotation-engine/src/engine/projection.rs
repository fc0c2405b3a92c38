use bevy::prelude::*;

use crate::engine::annotations::{AnnotatedObjects, ObjectsUpdatedEvent};
use crate::engine::calibration::{CalibrationLibrary, CameraCalibration};
use crate::engine::cuboid::{CuboidPose, IMAGE_CORNER_ORDER};

/// Pixel-space projection of one annotated cuboid onto one calibrated image
/// context: 8 corners in the documented order plus the clamped enclosing
/// rectangle.
#[derive(Event, Debug, Clone)]
pub struct CuboidProjectedEvent {
    pub context: String,
    pub client_id: i64,
    pub points: [f32; 16],
    pub rect: [f32; 4],
}

/// Projects the 8 cuboid corners into calibrated pixel coordinates.
///
/// Any corner behind the camera plane (camera-frame z <= 0) kills the whole
/// projection — a hard visibility gate, not an approximation. The output is
/// re-permuted from the canonical corner order into the fixed consumer order.
pub fn project_cuboid(pose: &CuboidPose, calib: &CameraCalibration) -> Option<[f32; 16]> {
    let extrinsic = calib.extrinsic_matrix();
    let intrinsic = calib.intrinsic_matrix();
    let corners = pose.corners(1.0);

    let mut canonical = [Vec2::ZERO; 8];
    for (i, corner) in corners.iter().enumerate() {
        let cam = extrinsic.transform_point3(*corner);
        if cam.z <= 0.0 {
            return None;
        }
        let pixel = intrinsic * cam;
        let projected = Vec2::new(pixel.x / cam.z, pixel.y / cam.z);
        if !projected.is_finite() {
            return None;
        }
        canonical[i] = projected;
    }

    let mut points = [0.0; 16];
    for (slot, corner) in IMAGE_CORNER_ORDER.iter().enumerate() {
        points[slot * 2] = canonical[*corner].x;
        points[slot * 2 + 1] = canonical[*corner].y;
    }
    Some(points)
}

/// Enclosing rectangle of the projected corners, clamped to the image:
/// `[x_min, y_min, x_max, y_max]` within `[0, width] x [0, height]`.
pub fn project_to_rect(pose: &CuboidPose, calib: &CameraCalibration) -> Option<[f32; 4]> {
    let points = project_cuboid(pose, calib)?;
    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);
    for pair in points.chunks_exact(2) {
        min = min.min(Vec2::new(pair[0], pair[1]));
        max = max.max(Vec2::new(pair[0], pair[1]));
    }
    Some([
        min.x.clamp(0.0, calib.width),
        min.y.clamp(0.0, calib.height),
        max.x.clamp(0.0, calib.width),
        max.y.clamp(0.0, calib.height),
    ])
}

/// Re-projects every annotated cuboid onto every calibrated context whenever
/// the store pushes an object update. Contexts without loaded calibration
/// are skipped silently.
pub fn project_annotated_cuboids(
    mut updates: EventReader<ObjectsUpdatedEvent>,
    objects: Res<AnnotatedObjects>,
    library: Res<CalibrationLibrary>,
    calibrations: Res<Assets<CameraCalibration>>,
    mut projected: EventWriter<CuboidProjectedEvent>,
) {
    if updates.read().last().is_none() {
        return;
    }
    for (context, handle) in library.iter() {
        let Some(calib) = calibrations.get(handle) else {
            continue;
        };
        if let Err(err) = calib.validate() {
            warn!("calibration for context {context} rejected: {err}");
            continue;
        }
        for object in &objects.objects {
            let pose = object.pose();
            let Some(points) = project_cuboid(&pose, calib) else {
                continue;
            };
            let Some(rect) = project_to_rect(&pose, calib) else {
                continue;
            };
            projected.write(CuboidProjectedEvent {
                context: context.clone(),
                client_id: object.client_id,
                points,
                rect,
            });
        }
    }
}
