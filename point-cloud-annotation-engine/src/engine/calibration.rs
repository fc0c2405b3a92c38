use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CalibrationError {
    #[error("image dimensions must be positive, got {0}x{1}")]
    BadDimensions(f32, f32),
    #[error("intrinsic matrix is singular")]
    SingularIntrinsic,
}

/// Extrinsic/intrinsic calibration of one external image context, loaded as
/// a JSON asset. Row-major matrices, pixel dimensions.
#[derive(Debug, Clone, Serialize, Deserialize, Asset, TypePath)]
pub struct CameraCalibration {
    pub rotation: [[f32; 3]; 3],
    pub translation: [f32; 3],
    pub intrinsic: [[f32; 3]; 3],
    pub width: f32,
    pub height: f32,
}

impl CameraCalibration {
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(CalibrationError::BadDimensions(self.width, self.height));
        }
        if self.intrinsic_matrix().determinant().abs() <= f32::EPSILON {
            return Err(CalibrationError::SingularIntrinsic);
        }
        Ok(())
    }

    /// World-to-camera rigid transform as a homogeneous matrix.
    pub fn extrinsic_matrix(&self) -> Mat4 {
        let r = &self.rotation;
        let t = &self.translation;
        Mat4::from_cols(
            Vec4::new(r[0][0], r[1][0], r[2][0], 0.0),
            Vec4::new(r[0][1], r[1][1], r[2][1], 0.0),
            Vec4::new(r[0][2], r[1][2], r[2][2], 0.0),
            Vec4::new(t[0], t[1], t[2], 1.0),
        )
    }

    /// Camera-to-pixel projection matrix.
    pub fn intrinsic_matrix(&self) -> Mat3 {
        let k = &self.intrinsic;
        Mat3::from_cols(
            Vec3::new(k[0][0], k[1][0], k[2][0]),
            Vec3::new(k[0][1], k[1][1], k[2][1]),
            Vec3::new(k[0][2], k[1][2], k[2][2]),
        )
    }
}

/// Calibration handles keyed by image-context name. A context with no entry
/// simply never projects; that is not an error.
#[derive(Resource, Debug, Default)]
pub struct CalibrationLibrary {
    contexts: HashMap<String, Handle<CameraCalibration>>,
}

impl CalibrationLibrary {
    pub fn insert(&mut self, context: impl Into<String>, handle: Handle<CameraCalibration>) {
        self.contexts.insert(context.into(), handle);
    }

    pub fn remove(&mut self, context: &str) {
        self.contexts.remove(context);
    }

    pub fn handle(&self, context: &str) -> Option<&Handle<CameraCalibration>> {
        self.contexts.get(context)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Handle<CameraCalibration>)> {
        self.contexts.iter()
    }
}
