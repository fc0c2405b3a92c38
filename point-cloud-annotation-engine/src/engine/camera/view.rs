use bevy::math::Ray3d;
use bevy::prelude::*;

use constants::canvas_settings::{
    FOV_DEFAULT, FOV_INC, FOV_MAX, FOV_MIN, HELPER_RADIUS, HELPER_SIZE_DIVISOR, ZOOM_FACTOR,
};
use constants::coordinate_system::SCENE_UP;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Perspective,
    Top,
    Side,
    Front,
}

impl ViewKind {
    pub const ALL: [Self; 4] = [Self::Perspective, Self::Top, Self::Side, Self::Front];
    pub const ORTHOGRAPHIC: [Self; 3] = [Self::Top, Self::Side, Self::Front];

    pub fn is_orthographic(self) -> bool {
        self != Self::Perspective
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ViewProjection {
    Perspective { fov_y: f32, near: f32, far: f32 },
    Orthographic { view_size: f32, zoom: f32, near: f32, far: f32 },
}

/// How a viewport camera derives its world pose each frame. `TrackingObject`
/// replaces the original scene-graph re-parenting during rotation gestures:
/// the camera stores its pose in box-local space and the world pose is
/// recomputed from the live cuboid transform.
#[derive(Debug, Clone, Copy, Default)]
pub enum CameraMode {
    #[default]
    Free,
    TrackingObject { local: Mat4 },
}

#[derive(Debug, Clone)]
pub struct ViewCamera {
    pub transform: Transform,
    pub projection: ViewProjection,
    pub mode: CameraMode,
}

impl ViewCamera {
    pub fn forward(&self) -> Vec3 {
        self.transform.forward().as_vec3()
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        match self.projection {
            ViewProjection::Perspective { fov_y, near, far } => {
                Mat4::perspective_rh(fov_y, aspect, near, far)
            }
            ViewProjection::Orthographic {
                view_size,
                zoom,
                near,
                far,
            } => {
                let half_h = view_size * 0.5 / zoom;
                let half_w = half_h * aspect;
                Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, near, far)
            }
        }
    }

    /// Ray through the viewport cursor, in world space.
    pub fn viewport_to_world(&self, ndc: Vec2, aspect: f32) -> Option<Ray3d> {
        if !ndc.is_finite() {
            return None;
        }
        match self.projection {
            ViewProjection::Perspective { fov_y, .. } => {
                let tan = (fov_y * 0.5).tan();
                let local = Vec3::new(ndc.x * tan * aspect, ndc.y * tan, -1.0);
                let direction = Dir3::new(self.transform.rotation * local).ok()?;
                Some(Ray3d::new(self.transform.translation, direction))
            }
            ViewProjection::Orthographic {
                view_size, zoom, ..
            } => {
                let half_h = view_size * 0.5 / zoom;
                let right = self.transform.right().as_vec3();
                let up = self.transform.up().as_vec3();
                let origin = self.transform.translation
                    + right * (ndc.x * half_h * aspect)
                    + up * (ndc.y * half_h);
                let direction = Dir3::new(self.forward()).ok()?;
                Some(Ray3d::new(origin, direction))
            }
        }
    }

    /// Projects a world point to this viewport's normalized device
    /// coordinates; z carries the clip-space depth.
    pub fn world_to_ndc(&self, world: Vec3, aspect: f32) -> Option<Vec3> {
        let view = self.transform.compute_matrix().inverse();
        let clip = self.projection_matrix(aspect) * view * world.extend(1.0);
        if clip.w.abs() <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        ndc.is_finite().then_some(ndc)
    }

    /// Signed distance of a world point along the camera's viewing direction.
    pub fn view_depth(&self, world: Vec3) -> f32 {
        self.forward().dot(world - self.transform.translation)
    }

    /// World-space radius of the interaction helper markers; scales with the
    /// orthographic zoom so markers keep a constant apparent size.
    pub fn helper_radius(&self) -> f32 {
        match self.projection {
            ViewProjection::Orthographic {
                view_size, zoom, ..
            } => HELPER_RADIUS * (view_size / zoom) / HELPER_SIZE_DIVISOR,
            ViewProjection::Perspective { .. } => HELPER_RADIUS,
        }
    }

    /// Wheel zoom of an orthographic viewport: one fixed increment per wheel
    /// notch, clamped to the FOV limits.
    pub fn zoom_by(&mut self, delta: f32) {
        if let ViewProjection::Orthographic { zoom, .. } = &mut self.projection {
            *zoom = (*zoom + delta.signum() * FOV_INC).clamp(FOV_MIN, FOV_MAX);
        }
    }
}

/// Per-viewport interaction state: the camera plus the latest cursor sample.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub camera: ViewCamera,
    pub cursor_ndc: Vec2,
    pub cursor_screen: Vec2,
    pub viewport: Vec2,
    pub enabled: bool,
}

impl ViewState {
    fn new(camera: ViewCamera) -> Self {
        Self {
            camera,
            cursor_ndc: Vec2::ZERO,
            cursor_screen: Vec2::ZERO,
            viewport: Vec2::new(800.0, 600.0),
            enabled: true,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.x / self.viewport.y.max(1.0)
    }

    pub fn cursor_ray(&self) -> Option<Ray3d> {
        self.camera.viewport_to_world(self.cursor_ndc, self.aspect())
    }
}

/// The four synchronized viewports.
#[derive(Resource, Debug, Clone)]
pub struct Views {
    pub perspective: ViewState,
    pub top: ViewState,
    pub side: ViewState,
    pub front: ViewState,
}

impl Default for Views {
    fn default() -> Self {
        let orthographic = |translation: Vec3, up: Vec3| {
            ViewCamera {
                transform: Transform::from_translation(translation).looking_at(Vec3::ZERO, up),
                projection: ViewProjection::Orthographic {
                    view_size: ZOOM_FACTOR,
                    zoom: FOV_DEFAULT,
                    near: -50.0,
                    far: 50.0,
                },
                mode: CameraMode::Free,
            }
        };
        Self {
            perspective: ViewState::new(ViewCamera {
                transform: Transform::from_translation(Vec3::new(-15.0, 0.0, 4.0))
                    .looking_at(Vec3::new(10.0, 0.0, 0.0), SCENE_UP),
                projection: ViewProjection::Perspective {
                    fov_y: 50.0_f32.to_radians(),
                    near: 1.0,
                    far: 500.0,
                },
                mode: CameraMode::Free,
            }),
            top: ViewState::new(orthographic(Vec3::new(0.0, 0.0, 5.0), Vec3::Y)),
            side: ViewState::new(orthographic(Vec3::new(0.0, 5.0, 0.0), SCENE_UP)),
            front: ViewState::new(orthographic(Vec3::new(3.0, 0.0, 0.0), SCENE_UP)),
        }
    }
}

impl Views {
    pub fn get(&self, kind: ViewKind) -> &ViewState {
        match kind {
            ViewKind::Perspective => &self.perspective,
            ViewKind::Top => &self.top,
            ViewKind::Side => &self.side,
            ViewKind::Front => &self.front,
        }
    }

    pub fn get_mut(&mut self, kind: ViewKind) -> &mut ViewState {
        match kind {
            ViewKind::Perspective => &mut self.perspective,
            ViewKind::Top => &mut self.top,
            ViewKind::Side => &mut self.side,
            ViewKind::Front => &mut self.front,
        }
    }
}
