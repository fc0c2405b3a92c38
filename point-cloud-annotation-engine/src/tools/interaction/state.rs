use bevy::math::EulerRot;
use bevy::prelude::*;

use crate::engine::camera::view::ViewKind;
use crate::engine::cuboid::CuboidPose;

/// The one interaction automaton. A pointer press over a viewport starts a
/// scan; the first subsequent frame resolves the scan into a concrete
/// gesture; release or leave always returns to `Idle`, commit or not.
/// Each arm carries only the scratch state its gesture needs, so stale
/// combinations cannot be represented.
#[derive(Debug, Clone, Default)]
pub enum InteractionAction {
    #[default]
    Idle,
    Scanning {
        view: ViewKind,
        press_screen: Vec2,
    },
    Translating(TranslationState),
    Rotating(RotationState),
    Resizing(ResizeState),
}

impl InteractionAction {
    /// A scan that resolved into a gesture counts as detected; release will
    /// commit instead of discarding.
    pub fn detected(&self) -> bool {
        matches!(
            self,
            Self::Translating(_) | Self::Rotating(_) | Self::Resizing(_)
        )
    }
}

#[derive(Debug, Clone)]
pub struct TranslationState {
    pub view: ViewKind,
    /// Plane-hit offset from the box center at grab time, so the box does
    /// not jump under the cursor.
    pub grab_offset: Vec3,
    /// Inverse of the box parent transform captured at grab time.
    pub inverse_parent: Mat4,
    pub last_cursor: Vec2,
}

#[derive(Debug, Clone)]
pub struct RotationState {
    pub view: ViewKind,
    /// Previous and current frame cursor positions, viewport pixels.
    pub screen_init: Vec2,
    pub screen_move: Vec2,
    pub recent_cursor: Vec2,
}

#[derive(Debug, Clone)]
pub struct ResizeState {
    pub view: ViewKind,
    /// Cursor NDC at the moment the handle was grabbed.
    pub initial_cursor: Vec2,
    pub recent_cursor: Vec2,
    pub init_scales: Vec3,
    pub mem_scales: Vec3,
    /// Accumulated plane-local position correction keeping the opposite
    /// corner anchored while the box grows.
    pub correction: Vec2,
    /// First-frame flag of the front-view axis swap.
    pub front_toggle: bool,
}

impl ResizeState {
    pub fn new(view: ViewKind, initial_cursor: Vec2, scale: Vec3) -> Self {
        Self {
            view,
            initial_cursor,
            recent_cursor: Vec2::INFINITY,
            init_scales: scale,
            mem_scales: scale,
            correction: Vec2::ZERO,
            front_toggle: false,
        }
    }
}

#[derive(Resource, Debug)]
pub struct Interaction {
    pub action: InteractionAction,
    /// Cleared while a gesture runs so hover picking cannot steal the
    /// active element mid-drag.
    pub selectable: bool,
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            action: InteractionAction::Idle,
            selectable: true,
        }
    }
}

impl Interaction {
    /// Unconditional return to `Idle`; scratch state of whatever mode was
    /// active is dropped with the enum arm.
    pub fn reset(&mut self) {
        self.action = InteractionAction::Idle;
        self.selectable = true;
    }
}

/// The invisible ray-cast planes the gestures drag against, one per
/// orthographic view, kept centered on the active box between gestures.
#[derive(Resource, Debug, Clone)]
pub struct ReferencePlanes {
    pub center: Vec3,
    top: Quat,
    side: Quat,
    front: Quat,
}

impl Default for ReferencePlanes {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            top: Self::default_local(ViewKind::Top),
            side: Self::default_local(ViewKind::Side),
            front: Self::default_local(ViewKind::Front),
        }
    }
}

impl ReferencePlanes {
    /// Default plane orientation per view. Local X/Y track the view's
    /// screen right/up (the front view carries the historical quarter-turn
    /// twist the resize sign rules encode).
    fn default_local(view: ViewKind) -> Quat {
        match view {
            ViewKind::Side => Quat::from_euler(
                EulerRot::XYZ,
                -std::f32::consts::FRAC_PI_2,
                std::f32::consts::PI / 2000.0,
                std::f32::consts::PI,
            ),
            ViewKind::Front => {
                Quat::from_euler(EulerRot::XYZ, 0.0, std::f32::consts::FRAC_PI_2, 0.0)
            }
            _ => Quat::IDENTITY,
        }
    }

    pub fn orientation(&self, view: ViewKind) -> Quat {
        match view {
            ViewKind::Side => self.side,
            ViewKind::Front => self.front,
            _ => self.top,
        }
    }

    pub fn normal(&self, view: ViewKind) -> Vec3 {
        self.orientation(view) * Vec3::Z
    }

    /// Re-derives every plane from the box pose and re-homes the centers,
    /// as happens on activation.
    pub fn reset_for(&mut self, pose: &CuboidPose) {
        let rotation = pose.rotation_quat();
        self.center = pose.center;
        self.top = rotation * Self::default_local(ViewKind::Top);
        self.side = rotation * Self::default_local(ViewKind::Side);
        self.front = rotation * Self::default_local(ViewKind::Front);
    }

    /// Applies one rotation detent from a gesture in `gesture` view. The
    /// per-view axis mapping keeps the three orthographic views mutually
    /// consistent: a top-view rotation yaws all planes, side/front apply the
    /// correlated pitch/roll mapping.
    pub fn rotate_for_gesture(&mut self, gesture: ViewKind, angle: f32) {
        match gesture {
            ViewKind::Top => {
                self.top *= Quat::from_rotation_z(angle);
                self.side *= Quat::from_rotation_y(angle);
                self.front *= Quat::from_rotation_x(-angle);
            }
            ViewKind::Side => {
                self.top *= Quat::from_rotation_y(angle);
                self.side *= Quat::from_rotation_z(angle);
                self.front *= Quat::from_rotation_y(angle);
            }
            ViewKind::Front => {
                self.top *= Quat::from_rotation_x(angle);
                self.side *= Quat::from_rotation_x(-angle);
                self.front *= Quat::from_rotation_z(angle);
            }
            ViewKind::Perspective => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_always_lands_in_idle() {
        let mut interaction = Interaction {
            action: InteractionAction::Resizing(ResizeState::new(
                ViewKind::Top,
                Vec2::new(0.1, 0.1),
                Vec3::ONE,
            )),
            selectable: false,
        };
        interaction.reset();
        assert!(matches!(interaction.action, InteractionAction::Idle));
        assert!(interaction.selectable);
    }

    #[test]
    fn top_plane_normal_faces_its_camera() {
        let planes = ReferencePlanes::default();
        assert!((planes.normal(ViewKind::Top) - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn plane_axes_follow_a_yawed_box() {
        let mut planes = ReferencePlanes::default();
        let pose = CuboidPose::new(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2),
            Vec3::ONE,
        );
        planes.reset_for(&pose);
        assert_eq!(planes.center, pose.center);
        let local_x = planes.orientation(ViewKind::Top) * Vec3::X;
        assert!((local_x - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn top_gesture_yaws_every_plane() {
        let mut planes = ReferencePlanes::default();
        let before = planes.normal(ViewKind::Top);
        planes.rotate_for_gesture(ViewKind::Top, 0.3);
        // Yaw keeps the top plane facing its camera while spinning in-plane.
        assert!((planes.normal(ViewKind::Top) - before).length() < 1e-5);
        let spun = planes.orientation(ViewKind::Top) * Vec3::X;
        assert!((spun - Vec3::X).length() > 0.1);
    }
}
