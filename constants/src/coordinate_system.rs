use bevy::math::Vec3;

/// The scene is Z-up: X is forward, Y is left, Z is up.
pub const SCENE_UP: Vec3 = Vec3::Z;

/// Home offsets of the four cameras relative to the framed point.
pub const PERSPECTIVE_VIEW_OFFSET: Vec3 = Vec3::new(-8.0, -8.0, 3.0);
pub const TOP_VIEW_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 8.0);
pub const SIDE_VIEW_OFFSET: Vec3 = Vec3::new(0.0, 8.0, 0.0);
pub const FRONT_VIEW_OFFSET: Vec3 = Vec3::new(8.0, 0.0, 0.0);
