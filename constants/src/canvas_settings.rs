/// Keyboard camera nudge multiplier (rotate/truck steps are scaled by this).
pub const MOVEMENT_FACTOR: f32 = 200.0;

/// Dolly step for keyboard zoom of the perspective camera.
pub const DOLLY_FACTOR: f32 = 5.0;

/// Angular step divisor for interactive rotation: one detent is PI / ROTATION_SPEED.
pub const ROTATION_SPEED: f32 = 80.0;

/// Base view size (world units) of the orthographic viewports at zoom 1.
pub const ZOOM_FACTOR: f32 = 7.0;

pub const FOV_DEFAULT: f32 = 1.0;
pub const FOV_MIN: f32 = 0.1;
pub const FOV_MAX: f32 = 2.5;
pub const FOV_INC: f32 = 0.08;

pub const MIN_DISTANCE: f32 = 0.3;
pub const MAX_DISTANCE: f32 = 100.0;

/// Floor for every cuboid scale component; enforced at every mutation site.
pub const MIN_CUBOID_SCALE: f32 = 0.2;

/// Slack added to the half-extent bound in the point-in-cuboid test.
pub const MEMBERSHIP_EPSILON: f32 = 0.01;

/// Default edge length of the point index grid cells, in world units.
pub const DEFAULT_GRID_CELL_SIZE: f32 = 1.0;

/// Base radius of the resize/rotation handle markers.
pub const HELPER_RADIUS: f32 = 0.15;

/// Marker radius scales with (view size / zoom) / HELPER_SIZE_DIVISOR so the
/// markers keep a constant apparent size on screen.
pub const HELPER_SIZE_DIVISOR: f32 = 10.0;

/// Distance of the rotation handle beyond the cuboid face, in local half-units.
pub const ROTATION_HELPER_OFFSET: f32 = 0.25;

/// Radius (NDC units) of the discs unioned onto the selection hull outline.
pub const OUTLINE_DISC_RADIUS: f32 = 0.02;
pub const OUTLINE_DISC_SEGMENTS: usize = 8;

/// Padding added to every scale axis when fitting a cuboid to a selection.
pub const BOX_FIT_PADDING: f32 = 0.02;

/// Margin ratio around the focused object when sizing orthographic cameras.
pub const CAMERA_MARGIN_RATIO: f32 = 1.5;

/// Extra clip depth beyond the object extent for focused orthographic cameras.
pub const CAMERA_CLIP_PADDING: f32 = 0.8;

/// NDC depth gate for rectangle-drag point selection.
pub const RECT_SELECTION_DEPTH_GATE: f32 = 0.5;

/// Box-local distance of the per-view camera reference nodes.
pub const CAMERA_REFERENCE_DISTANCE: f32 = 2.0;
