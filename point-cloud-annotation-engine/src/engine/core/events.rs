use bevy::input::keyboard::KeyCode;
use bevy::prelude::*;

use crate::engine::annotations::ObjectRecord;
use crate::engine::camera::view::ViewKind;
use crate::engine::core::canvas_state::{ColorBy, TransformMode};
use crate::tools::region::SelectionMode;

/// Pointer gestures forwarded by the host, one event per DOM-level input.
/// `ndc` is the cursor in the viewport's normalized device coordinates
/// ([-1, 1] with +Y up), `screen` the raw pixel position in the viewport.
#[derive(Event, Debug, Clone, Copy)]
pub struct CanvasPointerEvent {
    pub view: ViewKind,
    pub kind: PointerKind,
    pub ndc: Vec2,
    pub screen: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Press,
    Move,
    Release,
    Leave,
    DoubleClick,
    ContextMenu,
}

/// In-process commands from the host UI. No wire protocol; these mirror the
/// control surface of the annotation workspace.
#[derive(Event, Debug, Clone)]
pub enum CanvasCommand {
    EnterDrawMode {
        initial: Option<ObjectRecord>,
        redraw: Option<i64>,
    },
    CancelDraw,
    SetColormap { name: String },
    SetColorBy(ColorBy),
    SetTransformMode(TransformMode),
    EnterGroupMode,
    FinishGroupMode,
    CameraNudge {
        code: KeyCode,
        shift: bool,
        alt: bool,
    },
    SetViewport { view: ViewKind, size: Vec2 },
    ZoomViewport { view: ViewKind, delta: f32 },
    RegionDrawn {
        view: ViewKind,
        polygon_ndc: Vec<Vec2>,
        mode: SelectionMode,
    },
    RectDrawn { view: ViewKind, rect_ndc: Vec4 },
}

/// An object was picked (or the pick cleared) in the perspective viewport.
#[derive(Event, Debug, Clone, Copy)]
pub struct SelectedEvent {
    pub client_id: Option<i64>,
}

/// A gesture committed an updated pose for an existing object.
#[derive(Event, Debug, Clone, Copy)]
pub struct EditedEvent {
    pub client_id: i64,
    pub points: [f32; 16],
}

/// Draw mode produced a new cuboid.
#[derive(Event, Debug, Clone)]
pub struct DrawnEvent {
    pub points: [f32; 16],
    pub initial: Option<ObjectRecord>,
    pub continues: bool,
}

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct CanceledEvent;

#[derive(Event, Debug, Clone)]
pub struct GrouppedEvent {
    pub client_ids: Vec<i64>,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ContextMenuEvent {
    pub client_id: i64,
    pub screen: Vec2,
}

/// Outline of the current point selection, flattened screen coordinates.
#[derive(Event, Debug, Clone)]
pub struct SelectionOutlineEvent {
    pub polygon: Vec<f32>,
}
