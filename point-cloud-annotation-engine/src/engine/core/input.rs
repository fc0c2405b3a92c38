use bevy::prelude::*;

use crate::engine::camera::view::Views;
use crate::engine::core::events::{CanvasPointerEvent, PointerKind};
use crate::tools::interaction::state::{Interaction, InteractionAction};

/// Mirrors pointer motion into the per-view cursor state and, while a
/// rotation gesture is running, into its screen-space sample pair.
///
/// Runs before every other interaction system in the tick so that hit-tests
/// and per-mode updates always see the cursor of the current frame.
pub fn track_cursor(
    mut events: EventReader<CanvasPointerEvent>,
    mut views: ResMut<Views>,
    mut interaction: ResMut<Interaction>,
) {
    for event in events.read() {
        let state = views.get_mut(event.view);
        if !state.enabled {
            continue;
        }
        match event.kind {
            PointerKind::Press | PointerKind::Move => {
                state.cursor_ndc = event.ndc;
                state.cursor_screen = event.screen;
                if let InteractionAction::Rotating(rotation) = &mut interaction.action {
                    if rotation.view == event.view {
                        rotation.screen_move = event.screen;
                    }
                }
            }
            _ => {}
        }
    }
}
