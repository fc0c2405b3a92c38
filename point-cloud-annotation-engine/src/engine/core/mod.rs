/// Canvas lifecycle state and per-instance options.
pub mod canvas_state;

/// Inbound pointer/command events and outbound annotation events.
pub mod events;

/// Cursor bookkeeping shared by every per-frame interaction system.
pub mod input;
