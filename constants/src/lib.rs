pub mod canvas_settings;
pub mod coordinate_system;
