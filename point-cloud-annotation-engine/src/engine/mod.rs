pub mod annotations;
pub mod calibration;
pub mod camera;
pub mod core;
pub mod cuboid;
pub mod point_cloud;
pub mod projection;
pub mod spatial_index;
