//! Camera trait and the viewer's perspective camera.

pub use self::camera3d::Camera3d;
pub use self::perspective::PerspectiveCamera;

mod camera3d;
mod perspective;
