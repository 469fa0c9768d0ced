//! The window, and things to handle the rendering loop and events.

mod canvas;
mod events;
mod rendering;
mod viewport;
mod window;

pub use canvas::{Canvas, CanvasSetup};
pub use viewport::Viewport;
pub use window::Window;
