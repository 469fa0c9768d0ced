//! GPU context shared by the window and every renderer.

pub use self::context::Context;

mod context;
