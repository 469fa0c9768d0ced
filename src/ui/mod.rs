//! Minimal on-screen controls.

pub use self::button::{Anchor, Button, ButtonState, Rect};

mod button;
