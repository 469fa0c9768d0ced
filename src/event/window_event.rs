/// An event sent by the window system and forwarded to the viewer.
#[derive(PartialEq, Clone, Debug, Copy)]
pub enum WindowEvent {
    /// The drawing buffer changed size (physical pixels).
    FramebufferSize(u32, u32),
    /// The user asked the window to close.
    Close,
    /// The cursor moved, in physical pixels from the top-left corner.
    CursorPos(f64, f64, Modifiers),
    MouseButton(MouseButton, Action, Modifiers),
    Key(Key, Action, Modifiers),
}

/// Key and mouse button actions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Release,
    Press,
}

/// Mouse buttons. `Button1` is the left button.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Button1,
    Button2,
    Button3,
    Button4,
    Button5,
    Button6,
    Button7,
    Button8,
}

/// Physical keys the viewer can observe.
///
/// `Unknown` must stay last: the canvas sizes its key state table from it.
#[derive(Debug, Hash, Ord, PartialOrd, PartialEq, Eq, Clone, Copy)]
#[repr(u32)]
pub enum Key {
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    Key0,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Escape,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Left,
    Up,
    Right,
    Down,
    Back,
    Return,
    Space,
    Tab,
    LShift,
    RShift,
    LControl,
    RControl,
    LAlt,
    RAlt,
    Unknown,
}

bitflags! {
    /// Modifier keys held while an event happened.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct Modifiers: u32 {
        const Shift = 0b0001;
        const Control = 0b0010;
        const Alt = 0b0100;
        const Super = 0b1000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_is_the_last_key() {
        assert!(Key::RAlt < Key::Unknown);
        assert_eq!(Key::Key1 as u32, 0);
    }
}
