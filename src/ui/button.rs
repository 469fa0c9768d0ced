use crate::color::Color;
use crate::event::{Action, MouseButton, WindowEvent};
use serde::{Deserialize, Serialize};

/// The window corner a [`Button`] is attached to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// An axis-aligned rectangle, `y` pointing down.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the point `(px, py)` lies inside this rectangle, borders included.
    #[inline]
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

/// Interaction state of a [`Button`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Idle,
    Hovered,
    /// The left button went down over the button and was not released yet.
    Pressed,
}

/// A clickable rectangle drawn over the scene.
///
/// Its margin and size are in logical pixels, so that it keeps its apparent
/// size on high density displays. Events are in physical pixels.
#[derive(Debug, Clone)]
pub struct Button {
    anchor: Anchor,
    margin: (f64, f64),
    size: (f64, f64),
    state: ButtonState,
    cursor: Option<(f64, f64)>,
    idle_color: Color,
    hovered_color: Color,
    pressed_color: Color,
}

impl Default for Button {
    fn default() -> Self {
        Button::new(Anchor::TopLeft, (16.0, 16.0), (120.0, 40.0))
    }
}

impl Button {
    /// A button of `size` logical pixels, `margin` logical pixels away from
    /// the `anchor` corner.
    pub fn new(anchor: Anchor, margin: (f64, f64), size: (f64, f64)) -> Button {
        Button {
            anchor,
            margin,
            size,
            state: ButtonState::Idle,
            cursor: None,
            idle_color: Color::new(0.1, 0.1, 0.1, 0.6),
            hovered_color: Color::new(0.2, 0.2, 0.2, 0.75),
            pressed_color: Color::new(0.35, 0.35, 0.35, 0.9),
        }
    }

    #[inline]
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// The color to draw the button with in its current state.
    pub fn color(&self) -> Color {
        match self.state {
            ButtonState::Idle => self.idle_color,
            ButtonState::Hovered => self.hovered_color,
            ButtonState::Pressed => self.pressed_color,
        }
    }

    /// The button rectangle in physical pixels of a window of `window_size`
    /// physical pixels.
    pub fn screen_rect(&self, window_size: (f64, f64), scale_factor: f64) -> Rect {
        let width = self.size.0 * scale_factor;
        let height = self.size.1 * scale_factor;
        let mx = self.margin.0 * scale_factor;
        let my = self.margin.1 * scale_factor;

        let x = match self.anchor {
            Anchor::TopLeft | Anchor::BottomLeft => mx,
            Anchor::TopRight | Anchor::BottomRight => window_size.0 - mx - width,
        };
        let y = match self.anchor {
            Anchor::TopLeft | Anchor::TopRight => my,
            Anchor::BottomLeft | Anchor::BottomRight => window_size.1 - my - height,
        };

        Rect::new(x, y, width, height)
    }

    /// Updates the button state from a window event.
    ///
    /// Returns `true` when the event completes a click: the left mouse
    /// button was pressed and then released over the button.
    pub fn handle_event(
        &mut self,
        event: &WindowEvent,
        window_size: (f64, f64),
        scale_factor: f64,
    ) -> bool {
        let rect = self.screen_rect(window_size, scale_factor);
        let hovered = |cursor: Option<(f64, f64)>| cursor.is_some_and(|(x, y)| rect.contains(x, y));

        match *event {
            WindowEvent::CursorPos(x, y, _) => {
                self.cursor = Some((x, y));
                if self.state != ButtonState::Pressed {
                    self.state = if hovered(self.cursor) {
                        ButtonState::Hovered
                    } else {
                        ButtonState::Idle
                    };
                }
                false
            }
            WindowEvent::MouseButton(MouseButton::Button1, Action::Press, _) => {
                if hovered(self.cursor) {
                    self.state = ButtonState::Pressed;
                }
                false
            }
            WindowEvent::MouseButton(MouseButton::Button1, Action::Release, _) => {
                let was_pressed = self.state == ButtonState::Pressed;
                let inside = hovered(self.cursor);
                self.state = if inside {
                    ButtonState::Hovered
                } else {
                    ButtonState::Idle
                };
                was_pressed && inside
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Modifiers;

    const WINDOW: (f64, f64) = (800.0, 600.0);

    fn move_to(x: f64, y: f64) -> WindowEvent {
        WindowEvent::CursorPos(x, y, Modifiers::empty())
    }

    fn left(action: Action) -> WindowEvent {
        WindowEvent::MouseButton(MouseButton::Button1, action, Modifiers::empty())
    }

    #[test]
    fn rect_is_anchored_to_its_corner() {
        let button = Button::new(Anchor::BottomRight, (10.0, 20.0), (100.0, 30.0));
        assert_eq!(
            button.screen_rect(WINDOW, 1.0),
            Rect::new(690.0, 550.0, 100.0, 30.0)
        );
        assert_eq!(
            button.screen_rect((1600.0, 1200.0), 2.0),
            Rect::new(1380.0, 1100.0, 200.0, 60.0)
        );
    }

    #[test]
    fn click_requires_press_and_release_inside() {
        let mut button = Button::default();
        assert!(!button.handle_event(&move_to(50.0, 30.0), WINDOW, 1.0));
        assert_eq!(button.state(), ButtonState::Hovered);
        assert!(!button.handle_event(&left(Action::Press), WINDOW, 1.0));
        assert_eq!(button.state(), ButtonState::Pressed);
        assert!(button.handle_event(&left(Action::Release), WINDOW, 1.0));
        assert_eq!(button.state(), ButtonState::Hovered);
    }

    #[test]
    fn releasing_outside_cancels_the_click() {
        let mut button = Button::default();
        button.handle_event(&move_to(50.0, 30.0), WINDOW, 1.0);
        button.handle_event(&left(Action::Press), WINDOW, 1.0);
        button.handle_event(&move_to(500.0, 500.0), WINDOW, 1.0);
        assert_eq!(button.state(), ButtonState::Pressed);
        assert!(!button.handle_event(&left(Action::Release), WINDOW, 1.0));
        assert_eq!(button.state(), ButtonState::Idle);
    }

    #[test]
    fn pressing_outside_does_nothing() {
        let mut button = Button::default();
        button.handle_event(&move_to(500.0, 500.0), WINDOW, 1.0);
        button.handle_event(&left(Action::Press), WINDOW, 1.0);
        button.handle_event(&move_to(50.0, 30.0), WINDOW, 1.0);
        assert!(!button.handle_event(&left(Action::Release), WINDOW, 1.0));
    }

    #[test]
    fn hit_test_follows_the_scale_factor() {
        let mut button = Button::default();
        // 150 physical pixels is inside the 2x button but outside the 1x one.
        button.handle_event(&move_to(150.0, 40.0), (1600.0, 1200.0), 2.0);
        assert_eq!(button.state(), ButtonState::Hovered);
        button.handle_event(&move_to(150.0, 40.0), WINDOW, 1.0);
        assert_eq!(button.state(), ButtonState::Idle);
    }

    #[test]
    fn color_tracks_the_state() {
        let mut button = Button::default();
        let idle = button.color();
        button.handle_event(&move_to(20.0, 20.0), WINDOW, 1.0);
        assert_ne!(button.color(), idle);
    }
}
