//! Event handling functionality.

use crate::camera::Camera3d;
use crate::event::{Action, EventManager, Key, MouseButton, WindowEvent};

use super::Window;

impl Window {
    /// Returns an event manager for accessing window events.
    ///
    /// Events left uninhibited get the window's default handling during the
    /// next [`Window::render`].
    ///
    /// # Example
    /// ```no_run
    /// # use clipview::prelude::*;
    /// # async fn example(window: &mut Window) {
    /// for mut event in window.events().iter() {
    ///     if let WindowEvent::Key(Key::Escape, Action::Release, _) = event.value {
    ///         // keep the window open
    ///         event.inhibited = true;
    ///     }
    /// }
    /// # }
    /// ```
    pub fn events(&self) -> EventManager {
        EventManager::new(self.events.clone(), self.unhandled_events.clone())
    }

    /// Gets the current state of a keyboard key.
    pub fn get_key(&self, key: Key) -> Action {
        self.canvas.get_key(key)
    }

    /// Gets the current state of a mouse button.
    pub fn get_mouse_button(&self, button: MouseButton) -> Action {
        self.canvas.get_mouse_button(button)
    }

    /// Gets the last known position of the mouse cursor, in physical pixels
    /// from the top-left corner.
    pub fn cursor_pos(&self) -> Option<(f64, f64)> {
        self.canvas.cursor_pos()
    }

    #[inline]
    pub(crate) fn handle_events(&mut self, camera: &mut dyn Camera3d) {
        let unhandled_events = self.unhandled_events.clone();
        let events = self.events.clone();

        for event in unhandled_events.borrow().iter() {
            self.handle_event(camera, event)
        }

        for event in events.try_iter() {
            self.handle_event(camera, &event)
        }

        unhandled_events.borrow_mut().clear();
        self.canvas.poll_events();
    }

    pub(crate) fn handle_event(&mut self, camera: &mut dyn Camera3d, event: &WindowEvent) {
        match *event {
            WindowEvent::Key(Key::Escape, Action::Release, _) | WindowEvent::Close => {
                self.close();
            }
            // The drawing buffer size is derived from the window size by the
            // viewport, which notifies the camera itself.
            WindowEvent::FramebufferSize(..) => return,
            _ => {}
        }

        camera.handle_event(event);
    }
}
