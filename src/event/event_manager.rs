use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, TryIter};

use crate::event::WindowEvent;

/// A window event that can be inhibited.
///
/// Events that are not inhibited when dropped are handed back to the window,
/// which applies its default handling (closing on `Escape`, camera aspect
/// updates) during the next render.
pub struct Event<'a> {
    /// The event itself.
    pub value: WindowEvent,
    /// Set to `true` to prevent the window from handling this event.
    pub inhibited: bool,
    inhibitor: &'a RefCell<Vec<WindowEvent>>,
}

impl<'a> Drop for Event<'a> {
    #[inline]
    fn drop(&mut self) {
        if !self.inhibited {
            self.inhibitor.borrow_mut().push(self.value)
        }
    }
}

impl<'a> Event<'a> {
    #[inline]
    fn new(value: WindowEvent, inhibitor: &RefCell<Vec<WindowEvent>>) -> Event<'_> {
        Event {
            value,
            inhibited: false,
            inhibitor,
        }
    }
}

/// Iterator over the events received since the last frame.
pub struct Events<'a> {
    stream: TryIter<'a, WindowEvent>,
    inhibitor: &'a RefCell<Vec<WindowEvent>>,
}

impl<'a> Events<'a> {
    #[inline]
    fn new(stream: TryIter<'a, WindowEvent>, inhibitor: &'a RefCell<Vec<WindowEvent>>) -> Events<'a> {
        Events { stream, inhibitor }
    }
}

impl<'a> Iterator for Events<'a> {
    type Item = Event<'a>;

    #[inline]
    fn next(&mut self) -> Option<Event<'a>> {
        self.stream.next().map(|e| Event::new(e, self.inhibitor))
    }
}

/// Gives access to the events received by a window.
pub struct EventManager {
    events: Rc<Receiver<WindowEvent>>,
    inhibitor: Rc<RefCell<Vec<WindowEvent>>>,
}

impl EventManager {
    pub fn new(
        events: Rc<Receiver<WindowEvent>>,
        inhibitor: Rc<RefCell<Vec<WindowEvent>>>,
    ) -> EventManager {
        EventManager { events, inhibitor }
    }

    /// Drains the pending events.
    #[inline]
    pub fn iter(&mut self) -> Events<'_> {
        Events::new(self.events.try_iter(), &self.inhibitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Action, Key, Modifiers};
    use std::sync::mpsc;

    #[test]
    fn uninhibited_events_are_handed_back() {
        let (tx, rx) = mpsc::channel();
        let inhibitor = Rc::new(RefCell::new(Vec::new()));
        let mut manager = EventManager::new(Rc::new(rx), inhibitor.clone());

        tx.send(WindowEvent::Close).unwrap();
        tx.send(WindowEvent::Key(Key::Space, Action::Press, Modifiers::empty()))
            .unwrap();

        for mut event in manager.iter() {
            if let WindowEvent::Key(..) = event.value {
                event.inhibited = true;
            }
        }

        assert_eq!(&*inhibitor.borrow(), &[WindowEvent::Close]);
        assert_eq!(manager.iter().count(), 0);
    }
}
