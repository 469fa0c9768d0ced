//! The winit window and the wgpu surface it presents to.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::context::Context;
use crate::event::{Action, Key, Modifiers, MouseButton, WindowEvent};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent as WinitWindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

// winit only allows one EventLoop per program, so it is kept in thread-local
// storage and reused across window recreations.
thread_local! {
    static EVENT_LOOP: RefCell<Option<EventLoop<()>>> = const { RefCell::new(None) };
    static PENDING_WINDOW_EVENTS: RefCell<HashMap<WindowId, Vec<PendingEvent>>> = RefCell::new(HashMap::new());
}

/// An event collected from winit, with the state update it implies.
#[derive(Clone)]
enum PendingEvent {
    WindowEvent(WindowEvent),
    ButtonState(MouseButton, Action),
    KeyState(Key, Action),
    CursorPos(f64, f64),
    Modifiers(ModifiersState),
}

/// Canvas options.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CanvasSetup {
    /// Is vsync enabled?
    pub vsync: bool,
}

impl Default for CanvasSetup {
    fn default() -> Self {
        Self { vsync: true }
    }
}

/// A native window with its wgpu surface and depth buffer.
///
/// The surface is only resized through [`Canvas::resize`]: winit resize
/// notifications are forwarded as [`WindowEvent::FramebufferSize`] and the
/// owner decides which drawing buffer size to use.
pub struct Canvas {
    window: Arc<Window>,
    window_id: WindowId,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    cursor_pos: Option<(f64, f64)>,
    key_states: [Action; Key::Unknown as usize + 1],
    button_states: [Action; MouseButton::Button8 as usize + 1],
    out_events: Sender<WindowEvent>,
    modifiers_state: ModifiersState,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
}

impl Canvas {
    /// Opens a new window and initializes the wgpu context.
    pub async fn open(
        title: &str,
        width: u32,
        height: u32,
        canvas_setup: CanvasSetup,
        out_events: Sender<WindowEvent>,
    ) -> Self {
        let window_attrs = WindowAttributes::default()
            .with_title(title)
            .with_inner_size(LogicalSize::new(width as f64, height as f64));

        let window = EVENT_LOOP.with(|event_loop_cell| {
            let mut event_loop_opt = event_loop_cell.borrow_mut();
            let event_loop = event_loop_opt
                .get_or_insert_with(|| EventLoop::new().expect("Failed to create event loop"));
            #[allow(deprecated)]
            let window = event_loop
                .create_window(window_attrs)
                .expect("Failed to create window");
            window
        });
        let window = Arc::new(window);

        let (surface, surface_format) = if Context::is_initialized() {
            let ctxt = Context::get();
            let surface = ctxt
                .instance
                .create_surface(window.clone())
                .expect("Failed to create surface");
            let surface_format = Self::pick_format(&surface.get_capabilities(&ctxt.adapter));

            (surface, surface_format)
        } else {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });

            let surface = instance
                .create_surface(window.clone())
                .expect("Failed to create surface");

            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: false,
                })
                .await
                .expect("Failed to find an appropriate adapter");

            let (device, queue) = adapter
                .request_device(&wgpu::DeviceDescriptor {
                    label: Some("clipview device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                    trace: wgpu::Trace::Off,
                    experimental_features: wgpu::ExperimentalFeatures::disabled(),
                })
                .await
                .expect("Failed to create device");

            let surface_format = Self::pick_format(&surface.get_capabilities(&adapter));
            log::info!(
                "Rendering with {} ({:?}), surface format {:?}.",
                adapter.get_info().name,
                adapter.get_info().backend,
                surface_format
            );

            Context::init(instance, device, queue, adapter, surface_format);

            (surface, surface_format)
        };

        let ctxt = Context::get();
        let surface_caps = surface.get_capabilities(&ctxt.adapter);

        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let present_mode = if canvas_setup.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&ctxt.device, &surface_config);

        let (depth_texture, depth_view) = Self::create_depth_texture(&ctxt.device, width, height);
        let window_id = window.id();

        Canvas {
            window,
            window_id,
            surface,
            surface_config,
            cursor_pos: None,
            key_states: [Action::Release; Key::Unknown as usize + 1],
            button_states: [Action::Release; MouseButton::Button8 as usize + 1],
            out_events,
            modifiers_state: ModifiersState::default(),
            depth_texture,
            depth_view,
        }
    }

    // Non-sRGB formats are preferred: gamma is applied by the shaders.
    fn pick_format(caps: &wgpu::SurfaceCapabilities) -> wgpu::TextureFormat {
        caps.formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .unwrap_or(caps.formats[0])
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        // wgpu rejects zero-sized textures.
        let width = width.max(1);
        let height = height.max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Context::depth_format(),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    /// Polls events from the window system.
    ///
    /// Window events are sent to the channel given to [`Canvas::open`]; key,
    /// button and cursor states are updated on the way.
    pub fn poll_events(&mut self) {
        use winit::platform::pump_events::EventLoopExtPumpEvents;

        struct EventCollector;

        impl ApplicationHandler for EventCollector {
            fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

            fn window_event(
                &mut self,
                _event_loop: &ActiveEventLoop,
                window_id: WindowId,
                event: WinitWindowEvent,
            ) {
                let pending_events: Vec<PendingEvent> = match event {
                    WinitWindowEvent::CloseRequested => {
                        vec![PendingEvent::WindowEvent(WindowEvent::Close)]
                    }
                    WinitWindowEvent::Resized(physical_size) => {
                        if physical_size.width > 0 && physical_size.height > 0 {
                            vec![PendingEvent::WindowEvent(WindowEvent::FramebufferSize(
                                physical_size.width,
                                physical_size.height,
                            ))]
                        } else {
                            vec![]
                        }
                    }
                    WinitWindowEvent::CursorMoved { position, .. } => {
                        vec![
                            PendingEvent::CursorPos(position.x, position.y),
                            PendingEvent::WindowEvent(WindowEvent::CursorPos(
                                position.x,
                                position.y,
                                Modifiers::empty(),
                            )),
                        ]
                    }
                    WinitWindowEvent::MouseInput { state, button, .. } => {
                        let action = translate_action(state);
                        let button = translate_mouse_button(button);
                        vec![
                            PendingEvent::ButtonState(button, action),
                            PendingEvent::WindowEvent(WindowEvent::MouseButton(
                                button,
                                action,
                                Modifiers::empty(),
                            )),
                        ]
                    }
                    WinitWindowEvent::KeyboardInput { event, .. } => {
                        let action = translate_action(event.state);
                        let key = translate_key(event.physical_key);
                        vec![
                            PendingEvent::KeyState(key, action),
                            PendingEvent::WindowEvent(WindowEvent::Key(
                                key,
                                action,
                                Modifiers::empty(),
                            )),
                        ]
                    }
                    WinitWindowEvent::ModifiersChanged(new_modifiers) => {
                        vec![PendingEvent::Modifiers(new_modifiers.state())]
                    }
                    _ => vec![],
                };

                if !pending_events.is_empty() {
                    PENDING_WINDOW_EVENTS.with(|storage| {
                        storage
                            .borrow_mut()
                            .entry(window_id)
                            .or_default()
                            .extend(pending_events);
                    });
                }
            }
        }

        let timeout = Some(std::time::Duration::ZERO);
        EVENT_LOOP.with(|event_loop_cell| {
            if let Some(ref mut event_loop) = *event_loop_cell.borrow_mut() {
                let mut collector = EventCollector;
                let _ = event_loop.pump_app_events(timeout, &mut collector);
            }
        });

        let events = PENDING_WINDOW_EVENTS.with(|storage| {
            storage
                .borrow_mut()
                .remove(&self.window_id)
                .unwrap_or_default()
        });

        for event in events {
            match event {
                PendingEvent::WindowEvent(we) => {
                    let _ = self.out_events.send(with_modifiers(
                        we,
                        translate_modifiers(self.modifiers_state),
                    ));
                }
                PendingEvent::ButtonState(button, action) => {
                    self.button_states[button as usize] = action;
                }
                PendingEvent::KeyState(key, action) => {
                    self.key_states[key as usize] = action;
                }
                PendingEvent::CursorPos(x, y) => {
                    self.cursor_pos = Some((x, y));
                }
                PendingEvent::Modifiers(m) => {
                    self.modifiers_state = m;
                }
            }
        }
    }

    /// Resizes the surface and the depth buffer to `width` by `height` pixels.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        let ctxt = Context::get();
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&ctxt.device, &self.surface_config);

        let (depth_texture, depth_view) = Self::create_depth_texture(&ctxt.device, width, height);
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    /// Configures the surface again with its current settings.
    ///
    /// Needed after the surface was lost or became outdated.
    pub fn reconfigure(&mut self) {
        let ctxt = Context::get();
        self.surface.configure(&ctxt.device, &self.surface_config);
    }

    /// Gets the current surface texture for rendering.
    pub fn get_current_texture(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Presents the current frame.
    pub fn present(&self, frame: wgpu::SurfaceTexture) {
        self.window.pre_present_notify();
        frame.present();
    }

    /// Gets the depth texture view for rendering.
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Gets the surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    /// The size of the render surface.
    ///
    /// This returns the configured surface size, which matches the depth texture.
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// The size of the window client area, in physical pixels.
    pub fn inner_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    /// The current position of the cursor, if known.
    pub fn cursor_pos(&self) -> Option<(f64, f64)> {
        self.cursor_pos
    }

    /// The scale factor.
    pub fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    /// Set the window title.
    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title)
    }

    /// The state of a mouse button.
    pub fn get_mouse_button(&self, button: MouseButton) -> Action {
        self.button_states[button as usize]
    }

    /// The state of a key.
    pub fn get_key(&self, key: Key) -> Action {
        self.key_states[key as usize]
    }
}

fn with_modifiers(event: WindowEvent, modifiers: Modifiers) -> WindowEvent {
    match event {
        WindowEvent::CursorPos(x, y, _) => WindowEvent::CursorPos(x, y, modifiers),
        WindowEvent::MouseButton(b, a, _) => WindowEvent::MouseButton(b, a, modifiers),
        WindowEvent::Key(k, a, _) => WindowEvent::Key(k, a, modifiers),
        other => other,
    }
}

fn translate_action(action: winit::event::ElementState) -> Action {
    use winit::event::ElementState;
    match action {
        ElementState::Pressed => Action::Press,
        ElementState::Released => Action::Release,
    }
}

fn translate_modifiers(modifiers: ModifiersState) -> Modifiers {
    let mut res = Modifiers::empty();
    if modifiers.shift_key() {
        res.insert(Modifiers::Shift)
    }
    if modifiers.control_key() {
        res.insert(Modifiers::Control)
    }
    if modifiers.alt_key() {
        res.insert(Modifiers::Alt)
    }
    if modifiers.super_key() {
        res.insert(Modifiers::Super)
    }
    res
}

fn translate_mouse_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Button1,
        winit::event::MouseButton::Right => MouseButton::Button2,
        winit::event::MouseButton::Middle => MouseButton::Button3,
        winit::event::MouseButton::Back => MouseButton::Button4,
        winit::event::MouseButton::Forward => MouseButton::Button5,
        winit::event::MouseButton::Other(_) => MouseButton::Button6,
    }
}

fn translate_key(physical_key: PhysicalKey) -> Key {
    let PhysicalKey::Code(key_code) = physical_key else {
        return Key::Unknown;
    };

    match key_code {
        KeyCode::Digit1 => Key::Key1,
        KeyCode::Digit2 => Key::Key2,
        KeyCode::Digit3 => Key::Key3,
        KeyCode::Digit4 => Key::Key4,
        KeyCode::Digit5 => Key::Key5,
        KeyCode::Digit6 => Key::Key6,
        KeyCode::Digit7 => Key::Key7,
        KeyCode::Digit8 => Key::Key8,
        KeyCode::Digit9 => Key::Key9,
        KeyCode::Digit0 => Key::Key0,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,
        KeyCode::Escape => Key::Escape,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::Backspace => Key::Back,
        KeyCode::Enter => Key::Return,
        KeyCode::Space => Key::Space,
        KeyCode::Tab => Key::Tab,
        KeyCode::ShiftLeft => Key::LShift,
        KeyCode::ShiftRight => Key::RShift,
        KeyCode::ControlLeft => Key::LControl,
        KeyCode::ControlRight => Key::RControl,
        KeyCode::AltLeft => Key::LAlt,
        KeyCode::AltRight => Key::RAlt,
        _ => Key::Unknown,
    }
}
