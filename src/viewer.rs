//! The viewer application: one model, a fixed camera and a clip switch button.

use std::collections::HashSet;

use glamx::Vec3;

use crate::animation::{AnimationMixer, ClipCycle};
use crate::camera::PerspectiveCamera;
use crate::config::ViewerConfig;
use crate::error::Result;
use crate::event::{Action, Key, WindowEvent};
use crate::loader;
use crate::renderer::ToneMapping;
use crate::scene::{Model, Scene};
use crate::ui::Button;
use crate::window::{CanvasSetup, Window};

/// Everything displayed by the viewer, and the animation state driving it.
pub struct Viewer {
    scene: Scene,
    camera: PerspectiveCamera,
    mixer: AnimationMixer,
    cycle: ClipCycle,
    button: Button,
    /// Switch shortcuts currently held down. Key repeats do not switch again.
    held_shortcuts: HashSet<Key>,
    tone_mapping: ToneMapping,
    exposure: f32,
    pixel_ratio: Option<f64>,
}

impl Viewer {
    /// Places `model` in a scene set up from `config`, and starts its initial clip.
    pub fn new(mut model: Model, config: &ViewerConfig) -> Viewer {
        model.set_scale(Vec3::splat(config.model.scale));
        model.set_position(Vec3::from(config.model.position));

        let mixer = AnimationMixer::new(model.clips.clone());

        let mut scene = Scene::new(config.scene.background_color())
            .with_lights(config.lights.light_rig());
        let _ = scene.set_model(model);

        let mut camera = PerspectiveCamera::new(
            config.camera.fov,
            config.window.width as f32 / config.window.height.max(1) as f32,
            config.camera.near,
            config.camera.far,
        );
        camera.set_position(Vec3::from(config.camera.position));

        let button = Button::new(
            config.button.anchor,
            (config.button.margin[0], config.button.margin[1]),
            (config.button.size[0], config.button.size[1]),
        );

        let mut viewer = Viewer {
            scene,
            camera,
            mixer,
            cycle: ClipCycle::new(config.animation.clips.iter().cloned()),
            button,
            held_shortcuts: HashSet::new(),
            tone_mapping: config.renderer.tone_mapping,
            exposure: config.renderer.exposure,
            pixel_ratio: config.renderer.pixel_ratio,
        };

        let _ = viewer.mixer.play(&config.animation.initial_clip);
        viewer
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[inline]
    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    #[inline]
    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    #[inline]
    pub fn mixer_mut(&mut self) -> &mut AnimationMixer {
        &mut self.mixer
    }

    #[inline]
    pub fn button(&self) -> &Button {
        &self.button
    }

    /// Plays the clip following the current one in the cycle.
    ///
    /// Returns `false` if the cycle is empty or the model has no clip of that name.
    pub fn switch_clip(&mut self) -> bool {
        let Some(next) = self.cycle.next(self.mixer.current_clip()).map(str::to_owned) else {
            log::warn!("No animation clip to switch to.");
            return false;
        };

        self.mixer.play(&next)
    }

    /// Reacts to a window event.
    ///
    /// Returns `true` if the event was consumed by the viewer: a click on the
    /// switch button, or one of the switch shortcuts. A shortcut switches
    /// once per press, however long it is held.
    pub fn handle_event(
        &mut self,
        event: &WindowEvent,
        window_size: (f64, f64),
        scale_factor: f64,
    ) -> bool {
        if self.button.handle_event(event, window_size, scale_factor) {
            let _ = self.switch_clip();
            return true;
        }

        match *event {
            WindowEvent::Key(key @ (Key::Space | Key::N), Action::Press, _) => {
                if self.held_shortcuts.insert(key) {
                    let _ = self.switch_clip();
                }
                true
            }
            WindowEvent::Key(key @ (Key::Space | Key::N), Action::Release, _) => {
                self.held_shortcuts.remove(&key);
                false
            }
            _ => false,
        }
    }

    /// Runs one frame: input, animation, then rendering.
    ///
    /// Returns `false` once the window should close.
    pub async fn update(&mut self, window: &mut Window) -> bool {
        window.set_tone_mapping(self.tone_mapping);
        window.set_exposure(self.exposure);
        window.set_pixel_ratio(self.pixel_ratio);

        let (width, height) = window.window_size();
        let window_size = (width as f64, height as f64);
        let scale_factor = window.scale_factor();

        for mut event in window.events().iter() {
            if self.handle_event(&event.value, window_size, scale_factor) {
                event.inhibited = true;
            }
        }

        self.mixer.update();
        if let Some(model) = self.scene.model_mut() {
            self.mixer.apply(model);
        }

        let rect = self.button.screen_rect(window_size, scale_factor);
        window.draw_overlay_rect(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
            self.button.color(),
        );

        window.render(&mut self.scene, &mut self.camera).await
    }
}

/// Loads the configured model, opens a window and plays the model until the
/// window is closed.
///
/// # Errors
/// Fails if the model cannot be loaded. The error is logged before it is returned.
pub async fn run(config: ViewerConfig) -> Result<()> {
    let model = match loader::load(&config.model.path) {
        Ok(model) => model,
        Err(e) => {
            log::error!("Failed to load {}: {e}", config.model.path.display());
            return Err(e);
        }
    };

    let clips: Vec<&str> = model.clip_names().collect();
    log::info!("Model has {} clips: {}.", clips.len(), clips.join(", "));

    let setup = CanvasSetup {
        vsync: config.window.vsync,
    };
    let mut window = Window::new_with_setup(
        &config.window.title,
        config.window.width,
        config.window.height,
        setup,
    )
    .await;

    let mut viewer = Viewer::new(model, &config);
    while viewer.update(&mut window).await {}

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationClip;
    use crate::camera::Camera3d;
    use crate::event::{Modifiers, MouseButton};

    fn model_with_clips(names: &[&str]) -> Model {
        let mut model = Model::default();
        model.clips = names
            .iter()
            .map(|name| AnimationClip::new(*name, vec![]))
            .collect();
        model
    }

    fn key(key: Key, action: Action) -> WindowEvent {
        WindowEvent::Key(key, action, Modifiers::empty())
    }

    #[test]
    fn starts_with_the_initial_clip() {
        let viewer = Viewer::new(
            model_with_clips(&["Belly", "CatWalk", "Samba"]),
            &ViewerConfig::default(),
        );
        assert_eq!(viewer.mixer().current_clip(), Some("CatWalk"));
        assert_eq!(viewer.mixer().actions().len(), 1);
    }

    #[test]
    fn model_and_camera_follow_the_config() {
        let viewer = Viewer::new(model_with_clips(&[]), &ViewerConfig::default());
        let model = viewer.scene().model().unwrap();
        assert_eq!(model.placement().scale, Vec3::splat(10.0));
        assert_eq!(model.placement().translation, Vec3::new(0.0, -6.0, 0.0));
        assert_eq!(viewer.camera().eye(), Vec3::new(0.0, -3.0, 10.0));
        assert_eq!(viewer.scene().lights.directional().len(), 1);
    }

    #[test]
    fn switching_walks_the_cycle() {
        let mut viewer = Viewer::new(
            model_with_clips(&["CatWalk", "Samba", "Belly"]),
            &ViewerConfig::default(),
        );

        assert!(viewer.switch_clip());
        assert_eq!(viewer.mixer().current_clip(), Some("Samba"));
        assert!(viewer.switch_clip());
        assert_eq!(viewer.mixer().current_clip(), Some("Belly"));
        assert!(viewer.switch_clip());
        assert_eq!(viewer.mixer().current_clip(), Some("CatWalk"));
    }

    #[test]
    fn missing_clips_leave_the_current_one_playing() {
        let mut viewer = Viewer::new(model_with_clips(&["CatWalk"]), &ViewerConfig::default());
        assert!(!viewer.switch_clip());
        assert_eq!(viewer.mixer().current_clip(), Some("CatWalk"));
        assert_eq!(viewer.mixer().actions().len(), 1);
    }

    #[test]
    fn shortcuts_switch_on_press() {
        let mut viewer = Viewer::new(
            model_with_clips(&["CatWalk", "Samba", "Belly"]),
            &ViewerConfig::default(),
        );
        let size = (800.0, 600.0);

        assert!(!viewer.handle_event(&key(Key::Space, Action::Release), size, 1.0));
        assert!(viewer.handle_event(&key(Key::Space, Action::Press), size, 1.0));
        assert!(viewer.handle_event(&key(Key::N, Action::Press), size, 1.0));
        assert!(!viewer.handle_event(&key(Key::Escape, Action::Release), size, 1.0));
        assert_eq!(viewer.mixer().current_clip(), Some("Belly"));
    }

    #[test]
    fn held_shortcuts_switch_once() {
        let mut viewer = Viewer::new(
            model_with_clips(&["CatWalk", "Samba", "Belly"]),
            &ViewerConfig::default(),
        );
        let size = (800.0, 600.0);

        // The first press switches, the repeats that follow while the key
        // is held are consumed without switching.
        for _ in 0..5 {
            assert!(viewer.handle_event(&key(Key::Space, Action::Press), size, 1.0));
        }
        assert_eq!(viewer.mixer().current_clip(), Some("Samba"));

        viewer.handle_event(&key(Key::Space, Action::Release), size, 1.0);
        assert!(viewer.handle_event(&key(Key::Space, Action::Press), size, 1.0));
        assert_eq!(viewer.mixer().current_clip(), Some("Belly"));
    }

    #[test]
    fn clicking_the_button_switches() {
        let mut viewer = Viewer::new(
            model_with_clips(&["CatWalk", "Samba", "Belly"]),
            &ViewerConfig::default(),
        );
        let size = (800.0, 600.0);
        let m = Modifiers::empty();

        viewer.handle_event(&WindowEvent::CursorPos(30.0, 30.0, m), size, 1.0);
        viewer.handle_event(&WindowEvent::MouseButton(MouseButton::Button1, Action::Press, m), size, 1.0);
        assert!(viewer.handle_event(
            &WindowEvent::MouseButton(MouseButton::Button1, Action::Release, m),
            size,
            1.0
        ));
        assert_eq!(viewer.mixer().current_clip(), Some("Samba"));
    }
}
