use crate::color::{Color, STEEL_BLUE};
use crate::light::LightRig;
use crate::scene::Model;

/// Everything drawn in a frame: a background, at most one model and its lights.
#[derive(Clone, Debug)]
pub struct Scene {
    pub background: Color,
    pub lights: LightRig,
    model: Option<Model>,
    revision: u64,
}

impl Scene {
    /// An empty scene with the given background and default lights.
    pub fn new(background: Color) -> Self {
        Self {
            background,
            lights: LightRig::default(),
            model: None,
            revision: 0,
        }
    }

    pub fn with_lights(mut self, lights: LightRig) -> Self {
        self.lights = lights;
        self
    }

    #[inline]
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// Mutable access to the model, for posing it.
    ///
    /// Renderers keep GPU copies of the model geometry: use
    /// [`Scene::set_model`] rather than this to change its meshes.
    #[inline]
    pub fn model_mut(&mut self) -> Option<&mut Model> {
        self.model.as_mut()
    }

    /// Replaces the displayed model, returning the previous one.
    pub fn set_model(&mut self, model: Model) -> Option<Model> {
        self.revision += 1;
        self.model.replace(model)
    }

    /// Removes the displayed model.
    pub fn take_model(&mut self) -> Option<Model> {
        self.revision += 1;
        self.model.take()
    }

    /// Incremented every time the model is replaced or removed.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(STEEL_BLUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacing_the_model_bumps_the_revision() {
        let mut scene = Scene::default();
        assert_eq!(scene.revision(), 0);
        assert!(scene.model().is_none());

        assert!(scene.set_model(Model::default()).is_none());
        assert_eq!(scene.revision(), 1);
        assert!(scene.set_model(Model::default()).is_some());
        assert!(scene.take_model().is_some());
        assert_eq!(scene.revision(), 3);
        assert!(scene.model_mut().is_none());
    }
}
