//! Renderers drawing the scene model and the screen overlay.

pub use self::model_renderer::ModelRenderer;
pub use self::overlay_renderer::{pixel_to_ndc, OverlayRenderer};
pub use self::tone_mapping::{encode_gamma, ToneMapping, DISPLAY_GAMMA};

mod model_renderer;
mod overlay_renderer;
mod tone_mapping;
