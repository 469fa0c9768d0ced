/*!
# clipview

Keep It Simple, Stupid animated model viewer.

clipview opens a window, loads a single binary glTF asset (`.glb`), lights it,
looks at it through a fixed perspective camera and plays one of its animation
clips. A button in the corner of the window (or the `Space` key) switches to the
next clip of a short, fixed list.

## Features

* one-liner viewer: [`viewer::run`] does everything from a [`config::ViewerConfig`].
* glTF 2.0 import (embedded or external buffers) through the [gltf](https://docs.rs/gltf/) crate.
* keyframe animation with step, linear and cubic-spline samplers.
* CPU linear blend skinning.
* an ambient light plus directional lights.
* Reinhard (and a few other) tone mapping operators with an exposure control.

As an example, playing the `Samba` clip of a model is as simple as:

```no_run
use clipview::prelude::*;

# fn main() -> Result<(), ViewerError> {
let mut config = ViewerConfig::default();
config.model.path = "models/multi.glb".into();
config.animation.initial_clip = "Samba".to_string();

pollster::block_on(clipview::viewer::run(config))
# }
```

The building blocks can also be driven by hand:

```no_run
use clipview::prelude::*;

# async fn example() -> Result<(), ViewerError> {
let config = ViewerConfig::default();
let mut window = Window::new("clipview").await;
let model = clipview::loader::load(&config.model.path)?;
let mut viewer = Viewer::new(model, &config);

while viewer.update(&mut window).await {
    if window.get_key(Key::Q) == Action::Press {
        window.close();
    }
}
# Ok(())
# }
```

Some controls are handled by default:

* `left click` on the switch button, `space` or `n`: play the next clip.
* `escape`: close the window.
*/
#![allow(non_upper_case_globals)]
#![allow(missing_copy_implementations)]
#![allow(clippy::module_inception)]
#![allow(clippy::too_many_arguments)]

#[macro_use]
extern crate bitflags;

pub use glamx;

pub mod animation;
pub mod builtin;
pub mod camera;
pub mod color;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod light;
pub mod loader;
pub mod renderer;
pub mod resource;
pub mod scene;
pub mod ui;
pub mod viewer;
pub mod window;

pub mod prelude {
    pub use crate::animation::*;
    pub use crate::camera::*;
    pub use crate::color::*;
    pub use crate::config::*;
    pub use crate::error::*;
    pub use crate::event::*;
    pub use crate::light::*;
    pub use crate::renderer::*;
    pub use crate::scene::*;
    pub use crate::ui::*;
    pub use crate::viewer::*;
    pub use crate::window::*;
    pub use glamx::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
}
