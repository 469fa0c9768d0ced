//! Rendering functionality.

use crate::camera::Camera3d;
use crate::context::Context;
use crate::error::ViewerError;
use crate::event::WindowEvent;
use crate::scene::Scene;

use super::Window;

impl Window {
    /// Renders one frame of `scene` seen through `camera`.
    ///
    /// This handles pending events, keeps the drawing buffer in sync with the
    /// window size, draws the model and the queued overlay rectangles, then
    /// presents the frame.
    ///
    /// Returns `false` once the window should close.
    pub async fn render(&mut self, scene: &mut Scene, camera: &mut dyn Camera3d) -> bool {
        self.handle_events(camera);
        self.sync_viewport(camera);
        camera.update(&self.viewport);

        let frame = match self.canvas.get_current_texture() {
            Ok(frame) => frame,
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::warn!("Surface needs to be reconfigured: {e}.");
                self.canvas.reconfigure();
                self.overlay_renderer.clear();
                return !self.should_close();
            }
            Err(e) => {
                log::error!("Failed to acquire a frame: {}", ViewerError::from(e));
                self.overlay_renderer.clear();
                return !self.should_close();
            }
        };
        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let ctxt = Context::get();
        let mut encoder = ctxt.create_command_encoder(Some("clipview_frame_encoder"));
        let depth_view = self.canvas.depth_view().clone();

        {
            let bg = scene.background;
            let _clear_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("clear_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg.r as f64,
                            g: bg.g as f64,
                            b: bg.b as f64,
                            a: bg.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }

        if let Some(model) = scene.model() {
            if !self.model_renderer.is_uploaded(scene.revision()) {
                self.model_renderer.upload(model, scene.revision());
            }

            self.model_renderer.prepare(
                model,
                &*camera,
                &scene.lights,
                self.tone_mapping,
                self.exposure,
            );

            let mut scene_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.model_renderer.render(model, &mut scene_pass);
        }

        if self.overlay_renderer.needs_rendering() {
            let mut overlay_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("overlay_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.overlay_renderer.render(&mut overlay_pass);
        }

        ctxt.submit(std::iter::once(encoder.finish()));
        self.canvas.present(frame);

        !self.should_close()
    }

    /// Resizes the drawing buffer when the window size or the pixel ratio changed.
    fn sync_viewport(&mut self, camera: &mut dyn Camera3d) {
        let scale_factor = self.canvas.scale_factor();
        self.viewport
            .set_pixel_ratio(self.pixel_ratio.unwrap_or(scale_factor));

        let (width, height) = self.canvas.inner_size();
        let requested = self
            .viewport
            .drawing_size(width as f64 / scale_factor, height as f64 / scale_factor);

        if let Some((w, h)) = self.viewport.sync(requested) {
            log::debug!("Drawing buffer resized to {w}x{h}.");
            self.canvas.resize(w, h);
            camera.handle_event(&WindowEvent::FramebufferSize(w, h));
        }
    }
}
