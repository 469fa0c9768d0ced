//! GPU textures built from decoded images.

use std::sync::Arc;

use crate::context::Context;
use crate::scene::ImageData;

/// A GPU texture with its view and sampler.
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    /// Texture dimensions (width, height).
    pub size: (u32, u32),
}

impl Texture {
    /// Uploads an sRGB-encoded RGBA8 image, with a full mip chain if `generate_mipmaps`.
    ///
    /// The texture repeats outside of `[0, 1]`. An image without pixels is
    /// replaced by a single white one.
    pub fn new(width: u32, height: u32, data: &[u8], generate_mipmaps: bool) -> Arc<Texture> {
        if width == 0 || height == 0 {
            log::warn!("Texture of {width}x{height} pixels replaced by white.");
            return Self::new_white();
        }

        let ctxt = Context::get();

        let mip_level_count = if generate_mipmaps {
            mip_level_count(width, height)
        } else {
            1
        };

        let texture = ctxt.create_texture(&wgpu::TextureDescriptor {
            label: Some("model_texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let mut level = data.to_vec();
        let (mut w, mut h) = (width, height);
        for mip_level in 0..mip_level_count {
            if mip_level > 0 {
                level = downsample_rgba(&level, w, h);
                w = (w / 2).max(1);
                h = (h / 2).max(1);
            }

            ctxt.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &level,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(w * 4),
                    rows_per_image: Some(h),
                },
                wgpu::Extent3d {
                    width: w,
                    height: h,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = ctxt.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("model_texture_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: if generate_mipmaps {
                wgpu::FilterMode::Linear
            } else {
                wgpu::FilterMode::Nearest
            },
            ..Default::default()
        });

        Arc::new(Texture {
            texture,
            view,
            sampler,
            size: (width, height),
        })
    }

    /// Uploads an imported image, repeating and mipmapped like glTF's default sampler.
    pub fn from_image(image: &ImageData) -> Arc<Texture> {
        Self::new(image.width, image.height, &image.pixels, true)
    }

    /// A 1x1 white texture, bound when a material has no base color image.
    pub fn new_white() -> Arc<Texture> {
        Self::new(1, 1, &[255; 4], false)
    }
}

fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Downsamples an RGBA image by half using box filtering.
fn downsample_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let new_width = (width / 2).max(1);
    let new_height = (height / 2).max(1);
    let mut new_data = vec![0u8; (new_width * new_height * 4) as usize];

    for y in 0..new_height {
        for x in 0..new_width {
            // Sample the 2x2 block, or fewer pixels at the edges.
            let mut sum = [0u32; 4];
            let mut count = 0u32;

            for (sx, sy) in [(0, 0), (1, 0), (0, 1), (1, 1)].map(|(dx, dy)| (x * 2 + dx, y * 2 + dy)) {
                if sx < width && sy < height {
                    let idx = ((sy * width + sx) * 4) as usize;
                    for (c, s) in sum.iter_mut().enumerate() {
                        *s += data[idx + c] as u32;
                    }
                    count += 1;
                }
            }

            let dst = ((y * new_width + x) * 4) as usize;
            for (c, s) in sum.iter().enumerate() {
                new_data[dst + c] = (s / count) as u8;
            }
        }
    }

    new_data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mip_chain_length() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 1), 2);
        assert_eq!(mip_level_count(256, 64), 9);
        assert_eq!(mip_level_count(300, 10), 9);
    }

    #[test]
    fn downsample_averages_blocks() {
        #[rustfmt::skip]
        let data = [
            0, 0, 0, 255,   100, 100, 100, 255,
            200, 200, 200, 255,   100, 100, 100, 255,
        ];
        assert_eq!(downsample_rgba(&data, 2, 2), vec![100, 100, 100, 255]);
    }

    #[test]
    fn downsample_handles_odd_sizes() {
        let data = [10u8, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120];
        // 3x1 -> 1x1: only the first 2x1 block is sampled.
        assert_eq!(downsample_rgba(&data, 3, 1), vec![30, 40, 50, 60]);
    }
}
