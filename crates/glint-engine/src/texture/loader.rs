use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;

use log::{debug, error};

/// Single blue pixel shown until the real image arrives.
const PLACEHOLDER_PIXEL: [u8; 4] = [0, 0, 255, 255];

struct TextureSlot {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    generation: u64,
}

/// Shared, swappable texture handle.
///
/// Clones share the slot; the loader thread holds one clone and the scene
/// another. Swapping drops the previous texture rather than destroying it, in
/// case a recorded frame still references it.
#[derive(Clone)]
pub struct SceneTexture {
    slot: Arc<Mutex<TextureSlot>>,
}

impl SceneTexture {
    /// Creates the slot holding the 1x1 opaque blue placeholder.
    pub fn placeholder(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let (texture, view) = upload_rgba(device, queue, 1, 1, &PLACEHOLDER_PIXEL, "placeholder");
        Self {
            slot: Arc::new(Mutex::new(TextureSlot {
                texture,
                view,
                generation: 0,
            })),
        }
    }

    /// Decodes `path` on a background thread and swaps it into the slot.
    ///
    /// On any failure the placeholder stays in place and the error is logged
    /// once; the scene keeps rendering blue.
    pub fn load_async(&self, device: &wgpu::Device, queue: &wgpu::Queue, path: PathBuf) {
        let device = device.clone();
        let queue = queue.clone();
        let slot = Arc::clone(&self.slot);

        let spawned = thread::Builder::new()
            .name("texture-loader".into())
            .spawn(move || {
                let image = match decode_rgba(&path) {
                    Ok(image) => image,
                    Err(message) => {
                        error!("texture load failed: {}: {message}", path.display());
                        return;
                    }
                };

                let (width, height) = image.dimensions();
                let (texture, view) =
                    upload_rgba(&device, &queue, width, height, image.as_raw(), "scene texture");

                let Ok(mut slot) = slot.lock() else {
                    return;
                };
                slot.texture = texture;
                slot.view = view;
                slot.generation += 1;
                debug!(
                    "texture swapped in: {} ({width}x{height}, generation {})",
                    path.display(),
                    slot.generation
                );
            });

        if let Err(err) = spawned {
            error!("could not spawn texture loader thread: {err}");
        }
    }

    /// Bumps each time a new image lands in the slot. Starts at zero with the
    /// placeholder.
    pub fn generation(&self) -> u64 {
        self.slot.lock().map(|s| s.generation).unwrap_or(0)
    }

    /// Clones the current view for bind group creation.
    pub fn view(&self) -> Option<wgpu::TextureView> {
        self.slot.lock().ok().map(|s| s.view.clone())
    }

    /// Clones the current texture handle.
    pub fn texture(&self) -> Option<wgpu::Texture> {
        self.slot.lock().ok().map(|s| s.texture.clone())
    }
}

fn decode_rgba(path: &PathBuf) -> Result<image::RgbaImage, String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    let decoded = image::load_from_memory(&bytes).map_err(|e| e.to_string())?;
    Ok(decoded.to_rgba8())
}

fn upload_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    width: u32,
    height: u32,
    pixels: &[u8],
    label: &str,
) -> (wgpu::Texture, wgpu::TextureView) {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

/// Clamp-to-edge linear sampler; image sizes are not restricted to powers of
/// two, so addressing never wraps.
pub fn default_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("scene sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_reports_missing_file() {
        let err = decode_rgba(&PathBuf::from("/nonexistent/texture.png")).unwrap_err();
        assert!(!err.is_empty());
    }

    #[test]
    fn decode_rejects_garbage_bytes() {
        let dir = std::env::temp_dir().join("glint-texture-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("not-an-image.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        assert!(decode_rgba(&path).is_err());
    }
}
