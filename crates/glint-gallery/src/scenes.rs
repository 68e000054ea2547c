//! The demo scenes: a static colored plane, a spinning colored cube, and a
//! spinning textured cube. All three are instances of [`MeshScene`], differing
//! only in configuration.

use std::path::{Path, PathBuf};

use glam::{Mat4, Vec3};
use log::warn;
use wgpu::util::DeviceExt;

use glint_engine::mesh::{self, MeshData};
use glint_engine::session::{
    GpuObjectSet, Scene, SceneCapabilities, SceneFrame, SceneGpu, SessionError,
};
use glint_engine::shader::{
    BindingProfile, ProgramBuilder, ProgramConfig, ProgramSources,
};
use glint_engine::texture::{default_sampler, SceneTexture};

/// Every scene sits at the same spot in front of the viewer.
const MODEL_TRANSLATION: Vec3 = Vec3::new(0.0, 0.0, -5.0);

/// Matrices uploaded per frame, std140-compatible.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniforms {
    projection: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
}

/// Static description of one gallery entry.
pub struct SceneConfig {
    pub name: &'static str,
    pub mesh: MeshData,
    pub vertex_layout: wgpu::VertexBufferLayout<'static>,
    pub sources: ProgramSources,
    pub capabilities: SceneCapabilities,
    pub texture_image: Option<PathBuf>,
}

/// A mesh drawn with one shader program and, optionally, one texture.
pub struct MeshScene {
    config: SceneConfig,
    builder: ProgramBuilder,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    texture: Option<SceneTexture>,
    sampler: Option<wgpu::Sampler>,
    texture_generation: u64,
}

impl MeshScene {
    pub fn from_config(config: SceneConfig) -> Self {
        Self {
            config,
            builder: ProgramBuilder::new(),
            bind_group_layout: None,
            texture: None,
            sampler: None,
            texture_generation: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.config.name
    }

    fn binding_profile(&self) -> BindingProfile {
        if self.config.capabilities.textured {
            BindingProfile::UniformsAndTexture
        } else {
            BindingProfile::UniformsOnly
        }
    }

    fn make_bind_group(
        &self,
        gpu: &SceneGpu<'_>,
        uniform_buffer: &wgpu::Buffer,
    ) -> Option<wgpu::BindGroup> {
        let layout = self.bind_group_layout.as_ref()?;
        let uniforms = wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        };

        if !self.config.capabilities.textured {
            return Some(gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(self.config.name),
                layout,
                entries: &[uniforms],
            }));
        }

        let view = self.texture.as_ref()?.view()?;
        let sampler = self.sampler.as_ref()?;
        Some(gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(self.config.name),
            layout,
            entries: &[
                uniforms,
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        }))
    }

    fn model_matrix(&self, rotation_angle: f32) -> Mat4 {
        let mut model = Mat4::from_translation(MODEL_TRANSLATION);
        if self.config.capabilities.animated {
            model = model
                * Mat4::from_rotation_z(rotation_angle)
                * Mat4::from_rotation_y(rotation_angle * 0.7)
                * Mat4::from_rotation_x(rotation_angle * 0.3);
        }
        model
    }
}

impl Scene for MeshScene {
    fn capabilities(&self) -> SceneCapabilities {
        self.config.capabilities
    }

    fn begin_build(&mut self, gpu: &SceneGpu<'_>) -> Result<(), SessionError> {
        if self.config.capabilities.textured {
            let texture = SceneTexture::placeholder(gpu.device, gpu.queue);
            if let Some(path) = &self.config.texture_image {
                texture.load_async(gpu.device, gpu.queue, path.clone());
            }
            self.texture = Some(texture);
            self.sampler = Some(default_sampler(gpu.device));
        }

        self.builder.issue_build(
            gpu.device,
            ProgramConfig {
                label: self.config.name,
                sources: self.config.sources.clone(),
                vertex_layout: self.config.vertex_layout.clone(),
                binding: self.binding_profile(),
                surface_format: gpu.surface_format,
                depth_format: gpu.depth_format,
            },
        );
        Ok(())
    }

    fn program_ready(&self) -> bool {
        self.builder.is_ready()
    }

    fn allocate(
        &mut self,
        gpu: &SceneGpu<'_>,
        objects: &mut GpuObjectSet,
    ) -> Result<(), SessionError> {
        let Some(program) = self.builder.take_built() else {
            warn!("{}: program slot empty at allocation", self.config.name);
            return Ok(());
        };

        objects.vertex_buffer = Some(gpu.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some(self.config.name),
                contents: bytemuck::cast_slice(&self.config.mesh.attributes),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
        objects.index_buffer = Some(gpu.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some(self.config.name),
                contents: bytemuck::cast_slice(&self.config.mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        ));
        objects.uniform_buffer = Some(gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(self.config.name),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        objects.index_count = self.config.mesh.index_count();

        self.bind_group_layout = Some(program.bind_group_layout);
        objects.pipeline = Some(program.pipeline);

        if let Some(texture) = &self.texture {
            objects.texture = texture.texture();
            self.texture_generation = texture.generation();
        }
        if let Some(uniform_buffer) = objects.uniform_buffer.as_ref() {
            objects.bind_group = self.make_bind_group(gpu, uniform_buffer);
        }
        Ok(())
    }

    fn draw(
        &mut self,
        gpu: &SceneGpu<'_>,
        objects: &mut GpuObjectSet,
        pass: &mut wgpu::RenderPass<'_>,
        frame: &SceneFrame,
    ) -> Result<(), SessionError> {
        // Swap in a freshly loaded texture by rebuilding the bind group.
        if let Some(texture) = &self.texture {
            let generation = texture.generation();
            if generation != self.texture_generation {
                self.texture_generation = generation;
                objects.texture = texture.texture();
                if let Some(uniform_buffer) = objects.uniform_buffer.as_ref() {
                    objects.bind_group = self.make_bind_group(gpu, uniform_buffer);
                }
            }
        }

        let (Some(pipeline), Some(vertices), Some(indices), Some(uniforms), Some(bind_group)) = (
            objects.pipeline.as_ref(),
            objects.vertex_buffer.as_ref(),
            objects.index_buffer.as_ref(),
            objects.uniform_buffer.as_ref(),
            objects.bind_group.as_ref(),
        ) else {
            return Ok(());
        };

        let contents = SceneUniforms {
            projection: frame.projection.to_cols_array_2d(),
            model: self.model_matrix(frame.rotation_angle).to_cols_array_2d(),
        };
        gpu.queue.write_buffer(uniforms, 0, bytemuck::bytes_of(&contents));

        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.set_vertex_buffer(0, vertices.slice(..));
        pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..objects.index_count, 0, 0..1);
        Ok(())
    }
}

// ── gallery entries ───────────────────────────────────────────────────────

fn shader_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders")
}

fn asset_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}

fn sources(stem: &str) -> ProgramSources {
    let dir = shader_dir();
    ProgramSources {
        vertex: dir.join(format!("{stem}.vert.wgsl")),
        fragment: dir.join(format!("{stem}.frag.wgsl")),
    }
}

/// Static square plane with per-vertex colors.
pub fn plane() -> MeshScene {
    MeshScene::from_config(SceneConfig {
        name: "plane",
        mesh: mesh::square_plane(1.0),
        vertex_layout: mesh::plane_vertex_layout(),
        sources: sources("plane"),
        capabilities: SceneCapabilities {
            animated: false,
            textured: false,
        },
        texture_image: None,
    })
}

/// Spinning cube with solid-colored faces.
pub fn cube() -> MeshScene {
    MeshScene::from_config(SceneConfig {
        name: "cube",
        mesh: mesh::cube(1.0),
        vertex_layout: mesh::cube_vertex_layout(),
        sources: sources("cube"),
        capabilities: SceneCapabilities {
            animated: true,
            textured: false,
        },
        texture_image: None,
    })
}

/// Spinning cube sampling an image texture.
pub fn textured_cube() -> MeshScene {
    MeshScene::from_config(SceneConfig {
        name: "textured-cube",
        mesh: mesh::cube(1.0),
        vertex_layout: mesh::cube_vertex_layout(),
        sources: sources("textured_cube"),
        capabilities: SceneCapabilities {
            animated: true,
            textured: true,
        },
        texture_image: Some(asset_dir().join("cubetexture.png")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_scenes() -> Vec<MeshScene> {
        vec![plane(), cube(), textured_cube()]
    }

    #[test]
    fn shader_sources_exist_on_disk() {
        for scene in all_scenes() {
            let sources = &scene.config.sources;
            assert!(sources.vertex.is_file(), "missing {:?}", sources.vertex);
            assert!(sources.fragment.is_file(), "missing {:?}", sources.fragment);
        }
    }

    #[test]
    fn texture_asset_exists() {
        let scene = textured_cube();
        let path = scene.config.texture_image.as_ref().unwrap();
        assert!(path.is_file(), "missing {path:?}");
    }

    #[test]
    fn mesh_strides_match_vertex_layouts() {
        for scene in all_scenes() {
            let bytes_per_vertex = scene.config.mesh.stride as u64 * 4;
            assert_eq!(bytes_per_vertex, scene.config.vertex_layout.array_stride);
        }
    }

    #[test]
    fn uniform_block_is_two_matrices() {
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 128);
    }

    #[test]
    fn only_textured_scenes_request_texture_bindings() {
        assert_eq!(plane().binding_profile(), BindingProfile::UniformsOnly);
        assert_eq!(cube().binding_profile(), BindingProfile::UniformsOnly);
        assert_eq!(
            textured_cube().binding_profile(),
            BindingProfile::UniformsAndTexture
        );
    }

    #[test]
    fn static_plane_ignores_rotation() {
        let scene = plane();
        assert_eq!(scene.model_matrix(0.0), scene.model_matrix(2.5));
    }

    #[test]
    fn animated_cube_rotates() {
        let scene = cube();
        assert_ne!(scene.model_matrix(0.0), scene.model_matrix(2.5));
        // Zero angle leaves only the translation.
        assert_eq!(
            scene.model_matrix(0.0),
            Mat4::from_translation(MODEL_TRANSLATION)
        );
    }
}
