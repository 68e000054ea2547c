use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use log::error;
use thiserror::Error;

/// Failures along the source → module → pipeline path.
///
/// None of these are fatal to the process: the owning session simply never
/// reports its program ready, and the error is logged once here.
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("shader source unavailable: {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("shader compilation failed ({label}): {message}")]
    Compile { label: String, message: String },

    #[error("program link failed ({label}): {message}")]
    Link { label: String, message: String },
}

/// Filesystem locations of a program's two shader stages.
#[derive(Debug, Clone)]
pub struct ProgramSources {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

/// Which resource bindings the program's bind group layout declares.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BindingProfile {
    /// Binding 0: uniform buffer (vertex stage).
    UniformsOnly,
    /// Binding 0: uniform buffer, binding 1: 2D texture, binding 2: sampler.
    UniformsAndTexture,
}

/// Everything needed to build one pipeline.
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    pub label: &'static str,
    pub sources: ProgramSources,
    pub vertex_layout: wgpu::VertexBufferLayout<'static>,
    pub binding: BindingProfile,
    pub surface_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
}

/// The linked result: the pipeline plus the layout scenes build their bind
/// groups against.
pub struct BuiltProgram {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

struct ProgramSlot {
    ready: AtomicBool,
    built: Mutex<Option<BuiltProgram>>,
}

/// Hands a program build to a background thread and exposes level-triggered
/// readiness to the session's poll loop.
pub struct ProgramBuilder {
    slot: Arc<ProgramSlot>,
    build_issued: bool,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(ProgramSlot {
                ready: AtomicBool::new(false),
                built: Mutex::new(None),
            }),
            build_issued: false,
        }
    }

    /// Starts the build on a background thread. Subsequent calls are ignored;
    /// a session issues exactly one build.
    pub fn issue_build(&mut self, device: &wgpu::Device, config: ProgramConfig) {
        if self.build_issued {
            return;
        }
        self.build_issued = true;

        let device = device.clone();
        let slot = Arc::clone(&self.slot);

        let spawned = thread::Builder::new()
            .name("program-builder".into())
            .spawn(move || match build(&device, &config) {
                Ok(program) => {
                    if let Ok(mut built) = slot.built.lock() {
                        *built = Some(program);
                    }
                    slot.ready.store(true, Ordering::Release);
                }
                Err(err) => {
                    // Logged exactly once; readiness stays false and the
                    // session stalls in its building phase.
                    error!("program build failed: {err}");
                }
            });

        if let Err(err) = spawned {
            error!("could not spawn program builder thread: {err}");
        }
    }

    /// True once the pipeline is linked and waiting in the slot.
    pub fn is_ready(&self) -> bool {
        self.slot.ready.load(Ordering::Acquire)
    }

    /// Takes ownership of the built program. Returns `None` until ready, and
    /// again after the program has been taken.
    pub fn take_built(&self) -> Option<BuiltProgram> {
        self.slot.built.lock().ok()?.take()
    }
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn read_source(path: &PathBuf) -> Result<String, ProgramError> {
    std::fs::read_to_string(path).map_err(|source| ProgramError::SourceUnavailable {
        path: path.clone(),
        source,
    })
}

/// Compiles one shader stage under a validation scope so source errors come
/// back as values instead of device-level panics.
fn compile_module(
    device: &wgpu::Device,
    label: &str,
    source: String,
) -> Result<wgpu::ShaderModule, ProgramError> {
    let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    if let Some(err) = pollster::block_on(error_scope.pop()) {
        return Err(ProgramError::Compile {
            label: label.to_string(),
            message: err.to_string(),
        });
    }
    Ok(module)
}

fn bind_group_layout(
    device: &wgpu::Device,
    label: &str,
    binding: BindingProfile,
) -> wgpu::BindGroupLayout {
    let uniforms = wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    };

    let entries: Vec<wgpu::BindGroupLayoutEntry> = match binding {
        BindingProfile::UniformsOnly => vec![uniforms],
        BindingProfile::UniformsAndTexture => vec![
            uniforms,
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    };

    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &entries,
    })
}

fn build(device: &wgpu::Device, config: &ProgramConfig) -> Result<BuiltProgram, ProgramError> {
    let vertex_source = read_source(&config.sources.vertex)?;
    let fragment_source = read_source(&config.sources.fragment)?;

    let vertex_module = compile_module(device, config.label, vertex_source)?;
    let fragment_module = compile_module(device, config.label, fragment_source)?;

    let layout = bind_group_layout(device, config.label, config.binding);
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(config.label),
        bind_group_layouts: &[&layout],
        immediate_size: 0,
    });

    // Pipeline creation is where stage interfaces meet; validation failures
    // here are the link errors.
    let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(config.label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &vertex_module,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[config.vertex_layout.clone()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &fragment_module,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: config.surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: config.depth_format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });
    if let Some(err) = pollster::block_on(error_scope.pop()) {
        return Err(ProgramError::Link {
            label: config.label.to_string(),
            message: err.to_string(),
        });
    }

    Ok(BuiltProgram {
        pipeline,
        bind_group_layout: layout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_starts_not_ready() {
        let builder = ProgramBuilder::new();
        assert!(!builder.is_ready());
        assert!(builder.take_built().is_none());
    }

    #[test]
    fn missing_source_is_reported_with_path() {
        let path = PathBuf::from("/nonexistent/shader.wgsl");
        let err = read_source(&path).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("/nonexistent/shader.wgsl"));
    }
}
