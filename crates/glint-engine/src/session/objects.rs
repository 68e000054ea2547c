/// Every GPU object a session may own, each individually optional.
///
/// Scenes populate the subset they need during allocation; teardown releases
/// whatever is present and clears the rest, so the set is always safe to
/// release regardless of how far a session got.
#[derive(Default)]
pub struct GpuObjectSet {
    pub vertex_buffer: Option<wgpu::Buffer>,
    pub index_buffer: Option<wgpu::Buffer>,
    pub uniform_buffer: Option<wgpu::Buffer>,
    pub bind_group: Option<wgpu::BindGroup>,
    pub pipeline: Option<wgpu::RenderPipeline>,
    pub texture: Option<wgpu::Texture>,

    /// Number of indices to draw; zero until buffers are allocated.
    pub index_count: u32,
}
