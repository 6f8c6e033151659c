/// An acquired swapchain image plus the encoder recording into it.
///
/// Holding the surface texture blocks acquisition of the next one; finish the
/// frame with [`Gpu::present`](super::Gpu::present) promptly.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
