use std::rc::Rc;

use bytemuck::Pod;
use log::debug;

use crate::attribute::{AttributeArray, AttributeArrays, AttributeLayout};
use crate::backend::{GlBackend, RecordingBackend};
use crate::buffer::{Buffer, BufferTarget, BufferUsage};
use crate::config::ContextOptions;
use crate::consts;
use crate::elements::{ElementArray, Indices};
use crate::error::Result;
use crate::framebuffer::{Framebuffer, RenderTarget, Renderbuffer, RenderbufferFormat};
use crate::program::Program;
use crate::shader::{Shader, ShaderKind};
use crate::texture::{Texture, TextureTarget};

/// Something a drawing context can be obtained from, such as a canvas.
pub trait GlSurface {
    type Backend: GlBackend;

    fn acquire(&self, options: &ContextOptions) -> Result<Self::Backend>;

    /// Drawing-buffer size in pixels.
    fn size(&self) -> (u32, u32);
}

/// Off-screen surface that yields a [`RecordingBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessSurface {
    pub width: u32,
    pub height: u32,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl GlSurface for HeadlessSurface {
    type Backend = RecordingBackend;

    fn acquire(&self, _options: &ContextOptions) -> Result<RecordingBackend> {
        Ok(RecordingBackend::new())
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Which buffers [`Context::clear`] resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearMask {
    pub color: bool,
    pub depth: bool,
    pub stencil: bool,
}

impl ClearMask {
    pub const COLOR: Self = Self {
        color: true,
        depth: false,
        stencil: false,
    };
    pub const COLOR_DEPTH: Self = Self {
        color: true,
        depth: true,
        stencil: false,
    };
    pub const ALL: Self = Self {
        color: true,
        depth: true,
        stencil: true,
    };

    pub fn bits(self) -> u32 {
        let mut bits = 0;
        if self.color {
            bits |= consts::COLOR_BUFFER_BIT;
        }
        if self.depth {
            bits |= consts::DEPTH_BUFFER_BIT;
        }
        if self.stencil {
            bits |= consts::STENCIL_BUFFER_BIT;
        }
        bits
    }
}

/// Server-side capabilities toggled with [`Context::enable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Blend,
    CullFace,
    DepthTest,
    ScissorTest,
    StencilTest,
}

impl Capability {
    pub fn gl(self) -> u32 {
        match self {
            Capability::Blend => consts::BLEND,
            Capability::CullFace => consts::CULL_FACE,
            Capability::DepthTest => consts::DEPTH_TEST,
            Capability::ScissorTest => consts::SCISSOR_TEST,
            Capability::StencilTest => consts::STENCIL_TEST,
        }
    }
}

/// Graphics context handle plus factory methods for every wrapper type.
///
/// Wrappers created here keep a shared reference to the backend, so they can
/// outlive the borrow of the context that produced them.
#[derive(Debug)]
pub struct Context<B: GlBackend> {
    gl: Rc<B>,
    options: ContextOptions,
    size: (u32, u32),
}

impl<B: GlBackend> Clone for Context<B> {
    fn clone(&self) -> Self {
        Self {
            gl: Rc::clone(&self.gl),
            options: self.options,
            size: self.size,
        }
    }
}

impl<B: GlBackend> Context<B> {
    /// Wraps an already obtained backend.
    pub fn new(backend: B) -> Self {
        Self {
            gl: Rc::new(backend),
            options: ContextOptions::default(),
            size: (0, 0),
        }
    }

    /// Obtains a backend from a canvas-like surface.
    pub fn from_surface<S>(surface: &S, options: &ContextOptions) -> Result<Self>
    where
        S: GlSurface<Backend = B>,
    {
        let backend = surface.acquire(options)?;
        let size = surface.size();
        debug!("acquired drawing context ({}x{})", size.0, size.1);
        Ok(Self {
            gl: Rc::new(backend),
            options: *options,
            size,
        })
    }

    pub fn gl(&self) -> &B {
        &self.gl
    }

    pub(crate) fn shared(&self) -> Rc<B> {
        Rc::clone(&self.gl)
    }

    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Records a new drawing-buffer size, e.g. after the canvas was resized.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    pub fn buffer(&self, target: BufferTarget, usage: BufferUsage) -> Result<Buffer<B>> {
        Buffer::new(self, target, usage)
    }

    /// Creates a static array buffer holding `data`.
    pub fn array_buffer<T: Pod>(&self, data: &[T]) -> Result<Buffer<B>> {
        let buffer = Buffer::new_static(self, BufferTarget::Array)?;
        buffer.data(data);
        Ok(buffer)
    }

    /// Creates a static element buffer holding `data`.
    pub fn element_buffer<T: Pod>(&self, data: &[T]) -> Result<Buffer<B>> {
        let buffer = Buffer::new_static(self, BufferTarget::ElementArray)?;
        buffer.data(data);
        Ok(buffer)
    }

    /// Creates an attribute array backed by a fresh static buffer.
    pub fn attribute_array<T: Pod>(
        &self,
        location: u32,
        layout: AttributeLayout,
        data: &[T],
    ) -> Result<AttributeArray<B>> {
        AttributeArray::with_data(self, location, layout, data)
    }

    pub fn attribute_arrays(&self) -> AttributeArrays<B> {
        AttributeArrays::new()
    }

    pub fn element_array(&self, indices: impl Into<Indices>) -> Result<ElementArray<B>> {
        ElementArray::new(self, indices.into(), BufferUsage::Static)
    }

    pub fn texture_2d(&self) -> Result<Texture<B>> {
        Texture::new(self, TextureTarget::Texture2D)
    }

    pub fn cube_map(&self) -> Result<Texture<B>> {
        Texture::new(self, TextureTarget::CubeMap)
    }

    pub fn vertex_shader(&self, source: &str) -> Result<Shader<B>> {
        Shader::compile(self, ShaderKind::Vertex, source)
    }

    pub fn fragment_shader(&self, source: &str) -> Result<Shader<B>> {
        Shader::compile(self, ShaderKind::Fragment, source)
    }

    pub fn program(
        &self,
        vertex: &Shader<B>,
        fragment: &Shader<B>,
        bindings: &[(u32, &str)],
    ) -> Result<Program<B>> {
        Program::link(self, vertex, fragment, bindings)
    }

    /// Compiles both stages and links them; the shaders are owned by the
    /// returned program.
    pub fn program_from_sources(
        &self,
        vertex_source: &str,
        fragment_source: &str,
        bindings: &[(u32, &str)],
    ) -> Result<Program<B>> {
        Program::from_sources(self, vertex_source, fragment_source, bindings)
    }

    pub fn framebuffer(&self) -> Result<Framebuffer<B>> {
        Framebuffer::new(self)
    }

    pub fn renderbuffer(
        &self,
        format: RenderbufferFormat,
        width: u32,
        height: u32,
    ) -> Result<Renderbuffer<B>> {
        Renderbuffer::new(self, format, width, height)
    }

    pub fn render_target(&self, width: u32, height: u32, depth: bool) -> Result<RenderTarget<B>> {
        RenderTarget::new(self, width, height, depth)
    }

    pub fn viewport(&self, x: i32, y: i32, width: u32, height: u32) {
        self.gl.viewport(x, y, width as i32, height as i32);
    }

    /// Sets the viewport to cover the whole drawing buffer.
    pub fn reset_viewport(&self) {
        self.viewport(0, 0, self.size.0, self.size.1);
    }

    pub fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.gl.clear_color(r, g, b, a);
    }

    pub fn clear(&self, mask: ClearMask) {
        self.gl.clear(mask.bits());
    }

    pub fn enable(&self, capability: Capability) {
        self.gl.enable(capability.gl());
    }

    pub fn disable(&self, capability: Capability) {
        self.gl.disable(capability.gl());
    }

    pub fn blend_func(&self, source: u32, destination: u32) {
        self.gl.blend_func(source, destination);
    }

    pub fn depth_func(&self, func: u32) {
        self.gl.depth_func(func);
    }

    pub fn supports_extension(&self, name: &str) -> bool {
        self.gl.supports_extension(name)
    }

    pub fn is_context_lost(&self) -> bool {
        self.gl.is_context_lost()
    }
}

#[cfg(target_arch = "wasm32")]
impl Context<web_sys::WebGlRenderingContext> {
    /// Looks up a canvas by element id and requests a WebGL context from it.
    pub fn from_canvas_id(id: &str, options: &ContextOptions) -> Result<Self> {
        let canvas = crate::backend::webgl::canvas_by_id(id)?;
        Self::from_surface(&canvas, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::GlCall;

    fn headless() -> Context<RecordingBackend> {
        Context::from_surface(&HeadlessSurface::new(640, 480), &ContextOptions::default())
            .unwrap()
    }

    #[test]
    fn from_surface_records_size_and_options() {
        let options = ContextOptions::default().with_stencil(true);
        let ctx = Context::from_surface(&HeadlessSurface::new(320, 200), &options).unwrap();
        assert_eq!(ctx.size(), (320, 200));
        assert!(ctx.options().stencil);
    }

    #[test]
    fn state_helpers_forward_to_backend() {
        let ctx = headless();
        ctx.clear_color(0.1, 0.2, 0.3, 1.0);
        ctx.clear(ClearMask::COLOR_DEPTH);
        ctx.enable(Capability::DepthTest);
        ctx.disable(Capability::Blend);
        ctx.reset_viewport();
        assert_eq!(
            ctx.gl().calls(),
            vec![
                GlCall::ClearColor([0.1, 0.2, 0.3, 1.0]),
                GlCall::Clear(consts::COLOR_BUFFER_BIT | consts::DEPTH_BUFFER_BIT),
                GlCall::Enable(consts::DEPTH_TEST),
                GlCall::Disable(consts::BLEND),
                GlCall::Viewport {
                    x: 0,
                    y: 0,
                    width: 640,
                    height: 480
                },
            ]
        );
    }

    #[test]
    fn clones_share_the_backend() {
        let ctx = headless();
        let other = ctx.clone();
        other.clear(ClearMask::ALL);
        assert_eq!(ctx.gl().calls().len(), 1);
    }

    #[test]
    fn reports_extensions_and_lost_context() {
        let ctx = headless();
        ctx.gl().add_extension("OES_element_index_uint");
        assert!(ctx.supports_extension("OES_element_index_uint"));
        assert!(!ctx.supports_extension("WEBGL_draw_buffers"));
        assert!(!ctx.is_context_lost());
        ctx.gl().lose_context();
        assert!(ctx.is_context_lost());
    }
}
