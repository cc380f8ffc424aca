use std::fmt;
use std::rc::Rc;

use log::{debug, warn};

use crate::backend::GlBackend;
use crate::consts;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::texture::{CubeFace, PixelFormat, PixelType, Texture, TextureParams, TextureTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attachment {
    Color0,
    Depth,
    Stencil,
    DepthStencil,
}

impl Attachment {
    pub fn gl(self) -> u32 {
        match self {
            Attachment::Color0 => consts::COLOR_ATTACHMENT0,
            Attachment::Depth => consts::DEPTH_ATTACHMENT,
            Attachment::Stencil => consts::STENCIL_ATTACHMENT,
            Attachment::DepthStencil => consts::DEPTH_STENCIL_ATTACHMENT,
        }
    }
}

/// Internal formats a renderbuffer can be allocated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderbufferFormat {
    Rgba4,
    Rgb565,
    Rgb5A1,
    DepthComponent16,
    StencilIndex8,
    DepthStencil,
}

impl RenderbufferFormat {
    pub fn gl(self) -> u32 {
        match self {
            RenderbufferFormat::Rgba4 => consts::RGBA4,
            RenderbufferFormat::Rgb565 => consts::RGB565,
            RenderbufferFormat::Rgb5A1 => consts::RGB5_A1,
            RenderbufferFormat::DepthComponent16 => consts::DEPTH_COMPONENT16,
            RenderbufferFormat::StencilIndex8 => consts::STENCIL_INDEX8,
            RenderbufferFormat::DepthStencil => consts::DEPTH_STENCIL,
        }
    }

    /// Attachment point this format is normally bound to.
    pub fn attachment(self) -> Attachment {
        match self {
            RenderbufferFormat::Rgba4 | RenderbufferFormat::Rgb565 | RenderbufferFormat::Rgb5A1 => {
                Attachment::Color0
            }
            RenderbufferFormat::DepthComponent16 => Attachment::Depth,
            RenderbufferFormat::StencilIndex8 => Attachment::Stencil,
            RenderbufferFormat::DepthStencil => Attachment::DepthStencil,
        }
    }
}

/// Result of a completeness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramebufferStatus {
    Complete,
    IncompleteAttachment,
    IncompleteMissingAttachment,
    IncompleteDimensions,
    Unsupported,
    Unknown(u32),
}

impl FramebufferStatus {
    pub fn from_gl(status: u32) -> Self {
        match status {
            consts::FRAMEBUFFER_COMPLETE => FramebufferStatus::Complete,
            consts::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => FramebufferStatus::IncompleteAttachment,
            consts::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => {
                FramebufferStatus::IncompleteMissingAttachment
            }
            consts::FRAMEBUFFER_INCOMPLETE_DIMENSIONS => FramebufferStatus::IncompleteDimensions,
            consts::FRAMEBUFFER_UNSUPPORTED => FramebufferStatus::Unsupported,
            other => FramebufferStatus::Unknown(other),
        }
    }

    pub fn is_complete(self) -> bool {
        self == FramebufferStatus::Complete
    }
}

pub struct Renderbuffer<B: GlBackend> {
    gl: Rc<B>,
    handle: B::Renderbuffer,
    format: RenderbufferFormat,
    size: (u32, u32),
}

impl<B: GlBackend> fmt::Debug for Renderbuffer<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderbuffer")
            .field("handle", &self.handle)
            .field("format", &self.format)
            .field("size", &self.size)
            .finish()
    }
}

impl<B: GlBackend> Renderbuffer<B> {
    pub fn new(
        ctx: &Context<B>,
        format: RenderbufferFormat,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let handle = ctx.gl().create_renderbuffer()?;
        debug!("created {format:?} renderbuffer {handle:?} ({width}x{height})");
        let mut renderbuffer = Self {
            gl: ctx.shared(),
            handle,
            format,
            size: (0, 0),
        };
        renderbuffer.resize(width, height);
        Ok(renderbuffer)
    }

    pub fn handle(&self) -> &B::Renderbuffer {
        &self.handle
    }

    pub fn format(&self) -> RenderbufferFormat {
        self.format
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn bind(&self) {
        self.gl
            .bind_renderbuffer(consts::RENDERBUFFER, Some(&self.handle));
    }

    pub fn unbind(&self) {
        self.gl.bind_renderbuffer(consts::RENDERBUFFER, None);
    }

    /// Reallocates storage; previous contents are lost.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.bind();
        self.gl.renderbuffer_storage(
            consts::RENDERBUFFER,
            self.format.gl(),
            width as i32,
            height as i32,
        );
        self.size = (width, height);
    }

    pub fn delete(self) {
        debug!("deleting renderbuffer {:?}", self.handle);
        self.gl.delete_renderbuffer(&self.handle);
    }
}

pub struct Framebuffer<B: GlBackend> {
    gl: Rc<B>,
    handle: B::Framebuffer,
}

impl<B: GlBackend> fmt::Debug for Framebuffer<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Framebuffer")
            .field("handle", &self.handle)
            .finish()
    }
}

impl<B: GlBackend> Framebuffer<B> {
    pub fn new(ctx: &Context<B>) -> Result<Self> {
        let handle = ctx.gl().create_framebuffer()?;
        debug!("created framebuffer {handle:?}");
        Ok(Self {
            gl: ctx.shared(),
            handle,
        })
    }

    pub fn handle(&self) -> &B::Framebuffer {
        &self.handle
    }

    pub fn bind(&self) {
        self.gl
            .bind_framebuffer(consts::FRAMEBUFFER, Some(&self.handle));
    }

    /// Restores the default framebuffer.
    pub fn unbind(&self) {
        self.gl.bind_framebuffer(consts::FRAMEBUFFER, None);
    }

    /// Attaches level 0 of a 2D texture. Leaves this framebuffer bound.
    pub fn attach_texture(&self, attachment: Attachment, texture: &Texture<B>) {
        self.bind();
        self.gl.framebuffer_texture_2d(
            consts::FRAMEBUFFER,
            attachment.gl(),
            consts::TEXTURE_2D,
            Some(texture.handle()),
            0,
        );
    }

    /// Attaches level 0 of one cube map face. Leaves this framebuffer bound.
    pub fn attach_cube_face(&self, attachment: Attachment, texture: &Texture<B>, face: CubeFace) {
        self.bind();
        self.gl.framebuffer_texture_2d(
            consts::FRAMEBUFFER,
            attachment.gl(),
            face.gl(),
            Some(texture.handle()),
            0,
        );
    }

    pub fn attach_renderbuffer(&self, attachment: Attachment, renderbuffer: &Renderbuffer<B>) {
        self.bind();
        self.gl.framebuffer_renderbuffer(
            consts::FRAMEBUFFER,
            attachment.gl(),
            consts::RENDERBUFFER,
            Some(renderbuffer.handle()),
        );
    }

    pub fn status(&self) -> FramebufferStatus {
        self.bind();
        FramebufferStatus::from_gl(self.gl.check_framebuffer_status(consts::FRAMEBUFFER))
    }

    /// Fails unless the attachments form a complete framebuffer.
    pub fn check(&self) -> Result<()> {
        match self.status() {
            FramebufferStatus::Complete => Ok(()),
            status => {
                warn!("framebuffer {:?} is incomplete: {status:?}", self.handle);
                Err(Error::IncompleteFramebuffer(status))
            }
        }
    }

    pub fn delete(self) {
        debug!("deleting framebuffer {:?}", self.handle);
        self.gl.delete_framebuffer(&self.handle);
    }
}

/// Off-screen colour target with an optional depth buffer.
#[derive(Debug)]
pub struct RenderTarget<B: GlBackend> {
    framebuffer: Framebuffer<B>,
    color: Texture<B>,
    depth: Option<Renderbuffer<B>>,
    size: (u32, u32),
}

impl<B: GlBackend> RenderTarget<B> {
    pub fn new(ctx: &Context<B>, width: u32, height: u32, depth: bool) -> Result<Self> {
        let color = Texture::new(ctx, TextureTarget::Texture2D)?;
        color.apply(&TextureParams::default());
        color.image(width, height, PixelFormat::Rgba, PixelType::UnsignedByte, None)?;

        let depth = if depth {
            Some(Renderbuffer::new(
                ctx,
                RenderbufferFormat::DepthComponent16,
                width,
                height,
            )?)
        } else {
            None
        };

        let framebuffer = Framebuffer::new(ctx)?;
        framebuffer.attach_texture(Attachment::Color0, &color);
        if let Some(depth) = &depth {
            framebuffer.attach_renderbuffer(Attachment::Depth, depth);
        }
        let target = Self {
            framebuffer,
            color,
            depth,
            size: (width, height),
        };
        if let Err(err) = target.framebuffer.check() {
            target.framebuffer.unbind();
            target.delete();
            return Err(err);
        }
        target.framebuffer.unbind();
        Ok(target)
    }

    pub fn framebuffer(&self) -> &Framebuffer<B> {
        &self.framebuffer
    }

    pub fn texture(&self) -> &Texture<B> {
        &self.color
    }

    pub fn depth(&self) -> Option<&Renderbuffer<B>> {
        self.depth.as_ref()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Binds the framebuffer and covers it with the viewport.
    pub fn bind(&self) {
        self.framebuffer.bind();
        self.framebuffer
            .gl
            .viewport(0, 0, self.size.0 as i32, self.size.1 as i32);
    }

    pub fn unbind(&self) {
        self.framebuffer.unbind();
    }

    pub fn delete(self) {
        self.framebuffer.delete();
        self.color.delete();
        if let Some(depth) = self.depth {
            depth.delete();
        }
    }
}
