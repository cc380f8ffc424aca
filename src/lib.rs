//! Object-oriented wrappers around the WebGL 1 rendering context.
//!
//! A [`Context`] is obtained from a canvas (or a [`HeadlessSurface`] in
//! tests) and hands out wrappers for buffers, attribute arrays, element
//! arrays, textures, shaders, programs, framebuffers and renderbuffers. Each
//! wrapper remembers its target and type so draws and uploads need fewer
//! arguments than the raw API. Every call goes through the [`GlBackend`]
//! trait, implemented for `web_sys::WebGlRenderingContext` on wasm32 and by
//! [`RecordingBackend`] everywhere.
//!
//! The crate also ships small vector/matrix types, a render loop and an
//! asynchronous asset loader.

pub mod attribute;
pub mod backend;
pub mod buffer;
pub mod config;
pub mod consts;
pub mod context;
pub mod elements;
pub mod error;
pub mod framebuffer;
pub mod loader;
pub mod logging;
pub mod math;
pub mod primitive;
pub mod program;
pub mod render_loop;
pub mod shader;
pub mod texture;

pub use attribute::{AttributeArray, AttributeArrays, AttributeLayout, AttributeType};
pub use backend::{GlBackend, GlCall, ObjectId, RecordingBackend};
pub use buffer::{Buffer, BufferTarget, BufferUsage};
pub use config::{ContextOptions, LoopConfig};
pub use context::{Capability, ClearMask, Context, GlSurface, HeadlessSurface};
pub use elements::{ElementArray, IndexType, Indices};
pub use error::{Error, Result};
pub use framebuffer::{
    Attachment, Framebuffer, FramebufferStatus, RenderTarget, Renderbuffer, RenderbufferFormat,
};
pub use loader::{Fetch, Loader};
#[cfg(not(target_arch = "wasm32"))]
pub use loader::FileFetch;
#[cfg(target_arch = "wasm32")]
pub use loader::{spawn_load, HttpFetch};
pub use logging::{init_logging, LoggingConfig};
pub use math::{Matrix2, Matrix3, Matrix4, Vector2, Vector3, Vector4};
pub use primitive::DrawMode;
pub use program::{Program, UniformValue};
#[cfg(target_arch = "wasm32")]
pub use render_loop::LoopHandle;
pub use render_loop::{FrameTime, LoopControl, RenderLoop};
pub use shader::{Shader, ShaderKind};
pub use texture::{
    CubeFace, PixelFormat, PixelType, Texture, TextureFilter, TextureParams, TextureTarget,
    TextureWrap,
};
