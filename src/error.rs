use thiserror::Error;

use crate::framebuffer::FramebufferStatus;
use crate::shader::ShaderKind;

/// Errors raised by the wrappers.
///
/// Compile and link failures carry the info log reported by the context;
/// everything else is detected before a call reaches the context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unknown attribute type `{0}`")]
    UnknownAttributeType(String),
    #[error("unknown buffer target `{0}`")]
    UnknownTarget(String),
    #[error("unknown buffer usage `{0}`")]
    UnknownUsage(String),
    #[error("unknown index type `{0}`")]
    UnknownIndexType(String),
    #[error("unknown shader kind `{0}`")]
    UnknownShaderKind(String),
    #[error("attribute size must be between 1 and 4 components, got {0}")]
    InvalidComponentCount(i32),
    #[error("the context failed to create a {0} object")]
    ObjectCreation(&'static str),
    #[error("{kind} shader failed to compile: {log}")]
    ShaderCompile { kind: ShaderKind, log: String },
    #[error("program failed to link: {log}")]
    ProgramLink { log: String },
    #[error("framebuffer is incomplete: {0:?}")]
    IncompleteFramebuffer(FramebufferStatus),
    #[error("write of {len} bytes at offset {offset} exceeds buffer length {capacity}")]
    OutOfBounds {
        offset: usize,
        len: usize,
        capacity: usize,
    },
    #[error("index {index} shifted by {base_vertex} does not fit in the index type")]
    IndexOverflow { index: u32, base_vertex: u32 },
    #[error("draw of {count} indices from {first} exceeds {len} stored indices")]
    DrawRange {
        first: usize,
        count: usize,
        len: usize,
    },
    #[error("attribute array set is empty")]
    EmptyAttributeSet,
    #[error("texture upload failed: {0}")]
    TextureUpload(String),
    #[error("graphics context unavailable: {0}")]
    ContextUnavailable(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
