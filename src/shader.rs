use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use log::{debug, warn};

use crate::backend::GlBackend;
use crate::consts;
use crate::context::Context;
use crate::error::{Error, Result};

/// Pipeline stage a shader is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl ShaderKind {
    pub fn gl(self) -> u32 {
        match self {
            ShaderKind::Vertex => consts::VERTEX_SHADER,
            ShaderKind::Fragment => consts::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderKind::Vertex => f.write_str("vertex"),
            ShaderKind::Fragment => f.write_str("fragment"),
        }
    }
}

impl FromStr for ShaderKind {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "vertex" => Ok(ShaderKind::Vertex),
            "fragment" => Ok(ShaderKind::Fragment),
            other => Err(Error::UnknownShaderKind(other.to_string())),
        }
    }
}

/// A successfully compiled shader object.
pub struct Shader<B: GlBackend> {
    gl: Rc<B>,
    handle: B::Shader,
    kind: ShaderKind,
}

impl<B: GlBackend> fmt::Debug for Shader<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shader")
            .field("handle", &self.handle)
            .field("kind", &self.kind)
            .finish()
    }
}

impl<B: GlBackend> Shader<B> {
    /// Creates, sources and compiles a shader. On a failed compile the
    /// shader is deleted and the info log is returned in the error.
    pub fn compile(ctx: &Context<B>, kind: ShaderKind, source: &str) -> Result<Self> {
        let gl = ctx.gl();
        let handle = gl.create_shader(kind.gl())?;
        gl.shader_source(&handle, source);
        gl.compile_shader(&handle);

        if !gl.shader_compile_status(&handle) {
            let log = gl.shader_info_log(&handle);
            gl.delete_shader(&handle);
            warn!("{kind} shader failed to compile: {log}");
            return Err(Error::ShaderCompile { kind, log });
        }

        debug!("compiled {kind} shader {handle:?}");
        Ok(Self {
            gl: ctx.shared(),
            handle,
            kind,
        })
    }

    pub fn handle(&self) -> &B::Shader {
        &self.handle
    }

    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    /// Compiler output; usually empty or warnings only.
    pub fn info_log(&self) -> String {
        self.gl.shader_info_log(&self.handle)
    }

    pub fn delete(self) {
        debug!("deleting {} shader {:?}", self.kind, self.handle);
        self.gl.delete_shader(&self.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{GlCall, ObjectId, RecordingBackend};

    const VERTEX: &str = "attribute vec2 position;\nvoid main() { gl_Position = vec4(position, 0.0, 1.0); }";

    #[test]
    fn parses_kind_names() {
        assert_eq!("vertex".parse::<ShaderKind>(), Ok(ShaderKind::Vertex));
        assert_eq!("fragment".parse::<ShaderKind>(), Ok(ShaderKind::Fragment));
        assert_eq!(
            "geometry".parse::<ShaderKind>(),
            Err(Error::UnknownShaderKind("geometry".into()))
        );
    }

    #[test]
    fn compile_sources_then_compiles() {
        let ctx = Context::new(RecordingBackend::new());
        let shader = ctx.vertex_shader(VERTEX).unwrap();
        assert_eq!(shader.kind(), ShaderKind::Vertex);
        assert_eq!(
            ctx.gl().calls(),
            vec![
                GlCall::CreateShader {
                    kind: consts::VERTEX_SHADER,
                    shader: ObjectId(1)
                },
                GlCall::ShaderSource {
                    shader: ObjectId(1),
                    source: VERTEX.to_string()
                },
                GlCall::CompileShader(ObjectId(1)),
            ]
        );
    }

    #[test]
    fn failed_compile_deletes_and_reports_log() {
        let ctx = Context::new(RecordingBackend::new());
        ctx.gl()
            .set_compile_failure(Some("ERROR: 0:1: 'vec5' : undeclared identifier"));
        let err = ctx.fragment_shader("void main() { vec5 x; }").unwrap_err();
        assert_eq!(
            err,
            Error::ShaderCompile {
                kind: ShaderKind::Fragment,
                log: "ERROR: 0:1: 'vec5' : undeclared identifier".into()
            }
        );
        assert!(err.to_string().contains("fragment"));
        assert!(ctx.gl().is_deleted(ObjectId(1)));
    }
}
