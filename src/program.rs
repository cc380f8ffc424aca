use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::{debug, trace, warn};

use crate::backend::GlBackend;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::math::{Matrix2, Matrix3, Matrix4, Vector2, Vector3, Vector4};
use crate::shader::{Shader, ShaderKind};

/// A value that can be written to a uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2(Vector2),
    Vec3(Vector3),
    Vec4(Vector4),
    Int(i32),
    IVec2([i32; 2]),
    IVec3([i32; 3]),
    IVec4([i32; 4]),
    Mat2(Matrix2),
    Mat3(Matrix3),
    Mat4(Matrix4),
}

macro_rules! uniform_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for UniformValue {
                fn from(value: $ty) -> Self {
                    UniformValue::$variant(value.into())
                }
            }
        )*
    };
}

uniform_from! {
    f32 => Float,
    Vector2 => Vec2,
    Vector3 => Vec3,
    Vector4 => Vec4,
    [f32; 2] => Vec2,
    [f32; 3] => Vec3,
    [f32; 4] => Vec4,
    i32 => Int,
    [i32; 2] => IVec2,
    [i32; 3] => IVec3,
    [i32; 4] => IVec4,
    Matrix2 => Mat2,
    Matrix3 => Mat3,
    Matrix4 => Mat4,
}

impl From<bool> for UniformValue {
    fn from(value: bool) -> Self {
        UniformValue::Int(value as i32)
    }
}

/// A linked program with a per-name uniform location cache.
pub struct Program<B: GlBackend> {
    gl: Rc<B>,
    handle: B::Program,
    shaders: Option<(Shader<B>, Shader<B>)>,
    uniforms: RefCell<HashMap<String, Option<B::UniformLocation>>>,
}

impl<B: GlBackend> fmt::Debug for Program<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("handle", &self.handle)
            .field("owns_shaders", &self.shaders.is_some())
            .finish()
    }
}

impl<B: GlBackend> Program<B> {
    /// Attaches both shaders, binds each `(location, name)` attribute pair,
    /// then links. A failed link deletes the program and returns its info log.
    pub fn link(
        ctx: &Context<B>,
        vertex: &Shader<B>,
        fragment: &Shader<B>,
        bindings: &[(u32, &str)],
    ) -> Result<Self> {
        let gl = ctx.gl();
        let handle = gl.create_program()?;
        gl.attach_shader(&handle, vertex.handle());
        gl.attach_shader(&handle, fragment.handle());
        for (location, name) in bindings {
            gl.bind_attrib_location(&handle, *location, name);
        }
        gl.link_program(&handle);

        if !gl.program_link_status(&handle) {
            let log = gl.program_info_log(&handle);
            gl.delete_program(&handle);
            warn!("program failed to link: {log}");
            return Err(Error::ProgramLink { log });
        }

        debug!("linked program {handle:?}");
        Ok(Self {
            gl: ctx.shared(),
            handle,
            shaders: None,
            uniforms: RefCell::new(HashMap::new()),
        })
    }

    /// Compiles both stages and links them. The program owns the shaders and
    /// deletes them together with itself.
    pub fn from_sources(
        ctx: &Context<B>,
        vertex_source: &str,
        fragment_source: &str,
        bindings: &[(u32, &str)],
    ) -> Result<Self> {
        let vertex = Shader::compile(ctx, ShaderKind::Vertex, vertex_source)?;
        let fragment = match Shader::compile(ctx, ShaderKind::Fragment, fragment_source) {
            Ok(fragment) => fragment,
            Err(err) => {
                vertex.delete();
                return Err(err);
            }
        };
        match Self::link(ctx, &vertex, &fragment, bindings) {
            Ok(mut program) => {
                program.shaders = Some((vertex, fragment));
                Ok(program)
            }
            Err(err) => {
                vertex.delete();
                fragment.delete();
                Err(err)
            }
        }
    }

    pub fn handle(&self) -> &B::Program {
        &self.handle
    }

    pub fn info_log(&self) -> String {
        self.gl.program_info_log(&self.handle)
    }

    pub fn use_program(&self) {
        self.gl.use_program(Some(&self.handle));
    }

    /// Slot of an active attribute, `None` if the linker dropped it.
    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        u32::try_from(self.gl.get_attrib_location(&self.handle, name)).ok()
    }

    /// Location of an active uniform. Lookups are cached per name, including
    /// misses.
    pub fn uniform_location(&self, name: &str) -> Option<B::UniformLocation> {
        if let Some(cached) = self.uniforms.borrow().get(name) {
            return cached.clone();
        }
        let location = self.gl.get_uniform_location(&self.handle, name);
        self.uniforms
            .borrow_mut()
            .insert(name.to_string(), location.clone());
        location
    }

    pub fn has_uniform(&self, name: &str) -> bool {
        self.uniform_location(name).is_some()
    }

    /// Writes a uniform of the program currently in use. Inactive uniforms
    /// are ignored.
    pub fn set_uniform(&self, name: &str, value: impl Into<UniformValue>) {
        let Some(location) = self.uniform_location(name) else {
            trace!("uniform `{name}` is not active, skipping");
            return;
        };
        let gl = &self.gl;
        match value.into() {
            UniformValue::Float(x) => gl.uniform_1f(&location, x),
            UniformValue::Vec2(v) => gl.uniform_2f(&location, v.x, v.y),
            UniformValue::Vec3(v) => gl.uniform_3f(&location, v.x, v.y, v.z),
            UniformValue::Vec4(v) => gl.uniform_4f(&location, v.x, v.y, v.z, v.w),
            UniformValue::Int(x) => gl.uniform_1i(&location, x),
            UniformValue::IVec2([x, y]) => gl.uniform_2i(&location, x, y),
            UniformValue::IVec3([x, y, z]) => gl.uniform_3i(&location, x, y, z),
            UniformValue::IVec4([x, y, z, w]) => gl.uniform_4i(&location, x, y, z, w),
            UniformValue::Mat2(m) => gl.uniform_matrix_2fv(&location, m.as_slice()),
            UniformValue::Mat3(m) => gl.uniform_matrix_3fv(&location, m.as_slice()),
            UniformValue::Mat4(m) => gl.uniform_matrix_4fv(&location, m.as_slice()),
        }
    }

    /// Points a sampler uniform at a texture unit.
    pub fn set_sampler(&self, name: &str, unit: u32) {
        self.set_uniform(name, unit as i32);
    }

    /// Deletes the program, and its shaders if it owns them.
    pub fn delete(self) {
        debug!("deleting program {:?}", self.handle);
        if let Some((vertex, fragment)) = self.shaders {
            self.gl.detach_shader(&self.handle, vertex.handle());
            self.gl.detach_shader(&self.handle, fragment.handle());
            vertex.delete();
            fragment.delete();
        }
        self.gl.delete_program(&self.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{GlCall, ObjectId, RecordingBackend};

    const VS: &str = "attribute vec3 position; uniform mat4 mvp; void main() { gl_Position = mvp * vec4(position, 1.0); }";
    const FS: &str = "precision mediump float; uniform vec4 tint; void main() { gl_FragColor = tint; }";

    fn ctx() -> Context<RecordingBackend> {
        Context::new(RecordingBackend::new())
    }

    #[test]
    fn binds_attributes_before_linking() {
        let ctx = ctx();
        let vs = ctx.vertex_shader(VS).unwrap();
        let fs = ctx.fragment_shader(FS).unwrap();
        ctx.gl().clear_calls();
        let program = ctx.program(&vs, &fs, &[(2, "position")]).unwrap();
        let program_id = ObjectId(3);
        assert_eq!(program.handle(), &program_id);
        assert_eq!(
            ctx.gl().calls(),
            vec![
                GlCall::CreateProgram(program_id),
                GlCall::AttachShader {
                    program: program_id,
                    shader: ObjectId(1)
                },
                GlCall::AttachShader {
                    program: program_id,
                    shader: ObjectId(2)
                },
                GlCall::BindAttribLocation {
                    program: program_id,
                    index: 2,
                    name: "position".into()
                },
                GlCall::LinkProgram(program_id),
            ]
        );
        assert_eq!(program.attribute_location("position"), Some(2));
    }

    #[test]
    fn failed_link_deletes_program_and_owned_shaders() {
        let ctx = ctx();
        ctx.gl().set_link_failure(Some("varying `uv` not written"));
        let err = ctx.program_from_sources(VS, FS, &[]).unwrap_err();
        assert_eq!(
            err,
            Error::ProgramLink {
                log: "varying `uv` not written".into()
            }
        );
        for id in 1..=3 {
            assert!(ctx.gl().is_deleted(ObjectId(id)), "object {id} leaked");
        }
    }

    #[test]
    fn uniform_locations_are_cached() {
        let ctx = ctx();
        let program = ctx.program_from_sources(VS, FS, &[]).unwrap();
        ctx.gl().clear_calls();
        program.set_uniform("tint", Vector4::new(1.0, 0.5, 0.25, 1.0));
        program.set_uniform("tint", [0.0f32, 0.0, 0.0, 1.0]);
        let lookups = ctx
            .gl()
            .calls()
            .iter()
            .filter(|call| matches!(call, GlCall::GetUniformLocation { .. }))
            .count();
        assert_eq!(lookups, 1);
        assert!(matches!(
            ctx.gl().calls().last(),
            Some(GlCall::UniformFloat { values, .. }) if values == &vec![0.0, 0.0, 0.0, 1.0]
        ));
    }

    #[test]
    fn matrices_upload_column_major() {
        let ctx = ctx();
        let program = ctx.program_from_sources(VS, FS, &[]).unwrap();
        let mvp = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        program.set_uniform("mvp", mvp);
        assert!(matches!(
            ctx.gl().calls().last(),
            Some(GlCall::UniformMatrix { values, .. }) if values.as_slice() == mvp.as_slice()
        ));
    }

    #[test]
    fn inactive_uniforms_are_ignored() {
        let ctx = ctx();
        ctx.gl().hide_uniform("unused");
        let program = ctx.program_from_sources(VS, FS, &[]).unwrap();
        assert!(!program.has_uniform("unused"));
        ctx.gl().clear_calls();
        program.set_uniform("unused", 1.0f32);
        program.set_sampler("unused", 0);
        assert!(ctx.gl().calls().is_empty());
    }

    #[test]
    fn delete_releases_owned_shaders() {
        let ctx = ctx();
        let program = ctx.program_from_sources(VS, FS, &[]).unwrap();
        program.use_program();
        program.delete();
        for id in 1..=3 {
            assert!(ctx.gl().is_deleted(ObjectId(id)));
        }
    }
}
