use std::fmt::Debug;

use crate::error::Result;

pub mod recording;
#[cfg(target_arch = "wasm32")]
pub mod webgl;

pub use recording::{GlCall, ObjectId, RecordingBackend};

/// The graphics-context surface the wrappers forward to.
///
/// Methods mirror the WebGL 1 calls one to one. Enum arguments are raw GLenum
/// values from [`crate::consts`]; object handles are associated types so a
/// backend can hand out whatever the underlying API returns.
pub trait GlBackend {
    type Buffer: Clone + Debug;
    type Texture: Clone + Debug;
    type Shader: Clone + Debug;
    type Program: Clone + Debug;
    type Framebuffer: Clone + Debug;
    type Renderbuffer: Clone + Debug;
    type UniformLocation: Clone + Debug;

    fn create_buffer(&self) -> Result<Self::Buffer>;
    fn delete_buffer(&self, buffer: &Self::Buffer);
    fn bind_buffer(&self, target: u32, buffer: Option<&Self::Buffer>);
    fn buffer_data_size(&self, target: u32, size: i32, usage: u32);
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);
    fn buffer_sub_data(&self, target: u32, offset: i32, data: &[u8]);

    fn enable_vertex_attrib_array(&self, index: u32);
    fn disable_vertex_attrib_array(&self, index: u32);
    #[allow(clippy::too_many_arguments)]
    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    fn draw_arrays(&self, mode: u32, first: i32, count: i32);
    fn draw_elements(&self, mode: u32, count: i32, index_type: u32, offset: i32);

    fn create_texture(&self) -> Result<Self::Texture>;
    fn delete_texture(&self, texture: &Self::Texture);
    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, target: u32, texture: Option<&Self::Texture>);
    fn tex_parameter_i32(&self, target: u32, pname: u32, param: i32);
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        data_type: u32,
        pixels: Option<&[u8]>,
    ) -> Result<()>;
    #[allow(clippy::too_many_arguments)]
    fn tex_sub_image_2d(
        &self,
        target: u32,
        level: i32,
        x_offset: i32,
        y_offset: i32,
        width: i32,
        height: i32,
        format: u32,
        data_type: u32,
        pixels: &[u8],
    ) -> Result<()>;
    fn generate_mipmap(&self, target: u32);
    fn pixel_store_i32(&self, pname: u32, param: i32);

    fn create_shader(&self, kind: u32) -> Result<Self::Shader>;
    fn delete_shader(&self, shader: &Self::Shader);
    fn shader_source(&self, shader: &Self::Shader, source: &str);
    fn compile_shader(&self, shader: &Self::Shader);
    fn shader_compile_status(&self, shader: &Self::Shader) -> bool;
    fn shader_info_log(&self, shader: &Self::Shader) -> String;

    fn create_program(&self) -> Result<Self::Program>;
    fn delete_program(&self, program: &Self::Program);
    fn attach_shader(&self, program: &Self::Program, shader: &Self::Shader);
    fn detach_shader(&self, program: &Self::Program, shader: &Self::Shader);
    fn bind_attrib_location(&self, program: &Self::Program, index: u32, name: &str);
    fn link_program(&self, program: &Self::Program);
    fn program_link_status(&self, program: &Self::Program) -> bool;
    fn program_info_log(&self, program: &Self::Program) -> String;
    fn use_program(&self, program: Option<&Self::Program>);
    fn get_attrib_location(&self, program: &Self::Program, name: &str) -> i32;
    fn get_uniform_location(
        &self,
        program: &Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation>;

    fn uniform_1f(&self, location: &Self::UniformLocation, x: f32);
    fn uniform_2f(&self, location: &Self::UniformLocation, x: f32, y: f32);
    fn uniform_3f(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32);
    fn uniform_4f(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32, w: f32);
    fn uniform_1i(&self, location: &Self::UniformLocation, x: i32);
    fn uniform_2i(&self, location: &Self::UniformLocation, x: i32, y: i32);
    fn uniform_3i(&self, location: &Self::UniformLocation, x: i32, y: i32, z: i32);
    fn uniform_4i(&self, location: &Self::UniformLocation, x: i32, y: i32, z: i32, w: i32);
    fn uniform_matrix_2fv(&self, location: &Self::UniformLocation, data: &[f32]);
    fn uniform_matrix_3fv(&self, location: &Self::UniformLocation, data: &[f32]);
    fn uniform_matrix_4fv(&self, location: &Self::UniformLocation, data: &[f32]);

    fn create_framebuffer(&self) -> Result<Self::Framebuffer>;
    fn delete_framebuffer(&self, framebuffer: &Self::Framebuffer);
    fn bind_framebuffer(&self, target: u32, framebuffer: Option<&Self::Framebuffer>);
    fn framebuffer_texture_2d(
        &self,
        target: u32,
        attachment: u32,
        texture_target: u32,
        texture: Option<&Self::Texture>,
        level: i32,
    );
    fn framebuffer_renderbuffer(
        &self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: Option<&Self::Renderbuffer>,
    );
    fn check_framebuffer_status(&self, target: u32) -> u32;

    fn create_renderbuffer(&self) -> Result<Self::Renderbuffer>;
    fn delete_renderbuffer(&self, renderbuffer: &Self::Renderbuffer);
    fn bind_renderbuffer(&self, target: u32, renderbuffer: Option<&Self::Renderbuffer>);
    fn renderbuffer_storage(&self, target: u32, internal_format: u32, width: i32, height: i32);

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self, mask: u32);
    fn enable(&self, capability: u32);
    fn disable(&self, capability: u32);
    fn blend_func(&self, source: u32, destination: u32);
    fn depth_func(&self, func: u32);
    fn supports_extension(&self, name: &str) -> bool;
    fn is_context_lost(&self) -> bool;
}
