#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGlBuffer, WebGlContextAttributes, WebGlFramebuffer, WebGlProgram,
    WebGlRenderbuffer, WebGlRenderingContext, WebGlShader, WebGlTexture, WebGlUniformLocation,
};

use super::GlBackend;
use crate::config::ContextOptions;
use crate::consts;
use crate::context::GlSurface;
use crate::error::{Error, Result};

impl GlSurface for HtmlCanvasElement {
    type Backend = WebGlRenderingContext;

    /// Requests a `webgl` context, falling back to `experimental-webgl`.
    fn acquire(&self, options: &ContextOptions) -> Result<WebGlRenderingContext> {
        let attributes = context_attributes(options);
        for name in ["webgl", "experimental-webgl"] {
            let context = self
                .get_context_with_context_options(name, &attributes)
                .map_err(|err| Error::ContextUnavailable(format!("{err:?}")))?;
            if let Some(context) = context {
                return context
                    .dyn_into::<WebGlRenderingContext>()
                    .map_err(|_| Error::ContextUnavailable("failed to cast canvas context".into()));
            }
        }
        Err(Error::ContextUnavailable(
            "canvas does not support a webgl context".into(),
        ))
    }

    fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

fn context_attributes(options: &ContextOptions) -> WebGlContextAttributes {
    let attributes = WebGlContextAttributes::new();
    attributes.set_alpha(options.alpha);
    attributes.set_depth(options.depth);
    attributes.set_stencil(options.stencil);
    attributes.set_antialias(options.antialias);
    attributes.set_premultiplied_alpha(options.premultiplied_alpha);
    attributes.set_preserve_drawing_buffer(options.preserve_drawing_buffer);
    attributes
}

/// Looks up a canvas element by id in the current document.
pub fn canvas_by_id(id: &str) -> Result<HtmlCanvasElement> {
    let window = web_sys::window().ok_or_else(|| Error::ContextUnavailable("missing window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| Error::ContextUnavailable("missing document".into()))?;
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| Error::ContextUnavailable(format!("canvas element `{id}` not found")))?;
    element
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| Error::ContextUnavailable(format!("element `{id}` is not a canvas")))
}

impl GlBackend for WebGlRenderingContext {
    type Buffer = WebGlBuffer;
    type Texture = WebGlTexture;
    type Shader = WebGlShader;
    type Program = WebGlProgram;
    type Framebuffer = WebGlFramebuffer;
    type Renderbuffer = WebGlRenderbuffer;
    type UniformLocation = WebGlUniformLocation;

    fn create_buffer(&self) -> Result<WebGlBuffer> {
        WebGlRenderingContext::create_buffer(self).ok_or(Error::ObjectCreation("buffer"))
    }

    fn delete_buffer(&self, buffer: &WebGlBuffer) {
        WebGlRenderingContext::delete_buffer(self, Some(buffer));
    }

    fn bind_buffer(&self, target: u32, buffer: Option<&WebGlBuffer>) {
        WebGlRenderingContext::bind_buffer(self, target, buffer);
    }

    fn buffer_data_size(&self, target: u32, size: i32, usage: u32) {
        self.buffer_data_with_i32(target, size, usage);
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        self.buffer_data_with_u8_array(target, data, usage);
    }

    fn buffer_sub_data(&self, target: u32, offset: i32, data: &[u8]) {
        self.buffer_sub_data_with_i32_and_u8_array(target, offset, data);
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        WebGlRenderingContext::enable_vertex_attrib_array(self, index);
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        WebGlRenderingContext::disable_vertex_attrib_array(self, index);
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.vertex_attrib_pointer_with_i32(index, size, data_type, normalized, stride, offset);
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        WebGlRenderingContext::draw_arrays(self, mode, first, count);
    }

    fn draw_elements(&self, mode: u32, count: i32, index_type: u32, offset: i32) {
        self.draw_elements_with_i32(mode, count, index_type, offset);
    }

    fn create_texture(&self) -> Result<WebGlTexture> {
        WebGlRenderingContext::create_texture(self).ok_or(Error::ObjectCreation("texture"))
    }

    fn delete_texture(&self, texture: &WebGlTexture) {
        WebGlRenderingContext::delete_texture(self, Some(texture));
    }

    fn active_texture(&self, unit: u32) {
        WebGlRenderingContext::active_texture(self, unit);
    }

    fn bind_texture(&self, target: u32, texture: Option<&WebGlTexture>) {
        WebGlRenderingContext::bind_texture(self, target, texture);
    }

    fn tex_parameter_i32(&self, target: u32, pname: u32, param: i32) {
        self.tex_parameteri(target, pname, param);
    }

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
    ) -> Result<()> {
        self.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            target,
            level,
            internal_format,
            width,
            height,
            0,
            format,
            data_type,
            pixels,
        )
        .map_err(|err| Error::TextureUpload(format!("{err:?}")))
    }

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
    ) -> Result<()> {
        self.tex_sub_image_2d_with_i32_and_i32_and_u32_and_type_and_opt_u8_array(
            target,
            level,
            x_offset,
            y_offset,
            width,
            height,
            format,
            data_type,
            Some(pixels),
        )
        .map_err(|err| Error::TextureUpload(format!("{err:?}")))
    }

    fn generate_mipmap(&self, target: u32) {
        WebGlRenderingContext::generate_mipmap(self, target);
    }

    fn pixel_store_i32(&self, pname: u32, param: i32) {
        self.pixel_storei(pname, param);
    }

    fn create_shader(&self, kind: u32) -> Result<WebGlShader> {
        WebGlRenderingContext::create_shader(self, kind).ok_or(Error::ObjectCreation("shader"))
    }

    fn delete_shader(&self, shader: &WebGlShader) {
        WebGlRenderingContext::delete_shader(self, Some(shader));
    }

    fn shader_source(&self, shader: &WebGlShader, source: &str) {
        WebGlRenderingContext::shader_source(self, shader, source);
    }

    fn compile_shader(&self, shader: &WebGlShader) {
        WebGlRenderingContext::compile_shader(self, shader);
    }

    fn shader_compile_status(&self, shader: &WebGlShader) -> bool {
        self.get_shader_parameter(shader, consts::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: &WebGlShader) -> String {
        self.get_shader_info_log(shader).unwrap_or_default()
    }

    fn create_program(&self) -> Result<WebGlProgram> {
        WebGlRenderingContext::create_program(self).ok_or(Error::ObjectCreation("program"))
    }

    fn delete_program(&self, program: &WebGlProgram) {
        WebGlRenderingContext::delete_program(self, Some(program));
    }

    fn attach_shader(&self, program: &WebGlProgram, shader: &WebGlShader) {
        WebGlRenderingContext::attach_shader(self, program, shader);
    }

    fn detach_shader(&self, program: &WebGlProgram, shader: &WebGlShader) {
        WebGlRenderingContext::detach_shader(self, program, shader);
    }

    fn bind_attrib_location(&self, program: &WebGlProgram, index: u32, name: &str) {
        WebGlRenderingContext::bind_attrib_location(self, program, index, name);
    }

    fn link_program(&self, program: &WebGlProgram) {
        WebGlRenderingContext::link_program(self, program);
    }

    fn program_link_status(&self, program: &WebGlProgram) -> bool {
        self.get_program_parameter(program, consts::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: &WebGlProgram) -> String {
        self.get_program_info_log(program).unwrap_or_default()
    }

    fn use_program(&self, program: Option<&WebGlProgram>) {
        WebGlRenderingContext::use_program(self, program);
    }

    fn get_attrib_location(&self, program: &WebGlProgram, name: &str) -> i32 {
        WebGlRenderingContext::get_attrib_location(self, program, name)
    }

    fn get_uniform_location(
        &self,
        program: &WebGlProgram,
        name: &str,
    ) -> Option<WebGlUniformLocation> {
        WebGlRenderingContext::get_uniform_location(self, program, name)
    }

    fn uniform_1f(&self, location: &WebGlUniformLocation, x: f32) {
        self.uniform1f(Some(location), x);
    }

    fn uniform_2f(&self, location: &WebGlUniformLocation, x: f32, y: f32) {
        self.uniform2f(Some(location), x, y);
    }

    fn uniform_3f(&self, location: &WebGlUniformLocation, x: f32, y: f32, z: f32) {
        self.uniform3f(Some(location), x, y, z);
    }

    fn uniform_4f(&self, location: &WebGlUniformLocation, x: f32, y: f32, z: f32, w: f32) {
        self.uniform4f(Some(location), x, y, z, w);
    }

    fn uniform_1i(&self, location: &WebGlUniformLocation, x: i32) {
        self.uniform1i(Some(location), x);
    }

    fn uniform_2i(&self, location: &WebGlUniformLocation, x: i32, y: i32) {
        self.uniform2i(Some(location), x, y);
    }

    fn uniform_3i(&self, location: &WebGlUniformLocation, x: i32, y: i32, z: i32) {
        self.uniform3i(Some(location), x, y, z);
    }

    fn uniform_4i(&self, location: &WebGlUniformLocation, x: i32, y: i32, z: i32, w: i32) {
        self.uniform4i(Some(location), x, y, z, w);
    }

    fn uniform_matrix_2fv(&self, location: &WebGlUniformLocation, data: &[f32]) {
        self.uniform_matrix2fv_with_f32_array(Some(location), false, data);
    }

    fn uniform_matrix_3fv(&self, location: &WebGlUniformLocation, data: &[f32]) {
        self.uniform_matrix3fv_with_f32_array(Some(location), false, data);
    }

    fn uniform_matrix_4fv(&self, location: &WebGlUniformLocation, data: &[f32]) {
        self.uniform_matrix4fv_with_f32_array(Some(location), false, data);
    }

    fn create_framebuffer(&self) -> Result<WebGlFramebuffer> {
        WebGlRenderingContext::create_framebuffer(self).ok_or(Error::ObjectCreation("framebuffer"))
    }

    fn delete_framebuffer(&self, framebuffer: &WebGlFramebuffer) {
        WebGlRenderingContext::delete_framebuffer(self, Some(framebuffer));
    }

    fn bind_framebuffer(&self, target: u32, framebuffer: Option<&WebGlFramebuffer>) {
        WebGlRenderingContext::bind_framebuffer(self, target, framebuffer);
    }

    fn framebuffer_texture_2d(
        &self,
        target: u32,
        attachment: u32,
        texture_target: u32,
        texture: Option<&WebGlTexture>,
        level: i32,
    ) {
        WebGlRenderingContext::framebuffer_texture_2d(
            self,
            target,
            attachment,
            texture_target,
            texture,
            level,
        );
    }

    fn framebuffer_renderbuffer(
        &self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: Option<&WebGlRenderbuffer>,
    ) {
        WebGlRenderingContext::framebuffer_renderbuffer(
            self,
            target,
            attachment,
            renderbuffer_target,
            renderbuffer,
        );
    }

    fn check_framebuffer_status(&self, target: u32) -> u32 {
        WebGlRenderingContext::check_framebuffer_status(self, target)
    }

    fn create_renderbuffer(&self) -> Result<WebGlRenderbuffer> {
        WebGlRenderingContext::create_renderbuffer(self)
            .ok_or(Error::ObjectCreation("renderbuffer"))
    }

    fn delete_renderbuffer(&self, renderbuffer: &WebGlRenderbuffer) {
        WebGlRenderingContext::delete_renderbuffer(self, Some(renderbuffer));
    }

    fn bind_renderbuffer(&self, target: u32, renderbuffer: Option<&WebGlRenderbuffer>) {
        WebGlRenderingContext::bind_renderbuffer(self, target, renderbuffer);
    }

    fn renderbuffer_storage(&self, target: u32, internal_format: u32, width: i32, height: i32) {
        WebGlRenderingContext::renderbuffer_storage(self, target, internal_format, width, height);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        WebGlRenderingContext::viewport(self, x, y, width, height);
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        WebGlRenderingContext::clear_color(self, r, g, b, a);
    }

    fn clear(&self, mask: u32) {
        WebGlRenderingContext::clear(self, mask);
    }

    fn enable(&self, capability: u32) {
        WebGlRenderingContext::enable(self, capability);
    }

    fn disable(&self, capability: u32) {
        WebGlRenderingContext::disable(self, capability);
    }

    fn blend_func(&self, source: u32, destination: u32) {
        WebGlRenderingContext::blend_func(self, source, destination);
    }

    fn depth_func(&self, func: u32) {
        WebGlRenderingContext::depth_func(self, func);
    }

    fn supports_extension(&self, name: &str) -> bool {
        matches!(self.get_extension(name), Ok(Some(_)))
    }

    fn is_context_lost(&self) -> bool {
        WebGlRenderingContext::is_context_lost(self)
    }
}
