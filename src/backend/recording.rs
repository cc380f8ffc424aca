use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;

use log::trace;

use super::GlBackend;
use crate::consts;
use crate::error::{Error, Result};

/// Handle handed out by [`RecordingBackend`] for every kind of object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One call made against a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateBuffer(ObjectId),
    DeleteBuffer(ObjectId),
    BindBuffer { target: u32, buffer: Option<ObjectId> },
    BufferDataSize { target: u32, size: i32, usage: u32 },
    BufferData { target: u32, data: Vec<u8>, usage: u32 },
    BufferSubData { target: u32, offset: i32, data: Vec<u8> },
    EnableVertexAttribArray(u32),
    DisableVertexAttribArray(u32),
    VertexAttribPointer {
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    },
    DrawArrays { mode: u32, first: i32, count: i32 },
    DrawElements { mode: u32, count: i32, index_type: u32, offset: i32 },
    CreateTexture(ObjectId),
    DeleteTexture(ObjectId),
    ActiveTexture(u32),
    BindTexture { target: u32, texture: Option<ObjectId> },
    TexParameter { target: u32, pname: u32, param: i32 },
    TexImage2d {
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        data_type: u32,
        pixels: Option<Vec<u8>>,
    },
    TexSubImage2d {
        target: u32,
        level: i32,
        x_offset: i32,
        y_offset: i32,
        width: i32,
        height: i32,
        format: u32,
        data_type: u32,
        pixels: Vec<u8>,
    },
    GenerateMipmap(u32),
    PixelStore { pname: u32, param: i32 },
    CreateShader { kind: u32, shader: ObjectId },
    DeleteShader(ObjectId),
    ShaderSource { shader: ObjectId, source: String },
    CompileShader(ObjectId),
    CreateProgram(ObjectId),
    DeleteProgram(ObjectId),
    AttachShader { program: ObjectId, shader: ObjectId },
    DetachShader { program: ObjectId, shader: ObjectId },
    BindAttribLocation { program: ObjectId, index: u32, name: String },
    LinkProgram(ObjectId),
    UseProgram(Option<ObjectId>),
    GetAttribLocation { program: ObjectId, name: String },
    GetUniformLocation { program: ObjectId, name: String },
    UniformFloat { location: ObjectId, values: Vec<f32> },
    UniformInt { location: ObjectId, values: Vec<i32> },
    UniformMatrix { location: ObjectId, values: Vec<f32> },
    CreateFramebuffer(ObjectId),
    DeleteFramebuffer(ObjectId),
    BindFramebuffer { target: u32, framebuffer: Option<ObjectId> },
    FramebufferTexture2d {
        target: u32,
        attachment: u32,
        texture_target: u32,
        texture: Option<ObjectId>,
        level: i32,
    },
    FramebufferRenderbuffer {
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: Option<ObjectId>,
    },
    CheckFramebufferStatus(u32),
    CreateRenderbuffer(ObjectId),
    DeleteRenderbuffer(ObjectId),
    BindRenderbuffer { target: u32, renderbuffer: Option<ObjectId> },
    RenderbufferStorage { target: u32, internal_format: u32, width: i32, height: i32 },
    Viewport { x: i32, y: i32, width: i32, height: i32 },
    ClearColor([f32; 4]),
    Clear(u32),
    Enable(u32),
    Disable(u32),
    BlendFunc { source: u32, destination: u32 },
    DepthFunc(u32),
}

#[derive(Debug)]
struct State {
    next_id: u32,
    calls: Vec<GlCall>,
    bound_buffers: HashMap<u32, ObjectId>,
    buffer_contents: HashMap<ObjectId, Vec<u8>>,
    deleted: HashSet<ObjectId>,
    attrib_bindings: HashMap<ObjectId, HashMap<String, u32>>,
    attrib_assigned: HashMap<ObjectId, HashMap<String, u32>>,
    uniform_ids: HashMap<(ObjectId, String), ObjectId>,
    compile_failure: Option<String>,
    link_failure: Option<String>,
    hidden_uniforms: HashSet<String>,
    hidden_attributes: HashSet<String>,
    framebuffer_status: u32,
    extensions: HashSet<String>,
    context_lost: bool,
    refuse_objects: bool,
}

impl Default for State {
    fn default() -> Self {
        Self {
            next_id: 1,
            calls: Vec::new(),
            bound_buffers: HashMap::new(),
            buffer_contents: HashMap::new(),
            deleted: HashSet::new(),
            attrib_bindings: HashMap::new(),
            attrib_assigned: HashMap::new(),
            uniform_ids: HashMap::new(),
            compile_failure: None,
            link_failure: None,
            hidden_uniforms: HashSet::new(),
            hidden_attributes: HashSet::new(),
            framebuffer_status: consts::FRAMEBUFFER_COMPLETE,
            extensions: HashSet::new(),
            context_lost: false,
            refuse_objects: false,
        }
    }
}

impl State {
    fn allocate(&mut self, kind: &'static str) -> Result<ObjectId> {
        if self.refuse_objects || self.context_lost {
            return Err(Error::ObjectCreation(kind));
        }
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        Ok(id)
    }

    fn bound(&self, target: u32) -> Option<ObjectId> {
        self.bound_buffers.get(&target).copied()
    }
}

/// Headless backend that records every call instead of talking to a GPU.
///
/// Object ids are allocated sequentially starting at 1. Buffer uploads are
/// applied to an in-memory copy of the bound buffer so partial updates can
/// be inspected after the fact. Failure modes (compile, link, framebuffer
/// completeness, lost context) can be scripted through the setters.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    state: RefCell<State>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every call recorded so far.
    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    /// Returns the recorded calls and starts a fresh log.
    pub fn take_calls(&self) -> Vec<GlCall> {
        std::mem::take(&mut self.state.borrow_mut().calls)
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Current contents of a buffer as seen by the context.
    pub fn buffer_contents(&self, buffer: ObjectId) -> Option<Vec<u8>> {
        self.state.borrow().buffer_contents.get(&buffer).cloned()
    }

    pub fn bound_buffer(&self, target: u32) -> Option<ObjectId> {
        self.state.borrow().bound(target)
    }

    pub fn is_deleted(&self, object: ObjectId) -> bool {
        self.state.borrow().deleted.contains(&object)
    }

    /// Makes every subsequent compile fail with the given info log.
    pub fn set_compile_failure(&self, log: Option<&str>) {
        self.state.borrow_mut().compile_failure = log.map(str::to_string);
    }

    /// Makes every subsequent link fail with the given info log.
    pub fn set_link_failure(&self, log: Option<&str>) {
        self.state.borrow_mut().link_failure = log.map(str::to_string);
    }

    /// Treats the named uniform as optimized away.
    pub fn hide_uniform(&self, name: &str) {
        self.state.borrow_mut().hidden_uniforms.insert(name.to_string());
    }

    /// Treats the named attribute as inactive.
    pub fn hide_attribute(&self, name: &str) {
        self.state
            .borrow_mut()
            .hidden_attributes
            .insert(name.to_string());
    }

    pub fn set_framebuffer_status(&self, status: u32) {
        self.state.borrow_mut().framebuffer_status = status;
    }

    pub fn add_extension(&self, name: &str) {
        self.state.borrow_mut().extensions.insert(name.to_string());
    }

    /// Simulates a lost context: status queries report it and object
    /// creation fails.
    pub fn lose_context(&self) {
        self.state.borrow_mut().context_lost = true;
    }

    /// Makes object creation fail as if the context returned `null`.
    pub fn refuse_objects(&self, refuse: bool) {
        self.state.borrow_mut().refuse_objects = refuse;
    }

    fn record(&self, call: GlCall) {
        trace!("gl call: {call:?}");
        self.state.borrow_mut().calls.push(call);
    }

    fn create(&self, kind: &'static str, call: fn(ObjectId) -> GlCall) -> Result<ObjectId> {
        let id = self.state.borrow_mut().allocate(kind)?;
        self.record(call(id));
        Ok(id)
    }

    fn delete(&self, object: ObjectId, call: fn(ObjectId) -> GlCall) {
        self.state.borrow_mut().deleted.insert(object);
        self.record(call(object));
    }
}

impl GlBackend for RecordingBackend {
    type Buffer = ObjectId;
    type Texture = ObjectId;
    type Shader = ObjectId;
    type Program = ObjectId;
    type Framebuffer = ObjectId;
    type Renderbuffer = ObjectId;
    type UniformLocation = ObjectId;

    fn create_buffer(&self) -> Result<ObjectId> {
        self.create("buffer", GlCall::CreateBuffer)
    }

    fn delete_buffer(&self, buffer: &ObjectId) {
        {
            let mut state = self.state.borrow_mut();
            state.buffer_contents.remove(buffer);
            state.bound_buffers.retain(|_, bound| *bound != *buffer);
        }
        self.delete(*buffer, GlCall::DeleteBuffer);
    }

    fn bind_buffer(&self, target: u32, buffer: Option<&ObjectId>) {
        {
            let mut state = self.state.borrow_mut();
            match buffer {
                Some(id) => {
                    state.bound_buffers.insert(target, *id);
                }
                None => {
                    state.bound_buffers.remove(&target);
                }
            }
        }
        self.record(GlCall::BindBuffer {
            target,
            buffer: buffer.copied(),
        });
    }

    fn buffer_data_size(&self, target: u32, size: i32, usage: u32) {
        {
            let mut state = self.state.borrow_mut();
            if let Some(id) = state.bound(target) {
                state
                    .buffer_contents
                    .insert(id, vec![0; size.max(0) as usize]);
            }
        }
        self.record(GlCall::BufferDataSize {
            target,
            size,
            usage,
        });
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        {
            let mut state = self.state.borrow_mut();
            if let Some(id) = state.bound(target) {
                state.buffer_contents.insert(id, data.to_vec());
            }
        }
        self.record(GlCall::BufferData {
            target,
            data: data.to_vec(),
            usage,
        });
    }

    fn buffer_sub_data(&self, target: u32, offset: i32, data: &[u8]) {
        {
            let mut state = self.state.borrow_mut();
            if let Some(id) = state.bound(target) {
                if let Some(contents) = state.buffer_contents.get_mut(&id) {
                    let start = offset.max(0) as usize;
                    let end = start + data.len();
                    if end <= contents.len() {
                        contents[start..end].copy_from_slice(data);
                    }
                }
            }
        }
        self.record(GlCall::BufferSubData {
            target,
            offset,
            data: data.to_vec(),
        });
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(GlCall::EnableVertexAttribArray(index));
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        self.record(GlCall::DisableVertexAttribArray(index));
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
        self.record(GlCall::VertexAttribPointer {
            index,
            size,
            data_type,
            normalized,
            stride,
            offset,
        });
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        self.record(GlCall::DrawArrays { mode, first, count });
    }

    fn draw_elements(&self, mode: u32, count: i32, index_type: u32, offset: i32) {
        self.record(GlCall::DrawElements {
            mode,
            count,
            index_type,
            offset,
        });
    }

    fn create_texture(&self) -> Result<ObjectId> {
        self.create("texture", GlCall::CreateTexture)
    }

    fn delete_texture(&self, texture: &ObjectId) {
        self.delete(*texture, GlCall::DeleteTexture);
    }

    fn active_texture(&self, unit: u32) {
        self.record(GlCall::ActiveTexture(unit));
    }

    fn bind_texture(&self, target: u32, texture: Option<&ObjectId>) {
        self.record(GlCall::BindTexture {
            target,
            texture: texture.copied(),
        });
    }

    fn tex_parameter_i32(&self, target: u32, pname: u32, param: i32) {
        self.record(GlCall::TexParameter {
            target,
            pname,
            param,
        });
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
        self.record(GlCall::TexImage2d {
            target,
            level,
            internal_format,
            width,
            height,
            format,
            data_type,
            pixels: pixels.map(<[u8]>::to_vec),
        });
        Ok(())
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
        self.record(GlCall::TexSubImage2d {
            target,
            level,
            x_offset,
            y_offset,
            width,
            height,
            format,
            data_type,
            pixels: pixels.to_vec(),
        });
        Ok(())
    }

    fn generate_mipmap(&self, target: u32) {
        self.record(GlCall::GenerateMipmap(target));
    }

    fn pixel_store_i32(&self, pname: u32, param: i32) {
        self.record(GlCall::PixelStore { pname, param });
    }

    fn create_shader(&self, kind: u32) -> Result<ObjectId> {
        let shader = self.state.borrow_mut().allocate("shader")?;
        self.record(GlCall::CreateShader { kind, shader });
        Ok(shader)
    }

    fn delete_shader(&self, shader: &ObjectId) {
        self.delete(*shader, GlCall::DeleteShader);
    }

    fn shader_source(&self, shader: &ObjectId, source: &str) {
        self.record(GlCall::ShaderSource {
            shader: *shader,
            source: source.to_string(),
        });
    }

    fn compile_shader(&self, shader: &ObjectId) {
        self.record(GlCall::CompileShader(*shader));
    }

    fn shader_compile_status(&self, _shader: &ObjectId) -> bool {
        self.state.borrow().compile_failure.is_none()
    }

    fn shader_info_log(&self, _shader: &ObjectId) -> String {
        self.state
            .borrow()
            .compile_failure
            .clone()
            .unwrap_or_default()
    }

    fn create_program(&self) -> Result<ObjectId> {
        self.create("program", GlCall::CreateProgram)
    }

    fn delete_program(&self, program: &ObjectId) {
        self.delete(*program, GlCall::DeleteProgram);
    }

    fn attach_shader(&self, program: &ObjectId, shader: &ObjectId) {
        self.record(GlCall::AttachShader {
            program: *program,
            shader: *shader,
        });
    }

    fn detach_shader(&self, program: &ObjectId, shader: &ObjectId) {
        self.record(GlCall::DetachShader {
            program: *program,
            shader: *shader,
        });
    }

    fn bind_attrib_location(&self, program: &ObjectId, index: u32, name: &str) {
        self.state
            .borrow_mut()
            .attrib_bindings
            .entry(*program)
            .or_default()
            .insert(name.to_string(), index);
        self.record(GlCall::BindAttribLocation {
            program: *program,
            index,
            name: name.to_string(),
        });
    }

    fn link_program(&self, program: &ObjectId) {
        self.record(GlCall::LinkProgram(*program));
    }

    fn program_link_status(&self, _program: &ObjectId) -> bool {
        self.state.borrow().link_failure.is_none()
    }

    fn program_info_log(&self, _program: &ObjectId) -> String {
        self.state.borrow().link_failure.clone().unwrap_or_default()
    }

    fn use_program(&self, program: Option<&ObjectId>) {
        self.record(GlCall::UseProgram(program.copied()));
    }

    fn get_attrib_location(&self, program: &ObjectId, name: &str) -> i32 {
        self.record(GlCall::GetAttribLocation {
            program: *program,
            name: name.to_string(),
        });
        let mut state = self.state.borrow_mut();
        if state.hidden_attributes.contains(name) {
            return -1;
        }
        if let Some(index) = state
            .attrib_bindings
            .get(program)
            .and_then(|bindings| bindings.get(name))
        {
            return *index as i32;
        }
        let assigned = state.attrib_assigned.entry(*program).or_default();
        let next = assigned.len() as u32;
        *assigned.entry(name.to_string()).or_insert(next) as i32
    }

    fn get_uniform_location(&self, program: &ObjectId, name: &str) -> Option<ObjectId> {
        self.record(GlCall::GetUniformLocation {
            program: *program,
            name: name.to_string(),
        });
        let mut state = self.state.borrow_mut();
        if state.hidden_uniforms.contains(name) {
            return None;
        }
        let key = (*program, name.to_string());
        if let Some(id) = state.uniform_ids.get(&key) {
            return Some(*id);
        }
        let id = ObjectId(state.next_id);
        state.next_id += 1;
        state.uniform_ids.insert(key, id);
        Some(id)
    }

    fn uniform_1f(&self, location: &ObjectId, x: f32) {
        self.record(GlCall::UniformFloat {
            location: *location,
            values: vec![x],
        });
    }

    fn uniform_2f(&self, location: &ObjectId, x: f32, y: f32) {
        self.record(GlCall::UniformFloat {
            location: *location,
            values: vec![x, y],
        });
    }

    fn uniform_3f(&self, location: &ObjectId, x: f32, y: f32, z: f32) {
        self.record(GlCall::UniformFloat {
            location: *location,
            values: vec![x, y, z],
        });
    }

    fn uniform_4f(&self, location: &ObjectId, x: f32, y: f32, z: f32, w: f32) {
        self.record(GlCall::UniformFloat {
            location: *location,
            values: vec![x, y, z, w],
        });
    }

    fn uniform_1i(&self, location: &ObjectId, x: i32) {
        self.record(GlCall::UniformInt {
            location: *location,
            values: vec![x],
        });
    }

    fn uniform_2i(&self, location: &ObjectId, x: i32, y: i32) {
        self.record(GlCall::UniformInt {
            location: *location,
            values: vec![x, y],
        });
    }

    fn uniform_3i(&self, location: &ObjectId, x: i32, y: i32, z: i32) {
        self.record(GlCall::UniformInt {
            location: *location,
            values: vec![x, y, z],
        });
    }

    fn uniform_4i(&self, location: &ObjectId, x: i32, y: i32, z: i32, w: i32) {
        self.record(GlCall::UniformInt {
            location: *location,
            values: vec![x, y, z, w],
        });
    }

    fn uniform_matrix_2fv(&self, location: &ObjectId, data: &[f32]) {
        self.record(GlCall::UniformMatrix {
            location: *location,
            values: data.to_vec(),
        });
    }

    fn uniform_matrix_3fv(&self, location: &ObjectId, data: &[f32]) {
        self.record(GlCall::UniformMatrix {
            location: *location,
            values: data.to_vec(),
        });
    }

    fn uniform_matrix_4fv(&self, location: &ObjectId, data: &[f32]) {
        self.record(GlCall::UniformMatrix {
            location: *location,
            values: data.to_vec(),
        });
    }

    fn create_framebuffer(&self) -> Result<ObjectId> {
        self.create("framebuffer", GlCall::CreateFramebuffer)
    }

    fn delete_framebuffer(&self, framebuffer: &ObjectId) {
        self.delete(*framebuffer, GlCall::DeleteFramebuffer);
    }

    fn bind_framebuffer(&self, target: u32, framebuffer: Option<&ObjectId>) {
        self.record(GlCall::BindFramebuffer {
            target,
            framebuffer: framebuffer.copied(),
        });
    }

    fn framebuffer_texture_2d(
        &self,
        target: u32,
        attachment: u32,
        texture_target: u32,
        texture: Option<&ObjectId>,
        level: i32,
    ) {
        self.record(GlCall::FramebufferTexture2d {
            target,
            attachment,
            texture_target,
            texture: texture.copied(),
            level,
        });
    }

    fn framebuffer_renderbuffer(
        &self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: Option<&ObjectId>,
    ) {
        self.record(GlCall::FramebufferRenderbuffer {
            target,
            attachment,
            renderbuffer_target,
            renderbuffer: renderbuffer.copied(),
        });
    }

    fn check_framebuffer_status(&self, target: u32) -> u32 {
        self.record(GlCall::CheckFramebufferStatus(target));
        self.state.borrow().framebuffer_status
    }

    fn create_renderbuffer(&self) -> Result<ObjectId> {
        self.create("renderbuffer", GlCall::CreateRenderbuffer)
    }

    fn delete_renderbuffer(&self, renderbuffer: &ObjectId) {
        self.delete(*renderbuffer, GlCall::DeleteRenderbuffer);
    }

    fn bind_renderbuffer(&self, target: u32, renderbuffer: Option<&ObjectId>) {
        self.record(GlCall::BindRenderbuffer {
            target,
            renderbuffer: renderbuffer.copied(),
        });
    }

    fn renderbuffer_storage(&self, target: u32, internal_format: u32, width: i32, height: i32) {
        self.record(GlCall::RenderbufferStorage {
            target,
            internal_format,
            width,
            height,
        });
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GlCall::Viewport {
            x,
            y,
            width,
            height,
        });
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(GlCall::ClearColor([r, g, b, a]));
    }

    fn clear(&self, mask: u32) {
        self.record(GlCall::Clear(mask));
    }

    fn enable(&self, capability: u32) {
        self.record(GlCall::Enable(capability));
    }

    fn disable(&self, capability: u32) {
        self.record(GlCall::Disable(capability));
    }

    fn blend_func(&self, source: u32, destination: u32) {
        self.record(GlCall::BlendFunc {
            source,
            destination,
        });
    }

    fn depth_func(&self, func: u32) {
        self.record(GlCall::DepthFunc(func));
    }

    fn supports_extension(&self, name: &str) -> bool {
        self.state.borrow().extensions.contains(name)
    }

    fn is_context_lost(&self) -> bool {
        self.state.borrow().context_lost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_sequential_ids() {
        let gl = RecordingBackend::new();
        assert_eq!(gl.create_buffer().unwrap(), ObjectId(1));
        assert_eq!(gl.create_texture().unwrap(), ObjectId(2));
        assert_eq!(
            gl.calls(),
            vec![
                GlCall::CreateBuffer(ObjectId(1)),
                GlCall::CreateTexture(ObjectId(2))
            ]
        );
    }

    #[test]
    fn sub_data_patches_bound_buffer() {
        let gl = RecordingBackend::new();
        let buffer = gl.create_buffer().unwrap();
        gl.bind_buffer(consts::ARRAY_BUFFER, Some(&buffer));
        gl.buffer_data(consts::ARRAY_BUFFER, &[1, 2, 3, 4], consts::STATIC_DRAW);
        gl.buffer_sub_data(consts::ARRAY_BUFFER, 2, &[9, 9]);
        assert_eq!(gl.buffer_contents(buffer), Some(vec![1, 2, 9, 9]));
    }

    #[test]
    fn lost_context_refuses_new_objects() {
        let gl = RecordingBackend::new();
        gl.lose_context();
        assert!(gl.is_context_lost());
        assert_eq!(gl.create_program(), Err(Error::ObjectCreation("program")));
    }

    #[test]
    fn attribute_locations_honor_bindings() {
        let gl = RecordingBackend::new();
        let program = gl.create_program().unwrap();
        gl.bind_attrib_location(&program, 5, "position");
        gl.hide_attribute("unused");
        assert_eq!(gl.get_attrib_location(&program, "position"), 5);
        assert_eq!(gl.get_attrib_location(&program, "normal"), 0);
        assert_eq!(gl.get_attrib_location(&program, "unused"), -1);
    }
}
