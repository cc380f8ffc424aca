use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use bytemuck::Pod;
use log::debug;

use crate::backend::GlBackend;
use crate::consts;
use crate::context::Context;
use crate::error::{Error, Result};

/// Binding point of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Array,
    ElementArray,
}

impl BufferTarget {
    pub fn gl(self) -> u32 {
        match self {
            BufferTarget::Array => consts::ARRAY_BUFFER,
            BufferTarget::ElementArray => consts::ELEMENT_ARRAY_BUFFER,
        }
    }
}

impl FromStr for BufferTarget {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "array" => Ok(BufferTarget::Array),
            "element" | "element_array" => Ok(BufferTarget::ElementArray),
            other => Err(Error::UnknownTarget(other.to_string())),
        }
    }
}

/// Usage hint passed with every full upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    #[default]
    Static,
    Stream,
    Dynamic,
}

impl BufferUsage {
    pub fn gl(self) -> u32 {
        match self {
            BufferUsage::Static => consts::STATIC_DRAW,
            BufferUsage::Stream => consts::STREAM_DRAW,
            BufferUsage::Dynamic => consts::DYNAMIC_DRAW,
        }
    }
}

impl FromStr for BufferUsage {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "static" => Ok(BufferUsage::Static),
            "stream" => Ok(BufferUsage::Stream),
            "dynamic" => Ok(BufferUsage::Dynamic),
            other => Err(Error::UnknownUsage(other.to_string())),
        }
    }
}

/// A buffer object that remembers its target and usage hint.
///
/// Cloning yields another handle to the same GL buffer. Clones share the
/// byte length recorded by [`Buffer::data`] and [`Buffer::allocate`].
pub struct Buffer<B: GlBackend> {
    gl: Rc<B>,
    handle: B::Buffer,
    target: BufferTarget,
    usage: BufferUsage,
    byte_len: Rc<Cell<usize>>,
}

impl<B: GlBackend> Clone for Buffer<B> {
    fn clone(&self) -> Self {
        Self {
            gl: Rc::clone(&self.gl),
            handle: self.handle.clone(),
            target: self.target,
            usage: self.usage,
            byte_len: Rc::clone(&self.byte_len),
        }
    }
}

impl<B: GlBackend> fmt::Debug for Buffer<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("handle", &self.handle)
            .field("target", &self.target)
            .field("usage", &self.usage)
            .field("byte_len", &self.byte_len.get())
            .finish()
    }
}

impl<B: GlBackend> Buffer<B> {
    pub fn new(ctx: &Context<B>, target: BufferTarget, usage: BufferUsage) -> Result<Self> {
        let handle = ctx.gl().create_buffer()?;
        debug!("created {target:?} buffer {handle:?} ({usage:?})");
        Ok(Self {
            gl: ctx.shared(),
            handle,
            target,
            usage,
            byte_len: Rc::new(Cell::new(0)),
        })
    }

    pub fn new_static(ctx: &Context<B>, target: BufferTarget) -> Result<Self> {
        Self::new(ctx, target, BufferUsage::Static)
    }

    pub fn new_stream(ctx: &Context<B>, target: BufferTarget) -> Result<Self> {
        Self::new(ctx, target, BufferUsage::Stream)
    }

    pub fn new_dynamic(ctx: &Context<B>, target: BufferTarget) -> Result<Self> {
        Self::new(ctx, target, BufferUsage::Dynamic)
    }

    pub fn handle(&self) -> &B::Buffer {
        &self.handle
    }

    pub(crate) fn gl_ref(&self) -> &B {
        &self.gl
    }

    pub fn target(&self) -> BufferTarget {
        self.target
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Size of the last full upload, in bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len.get()
    }

    pub fn bind(&self) {
        self.gl.bind_buffer(self.target.gl(), Some(&self.handle));
    }

    pub fn unbind(&self) {
        self.gl.bind_buffer(self.target.gl(), None);
    }

    /// Binds the buffer and replaces its storage with `data`.
    pub fn data<T: Pod>(&self, data: &[T]) {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        self.bind();
        self.gl
            .buffer_data(self.target.gl(), bytes, self.usage.gl());
        self.byte_len.set(bytes.len());
    }

    /// Binds the buffer and reserves `bytes` of zeroed storage.
    pub fn allocate(&self, bytes: usize) {
        self.bind();
        self.gl
            .buffer_data_size(self.target.gl(), bytes as i32, self.usage.gl());
        self.byte_len.set(bytes);
    }

    /// Binds the buffer and overwrites part of its storage.
    pub fn sub_data<T: Pod>(&self, byte_offset: usize, data: &[T]) -> Result<()> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let capacity = self.byte_len.get();
        let end = byte_offset.checked_add(bytes.len());
        if end.map_or(true, |end| end > capacity) {
            return Err(Error::OutOfBounds {
                offset: byte_offset,
                len: bytes.len(),
                capacity,
            });
        }
        self.bind();
        self.gl
            .buffer_sub_data(self.target.gl(), byte_offset as i32, bytes);
        Ok(())
    }

    pub fn delete(self) {
        debug!("deleting buffer {:?}", self.handle);
        self.gl.delete_buffer(&self.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{GlCall, ObjectId, RecordingBackend};

    fn ctx() -> Context<RecordingBackend> {
        Context::new(RecordingBackend::new())
    }

    #[test]
    fn parses_target_and_usage_names() {
        assert_eq!("array".parse::<BufferTarget>(), Ok(BufferTarget::Array));
        assert_eq!(
            "element".parse::<BufferTarget>(),
            Ok(BufferTarget::ElementArray)
        );
        assert_eq!("dynamic".parse::<BufferUsage>(), Ok(BufferUsage::Dynamic));
        assert_eq!(
            "uniform".parse::<BufferTarget>(),
            Err(Error::UnknownTarget("uniform".into()))
        );
        assert_eq!(
            "sometimes".parse::<BufferUsage>(),
            Err(Error::UnknownUsage("sometimes".into()))
        );
    }

    #[test]
    fn data_binds_then_uploads_with_usage() {
        let ctx = ctx();
        let buffer = Buffer::new_stream(&ctx, BufferTarget::Array).unwrap();
        buffer.data(&[1.0f32, 2.0]);
        assert_eq!(buffer.byte_len(), 8);
        assert_eq!(
            ctx.gl().calls()[1..],
            [
                GlCall::BindBuffer {
                    target: consts::ARRAY_BUFFER,
                    buffer: Some(ObjectId(1))
                },
                GlCall::BufferData {
                    target: consts::ARRAY_BUFFER,
                    data: bytemuck::cast_slice(&[1.0f32, 2.0]).to_vec(),
                    usage: consts::STREAM_DRAW
                },
            ]
        );
    }

    #[test]
    fn sub_data_checks_bounds() {
        let ctx = ctx();
        let buffer = Buffer::new_dynamic(&ctx, BufferTarget::ElementArray).unwrap();
        buffer.allocate(4);
        buffer.sub_data(2, &[7u8, 8]).unwrap();
        assert_eq!(ctx.gl().buffer_contents(ObjectId(1)), Some(vec![0, 0, 7, 8]));
        assert_eq!(
            buffer.sub_data(3, &[1u8, 2]),
            Err(Error::OutOfBounds {
                offset: 3,
                len: 2,
                capacity: 4
            })
        );
        assert_eq!(
            buffer.sub_data(usize::MAX, &[1u8]),
            Err(Error::OutOfBounds {
                offset: usize::MAX,
                len: 1,
                capacity: 4
            })
        );
    }

    #[test]
    fn clones_share_length_and_delete_releases() {
        let ctx = ctx();
        let buffer = ctx.array_buffer(&[0u16; 3]).unwrap();
        let alias = buffer.clone();
        buffer.data(&[0u16; 5]);
        assert_eq!(alias.byte_len(), 10);
        alias.delete();
        assert!(ctx.gl().is_deleted(ObjectId(1)));
    }
}
