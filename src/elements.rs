use std::fmt;
use std::str::FromStr;

use log::trace;

use crate::backend::GlBackend;
use crate::buffer::{Buffer, BufferTarget, BufferUsage};
use crate::consts;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::primitive::DrawMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    UnsignedByte,
    UnsignedShort,
    /// Needs `OES_element_index_uint` on WebGL 1.
    UnsignedInt,
}

impl IndexType {
    pub fn gl(self) -> u32 {
        match self {
            IndexType::UnsignedByte => consts::UNSIGNED_BYTE,
            IndexType::UnsignedShort => consts::UNSIGNED_SHORT,
            IndexType::UnsignedInt => consts::UNSIGNED_INT,
        }
    }

    pub fn byte_size(self) -> usize {
        match self {
            IndexType::UnsignedByte => 1,
            IndexType::UnsignedShort => 2,
            IndexType::UnsignedInt => 4,
        }
    }
}

impl FromStr for IndexType {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "ubyte" | "unsigned_byte" => Ok(IndexType::UnsignedByte),
            "ushort" | "unsigned_short" => Ok(IndexType::UnsignedShort),
            "uint" | "unsigned_int" => Ok(IndexType::UnsignedInt),
            other => Err(Error::UnknownIndexType(other.to_string())),
        }
    }
}

/// CPU-side copy of an index list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indices {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl Indices {
    pub fn index_type(&self) -> IndexType {
        match self {
            Indices::U8(_) => IndexType::UnsignedByte,
            Indices::U16(_) => IndexType::UnsignedShort,
            Indices::U32(_) => IndexType::UnsignedInt,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Indices::U8(values) => values.len(),
            Indices::U16(values) => values.len(),
            Indices::U32(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Indices::U8(values) => values.as_slice(),
            Indices::U16(values) => bytemuck::cast_slice(values),
            Indices::U32(values) => bytemuck::cast_slice(values),
        }
    }

    /// Copy with `base_vertex` added to every entry. Fails if any entry
    /// would leave the range of the index type.
    pub fn shifted(&self, base_vertex: u32) -> Result<Indices> {
        fn shift<T>(values: &[T], base_vertex: u32) -> Result<Vec<T>>
        where
            T: Copy + Into<u32> + TryFrom<u32>,
        {
            values
                .iter()
                .map(|&value| {
                    let index: u32 = value.into();
                    index
                        .checked_add(base_vertex)
                        .and_then(|shifted| T::try_from(shifted).ok())
                        .ok_or(Error::IndexOverflow { index, base_vertex })
                })
                .collect()
        }

        Ok(match self {
            Indices::U8(values) => Indices::U8(shift(values, base_vertex)?),
            Indices::U16(values) => Indices::U16(shift(values, base_vertex)?),
            Indices::U32(values) => Indices::U32(shift(values, base_vertex)?),
        })
    }
}

impl From<Vec<u8>> for Indices {
    fn from(values: Vec<u8>) -> Self {
        Indices::U8(values)
    }
}

impl From<Vec<u16>> for Indices {
    fn from(values: Vec<u16>) -> Self {
        Indices::U16(values)
    }
}

impl From<Vec<u32>> for Indices {
    fn from(values: Vec<u32>) -> Self {
        Indices::U32(values)
    }
}

impl From<&[u16]> for Indices {
    fn from(values: &[u16]) -> Self {
        Indices::U16(values.to_vec())
    }
}

/// An index buffer that keeps its indices on the CPU as well.
///
/// Keeping the copy lets draws emulate a base-vertex offset, which WebGL 1
/// has no parameter for: the shifted indices are written over the buffer for
/// the duration of one draw and the originals are written back afterwards.
/// Nothing guards against a second draw on the same array in between.
pub struct ElementArray<B: GlBackend> {
    buffer: Buffer<B>,
    indices: Indices,
}

impl<B: GlBackend> fmt::Debug for ElementArray<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementArray")
            .field("buffer", &self.buffer)
            .field("index_type", &self.indices.index_type())
            .field("len", &self.indices.len())
            .finish()
    }
}

impl<B: GlBackend> ElementArray<B> {
    pub fn new(ctx: &Context<B>, indices: Indices, usage: BufferUsage) -> Result<Self> {
        let buffer = Buffer::new(ctx, BufferTarget::ElementArray, usage)?;
        buffer.data(indices.as_bytes());
        Ok(Self { buffer, indices })
    }

    pub fn buffer(&self) -> &Buffer<B> {
        &self.buffer
    }

    pub fn indices(&self) -> &Indices {
        &self.indices
    }

    pub fn bind(&self) {
        self.buffer.bind();
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn index_type(&self) -> IndexType {
        self.indices.index_type()
    }

    /// Replaces the indices and re-uploads the whole buffer.
    pub fn update(&mut self, indices: impl Into<Indices>) {
        self.indices = indices.into();
        self.buffer.data(self.indices.as_bytes());
    }

    /// Draws `count` indices starting at `first`, offsetting every index by
    /// `base_vertex`. `count` defaults to the remaining indices.
    pub fn draw(
        &self,
        mode: DrawMode,
        first: usize,
        count: Option<usize>,
        base_vertex: u32,
    ) -> Result<()> {
        let len = self.len();
        let count = count.unwrap_or_else(|| len.saturating_sub(first));
        let index_type = self.index_type();
        let out_of_range = || Error::DrawRange { first, count, len };
        if first.checked_add(count).map_or(true, |end| end > len) {
            return Err(out_of_range());
        }
        let offset = i32::try_from(first * index_type.byte_size()).map_err(|_| out_of_range())?;
        let gl_count = i32::try_from(count).map_err(|_| out_of_range())?;

        if base_vertex == 0 {
            self.buffer.bind();
            self.buffer
                .gl_ref()
                .draw_elements(mode.gl(), gl_count, index_type.gl(), offset);
            return Ok(());
        }

        trace!("drawing {count} indices with base vertex {base_vertex}");
        let shifted = self.indices.shifted(base_vertex)?;
        self.buffer.sub_data(0, shifted.as_bytes())?;
        self.buffer
            .gl_ref()
            .draw_elements(mode.gl(), gl_count, index_type.gl(), offset);
        self.buffer.sub_data(0, self.indices.as_bytes())
    }

    pub fn draw_triangles(&self, first: usize, count: Option<usize>, base_vertex: u32) -> Result<()> {
        self.draw(DrawMode::Triangles, first, count, base_vertex)
    }

    pub fn draw_triangle_fan(
        &self,
        first: usize,
        count: Option<usize>,
        base_vertex: u32,
    ) -> Result<()> {
        self.draw(DrawMode::TriangleFan, first, count, base_vertex)
    }

    pub fn draw_triangle_strip(
        &self,
        first: usize,
        count: Option<usize>,
        base_vertex: u32,
    ) -> Result<()> {
        self.draw(DrawMode::TriangleStrip, first, count, base_vertex)
    }

    pub fn delete(self) {
        self.buffer.delete();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{GlCall, ObjectId, RecordingBackend};

    fn ctx() -> Context<RecordingBackend> {
        Context::new(RecordingBackend::new())
    }

    fn u16_bytes(values: &[u16]) -> Vec<u8> {
        bytemuck::cast_slice(values).to_vec()
    }

    #[test]
    fn parses_index_type_names() {
        assert_eq!("ushort".parse::<IndexType>(), Ok(IndexType::UnsignedShort));
        assert_eq!("uint".parse::<IndexType>(), Ok(IndexType::UnsignedInt));
        assert_eq!(
            "long".parse::<IndexType>(),
            Err(Error::UnknownIndexType("long".into()))
        );
    }

    #[test]
    fn shifting_checks_the_type_range() {
        let indices = Indices::U8(vec![0, 200, 250]);
        assert_eq!(
            indices.shifted(5),
            Ok(Indices::U8(vec![5, 205, 255]))
        );
        assert_eq!(
            indices.shifted(6),
            Err(Error::IndexOverflow {
                index: 250,
                base_vertex: 6
            })
        );
        assert_eq!(
            Indices::U32(vec![u32::MAX]).shifted(1),
            Err(Error::IndexOverflow {
                index: u32::MAX,
                base_vertex: 1
            })
        );
    }

    #[test]
    fn zero_base_vertex_only_draws() {
        let ctx = ctx();
        let elements = ctx.element_array(vec![0u16, 1, 2, 2, 3, 0]).unwrap();
        ctx.gl().clear_calls();
        elements.draw_triangles(3, None, 0).unwrap();
        assert_eq!(
            ctx.gl().calls(),
            vec![
                GlCall::BindBuffer {
                    target: consts::ELEMENT_ARRAY_BUFFER,
                    buffer: Some(ObjectId(1))
                },
                GlCall::DrawElements {
                    mode: consts::TRIANGLES,
                    count: 3,
                    index_type: consts::UNSIGNED_SHORT,
                    offset: 6
                },
            ]
        );
    }

    #[test]
    fn base_vertex_uploads_shifted_copy_then_restores() {
        let ctx = ctx();
        let elements = ctx.element_array(vec![0u16, 1, 2]).unwrap();
        ctx.gl().clear_calls();
        elements.draw_triangle_fan(0, None, 4).unwrap();

        let uploads: Vec<_> = ctx
            .gl()
            .calls()
            .into_iter()
            .filter(|call| {
                matches!(
                    call,
                    GlCall::BufferSubData { .. } | GlCall::DrawElements { .. }
                )
            })
            .collect();
        assert_eq!(
            uploads,
            vec![
                GlCall::BufferSubData {
                    target: consts::ELEMENT_ARRAY_BUFFER,
                    offset: 0,
                    data: u16_bytes(&[4, 5, 6])
                },
                GlCall::DrawElements {
                    mode: consts::TRIANGLE_FAN,
                    count: 3,
                    index_type: consts::UNSIGNED_SHORT,
                    offset: 0
                },
                GlCall::BufferSubData {
                    target: consts::ELEMENT_ARRAY_BUFFER,
                    offset: 0,
                    data: u16_bytes(&[0, 1, 2])
                },
            ]
        );
        assert_eq!(
            ctx.gl().buffer_contents(ObjectId(1)),
            Some(u16_bytes(&[0, 1, 2]))
        );
    }

    #[test]
    fn overflow_uploads_nothing() {
        let ctx = ctx();
        let elements = ctx.element_array(vec![0u8, 255]).unwrap();
        ctx.gl().clear_calls();
        assert_eq!(
            elements.draw_triangle_strip(0, None, 1),
            Err(Error::IndexOverflow {
                index: 255,
                base_vertex: 1
            })
        );
        assert!(ctx.gl().calls().is_empty());
    }

    #[test]
    fn ranges_past_the_end_are_refused() {
        let ctx = ctx();
        let elements = ctx.element_array(vec![0u16, 1, 2]).unwrap();
        ctx.gl().clear_calls();
        assert_eq!(
            elements.draw_triangles(1, Some(3), 0),
            Err(Error::DrawRange {
                first: 1,
                count: 3,
                len: 3
            })
        );
        assert_eq!(
            elements.draw_triangles(usize::MAX, Some(2), 0),
            Err(Error::DrawRange {
                first: usize::MAX,
                count: 2,
                len: 3
            })
        );
        assert!(elements.draw_triangles(4, None, 0).is_err());
        assert!(ctx.gl().calls().is_empty());
    }

    #[test]
    fn update_replaces_indices() {
        let ctx = ctx();
        let mut elements = ctx.element_array(vec![0u16, 1, 2]).unwrap();
        elements.update(vec![7u32, 8, 9, 10]);
        assert_eq!(elements.len(), 4);
        assert_eq!(elements.index_type(), IndexType::UnsignedInt);
        assert_eq!(elements.buffer().byte_len(), 16);
        elements.delete();
        assert!(ctx.gl().is_deleted(ObjectId(1)));
    }
}
