use std::fmt;
use std::str::FromStr;

use bytemuck::Pod;

use crate::backend::GlBackend;
use crate::buffer::{Buffer, BufferTarget};
use crate::consts;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::primitive::DrawMode;

/// Component type of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Float,
}

impl AttributeType {
    pub fn gl(self) -> u32 {
        match self {
            AttributeType::Byte => consts::BYTE,
            AttributeType::UnsignedByte => consts::UNSIGNED_BYTE,
            AttributeType::Short => consts::SHORT,
            AttributeType::UnsignedShort => consts::UNSIGNED_SHORT,
            AttributeType::Float => consts::FLOAT,
        }
    }

    pub fn byte_size(self) -> usize {
        match self {
            AttributeType::Byte | AttributeType::UnsignedByte => 1,
            AttributeType::Short | AttributeType::UnsignedShort => 2,
            AttributeType::Float => 4,
        }
    }
}

impl FromStr for AttributeType {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "byte" => Ok(AttributeType::Byte),
            "ubyte" | "unsigned_byte" => Ok(AttributeType::UnsignedByte),
            "short" => Ok(AttributeType::Short),
            "ushort" | "unsigned_short" => Ok(AttributeType::UnsignedShort),
            "float" => Ok(AttributeType::Float),
            other => Err(Error::UnknownAttributeType(other.to_string())),
        }
    }
}

/// How one attribute is laid out in its buffer.
///
/// `stride` and `offset` count elements of `ty`, not bytes. A zero stride
/// means tightly packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeLayout {
    size: i32,
    ty: AttributeType,
    normalized: bool,
    stride: usize,
    offset: usize,
}

impl AttributeLayout {
    pub fn new(size: i32, ty: AttributeType) -> Result<Self> {
        if !(1..=4).contains(&size) {
            return Err(Error::InvalidComponentCount(size));
        }
        Ok(Self {
            size,
            ty,
            normalized: false,
            stride: 0,
            offset: 0,
        })
    }

    /// `size` float components, tightly packed.
    pub fn floats(size: i32) -> Result<Self> {
        Self::new(size, AttributeType::Float)
    }

    pub fn normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    pub fn stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn ty(&self) -> AttributeType {
        self.ty
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    pub fn stride_bytes(&self) -> usize {
        self.stride * self.ty.byte_size()
    }

    pub fn offset_bytes(&self) -> usize {
        self.offset * self.ty.byte_size()
    }

    /// Vertices available in `byte_len` bytes of storage.
    pub fn vertex_count(&self, byte_len: usize) -> usize {
        let elements = byte_len / self.ty.byte_size();
        let size = self.size as usize;
        let step = if self.stride == 0 { size } else { self.stride };
        if elements < self.offset + size {
            return 0;
        }
        (elements - self.offset - size) / step + 1
    }
}

/// A buffer bound to a numbered vertex attribute slot.
pub struct AttributeArray<B: GlBackend> {
    buffer: Buffer<B>,
    location: u32,
    layout: AttributeLayout,
}

impl<B: GlBackend> Clone for AttributeArray<B> {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            location: self.location,
            layout: self.layout,
        }
    }
}

impl<B: GlBackend> fmt::Debug for AttributeArray<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeArray")
            .field("buffer", &self.buffer)
            .field("location", &self.location)
            .field("layout", &self.layout)
            .finish()
    }
}

impl<B: GlBackend> AttributeArray<B> {
    pub fn new(buffer: Buffer<B>, location: u32, layout: AttributeLayout) -> Self {
        Self {
            buffer,
            location,
            layout,
        }
    }

    /// Uploads `data` into a new static array buffer and wraps it.
    pub fn with_data<T: Pod>(
        ctx: &Context<B>,
        location: u32,
        layout: AttributeLayout,
        data: &[T],
    ) -> Result<Self> {
        let buffer = Buffer::new_static(ctx, BufferTarget::Array)?;
        buffer.data(data);
        Ok(Self::new(buffer, location, layout))
    }

    /// Splits one interleaved buffer into arrays, one per `(location, size)`
    /// entry, in the order the components appear in each vertex.
    pub fn interleaved(
        buffer: &Buffer<B>,
        ty: AttributeType,
        components: &[(u32, i32)],
    ) -> Result<Vec<Self>> {
        let layouts = components
            .iter()
            .map(|&(location, size)| Ok((location, AttributeLayout::new(size, ty)?)))
            .collect::<Result<Vec<_>>>()?;
        let stride: usize = layouts.iter().map(|(_, layout)| layout.size() as usize).sum();
        let mut offset = 0;
        let mut arrays = Vec::with_capacity(layouts.len());
        for (location, layout) in layouts {
            let step = layout.size() as usize;
            let layout = layout.stride(stride).offset(offset);
            arrays.push(Self::new(buffer.clone(), location, layout));
            offset += step;
        }
        Ok(arrays)
    }

    pub fn buffer(&self) -> &Buffer<B> {
        &self.buffer
    }

    pub fn location(&self) -> u32 {
        self.location
    }

    pub fn layout(&self) -> &AttributeLayout {
        &self.layout
    }

    pub fn enable(&self) {
        self.buffer.gl_ref().enable_vertex_attrib_array(self.location);
    }

    pub fn disable(&self) {
        self.buffer.gl_ref().disable_vertex_attrib_array(self.location);
    }

    /// Binds the buffer and points the slot at it, converting stride and
    /// offset from elements to bytes.
    pub fn pointer(&self) {
        self.buffer.bind();
        self.buffer.gl_ref().vertex_attrib_pointer(
            self.location,
            self.layout.size,
            self.layout.ty.gl(),
            self.layout.normalized,
            self.layout.stride_bytes() as i32,
            self.layout.offset_bytes() as i32,
        );
    }

    /// Vertices currently stored in the buffer for this layout.
    pub fn count(&self) -> usize {
        self.layout.vertex_count(self.buffer.byte_len())
    }

    /// Points, enables and draws. `count` defaults to every vertex from
    /// `first` on.
    pub fn draw(&self, mode: DrawMode, first: usize, count: Option<usize>) {
        let count = count.unwrap_or_else(|| self.count().saturating_sub(first));
        self.pointer();
        self.enable();
        self.buffer
            .gl_ref()
            .draw_arrays(mode.gl(), first as i32, count as i32);
    }
}

/// Attribute arrays that are enabled, pointed and drawn together.
pub struct AttributeArrays<B: GlBackend> {
    arrays: Vec<AttributeArray<B>>,
}

impl<B: GlBackend> Default for AttributeArrays<B> {
    fn default() -> Self {
        Self { arrays: Vec::new() }
    }
}

impl<B: GlBackend> fmt::Debug for AttributeArrays<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.arrays).finish()
    }
}

impl<B: GlBackend> FromIterator<AttributeArray<B>> for AttributeArrays<B> {
    fn from_iter<I: IntoIterator<Item = AttributeArray<B>>>(iter: I) -> Self {
        Self {
            arrays: iter.into_iter().collect(),
        }
    }
}

impl<B: GlBackend> AttributeArrays<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, array: AttributeArray<B>) {
        self.arrays.push(array);
    }

    pub fn with(mut self, array: AttributeArray<B>) -> Self {
        self.push(array);
        self
    }

    pub fn get(&self, location: u32) -> Option<&AttributeArray<B>> {
        self.arrays.iter().find(|array| array.location == location)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeArray<B>> {
        self.arrays.iter()
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    pub fn enable(&self) {
        self.arrays.iter().for_each(AttributeArray::enable);
    }

    pub fn disable(&self) {
        self.arrays.iter().for_each(AttributeArray::disable);
    }

    pub fn pointer(&self) {
        self.arrays.iter().for_each(AttributeArray::pointer);
    }

    /// Smallest vertex count among the members.
    pub fn count(&self) -> usize {
        self.arrays
            .iter()
            .map(AttributeArray::count)
            .min()
            .unwrap_or(0)
    }

    /// Points and enables every member, then issues one draw. `count`
    /// defaults to the shortest member's vertices from `first` on.
    pub fn draw(&self, mode: DrawMode, first: usize, count: Option<usize>) -> Result<()> {
        let Some(head) = self.arrays.first() else {
            return Err(Error::EmptyAttributeSet);
        };
        let count = count.unwrap_or_else(|| self.count().saturating_sub(first));
        self.pointer();
        self.enable();
        head.buffer
            .gl_ref()
            .draw_arrays(mode.gl(), first as i32, count as i32);
        Ok(())
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
    fn parses_type_names() {
        assert_eq!("float".parse::<AttributeType>(), Ok(AttributeType::Float));
        assert_eq!(
            "unsigned_short".parse::<AttributeType>(),
            Ok(AttributeType::UnsignedShort)
        );
        assert_eq!(
            "double".parse::<AttributeType>(),
            Err(Error::UnknownAttributeType("double".into()))
        );
    }

    #[test]
    fn rejects_bad_component_counts() {
        assert_eq!(
            AttributeLayout::floats(5),
            Err(Error::InvalidComponentCount(5))
        );
        assert_eq!(
            AttributeLayout::floats(0),
            Err(Error::InvalidComponentCount(0))
        );
    }

    #[test]
    fn pointer_scales_stride_and_offset_by_type_size() {
        let ctx = ctx();
        let layout = AttributeLayout::new(2, AttributeType::Short)
            .unwrap()
            .normalized(true)
            .stride(6)
            .offset(4);
        let array = ctx.attribute_array(3, layout, &[0i16; 12]).unwrap();
        ctx.gl().clear_calls();
        array.pointer();
        assert_eq!(
            ctx.gl().calls(),
            vec![
                GlCall::BindBuffer {
                    target: consts::ARRAY_BUFFER,
                    buffer: Some(ObjectId(1))
                },
                GlCall::VertexAttribPointer {
                    index: 3,
                    size: 2,
                    data_type: consts::SHORT,
                    normalized: true,
                    stride: 12,
                    offset: 8,
                },
            ]
        );
    }

    #[test]
    fn count_respects_stride_and_offset() {
        let packed = AttributeLayout::floats(3).unwrap();
        assert_eq!(packed.vertex_count(9 * 4), 3);
        let strided = AttributeLayout::floats(2).unwrap().stride(5).offset(3);
        assert_eq!(strided.vertex_count(10 * 4), 2);
        assert_eq!(strided.vertex_count(4 * 4), 0);
    }

    #[test]
    fn draw_defaults_count_to_remaining_vertices() {
        let ctx = ctx();
        let layout = AttributeLayout::floats(2).unwrap();
        let array = ctx.attribute_array(0, layout, &[0.0f32; 8]).unwrap();
        ctx.gl().clear_calls();
        array.draw(DrawMode::TriangleStrip, 1, None);
        let calls = ctx.gl().calls();
        assert_eq!(calls[2], GlCall::EnableVertexAttribArray(0));
        assert_eq!(
            calls[3],
            GlCall::DrawArrays {
                mode: consts::TRIANGLE_STRIP,
                first: 1,
                count: 3
            }
        );
    }

    #[test]
    fn interleaved_arrays_share_one_buffer() {
        let ctx = ctx();
        let buffer = ctx.array_buffer(&[0.0f32; 5 * 4]).unwrap();
        let arrays =
            AttributeArray::interleaved(&buffer, AttributeType::Float, &[(0, 3), (1, 2)]).unwrap();
        assert_eq!(arrays[0].layout().stride_bytes(), 20);
        assert_eq!(arrays[1].layout().offset_bytes(), 12);
        assert_eq!(arrays[0].count(), 4);
        assert_eq!(arrays[1].count(), 4);
        assert_eq!(arrays[1].buffer().handle(), buffer.handle());
    }

    #[test]
    fn interleaved_rejects_bad_sizes_before_summing_the_stride() {
        let ctx = ctx();
        let buffer = ctx.array_buffer(&[0.0f32; 8]).unwrap();
        let err = AttributeArray::interleaved(&buffer, AttributeType::Float, &[(0, -1), (1, 3)])
            .unwrap_err();
        assert_eq!(err, Error::InvalidComponentCount(-1));
    }

    #[test]
    fn set_draws_with_shortest_member() {
        let ctx = ctx();
        let positions = ctx
            .attribute_array(0, AttributeLayout::floats(3).unwrap(), &[0.0f32; 18])
            .unwrap();
        let colors = ctx
            .attribute_array(1, AttributeLayout::floats(4).unwrap(), &[0.0f32; 16])
            .unwrap();
        let set = ctx.attribute_arrays().with(positions).with(colors);
        assert_eq!(set.count(), 4);
        assert!(set.get(1).is_some());
        ctx.gl().clear_calls();
        set.draw(DrawMode::Triangles, 0, None).unwrap();
        let calls = ctx.gl().calls();
        let enabled: Vec<_> = calls
            .iter()
            .filter(|call| matches!(call, GlCall::EnableVertexAttribArray(_)))
            .collect();
        assert_eq!(enabled.len(), 2);
        assert_eq!(
            calls.last(),
            Some(&GlCall::DrawArrays {
                mode: consts::TRIANGLES,
                first: 0,
                count: 4
            })
        );
        set.disable();
        assert_eq!(
            ctx.gl().calls().last(),
            Some(&GlCall::DisableVertexAttribArray(1))
        );
    }

    #[test]
    fn empty_set_refuses_to_draw() {
        let set: AttributeArrays<RecordingBackend> = AttributeArrays::new();
        assert_eq!(
            set.draw(DrawMode::Points, 0, None),
            Err(Error::EmptyAttributeSet)
        );
    }
}
