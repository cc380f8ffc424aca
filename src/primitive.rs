use crate::consts;

/// Primitive topology for draw calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawMode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl DrawMode {
    pub fn gl(self) -> u32 {
        match self {
            DrawMode::Points => consts::POINTS,
            DrawMode::Lines => consts::LINES,
            DrawMode::LineLoop => consts::LINE_LOOP,
            DrawMode::LineStrip => consts::LINE_STRIP,
            DrawMode::Triangles => consts::TRIANGLES,
            DrawMode::TriangleStrip => consts::TRIANGLE_STRIP,
            DrawMode::TriangleFan => consts::TRIANGLE_FAN,
        }
    }
}
