//! Small `f32` vector and matrix value types.
//!
//! The types are `#[repr(C)]` and `Pod`, so they can be uploaded to buffers
//! or uniforms directly, and convert to and from their `glam` counterparts.
//! Matrices are stored column-major, matching what uniform uploads expect.

mod matrix;
mod vector;

pub use matrix::{Matrix2, Matrix3, Matrix4};
pub use vector::{Vector2, Vector3, Vector4};
