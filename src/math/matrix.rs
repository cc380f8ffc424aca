use std::ops::{Add, Mul, MulAssign, Sub};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::vector::{Vector2, Vector3, Vector4};

/// 2x2 column-major matrix.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Matrix2 {
    pub cols: [[f32; 2]; 2],
}

/// 3x3 column-major matrix.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Matrix3 {
    pub cols: [[f32; 3]; 3],
}

/// 4x4 column-major matrix.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Matrix4 {
    pub cols: [[f32; 4]; 4],
}

macro_rules! impl_matrix {
    ($name:ident, $vector:ident, $glam:ty, $n:expr) => {
        impl $name {
            pub const ZERO: Self = Self {
                cols: [[0.0; $n]; $n],
            };
            pub const IDENTITY: Self = {
                let mut cols = [[0.0; $n]; $n];
                let mut i = 0;
                while i < $n {
                    cols[i][i] = 1.0;
                    i += 1;
                }
                Self { cols }
            };

            pub const fn from_cols_array_2d(cols: [[f32; $n]; $n]) -> Self {
                Self { cols }
            }

            pub fn from_cols(cols: [$vector; $n]) -> Self {
                let mut out = Self::ZERO;
                for (dst, src) in out.cols.iter_mut().zip(cols) {
                    *dst = src.to_array();
                }
                out
            }

            pub fn col(&self, index: usize) -> $vector {
                $vector::from(self.cols[index])
            }

            pub fn row(&self, index: usize) -> $vector {
                let mut row = [0.0; $n];
                for (c, value) in row.iter_mut().enumerate() {
                    *value = self.cols[c][index];
                }
                $vector::from(row)
            }

            pub fn transpose(&self) -> Self {
                let mut out = Self::ZERO;
                for c in 0..$n {
                    for r in 0..$n {
                        out.cols[c][r] = self.cols[r][c];
                    }
                }
                out
            }

            pub fn determinant(&self) -> f32 {
                <$glam>::from(*self).determinant()
            }

            /// Inverse matrix, or `None` when the matrix is singular.
            pub fn inverse(&self) -> Option<Self> {
                let matrix = <$glam>::from(*self);
                if matrix.determinant() == 0.0 {
                    return None;
                }
                let inverse = matrix.inverse();
                inverse.is_finite().then(|| inverse.into())
            }

            /// Column-major elements, as uniform uploads expect them.
            pub fn as_slice(&self) -> &[f32] {
                bytemuck::cast_slice(&self.cols)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::IDENTITY
            }
        }

        impl Mul for $name {
            type Output = Self;
            fn mul(self, rhs: Self) -> Self {
                let mut out = Self::ZERO;
                for c in 0..$n {
                    for r in 0..$n {
                        out.cols[c][r] = (0..$n).map(|k| self.cols[k][r] * rhs.cols[c][k]).sum();
                    }
                }
                out
            }
        }

        impl MulAssign for $name {
            fn mul_assign(&mut self, rhs: Self) {
                *self = *self * rhs;
            }
        }

        impl Mul<$vector> for $name {
            type Output = $vector;
            fn mul(self, rhs: $vector) -> $vector {
                let mut out = $vector::ZERO;
                for c in 0..$n {
                    for r in 0..$n {
                        out[r] += self.cols[c][r] * rhs[c];
                    }
                }
                out
            }
        }

        impl Mul<f32> for $name {
            type Output = Self;
            fn mul(mut self, rhs: f32) -> Self {
                for value in self.cols.iter_mut().flatten() {
                    *value *= rhs;
                }
                self
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(mut self, rhs: Self) -> Self {
                for (a, b) in self.cols.iter_mut().flatten().zip(rhs.cols.iter().flatten()) {
                    *a += b;
                }
                self
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(mut self, rhs: Self) -> Self {
                for (a, b) in self.cols.iter_mut().flatten().zip(rhs.cols.iter().flatten()) {
                    *a -= b;
                }
                self
            }
        }

        impl From<$glam> for $name {
            fn from(matrix: $glam) -> Self {
                Self {
                    cols: matrix.to_cols_array_2d(),
                }
            }
        }

        impl From<$name> for $glam {
            fn from(matrix: $name) -> Self {
                <$glam>::from_cols_array_2d(&matrix.cols)
            }
        }
    };
}

impl_matrix!(Matrix2, Vector2, glam::Mat2, 2);
impl_matrix!(Matrix3, Vector3, glam::Mat3, 3);
impl_matrix!(Matrix4, Vector4, glam::Mat4, 4);

impl Matrix2 {
    pub fn from_angle(radians: f32) -> Self {
        glam::Mat2::from_angle(radians).into()
    }
}

impl Matrix3 {
    /// Upper-left 3x3 block of a 4x4 matrix.
    pub fn from_matrix4(matrix: &Matrix4) -> Self {
        glam::Mat3::from_mat4((*matrix).into()).into()
    }

    /// Inverse-transpose of the upper-left block, for transforming normals.
    pub fn normal_matrix(model: &Matrix4) -> Option<Self> {
        Self::from_matrix4(model).inverse().map(|inverse| inverse.transpose())
    }
}

impl Matrix4 {
    /// Right-handed perspective projection with a `[-1, 1]` depth range.
    pub fn perspective(fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Self {
        glam::Mat4::perspective_rh_gl(fov_y_radians, aspect, near, far).into()
    }

    /// Right-handed orthographic projection with a `[-1, 1]` depth range.
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        glam::Mat4::orthographic_rh_gl(left, right, bottom, top, near, far).into()
    }

    pub fn look_at(eye: Vector3, target: Vector3, up: Vector3) -> Self {
        glam::Mat4::look_at_rh(eye.into(), target.into(), up.into()).into()
    }

    pub fn from_translation(translation: Vector3) -> Self {
        glam::Mat4::from_translation(translation.into()).into()
    }

    pub fn from_scale(scale: Vector3) -> Self {
        glam::Mat4::from_scale(scale.into()).into()
    }

    pub fn from_rotation_x(radians: f32) -> Self {
        glam::Mat4::from_rotation_x(radians).into()
    }

    pub fn from_rotation_y(radians: f32) -> Self {
        glam::Mat4::from_rotation_y(radians).into()
    }

    pub fn from_rotation_z(radians: f32) -> Self {
        glam::Mat4::from_rotation_z(radians).into()
    }

    pub fn from_axis_angle(axis: Vector3, radians: f32) -> Self {
        glam::Mat4::from_axis_angle(glam::Vec3::from(axis).normalize(), radians).into()
    }

    /// Transforms a point, dividing by the resulting `w`.
    pub fn transform_point(&self, point: Vector3) -> Vector3 {
        let out = *self * point.extend(1.0);
        if out.w != 0.0 {
            out.truncate() / out.w
        } else {
            out.truncate()
        }
    }

    /// Transforms a direction, ignoring translation.
    pub fn transform_vector(&self, vector: Vector3) -> Vector3 {
        (*self * vector.extend(0.0)).truncate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: &[f32], b: &[f32]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn identity_is_neutral() {
        let m = Matrix3::from_cols_array_2d([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 10.0]]);
        assert_eq!(m * Matrix3::IDENTITY, m);
        assert_eq!(Matrix3::IDENTITY * m, m);
        assert_eq!(Matrix4::default(), Matrix4::IDENTITY);
    }

    #[test]
    fn multiplication_matches_glam() {
        let a = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let b = Matrix4::from_rotation_y(0.7) * Matrix4::from_scale(Vector3::splat(2.0));
        let ours = a * b;
        let theirs = glam::Mat4::from(a) * glam::Mat4::from(b);
        assert!(approx_eq(ours.as_slice(), &theirs.to_cols_array()));
    }

    #[test]
    fn matrix_vector_product() {
        let m = Matrix2::from_cols([Vector2::new(1.0, 2.0), Vector2::new(3.0, 4.0)]);
        assert_eq!(m * Vector2::new(1.0, 1.0), Vector2::new(4.0, 6.0));
        assert_eq!(m.row(0), Vector2::new(1.0, 3.0));
        assert_eq!(m.transpose().col(0), Vector2::new(1.0, 3.0));
    }

    #[test]
    fn determinant_and_inverse() {
        let m = Matrix2::from_cols_array_2d([[4.0, 2.0], [7.0, 6.0]]);
        assert!((m.determinant() - 10.0).abs() < 1e-5);
        let product = m * m.inverse().unwrap();
        assert!(approx_eq(product.as_slice(), Matrix2::IDENTITY.as_slice()));
        assert!(Matrix3::ZERO.inverse().is_none());
    }

    #[test]
    fn small_scales_stay_invertible() {
        let model = Matrix4::from_scale(Vector3::splat(0.001));
        let inverse = model.inverse().expect("tiny uniform scale is invertible");
        assert!((inverse.col(0).x - 1000.0).abs() < 1e-2);
        assert!(approx_eq(
            (model * inverse).as_slice(),
            Matrix4::IDENTITY.as_slice()
        ));

        let normals = Matrix3::normal_matrix(&model).expect("normal matrix");
        assert!((normals.col(1).y - 1000.0).abs() < 1e-2);
    }

    #[test]
    fn translation_moves_points_not_vectors() {
        let m = Matrix4::from_translation(Vector3::new(5.0, 0.0, -1.0));
        assert_eq!(m.transform_point(Vector3::ZERO), Vector3::new(5.0, 0.0, -1.0));
        assert_eq!(m.transform_vector(Vector3::X), Vector3::X);
    }

    #[test]
    fn as_slice_is_column_major() {
        let m = Matrix4::from_translation(Vector3::new(7.0, 8.0, 9.0));
        assert_eq!(&m.as_slice()[12..15], &[7.0, 8.0, 9.0]);
    }
}
