use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Two-component vector.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

/// Three-component vector.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Four-component vector.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

macro_rules! impl_vector {
    ($name:ident, $glam:ty, $n:expr, { $($field:ident),+ }) => {
        impl $name {
            pub const ZERO: Self = Self { $($field: 0.0),+ };
            pub const ONE: Self = Self { $($field: 1.0),+ };

            #[inline]
            pub const fn new($($field: f32),+) -> Self {
                Self { $($field),+ }
            }

            #[inline]
            pub const fn splat(value: f32) -> Self {
                Self { $($field: value),+ }
            }

            #[inline]
            pub fn dot(self, rhs: Self) -> f32 {
                0.0 $(+ self.$field * rhs.$field)+
            }

            #[inline]
            pub fn length_squared(self) -> f32 {
                self.dot(self)
            }

            #[inline]
            pub fn length(self) -> f32 {
                self.length_squared().sqrt()
            }

            /// Unit vector in the same direction; the zero vector stays zero.
            pub fn normalize(self) -> Self {
                let length = self.length();
                if length > 0.0 {
                    self / length
                } else {
                    Self::ZERO
                }
            }

            pub fn distance(self, rhs: Self) -> f32 {
                (rhs - self).length()
            }

            pub fn lerp(self, rhs: Self, t: f32) -> Self {
                self + (rhs - self) * t
            }

            pub fn min(self, rhs: Self) -> Self {
                Self { $($field: self.$field.min(rhs.$field)),+ }
            }

            pub fn max(self, rhs: Self) -> Self {
                Self { $($field: self.$field.max(rhs.$field)),+ }
            }

            #[inline]
            pub fn to_array(self) -> [f32; $n] {
                [$(self.$field),+]
            }

            #[inline]
            pub fn as_slice(&self) -> &[f32] {
                bytemuck::cast_ref::<Self, [f32; $n]>(self)
            }
        }

        impl Add for $name {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl Sub for $name {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl Mul for $name {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: Self) -> Self {
                Self { $($field: self.$field * rhs.$field),+ }
            }
        }

        impl Div for $name {
            type Output = Self;
            #[inline]
            fn div(self, rhs: Self) -> Self {
                Self { $($field: self.$field / rhs.$field),+ }
            }
        }

        impl Mul<f32> for $name {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: f32) -> Self {
                Self { $($field: self.$field * rhs),+ }
            }
        }

        impl Mul<$name> for f32 {
            type Output = $name;
            #[inline]
            fn mul(self, rhs: $name) -> $name {
                rhs * self
            }
        }

        impl Div<f32> for $name {
            type Output = Self;
            #[inline]
            fn div(self, rhs: f32) -> Self {
                Self { $($field: self.$field / rhs),+ }
            }
        }

        impl Neg for $name {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }

        impl AddAssign for $name {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                $(self.$field += rhs.$field;)+
            }
        }

        impl SubAssign for $name {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                $(self.$field -= rhs.$field;)+
            }
        }

        impl MulAssign<f32> for $name {
            #[inline]
            fn mul_assign(&mut self, rhs: f32) {
                $(self.$field *= rhs;)+
            }
        }

        impl DivAssign<f32> for $name {
            #[inline]
            fn div_assign(&mut self, rhs: f32) {
                $(self.$field /= rhs;)+
            }
        }

        impl Index<usize> for $name {
            type Output = f32;
            fn index(&self, index: usize) -> &f32 {
                &bytemuck::cast_ref::<Self, [f32; $n]>(self)[index]
            }
        }

        impl IndexMut<usize> for $name {
            fn index_mut(&mut self, index: usize) -> &mut f32 {
                &mut bytemuck::cast_mut::<Self, [f32; $n]>(self)[index]
            }
        }

        impl From<[f32; $n]> for $name {
            fn from(array: [f32; $n]) -> Self {
                let [$($field),+] = array;
                Self { $($field),+ }
            }
        }

        impl From<$name> for [f32; $n] {
            fn from(vector: $name) -> Self {
                vector.to_array()
            }
        }

        impl From<$glam> for $name {
            fn from(vector: $glam) -> Self {
                Self::from(vector.to_array())
            }
        }

        impl From<$name> for $glam {
            fn from(vector: $name) -> Self {
                <$glam>::from_array(vector.to_array())
            }
        }
    };
}

impl_vector!(Vector2, glam::Vec2, 2, { x, y });
impl_vector!(Vector3, glam::Vec3, 3, { x, y, z });
impl_vector!(Vector4, glam::Vec4, 4, { x, y, z, w });

impl Vector2 {
    pub fn extend(self, z: f32) -> Vector3 {
        Vector3::new(self.x, self.y, z)
    }

    /// Z component of the 3D cross product.
    pub fn perp_dot(self, rhs: Self) -> f32 {
        self.x * rhs.y - self.y * rhs.x
    }
}

impl Vector3 {
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    pub fn extend(self, w: f32) -> Vector4 {
        Vector4::new(self.x, self.y, self.z, w)
    }

    pub fn truncate(self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }
}

impl Vector4 {
    pub fn truncate(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_is_component_wise() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vector3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vector3::splat(3.0));
        assert_eq!(a * b, Vector3::new(4.0, 10.0, 18.0));
        assert_eq!(2.0 * a, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(-a, Vector3::new(-1.0, -2.0, -3.0));
        assert_eq!(a.dot(b), 32.0);
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_eq!(Vector3::X.cross(Vector3::Y), Vector3::Z);
        assert_eq!(Vector3::Y.cross(Vector3::X), -Vector3::Z);
    }

    #[test]
    fn normalize_keeps_zero_vector() {
        assert_eq!(Vector2::ZERO.normalize(), Vector2::ZERO);
        let unit = Vector4::new(0.0, 3.0, 0.0, 4.0).normalize();
        assert!((unit.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn compound_assignment_and_indexing() {
        let mut v = Vector4::new(1.0, 2.0, 3.0, 4.0);
        v += Vector4::ONE;
        v *= 2.0;
        v[3] = 0.0;
        assert_eq!(v.to_array(), [4.0, 6.0, 8.0, 0.0]);
        assert_eq!(v[1], 6.0);
        assert_eq!(v.as_slice(), &[4.0, 6.0, 8.0, 0.0]);
    }

    #[test]
    fn converts_to_and_from_glam() {
        let v = Vector3::new(1.0, -2.0, 0.5);
        let g: glam::Vec3 = v.into();
        assert_eq!(g, glam::Vec3::new(1.0, -2.0, 0.5));
        assert_eq!(Vector3::from(g), v);
    }

    #[test]
    fn lerp_interpolates_endpoints() {
        let a = Vector2::new(0.0, 10.0);
        let b = Vector2::new(10.0, 20.0);
        assert_eq!(a.lerp(b, 0.5), Vector2::new(5.0, 15.0));
        assert_eq!(a.lerp(b, 1.0), b);
    }
}
