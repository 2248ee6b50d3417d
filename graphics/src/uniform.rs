//! Typed shader-uniform payloads.
//!
//! [`UniformValue`] is a tagged union over the scalar, vector, and matrix
//! shapes a shader uniform can take. The byte layout of each variant matches
//! its declared [`UniformType`] exactly; a value is only ever written into a
//! slot of its own type (mismatches are a programming error, enforced by the
//! stores and backends that accept these values).

use shadelab_core::math::{mat3_to_array, mat4_to_array, Mat3, Mat4, Vec3};

/// Shape of a shader uniform value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformType {
    /// Single f32 value.
    Float,
    /// 2-component float vector.
    Vec2,
    /// 3-component float vector.
    Vec3,
    /// 4-component float vector.
    Vec4,
    /// 3x3 float matrix, column-major.
    Mat3,
    /// 4x4 float matrix, column-major.
    Mat4,
    /// Single i32 value.
    Int,
}

impl UniformType {
    /// Size of one value of this type in bytes.
    pub fn byte_size(&self) -> usize {
        match self {
            Self::Float | Self::Int => 4,
            Self::Vec2 => 8,
            Self::Vec3 => 12,
            Self::Vec4 => 16,
            Self::Mat3 => 36,
            Self::Mat4 => 64,
        }
    }
}

/// A typed shader uniform payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// Single float.
    Float(f32),
    /// 2-component float vector.
    Vec2([f32; 2]),
    /// 3-component float vector.
    Vec3([f32; 3]),
    /// 4-component float vector.
    Vec4([f32; 4]),
    /// 3x3 float matrix, column-major.
    Mat3([f32; 9]),
    /// 4x4 float matrix, column-major.
    Mat4([f32; 16]),
    /// Single integer.
    Int(i32),
}

impl UniformValue {
    /// The type tag of this value.
    pub fn ty(&self) -> UniformType {
        match self {
            Self::Float(_) => UniformType::Float,
            Self::Vec2(_) => UniformType::Vec2,
            Self::Vec3(_) => UniformType::Vec3,
            Self::Vec4(_) => UniformType::Vec4,
            Self::Mat3(_) => UniformType::Mat3,
            Self::Mat4(_) => UniformType::Mat4,
            Self::Int(_) => UniformType::Int,
        }
    }

    /// Raw bytes of this value, laid out exactly as the declared type.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Float(v) => bytemuck::bytes_of(v),
            Self::Vec2(v) => bytemuck::cast_slice(v),
            Self::Vec3(v) => bytemuck::cast_slice(v),
            Self::Vec4(v) => bytemuck::cast_slice(v),
            Self::Mat3(v) => bytemuck::cast_slice(v),
            Self::Mat4(v) => bytemuck::cast_slice(v),
            Self::Int(v) => bytemuck::bytes_of(v),
        }
    }

    /// Create a `Vec3` value from a math vector.
    pub fn vec3(v: &Vec3) -> Self {
        Self::Vec3([v.x, v.y, v.z])
    }

    /// Create a `Mat3` value from a math matrix (column-major).
    pub fn mat3(m: &Mat3) -> Self {
        Self::Mat3(mat3_to_array(m))
    }

    /// Create a `Mat4` value from a math matrix (column-major).
    pub fn mat4(m: &Mat4) -> Self {
        Self::Mat4(mat4_to_array(m))
    }
}

// Ensure uniform payloads stay plain data
static_assertions::assert_impl_all!(UniformValue: Send, Sync, Copy);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        assert_eq!(UniformValue::Float(1.0).ty(), UniformType::Float);
        assert_eq!(UniformValue::Vec3([0.0; 3]).ty(), UniformType::Vec3);
        assert_eq!(UniformValue::Mat4([0.0; 16]).ty(), UniformType::Mat4);
        assert_eq!(UniformValue::Int(3).ty(), UniformType::Int);
    }

    #[test]
    fn test_byte_layout_matches_type() {
        let values = [
            UniformValue::Float(1.0),
            UniformValue::Vec2([0.0; 2]),
            UniformValue::Vec3([0.0; 3]),
            UniformValue::Vec4([0.0; 4]),
            UniformValue::Mat3([0.0; 9]),
            UniformValue::Mat4([0.0; 16]),
            UniformValue::Int(0),
        ];
        for value in values {
            assert_eq!(value.as_bytes().len(), value.ty().byte_size());
        }
    }

    #[test]
    fn test_mat4_conversion_is_column_major() {
        let m = shadelab_core::math::mat4_from_translation(Vec3::new(1.0, 2.0, 3.0));
        let UniformValue::Mat4(a) = UniformValue::mat4(&m) else {
            panic!("expected Mat4");
        };
        assert_eq!(&a[12..15], &[1.0, 2.0, 3.0]);
    }
}
