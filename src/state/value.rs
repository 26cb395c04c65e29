// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0

use crate::math::{Matrix3, Matrix4, Vector3, Vector4};

/// The value of one uniform.
///
/// The variant is chosen when the state is built and never changes afterwards;
/// uploads dispatch on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec3(Vector3),
    Vec4(Vector4),
    Mat3(Matrix3),
    Mat4(Matrix4),
}

impl UniformValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            UniformValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            UniformValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            UniformValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_vec4(&self) -> Option<Vector4> {
        match self {
            UniformValue::Vec4(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<Vector3> {
        match self {
            UniformValue::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    /// Text of a `#define` for this value.
    ///
    /// Only booleans and integers select variants.
    pub fn define_text(&self) -> Option<String> {
        match self {
            UniformValue::Bool(b) => Some(if *b { "1".to_owned() } else { "0".to_owned() }),
            UniformValue::Int(i) => Some(i.to_string()),
            _ => None,
        }
    }

    /// Whether `other` may replace this value without changing its variant.
    pub(crate) fn same_kind(&self, other: &UniformValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    fn float_bits(&self) -> &[f32] {
        match self {
            UniformValue::Float(f) => std::slice::from_ref(f),
            UniformValue::Vec3(v) => &v.0,
            UniformValue::Vec4(v) => &v.0,
            UniformValue::Mat3(m) => &m.0,
            UniformValue::Mat4(m) => &m.0,
            UniformValue::Bool(_) | UniformValue::Int(_) => &[],
        }
    }
}

/// Equality as the GPU sees it: two values are the same upload when they
/// would write the same bits.
pub trait SameUpload {
    fn same_upload(&self, other: &Self) -> bool;
}

impl SameUpload for bool {
    fn same_upload(&self, other: &Self) -> bool {
        self == other
    }
}

impl SameUpload for UniformValue {
    /// Floats compare bitwise, so a NaN matches itself.
    fn same_upload(&self, other: &Self) -> bool {
        match (self, other) {
            (UniformValue::Bool(a), UniformValue::Bool(b)) => a == b,
            (UniformValue::Int(a), UniformValue::Int(b)) => a == b,
            _ => {
                self.same_kind(other)
                    && self
                        .float_bits()
                        .iter()
                        .zip(other.float_bits())
                        .all(|(a, b)| a.to_bits() == b.to_bits())
            }
        }
    }
}

/**
Upload tracking for a single value.

* requested - written by setters via [`Self::update`]
* submitted - copied from `requested` via [`Self::mark_submitted`] once the
  value reached the GPU for the current program.

A value is dirty whenever the two differ, so writing the same value twice
costs nothing, while [`Self::invalidate`] forces the next upload (GPU uniform
storage is per program).
*/
#[derive(Debug, Clone)]
pub struct UploadTracked<T> {
    requested: T,
    submitted: Option<T>,
}

impl<T> UploadTracked<T> {
    pub fn new(requested: T) -> Self {
        UploadTracked {
            requested,
            submitted: None,
        }
    }

    pub fn get(&self) -> &T {
        &self.requested
    }

    pub fn update(&mut self, requested: T) {
        self.requested = requested;
    }

    pub fn is_dirty(&self) -> bool
    where
        T: SameUpload,
    {
        match &self.submitted {
            Some(submitted) => !self.requested.same_upload(submitted),
            None => true,
        }
    }

    pub fn mark_submitted(&mut self)
    where
        T: Clone,
    {
        self.submitted = Some(self.requested.clone());
    }

    pub fn invalidate(&mut self) {
        self.submitted = None;
    }
}
