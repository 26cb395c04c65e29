// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Vector and matrix algebra for the fixed-function pipeline.

All matrices are stored column-major, the same layout the GPU expects for
`glUniformMatrix*fv` with `transpose = false`, so a matrix can be uploaded
without reshuffling.  Element `(row, col)` of a [`Matrix4`] lives at index
`col * 4 + row`.

Everything here is a pure function of its inputs.  Operations that can fail on
degenerate input ([`Matrix4::inverse`], [`Matrix4::frustum`],
[`Matrix4::ortho`]) report a [`MathError`] instead of producing NaNs.
*/

mod matrix;
mod vector;

pub use matrix::{Matrix3, Matrix4};
pub use vector::{Vector3, Vector4};

use std::fmt::Display;

/// Failure of a matrix operation on degenerate input.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum MathError {
    /// A zero pivot was found during elimination.
    Singular,
    InvalidFrustum {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
    InvalidOrtho {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
}

impl Display for MathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MathError::Singular => write!(f, "matrix is singular, cannot invert"),
            MathError::InvalidFrustum {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => write!(
                f,
                "invalid frustum l={left} r={right} b={bottom} t={top} n={near} f={far}"
            ),
            MathError::InvalidOrtho {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => write!(
                f,
                "invalid ortho l={left} r={right} b={bottom} t={top} n={near} f={far}"
            ),
        }
    }
}
