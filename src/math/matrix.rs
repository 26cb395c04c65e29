// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use super::{MathError, Vector3, Vector4};
use std::ops::Mul;

/// A column-major 3x3 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3(pub [f32; 9]);

/// A column-major 4x4 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4(pub [f32; 16]);

impl Default for Matrix3 {
    fn default() -> Self {
        Matrix3::IDENTITY
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Matrix4::IDENTITY
    }
}

impl Matrix3 {
    pub const IDENTITY: Matrix3 = Matrix3([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.0[col * 3 + row]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.0[col * 3 + row] = value;
    }

    /// Standard product `self · rhs`.
    pub fn multiply(&self, rhs: &Matrix3) -> Matrix3 {
        let mut out = [0.0; 9];
        for col in 0..3 {
            for row in 0..3 {
                out[col * 3 + row] = (0..3).map(|k| self.get(row, k) * rhs.get(k, col)).sum();
            }
        }
        Matrix3(out)
    }

    pub fn transform(&self, v: Vector3) -> Vector3 {
        let m = &self.0;
        let [x, y, z] = v.0;
        Vector3([
            m[0] * x + m[3] * y + m[6] * z,
            m[1] * x + m[4] * y + m[7] * z,
            m[2] * x + m[5] * y + m[8] * z,
        ])
    }

    pub fn transpose(&self) -> Matrix3 {
        let m = &self.0;
        Matrix3([m[0], m[3], m[6], m[1], m[4], m[7], m[2], m[5], m[8]])
    }

    /// Adjugate by closed-form cofactor expansion.
    ///
    /// For an invertible matrix `adjoint(M) = det(M) · inverse(M)`, so
    /// `transpose(adjoint(M))` transforms normals correctly up to scale.
    pub fn adjoint(&self) -> Matrix3 {
        let (a1, a2, a3) = (self.0[0], self.0[3], self.0[6]);
        let (b1, b2, b3) = (self.0[1], self.0[4], self.0[7]);
        let (c1, c2, c3) = (self.0[2], self.0[5], self.0[8]);

        let mut r = [0.0; 9];
        r[0] = b2 * c3 - b3 * c2;
        r[3] = a3 * c2 - a2 * c3;
        r[6] = a2 * b3 - a3 * b2;

        r[1] = b3 * c1 - b1 * c3;
        r[4] = a1 * c3 - a3 * c1;
        r[7] = a3 * b1 - a1 * b3;

        r[2] = b1 * c2 - b2 * c1;
        r[5] = a2 * c1 - a1 * c2;
        r[8] = a1 * b2 - a2 * b1;
        Matrix3(r)
    }

    pub fn determinant(&self) -> f32 {
        let (a1, a2, a3) = (self.0[0], self.0[3], self.0[6]);
        let (b1, b2, b3) = (self.0[1], self.0[4], self.0[7]);
        let (c1, c2, c3) = (self.0[2], self.0[5], self.0[8]);
        a1 * (b2 * c3 - b3 * c2) + a2 * (b3 * c1 - b1 * c3) + a3 * (b1 * c2 - b2 * c1)
    }

    /// Closed-form inverse, `adjoint / det`.
    pub fn inverse(&self) -> Result<Matrix3, MathError> {
        let det = self.determinant();
        if det == 0.0 {
            return Err(MathError::Singular);
        }
        let mut adj = self.adjoint();
        adj.0.iter_mut().for_each(|c| *c /= det);
        Ok(adj)
    }

    pub fn approx_eq(&self, other: &Matrix3, epsilon: f32) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Matrix4 {
    pub const IDENTITY: Matrix4 = Matrix4([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.0[col * 4 + row]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.0[col * 4 + row] = value;
    }

    pub fn is_identity(&self) -> bool {
        *self == Matrix4::IDENTITY
    }

    /// Standard product `self · rhs`: `rhs` is applied to a vector first.
    pub fn multiply(&self, rhs: &Matrix4) -> Matrix4 {
        let a = &self.0;
        let b = &rhs.0;
        let mut out = [0.0; 16];
        // column `i` of the product is `self` applied to column `i` of `rhs`
        for i in 0..4 {
            let c = 4 * i;
            for row in 0..4 {
                out[c + row] = a[row] * b[c]
                    + a[row + 4] * b[c + 1]
                    + a[row + 8] * b[c + 2]
                    + a[row + 12] * b[c + 3];
            }
        }
        Matrix4(out)
    }

    pub fn transform(&self, v: Vector4) -> Vector4 {
        let m = &self.0;
        let [x, y, z, w] = v.0;
        let mut out = [0.0; 4];
        for (i, o) in out.iter_mut().enumerate() {
            *o = m[i] * x + m[i + 4] * y + m[i + 8] * z + m[i + 12] * w;
        }
        Vector4(out)
    }

    pub fn transpose(&self) -> Matrix4 {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[row * 4 + col] = self.0[col * 4 + row];
            }
        }
        Matrix4(out)
    }

    /// Gauss-Jordan elimination with partial pivoting.
    ///
    /// Fails with [`MathError::Singular`] when a pivot is exactly zero after the row swap.
    pub fn inverse(&self) -> Result<Matrix4, MathError> {
        let mut work = [[0.0f32; 4]; 4];
        for (row, r) in work.iter_mut().enumerate() {
            for (col, c) in r.iter_mut().enumerate() {
                *c = self.get(row, col);
            }
        }
        let mut inv = [[0.0f32; 4]; 4];
        for (i, r) in inv.iter_mut().enumerate() {
            r[i] = 1.0;
        }

        for i in 0..4 {
            let mut pivot = i;
            for j in i + 1..4 {
                if work[j][i].abs() > work[pivot][i].abs() {
                    pivot = j;
                }
            }
            if pivot != i {
                work.swap(i, pivot);
                inv.swap(i, pivot);
            }
            let t = work[i][i];
            if t == 0.0 {
                return Err(MathError::Singular);
            }
            for k in 0..4 {
                work[i][k] /= t;
                inv[i][k] /= t;
            }
            for j in 0..4 {
                if j == i {
                    continue;
                }
                let t = work[j][i];
                if t == 0.0 {
                    continue;
                }
                for k in 0..4 {
                    work[j][k] -= work[i][k] * t;
                    inv[j][k] -= inv[i][k] * t;
                }
            }
        }

        let mut out = Matrix4([0.0; 16]);
        for (row, r) in inv.iter().enumerate() {
            for (col, c) in r.iter().enumerate() {
                out.set(row, col, *c);
            }
        }
        Ok(out)
    }

    pub fn upper_left_3x3(&self) -> Matrix3 {
        let m = &self.0;
        Matrix3([m[0], m[1], m[2], m[4], m[5], m[6], m[8], m[9], m[10]])
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Matrix4 {
        let mut m = Matrix4::IDENTITY;
        m.0[12] = x;
        m.0[13] = y;
        m.0[14] = z;
        m
    }

    pub fn scaling(x: f32, y: f32, z: f32) -> Matrix4 {
        let mut m = Matrix4::IDENTITY;
        m.0[0] = x;
        m.0[5] = y;
        m.0[10] = z;
        m
    }

    /// Rotation of `angle` degrees about `(x, y, z)`.
    ///
    /// The axis is normalized unless its length is exactly 0 or 1.
    pub fn rotation(angle: f32, x: f32, y: f32, z: f32) -> Matrix4 {
        let radians = angle.to_radians();
        let (s, c) = radians.sin_cos();
        let omc = 1.0 - c;
        let mag = (x * x + y * y + z * z).sqrt();
        let (x, y, z) = if mag != 0.0 && mag != 1.0 {
            (x / mag, y / mag, z / mag)
        } else {
            (x, y, z)
        };
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, yz, zx) = (x * y, y * z, z * x);
        let (xs, ys, zs) = (x * s, y * s, z * s);

        Matrix4([
            omc * xx + c,
            omc * xy + zs,
            omc * zx - ys,
            0.0,
            omc * xy - zs,
            omc * yy + c,
            omc * yz + xs,
            0.0,
            omc * zx + ys,
            omc * yz - xs,
            omc * zz + c,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    /// Perspective projection matrix, as `glFrustum`.
    pub fn frustum(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<Matrix4, MathError> {
        let dx = right - left;
        let dy = top - bottom;
        let dz = far - near;
        let finite = [left, right, bottom, top, near, far].iter().all(|v| v.is_finite());
        // negated comparisons so that NaN bounds are rejected too
        if !(finite && near > 0.0 && far > 0.0 && dx > 0.0 && dy > 0.0 && dz > 0.0) {
            return Err(MathError::InvalidFrustum {
                left,
                right,
                bottom,
                top,
                near,
                far,
            });
        }
        let mut m = [0.0; 16];
        m[0] = 2.0 * near / dx;
        m[5] = 2.0 * near / dy;
        m[8] = (right + left) / dx;
        m[9] = (top + bottom) / dy;
        m[10] = -(near + far) / dz;
        m[11] = -1.0;
        m[14] = -2.0 * near * far / dz;
        Ok(Matrix4(m))
    }

    /// Parallel projection matrix, as `glOrtho`.
    pub fn ortho(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<Matrix4, MathError> {
        let dx = right - left;
        let dy = top - bottom;
        let dz = far - near;
        let finite = [left, right, bottom, top, near, far].iter().all(|v| v.is_finite());
        let spans = [dx, dy, dz];
        if !(finite && spans.iter().all(|d| *d != 0.0 && d.is_finite())) {
            return Err(MathError::InvalidOrtho {
                left,
                right,
                bottom,
                top,
                near,
                far,
            });
        }
        let mut m = Matrix4::IDENTITY;
        m.0[0] = 2.0 / dx;
        m.0[12] = -(right + left) / dx;
        m.0[5] = 2.0 / dy;
        m.0[13] = -(top + bottom) / dy;
        m.0[10] = -2.0 / dz;
        m.0[14] = -(near + far) / dz;
        Ok(m)
    }

    /// Symmetric frustum from a vertical field of view in degrees.
    pub fn perspective(fovy: f32, aspect: f32, near: f32, far: f32) -> Result<Matrix4, MathError> {
        let height = (fovy / 360.0 * std::f32::consts::PI).tan() * near;
        let width = height * aspect;
        Matrix4::frustum(-width, width, -height, height, near, far)
    }

    /// `self = self · translation(x, y, z)` without a full multiply.
    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        let m = &mut self.0;
        for i in 0..4 {
            m[12 + i] += m[i] * x + m[4 + i] * y + m[8 + i] * z;
        }
    }

    /// `self = self · scaling(x, y, z)` without a full multiply.
    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        let m = &mut self.0;
        for (col, factor) in [x, y, z].into_iter().enumerate() {
            for row in 0..4 {
                m[col * 4 + row] *= factor;
            }
        }
    }

    pub fn approx_eq(&self, other: &Matrix4, epsilon: f32) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;
    fn mul(self, rhs: Matrix4) -> Matrix4 {
        self.multiply(&rhs)
    }
}

impl Mul<Vector4> for Matrix4 {
    type Output = Vector4;
    fn mul(self, rhs: Vector4) -> Vector4 {
        self.transform(rhs)
    }
}

impl Mul for Matrix3 {
    type Output = Matrix3;
    fn mul(self, rhs: Matrix3) -> Matrix3 {
        self.multiply(&rhs)
    }
}

impl Mul<Vector3> for Matrix3 {
    type Output = Vector3;
    fn mul(self, rhs: Vector3) -> Vector3 {
        self.transform(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn sample() -> Matrix4 {
        let mut m = Matrix4::rotation(33.0, 1.0, 2.0, 3.0);
        m.translate(4.0, -2.0, 7.5);
        m.scale(2.0, 0.5, 3.0);
        m
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn inverse_times_matrix_is_identity() {
        let m = sample();
        let inv = m.inverse().unwrap();
        assert!((inv * m).approx_eq(&Matrix4::IDENTITY, EPS));
        assert!((m * inv).approx_eq(&Matrix4::IDENTITY, EPS));
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn inverse_needs_row_swap() {
        // zero on the diagonal forces a pivot swap
        let m = Matrix4([
            0.0, 1.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 2.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ]);
        let inv = m.inverse().unwrap();
        assert!((inv * m).approx_eq(&Matrix4::IDENTITY, EPS));
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn singular_inverse_is_reported() {
        let mut m = Matrix4::IDENTITY;
        m.scale(1.0, 0.0, 1.0);
        assert_eq!(m.inverse(), Err(MathError::Singular));
        assert_eq!(Matrix4([0.0; 16]).inverse(), Err(MathError::Singular));
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn transpose_is_an_involution() {
        let m = sample();
        assert_eq!(m.transpose().transpose(), m);
        let n = m.upper_left_3x3();
        assert_eq!(n.transpose().transpose(), n);
        assert_eq!(m.transpose().get(1, 2), m.get(2, 1));
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn in_place_builders_match_products() {
        let base = Matrix4::rotation(45.0, 0.0, 1.0, 0.0);
        let mut t = base;
        t.translate(1.0, 2.0, 3.0);
        assert!(t.approx_eq(&(base * Matrix4::translation(1.0, 2.0, 3.0)), EPS));
        let mut s = base;
        s.scale(2.0, 3.0, 4.0);
        assert!(s.approx_eq(&(base * Matrix4::scaling(2.0, 3.0, 4.0)), EPS));
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn rotation_follows_right_hand_rule() {
        let r = Matrix4::rotation(90.0, 0.0, 0.0, 1.0);
        let v = r * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!(v.approx_eq(&Vector4::new(0.0, 1.0, 0.0, 1.0), EPS));
        // non-unit axis is normalized
        let r2 = Matrix4::rotation(90.0, 0.0, 0.0, 5.0);
        assert!(r2.approx_eq(&r, EPS));
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn degenerate_projections_are_rejected() {
        assert!(matches!(
            Matrix4::frustum(-1.0, 1.0, -1.0, 1.0, 0.0, 10.0),
            Err(MathError::InvalidFrustum { .. })
        ));
        assert!(Matrix4::frustum(1.0, 1.0, -1.0, 1.0, 1.0, 10.0).is_err());
        assert!(Matrix4::frustum(-1.0, 1.0, -1.0, 1.0, 10.0, 1.0).is_err());
        assert!(Matrix4::frustum(-1.0, 1.0, -1.0, 1.0, f32::NAN, 1.0).is_err());
        assert!(matches!(
            Matrix4::ortho(-1.0, 1.0, 2.0, 2.0, -1.0, 1.0),
            Err(MathError::InvalidOrtho { .. })
        ));
        // ortho accepts reversed and negative ranges
        assert!(Matrix4::ortho(1.0, -1.0, -1.0, 1.0, 1.0, -1.0).is_ok());
        // non-finite bounds never make it into a matrix
        assert!(matches!(
            Matrix4::ortho(f32::NAN, 1.0, -1.0, 1.0, 1.0, 10.0),
            Err(MathError::InvalidOrtho { .. })
        ));
        assert!(Matrix4::ortho(-1.0, 1.0, -1.0, 1.0, -1.0, f32::INFINITY).is_err());
        assert!(Matrix4::ortho(-f32::MAX, f32::MAX, -1.0, 1.0, -1.0, 1.0).is_err());
        assert!(matches!(
            Matrix4::frustum(-1.0, 1.0, -1.0, 1.0, 1.0, f32::INFINITY),
            Err(MathError::InvalidFrustum { .. })
        ));
        assert!(Matrix4::perspective(60.0, 1.0, 1.0, f32::INFINITY).is_err());
        assert!(Matrix4::perspective(f32::NAN, 1.0, 1.0, 10.0).is_err());
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn perspective_is_a_symmetric_frustum() {
        let p = Matrix4::perspective(90.0, 2.0, 1.0, 100.0).unwrap();
        let f = Matrix4::frustum(-2.0, 2.0, -1.0, 1.0, 1.0, 100.0).unwrap();
        assert!(p.approx_eq(&f, EPS));
        assert_eq!(p.get(3, 2), -1.0);
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn adjoint_is_scaled_inverse() {
        let m = sample().upper_left_3x3();
        let det = m.determinant();
        let mut scaled = m.inverse().unwrap();
        scaled.0.iter_mut().for_each(|c| *c *= det);
        assert!(m.adjoint().approx_eq(&scaled, 1e-4));
        assert!((m.inverse().unwrap() * m).approx_eq(&Matrix3::IDENTITY, EPS));
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn vector_transforms_use_columns() {
        let t = Matrix4::translation(1.0, 2.0, 3.0);
        assert_eq!(t * Vector4::new(0.0, 0.0, 0.0, 1.0), Vector4::new(1.0, 2.0, 3.0, 1.0));
        // directions ignore translation
        assert_eq!(t * Vector4::new(1.0, 0.0, 0.0, 0.0), Vector4::new(1.0, 0.0, 0.0, 0.0));
        let s = Matrix4::scaling(2.0, 3.0, 4.0).upper_left_3x3();
        assert_eq!(s * Vector3::new(1.0, 1.0, 1.0), Vector3::new(2.0, 3.0, 4.0));
    }
}
