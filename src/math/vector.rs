// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0

/// A 3-component float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3(pub [f32; 3]);

/// A 4-component float vector, typically a homogeneous position or an RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector4(pub [f32; 4]);

impl Vector3 {
    pub const ZERO: Vector3 = Vector3([0.0; 3]);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vector3([x, y, z])
    }
    pub fn x(&self) -> f32 {
        self.0[0]
    }
    pub fn y(&self) -> f32 {
        self.0[1]
    }
    pub fn z(&self) -> f32 {
        self.0[2]
    }

    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn dot(&self, other: &Vector3) -> f32 {
        self.0[0] * other.0[0] + self.0[1] * other.0[1] + self.0[2] * other.0[2]
    }

    /// Component-wise comparison within `epsilon`.
    pub fn approx_eq(&self, other: &Vector3, epsilon: f32) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Vector4 {
    pub const ZERO: Vector4 = Vector4([0.0; 4]);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Vector4([x, y, z, w])
    }
    pub fn x(&self) -> f32 {
        self.0[0]
    }
    pub fn y(&self) -> f32 {
        self.0[1]
    }
    pub fn z(&self) -> f32 {
        self.0[2]
    }
    pub fn w(&self) -> f32 {
        self.0[3]
    }

    pub fn length(&self) -> f32 {
        self.0.iter().map(|c| c * c).sum::<f32>().sqrt()
    }

    /// Whether the 4-length is within 1% of unity.
    pub fn is_unit(&self) -> bool {
        const EPSILON: f32 = 0.01;
        let length = self.length();
        (1.0 - EPSILON..=1.0 + EPSILON).contains(&length)
    }

    pub fn xyz(&self) -> Vector3 {
        Vector3([self.0[0], self.0[1], self.0[2]])
    }

    pub fn approx_eq(&self, other: &Vector4, epsilon: f32) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from(v: [f32; 3]) -> Self {
        Vector3(v)
    }
}

impl From<[f32; 4]> for Vector4 {
    fn from(v: [f32; 4]) -> Self {
        Vector4(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn unit_detection_tolerates_one_percent() {
        assert!(Vector4::new(0.0, 0.0, 1.0, 0.0).is_unit());
        assert!(Vector4::new(0.0, 0.0, 1.005, 0.0).is_unit());
        assert!(!Vector4::new(0.0, 0.0, 2.0, 0.0).is_unit());
        assert!(!Vector4::ZERO.is_unit());
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn dot_and_length() {
        let v = Vector3::new(3.0, 4.0, 0.0);
        assert_eq!(v.length(), 5.0);
        assert_eq!(v.dot(&Vector3::new(1.0, 1.0, 1.0)), 7.0);
    }
}
