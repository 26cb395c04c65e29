// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0

use super::attribute::{AttributeState, VertexPointer};
use super::graph::descriptor;
use super::ids::{
    AttributeId, BOOL_COUNT, INT_COUNT, LIGHT_STRIDE, MAX_CLIP_PLANES, MAX_LIGHTS, UniformId,
};
use super::value::{UniformValue, UploadTracked};
use crate::error::Error;
use crate::gl;
use crate::math::{Matrix3, Matrix4, Vector3, Vector4};

/// All emulated fixed-function state of one context.
///
/// Setters record values only; nothing reaches the GPU until a draw uploads
/// whatever the current program declares and hasn't seen yet.
#[derive(Debug, Clone)]
pub struct StateModel<Buffer> {
    values: Vec<UploadTracked<UniformValue>>,
    attributes: Vec<AttributeState<Buffer>>,
    texture_units: usize,
    active_texture: usize,
    client_active_texture: usize,
}

fn default_value(id: UniformId) -> UniformValue {
    use UniformId as U;
    use UniformValue::*;

    if id.is_bool() {
        return Bool(false);
    }
    if let Some(offset) = id.offset_in(U::Light0Ambient, MAX_LIGHTS * LIGHT_STRIDE) {
        let intensity = if offset < LIGHT_STRIDE { 1.0 } else { 0.0 };
        return match offset % LIGHT_STRIDE {
            0 => Vec4(Vector4::new(0.0, 0.0, 0.0, 1.0)),
            1 | 2 => Vec4(Vector4::new(intensity, intensity, intensity, 1.0)),
            3 => Vec4(Vector4::new(0.0, 0.0, 1.0, 0.0)),
            4 => Vec3(Vector3::new(0.0, 0.0, -1.0)),
            6 => Float(-1.0),
            7 => Float(1.0),
            // exponent, linear and quadratic attenuation
            _ => Float(0.0),
        };
    }
    if let Some(unit) = id.offset_in(U::Texture0Sampler, 3) {
        return Int(unit as i32);
    }
    if id.offset_in(U::Texture0Matrix, 3).is_some() {
        return Mat4(Matrix4::IDENTITY);
    }
    if id.offset_in(U::Texture0EnvColor, 3).is_some() || id.offset_in(U::ClipPlane0Equation, 6).is_some() {
        return Vec4(Vector4::ZERO);
    }
    if id.offset_in(U::Texture0EnvRgbScale, 6).is_some() {
        return Float(1.0);
    }
    if id.offset_in(U::Texture0EnvBlurAmount, 3).is_some() {
        return Float(0.0);
    }
    if id.offset_in(U::Texture0Format, 3).is_some() {
        return Int(gl::RGBA as i32);
    }
    if id.offset_in(U::Texture0EnvMode, 9).is_some() {
        // mode and both combiner functions
        return Int(gl::MODULATE as i32);
    }
    if let Some(offset) = id.offset_in(U::Texture0EnvSrc0Rgb, 9) {
        return Int(default_source(offset / 3, offset % 3));
    }
    if let Some(offset) = id.offset_in(U::Texture0EnvSrc0Alpha, 9) {
        return Int(default_source(offset / 3, offset % 3));
    }
    if let Some(offset) = id.offset_in(U::Texture0EnvOperand0Rgb, 9) {
        let operand = if offset % 3 == 2 { gl::SRC_ALPHA } else { gl::SRC_COLOR };
        return Int(operand as i32);
    }
    if id.offset_in(U::Texture0EnvOperand0Alpha, 9).is_some() {
        return Int(gl::SRC_ALPHA as i32);
    }

    match id {
        U::FogMode => Int(gl::EXP as i32),
        U::FogHint | U::LightingHint => Int(gl::FASTEST as i32),
        U::AlphaFunc => Int(gl::ALWAYS as i32),
        U::ModelViewProjectionMatrix | U::ModelViewMatrix => Mat4(Matrix4::IDENTITY),
        U::TransposeAdjointModelViewMatrix => Mat3(Matrix3::IDENTITY),
        U::RescaleNormalFactor | U::FogDensity | U::FogEnd => Float(1.0),
        U::FogStart | U::AlphaFuncValue | U::MaterialShininess => Float(0.0),
        U::MaterialAmbient | U::GlobalAmbientColor => Vec4(Vector4::new(0.2, 0.2, 0.2, 1.0)),
        U::MaterialDiffuse => Vec4(Vector4::new(0.8, 0.8, 0.8, 1.0)),
        U::MaterialSpecular | U::MaterialEmission => Vec4(Vector4::new(0.0, 0.0, 0.0, 1.0)),
        U::FogColor => Vec3(Vector3::ZERO),
        _ => {
            debug_assert!(false, "no default for {id:?}");
            Int(0)
        }
    }
}

/// `GL_TEXTURE`, `GL_PREVIOUS`, `GL_CONSTANT` for slots 0, 1, 2.
fn default_source(unit: usize, slot: usize) -> i32 {
    match slot {
        0 => gl::TexEnvSource::Texture.state_value(unit),
        1 => gl::PREVIOUS as i32,
        _ => gl::CONSTANT as i32,
    }
}

impl<Buffer> StateModel<Buffer> {
    pub fn new(texture_units: usize) -> Self {
        let attributes = AttributeId::ALL
            .iter()
            .map(|id| {
                let size = match id {
                    AttributeId::Normal => 3,
                    _ => 4,
                };
                AttributeState::new(size)
            })
            .collect();
        StateModel {
            values: UniformId::ALL
                .iter()
                .map(|id| UploadTracked::new(default_value(*id)))
                .collect(),
            attributes,
            texture_units,
            active_texture: 0,
            client_active_texture: 0,
        }
    }

    pub fn texture_units(&self) -> usize {
        self.texture_units
    }

    /// The stored value, relevant or not.
    pub fn value(&self, id: UniformId) -> &UniformValue {
        self.values[id.index()].get()
    }

    pub fn bool(&self, id: UniformId) -> bool {
        self.value(id).as_bool().unwrap_or(false)
    }

    pub fn int(&self, id: UniformId) -> i32 {
        self.value(id).as_int().unwrap_or(0)
    }

    /// Whether every ancestor of `id` is a true boolean.
    pub fn is_relevant(&self, id: UniformId) -> bool {
        match descriptor(id).parent {
            None => true,
            Some(parent) => self.is_relevant(parent) && self.bool(parent),
        }
    }

    /// The value, or `None` while a parent is false.
    pub fn relevant_value(&self, id: UniformId) -> Option<UniformValue> {
        self.is_relevant(id).then(|| *self.value(id))
    }

    /// Word that represents `id` in the variant key and in its define.
    ///
    /// Irrelevant values contribute 0 so that state hidden behind a disabled
    /// parent never splits variants.
    pub fn key_word(&self, id: UniformId) -> i32 {
        match self.relevant_value(id) {
            Some(UniformValue::Bool(b)) => b as i32,
            Some(UniformValue::Int(i)) => i,
            _ => 0,
        }
    }

    /// Stores `value`.  Rejects a value of a different kind than the slot holds.
    pub fn set(&mut self, id: UniformId, value: UniformValue) -> Result<(), Error> {
        let slot = &mut self.values[id.index()];
        if !slot.get().same_kind(&value) {
            return Err(Error::InvalidValue(format!(
                "{} holds {:?}, not {:?}",
                id.glsl_name(),
                slot.get(),
                value
            )));
        }
        slot.update(value);
        Ok(())
    }

    // Typed setters; the kind always matches, so these cannot fail.
    pub fn set_bool(&mut self, id: UniformId, value: bool) {
        debug_assert!(id.is_bool());
        self.values[id.index()].update(UniformValue::Bool(value));
    }
    pub fn set_int(&mut self, id: UniformId, value: i32) {
        debug_assert!(self.value(id).as_int().is_some());
        self.values[id.index()].update(UniformValue::Int(value));
    }
    pub fn set_float(&mut self, id: UniformId, value: f32) {
        debug_assert!(self.value(id).as_float().is_some());
        self.values[id.index()].update(UniformValue::Float(value));
    }
    pub fn set_vec3(&mut self, id: UniformId, value: Vector3) {
        debug_assert!(self.value(id).as_vec3().is_some());
        self.values[id.index()].update(UniformValue::Vec3(value));
    }
    pub fn set_vec4(&mut self, id: UniformId, value: Vector4) {
        debug_assert!(self.value(id).as_vec4().is_some());
        self.values[id.index()].update(UniformValue::Vec4(value));
    }
    pub fn set_mat3(&mut self, id: UniformId, value: Matrix3) {
        self.values[id.index()].update(UniformValue::Mat3(value));
    }
    pub fn set_mat4(&mut self, id: UniformId, value: Matrix4) {
        self.values[id.index()].update(UniformValue::Mat4(value));
    }

    pub(crate) fn tracked_mut(&mut self, id: UniformId) -> &mut UploadTracked<UniformValue> {
        &mut self.values[id.index()]
    }

    /// Shader-affecting values, booleans first, in ID order.
    pub fn shader_affecting(&self) -> impl Iterator<Item = UniformId> + '_ {
        UniformId::ALL[..BOOL_COUNT + INT_COUNT].iter().copied()
    }

    // --- families ---

    /// `first` of light `n`, e.g. `light_uniform(1, Light0Diffuse)` is `Light1Diffuse`.
    pub fn light_uniform(&self, n: usize, first: UniformId) -> Result<UniformId, Error> {
        if n >= MAX_LIGHTS {
            return Err(Error::InvalidValue(format!("light {n} is not supported")));
        }
        Ok(UniformId::light(n, first))
    }

    pub fn light_enabled_id(&self, n: usize) -> Result<UniformId, Error> {
        if n >= MAX_LIGHTS {
            return Err(Error::InvalidValue(format!("light {n} is not supported")));
        }
        Ok(UniformId::Light0Enabled.nth(n))
    }

    pub fn clip_plane_uniform(&self, n: usize, first: UniformId) -> Result<UniformId, Error> {
        if n >= MAX_CLIP_PLANES {
            return Err(Error::InvalidValue(format!("clip plane {n} is not supported")));
        }
        Ok(first.nth(n))
    }

    /// Per-unit uniform for `unit`, where `first` is the unit 0 member of a
    /// unit-minor family.
    pub fn texture_uniform(&self, unit: usize, first: UniformId) -> Result<UniformId, Error> {
        self.check_unit(unit)?;
        Ok(first.nth(unit))
    }

    /// Combiner source/operand slot `slot` of `unit`.
    pub fn tex_env_uniform(&self, unit: usize, first: UniformId, slot: usize) -> Result<UniformId, Error> {
        self.check_unit(unit)?;
        if slot >= 3 {
            return Err(Error::InvalidValue(format!("combiner argument {slot} is not supported")));
        }
        Ok(UniformId::tex_env_slot(first, unit, slot))
    }

    fn check_unit(&self, unit: usize) -> Result<(), Error> {
        if unit >= self.texture_units {
            return Err(Error::InvalidValue(format!(
                "texture unit {unit} is out of range (0..{})",
                self.texture_units
            )));
        }
        Ok(())
    }

    // --- texture units ---

    pub fn active_texture(&self) -> usize {
        self.active_texture
    }

    pub fn set_active_texture(&mut self, unit: usize) -> Result<(), Error> {
        self.check_unit(unit)?;
        self.active_texture = unit;
        Ok(())
    }

    pub fn client_active_texture(&self) -> usize {
        self.client_active_texture
    }

    pub fn set_client_active_texture(&mut self, unit: usize) -> Result<(), Error> {
        self.check_unit(unit)?;
        self.client_active_texture = unit;
        Ok(())
    }

    // --- attributes ---

    pub fn attribute(&self, id: AttributeId) -> &AttributeState<Buffer> {
        &self.attributes[id.index()]
    }

    pub(crate) fn attribute_mut(&mut self, id: AttributeId) -> &mut AttributeState<Buffer> {
        &mut self.attributes[id.index()]
    }

    /// Enables or disables a client array together with its `*_ENABLED` flag.
    pub fn set_attribute_enabled(&mut self, id: AttributeId, enabled: bool) {
        self.attributes[id.index()].set_enabled(enabled);
        let flag = match id {
            AttributeId::Position => UniformId::PositionEnabled,
            AttributeId::Normal => UniformId::NormalEnabled,
            AttributeId::Color => UniformId::ColorEnabled,
            AttributeId::TexCoord0 => UniformId::TexCoord0Enabled,
            AttributeId::TexCoord1 => UniformId::TexCoord1Enabled,
            AttributeId::TexCoord2 => UniformId::TexCoord2Enabled,
        };
        self.set_bool(flag, enabled);
    }

    pub fn set_attribute_pointer(&mut self, id: AttributeId, pointer: VertexPointer<Buffer>) {
        self.attributes[id.index()].set_pointer(pointer);
    }

    // --- derived state ---

    /// Recomputes whether any enabled light is positional.
    pub fn update_non_directional_light(&mut self) {
        let any = (0..MAX_LIGHTS).any(|n| {
            self.bool(UniformId::Light0Enabled.nth(n))
                && self
                    .value(UniformId::light(n, UniformId::Light0Position))
                    .as_vec4()
                    .is_some_and(|p| p.w() != 0.0)
        });
        self.set_bool(UniformId::NonDirectionalLightEnabled, any);
    }

    /// Forgets every upload, for a newly bound program.
    pub(crate) fn invalidate_uploads(&mut self) {
        for value in &mut self.values {
            value.invalidate();
        }
        for attribute in &mut self.attributes {
            attribute.set_location(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> StateModel<u32> {
        StateModel::new(3)
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn defaults_follow_gles() {
        let m = model();
        assert_eq!(m.int(UniformId::FogMode), gl::EXP as i32);
        assert_eq!(m.int(UniformId::Texture2Format), gl::RGBA as i32);
        assert_eq!(m.int(UniformId::Texture1EnvSrc0Rgb), 1);
        assert_eq!(m.int(UniformId::Texture1EnvSrc1Alpha), gl::PREVIOUS as i32);
        assert_eq!(m.int(UniformId::Texture0EnvSrc2Rgb), gl::CONSTANT as i32);
        assert_eq!(m.int(UniformId::Texture0EnvOperand2Rgb), gl::SRC_ALPHA as i32);
        assert_eq!(m.int(UniformId::Texture0EnvOperand0Rgb), gl::SRC_COLOR as i32);
        assert_eq!(m.int(UniformId::Texture2Sampler), 2);
        assert_eq!(
            m.value(UniformId::Light0Diffuse).as_vec4(),
            Some(Vector4::new(1.0, 1.0, 1.0, 1.0))
        );
        assert_eq!(
            m.value(UniformId::Light1Specular).as_vec4(),
            Some(Vector4::new(0.0, 0.0, 0.0, 1.0))
        );
        assert_eq!(m.value(UniformId::Light2SpotCutoffAngleCos).as_float(), Some(-1.0));
        assert_eq!(m.value(UniformId::Light2ConstantAttenuation).as_float(), Some(1.0));
        assert_eq!(m.value(UniformId::Light2QuadraticAttenuation).as_float(), Some(0.0));
        assert_eq!(
            m.value(UniformId::Light1SpotDirection).as_vec3(),
            Some(Vector3::new(0.0, 0.0, -1.0))
        );
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn children_are_gated_by_their_parent() {
        let mut m = model();
        m.set_bool(UniformId::Light0Enabled, true);
        assert_eq!(m.relevant_value(UniformId::Light0Enabled), None);
        assert_eq!(m.key_word(UniformId::Light0Enabled), 0);
        m.set_bool(UniformId::LightingEnabled, true);
        assert_eq!(
            m.relevant_value(UniformId::Light0Enabled),
            Some(UniformValue::Bool(true))
        );
        assert_eq!(m.key_word(UniformId::Light0Enabled), 1);
        // the raw value survives the parent being switched off again
        m.set_bool(UniformId::LightingEnabled, false);
        assert!(m.bool(UniformId::Light0Enabled));
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn set_rejects_kind_changes() {
        let mut m = model();
        assert!(m.set(UniformId::FogDensity, UniformValue::Int(3)).is_err());
        assert!(m.set(UniformId::FogDensity, UniformValue::Float(0.5)).is_ok());
        assert_eq!(m.value(UniformId::FogDensity).as_float(), Some(0.5));
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn unit_and_light_ranges() {
        let mut m = StateModel::<u32>::new(2);
        assert!(m.set_active_texture(2).is_err());
        assert_eq!(m.active_texture(), 0);
        assert!(m.set_client_active_texture(1).is_ok());
        assert!(m.light_uniform(3, UniformId::Light0Ambient).is_err());
        assert_eq!(
            m.light_uniform(2, UniformId::Light0Ambient),
            Ok(UniformId::Light2Ambient)
        );
        assert!(m.clip_plane_uniform(6, UniformId::ClipPlane0Enabled).is_err());
        assert!(m.tex_env_uniform(1, UniformId::Texture0EnvSrc0Rgb, 3).is_err());
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn non_directional_light_tracks_enabled_positions() {
        let mut m = model();
        m.set_bool(UniformId::Light1Enabled, true);
        m.update_non_directional_light();
        assert!(!m.bool(UniformId::NonDirectionalLightEnabled));
        m.set_vec4(UniformId::Light1Position, Vector4::new(1.0, 2.0, 3.0, 1.0));
        m.update_non_directional_light();
        assert!(m.bool(UniformId::NonDirectionalLightEnabled));
        m.set_bool(UniformId::Light1Enabled, false);
        m.update_non_directional_light();
        assert!(!m.bool(UniformId::NonDirectionalLightEnabled));
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn client_arrays_drive_their_flags() {
        let mut m = model();
        m.set_attribute_enabled(AttributeId::TexCoord1, true);
        assert!(m.bool(UniformId::TexCoord1Enabled));
        assert!(m.attribute(AttributeId::TexCoord1).is_enabled());
    }
}
