// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
The client-facing fixed-function API.

A [`Context`] owns everything one GL context needs: the backend, the matrix
stacks, the emulated state and the variant cache.  Every call except the two
draws is a pure state write.  A draw computes the derived matrices, resolves
the program for the current state, uploads whatever that program declares and
hasn't seen yet, and submits.
*/

use crate::backend::Backend;
use crate::config::Config;
use crate::error::Error;
use crate::gl::{
    AlphaFunc, Capability, ClientArray, CombineAlpha, CombineRgb, DataType, Face, FogMode,
    HintMode, HintTarget, IndexType, OperandAlpha, OperandRgb, Primitive, TexEnvMode,
    TexEnvSource, TextureFormat,
};
use crate::math::{Matrix4, Vector3, Vector4};
use crate::shader::AssembledProgram;
use crate::state::ids::{MAX_CLIP_PLANES, MAX_LIGHTS};
use crate::state::{AttributeId, StateModel, UniformId, UniformValue, VertexPointer};
use crate::transform::{MatrixMode, TransformStacks};
use crate::variant_cache::VariantCache;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// `glLight` parameters.  Positions and directions are in object space and
/// are transformed by the current model-view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightParam {
    Ambient(Vector4),
    Diffuse(Vector4),
    Specular(Vector4),
    Position(Vector4),
    SpotDirection(Vector3),
    SpotExponent(f32),
    /// Cutoff angle in degrees; 180 disables the spot cone.
    SpotCutoff(f32),
    ConstantAttenuation(f32),
    LinearAttenuation(f32),
    QuadraticAttenuation(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightModelParam {
    TwoSide(bool),
    Ambient(Vector4),
    LocalViewer(bool),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialParam {
    Ambient(Vector4),
    Diffuse(Vector4),
    AmbientAndDiffuse(Vector4),
    Specular(Vector4),
    Emission(Vector4),
    Shininess(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FogParam {
    Mode(FogMode),
    Density(f32),
    Start(f32),
    End(f32),
    /// Only the rgb components are used.
    Color(Vector4),
}

/// `glTexEnv` parameters.  Combiner arguments are indexed 0..3.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TexEnvParam {
    Mode(TexEnvMode),
    CombineRgb(CombineRgb),
    CombineAlpha(CombineAlpha),
    SrcRgb(usize, TexEnvSource),
    SrcAlpha(usize, TexEnvSource),
    OperandRgb(usize, OperandRgb),
    OperandAlpha(usize, OperandAlpha),
    /// 1, 2 or 4.
    RgbScale(f32),
    /// 1, 2 or 4.
    AlphaScale(f32),
    Color(Vector4),
    /// Texel-space radius of the box blur applied when sampling.
    BlurAmount(f32),
}

/// Upload counters, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UploadStats {
    pub uniform_uploads: usize,
    pub pointer_uploads: usize,
    pub attribute_toggles: usize,
}

impl UploadStats {
    pub fn total(&self) -> usize {
        self.uniform_uploads + self.pointer_uploads + self.attribute_toggles
    }
}

pub struct Context<B: Backend> {
    backend: B,
    config: Config,
    transforms: TransformStacks,
    state: StateModel<B::Buffer>,
    cache: VariantCache<B>,
    texture_formats: HashMap<B::Texture, TextureFormat>,
    bound_textures: Vec<Option<B::Texture>>,
    pass_through: HashSet<Capability>,
    current_program: Option<Rc<AssembledProgram<B>>>,
    stats: UploadStats,
}

impl<B: Backend> std::fmt::Debug for Context<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .field("current_program", &self.current_program)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

fn check_scale(scale: f32) -> Result<f32, Error> {
    if scale == 1.0 || scale == 2.0 || scale == 4.0 {
        Ok(scale)
    } else {
        Err(Error::InvalidValue(format!(
            "texture environment scale must be 1, 2 or 4, not {scale}"
        )))
    }
}

fn check_pointer(size: i32, stride: i32, sizes: std::ops::RangeInclusive<i32>) -> Result<(), Error> {
    if !sizes.contains(&size) {
        return Err(Error::InvalidValue(format!(
            "pointer size {size} outside {}..={}",
            sizes.start(),
            sizes.end()
        )));
    }
    if stride < 0 {
        return Err(Error::InvalidValue(format!("negative stride {stride}")));
    }
    Ok(())
}

impl<B: Backend> Context<B> {
    pub fn new(backend: B, config: Config) -> Self {
        let units = config.texture_units();
        Context {
            backend,
            transforms: TransformStacks::new(units),
            state: StateModel::new(units),
            cache: VariantCache::new(config.uber_shader, config.max_cached_variants),
            texture_formats: HashMap::new(),
            bound_textures: vec![None; units],
            pass_through: HashSet::new(),
            current_program: None,
            stats: UploadStats::default(),
            config,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &StateModel<B::Buffer> {
        &self.state
    }

    pub fn upload_stats(&self) -> UploadStats {
        self.stats
    }

    pub fn reset_upload_stats(&mut self) {
        self.stats = UploadStats::default();
    }

    /// Programs currently cached.
    pub fn cached_program_count(&self) -> usize {
        self.cache.cached_count()
    }

    /// Program bound by the last draw.
    pub fn current_program(&self) -> Option<&Rc<AssembledProgram<B>>> {
        self.current_program.as_ref()
    }

    // --- capabilities ---

    fn capability_flag(&self, capability: Capability) -> Result<Option<UniformId>, Error> {
        Ok(Some(match capability {
            Capability::Lighting => UniformId::LightingEnabled,
            Capability::Light(n) => self.state.light_enabled_id(n as usize)?,
            Capability::Texture2D => self
                .state
                .texture_uniform(self.state.active_texture(), UniformId::Texture0Enabled)?,
            Capability::Normalize => UniformId::NormalizeEnabled,
            Capability::RescaleNormal => UniformId::RescaleNormalEnabled,
            Capability::Fog => UniformId::FogEnabled,
            Capability::AlphaTest => UniformId::AlphaTestEnabled,
            Capability::ClipPlane(n) => self
                .state
                .clip_plane_uniform(n as usize, UniformId::ClipPlane0Enabled)?,
            _ => return Ok(None),
        }))
    }

    fn set_capability(&mut self, capability: Capability, enabled: bool) -> Result<(), Error> {
        match self.capability_flag(capability)? {
            Some(flag) => self.state.set_bool(flag, enabled),
            None => {
                if enabled {
                    self.pass_through.insert(capability);
                } else {
                    self.pass_through.remove(&capability);
                }
                self.backend.set_capability(capability, enabled);
            }
        }
        Ok(())
    }

    pub fn enable(&mut self, capability: Capability) -> Result<(), Error> {
        self.set_capability(capability, true)
    }

    pub fn disable(&mut self, capability: Capability) -> Result<(), Error> {
        self.set_capability(capability, false)
    }

    pub fn is_enabled(&self, capability: Capability) -> Result<bool, Error> {
        Ok(match self.capability_flag(capability)? {
            Some(flag) => self.state.bool(flag),
            None => self.pass_through.contains(&capability),
        })
    }

    // --- client arrays ---

    fn client_attribute(&self, array: ClientArray) -> AttributeId {
        match array {
            ClientArray::Vertex => AttributeId::Position,
            ClientArray::Normal => AttributeId::Normal,
            ClientArray::Color => AttributeId::Color,
            ClientArray::TextureCoord => AttributeId::tex_coord(self.state.client_active_texture()),
        }
    }

    pub fn enable_client_state(&mut self, array: ClientArray) {
        let id = self.client_attribute(array);
        self.state.set_attribute_enabled(id, true);
    }

    pub fn disable_client_state(&mut self, array: ClientArray) {
        let id = self.client_attribute(array);
        self.state.set_attribute_enabled(id, false);
    }

    pub fn vertex_pointer(
        &mut self,
        size: i32,
        data_type: DataType,
        stride: i32,
        buffer: Option<B::Buffer>,
        offset: i32,
    ) -> Result<(), Error> {
        check_pointer(size, stride, 2..=4)?;
        self.state.set_attribute_pointer(
            AttributeId::Position,
            VertexPointer::new(size, data_type, stride, buffer, offset),
        );
        Ok(())
    }

    pub fn color_pointer(
        &mut self,
        size: i32,
        data_type: DataType,
        stride: i32,
        buffer: Option<B::Buffer>,
        offset: i32,
    ) -> Result<(), Error> {
        check_pointer(size, stride, 3..=4)?;
        self.state.set_attribute_pointer(
            AttributeId::Color,
            VertexPointer::new(size, data_type, stride, buffer, offset),
        );
        Ok(())
    }

    /// Normals always have three components.
    pub fn normal_pointer(
        &mut self,
        data_type: DataType,
        stride: i32,
        buffer: Option<B::Buffer>,
        offset: i32,
    ) -> Result<(), Error> {
        check_pointer(3, stride, 3..=3)?;
        self.state.set_attribute_pointer(
            AttributeId::Normal,
            VertexPointer::new(3, data_type, stride, buffer, offset),
        );
        Ok(())
    }

    /// Texture coordinates of the client-active unit.
    pub fn tex_coord_pointer(
        &mut self,
        size: i32,
        data_type: DataType,
        stride: i32,
        buffer: Option<B::Buffer>,
        offset: i32,
    ) -> Result<(), Error> {
        check_pointer(size, stride, 2..=4)?;
        let id = AttributeId::tex_coord(self.state.client_active_texture());
        self.state
            .set_attribute_pointer(id, VertexPointer::new(size, data_type, stride, buffer, offset));
        Ok(())
    }

    pub fn active_texture(&mut self, unit: usize) -> Result<(), Error> {
        self.state.set_active_texture(unit)?;
        self.backend.active_texture(unit);
        Ok(())
    }

    pub fn client_active_texture(&mut self, unit: usize) -> Result<(), Error> {
        self.state.set_client_active_texture(unit)
    }

    // --- matrix stacks ---

    /// Selects a stack.  The texture stack is the active unit's, and selecting
    /// it marks that unit's texture matrix as in use.
    pub fn matrix_mode(&mut self, mode: MatrixMode) -> Result<(), Error> {
        let unit = self.state.active_texture();
        self.transforms.set_mode(mode, unit)?;
        if mode == MatrixMode::Texture {
            let flag = self.state.texture_uniform(unit, UniformId::Texture0MatrixEnabled)?;
            self.state.set_bool(flag, true);
        }
        Ok(())
    }

    pub fn push_matrix(&mut self) -> Result<(), Error> {
        self.transforms.current_mut().push()
    }

    pub fn pop_matrix(&mut self) -> Result<(), Error> {
        self.transforms.current_mut().pop()
    }

    pub fn load_identity(&mut self) {
        self.transforms.current_mut().load_identity();
    }

    pub fn load_matrix(&mut self, m: Matrix4) {
        self.transforms.current_mut().load(m);
    }

    /// `top = top · m`
    pub fn mult_matrix(&mut self, m: &Matrix4) {
        self.transforms.current_mut().multiply(m);
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.transforms.current_mut().translate(x, y, z);
    }

    /// `angle` is in degrees.
    pub fn rotate(&mut self, angle: f32, x: f32, y: f32, z: f32) {
        self.transforms.current_mut().rotate(angle, x, y, z);
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.transforms.current_mut().scale(x, y, z);
    }

    pub fn frustum(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<(), Error> {
        Ok(self
            .transforms
            .current_mut()
            .frustum(left, right, bottom, top, near, far)?)
    }

    pub fn ortho(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<(), Error> {
        Ok(self
            .transforms
            .current_mut()
            .ortho(left, right, bottom, top, near, far)?)
    }

    pub fn perspective(&mut self, fovy: f32, aspect: f32, near: f32, far: f32) -> Result<(), Error> {
        Ok(self.transforms.current_mut().perspective(fovy, aspect, near, far)?)
    }

    pub fn current_matrix_mode(&self) -> MatrixMode {
        self.transforms.mode()
    }

    pub fn modelview_matrix(&self) -> Matrix4 {
        *self.transforms.model_view()
    }

    pub fn projection_matrix(&self) -> Matrix4 {
        *self.transforms.projection()
    }

    pub fn texture_matrix(&self, unit: usize) -> Result<Matrix4, Error> {
        self.transforms
            .texture(unit)
            .copied()
            .ok_or_else(|| Error::InvalidValue(format!("texture unit {unit} has no matrix stack")))
    }

    // --- lighting ---

    pub fn light(&mut self, n: usize, param: LightParam) -> Result<(), Error> {
        if n >= MAX_LIGHTS {
            return Err(Error::InvalidValue(format!("light {n} is not supported")));
        }
        let light = |first| UniformId::light(n, first);
        match param {
            LightParam::Ambient(c) => self.state.set_vec4(light(UniformId::Light0Ambient), c),
            LightParam::Diffuse(c) => self.state.set_vec4(light(UniformId::Light0Diffuse), c),
            LightParam::Specular(c) => self.state.set_vec4(light(UniformId::Light0Specular), c),
            LightParam::Position(p) => {
                let eye = *self.transforms.model_view() * p;
                if eye.w() == 0.0 && !eye.is_unit() {
                    logwise::warn_sync!(
                        "directional light {n} has non-unit direction {eye}",
                        n = logwise::privacy::LogIt(&n),
                        eye = logwise::privacy::LogIt(&eye)
                    );
                }
                self.state.set_vec4(light(UniformId::Light0Position), eye);
            }
            LightParam::SpotDirection(d) => {
                let eye = self.transforms.model_view().upper_left_3x3().transform(d);
                self.state.set_vec3(light(UniformId::Light0SpotDirection), eye);
            }
            LightParam::SpotExponent(e) => {
                if e > 128.0 {
                    logwise::warn_sync!(
                        "spot exponent {e} of light {n} is over 128",
                        e = logwise::privacy::LogIt(&e),
                        n = logwise::privacy::LogIt(&n)
                    );
                }
                self.state.set_float(light(UniformId::Light0SpotExponent), e);
            }
            LightParam::SpotCutoff(degrees) => {
                if degrees > 90.0 && degrees != 180.0 {
                    logwise::warn_sync!(
                        "spot cutoff {degrees} of light {n} is over 90",
                        degrees = logwise::privacy::LogIt(&degrees),
                        n = logwise::privacy::LogIt(&n)
                    );
                }
                self.state
                    .set_float(light(UniformId::Light0SpotCutoffAngleCos), degrees.to_radians().cos());
            }
            LightParam::ConstantAttenuation(a) => {
                self.state.set_float(light(UniformId::Light0ConstantAttenuation), a)
            }
            LightParam::LinearAttenuation(a) => {
                self.state.set_float(light(UniformId::Light0LinearAttenuation), a)
            }
            LightParam::QuadraticAttenuation(a) => {
                self.state.set_float(light(UniformId::Light0QuadraticAttenuation), a)
            }
        }
        Ok(())
    }

    pub fn light_model(&mut self, param: LightModelParam) {
        match param {
            LightModelParam::TwoSide(b) => self.state.set_bool(UniformId::LightModelTwoSideEnabled, b),
            LightModelParam::Ambient(c) => self.state.set_vec4(UniformId::GlobalAmbientColor, c),
            LightModelParam::LocalViewer(b) => {
                self.state.set_bool(UniformId::LightModelLocalViewerEnabled, b)
            }
        }
    }

    /// `face` is accepted for every value; there is a single material.
    pub fn material(&mut self, _face: Face, param: MaterialParam) {
        match param {
            MaterialParam::Ambient(c) => self.state.set_vec4(UniformId::MaterialAmbient, c),
            MaterialParam::Diffuse(c) => self.state.set_vec4(UniformId::MaterialDiffuse, c),
            MaterialParam::AmbientAndDiffuse(c) => {
                self.state.set_vec4(UniformId::MaterialAmbient, c);
                self.state.set_vec4(UniformId::MaterialDiffuse, c);
            }
            MaterialParam::Specular(c) => self.state.set_vec4(UniformId::MaterialSpecular, c),
            MaterialParam::Emission(c) => self.state.set_vec4(UniformId::MaterialEmission, c),
            MaterialParam::Shininess(s) => {
                if s > 128.0 {
                    logwise::warn_sync!(
                        "material shininess {s} is over 128",
                        s = logwise::privacy::LogIt(&s)
                    );
                }
                self.state.set_float(UniformId::MaterialShininess, s);
            }
        }
    }

    // --- fog, alpha test, hints ---

    pub fn fog(&mut self, param: FogParam) {
        match param {
            FogParam::Mode(mode) => self.state.set_int(UniformId::FogMode, mode.to_gl() as i32),
            FogParam::Density(d) => self.state.set_float(UniformId::FogDensity, d),
            FogParam::Start(s) => self.state.set_float(UniformId::FogStart, s),
            FogParam::End(e) => self.state.set_float(UniformId::FogEnd, e),
            FogParam::Color(c) => self.state.set_vec3(UniformId::FogColor, c.xyz()),
        }
    }

    /// `reference` is clamped to `0..=1`.
    pub fn alpha_func(&mut self, func: AlphaFunc, reference: f32) {
        self.state.set_int(UniformId::AlphaFunc, func.to_gl() as i32);
        self.state
            .set_float(UniformId::AlphaFuncValue, reference.clamp(0.0, 1.0));
    }

    /// Fog and lighting hints select per-vertex or per-fragment code;
    /// `DontCare` picks the per-vertex path.  Other targets go to the backend.
    pub fn hint(&mut self, target: HintTarget, mode: HintMode) {
        let mode = match mode {
            HintMode::DontCare => HintMode::Fastest,
            other => other,
        };
        match target {
            HintTarget::Fog => self.state.set_int(UniformId::FogHint, mode.to_gl() as i32),
            HintTarget::Lighting => self.state.set_int(UniformId::LightingHint, mode.to_gl() as i32),
            other => self.backend.hint(other, mode),
        }
    }

    // --- texture environment ---

    /// Sets a texture environment parameter of the active unit.
    pub fn tex_env(&mut self, param: TexEnvParam) -> Result<(), Error> {
        let unit = self.state.active_texture();
        let unit_uniform = |state: &StateModel<B::Buffer>, first| state.texture_uniform(unit, first);
        match param {
            TexEnvParam::Mode(mode) => {
                let id = unit_uniform(&self.state, UniformId::Texture0EnvMode)?;
                self.state.set_int(id, mode.to_gl() as i32);
            }
            TexEnvParam::CombineRgb(f) => {
                let id = unit_uniform(&self.state, UniformId::Texture0EnvCombineRgb)?;
                self.state.set_int(id, f.to_gl() as i32);
            }
            TexEnvParam::CombineAlpha(f) => {
                let id = unit_uniform(&self.state, UniformId::Texture0EnvCombineAlpha)?;
                self.state.set_int(id, f.to_gl() as i32);
            }
            TexEnvParam::SrcRgb(slot, source) => {
                let value = self.source_value(source)?;
                let id = self.state.tex_env_uniform(unit, UniformId::Texture0EnvSrc0Rgb, slot)?;
                self.state.set_int(id, value);
            }
            TexEnvParam::SrcAlpha(slot, source) => {
                let value = self.source_value(source)?;
                let id = self.state.tex_env_uniform(unit, UniformId::Texture0EnvSrc0Alpha, slot)?;
                self.state.set_int(id, value);
            }
            TexEnvParam::OperandRgb(slot, operand) => {
                let id = self
                    .state
                    .tex_env_uniform(unit, UniformId::Texture0EnvOperand0Rgb, slot)?;
                self.state.set_int(id, operand.to_gl() as i32);
            }
            TexEnvParam::OperandAlpha(slot, operand) => {
                let id = self
                    .state
                    .tex_env_uniform(unit, UniformId::Texture0EnvOperand0Alpha, slot)?;
                self.state.set_int(id, operand.to_gl() as i32);
            }
            TexEnvParam::RgbScale(scale) => {
                let scale = check_scale(scale)?;
                let id = unit_uniform(&self.state, UniformId::Texture0EnvRgbScale)?;
                self.state.set_float(id, scale);
            }
            TexEnvParam::AlphaScale(scale) => {
                let scale = check_scale(scale)?;
                let id = unit_uniform(&self.state, UniformId::Texture0EnvAlphaScale)?;
                self.state.set_float(id, scale);
            }
            TexEnvParam::Color(c) => {
                let id = unit_uniform(&self.state, UniformId::Texture0EnvColor)?;
                self.state.set_vec4(id, c);
            }
            TexEnvParam::BlurAmount(amount) => {
                if amount < 0.0 {
                    return Err(Error::InvalidValue(format!("negative blur amount {amount}")));
                }
                let id = unit_uniform(&self.state, UniformId::Texture0EnvBlurAmount)?;
                self.state.set_float(id, amount);
            }
        }
        Ok(())
    }

    fn source_value(&self, source: TexEnvSource) -> Result<i32, Error> {
        if let TexEnvSource::TextureUnit(n) = source {
            if n as usize >= self.state.texture_units() {
                return Err(Error::InvalidValue(format!(
                    "combiner source GL_TEXTURE{n} is out of range"
                )));
            }
        }
        Ok(source.state_value(self.state.active_texture()))
    }

    // --- textures ---

    fn refresh_texture_format(&mut self) -> Result<(), Error> {
        let unit = self.state.active_texture();
        let format = self.bound_textures[unit]
            .as_ref()
            .and_then(|t| self.texture_formats.get(t))
            .copied()
            .unwrap_or(TextureFormat::Rgba);
        let id = self.state.texture_uniform(unit, UniformId::Texture0Format)?;
        self.state.set_int(id, format.to_gl() as i32);
        Ok(())
    }

    /// Binds `texture` to the active unit.
    pub fn bind_texture(&mut self, texture: Option<B::Texture>) -> Result<(), Error> {
        let unit = self.state.active_texture();
        self.backend.bind_texture(texture.as_ref());
        self.bound_textures[unit] = texture;
        self.refresh_texture_format()
    }

    /// Specifies the image of the texture bound to the active unit.
    pub fn tex_image_2d(
        &mut self,
        level: i32,
        format: TextureFormat,
        width: i32,
        height: i32,
        pixels: Option<&[u8]>,
    ) -> Result<(), Error> {
        if level < 0 || width < 0 || height < 0 {
            return Err(Error::InvalidValue(format!(
                "texture image level {level} of {width}x{height}"
            )));
        }
        let unit = self.state.active_texture();
        if level == 0 {
            if let Some(texture) = self.bound_textures[unit].clone() {
                self.texture_formats.insert(texture, format);
            }
        }
        self.refresh_texture_format()?;
        self.backend.tex_image_2d(level, format, width, height, pixels);
        Ok(())
    }

    /// Forgets the format of a texture the client deleted.
    pub fn forget_texture(&mut self, texture: &B::Texture) {
        self.texture_formats.remove(texture);
    }

    // --- clip planes ---

    /// Stores `equation` in eye space, transformed by the inverse transpose of
    /// the current model-view.
    pub fn clip_plane(&mut self, n: usize, equation: Vector4) -> Result<(), Error> {
        if n >= MAX_CLIP_PLANES {
            return Err(Error::InvalidValue(format!("clip plane {n} is not supported")));
        }
        let inverse = self.transforms.model_view().inverse()?;
        let eye = inverse.transpose() * equation;
        let id = self.state.clip_plane_uniform(n, UniformId::ClipPlane0Equation)?;
        self.state.set_vec4(id, eye);
        Ok(())
    }

    pub fn get_clip_plane(&self, n: usize) -> Result<Vector4, Error> {
        let id = self.state.clip_plane_uniform(n, UniformId::ClipPlane0Equation)?;
        Ok(self.state.value(id).as_vec4().unwrap_or(Vector4::ZERO))
    }

    // --- draws ---

    pub fn draw_arrays(&mut self, mode: Primitive, first: i32, count: i32) -> Result<(), Error> {
        if first < 0 || count < 0 {
            return Err(Error::InvalidValue(format!(
                "draw of {count} vertices from {first}"
            )));
        }
        self.prepare_draw()?;
        self.backend.draw_arrays(mode, first, count);
        Ok(())
    }

    pub fn draw_elements(
        &mut self,
        mode: Primitive,
        count: i32,
        index_type: IndexType,
        offset: i32,
    ) -> Result<(), Error> {
        if count < 0 || offset < 0 {
            return Err(Error::InvalidValue(format!(
                "draw of {count} indices at offset {offset}"
            )));
        }
        self.prepare_draw()?;
        self.backend.draw_elements(mode, count, index_type, offset);
        Ok(())
    }

    fn update_derived_state(&mut self) {
        let model_view = *self.transforms.model_view();
        let projection = *self.transforms.projection();
        self.state.set_mat4(UniformId::ModelViewMatrix, model_view);
        self.state
            .set_mat4(UniformId::ModelViewProjectionMatrix, projection * model_view);

        if self.state.bool(UniformId::NormalEnabled) {
            let normal = model_view.upper_left_3x3().adjoint().transpose();
            self.state
                .set_mat3(UniformId::TransposeAdjointModelViewMatrix, normal);
            let m = &normal.0;
            let length = (m[0] * m[0] + m[3] * m[3] + m[6] * m[6]).sqrt();
            if length > 0.0 {
                self.state.set_float(UniformId::RescaleNormalFactor, 1.0 / length);
            }
        }

        for unit in 0..self.state.texture_units() {
            if !self.state.bool(UniformId::TexCoord0Enabled.nth(unit)) {
                continue;
            }
            if let Some(m) = self.transforms.texture(unit) {
                self.state.set_mat4(UniformId::Texture0Matrix.nth(unit), *m);
            }
        }

        self.state.update_non_directional_light();
    }

    fn prepare_draw(&mut self) -> Result<(), Error> {
        self.update_derived_state();
        let program = self.cache.resolve(&mut self.backend, &self.state)?;

        let switched = !self
            .current_program
            .as_ref()
            .is_some_and(|current| Rc::ptr_eq(current, &program));
        if switched {
            logwise::trace_sync!(
                "switching to {name}",
                name = logwise::privacy::LogIt(&program.name())
            );
            self.state.invalidate_uploads();
            for (id, location) in program.attributes() {
                self.state.attribute_mut(*id).set_location(Some(*location));
            }
            self.backend.use_program(Some(program.program()));
            self.current_program = Some(program.clone());
        }

        for (id, location) in program.attributes() {
            let attribute = self.state.attribute_mut(*id);
            if attribute.enabled.is_dirty() {
                self.backend
                    .set_attribute_enabled(*location, *attribute.enabled.get());
                attribute.enabled.mark_submitted();
                self.stats.attribute_toggles += 1;
            }
            if *attribute.enabled.get() && attribute.pointer.is_dirty() {
                self.backend
                    .vertex_attrib_pointer(*location, attribute.pointer.get());
                attribute.pointer.mark_submitted();
                self.stats.pointer_uploads += 1;
            }
        }

        for (id, location) in program.uniforms() {
            let tracked = self.state.tracked_mut(*id);
            if !tracked.is_dirty() {
                continue;
            }
            upload(&mut self.backend, location, tracked.get());
            tracked.mark_submitted();
            self.stats.uniform_uploads += 1;
        }
        Ok(())
    }

    /// Releases every program.  The context stays usable; the next draw
    /// rebuilds what it needs.
    pub fn destroy(&mut self) {
        if self.current_program.take().is_some() {
            self.backend.use_program(None);
        }
        self.cache.destroy(&mut self.backend);
        self.state.invalidate_uploads();
    }
}

impl<B: Backend> Drop for Context<B> {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn upload<B: Backend>(backend: &mut B, location: &B::UniformLocation, value: &UniformValue) {
    match value {
        UniformValue::Bool(b) => backend.uniform_1i(location, i32::from(*b)),
        UniformValue::Int(i) => backend.uniform_1i(location, *i),
        UniformValue::Float(f) => backend.uniform_1f(location, *f),
        UniformValue::Vec3(v) => backend.uniform_3f(location, &v.0),
        UniformValue::Vec4(v) => backend.uniform_4f(location, &v.0),
        UniformValue::Mat3(m) => backend.uniform_matrix_3(location, &m.0),
        UniformValue::Mat4(m) => backend.uniform_matrix_4(location, &m.0),
    }
}
