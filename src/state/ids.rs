// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Semantic identifiers for every attribute and uniform the fragment catalog declares.
//!
//! Locations differ per program; these IDs do not.

/// Texture units the fragment catalog is written for.
pub const MAX_TEXTURE_UNITS: usize = 3;
pub const MAX_LIGHTS: usize = 3;
pub const MAX_CLIP_PLANES: usize = 6;
/// Uniforms per light, laid out light-major starting at [`UniformId::Light0Ambient`].
pub const LIGHT_STRIDE: usize = 10;
/// Shader-affecting booleans occupy `0..BOOL_COUNT`.
pub const BOOL_COUNT: usize = UniformId::FogMode.index();
/// Shader-affecting integers follow the booleans.
pub const INT_COUNT: usize = UniformId::LightingHint.index() + 1 - UniformId::FogMode.index();

macro_rules! semantic_ids {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $glsl:literal, $define:expr,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $($variant,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];
            pub const COUNT: usize = Self::ALL.len();

            /// Name of the declaration in GLSL.
            pub const fn glsl_name(self) -> &'static str {
                match self {
                    $($name::$variant => $glsl,)*
                }
            }

            /// Preprocessor name, for values that select a variant.
            pub const fn define_name(self) -> Option<&'static str> {
                match self {
                    $($name::$variant => $define,)*
                }
            }

            pub const fn index(self) -> usize {
                self as usize
            }

            pub fn from_index(index: usize) -> Option<Self> {
                Self::ALL.get(index).copied()
            }

            /// The ID `n` places after this one within a family.
            ///
            /// Callers validate unit and light indices first; stepping past the
            /// end of the table is a bug.
            pub(crate) fn nth(self, n: usize) -> Self {
                Self::ALL[self.index() + n]
            }
        }
    };
}

semantic_ids! {
    /// Per-vertex inputs.
    pub enum AttributeId {
        Position => "a_position", None,
        Normal => "a_normal", None,
        Color => "a_color", None,
        TexCoord0 => "a_texCoord0", None,
        TexCoord1 => "a_texCoord1", None,
        TexCoord2 => "a_texCoord2", None,
    }
}

semantic_ids! {
    /// Uniforms, grouped as shader-affecting booleans, shader-affecting
    /// integers, then value-only uniforms.
    ///
    /// Families indexed by texture unit, light or clip plane are contiguous so
    /// that [`UniformId::nth`] can step through them.
    pub enum UniformId {
        PositionEnabled => "u_positionEnabled", Some("POSITION_ENABLED"),
        NormalEnabled => "u_normalEnabled", Some("NORMAL_ENABLED"),
        ColorEnabled => "u_colorEnabled", Some("COLOR_ENABLED"),
        TexCoord0Enabled => "u_texCoord0Enabled", Some("TEXCOORD0_ENABLED"),
        TexCoord1Enabled => "u_texCoord1Enabled", Some("TEXCOORD1_ENABLED"),
        TexCoord2Enabled => "u_texCoord2Enabled", Some("TEXCOORD2_ENABLED"),
        LightingEnabled => "u_lightingEnabled", Some("LIGHTING_ENABLED"),
        LightModelLocalViewerEnabled => "u_lightModelLocalViewerEnabled", Some("LIGHT_MODEL_LOCAL_VIEWER_ENABLED"),
        LightModelTwoSideEnabled => "u_lightModelTwoSideEnabled", Some("LIGHT_MODEL_TWO_SIDE_ENABLED"),
        Light0Enabled => "u_light0Enabled", Some("LIGHT0_ENABLED"),
        Light1Enabled => "u_light1Enabled", Some("LIGHT1_ENABLED"),
        Light2Enabled => "u_light2Enabled", Some("LIGHT2_ENABLED"),
        Texture0Enabled => "u_texture0Enabled", Some("TEXTURE0_ENABLED"),
        Texture1Enabled => "u_texture1Enabled", Some("TEXTURE1_ENABLED"),
        Texture2Enabled => "u_texture2Enabled", Some("TEXTURE2_ENABLED"),
        Texture0MatrixEnabled => "u_texture0MatrixEnabled", Some("TEXTURE0_MATRIX_ENABLED"),
        Texture1MatrixEnabled => "u_texture1MatrixEnabled", Some("TEXTURE1_MATRIX_ENABLED"),
        Texture2MatrixEnabled => "u_texture2MatrixEnabled", Some("TEXTURE2_MATRIX_ENABLED"),
        FogEnabled => "u_fogEnabled", Some("FOG_ENABLED"),
        AlphaTestEnabled => "u_alphaTestEnabled", Some("ALPHA_TEST_ENABLED"),
        ClipPlane0Enabled => "u_clipPlane0Enabled", Some("CLIP_PLANE0_ENABLED"),
        ClipPlane1Enabled => "u_clipPlane1Enabled", Some("CLIP_PLANE1_ENABLED"),
        ClipPlane2Enabled => "u_clipPlane2Enabled", Some("CLIP_PLANE2_ENABLED"),
        ClipPlane3Enabled => "u_clipPlane3Enabled", Some("CLIP_PLANE3_ENABLED"),
        ClipPlane4Enabled => "u_clipPlane4Enabled", Some("CLIP_PLANE4_ENABLED"),
        ClipPlane5Enabled => "u_clipPlane5Enabled", Some("CLIP_PLANE5_ENABLED"),
        RescaleNormalEnabled => "u_rescaleNormalEnabled", Some("RESCALE_NORMAL_ENABLED"),
        NormalizeEnabled => "u_normalizeEnabled", Some("NORMALIZE_ENABLED"),
        NonDirectionalLightEnabled => "u_nonDirectionalLightEnabled", Some("NON_DIRECTIONAL_LIGHT_ENABLED"),
        // shader-affecting integers
        FogMode => "u_fogMode", Some("FOG_MODE"),
        FogHint => "u_fogHint", Some("FOG_HINT"),
        AlphaFunc => "u_alphaFunc", Some("ALPHA_FUNC"),
        Texture0Format => "u_texture0Format", Some("TEXTURE0_FORMAT"),
        Texture1Format => "u_texture1Format", Some("TEXTURE1_FORMAT"),
        Texture2Format => "u_texture2Format", Some("TEXTURE2_FORMAT"),
        Texture0EnvMode => "u_texture0EnvMode", Some("TEXTURE0_ENV_MODE"),
        Texture1EnvMode => "u_texture1EnvMode", Some("TEXTURE1_ENV_MODE"),
        Texture2EnvMode => "u_texture2EnvMode", Some("TEXTURE2_ENV_MODE"),
        Texture0EnvCombineRgb => "u_texture0EnvCombineRGB", Some("TEXTURE0_ENV_COMBINE_RGB"),
        Texture1EnvCombineRgb => "u_texture1EnvCombineRGB", Some("TEXTURE1_ENV_COMBINE_RGB"),
        Texture2EnvCombineRgb => "u_texture2EnvCombineRGB", Some("TEXTURE2_ENV_COMBINE_RGB"),
        Texture0EnvCombineAlpha => "u_texture0EnvCombineAlpha", Some("TEXTURE0_ENV_COMBINE_ALPHA"),
        Texture1EnvCombineAlpha => "u_texture1EnvCombineAlpha", Some("TEXTURE1_ENV_COMBINE_ALPHA"),
        Texture2EnvCombineAlpha => "u_texture2EnvCombineAlpha", Some("TEXTURE2_ENV_COMBINE_ALPHA"),
        Texture0EnvSrc0Rgb => "u_texture0EnvSrc0RGB", Some("TEXTURE0_ENV_SRC0_RGB"),
        Texture0EnvSrc1Rgb => "u_texture0EnvSrc1RGB", Some("TEXTURE0_ENV_SRC1_RGB"),
        Texture0EnvSrc2Rgb => "u_texture0EnvSrc2RGB", Some("TEXTURE0_ENV_SRC2_RGB"),
        Texture1EnvSrc0Rgb => "u_texture1EnvSrc0RGB", Some("TEXTURE1_ENV_SRC0_RGB"),
        Texture1EnvSrc1Rgb => "u_texture1EnvSrc1RGB", Some("TEXTURE1_ENV_SRC1_RGB"),
        Texture1EnvSrc2Rgb => "u_texture1EnvSrc2RGB", Some("TEXTURE1_ENV_SRC2_RGB"),
        Texture2EnvSrc0Rgb => "u_texture2EnvSrc0RGB", Some("TEXTURE2_ENV_SRC0_RGB"),
        Texture2EnvSrc1Rgb => "u_texture2EnvSrc1RGB", Some("TEXTURE2_ENV_SRC1_RGB"),
        Texture2EnvSrc2Rgb => "u_texture2EnvSrc2RGB", Some("TEXTURE2_ENV_SRC2_RGB"),
        Texture0EnvOperand0Rgb => "u_texture0EnvOperand0RGB", Some("TEXTURE0_ENV_OPERAND0_RGB"),
        Texture0EnvOperand1Rgb => "u_texture0EnvOperand1RGB", Some("TEXTURE0_ENV_OPERAND1_RGB"),
        Texture0EnvOperand2Rgb => "u_texture0EnvOperand2RGB", Some("TEXTURE0_ENV_OPERAND2_RGB"),
        Texture1EnvOperand0Rgb => "u_texture1EnvOperand0RGB", Some("TEXTURE1_ENV_OPERAND0_RGB"),
        Texture1EnvOperand1Rgb => "u_texture1EnvOperand1RGB", Some("TEXTURE1_ENV_OPERAND1_RGB"),
        Texture1EnvOperand2Rgb => "u_texture1EnvOperand2RGB", Some("TEXTURE1_ENV_OPERAND2_RGB"),
        Texture2EnvOperand0Rgb => "u_texture2EnvOperand0RGB", Some("TEXTURE2_ENV_OPERAND0_RGB"),
        Texture2EnvOperand1Rgb => "u_texture2EnvOperand1RGB", Some("TEXTURE2_ENV_OPERAND1_RGB"),
        Texture2EnvOperand2Rgb => "u_texture2EnvOperand2RGB", Some("TEXTURE2_ENV_OPERAND2_RGB"),
        Texture0EnvSrc0Alpha => "u_texture0EnvSrc0Alpha", Some("TEXTURE0_ENV_SRC0_ALPHA"),
        Texture0EnvSrc1Alpha => "u_texture0EnvSrc1Alpha", Some("TEXTURE0_ENV_SRC1_ALPHA"),
        Texture0EnvSrc2Alpha => "u_texture0EnvSrc2Alpha", Some("TEXTURE0_ENV_SRC2_ALPHA"),
        Texture1EnvSrc0Alpha => "u_texture1EnvSrc0Alpha", Some("TEXTURE1_ENV_SRC0_ALPHA"),
        Texture1EnvSrc1Alpha => "u_texture1EnvSrc1Alpha", Some("TEXTURE1_ENV_SRC1_ALPHA"),
        Texture1EnvSrc2Alpha => "u_texture1EnvSrc2Alpha", Some("TEXTURE1_ENV_SRC2_ALPHA"),
        Texture2EnvSrc0Alpha => "u_texture2EnvSrc0Alpha", Some("TEXTURE2_ENV_SRC0_ALPHA"),
        Texture2EnvSrc1Alpha => "u_texture2EnvSrc1Alpha", Some("TEXTURE2_ENV_SRC1_ALPHA"),
        Texture2EnvSrc2Alpha => "u_texture2EnvSrc2Alpha", Some("TEXTURE2_ENV_SRC2_ALPHA"),
        Texture0EnvOperand0Alpha => "u_texture0EnvOperand0Alpha", Some("TEXTURE0_ENV_OPERAND0_ALPHA"),
        Texture0EnvOperand1Alpha => "u_texture0EnvOperand1Alpha", Some("TEXTURE0_ENV_OPERAND1_ALPHA"),
        Texture0EnvOperand2Alpha => "u_texture0EnvOperand2Alpha", Some("TEXTURE0_ENV_OPERAND2_ALPHA"),
        Texture1EnvOperand0Alpha => "u_texture1EnvOperand0Alpha", Some("TEXTURE1_ENV_OPERAND0_ALPHA"),
        Texture1EnvOperand1Alpha => "u_texture1EnvOperand1Alpha", Some("TEXTURE1_ENV_OPERAND1_ALPHA"),
        Texture1EnvOperand2Alpha => "u_texture1EnvOperand2Alpha", Some("TEXTURE1_ENV_OPERAND2_ALPHA"),
        Texture2EnvOperand0Alpha => "u_texture2EnvOperand0Alpha", Some("TEXTURE2_ENV_OPERAND0_ALPHA"),
        Texture2EnvOperand1Alpha => "u_texture2EnvOperand1Alpha", Some("TEXTURE2_ENV_OPERAND1_ALPHA"),
        Texture2EnvOperand2Alpha => "u_texture2EnvOperand2Alpha", Some("TEXTURE2_ENV_OPERAND2_ALPHA"),
        LightingHint => "u_lightingHint", Some("LIGHTING_HINT"),
        // value-only
        ModelViewProjectionMatrix => "u_modelViewProjectionMatrix", None,
        ModelViewMatrix => "u_modelViewMatrix", None,
        TransposeAdjointModelViewMatrix => "u_transposeAdjointModelViewMatrix", None,
        Texture0Matrix => "u_texture0Matrix", None,
        Texture1Matrix => "u_texture1Matrix", None,
        Texture2Matrix => "u_texture2Matrix", None,
        Texture0Sampler => "u_texture0Sampler", None,
        Texture1Sampler => "u_texture1Sampler", None,
        Texture2Sampler => "u_texture2Sampler", None,
        Texture0EnvColor => "u_texture0EnvColor", None,
        Texture1EnvColor => "u_texture1EnvColor", None,
        Texture2EnvColor => "u_texture2EnvColor", None,
        Texture0EnvRgbScale => "u_texture0EnvRGBScale", None,
        Texture1EnvRgbScale => "u_texture1EnvRGBScale", None,
        Texture2EnvRgbScale => "u_texture2EnvRGBScale", None,
        Texture0EnvAlphaScale => "u_texture0EnvAlphaScale", None,
        Texture1EnvAlphaScale => "u_texture1EnvAlphaScale", None,
        Texture2EnvAlphaScale => "u_texture2EnvAlphaScale", None,
        Texture0EnvBlurAmount => "u_texture0EnvBlurAmount", None,
        Texture1EnvBlurAmount => "u_texture1EnvBlurAmount", None,
        Texture2EnvBlurAmount => "u_texture2EnvBlurAmount", None,
        RescaleNormalFactor => "u_rescaleNormalFactor", None,
        Light0Ambient => "u_light0Ambient", None,
        Light0Diffuse => "u_light0Diffuse", None,
        Light0Specular => "u_light0Specular", None,
        Light0Position => "u_light0Position", None,
        Light0SpotDirection => "u_light0SpotDirection", None,
        Light0SpotExponent => "u_light0SpotExponent", None,
        Light0SpotCutoffAngleCos => "u_light0SpotCutoffAngleCos", None,
        Light0ConstantAttenuation => "u_light0ConstantAttenuation", None,
        Light0LinearAttenuation => "u_light0LinearAttenuation", None,
        Light0QuadraticAttenuation => "u_light0QuadraticAttenuation", None,
        Light1Ambient => "u_light1Ambient", None,
        Light1Diffuse => "u_light1Diffuse", None,
        Light1Specular => "u_light1Specular", None,
        Light1Position => "u_light1Position", None,
        Light1SpotDirection => "u_light1SpotDirection", None,
        Light1SpotExponent => "u_light1SpotExponent", None,
        Light1SpotCutoffAngleCos => "u_light1SpotCutoffAngleCos", None,
        Light1ConstantAttenuation => "u_light1ConstantAttenuation", None,
        Light1LinearAttenuation => "u_light1LinearAttenuation", None,
        Light1QuadraticAttenuation => "u_light1QuadraticAttenuation", None,
        Light2Ambient => "u_light2Ambient", None,
        Light2Diffuse => "u_light2Diffuse", None,
        Light2Specular => "u_light2Specular", None,
        Light2Position => "u_light2Position", None,
        Light2SpotDirection => "u_light2SpotDirection", None,
        Light2SpotExponent => "u_light2SpotExponent", None,
        Light2SpotCutoffAngleCos => "u_light2SpotCutoffAngleCos", None,
        Light2ConstantAttenuation => "u_light2ConstantAttenuation", None,
        Light2LinearAttenuation => "u_light2LinearAttenuation", None,
        Light2QuadraticAttenuation => "u_light2QuadraticAttenuation", None,
        MaterialAmbient => "u_materialAmbient", None,
        MaterialDiffuse => "u_materialDiffuse", None,
        MaterialSpecular => "u_materialSpecular", None,
        MaterialEmission => "u_materialEmission", None,
        MaterialShininess => "u_materialShininess", None,
        FogColor => "u_fogColor", None,
        FogDensity => "u_fogDensity", None,
        FogStart => "u_fogStart", None,
        FogEnd => "u_fogEnd", None,
        AlphaFuncValue => "u_alphaFuncValue", None,
        ClipPlane0Equation => "u_clipPlane0Equation", None,
        ClipPlane1Equation => "u_clipPlane1Equation", None,
        ClipPlane2Equation => "u_clipPlane2Equation", None,
        ClipPlane3Equation => "u_clipPlane3Equation", None,
        ClipPlane4Equation => "u_clipPlane4Equation", None,
        ClipPlane5Equation => "u_clipPlane5Equation", None,
        GlobalAmbientColor => "u_globalAmbientColor", None,
    }
}

impl UniformId {
    pub fn is_bool(self) -> bool {
        self.index() < BOOL_COUNT
    }

    pub fn is_int(self) -> bool {
        (BOOL_COUNT..BOOL_COUNT + INT_COUNT).contains(&self.index())
    }

    /// Whether the value takes part in variant selection.
    pub fn is_shader_affecting(self) -> bool {
        self.index() < BOOL_COUNT + INT_COUNT
    }

    /// Position of `self` within the `len` IDs starting at `first`.
    pub(crate) fn offset_in(self, first: UniformId, len: usize) -> Option<usize> {
        let index = self.index();
        (first.index()..first.index() + len)
            .contains(&index)
            .then(|| index - first.index())
    }

    pub(crate) fn light(n: usize, first: UniformId) -> UniformId {
        first.nth(n * LIGHT_STRIDE)
    }

    /// Per-unit texture environment source/operand slot `i` for `unit`.
    pub(crate) fn tex_env_slot(first: UniformId, unit: usize, i: usize) -> UniformId {
        first.nth(unit * 3 + i)
    }
}

impl AttributeId {
    pub(crate) fn tex_coord(unit: usize) -> AttributeId {
        AttributeId::TexCoord0.nth(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn group_sizes() {
        assert_eq!(BOOL_COUNT, 29);
        assert_eq!(INT_COUNT, 52);
        assert_eq!(UniformId::COUNT, 150);
        assert_eq!(AttributeId::COUNT, 6);
        assert!(UniformId::NonDirectionalLightEnabled.is_bool());
        assert!(UniformId::FogMode.is_int());
        assert!(!UniformId::ModelViewMatrix.is_shader_affecting());
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn families_are_contiguous() {
        assert_eq!(UniformId::Texture0Enabled.nth(2), UniformId::Texture2Enabled);
        assert_eq!(UniformId::Light0Enabled.nth(1), UniformId::Light1Enabled);
        assert_eq!(UniformId::ClipPlane0Equation.nth(5), UniformId::ClipPlane5Equation);
        assert_eq!(
            UniformId::light(2, UniformId::Light0SpotExponent),
            UniformId::Light2SpotExponent
        );
        assert_eq!(
            UniformId::tex_env_slot(UniformId::Texture0EnvSrc0Rgb, 1, 2),
            UniformId::Texture1EnvSrc2Rgb
        );
        assert_eq!(
            UniformId::tex_env_slot(UniformId::Texture0EnvOperand0Alpha, 2, 0),
            UniformId::Texture2EnvOperand0Alpha
        );
        assert_eq!(AttributeId::tex_coord(1), AttributeId::TexCoord1);
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn only_shader_affecting_values_have_defines() {
        for id in UniformId::ALL {
            assert_eq!(id.define_name().is_some(), id.is_shader_affecting(), "{id:?}");
        }
        assert_eq!(UniformId::Texture1EnvCombineRgb.glsl_name(), "u_texture1EnvCombineRGB");
        assert_eq!(UniformId::Texture1EnvCombineRgb.define_name(), Some("TEXTURE1_ENV_COMBINE_RGB"));
    }
}
