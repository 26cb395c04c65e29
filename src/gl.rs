// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! OpenGL ES 1.x enumerants and the typed parameters built from them.
//!
//! The engine's API takes the typed enums.  Each one converts from the raw
//! constant with `from_gl`, rejecting values that don't belong to it, and back
//! with `to_gl`; the raw value is what ends up in the shader-variant key and in
//! the generated `#define`s.

use crate::error::Error;

pub const MODELVIEW: u32 = 0x1700;
pub const PROJECTION: u32 = 0x1701;
pub const TEXTURE: u32 = 0x1702;

pub const LIGHTING: u32 = 0x0B50;
pub const LIGHT0: u32 = 0x4000;
pub const LIGHT7: u32 = 0x4007;
pub const TEXTURE_2D: u32 = 0x0DE1;
pub const CULL_FACE: u32 = 0x0B44;
pub const BLEND: u32 = 0x0BE2;
pub const DITHER: u32 = 0x0BD0;
pub const STENCIL_TEST: u32 = 0x0B90;
pub const DEPTH_TEST: u32 = 0x0B71;
pub const SCISSOR_TEST: u32 = 0x0C11;
pub const POLYGON_OFFSET_FILL: u32 = 0x8037;
pub const SAMPLE_ALPHA_TO_COVERAGE: u32 = 0x809E;
pub const SAMPLE_COVERAGE: u32 = 0x80A0;
pub const NORMALIZE: u32 = 0x0BA1;
pub const RESCALE_NORMAL: u32 = 0x803A;
pub const FOG: u32 = 0x0B60;
pub const ALPHA_TEST: u32 = 0x0BC0;
pub const CLIP_PLANE0: u32 = 0x3000;
pub const CLIP_PLANE5: u32 = 0x3005;

pub const VERTEX_ARRAY: u32 = 0x8074;
pub const NORMAL_ARRAY: u32 = 0x8075;
pub const COLOR_ARRAY: u32 = 0x8076;
pub const TEXTURE_COORD_ARRAY: u32 = 0x8078;

pub const EXP: u32 = 0x0800;
pub const EXP2: u32 = 0x0801;
pub const LINEAR: u32 = 0x2601;

pub const PERSPECTIVE_CORRECTION_HINT: u32 = 0x0C50;
pub const POINT_SMOOTH_HINT: u32 = 0x0C51;
pub const LINE_SMOOTH_HINT: u32 = 0x0C52;
pub const FOG_HINT: u32 = 0x0C54;
pub const GENERATE_MIPMAP_HINT: u32 = 0x8192;
pub const DONT_CARE: u32 = 0x1100;
pub const FASTEST: u32 = 0x1101;
pub const NICEST: u32 = 0x1102;

pub const NEVER: u32 = 0x0200;
pub const LESS: u32 = 0x0201;
pub const EQUAL: u32 = 0x0202;
pub const LEQUAL: u32 = 0x0203;
pub const GREATER: u32 = 0x0204;
pub const NOTEQUAL: u32 = 0x0205;
pub const GEQUAL: u32 = 0x0206;
pub const ALWAYS: u32 = 0x0207;

pub const ALPHA: u32 = 0x1906;
pub const RGB: u32 = 0x1907;
pub const RGBA: u32 = 0x1908;
pub const LUMINANCE: u32 = 0x1909;
pub const LUMINANCE_ALPHA: u32 = 0x190A;

pub const MODULATE: u32 = 0x2100;
pub const DECAL: u32 = 0x2101;
pub const ADD: u32 = 0x0104;
pub const REPLACE: u32 = 0x1E01;
pub const COMBINE: u32 = 0x8570;
pub const ADD_SIGNED: u32 = 0x8574;
pub const INTERPOLATE: u32 = 0x8575;
pub const SUBTRACT: u32 = 0x84E7;
pub const DOT3_RGB: u32 = 0x86AE;
pub const DOT3_RGBA: u32 = 0x86AF;
pub const CONSTANT: u32 = 0x8576;
pub const PRIMARY_COLOR: u32 = 0x8577;
pub const PREVIOUS: u32 = 0x8578;
pub const SRC_COLOR: u32 = 0x0300;
pub const ONE_MINUS_SRC_COLOR: u32 = 0x0301;
pub const SRC_ALPHA: u32 = 0x0302;
pub const ONE_MINUS_SRC_ALPHA: u32 = 0x0303;
pub const TEXTURE0: u32 = 0x84C0;
pub const TEXTURE31: u32 = 0x84DF;

pub const FRONT: u32 = 0x0404;
pub const BACK: u32 = 0x0405;
pub const FRONT_AND_BACK: u32 = 0x0408;

pub const POINTS: u32 = 0x0000;
pub const LINES: u32 = 0x0001;
pub const LINE_LOOP: u32 = 0x0002;
pub const LINE_STRIP: u32 = 0x0003;
pub const TRIANGLES: u32 = 0x0004;
pub const TRIANGLE_STRIP: u32 = 0x0005;
pub const TRIANGLE_FAN: u32 = 0x0006;

pub const BYTE: u32 = 0x1400;
pub const UNSIGNED_BYTE: u32 = 0x1401;
pub const SHORT: u32 = 0x1402;
pub const UNSIGNED_SHORT: u32 = 0x1403;
pub const FLOAT: u32 = 0x1406;
pub const FIXED: u32 = 0x140C;

macro_rules! gl_enum {
    ($(#[$meta:meta])* $name:ident, $what:literal { $($variant:ident = $value:path),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn from_gl(value: u32) -> Result<Self, Error> {
                match value {
                    $(v if v == $value => Ok($name::$variant),)+
                    _ => Err(Error::InvalidEnum { what: $what, value }),
                }
            }

            pub fn to_gl(self) -> u32 {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }
    };
}

gl_enum!(ClientArray, "client array" {
    Vertex = VERTEX_ARRAY,
    Normal = NORMAL_ARRAY,
    Color = COLOR_ARRAY,
    TextureCoord = TEXTURE_COORD_ARRAY,
});

gl_enum!(FogMode, "fog mode" {
    Linear = LINEAR,
    Exp = EXP,
    Exp2 = EXP2,
});

gl_enum!(HintMode, "hint mode" {
    DontCare = DONT_CARE,
    Fastest = FASTEST,
    Nicest = NICEST,
});

gl_enum!(AlphaFunc, "alpha function" {
    Never = NEVER,
    Less = LESS,
    Equal = EQUAL,
    LessEqual = LEQUAL,
    Greater = GREATER,
    NotEqual = NOTEQUAL,
    GreaterEqual = GEQUAL,
    Always = ALWAYS,
});

gl_enum!(
    /// Internal format of a texture image, tracked per texture object.
    TextureFormat, "texture format" {
    Alpha = ALPHA,
    Rgb = RGB,
    Rgba = RGBA,
    Luminance = LUMINANCE,
    LuminanceAlpha = LUMINANCE_ALPHA,
});

gl_enum!(TexEnvMode, "texture environment mode" {
    Modulate = MODULATE,
    Add = ADD,
    Decal = DECAL,
    Blend = BLEND,
    Replace = REPLACE,
    Combine = COMBINE,
});

gl_enum!(CombineRgb, "GL_COMBINE_RGB function" {
    Replace = REPLACE,
    Modulate = MODULATE,
    Add = ADD,
    AddSigned = ADD_SIGNED,
    Interpolate = INTERPOLATE,
    Subtract = SUBTRACT,
    Dot3Rgb = DOT3_RGB,
    Dot3Rgba = DOT3_RGBA,
});

gl_enum!(CombineAlpha, "GL_COMBINE_ALPHA function" {
    Replace = REPLACE,
    Modulate = MODULATE,
    Add = ADD,
    AddSigned = ADD_SIGNED,
    Interpolate = INTERPOLATE,
    Subtract = SUBTRACT,
});

gl_enum!(OperandRgb, "rgb operand" {
    SrcColor = SRC_COLOR,
    OneMinusSrcColor = ONE_MINUS_SRC_COLOR,
    SrcAlpha = SRC_ALPHA,
    OneMinusSrcAlpha = ONE_MINUS_SRC_ALPHA,
});

gl_enum!(OperandAlpha, "alpha operand" {
    SrcAlpha = SRC_ALPHA,
    OneMinusSrcAlpha = ONE_MINUS_SRC_ALPHA,
});

gl_enum!(
    /// Material face.  Front and back share one material.
    Face, "material face" {
    Front = FRONT,
    Back = BACK,
    FrontAndBack = FRONT_AND_BACK,
});

gl_enum!(Primitive, "primitive mode" {
    Points = POINTS,
    Lines = LINES,
    LineLoop = LINE_LOOP,
    LineStrip = LINE_STRIP,
    Triangles = TRIANGLES,
    TriangleStrip = TRIANGLE_STRIP,
    TriangleFan = TRIANGLE_FAN,
});

gl_enum!(
    /// Component type of a vertex array.
    DataType, "vertex data type" {
    Byte = BYTE,
    UnsignedByte = UNSIGNED_BYTE,
    Short = SHORT,
    UnsignedShort = UNSIGNED_SHORT,
    Fixed = FIXED,
    Float = FLOAT,
});

gl_enum!(IndexType, "index type" {
    UnsignedByte = UNSIGNED_BYTE,
    UnsignedShort = UNSIGNED_SHORT,
});

/// A `glEnable` / `glDisable` capability.
///
/// The first group is emulated in the generated shaders; the rest are handed
/// to the backend unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Lighting,
    Light(u8),
    /// `GL_TEXTURE_2D` on the active texture unit.
    Texture2D,
    Normalize,
    RescaleNormal,
    Fog,
    AlphaTest,
    ClipPlane(u8),

    CullFace,
    Blend,
    Dither,
    StencilTest,
    DepthTest,
    ScissorTest,
    PolygonOffsetFill,
    SampleAlphaToCoverage,
    SampleCoverage,
}

impl Capability {
    pub fn from_gl(value: u32) -> Result<Self, Error> {
        Ok(match value {
            LIGHTING => Capability::Lighting,
            LIGHT0..=LIGHT7 => Capability::Light((value - LIGHT0) as u8),
            TEXTURE_2D => Capability::Texture2D,
            NORMALIZE => Capability::Normalize,
            RESCALE_NORMAL => Capability::RescaleNormal,
            FOG => Capability::Fog,
            ALPHA_TEST => Capability::AlphaTest,
            CLIP_PLANE0..=CLIP_PLANE5 => Capability::ClipPlane((value - CLIP_PLANE0) as u8),
            CULL_FACE => Capability::CullFace,
            BLEND => Capability::Blend,
            DITHER => Capability::Dither,
            STENCIL_TEST => Capability::StencilTest,
            DEPTH_TEST => Capability::DepthTest,
            SCISSOR_TEST => Capability::ScissorTest,
            POLYGON_OFFSET_FILL => Capability::PolygonOffsetFill,
            SAMPLE_ALPHA_TO_COVERAGE => Capability::SampleAlphaToCoverage,
            SAMPLE_COVERAGE => Capability::SampleCoverage,
            _ => {
                return Err(Error::InvalidEnum {
                    what: "capability",
                    value,
                });
            }
        })
    }

    pub fn to_gl(self) -> u32 {
        match self {
            Capability::Lighting => LIGHTING,
            Capability::Light(n) => LIGHT0 + n as u32,
            Capability::Texture2D => TEXTURE_2D,
            Capability::Normalize => NORMALIZE,
            Capability::RescaleNormal => RESCALE_NORMAL,
            Capability::Fog => FOG,
            Capability::AlphaTest => ALPHA_TEST,
            Capability::ClipPlane(n) => CLIP_PLANE0 + n as u32,
            Capability::CullFace => CULL_FACE,
            Capability::Blend => BLEND,
            Capability::Dither => DITHER,
            Capability::StencilTest => STENCIL_TEST,
            Capability::DepthTest => DEPTH_TEST,
            Capability::ScissorTest => SCISSOR_TEST,
            Capability::PolygonOffsetFill => POLYGON_OFFSET_FILL,
            Capability::SampleAlphaToCoverage => SAMPLE_ALPHA_TO_COVERAGE,
            Capability::SampleCoverage => SAMPLE_COVERAGE,
        }
    }

    /// Whether the engine implements this capability itself.
    pub fn is_emulated(self) -> bool {
        matches!(
            self,
            Capability::Lighting
                | Capability::Light(_)
                | Capability::Texture2D
                | Capability::Normalize
                | Capability::RescaleNormal
                | Capability::Fog
                | Capability::AlphaTest
                | Capability::ClipPlane(_)
        )
    }
}

/// Target of `glHint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HintTarget {
    Fog,
    /// Per-vertex (fastest) versus per-fragment (nicest) lighting.
    Lighting,
    PerspectiveCorrection,
    PointSmooth,
    LineSmooth,
    GenerateMipmap,
}

impl HintTarget {
    /// `Lighting` has no core enumerant and is only reachable through the typed API.
    pub fn from_gl(value: u32) -> Result<Self, Error> {
        match value {
            FOG_HINT => Ok(HintTarget::Fog),
            PERSPECTIVE_CORRECTION_HINT => Ok(HintTarget::PerspectiveCorrection),
            POINT_SMOOTH_HINT => Ok(HintTarget::PointSmooth),
            LINE_SMOOTH_HINT => Ok(HintTarget::LineSmooth),
            GENERATE_MIPMAP_HINT => Ok(HintTarget::GenerateMipmap),
            _ => Err(Error::InvalidEnum {
                what: "hint target",
                value,
            }),
        }
    }
}

/// Source register of a `GL_COMBINE` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TexEnvSource {
    /// The texture of the unit being configured.
    Texture,
    /// `GL_TEXTUREn` crossbar source.
    TextureUnit(u8),
    Constant,
    PrimaryColor,
    Previous,
}

impl TexEnvSource {
    pub fn from_gl(value: u32) -> Result<Self, Error> {
        match value {
            TEXTURE0..=TEXTURE31 => Ok(TexEnvSource::TextureUnit((value - TEXTURE0) as u8)),
            TEXTURE => Ok(TexEnvSource::Texture),
            CONSTANT => Ok(TexEnvSource::Constant),
            PRIMARY_COLOR => Ok(TexEnvSource::PrimaryColor),
            PREVIOUS => Ok(TexEnvSource::Previous),
            _ => Err(Error::InvalidEnum {
                what: "texture environment source",
                value,
            }),
        }
    }

    /// Value stored in the state: a texture unit index for texture sources,
    /// the raw enumerant otherwise.
    pub fn state_value(self, active_unit: usize) -> i32 {
        match self {
            TexEnvSource::Texture => active_unit as i32,
            TexEnvSource::TextureUnit(n) => n as i32,
            TexEnvSource::Constant => CONSTANT as i32,
            TexEnvSource::PrimaryColor => PRIMARY_COLOR as i32,
            TexEnvSource::Previous => PREVIOUS as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn enum_round_trip_and_rejection() {
        assert_eq!(FogMode::from_gl(EXP2), Ok(FogMode::Exp2));
        assert_eq!(
            FogMode::from_gl(MODULATE),
            Err(Error::InvalidEnum {
                what: "fog mode",
                value: MODULATE
            })
        );
        // dot3 is only an rgb combiner
        assert!(CombineRgb::from_gl(DOT3_RGBA).is_ok());
        assert!(CombineAlpha::from_gl(DOT3_RGBA).is_err());
        assert!(OperandAlpha::from_gl(SRC_COLOR).is_err());
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn capabilities_decode_indices() {
        assert_eq!(Capability::from_gl(0x4002), Ok(Capability::Light(2)));
        assert_eq!(Capability::from_gl(0x3005), Ok(Capability::ClipPlane(5)));
        assert_eq!(Capability::ClipPlane(3).to_gl(), 0x3003);
        assert!(Capability::Fog.is_emulated());
        assert!(!Capability::DepthTest.is_emulated());
        assert!(Capability::from_gl(0xFFFF).is_err());
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn texture_sources_resolve_to_units() {
        assert_eq!(TexEnvSource::from_gl(TEXTURE0 + 2), Ok(TexEnvSource::TextureUnit(2)));
        assert_eq!(TexEnvSource::Texture.state_value(1), 1);
        assert_eq!(TexEnvSource::Previous.state_value(1), PREVIOUS as i32);
    }
}
