// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
The dependency graph between shader-affecting state and catalog fragments.

Each uniform has a static [`Descriptor`]: the boolean it hangs off (if any),
the fragments that receive its `#define`, and the fragments it pulls in.
Value-only uniforms have an empty descriptor.
*/

use super::ids::UniformId;
use crate::gl;
use crate::shader::ShaderId;
use std::sync::OnceLock;

use ShaderId::*;

/// Fragments a value pulls into the program while it is relevant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Requires {
    Nothing,
    /// Boolean values, while true.
    WhenTrue(&'static [ShaderId]),
    /// Integer values, per matching value.
    WhenEquals(&'static [(i32, &'static [ShaderId])]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Descriptor {
    pub parent: Option<UniformId>,
    pub define_in: &'static [ShaderId],
    pub requires: Requires,
}

impl Descriptor {
    const VALUE_ONLY: Descriptor = Descriptor {
        parent: None,
        define_in: &[],
        requires: Requires::Nothing,
    };

    fn new(parent: Option<UniformId>, define_in: &'static [ShaderId], requires: Requires) -> Self {
        Descriptor {
            parent,
            define_in,
            requires,
        }
    }

    /// Fragments required by `value`, which the caller has already found relevant.
    pub fn required_by(&self, value: i32) -> &'static [ShaderId] {
        match self.requires {
            Requires::Nothing => &[],
            Requires::WhenTrue(fragments) => {
                if value != 0 {
                    fragments
                } else {
                    &[]
                }
            }
            Requires::WhenEquals(cases) => cases
                .iter()
                .find(|(key, _)| *key == value)
                .map(|(_, fragments)| *fragments)
                .unwrap_or(&[]),
        }
    }
}

const MAIN_BOTH: &[ShaderId] = &[MainVertex, MainFragment];
const TEXCOORD_DEFINES: [&[ShaderId]; 3] = [
    &[MainVertex, Texture0Fragment],
    &[MainVertex, Texture1Fragment],
    &[MainVertex, Texture2Fragment],
];
const TEXCOORD_REQUIRES: [&[ShaderId]; 3] = [
    &[TextureVertex, Texture0Vertex],
    &[TextureVertex, Texture1Vertex],
    &[TextureVertex, Texture2Vertex],
];
const TEXTURE_FRAGMENT: [&[ShaderId]; 3] = [&[Texture0Fragment], &[Texture1Fragment], &[Texture2Fragment]];
const FOG_HINT_REQUIRES: &[(i32, &[ShaderId])] = &[
    (gl::FASTEST as i32, &[FogVertex]),
    (gl::NICEST as i32, &[FogFragment]),
];
const LIGHTING_HINT_REQUIRES: &[(i32, &[ShaderId])] = &[(
    gl::NICEST as i32,
    &[LightingPerFragmentVertex, LightingPerFragmentFragment],
)];
const ENV_MODE_REQUIRES: &[(i32, &[ShaderId])] = &[(gl::COMBINE as i32, &[TextureFragment])];

/// Texture unit of a per-unit integer, if `id` is one.
fn texture_int_unit(id: UniformId) -> Option<usize> {
    // format, mode and the two combiner functions: unit-minor
    if let Some(offset) = id.offset_in(UniformId::Texture0Format, 12) {
        return Some(offset % 3);
    }
    // sources and operands: three slots per unit
    id.offset_in(UniformId::Texture0EnvSrc0Rgb, 36).map(|offset| (offset % 9) / 3)
}

fn describe(id: UniformId) -> Descriptor {
    use UniformId as U;
    let lighting = Some(U::LightingEnabled);

    if let Some(unit) = texture_int_unit(id) {
        let requires = if id.offset_in(U::Texture0EnvMode, 3).is_some() {
            Requires::WhenEquals(ENV_MODE_REQUIRES)
        } else {
            Requires::Nothing
        };
        return Descriptor::new(Some(U::Texture0Enabled.nth(unit)), TEXTURE_FRAGMENT[unit], requires);
    }
    if let Some(unit) = id.offset_in(U::TexCoord0Enabled, 3) {
        return Descriptor::new(
            None,
            TEXCOORD_DEFINES[unit],
            Requires::WhenTrue(TEXCOORD_REQUIRES[unit]),
        );
    }
    if let Some(unit) = id.offset_in(U::Texture0Enabled, 3) {
        return Descriptor::new(None, MAIN_BOTH, Requires::WhenTrue(TEXTURE_FRAGMENT[unit]));
    }
    if id.offset_in(U::Texture0MatrixEnabled, 3).is_some() {
        return Descriptor::new(None, &[TextureVertex], Requires::Nothing);
    }
    if id.offset_in(U::Light0Enabled, 3).is_some() {
        return Descriptor::new(
            lighting,
            &[LightingVertex, LightingPerFragmentFragment],
            Requires::Nothing,
        );
    }
    if id.offset_in(U::ClipPlane0Enabled, 6).is_some() {
        return Descriptor::new(
            None,
            MAIN_BOTH,
            Requires::WhenTrue(&[ClipPlaneVertex, ClipPlaneFragment]),
        );
    }

    match id {
        U::PositionEnabled | U::ColorEnabled => {
            Descriptor::new(None, &[MainVertex], Requires::Nothing)
        }
        U::NormalEnabled
        | U::RescaleNormalEnabled
        | U::NormalizeEnabled
        | U::NonDirectionalLightEnabled
        | U::LightModelLocalViewerEnabled => {
            Descriptor::new(lighting, &[MainVertex], Requires::Nothing)
        }
        U::LightingEnabled => Descriptor::new(
            None,
            MAIN_BOTH,
            Requires::WhenTrue(&[LightingVertex, LightingFragment]),
        ),
        U::LightModelTwoSideEnabled => Descriptor::new(
            lighting,
            &[LightingVertex, LightingFragment],
            Requires::WhenTrue(&[LightingPerVertexVertex]),
        ),
        U::LightingHint => Descriptor::new(
            lighting,
            &[MainVertex, MainFragment, LightingVertex, LightingFragment],
            Requires::WhenEquals(LIGHTING_HINT_REQUIRES),
        ),
        U::FogEnabled => Descriptor::new(None, MAIN_BOTH, Requires::Nothing),
        U::FogMode => Descriptor::new(
            Some(U::FogEnabled),
            &[MainVertex, FogFragment],
            Requires::Nothing,
        ),
        U::FogHint => Descriptor::new(
            Some(U::FogEnabled),
            MAIN_BOTH,
            Requires::WhenEquals(FOG_HINT_REQUIRES),
        ),
        U::AlphaTestEnabled => Descriptor::new(
            None,
            &[MainFragment],
            Requires::WhenTrue(&[AlphaTestFragment]),
        ),
        U::AlphaFunc => Descriptor::new(
            Some(U::AlphaTestEnabled),
            &[AlphaTestFragment],
            Requires::Nothing,
        ),
        _ => Descriptor::VALUE_ONLY,
    }
}

/// Descriptors of every uniform, indexed by [`UniformId::index`].
pub fn graph() -> &'static [Descriptor] {
    static GRAPH: OnceLock<Vec<Descriptor>> = OnceLock::new();
    GRAPH.get_or_init(|| UniformId::ALL.iter().map(|id| describe(*id)).collect())
}

pub fn descriptor(id: UniformId) -> &'static Descriptor {
    &graph()[id.index()]
}
