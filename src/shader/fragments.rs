// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
The compiled-in fragment catalog.

Fragments are concatenated per stage in the order of [`ShaderId`], so a
fragment may rely on everything an earlier fragment of the same stage declares
or defines.  Both main fragments come first and carry the shared GL constants
and function prototypes.
*/

use super::Stage;

/// Identity of a catalog fragment.  Declaration order is catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderId {
    MainVertex,
    LightingVertex,
    LightingPerVertexVertex,
    LightingPerFragmentVertex,
    ClipPlaneVertex,
    TextureVertex,
    Texture0Vertex,
    Texture1Vertex,
    Texture2Vertex,
    FogVertex,
    MainFragment,
    LightingFragment,
    LightingPerFragmentFragment,
    AlphaTestFragment,
    ClipPlaneFragment,
    TextureFragment,
    Texture0Fragment,
    Texture1Fragment,
    Texture2Fragment,
    FogFragment,
}

/// An immutable piece of shader source.
#[derive(Debug)]
pub struct ShaderFragment {
    pub id: ShaderId,
    pub stage: Stage,
    pub name: &'static str,
    pub source: &'static str,
}

macro_rules! catalog {
    ($($id:ident, $stage:ident, $file:literal;)*) => {
        /// Every fragment, indexed by `ShaderId as usize`.
        pub static CATALOG: &[ShaderFragment] = &[
            $(ShaderFragment {
                id: ShaderId::$id,
                stage: Stage::$stage,
                name: stringify!($id),
                source: include_str!(concat!("glsl/", $file)),
            },)*
        ];
    };
}

catalog! {
    MainVertex, Vertex, "main.vert";
    LightingVertex, Vertex, "lighting.vert";
    LightingPerVertexVertex, Vertex, "lighting_per_vertex.vert";
    LightingPerFragmentVertex, Vertex, "lighting_per_fragment.vert";
    ClipPlaneVertex, Vertex, "clip_plane.vert";
    TextureVertex, Vertex, "texture.vert";
    Texture0Vertex, Vertex, "texture0.vert";
    Texture1Vertex, Vertex, "texture1.vert";
    Texture2Vertex, Vertex, "texture2.vert";
    FogVertex, Vertex, "fog.vert";
    MainFragment, Fragment, "main.frag";
    LightingFragment, Fragment, "lighting.frag";
    LightingPerFragmentFragment, Fragment, "lighting_per_fragment.frag";
    AlphaTestFragment, Fragment, "alpha_test.frag";
    ClipPlaneFragment, Fragment, "clip_plane.frag";
    TextureFragment, Fragment, "texture.frag";
    Texture0Fragment, Fragment, "texture0.frag";
    Texture1Fragment, Fragment, "texture1.frag";
    Texture2Fragment, Fragment, "texture2.frag";
    FogFragment, Fragment, "fog.frag";
}

impl ShaderId {
    pub const COUNT: usize = 20;

    pub fn fragment(self) -> &'static ShaderFragment {
        &CATALOG[self as usize]
    }

    pub fn stage(self) -> Stage {
        self.fragment().stage
    }

    pub fn name(self) -> &'static str {
        self.fragment().name
    }

    pub fn all() -> impl Iterator<Item = ShaderId> {
        CATALOG.iter().map(|f| f.id)
    }

    pub(crate) fn texture_vertex(unit: usize) -> ShaderId {
        [ShaderId::Texture0Vertex, ShaderId::Texture1Vertex, ShaderId::Texture2Vertex][unit]
    }

    pub(crate) fn texture_fragment(unit: usize) -> ShaderId {
        [ShaderId::Texture0Fragment, ShaderId::Texture1Fragment, ShaderId::Texture2Fragment][unit]
    }
}
