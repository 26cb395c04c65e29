/*! fixed_function emulates the OpenGL ES 1.x fixed-function pipeline on top of a
programmable (ES 2.0 / WebGL 1 class) GPU API.

Clients drive a [`Context`] with the familiar state-machine calls: enable
lighting, set up matrices, configure texture environments, point at vertex
arrays, draw.  The engine turns that state into shader programs.

# How a draw works

| Step       | What happens                                                                   |
|------------|--------------------------------------------------------------------------------|
| Derive     | model-view-projection, normal matrix and rescale factor are computed           |
| Select     | the shader-affecting state is packed into a key and looked up in the cache     |
| Assemble   | on a miss, GLSL fragments are concatenated, each prefixed with its `#define`s |
| Introspect | the linked program's attributes and uniforms are mapped back to semantic IDs   |
| Upload     | only uniforms and arrays the program declares, and that changed, are sent      |
| Submit     | the draw reaches the backend                                                   |

Only state a program can observe ever splits variants: a fog mode set while fog
is disabled, or a light configured while lighting is off, selects the same
program as the defaults.

# Uber-shader mode

With [`Config::uber_shader`], a single program containing every fragment is
built once and branches on uniforms at runtime.  Fewer compiles, slower
shaders.

# Backends

The engine talks to the GPU through the [`Backend`] trait.  [`RecordingBackend`]
records every call and is what the test suite runs against.  With the
`backend_glow` feature, [`GlowBackend`] drives a real context through
[glow](https://docs.rs/glow).

# Configuration

| Variable                 | Effect                                               |
|--------------------------|------------------------------------------------------|
| `FF_UBER_SHADER=1`       | build the single uber program instead of variants   |
| `FF_MAX_CACHED_VARIANTS` | evict least recently used variants beyond this count |

Both are read by [`Config::from_env`].
*/

pub mod backend;
mod config;
mod context;
mod error;
pub mod gl;
pub mod math;
pub mod shader;
pub mod state;
pub mod transform;
mod variant_cache;

pub use backend::{Backend, Call, RecordingBackend};
#[cfg(feature = "backend_glow")]
pub use backend::GlowBackend;
pub use config::Config;
pub use context::{
    Context, FogParam, LightModelParam, LightParam, MaterialParam, TexEnvParam, UploadStats,
};
pub use error::Error;
pub use variant_cache::{STATE_WORDS, StateKey, VariantCache, pack_key};
