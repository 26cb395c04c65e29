// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Shader source synthesis and compiled programs.

A program is assembled from the fragments the current state requires, with
`#define` lines giving each fragment the state values it branches on.  The
result is compiled and linked through a [`Backend`](crate::backend::Backend),
and its active attributes and uniforms are mapped back to semantic IDs.
*/

mod assembly;
mod fragments;
mod names;
mod program;

pub use assembly::{ShaderSources, assemble, assemble_uber};
pub use fragments::{CATALOG, ShaderFragment, ShaderId};
pub use names::{SemanticId, lookup};
pub use program::AssembledProgram;

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
}
