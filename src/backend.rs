// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
The seam between the engine and a programmable GPU API.

The engine only ever talks to the GPU through [`Backend`].  [`RecordingBackend`]
is always available and drives the test suite; the `glow` implementation is
behind the `backend_glow` feature.
*/

use crate::gl::{Capability, HintMode, HintTarget, IndexType, Primitive, TextureFormat};
use crate::shader::Stage;
use crate::state::VertexPointer;
use std::fmt::Debug;

mod recording;
pub use recording::{Call, RecordingBackend};

#[cfg(feature = "backend_glow")]
mod glow;
#[cfg(feature = "backend_glow")]
pub use self::glow::GlowBackend;

/// A programmable GPU API with a current context.
///
/// Every method is synchronous.  Compile and link report the driver's info
/// log on failure.
pub trait Backend {
    type Shader;
    type Program: Clone + Debug;
    type UniformLocation: Clone + Debug;
    type Buffer: Clone + PartialEq + Debug;
    type Texture: Clone + Eq + std::hash::Hash + Debug;

    fn compile_shader(&mut self, stage: Stage, source: &str) -> Result<Self::Shader, String>;
    fn delete_shader(&mut self, shader: Self::Shader);

    /// Links two compiled stages.  On success, returns the program and the
    /// (possibly empty) info log.
    fn link_program(
        &mut self,
        vertex: &Self::Shader,
        fragment: &Self::Shader,
    ) -> Result<(Self::Program, String), String>;
    fn delete_program(&mut self, program: &Self::Program);

    /// Names and locations of the attributes the linker kept.
    fn active_attributes(&mut self, program: &Self::Program) -> Vec<(String, u32)>;
    /// Names and locations of the uniforms the linker kept.
    fn active_uniforms(&mut self, program: &Self::Program) -> Vec<(String, Self::UniformLocation)>;

    fn use_program(&mut self, program: Option<&Self::Program>);

    fn uniform_1i(&mut self, location: &Self::UniformLocation, value: i32);
    fn uniform_1f(&mut self, location: &Self::UniformLocation, value: f32);
    fn uniform_3f(&mut self, location: &Self::UniformLocation, value: &[f32; 3]);
    fn uniform_4f(&mut self, location: &Self::UniformLocation, value: &[f32; 4]);
    fn uniform_matrix_3(&mut self, location: &Self::UniformLocation, value: &[f32; 9]);
    fn uniform_matrix_4(&mut self, location: &Self::UniformLocation, value: &[f32; 16]);

    fn set_attribute_enabled(&mut self, location: u32, enabled: bool);
    fn vertex_attrib_pointer(&mut self, location: u32, pointer: &VertexPointer<Self::Buffer>);

    /// A capability the engine doesn't emulate.
    fn set_capability(&mut self, capability: Capability, enabled: bool);
    /// A hint the engine doesn't emulate.
    fn hint(&mut self, target: HintTarget, mode: HintMode);

    fn active_texture(&mut self, unit: usize);
    fn bind_texture(&mut self, texture: Option<&Self::Texture>);
    fn tex_image_2d(
        &mut self,
        level: i32,
        format: TextureFormat,
        width: i32,
        height: i32,
        pixels: Option<&[u8]>,
    );

    fn draw_arrays(&mut self, mode: Primitive, first: i32, count: i32);
    fn draw_elements(&mut self, mode: Primitive, count: i32, index_type: IndexType, offset: i32);
}
