// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! [`Backend`] over an OpenGL ES 2.0 (or WebGL 1) context through `glow`.

use super::Backend;
use crate::gl::{Capability, HintMode, HintTarget, IndexType, Primitive, TextureFormat};
use crate::shader::Stage;
use crate::state::VertexPointer;
use glow::{HasContext, PixelUnpackData};
use std::sync::Arc;

/// Issues engine calls on a `glow` context.
///
/// The context must stay current on the calling thread for as long as the
/// backend is used.
#[derive(Debug, Clone)]
pub struct GlowBackend {
    gl: Arc<glow::Context>,
}

impl GlowBackend {
    /// # Safety
    ///
    /// `gl` must be a live context, current on this thread, for every later call.
    pub unsafe fn new(gl: Arc<glow::Context>) -> Self {
        GlowBackend { gl }
    }

    pub fn context(&self) -> &Arc<glow::Context> {
        &self.gl
    }
}

impl Backend for GlowBackend {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type UniformLocation = glow::UniformLocation;
    type Buffer = glow::Buffer;
    type Texture = glow::Texture;

    fn compile_shader(&mut self, stage: Stage, source: &str) -> Result<glow::Shader, String> {
        let kind = match stage {
            Stage::Vertex => glow::VERTEX_SHADER,
            Stage::Fragment => glow::FRAGMENT_SHADER,
        };
        // SAFETY: the context is current, per `GlowBackend::new`.
        unsafe {
            let shader = self.gl.create_shader(kind)?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if self.gl.get_shader_compile_status(shader) {
                Ok(shader)
            } else {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                Err(log)
            }
        }
    }

    fn delete_shader(&mut self, shader: glow::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn link_program(
        &mut self,
        vertex: &glow::Shader,
        fragment: &glow::Shader,
    ) -> Result<(glow::Program, String), String> {
        unsafe {
            let program = self.gl.create_program()?;
            self.gl.attach_shader(program, *vertex);
            self.gl.attach_shader(program, *fragment);
            self.gl.link_program(program);
            let log = self.gl.get_program_info_log(program);
            if self.gl.get_program_link_status(program) {
                self.gl.detach_shader(program, *vertex);
                self.gl.detach_shader(program, *fragment);
                Ok((program, log))
            } else {
                self.gl.delete_program(program);
                Err(log)
            }
        }
    }

    fn delete_program(&mut self, program: &glow::Program) {
        unsafe { self.gl.delete_program(*program) }
    }

    fn active_attributes(&mut self, program: &glow::Program) -> Vec<(String, u32)> {
        unsafe {
            let count = self.gl.get_active_attributes(*program);
            (0..count)
                .filter_map(|index| self.gl.get_active_attribute(*program, index))
                .filter_map(|attribute| {
                    let location = self.gl.get_attrib_location(*program, &attribute.name)?;
                    Some((attribute.name, location))
                })
                .collect()
        }
    }

    fn active_uniforms(&mut self, program: &glow::Program) -> Vec<(String, glow::UniformLocation)> {
        unsafe {
            let count = self.gl.get_active_uniforms(*program);
            (0..count)
                .filter_map(|index| self.gl.get_active_uniform(*program, index))
                .filter_map(|uniform| {
                    let location = self.gl.get_uniform_location(*program, &uniform.name)?;
                    Some((uniform.name, location))
                })
                .collect()
        }
    }

    fn use_program(&mut self, program: Option<&glow::Program>) {
        unsafe { self.gl.use_program(program.copied()) }
    }

    fn uniform_1i(&mut self, location: &glow::UniformLocation, value: i32) {
        unsafe { self.gl.uniform_1_i32(Some(location), value) }
    }

    fn uniform_1f(&mut self, location: &glow::UniformLocation, value: f32) {
        unsafe { self.gl.uniform_1_f32(Some(location), value) }
    }

    fn uniform_3f(&mut self, location: &glow::UniformLocation, value: &[f32; 3]) {
        unsafe { self.gl.uniform_3_f32(Some(location), value[0], value[1], value[2]) }
    }

    fn uniform_4f(&mut self, location: &glow::UniformLocation, value: &[f32; 4]) {
        unsafe {
            self.gl
                .uniform_4_f32(Some(location), value[0], value[1], value[2], value[3])
        }
    }

    fn uniform_matrix_3(&mut self, location: &glow::UniformLocation, value: &[f32; 9]) {
        unsafe { self.gl.uniform_matrix_3_f32_slice(Some(location), false, value) }
    }

    fn uniform_matrix_4(&mut self, location: &glow::UniformLocation, value: &[f32; 16]) {
        unsafe { self.gl.uniform_matrix_4_f32_slice(Some(location), false, value) }
    }

    fn set_attribute_enabled(&mut self, location: u32, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable_vertex_attrib_array(location);
            } else {
                self.gl.disable_vertex_attrib_array(location);
            }
        }
    }

    fn vertex_attrib_pointer(&mut self, location: u32, pointer: &VertexPointer<glow::Buffer>) {
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, pointer.buffer);
            self.gl.vertex_attrib_pointer_f32(
                location,
                pointer.size,
                pointer.data_type.to_gl(),
                pointer.normalized,
                pointer.stride,
                pointer.offset,
            );
        }
    }

    fn set_capability(&mut self, capability: Capability, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(capability.to_gl());
            } else {
                self.gl.disable(capability.to_gl());
            }
        }
    }

    fn hint(&mut self, target: HintTarget, mode: HintMode) {
        // ES 2.0 has no other hint target; the rest would raise GL_INVALID_ENUM
        if target == HintTarget::GenerateMipmap {
            unsafe { self.gl.hint(glow::GENERATE_MIPMAP_HINT, mode.to_gl()) }
        }
    }

    fn active_texture(&mut self, unit: usize) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit as u32) }
    }

    fn bind_texture(&mut self, texture: Option<&glow::Texture>) {
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, texture.copied()) }
    }

    fn tex_image_2d(
        &mut self,
        level: i32,
        format: TextureFormat,
        width: i32,
        height: i32,
        pixels: Option<&[u8]>,
    ) {
        unsafe {
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                level,
                format.to_gl() as i32,
                width,
                height,
                0,
                format.to_gl(),
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(pixels),
            )
        }
    }

    fn draw_arrays(&mut self, mode: Primitive, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(mode.to_gl(), first, count) }
    }

    fn draw_elements(&mut self, mode: Primitive, count: i32, index_type: IndexType, offset: i32) {
        unsafe {
            self.gl
                .draw_elements(mode.to_gl(), count, index_type.to_gl(), offset)
        }
    }
}
