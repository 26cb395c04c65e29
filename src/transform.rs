// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Matrix stacks for the model-view, projection and per-unit texture transforms.

Each stack always holds at least one matrix.  Every mutating operation applies
to the top of the currently selected stack, post-multiplying the way
`glMultMatrix` does.
*/

use crate::error::Error;
use crate::gl;
use crate::math::{MathError, Matrix4};

/// Deepest a stack may grow before pushes are rejected.
pub const MAX_STACK_DEPTH: usize = 32;

/// Which transform class a stack belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixMode {
    ModelView,
    Projection,
    Texture,
}

impl MatrixMode {
    pub fn from_gl(value: u32) -> Result<Self, Error> {
        match value {
            gl::MODELVIEW => Ok(MatrixMode::ModelView),
            gl::PROJECTION => Ok(MatrixMode::Projection),
            gl::TEXTURE => Ok(MatrixMode::Texture),
            _ => Err(Error::InvalidEnum {
                what: "matrix mode",
                value,
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformStack {
    mode: MatrixMode,
    matrices: Vec<Matrix4>,
}

impl TransformStack {
    pub fn new(mode: MatrixMode) -> Self {
        TransformStack {
            mode,
            matrices: vec![Matrix4::IDENTITY],
        }
    }

    pub fn mode(&self) -> MatrixMode {
        self.mode
    }

    pub fn depth(&self) -> usize {
        self.matrices.len()
    }

    pub fn top(&self) -> &Matrix4 {
        // never empty: construction pushes identity and pop refuses the last entry
        &self.matrices[self.matrices.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Matrix4 {
        let last = self.matrices.len() - 1;
        &mut self.matrices[last]
    }

    /// Duplicates the top matrix.
    pub fn push(&mut self) -> Result<(), Error> {
        if self.matrices.len() >= MAX_STACK_DEPTH {
            return Err(Error::StackOverflow { mode: self.mode });
        }
        let top = *self.top();
        self.matrices.push(top);
        Ok(())
    }

    /// Discards the top matrix.  The last matrix can't be popped.
    pub fn pop(&mut self) -> Result<(), Error> {
        if self.matrices.len() <= 1 {
            return Err(Error::StackUnderflow { mode: self.mode });
        }
        self.matrices.pop();
        Ok(())
    }

    pub fn load_identity(&mut self) {
        *self.top_mut() = Matrix4::IDENTITY;
    }

    pub fn load(&mut self, m: Matrix4) {
        *self.top_mut() = m;
    }

    /// `top = top · m`
    pub fn multiply(&mut self, m: &Matrix4) {
        let top = self.top_mut();
        *top = top.multiply(m);
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.top_mut().translate(x, y, z);
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.top_mut().scale(x, y, z);
    }

    pub fn rotate(&mut self, angle: f32, x: f32, y: f32, z: f32) {
        self.multiply(&Matrix4::rotation(angle, x, y, z));
    }

    pub fn frustum(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<(), MathError> {
        let f = Matrix4::frustum(left, right, bottom, top, near, far)?;
        self.multiply(&f);
        Ok(())
    }

    pub fn ortho(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<(), MathError> {
        let o = Matrix4::ortho(left, right, bottom, top, near, far)?;
        self.multiply(&o);
        Ok(())
    }

    pub fn perspective(&mut self, fovy: f32, aspect: f32, near: f32, far: f32) -> Result<(), MathError> {
        let p = Matrix4::perspective(fovy, aspect, near, far)?;
        self.multiply(&p);
        Ok(())
    }
}

/// Currently selected stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    ModelView,
    Projection,
    Texture(usize),
}

/// All transform stacks of one context, plus which one is selected.
#[derive(Debug, Clone)]
pub struct TransformStacks {
    model_view: TransformStack,
    projection: TransformStack,
    textures: Vec<TransformStack>,
    selection: Selection,
}

impl TransformStacks {
    pub fn new(texture_units: usize) -> Self {
        TransformStacks {
            model_view: TransformStack::new(MatrixMode::ModelView),
            projection: TransformStack::new(MatrixMode::Projection),
            textures: (0..texture_units)
                .map(|_| TransformStack::new(MatrixMode::Texture))
                .collect(),
            selection: Selection::ModelView,
        }
    }

    /// Selects a stack.  `texture_unit` picks the texture stack and is ignored otherwise.
    pub fn set_mode(&mut self, mode: MatrixMode, texture_unit: usize) -> Result<(), Error> {
        self.selection = match mode {
            MatrixMode::ModelView => Selection::ModelView,
            MatrixMode::Projection => Selection::Projection,
            MatrixMode::Texture => {
                if texture_unit >= self.textures.len() {
                    return Err(Error::InvalidValue(format!(
                        "texture unit {texture_unit} has no matrix stack"
                    )));
                }
                Selection::Texture(texture_unit)
            }
        };
        Ok(())
    }

    pub fn mode(&self) -> MatrixMode {
        match self.selection {
            Selection::ModelView => MatrixMode::ModelView,
            Selection::Projection => MatrixMode::Projection,
            Selection::Texture(_) => MatrixMode::Texture,
        }
    }

    pub fn current(&self) -> &TransformStack {
        match self.selection {
            Selection::ModelView => &self.model_view,
            Selection::Projection => &self.projection,
            Selection::Texture(unit) => &self.textures[unit],
        }
    }

    pub fn current_mut(&mut self) -> &mut TransformStack {
        match self.selection {
            Selection::ModelView => &mut self.model_view,
            Selection::Projection => &mut self.projection,
            Selection::Texture(unit) => &mut self.textures[unit],
        }
    }

    pub fn model_view(&self) -> &Matrix4 {
        self.model_view.top()
    }

    pub fn projection(&self) -> &Matrix4 {
        self.projection.top()
    }

    pub fn texture(&self, unit: usize) -> Option<&Matrix4> {
        self.textures.get(unit).map(TransformStack::top)
    }
}
