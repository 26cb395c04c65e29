// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
A headless backend that records every call.

Linking runs both stages through a small preprocessor and reports the
`attribute` and `uniform` declarations that survive it, which is what a real
linker keeps for the catalog's fragments: every declaration there sits behind
the same conditions as its uses.
*/

use super::Backend;
use crate::gl::{Capability, HintMode, HintTarget, IndexType, Primitive, TextureFormat};
use crate::math::{Matrix3, Matrix4, Vector3, Vector4};
use crate::shader::Stage;
use crate::state::{UniformValue, VertexPointer};
use std::collections::HashMap;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CompileShader { shader: u32, stage: Stage },
    DeleteShader(u32),
    LinkProgram(u32),
    DeleteProgram(u32),
    UseProgram(Option<u32>),
    /// A uniform upload, with the name the location had in the bound program.
    Uniform {
        location: u32,
        name: String,
        value: UniformValue,
    },
    AttributeEnabled { location: u32, enabled: bool },
    VertexAttribPointer {
        location: u32,
        pointer: VertexPointer<u32>,
    },
    Capability { capability: Capability, enabled: bool },
    Hint { target: HintTarget, mode: HintMode },
    ActiveTexture(usize),
    BindTexture(Option<u32>),
    TexImage2D {
        level: i32,
        format: TextureFormat,
        width: i32,
        height: i32,
        byte_len: usize,
    },
    DrawArrays {
        mode: Primitive,
        first: i32,
        count: i32,
    },
    DrawElements {
        mode: Primitive,
        count: i32,
        index_type: IndexType,
        offset: i32,
    },
}

#[derive(Debug, Clone)]
struct CompiledShader {
    stage: Stage,
    source: String,
}

#[derive(Debug, Clone, Default)]
struct LinkedProgram {
    attributes: Vec<(String, u32)>,
    uniforms: Vec<(String, u32)>,
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<Call>,
    next_handle: u32,
    shaders: HashMap<u32, CompiledShader>,
    programs: HashMap<u32, LinkedProgram>,
    current_program: Option<u32>,
    fail_compile: Option<(Stage, String)>,
    fail_link: Option<String>,
    link_warning: Option<String>,
    extra_uniforms: Vec<String>,
    extra_attributes: Vec<String>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Programs linked and not yet deleted.
    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    pub fn current_program(&self) -> Option<u32> {
        self.current_program
    }

    /// Source of a compiled shader, for inspecting generated code.
    pub fn shader_source(&self, shader: u32) -> Option<&str> {
        self.shaders.get(&shader).map(|s| s.source.as_str())
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn link_count(&self) -> usize {
        self.count(|c| matches!(c, Call::LinkProgram(_)))
    }

    pub fn uniform_uploads(&self) -> usize {
        self.count(|c| matches!(c, Call::Uniform { .. }))
    }

    /// Names of the uniforms uploaded since the last [`Self::clear_calls`], in order.
    pub fn uploaded_uniforms(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Uniform { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The next compile of `stage` fails with `log`.
    pub fn fail_next_compile(&mut self, stage: Stage, log: &str) {
        self.fail_compile = Some((stage, log.to_owned()));
    }

    /// The next link fails with `log`.
    pub fn fail_next_link(&mut self, log: &str) {
        self.fail_link = Some(log.to_owned());
    }

    /// The next successful link reports `log`.
    pub fn warn_next_link(&mut self, log: &str) {
        self.link_warning = Some(log.to_owned());
    }

    /// Reports an additional active uniform from every later link.
    pub fn inject_active_uniform(&mut self, name: &str) {
        self.extra_uniforms.push(name.to_owned());
    }

    pub fn inject_active_attribute(&mut self, name: &str) {
        self.extra_attributes.push(name.to_owned());
    }

    fn handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    fn record_uniform(&mut self, location: u32, value: UniformValue) {
        let name = self
            .current_program
            .and_then(|p| self.programs.get(&p))
            .and_then(|p| p.uniforms.iter().find(|(_, l)| *l == location))
            .map(|(n, _)| n.clone())
            .unwrap_or_default();
        self.calls.push(Call::Uniform {
            location,
            name,
            value,
        });
    }
}

impl Backend for RecordingBackend {
    type Shader = u32;
    type Program = u32;
    type UniformLocation = u32;
    type Buffer = u32;
    type Texture = u32;

    fn compile_shader(&mut self, stage: Stage, source: &str) -> Result<u32, String> {
        if self.fail_compile.as_ref().is_some_and(|(failing, _)| *failing == stage) {
            let log = self.fail_compile.take().map(|(_, log)| log).unwrap_or_default();
            return Err(log);
        }
        let shader = self.handle();
        self.shaders.insert(
            shader,
            CompiledShader {
                stage,
                source: source.to_owned(),
            },
        );
        self.calls.push(Call::CompileShader { shader, stage });
        Ok(shader)
    }

    fn delete_shader(&mut self, shader: u32) {
        self.calls.push(Call::DeleteShader(shader));
    }

    fn link_program(&mut self, vertex: &u32, fragment: &u32) -> Result<(u32, String), String> {
        if let Some(log) = self.fail_link.take() {
            return Err(log);
        }
        let (Some(vs), Some(fs)) = (self.shaders.get(vertex), self.shaders.get(fragment)) else {
            return Err("unknown shader object".to_owned());
        };
        if vs.stage != Stage::Vertex || fs.stage != Stage::Fragment {
            return Err("shader stages are swapped".to_owned());
        }
        let vertex_decls = active_declarations(&vs.source).map_err(|e| format!("vertex: {e}"))?;
        let fragment_decls = active_declarations(&fs.source).map_err(|e| format!("fragment: {e}"))?;

        let mut linked = LinkedProgram::default();
        for decl in vertex_decls.iter().chain(fragment_decls.iter()) {
            let table = match decl.kind {
                DeclarationKind::Attribute => &mut linked.attributes,
                DeclarationKind::Uniform => &mut linked.uniforms,
            };
            if !table.iter().any(|(name, _)| *name == decl.name) {
                let location = table.len() as u32;
                table.push((decl.name.clone(), location));
            }
        }
        for name in &self.extra_uniforms {
            let location = linked.uniforms.len() as u32;
            linked.uniforms.push((name.clone(), location));
        }
        for name in &self.extra_attributes {
            let location = linked.attributes.len() as u32;
            linked.attributes.push((name.clone(), location));
        }

        let program = self.handle();
        self.programs.insert(program, linked);
        self.calls.push(Call::LinkProgram(program));
        Ok((program, self.link_warning.take().unwrap_or_default()))
    }

    fn delete_program(&mut self, program: &u32) {
        self.programs.remove(program);
        if self.current_program == Some(*program) {
            self.current_program = None;
        }
        self.calls.push(Call::DeleteProgram(*program));
    }

    fn active_attributes(&mut self, program: &u32) -> Vec<(String, u32)> {
        self.programs
            .get(program)
            .map(|p| p.attributes.clone())
            .unwrap_or_default()
    }

    fn active_uniforms(&mut self, program: &u32) -> Vec<(String, u32)> {
        self.programs
            .get(program)
            .map(|p| p.uniforms.clone())
            .unwrap_or_default()
    }

    fn use_program(&mut self, program: Option<&u32>) {
        self.current_program = program.copied();
        self.calls.push(Call::UseProgram(program.copied()));
    }

    fn uniform_1i(&mut self, location: &u32, value: i32) {
        self.record_uniform(*location, UniformValue::Int(value));
    }

    fn uniform_1f(&mut self, location: &u32, value: f32) {
        self.record_uniform(*location, UniformValue::Float(value));
    }

    fn uniform_3f(&mut self, location: &u32, value: &[f32; 3]) {
        self.record_uniform(*location, UniformValue::Vec3(Vector3(*value)));
    }

    fn uniform_4f(&mut self, location: &u32, value: &[f32; 4]) {
        self.record_uniform(*location, UniformValue::Vec4(Vector4(*value)));
    }

    fn uniform_matrix_3(&mut self, location: &u32, value: &[f32; 9]) {
        self.record_uniform(*location, UniformValue::Mat3(Matrix3(*value)));
    }

    fn uniform_matrix_4(&mut self, location: &u32, value: &[f32; 16]) {
        self.record_uniform(*location, UniformValue::Mat4(Matrix4(*value)));
    }

    fn set_attribute_enabled(&mut self, location: u32, enabled: bool) {
        self.calls.push(Call::AttributeEnabled { location, enabled });
    }

    fn vertex_attrib_pointer(&mut self, location: u32, pointer: &VertexPointer<u32>) {
        self.calls.push(Call::VertexAttribPointer {
            location,
            pointer: pointer.clone(),
        });
    }

    fn set_capability(&mut self, capability: Capability, enabled: bool) {
        self.calls.push(Call::Capability {
            capability,
            enabled,
        });
    }

    fn hint(&mut self, target: HintTarget, mode: HintMode) {
        self.calls.push(Call::Hint { target, mode });
    }

    fn active_texture(&mut self, unit: usize) {
        self.calls.push(Call::ActiveTexture(unit));
    }

    fn bind_texture(&mut self, texture: Option<&u32>) {
        self.calls.push(Call::BindTexture(texture.copied()));
    }

    fn tex_image_2d(
        &mut self,
        level: i32,
        format: TextureFormat,
        width: i32,
        height: i32,
        pixels: Option<&[u8]>,
    ) {
        self.calls.push(Call::TexImage2D {
            level,
            format,
            width,
            height,
            byte_len: pixels.map_or(0, <[u8]>::len),
        });
    }

    fn draw_arrays(&mut self, mode: Primitive, first: i32, count: i32) {
        self.calls.push(Call::DrawArrays { mode, first, count });
    }

    fn draw_elements(&mut self, mode: Primitive, count: i32, index_type: IndexType, offset: i32) {
        self.calls.push(Call::DrawElements {
            mode,
            count,
            index_type,
            offset,
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DeclarationKind {
    Attribute,
    Uniform,
}

#[derive(Debug, Clone, PartialEq)]
struct Declaration {
    kind: DeclarationKind,
    name: String,
}

#[derive(Debug)]
struct Branch {
    parent_active: bool,
    taken: bool,
    active: bool,
}

/// Object-like macros and conditional groups, one directive per line.
#[derive(Debug, Default)]
struct Preprocessor {
    defines: HashMap<String, String>,
    branches: Vec<Branch>,
}

impl Preprocessor {
    fn active(&self) -> bool {
        self.branches.last().is_none_or(|b| b.active)
    }

    fn open(&mut self, condition: bool) {
        let parent_active = self.active();
        self.branches.push(Branch {
            parent_active,
            taken: condition,
            active: parent_active && condition,
        });
    }

    fn directive(&mut self, line: &str) -> Result<(), String> {
        let line = line.trim_start_matches('#').trim();
        let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        match keyword {
            "define" if self.active() => {
                let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                self.defines.insert(name.to_owned(), value.trim().to_owned());
            }
            "undef" if self.active() => {
                self.defines.remove(rest);
            }
            "ifdef" => {
                let condition = self.active() && self.defines.contains_key(rest);
                self.open(condition);
            }
            "ifndef" => {
                let condition = self.active() && !self.defines.contains_key(rest);
                self.open(condition);
            }
            "if" => {
                let condition = self.active() && self.evaluate(rest)? != 0;
                self.open(condition);
            }
            "elif" => {
                let (parent_active, taken) = match self.branches.last() {
                    Some(b) => (b.parent_active, b.taken),
                    None => return Err("#elif without #if".to_owned()),
                };
                let condition = parent_active && !taken && self.evaluate(rest)? != 0;
                if let Some(branch) = self.branches.last_mut() {
                    branch.active = condition;
                    branch.taken |= condition;
                }
            }
            "else" => match self.branches.last_mut() {
                Some(branch) => {
                    branch.active = branch.parent_active && !branch.taken;
                    branch.taken = true;
                }
                None => return Err("#else without #if".to_owned()),
            },
            "endif" => {
                if self.branches.pop().is_none() {
                    return Err("#endif without #if".to_owned());
                }
            }
            // #version, #extension, #pragma and anything in a skipped group
            _ => {}
        }
        Ok(())
    }

    fn evaluate(&self, expression: &str) -> Result<i64, String> {
        let tokens = tokenize(expression)?;
        let mut parser = Parser {
            tokens: &tokens,
            position: 0,
            defines: &self.defines,
        };
        let value = parser.or()?;
        if parser.position != tokens.len() {
            return Err(format!("trailing tokens in `{expression}`"));
        }
        Ok(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(i64),
    Ident(String),
    Op(&'static str),
}

fn tokenize(expression: &str) -> Result<Vec<Token>, String> {
    const OPS: [&str; 12] = ["||", "&&", "==", "!=", "<=", ">=", "!", "(", ")", "<", ">", "-"];
    let mut tokens = Vec::new();
    let mut rest = expression.trim_start();
    while !rest.is_empty() {
        let c = rest.chars().next().unwrap_or(' ');
        if c.is_ascii_digit() {
            let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            let number = rest[..end].parse().map_err(|e| format!("{e}"))?;
            tokens.push(Token::Number(number));
            rest = &rest[end..];
        } else if c.is_ascii_alphabetic() || c == '_' {
            let end = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            tokens.push(Token::Ident(rest[..end].to_owned()));
            rest = &rest[end..];
        } else if let Some(op) = OPS.iter().find(|op| rest.starts_with(**op)) {
            tokens.push(Token::Op(*op));
            rest = &rest[op.len()..];
        } else {
            return Err(format!("unexpected `{c}` in `{expression}`"));
        }
        rest = rest.trim_start();
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
    defines: &'a HashMap<String, String>,
}

impl Parser<'_> {
    fn peek_op(&self, op: &str) -> bool {
        matches!(self.tokens.get(self.position), Some(Token::Op(o)) if *o == op)
    }

    fn eat_op(&mut self, op: &str) -> bool {
        let found = self.peek_op(op);
        if found {
            self.position += 1;
        }
        found
    }

    fn or(&mut self) -> Result<i64, String> {
        let mut value = self.and()?;
        while self.eat_op("||") {
            let rhs = self.and()?;
            value = (value != 0 || rhs != 0) as i64;
        }
        Ok(value)
    }

    fn and(&mut self) -> Result<i64, String> {
        let mut value = self.equality()?;
        while self.eat_op("&&") {
            let rhs = self.equality()?;
            value = (value != 0 && rhs != 0) as i64;
        }
        Ok(value)
    }

    fn equality(&mut self) -> Result<i64, String> {
        let mut value = self.relational()?;
        loop {
            if self.eat_op("==") {
                value = (value == self.relational()?) as i64;
            } else if self.eat_op("!=") {
                value = (value != self.relational()?) as i64;
            } else {
                return Ok(value);
            }
        }
    }

    fn relational(&mut self) -> Result<i64, String> {
        let mut value = self.unary()?;
        loop {
            if self.eat_op("<=") {
                value = (value <= self.unary()?) as i64;
            } else if self.eat_op(">=") {
                value = (value >= self.unary()?) as i64;
            } else if self.eat_op("<") {
                value = (value < self.unary()?) as i64;
            } else if self.eat_op(">") {
                value = (value > self.unary()?) as i64;
            } else {
                return Ok(value);
            }
        }
    }

    fn unary(&mut self) -> Result<i64, String> {
        if self.eat_op("!") {
            return Ok((self.unary()? == 0) as i64);
        }
        if self.eat_op("-") {
            return Ok(-self.unary()?);
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<i64, String> {
        if self.eat_op("(") {
            let value = self.or()?;
            if !self.eat_op(")") {
                return Err("missing `)`".to_owned());
            }
            return Ok(value);
        }
        match self.tokens.get(self.position).cloned() {
            Some(Token::Number(n)) => {
                self.position += 1;
                Ok(n)
            }
            Some(Token::Ident(name)) if name == "defined" => {
                self.position += 1;
                let parenthesized = self.eat_op("(");
                let Some(Token::Ident(macro_name)) = self.tokens.get(self.position).cloned() else {
                    return Err("`defined` needs a macro name".to_owned());
                };
                self.position += 1;
                if parenthesized && !self.eat_op(")") {
                    return Err("missing `)` after defined".to_owned());
                }
                Ok(self.defines.contains_key(&macro_name) as i64)
            }
            Some(Token::Ident(name)) => {
                self.position += 1;
                Ok(self.macro_value(&name, 0))
            }
            other => Err(format!("unexpected {other:?}")),
        }
    }

    /// Expands an object-like macro to an integer; undefined names are 0.
    fn macro_value(&self, name: &str, depth: usize) -> i64 {
        const MAX_EXPANSION: usize = 8;
        match self.defines.get(name) {
            Some(value) if depth < MAX_EXPANSION => match value.parse() {
                Ok(n) => n,
                Err(_) => self.macro_value(value, depth + 1),
            },
            _ => 0,
        }
    }
}

fn declaration(line: &str) -> Option<Declaration> {
    let kind = if line.starts_with("uniform ") {
        DeclarationKind::Uniform
    } else if line.starts_with("attribute ") {
        DeclarationKind::Attribute
    } else {
        return None;
    };
    let statement = line.split(';').next()?.trim();
    let name = statement.split_whitespace().last()?;
    let name = name.split('[').next()?;
    Some(Declaration {
        kind,
        name: name.to_owned(),
    })
}

/// Declarations that survive preprocessing, in source order.
fn active_declarations(source: &str) -> Result<Vec<Declaration>, String> {
    let mut preprocessor = Preprocessor::default();
    let mut declarations = Vec::new();
    for line in source.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            preprocessor.directive(line)?;
        } else if preprocessor.active() {
            declarations.extend(declaration(line));
        }
    }
    if !preprocessor.branches.is_empty() {
        return Err("unterminated conditional group".to_owned());
    }
    Ok(declarations)
}
