// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0

use super::assembly::ShaderSources;
use super::names::{SemanticId, lookup};
use super::Stage;
use crate::backend::Backend;
use crate::error::Error;
use crate::state::{AttributeId, UniformId};
use std::fmt::Debug;

/// A linked program and the semantic IDs of everything it kept.
pub struct AssembledProgram<B: Backend> {
    name: String,
    sources: ShaderSources,
    program: B::Program,
    attributes: Vec<(AttributeId, u32)>,
    uniforms: Vec<(UniformId, B::UniformLocation)>,
}

impl<B: Backend> Debug for AssembledProgram<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssembledProgram")
            .field("name", &self.name)
            .field("program", &self.program)
            .field("fragments", &self.sources.fragments)
            .field("attributes", &self.attributes.len())
            .field("uniforms", &self.uniforms.len())
            .finish()
    }
}

fn compile<B: Backend>(backend: &mut B, name: &str, stage: Stage, source: &str) -> Result<B::Shader, Error> {
    backend.compile_shader(stage, source).map_err(|log| {
        let err = Error::Compile {
            stage,
            program: name.to_owned(),
            log,
        };
        logwise::error_sync!("{err}", err = logwise::privacy::LogIt(&err));
        err
    })
}

impl<B: Backend> AssembledProgram<B> {
    /// Compiles, links and introspects `sources`.
    ///
    /// Shader objects are released whether or not linking succeeds.  A program
    /// that keeps a name outside the semantic-ID table is deleted and reported.
    pub fn build(backend: &mut B, name: &str, sources: ShaderSources) -> Result<Self, Error> {
        let vertex = compile(backend, name, Stage::Vertex, &sources.vertex)?;
        let fragment = match compile(backend, name, Stage::Fragment, &sources.fragment) {
            Ok(fragment) => fragment,
            Err(e) => {
                backend.delete_shader(vertex);
                return Err(e);
            }
        };
        let linked = backend.link_program(&vertex, &fragment);
        backend.delete_shader(vertex);
        backend.delete_shader(fragment);
        let (program, log) = linked.map_err(|log| {
            let err = Error::Link {
                program: name.to_owned(),
                log,
            };
            logwise::error_sync!("{err}", err = logwise::privacy::LogIt(&err));
            err
        })?;
        if !log.trim().is_empty() {
            logwise::warn_sync!(
                "linking {name} reported: {log}",
                name = logwise::privacy::LogIt(&name),
                log = logwise::privacy::LogIt(&log)
            );
        }

        match introspect(backend, name, &program) {
            Ok((attributes, uniforms)) => {
                logwise::info_sync!(
                    "built {name} from {fragments}",
                    name = logwise::privacy::LogIt(&name),
                    fragments = logwise::privacy::LogIt(&sources.fragments)
                );
                Ok(AssembledProgram {
                    name: name.to_owned(),
                    sources,
                    program,
                    attributes,
                    uniforms,
                })
            }
            Err(e) => {
                backend.delete_program(&program);
                logwise::error_sync!("{err}", err = logwise::privacy::LogIt(&e));
                Err(e)
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sources(&self) -> &ShaderSources {
        &self.sources
    }

    pub fn program(&self) -> &B::Program {
        &self.program
    }

    /// Attributes the linker kept, with their locations.
    pub fn attributes(&self) -> &[(AttributeId, u32)] {
        &self.attributes
    }

    /// Uniforms the linker kept, with their locations.
    pub fn uniforms(&self) -> &[(UniformId, B::UniformLocation)] {
        &self.uniforms
    }

    pub fn attribute_location(&self, id: AttributeId) -> Option<u32> {
        self.attributes.iter().find(|(a, _)| *a == id).map(|(_, l)| *l)
    }

    pub fn uniform_location(&self, id: UniformId) -> Option<&B::UniformLocation> {
        self.uniforms.iter().find(|(u, _)| *u == id).map(|(_, l)| l)
    }

    /// Releases the GPU program.
    pub fn delete(&self, backend: &mut B) {
        backend.delete_program(&self.program);
    }
}

type Introspected<L> = (Vec<(AttributeId, u32)>, Vec<(UniformId, L)>);

fn introspect<B: Backend>(
    backend: &mut B,
    name: &str,
    program: &B::Program,
) -> Result<Introspected<B::UniformLocation>, Error> {
    let mut attributes = Vec::new();
    for (attribute, location) in backend.active_attributes(program) {
        if attribute.starts_with("gl_") {
            continue;
        }
        match lookup(&attribute) {
            Some(SemanticId::Attribute(id)) => attributes.push((id, location)),
            _ => {
                return Err(Error::UnknownAttribute {
                    name: attribute,
                    program: name.to_owned(),
                });
            }
        }
    }
    let mut uniforms = Vec::new();
    for (uniform, location) in backend.active_uniforms(program) {
        if uniform.starts_with("gl_") {
            continue;
        }
        match lookup(&uniform) {
            Some(SemanticId::Uniform(id)) => uniforms.push((id, location)),
            _ => {
                return Err(Error::UnknownUniform {
                    name: uniform,
                    program: name.to_owned(),
                });
            }
        }
    }
    Ok((attributes, uniforms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Call, RecordingBackend};
    use crate::shader::{assemble, assemble_uber};
    use crate::state::StateModel;

    fn default_sources() -> ShaderSources {
        assemble(&StateModel::<u32>::new(3))
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn default_variant_keeps_only_what_it_uses() {
        let mut backend = RecordingBackend::new();
        let program = AssembledProgram::build(&mut backend, "variant #0", default_sources()).unwrap();
        assert!(program.uniform_location(UniformId::ModelViewProjectionMatrix).is_some());
        assert!(program.uniform_location(UniformId::Light0Diffuse).is_none());
        assert!(program.attribute_location(AttributeId::Position).is_some());
        assert_eq!(backend.count(|c| matches!(c, Call::DeleteShader(_))), 2);
        assert_eq!(backend.live_programs(), 1);
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn uber_program_keeps_every_runtime_flag() {
        let mut backend = RecordingBackend::new();
        let program = AssembledProgram::build(&mut backend, "uber", assemble_uber()).unwrap();
        for id in [
            UniformId::LightingEnabled,
            UniformId::FogMode,
            UniformId::Texture2EnvMode,
            UniformId::Light2Enabled,
        ] {
            assert!(program.uniform_location(id).is_some(), "{id:?}");
        }
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn compile_failure_names_the_stage_and_cleans_up() {
        let mut backend = RecordingBackend::new();
        backend.fail_next_compile(Stage::Fragment, "0:1: error");
        let err = AssembledProgram::build(&mut backend, "variant #3", default_sources()).unwrap_err();
        assert_eq!(
            err,
            Error::Compile {
                stage: Stage::Fragment,
                program: "variant #3".to_owned(),
                log: "0:1: error".to_owned()
            }
        );
        assert_eq!(backend.count(|c| matches!(c, Call::DeleteShader(_))), 1);
        assert_eq!(backend.link_count(), 0);
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn link_failure_releases_both_shaders() {
        let mut backend = RecordingBackend::new();
        backend.fail_next_link("varying mismatch");
        let err = AssembledProgram::build(&mut backend, "p", default_sources()).unwrap_err();
        assert!(matches!(err, Error::Link { ref log, .. } if log == "varying mismatch"));
        assert_eq!(backend.count(|c| matches!(c, Call::DeleteShader(_))), 2);
        assert_eq!(backend.live_programs(), 0);
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn link_warnings_do_not_fail() {
        let mut backend = RecordingBackend::new();
        backend.warn_next_link("warning: unused varying");
        assert!(AssembledProgram::build(&mut backend, "p", default_sources()).is_ok());
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn unknown_names_are_rejected() {
        let mut backend = RecordingBackend::new();
        backend.inject_active_uniform("u_mystery");
        let err = AssembledProgram::build(&mut backend, "p", default_sources()).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownUniform {
                name: "u_mystery".to_owned(),
                program: "p".to_owned()
            }
        );
        assert_eq!(backend.live_programs(), 0);

        let mut backend = RecordingBackend::new();
        backend.inject_active_attribute("gl_VertexID");
        backend.inject_active_attribute("a_bogus");
        let err = AssembledProgram::build(&mut backend, "p", default_sources()).unwrap_err();
        assert!(matches!(err, Error::UnknownAttribute { ref name, .. } if name == "a_bogus"));
    }
}
