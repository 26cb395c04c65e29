// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0

use super::fragments::ShaderId;
use super::Stage;
use crate::state::graph::descriptor;
use crate::state::StateModel;

const UBER_DEFINE: &str = "#define UBER_SHADER 1\n";

/// Generated source of both stages and the fragments they were built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
    /// Included fragments in catalog order.
    pub fragments: Vec<ShaderId>,
}

impl ShaderSources {
    pub fn source(&self, stage: Stage) -> &str {
        match stage {
            Stage::Vertex => &self.vertex,
            Stage::Fragment => &self.fragment,
        }
    }

    pub fn contains(&self, fragment: ShaderId) -> bool {
        self.fragments.contains(&fragment)
    }
}

/// Fragments the state needs, deduplicated, in catalog order.
pub fn required_fragments<B>(state: &StateModel<B>) -> Vec<ShaderId> {
    let mut required = [false; ShaderId::COUNT];
    required[ShaderId::MainVertex as usize] = true;
    required[ShaderId::MainFragment as usize] = true;
    for id in state.shader_affecting() {
        if !state.is_relevant(id) {
            continue;
        }
        for fragment in descriptor(id).required_by(state.key_word(id)) {
            required[*fragment as usize] = true;
        }
    }
    ShaderId::all().filter(|f| required[*f as usize]).collect()
}

fn concatenate(fragments: &[ShaderId], prefixes: &[String], stage: Stage) -> String {
    let mut source = String::new();
    for fragment in fragments.iter().filter(|f| f.stage() == stage) {
        source.push_str(&prefixes[*fragment as usize]);
        source.push_str(fragment.fragment().source);
        source.push('\n');
    }
    source
}

/// Builds the sources of the variant for the current state.
///
/// Each shader-affecting value with a define name becomes a `#define` at the
/// top of every included fragment it targets.  An irrelevant value is
/// written as 0.
pub fn assemble<B>(state: &StateModel<B>) -> ShaderSources {
    let fragments = required_fragments(state);
    let mut prefixes = vec![String::new(); ShaderId::COUNT];
    for id in state.shader_affecting() {
        let Some(name) = id.define_name() else {
            continue;
        };
        let value = state
            .relevant_value(id)
            .and_then(|v| v.define_text())
            .unwrap_or_else(|| "0".to_owned());
        for target in descriptor(id).define_in {
            if fragments.contains(target) {
                let prefix = &mut prefixes[*target as usize];
                prefix.push_str("#define ");
                prefix.push_str(name);
                prefix.push(' ');
                prefix.push_str(&value);
                prefix.push('\n');
            }
        }
    }
    ShaderSources {
        vertex: concatenate(&fragments, &prefixes, Stage::Vertex),
        fragment: concatenate(&fragments, &prefixes, Stage::Fragment),
        fragments,
    }
}

/// Builds the single program that branches on uniforms instead of defines.
pub fn assemble_uber() -> ShaderSources {
    let fragments: Vec<ShaderId> = ShaderId::all().collect();
    let mut prefixes = vec![String::new(); ShaderId::COUNT];
    prefixes[ShaderId::MainVertex as usize] = UBER_DEFINE.to_owned();
    prefixes[ShaderId::MainFragment as usize] = UBER_DEFINE.to_owned();
    ShaderSources {
        vertex: concatenate(&fragments, &prefixes, Stage::Vertex),
        fragment: concatenate(&fragments, &prefixes, Stage::Fragment),
        fragments,
    }
}
