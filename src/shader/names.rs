// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0

use crate::state::{AttributeId, UniformId};
use std::collections::HashMap;
use std::sync::OnceLock;

/// What an introspected name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticId {
    Attribute(AttributeId),
    Uniform(UniformId),
}

fn table() -> &'static HashMap<&'static str, SemanticId> {
    static TABLE: OnceLock<HashMap<&'static str, SemanticId>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let attributes = AttributeId::ALL
            .iter()
            .map(|id| (id.glsl_name(), SemanticId::Attribute(*id)));
        let uniforms = UniformId::ALL
            .iter()
            .map(|id| (id.glsl_name(), SemanticId::Uniform(*id)));
        attributes.chain(uniforms).collect()
    })
}

/// Maps a GLSL name reported by the linker to its semantic ID.
///
/// Some drivers report arrays as `name[0]`; the suffix is ignored.
pub fn lookup(name: &str) -> Option<SemanticId> {
    let name = name.strip_suffix("[0]").unwrap_or(name);
    table().get(name).copied()
}
