// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Compiled programs, keyed by the exact shader-affecting state they were built for.

The key packs every shader-affecting value: one bit per boolean, then one word
per integer.  Values hidden behind a false parent pack as 0, so state that
can't reach the generated source never splits variants.

Lookup is a linear scan; the number of variants a client actually reaches is
small.
*/

use crate::backend::Backend;
use crate::error::Error;
use crate::shader::{AssembledProgram, assemble, assemble_uber};
use crate::state::ids::{BOOL_COUNT, INT_COUNT};
use crate::state::StateModel;
use std::rc::Rc;

/// Words in a packed [`StateKey`].
pub const STATE_WORDS: usize = 1 + BOOL_COUNT / 32 + INT_COUNT;
const BOOL_WORDS: usize = 1 + BOOL_COUNT / 32;

/// Packed shader-affecting state.
pub type StateKey = [u32; STATE_WORDS];

/// Packs the shader-affecting subset of `state`.
pub fn pack_key<Buffer>(state: &StateModel<Buffer>) -> StateKey {
    let mut key = [0u32; STATE_WORDS];
    for id in state.shader_affecting() {
        let index = id.index();
        let word = state.key_word(id);
        if id.is_bool() {
            if word != 0 {
                key[index / 32] |= 1u32 << (index % 32);
            }
        } else {
            key[BOOL_WORDS + index - BOOL_COUNT] = word as u32;
        }
    }
    key
}

struct CacheEntry<B: Backend> {
    key: StateKey,
    program: Rc<AssembledProgram<B>>,
    last_used: u64,
}

/// Owner of every compiled program of one context.
pub struct VariantCache<B: Backend> {
    uber_shader: bool,
    max_entries: Option<usize>,
    entries: Vec<CacheEntry<B>>,
    uber: Option<Rc<AssembledProgram<B>>>,
    clock: u64,
    built: usize,
}

impl<B: Backend> std::fmt::Debug for VariantCache<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantCache")
            .field("uber_shader", &self.uber_shader)
            .field("max_entries", &self.max_entries)
            .field("entries", &self.entries.len())
            .field("built", &self.built)
            .finish()
    }
}

impl<B: Backend> VariantCache<B> {
    pub fn new(uber_shader: bool, max_entries: Option<usize>) -> Self {
        VariantCache {
            uber_shader,
            max_entries: max_entries.map(|n| n.max(1)),
            entries: Vec::new(),
            uber: None,
            clock: 0,
            built: 0,
        }
    }

    /// Returns the program for the current state, building it on first use.
    ///
    /// Resolving the same state again returns the same `Rc`.  A program that
    /// fails to build is not cached, so the next draw tries again.
    pub fn resolve(
        &mut self,
        backend: &mut B,
        state: &StateModel<B::Buffer>,
    ) -> Result<Rc<AssembledProgram<B>>, Error> {
        if self.uber_shader {
            return self.resolve_uber(backend);
        }
        self.clock += 1;
        let key = pack_key(state);
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            entry.last_used = self.clock;
            return Ok(entry.program.clone());
        }

        logwise::trace_sync!(
            "variant cache miss for {key}",
            key = logwise::privacy::LogIt(&key)
        );
        let name = format!("variant #{}", self.built);
        let compile = logwise::perfwarn_begin!("VariantCache::resolve compile");
        let program = AssembledProgram::build(backend, &name, assemble(state));
        drop(compile);
        let program = Rc::new(program?);
        self.built += 1;

        if let Some(max) = self.max_entries {
            self.evict(backend, max - 1);
        }
        self.entries.push(CacheEntry {
            key,
            program: program.clone(),
            last_used: self.clock,
        });
        Ok(program)
    }

    fn resolve_uber(&mut self, backend: &mut B) -> Result<Rc<AssembledProgram<B>>, Error> {
        if let Some(uber) = &self.uber {
            return Ok(uber.clone());
        }
        let compile = logwise::perfwarn_begin!("VariantCache::resolve_uber compile");
        let program = AssembledProgram::build(backend, "uber", assemble_uber());
        drop(compile);
        let program = Rc::new(program?);
        self.built += 1;
        self.uber = Some(program.clone());
        Ok(program)
    }

    /// Deletes least recently resolved entries until at most `keep` remain.
    fn evict(&mut self, backend: &mut B, keep: usize) {
        while self.entries.len() > keep {
            let Some(index) = self
                .entries
                .iter()
                .enumerate()
                .min_by_key(|(_, e)| e.last_used)
                .map(|(index, _)| index)
            else {
                break;
            };
            let entry = self.entries.remove(index);
            logwise::trace_sync!(
                "evicting {name}",
                name = logwise::privacy::LogIt(&entry.program.name())
            );
            entry.program.delete(backend);
        }
    }

    /// Programs currently held, the uber program included.
    pub fn cached_count(&self) -> usize {
        self.entries.len() + usize::from(self.uber.is_some())
    }

    /// Programs built since creation, evicted ones included.
    pub fn built_count(&self) -> usize {
        self.built
    }

    /// Deletes every GPU program.
    pub fn destroy(&mut self, backend: &mut B) {
        for entry in self.entries.drain(..) {
            entry.program.delete(backend);
        }
        if let Some(uber) = self.uber.take() {
            uber.delete(backend);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingBackend;
    use crate::gl;
    use crate::state::UniformId;

    fn state() -> StateModel<u32> {
        StateModel::new(3)
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn key_layout() {
        assert_eq!(STATE_WORDS, 53);
        let mut s = state();
        s.set_bool(UniformId::ColorEnabled, true);
        s.set_bool(UniformId::FogEnabled, true);
        let key = pack_key(&s);
        assert_eq!(
            key[0],
            1u32 << UniformId::ColorEnabled.index() | 1u32 << UniformId::FogEnabled.index()
        );
        assert_eq!(key[BOOL_WORDS], gl::EXP);
        // FogHint's parent is on as well
        assert_eq!(key[BOOL_WORDS + 1], gl::FASTEST);
        // AlphaFunc is hidden behind a disabled alpha test
        assert_eq!(key[BOOL_WORDS + 2], 0);
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn irrelevant_children_do_not_split_keys() {
        let a = state();
        let mut b = state();
        b.set_int(UniformId::FogMode, gl::LINEAR as i32);
        b.set_bool(UniformId::Light2Enabled, true);
        assert_eq!(pack_key(&a), pack_key(&b));
        b.set_bool(UniformId::FogEnabled, true);
        assert_ne!(pack_key(&a), pack_key(&b));
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn same_state_same_program() {
        let mut backend = RecordingBackend::new();
        let mut cache = VariantCache::new(false, None);
        let mut s = state();
        let first = cache.resolve(&mut backend, &s).unwrap();
        let again = cache.resolve(&mut backend, &s).unwrap();
        assert!(Rc::ptr_eq(&first, &again));
        assert_eq!(cache.cached_count(), 1);
        s.set_bool(UniformId::AlphaTestEnabled, true);
        let other = cache.resolve(&mut backend, &s).unwrap();
        assert!(!Rc::ptr_eq(&first, &other));
        assert_eq!(cache.cached_count(), 2);
        assert_eq!(other.name(), "variant #1");
        assert_eq!(backend.link_count(), 2);
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn failures_are_not_cached() {
        let mut backend = RecordingBackend::new();
        let mut cache = VariantCache::new(false, None);
        backend.fail_next_link("nope");
        assert!(cache.resolve(&mut backend, &state()).is_err());
        assert_eq!(cache.cached_count(), 0);
        assert!(cache.resolve(&mut backend, &state()).is_ok());
        assert_eq!(cache.cached_count(), 1);
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn lru_bound_evicts_oldest() {
        let mut backend = RecordingBackend::new();
        let mut cache = VariantCache::new(false, Some(2));
        let mut s = state();
        let a = cache.resolve(&mut backend, &s).unwrap();
        s.set_bool(UniformId::FogEnabled, true);
        cache.resolve(&mut backend, &s).unwrap();
        // touch the first entry so the fog variant becomes the oldest
        s.set_bool(UniformId::FogEnabled, false);
        assert!(Rc::ptr_eq(&a, &cache.resolve(&mut backend, &s).unwrap()));
        s.set_bool(UniformId::AlphaTestEnabled, true);
        cache.resolve(&mut backend, &s).unwrap();
        assert_eq!(cache.cached_count(), 2);
        assert_eq!(backend.live_programs(), 2);
        s.set_bool(UniformId::AlphaTestEnabled, false);
        assert!(Rc::ptr_eq(&a, &cache.resolve(&mut backend, &s).unwrap()));
        assert_eq!(cache.built_count(), 3);
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn uber_program_is_built_once() {
        let mut backend = RecordingBackend::new();
        let mut cache = VariantCache::new(true, None);
        let mut s = state();
        let first = cache.resolve(&mut backend, &s).unwrap();
        s.set_bool(UniformId::LightingEnabled, true);
        let second = cache.resolve(&mut backend, &s).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(backend.link_count(), 1);
        cache.destroy(&mut backend);
        assert_eq!(backend.live_programs(), 0);
        assert_eq!(cache.cached_count(), 0);
    }
}
