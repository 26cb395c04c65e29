// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Engine configuration.

use crate::state::ids::MAX_TEXTURE_UNITS;

/// Options fixed for the lifetime of a [`Context`](crate::Context).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Build one program with every fragment and branch on uniforms instead of
    /// compiling a variant per state combination.
    pub uber_shader: bool,
    /// Texture units exposed to the client, clamped to `1..=3`.
    pub max_texture_units: usize,
    /// Upper bound on cached variants.  `None` never evicts; otherwise the
    /// least recently resolved variant is deleted to make room.
    pub max_cached_variants: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            uber_shader: false,
            max_texture_units: MAX_TEXTURE_UNITS,
            max_cached_variants: None,
        }
    }
}

impl Config {
    /// Defaults, overridden by `FF_UBER_SHADER=1` and `FF_MAX_CACHED_VARIANTS=<n>`.
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            uber_shader: std::env::var("FF_UBER_SHADER")
                .map(|e| e == "1")
                .unwrap_or(defaults.uber_shader),
            max_cached_variants: std::env::var("FF_MAX_CACHED_VARIANTS")
                .ok()
                .and_then(|e| e.parse().ok())
                .or(defaults.max_cached_variants),
            ..defaults
        }
    }

    /// `max_texture_units` within what the fragment catalog supports.
    pub fn texture_units(&self) -> usize {
        self.max_texture_units.clamp(1, MAX_TEXTURE_UNITS)
    }

    pub fn with_uber_shader(mut self, uber_shader: bool) -> Self {
        self.uber_shader = uber_shader;
        self
    }

    pub fn with_max_texture_units(mut self, units: usize) -> Self {
        self.max_texture_units = units;
        self
    }

    pub fn with_max_cached_variants(mut self, max: Option<usize>) -> Self {
        self.max_cached_variants = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn texture_units_are_clamped() {
        assert_eq!(Config::default().texture_units(), 3);
        assert_eq!(Config::default().with_max_texture_units(0).texture_units(), 1);
        assert_eq!(Config::default().with_max_texture_units(8).texture_units(), 3);
        assert_eq!(Config::default().with_max_texture_units(2).texture_units(), 2);
    }
}
