// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Which program a draw gets for a given fixed-function state.

use fixed_function::gl::{Capability, FogMode, HintMode, HintTarget, Primitive, TexEnvMode};
use fixed_function::math::Vector4;
use fixed_function::shader::ShaderId;
use fixed_function::{Call, Config, Context, FogParam, LightParam, RecordingBackend, TexEnvParam};

fn context() -> Context<RecordingBackend> {
    Context::new(RecordingBackend::new(), Config::default())
}

fn draw(c: &mut Context<RecordingBackend>) {
    c.draw_arrays(Primitive::Triangles, 0, 3).unwrap();
}

fn current_contains(c: &Context<RecordingBackend>, fragment: ShaderId) -> bool {
    c.current_program()
        .map(|p| p.sources().contains(fragment))
        .unwrap_or(false)
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn hidden_state_reuses_the_default_program() {
    let mut c = context();
    draw(&mut c);
    c.fog(FogParam::Mode(FogMode::Linear));
    c.light(1, LightParam::Diffuse(Vector4::new(1.0, 0.0, 0.0, 1.0)))
        .unwrap();
    c.enable(Capability::Light(1)).unwrap();
    c.alpha_func(fixed_function::gl::AlphaFunc::Greater, 0.5);
    draw(&mut c);
    assert_eq!(c.cached_program_count(), 1);
    assert_eq!(c.backend().link_count(), 1);
    assert_eq!(c.backend().count(|call| matches!(call, Call::UseProgram(_))), 1);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn toggling_state_switches_between_cached_programs() {
    let mut c = context();
    draw(&mut c);
    let plain = c.backend().current_program();
    c.enable(Capability::Fog).unwrap();
    draw(&mut c);
    let fogged = c.backend().current_program();
    assert_ne!(plain, fogged);
    assert!(current_contains(&c, ShaderId::FogVertex));
    assert!(!current_contains(&c, ShaderId::FogFragment));

    c.disable(Capability::Fog).unwrap();
    draw(&mut c);
    assert_eq!(c.backend().current_program(), plain);
    c.enable(Capability::Fog).unwrap();
    draw(&mut c);
    assert_eq!(c.backend().current_program(), fogged);
    assert_eq!(c.backend().link_count(), 2);
    assert_eq!(c.backend().count(|call| matches!(call, Call::UseProgram(_))), 4);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn hints_choose_per_vertex_or_per_fragment_code() {
    let mut c = context();
    c.enable(Capability::Fog).unwrap();
    c.hint(HintTarget::Fog, HintMode::Nicest);
    draw(&mut c);
    assert!(current_contains(&c, ShaderId::FogFragment));
    assert!(!current_contains(&c, ShaderId::FogVertex));

    // DontCare behaves as Fastest, so this is the per-vertex variant
    c.hint(HintTarget::Fog, HintMode::DontCare);
    draw(&mut c);
    assert!(current_contains(&c, ShaderId::FogVertex));

    c.enable(Capability::Lighting).unwrap();
    c.hint(HintTarget::Lighting, HintMode::Nicest);
    draw(&mut c);
    assert!(current_contains(&c, ShaderId::LightingPerFragmentVertex));
    assert!(current_contains(&c, ShaderId::LightingPerFragmentFragment));
    assert_eq!(c.cached_program_count(), 3);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn texturing_pulls_in_unit_fragments() {
    let mut c = context();
    c.active_texture(1).unwrap();
    c.enable(Capability::Texture2D).unwrap();
    draw(&mut c);
    assert!(current_contains(&c, ShaderId::Texture1Fragment));
    assert!(!current_contains(&c, ShaderId::TextureFragment));
    assert!(!current_contains(&c, ShaderId::Texture0Fragment));

    c.tex_env(TexEnvParam::Mode(TexEnvMode::Combine)).unwrap();
    draw(&mut c);
    assert!(current_contains(&c, ShaderId::TextureFragment));
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn defines_reflect_the_state() {
    let mut c = context();
    c.enable(Capability::Fog).unwrap();
    c.fog(FogParam::Mode(FogMode::Linear));
    draw(&mut c);
    let vertex = c
        .backend()
        .calls()
        .iter()
        .find_map(|call| match call {
            Call::CompileShader {
                shader,
                stage: fixed_function::shader::Stage::Vertex,
            } => Some(*shader),
            _ => None,
        })
        .unwrap();
    let source = c.backend().shader_source(vertex).unwrap();
    assert!(source.contains("#define FOG_ENABLED 1\n"));
    assert!(source.contains("#define FOG_MODE 9729\n"));
    assert!(source.contains("#define LIGHTING_ENABLED 0\n"));
    assert!(!source.contains("#define UBER_SHADER"));
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn uber_mode_compiles_once() {
    let mut c = Context::new(RecordingBackend::new(), Config::default().with_uber_shader(true));
    draw(&mut c);
    c.enable(Capability::Lighting).unwrap();
    c.enable(Capability::Fog).unwrap();
    c.enable(Capability::Texture2D).unwrap();
    c.hint(HintTarget::Lighting, HintMode::Nicest);
    draw(&mut c);
    assert_eq!(c.backend().link_count(), 1);
    assert_eq!(c.cached_program_count(), 1);
    assert_eq!(c.current_program().map(|p| p.name()), Some("uber"));
    // runtime flags arrive as uniforms instead
    let uploaded = c.backend().uploaded_uniforms();
    assert!(uploaded.contains(&"u_lightingEnabled"));
    assert!(uploaded.contains(&"u_fogEnabled"));
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn bounded_cache_evicts_and_rebuilds() {
    let mut c = Context::new(
        RecordingBackend::new(),
        Config::default().with_max_cached_variants(Some(1)),
    );
    draw(&mut c);
    c.enable(Capability::Fog).unwrap();
    draw(&mut c);
    assert_eq!(c.cached_program_count(), 1);
    assert_eq!(c.backend().live_programs(), 1);
    c.disable(Capability::Fog).unwrap();
    draw(&mut c);
    assert_eq!(c.backend().link_count(), 3);
    assert_eq!(c.backend().count(|call| matches!(call, Call::DrawArrays { .. })), 3);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn dropping_the_context_releases_programs() {
    let mut c = context();
    draw(&mut c);
    c.enable(Capability::AlphaTest).unwrap();
    draw(&mut c);
    c.destroy();
    assert_eq!(c.backend().live_programs(), 0);
    assert_eq!(c.cached_program_count(), 0);
    // still usable afterwards
    draw(&mut c);
    assert_eq!(c.backend().live_programs(), 1);
}
