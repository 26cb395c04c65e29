// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Draws send only what the bound program declares and hasn't seen yet.

use fixed_function::gl::{Capability, ClientArray, DataType, Primitive};
use fixed_function::math::Vector4;
use fixed_function::state::VertexPointer;
use fixed_function::{Call, Config, Context, FogParam, LightParam, RecordingBackend, UploadStats};

fn context() -> Context<RecordingBackend> {
    Context::new(RecordingBackend::new(), Config::default())
}

/// Draws, returning the calls the draw made.
fn draw(c: &mut Context<RecordingBackend>) -> Vec<Call> {
    c.backend_mut().clear_calls();
    c.draw_arrays(Primitive::Triangles, 0, 3).unwrap();
    c.backend().calls().to_vec()
}

fn uploaded(c: &Context<RecordingBackend>) -> Vec<String> {
    let mut names: Vec<String> = c
        .backend()
        .uploaded_uniforms()
        .into_iter()
        .map(str::to_owned)
        .collect();
    names.sort();
    names
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn repeated_draws_upload_nothing() {
    let mut c = context();
    draw(&mut c);
    assert_eq!(uploaded(&c), ["u_modelViewProjectionMatrix"]);
    assert_eq!(
        c.upload_stats(),
        UploadStats {
            uniform_uploads: 1,
            pointer_uploads: 0,
            attribute_toggles: 1
        }
    );

    let calls = draw(&mut c);
    assert_eq!(
        calls,
        [Call::DrawArrays {
            mode: Primitive::Triangles,
            first: 0,
            count: 3
        }]
    );
    assert_eq!(c.upload_stats().total(), 2);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn only_changed_values_are_resent() {
    let mut c = context();
    c.enable(Capability::Fog).unwrap();
    draw(&mut c);
    assert_eq!(
        uploaded(&c),
        [
            "u_fogColor",
            "u_fogDensity",
            "u_modelViewMatrix",
            "u_modelViewProjectionMatrix"
        ]
    );

    // rewriting the value the program already has is free
    c.fog(FogParam::Density(1.0));
    draw(&mut c);
    assert!(uploaded(&c).is_empty());

    c.fog(FogParam::Density(0.25));
    draw(&mut c);
    assert_eq!(uploaded(&c), ["u_fogDensity"]);

    c.translate(1.0, 0.0, 0.0);
    draw(&mut c);
    assert_eq!(uploaded(&c), ["u_modelViewMatrix", "u_modelViewProjectionMatrix"]);

    // start and end are not declared by exponential fog
    c.fog(FogParam::Start(2.0));
    c.fog(FogParam::End(5.0));
    draw(&mut c);
    assert!(uploaded(&c).is_empty());
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn nan_values_are_uploaded_once() {
    let mut c = context();
    c.enable(Capability::Fog).unwrap();
    c.fog(FogParam::Density(f32::NAN));
    draw(&mut c);
    assert!(uploaded(&c).contains(&"u_fogDensity".to_owned()));
    let calls = draw(&mut c);
    assert_eq!(calls.len(), 1);
    assert!(uploaded(&c).is_empty());
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn undeclared_lights_are_never_uploaded() {
    let mut c = context();
    c.enable(Capability::Lighting).unwrap();
    c.enable(Capability::Light(0)).unwrap();
    draw(&mut c);
    assert!(uploaded(&c).contains(&"u_light0Diffuse".to_owned()));
    assert!(!uploaded(&c).iter().any(|name| name.starts_with("u_light1")));

    c.light(1, LightParam::Diffuse(Vector4::new(0.0, 1.0, 0.0, 1.0)))
        .unwrap();
    draw(&mut c);
    assert!(uploaded(&c).is_empty());

    c.light(0, LightParam::Diffuse(Vector4::new(0.0, 1.0, 0.0, 1.0)))
        .unwrap();
    draw(&mut c);
    assert_eq!(uploaded(&c), ["u_light0Diffuse"]);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn switching_programs_resends_everything_declared() {
    let mut c = context();
    draw(&mut c);
    c.enable(Capability::Fog).unwrap();
    draw(&mut c);
    c.disable(Capability::Fog).unwrap();
    let calls = draw(&mut c);
    // uniform storage is per program, so the unchanged matrix goes out again
    assert_eq!(uploaded(&c), ["u_modelViewProjectionMatrix"]);
    assert!(calls.iter().any(|call| matches!(call, Call::UseProgram(Some(_)))));
    assert!(calls.contains(&Call::AttributeEnabled {
        location: 0,
        enabled: false
    }));
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn vertex_arrays_are_tracked() {
    let mut c = context();
    c.enable_client_state(ClientArray::Vertex);
    c.vertex_pointer(3, DataType::Float, 12, Some(5), 0).unwrap();
    let calls = draw(&mut c);
    assert!(calls.contains(&Call::AttributeEnabled {
        location: 0,
        enabled: true
    }));
    assert!(calls.contains(&Call::VertexAttribPointer {
        location: 0,
        pointer: VertexPointer::new(3, DataType::Float, 12, Some(5), 0)
    }));

    // same pointer again
    c.vertex_pointer(3, DataType::Float, 12, Some(5), 0).unwrap();
    let calls = draw(&mut c);
    assert_eq!(calls.len(), 1);

    c.vertex_pointer(3, DataType::Float, 12, Some(5), 36).unwrap();
    let calls = draw(&mut c);
    assert_eq!(
        calls
            .iter()
            .filter(|call| matches!(call, Call::VertexAttribPointer { .. }))
            .count(),
        1
    );
    assert!(!calls.iter().any(|call| matches!(call, Call::AttributeEnabled { .. })));
    assert_eq!(c.upload_stats().pointer_uploads, 2);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn disabled_arrays_skip_pointer_uploads() {
    let mut c = context();
    c.color_pointer(4, DataType::UnsignedByte, 0, Some(9), 0).unwrap();
    c.enable_client_state(ClientArray::Vertex);
    let calls = draw(&mut c);
    // the default variant doesn't declare a_color at all
    assert_eq!(
        calls
            .iter()
            .filter(|call| matches!(call, Call::VertexAttribPointer { .. }))
            .count(),
        1
    );

    c.disable_client_state(ClientArray::Vertex);
    c.vertex_pointer(4, DataType::Float, 0, Some(2), 0).unwrap();
    let calls = draw(&mut c);
    assert!(calls.contains(&Call::AttributeEnabled {
        location: 0,
        enabled: false
    }));
    assert!(!calls.iter().any(|call| matches!(call, Call::VertexAttribPointer { .. })));
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn stats_can_be_reset() {
    let mut c = context();
    draw(&mut c);
    assert_ne!(c.upload_stats(), UploadStats::default());
    c.reset_upload_stats();
    assert_eq!(c.upload_stats(), UploadStats::default());
}
