use glkit::consts;
use glkit::{
    AttributeLayout, Capability, ClearMask, Context, ContextOptions, DrawMode, GlCall,
    HeadlessSurface, Matrix4, ObjectId, RecordingBackend, Vector3,
};

const VERTEX: &str = r#"
attribute vec3 position;
attribute vec3 color;
uniform mat4 mvp;
varying vec3 v_color;
void main() {
    v_color = color;
    gl_Position = mvp * vec4(position, 1.0);
}
"#;

const FRAGMENT: &str = r#"
precision mediump float;
varying vec3 v_color;
void main() {
    gl_FragColor = vec4(v_color, 1.0);
}
"#;

fn headless() -> Context<RecordingBackend> {
    Context::from_surface(&HeadlessSurface::new(800, 600), &ContextOptions::default())
        .expect("headless context")
}

fn draws(calls: &[GlCall]) -> Vec<&GlCall> {
    calls
        .iter()
        .filter(|call| matches!(call, GlCall::DrawArrays { .. } | GlCall::DrawElements { .. }))
        .collect()
}

#[test]
fn indexed_quad_frame() {
    let ctx = headless();
    let program = ctx
        .program_from_sources(VERTEX, FRAGMENT, &[(0, "position"), (1, "color")])
        .expect("program links");

    let positions = ctx
        .attribute_array(
            0,
            AttributeLayout::floats(3).expect("layout"),
            &[
                Vector3::new(-1.0, -1.0, 0.0),
                Vector3::new(1.0, -1.0, 0.0),
                Vector3::new(1.0, 1.0, 0.0),
                Vector3::new(-1.0, 1.0, 0.0),
            ],
        )
        .expect("positions");
    let colors = ctx
        .attribute_array(1, AttributeLayout::floats(3).expect("layout"), &[0.5f32; 12])
        .expect("colors");
    let attributes = ctx.attribute_arrays().with(positions).with(colors);
    let elements = ctx
        .element_array(vec![0u16, 1, 2, 2, 3, 0])
        .expect("elements");

    ctx.gl().clear_calls();
    ctx.reset_viewport();
    ctx.enable(Capability::DepthTest);
    ctx.clear_color(0.0, 0.0, 0.0, 1.0);
    ctx.clear(ClearMask::COLOR_DEPTH);
    program.use_program();
    program.set_uniform(
        "mvp",
        Matrix4::perspective(1.0, 800.0 / 600.0, 0.1, 100.0)
            * Matrix4::from_translation(Vector3::new(0.0, 0.0, -5.0)),
    );
    attributes.pointer();
    attributes.enable();
    elements.draw_triangles(0, None, 0).expect("draw");

    let calls = ctx.gl().take_calls();
    assert_eq!(
        calls[0],
        GlCall::Viewport {
            x: 0,
            y: 0,
            width: 800,
            height: 600
        }
    );
    assert_eq!(
        draws(&calls),
        vec![&GlCall::DrawElements {
            mode: consts::TRIANGLES,
            count: 6,
            index_type: consts::UNSIGNED_SHORT,
            offset: 0
        }]
    );
    assert!(calls
        .iter()
        .any(|call| matches!(call, GlCall::UniformMatrix { values, .. } if values.len() == 16)));
}

#[test]
fn shared_index_list_draws_two_meshes_with_base_vertex() {
    let ctx = headless();
    // Two triangles stored back to back in one vertex buffer.
    let positions = ctx
        .attribute_array(0, AttributeLayout::floats(2).expect("layout"), &[0.0f32; 12])
        .expect("positions");
    let elements = ctx.element_array(vec![0u8, 1, 2]).expect("elements");
    let element_id = ObjectId(2);

    positions.pointer();
    positions.enable();
    ctx.gl().clear_calls();
    elements.draw(DrawMode::Triangles, 0, None, 0).expect("first mesh");
    elements.draw(DrawMode::Triangles, 0, None, 3).expect("second mesh");

    let calls = ctx.gl().take_calls();
    assert_eq!(draws(&calls).len(), 2);
    let uploads: Vec<&Vec<u8>> = calls
        .iter()
        .filter_map(|call| match call {
            GlCall::BufferSubData { data, .. } => Some(data),
            _ => None,
        })
        .collect();
    assert_eq!(uploads, vec![&vec![3u8, 4, 5], &vec![0u8, 1, 2]]);
    assert_eq!(ctx.gl().buffer_contents(element_id), Some(vec![0, 1, 2]));
}

#[test]
fn render_to_texture_then_sample() {
    let ctx = headless();
    let target = ctx.render_target(128, 128, true).expect("render target");
    let program = ctx
        .program_from_sources(VERTEX, FRAGMENT, &[])
        .expect("program links");

    ctx.gl().clear_calls();
    target.bind();
    ctx.clear(ClearMask::COLOR_DEPTH);
    target.unbind();
    ctx.reset_viewport();
    target.texture().bind(2);
    program.use_program();
    program.set_sampler("scene", 2);

    let calls = ctx.gl().take_calls();
    assert_eq!(
        calls[1],
        GlCall::Viewport {
            x: 0,
            y: 0,
            width: 128,
            height: 128
        }
    );
    assert!(calls.contains(&GlCall::ActiveTexture(consts::TEXTURE0 + 2)));
    assert!(calls
        .iter()
        .any(|call| matches!(call, GlCall::UniformInt { values, .. } if values == &vec![2])));
}

#[test]
fn lost_context_fails_object_creation() {
    let ctx = headless();
    ctx.gl().lose_context();
    assert!(ctx.is_context_lost());
    assert!(ctx.array_buffer(&[0.0f32; 3]).is_err());
    assert!(ctx.texture_2d().is_err());
}
