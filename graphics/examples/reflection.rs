//! Phong-style reflection shading over the scaffold, run headless.
//!
//! A cube carries per-face ambient/diffuse/specular reflection colors as
//! three attributes aliasing one shared buffer. Light colors are tuned
//! through the material's public value store (standing in for UI sliders),
//! and the light position orbits from the material's per-frame hook.
//!
//! Run with `RUST_LOG=debug cargo run --example reflection` to watch the
//! backend trace.

use std::rc::Rc;

use shadelab_core::math::{quat_from_rotation_y, quat_to_array, Vec3};
use shadelab_core::mesh::generate_cube;
use shadelab_core::transform::Transform;
use shadelab_graphics::materials::share;
use shadelab_graphics::{
    AttributeBinding, BufferAttribute, BufferDescriptor, BufferUsage, CameraUniform, EntityUniform,
    FrameState, HeadlessBackend, Material, MaterialValues, Mesh, PerspectiveCamera, RenderEntity,
    Scene, UniformBinding, UniformType, UniformValue,
};

const VERTEX_SHADER: &str = "
    attribute vec4 a_Position;
    attribute vec4 a_Normal;

    attribute vec3 a_AmbientReflection;
    attribute vec3 a_DiffuseReflection;
    attribute vec3 a_SpecularReflection;

    uniform mat4 u_MvpMatrix;
    uniform mat4 u_ModelMatrix;
    uniform mat4 u_NormalMatrix;

    uniform vec3 u_AmbientLightColor;

    varying vec3 v_AmbientColor;
    varying vec3 v_DiffuseReflection;
    varying vec3 v_SpecularReflection;

    varying vec3 v_Normal;
    varying vec3 v_Position;

    void main() {
        gl_Position = u_MvpMatrix * a_Position;
        v_Position = vec3(u_ModelMatrix * a_Position);
        v_Normal = vec3(u_NormalMatrix * a_Normal);

        v_AmbientColor = u_AmbientLightColor * a_AmbientReflection;
        v_DiffuseReflection = a_DiffuseReflection;
        v_SpecularReflection = a_SpecularReflection;
    }
";

const FRAGMENT_SHADER: &str = "
    #ifdef GL_FRAGMENT_PRECISION_HIGH
      precision highp float;
    #else
      precision mediump float;
    #endif

    uniform vec3 u_DiffuseLightColor;
    uniform vec3 u_SpecularLightColor;
    uniform vec3 u_LightPosition;
    uniform float u_SpecularLightShininessExponent;

    uniform vec3 u_CameraPosition;

    varying vec3 v_AmbientColor;
    varying vec3 v_DiffuseReflection;
    varying vec3 v_SpecularReflection;

    varying vec3 v_Normal;
    varying vec3 v_Position;

    vec3 diffuse(vec3 normal, vec3 lightDirection) {
        float cosine = max(dot(normal, lightDirection), 0.0);
        return u_DiffuseLightColor * v_DiffuseReflection * cosine;
    }

    vec3 specular(vec3 normal, vec3 reflectionDirection, vec3 cameraDirection) {
        float cosine = max(dot(reflectionDirection, cameraDirection), 0.0);
        float power = pow(cosine, u_SpecularLightShininessExponent);
        return u_SpecularLightColor * v_SpecularReflection * power;
    }

    void main() {
        vec3 normal = normalize(v_Normal);
        vec3 lightDirection = normalize(u_LightPosition - v_Position);
        vec3 cameraDirection = normalize(u_CameraPosition - v_Position);
        vec3 reflectionDirection = reflect(-lightDirection, normal);

        vec3 diffuseColor = diffuse(normal, lightDirection);
        vec3 specularColor = specular(normal, reflectionDirection, cameraDirection);

        gl_FragColor = vec4(v_AmbientColor + diffuseColor + specularColor, 1.0);
    }
";

/// Per-face reflection colors: front blue, up red, back cyan, bottom
/// white, left yellow, right green. One row per cube-face vertex.
#[rustfmt::skip]
const CUBE_FACE_REFLECTIONS: [f32; 72] = [
    0.4, 0.4, 1.0,  0.4, 0.4, 1.0,  0.4, 0.4, 1.0,  0.4, 0.4, 1.0,
    1.0, 0.4, 0.4,  1.0, 0.4, 0.4,  1.0, 0.4, 0.4,  1.0, 0.4, 0.4,
    0.4, 1.0, 1.0,  0.4, 1.0, 1.0,  0.4, 1.0, 1.0,  0.4, 1.0, 1.0,
    1.0, 1.0, 1.0,  1.0, 1.0, 1.0,  1.0, 1.0, 1.0,  1.0, 1.0, 1.0,
    1.0, 1.0, 0.4,  1.0, 1.0, 0.4,  1.0, 1.0, 0.4,  1.0, 1.0, 0.4,
    0.4, 1.0, 0.4,  0.4, 1.0, 0.4,  0.4, 1.0, 0.4,  0.4, 1.0, 0.4,
];

struct Reflection {
    values: MaterialValues,
}

impl Reflection {
    fn new() -> Self {
        let reflections = Rc::new(
            BufferDescriptor::from_f32(&CUBE_FACE_REFLECTIONS, BufferUsage::VERTEX)
                .with_label("face_reflections"),
        );

        let mut values = MaterialValues::new()
            .with_uniform("u_AmbientLightColor", UniformValue::Vec3([0.2, 0.2, 0.2]))
            .with_uniform("u_DiffuseLightColor", UniformValue::Vec3([1.0, 1.0, 1.0]))
            .with_uniform("u_SpecularLightColor", UniformValue::Vec3([1.0, 1.0, 1.0]))
            .with_uniform("u_SpecularLightShininessExponent", UniformValue::Float(32.0))
            .with_uniform("u_LightPosition", UniformValue::Vec3([5.0, -2.0, 5.0]));

        for name in [
            "a_AmbientReflection",
            "a_DiffuseReflection",
            "a_SpecularReflection",
        ] {
            values.insert_attribute(name, BufferAttribute::new(Rc::clone(&reflections), 3));
        }

        Self { values }
    }
}

impl Material for Reflection {
    fn name(&self) -> &str {
        "Reflection"
    }

    fn vertex_source(&self) -> &str {
        VERTEX_SHADER
    }

    fn fragment_source(&self) -> &str {
        FRAGMENT_SHADER
    }

    fn attribute_bindings(&self) -> Vec<AttributeBinding> {
        vec![
            AttributeBinding::geometry("a_Position"),
            AttributeBinding::geometry("a_Normal"),
            AttributeBinding::material("a_AmbientReflection"),
            AttributeBinding::material("a_DiffuseReflection"),
            AttributeBinding::material("a_SpecularReflection"),
        ]
    }

    fn uniform_bindings(&self) -> Vec<UniformBinding> {
        vec![
            UniformBinding::entity(EntityUniform::MvpMatrix),
            UniformBinding::entity(EntityUniform::ModelMatrix),
            UniformBinding::entity(EntityUniform::NormalMatrix),
            UniformBinding::material("u_LightPosition", UniformType::Vec3),
            UniformBinding::material("u_AmbientLightColor", UniformType::Vec3),
            UniformBinding::material("u_DiffuseLightColor", UniformType::Vec3),
            UniformBinding::material("u_SpecularLightColor", UniformType::Vec3),
            UniformBinding::material("u_SpecularLightShininessExponent", UniformType::Float),
            UniformBinding::camera(CameraUniform::Position),
        ]
    }

    fn values(&self) -> &MaterialValues {
        &self.values
    }

    fn values_mut(&mut self) -> &mut MaterialValues {
        &mut self.values
    }

    fn prerender(&mut self, frame: &FrameState) {
        // The light orbits the scene at a fifth of a turn per second.
        let angle = (frame.time / 1000.0) as f32 * 72.0_f32.to_radians();
        self.values.set_uniform(
            "u_LightPosition",
            UniformValue::Vec3([7.0 * angle.cos(), -2.0, 7.0 * angle.sin()]),
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    shadelab_graphics::init();

    let camera = PerspectiveCamera::shared(
        Vec3::new(3.0, 2.0, 6.0),
        Vec3::zeros(),
        50.0_f32.to_radians(),
        16.0 / 9.0,
        1.0,
        1000.0,
    );
    let mut scene = Scene::new(camera).with_clear_color([0.1, 0.1, 0.1, 1.0]);

    let reflection = share(Reflection::new());
    scene.root_mut().add_child(
        RenderEntity::new()
            .with_name("cube")
            .with_mesh(Mesh::from_data(&generate_cube(2.0)))
            .with_material(Rc::clone(&reflection)),
    );

    // Stand-in for the demo page's color sliders.
    reflection
        .borrow_mut()
        .values_mut()
        .set_uniform("u_AmbientLightColor", UniformValue::Vec3([0.3, 0.3, 0.3]));

    scene.start_rendering();
    let mut backend = HeadlessBackend::new();

    let dps = 20.0_f32.to_radians();
    for frame in 0..120u32 {
        let time_ms = frame as f64 * 1000.0 / 60.0;

        // Spin the cube, as the original demo does from its prerender listener.
        let angle = (time_ms / 1000.0) as f32 * dps;
        scene.root_mut().children_mut()[0].set_transform(
            Transform::IDENTITY.with_rotation(quat_to_array(quat_from_rotation_y(angle))),
        );

        scene.render_frame_at(&mut backend, time_ms)?;
    }
    scene.stop_rendering();

    let last = backend.last_draw().expect("frames were drawn");
    println!(
        "rendered {} frames, {} draw calls, final light position {:?}",
        scene.frame_count(),
        backend.draw_call_count(),
        last.uniform("u_LightPosition")
    );
    Ok(())
}
