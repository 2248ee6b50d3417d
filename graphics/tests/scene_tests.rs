//! End-to-end tests for the scene scaffold over the headless backend.
//!
//! These exercise the full path: material declarations are resolved against
//! a linked program, entity/camera/material values are pushed every frame,
//! and draw calls are recorded where tests can inspect them.

use std::cell::RefCell;
use std::rc::Rc;

use rstest::rstest;

use shadelab_core::math::{look_at_rh, perspective_gl, Mat4, Vec3, Vec4};
use shadelab_core::mesh::{generate_cube, PrimitiveTopology};
use shadelab_core::transform::Transform;
use shadelab_graphics::materials::share;
use shadelab_graphics::{
    AttributeBinding, BufferAttribute, BufferDescriptor, BufferUsage, Camera, EntityUniform,
    HeadlessBackend, Material, MaterialValues, Mesh, PerspectiveCamera, RenderEntity, RenderError,
    Scene, SharedCamera, UniformBinding, UniformType, UniformValue,
};

/// Configurable material for driving scenarios.
struct TestMaterial {
    label: String,
    vertex: String,
    fragment: String,
    attribute_bindings: Vec<AttributeBinding>,
    uniform_bindings: Vec<UniformBinding>,
    values: MaterialValues,
}

impl Material for TestMaterial {
    fn name(&self) -> &str {
        &self.label
    }
    fn vertex_source(&self) -> &str {
        &self.vertex
    }
    fn fragment_source(&self) -> &str {
        &self.fragment
    }
    fn attribute_bindings(&self) -> Vec<AttributeBinding> {
        self.attribute_bindings.clone()
    }
    fn uniform_bindings(&self) -> Vec<UniformBinding> {
        self.uniform_bindings.clone()
    }
    fn values(&self) -> &MaterialValues {
        &self.values
    }
    fn values_mut(&mut self) -> &mut MaterialValues {
        &mut self.values
    }
}

const PLAIN_FS: &str = "void main() { gl_FragColor = vec4(1.0, 1.0, 1.0, 1.0); }";

/// Minimal MVP-only material: one geometry attribute, one entity uniform.
fn mvp_material() -> TestMaterial {
    TestMaterial {
        label: "Mvp".to_string(),
        vertex: "
            attribute vec4 a_Position;
            uniform mat4 u_MvpMatrix;
            void main() { gl_Position = u_MvpMatrix * a_Position; }
        "
        .to_string(),
        fragment: PLAIN_FS.to_string(),
        attribute_bindings: vec![AttributeBinding::geometry("a_Position")],
        uniform_bindings: vec![UniformBinding::entity(EntityUniform::MvpMatrix)],
        values: MaterialValues::new(),
    }
}

fn fixed_camera() -> (Rc<RefCell<PerspectiveCamera>>, SharedCamera) {
    let camera = Rc::new(RefCell::new(PerspectiveCamera::new(
        Vec3::new(0.0, 0.0, 6.0),
        Vec3::zeros(),
        std::f32::consts::FRAC_PI_3,
        1.0,
        1.0,
        100.0,
    )));
    let shared: SharedCamera = camera.clone();
    (camera, shared)
}

fn cube_entity(material: &Rc<RefCell<TestMaterial>>) -> RenderEntity {
    let shared: shadelab_graphics::SharedMaterial = material.clone();
    RenderEntity::new()
        .with_mesh(Mesh::from_data(&generate_cube(2.0)))
        .with_material(shared)
}

fn running_scene_with(material: TestMaterial) -> (Scene, Rc<RefCell<TestMaterial>>) {
    let (_, shared_camera) = fixed_camera();
    let mut scene = Scene::new(shared_camera);
    let material = Rc::new(RefCell::new(material));
    scene.root_mut().add_child(cube_entity(&material));
    scene.start_rendering();
    (scene, material)
}

fn mat4_from_uniform(value: &UniformValue) -> Mat4 {
    let UniformValue::Mat4(array) = value else {
        panic!("expected Mat4 uniform, got {:?}", value.ty());
    };
    Mat4::from_column_slice(array)
}

#[test]
fn superset_binding_list_resolves_with_one_upload_per_active_name() {
    // The material declares one more uniform than the program uses.
    let mut material = mvp_material();
    material
        .uniform_bindings
        .push(UniformBinding::material("u_Unused", UniformType::Float));
    material
        .values
        .insert_uniform("u_Unused", UniformValue::Float(0.0));

    let (mut scene, _material) = running_scene_with(material);
    let mut backend = HeadlessBackend::new();
    scene.render_frame(&mut backend).unwrap();

    assert_eq!(backend.draw_call_count(), 1);
    let draw = backend.last_draw().unwrap();
    // Exactly the active names were uploaded; the unused declaration was skipped.
    assert_eq!(draw.uniforms.len(), 1);
    assert!(draw.uniform("u_MvpMatrix").is_some());
    assert!(draw.uniform("u_Unused").is_none());
}

#[test]
fn missing_binding_fails_before_any_draw() {
    let mut material = mvp_material();
    material.fragment = "
        uniform vec3 u_LightPosition;
        void main() { gl_FragColor = vec4(u_LightPosition, 1.0); }
    "
    .to_string();
    // No binding declared for u_LightPosition.

    let (mut scene, _material) = running_scene_with(material);
    let mut backend = HeadlessBackend::new();

    let err = scene.render_frame(&mut backend).unwrap_err();
    assert_eq!(
        err,
        RenderError::UnresolvedUniform("u_LightPosition".to_string())
    );
    assert_eq!(backend.draw_call_count(), 0);
}

#[test]
fn mvp_is_recomputed_fresh_each_frame() {
    let (camera, shared_camera) = fixed_camera();
    let mut scene = Scene::new(shared_camera);
    let material = Rc::new(RefCell::new(mvp_material()));
    scene.root_mut().add_child(cube_entity(&material));
    scene.start_rendering();

    let mut backend = HeadlessBackend::new();
    scene.render_frame(&mut backend).unwrap();
    let first = mat4_from_uniform(backend.last_draw().unwrap().uniform("u_MvpMatrix").unwrap());

    // Mutate the entity transform, then the camera, in that order.
    scene.root_mut().children_mut()[0]
        .set_transform(Transform::IDENTITY.with_translation([1.5, 0.0, 0.0]));
    camera.borrow_mut().set_position(Vec3::new(0.0, 2.0, 8.0));

    scene.render_frame(&mut backend).unwrap();
    let second = mat4_from_uniform(backend.last_draw().unwrap().uniform("u_MvpMatrix").unwrap());
    assert!((first - second).norm() > 1e-3);

    // Fresh product of the *current* projection, view, and model.
    let model = Transform::IDENTITY
        .with_translation([1.5, 0.0, 0.0])
        .matrix();
    let reference =
        camera.borrow().projection_matrix() * camera.borrow().view_matrix() * model;
    assert!((second - reference).norm() < 1e-5);
}

#[rstest]
#[case::rotation_only(
    Transform::IDENTITY.with_rotation([0.0, 0.38268343, 0.0, 0.92387953])
)]
#[case::rigid(
    Transform::IDENTITY
        .with_translation([1.0, -2.0, 3.0])
        .with_rotation([0.38268343, 0.0, 0.0, 0.92387953])
)]
#[case::nonuniform_scale(Transform::IDENTITY.with_scale([2.0, 1.0, 0.5]))]
fn normal_matrix_is_inverse_transpose_of_model(#[case] transform: Transform) {
    let mut material = mvp_material();
    material.vertex = "
        attribute vec4 a_Position;
        uniform mat4 u_MvpMatrix;
        uniform mat4 u_NormalMatrix;
        void main() { gl_Position = u_MvpMatrix * a_Position; }
    "
    .to_string();
    material
        .uniform_bindings
        .push(UniformBinding::entity(EntityUniform::NormalMatrix));

    let (mut scene, _material) = running_scene_with(material);
    scene.root_mut().children_mut()[0].set_transform(transform);

    let mut backend = HeadlessBackend::new();
    scene.render_frame(&mut backend).unwrap();

    let draw = backend.last_draw().unwrap();
    let normal = mat4_from_uniform(draw.uniform("u_NormalMatrix").unwrap());
    let model = transform.matrix();
    let reference = model.try_inverse().unwrap().transpose();
    assert!((normal - reference).norm() < 1e-4);

    // For rigid transforms the normal matrix is the rotation component:
    // orthonormal columns, determinant 1.
    let scale = transform.scale;
    if scale == [1.0, 1.0, 1.0] {
        let rotation = normal.fixed_view::<3, 3>(0, 0).into_owned();
        assert!((rotation.determinant() - 1.0).abs() < 1e-4);
        assert!(((rotation * rotation.transpose())
            - shadelab_core::math::Mat3::identity())
        .norm()
            < 1e-4);
    }
}

#[test]
fn stopping_prevents_already_scheduled_frames() {
    let (mut scene, _material) = running_scene_with(mvp_material());
    let mut backend = HeadlessBackend::new();

    scene.render_frame(&mut backend).unwrap();
    scene.render_frame(&mut backend).unwrap();
    assert_eq!(backend.draw_call_count(), 2);

    scene.stop_rendering();
    // The scheduler already queued another callback; it must not draw.
    scene.render_frame(&mut backend).unwrap();
    assert_eq!(backend.draw_call_count(), 2);
    assert_eq!(scene.frame_count(), 2);

    // And the loop cannot come back.
    scene.start_rendering();
    scene.render_frame(&mut backend).unwrap();
    assert_eq!(backend.draw_call_count(), 2);
}

#[test]
fn cube_corner_reaches_reference_clip_space() {
    let (_, shared_camera) = fixed_camera();
    let mut scene = Scene::new(shared_camera);
    let material = Rc::new(RefCell::new(mvp_material()));
    scene.root_mut().add_child(cube_entity(&material));
    scene.start_rendering();

    let mut backend = HeadlessBackend::new();
    scene.render_frame(&mut backend).unwrap();

    let mvp = mat4_from_uniform(backend.last_draw().unwrap().uniform("u_MvpMatrix").unwrap());
    let corner = Vec4::new(1.0, 1.0, 1.0, 1.0);
    let clip = mvp * corner;

    // Reference computed independently from the three matrices.
    let view = look_at_rh(
        &Vec3::new(0.0, 0.0, 6.0),
        &Vec3::zeros(),
        &Vec3::new(0.0, 1.0, 0.0),
    );
    let projection = perspective_gl(std::f32::consts::FRAC_PI_3, 1.0, 1.0, 100.0);
    let reference = projection * view * Mat4::identity() * corner;

    assert!((clip - reference).norm() < 1e-5);
}

#[test]
fn entities_sharing_a_material_see_the_same_store() {
    let mut material = mvp_material();
    material.fragment = "
        uniform vec3 u_Color;
        void main() { gl_FragColor = vec4(u_Color, 1.0); }
    "
    .to_string();
    material
        .uniform_bindings
        .push(UniformBinding::material("u_Color", UniformType::Vec3));
    material
        .values
        .insert_uniform("u_Color", UniformValue::Vec3([1.0, 0.0, 0.0]));

    let (_, shared_camera) = fixed_camera();
    let mut scene = Scene::new(shared_camera);
    let material = Rc::new(RefCell::new(material));
    scene.root_mut().add_child(cube_entity(&material));
    scene.root_mut().add_child(
        cube_entity(&material)
            .with_transform(Transform::IDENTITY.with_translation([3.0, 0.0, 0.0])),
    );
    scene.start_rendering();

    let mut backend = HeadlessBackend::new();
    scene.render_frame(&mut backend).unwrap();
    assert_eq!(backend.draw_call_count(), 2);
    for draw in backend.draw_calls() {
        assert_eq!(
            draw.uniform("u_Color"),
            Some(&UniformValue::Vec3([1.0, 0.0, 0.0]))
        );
    }

    // One write through the shared store changes both entities' next draw.
    material
        .borrow_mut()
        .values_mut()
        .set_uniform("u_Color", UniformValue::Vec3([0.0, 1.0, 0.0]));

    scene.render_frame(&mut backend).unwrap();
    for draw in &backend.draw_calls()[2..] {
        assert_eq!(
            draw.uniform("u_Color"),
            Some(&UniformValue::Vec3([0.0, 1.0, 0.0]))
        );
    }
}

#[test]
fn shared_descriptor_uploads_once_per_frame() {
    // Three reflection attributes aliasing one buffer, as in the original
    // reflection demo: ambient, diffuse, and specular share the same data.
    let reflections = Rc::new(
        BufferDescriptor::from_f32(&[0.4; 72], BufferUsage::VERTEX).with_label("reflections"),
    );
    let reflections_id = reflections.id();

    let mut material = mvp_material();
    material.vertex = "
        attribute vec4 a_Position;
        attribute vec3 a_AmbientReflection;
        attribute vec3 a_DiffuseReflection;
        attribute vec3 a_SpecularReflection;
        uniform mat4 u_MvpMatrix;
        void main() { gl_Position = u_MvpMatrix * a_Position; }
    "
    .to_string();
    for name in [
        "a_AmbientReflection",
        "a_DiffuseReflection",
        "a_SpecularReflection",
    ] {
        material
            .attribute_bindings
            .push(AttributeBinding::material(name));
        material
            .values
            .insert_attribute(name, BufferAttribute::new(Rc::clone(&reflections), 3));
    }

    let (mut scene, _material) = running_scene_with(material);
    let mut backend = HeadlessBackend::new();

    scene.render_frame(&mut backend).unwrap();
    assert_eq!(backend.buffer_upload_count(reflections_id), 1);

    // Still once after more frames: the descriptor was never marked dirty.
    scene.render_frame(&mut backend).unwrap();
    scene.render_frame(&mut backend).unwrap();
    assert_eq!(backend.buffer_upload_count(reflections_id), 1);

    // An explicit rewrite re-uploads exactly once.
    reflections.write_f32(&[0.8; 72]);
    scene.render_frame(&mut backend).unwrap();
    assert_eq!(backend.buffer_upload_count(reflections_id), 2);
}

#[test]
fn child_transforms_compose_with_parents() {
    let (_, shared_camera) = fixed_camera();
    let mut scene = Scene::new(shared_camera);
    let material = Rc::new(RefCell::new(mvp_material()));

    let child = cube_entity(&material)
        .with_transform(Transform::IDENTITY.with_translation([1.0, 0.0, 0.0]));
    let parent = RenderEntity::new()
        .with_transform(Transform::IDENTITY.with_translation([0.0, 2.0, 0.0]))
        .with_children(vec![child]);
    scene.root_mut().add_child(parent);
    scene.start_rendering();

    let mut backend = HeadlessBackend::new();
    scene.render_frame(&mut backend).unwrap();

    // Only the child carries a mesh, so exactly one draw happened, with
    // the composed world translation baked into its MVP.
    assert_eq!(backend.draw_call_count(), 1);
    let entity = &scene.root().children()[0].children()[0];
    assert_eq!(entity.model_matrix()[(0, 3)], 1.0);
    assert_eq!(entity.model_matrix()[(1, 3)], 2.0);
}

#[test]
fn material_prerender_hook_animates_values() {
    struct Orbiting {
        inner: TestMaterial,
    }

    impl Material for Orbiting {
        fn name(&self) -> &str {
            "Orbiting"
        }
        fn vertex_source(&self) -> &str {
            self.inner.vertex_source()
        }
        fn fragment_source(&self) -> &str {
            self.inner.fragment_source()
        }
        fn attribute_bindings(&self) -> Vec<AttributeBinding> {
            self.inner.attribute_bindings()
        }
        fn uniform_bindings(&self) -> Vec<UniformBinding> {
            self.inner.uniform_bindings()
        }
        fn values(&self) -> &MaterialValues {
            self.inner.values()
        }
        fn values_mut(&mut self) -> &mut MaterialValues {
            self.inner.values_mut()
        }
        fn prerender(&mut self, frame: &shadelab_graphics::FrameState) {
            let angle = (frame.time / 1000.0) as f32;
            self.inner.values_mut().set_uniform(
                "u_LightPosition",
                UniformValue::Vec3([10.0 * angle.cos(), 10.0, 10.0 * angle.sin()]),
            );
        }
    }

    let mut inner = mvp_material();
    inner.fragment = "
        uniform vec3 u_LightPosition;
        void main() { gl_FragColor = vec4(u_LightPosition, 1.0); }
    "
    .to_string();
    inner
        .uniform_bindings
        .push(UniformBinding::material("u_LightPosition", UniformType::Vec3));
    inner
        .values
        .insert_uniform("u_LightPosition", UniformValue::Vec3([10.0, 10.0, 0.0]));

    let (_, shared_camera) = fixed_camera();
    let mut scene = Scene::new(shared_camera);
    let material = share(Orbiting { inner });
    scene.root_mut().add_child(
        RenderEntity::new()
            .with_mesh(Mesh::from_data(&generate_cube(2.0)))
            .with_material(material),
    );
    scene.start_rendering();

    let mut backend = HeadlessBackend::new();
    scene.render_frame_at(&mut backend, 0.0).unwrap();
    let first = *backend.last_draw().unwrap().uniform("u_LightPosition").unwrap();

    scene.render_frame_at(&mut backend, 1500.0).unwrap();
    let second = *backend.last_draw().unwrap().uniform("u_LightPosition").unwrap();

    assert_ne!(first, second);
    let UniformValue::Vec3(position) = second else {
        panic!("expected Vec3");
    };
    assert!((position[0] - 10.0 * 1.5f32.cos()).abs() < 1e-4);
}

#[test]
fn line_topology_material_draws_lines() {
    use shadelab_core::mesh::generate_axes;

    struct LineMaterial {
        inner: TestMaterial,
    }
    impl Material for LineMaterial {
        fn name(&self) -> &str {
            "Lines"
        }
        fn vertex_source(&self) -> &str {
            self.inner.vertex_source()
        }
        fn fragment_source(&self) -> &str {
            self.inner.fragment_source()
        }
        fn attribute_bindings(&self) -> Vec<AttributeBinding> {
            self.inner.attribute_bindings()
        }
        fn uniform_bindings(&self) -> Vec<UniformBinding> {
            self.inner.uniform_bindings()
        }
        fn topology(&self) -> PrimitiveTopology {
            PrimitiveTopology::Lines
        }
        fn values(&self) -> &MaterialValues {
            &self.inner.values
        }
        fn values_mut(&mut self) -> &mut MaterialValues {
            &mut self.inner.values
        }
    }

    let mut inner = mvp_material();
    inner.vertex = "
        attribute vec4 a_Position;
        attribute vec3 a_Color;
        uniform mat4 u_MvpMatrix;
        void main() { gl_Position = u_MvpMatrix * a_Position; }
    "
    .to_string();
    inner
        .attribute_bindings
        .push(AttributeBinding::geometry("a_Color"));

    let (_, shared_camera) = fixed_camera();
    let mut scene = Scene::new(shared_camera);
    scene.root_mut().add_child(
        RenderEntity::new()
            .with_mesh(Mesh::from_data(&generate_axes(2.0)))
            .with_material(share(LineMaterial { inner })),
    );
    scene.start_rendering();

    let mut backend = HeadlessBackend::new();
    scene.render_frame(&mut backend).unwrap();

    let draw = backend.last_draw().unwrap();
    assert_eq!(draw.topology, PrimitiveTopology::Lines);
    assert!(!draw.indexed);
    assert_eq!(draw.element_count, 6);
}

#[test]
fn program_is_linked_once_per_material() {
    let (mut scene, _material) = running_scene_with(mvp_material());
    let mut backend = HeadlessBackend::new();

    scene.render_frame(&mut backend).unwrap();
    scene.render_frame(&mut backend).unwrap();
    scene.render_frame(&mut backend).unwrap();

    // Every draw reuses the program resolved on the first frame.
    let first_program = backend.draw_calls()[0].program;
    assert!(backend
        .draw_calls()
        .iter()
        .all(|draw| draw.program == first_program));
}

#[test]
fn missing_mesh_attribute_is_a_setup_error() {
    let mut material = mvp_material();
    material.vertex = "
        attribute vec4 a_Position;
        attribute vec2 a_TexCoord;
        uniform mat4 u_MvpMatrix;
        void main() { gl_Position = u_MvpMatrix * a_Position; }
    "
    .to_string();
    material
        .attribute_bindings
        .push(AttributeBinding::geometry("a_TexCoord"));

    let (mut scene, _material) = running_scene_with(material);
    let mut backend = HeadlessBackend::new();

    // The cube has no a_TexCoord buffer.
    let err = scene.render_frame(&mut backend).unwrap_err();
    assert_eq!(
        err,
        RenderError::MissingMeshAttribute("a_TexCoord".to_string())
    );
    assert_eq!(backend.draw_call_count(), 0);
}
