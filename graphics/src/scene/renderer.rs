//! Binding resolution and the per-frame draw traversal.
//!
//! Locations are resolved once per material: the shader pair is compiled
//! and linked, every *active* uniform/attribute name the program reports
//! must be covered by exactly one declared binding (a configuration error
//! otherwise, surfaced before any draw call), and the location-paired
//! binding lists are cached keyed by material pointer identity. Values are
//! resolved every frame: bindings are independent, so upload order within
//! one draw carries no meaning.

use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use shadelab_core::math::{Mat4, Vec3};
use shadelab_core::mesh::PrimitiveTopology;

use crate::backend::{AttributeLocation, ProgramHandle, RenderBackend, UniformLocation};
use crate::entity::RenderEntity;
use crate::error::RenderError;
use crate::materials::{
    AttributeBinding, CameraUniform, Material, MaterialValues, SharedMaterial, UniformBinding,
};
use crate::mesh::Mesh;
use crate::uniform::UniformValue;

/// Camera state sampled once per frame, before the traversal.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CameraState {
    pub(crate) view: Mat4,
    pub(crate) projection: Mat4,
    pub(crate) position: Vec3,
}

#[derive(Debug, Clone)]
struct ResolvedUniform {
    location: UniformLocation,
    binding: UniformBinding,
}

#[derive(Debug, Clone)]
struct ResolvedAttribute {
    location: AttributeLocation,
    binding: AttributeBinding,
}

/// A material's bindings resolved against its linked program.
struct ResolvedMaterial {
    program: ProgramHandle,
    uniforms: Vec<ResolvedUniform>,
    attributes: Vec<ResolvedAttribute>,
    topology: PrimitiveTopology,
    guard: Weak<RefCell<dyn Material>>,
}

/// Per-scene resolution cache and draw traversal.
pub(crate) struct Renderer {
    resolved: HashMap<usize, ResolvedMaterial>,
}

impl Renderer {
    pub(crate) fn new() -> Self {
        Self {
            resolved: HashMap::new(),
        }
    }

    /// Depth-first traversal: refresh entity matrices from the current
    /// transforms and camera, then draw every entity carrying both a mesh
    /// and a material.
    pub(crate) fn draw_tree(
        &mut self,
        root: &mut RenderEntity,
        camera: &CameraState,
        backend: &mut dyn RenderBackend,
    ) -> Result<(), RenderError> {
        let parent = Mat4::identity();
        self.draw_entity(root, &parent, camera, backend)
    }

    fn draw_entity(
        &mut self,
        entity: &mut RenderEntity,
        parent_model: &Mat4,
        camera: &CameraState,
        backend: &mut dyn RenderBackend,
    ) -> Result<(), RenderError> {
        entity.update_matrices(parent_model, &camera.view, &camera.projection);

        let node: &RenderEntity = entity;
        if let Some(material) = node.material().map(Rc::clone) {
            if let Some(mesh) = node.mesh() {
                let guard = material.borrow();
                let key = Rc::as_ptr(&material).cast::<()>() as usize;
                let resolved = match self.resolved.entry(key) {
                    Entry::Occupied(mut occupied) => {
                        if occupied.get().guard.upgrade().is_none() {
                            occupied.insert(link(&*guard, &material, backend)?);
                        }
                        occupied.into_mut()
                    }
                    Entry::Vacant(vacant) => vacant.insert(link(&*guard, &material, backend)?),
                };
                draw(node, mesh, guard.values(), resolved, camera, backend)?;
            }
        }

        let model = *entity.model_matrix();
        for child in entity.children_mut() {
            self.draw_entity(child, &model, camera, backend)?;
        }
        Ok(())
    }
}

/// Compile, link, and resolve a material's bindings against the program.
fn link(
    material: &dyn Material,
    handle: &SharedMaterial,
    backend: &mut dyn RenderBackend,
) -> Result<ResolvedMaterial, RenderError> {
    log::debug!("linking material `{}`", material.name());
    let program = backend.create_program(material.vertex_source(), material.fragment_source())?;

    let declared_uniforms = material.uniform_bindings();
    let declared_attributes = material.attribute_bindings();

    let active_uniforms = backend.active_uniforms(program);
    let mut uniforms = Vec::with_capacity(active_uniforms.len());
    for name in &active_uniforms {
        let binding = declared_uniforms
            .iter()
            .find(|b| b.name() == name)
            .ok_or_else(|| RenderError::UnresolvedUniform(name.clone()))?;
        let location = backend
            .uniform_location(program, name)
            .ok_or_else(|| RenderError::UnresolvedUniform(name.clone()))?;
        uniforms.push(ResolvedUniform {
            location,
            binding: binding.clone(),
        });
    }
    for binding in &declared_uniforms {
        if !active_uniforms.iter().any(|n| n == binding.name()) {
            log::warn!(
                "material `{}` declares uniform `{}` but the program does not use it",
                material.name(),
                binding.name()
            );
        }
    }

    let active_attributes = backend.active_attributes(program);
    let mut attributes = Vec::with_capacity(active_attributes.len());
    for name in &active_attributes {
        let binding = declared_attributes
            .iter()
            .find(|b| b.name() == name)
            .ok_or_else(|| RenderError::UnresolvedAttribute(name.clone()))?;
        let location = backend
            .attribute_location(program, name)
            .ok_or_else(|| RenderError::UnresolvedAttribute(name.clone()))?;
        attributes.push(ResolvedAttribute {
            location,
            binding: binding.clone(),
        });
    }
    for binding in &declared_attributes {
        if !active_attributes.iter().any(|n| n == binding.name()) {
            log::warn!(
                "material `{}` declares attribute `{}` but the program does not use it",
                material.name(),
                binding.name()
            );
        }
    }

    Ok(ResolvedMaterial {
        program,
        uniforms,
        attributes,
        topology: material.topology(),
        guard: Rc::downgrade(handle),
    })
}

/// Push current values for every resolved binding, then submit the draw.
fn draw(
    entity: &RenderEntity,
    mesh: &Mesh,
    values: &MaterialValues,
    resolved: &ResolvedMaterial,
    camera: &CameraState,
    backend: &mut dyn RenderBackend,
) -> Result<(), RenderError> {
    backend.use_program(resolved.program);

    for attribute in &resolved.attributes {
        let slice = match &attribute.binding {
            AttributeBinding::Geometry(name) => mesh
                .attribute(name)
                .ok_or_else(|| RenderError::MissingMeshAttribute(name.clone()))?,
            AttributeBinding::Material(name) => values
                .attribute(name)
                .ok_or_else(|| RenderError::MissingAttributeValue(name.clone()))?,
        };
        backend.upload_buffer(slice.descriptor())?;
        backend.bind_attribute(attribute.location, slice);
    }

    for uniform in &resolved.uniforms {
        let value = match &uniform.binding {
            UniformBinding::Material { name, ty } => {
                let stored = values
                    .uniform(name)
                    .ok_or_else(|| RenderError::MissingUniformValue(name.clone()))?;
                if stored.ty() != *ty {
                    return Err(RenderError::UniformTypeMismatch {
                        name: name.clone(),
                        expected: *ty,
                        actual: stored.ty(),
                    });
                }
                *stored
            }
            UniformBinding::Entity(source) => entity.entity_uniform(*source),
            UniformBinding::Camera(source) => match source {
                CameraUniform::Position => UniformValue::vec3(&camera.position),
                CameraUniform::ViewMatrix => UniformValue::mat4(&camera.view),
                CameraUniform::ProjectionMatrix => UniformValue::mat4(&camera.projection),
            },
        };
        backend.set_uniform(uniform.location, &value);
    }

    match mesh.indices() {
        Some(indices) => {
            backend.upload_buffer(indices.descriptor())?;
            backend.bind_index_buffer(indices.descriptor());
            backend.draw_indexed(resolved.topology, indices.format(), indices.count());
        }
        None => backend.draw_arrays(resolved.topology, mesh.vertex_count()),
    }
    Ok(())
}
