//! Scene-graph nodes.
//!
//! A [`RenderEntity`] combines geometry, a local transform, and an attached
//! material. Entities own their children, so the graph is a tree by
//! construction and a subtree is destroyed with its parent. The world
//! model, normal, and MVP matrices are refreshed by the scene traversal
//! every frame from the *current* transform and camera state.

use shadelab_core::math::{inverse_transpose, Mat4};
use shadelab_core::transform::Transform;

use crate::materials::{EntityUniform, SharedMaterial};
use crate::mesh::Mesh;
use crate::uniform::UniformValue;

/// A node in the scene tree: mesh + transform + attached material.
pub struct RenderEntity {
    name: Option<String>,
    transform: Transform,
    mesh: Option<Mesh>,
    material: Option<SharedMaterial>,
    children: Vec<RenderEntity>,
    model_matrix: Mat4,
    normal_matrix: Mat4,
    mvp_matrix: Mat4,
}

impl RenderEntity {
    /// Create an empty entity at the identity transform.
    pub fn new() -> Self {
        Self {
            name: None,
            transform: Transform::IDENTITY,
            mesh: None,
            material: None,
            children: Vec::new(),
            model_matrix: Mat4::identity(),
            normal_matrix: Mat4::identity(),
            mvp_matrix: Mat4::identity(),
        }
    }

    /// Set the entity name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the local transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Attach a mesh.
    #[must_use]
    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Attach a material.
    #[must_use]
    pub fn with_material(mut self, material: SharedMaterial) -> Self {
        self.material = Some(material);
        self
    }

    /// Set the child entities.
    #[must_use]
    pub fn with_children(mut self, children: Vec<RenderEntity>) -> Self {
        self.children = children;
        self
    }

    /// Entity name, if set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The local transform.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Mutable access to the local transform.
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Replace the local transform.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// The attached mesh, if any.
    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    /// The attached material handle, if any.
    pub fn material(&self) -> Option<&SharedMaterial> {
        self.material.as_ref()
    }

    /// Swap the attached material.
    pub fn set_material(&mut self, material: SharedMaterial) {
        self.material = Some(material);
    }

    /// Add a child to this entity's subtree.
    pub fn add_child(&mut self, child: RenderEntity) {
        self.children.push(child);
    }

    /// Child entities.
    pub fn children(&self) -> &[RenderEntity] {
        &self.children
    }

    /// Mutable access to child entities.
    pub fn children_mut(&mut self) -> &mut [RenderEntity] {
        &mut self.children
    }

    /// Refresh the per-frame matrices from the current transform, the
    /// parent's world model matrix, and the camera's view/projection.
    ///
    /// World model = parent model × local TRS. Normal matrix is the
    /// inverse-transpose of the model matrix. MVP is projection × view ×
    /// model, multiplied fresh in that order.
    pub fn update_matrices(&mut self, parent_model: &Mat4, view: &Mat4, projection: &Mat4) {
        self.model_matrix = parent_model * self.transform.matrix();
        self.normal_matrix = inverse_transpose(&self.model_matrix);
        self.mvp_matrix = projection * view * self.model_matrix;
    }

    /// The world model matrix computed by the last traversal.
    pub fn model_matrix(&self) -> &Mat4 {
        &self.model_matrix
    }

    /// The normal matrix computed by the last traversal.
    pub fn normal_matrix(&self) -> &Mat4 {
        &self.normal_matrix
    }

    /// The MVP matrix computed by the last traversal.
    pub fn mvp_matrix(&self) -> &Mat4 {
        &self.mvp_matrix
    }

    /// Resolve one entity-computed uniform to its current value.
    pub fn entity_uniform(&self, uniform: EntityUniform) -> UniformValue {
        match uniform {
            EntityUniform::ModelMatrix => UniformValue::mat4(&self.model_matrix),
            EntityUniform::NormalMatrix => UniformValue::mat4(&self.normal_matrix),
            EntityUniform::MvpMatrix => UniformValue::mat4(&self.mvp_matrix),
        }
    }
}

impl Default for RenderEntity {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RenderEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderEntity")
            .field("name", &self.name)
            .field("mesh", &self.mesh.as_ref().map(|m| m.label()))
            .field("has_material", &self.material.is_some())
            .field("children", &self.children.len())
            .finish()
    }
}
