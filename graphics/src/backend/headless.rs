//! Headless backend for testing and development.
//!
//! Performs no GPU work but implements the full backend contract:
//! program "linking" introspects the GLSL source for `uniform` and
//! `attribute` declarations, buffer uploads honor the descriptor dirty
//! flag, and every upload, uniform write, and draw call is recorded
//! behind accessors so tests can observe exactly what a frame produced.

use std::collections::HashMap;

use shadelab_core::mesh::{IndexFormat, PrimitiveTopology};

use crate::buffer::{BufferAttribute, BufferDescriptor, BufferId};
use crate::error::RenderError;
use crate::uniform::{UniformType, UniformValue};

use super::{AttributeLocation, ProgramHandle, RenderBackend, UniformLocation};

/// One recorded draw call with the uniform values visible to it.
#[derive(Debug, Clone)]
pub struct DrawCall {
    /// The program the draw ran with.
    pub program: ProgramHandle,
    /// Primitive topology.
    pub topology: PrimitiveTopology,
    /// Whether the draw was indexed.
    pub indexed: bool,
    /// Vertex count (non-indexed) or index count (indexed).
    pub element_count: u32,
    /// Snapshot of the current program's uniform values at draw time,
    /// keyed by shader name.
    pub uniforms: HashMap<String, UniformValue>,
}

impl DrawCall {
    /// Look up a uniform value seen by this draw.
    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms.get(name)
    }
}

#[derive(Debug)]
struct ProgramData {
    uniforms: Vec<(String, UniformType)>,
    attributes: Vec<(String, UniformType)>,
}

#[derive(Debug, Default)]
struct UploadRecord {
    uploads: u32,
    bytes: usize,
}

/// Backend that records instead of drawing.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    programs: Vec<ProgramData>,
    buffers: HashMap<BufferId, UploadRecord>,
    current_program: Option<ProgramHandle>,
    bound_uniforms: HashMap<(u32, u32), UniformValue>,
    draws: Vec<DrawCall>,
    clear_count: u32,
}

/// Map a GLSL declaration type to the scaffold's value shapes.
fn glsl_value_type(token: &str) -> Result<UniformType, RenderError> {
    match token {
        "float" => Ok(UniformType::Float),
        "vec2" => Ok(UniformType::Vec2),
        "vec3" => Ok(UniformType::Vec3),
        "vec4" => Ok(UniformType::Vec4),
        "mat3" => Ok(UniformType::Mat3),
        "mat4" => Ok(UniformType::Mat4),
        "int" => Ok(UniformType::Int),
        other => Err(RenderError::ShaderCompile(format!(
            "unsupported declaration type `{other}`"
        ))),
    }
}

/// Collect `<keyword> <type> <name>;` declarations from GLSL source.
fn parse_declarations(
    source: &str,
    keyword: &str,
) -> Result<Vec<(String, UniformType)>, RenderError> {
    let mut out = Vec::new();
    for raw_line in source.lines() {
        let line = raw_line.split("//").next().unwrap_or("");
        for statement in line.split(';') {
            let mut tokens = statement.split_whitespace();
            if tokens.next() != Some(keyword) {
                continue;
            }
            let Some(mut ty) = tokens.next() else { continue };
            if matches!(ty, "lowp" | "mediump" | "highp") {
                let Some(qualified) = tokens.next() else {
                    continue;
                };
                ty = qualified;
            }
            let Some(name) = tokens.next() else { continue };
            let name = name.split('[').next().unwrap_or(name);
            out.push((name.to_string(), glsl_value_type(ty)?));
        }
    }
    Ok(out)
}

impl HeadlessBackend {
    /// Create a new headless backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// All draw calls recorded so far, in submission order.
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draws
    }

    /// Number of draw calls recorded so far.
    pub fn draw_call_count(&self) -> usize {
        self.draws.len()
    }

    /// The most recent draw call, if any.
    pub fn last_draw(&self) -> Option<&DrawCall> {
        self.draws.last()
    }

    /// How many times a descriptor's bytes were uploaded.
    pub fn buffer_upload_count(&self, id: BufferId) -> u32 {
        self.buffers.get(&id).map(|r| r.uploads).unwrap_or(0)
    }

    /// Number of clear operations issued.
    pub fn clear_count(&self) -> u32 {
        self.clear_count
    }

    /// Drop recorded draws and clears, keeping programs and buffers.
    pub fn clear_recording(&mut self) {
        self.draws.clear();
        self.clear_count = 0;
    }

    fn program(&self, handle: ProgramHandle) -> &ProgramData {
        &self.programs[handle.0 as usize]
    }

    fn snapshot_uniforms(&self, program: ProgramHandle) -> HashMap<String, UniformValue> {
        let data = self.program(program);
        let mut out = HashMap::new();
        for (location, (name, _)) in data.uniforms.iter().enumerate() {
            if let Some(value) = self.bound_uniforms.get(&(program.0, location as u32)) {
                out.insert(name.clone(), *value);
            }
        }
        out
    }

    fn current_program_or_panic(&self) -> ProgramHandle {
        self.current_program
            .expect("no program is current; call use_program first")
    }
}

impl RenderBackend for HeadlessBackend {
    fn name(&self) -> &'static str {
        "Headless"
    }

    fn create_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramHandle, RenderError> {
        if vertex_source.trim().is_empty() {
            return Err(RenderError::ShaderCompile(
                "empty vertex shader source".to_string(),
            ));
        }
        if fragment_source.trim().is_empty() {
            return Err(RenderError::ShaderCompile(
                "empty fragment shader source".to_string(),
            ));
        }

        let mut uniforms = parse_declarations(vertex_source, "uniform")?;
        for (name, ty) in parse_declarations(fragment_source, "uniform")? {
            match uniforms.iter().find(|(n, _)| *n == name) {
                Some((_, existing)) if *existing != ty => {
                    return Err(RenderError::ProgramLink(format!(
                        "uniform `{name}` declared with conflicting types"
                    )));
                }
                Some(_) => {}
                None => uniforms.push((name, ty)),
            }
        }
        let attributes = parse_declarations(vertex_source, "attribute")?;

        let handle = ProgramHandle(self.programs.len() as u32);
        log::trace!(
            "HeadlessBackend: linked program {:?} ({} uniforms, {} attributes)",
            handle,
            uniforms.len(),
            attributes.len()
        );
        self.programs.push(ProgramData {
            uniforms,
            attributes,
        });
        Ok(handle)
    }

    fn active_uniforms(&self, program: ProgramHandle) -> Vec<String> {
        self.program(program)
            .uniforms
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn active_attributes(&self, program: ProgramHandle) -> Vec<String> {
        self.program(program)
            .attributes
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        self.program(program)
            .uniforms
            .iter()
            .position(|(n, _)| n == name)
            .map(|i| UniformLocation(i as u32))
    }

    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Option<AttributeLocation> {
        self.program(program)
            .attributes
            .iter()
            .position(|(n, _)| n == name)
            .map(|i| AttributeLocation(i as u32))
    }

    fn use_program(&mut self, program: ProgramHandle) {
        log::trace!("HeadlessBackend: use_program {:?}", program);
        self.current_program = Some(program);
    }

    fn upload_buffer(&mut self, descriptor: &BufferDescriptor) -> Result<(), RenderError> {
        let record = self.buffers.entry(descriptor.id()).or_default();
        if record.uploads == 0 || descriptor.is_dirty() {
            record.uploads += 1;
            record.bytes = descriptor.len();
            descriptor.mark_clean();
            log::trace!(
                "HeadlessBackend: uploaded buffer {:?} ({:?}, {} bytes, upload #{})",
                descriptor.id(),
                descriptor.label(),
                record.bytes,
                record.uploads
            );
        }
        Ok(())
    }

    fn bind_attribute(&mut self, location: AttributeLocation, attribute: &BufferAttribute) {
        debug_assert!(
            self.buffers.contains_key(&attribute.descriptor().id()),
            "attribute bound before its buffer was uploaded"
        );
        log::trace!(
            "HeadlessBackend: bind_attribute slot {} <- buffer {:?} ({} components)",
            location.0,
            attribute.descriptor().id(),
            attribute.components()
        );
    }

    fn bind_index_buffer(&mut self, descriptor: &BufferDescriptor) {
        debug_assert!(
            self.buffers.contains_key(&descriptor.id()),
            "index buffer bound before upload"
        );
        log::trace!(
            "HeadlessBackend: bind_index_buffer {:?}",
            descriptor.id()
        );
    }

    /// Write a uniform value into the current program.
    ///
    /// # Panics
    ///
    /// Panics when the value's shape differs from the program's declared
    /// type for that location; a mismatched write is a programming error,
    /// fatal at the point of write.
    fn set_uniform(&mut self, location: UniformLocation, value: &UniformValue) {
        let program = self.current_program_or_panic();
        let (name, declared) = &self.program(program).uniforms[location.0 as usize];
        assert!(
            *declared == value.ty(),
            "uniform `{name}` declared as {declared:?} but written with {:?}",
            value.ty()
        );
        self.bound_uniforms
            .insert((program.0, location.0), *value);
    }

    fn clear(&mut self, color: [f32; 4]) {
        log::trace!("HeadlessBackend: clear {:?}", color);
        self.clear_count += 1;
    }

    fn draw_arrays(&mut self, topology: PrimitiveTopology, vertex_count: u32) {
        let program = self.current_program_or_panic();
        log::trace!(
            "HeadlessBackend: draw_arrays {:?} x{}",
            topology,
            vertex_count
        );
        let uniforms = self.snapshot_uniforms(program);
        self.draws.push(DrawCall {
            program,
            topology,
            indexed: false,
            element_count: vertex_count,
            uniforms,
        });
    }

    fn draw_indexed(&mut self, topology: PrimitiveTopology, format: IndexFormat, index_count: u32) {
        let program = self.current_program_or_panic();
        log::trace!(
            "HeadlessBackend: draw_indexed {:?} {:?} x{}",
            topology,
            format,
            index_count
        );
        let uniforms = self.snapshot_uniforms(program);
        self.draws.push(DrawCall {
            program,
            topology,
            indexed: true,
            element_count: index_count,
            uniforms,
        });
    }
}
