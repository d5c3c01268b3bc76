//! Shader loading and validation
//!
//! Shader source comes either from the built-in library compiled into the
//! binary or from a WGSL file read at setup time. Source is parsed and
//! validated with naga before any GPU object is created, so compile errors
//! surface as [`RendererError::ShaderCompile`] instead of a device error.

use crate::error::{RendererError, Result};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Default relative path of the externally loaded shader.
pub const DEFAULT_SHADER_PATH: &str = "shaders/general.wgsl";

/// Where a shader program's text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderSource {
    /// WGSL embedded in the binary.
    Builtin {
        label: &'static str,
        source: &'static str,
    },
    /// WGSL read from disk when the renderer is built.
    File(PathBuf),
}

impl ShaderSource {
    /// Source read from [`DEFAULT_SHADER_PATH`].
    pub fn default_file() -> Self {
        Self::File(PathBuf::from(DEFAULT_SHADER_PATH))
    }

    /// A short name used for labels and log output.
    pub fn label(&self) -> Cow<'_, str> {
        match self {
            Self::Builtin { label, .. } => Cow::Borrowed(*label),
            Self::File(path) => path.to_string_lossy(),
        }
    }

    /// Load the raw text.
    pub fn read(&self) -> Result<Cow<'static, str>> {
        match self {
            Self::Builtin { source, .. } => Ok(Cow::Borrowed(*source)),
            Self::File(path) => read_file(path).map(Cow::Owned),
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    tracing::debug!(path = %path.display(), "reading shader source");
    std::fs::read_to_string(path).map_err(|source| RendererError::ShaderLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// A validated vertex + fragment shader pair.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    label: String,
    source: Cow<'static, str>,
    vertex_inputs: Vec<u32>,
}

impl ShaderProgram {
    /// Vertex stage entry point every program must define.
    pub const VERTEX_ENTRY: &'static str = "vs_main";
    /// Fragment stage entry point every program must define.
    pub const FRAGMENT_ENTRY: &'static str = "fs_main";

    /// Read and compile a program from `source`.
    pub fn load(source: &ShaderSource) -> Result<Self> {
        let text = source.read()?;
        Self::compile(&source.label(), text)
    }

    /// Parse and validate WGSL text, then check the entry points.
    pub fn compile(label: &str, text: impl Into<Cow<'static, str>>) -> Result<Self> {
        let text = text.into();

        let module = naga::front::wgsl::parse_str(&text).map_err(|e| {
            RendererError::ShaderCompile {
                label: label.to_string(),
                message: e.emit_to_string(&text),
            }
        })?;

        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .map_err(|e| RendererError::ShaderCompile {
            label: label.to_string(),
            message: error_chain(&e.into_inner()),
        })?;

        let vertex = find_entry(&module, label, Self::VERTEX_ENTRY, naga::ShaderStage::Vertex)?;
        find_entry(&module, label, Self::FRAGMENT_ENTRY, naga::ShaderStage::Fragment)?;

        let vertex_inputs = input_locations(&module, &vertex.function);
        tracing::debug!(label, ?vertex_inputs, "shader validated");

        Ok(Self {
            label: label.to_string(),
            source: text,
            vertex_inputs,
        })
    }

    /// The program label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Sorted `@location` indices the vertex entry point consumes.
    pub fn vertex_inputs(&self) -> &[u32] {
        &self.vertex_inputs
    }

    /// Create the GPU shader module.
    pub fn create_module(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&self.label),
            source: wgpu::ShaderSource::Wgsl(self.source.clone()),
        })
    }
}

fn find_entry<'m>(
    module: &'m naga::Module,
    label: &str,
    name: &str,
    stage: naga::ShaderStage,
) -> Result<&'m naga::EntryPoint> {
    let entry = module
        .entry_points
        .iter()
        .find(|ep| ep.name == name)
        .ok_or_else(|| RendererError::pipeline(label, format!("missing entry point `{name}`")))?;
    if entry.stage != stage {
        return Err(RendererError::pipeline(
            label,
            format!("entry point `{name}` is a {:?} stage, expected {:?}", entry.stage, stage),
        ));
    }
    Ok(entry)
}

fn input_locations(module: &naga::Module, function: &naga::Function) -> Vec<u32> {
    let mut locations = Vec::new();
    for argument in &function.arguments {
        match (&argument.binding, &module.types[argument.ty].inner) {
            (Some(naga::Binding::Location { location, .. }), _) => locations.push(*location),
            (None, naga::TypeInner::Struct { members, .. }) => {
                locations.extend(members.iter().filter_map(|m| match m.binding {
                    Some(naga::Binding::Location { location, .. }) => Some(location),
                    _ => None,
                }));
            }
            _ => {}
        }
    }
    locations.sort_unstable();
    locations
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(in.position, 1.0);
    out.color = in.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color, 1.0);
}
"#;

    #[test]
    fn test_compile_collects_vertex_inputs() {
        let program = ShaderProgram::compile("minimal", MINIMAL).unwrap();
        assert_eq!(program.vertex_inputs(), &[0, 1]);
        assert_eq!(program.label(), "minimal");
    }

    #[test]
    fn test_syntax_error_is_compile_error() {
        let err = ShaderProgram::compile("broken", "fn vs_main( {").unwrap_err();
        assert!(matches!(err, RendererError::ShaderCompile { .. }), "{err}");
    }

    #[test]
    fn test_missing_entry_point_is_pipeline_error() {
        let source = MINIMAL.replace("fn fs_main", "fn fragment_main");
        let err = ShaderProgram::compile("renamed", source).unwrap_err();
        match err {
            RendererError::PipelineValidation { message, .. } => {
                assert!(message.contains("fs_main"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrong_stage_is_pipeline_error() {
        let source = MINIMAL
            .replace("fn vs_main", "fn vertex_body")
            .replace("fn fs_main", "fn vs_main");
        let err = ShaderProgram::compile("swapped", source).unwrap_err();
        assert!(matches!(err, RendererError::PipelineValidation { .. }));
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let source = ShaderSource::File(PathBuf::from("shaders/does-not-exist.wgsl"));
        let err = ShaderProgram::load(&source).unwrap_err();
        assert!(matches!(err, RendererError::ShaderLoad { .. }));
    }

    #[test]
    fn test_default_file_is_general_program() {
        // Unit tests run from the package root, where the relative path resolves
        let source = ShaderSource::default_file();
        assert_eq!(source, ShaderSource::File(PathBuf::from(DEFAULT_SHADER_PATH)));
        let program = ShaderProgram::load(&source).unwrap();
        assert_eq!(program.label(), DEFAULT_SHADER_PATH);
    }

    #[test]
    fn test_general_shader_file_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_SHADER_PATH);
        let program = ShaderProgram::load(&ShaderSource::File(path)).unwrap();
        assert_eq!(program.vertex_inputs(), &[0, 1]);
    }
}
