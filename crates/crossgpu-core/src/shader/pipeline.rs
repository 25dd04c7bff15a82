// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The cross-compilation pipeline.
//!
//! `parse -> select entry point -> lower -> rename -> flatten bindings ->
//! generate`. Every call runs every stage again; nothing is cached between
//! calls, so compiling one source for several targets is just several calls.

use super::api::{CompiledArtifact, ShaderSource, TargetLanguage, MEMORY_LABEL};
use super::error::CompileError;
use super::traits::{LoweredProgram, ShaderBackend, ShaderFrontend, ShaderProgram};
use super::transform::{BindingFlattener, RenamePolicy};
use serde::{Deserialize, Serialize};

/// The intermediate form produced by frontend `F`.
pub type LoweredOf<F> = <<F as ShaderFrontend>::Program as ShaderProgram>::Lowered;

/// Settings of a [`ShaderPipeline`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Origin label given to sources passed as plain strings.
    pub source_label: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            source_label: MEMORY_LABEL.to_owned(),
        }
    }
}

/// Drives a frontend and a backend through the fixed sequence of stages.
#[derive(Debug, Clone)]
pub struct ShaderPipeline<F, B> {
    frontend: F,
    backend: B,
    settings: PipelineSettings,
}

impl<F, B> ShaderPipeline<F, B>
where
    F: ShaderFrontend,
    B: ShaderBackend<LoweredOf<F>>,
{
    /// Creates a pipeline with default settings.
    pub fn new(frontend: F, backend: B) -> Self {
        Self::with_settings(frontend, backend, PipelineSettings::default())
    }

    /// Creates a pipeline with explicit settings.
    pub fn with_settings(frontend: F, backend: B, settings: PipelineSettings) -> Self {
        Self {
            frontend,
            backend,
            settings,
        }
    }

    /// The pipeline settings.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Whether `source` is a valid program. Equivalent to the parse stage
    /// succeeding.
    pub fn validate(&self, source: &ShaderSource<'_>) -> bool {
        let valid = self.frontend.validate(source);
        log::debug!("Validated '{}': {valid}.", source.label());
        valid
    }

    /// [`ShaderPipeline::validate`] for plain text, labelled with the
    /// configured source label.
    pub fn validate_str(&self, text: &str) -> bool {
        self.validate(&self.labelled(text))
    }

    /// Compiles the first entry point of `source` for `target`.
    ///
    /// The pipeline stops at the first failing stage and reports it; no
    /// partial artifact is produced.
    pub fn compile(
        &self,
        source: &ShaderSource<'_>,
        target: TargetLanguage,
    ) -> Result<CompiledArtifact, CompileError> {
        log::debug!("Compiling '{}' for {target}.", source.label());

        let program = self.frontend.parse(source)?;

        let entry_point = program
            .entry_points()
            .into_iter()
            .next()
            .ok_or(CompileError::NoEntryPoint)?;
        log::debug!(
            "Selected {:?} entry point '{}'.",
            entry_point.stage,
            entry_point.name
        );

        let lowered = program.lower()?;

        let renames = RenamePolicy::for_target(target.kind()).plan(&lowered.identifiers());
        let lowered = lowered.rename(&renames)?;
        log::debug!("Renamed {} identifier(s).", renames.len());

        let target_entry_point = renames.resolve(&entry_point.name);
        let resources = lowered.resources(target_entry_point);
        let bindings = BindingFlattener::for_target(target).flatten(&resources)?;
        log::debug!(
            "Flattened {} resource binding(s) used by '{target_entry_point}'.",
            bindings.len()
        );

        let generated = self
            .backend
            .generate(&lowered, target, target_entry_point, &bindings)?;
        log::debug!(
            "Generated {} bytes of {target} for '{}'.",
            generated.text.len(),
            generated.entry_point
        );

        Ok(CompiledArtifact::new(
            target,
            generated,
            entry_point.name,
            bindings,
            renames,
        ))
    }

    /// [`ShaderPipeline::compile`] for plain text, labelled with the
    /// configured source label.
    pub fn compile_str(
        &self,
        text: &str,
        target: TargetLanguage,
    ) -> Result<CompiledArtifact, CompileError> {
        self.compile(&self.labelled(text), target)
    }

    fn labelled<'a>(&'a self, text: &'a str) -> ShaderSource<'a> {
        ShaderSource::new(text).with_label(self.settings.source_label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::api::{
        BindingTable, EntryPoint, GeneratedSource, RenameMap, ResourceBinding, ResourceDecl,
        ResourceKind, ShaderStage, TargetKind,
    };
    use crate::shader::error::{
        GenerationError, ParseError, PipelineStage, TransformError,
    };
    use std::cell::Cell;

    /// A line-based toy language:
    /// `fn <name>`, `var <name> <group> <binding> <uniform|texture|sampler>`
    /// and `let <name>`.
    ///
    /// A `var` before the first `fn` is used by every entry point; later ones
    /// belong to the `fn` above them.
    struct FakeFrontend;

    struct FakeProgram {
        entry_points: Vec<EntryPoint>,
        lowered: FakeLowered,
    }

    #[derive(Clone)]
    struct FakeLowered {
        identifiers: Vec<String>,
        resources: Vec<(Option<String>, ResourceDecl)>,
    }

    impl ShaderFrontend for FakeFrontend {
        type Program = FakeProgram;

        fn parse(&self, source: &ShaderSource<'_>) -> Result<FakeProgram, ParseError> {
            let error = |message: String| ParseError {
                label: source.label().to_owned(),
                message,
            };
            let mut program = FakeProgram {
                entry_points: Vec::new(),
                lowered: FakeLowered {
                    identifiers: Vec::new(),
                    resources: Vec::new(),
                },
            };

            for line in source.text().lines().map(str::trim).filter(|l| !l.is_empty()) {
                let words: Vec<&str> = line.split_whitespace().collect();
                match words.as_slice() {
                    ["fn", name] => {
                        program.entry_points.push(EntryPoint::new(*name, ShaderStage::Compute));
                        program.lowered.identifiers.push(name.to_string());
                    }
                    ["let", name] => program.lowered.identifiers.push(name.to_string()),
                    ["var", name, group, binding, kind] => {
                        let coord = |text: &str| {
                            text.parse::<u32>()
                                .map_err(|_| error(format!("bad coordinate '{text}'")))
                        };
                        let kind = match *kind {
                            "uniform" => ResourceKind::UniformBuffer,
                            "texture" => ResourceKind::Texture,
                            "sampler" => ResourceKind::Sampler { comparison: false },
                            other => return Err(error(format!("unknown kind '{other}'"))),
                        };
                        let owner = program.entry_points.last().map(|it| it.name.clone());
                        program.lowered.identifiers.push(name.to_string());
                        program.lowered.resources.push((
                            owner,
                            ResourceDecl::single(
                                *name,
                                ResourceBinding::new(coord(group)?, coord(binding)?),
                                kind,
                            ),
                        ));
                    }
                    _ => return Err(error(format!("unexpected '{line}'"))),
                }
            }
            Ok(program)
        }
    }

    impl ShaderProgram for FakeProgram {
        type Lowered = FakeLowered;

        fn entry_points(&self) -> Vec<EntryPoint> {
            self.entry_points.clone()
        }

        fn lower(&self) -> Result<FakeLowered, TransformError> {
            Ok(self.lowered.clone())
        }
    }

    impl LoweredProgram for FakeLowered {
        fn identifiers(&self) -> Vec<String> {
            self.identifiers.clone()
        }

        fn rename(mut self, renames: &RenameMap) -> Result<Self, TransformError> {
            for ident in &mut self.identifiers {
                *ident = renames.resolve(ident).to_owned();
            }
            for (owner, resource) in &mut self.resources {
                for name in owner.iter_mut().chain(resource.name.as_mut()) {
                    *name = renames.resolve(name).to_owned();
                }
            }
            Ok(self)
        }

        fn resources(&self, entry_point: &str) -> Vec<ResourceDecl> {
            self.resources
                .iter()
                .filter(|(owner, _)| owner.as_deref().is_none_or(|it| it == entry_point))
                .map(|(_, resource)| resource.clone())
                .collect()
        }
    }

    #[derive(Default)]
    struct FakeBackend {
        calls: Cell<usize>,
    }

    impl ShaderBackend<FakeLowered> for FakeBackend {
        fn generate(
            &self,
            program: &FakeLowered,
            target: TargetLanguage,
            entry_point: &str,
            bindings: &BindingTable,
        ) -> Result<GeneratedSource, GenerationError> {
            self.calls.set(self.calls.get() + 1);
            if !program.identifiers.iter().any(|it| it == entry_point) {
                return Err(GenerationError {
                    target,
                    message: format!("no function named '{entry_point}'"),
                });
            }
            Ok(GeneratedSource {
                text: format!("// {target}\n{}{}", bindings, program.identifiers.join("\n")),
                entry_point: entry_point.to_owned(),
            })
        }
    }

    fn pipeline() -> ShaderPipeline<FakeFrontend, FakeBackend> {
        let _ = env_logger::builder().is_test(true).try_init();
        ShaderPipeline::new(FakeFrontend, FakeBackend::default())
    }

    #[test]
    fn first_entry_point_is_compiled() {
        let pipeline = pipeline();
        let artifact = pipeline
            .compile_str("var u 0 0 uniform\nfn vmain\nfn other", TargetLanguage::hlsl())
            .unwrap();

        assert_eq!(artifact.entry_point(), "vmain");
        assert_eq!(artifact.target_entry_point(), "vmain");
        assert_eq!(artifact.bindings().len(), 1);
        assert_eq!(
            artifact
                .bindings()
                .slot(ResourceBinding::new(0, 0))
                .unwrap()
                .to_string(),
            "register(b0, space0)"
        );
        assert!(artifact.source().starts_with("// hlsl (sm 5.1)"));
    }

    #[test]
    fn missing_entry_point_is_reported() {
        let pipeline = pipeline();
        let err = pipeline
            .compile_str("let x", TargetLanguage::msl())
            .unwrap_err();
        assert_eq!(err, CompileError::NoEntryPoint);
        assert_eq!(err.stage(), PipelineStage::EntryPointSelection);
        assert_eq!(pipeline.backend.calls.get(), 0);
    }

    #[test]
    fn parse_failures_stop_the_pipeline() {
        let pipeline = pipeline();
        let err = pipeline
            .compile_str("fn main\n}", TargetLanguage::hlsl())
            .unwrap_err();
        assert_eq!(err.stage(), PipelineStage::Parse);
        assert!(matches!(err, CompileError::Parse(ParseError { ref label, .. }) if label == MEMORY_LABEL));
        assert!(!pipeline.validate_str("fn main\n}"));
        assert!(pipeline.validate_str("fn main"));
        assert_eq!(pipeline.backend.calls.get(), 0);
    }

    #[test]
    fn transform_failures_stop_before_generation() {
        let pipeline = pipeline();
        let err = pipeline
            .compile_str("fn main\nvar a 0 0 uniform\nvar b 0 0 texture", TargetLanguage::hlsl())
            .unwrap_err();
        assert_eq!(err.stage(), PipelineStage::FlattenBindings);
        assert!(matches!(
            err,
            CompileError::Transform(TransformError::ConflictingBinding { .. })
        ));
        assert_eq!(pipeline.backend.calls.get(), 0);
    }

    #[test]
    fn only_resources_of_the_selected_entry_point_are_flattened() {
        let pipeline = pipeline();
        let text = "var shared 2 0 uniform\nfn first\nvar a 0 0 uniform\nfn second\nvar b 0 0 texture";
        for target in [TargetLanguage::hlsl(), TargetLanguage::msl()] {
            let artifact = pipeline.compile_str(text, target).unwrap();
            let bindings = artifact.bindings();

            assert_eq!(bindings.len(), 2);
            assert_eq!(bindings.get(ResourceBinding::new(0, 0)).unwrap().kind, ResourceKind::UniformBuffer);
            assert!(bindings.get(ResourceBinding::new(2, 0)).is_some());
        }
    }

    #[test]
    fn resources_follow_a_renamed_entry_point() {
        let pipeline = pipeline();
        let text = "fn kernel\nvar a 0 0 uniform\nfn other\nvar b 0 1 texture";
        let artifact = pipeline.compile_str(text, TargetLanguage::msl()).unwrap();

        assert_eq!(artifact.target_entry_point(), "kernel_");
        assert_eq!(artifact.bindings().len(), 1);
        assert!(artifact.bindings().get(ResourceBinding::new(0, 0)).is_some());
    }

    #[test]
    fn reserved_entry_point_is_emitted_under_its_new_name() {
        let pipeline = pipeline();
        let artifact = pipeline
            .compile_str("fn kernel\nlet device", TargetLanguage::msl())
            .unwrap();

        assert_eq!(artifact.entry_point(), "kernel");
        assert_eq!(artifact.target_entry_point(), "kernel_");
        assert_eq!(artifact.renames().get("device"), Some("device_"));
        assert!(artifact.renames().is_injective());

        let hlsl = pipeline
            .compile_str("fn kernel\nlet device", TargetLanguage::hlsl())
            .unwrap();
        assert!(hlsl.renames().is_empty());
        assert_eq!(hlsl.target_entry_point(), "kernel");
    }

    #[test]
    fn compilation_is_deterministic() {
        let pipeline = pipeline();
        let text = "var t 1 0 texture\nvar s 0 1 sampler\nvar u 0 0 uniform\nfn fragment";
        for target in [TargetLanguage::hlsl(), TargetLanguage::msl()] {
            let first = pipeline.compile_str(text, target).unwrap();
            let second = pipeline.compile_str(text, target).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn targets_get_their_own_slot_classes() {
        let pipeline = pipeline();
        let text = "var u 0 0 uniform\nvar t 0 1 texture\nfn main_cs";
        let hlsl = pipeline.compile_str(text, TargetLanguage::hlsl()).unwrap();
        let msl = pipeline.compile_str(text, TargetLanguage::msl()).unwrap();

        let texture = ResourceBinding::new(0, 1);
        assert_eq!(hlsl.bindings().slot(texture).unwrap().to_string(), "register(t0, space0)");
        assert_eq!(msl.bindings().slot(texture).unwrap().to_string(), "[[texture(0)]]");
        assert_eq!(hlsl.target().kind(), TargetKind::Hlsl);
        assert_eq!(msl.target().kind(), TargetKind::Msl);
    }

    #[test]
    fn source_label_comes_from_settings() {
        let settings = PipelineSettings {
            source_label: "shaders/blit.wgsl".to_owned(),
        };
        let pipeline = ShaderPipeline::with_settings(FakeFrontend, FakeBackend::default(), settings);
        let err = pipeline
            .compile_str("garbage", TargetLanguage::hlsl())
            .unwrap_err();
        assert!(err.to_string().contains("shaders/blit.wgsl"));
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: PipelineSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, PipelineSettings::default());
        assert_eq!(settings.source_label, MEMORY_LABEL);
    }
}
