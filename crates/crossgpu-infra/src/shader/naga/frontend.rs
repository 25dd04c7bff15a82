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

//! WGSL parsing and validation with Naga.

use naga::valid::{Capabilities, ModuleInfo, ValidationFlags, Validator};

use crossgpu_core::shader::{
    EntryPoint, ParseError, ShaderFrontend, ShaderProgram, ShaderSource, ShaderStage,
    TransformError,
};

use super::conversions::FromNaga;
use super::lowered::NagaModule;

/// Parses and validates WGSL.
#[derive(Debug, Clone, Copy)]
pub struct NagaFrontend {
    capabilities: Capabilities,
}

impl NagaFrontend {
    /// A frontend accepting every capability Naga knows about.
    pub fn new() -> Self {
        Self::with_capabilities(Capabilities::all())
    }

    /// A frontend restricted to `capabilities`.
    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self { capabilities }
    }
}

impl Default for NagaFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderFrontend for NagaFrontend {
    type Program = NagaProgram;

    fn parse(&self, source: &ShaderSource<'_>) -> Result<NagaProgram, ParseError> {
        let module = naga::front::wgsl::parse_str(source.text()).map_err(|e| ParseError {
            label: source.label().to_string(),
            message: e.emit_to_string_with_path(source.text(), source.label()),
        })?;

        let info = Validator::new(ValidationFlags::all(), self.capabilities)
            .validate(&module)
            .map_err(|e| ParseError {
                label: source.label().to_string(),
                message: super::error_chain(&e),
            })?;

        log::trace!(
            "Parsed '{}': {} function(s), {} entry point(s).",
            source.label(),
            module.functions.len(),
            module.entry_points.len()
        );

        Ok(NagaProgram { module, info })
    }
}

/// A validated WGSL module.
#[derive(Debug)]
pub struct NagaProgram {
    module: naga::Module,
    info: ModuleInfo,
}

impl NagaProgram {
    /// The underlying Naga module.
    pub fn module(&self) -> &naga::Module {
        &self.module
    }

    /// The validation results for [`NagaProgram::module`].
    pub fn info(&self) -> &ModuleInfo {
        &self.info
    }
}

impl ShaderProgram for NagaProgram {
    type Lowered = NagaModule;

    fn entry_points(&self) -> Vec<EntryPoint> {
        self.module
            .entry_points
            .iter()
            .map(|ep| EntryPoint::new(ep.name.clone(), ShaderStage::from_naga(ep.stage)))
            .collect()
    }

    fn lower(&self) -> Result<NagaModule, TransformError> {
        // The generators expect override-free modules and no pipeline
        // constants are ever supplied.
        if let Some((_, constant)) = self.module.overrides.iter().next() {
            return Err(TransformError::Lowering(format!(
                "pipeline-overridable constant '{}' cannot be resolved",
                constant.name.as_deref().unwrap_or("<unnamed>")
            )));
        }

        Ok(NagaModule::new(self.module.clone(), &self.info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<NagaProgram, ParseError> {
        NagaFrontend::new().parse(&ShaderSource::new(text))
    }

    #[test]
    fn declarations_without_entry_points_are_valid() {
        let program = parse("const x: f32 = 1.0;").unwrap();
        assert!(program.entry_points().is_empty());
        assert!(NagaFrontend::new().validate(&ShaderSource::new("const x: f32 = 1.0;")));
    }

    #[test]
    fn syntax_errors_carry_the_label() {
        let err = NagaFrontend::new()
            .parse(&ShaderSource::new("fn f() {").with_label("broken.wgsl"))
            .unwrap_err();
        assert_eq!(err.label, "broken.wgsl");
        assert!(!err.message.is_empty());
    }

    #[test]
    fn type_errors_fail_parsing() {
        assert!(parse("fn f() -> f32 { return 1u; }").is_err());
        assert!(!NagaFrontend::new().validate(&ShaderSource::new("fn f() -> f32 { return 1u; }")));
    }

    #[test]
    fn entry_points_keep_declaration_order() {
        let program = parse(
            "
            @fragment fn fs() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }
            @compute @workgroup_size(1) fn cs() {}
            @vertex fn vs() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0); }
            ",
        )
        .unwrap();
        assert_eq!(
            program.entry_points(),
            vec![
                EntryPoint::new("fs", ShaderStage::Fragment),
                EntryPoint::new("cs", ShaderStage::Compute),
                EntryPoint::new("vs", ShaderStage::Vertex),
            ]
        );
    }

    #[test]
    fn overrides_cannot_be_lowered() {
        let program = parse("override scale: f32 = 2.0;\n@compute @workgroup_size(1) fn main() { _ = scale; }").unwrap();
        assert!(matches!(program.lower(), Err(TransformError::Lowering(_))));
    }
}
