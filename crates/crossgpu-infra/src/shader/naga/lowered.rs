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

use crossgpu_core::shader::{LoweredProgram, RenameMap, ResourceDecl, TransformError};
use naga::{valid::ModuleInfo, Handle};

use super::conversions::{resource_shape, FromNaga};

/// A Naga module owned by one compilation.
///
/// Identifier renames are applied in place. Struct and member names are left
/// to the generators' own namers.
#[derive(Debug, Clone)]
pub struct NagaModule {
    module: naga::Module,
    /// Globals used by each entry point, indexed like `module.entry_points`.
    usage: Vec<Vec<Handle<naga::GlobalVariable>>>,
}

impl NagaModule {
    /// Wraps a validated `module`, recording from `info` which globals each
    /// entry point reaches.
    pub(crate) fn new(module: naga::Module, info: &ModuleInfo) -> Self {
        let usage = (0..module.entry_points.len())
            .map(|index| {
                let function = info.get_entry_point(index);
                module
                    .global_variables
                    .iter()
                    .filter(|(handle, _)| !function[*handle].is_empty())
                    .map(|(handle, _)| handle)
                    .collect()
            })
            .collect();
        Self { module, usage }
    }

    /// The underlying Naga module.
    pub fn module(&self) -> &naga::Module {
        &self.module
    }
}

fn function_identifiers(function: &naga::Function, out: &mut Vec<String>) {
    out.extend(function.name.iter().cloned());
    out.extend(function.arguments.iter().filter_map(|arg| arg.name.clone()));
    out.extend(
        function
            .local_variables
            .iter()
            .filter_map(|(_, local)| local.name.clone()),
    );
    out.extend(function.named_expressions.values().cloned());
}

fn rename_function(function: &mut naga::Function, renames: &RenameMap) {
    let rename = |name: &mut String| {
        if let Some(renamed) = renames.get(name) {
            *name = renamed.to_string();
        }
    };

    function.name.iter_mut().for_each(rename);
    function
        .arguments
        .iter_mut()
        .filter_map(|arg| arg.name.as_mut())
        .for_each(rename);
    function
        .local_variables
        .iter_mut()
        .filter_map(|(_, local)| local.name.as_mut())
        .for_each(rename);
    function.named_expressions.values_mut().for_each(rename);
}

impl LoweredProgram for NagaModule {
    fn identifiers(&self) -> Vec<String> {
        let module = &self.module;
        let mut out = Vec::new();

        out.extend(
            module
                .global_variables
                .iter()
                .filter_map(|(_, var)| var.name.clone()),
        );
        out.extend(
            module
                .constants
                .iter()
                .filter_map(|(_, constant)| constant.name.clone()),
        );
        for (_, function) in module.functions.iter() {
            function_identifiers(function, &mut out);
        }
        for ep in &module.entry_points {
            out.push(ep.name.clone());
            function_identifiers(&ep.function, &mut out);
        }

        out
    }

    fn rename(mut self, renames: &RenameMap) -> Result<Self, TransformError> {
        if !renames.is_injective() {
            return Err(TransformError::Rename(
                "two identifiers were given the same replacement".to_string(),
            ));
        }
        if renames.is_empty() {
            return Ok(self);
        }

        let rename = |name: &mut String| {
            if let Some(renamed) = renames.get(name) {
                *name = renamed.to_string();
            }
        };

        let module = &mut self.module;
        module
            .global_variables
            .iter_mut()
            .filter_map(|(_, var)| var.name.as_mut())
            .for_each(rename);
        module
            .constants
            .iter_mut()
            .filter_map(|(_, constant)| constant.name.as_mut())
            .for_each(rename);
        for (_, function) in module.functions.iter_mut() {
            rename_function(function, renames);
        }
        for ep in module.entry_points.iter_mut() {
            rename(&mut ep.name);
            rename_function(&mut ep.function, renames);
        }

        Ok(self)
    }

    fn resources(&self, entry_point: &str) -> Vec<ResourceDecl> {
        let used = self
            .module
            .entry_points
            .iter()
            .position(|ep| ep.name == entry_point)
            .and_then(|index| self.usage.get(index));
        let Some(used) = used else {
            log::debug!("No entry point named '{entry_point}'; it uses no resources.");
            return Vec::new();
        };

        used.iter()
            .filter_map(|&handle| {
                let var = &self.module.global_variables[handle];
                let binding = var.binding.as_ref()?;
                let (kind, count) = resource_shape(&self.module, var)?;
                Some(ResourceDecl {
                    name: var.name.clone(),
                    binding: FromNaga::from_naga(binding),
                    kind,
                    count,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossgpu_core::shader::{ResourceBinding, ResourceKind};

    fn lowered(source: &str) -> NagaModule {
        let module = naga::front::wgsl::parse_str(source).unwrap();
        let info = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .unwrap();
        NagaModule::new(module, &info)
    }

    const SHADER: &str = "
        @group(0) @binding(0) var<uniform> main: vec4<f32>;
        const device: f32 = 2.0;
        fn helper(kernel: f32) -> f32 {
            var thread: f32 = kernel;
            let half_value = thread * device;
            return half_value;
        }
        @compute @workgroup_size(1) fn entry() {
            _ = helper(main.x);
        }
    ";

    #[test]
    fn identifiers_follow_declaration_order() {
        let idents = lowered(SHADER).identifiers();
        let position = |name: &str| idents.iter().position(|it| it == name).unwrap();

        assert!(position("main") < position("device"));
        assert!(position("device") < position("helper"));
        assert!(position("helper") < position("kernel"));
        assert!(position("kernel") < position("thread"));
        assert!(position("thread") < position("half_value"));
        assert!(position("half_value") < position("entry"));
    }

    #[test]
    fn renames_reach_every_occurrence() {
        let mut renames = RenameMap::new();
        renames.insert("main", "main_");
        renames.insert("kernel", "kernel_");
        renames.insert("thread", "thread_");
        renames.insert("entry", "entry_");

        let module = lowered(SHADER).rename(&renames).unwrap();
        let idents = module.identifiers();

        for original in ["main", "kernel", "thread", "entry"] {
            assert!(!idents.iter().any(|it| it == original), "{original} survived");
        }
        assert_eq!(module.module().entry_points[0].name, "entry_");
        assert_eq!(module.resources("entry_")[0].name.as_deref(), Some("main_"));
        assert!(module.resources("entry").is_empty());
    }

    #[test]
    fn resources_report_bound_globals_only() {
        let resources = lowered(SHADER).resources("entry");
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].binding, ResourceBinding::new(0, 0));
        assert_eq!(resources[0].kind, ResourceKind::UniformBuffer);
    }

    const SPLIT_RESOURCES: &str = "
        @group(0) @binding(0) var<uniform> tint: vec4<f32>;
        @group(0) @binding(0) var tex: texture_2d<f32>;
        @group(0) @binding(1) var textures: binding_array<texture_2d<f32>, 2>;
        fn shade() -> vec4<f32> {
            return tint;
        }
        @fragment fn first() -> @location(0) vec4<f32> {
            return shade();
        }
        @fragment fn second() -> @location(0) vec4<f32> {
            return textureLoad(tex, vec2<i32>(0, 0), 0)
                + textureLoad(textures[1], vec2<i32>(0, 0), 0);
        }
    ";

    #[test]
    fn resources_are_scoped_to_one_entry_point() {
        let module = lowered(SPLIT_RESOURCES);

        let first = module.resources("first");
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].name.as_deref(), Some("tint"));
        assert_eq!(first[0].kind, ResourceKind::UniformBuffer);

        let second: Vec<_> = module
            .resources("second")
            .into_iter()
            .map(|it| (it.name.unwrap_or_default(), it.binding))
            .collect();
        assert_eq!(
            second,
            [
                ("tex".to_string(), ResourceBinding::new(0, 0)),
                ("textures".to_string(), ResourceBinding::new(0, 1)),
            ]
        );

        assert!(module.resources("third").is_empty());
    }
}
