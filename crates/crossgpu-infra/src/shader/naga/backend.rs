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

//! HLSL and MSL generation with Naga.

use anyhow::{anyhow, Context, Result};
use naga::back::{hlsl, msl};
use naga::valid::{Capabilities, ModuleInfo, ValidationFlags, Validator};

use crossgpu_core::shader::transform::{
    HLSL_COMPARISON_SAMPLER_HEAP_SPACE, HLSL_SAMPLER_HEAP_REGISTER, HLSL_SAMPLER_HEAP_SPACE,
};
use crossgpu_core::shader::{
    BindingTable, DescriptorClass, GeneratedSource, GenerationError, MslVersion, NativeSlot,
    ResourceKind, ShaderBackend, ShaderModel, TargetLanguage,
};

use super::conversions::IntoNaga;
use super::lowered::NagaModule;

/// Emits HLSL or MSL from a [`NagaModule`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NagaBackend;

impl NagaBackend {
    /// Creates the backend.
    pub fn new() -> Self {
        Self
    }

    /// Keeps only `entry_point` and revalidates the result.
    fn prune(program: &NagaModule, entry_point: &str) -> Result<(naga::Module, ModuleInfo)> {
        let mut module = program.module().clone();
        module.entry_points.retain(|ep| ep.name == entry_point);
        if module.entry_points.is_empty() {
            return Err(anyhow!("entry point '{entry_point}' not found"));
        }

        let info = Validator::new(ValidationFlags::all(), Capabilities::all())
            .validate(&module)
            .map_err(|e| anyhow!("{}", super::error_chain(&e)))
            .context("revalidating the pruned module")?;
        Ok((module, info))
    }

    fn write_hlsl(
        module: &naga::Module,
        info: &ModuleInfo,
        shader_model: ShaderModel,
        bindings: &BindingTable,
    ) -> Result<(String, String)> {
        let heap = |register: u32, space: u32| -> Result<hlsl::BindTarget> {
            Ok(hlsl::BindTarget {
                space: u8::try_from(space).context("register space out of range")?,
                register,
                ..Default::default()
            })
        };

        let mut binding_map = hlsl::BindingMap::default();
        let mut sampler_buffer_binding_map = hlsl::SamplerIndexBufferBindingMap::default();
        let mut sampler_heap_target = hlsl::SamplerHeapBindTargets {
            standard_samplers: heap(HLSL_SAMPLER_HEAP_REGISTER, HLSL_SAMPLER_HEAP_SPACE)?,
            comparison_samplers: heap(
                HLSL_SAMPLER_HEAP_REGISTER,
                HLSL_COMPARISON_SAMPLER_HEAP_SPACE,
            )?,
        };

        for entry in bindings.entries() {
            let target = match entry.slot {
                NativeSlot::Register {
                    index,
                    space,
                    count,
                    ..
                } => hlsl::BindTarget {
                    space: u8::try_from(space).context("register space out of range")?,
                    register: index,
                    binding_array_size: (count > 1).then_some(count),
                    ..Default::default()
                },
                NativeSlot::SamplerHeap {
                    heap_register,
                    heap_space,
                    table_register,
                    table_space,
                    index,
                    count,
                } => {
                    let heap_target = heap(heap_register, heap_space)?;
                    if matches!(entry.kind, ResourceKind::Sampler { comparison: true }) {
                        sampler_heap_target.comparison_samplers = heap_target;
                    } else {
                        sampler_heap_target.standard_samplers = heap_target;
                    }
                    sampler_buffer_binding_map.insert(
                        hlsl::SamplerIndexBufferKey {
                            group: entry.binding.group,
                        },
                        heap(table_register, table_space)?,
                    );
                    // For heap samplers the register is the entry in the
                    // group's index buffer.
                    hlsl::BindTarget {
                        register: index,
                        binding_array_size: (count > 1).then_some(count),
                        ..Default::default()
                    }
                }
                NativeSlot::Descriptor { .. } => {
                    return Err(anyhow!("{} has no register slot", entry.binding));
                }
            };
            binding_map.insert(entry.binding.into_naga(), target);
        }

        let options = hlsl::Options {
            shader_model: shader_model.into_naga(),
            binding_map,
            sampler_heap_target,
            sampler_buffer_binding_map,
            // Globals reached only from pruned entry points are not in the
            // table.
            fake_missing_bindings: true,
            ..Default::default()
        };

        let mut text = String::new();
        let reflection = {
            let pipeline_options = hlsl::PipelineOptions::default();
            let mut writer = hlsl::Writer::new(&mut text, &options, &pipeline_options);
            writer
                .write(module, info, None)
                .map_err(|e| anyhow!("{e}"))?
        };
        let entry_point = reflection
            .entry_point_names
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no entry point was emitted"))?
            .map_err(|e| anyhow!("{e}"))?;

        Ok((text, entry_point))
    }

    fn write_msl(
        module: &naga::Module,
        info: &ModuleInfo,
        version: MslVersion,
        entry_point: &str,
        bindings: &BindingTable,
    ) -> Result<(String, String)> {
        let mut resources = msl::EntryPointResources::default();
        let mut next_buffer = 0;
        for entry in bindings.entries() {
            let NativeSlot::Descriptor {
                class,
                index,
                count,
            } = entry.slot
            else {
                return Err(anyhow!("{} has no descriptor slot", entry.binding));
            };
            let slot = u8::try_from(index).context("descriptor index out of range")?;
            let mut target = msl::BindTarget {
                mutable: matches!(
                    entry.kind,
                    ResourceKind::StorageBuffer { writable: true } | ResourceKind::StorageTexture
                ),
                ..Default::default()
            };
            match class {
                DescriptorClass::Buffer => {
                    target.buffer = Some(slot);
                    next_buffer = next_buffer.max(index + count);
                }
                DescriptorClass::Texture => target.texture = Some(slot),
                DescriptorClass::Sampler => {
                    target.sampler = Some(msl::BindSamplerTarget::Resource(slot))
                }
            }
            resources.resources.insert(entry.binding.into_naga(), target);
        }
        // Runtime-sized arrays read their lengths from one extra buffer.
        resources.sizes_buffer = u8::try_from(next_buffer).ok();

        let mut options = msl::Options {
            lang_version: (version.major, version.minor),
            fake_missing_bindings: false,
            ..Default::default()
        };
        options
            .per_entry_point_map
            .insert(entry_point.to_string(), resources);

        let (text, translation) =
            msl::write_string(module, info, &options, &msl::PipelineOptions::default())
                .map_err(|e| anyhow!("{e}"))?;
        let entry_point = translation
            .entry_point_names
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no entry point was emitted"))?
            .map_err(|e| anyhow!("{e}"))?;

        Ok((text, entry_point))
    }

    fn emit(
        &self,
        program: &NagaModule,
        target: TargetLanguage,
        entry_point: &str,
        bindings: &BindingTable,
    ) -> Result<GeneratedSource> {
        let (module, info) = Self::prune(program, entry_point)?;

        let (text, entry_point) = match target {
            TargetLanguage::Hlsl { shader_model } => {
                Self::write_hlsl(&module, &info, shader_model, bindings)?
            }
            TargetLanguage::Msl { version } => {
                Self::write_msl(&module, &info, version, entry_point, bindings)?
            }
        };

        Ok(GeneratedSource { text, entry_point })
    }
}

impl ShaderBackend<NagaModule> for NagaBackend {
    fn generate(
        &self,
        program: &NagaModule,
        target: TargetLanguage,
        entry_point: &str,
        bindings: &BindingTable,
    ) -> Result<GeneratedSource, GenerationError> {
        self.emit(program, target, entry_point, bindings)
            .map_err(|e| GenerationError {
                target,
                message: format!("{e:#}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossgpu_core::shader::{BindingFlattener, LoweredProgram};

    const TWO_ENTRY_POINTS: &str = "
        @group(0) @binding(0) var<storage, read_write> data: array<u32>;

        @compute @workgroup_size(64)
        fn bump_counts(@builtin(global_invocation_id) id: vec3<u32>) {
            data[id.x] = data[id.x] + 1u;
        }

        @compute @workgroup_size(64)
        fn zero_counts(@builtin(global_invocation_id) id: vec3<u32>) {
            data[id.x] = 0u;
        }
    ";

    fn lowered(text: &str) -> NagaModule {
        let module = naga::front::wgsl::parse_str(text).unwrap();
        let info = Validator::new(ValidationFlags::all(), Capabilities::all())
            .validate(&module)
            .unwrap();
        NagaModule::new(module, &info)
    }

    fn generate_from(
        text: &str,
        target: TargetLanguage,
        entry_point: &str,
    ) -> Result<(GeneratedSource, BindingTable), GenerationError> {
        let program = lowered(text);
        let bindings = BindingFlattener::for_target(target)
            .flatten(&program.resources(entry_point))
            .unwrap();
        let generated = NagaBackend::new().generate(&program, target, entry_point, &bindings)?;
        Ok((generated, bindings))
    }

    fn generate(target: TargetLanguage, entry_point: &str) -> Result<GeneratedSource, GenerationError> {
        generate_from(TWO_ENTRY_POINTS, target, entry_point).map(|(generated, _)| generated)
    }

    #[test]
    fn only_the_requested_entry_point_is_emitted() {
        let hlsl = generate(TargetLanguage::hlsl(), "zero_counts").unwrap();
        assert_eq!(hlsl.entry_point, "zero_counts");
        assert!(hlsl.text.contains("zero_counts"));
        assert!(!hlsl.text.contains("bump_counts"));
        assert!(hlsl.text.contains("register(u0"));

        let msl = generate(TargetLanguage::msl(), "bump_counts").unwrap();
        assert!(msl.text.contains("bump_counts"));
        assert!(!msl.text.contains("zero_counts"));
        assert!(msl.text.contains("[[buffer(0)]]"));
    }

    const SAMPLED: &str = "
        @group(1) @binding(0) var color: texture_2d<f32>;
        @group(1) @binding(1) var linear: sampler;
        @group(2) @binding(0) var depth: texture_depth_2d;
        @group(2) @binding(1) var shadow: sampler_comparison;

        @fragment
        fn shade(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
            let lit = textureSampleCompare(depth, shadow, uv, 0.5);
            return textureSample(color, linear, uv) * lit;
        }
    ";

    #[test]
    fn hlsl_sampler_heaps_match_the_binding_table() {
        let (hlsl, bindings) = generate_from(SAMPLED, TargetLanguage::hlsl(), "shade").unwrap();

        for group in [1, 2] {
            let entry = bindings
                .get(crossgpu_core::shader::ResourceBinding::new(group, 1))
                .unwrap();
            let NativeSlot::SamplerHeap {
                heap_register,
                heap_space,
                table_register,
                table_space,
                index,
                ..
            } = entry.slot
            else {
                panic!("{} is not a heap sampler: {}", entry.binding, entry.slot);
            };

            let heap = format!("register(s{heap_register}, space{heap_space})");
            let table = format!("register(t{table_register}, space{table_space})");
            let lookup = format!("Group{group}SamplerIndexArray[{index}]");
            for expected in [&heap, &table, &lookup] {
                assert!(hlsl.text.contains(expected.as_str()), "missing {expected}:\n{}", hlsl.text);
            }
        }
    }

    #[test]
    fn unknown_entry_points_fail_generation() {
        let err = generate(TargetLanguage::msl(), "third").unwrap_err();
        assert_eq!(err.target, TargetLanguage::msl());
        assert!(err.message.contains("third"));
    }
}
