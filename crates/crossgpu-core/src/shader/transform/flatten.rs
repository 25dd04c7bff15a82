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

//! Resource binding flattening.
//!
//! Portable `(group, binding)` coordinates are mapped onto the flat slot
//! classes of a destination language. Resources are visited sorted by
//! coordinate and each one takes the next free index of its class, so the
//! resulting table only depends on the set of declared resources.
//!
//! HLSL samplers are not bound to `s` registers directly. They live in a
//! sampler heap (comparison samplers in a second one) and every group reads
//! its samplers' heap positions from an index buffer, so a sampler's slot
//! names the heap, the group's index buffer and its entry in that buffer.

use crate::shader::api::{
    BindingEntry, BindingTable, DescriptorClass, NativeSlot, RegisterClass, ResourceBinding,
    ResourceCount, ResourceDecl, ResourceKind, SlotClass, TargetKind, TargetLanguage,
};
use crate::shader::error::TransformError;
use std::collections::{BTreeMap, HashMap};

/// Register space every HLSL resource is placed in.
pub const HLSL_REGISTER_SPACE: u32 = 0;

/// `s` register of both HLSL sampler heaps.
pub const HLSL_SAMPLER_HEAP_REGISTER: u32 = 0;

/// Register space of the HLSL heap holding non-comparison samplers.
pub const HLSL_SAMPLER_HEAP_SPACE: u32 = 0;

/// Register space of the HLSL heap holding comparison samplers.
pub const HLSL_COMPARISON_SAMPLER_HEAP_SPACE: u32 = 1;

/// Register space of the per-group HLSL sampler index buffers. Group `g`
/// reads its index buffer from `register(t<g>)` in this space.
pub const HLSL_SAMPLER_INDEX_SPACE: u32 = 255;

/// Assigns native slots for one destination language.
#[derive(Debug, Clone, Copy)]
pub struct BindingFlattener {
    target: TargetLanguage,
}

impl BindingFlattener {
    /// The flattener for `target`.
    pub fn for_target(target: TargetLanguage) -> Self {
        Self { target }
    }

    /// The slot class `kind` lands in.
    pub fn slot_class(&self, kind: ResourceKind) -> SlotClass {
        match self.target.kind() {
            TargetKind::Hlsl => SlotClass::Register(match kind {
                ResourceKind::UniformBuffer => RegisterClass::ConstantBuffer,
                ResourceKind::StorageBuffer { writable: false } | ResourceKind::Texture => {
                    RegisterClass::ShaderResource
                }
                ResourceKind::StorageBuffer { writable: true } | ResourceKind::StorageTexture => {
                    RegisterClass::UnorderedAccess
                }
                ResourceKind::Sampler { .. } => RegisterClass::Sampler,
            }),
            TargetKind::Msl => SlotClass::Descriptor(match kind {
                ResourceKind::UniformBuffer | ResourceKind::StorageBuffer { .. } => {
                    DescriptorClass::Buffer
                }
                ResourceKind::Texture | ResourceKind::StorageTexture => DescriptorClass::Texture,
                ResourceKind::Sampler { .. } => DescriptorClass::Sampler,
            }),
        }
    }

    /// How many indices `class` offers.
    pub fn limit(&self, class: SlotClass) -> u32 {
        match class {
            SlotClass::Register(RegisterClass::ConstantBuffer) => 14,
            SlotClass::Register(RegisterClass::ShaderResource) => 128,
            SlotClass::Register(RegisterClass::UnorderedAccess) => 64,
            SlotClass::Register(RegisterClass::Sampler) => 16,
            SlotClass::Descriptor(DescriptorClass::Buffer) => 31,
            SlotClass::Descriptor(DescriptorClass::Texture) => 128,
            SlotClass::Descriptor(DescriptorClass::Sampler) => 16,
        }
    }

    /// Builds the binding table for `resources`.
    ///
    /// Fails without a partial result when two declarations disagree at one
    /// coordinate, a shape cannot be expressed, or a class runs out of slots.
    pub fn flatten(&self, resources: &[ResourceDecl]) -> Result<BindingTable, TransformError> {
        let target = self.target.kind();
        let mut unique: BTreeMap<ResourceBinding, (ResourceKind, ResourceCount)> = BTreeMap::new();

        for decl in resources {
            match unique.get(&decl.binding) {
                Some(&(kind, count)) if kind == decl.kind && count == decl.count => {
                    log::debug!("Aliasing {} with an earlier declaration.", decl.binding);
                }
                Some(_) => {
                    return Err(TransformError::ConflictingBinding {
                        binding: decl.binding,
                    })
                }
                None => {
                    unique.insert(decl.binding, (decl.kind, decl.count));
                }
            }
        }

        let mut next: HashMap<SlotClass, u32> = HashMap::new();
        let mut entries = Vec::with_capacity(unique.len());

        for (binding, (kind, count)) in unique {
            let width = self
                .width(count)
                .ok_or(TransformError::UnsupportedResourceShape {
                    binding,
                    kind,
                    count,
                    target,
                })?;

            let class = self.slot_class(kind);
            let limit = self.limit(class);
            let cursor = next.entry(class).or_insert(0);
            let index = *cursor;
            let end = index
                .checked_add(width)
                .filter(|end| *end <= limit)
                .ok_or(TransformError::SlotsExhausted {
                    class,
                    limit,
                    target,
                })?;
            *cursor = end;

            let slot = match (class, kind) {
                (
                    SlotClass::Register(RegisterClass::Sampler),
                    ResourceKind::Sampler { comparison },
                ) => NativeSlot::SamplerHeap {
                    heap_register: HLSL_SAMPLER_HEAP_REGISTER,
                    heap_space: if comparison {
                        HLSL_COMPARISON_SAMPLER_HEAP_SPACE
                    } else {
                        HLSL_SAMPLER_HEAP_SPACE
                    },
                    table_register: binding.group,
                    table_space: HLSL_SAMPLER_INDEX_SPACE,
                    index,
                    count: width,
                },
                (SlotClass::Register(class), _) => NativeSlot::Register {
                    class,
                    index,
                    space: HLSL_REGISTER_SPACE,
                    count: width,
                },
                (SlotClass::Descriptor(class), _) => NativeSlot::Descriptor {
                    class,
                    index,
                    count: width,
                },
            };
            log::debug!("{binding} {kind} -> {slot}");

            entries.push(BindingEntry {
                binding,
                kind,
                count,
                slot,
            });
        }

        Ok(BindingTable::from_entries(entries))
    }

    /// Consecutive indices a count occupies, or `None` if the target cannot
    /// express it.
    fn width(&self, count: ResourceCount) -> Option<u32> {
        match (self.target.kind(), count) {
            (_, ResourceCount::Single) => Some(1),
            (TargetKind::Hlsl, ResourceCount::Array(n)) if n > 0 => Some(n),
            _ => None,
        }
    }
}
