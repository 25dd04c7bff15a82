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

use naga::back::hlsl;

use crossgpu_core::shader::{ResourceBinding, ResourceCount, ResourceKind, ShaderModel, ShaderStage};

/// Converts our types into Naga types (`.into_naga()`).
pub trait IntoNaga<T> {
    /// Consumes self and converts it into a Naga value.
    fn into_naga(self) -> T;
}

/// Builds one of our types from a Naga value.
pub trait FromNaga<T> {
    /// Converts a Naga value into our representation.
    fn from_naga(value: T) -> Self;
}

impl IntoNaga<hlsl::ShaderModel> for ShaderModel {
    fn into_naga(self) -> hlsl::ShaderModel {
        match self {
            ShaderModel::V5_0 => hlsl::ShaderModel::V5_0,
            ShaderModel::V5_1 => hlsl::ShaderModel::V5_1,
            ShaderModel::V6_0 => hlsl::ShaderModel::V6_0,
        }
    }
}

impl IntoNaga<naga::ResourceBinding> for ResourceBinding {
    fn into_naga(self) -> naga::ResourceBinding {
        naga::ResourceBinding {
            group: self.group,
            binding: self.binding,
        }
    }
}

impl FromNaga<&naga::ResourceBinding> for ResourceBinding {
    fn from_naga(binding: &naga::ResourceBinding) -> Self {
        ResourceBinding::new(binding.group, binding.binding)
    }
}

impl FromNaga<naga::ShaderStage> for ShaderStage {
    fn from_naga(stage: naga::ShaderStage) -> Self {
        match stage {
            naga::ShaderStage::Vertex => ShaderStage::Vertex,
            naga::ShaderStage::Fragment => ShaderStage::Fragment,
            // Task, mesh and the other compute-class stages.
            _ => ShaderStage::Compute,
        }
    }
}

/// The resource kind and count of a bound global variable, or `None` if the
/// variable is not something that takes a binding slot.
pub fn resource_shape(
    module: &naga::Module,
    var: &naga::GlobalVariable,
) -> Option<(ResourceKind, ResourceCount)> {
    let (inner, count) = match module.types[var.ty].inner {
        naga::TypeInner::BindingArray { base, size } => (
            &module.types[base].inner,
            match size {
                naga::ArraySize::Constant(n) => ResourceCount::Array(n.get()),
                _ => ResourceCount::Unbounded,
            },
        ),
        ref inner => (inner, ResourceCount::Single),
    };

    let kind = match var.space {
        naga::AddressSpace::Uniform => ResourceKind::UniformBuffer,
        naga::AddressSpace::Storage { access } => ResourceKind::StorageBuffer {
            writable: access.contains(naga::StorageAccess::STORE),
        },
        naga::AddressSpace::Handle => match *inner {
            naga::TypeInner::Image {
                class: naga::ImageClass::Storage { .. },
                ..
            } => ResourceKind::StorageTexture,
            naga::TypeInner::Image { .. } => ResourceKind::Texture,
            naga::TypeInner::Sampler { comparison } => ResourceKind::Sampler { comparison },
            _ => return None,
        },
        _ => return None,
    };

    Some((kind, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shapes(source: &str) -> Vec<(ResourceKind, ResourceCount)> {
        let module = naga::front::wgsl::parse_str(source).unwrap();
        module
            .global_variables
            .iter()
            .filter_map(|(_, var)| resource_shape(&module, var))
            .collect()
    }

    #[test]
    fn address_spaces_map_to_resource_kinds() {
        let found = shapes(
            "
            struct Params { scale: f32 }
            @group(0) @binding(0) var<uniform> params: Params;
            @group(0) @binding(1) var<storage, read> input: array<f32>;
            @group(0) @binding(2) var<storage, read_write> output: array<f32>;
            @group(1) @binding(0) var tex: texture_2d<f32>;
            @group(1) @binding(1) var img: texture_storage_2d<rgba8unorm, write>;
            @group(1) @binding(2) var samp: sampler;
            @group(1) @binding(3) var shadow: sampler_comparison;
            var<private> scratch: f32;
            ",
        );
        assert_eq!(
            found,
            vec![
                (ResourceKind::UniformBuffer, ResourceCount::Single),
                (ResourceKind::StorageBuffer { writable: false }, ResourceCount::Single),
                (ResourceKind::StorageBuffer { writable: true }, ResourceCount::Single),
                (ResourceKind::Texture, ResourceCount::Single),
                (ResourceKind::StorageTexture, ResourceCount::Single),
                (ResourceKind::Sampler { comparison: false }, ResourceCount::Single),
                (ResourceKind::Sampler { comparison: true }, ResourceCount::Single),
            ]
        );
    }

    #[test]
    fn binding_arrays_report_their_size() {
        let found = shapes(
            "
            @group(0) @binding(0) var fixed: binding_array<texture_2d<f32>, 4>;
            @group(0) @binding(1) var open: binding_array<texture_2d<f32>>;
            ",
        );
        assert_eq!(
            found,
            vec![
                (ResourceKind::Texture, ResourceCount::Array(4)),
                (ResourceKind::Texture, ResourceCount::Unbounded),
            ]
        );
    }

    #[test]
    fn stages_convert() {
        assert_eq!(ShaderStage::from_naga(naga::ShaderStage::Vertex), ShaderStage::Vertex);
        assert_eq!(ShaderStage::from_naga(naga::ShaderStage::Fragment), ShaderStage::Fragment);
        assert_eq!(ShaderStage::from_naga(naga::ShaderStage::Compute), ShaderStage::Compute);
    }
}
