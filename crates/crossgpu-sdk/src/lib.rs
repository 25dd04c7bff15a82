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

//! The public-facing API of CrossGPU.
//!
//! Two independent services:
//!
//! - device acquisition: create an [`Instance`], enumerate adapters, and open
//!   a [`Device`] on the adapter identified by `(backend, device_id)`;
//! - shader cross-compilation: validate WGSL and compile its first entry
//!   point to HLSL or MSL.
//!
//! ```no_run
//! use crossgpu_sdk::prelude::*;
//!
//! let artifact = crossgpu_sdk::compile_shader_to_target(
//!     "@compute @workgroup_size(1) fn main() {}",
//!     TargetLanguage::msl(),
//! )?;
//! println!("{}", artifact.source());
//! # Ok::<(), CompileError>(())
//! ```

use crossgpu_core::device::{AdapterInfo, AdapterSelector, BackendKind, Device, DeviceError, Instance, InstanceSettings};
use crossgpu_core::shader::{CompileError, CompiledArtifact, PipelineSettings, TargetLanguage};
use crossgpu_infra::{naga_pipeline, NagaPipeline, WgpuDevice, WgpuDiscovery};

pub mod prelude {
    //! Everything needed to acquire devices and compile shaders.
    pub use crossgpu_core::device::{
        AdapterDeviceType, AdapterInfo, AdapterSelector, BackendKind, Device, DeviceError,
        EnumerationPolicy, Instance, InstanceSettings,
    };
    pub use crossgpu_core::shader::{
        BindingTable, CompileError, CompiledArtifact, MslVersion, NativeSlot, PipelineSettings,
        PipelineStage, RenameMap, ResourceBinding, ResourceKind, ShaderModel, ShaderSource,
        TargetKind, TargetLanguage,
    };
    pub use crossgpu_infra::{NagaPipeline, WgpuDevice, WgpuDiscovery};

    pub use super::{GpuDevice, GpuInstance};
}

/// An instance backed by WGPU.
pub type GpuInstance = Instance<WgpuDiscovery>;

/// A logical device opened through a [`GpuInstance`].
pub type GpuDevice = Device<WgpuDevice>;

/// Creates an instance over every available backend.
pub fn create_instance() -> Result<GpuInstance, DeviceError> {
    create_instance_with_settings(InstanceSettings::default())
}

/// Creates an instance restricted and configured by `settings`.
pub fn create_instance_with_settings(settings: InstanceSettings) -> Result<GpuInstance, DeviceError> {
    let discovery = WgpuDiscovery::from_settings(&settings);
    Instance::with_settings(discovery, settings)
}

/// Destroys an instance. Devices created from it stay usable.
pub fn destroy_instance(instance: GpuInstance) {
    instance.destroy();
}

/// Enumerates the adapters currently visible to `instance`.
pub fn enumerate_adapters(instance: &mut GpuInstance) -> Vec<AdapterInfo> {
    instance.enumerate_adapters().map(|adapter| adapter.info().clone()).collect()
}

/// Opens a device on the first adapter matching `(backend, device_id)`.
pub fn create_device(
    instance: &mut GpuInstance,
    backend: BackendKind,
    device_id: u32,
) -> Result<GpuDevice, DeviceError> {
    instance.create_device(backend, device_id)
}

/// Opens a device on the adapter named by a textual selector such as
/// `"vk:7430"`.
pub fn create_device_from_selector(
    instance: &mut GpuInstance,
    selector: &str,
) -> Result<GpuDevice, DeviceError> {
    let selector: AdapterSelector = selector.parse()?;
    instance.create_device_for(&selector)
}

/// The first adapter of each preferred backend.
pub fn default_selectors(instance: &mut GpuInstance, preferred: &[BackendKind]) -> Vec<AdapterSelector> {
    instance.default_selectors(preferred)
}

/// A shader compiler with explicit settings.
pub fn shader_compiler(settings: PipelineSettings) -> NagaPipeline {
    naga_pipeline(settings)
}

/// Whether `source` is a valid WGSL program.
pub fn validate_shader(source: &str) -> bool {
    shader_compiler(PipelineSettings::default()).validate_str(source)
}

/// Compiles the first entry point of `source` for `target`.
pub fn compile_shader_to_target(
    source: &str,
    target: TargetLanguage,
) -> Result<CompiledArtifact, CompileError> {
    shader_compiler(PipelineSettings::default()).compile_str(source, target)
}

/// Compiles the first entry point of `source` to HLSL at the default shader
/// model.
pub fn compile_shader_to_hlsl(source: &str) -> Result<CompiledArtifact, CompileError> {
    compile_shader_to_target(source, TargetLanguage::hlsl())
}

/// Compiles the first entry point of `source` to MSL at the default language
/// version.
pub fn compile_shader_to_msl(source: &str) -> Result<CompiledArtifact, CompileError> {
    compile_shader_to_target(source, TargetLanguage::msl())
}
