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

//! Adapter discovery and device creation on top of WGPU.

use anyhow::{anyhow, Result};
use wgpu::{Adapter, Backends, Instance};

use crossgpu_core::device::{AdapterDiscovery, AdapterInfo, DeviceError, InstanceSettings, NativeAdapter};

use super::conversions::{FromWgpu, IntoWgpu};

/// WGPU-backed implementation of [`AdapterDiscovery`].
///
/// The native `wgpu::Instance` is created in
/// [`AdapterDiscovery::initialize`] and every call to
/// [`AdapterDiscovery::discover`] asks it for a fresh adapter list.
pub struct WgpuDiscovery {
    backends: Backends,
    instance: Option<Instance>,
}

impl WgpuDiscovery {
    /// A discovery service over every backend WGPU was built with.
    pub fn new() -> Self {
        Self::with_backends(Backends::all())
    }

    /// A discovery service restricted to `backends`.
    pub fn with_backends(backends: Backends) -> Self {
        Self {
            backends,
            instance: None,
        }
    }

    /// A discovery service whose native mask matches the instance settings.
    pub fn from_settings(settings: &InstanceSettings) -> Self {
        Self::with_backends(settings.backends.as_slice().into_wgpu())
    }

    /// The native backend mask.
    pub fn backends(&self) -> Backends {
        self.backends
    }
}

impl Default for WgpuDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

impl AdapterDiscovery for WgpuDiscovery {
    type Adapter = WgpuAdapter;

    fn initialize(&mut self) -> Result<(), DeviceError> {
        if self.backends.is_empty() {
            return Err(DeviceError::BackendInitFailure(
                "none of the requested backends is supported by WGPU".to_string(),
            ));
        }

        let instance = Instance::new(wgpu::InstanceDescriptor {
            backends: self.backends,
            ..wgpu::InstanceDescriptor::new_without_display_handle()
        });
        log::debug!("WGPU instance created for backends {:?}.", self.backends);

        self.instance = Some(instance);
        Ok(())
    }

    fn discover(&self) -> Vec<WgpuAdapter> {
        let Some(instance) = self.instance.as_ref() else {
            log::warn!("Adapter discovery requested before the WGPU instance was initialized.");
            return Vec::new();
        };

        let adapters: Vec<WgpuAdapter> = pollster::block_on(instance.enumerate_adapters(self.backends))
            .into_iter()
            .map(WgpuAdapter::new)
            .collect();
        log::trace!("WGPU reported {} adapter(s).", adapters.len());
        adapters
    }
}

/// A WGPU adapter together with its converted description.
pub struct WgpuAdapter {
    adapter: Adapter,
    info: AdapterInfo,
}

impl WgpuAdapter {
    fn new(adapter: Adapter) -> Self {
        let info = AdapterInfo::from_wgpu(&adapter.get_info());
        Self { adapter, info }
    }

    /// The underlying WGPU adapter.
    pub fn wgpu_adapter(&self) -> &Adapter {
        &self.adapter
    }

    fn request_device(&self) -> Result<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(self.adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("CrossGPU Logical Device"),
            required_features: wgpu::Features::empty(),
            required_limits: self.adapter.limits(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::Off,
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
        }))
        .map_err(|e| anyhow!("Failed to create logical device: {}", e))
    }
}

impl NativeAdapter for WgpuAdapter {
    type Device = WgpuDevice;

    fn info(&self) -> AdapterInfo {
        self.info.clone()
    }

    fn create_device(&self) -> Result<WgpuDevice, DeviceError> {
        let (device, queue) =
            self.request_device()
                .map_err(|e| DeviceError::DeviceRequestFailed {
                    adapter: self.info.name.clone(),
                    reason: format!("{e:#}"),
                })?;

        device.on_uncaptured_error(std::sync::Arc::new(|e| {
            log::error!("WGPU Uncaptured Error: {e:?}");
        }));

        Ok(WgpuDevice { device, queue })
    }
}

/// A logical WGPU device and its command queue.
#[derive(Debug)]
pub struct WgpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl WgpuDevice {
    /// The logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// The device's command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}
