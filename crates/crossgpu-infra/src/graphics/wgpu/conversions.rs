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

use crossgpu_core::device::{AdapterDeviceType, AdapterInfo, BackendKind};

/// A local extension trait to convert our types into WGPU types.
/// This avoids Rust's orphan rules while keeping an idiomatic `.into_wgpu()` syntax.
pub trait IntoWgpu<T> {
    /// Consumes self and converts it into a WGPU-compatible type.
    fn into_wgpu(self) -> T;
}

/// The reverse of [`IntoWgpu`]: builds one of our types from a WGPU value.
pub trait FromWgpu<T> {
    /// Converts a WGPU value into our representation.
    fn from_wgpu(value: T) -> Self;
}

// --- Backends ---

impl IntoWgpu<wgpu::Backends> for BackendKind {
    fn into_wgpu(self) -> wgpu::Backends {
        match self {
            BackendKind::Vulkan => wgpu::Backends::VULKAN,
            BackendKind::Metal => wgpu::Backends::METAL,
            BackendKind::Dx12 => wgpu::Backends::DX12,
            BackendKind::OpenGl => wgpu::Backends::GL,
            BackendKind::WebGpu => wgpu::Backends::BROWSER_WEBGPU,
            // WGPU has no D3D11 backend, and the no-op/unknown kinds are never
            // reported by a real adapter.
            BackendKind::Dx11 | BackendKind::Null | BackendKind::Unknown => wgpu::Backends::empty(),
        }
    }
}

impl IntoWgpu<wgpu::Backends> for &[BackendKind] {
    fn into_wgpu(self) -> wgpu::Backends {
        if self.is_empty() {
            return wgpu::Backends::all();
        }
        self.iter()
            .fold(wgpu::Backends::empty(), |mask, kind| mask | kind.into_wgpu())
    }
}

impl FromWgpu<wgpu::Backend> for BackendKind {
    fn from_wgpu(backend: wgpu::Backend) -> Self {
        match backend {
            wgpu::Backend::Vulkan => BackendKind::Vulkan,
            wgpu::Backend::Metal => BackendKind::Metal,
            wgpu::Backend::Dx12 => BackendKind::Dx12,
            wgpu::Backend::Gl => BackendKind::OpenGl,
            wgpu::Backend::BrowserWebGpu => BackendKind::WebGpu,
            wgpu::Backend::Noop => BackendKind::Null,
            #[allow(unreachable_patterns)]
            _ => BackendKind::Unknown,
        }
    }
}

// --- Adapter description ---

impl FromWgpu<wgpu::DeviceType> for AdapterDeviceType {
    fn from_wgpu(device_type: wgpu::DeviceType) -> Self {
        match device_type {
            wgpu::DeviceType::IntegratedGpu => AdapterDeviceType::IntegratedGpu,
            wgpu::DeviceType::DiscreteGpu => AdapterDeviceType::DiscreteGpu,
            wgpu::DeviceType::VirtualGpu => AdapterDeviceType::VirtualGpu,
            wgpu::DeviceType::Cpu => AdapterDeviceType::Cpu,
            _ => AdapterDeviceType::Other,
        }
    }
}

impl FromWgpu<&wgpu::AdapterInfo> for AdapterInfo {
    fn from_wgpu(info: &wgpu::AdapterInfo) -> Self {
        AdapterInfo {
            backend: BackendKind::from_wgpu(info.backend),
            device_id: info.device,
            name: info.name.clone(),
            vendor_id: info.vendor,
            device_type: AdapterDeviceType::from_wgpu(info.device_type),
            driver: info.driver.clone(),
            driver_info: info.driver_info.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_kinds_round_trip_through_wgpu() {
        for (kind, backend) in [
            (BackendKind::Vulkan, wgpu::Backend::Vulkan),
            (BackendKind::Metal, wgpu::Backend::Metal),
            (BackendKind::Dx12, wgpu::Backend::Dx12),
            (BackendKind::OpenGl, wgpu::Backend::Gl),
            (BackendKind::WebGpu, wgpu::Backend::BrowserWebGpu),
        ] {
            assert_eq!(BackendKind::from_wgpu(backend), kind);
            assert_eq!(kind.into_wgpu(), wgpu::Backends::from(backend));
        }
    }

    #[test]
    fn backend_lists_build_a_mask() {
        let empty: &[BackendKind] = &[];
        assert_eq!(empty.into_wgpu(), wgpu::Backends::all());

        let list: &[BackendKind] = &[BackendKind::Vulkan, BackendKind::Dx12, BackendKind::Dx11];
        assert_eq!(list.into_wgpu(), wgpu::Backends::VULKAN | wgpu::Backends::DX12);

        let unavailable: &[BackendKind] = &[BackendKind::Dx11];
        assert!(unavailable.into_wgpu().is_empty());
    }

    #[test]
    fn device_types_map_one_to_one() {
        assert_eq!(
            AdapterDeviceType::from_wgpu(wgpu::DeviceType::DiscreteGpu),
            AdapterDeviceType::DiscreteGpu
        );
        assert_eq!(
            AdapterDeviceType::from_wgpu(wgpu::DeviceType::Other),
            AdapterDeviceType::Other
        );
    }
}
