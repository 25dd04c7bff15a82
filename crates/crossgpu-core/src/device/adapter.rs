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

//! Adapter descriptions and selection criteria.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::DeviceError;

/// A backend-agnostic representation of a native graphics API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum BackendKind {
    /// Vulkan API.
    Vulkan,
    /// Apple's Metal API.
    Metal,
    /// Microsoft's DirectX 12 API.
    Dx12,
    /// Microsoft's DirectX 11 API.
    Dx11,
    /// OpenGL / OpenGL ES API.
    OpenGl,
    /// WebGPU API (browser builds).
    WebGpu,
    /// A backend that accepts work but executes nothing.
    Null,
    /// An unknown or unsupported backend.
    #[default]
    Unknown,
}

impl BackendKind {
    /// Every known backend, in a stable order.
    pub const ALL: [BackendKind; 8] = [
        BackendKind::Vulkan,
        BackendKind::Metal,
        BackendKind::Dx12,
        BackendKind::Dx11,
        BackendKind::OpenGl,
        BackendKind::WebGpu,
        BackendKind::Null,
        BackendKind::Unknown,
    ];

    /// The short identifier used in selector strings (e.g. `vk` in `vk:7430`).
    pub fn short_name(self) -> &'static str {
        match self {
            BackendKind::Vulkan => "vk",
            BackendKind::Metal => "mtl",
            BackendKind::Dx12 => "dx12",
            BackendKind::Dx11 => "dx11",
            BackendKind::OpenGl => "gl",
            BackendKind::WebGpu => "webgpu",
            BackendKind::Null => "null",
            BackendKind::Unknown => "unknown",
        }
    }

    /// Returns a human-readable name for the backend.
    pub fn display_name(self) -> &'static str {
        match self {
            BackendKind::Vulkan => "Vulkan",
            BackendKind::Metal => "Metal",
            BackendKind::Dx12 => "DirectX 12",
            BackendKind::Dx11 => "DirectX 11",
            BackendKind::OpenGl => "OpenGL",
            BackendKind::WebGpu => "WebGPU",
            BackendKind::Null => "Null",
            BackendKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for BackendKind {
    type Err = DeviceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        BackendKind::ALL
            .into_iter()
            .find(|kind| kind.short_name() == value)
            .ok_or_else(|| DeviceError::InvalidSelector(format!("unknown backend '{value}'")))
    }
}

/// The physical type of a graphics device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AdapterDeviceType {
    /// A GPU integrated into the CPU.
    IntegratedGpu,
    /// A discrete, dedicated GPU.
    DiscreteGpu,
    /// A virtualized GPU.
    VirtualGpu,
    /// A software renderer running on the CPU.
    Cpu,
    /// Anything the native layer could not classify.
    #[default]
    Other,
}

/// Standardized, backend-agnostic description of a discovered adapter.
///
/// Only `backend` and `device_id` take part in selection; the remaining
/// fields are descriptive and meant for display or filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterInfo {
    /// The graphics API this adapter belongs to.
    pub backend: BackendKind,
    /// Native device identifier. Not unique across backends.
    pub device_id: u32,
    /// Adapter name (e.g. "NVIDIA GeForce RTX 4090").
    pub name: String,
    /// PCI vendor identifier, or 0 when the backend does not report one.
    pub vendor_id: u32,
    /// The physical type of the adapter.
    pub device_type: AdapterDeviceType,
    /// Driver name.
    pub driver: String,
    /// Free-form driver version information.
    pub driver_info: String,
}

impl AdapterInfo {
    /// The selector that picks this adapter back out of a catalog.
    pub fn selector(&self) -> AdapterSelector {
        AdapterSelector::new(self.backend, self.device_id)
    }

    /// Whether this adapter matches `(backend, device_id)` exactly.
    pub fn matches(&self, backend: BackendKind, device_id: u32) -> bool {
        self.backend == backend && self.device_id == device_id
    }
}

/// An immutable snapshot of one discovered candidate.
///
/// Pairs the backend-agnostic [`AdapterInfo`] with the native handle the
/// discovery collaborator needs to open a device later on.
#[derive(Debug)]
pub struct Adapter<A> {
    info: AdapterInfo,
    native: A,
}

impl<A> Adapter<A> {
    pub(crate) fn new(info: AdapterInfo, native: A) -> Self {
        Self { info, native }
    }

    /// Descriptive information about this adapter.
    pub fn info(&self) -> &AdapterInfo {
        &self.info
    }

    /// The backend this adapter belongs to.
    pub fn backend(&self) -> BackendKind {
        self.info.backend
    }

    /// The native device identifier.
    pub fn device_id(&self) -> u32 {
        self.info.device_id
    }

    /// The native handle behind this snapshot.
    pub fn native(&self) -> &A {
        &self.native
    }
}

/// Identifies an adapter by its `(backend, device_id)` pair.
///
/// The textual form is `<backend>:<device_id>`, e.g. `vk:7430` or `dx12:0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdapterSelector {
    /// The backend the adapter must belong to.
    pub backend: BackendKind,
    /// The device identifier the adapter must report.
    pub device_id: u32,
}

impl AdapterSelector {
    /// Creates a selector for `(backend, device_id)`.
    pub fn new(backend: BackendKind, device_id: u32) -> Self {
        Self { backend, device_id }
    }
}

impl fmt::Display for AdapterSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format!("{}:{}", self.backend, self.device_id);
        f.pad(&text)
    }
}

impl FromStr for AdapterSelector {
    type Err = DeviceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut tokens = value.split(':');

        let backend = tokens
            .next()
            .filter(|it| !it.is_empty())
            .ok_or_else(|| DeviceError::InvalidSelector("missing backend segment".to_string()))?;
        let device = tokens
            .next()
            .ok_or_else(|| DeviceError::InvalidSelector("missing device id segment".to_string()))?;

        if tokens.next().is_some() {
            return Err(DeviceError::InvalidSelector(format!(
                "unexpected tokens in '{value}'"
            )));
        }

        let device_id = device
            .parse()
            .map_err(|_| DeviceError::InvalidSelector(format!("invalid device id '{device}'")))?;

        Ok(AdapterSelector::new(backend.parse()?, device_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_round_trips_through_text() {
        let selector: AdapterSelector = "vk:7430".parse().unwrap();
        assert_eq!(selector, AdapterSelector::new(BackendKind::Vulkan, 7430));
        assert_eq!(selector.to_string(), "vk:7430");

        let dx: AdapterSelector = "dx12:0".parse().unwrap();
        assert_eq!(dx.backend, BackendKind::Dx12);
        assert_eq!(dx.device_id, 0);
    }

    #[test]
    fn selector_display_honors_width() {
        let selector = AdapterSelector::new(BackendKind::Metal, 12);
        assert_eq!(format!("{selector:<10}|"), "mtl:12    |");
    }

    #[test]
    fn malformed_selectors_are_rejected() {
        for text in ["", "vk", "vk:", "vk:abc", "vk:1:2", "foo:1", ":1", "vk:-1"] {
            let result = text.parse::<AdapterSelector>();
            assert!(
                matches!(result, Err(DeviceError::InvalidSelector(_))),
                "'{text}' should be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn backend_short_names_are_unique_and_parse_back() {
        for kind in BackendKind::ALL {
            assert_eq!(kind.short_name().parse::<BackendKind>().unwrap(), kind);
        }
    }

    #[test]
    fn adapter_info_matches_exact_pair_only() {
        let info = AdapterInfo {
            backend: BackendKind::Vulkan,
            device_id: 42,
            name: "Test GPU".to_string(),
            ..Default::default()
        };
        assert!(info.matches(BackendKind::Vulkan, 42));
        assert!(!info.matches(BackendKind::Dx12, 42));
        assert!(!info.matches(BackendKind::Vulkan, 43));
        assert_eq!(info.selector().to_string(), "vk:42");
    }
}
