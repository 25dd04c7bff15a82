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

//! Seams between the device subsystem and a native graphics layer.

use super::{adapter::AdapterInfo, error::DeviceError};

/// A native service that discovers adapter candidates on demand.
///
/// This trait hides the native layer's adapter query behind one stable shape:
/// whatever the library calls its descriptive structure ("properties",
/// "info", ...), the implementation converts it to [`AdapterInfo`]. The
/// orchestration logic in [`Instance`](super::Instance) never branches on the
/// native library revision.
///
/// A concrete implementation lives in `crossgpu-infra` and wraps `wgpu`.
pub trait AdapterDiscovery {
    /// The native candidate handle produced by discovery.
    type Adapter: NativeAdapter;

    /// Installs process-wide native dispatch tables.
    ///
    /// Called through the process-scoped [`ProcTable`](super::ProcTable) at most
    /// once while any instance is alive, before the first discovery.
    fn install_procs() -> Result<(), DeviceError>
    where
        Self: Sized,
    {
        Ok(())
    }

    /// Prepares this discovery service for a new instance.
    ///
    /// # Returns
    ///
    /// An error of kind [`DeviceError::BackendInitFailure`] if the native layer
    /// cannot be brought up.
    fn initialize(&mut self) -> Result<(), DeviceError> {
        Ok(())
    }

    /// Performs (or replays) backend discovery.
    ///
    /// The returned set is finite but not guaranteed stable between two calls:
    /// hot-pluggable backends may appear or disappear.
    fn discover(&self) -> Vec<Self::Adapter>;
}

/// A single candidate returned by an [`AdapterDiscovery`].
pub trait NativeAdapter {
    /// The native logical device type this adapter opens.
    type Device;

    /// Returns the backend-agnostic description of this candidate.
    fn info(&self) -> AdapterInfo;

    /// Opens a logical device on this adapter.
    ///
    /// # Returns
    ///
    /// The native device, or [`DeviceError::DeviceRequestFailed`] if the
    /// native layer refuses.
    fn create_device(&self) -> Result<Self::Device, DeviceError>;
}
