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

//! Device acquisition: discovering adapters and opening logical devices.
//!
//! This module defines the backend-agnostic half of the subsystem. The native
//! discovery service is reached through the [`AdapterDiscovery`] and
//! [`NativeAdapter`] traits; a concrete implementation wrapping `wgpu` lives
//! in the `crossgpu-infra` crate.
//!
//! Control flow: host -> [`Instance`] -> [`AdapterDiscovery::discover`] ->
//! first matching [`Adapter`] -> [`Device`].

pub mod adapter;
pub mod error;
pub mod instance;
pub mod procs;
pub mod settings;
pub mod traits;

pub use self::adapter::{Adapter, AdapterDeviceType, AdapterInfo, AdapterSelector, BackendKind};
pub use self::error::DeviceError;
pub use self::instance::{AdapterOf, Device, DeviceOf, Instance};
pub use self::procs::{ProcRegistration, ProcTable};
pub use self::settings::{EnumerationPolicy, InstanceSettings};
pub use self::traits::{AdapterDiscovery, NativeAdapter};
