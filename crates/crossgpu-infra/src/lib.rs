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

//! # CrossGPU Infra
//!
//! Concrete implementations of the native collaborators: WGPU for adapter
//! discovery and device creation, Naga for WGSL parsing and HLSL/MSL
//! generation.

#![warn(missing_docs)]

pub mod graphics;
pub mod shader;

pub use graphics::wgpu::{WgpuAdapter, WgpuDevice, WgpuDiscovery};
pub use shader::naga::{naga_pipeline, NagaBackend, NagaFrontend, NagaPipeline};
