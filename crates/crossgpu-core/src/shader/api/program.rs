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

//! Entry points and resource declarations exported by a validated program.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The programmable stage an entry point runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShaderStage {
    /// The vertex shader stage.
    Vertex,
    /// The fragment (or pixel) shader stage.
    Fragment,
    /// The compute shader stage, and any other compute-class stage.
    Compute,
}

/// A named, stage-tagged function eligible as a compilation target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryPoint {
    /// The function name as declared in the source.
    pub name: String,
    /// The stage the function is declared for.
    pub stage: ShaderStage,
}

impl EntryPoint {
    /// Creates an entry point description.
    pub fn new(name: impl Into<String>, stage: ShaderStage) -> Self {
        Self {
            name: name.into(),
            stage,
        }
    }
}

/// A resource coordinate in the portable language: `@group(g) @binding(b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceBinding {
    /// Bind group index.
    pub group: u32,
    /// Binding index within the group.
    pub binding: u32,
}

impl ResourceBinding {
    /// Creates a `(group, binding)` coordinate.
    pub fn new(group: u32, binding: u32) -> Self {
        Self { group, binding }
    }
}

impl fmt::Display for ResourceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.group, self.binding)
    }
}

/// What a bound resource is, as far as slot assignment cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// A uniform (constant) buffer.
    UniformBuffer,
    /// A storage buffer.
    StorageBuffer {
        /// Whether the shader may write to it.
        writable: bool,
    },
    /// A sampled or depth texture.
    Texture,
    /// A storage texture.
    StorageTexture,
    /// A sampler.
    Sampler {
        /// Whether this is a comparison sampler.
        comparison: bool,
    },
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::UniformBuffer => f.write_str("uniform buffer"),
            ResourceKind::StorageBuffer { writable: true } => f.write_str("read-write storage buffer"),
            ResourceKind::StorageBuffer { writable: false } => f.write_str("read-only storage buffer"),
            ResourceKind::Texture => f.write_str("texture"),
            ResourceKind::StorageTexture => f.write_str("storage texture"),
            ResourceKind::Sampler { comparison: true } => f.write_str("comparison sampler"),
            ResourceKind::Sampler { comparison: false } => f.write_str("sampler"),
        }
    }
}

/// How many resources a single declaration binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceCount {
    /// A single resource.
    Single,
    /// A fixed-size array of resources.
    Array(u32),
    /// A runtime-sized array of resources.
    Unbounded,
}

impl ResourceCount {
    /// The number of consecutive native slots this count occupies, if bounded.
    pub fn slots(self) -> Option<u32> {
        match self {
            ResourceCount::Single => Some(1),
            ResourceCount::Array(n) => Some(n),
            ResourceCount::Unbounded => None,
        }
    }
}

impl fmt::Display for ResourceCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceCount::Single => f.write_str("single"),
            ResourceCount::Array(n) => write!(f, "array of {n}"),
            ResourceCount::Unbounded => f.write_str("unbounded array"),
        }
    }
}

/// A resource declared by a lowered program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDecl {
    /// The declared variable name, if any.
    pub name: Option<String>,
    /// The portable `(group, binding)` coordinate.
    pub binding: ResourceBinding,
    /// The resource kind.
    pub kind: ResourceKind,
    /// Single resource or array.
    pub count: ResourceCount,
}

impl ResourceDecl {
    /// Creates a single (non-array) resource declaration.
    pub fn single(name: impl Into<String>, binding: ResourceBinding, kind: ResourceKind) -> Self {
        Self {
            name: Some(name.into()),
            binding,
            kind,
            count: ResourceCount::Single,
        }
    }

    /// Replaces the declaration's count.
    pub fn with_count(mut self, count: ResourceCount) -> Self {
        self.count = count;
        self
    }
}
