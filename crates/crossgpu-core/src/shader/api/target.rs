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

//! Destination shading languages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The family of a destination language, without version information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TargetKind {
    /// A register-indexed language (HLSL).
    Hlsl,
    /// A descriptor-indexed language (Metal Shading Language).
    Msl,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Hlsl => f.write_str("hlsl"),
            TargetKind::Msl => f.write_str("msl"),
        }
    }
}

/// HLSL shader model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ShaderModel {
    /// Shader model 5.0 (FXC).
    V5_0,
    /// Shader model 5.1 (FXC).
    #[default]
    V5_1,
    /// Shader model 6.0 (DXC).
    V6_0,
}

impl fmt::Display for ShaderModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderModel::V5_0 => f.write_str("5.0"),
            ShaderModel::V5_1 => f.write_str("5.1"),
            ShaderModel::V6_0 => f.write_str("6.0"),
        }
    }
}

/// Metal Shading Language version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MslVersion {
    /// Major version.
    pub major: u8,
    /// Minor version.
    pub minor: u8,
}

impl Default for MslVersion {
    fn default() -> Self {
        Self { major: 2, minor: 1 }
    }
}

impl fmt::Display for MslVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A destination shading language, including its version.
///
/// The set is closed: adding a destination means adding a variant here and a
/// slot policy for it in the transform stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetLanguage {
    /// HLSL at the given shader model.
    Hlsl {
        /// Shader model to emit.
        shader_model: ShaderModel,
    },
    /// Metal Shading Language at the given version.
    Msl {
        /// Language version to emit.
        version: MslVersion,
    },
}

impl TargetLanguage {
    /// HLSL at the default shader model.
    pub fn hlsl() -> Self {
        TargetLanguage::Hlsl {
            shader_model: ShaderModel::default(),
        }
    }

    /// MSL at the default language version.
    pub fn msl() -> Self {
        TargetLanguage::Msl {
            version: MslVersion::default(),
        }
    }

    /// The language family.
    pub fn kind(&self) -> TargetKind {
        match self {
            TargetLanguage::Hlsl { .. } => TargetKind::Hlsl,
            TargetLanguage::Msl { .. } => TargetKind::Msl,
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetLanguage::Hlsl { shader_model } => write!(f, "hlsl (sm {shader_model})"),
            TargetLanguage::Msl { version } => write!(f, "msl {version}"),
        }
    }
}
