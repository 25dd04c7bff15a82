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

//! Shader cross-compilation.
//!
//! A source in the portable shading language is parsed and validated by a
//! [`ShaderFrontend`], lowered, rewritten for the destination (identifier
//! renaming, then resource binding flattening) and finally emitted by a
//! [`ShaderBackend`] as a [`CompiledArtifact`].

pub mod api;
pub mod error;
pub mod pipeline;
pub mod traits;
pub mod transform;

pub use self::api::*;
pub use self::error::{CompileError, GenerationError, ParseError, PipelineStage, TransformError};
pub use self::pipeline::{LoweredOf, PipelineSettings, ShaderPipeline};
pub use self::traits::{LoweredProgram, ShaderBackend, ShaderFrontend, ShaderProgram};
pub use self::transform::{BindingFlattener, RenamePolicy};
