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

//! Naga implementation of the shader pipeline collaborators: a WGSL
//! frontend and an HLSL/MSL backend.

mod backend;
mod conversions;
mod frontend;
mod lowered;

pub use self::backend::NagaBackend;
pub use self::conversions::{FromNaga, IntoNaga};
pub use self::frontend::{NagaFrontend, NagaProgram};
pub use self::lowered::NagaModule;

use crossgpu_core::shader::{PipelineSettings, ShaderPipeline};

/// The pipeline wired to Naga on both ends.
pub type NagaPipeline = ShaderPipeline<NagaFrontend, NagaBackend>;

/// Creates a [`NagaPipeline`] with the given settings.
pub fn naga_pipeline(settings: PipelineSettings) -> NagaPipeline {
    ShaderPipeline::with_settings(NagaFrontend::new(), NagaBackend::new(), settings)
}

/// Flattens an error and its sources into one line.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
