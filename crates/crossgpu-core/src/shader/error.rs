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

//! Defines the hierarchy of error types for the shader pipeline.

use super::api::{ResourceBinding, ResourceCount, ResourceKind, SlotClass, TargetKind, TargetLanguage};
use std::fmt;

/// The stages of the cross-compilation pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PipelineStage {
    /// Parsing and semantic validation.
    Parse,
    /// Choosing the entry point to compile.
    EntryPointSelection,
    /// Lowering the validated program to its intermediate form.
    Lowering,
    /// Renaming identifiers that collide with reserved words.
    Rename,
    /// Flattening resource coordinates into native slots.
    FlattenBindings,
    /// Emitting destination-language text.
    Generation,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Parse => "parse",
            PipelineStage::EntryPointSelection => "entry point selection",
            PipelineStage::Lowering => "lowering",
            PipelineStage::Rename => "rename",
            PipelineStage::FlattenBindings => "binding flattening",
            PipelineStage::Generation => "generation",
        };
        f.write_str(name)
    }
}

/// The source failed to parse or to validate. No partial program exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The origin label of the source.
    pub label: String,
    /// Diagnostic text from the parser or validator.
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shader '{}' is invalid: {}", self.label, self.message)
    }
}

impl std::error::Error for ParseError {}

/// A target-directed rewrite could not be completed consistently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The validated program could not be lowered.
    Lowering(String),
    /// The collaborator could not apply the computed renames.
    Rename(String),
    /// The destination cannot express this resource shape.
    UnsupportedResourceShape {
        /// The portable coordinate.
        binding: ResourceBinding,
        /// The resource kind.
        kind: ResourceKind,
        /// The offending count.
        count: ResourceCount,
        /// The destination family.
        target: TargetKind,
    },
    /// Two declarations share a coordinate but disagree on kind or count.
    ConflictingBinding {
        /// The shared coordinate.
        binding: ResourceBinding,
    },
    /// A native slot class ran out of indices.
    SlotsExhausted {
        /// The exhausted class.
        class: SlotClass,
        /// How many slots the class offers.
        limit: u32,
        /// The destination family.
        target: TargetKind,
    },
}

impl TransformError {
    /// The pipeline stage this error belongs to.
    pub fn stage(&self) -> PipelineStage {
        match self {
            TransformError::Lowering(_) => PipelineStage::Lowering,
            TransformError::Rename(_) => PipelineStage::Rename,
            TransformError::UnsupportedResourceShape { .. }
            | TransformError::ConflictingBinding { .. }
            | TransformError::SlotsExhausted { .. } => PipelineStage::FlattenBindings,
        }
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::Lowering(msg) => write!(f, "Lowering failed: {msg}"),
            TransformError::Rename(msg) => write!(f, "Identifier renaming failed: {msg}"),
            TransformError::UnsupportedResourceShape {
                binding,
                kind,
                count,
                target,
            } => write!(
                f,
                "Resource {binding} ({kind}, {count}) cannot be expressed in {target}"
            ),
            TransformError::ConflictingBinding { binding } => {
                write!(f, "Conflicting resource declarations at {binding}")
            }
            TransformError::SlotsExhausted {
                class,
                limit,
                target,
            } => write!(f, "Out of {class} slots in {target} (limit {limit})"),
        }
    }
}

impl std::error::Error for TransformError {}

/// The code generator could not emit the destination language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationError {
    /// The requested destination.
    pub target: TargetLanguage,
    /// Detailed error messages from the generator.
    pub message: String,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code generation for {} failed: {}", self.target, self.message)
    }
}

impl std::error::Error for GenerationError {}

/// A terminal pipeline failure: `Failed(stage, reason)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The source is not a valid program.
    Parse(ParseError),
    /// The program declares no entry point.
    NoEntryPoint,
    /// Lowering, renaming or binding flattening failed.
    Transform(TransformError),
    /// Code generation failed.
    Generation(GenerationError),
}

impl CompileError {
    /// The stage the pipeline stopped at.
    pub fn stage(&self) -> PipelineStage {
        match self {
            CompileError::Parse(_) => PipelineStage::Parse,
            CompileError::NoEntryPoint => PipelineStage::EntryPointSelection,
            CompileError::Transform(err) => err.stage(),
            CompileError::Generation(_) => PipelineStage::Generation,
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Parse(err) => write!(f, "Compilation failed at parse: {err}"),
            CompileError::NoEntryPoint => {
                write!(f, "Compilation failed: the program declares no entry point")
            }
            CompileError::Transform(err) => {
                write!(f, "Compilation failed at {}: {err}", err.stage())
            }
            CompileError::Generation(err) => {
                write!(f, "Compilation failed at generation: {err}")
            }
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Parse(err) => Some(err),
            CompileError::NoEntryPoint => None,
            CompileError::Transform(err) => Some(err),
            CompileError::Generation(err) => Some(err),
        }
    }
}

impl From<ParseError> for CompileError {
    fn from(err: ParseError) -> Self {
        CompileError::Parse(err)
    }
}

impl From<TransformError> for CompileError {
    fn from(err: TransformError) -> Self {
        CompileError::Transform(err)
    }
}

impl From<GenerationError> for CompileError {
    fn from(err: GenerationError) -> Self {
        CompileError::Generation(err)
    }
}
