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

//! Capability traits for the opaque shader collaborators.
//!
//! The real parser, validator and code generators are external engines. The
//! pipeline only needs a small capability set from them:
//!
//! - [`ShaderFrontend`]: "parse" (with validation);
//! - [`ShaderProgram`]: entry point reflection and lowering;
//! - [`LoweredProgram`]: identifier reflection, "rename", and the resource
//!   reflection that "flatten-bindings" works from;
//! - [`ShaderBackend`]: "generate-for-target".
//!
//! A concrete implementation wrapping `naga` lives in `crossgpu-infra`.

use super::api::{
    BindingTable, EntryPoint, GeneratedSource, RenameMap, ResourceDecl, ShaderSource,
    TargetLanguage,
};
use super::error::{GenerationError, ParseError, TransformError};

/// Turns source text into a validated program.
pub trait ShaderFrontend {
    /// The validated program type.
    type Program: ShaderProgram;

    /// Parses and validates `source`.
    ///
    /// Syntax errors and semantic/type errors are both reported as a single
    /// [`ParseError`]; no partial program is ever returned.
    fn parse(&self, source: &ShaderSource<'_>) -> Result<Self::Program, ParseError>;

    /// Whether `source` is a valid program.
    ///
    /// Must agree with [`ShaderFrontend::parse`]. Implementations may override
    /// it to skip building anything the later stages would need.
    fn validate(&self, source: &ShaderSource<'_>) -> bool {
        self.parse(source).is_ok()
    }
}

/// A validated program.
pub trait ShaderProgram {
    /// The intermediate form consumed by the transform and generation stages.
    type Lowered: LoweredProgram;

    /// The entry points the program exports, in declaration order.
    fn entry_points(&self) -> Vec<EntryPoint>;

    /// Produces a fresh intermediate form owned by the caller.
    fn lower(&self) -> Result<Self::Lowered, TransformError>;
}

/// The intermediate form of a program.
///
/// Rewrites consume the value and hand back a new one, so a lowered program
/// is never observed half-rewritten.
pub trait LoweredProgram: Sized {
    /// Every identifier the destination could see, in declaration order.
    /// Duplicates (e.g. locals of the same name in two functions) are allowed.
    fn identifiers(&self) -> Vec<String>;

    /// Applies `renames` to every occurrence of each renamed identifier.
    fn rename(self, renames: &RenameMap) -> Result<Self, TransformError>;

    /// The bound resources `entry_point` statically uses, directly or through
    /// the functions it calls, in declaration order.
    ///
    /// Resources only reached from other entry points are left out. An
    /// unknown entry point uses nothing.
    fn resources(&self, entry_point: &str) -> Vec<ResourceDecl>;
}

/// Emits destination-language text for one entry point.
pub trait ShaderBackend<P: LoweredProgram> {
    /// Generates `target` text for `entry_point`, placing resources at the
    /// slots recorded in `bindings`.
    ///
    /// Only `entry_point` is emitted, even if `program` exports others.
    fn generate(
        &self,
        program: &P,
        target: TargetLanguage,
        entry_point: &str,
        bindings: &BindingTable,
    ) -> Result<GeneratedSource, GenerationError>;
}
