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

//! Compiled artifacts returned by the pipeline.

use super::{binding::BindingTable, names::RenameMap, target::TargetLanguage};
use serde::{Deserialize, Serialize};

/// Target text emitted by a code generator for one entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    /// The destination-language source text.
    pub text: String,
    /// The symbol the entry point was emitted under.
    pub entry_point: String,
}

/// The result of a successful cross-compilation. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledArtifact {
    target: TargetLanguage,
    source: String,
    entry_point: String,
    target_entry_point: String,
    bindings: BindingTable,
    renames: RenameMap,
}

impl CompiledArtifact {
    pub(crate) fn new(
        target: TargetLanguage,
        generated: GeneratedSource,
        entry_point: String,
        bindings: BindingTable,
        renames: RenameMap,
    ) -> Self {
        Self {
            target,
            source: generated.text,
            entry_point,
            target_entry_point: generated.entry_point,
            bindings,
            renames,
        }
    }

    /// The destination language this artifact was compiled for.
    pub fn target(&self) -> TargetLanguage {
        self.target
    }

    /// The destination-language source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The entry point name as declared in the portable source.
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// The symbol the entry point carries in the emitted source.
    pub fn target_entry_point(&self) -> &str {
        &self.target_entry_point
    }

    /// The resource binding table.
    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    /// Identifiers renamed to avoid reserved words of the destination.
    pub fn renames(&self) -> &RenameMap {
        &self.renames
    }
}
