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

//! Identifier renaming.

use super::reserved;
use crate::shader::api::{RenameMap, TargetKind};
use std::collections::HashSet;

/// Computes deterministic, injective renames for identifiers that collide
/// with reserved words of a destination language.
///
/// A colliding identifier `name` becomes `name_`, or `name_<n>` with the
/// smallest `n >= 1` that is not reserved, not an identifier of the program
/// and not already handed out.
#[derive(Debug, Clone, Copy)]
pub struct RenamePolicy {
    target: TargetKind,
}

impl RenamePolicy {
    /// The policy for `target`.
    pub fn for_target(target: TargetKind) -> Self {
        Self { target }
    }

    /// Whether `ident` must be renamed.
    pub fn is_reserved(&self, ident: &str) -> bool {
        reserved::is_reserved(self.target, ident)
    }

    /// Plans the renames for `identifiers`, visited in the given order.
    pub fn plan(&self, identifiers: &[String]) -> RenameMap {
        let mut taken: HashSet<String> = identifiers.iter().cloned().collect();
        let mut renames = RenameMap::new();

        for ident in identifiers {
            if !self.is_reserved(ident) || renames.get(ident).is_some() {
                continue;
            }

            let replacement = self.synthesize(ident, &taken);
            log::debug!("Renaming '{ident}' to '{replacement}' for {}.", self.target);
            taken.insert(replacement.clone());
            let inserted = renames.insert(ident.clone(), replacement);
            debug_assert!(inserted, "rename of '{ident}' collides with an earlier rename");
        }

        renames
    }

    fn synthesize(&self, ident: &str, taken: &HashSet<String>) -> String {
        let free = |candidate: &String| !taken.contains(candidate) && !self.is_reserved(candidate);

        let candidate = format!("{ident}_");
        if free(&candidate) {
            return candidate;
        }

        let mut n = 1u64;
        loop {
            let candidate = format!("{ident}_{n}");
            if free(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}
