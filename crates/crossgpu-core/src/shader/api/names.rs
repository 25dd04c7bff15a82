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

//! Identifier rename maps.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// An injective mapping from original identifiers to synthetic replacements.
///
/// Identifiers not present in the map keep their name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameMap {
    renames: BTreeMap<String, String>,
}

impl RenameMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `original -> renamed`.
    ///
    /// Returns `false` (and records nothing) if `original` is already mapped or
    /// `renamed` is already the target of another identifier.
    pub fn insert(&mut self, original: impl Into<String>, renamed: impl Into<String>) -> bool {
        let original = original.into();
        let renamed = renamed.into();
        if self.renames.contains_key(&original) || self.renames.values().any(|it| *it == renamed) {
            return false;
        }
        self.renames.insert(original, renamed);
        true
    }

    /// The replacement for `name`, if it was renamed.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.renames.get(name).map(String::as_str)
    }

    /// The name `name` ends up with: its replacement, or itself.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.get(name).unwrap_or(name)
    }

    /// Iterates over `(original, renamed)` pairs in original-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.renames
            .iter()
            .map(|(original, renamed)| (original.as_str(), renamed.as_str()))
    }

    /// Number of renamed identifiers.
    pub fn len(&self) -> usize {
        self.renames.len()
    }

    /// Whether nothing was renamed.
    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }

    /// Whether no two originals share a replacement.
    pub fn is_injective(&self) -> bool {
        let targets: BTreeSet<&String> = self.renames.values().collect();
        targets.len() == self.renames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_refuses_duplicate_targets() {
        let mut map = RenameMap::new();
        assert!(map.insert("float", "float_"));
        assert!(!map.insert("half", "float_"));
        assert!(!map.insert("float", "float_1"));
        assert_eq!(map.len(), 1);
        assert!(map.is_injective());
    }

    #[test]
    fn resolve_falls_back_to_original() {
        let mut map = RenameMap::new();
        map.insert("sampler", "sampler_");
        assert_eq!(map.resolve("sampler"), "sampler_");
        assert_eq!(map.resolve("albedo"), "albedo");
    }
}
