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

//! Settings for instances and adapter discovery.

use super::adapter::BackendKind;
use serde::{Deserialize, Serialize};

/// Whether device creation queries the native layer again or reuses the
/// catalog produced by the last enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnumerationPolicy {
    /// Every `create_device` call performs its own discovery.
    #[default]
    Rediscover,
    /// Reuse the latest catalog; discover only if nothing was enumerated yet.
    ReuseLatest,
}

/// Configuration of an [`Instance`](super::Instance).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceSettings {
    /// Backends kept in the catalog. Empty means every backend.
    pub backends: Vec<BackendKind>,
    /// How device creation obtains its candidate set.
    pub enumeration: EnumerationPolicy,
}

impl InstanceSettings {
    /// Whether adapters of `backend` are kept by these settings.
    pub fn allows(&self, backend: BackendKind) -> bool {
        self.backends.is_empty() || self.backends.contains(&backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_backend_list_allows_everything() {
        let settings = InstanceSettings::default();
        for kind in BackendKind::ALL {
            assert!(settings.allows(kind));
        }
    }

    #[test]
    fn backend_filter_is_exact() {
        let settings = InstanceSettings {
            backends: vec![BackendKind::Vulkan, BackendKind::Metal],
            ..Default::default()
        };
        assert!(settings.allows(BackendKind::Vulkan));
        assert!(settings.allows(BackendKind::Metal));
        assert!(!settings.allows(BackendKind::Dx12));
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: InstanceSettings =
            serde_json::from_str(r#"{ "backends": ["Dx12"] }"#).unwrap();
        assert_eq!(settings.backends, vec![BackendKind::Dx12]);
        assert_eq!(settings.enumeration, EnumerationPolicy::Rediscover);
    }
}
