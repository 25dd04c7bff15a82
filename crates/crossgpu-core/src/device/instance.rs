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

//! Instance and device handles.

use super::{
    adapter::{Adapter, AdapterInfo, AdapterSelector, BackendKind},
    error::DeviceError,
    procs::{ProcRegistration, ProcTable},
    settings::{EnumerationPolicy, InstanceSettings},
    traits::{AdapterDiscovery, NativeAdapter},
};
use std::fmt;
use std::sync::Arc;

/// The device handle type produced by an instance over discovery `D`.
pub type DeviceOf<D> = Device<<<D as AdapterDiscovery>::Adapter as NativeAdapter>::Device>;

/// The adapter type stored in the catalog of an instance over discovery `D`.
pub type AdapterOf<D> = Adapter<<D as AdapterDiscovery>::Adapter>;

/// A session-scoped handle that owns the discovered adapter catalog.
///
/// Adapters are only ever lent out by reference, so they cannot outlive the
/// instance. Destroying the instance (see [`Instance::destroy`]) invalidates
/// them and releases the process-wide proc table registration. Devices are
/// reference-counted and stay valid after the instance is gone.
///
/// All methods that touch the catalog take `&mut self`: sharing an instance
/// across threads requires the caller to serialize access.
pub struct Instance<D: AdapterDiscovery> {
    discovery: D,
    settings: InstanceSettings,
    catalog: Vec<AdapterOf<D>>,
    enumerated: bool,
    _procs: ProcRegistration,
}

impl<D: AdapterDiscovery> Instance<D> {
    /// Creates an instance with default [`InstanceSettings`].
    pub fn new(discovery: D) -> Result<Self, DeviceError> {
        Self::with_settings(discovery, InstanceSettings::default())
    }

    /// Creates an instance.
    ///
    /// Registers against the global [`ProcTable`] (installing the native procs
    /// if no other instance is alive) and initializes the discovery service.
    ///
    /// # Returns
    ///
    /// The instance, or [`DeviceError::BackendInitFailure`] if the native layer
    /// could not be brought up.
    pub fn with_settings(mut discovery: D, settings: InstanceSettings) -> Result<Self, DeviceError> {
        let procs = ProcTable::global().acquire(D::install_procs)?;
        discovery.initialize()?;

        log::info!(
            "Instance created (backends: {}, enumeration: {:?}).",
            if settings.backends.is_empty() {
                "all".to_string()
            } else {
                format!("{:?}", settings.backends)
            },
            settings.enumeration
        );

        Ok(Self {
            discovery,
            settings,
            catalog: Vec::new(),
            enumerated: false,
            _procs: procs,
        })
    }

    /// The settings this instance was created with.
    pub fn settings(&self) -> &InstanceSettings {
        &self.settings
    }

    /// The catalog produced by the most recent enumeration, without querying
    /// the native layer again.
    pub fn adapters(&self) -> &[AdapterOf<D>] {
        &self.catalog
    }

    /// Performs discovery and returns the current candidate set in
    /// enumeration order.
    pub fn enumerate_adapters(&mut self) -> impl Iterator<Item = &AdapterOf<D>> + '_ {
        self.refresh();
        self.catalog.iter()
    }

    /// Performs discovery and invokes `callback` once per candidate, in
    /// enumeration order.
    pub fn for_each_adapter<F>(&mut self, mut callback: F)
    where
        F: FnMut(&AdapterOf<D>),
    {
        self.refresh();
        for adapter in &self.catalog {
            callback(adapter);
        }
    }

    /// Creates a logical device on the first adapter whose `(backend, device_id)`
    /// pair matches exactly.
    ///
    /// Later matching candidates are ignored. There is no fallback to an
    /// unrelated adapter.
    ///
    /// # Returns
    ///
    /// The device, [`DeviceError::NoMatchingAdapter`] if nothing matched, or
    /// [`DeviceError::DeviceRequestFailed`] if the matched adapter refused.
    pub fn create_device(
        &mut self,
        backend: BackendKind,
        device_id: u32,
    ) -> Result<DeviceOf<D>, DeviceError> {
        if self.settings.enumeration == EnumerationPolicy::Rediscover || !self.enumerated {
            self.refresh();
        }

        let mut candidates = self
            .catalog
            .iter()
            .filter(|adapter| adapter.info().matches(backend, device_id));

        let selected = candidates
            .next()
            .ok_or(DeviceError::NoMatchingAdapter { backend, device_id })?;

        let ignored = candidates.count();
        if ignored > 0 {
            log::warn!(
                "{ignored} more adapter(s) report {backend}:{device_id}; using the first one (\"{}\").",
                selected.info().name
            );
        }

        let native = selected.native().create_device()?;

        log::info!(
            "Created device on adapter \"{}\" ({} / {}).",
            selected.info().name,
            selected.backend().display_name(),
            selected.device_id()
        );

        Ok(Device::new(native, selected.info().clone()))
    }

    /// Same as [`Instance::create_device`], taking an [`AdapterSelector`].
    pub fn create_device_for(&mut self, selector: &AdapterSelector) -> Result<DeviceOf<D>, DeviceError> {
        self.create_device(selector.backend, selector.device_id)
    }

    /// Picks one default adapter per backend in `preferred`, in that order.
    ///
    /// Each selector names the first adapter of its backend in enumeration
    /// order. Backends without any adapter are skipped.
    pub fn default_selectors(&mut self, preferred: &[BackendKind]) -> Vec<AdapterSelector> {
        self.refresh();
        preferred
            .iter()
            .filter_map(|&backend| {
                self.catalog
                    .iter()
                    .find(|adapter| adapter.backend() == backend)
                    .map(|adapter| adapter.info().selector())
            })
            .collect()
    }

    /// Destroys the instance, releasing every adapter derived from it.
    pub fn destroy(self) {
        log::info!(
            "Destroying instance ({} adapter(s) released).",
            self.catalog.len()
        );
    }

    fn refresh(&mut self) {
        let discovered = self.discovery.discover();
        let total = discovered.len();
        let settings = &self.settings;

        self.catalog = discovered
            .into_iter()
            .filter_map(|native| {
                let info = native.info();
                if settings.allows(info.backend) {
                    log::trace!("Candidate {}: \"{}\"", info.selector(), info.name);
                    Some(Adapter::new(info, native))
                } else {
                    log::trace!(
                        "Skipping \"{}\": backend {} not enabled.",
                        info.name,
                        info.backend
                    );
                    None
                }
            })
            .collect();
        self.enumerated = true;

        log::debug!(
            "Enumeration found {} adapter(s), {} kept.",
            total,
            self.catalog.len()
        );
    }
}

impl<D: AdapterDiscovery> fmt::Debug for Instance<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("settings", &self.settings)
            .field(
                "catalog",
                &self.catalog.iter().map(Adapter::info).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// A logical device created from exactly one adapter.
///
/// Ownership passes to the caller on creation. Clones share the same native
/// device, which is released when the last clone is dropped, independently
/// of the instance it came from.
pub struct Device<T> {
    native: Arc<T>,
    adapter: AdapterInfo,
}

impl<T> Device<T> {
    fn new(native: T, adapter: AdapterInfo) -> Self {
        Self {
            native: Arc::new(native),
            adapter,
        }
    }

    /// The native device.
    pub fn native(&self) -> &T {
        &self.native
    }

    /// The adapter this device was created from.
    pub fn adapter_info(&self) -> &AdapterInfo {
        &self.adapter
    }
}

impl<T> Clone for Device<T> {
    fn clone(&self) -> Self {
        Self {
            native: Arc::clone(&self.native),
            adapter: self.adapter.clone(),
        }
    }
}

impl<T> fmt::Debug for Device<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("adapter", &self.adapter)
            .finish_non_exhaustive()
    }
}
