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

//! Process-scoped registration of native dispatch tables.
//!
//! Some native layers route every API call through a global proc table that
//! must be installed once before the first instance exists. The rules:
//!
//! - install once, before the first [`Instance`](super::Instance) is created;
//! - repeated registration while installed is a no-op;
//! - teardown happens only after the last instance is destroyed.

use super::error::DeviceError;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
struct ProcTableState {
    installed: bool,
    live_instances: usize,
    installs: usize,
}

/// Tracks whether native procs are installed and how many instances use them.
#[derive(Debug)]
pub struct ProcTable {
    state: Mutex<ProcTableState>,
}

static GLOBAL: ProcTable = ProcTable::new();

impl ProcTable {
    /// Creates an empty, uninstalled table.
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(ProcTableState {
                installed: false,
                live_instances: 0,
                installs: 0,
            }),
        }
    }

    /// The process-wide table used by every [`Instance`](super::Instance).
    pub fn global() -> &'static ProcTable {
        &GLOBAL
    }

    /// Registers one more live instance, running `install` if the procs are
    /// not currently installed.
    ///
    /// If `install` fails nothing is registered and the error is returned.
    pub fn acquire<F>(&'static self, install: F) -> Result<ProcRegistration, DeviceError>
    where
        F: FnOnce() -> Result<(), DeviceError>,
    {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.installed {
            install()?;
            state.installed = true;
            state.installs += 1;
            log::debug!("Native proc table installed (install #{}).", state.installs);
        }
        state.live_instances += 1;
        Ok(ProcRegistration { table: self })
    }

    /// Whether the procs are currently installed.
    pub fn is_installed(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .installed
    }

    /// The number of instances currently holding a registration.
    pub fn live_instances(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .live_instances
    }

    /// How many times the procs have been installed over the table's lifetime.
    pub fn install_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .installs
    }

    fn release(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.live_instances = state.live_instances.saturating_sub(1);
        if state.live_instances == 0 && state.installed {
            state.installed = false;
            log::debug!("Last instance released; native proc table torn down.");
        }
    }
}

impl Default for ProcTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A live registration against a [`ProcTable`]. Dropping it releases the slot.
#[derive(Debug)]
pub struct ProcRegistration {
    table: &'static ProcTable,
}

impl Drop for ProcRegistration {
    fn drop(&mut self) {
        self.table.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaked_table() -> &'static ProcTable {
        Box::leak(Box::new(ProcTable::new()))
    }

    #[test]
    fn installs_once_while_registrations_are_alive() {
        let table = leaked_table();
        let mut calls = 0;

        let first = table.acquire(|| {
            calls += 1;
            Ok(())
        });
        let first = first.unwrap();
        let second = table
            .acquire(|| {
                calls += 1;
                Ok(())
            })
            .unwrap();

        assert_eq!(calls, 1);
        assert!(table.is_installed());
        assert_eq!(table.live_instances(), 2);

        drop(first);
        assert!(table.is_installed());
        drop(second);
        assert!(!table.is_installed());
        assert_eq!(table.live_instances(), 0);
    }

    #[test]
    fn reinstalls_after_full_teardown() {
        let table = leaked_table();
        drop(table.acquire(|| Ok(())).unwrap());
        drop(table.acquire(|| Ok(())).unwrap());
        assert_eq!(table.install_count(), 2);
    }

    #[test]
    fn failed_install_registers_nothing() {
        let table = leaked_table();
        let result = table.acquire(|| Err(DeviceError::BackendInitFailure("no driver".into())));
        assert!(matches!(result, Err(DeviceError::BackendInitFailure(_))));
        assert!(!table.is_installed());
        assert_eq!(table.live_instances(), 0);
    }
}
