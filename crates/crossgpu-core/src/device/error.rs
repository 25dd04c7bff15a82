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

//! Error type for the device acquisition subsystem.

use super::adapter::BackendKind;
use std::fmt;

/// An error raised while creating an instance or acquiring a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The native layer could not be initialized. Fatal to this instance
    /// attempt; a fresh attempt may succeed.
    BackendInitFailure(String),
    /// No enumerated adapter matched the requested `(backend, device_id)` pair.
    NoMatchingAdapter {
        /// The requested backend.
        backend: BackendKind,
        /// The requested device identifier.
        device_id: u32,
    },
    /// An adapter matched, but the native layer refused to open a device on it.
    DeviceRequestFailed {
        /// The name of the matched adapter.
        adapter: String,
        /// The reason reported by the native layer.
        reason: String,
    },
    /// A textual adapter selector could not be parsed.
    InvalidSelector(String),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::BackendInitFailure(msg) => {
                write!(f, "Failed to initialize native graphics layer: {msg}")
            }
            DeviceError::NoMatchingAdapter { backend, device_id } => {
                write!(f, "No adapter found matching id: {backend}:{device_id}")
            }
            DeviceError::DeviceRequestFailed { adapter, reason } => {
                write!(f, "Failed to create device on adapter '{adapter}': {reason}")
            }
            DeviceError::InvalidSelector(msg) => {
                write!(f, "Invalid adapter selector: {msg}")
            }
        }
    }
}

impl std::error::Error for DeviceError {}
