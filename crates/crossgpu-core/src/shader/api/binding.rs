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

//! The binding table: portable resource coordinates mapped to native slots.

use super::program::{ResourceBinding, ResourceCount, ResourceKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// HLSL register classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RegisterClass {
    /// `b` registers: constant buffers.
    ConstantBuffer,
    /// `t` registers: shader resource views.
    ShaderResource,
    /// `u` registers: unordered access views.
    UnorderedAccess,
    /// `s` registers: samplers.
    Sampler,
}

impl RegisterClass {
    /// The register letter (`b`, `t`, `u` or `s`).
    pub fn prefix(self) -> char {
        match self {
            RegisterClass::ConstantBuffer => 'b',
            RegisterClass::ShaderResource => 't',
            RegisterClass::UnorderedAccess => 'u',
            RegisterClass::Sampler => 's',
        }
    }
}

/// Metal argument table classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DescriptorClass {
    /// `[[buffer(n)]]`.
    Buffer,
    /// `[[texture(n)]]`.
    Texture,
    /// `[[sampler(n)]]`.
    Sampler,
}

impl DescriptorClass {
    /// The attribute name used in MSL.
    pub fn attribute(self) -> &'static str {
        match self {
            DescriptorClass::Buffer => "buffer",
            DescriptorClass::Texture => "texture",
            DescriptorClass::Sampler => "sampler",
        }
    }
}

/// Either kind of native slot class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlotClass {
    /// An HLSL register class.
    Register(RegisterClass),
    /// A Metal argument table.
    Descriptor(DescriptorClass),
}

impl fmt::Display for SlotClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotClass::Register(class) => write!(f, "{}-register", class.prefix()),
            SlotClass::Descriptor(class) => write!(f, "{} index", class.attribute()),
        }
    }
}

/// A flat slot in the destination language's resource space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NativeSlot {
    /// A register-indexed slot, e.g. `register(t3, space0)`.
    Register {
        /// Register class.
        class: RegisterClass,
        /// First register index.
        index: u32,
        /// Register space.
        space: u32,
        /// Number of consecutive registers occupied.
        count: u32,
    },
    /// An HLSL sampler picked from a sampler heap.
    ///
    /// The shader reads entry `index` of the index buffer at
    /// `register(t<table_register>, space<table_space>)` and uses the value
    /// to select a sampler from the heap at
    /// `register(s<heap_register>, space<heap_space>)`. The application fills
    /// the index buffer.
    SamplerHeap {
        /// Register of the heap.
        heap_register: u32,
        /// Register space of the heap.
        heap_space: u32,
        /// Register of the group's index buffer.
        table_register: u32,
        /// Register space of the group's index buffer.
        table_space: u32,
        /// First entry of the index buffer.
        index: u32,
        /// Number of consecutive entries occupied.
        count: u32,
    },
    /// A descriptor-indexed slot, e.g. `[[texture(3)]]`.
    Descriptor {
        /// Argument table.
        class: DescriptorClass,
        /// First index.
        index: u32,
        /// Number of consecutive indices occupied.
        count: u32,
    },
}

impl NativeSlot {
    /// The slot class.
    pub fn class(&self) -> SlotClass {
        match *self {
            NativeSlot::Register { class, .. } => SlotClass::Register(class),
            NativeSlot::SamplerHeap { .. } => SlotClass::Register(RegisterClass::Sampler),
            NativeSlot::Descriptor { class, .. } => SlotClass::Descriptor(class),
        }
    }

    /// The first native index.
    pub fn index(&self) -> u32 {
        match *self {
            NativeSlot::Register { index, .. }
            | NativeSlot::SamplerHeap { index, .. }
            | NativeSlot::Descriptor { index, .. } => index,
        }
    }

    /// Number of consecutive native indices occupied.
    pub fn count(&self) -> u32 {
        match *self {
            NativeSlot::Register { count, .. }
            | NativeSlot::SamplerHeap { count, .. }
            | NativeSlot::Descriptor { count, .. } => count,
        }
    }
}

impl fmt::Display for NativeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            NativeSlot::Register {
                class,
                index,
                space,
                ..
            } => write!(f, "register({}{index}, space{space})", class.prefix()),
            NativeSlot::SamplerHeap {
                heap_register,
                heap_space,
                table_register,
                table_space,
                index,
                ..
            } => write!(
                f,
                "register(t{table_register}, space{table_space})[{index}] -> register(s{heap_register}, space{heap_space})"
            ),
            NativeSlot::Descriptor { class, index, .. } => {
                write!(f, "[[{}({index})]]", class.attribute())
            }
        }
    }
}

/// One row of a [`BindingTable`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BindingEntry {
    /// The portable coordinate.
    pub binding: ResourceBinding,
    /// The resource kind at that coordinate.
    pub kind: ResourceKind,
    /// Single resource or array.
    pub count: ResourceCount,
    /// The assigned native slot.
    pub slot: NativeSlot,
}

/// Mapping from portable `(group, binding)` coordinates to native slots.
///
/// Produced by the binding-flattening transform as a side artifact of code
/// generation. Entries are kept sorted by coordinate so two tables built from
/// the same program compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingTable {
    entries: Vec<BindingEntry>,
}

impl BindingTable {
    /// Builds a table from entries, sorting them by coordinate.
    pub fn from_entries(mut entries: Vec<BindingEntry>) -> Self {
        entries.sort_by_key(|entry| entry.binding);
        Self { entries }
    }

    /// Looks up the entry for a coordinate.
    pub fn get(&self, binding: ResourceBinding) -> Option<&BindingEntry> {
        self.entries
            .binary_search_by_key(&binding, |entry| entry.binding)
            .ok()
            .map(|index| &self.entries[index])
    }

    /// The native slot for a coordinate.
    pub fn slot(&self, binding: ResourceBinding) -> Option<NativeSlot> {
        self.get(binding).map(|entry| entry.slot)
    }

    /// All entries, ordered by coordinate.
    pub fn entries(&self) -> &[BindingEntry] {
        &self.entries
    }

    /// Number of bound coordinates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table binds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for BindingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{} {} -> {}", entry.binding, entry.kind, entry.slot)?;
        }
        Ok(())
    }
}
