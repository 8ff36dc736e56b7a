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

//! Byte layout of the packed constant buffer.

use crate::registry::SchemaRegistry;
use knob_core::settings::{ConversionMode, SettingId, SettingKind};
use serde::{Deserialize, Serialize};

/// Size of one constant-buffer row in bytes.
pub const ROW_SIZE: u32 = 16;

/// How a setting is represented in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackedType {
    /// `u32`, `0` or `1`.
    Bool,
    /// `f32`, after the conversion mode.
    Float,
    /// `i32`.
    Int,
    /// `u32` ordinal.
    Enum,
    /// Three `f32` channels plus a zero word.
    Color,
    /// Three `f32` components plus a zero word.
    Direction,
}

impl PackedType {
    /// Maps a setting kind to its packed form. Buttons have none.
    pub fn for_kind(kind: SettingKind) -> Option<Self> {
        match kind {
            SettingKind::Bool => Some(PackedType::Bool),
            SettingKind::Float => Some(PackedType::Float),
            SettingKind::Int => Some(PackedType::Int),
            SettingKind::Enum => Some(PackedType::Enum),
            SettingKind::Color => Some(PackedType::Color),
            SettingKind::Direction => Some(PackedType::Direction),
            SettingKind::Button => None,
        }
    }

    /// Size in bytes.
    #[inline]
    pub fn size(self) -> u32 {
        match self {
            PackedType::Bool | PackedType::Float | PackedType::Int | PackedType::Enum => 4,
            PackedType::Color | PackedType::Direction => ROW_SIZE,
        }
    }
}

/// One packed setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackedEntry {
    /// The setting.
    pub id: SettingId,
    /// Its qualified name.
    pub name: String,
    /// Byte offset from the start of the buffer.
    pub offset: u32,
    /// Size in bytes.
    pub size: u32,
    /// Representation.
    pub ty: PackedType,
    /// Conversion applied to floats at write time.
    pub conversion: ConversionMode,
}

impl PackedEntry {
    /// The byte range covered by this entry.
    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset as usize..(self.offset + self.size) as usize
    }
}

/// Offsets of every shader-visible setting, in declaration order.
///
/// Computed once per registry; identical registries give identical layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackedLayout {
    entries: Vec<PackedEntry>,
    /// Entry index per setting id, `None` for settings that are not packed.
    slots: Vec<Option<usize>>,
    size: u32,
}

impl PackedLayout {
    /// Lays out the shader-visible settings of `registry`.
    pub fn build(registry: &SchemaRegistry) -> Self {
        let mut entries = Vec::new();
        let mut slots = vec![None; registry.len()];
        let mut cursor = 0u32;

        for descriptor in registry.iter().filter(|d| d.shader_visible) {
            let Some(ty) = PackedType::for_kind(descriptor.kind) else {
                continue;
            };
            let size = ty.size();
            if cursor % ROW_SIZE + size > ROW_SIZE {
                cursor = align_up(cursor, ROW_SIZE);
            }

            slots[descriptor.id.index()] = Some(entries.len());
            entries.push(PackedEntry {
                id: descriptor.id,
                name: descriptor.qualified_name.clone(),
                offset: cursor,
                size,
                ty,
                conversion: descriptor.conversion,
            });
            cursor += size;
        }

        let size = align_up(cursor, ROW_SIZE);
        log::debug!(
            "PackedLayout: {} entries in {} bytes for '{}'",
            entries.len(),
            size,
            registry.name()
        );

        Self {
            entries,
            slots,
            size,
        }
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[PackedEntry] {
        &self.entries
    }

    /// The entry of `id`, if it is packed.
    pub fn entry(&self, id: SettingId) -> Option<&PackedEntry> {
        let index = (*self.slots.get(id.index())?)?;
        self.entries.get(index)
    }

    /// Total size in bytes, a multiple of [`ROW_SIZE`].
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns `true` if nothing is packed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[inline]
fn align_up(value: u32, alignment: u32) -> u32 {
    value.div_ceil(alignment) * alignment
}
