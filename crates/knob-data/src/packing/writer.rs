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

//! Serialization of values into the packed layout.

use super::layout::{PackedEntry, PackedLayout, PackedType};
use crate::store::ValueStore;
use knob_core::math::Vec4;
use knob_core::settings::SettingValue;

/// Serializes every packed entry of `store` into a fresh buffer.
pub fn serialize(layout: &PackedLayout, store: &ValueStore) -> Vec<u8> {
    let mut bytes = vec![0u8; layout.size() as usize];
    for entry in layout.entries() {
        encode_entry(entry, store.get(entry.id), &mut bytes);
    }
    bytes
}

/// Writes one entry into `bytes`. A missing or mismatched value packs as zeros.
///
/// Vectors are written as a full `Vec4` row with `w = 0`.
fn encode_entry(entry: &PackedEntry, value: Option<SettingValue>, bytes: &mut [u8]) {
    let dst = &mut bytes[entry.range()];
    match (entry.ty, value) {
        (PackedType::Bool, Some(SettingValue::Bool(v))) => {
            dst.copy_from_slice(bytemuck::bytes_of(&(v as u32)))
        }
        (PackedType::Float, Some(SettingValue::Float(v))) => {
            dst.copy_from_slice(bytemuck::bytes_of(&entry.conversion.apply(v)))
        }
        (PackedType::Int, Some(SettingValue::Int(v))) => dst.copy_from_slice(bytemuck::bytes_of(&v)),
        (PackedType::Enum, Some(SettingValue::Enum(v))) => dst.copy_from_slice(bytemuck::bytes_of(&v)),
        (PackedType::Color, Some(SettingValue::Color(c))) => {
            dst.copy_from_slice(bytemuck::bytes_of(&Vec4::new(c.r, c.g, c.b, 0.0)))
        }
        (PackedType::Direction, Some(SettingValue::Direction(d))) => {
            dst.copy_from_slice(bytemuck::bytes_of(&Vec4::from_vec3(d, 0.0)))
        }
        _ => {
            log::debug!("ConstantBufferWriter: No value for '{}', packing zeros", entry.name);
            dst.fill(0);
        }
    }
}

/// Keeps a CPU staging copy of the constant buffer up to date.
///
/// The first [`update`](Self::update) writes every entry; later ones only
/// rewrite the slots the store marked dirty. Both paths produce the same bytes
/// as [`serialize`] for the same store.
#[derive(Debug, Clone)]
pub struct ConstantBufferWriter {
    staging: Vec<u8>,
    initialized: bool,
}

impl ConstantBufferWriter {
    /// Creates a writer sized for `layout`.
    pub fn new(layout: &PackedLayout) -> Self {
        Self {
            staging: vec![0; layout.size() as usize],
            initialized: false,
        }
    }

    /// Brings the staging bytes up to date and clears the store's dirty flags.
    ///
    /// Returns the number of entries written.
    pub fn update(&mut self, layout: &PackedLayout, store: &mut ValueStore) -> usize {
        debug_assert_eq!(
            self.staging.len(),
            layout.size() as usize,
            "ConstantBufferWriter used with a different layout"
        );

        let written = if self.initialized {
            let mut count = 0;
            for id in store.dirty_ids() {
                if let Some(entry) = layout.entry(id) {
                    encode_entry(entry, store.get(id), &mut self.staging);
                    count += 1;
                }
            }
            count
        } else {
            for entry in layout.entries() {
                encode_entry(entry, store.get(entry.id), &mut self.staging);
            }
            self.initialized = true;
            layout.entries().len()
        };

        store.clear_dirty();
        if written > 0 {
            log::trace!("ConstantBufferWriter: Wrote {written} slot(s)");
        }
        written
    }

    /// Forces the next [`update`](Self::update) to rewrite every entry.
    pub fn invalidate(&mut self) {
        self.initialized = false;
    }

    /// The staging bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.staging
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SchemaRegistry;
    use approx::assert_relative_eq;
    use knob_core::math::{LinearRgba, Vec3};
    use knob_core::settings::{
        ConversionMode, GroupDecl, SchemaDecl, SettingAttributes, SettingDecl,
    };

    fn fixture() -> (SchemaRegistry, PackedLayout, ValueStore) {
        let attrs = SettingAttributes::new;
        let registry = SchemaRegistry::build(&SchemaDecl::new(
            "S",
            GroupDecl::new("S")
                .setting(SettingDecl::boolean("on", true, attrs()))
                .setting(SettingDecl::float(
                    "angle",
                    180.0,
                    attrs().conversion(ConversionMode::DegreesToRadians),
                ))
                .setting(SettingDecl::int("count", -2, attrs()))
                .setting(SettingDecl::enumeration("mode", 2, ["a", "b", "c"], attrs()))
                .setting(SettingDecl::color("tint", LinearRgba::rgb(0.25, 0.5, 1.0), attrs()))
                .setting(SettingDecl::direction("dir", Vec3::Z, attrs())),
        ))
        .unwrap();
        let layout = PackedLayout::build(&registry);
        let store = ValueStore::from_defaults(&registry);
        (registry, layout, store)
    }

    fn word(bytes: &[u8], offset: usize) -> u32 {
        u32::from_ne_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_serialize_encodes_each_type() {
        let (_, layout, store) = fixture();
        let bytes = serialize(&layout, &store);
        assert_eq!(bytes.len(), 48);

        assert_eq!(word(&bytes, 0), 1);
        assert_relative_eq!(f32::from_bits(word(&bytes, 4)), std::f32::consts::PI);
        assert_eq!(word(&bytes, 8) as i32, -2);
        assert_eq!(word(&bytes, 12), 2);
        // Color row.
        assert_eq!(f32::from_bits(word(&bytes, 16)), 0.25);
        assert_eq!(f32::from_bits(word(&bytes, 24)), 1.0);
        assert_eq!(word(&bytes, 28), 0);
        // Direction row.
        assert_eq!(f32::from_bits(word(&bytes, 40)), 1.0);
        assert_eq!(word(&bytes, 44), 0);
    }

    #[test]
    fn test_vector_rows_are_vec4_with_zero_w() {
        let (_, layout, store) = fixture();
        let bytes = serialize(&layout, &store);

        let tint = Vec4::new(0.25, 0.5, 1.0, 0.0);
        assert_eq!(&bytes[16..32], bytemuck::bytes_of(&tint));
        assert_eq!(&bytes[32..48], bytemuck::bytes_of(&Vec4::from_vec3(Vec3::Z, 0.0)));
    }

    #[test]
    fn test_incremental_matches_full() {
        let (registry, layout, mut store) = fixture();
        let mut writer = ConstantBufferWriter::new(&layout);
        assert_eq!(writer.update(&layout, &mut store), layout.entries().len());

        store
            .propose_by_name(&registry, "count", SettingValue::Int(7))
            .unwrap();
        store
            .propose_by_name(&registry, "dir", SettingValue::Direction(Vec3::X))
            .unwrap();
        assert_eq!(writer.update(&layout, &mut store), 2);
        assert!(!store.has_dirty());

        assert_eq!(writer.bytes(), serialize(&layout, &store).as_slice());
    }

    #[test]
    fn test_clean_update_writes_nothing() {
        let (_, layout, mut store) = fixture();
        let mut writer = ConstantBufferWriter::new(&layout);
        writer.update(&layout, &mut store);
        assert_eq!(writer.update(&layout, &mut store), 0);

        writer.invalidate();
        assert_eq!(writer.update(&layout, &mut store), layout.entries().len());
    }
}
