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

//! Current values of every setting, plus the per-setting runtime flags.

use crate::bitset::FlagSet;
use crate::registry::SchemaRegistry;
use crate::validation::{propose_with_limit, AcceptedValue};
use knob_core::settings::{SettingId, SettingKind, SettingValue, ValueSource};
use knob_core::ValidationError;

/// Dense storage of current values, indexed by [`SettingId`].
///
/// The only way to change a value is [`propose`](Self::propose), which runs
/// the validation rules first. Buttons have no slot value.
#[derive(Debug, Clone)]
pub struct ValueStore {
    values: Vec<Option<SettingValue>>,
    /// Packed slots that need re-serializing.
    dirty: FlagSet,
    /// Settings whose value changed since the last [`clear_changed`](Self::clear_changed).
    changed: FlagSet,
    visible: Vec<bool>,
    enum_limits: Vec<Option<u32>>,
}

impl ValueStore {
    /// Creates a store holding every default of `registry`.
    pub fn from_defaults(registry: &SchemaRegistry) -> Self {
        let len = registry.len();
        Self {
            values: registry.iter().map(|d| d.default).collect(),
            dirty: FlagSet::with_len(len),
            changed: FlagSet::with_len(len),
            visible: registry.iter().map(|d| d.visible).collect(),
            enum_limits: vec![None; len],
        }
    }

    /// Number of slots, buttons included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the store has no slots.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the current value of `id`. `None` for buttons and unknown ids.
    pub fn get(&self, id: SettingId) -> Option<SettingValue> {
        self.values.get(id.index()).copied().flatten()
    }

    /// All values in id order.
    pub fn values(&self) -> &[Option<SettingValue>] {
        &self.values
    }

    /// Validates `raw` and, if accepted, stores the result.
    ///
    /// A stored value that differs from the previous one marks the slot dirty
    /// (when shader-visible) and sets its changed flag. Rejections leave the
    /// store untouched.
    pub fn propose(
        &mut self,
        registry: &SchemaRegistry,
        id: SettingId,
        raw: SettingValue,
    ) -> Result<AcceptedValue, ValidationError> {
        let descriptor = registry
            .descriptor(id)
            .ok_or_else(|| ValidationError::UnknownSetting {
                name: id.to_string(),
            })?;
        let limit = self.enum_limit(id);
        let accepted = propose_with_limit(descriptor, raw, limit)?;
        self.write(id, accepted.value, descriptor.shader_visible);
        Ok(accepted)
    }

    /// [`propose`](Self::propose) by qualified name.
    pub fn propose_by_name(
        &mut self,
        registry: &SchemaRegistry,
        qualified_name: &str,
        raw: SettingValue,
    ) -> Result<AcceptedValue, ValidationError> {
        let id = registry
            .lookup(qualified_name)
            .ok_or_else(|| ValidationError::UnknownSetting {
                name: qualified_name.to_owned(),
            })?;
        self.propose(registry, id, raw)
    }

    /// Restores the default of `id`.
    pub fn reset(&mut self, registry: &SchemaRegistry, id: SettingId) {
        if let Some(descriptor) = registry.descriptor(id) {
            if let Some(default) = descriptor.default {
                self.write(id, default, descriptor.shader_visible);
            }
        }
    }

    /// Restores every default.
    pub fn reset_all(&mut self, registry: &SchemaRegistry) {
        for descriptor in registry.iter() {
            self.reset(registry, descriptor.id);
        }
    }

    fn write(&mut self, id: SettingId, value: SettingValue, shader_visible: bool) {
        let Some(slot) = self.values.get_mut(id.index()) else {
            return;
        };
        if *slot == Some(value) {
            return;
        }
        *slot = Some(value);
        self.changed.set(id);
        if shader_visible {
            self.dirty.set(id);
        }
    }

    /// Returns `true` if the packed slot of `id` needs re-serializing.
    pub fn is_dirty(&self, id: SettingId) -> bool {
        self.dirty.is_set(id)
    }

    /// Returns `true` if any packed slot needs re-serializing.
    pub fn has_dirty(&self) -> bool {
        self.dirty.any()
    }

    /// Iterates over dirty ids in ascending order.
    pub fn dirty_ids(&self) -> impl Iterator<Item = SettingId> + '_ {
        self.dirty.iter()
    }

    /// Marks every shader-visible slot dirty.
    pub fn mark_all_dirty(&mut self, registry: &SchemaRegistry) {
        for descriptor in registry.iter().filter(|d| d.shader_visible) {
            self.dirty.set(descriptor.id);
        }
    }

    /// Clears every dirty flag. Called by the writer once the slots are serialized.
    pub fn clear_dirty(&mut self) {
        self.dirty.clear_all();
    }

    /// Returns `true` if the value of `id` changed since the flags were last cleared.
    pub fn changed(&self, id: SettingId) -> bool {
        self.changed.is_set(id)
    }

    /// Returns `true` if any value changed since the flags were last cleared.
    pub fn any_changed(&self) -> bool {
        self.changed.any()
    }

    /// Clears every changed flag. Called at the end of a frame.
    pub fn clear_changed(&mut self) {
        self.changed.clear_all();
    }

    /// Current visibility of the control for `id`.
    pub fn is_visible(&self, id: SettingId) -> bool {
        self.visible.get(id.index()).copied().unwrap_or(false)
    }

    /// Shows or hides the control for `id`. The value is unaffected.
    pub fn set_visible(&mut self, id: SettingId, visible: bool) {
        if let Some(slot) = self.visible.get_mut(id.index()) {
            *slot = visible;
        }
    }

    /// The runtime cap on the ordinal of an enum setting.
    pub fn enum_limit(&self, id: SettingId) -> Option<u32> {
        self.enum_limits.get(id.index()).copied().flatten()
    }

    /// Caps the ordinal of an enum setting, or removes the cap with `None`.
    ///
    /// A current value above the new cap is lowered to it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownSetting`] for an unknown id and
    /// [`ValidationError::TypeMismatch`] if `id` is not an enum.
    pub fn set_enum_limit(
        &mut self,
        registry: &SchemaRegistry,
        id: SettingId,
        limit: Option<u32>,
    ) -> Result<(), ValidationError> {
        let descriptor = registry
            .descriptor(id)
            .ok_or_else(|| ValidationError::UnknownSetting {
                name: id.to_string(),
            })?;
        if descriptor.kind != SettingKind::Enum {
            return Err(ValidationError::TypeMismatch {
                name: descriptor.qualified_name.clone(),
                expected: SettingKind::Enum,
                found: descriptor.kind,
            });
        }
        let slot = self
            .enum_limits
            .get_mut(id.index())
            .ok_or_else(|| ValidationError::UnknownSetting {
                name: descriptor.qualified_name.clone(),
            })?;
        *slot = limit;

        if let (Some(limit), Some(SettingValue::Enum(current))) = (limit, self.get(id)) {
            if current > limit {
                self.write(id, SettingValue::Enum(limit), descriptor.shader_visible);
            }
        }
        Ok(())
    }

    /// A by-name view of this store, usable as a [`ValueSource`].
    pub fn source<'a>(&'a self, registry: &'a SchemaRegistry) -> StoreValues<'a> {
        StoreValues {
            registry,
            store: self,
        }
    }
}

/// A [`ValueSource`] reading a [`ValueStore`] through its registry's name index.
#[derive(Debug, Clone, Copy)]
pub struct StoreValues<'a> {
    registry: &'a SchemaRegistry,
    store: &'a ValueStore,
}

impl ValueSource for StoreValues<'_> {
    fn value(&self, qualified_name: &str) -> Option<SettingValue> {
        self.store.get(self.registry.lookup(qualified_name)?)
    }
}
