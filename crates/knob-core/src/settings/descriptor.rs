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

//! Resolved, immutable descriptions of registered settings.

use super::metadata::{Constraints, ConversionMode, SettingKind};
use super::value::SettingValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable handle to a registered setting.
///
/// Ids are assigned in declaration order, depth first, starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SettingId(pub u32);

impl SettingId {
    /// Returns the id as a dense index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SettingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything the runtime knows about one setting.
///
/// Produced by the registry, never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingDescriptor {
    /// The handle of this setting.
    pub id: SettingId,
    /// The bare identifier.
    pub name: String,
    /// Dot-separated path from the root, e.g. `sun_and_sky.sun_size`.
    pub qualified_name: String,
    /// Qualified path of the owning group (empty for the root).
    pub group_path: String,
    /// The declared kind.
    pub kind: SettingKind,
    /// The default value, `None` for buttons.
    pub default: Option<SettingValue>,
    /// Numeric bounds and step.
    pub constraints: Constraints,
    /// The UI label.
    pub label: String,
    /// Tooltip text.
    pub help: String,
    /// Initial visibility of the control.
    pub visible: bool,
    /// Whether the setting is packed into the constant buffer.
    pub shader_visible: bool,
    /// Direction edited relative to the camera.
    pub view_space: bool,
    /// Color allowed above `1.0`.
    pub hdr: bool,
    /// Pack-time conversion for floats.
    pub conversion: ConversionMode,
    /// Labels indexed by ordinal. Empty unless `kind` is `Enum`.
    pub enum_labels: Vec<String>,
}

impl SettingDescriptor {
    /// Returns the label of `ordinal`, if this is an enum and the ordinal exists.
    pub fn enum_label(&self, ordinal: u32) -> Option<&str> {
        self.enum_labels.get(ordinal as usize).map(String::as_str)
    }

    /// Returns the ordinal whose label is `label`.
    pub fn enum_ordinal(&self, label: &str) -> Option<u32> {
        self.enum_labels
            .iter()
            .position(|l| l == label)
            .map(|i| i as u32)
    }
}

/// A child of a resolved group.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupChild {
    /// A setting, by id.
    Setting(SettingId),
    /// A nested group.
    Group(SettingGroup),
}

/// A resolved group, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingGroup {
    /// The bare identifier.
    pub name: String,
    /// Qualified path (empty for the root).
    pub path: String,
    /// The UI label.
    pub label: String,
    /// Whether the UI shows the group expanded by default.
    pub expanded: bool,
    /// Children in declaration order.
    pub children: Vec<GroupChild>,
}

impl SettingGroup {
    /// Visits every setting id under this group, depth first.
    pub fn for_each_setting(&self, f: &mut impl FnMut(SettingId)) {
        for child in &self.children {
            match child {
                GroupChild::Setting(id) => f(*id),
                GroupChild::Group(group) => group.for_each_setting(f),
            }
        }
    }

    /// Finds a nested group by its qualified path.
    pub fn find_group(&self, path: &str) -> Option<&SettingGroup> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            GroupChild::Group(group) => group.find_group(path),
            GroupChild::Setting(_) => None,
        })
    }
}
