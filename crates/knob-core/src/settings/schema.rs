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

//! The declarative schema: a tree of groups and settings, exactly as authored.
//!
//! Nothing here is validated. The registry in `knob-data` checks the tree and
//! rejects contradictory declarations with a
//! [`SchemaError`](super::SchemaError).
//!
//! # Example
//!
//! ```
//! use knob_core::math::Vec3;
//! use knob_core::settings::{GroupDecl, SchemaDecl, SettingAttributes, SettingDecl};
//!
//! let sky = GroupDecl::new("sun_and_sky")
//!     .setting(SettingDecl::boolean("enable_sun", true, SettingAttributes::new()))
//!     .setting(SettingDecl::direction(
//!         "sun_direction",
//!         Vec3::new(0.26, 0.987, -0.16),
//!         SettingAttributes::new().view_space(true),
//!     ));
//! let schema = SchemaDecl::new("AppSettings", GroupDecl::new("AppSettings").group(sky))
//!     .constant("MaxSpotLights", 32u32);
//! assert_eq!(schema.constants.len(), 1);
//! ```

use super::metadata::{SettingAttributes, SettingKind};
use super::value::SettingValue;
use crate::math::{LinearRgba, Vec3};

/// A single setting as declared.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingDecl {
    /// The field identifier.
    pub name: String,
    /// The declared type.
    pub kind: SettingKind,
    /// The default value. `None` only for buttons.
    pub default: Option<SettingValue>,
    /// Enum label table, indexed by ordinal. Empty for other kinds.
    pub enum_labels: Vec<String>,
    /// Metadata attributes.
    pub attrs: SettingAttributes,
}

impl SettingDecl {
    fn with_value(name: impl Into<String>, value: SettingValue, attrs: SettingAttributes) -> Self {
        Self {
            name: name.into(),
            kind: value.kind(),
            default: Some(value),
            enum_labels: Vec::new(),
            attrs,
        }
    }

    /// Declares a boolean setting.
    pub fn boolean(name: impl Into<String>, default: bool, attrs: SettingAttributes) -> Self {
        Self::with_value(name, SettingValue::Bool(default), attrs)
    }

    /// Declares a float setting.
    pub fn float(name: impl Into<String>, default: f32, attrs: SettingAttributes) -> Self {
        Self::with_value(name, SettingValue::Float(default), attrs)
    }

    /// Declares an integer setting.
    pub fn int(name: impl Into<String>, default: i32, attrs: SettingAttributes) -> Self {
        Self::with_value(name, SettingValue::Int(default), attrs)
    }

    /// Declares an enum setting with its label table.
    pub fn enumeration<I, S>(
        name: impl Into<String>,
        default: u32,
        labels: I,
        attrs: SettingAttributes,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut decl = Self::with_value(name, SettingValue::Enum(default), attrs);
        decl.enum_labels = labels.into_iter().map(Into::into).collect();
        decl
    }

    /// Declares a color setting.
    pub fn color(name: impl Into<String>, default: LinearRgba, attrs: SettingAttributes) -> Self {
        Self::with_value(name, SettingValue::Color(default), attrs)
    }

    /// Declares a direction setting.
    pub fn direction(name: impl Into<String>, default: Vec3, attrs: SettingAttributes) -> Self {
        Self::with_value(name, SettingValue::Direction(default), attrs)
    }

    /// Declares a fire-once button.
    pub fn button(name: impl Into<String>, attrs: SettingAttributes) -> Self {
        Self {
            name: name.into(),
            kind: SettingKind::Button,
            default: None,
            enum_labels: Vec::new(),
            attrs,
        }
    }
}

/// An entry of a group: either a setting or a nested group.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemDecl {
    /// A leaf setting.
    Setting(SettingDecl),
    /// A nested group.
    Group(GroupDecl),
}

/// A named group of settings and nested groups, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDecl {
    /// The group identifier. Becomes a segment of qualified names.
    pub name: String,
    /// Label override. Derived from the identifier when absent.
    pub display_name: Option<String>,
    /// Whether the UI shows the group expanded by default.
    pub expanded: bool,
    /// Children in declaration order.
    pub items: Vec<ItemDecl>,
}

impl GroupDecl {
    /// Creates an empty, expanded group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            expanded: true,
            items: Vec::new(),
        }
    }

    /// Sets whether the group starts expanded.
    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    /// Overrides the display label.
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Appends a setting.
    pub fn setting(self, setting: SettingDecl) -> Self {
        self.item(ItemDecl::Setting(setting))
    }

    /// Appends a nested group.
    pub fn group(self, group: GroupDecl) -> Self {
        self.item(ItemDecl::Group(group))
    }

    /// Appends any item.
    pub fn item(mut self, item: ItemDecl) -> Self {
        self.items.push(item);
        self
    }
}

/// The value of a schema constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstantValue {
    /// An unsigned integer constant.
    UInt(u64),
    /// A float constant.
    Float(f32),
}

impl From<u32> for ConstantValue {
    fn from(v: u32) -> Self {
        ConstantValue::UInt(v as u64)
    }
}

impl From<u64> for ConstantValue {
    fn from(v: u64) -> Self {
        ConstantValue::UInt(v)
    }
}

impl From<f32> for ConstantValue {
    fn from(v: f32) -> Self {
        ConstantValue::Float(v)
    }
}

/// A named compile-time constant shared between the application and its shaders.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDecl {
    /// The constant identifier.
    pub name: String,
    /// Its value.
    pub value: ConstantValue,
}

/// A complete schema: the root group plus shared constants.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDecl {
    /// The schema name, used for generated headers and preset file banners.
    pub name: String,
    /// The root group. Its own name is not part of qualified names.
    pub root: GroupDecl,
    /// Constants in declaration order.
    pub constants: Vec<ConstantDecl>,
}

impl SchemaDecl {
    /// Creates a schema from its root group.
    pub fn new(name: impl Into<String>, root: GroupDecl) -> Self {
        Self {
            name: name.into(),
            root,
            constants: Vec::new(),
        }
    }

    /// Appends a constant.
    pub fn constant(mut self, name: impl Into<String>, value: impl Into<ConstantValue>) -> Self {
        self.constants.push(ConstantDecl {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_preserves_declaration_order() {
        let group = GroupDecl::new("debug")
            .setting(SettingDecl::boolean("b", true, SettingAttributes::new()))
            .setting(SettingDecl::boolean("a", false, SettingAttributes::new()))
            .group(GroupDecl::new("nested"));
        let names: Vec<_> = group
            .items
            .iter()
            .map(|item| match item {
                ItemDecl::Setting(s) => s.name.as_str(),
                ItemDecl::Group(g) => g.name.as_str(),
            })
            .collect();
        assert_eq!(names, ["b", "a", "nested"]);
    }

    #[test]
    fn test_enumeration_collects_labels() {
        let decl = SettingDecl::enumeration("msaa", 0, ["None", "2x", "4x"], SettingAttributes::new());
        assert_eq!(decl.kind, SettingKind::Enum);
        assert_eq!(decl.enum_labels, ["None", "2x", "4x"]);
        assert_eq!(decl.default, Some(SettingValue::Enum(0)));
    }

    #[test]
    fn test_button_has_no_default() {
        let decl = SettingDecl::button("clear_decals", SettingAttributes::new());
        assert_eq!(decl.kind, SettingKind::Button);
        assert!(decl.default.is_none());
    }

    #[test]
    fn test_constants_convert() {
        let schema = SchemaDecl::new("S", GroupDecl::new("S"))
            .constant("Tiles", 16u32)
            .constant("Range", 7.5f32);
        assert_eq!(schema.constants[0].value, ConstantValue::UInt(16));
        assert_eq!(schema.constants[1].value, ConstantValue::Float(7.5));
    }
}
