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

//! Traits connecting plain Rust structs to the schema model.
//!
//! `#[derive(Settings)]` implements [`Settings`] and [`SettingField`] for a
//! struct, `#[derive(SettingEnum)]` implements [`SettingEnum`] and
//! [`SettingField`] for a fieldless enum. The leaf implementations for the
//! primitive kinds live here.

use super::metadata::SettingAttributes;
use super::naming::join_path;
use super::schema::{GroupDecl, ItemDecl, SchemaDecl, SettingDecl};
use super::value::{Button, SettingValue};
use crate::math::{LinearRgba, Vec3};
use std::collections::HashMap;

/// Read access to current values by qualified name.
pub trait ValueSource {
    /// Returns the current value of `qualified_name`, if it exists.
    fn value(&self, qualified_name: &str) -> Option<SettingValue>;
}

impl ValueSource for HashMap<String, SettingValue> {
    fn value(&self, qualified_name: &str) -> Option<SettingValue> {
        self.get(qualified_name).copied()
    }
}

/// A type that can appear as a field of a settings struct.
pub trait SettingField: Sized {
    /// Declares the field as a schema item named `name`.
    fn declare(name: &str, default: &Self, attrs: SettingAttributes) -> ItemDecl;

    /// Reads the field back from `source`, where `path` is its qualified name.
    fn extract(path: &str, source: &dyn ValueSource) -> Option<Self>;
}

/// A struct that describes a whole settings group.
pub trait Settings: Default + Sized {
    /// The type name, used as the schema name.
    const NAME: &'static str;

    /// Declares this struct as a group named `name`.
    ///
    /// Field-level attributes on the parent (`display_name`) override the
    /// struct-level ones.
    fn declare_group(name: &str, default: &Self, attrs: SettingAttributes) -> GroupDecl;

    /// Rebuilds the struct from `source`. `path` is the group's qualified path.
    fn extract_group(path: &str, source: &dyn ValueSource) -> Option<Self>;

    /// Builds the schema, using `Default` for every default value.
    fn schema() -> SchemaDecl {
        SchemaDecl::new(
            Self::NAME,
            Self::declare_group(Self::NAME, &Self::default(), SettingAttributes::default()),
        )
    }

    /// Returns a typed snapshot of the current values.
    ///
    /// Falls back to `Default` if `source` does not cover the schema.
    fn snapshot(source: &dyn ValueSource) -> Self {
        Self::extract_group("", source).unwrap_or_default()
    }
}

/// A fieldless enum usable as an enum setting.
pub trait SettingEnum: Sized + Copy {
    /// Labels indexed by ordinal.
    const LABELS: &'static [&'static str];

    /// The ordinal of this variant.
    fn ordinal(&self) -> u32;

    /// The variant at `ordinal`.
    fn from_ordinal(ordinal: u32) -> Option<Self>;
}

/// Qualified name of a child field under `path`.
#[doc(hidden)]
pub fn field_path(path: &str, name: &str) -> String {
    join_path(path, name)
}

macro_rules! impl_leaf_field {
    ($ty:ty, $ctor:ident, $accessor:ident) => {
        impl SettingField for $ty {
            fn declare(name: &str, default: &Self, attrs: SettingAttributes) -> ItemDecl {
                ItemDecl::Setting(SettingDecl::$ctor(name, *default, attrs))
            }

            fn extract(path: &str, source: &dyn ValueSource) -> Option<Self> {
                source.value(path)?.$accessor()
            }
        }
    };
}

impl_leaf_field!(bool, boolean, as_bool);
impl_leaf_field!(f32, float, as_float);
impl_leaf_field!(i32, int, as_int);
impl_leaf_field!(Vec3, direction, as_direction);
impl_leaf_field!(LinearRgba, color, as_color);

impl SettingField for Button {
    fn declare(name: &str, _default: &Self, attrs: SettingAttributes) -> ItemDecl {
        ItemDecl::Setting(SettingDecl::button(name, attrs))
    }

    fn extract(_path: &str, _source: &dyn ValueSource) -> Option<Self> {
        Some(Button)
    }
}
