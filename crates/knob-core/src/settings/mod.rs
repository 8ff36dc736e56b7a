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

//! The settings metadata model.
//!
//! A settings tree is authored either through the builder types in [`schema`]
//! or through `#[derive(Settings)]` from `knob-macros`, which expands into the
//! same builder calls. Both produce a [`SchemaDecl`], the static input that the
//! registry in `knob-data` flattens into [`SettingDescriptor`]s.

pub mod descriptor;
pub mod error;
pub mod metadata;
pub mod naming;
pub mod reflect;
pub mod schema;
pub mod value;

pub use self::descriptor::{GroupChild, SettingDescriptor, SettingGroup, SettingId};
pub use self::error::{SchemaError, ValidationError};
pub use self::metadata::{Constraints, ConversionMode, SettingAttributes, SettingKind};
pub use self::naming::{display_name, join_path};
pub use self::reflect::{SettingEnum, SettingField, Settings, ValueSource};
pub use self::schema::{ConstantDecl, ConstantValue, GroupDecl, ItemDecl, SchemaDecl, SettingDecl};
pub use self::value::{Button, Color, Direction, SettingValue};
