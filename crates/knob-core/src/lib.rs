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

//! # Knob Core
//!
//! Foundational crate containing the settings metadata model, the value types
//! a setting can hold, and the error contracts shared by every other Knob crate.
//!
//! Nothing in here walks a schema or touches GPU memory; that lives in
//! `knob-data`. This crate only describes *what* a setting is.

#![warn(missing_docs)]

pub mod math;
pub mod settings;

pub use settings::{
    Button, ConversionMode, SchemaError, SettingDescriptor, SettingEnum, SettingField,
    SettingId, SettingKind, SettingValue, Settings, ValidationError,
};
