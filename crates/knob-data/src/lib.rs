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

//! # Knob Data
//!
//! The runtime side of a settings schema: the registry that flattens a
//! [`SchemaDecl`](knob_core::settings::SchemaDecl) into descriptors, the
//! [`ValueStore`] holding current values, the validation rules every edit
//! goes through, and the packer that lays the shader-visible subset out as a
//! GPU constant buffer.

#![warn(missing_docs)]

mod bitset;
pub mod button;
pub mod packing;
pub mod registry;
pub mod store;
pub mod validation;

pub use button::ButtonSignals;
pub use packing::{
    serialize, ConstantBufferWriter, FrameBuffers, PackedEntry, PackedLayout, PackedType,
    ShaderHeader, ShaderLanguage,
};
pub use registry::SchemaRegistry;
pub use store::{StoreValues, ValueStore};
pub use validation::{propose, propose_with_limit, AcceptedValue};
